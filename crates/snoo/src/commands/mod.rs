//! Command handlers: bridge CLI args -> core hub -> output formatting.

pub mod config_cmd;
pub mod levels;
pub mod show;
pub mod watch;
