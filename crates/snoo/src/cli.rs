//! Clap derive structures for the `snoo` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// snoo -- mirror a SNOO bassinet's activity feed into sensor readings
#[derive(Debug, Parser)]
#[command(
    name = "snoo",
    version,
    about = "Replay SNOO bassinet activity feeds and inspect sensor readings",
    long_about = "Mirrors a SNOO smart bassinet's activity feed into derived sensors:\n\
        the current soothing level (by name and number) and the session start time.\n\n\
        Feeds are read from JSON-lines recordings, one activity state or\n\
        {\"connected\": bool} marker per line.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Device profile to use
    #[arg(long, short = 'd', env = "SNOO_DEVICE", global = true)]
    pub device: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "SNOO_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SNOO_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the level table (names, numbers, icons)
    Levels,

    /// Replay a feed recording and print the final sensor readings
    Show(ReplayArgs),

    /// Replay a feed recording, printing every sensor re-render
    Watch(WatchArgs),

    /// Inspect CLI configuration and device profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Replay ───────────────────────────────────────────────────────────

/// Shared arguments for commands that replay a recording.
#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// JSON-lines feed recording
    pub file: PathBuf,

    /// Treat the first N activity records as feed history instead of live events
    #[arg(long, default_value = "0")]
    pub preload: usize,

    /// Start with the feed disconnected
    #[arg(long)]
    pub disconnected: bool,

    /// Device serial number (overrides profile)
    #[arg(long)]
    pub serial: Option<String>,

    /// Baby name (overrides profile)
    #[arg(long)]
    pub baby: Option<String>,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    #[command(flatten)]
    pub replay: ReplayArgs,

    /// Delay between live events (e.g. 250ms, 2s)
    #[arg(long, default_value = "250ms")]
    pub interval: humantime::Duration,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,
    /// Show the effective configuration
    Show,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
