//! Config subcommand handlers.

use std::fmt::Write;

use snoo_config::Config;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

/// Human-readable summary followed by the effective TOML.
fn detail(cfg: &Config) -> Result<String, CliError> {
    let mut out = String::new();
    let names: Vec<&str> = cfg.devices.keys().map(String::as_str).collect();
    let _ = writeln!(
        out,
        "# {} device profile(s){}",
        names.len(),
        if names.is_empty() {
            String::new()
        } else {
            format!(": {}", names.join(", "))
        }
    );
    out.push_str(&cfg.to_toml()?);
    Ok(out)
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path(global).display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            let out = output::render_single(global.output, &cfg, detail, |c| {
                c.devices.keys().cloned().collect::<Vec<_>>().join("\n")
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
