//! CLI error types with miette diagnostics.
//!
//! Maps core and config errors into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use snoo_config::ConfigError;
use snoo_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const DATA: i32 = 65;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Recordings ───────────────────────────────────────────────────
    #[error("Cannot read recording {path}")]
    #[diagnostic(
        code(snoo::recording_unreadable),
        help("Check that the file exists and is readable.")
    )]
    RecordingUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid feed record at {path}:{line}: {message}")]
    #[diagnostic(
        code(snoo::invalid_record),
        help(
            "Each line must be an activity-state object or {{\"connected\": true|false}}.\n\
             Blank lines and lines starting with '#' are ignored."
        )
    )]
    InvalidRecord {
        path: String,
        line: usize,
        message: String,
    },

    // ── Devices ──────────────────────────────────────────────────────
    #[error("No device configured")]
    #[diagnostic(
        code(snoo::no_device),
        help(
            "Pass --serial and --baby, or add a [devices.<name>] profile to\n\
             {path}"
        )
    )]
    NoDevice { path: String },

    #[error("Device profile '{name}' not found in configuration")]
    #[diagnostic(code(snoo::profile_not_found), help("Available profiles: {available}"))]
    ProfileNotFound { name: String, available: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(snoo::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(snoo::config),
        help("Check the config file and any SNOO_* environment variables.")
    )]
    Config { message: String },

    // ── Core ─────────────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(snoo::core))]
    Core(#[from] CoreError),

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    #[diagnostic(code(snoo::json))]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    #[diagnostic(code(snoo::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::UnknownDevice { name, available } => Self::ProfileNotFound {
                name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            },
            other @ (ConfigError::Serialization(_) | ConfigError::Figment(_)) => Self::Config {
                message: other.to_string(),
            },
        }
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::RecordingUnreadable { .. } | Self::ProfileNotFound { .. } => {
                exit_code::NOT_FOUND
            }
            Self::InvalidRecord { .. } => exit_code::DATA,
            Self::NoDevice { .. } | Self::Validation { .. } => exit_code::USAGE,
            Self::Config { .. }
            | Self::Core(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Yaml(_) => exit_code::GENERAL,
        }
    }
}
