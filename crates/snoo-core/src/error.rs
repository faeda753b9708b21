// ── Core error types ──
//
// Errors surfaced by snoo-core. Feed-level failures are translated by the
// `From<snoo_api::Error>` impl so consumers never match on wire errors.
// Most feed trouble never reaches this type at all: a failed history
// fetch during attach degrades to "no data yet".

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Lifecycle ────────────────────────────────────────────────────
    #[error("Synchronizer has been detached")]
    Detached,

    // ── Feed errors (wrapped, not exposed raw) ───────────────────────
    #[error("History unavailable: {message}")]
    HistoryUnavailable { message: String },

    #[error("Feed error: {message}")]
    Feed { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from feed-layer errors ────────────────────────────────

impl From<snoo_api::Error> for CoreError {
    fn from(err: snoo_api::Error) -> Self {
        match err {
            snoo_api::Error::HistoryUnavailable { message } => {
                CoreError::HistoryUnavailable { message }
            }
            snoo_api::Error::NotConnected => CoreError::Feed {
                message: "feed is not connected".into(),
            },
            snoo_api::Error::Deserialization { message, body: _ } => CoreError::Feed {
                message: format!("undecodable feed message: {message}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_errors_keep_their_message() {
        let err = CoreError::from(snoo_api::Error::HistoryUnavailable {
            message: "timed out".into(),
        });
        assert_eq!(err.to_string(), "History unavailable: timed out");
    }

    #[test]
    fn decode_errors_drop_the_body() {
        let err = CoreError::from(snoo_api::Error::Deserialization {
            message: "expected value".into(),
            body: "garbage".into(),
        });
        let text = err.to_string();
        assert!(text.contains("expected value"));
        assert!(!text.contains("garbage"));
    }
}
