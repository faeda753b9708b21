use thiserror::Error;

/// Top-level error type for the `snoo-api` crate.
///
/// Covers the failure modes of the feed boundary: history queries,
/// connectivity, and message decoding. `snoo-core` maps these into
/// domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── History ─────────────────────────────────────────────────────
    /// The history query could not be answered.
    #[error("History unavailable: {message}")]
    HistoryUnavailable { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// The feed transport is not connected.
    #[error("Feed is not connected")]
    NotConnected,

    // ── Decoding ────────────────────────────────────────────────────
    /// A feed message could not be decoded.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Whether retrying the same operation later could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::HistoryUnavailable { .. } | Self::NotConnected)
    }
}
