//! Error types for the streaming chat client.

use oracle_core::OracleError;

/// Stream-level failures, surfaced to the caller of `submit`.
///
/// Per-frame decode problems and per-card lookup failures are not errors at
/// this level: the former become literal text, the latter inline notices.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("query cannot be empty")]
    EmptyQuery,
    #[error("a response is already streaming")]
    AlreadyStreaming,
    #[error("{0}")]
    Transport(String),
    #[error("Stream ended before a done event was received.")]
    PrematureTermination,
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<OracleError> for ChatError {
    fn from(err: OracleError) -> Self {
        ChatError::Config(err.to_string())
    }
}

/// Failure to resolve a single card reference.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("Card lookup failed with {status}")]
    Status { status: u16, reason: String },
    #[error("Card record could not be parsed: {0}")]
    InvalidRecord(String),
    #[error("Card lookup request failed: {0}")]
    Request(String),
}
