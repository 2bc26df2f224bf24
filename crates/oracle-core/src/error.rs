use thiserror::Error;

/// Top-level error type for the Oracle workspace.
///
/// Covers the failures shared by every crate: reading and parsing
/// configuration, and (de)serializing records. Streaming failures live in
/// `oracle-chat` and never surface through this type.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OracleError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for OracleError {
    fn from(err: toml::de::Error) -> Self {
        OracleError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for OracleError {
    fn from(err: toml::ser::Error) -> Self {
        OracleError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for OracleError {
    fn from(err: serde_json::Error) -> Self {
        OracleError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Oracle operations.
pub type Result<T> = std::result::Result<T, OracleError>;
