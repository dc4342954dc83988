//! Error types for credential store operations

/// Errors from credential store operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("credential parse error: {0}")]
    Parse(String),

    #[error("credential store unavailable: {0}")]
    Unavailable(String),
}

/// Result alias for credential store operations.
pub type Result<T> = std::result::Result<T, Error>;
