//! Error types for spanguard.

use thiserror::Error;

/// Result type for spanguard operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for spanguard operations.
///
/// Per-record and per-span defects are never errors: they are counted in
/// reports and recovered locally. Only conditions that abort a whole file (or
/// the whole run) surface here.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// IO error (file not found, permission denied, ...).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid or unreadable configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A configured regex failed to compile.
    #[error("Pattern error: {0}")]
    Pattern(String),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl Error {
    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a pattern error.
    #[must_use]
    pub fn pattern(msg: impl Into<String>) -> Self {
        Self::Pattern(msg.into())
    }

    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a parse error.
    #[must_use]
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
