//! Error types for the layout synchronizer

use thiserror::Error;

/// Result type alias for layout operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or hosting the synchronizer.
///
/// `synchronize` itself never fails; these only surface while building a
/// configuration or loading a document. Malformed inline styles are not
/// errors: unresolvable values fall back to their initial values.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Unsupported element selector
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
