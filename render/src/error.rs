//! Error types for help rendering and render configuration.

use thiserror::Error;

/// Errors that can occur while rendering help or loading configuration.
#[derive(Debug, Error)]
pub enum RenderError {
    /// File or stream I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// An output format name that is not recognized.
    #[error("unknown output format: {0}")]
    UnknownFormat(String),
}

impl From<RenderError> for std::io::Error {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Io(e) => e,
            other => std::io::Error::other(other),
        }
    }
}

/// Convenience alias for results with [`RenderError`].
pub type Result<T> = std::result::Result<T, RenderError>;
