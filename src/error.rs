use std::path::PathBuf;
use thiserror::Error;

/// The main error type for boxkit operations.
#[derive(Debug, Error)]
pub enum BoxError {
    /// Corner ordering violated (`x1 >= x2` or `y1 >= y2`), a non-finite
    /// value, a non-positive or overflowing extent, or a zero image dimension.
    #[error("Invalid geometry: {message}")]
    InvalidGeometry { message: String },

    /// An operation needs image dimensions that were never supplied.
    #[error("Image shape is required to {operation}")]
    MissingImageShape { operation: &'static str },

    /// Unknown containment method, or a method/threshold/predicate mismatch.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse containment config from {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to write JSON output: {0}")]
    JsonWrite(#[from] serde_json::Error),
}

impl BoxError {
    pub(crate) fn geometry(message: impl Into<String>) -> Self {
        BoxError::InvalidGeometry {
            message: message.into(),
        }
    }
}
