//! Error types for the template output writers.

use thiserror::Error;

/// Result type alias using WriterError.
pub type WriterResult<T> = Result<T, WriterError>;

/// Primary error type for writer operations.
#[derive(Debug, Error)]
pub enum WriterError {
    // === Sink Errors ===
    #[error("I/O error on output sink: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML stream error: {0}")]
    Xml(String),

    #[error("JSON encoding error: {0}")]
    Json(String),

    // === Reference System Errors ===
    #[error("Unable to resolve CRS identifier: {0}")]
    Crs(String),

    // === Setup Errors ===
    #[error("Output format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid writer configuration: {0}")]
    InvalidConfig(String),
}

impl WriterError {
    /// Whether this error belongs to the I/O category that terminates a response.
    ///
    /// CRS resolution failures are surfaced through the same category as sink
    /// failures, the caller cannot recover from either mid-stream.
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            WriterError::Io(_) | WriterError::Xml(_) | WriterError::Json(_) | WriterError::Crs(_)
        )
    }
}

impl From<quick_xml::Error> for WriterError {
    fn from(err: quick_xml::Error) -> Self {
        match err {
            quick_xml::Error::Io(io) => {
                WriterError::Io(std::io::Error::new(io.kind(), io.to_string()))
            }
            other => WriterError::Xml(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for WriterError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            return WriterError::Io(std::io::Error::new(std::io::ErrorKind::Other, err));
        }
        WriterError::Json(err.to_string())
    }
}
