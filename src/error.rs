use thiserror::Error;

/// Convenience result type for read, write and listing operations.
pub type DataIoResult<T> = Result<T, DataIoError>;

/// Error returned by a user-supplied transform, reviver or row callback.
///
/// It is carried inside [`DataIoError::Transform`] without modification, so callers can
/// downcast it back to their own error type.
pub type TransformError = Box<dyn std::error::Error + Send + Sync>;

/// Error type returned by every fallible function in this crate.
#[derive(Debug, Error)]
pub enum DataIoError {
    /// Underlying I/O error (e.g. file not found, permission denied, directory creation failed).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited-text (CSV/TSV/PSV/custom delimiter) read or write error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed JSON. The message carries the line and column reported by `serde_json`.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed YAML. The message carries the location reported by `serde_yaml`.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Malformed filter spec, matcher, parser override or transform/parser pairing.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// A formatter was handed a value its format cannot express.
    #[error("cannot format value: {message}")]
    UnsupportedValue { message: String },

    /// A user-supplied transform failed.
    #[error("transform failed: {0}")]
    Transform(#[source] TransformError),
}

impl DataIoError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
