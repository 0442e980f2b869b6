use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Unsupported join type: {0}")]
    UnsupportedType(String),

    #[error("Missing resource: {0}")]
    MissingResource(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Invalid value in column '{column}' at row {row}: {reason}")]
    InvalidValue {
        column: String,
        row: usize,
        reason: String,
    },

    #[error("Invalid dimension for '{column}': expected {expected}, got {actual}")]
    DimensionMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Worker pool error: {0}")]
    WorkerPool(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for a value that could not be coerced for matching
    pub fn invalid_value(column: &str, row: usize, reason: impl Into<String>) -> Self {
        Error::InvalidValue {
            column: column.to_string(),
            row,
            reason: reason.into(),
        }
    }
}
