//! Anomaly detection error types.

use thiserror::Error;

/// Anomaly detection errors.
#[derive(Debug, Error)]
pub enum AnomalyError {
    #[error("Insufficient data: required {required}, got {got}")]
    InsufficientData { required: usize, got: usize },

    #[error("Strategy not fitted: call fit() before detect()")]
    NotFitted,

    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Detection error: {0}")]
    DetectionError(String),

    #[error("Column not found: '{0}'")]
    ColumnNotFound(String),

    #[error("Column '{0}' is not numeric")]
    NonNumericColumn(String),

    #[error("Column '{column}' has {got} rows, table has {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        got: usize,
    },

    #[error("Duplicate column: '{0}'")]
    DuplicateColumn(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("CSV error: {0}")]
    Csv(String),

    /// A strategy failed while processing a column.
    #[error("{strategy} failed on column '{column}': {source}")]
    Strategy {
        column: String,
        strategy: String,
        #[source]
        source: Box<AnomalyError>,
    },
}

impl AnomalyError {
    /// Build an `InvalidParameter` error.
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Attach column and strategy context to an error.
    pub fn in_strategy(self, column: impl Into<String>, strategy: impl Into<String>) -> Self {
        Self::Strategy {
            column: column.into(),
            strategy: strategy.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with any strategy context stripped.
    pub fn root(&self) -> &AnomalyError {
        match self {
            Self::Strategy { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<std::io::Error> for AnomalyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type for anomaly detection operations.
pub type Result<T> = std::result::Result<T, AnomalyError>;
