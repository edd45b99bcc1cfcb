//! Error types for the qlog crate

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the qlog crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("column '{column}' not found in table '{}'", path.display())]
    MissingColumn { column: String, path: PathBuf },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("probability {value} must lie in (0, 1]")]
    InvalidProbability { value: f64 },

    #[error("failed to render chart '{}': {message}", path.display())]
    Plot { path: PathBuf, message: String },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap an I/O error with a description of what was being attempted.
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            operation: operation.into(),
            source,
        }
    }
}
