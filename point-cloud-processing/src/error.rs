use std::path::PathBuf;
use thiserror::Error;

/// Result type for loading, configuration and pipeline operations
pub type Result<T> = std::result::Result<T, ProcessingError>;

/// Errors at the file and configuration edges of the pipeline.
/// The geometry functions themselves are total and never fail.
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("LAS error: {0}")]
    Las(#[from] las::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    #[error("No valid points found in {}", .0.display())]
    EmptyCloud(PathBuf),

    #[error("Invalid target percentage {0}, expected a value in (0, 100]")]
    InvalidPercentage(f64),

    #[error("Invalid decimal places {0}, expected at most {1}")]
    InvalidDecimalPlaces(usize, usize),
}
