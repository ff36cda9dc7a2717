//! Error types for the Medallion library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Medallion operations.
///
/// Only structural failures are represented here. Data-content anomalies
/// (unrecognized categorical values, non-numeric text, duplicate keys)
/// degrade to nulls or are counted in reports and never become errors.
#[derive(Debug, Error)]
pub enum MedallionError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or input with no usable schema.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Lookup source contained no recognizable block header.
    #[error("Lookup format error: {0}")]
    LookupFormat(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error writing a pipeline artifact.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

/// Result type alias for Medallion operations.
pub type Result<T> = std::result::Result<T, MedallionError>;
