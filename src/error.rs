//! Error types for the analysis library.
//!
//! Sparse or malformed cells never surface here: those rows are dropped by
//! the cleaner. Only structural problems (wrong file, missing column,
//! unwritable output) are reported as errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Input file lacks a column the pipeline needs
    #[error("{source_name}: required column '{column}' not found in header")]
    MissingColumn {
        source_name: String,
        column: &'static str,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Output path rejected by the safety check
    #[error("Safety check failed: {reason} ({path})")]
    UnsafeOutput { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
