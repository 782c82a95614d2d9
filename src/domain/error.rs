//! Typed pipeline errors

use std::path::PathBuf;
use thiserror::Error;

/// Every way a dataset build or store read can fail.
///
/// Each variant carries what is needed to diagnose the failure
/// without looking inside the pipeline: the offending path,
/// the column name, or the fraction values.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("input file not found: '{}'", path.display())]
    InputNotFound { path: PathBuf },

    #[error("cannot parse input table '{}': {reason}", path.display())]
    InputParse { path: PathBuf, reason: String },

    #[error("column '{column}' not found in input. Available columns: {available:?}")]
    Schema { column: String, available: Vec<String> },

    #[error(
        "invalid split fractions (test_fraction={test_fraction}, valid_fraction={valid_fraction}): {reason}"
    )]
    Config {
        test_fraction:  f64,
        valid_fraction: f64,
        reason:         String,
    },

    #[error("cannot write store at '{}': {reason}", path.display())]
    StoreWrite { path: PathBuf, reason: String },

    #[error("cannot read store at '{}': {reason}", path.display())]
    StoreRead { path: PathBuf, reason: String },
}

impl PipelineError {
    pub fn store_write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::StoreWrite { path: path.into(), reason: reason.to_string() }
    }

    pub fn store_read(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::StoreRead { path: path.into(), reason: reason.to_string() }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
