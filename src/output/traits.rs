//! Output handler traits and types

use crate::storage::BookRecord;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize output: {0}")]
    Format(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for output handlers
///
/// An output handler receives the complete aggregate exactly once, after every
/// book has been processed. There are no partial writes during a run.
pub trait OutputHandler {
    /// Persists the fetched records, in order
    ///
    /// # Returns
    ///
    /// The path the aggregate was written to
    fn write_books(&self, records: &[BookRecord]) -> OutputResult<PathBuf>;
}
