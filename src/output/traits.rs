//! Output traits and shared types

use crate::listing::ListingRecord;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing the catalog
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize records: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// What a writer did with a batch of records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    /// Files created or replaced
    pub written: usize,

    /// Files left alone because they already existed
    pub skipped: usize,
}

/// A destination for harvested records
///
/// Writers are independent of each other; a run may use several.
pub trait CatalogWriter {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Writes all records
    fn write(&self, records: &[ListingRecord]) -> OutputResult<WriteSummary>;
}

/// Maps an IO error to an `OutputError` carrying the path involved
pub(crate) fn io_error(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> OutputError {
    let path = path.into();
    move |source| OutputError::Io { path, source }
}
