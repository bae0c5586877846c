//! JSON dump of harvested records, for analysis and debugging

use crate::listing::ListingRecord;
use crate::output::traits::{io_error, CatalogWriter, OutputResult, WriteSummary};
use std::fs;
use std::path::{Path, PathBuf};

/// Writes every record into one pretty-printed JSON array
///
/// The file is replaced on every run. Parent directories are created.
pub fn write_json(records: &[ListingRecord], path: &Path) -> OutputResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error(parent))?;
    }

    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json).map_err(io_error(path))?;

    tracing::info!("Saved {} records to {}", records.len(), path.display());
    Ok(())
}

/// [`CatalogWriter`] around [`write_json`]
#[derive(Debug, Clone)]
pub struct JsonWriter {
    path: PathBuf,
}

impl JsonWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogWriter for JsonWriter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn write(&self, records: &[ListingRecord]) -> OutputResult<WriteSummary> {
        write_json(records, &self.path)?;
        Ok(WriteSummary {
            written: 1,
            skipped: 0,
        })
    }
}
