//! Output module for publishing harvested records
//!
//! This module handles:
//! - Generating Hugo content pages, one per vehicle
//! - Dumping all records as JSON for analysis

mod hugo;
mod json;
mod traits;

pub use hugo::{
    content_filename, format_price, render_markdown, write_catalog, HugoWriter, PLACEHOLDER_IMAGE,
};
pub use json::{write_json, JsonWriter};
pub use traits::{CatalogWriter, OutputError, OutputResult, WriteSummary};
