//! Listing data model
//!
//! This module holds the canonical vehicle record and the structures that feed it:
//! - `ListingRecord`: one normalized listing, with every default applied in one factory
//! - `DetailPage`: what enrichment read from a listing's own page
//! - `BrandRegistry`: the brand → models catalogue shared with the chat front-end

mod brands;
mod detail;
mod record;

pub use brands::BrandRegistry;
pub use detail::{DetailAttributes, DetailField, DetailPage};
pub use record::{normalize_year, ListingRecord, MIN_YEAR};
