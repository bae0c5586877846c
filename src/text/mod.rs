//! Text normalization for listing data
//!
//! This module turns raw strings scraped from listing pages into typed values:
//! - Prices and mileage phrases into integers
//! - Listing titles into brand / model / year
//! - Arbitrary text into ASCII slugs for file names
//!
//! Nothing here touches the DOM or the network, and no function fails:
//! unparsable input maps to a documented default.

mod numbers;
mod slug;
mod title;

pub use numbers::{parse_mileage, parse_price};
pub use slug::slugify;
pub use title::{parse_title, ParsedTitle};

/// Brand used when a title cannot be segmented
pub const UNDETERMINED_BRAND: &str = "Не определен";

/// Model used when no model tokens survive filtering
pub const UNDETERMINED_MODEL: &str = "Не определена";

/// Year used when a title carries no plausible year
pub const DEFAULT_YEAR: i32 = 2020;
