//! State module for tracking crawl progress
//!
//! - `CrawlState`: where a single listing crawl currently is, and which moves are legal

mod crawl_state;

pub use crawl_state::CrawlState;
