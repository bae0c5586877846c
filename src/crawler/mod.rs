//! Crawler module for listing harvests
//!
//! This module contains the core crawling logic, including:
//! - Scrolling result pages until every item is loaded
//! - Reading item summaries and detail pages
//! - Overall harvest coordination

mod coordinator;
mod detail;
mod parser;
mod scroll;

pub use coordinator::{extract_summary, CrawlReport, CrawlSettings, PageCrawler, SkippedItem};
pub use detail::{enrich_from_detail_page, extract_detail};
pub use parser::{
    collect_images, is_placeholder_image, parse_param_row, resolve_url, upgrade_image_url,
};
pub use scroll::scroll_to_exhaustion;

use crate::browser::{SnapshotBrowser, WebDriverBrowser};
use crate::config::{BrowserBackend, Config};
use crate::Result;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

/// Request timeout for pages fetched by the snapshot backend
const PAGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs a complete harvest with the configured browser backend
///
/// This is the main entry point for harvesting. It will:
/// 1. Start a browser session
/// 2. Load and scroll the result page
/// 3. Read every item and, when enabled, its detail page
/// 4. Close the session
///
/// # Arguments
///
/// * `config` - The harvest configuration
/// * `shutdown` - Flag that stops the harvest between items when set
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Records and skips; check `state` for interruption
/// * `Err(HarvestError)` - The session couldn't start or the page couldn't load
pub async fn harvest(config: &Config, shutdown: Arc<AtomicBool>) -> Result<CrawlReport> {
    let settings = CrawlSettings::from_config(&config.crawler)?;
    let user_agent = &config.user_agent.value;

    match config.browser.backend {
        BrowserBackend::WebDriver => {
            let browser = WebDriverBrowser::connect(&config.browser, user_agent).await?;
            PageCrawler::new(browser, settings)
                .with_shutdown(shutdown)
                .run()
                .await
        }
        BrowserBackend::Snapshot => {
            let browser = SnapshotBrowser::new(user_agent, PAGE_TIMEOUT)?;
            PageCrawler::new(browser, settings)
                .with_shutdown(shutdown)
                .run()
                .await
        }
    }
}
