//! Crawler coordinator - listing harvest orchestration
//!
//! This module drives one harvest of a result page:
//! - loading the page and scrolling until no more items appear
//! - reading every item's summary into a record, skipping broken items
//! - optionally visiting each record's detail page to enrich it
//! - honouring an interrupt flag between items
//! - releasing the browser session on every exit path

use crate::browser::{Browser, PageElement};
use crate::config::CrawlerConfig;
use crate::crawler::detail::enrich_from_detail_page;
use crate::crawler::parser::{
    resolve_url, ITEM_SELECTOR, PRICE_SELECTOR, PRICE_TEXT_SELECTOR, TITLE_SELECTOR, URL_SELECTOR,
};
use crate::crawler::scroll::scroll_to_exhaustion;
use crate::listing::ListingRecord;
use crate::state::CrawlState;
use crate::text::parse_price;
use crate::{BrowserError, HarvestError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Timing and scope of one harvest
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    pub listing_url: Url,
    pub enrich: bool,
    pub max_images: usize,
    pub initial_settle: Duration,
    pub scroll_settle: Duration,
    pub detail_settle: Duration,
    pub max_scroll_rounds: u32,
}

impl CrawlSettings {
    /// Builds settings from the `[crawler]` section
    pub fn from_config(config: &CrawlerConfig) -> Result<Self> {
        Ok(Self {
            listing_url: Url::parse(&config.listing_url)?,
            enrich: config.enrich,
            max_images: config.max_images,
            initial_settle: Duration::from_millis(config.initial_settle_ms),
            scroll_settle: Duration::from_millis(config.scroll_settle_ms),
            detail_settle: Duration::from_millis(config.detail_settle_ms),
            max_scroll_rounds: config.max_scroll_rounds,
        })
    }
}

/// An item that produced no record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    /// Position of the item on the result page
    pub index: usize,
    pub reason: String,
}

/// Outcome of a harvest
#[derive(Debug)]
pub struct CrawlReport {
    /// Records in result-page order
    pub records: Vec<ListingRecord>,
    pub skipped: Vec<SkippedItem>,
    /// Number of records whose detail page was read
    pub enriched: usize,
    /// `Done`, or `Aborted` when the run was interrupted
    pub state: CrawlState,
}

impl CrawlReport {
    pub fn is_complete(&self) -> bool {
        self.state == CrawlState::Done
    }
}

/// Harvests one result page through a browser session
pub struct PageCrawler<B: Browser> {
    browser: B,
    settings: CrawlSettings,
    state: CrawlState,
    shutdown: Arc<AtomicBool>,
}

impl<B: Browser> PageCrawler<B> {
    /// Creates a crawler that owns `browser` until the run ends
    pub fn new(browser: B, settings: CrawlSettings) -> Self {
        Self {
            browser,
            settings,
            state: CrawlState::Idle,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Uses an externally controlled interrupt flag
    ///
    /// The flag is checked between items; once set, the run stops as
    /// `Aborted` and returns the records built so far.
    pub fn with_shutdown(mut self, shutdown: Arc<AtomicBool>) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// Runs the harvest and releases the browser session
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - Completed or interrupted run with its records
    /// * `Err(HarvestError)` - The result page couldn't be loaded or queried
    pub async fn run(mut self) -> Result<CrawlReport> {
        let outcome = self.crawl().await;

        if outcome.is_err() && !self.state.is_terminal() {
            self.state = CrawlState::Aborted;
        }

        if let Err(e) = self.browser.quit().await {
            tracing::warn!("Failed to close browser session: {}", e);
        }

        outcome
    }

    fn transition(&mut self, next: CrawlState) -> Result<()> {
        if !self.state.can_transition_to(&next) {
            return Err(HarvestError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::trace!("Crawl state {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    fn interrupted(&mut self, report: CrawlReport) -> Result<CrawlReport> {
        tracing::warn!(
            "Interrupted, keeping {} records collected so far",
            report.records.len()
        );
        self.transition(CrawlState::Aborted)?;
        Ok(CrawlReport {
            state: self.state,
            ..report
        })
    }

    async fn crawl(&mut self) -> Result<CrawlReport> {
        let listing_url = self.settings.listing_url.clone();

        tracing::info!("Loading result page {}", listing_url);
        if let Err(source) = self.browser.navigate(listing_url.as_str()).await {
            self.transition(CrawlState::Aborted)?;
            return Err(HarvestError::Navigation {
                url: listing_url.to_string(),
                source,
            });
        }
        self.transition(CrawlState::Loaded)?;
        tokio::time::sleep(self.settings.initial_settle).await;

        let mut report = CrawlReport {
            records: Vec::new(),
            skipped: Vec::new(),
            enriched: 0,
            state: self.state,
        };

        if self.shutdown_requested() {
            return self.interrupted(report);
        }

        match scroll_to_exhaustion(
            &mut self.browser,
            self.settings.scroll_settle,
            self.settings.max_scroll_rounds,
            &self.shutdown,
        )
        .await
        {
            Ok(rounds) => tracing::info!("All items loaded after {} scroll rounds", rounds),
            Err(e) => tracing::warn!("Scrolling failed, continuing with loaded items: {}", e),
        }

        if self.shutdown_requested() {
            return self.interrupted(report);
        }
        self.transition(CrawlState::ScrollExhausted)?;

        let items = match self.browser.find_elements(ITEM_SELECTOR).await {
            Ok(items) => items,
            Err(e) => {
                self.transition(CrawlState::Aborted)?;
                return Err(HarvestError::Browser(e));
            }
        };
        tracing::info!("Found {} items on the result page", items.len());

        for (index, item) in items.iter().enumerate() {
            if self.shutdown_requested() {
                return self.interrupted(report);
            }
            self.transition(CrawlState::Extracting(index))?;

            match extract_summary(item, &listing_url).await {
                Ok(record) => {
                    tracing::info!("[{}/{}] {}", index + 1, items.len(), record.summary_line());
                    report.records.push(record);
                }
                Err(e) => {
                    tracing::warn!("Skipping item {}: {}", index + 1, e);
                    report.skipped.push(SkippedItem {
                        index,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if self.settings.enrich {
            let total = report.records.len();
            for index in 0..total {
                if self.shutdown_requested() {
                    return self.interrupted(report);
                }
                self.transition(CrawlState::Enriching(index))?;

                let url = report.records[index].source_url.clone();
                tracing::info!("[{}/{}] Reading detail page {}", index + 1, total, url);

                match enrich_from_detail_page(
                    &mut self.browser,
                    &url,
                    self.settings.detail_settle,
                    self.settings.max_images,
                )
                .await
                {
                    Ok(page) => {
                        let record = &mut report.records[index];
                        record.apply_details(&page);
                        record.set_images(page.images);
                        report.enriched += 1;
                    }
                    Err(e) => tracing::warn!("Detail page {} unreadable: {}", url, e),
                }
            }
        }

        self.transition(CrawlState::Done)?;
        report.state = self.state;
        Ok(report)
    }
}

/// Reads a result-page item into a record
///
/// Title and link are required. The price comes from the machine-readable
/// attribute, then the displayed text, and is 0 when neither is present.
pub async fn extract_summary<E: PageElement>(item: &E, base: &Url) -> Result<ListingRecord> {
    let title = item.find_element(TITLE_SELECTOR).await?.text().await?;
    let title = title.trim();
    if title.is_empty() {
        return Err(HarvestError::MissingField { field: "title" });
    }

    let href = item
        .find_element(URL_SELECTOR)
        .await?
        .attr("href")
        .await?
        .unwrap_or_default();
    let source_url =
        resolve_url(base, &href).ok_or(HarvestError::MissingField { field: "url" })?;

    let price = extract_price(item).await;

    Ok(ListingRecord::from_title(title, price, &source_url))
}

async fn extract_price<E: PageElement>(item: &E) -> u64 {
    if let Ok(element) = item.find_element(PRICE_SELECTOR).await {
        if let Ok(Some(content)) = element.attr("content").await {
            let price = parse_price(&content);
            if price > 0 {
                return price;
            }
        }
    }

    match item.find_element(PRICE_TEXT_SELECTOR).await {
        Ok(element) => element
            .text()
            .await
            .map(|text| parse_price(&text))
            .unwrap_or(0),
        Err(BrowserError::NoSuchElement(_)) => 0,
        Err(e) => {
            tracing::debug!("Price lookup failed: {}", e);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::flaky::FlakyBrowser;
    use crate::browser::SnapshotBrowser;

    const LIST_URL: &str = "https://www.avito.ru/moskva/avtomobili";

    const LISTING: &str = r#"
        <html><body>
          <div itemtype="http://schema.org/Product">
            <a itemprop="url" href="/moskva/avtomobili/bmw_x5_1"><h3 itemprop="name">BMW X5 3.0 AT, 2019</h3></a>
            <meta itemprop="price" content="5200000">
          </div>
          <div itemtype="http://schema.org/Product">
            <a itemprop="url" href="/moskva/avtomobili/lada_2"></a>
            <span data-marker="item-price">650 000 ₽</span>
          </div>
          <div itemtype="http://schema.org/Product">
            <a itemprop="url" href="http://127.0.0.1:9/moskva/avtomobili/kia_rio_3"><h3 itemprop="name">Kia Rio 1.6 MT, 2012, 180 000 км</h3></a>
            <span data-marker="item-price">650 000 ₽</span>
          </div>
        </body></html>
    "#;

    const DETAIL: &str = r#"
        <html><body>
          <div data-marker="image-preview/item"><img src="https://img.example/x5?cqp=1"></div>
          <ul data-marker="item-view/item-params"><li>Цвет: чёрный</li></ul>
        </body></html>
    "#;

    fn settings(enrich: bool) -> CrawlSettings {
        CrawlSettings {
            listing_url: Url::parse(LIST_URL).unwrap(),
            enrich,
            max_images: 10,
            initial_settle: Duration::ZERO,
            scroll_settle: Duration::ZERO,
            detail_settle: Duration::ZERO,
            max_scroll_rounds: 5,
        }
    }

    fn browser() -> SnapshotBrowser {
        let mut browser =
            SnapshotBrowser::new("TestAgent/1.0", Duration::from_secs(5)).unwrap();
        browser.preload(LIST_URL, LISTING);
        browser.preload("https://www.avito.ru/moskva/avtomobili/bmw_x5_1", DETAIL);
        browser
    }

    #[tokio::test]
    async fn test_run_skips_broken_item() {
        let report = PageCrawler::new(browser(), settings(false)).run().await.unwrap();

        assert_eq!(report.state, CrawlState::Done);
        assert!(report.is_complete());
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].index, 1);

        let bmw = &report.records[0];
        assert_eq!(bmw.brand, "BMW");
        assert_eq!(bmw.price, 5_200_000);
        assert_eq!(bmw.source_url, "https://www.avito.ru/moskva/avtomobili/bmw_x5_1");

        let kia = &report.records[1];
        assert_eq!(kia.brand, "Kia");
        assert_eq!(kia.price, 650_000);
        assert_eq!(kia.mileage, Some(180_000));
    }

    #[tokio::test]
    async fn test_run_enriches_records() {
        let report = PageCrawler::new(browser(), settings(true)).run().await.unwrap();

        assert_eq!(report.state, CrawlState::Done);
        // The Kia detail page points at a closed port
        assert_eq!(report.enriched, 1);

        let bmw = &report.records[0];
        assert_eq!(bmw.color, "чёрный");
        assert_eq!(bmw.images, vec!["https://img.example/x5?size=1200x900"]);

        let kia = &report.records[1];
        assert_eq!(kia.color, "Не указан");
        assert!(kia.images.is_empty());
    }

    #[tokio::test]
    async fn test_run_interrupted_before_first_item() {
        let shutdown = Arc::new(AtomicBool::new(true));
        let report = PageCrawler::new(browser(), settings(true))
            .with_shutdown(shutdown)
            .run()
            .await
            .unwrap();

        assert_eq!(report.state, CrawlState::Aborted);
        assert!(!report.is_complete());
        assert!(report.records.is_empty());
    }

    #[tokio::test]
    async fn test_run_interrupted_while_loading() {
        let shutdown = Arc::new(AtomicBool::new(false));
        let mut browser = FlakyBrowser::new(browser());
        browser.interrupt_on_navigate = Some(Arc::clone(&shutdown));

        let report = PageCrawler::new(browser, settings(true))
            .with_shutdown(shutdown)
            .run()
            .await
            .unwrap();

        assert_eq!(report.state, CrawlState::Aborted);
        assert!(report.records.is_empty());
        assert!(report.skipped.is_empty());
        assert_eq!(report.enriched, 0);
    }

    #[tokio::test]
    async fn test_run_navigation_failure() {
        let browser = SnapshotBrowser::new("TestAgent/1.0", Duration::from_secs(1)).unwrap();
        let mut settings = settings(false);
        settings.listing_url = Url::parse("http://127.0.0.1:9/listing").unwrap();

        let result = PageCrawler::new(browser, settings).run().await;
        assert!(matches!(result, Err(HarvestError::Navigation { .. })));
    }

    #[tokio::test]
    async fn test_empty_result_page() {
        let mut browser =
            SnapshotBrowser::new("TestAgent/1.0", Duration::from_secs(5)).unwrap();
        browser.preload(LIST_URL, "<html><body><p>Ничего не найдено</p></body></html>");

        let report = PageCrawler::new(browser, settings(true)).run().await.unwrap();
        assert_eq!(report.state, CrawlState::Done);
        assert!(report.records.is_empty());
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_settings_from_config() {
        let config = CrawlerConfig {
            listing_url: LIST_URL.to_string(),
            enrich: true,
            max_images: 7,
            initial_settle_ms: 5000,
            scroll_settle_ms: 3000,
            detail_settle_ms: 2500,
            max_scroll_rounds: 9,
        };
        let settings = CrawlSettings::from_config(&config).unwrap();
        assert_eq!(settings.listing_url.as_str(), LIST_URL);
        assert_eq!(settings.detail_settle, Duration::from_millis(2500));
        assert_eq!(settings.max_scroll_rounds, 9);
    }
}
