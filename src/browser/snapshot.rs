//! Static HTML backend
//!
//! Fetches documents with reqwest and answers selector queries with scraper.
//! No JavaScript runs: the scroll-height script reports the document length,
//! which never changes, so scrolling ends after one round. Elements are owned
//! snapshots of the matched markup and stay valid after the tab is closed.

use crate::browser::{Browser, PageElement, WindowHandle, SCROLL_HEIGHT_SCRIPT};
use crate::{BrowserError, BrowserResult};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

struct Tab {
    handle: WindowHandle,
    html: String,
}

/// A browser over static HTML
pub struct SnapshotBrowser {
    client: Client,
    tabs: Vec<Tab>,
    current: Option<usize>,
    next_id: usize,
    preloaded: HashMap<String, String>,
}

/// A matched element, detached from its document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotElement {
    html: String,
    text: String,
    attrs: BTreeMap<String, String>,
}

impl SnapshotBrowser {
    /// Creates a browser with one empty tab
    ///
    /// # Arguments
    ///
    /// * `user_agent` - User agent sent with every page request
    /// * `timeout` - Per-request timeout
    pub fn new(user_agent: &str, timeout: Duration) -> BrowserResult<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| BrowserError::Session(e.to_string()))?;

        let mut browser = Self {
            client,
            tabs: Vec::new(),
            current: None,
            next_id: 0,
            preloaded: HashMap::new(),
        };
        browser.push_tab(String::new());
        browser.current = Some(0);
        Ok(browser)
    }

    /// Serves `html` for `url` instead of fetching it, e.g. a page saved to disk
    pub fn preload(&mut self, url: impl Into<String>, html: impl Into<String>) {
        self.preloaded.insert(url.into(), html.into());
    }

    fn push_tab(&mut self, html: String) -> usize {
        let handle = WindowHandle::new(format!("snapshot-{}", self.next_id));
        self.next_id += 1;
        self.tabs.push(Tab { handle, html });
        self.tabs.len() - 1
    }

    fn current_tab(&self) -> BrowserResult<&Tab> {
        self.current
            .and_then(|i| self.tabs.get(i))
            .ok_or(BrowserError::NoWindow)
    }

    async fn load(&self, url: &str) -> BrowserResult<String> {
        if let Some(html) = self.preloaded.get(url) {
            return Ok(html.clone());
        }

        tracing::debug!("Fetching snapshot of {}", url);
        let http_error = |source| BrowserError::Http {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(http_error)?;

        response.text().await.map_err(http_error)
    }
}

/// Parses a selector, reporting invalid ones as errors rather than panicking
fn parse_selector(selector: &str) -> BrowserResult<Selector> {
    Selector::parse(selector).map_err(|e| BrowserError::Selector(format!("{}: {}", selector, e)))
}

fn snapshot(element: ElementRef<'_>) -> SnapshotElement {
    let text = element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let attrs = element
        .value()
        .attrs()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();

    SnapshotElement {
        html: element.html(),
        text,
        attrs,
    }
}

/// Selects from a whole document
fn select_document(html: &str, selector: &str) -> BrowserResult<Vec<SnapshotElement>> {
    let selector = parse_selector(selector)?;
    let document = Html::parse_document(html);
    Ok(document.select(&selector).map(snapshot).collect())
}

/// Selects descendants of a snapshotted element
fn select_descendants(html: &str, selector: &str) -> BrowserResult<Vec<SnapshotElement>> {
    let selector = parse_selector(selector)?;
    let fragment = Html::parse_fragment(html);

    // The fragment's first element is the snapshotted element itself
    let root = fragment
        .root_element()
        .children()
        .find_map(ElementRef::wrap);

    Ok(match root {
        Some(root) => root.select(&selector).map(snapshot).collect(),
        None => Vec::new(),
    })
}

fn first_or_missing(
    mut elements: Vec<SnapshotElement>,
    selector: &str,
) -> BrowserResult<SnapshotElement> {
    if elements.is_empty() {
        Err(BrowserError::NoSuchElement(selector.to_string()))
    } else {
        Ok(elements.swap_remove(0))
    }
}

#[async_trait]
impl PageElement for SnapshotElement {
    async fn text(&self) -> BrowserResult<String> {
        Ok(self.text.clone())
    }

    async fn attr(&self, name: &str) -> BrowserResult<Option<String>> {
        Ok(self.attrs.get(name).cloned())
    }

    async fn find_element(&self, selector: &str) -> BrowserResult<Self> {
        first_or_missing(select_descendants(&self.html, selector)?, selector)
    }

    async fn find_elements(&self, selector: &str) -> BrowserResult<Vec<Self>> {
        select_descendants(&self.html, selector)
    }
}

#[async_trait]
impl Browser for SnapshotBrowser {
    type Element = SnapshotElement;

    async fn navigate(&mut self, url: &str) -> BrowserResult<()> {
        let index = self.current.ok_or(BrowserError::NoWindow)?;
        let html = self.load(url).await?;
        if let Some(tab) = self.tabs.get_mut(index) {
            tab.html = html;
        }
        Ok(())
    }

    async fn execute_script(&mut self, script: &str, _args: Vec<Value>) -> BrowserResult<Value> {
        let tab = self.current_tab()?;
        if script.trim() == SCROLL_HEIGHT_SCRIPT {
            return Ok(Value::from(tab.html.len()));
        }
        Ok(Value::Null)
    }

    async fn find_element(&mut self, selector: &str) -> BrowserResult<Self::Element> {
        let tab = self.current_tab()?;
        first_or_missing(select_document(&tab.html, selector)?, selector)
    }

    async fn find_elements(&mut self, selector: &str) -> BrowserResult<Vec<Self::Element>> {
        let tab = self.current_tab()?;
        select_document(&tab.html, selector)
    }

    async fn open_tab(&mut self, url: &str) -> BrowserResult<()> {
        let html = self.load(url).await?;
        self.push_tab(html);
        Ok(())
    }

    async fn window_handles(&mut self) -> BrowserResult<Vec<WindowHandle>> {
        Ok(self.tabs.iter().map(|tab| tab.handle.clone()).collect())
    }

    async fn switch_to_window(&mut self, handle: &WindowHandle) -> BrowserResult<()> {
        let index = self
            .tabs
            .iter()
            .position(|tab| &tab.handle == handle)
            .ok_or(BrowserError::NoWindow)?;
        self.current = Some(index);
        Ok(())
    }

    async fn close_window(&mut self) -> BrowserResult<()> {
        let index = self.current.take().ok_or(BrowserError::NoWindow)?;
        if index < self.tabs.len() {
            self.tabs.remove(index);
        }
        Ok(())
    }

    async fn quit(&mut self) -> BrowserResult<()> {
        self.tabs.clear();
        self.current = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <html><body>
          <div itemtype="http://schema.org/Product">
            <a itemprop="url" href="/moskva/avtomobili/bmw_1"><h3 itemprop="name">BMW X5 3.0 AT, 2019</h3></a>
            <meta itemprop="price" content="5200000">
          </div>
          <div itemtype="http://schema.org/Product">
            <span data-marker="item-price">  1 250 000   ₽ </span>
          </div>
        </body></html>
    "#;

    fn browser_with(url: &str, html: &str) -> SnapshotBrowser {
        let mut browser = SnapshotBrowser::new("TestAgent/1.0", Duration::from_secs(5)).unwrap();
        browser.preload(url, html);
        browser
    }

    #[tokio::test]
    async fn test_find_elements_and_descendants() {
        let mut browser = browser_with("https://example.com/list", LISTING);
        browser.navigate("https://example.com/list").await.unwrap();

        let items = browser
            .find_elements(r#"[itemtype="http://schema.org/Product"]"#)
            .await
            .unwrap();
        assert_eq!(items.len(), 2);

        let title = items[0].find_element(r#"[itemprop="name"]"#).await.unwrap();
        assert_eq!(title.text().await.unwrap(), "BMW X5 3.0 AT, 2019");

        let link = items[0].find_element(r#"[itemprop="url"]"#).await.unwrap();
        assert_eq!(
            link.attr("href").await.unwrap().as_deref(),
            Some("/moskva/avtomobili/bmw_1")
        );

        let price = items[0].find_element(r#"[itemprop="price"]"#).await.unwrap();
        assert_eq!(price.attr("content").await.unwrap().as_deref(), Some("5200000"));
    }

    #[tokio::test]
    async fn test_missing_descendant_is_no_such_element() {
        let mut browser = browser_with("https://example.com/list", LISTING);
        browser.navigate("https://example.com/list").await.unwrap();

        let items = browser
            .find_elements(r#"[itemtype="http://schema.org/Product"]"#)
            .await
            .unwrap();
        let err = items[1].find_element(r#"[itemprop="name"]"#).await.unwrap_err();
        assert!(matches!(err, BrowserError::NoSuchElement(_)));

        let price = items[1]
            .find_element(r#"[data-marker="item-price"]"#)
            .await
            .unwrap();
        assert_eq!(price.text().await.unwrap(), "1 250 000 ₽");
    }

    #[tokio::test]
    async fn test_invalid_selector_is_error() {
        let mut browser = browser_with("https://example.com/list", LISTING);
        browser.navigate("https://example.com/list").await.unwrap();

        let err = browser.find_elements("[[[").await.unwrap_err();
        assert!(matches!(err, BrowserError::Selector(_)));
    }

    #[tokio::test]
    async fn test_scroll_height_is_stable() {
        let mut browser = browser_with("https://example.com/list", LISTING);
        browser.navigate("https://example.com/list").await.unwrap();

        let first = browser
            .execute_script(SCROLL_HEIGHT_SCRIPT, vec![])
            .await
            .unwrap();
        let second = browser
            .execute_script(SCROLL_HEIGHT_SCRIPT, vec![])
            .await
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(first, Value::from(LISTING.len()));
    }

    #[tokio::test]
    async fn test_tabs() {
        let mut browser = browser_with("https://example.com/list", LISTING);
        browser.preload("https://example.com/item", "<p class=\"d\">detail</p>");
        browser.navigate("https://example.com/list").await.unwrap();

        browser.open_tab("https://example.com/item").await.unwrap();
        let handles = browser.window_handles().await.unwrap();
        assert_eq!(handles.len(), 2);

        browser.switch_to_window(&handles[1]).await.unwrap();
        let detail = browser.find_element("p.d").await.unwrap();
        assert_eq!(detail.text().await.unwrap(), "detail");

        browser.close_window().await.unwrap();
        assert!(matches!(
            browser.find_element("p").await,
            Err(BrowserError::NoWindow)
        ));

        browser.switch_to_window(&handles[0]).await.unwrap();
        assert_eq!(browser.window_handles().await.unwrap().len(), 1);
        assert_eq!(
            browser
                .find_elements(r#"[itemtype="http://schema.org/Product"]"#)
                .await
                .unwrap()
                .len(),
            2
        );

        // Snapshots outlive their tab
        assert_eq!(detail.text().await.unwrap(), "detail");
    }

    #[tokio::test]
    async fn test_switch_to_unknown_window() {
        let mut browser = browser_with("https://example.com/list", LISTING);
        let err = browser
            .switch_to_window(&WindowHandle::new("nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, BrowserError::NoWindow));
    }

    #[tokio::test]
    async fn test_quit_is_idempotent() {
        let mut browser = browser_with("https://example.com/list", LISTING);
        browser.quit().await.unwrap();
        browser.quit().await.unwrap();
        assert!(browser.window_handles().await.unwrap().is_empty());
    }
}
