//! Detail-page enrichment
//!
//! Each listing's own page is opened in a new tab so the result list stays
//! loaded in the first one. The tab is closed afterwards and the first tab
//! re-selected whether or not extraction succeeded, including when switching
//! to the new tab failed.

use crate::browser::{Browser, PageElement, WindowHandle};
use crate::crawler::parser::{
    collect_images, parse_param_row, resolve_url, DESCRIPTION_SELECTOR, FALLBACK_IMAGE_SELECTOR,
    GALLERY_SELECTOR, PARAMS_SELECTOR,
};
use crate::listing::DetailPage;
use crate::{BrowserError, BrowserResult};
use std::time::Duration;
use url::Url;

/// Opens `url` in a new tab, extracts its details and returns to the first tab
///
/// # Arguments
///
/// * `browser` - Session whose first tab holds the result list
/// * `url` - Absolute URL of the detail page
/// * `settle` - Wait after switching to the new tab
/// * `max_images` - Cap on gallery images kept
///
/// # Returns
///
/// * `Ok(DetailPage)` - Whatever the page offered; missing parts are empty
/// * `Err(BrowserError)` - The tab couldn't be opened or read
pub async fn enrich_from_detail_page<B: Browser>(
    browser: &mut B,
    url: &str,
    settle: Duration,
    max_images: usize,
) -> BrowserResult<DetailPage> {
    let base = Url::parse(url).ok();

    browser.open_tab(url).await?;
    let handles = browser.window_handles().await?;
    let (first, newest) = match (handles.first(), handles.last()) {
        (Some(first), Some(newest)) if handles.len() > 1 => (first.clone(), newest.clone()),
        _ => return Err(BrowserError::NoWindow),
    };

    let extracted = match browser.switch_to_window(&newest).await {
        Ok(()) => {
            tokio::time::sleep(settle).await;
            let extracted = extract_detail(browser, base.as_ref(), max_images).await;
            if let Err(e) = browser.close_window().await {
                tracing::warn!("Failed to close detail tab for {}: {}", url, e);
            }
            extracted
        }
        Err(e) => {
            close_orphaned_tab(browser, &newest, url).await;
            Err(e)
        }
    };

    return_to_first_tab(browser, &first).await;
    extracted
}

/// Closes a detail tab the session failed to switch to, if it is still open
async fn close_orphaned_tab<B: Browser>(browser: &mut B, tab: &WindowHandle, url: &str) {
    match browser.window_handles().await {
        Ok(handles) if handles.contains(tab) => {}
        Ok(_) => return,
        Err(e) => {
            tracing::warn!("Failed to list tabs after error on {}: {}", url, e);
            return;
        }
    }

    if let Err(e) = browser.switch_to_window(tab).await {
        tracing::warn!("Detail tab for {} left open: {}", url, e);
        return;
    }
    if let Err(e) = browser.close_window().await {
        tracing::warn!("Failed to close detail tab for {}: {}", url, e);
    }
}

/// Re-selects the result-list tab, retrying once
async fn return_to_first_tab<B: Browser>(browser: &mut B, first: &WindowHandle) {
    if let Err(e) = browser.switch_to_window(first).await {
        tracing::warn!("Failed to return to the listing tab, retrying: {}", e);
        if let Err(e) = browser.switch_to_window(first).await {
            tracing::error!("Listing tab unreachable: {}", e);
        }
    }
}

/// Maps "no such element" to `None`, keeping other failures
fn optional<T>(result: BrowserResult<T>) -> BrowserResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(BrowserError::NoSuchElement(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Reads the `src` of every element matching `selector`
async fn image_sources<B: Browser>(
    browser: &mut B,
    selector: &str,
    base: Option<&Url>,
) -> BrowserResult<Vec<String>> {
    let mut sources = Vec::new();
    for element in browser.find_elements(selector).await? {
        if let Some(src) = element.attr("src").await? {
            let src = match base {
                Some(base) => resolve_url(base, &src).unwrap_or(src),
                None => src,
            };
            sources.push(src);
        }
    }
    Ok(sources)
}

/// Extracts gallery, description and parameter table from the current tab
pub async fn extract_detail<B: Browser>(
    browser: &mut B,
    base: Option<&Url>,
    max_images: usize,
) -> BrowserResult<DetailPage> {
    let mut page = DetailPage::default();

    page.images = collect_images(image_sources(browser, GALLERY_SELECTOR, base).await?, max_images);
    if page.images.is_empty() {
        tracing::debug!("Gallery empty, trying the main image");
        page.images = collect_images(
            image_sources(browser, FALLBACK_IMAGE_SELECTOR, base).await?,
            max_images,
        );
    }

    if let Some(element) = optional(browser.find_element(DESCRIPTION_SELECTOR).await)? {
        let text = element.text().await?;
        let text = text.trim();
        if !text.is_empty() {
            page.description = Some(text.to_string());
        }
    }

    for row in browser.find_elements(PARAMS_SELECTOR).await? {
        if let Some((field, value)) = parse_param_row(&row.text().await?) {
            tracing::debug!("Parameter {}: {}", field, value);
            page.attributes.set(field, value);
        }
    }

    Ok(page)
}
