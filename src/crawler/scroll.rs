//! Scroll-to-exhaustion for infinitely loading result pages

use crate::browser::{Browser, SCROLL_HEIGHT_SCRIPT, SCROLL_TO_BOTTOM_SCRIPT};
use crate::{BrowserError, BrowserResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Reads the document height from the browser
async fn scroll_height<B: Browser>(browser: &mut B) -> BrowserResult<u64> {
    let value = browser.execute_script(SCROLL_HEIGHT_SCRIPT, Vec::new()).await?;
    value
        .as_u64()
        .or_else(|| value.as_f64().map(|h| h as u64))
        .ok_or_else(|| BrowserError::Script(format!("unexpected scroll height: {}", value)))
}

/// Scrolls to the bottom until the page stops growing
///
/// Reads the height, then repeatedly scrolls, waits `settle` and reads the
/// height again, stopping as soon as two consecutive readings are equal. At
/// least one scroll is always performed. `max_rounds` caps the number of
/// scrolls for pages that never stop growing, and setting `shutdown` stops
/// the loop after the current round.
///
/// # Returns
///
/// The number of scrolls performed.
pub async fn scroll_to_exhaustion<B: Browser>(
    browser: &mut B,
    settle: Duration,
    max_rounds: u32,
    shutdown: &AtomicBool,
) -> BrowserResult<u32> {
    let mut last_height = scroll_height(browser).await?;
    let mut rounds = 0;

    loop {
        browser
            .execute_script(SCROLL_TO_BOTTOM_SCRIPT, Vec::new())
            .await?;
        rounds += 1;

        tokio::time::sleep(settle).await;

        let new_height = scroll_height(browser).await?;
        tracing::debug!("Scroll round {}: height {} -> {}", rounds, last_height, new_height);

        if new_height == last_height {
            break;
        }

        if shutdown.load(Ordering::Relaxed) {
            tracing::warn!("Interrupted after {} scroll rounds", rounds);
            break;
        }

        if rounds >= max_rounds {
            tracing::warn!(
                "Page still growing after {} scroll rounds, continuing with what is loaded",
                rounds
            );
            break;
        }

        last_height = new_height;
    }

    Ok(rounds)
}
