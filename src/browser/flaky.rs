//! Test double over [`SnapshotBrowser`] with injectable tab-switch failures

use crate::browser::{Browser, SnapshotBrowser, SnapshotElement, WindowHandle};
use crate::{BrowserError, BrowserResult};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub(crate) struct FlakyBrowser {
    pub inner: SnapshotBrowser,
    /// Switches to any tab but the first that fail before one succeeds
    pub failing_switches_away: usize,
    /// Switches back to the first tab that fail before one succeeds
    pub failing_switches_back: usize,
    /// Every handle a switch was attempted to, in order
    pub switch_attempts: Vec<WindowHandle>,
    /// Flag set once a page has been loaded
    pub interrupt_on_navigate: Option<Arc<AtomicBool>>,
}

impl FlakyBrowser {
    pub fn new(inner: SnapshotBrowser) -> Self {
        Self {
            inner,
            failing_switches_away: 0,
            failing_switches_back: 0,
            switch_attempts: Vec::new(),
            interrupt_on_navigate: None,
        }
    }

    pub async fn open_tabs(&mut self) -> usize {
        self.inner.window_handles().await.map(|h| h.len()).unwrap_or(0)
    }
}

#[async_trait]
impl Browser for FlakyBrowser {
    type Element = SnapshotElement;

    async fn navigate(&mut self, url: &str) -> BrowserResult<()> {
        self.inner.navigate(url).await?;
        if let Some(flag) = &self.interrupt_on_navigate {
            flag.store(true, Ordering::Relaxed);
        }
        Ok(())
    }

    async fn execute_script(&mut self, script: &str, args: Vec<Value>) -> BrowserResult<Value> {
        self.inner.execute_script(script, args).await
    }

    async fn find_element(&mut self, selector: &str) -> BrowserResult<Self::Element> {
        self.inner.find_element(selector).await
    }

    async fn find_elements(&mut self, selector: &str) -> BrowserResult<Vec<Self::Element>> {
        self.inner.find_elements(selector).await
    }

    async fn open_tab(&mut self, url: &str) -> BrowserResult<()> {
        self.inner.open_tab(url).await
    }

    async fn window_handles(&mut self) -> BrowserResult<Vec<WindowHandle>> {
        self.inner.window_handles().await
    }

    async fn switch_to_window(&mut self, handle: &WindowHandle) -> BrowserResult<()> {
        self.switch_attempts.push(handle.clone());

        let handles = self.inner.window_handles().await?;
        let remaining = if handles.first() == Some(handle) {
            &mut self.failing_switches_back
        } else {
            &mut self.failing_switches_away
        };
        if *remaining > 0 {
            *remaining -= 1;
            return Err(BrowserError::Command(format!("cannot switch to {}", handle)));
        }

        self.inner.switch_to_window(handle).await
    }

    async fn close_window(&mut self) -> BrowserResult<()> {
        self.inner.close_window().await
    }

    async fn quit(&mut self) -> BrowserResult<()> {
        self.inner.quit().await
    }
}
