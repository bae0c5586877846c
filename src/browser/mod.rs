//! Browser capability
//!
//! The crawler drives pages through the [`Browser`] trait and reads content
//! through [`PageElement`]. Two backends implement it:
//! - `WebDriverBrowser`: a real browser behind a WebDriver endpoint (fantoccini)
//! - `SnapshotBrowser`: static HTML fetched with reqwest and queried with scraper
//!
//! All calls on one browser are sequential; the crawler never shares a session.

mod snapshot;
mod webdriver;

#[cfg(test)]
pub(crate) mod flaky;

pub use snapshot::{SnapshotBrowser, SnapshotElement};
pub use webdriver::{WebDriverBrowser, WebDriverElement};

use crate::BrowserResult;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

/// Script returning the current document height
pub const SCROLL_HEIGHT_SCRIPT: &str = "return document.body.scrollHeight";

/// Script scrolling the window to the bottom of the document
pub const SCROLL_TO_BOTTOM_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// Opaque identifier of a browser tab
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WindowHandle(String);

impl WindowHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A located element of the current document
#[async_trait]
pub trait PageElement: Send + Sync + Sized {
    /// Rendered text of the element and its descendants
    async fn text(&self) -> BrowserResult<String>;

    /// Value of an attribute, `None` when the element doesn't carry it
    async fn attr(&self, name: &str) -> BrowserResult<Option<String>>;

    /// First descendant matching a CSS selector
    ///
    /// Fails with `BrowserError::NoSuchElement` when nothing matches.
    async fn find_element(&self, selector: &str) -> BrowserResult<Self>;

    /// All descendants matching a CSS selector, possibly none
    async fn find_elements(&self, selector: &str) -> BrowserResult<Vec<Self>>;
}

/// A scriptable browser session with tabs
#[async_trait]
pub trait Browser: Send {
    type Element: PageElement;

    /// Loads a URL in the current tab
    async fn navigate(&mut self, url: &str) -> BrowserResult<()>;

    /// Runs a script in the current tab and returns its JSON result
    async fn execute_script(&mut self, script: &str, args: Vec<Value>) -> BrowserResult<Value>;

    /// First element of the current document matching a CSS selector
    async fn find_element(&mut self, selector: &str) -> BrowserResult<Self::Element>;

    /// All elements of the current document matching a CSS selector
    async fn find_elements(&mut self, selector: &str) -> BrowserResult<Vec<Self::Element>>;

    /// Opens a URL in a new tab without switching to it
    async fn open_tab(&mut self, url: &str) -> BrowserResult<()>;

    /// Handles of all open tabs, oldest first
    async fn window_handles(&mut self) -> BrowserResult<Vec<WindowHandle>>;

    async fn switch_to_window(&mut self, handle: &WindowHandle) -> BrowserResult<()>;

    /// Closes the current tab; another tab must be selected afterwards
    async fn close_window(&mut self) -> BrowserResult<()>;

    /// Ends the session. Safe to call more than once.
    async fn quit(&mut self) -> BrowserResult<()>;
}
