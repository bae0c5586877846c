//! WebDriver backend
//!
//! Talks to chromedriver or geckodriver through fantoccini. Capabilities for
//! both browsers are sent so either driver can serve the session.

use crate::browser::{Browser, PageElement, WindowHandle};
use crate::config::BrowserConfig;
use crate::{BrowserError, BrowserResult};
use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{json, Map, Value};

/// A browser session behind a WebDriver endpoint
pub struct WebDriverBrowser {
    client: Option<Client>,
}

/// An element located through WebDriver
#[derive(Debug, Clone)]
pub struct WebDriverElement {
    element: Element,
}

impl WebDriverBrowser {
    /// Starts a new session
    ///
    /// # Arguments
    ///
    /// * `config` - Endpoint and headless settings
    /// * `user_agent` - User agent string the browser should present
    ///
    /// # Returns
    ///
    /// * `Ok(WebDriverBrowser)` - Session established
    /// * `Err(BrowserError::Session)` - The driver refused or could not be reached
    pub async fn connect(config: &BrowserConfig, user_agent: &str) -> BrowserResult<Self> {
        let caps = capabilities(config.headless, user_agent);

        tracing::info!("Connecting to WebDriver at {}", config.webdriver_url);
        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&config.webdriver_url)
            .await
            .map_err(|e| BrowserError::Session(e.to_string()))?;

        Ok(Self {
            client: Some(client),
        })
    }

    fn client(&self) -> BrowserResult<&Client> {
        self.client
            .as_ref()
            .ok_or_else(|| BrowserError::Session("session already closed".to_string()))
    }
}

/// Builds Chrome and Firefox capabilities for the session
fn capabilities(headless: bool, user_agent: &str) -> Map<String, Value> {
    let mut chrome_args = vec![
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--disable-blink-features=AutomationControlled".to_string(),
        "--window-size=1920,1080".to_string(),
        format!("--user-agent={}", user_agent),
    ];
    let mut firefox_args = Vec::new();

    if headless {
        chrome_args.push("--headless=new".to_string());
        firefox_args.push("-headless".to_string());
    }

    let mut caps = Map::new();
    caps.insert(
        "goog:chromeOptions".to_string(),
        json!({ "args": chrome_args }),
    );
    caps.insert(
        "moz:firefoxOptions".to_string(),
        json!({
            "args": firefox_args,
            "prefs": { "general.useragent.override": user_agent },
        }),
    );
    caps
}

/// Maps a WebDriver command error, keeping "no such element" distinguishable
fn command_error(selector: &str, err: CmdError) -> BrowserError {
    if err.is_no_such_element() {
        BrowserError::NoSuchElement(selector.to_string())
    } else {
        BrowserError::Command(err.to_string())
    }
}

#[async_trait]
impl PageElement for WebDriverElement {
    async fn text(&self) -> BrowserResult<String> {
        self.element
            .text()
            .await
            .map_err(|e| BrowserError::Command(e.to_string()))
    }

    async fn attr(&self, name: &str) -> BrowserResult<Option<String>> {
        self.element
            .attr(name)
            .await
            .map_err(|e| BrowserError::Command(e.to_string()))
    }

    async fn find_element(&self, selector: &str) -> BrowserResult<Self> {
        let element = self
            .element
            .find(Locator::Css(selector))
            .await
            .map_err(|e| command_error(selector, e))?;
        Ok(Self { element })
    }

    async fn find_elements(&self, selector: &str) -> BrowserResult<Vec<Self>> {
        let elements = self
            .element
            .find_all(Locator::Css(selector))
            .await
            .map_err(|e| command_error(selector, e))?;
        Ok(elements
            .into_iter()
            .map(|element| Self { element })
            .collect())
    }
}

#[async_trait]
impl Browser for WebDriverBrowser {
    type Element = WebDriverElement;

    async fn navigate(&mut self, url: &str) -> BrowserResult<()> {
        self.client()?
            .goto(url)
            .await
            .map_err(|e| BrowserError::Command(e.to_string()))
    }

    async fn execute_script(&mut self, script: &str, args: Vec<Value>) -> BrowserResult<Value> {
        self.client()?
            .execute(script, args)
            .await
            .map_err(|e| BrowserError::Script(e.to_string()))
    }

    async fn find_element(&mut self, selector: &str) -> BrowserResult<Self::Element> {
        let element = self
            .client()?
            .find(Locator::Css(selector))
            .await
            .map_err(|e| command_error(selector, e))?;
        Ok(WebDriverElement { element })
    }

    async fn find_elements(&mut self, selector: &str) -> BrowserResult<Vec<Self::Element>> {
        let elements = self
            .client()?
            .find_all(Locator::Css(selector))
            .await
            .map_err(|e| command_error(selector, e))?;
        Ok(elements
            .into_iter()
            .map(|element| WebDriverElement { element })
            .collect())
    }

    async fn open_tab(&mut self, url: &str) -> BrowserResult<()> {
        self.execute_script("window.open(arguments[0], '_blank');", vec![json!(url)])
            .await
            .map(|_| ())
    }

    async fn window_handles(&mut self) -> BrowserResult<Vec<WindowHandle>> {
        let handles = self
            .client()?
            .windows()
            .await
            .map_err(|e| BrowserError::Command(e.to_string()))?;
        Ok(handles
            .into_iter()
            .map(|handle| WindowHandle::new(String::from(handle)))
            .collect())
    }

    async fn switch_to_window(&mut self, handle: &WindowHandle) -> BrowserResult<()> {
        let handle = fantoccini::wd::WindowHandle::try_from(handle.as_str().to_string())
            .map_err(|_| BrowserError::NoWindow)?;
        self.client()?
            .switch_to_window(handle)
            .await
            .map_err(|e| BrowserError::Command(e.to_string()))
    }

    async fn close_window(&mut self) -> BrowserResult<()> {
        self.client()?
            .close_window()
            .await
            .map_err(|e| BrowserError::Command(e.to_string()))
    }

    async fn quit(&mut self) -> BrowserResult<()> {
        if let Some(client) = self.client.take() {
            tracing::info!("Closing WebDriver session");
            client
                .close()
                .await
                .map_err(|e| BrowserError::Command(e.to_string()))?;
        }
        Ok(())
    }
}
