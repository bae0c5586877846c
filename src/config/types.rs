use serde::Deserialize;

/// Default user agent presented to the marketplace and image hosts
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub images: ImagesConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Listing crawl behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Search results page to harvest
    #[serde(rename = "listing-url")]
    pub listing_url: String,

    /// Whether to visit each listing's detail page
    #[serde(default = "default_true")]
    pub enrich: bool,

    /// Maximum gallery images kept per listing
    #[serde(rename = "max-images", default = "default_max_images")]
    pub max_images: usize,

    /// Wait after the listing page loads (milliseconds)
    #[serde(rename = "initial-settle-ms", default = "default_initial_settle_ms")]
    pub initial_settle_ms: u64,

    /// Wait after each scroll (milliseconds)
    #[serde(rename = "scroll-settle-ms", default = "default_scroll_settle_ms")]
    pub scroll_settle_ms: u64,

    /// Wait after opening a detail page (milliseconds)
    #[serde(rename = "detail-settle-ms", default = "default_detail_settle_ms")]
    pub detail_settle_ms: u64,

    /// Upper bound on scroll rounds for pages that keep growing
    #[serde(rename = "max-scroll-rounds", default = "default_max_scroll_rounds")]
    pub max_scroll_rounds: u32,
}

/// Which browser implementation drives the crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserBackend {
    /// A real browser behind a WebDriver endpoint
    #[default]
    WebDriver,

    /// Static HTML, no JavaScript
    Snapshot,
}

/// Browser session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    #[serde(default)]
    pub backend: BrowserBackend,

    /// WebDriver endpoint (chromedriver or geckodriver)
    #[serde(rename = "webdriver-url", default = "default_webdriver_url")]
    pub webdriver_url: String,

    #[serde(default = "default_true")]
    pub headless: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            backend: BrowserBackend::default(),
            webdriver_url: default_webdriver_url(),
            headless: true,
        }
    }
}

/// User agent configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    #[serde(default = "default_user_agent")]
    pub value: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: default_user_agent(),
        }
    }
}

/// Image download configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ImagesConfig {
    /// Directory downloaded images are written to
    #[serde(default = "default_images_directory")]
    pub directory: String,

    /// Per-image request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_image_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_true")]
    pub download: bool,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            directory: default_images_directory(),
            timeout_secs: default_image_timeout_secs(),
            download: true,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory for the generated Markdown content files
    #[serde(rename = "content-dir", default = "default_content_dir")]
    pub content_dir: String,

    /// Path of the JSON dump of all records
    #[serde(rename = "json-path", default = "default_json_path")]
    pub json_path: String,

    /// Replace content files that already exist
    #[serde(default)]
    pub overwrite: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            json_path: default_json_path(),
            overwrite: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_images() -> usize {
    10
}

fn default_initial_settle_ms() -> u64 {
    5000
}

fn default_scroll_settle_ms() -> u64 {
    3000
}

fn default_detail_settle_ms() -> u64 {
    3000
}

fn default_max_scroll_rounds() -> u32 {
    50
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_images_directory() -> String {
    "hugo-site/static/images/cars".to_string()
}

fn default_image_timeout_secs() -> u64 {
    10
}

fn default_content_dir() -> String {
    "hugo-site/content/cars".to_string()
}

fn default_json_path() -> String {
    "avito_cars.json".to_string()
}
