use crate::url::parse_base_url;
use crate::ConfigError;
use serde::Deserialize;
use url::Url;

/// Main configuration structure for Book-Scout
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    /// Category names to crawl; empty means all of them
    #[serde(default)]
    pub categories: Vec<String>,
}

impl Config {
    /// The parsed site base URL, always ending in '/'
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        parse_base_url(&self.site.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))
    }
}

/// Target site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Landing page of the catalog, also used for root-relative links
    #[serde(rename = "base-url")]
    pub base_url: String,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Time slept before every request (milliseconds)
    #[serde(rename = "request-delay")]
    pub request_delay: u64,

    /// Item pages fetched concurrently within one category
    #[serde(rename = "max-concurrent-items")]
    pub max_concurrent_items: usize,

    /// Listing pages followed per category before giving up
    #[serde(rename = "max-pages-per-category")]
    pub max_pages_per_category: usize,

    /// Retries for server errors and timeouts
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Delay between retries (milliseconds)
    #[serde(rename = "retry-delay")]
    pub retry_delay: u64,

    /// Per-request timeout (seconds)
    pub timeout: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            request_delay: 0,
            max_concurrent_items: 1,
            max_pages_per_category: 1000,
            max_retries: 2,
            retry_delay: 1000,
            timeout: 30,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "BookScout".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/book-scout".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the per-category CSV files
    #[serde(rename = "data-dir")]
    pub data_dir: String,

    /// Also download cover images under `<data-dir>/images/`
    #[serde(rename = "download-images", default)]
    pub download_images: bool,

    /// Path to the markdown run summary
    #[serde(rename = "summary-path")]
    pub summary_path: String,
}
