//! Book-Scout: a catalog crawler for paginated book shops
//!
//! This crate walks every category of a catalog site, follows the "next"
//! pagination links to collect item URLs, and turns each item page into a
//! typed [`records::BookRecord`] through a selector-driven extractor and a
//! field normalizer. Per-item failures are recorded, never fatal.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod normalize;
pub mod output;
pub mod records;
pub mod url;

use extract::Field;
use thiserror::Error;

/// Main error type for Book-Scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Cannot resolve '{href}' against {base}: {message}")]
    Resolve {
        base: String,
        href: String,
        message: String,
    },
}

/// Transport failures: the page could not be retrieved
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Request to {url} failed: {message}")]
    Network { url: String, message: String },
}

impl FetchError {
    /// The URL the failed request was sent to
    pub fn url(&self) -> &str {
        match self {
            Self::Status { url, .. } | Self::Timeout { url } | Self::Network { url, .. } => url,
        }
    }

    /// Returns true for failures worth retrying (server errors and timeouts)
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status >= 500,
            Self::Timeout { .. } => true,
            Self::Network { .. } => false,
        }
    }
}

/// Parse failures: the body is not a usable HTML document
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Empty response body from {url}")]
    Empty { url: String },

    #[error("Response from {url} is not valid UTF-8: {message}")]
    Decode { url: String, message: String },
}

/// A required structural element is absent from an otherwise-parsed page
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("Missing required field '{field}'")]
    MissingField { field: Field },

    #[error("Invalid selector '{css}' for field '{field}': {message}")]
    InvalidSelector {
        field: Field,
        css: String,
        message: String,
    },
}

/// A present field whose text does not match its expected shape
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot normalize '{field}': unexpected value {raw_value:?}")]
pub struct NormalizationError {
    pub field: Field,
    pub raw_value: String,
}

impl NormalizationError {
    pub fn new(field: Field, raw_value: impl Into<String>) -> Self {
        Self {
            field,
            raw_value: raw_value.into(),
        }
    }
}

/// Result type alias for Book-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CancelFlag, Coordinator};
pub use records::{BookRecord, CategoryIndex, CrawlResult, ItemUrlSet, RawItemRecord};
