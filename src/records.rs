//! Record types flowing through a crawl
//!
//! - `CategoryIndex`: category name → entry URL, built once per run
//! - `ItemUrlSet`: the de-duplicated item URLs of one category, in discovery order
//! - `RawItemRecord`: item fields exactly as they appear in the markup
//! - `BookRecord`: the typed, normalized form of a raw record
//! - `CrawlResult`: everything produced for one category

use crate::crawler::WalkStop;
use crate::ScoutError;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Sentinel stored when an item page has no description paragraph
pub const NO_DESCRIPTION: &str = "No description found";

/// Sentinel stored when an item page has no gallery image
pub const NO_IMAGE: &str = "No image found";

/// A named category and the URL of its first listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub url: Url,
}

/// Insertion-ordered mapping from category name to entry URL
///
/// Names are unique: inserting a name twice keeps the first entry.
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    entries: Vec<Category>,
}

impl CategoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a category, returning false if the name is already present
    pub fn insert(&mut self, name: impl Into<String>, url: Url) -> bool {
        let name = name.into();
        if self.get(&name).is_some() {
            return false;
        }
        self.entries.push(Category { name, url });
        true
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.entries.iter().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Category> {
        self.entries.iter()
    }

    /// Keeps only the named categories (matched case-insensitively)
    ///
    /// Returns the filtered index and the requested names that were not found.
    pub fn select(&self, names: &[String]) -> (CategoryIndex, Vec<String>) {
        let mut selected = CategoryIndex::new();
        let mut missing = Vec::new();

        for wanted in names {
            match self
                .entries
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(wanted.trim()))
            {
                Some(category) => {
                    selected.insert(category.name.clone(), category.url.clone());
                }
                None => missing.push(wanted.clone()),
            }
        }

        (selected, missing)
    }
}

impl<'a> IntoIterator for &'a CategoryIndex {
    type Item = &'a Category;
    type IntoIter = std::slice::Iter<'a, Category>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// The item URLs of one category, in the order they were first seen
#[derive(Debug, Clone, Default)]
pub struct ItemUrlSet {
    urls: Vec<Url>,
    seen: HashSet<Url>,
}

impl ItemUrlSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a URL unless it was already collected; returns true if it was new
    pub fn insert(&mut self, url: Url) -> bool {
        if self.seen.contains(&url) {
            return false;
        }
        self.seen.insert(url.clone());
        self.urls.push(url);
        true
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Url> {
        self.urls.iter()
    }
}

/// Item fields as extracted from the detail page, all still text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawItemRecord {
    pub title: String,
    pub category: String,
    /// Description paragraph, or [`NO_DESCRIPTION`]
    pub description: String,
    /// Rating modifier class token, e.g. "Three"
    pub rating_word: String,
    /// Relative `src` of the gallery image, or [`NO_IMAGE`]
    pub image_reference: String,
    /// Value of the `UPC` row
    pub upc: String,
    pub price_including_tax: String,
    pub price_excluding_tax: String,
    /// e.g. "In stock (22 available)"
    pub availability: String,
}

/// A fully typed book record
///
/// Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookRecord {
    pub product_page_url: String,
    pub universal_product_code: String,
    pub title: String,
    pub price_including_tax: f64,
    pub price_excluding_tax: f64,
    pub number_available: u32,
    pub product_description: String,
    pub category: String,
    pub review_rating: u8,
    pub image_url: Option<String>,
}

/// Coarse classification of a per-item failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FailureKind {
    Transport,
    Parse,
    Extraction,
    Normalization,
    Other,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Parse => "parse",
            Self::Extraction => "extraction",
            Self::Normalization => "normalization",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&ScoutError> for FailureKind {
    fn from(err: &ScoutError) -> Self {
        match err {
            ScoutError::Fetch(_) | ScoutError::Client(_) => Self::Transport,
            ScoutError::Parse(_) => Self::Parse,
            ScoutError::Extraction(_) => Self::Extraction,
            ScoutError::Normalization(_) => Self::Normalization,
            _ => Self::Other,
        }
    }
}

/// An item URL that did not produce a record, and why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub url: String,
    pub kind: FailureKind,
    pub reason: String,
}

impl ItemFailure {
    pub fn new(url: &Url, err: &ScoutError) -> Self {
        Self {
            url: url.to_string(),
            kind: FailureKind::from(err),
            reason: err.to_string(),
        }
    }
}

/// Everything produced while processing one category
#[derive(Debug, Clone)]
pub struct CrawlResult {
    /// Normalized records, in URL discovery order
    pub records: Vec<BookRecord>,
    /// Items that could not be produced
    pub failures: Vec<ItemFailure>,
    /// Number of item URLs the pagination walk collected
    pub urls_found: usize,
    /// Listing pages fetched during the walk
    pub pages_visited: usize,
    /// Why the pagination walk stopped
    pub pagination: WalkStop,
    /// True if the run was cancelled before every item was processed
    pub cancelled: bool,
    pub elapsed: Duration,
}

impl CrawlResult {
    /// Items neither recorded nor failed (skipped by cancellation)
    pub fn skipped(&self) -> usize {
        self.urls_found
            .saturating_sub(self.records.len() + self.failures.len())
    }
}
