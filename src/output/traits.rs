//! Dataset writer trait and run report types
//!
//! The coordinator hands every finished category to a [`DatasetWriter`] and
//! keeps only a [`CategoryReport`] for the final summary.

use crate::crawler::WalkStop;
use crate::records::{CrawlResult, FailureKind, ItemFailure};
use crate::FetchError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Receives each category's result once the category is finished
///
/// Implementations own the persistence format and location.
#[async_trait]
pub trait DatasetWriter: Send {
    async fn write_category(&mut self, category: &str, result: &CrawlResult) -> OutputResult<()>;
}

/// Keeps every result in memory, in the order categories finished
#[async_trait]
impl DatasetWriter for Vec<(String, CrawlResult)> {
    async fn write_category(&mut self, category: &str, result: &CrawlResult) -> OutputResult<()> {
        self.push((category.to_string(), result.clone()));
        Ok(())
    }
}

/// What is kept of one category after its result was written
#[derive(Debug, Clone)]
pub struct CategoryReport {
    pub name: String,
    pub urls_found: usize,
    pub pages_visited: usize,
    pub records: usize,
    pub failures: Vec<ItemFailure>,
    pub skipped: usize,
    pub pagination: WalkStop,
    pub elapsed: Duration,
    /// Set when the dataset writer rejected this category
    pub write_error: Option<String>,
}

impl CategoryReport {
    pub fn new(name: &str, result: &CrawlResult) -> Self {
        Self {
            name: name.to_string(),
            urls_found: result.urls_found,
            pages_visited: result.pages_visited,
            records: result.records.len(),
            failures: result.failures.clone(),
            skipped: result.skipped(),
            pagination: result.pagination.clone(),
            elapsed: result.elapsed,
            write_error: None,
        }
    }
}

/// Summary of a whole crawl run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Categories present in the index handed to the run
    pub categories_total: usize,
    pub categories: Vec<CategoryReport>,
    pub cancelled: bool,
}

impl RunReport {
    pub fn new(categories_total: usize) -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            categories_total,
            categories: Vec::new(),
            cancelled: false,
        }
    }

    pub fn total_urls(&self) -> usize {
        self.categories.iter().map(|c| c.urls_found).sum()
    }

    pub fn total_records(&self) -> usize {
        self.categories.iter().map(|c| c.records).sum()
    }

    pub fn total_failures(&self) -> usize {
        self.categories.iter().map(|c| c.failures.len()).sum()
    }

    /// Failure counts per kind, across all categories
    pub fn failures_by_kind(&self) -> BTreeMap<FailureKind, usize> {
        let mut counts = BTreeMap::new();
        for failure in self.categories.iter().flat_map(|c| &c.failures) {
            *counts.entry(failure.kind).or_insert(0) += 1;
        }
        counts
    }

    /// Categories whose pagination walk did not reach the last page
    pub fn truncated_categories(&self) -> impl Iterator<Item = &CategoryReport> {
        self.categories
            .iter()
            .filter(|c| !c.pagination.is_complete())
    }

    /// Percentage of found item URLs that produced a record
    pub fn success_rate(&self) -> f64 {
        let total = self.total_urls();
        if total == 0 {
            return 0.0;
        }
        (self.total_records() as f64 / total as f64) * 100.0
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}
