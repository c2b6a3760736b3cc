//! Crawler coordinator - main crawl orchestration logic
//!
//! This module sequences a whole run:
//! - Fetching the landing page and building the category index
//! - Walking each category's pagination to collect item URLs
//! - Fetching, extracting and normalizing every item
//! - Handing each finished category to the dataset writer
//!
//! A failure on one item is recorded against that URL and the run moves on;
//! a failure on one category (pagination or writer) never stops the others.
//! Only the cancel flag stops the run early.

use crate::config::Config;
use crate::crawler::pagination::{walk_category, WalkLimits};
use crate::crawler::parser::parse_document;
use crate::crawler::{CancelFlag, HttpFetcher, PageFetcher};
use crate::extract::{extract_categories, extract_detail};
use crate::normalize::normalize;
use crate::output::{CategoryReport, DatasetWriter, RunReport};
use crate::records::{BookRecord, Category, CategoryIndex, CrawlResult, ItemFailure};
use crate::ScoutError;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator {
    fetcher: Arc<dyn PageFetcher>,
    base_url: Url,
    limits: WalkLimits,
    max_concurrent_items: usize,
    category_filter: Vec<String>,
    cancel: CancelFlag,
}

impl Coordinator {
    /// Creates a coordinator fetching over HTTP with the configured client
    pub fn new(config: &Config) -> Result<Self, ScoutError> {
        let fetcher = HttpFetcher::new(&config.crawler, &config.user_agent)?;
        Self::with_fetcher(config, Arc::new(fetcher))
    }

    /// Creates a coordinator over any page source
    pub fn with_fetcher(
        config: &Config,
        fetcher: Arc<dyn PageFetcher>,
    ) -> Result<Self, ScoutError> {
        Ok(Self {
            fetcher,
            base_url: config.base_url()?,
            limits: WalkLimits {
                max_pages: config.crawler.max_pages_per_category,
            },
            max_concurrent_items: config.crawler.max_concurrent_items.max(1),
            category_filter: config.categories.clone(),
            cancel: CancelFlag::new(),
        })
    }

    /// Handle for aborting the run from elsewhere (e.g. a Ctrl-C handler)
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// The fetcher shared with collaborators such as the image downloader
    pub fn fetcher(&self) -> Arc<dyn PageFetcher> {
        Arc::clone(&self.fetcher)
    }

    /// Fetches the landing page and builds the category index
    ///
    /// When a category filter is configured, only those categories are kept;
    /// requested names that do not exist on the site are logged.
    pub async fn discover_categories(&self) -> Result<CategoryIndex, ScoutError> {
        tracing::info!("Fetching categories from {}", self.base_url);

        let body = self.fetcher.fetch(&self.base_url).await?;
        let index = {
            let document = parse_document(&self.base_url, &body)?;
            extract_categories(&document, &self.base_url)?
        };
        tracing::info!("Found {} categories", index.len());

        if self.category_filter.is_empty() {
            return Ok(index);
        }

        let (selected, missing) = index.select(&self.category_filter);
        for name in missing {
            tracing::warn!("Category '{}' not found on {}", name, self.base_url);
        }
        Ok(selected)
    }

    /// Crawls every category of the index, handing each result to `writer`
    ///
    /// Categories are processed one after the other, in index order.
    pub async fn run(&self, index: &CategoryIndex, writer: &mut dyn DatasetWriter) -> RunReport {
        let mut report = RunReport::new(index.len());
        tracing::info!("Starting crawl of {} categories", index.len());

        for (position, category) in index.iter().enumerate() {
            if self.cancel.is_cancelled() {
                tracing::warn!(
                    "Crawl cancelled, {} categories not started",
                    index.len() - position
                );
                report.cancelled = true;
                break;
            }

            tracing::info!(
                "[{}/{}] Scraping category: {}",
                position + 1,
                index.len(),
                category.name
            );
            let result = self.crawl_category(category).await;

            let mut category_report = CategoryReport::new(&category.name, &result);
            if let Err(e) = writer.write_category(&category.name, &result).await {
                tracing::error!("Failed to write data for {}: {}", category.name, e);
                category_report.write_error = Some(e.to_string());
            }
            report.categories.push(category_report);

            if result.cancelled {
                report.cancelled = true;
            }
        }

        report.finished_at = Some(Utc::now());
        tracing::info!(
            "Crawl finished: {} records, {} failures across {} categories",
            report.total_records(),
            report.total_failures(),
            report.categories.len()
        );

        report
    }

    /// Walks one category and processes all of its items
    ///
    /// Records keep the order in which the walk discovered their URLs, also
    /// when several items are fetched concurrently.
    pub async fn crawl_category(&self, category: &Category) -> CrawlResult {
        let start_time = Instant::now();

        let walk = walk_category(
            self.fetcher.as_ref(),
            &category.url,
            &self.base_url,
            self.limits,
            &self.cancel,
        )
        .await;

        let total = walk.urls.len();
        tracing::info!(
            "Number of books found in {}: {} ({} pages, pagination {})",
            category.name,
            total,
            walk.pages_visited,
            walk.stop
        );

        let outcomes: Vec<Option<Result<BookRecord, ItemFailure>>> =
            stream::iter(walk.urls.iter().enumerate())
                .map(|(position, url)| self.process_item(url, position, total))
                .buffered(self.max_concurrent_items)
                .collect()
                .await;

        let mut records = Vec::new();
        let mut failures = Vec::new();
        let mut cancelled = self.cancel.is_cancelled();
        for outcome in outcomes {
            match outcome {
                Some(Ok(record)) => records.push(record),
                Some(Err(failure)) => failures.push(failure),
                None => cancelled = true,
            }
        }

        let elapsed = start_time.elapsed();
        tracing::info!(
            "{} done: {} records, {} failures in {:.1}s",
            category.name,
            records.len(),
            failures.len(),
            elapsed.as_secs_f64()
        );

        CrawlResult {
            records,
            failures,
            urls_found: total,
            pages_visited: walk.pages_visited,
            pagination: walk.stop,
            cancelled,
            elapsed,
        }
    }

    /// Fetches, extracts and normalizes one item
    ///
    /// Returns None when the run was cancelled before the item was started.
    async fn process_item(
        &self,
        url: &Url,
        position: usize,
        total: usize,
    ) -> Option<Result<BookRecord, ItemFailure>> {
        if self.cancel.is_cancelled() {
            return None;
        }

        tracing::debug!("[{}/{}] Processing item: {}", position + 1, total, url);

        let outcome = match self.fetcher.fetch(url).await {
            Ok(body) => scrape_item(url, &body),
            Err(e) => Err(ScoutError::from(e)),
        };

        Some(outcome.map_err(|e| {
            tracing::warn!("Skipping {}: {}", url, e);
            ItemFailure::new(url, &e)
        }))
    }
}

/// Parses, extracts and normalizes an item page body
fn scrape_item(url: &Url, body: &[u8]) -> Result<BookRecord, ScoutError> {
    let document = parse_document(url, body)?;
    let raw = extract_detail(&document)?;
    Ok(normalize(&raw, url)?)
}
