//! Crawler module for fetching and walking catalog pages
//!
//! This module contains the crawling logic:
//! - HTTP fetching with politeness delay and retries (`fetcher`)
//! - Turning response bytes into an HTML document (`parser`)
//! - Following "next" links through a category's listing pages (`pagination`)
//! - Sequencing categories and items with per-URL failure isolation (`coordinator`)

mod coordinator;
mod fetcher;
mod pagination;
mod parser;

pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, HttpFetcher, PageFetcher};
pub use pagination::{walk_category, WalkLimits, WalkOutcome, WalkStop};
pub use parser::parse_document;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Externally triggered abort for a running crawl
///
/// Cloning shares the flag. The coordinator checks it before starting each
/// category, each listing page and each item.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
