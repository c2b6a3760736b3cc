//! Pagination walker
//!
//! Starting from a category's entry URL, fetch each listing page, collect
//! its item links, and follow the "next" control until there is none.

use crate::crawler::parser::parse_document;
use crate::crawler::{CancelFlag, PageFetcher};
use crate::extract::{extract_listing, ListingPage};
use crate::records::ItemUrlSet;
use crate::url::resolve_next_page;
use crate::ScoutError;
use std::collections::HashSet;
use std::fmt;
use url::Url;

/// Guards applied to one category walk
#[derive(Debug, Clone, Copy)]
pub struct WalkLimits {
    /// Maximum listing pages fetched for one category
    pub max_pages: usize,
}

impl Default for WalkLimits {
    fn default() -> Self {
        Self { max_pages: 1000 }
    }
}

/// Why a walk stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkStop {
    /// The last page had no "next" control
    LastPage,
    /// The "next" link pointed at a page already visited
    Cycle { url: String },
    /// `max_pages` listing pages were fetched
    PageLimit,
    /// A listing page could not be fetched, parsed or read
    Failed { url: String, reason: String },
    /// The cancel flag was raised
    Cancelled,
}

impl WalkStop {
    /// True when every listing page was reached
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::LastPage)
    }
}

impl fmt::Display for WalkStop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LastPage => f.write_str("complete"),
            Self::Cycle { url } => write!(f, "cycle at {}", url),
            Self::PageLimit => f.write_str("page limit reached"),
            Self::Failed { url, reason } => write!(f, "failed at {}: {}", url, reason),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Item URLs gathered for a category, plus how the walk ended
///
/// The URLs are kept whatever the stop reason, so a walk that fails on
/// page 4 still surfaces the items of pages 1 to 3.
#[derive(Debug, Clone)]
pub struct WalkOutcome {
    pub urls: ItemUrlSet,
    pub pages_visited: usize,
    pub stop: WalkStop,
}

/// Walks a category's listing pages
///
/// # Arguments
///
/// * `fetcher` - Page source
/// * `entry` - First listing page of the category
/// * `base` - Site base URL, used for root-relative "next" links
/// * `limits` - Page limit guard
/// * `cancel` - Checked before every page
pub async fn walk_category(
    fetcher: &dyn PageFetcher,
    entry: &Url,
    base: &Url,
    limits: WalkLimits,
    cancel: &CancelFlag,
) -> WalkOutcome {
    let mut urls = ItemUrlSet::new();
    let mut visited: HashSet<Url> = HashSet::new();
    let mut current = entry.clone();

    let stop = loop {
        if cancel.is_cancelled() {
            break WalkStop::Cancelled;
        }

        if visited.len() >= limits.max_pages {
            tracing::warn!("Page limit of {} reached at {}", limits.max_pages, current);
            break WalkStop::PageLimit;
        }
        visited.insert(current.clone());

        let listing = match fetch_listing(fetcher, &current).await {
            Ok(listing) => listing,
            Err(e) => {
                tracing::error!(
                    "Pagination stopped at {} with {} item URLs kept: {}",
                    current,
                    urls.len(),
                    e
                );
                break WalkStop::Failed {
                    url: current.to_string(),
                    reason: e.to_string(),
                };
            }
        };

        let found = listing.items.len();
        let added = listing
            .items
            .into_iter()
            .filter(|url| urls.insert(url.clone()))
            .count();
        tracing::debug!("{}: {} item links, {} new", current, found, added);

        let Some(href) = listing.next else {
            break WalkStop::LastPage;
        };

        let next = match resolve_next_page(&current, &href, base) {
            Ok(next) => next,
            Err(e) => {
                tracing::error!("Unusable next link '{}' on {}: {}", href, current, e);
                break WalkStop::Failed {
                    url: current.to_string(),
                    reason: e.to_string(),
                };
            }
        };

        if visited.contains(&next) {
            tracing::warn!("Next link on {} loops back to {}", current, next);
            break WalkStop::Cycle {
                url: next.to_string(),
            };
        }

        current = next;
    };

    WalkOutcome {
        urls,
        pages_visited: visited.len(),
        stop,
    }
}

async fn fetch_listing(fetcher: &dyn PageFetcher, url: &Url) -> Result<ListingPage, ScoutError> {
    let body = fetcher.fetch(url).await?;
    let document = parse_document(url, &body)?;
    Ok(extract_listing(&document, url)?)
}
