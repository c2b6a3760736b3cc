//! Cover image downloads
//!
//! Images go to `<root>/images/<category-slug>/<upc>.<ext>`. A failed image
//! is logged and counted; it never fails the category.

use crate::crawler::PageFetcher;
use crate::output::traits::OutputResult;
use crate::records::BookRecord;
use crate::url::category_slug;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

/// Outcome of downloading one category's images
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageStats {
    pub saved: usize,
    pub failed: usize,
}

/// Fetches cover images through the crawl's page fetcher
#[derive(Clone)]
pub struct ImageDownloader {
    fetcher: Arc<dyn PageFetcher>,
    root: PathBuf,
}

impl ImageDownloader {
    pub fn new(fetcher: Arc<dyn PageFetcher>, root: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            root: root.into(),
        }
    }

    /// Directory receiving a category's images
    pub fn category_dir(&self, category: &str) -> PathBuf {
        self.root.join("images").join(category_slug(category))
    }

    /// Downloads the image of every record that has one
    pub async fn download(&self, category: &str, records: &[BookRecord]) -> ImageStats {
        let dir = self.category_dir(category);
        let mut stats = ImageStats::default();

        if let Err(e) = tokio::fs::create_dir_all(&dir).await {
            tracing::warn!("Cannot create image directory {}: {}", dir.display(), e);
            stats.failed = records.iter().filter(|r| r.image_url.is_some()).count();
            return stats;
        }

        for record in records {
            let Some(image_url) = &record.image_url else {
                continue;
            };

            match self.save(&dir, record, image_url).await {
                Ok(path) => {
                    tracing::debug!("Saved image {}", path.display());
                    stats.saved += 1;
                }
                Err(e) => {
                    tracing::warn!("Image {} not saved: {}", image_url, e);
                    stats.failed += 1;
                }
            }
        }

        stats
    }

    async fn save(
        &self,
        dir: &Path,
        record: &BookRecord,
        image_url: &str,
    ) -> OutputResult<PathBuf> {
        let url = Url::parse(image_url)?;
        let bytes = self.fetcher.fetch(&url).await?;

        let path = dir.join(image_file_name(&record.universal_product_code, &url));
        tokio::fs::write(&path, bytes).await?;

        Ok(path)
    }
}

/// `<upc>.<ext>`, the extension taken from the image URL (default `jpg`)
fn image_file_name(upc: &str, url: &Url) -> String {
    let stem: String = upc
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();

    let extension = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| {
            !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .unwrap_or_else(|| "jpg".to_string());

    format!("{}.{}", stem, extension)
}
