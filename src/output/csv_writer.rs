//! CSV dataset writer
//!
//! One file per category, `<data-dir>/<slug>_books_data.csv`, one row per
//! [`BookRecord`] in discovery order.

use crate::output::images::ImageDownloader;
use crate::output::traits::{DatasetWriter, OutputResult};
use crate::records::{BookRecord, CrawlResult};
use crate::url::category_slug;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Writes each category's records to its own CSV file
pub struct CsvDatasetWriter {
    data_dir: PathBuf,
    images: Option<ImageDownloader>,
}

impl CsvDatasetWriter {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            images: None,
        }
    }

    /// Also download cover images after each category's CSV is written
    pub fn with_images(mut self, downloader: ImageDownloader) -> Self {
        self.images = Some(downloader);
        self
    }

    /// Path of the CSV file for a category
    pub fn csv_path(&self, category: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}_books_data.csv", category_slug(category)))
    }
}

#[async_trait]
impl DatasetWriter for CsvDatasetWriter {
    async fn write_category(&mut self, category: &str, result: &CrawlResult) -> OutputResult<()> {
        if result.records.is_empty() {
            tracing::info!("No books data to save for {}", category);
            return Ok(());
        }

        tokio::fs::create_dir_all(&self.data_dir).await?;
        let path = self.csv_path(category);
        write_records(&path, &result.records)?;
        tracing::info!(
            "Saved {} records for {} to {}",
            result.records.len(),
            category,
            path.display()
        );

        if let Some(images) = &self.images {
            let stats = images.download(category, &result.records).await;
            tracing::info!(
                "Images for {}: {} saved, {} failed",
                category,
                stats.saved,
                stats.failed
            );
        }

        Ok(())
    }
}

/// Writes records with a header row, replacing any existing file
pub fn write_records(path: &Path, records: &[BookRecord]) -> OutputResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
