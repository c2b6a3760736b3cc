//! Output module: dataset persistence and run reporting
//!
//! This module handles:
//! - Writing each category's records to CSV (`csv_writer`)
//! - Downloading cover images (`images`)
//! - Printing run statistics to the console (`stats`)
//! - Generating a markdown summary of the run (`markdown`)

mod csv_writer;
mod images;
mod markdown;
pub mod stats;
mod traits;

pub use csv_writer::{write_records, CsvDatasetWriter};
pub use images::{ImageDownloader, ImageStats};
pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::print_statistics;
pub use traits::{CategoryReport, DatasetWriter, OutputError, OutputResult, RunReport};
