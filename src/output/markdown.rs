//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of a crawl run,
//! including per-category counts, truncated pagination walks and every
//! failed item with its reason.

use crate::output::traits::{OutputResult, RunReport};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown summary of a run to `output_path`
///
/// # Arguments
///
/// * `report` - The run report
/// * `config_hash` - SHA-256 of the configuration file used
/// * `output_path` - Path where the markdown file should be written
pub fn generate_markdown_summary(
    report: &RunReport,
    config_hash: &str,
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_summary(report, config_hash);

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a run report as markdown
pub fn format_markdown_summary(report: &RunReport, config_hash: &str) -> String {
    let mut md = String::new();

    md.push_str("# Book-Scout Crawl Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    if let Some(finished) = &report.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished.to_rfc3339()));
    }
    if let Some(duration) = report.duration_seconds() {
        md.push_str(&format!(
            "- **Duration**: {} seconds ({:.2} minutes)\n",
            duration,
            duration as f64 / 60.0
        ));
    }
    let status = if report.cancelled { "Cancelled" } else { "Completed" };
    md.push_str(&format!("- **Status**: {}\n", status));
    md.push_str(&format!("- **Config Hash**: {}\n\n", config_hash));

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!(
        "- **Categories**: {} of {}\n",
        report.categories.len(),
        report.categories_total
    ));
    md.push_str(&format!("- **Item URLs Found**: {}\n", report.total_urls()));
    md.push_str(&format!("- **Records**: {}\n", report.total_records()));
    md.push_str(&format!("- **Failures**: {}\n", report.total_failures()));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n\n",
        report.success_rate()
    ));

    // Category breakdown
    if !report.categories.is_empty() {
        md.push_str("## Categories\n\n");
        md.push_str("| Category | Pages | URLs | Records | Failures | Pagination | Time (s) |\n");
        md.push_str("|----------|-------|------|---------|----------|------------|----------|\n");
        for category in &report.categories {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {:.1} |\n",
                category.name,
                category.pages_visited,
                category.urls_found,
                category.records,
                category.failures.len(),
                category.pagination,
                category.elapsed.as_secs_f64()
            ));
        }
        md.push('\n');
    }

    // Failures by kind
    let by_kind = report.failures_by_kind();
    if !by_kind.is_empty() {
        md.push_str("## Failures by Kind\n\n");
        md.push_str("| Kind | Count |\n");
        md.push_str("|------|-------|\n");
        for (kind, count) in &by_kind {
            md.push_str(&format!("| {} | {} |\n", kind, count));
        }
        md.push('\n');
    }

    // Failed items, grouped by category
    if report.total_failures() > 0 {
        md.push_str("## Failed Items\n\n");
        for category in report.categories.iter().filter(|c| !c.failures.is_empty()) {
            md.push_str(&format!("### {}\n\n", category.name));
            for failure in &category.failures {
                md.push_str(&format!(
                    "- `{}` ({}): {}\n",
                    failure.url, failure.kind, failure.reason
                ));
            }
            md.push('\n');
        }
    }

    // Writer errors
    let write_errors: Vec<_> = report
        .categories
        .iter()
        .filter_map(|c| c.write_error.as_ref().map(|e| (&c.name, e)))
        .collect();
    if !write_errors.is_empty() {
        md.push_str("## Output Errors\n\n");
        for (name, error) in write_errors {
            md.push_str(&format!("- **{}**: {}\n", name, error));
        }
        md.push('\n');
    }

    md
}
