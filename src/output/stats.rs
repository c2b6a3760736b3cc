//! Console reporting of a crawl run

use crate::output::traits::RunReport;

/// Prints the run report to stdout as a table
pub fn print_statistics(report: &RunReport) {
    println!("=== Crawl Statistics ===\n");

    let name_width = report
        .categories
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Category".len());

    println!(
        "  {:<width$}  {:>5}  {:>7}  {:>8}  {:>8}  {:>8}",
        "Category",
        "URLs",
        "Records",
        "Failures",
        "Time (s)",
        "Complete",
        width = name_width
    );
    for category in &report.categories {
        println!(
            "  {:<width$}  {:>5}  {:>7}  {:>8}  {:>8.1}  {:>8}",
            category.name,
            category.urls_found,
            category.records,
            category.failures.len(),
            category.elapsed.as_secs_f64(),
            if category.pagination.is_complete() { "yes" } else { "no" },
            width = name_width
        );
    }
    println!();

    let by_kind = report.failures_by_kind();
    if !by_kind.is_empty() {
        println!("Failures by Kind:");
        for (kind, count) in &by_kind {
            println!("  {}: {}", kind, count);
        }
        println!();
    }

    let truncated: Vec<_> = report.truncated_categories().collect();
    if !truncated.is_empty() {
        println!("Incomplete Pagination ({}):", truncated.len());
        for category in truncated {
            println!("  - {}: {}", category.name, category.pagination);
        }
        println!();
    }

    if report.cancelled {
        println!(
            "Run cancelled after {} of {} categories",
            report.categories.len(),
            report.categories_total
        );
    }

    println!(
        "Success Rate: {:.1}% ({} / {} items recorded)",
        report.success_rate(),
        report.total_records(),
        report.total_urls()
    );
}
