//! Book-Scout main entry point
//!
//! This is the command-line interface for the Book-Scout catalog crawler.

use anyhow::Context;
use book_scout::config::{load_config_with_hash, Config};
use book_scout::crawler::Coordinator;
use book_scout::output::{
    generate_markdown_summary, print_statistics, CsvDatasetWriter, ImageDownloader,
};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Book-Scout: a catalog crawler for paginated book shops
///
/// Book-Scout enumerates the categories of a catalog site, follows each
/// category's pagination, and writes one CSV of normalized book records per
/// category.
#[derive(Parser, Debug)]
#[command(name = "book-scout")]
#[command(version)]
#[command(about = "A catalog crawler for paginated book shops", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Only crawl this category (repeatable, overrides the config file)
    #[arg(long = "category", value_name = "NAME")]
    categories: Vec<String>,

    /// Do not download cover images, whatever the config says
    #[arg(long)]
    no_images: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if !cli.categories.is_empty() {
        config.categories = cli.categories.clone();
    }
    if cli.no_images {
        config.output.download_images = false;
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(&config, &config_hash).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("book_scout=info,warn"),
            1 => EnvFilter::new("book_scout=debug,info"),
            2 => EnvFilter::new("book_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Book-Scout Dry Run ===\n");

    println!("Site: {}", config.site.base_url);

    println!("\nCrawler Configuration:");
    println!("  Request delay: {}ms", config.crawler.request_delay);
    println!(
        "  Max concurrent items: {}",
        config.crawler.max_concurrent_items
    );
    println!(
        "  Max pages per category: {}",
        config.crawler.max_pages_per_category
    );
    println!(
        "  Retries: {} ({}ms apart)",
        config.crawler.max_retries, config.crawler.retry_delay
    );
    println!("  Timeout: {}s", config.crawler.timeout);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);

    println!("\nOutput:");
    println!("  Data directory: {}", config.output.data_dir);
    println!("  Download images: {}", config.output.download_images);
    println!("  Summary: {}", config.output.summary_path);

    if config.categories.is_empty() {
        println!("\nCategories: all");
    } else {
        println!("\nCategories ({}):", config.categories.len());
        for name in &config.categories {
            println!("  - {}", name);
        }
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, config_hash: &str) -> anyhow::Result<()> {
    let coordinator = Coordinator::new(config)?;

    let cancel = coordinator.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing the current item before stopping");
            cancel.cancel();
        }
    });

    let index = coordinator.discover_categories().await?;
    if index.is_empty() {
        tracing::warn!("No category URLs found. Exiting.");
        return Ok(());
    }
    tracing::info!("Number of categories to crawl: {}", index.len());

    let mut writer = CsvDatasetWriter::new(&config.output.data_dir);
    if config.output.download_images {
        writer = writer.with_images(ImageDownloader::new(
            coordinator.fetcher(),
            &config.output.data_dir,
        ));
    }

    let report = coordinator.run(&index, &mut writer).await;

    print_statistics(&report);

    let summary_path = Path::new(&config.output.summary_path);
    generate_markdown_summary(&report, config_hash, summary_path)?;
    println!("\n✓ Summary written to: {}", summary_path.display());

    Ok(())
}
