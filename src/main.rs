//! SoftCon harvest main entry point
//!
//! This is the command-line interface for the SoftCon exhibit catalog
//! scraper.

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use softcon_harvest::config::{
    compute_config_hash, parse_config, validate, Category, Config, ListingMode,
};
use softcon_harvest::crawler::Coordinator;
use softcon_harvest::output::{print_summary, write_references, write_report};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// SoftCon harvest: a polite exhibit catalog scraper
///
/// Discovers project exhibits on the SoftCon catalog listing, fetches each
/// project page with pacing, and writes the references and extracted
/// details as JSON together with a markdown run summary.
#[derive(Parser, Debug)]
#[command(name = "softcon-harvest")]
#[command(version)]
#[command(about = "A polite SoftCon exhibit catalog scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Listing to crawl: current or previous
    #[arg(short, long)]
    mode: Option<ListingMode>,

    /// Exhibit category code: S, D, C or I
    #[arg(short, long)]
    category: Option<Category>,

    /// Academic term for the previous-works listing, e.g. 2024-1
    #[arg(short, long)]
    term: Option<String>,

    /// Maximum number of project pages to fetch
    #[arg(long)]
    max_items: Option<usize>,

    /// Minimum delay between detail requests per worker (milliseconds)
    #[arg(long)]
    pacing_ms: Option<u64>,

    /// Number of concurrent worker lanes
    #[arg(long)]
    workers: Option<usize>,

    /// Directory output files are written to
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without fetching anything
    #[arg(long, conflicts_with = "links_only")]
    dry_run: bool,

    /// Discover and save project links only, skipping the detail pass
    #[arg(long, conflicts_with = "dry_run")]
    links_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            parse_config(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };
    apply_overrides(&mut config, &cli);

    validate(&config).context("invalid configuration")?;
    let config_hash = compute_config_hash(&config)?;
    tracing::info!("Configuration is valid (hash: {})", config_hash);

    if cli.dry_run {
        return handle_dry_run(&config);
    }

    handle_crawl(config, &config_hash, cli.links_only).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("softcon_harvest=info,warn"),
            1 => EnvFilter::new("softcon_harvest=debug,info"),
            2 => EnvFilter::new("softcon_harvest=trace,debug"),
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

/// Command-line values win over the configuration file
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(mode) = cli.mode {
        config.crawl.mode = mode;
    }
    if let Some(category) = cli.category {
        config.crawl.category = category;
    }
    if let Some(term) = &cli.term {
        config.crawl.term = Some(term.trim().to_string());
    }
    if let Some(max_items) = cli.max_items {
        config.crawl.max_items = max_items;
    }
    if let Some(pacing_ms) = cli.pacing_ms {
        config.crawl.pacing_ms = pacing_ms;
    }
    if let Some(workers) = cli.workers {
        config.crawl.workers = workers;
    }
    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.clone();
    }
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let listing_url = config.crawl.listing_url(&config.site)?;

    println!("=== SoftCon Harvest Dry Run ===\n");

    println!("Listing:");
    println!("  URL: {}", listing_url);
    println!("  Mode: {}", config.crawl.mode);
    println!(
        "  Category: {} ({})",
        config.crawl.category,
        config.crawl.category.label()
    );
    if let Some(term) = &config.crawl.term {
        println!("  Term: {}", term);
    }

    println!("\nCrawl:");
    println!("  Max items: {}", config.crawl.max_items);
    println!("  Pacing: {}ms", config.crawl.pacing_ms);
    println!("  Workers: {}", config.crawl.workers);
    println!("  Request timeout: {}s", config.crawl.request_timeout_secs);

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Links: {}", config.output.links_path().display());
    println!("  Details: {}", config.output.details_path().display());
    println!("  Summary: {}", config.output.summary_path().display());

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, config_hash: &str, links_only: bool) -> anyhow::Result<()> {
    let started_at = Utc::now();
    let coordinator = Coordinator::new(config).context("failed to initialize crawler")?;

    let references = match coordinator.discover().await {
        Ok(references) => references,
        Err(reason) => {
            println!(
                "Nothing to process for {}: {}",
                coordinator.listing_url(),
                reason
            );
            return Ok(());
        }
    };

    let config = coordinator.config();
    let links_path = config.output.links_path();
    write_references(&references, &links_path)
        .with_context(|| format!("failed to write {}", links_path.display()))?;
    tracing::info!(
        "Wrote {} references to {}",
        references.len(),
        links_path.display()
    );

    if links_only {
        println!(
            "✓ Saved {} project links to {}",
            references.len(),
            links_path.display()
        );
        return Ok(());
    }

    let report = coordinator.complete(references, started_at).await;
    let summary = write_report(&report, config, config_hash).context("failed to write results")?;

    println!();
    print_summary(&summary);
    println!("\n✓ Results saved to {}", config.output.directory);

    Ok(())
}
