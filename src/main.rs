//! Lot-Harvester main entry point
//!
//! This is the command-line interface for the used-car listing harvester.

use clap::Parser;
use lot_harvester::config::{load_config_with_hash, validate, Config};
use lot_harvester::images::ImageFetcher;
use lot_harvester::output::{CatalogWriter, HugoWriter, JsonWriter};
use lot_harvester::{harvest, BrandRegistry, CrawlReport};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Lot-Harvester: a used-car listing harvester
///
/// Lot-Harvester scrolls a classifieds result page, reads every vehicle
/// listing (and optionally its detail page), downloads the photos and
/// writes static-site content plus a JSON dump.
#[derive(Parser, Debug)]
#[command(name = "lot-harvester")]
#[command(version = "1.0.0")]
#[command(about = "A used-car listing harvester", long_about = None)]
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

    /// Harvest this result page instead of the configured one
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Don't open detail pages
    #[arg(long)]
    no_enrich: bool,

    /// Don't download images; records keep the remote URLs
    #[arg(long)]
    no_images: bool,

    /// Write the JSON dump here instead of the configured path
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Validate config and show what would be harvested without starting a browser
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let mut config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    apply_overrides(&mut config, &cli);
    if let Err(e) = validate(&config) {
        tracing::error!("Invalid command-line override: {}", e);
        return Err(e.into());
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let report = handle_harvest(&config).await?;
    if !report.is_complete() {
        tracing::error!("Harvest was interrupted");
        std::process::exit(1);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("lot_harvester=info,warn"),
            1 => EnvFilter::new("lot_harvester=debug,info"),
            2 => EnvFilter::new("lot_harvester=trace,debug"),
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

/// Folds command-line switches into the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(url) = &cli.url {
        config.crawler.listing_url = url.clone();
    }
    if cli.no_enrich {
        config.crawler.enrich = false;
    }
    if cli.no_images {
        config.images.download = false;
    }
    if let Some(json) = &cli.json {
        config.output.json_path = json.display().to_string();
    }
}

/// Handles the --dry-run mode: shows what a harvest would do
fn handle_dry_run(config: &Config) {
    println!("=== Lot-Harvester Dry Run ===\n");

    println!("Crawler:");
    println!("  Listing URL: {}", config.crawler.listing_url);
    println!("  Detail pages: {}", yes_no(config.crawler.enrich));
    println!("  Max images per listing: {}", config.crawler.max_images);
    println!(
        "  Settle times: initial {}ms, scroll {}ms, detail {}ms",
        config.crawler.initial_settle_ms,
        config.crawler.scroll_settle_ms,
        config.crawler.detail_settle_ms
    );
    println!("  Max scroll rounds: {}", config.crawler.max_scroll_rounds);

    println!("\nBrowser:");
    println!("  Backend: {:?}", config.browser.backend);
    println!("  WebDriver URL: {}", config.browser.webdriver_url);
    println!("  Headless: {}", yes_no(config.browser.headless));
    println!("  User agent: {}", config.user_agent.value);

    println!("\nImages:");
    println!("  Download: {}", yes_no(config.images.download));
    println!("  Directory: {}", config.images.directory);
    println!("  Timeout: {}s", config.images.timeout_secs);

    println!("\nOutput:");
    println!("  Content: {}", config.output.content_dir);
    println!("  JSON: {}", config.output.json_path);
    println!("  Overwrite: {}", yes_no(config.output.overwrite));

    println!("\n✓ Configuration is valid");
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// Handles the main harvest: crawl, images, then output
async fn handle_harvest(config: &Config) -> Result<CrawlReport, Box<dyn std::error::Error>> {
    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = Arc::clone(&shutdown);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_err() {
                return;
            }
            tracing::warn!("Interrupt received, finishing up (press Ctrl-C again to exit now)");
            shutdown.store(true, Ordering::Relaxed);

            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::error!("Second interrupt, exiting without cleanup");
                std::process::exit(130);
            }
        });
    }

    tracing::info!("Harvesting {}", config.crawler.listing_url);
    let mut report = match harvest(config, Arc::clone(&shutdown)).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            return Err(e.into());
        }
    };

    let mut registry = BrandRegistry::with_defaults();
    for record in &report.records {
        if registry.add_if_absent(&record.brand) {
            tracing::info!("New brand registered: {}", record.brand);
        }
    }

    let images = if config.images.download {
        let fetcher = ImageFetcher::new(
            &config.images.directory,
            &config.user_agent.value,
            Duration::from_secs(config.images.timeout_secs),
        )?;
        fetcher.attach_all(&mut report.records, &shutdown).await
    } else {
        tracing::info!("Image downloads disabled; keeping remote URLs");
        0
    };

    let writers: Vec<Box<dyn CatalogWriter>> = vec![
        Box::new(HugoWriter::new(
            &config.output.content_dir,
            config.output.overwrite,
        )),
        Box::new(JsonWriter::new(&config.output.json_path)),
    ];
    for writer in &writers {
        match writer.write(&report.records) {
            Ok(summary) => tracing::info!(
                "{} output: {} written, {} skipped",
                writer.name(),
                summary.written,
                summary.skipped
            ),
            Err(e) => {
                tracing::error!("{} output failed: {}", writer.name(), e);
                return Err(e.into());
            }
        }
    }

    tracing::info!(
        "Harvest finished: {} records, {} images, {} skipped",
        report.records.len(),
        images,
        report.skipped.len()
    );

    Ok(report)
}
