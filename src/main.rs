//! tululu-fetch main entry point
//!
//! This is the command-line interface for the catalog crawler.

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tululu_fetch::config::{load_config_with_hash, validate, Config};
use tululu_fetch::crawler::{Coordinator, ProgressEvent};
use tululu_fetch::output::{print_report, summary_line};
use tululu_fetch::FetchOutcome;
use tracing_subscriber::EnvFilter;

/// tululu-fetch: download books, covers and descriptions from a tululu.org genre catalog
///
/// Walks the catalog pages from START_PAGE up to (not including) END_PAGE, downloads
/// every available book with its cover, and writes books_description.json.
#[derive(Parser, Debug)]
#[command(name = "tululu-fetch")]
#[command(version)]
#[command(about = "Download books from a tululu.org genre catalog", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// First catalog page to download from
    #[arg(short, long)]
    start_page: Option<u32>,

    /// Catalog page to stop before (defaults to the last page of the catalog)
    #[arg(short, long)]
    end_page: Option<u32>,

    /// Do not download cover images
    #[arg(long)]
    skip_img: bool,

    /// Do not download book texts
    #[arg(long)]
    skip_txt: bool,

    /// Folder for books/ and images/
    #[arg(short, long, value_name = "DIR")]
    dest_folder: Option<PathBuf>,

    /// Separate folder for books_description.json
    #[arg(short, long, value_name = "DIR")]
    json_path: Option<PathBuf>,

    /// Prefix saved file names with the run's start time
    #[arg(long)]
    timestamp_filenames: bool,

    /// Write the log to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without downloading
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the loaded configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(start_page) = self.start_page {
            config.crawler.start_page = start_page;
        }
        if let Some(end_page) = self.end_page {
            config.crawler.end_page = Some(end_page);
        }
        if self.skip_img {
            config.crawler.skip_images = true;
        }
        if self.skip_txt {
            config.crawler.skip_texts = true;
        }
        if let Some(dest_folder) = &self.dest_folder {
            config.output.dest_folder = dest_folder.clone();
        }
        if let Some(json_path) = &self.json_path {
            config.output.json_folder = Some(json_path.clone());
        }
        if self.timestamp_filenames {
            config.output.timestamp_filenames = true;
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{}", fatal_message(e.as_ref()));
        std::process::exit(1);
    }
}

/// The line shown on the console when a run fails
fn fatal_message(error: &dyn std::error::Error) -> String {
    format!("tululu-fetch: {}", error)
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    setup_logging(cli.verbose, cli.quiet, cli.log_file.as_ref())?;

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => Config::default(),
    };

    cli.apply_overrides(&mut config);
    if let Err(e) = validate(&config) {
        tracing::error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    if cli.dry_run {
        handle_dry_run(config).await
    } else {
        handle_crawl(config, cli.quiet).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(
    verbose: u8,
    quiet: bool,
    log_file: Option<&PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("tululu_fetch=info,warn"),
            1 => EnvFilter::new("tululu_fetch=debug,info"),
            2 => EnvFilter::new("tululu_fetch=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false);

    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }

    Ok(())
}

/// Handles the --dry-run mode: resolves the page range against the live catalog
async fn handle_dry_run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== tululu-fetch Dry Run ===\n");

    println!("Site:");
    println!("  Catalog: {}", config.catalog_url());
    println!("  User agent: {}", config.user_agent_string());
    println!(
        "  Request timeout: {}s",
        config.crawler.request_timeout_secs
    );

    let coordinator = Coordinator::new(config.clone())?;
    let plan = coordinator.plan().await?;

    println!("\nPages:");
    println!("  Catalog last page: {}", plan.last_page);
    println!("  Requested: {}", plan.requested);
    match plan.effective {
        Some(range) => println!("  Would crawl: {}", range),
        None => println!("  Would crawl: nothing (start page is past the last page)"),
    }

    let layout = coordinator.layout();
    println!("\nOutput:");
    println!(
        "  Books: {}{}",
        layout.books_dir().display(),
        if config.crawler.skip_texts { " (skipped)" } else { "" }
    );
    println!(
        "  Images: {}{}",
        layout.images_dir().display(),
        if config.crawler.skip_images { " (skipped)" } else { "" }
    );
    println!("  Description: {}", layout.description_path().display());

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, quiet: bool) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Crawling {} from page {}",
        config.catalog_url(),
        config.crawler.start_page
    );

    let bar = if quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    };

    let progress = bar.clone();
    let mut coordinator = Coordinator::new(config)?.with_progress(move |event| match event {
        ProgressEvent::BooksCollected { total } => progress.set_length(total as u64),
        ProgressEvent::BookFinished { outcome, .. } => {
            if let FetchOutcome::Fetched(record) = outcome {
                progress.set_message(record.name.clone());
            }
            progress.inc(1);
        }
    });

    match coordinator.run().await {
        Ok(report) => {
            bar.finish_and_clear();
            if quiet {
                println!("{}", summary_line(&report));
            } else {
                print_report(&report);
            }
            Ok(())
        }
        Err(e) => {
            bar.abandon();
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
