//! CLI administration tool for linkkeeper.
//!
//! Works directly on the table snapshot in `DATA_DIR`, without going through
//! the HTTP API. Do not run it against a directory a live server is writing to.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL for 60 minutes with a custom code
//! cargo run --bin admin -- create https://example.com --validity 60 --code promo1
//!
//! # Follow a short URL (records a click)
//! cargo run --bin admin -- resolve promo1 --referrer https://news.example
//!
//! # Statistics for every short URL, or for one
//! cargo run --bin admin -- stats
//! cargo run --bin admin -- stats promo1
//! ```
//!
//! # Environment Variables
//!
//! - `DATA_DIR` (default: `./data`): directory holding `shortenedUrls.json`
//! - `LOG_SINK_URL` / `LOG_SINK_TOKEN`: audit collector, as for the server

use linkkeeper::application::services::{
    LinkService, RedirectOutcome, RedirectService, StatsService, UrlStats, short_url,
};
use linkkeeper::config::Config;
use linkkeeper::domain::log_event::EventLogger;
use linkkeeper::infrastructure::audit::run_log_worker;
use linkkeeper::infrastructure::blob::FileBlobStore;
use linkkeeper::infrastructure::persistence::MemoryUrlRepository;
use linkkeeper::server::build_event_sink;
use linkkeeper::utils::clock::{Clock, SystemClock};
use linkkeeper::utils::code_generator::RandomCodeGenerator;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::sync::Arc;

const DEFAULT_DATA_DIR: &str = "./data";

/// CLI tool for managing linkkeeper short URLs.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Data directory (overrides DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a short URL
    Create {
        /// Long URL (http or https)
        url: String,

        /// Validity in minutes (default: DEFAULT_VALIDITY_MINUTES or 30)
        #[arg(short, long)]
        validity: Option<i64>,

        /// Custom shortcode (alphanumeric, 4-10 characters)
        #[arg(short, long)]
        code: Option<String>,
    },

    /// Resolve a shortcode the way a redirect would
    Resolve {
        code: String,

        /// Referrer recorded as the click source
        #[arg(short, long)]
        referrer: Option<String>,
    },

    /// Show statistics
    Stats {
        /// Only this shortcode
        code: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let data_dir = cli
        .data_dir
        .or_else(|| config.data_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

    let blob_store = FileBlobStore::open(&data_dir)
        .await
        .with_context(|| format!("Failed to open data directory {}", data_dir.display()))?;
    let repository = Arc::new(
        MemoryUrlRepository::load(Arc::new(blob_store))
            .await
            .context("Failed to load URL table")?,
    );

    let (logger, log_rx) = EventLogger::channel(config.log_queue_capacity.max(100));
    let log_worker = tokio::spawn(run_log_worker(
        log_rx,
        build_event_sink(&config)?,
        config.log_sink_retries,
    ));

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let result = match cli.command {
        Commands::Create {
            url,
            validity,
            code,
        } => {
            let service = LinkService::new(repository, RandomCodeGenerator, clock, logger)
                .with_default_validity(config.default_validity_minutes);
            create(&service, &config.base_url, url, validity, code).await
        }
        Commands::Resolve { code, referrer } => {
            let service = RedirectService::new(repository, clock, logger);
            resolve(&service, &code, referrer.as_deref()).await
        }
        Commands::Stats { code } => {
            drop(logger);
            let service = StatsService::new(repository, clock);
            stats(&service, &config.base_url, code.as_deref()).await
        }
    };

    // Every logger is gone by now, so the worker finishes once the queue is empty.
    log_worker.await.ok();

    result
}

async fn create(
    service: &LinkService<MemoryUrlRepository, RandomCodeGenerator>,
    base_url: &str,
    url: String,
    validity: Option<i64>,
    code: Option<String>,
) -> Result<()> {
    println!("{}", "🔗 Create Short URL".bright_blue().bold());
    println!();

    match service.create(url, validity, code).await {
        Ok(record) => {
            println!("{}", "✅ Short URL created".green().bold());
            println!();
            println!("  Short URL: {}", short_url(base_url, &record.shortcode).bright_yellow().bold());
            println!("  Target:    {}", record.long_url.cyan());
            println!("  Expires:   {}", record.expires_at.to_rfc3339());
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "❌".red(), e.to_string().red());
            Err(e.into())
        }
    }
}

async fn resolve(
    service: &RedirectService<MemoryUrlRepository>,
    code: &str,
    referrer: Option<&str>,
) -> Result<()> {
    match service.resolve(code, referrer).await? {
        RedirectOutcome::Success {
            long_url,
            total_clicks,
        } => {
            println!("{} {}", "➡️ ".green(), long_url.cyan().bold());
            println!("  Total clicks: {}", total_clicks.to_string().bright_white());
        }
        RedirectOutcome::NotFound => {
            println!("{}", format!("❌ Short URL not found: {code}").red());
        }
        RedirectOutcome::Expired { expires_at } => {
            println!(
                "{}",
                format!("⌛ Short URL expired at {}", expires_at.to_rfc3339()).yellow()
            );
        }
    }

    Ok(())
}

async fn stats(
    service: &StatsService<MemoryUrlRepository>,
    base_url: &str,
    code: Option<&str>,
) -> Result<()> {
    if let Some(code) = code {
        let stats = service.get_stats(code).await?;
        print_stats_detail(&stats, base_url);
        return Ok(());
    }

    let all = service.list_stats().await?;

    println!("{}", "📊 Short URLs".bright_blue().bold());
    println!();

    if all.is_empty() {
        println!("{}", "  No short URLs yet".yellow());
        return Ok(());
    }

    println!(
        "  {:<12} {:>7}  {:<8}  {}",
        "Code".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Status".bright_white().bold(),
        "Target".bright_white().bold()
    );

    for item in &all {
        let status = if item.expired {
            "expired".red()
        } else {
            "live".green()
        };

        println!(
            "  {:<12} {:>7}  {:<8}  {}",
            item.shortcode.cyan(),
            item.clicks,
            status,
            item.long_url
        );
    }

    println!();
    println!("  Total: {}", all.len().to_string().bright_white().bold());

    Ok(())
}

fn print_stats_detail(stats: &UrlStats, base_url: &str) {
    println!(
        "{} {}",
        "📊".bright_blue(),
        short_url(base_url, &stats.shortcode).bright_yellow().bold()
    );
    println!();
    println!("  Target:  {}", stats.long_url.cyan());
    println!("  Created: {}", stats.created_at.to_rfc3339());
    println!(
        "  Expires: {} {}",
        stats.expires_at.to_rfc3339(),
        if stats.expired {
            "(expired)".red()
        } else {
            "(live)".green()
        }
    );
    println!("  Clicks:  {}", stats.clicks.to_string().bright_white().bold());

    if !stats.click_details.is_empty() {
        println!();
        for click in &stats.click_details {
            println!(
                "    {}  {:<30}  {}",
                click.timestamp.to_rfc3339(),
                click.source,
                click.location.dimmed()
            );
        }
    }
}
