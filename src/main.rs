//! Hubcrawl main entry point
//!
//! This is the command-line interface for the hubcrawl worker.

use anyhow::Context;
use clap::Parser;
use hubcrawl::config::{load_config, Config};
use hubcrawl::crawler::{CrawlSession, HttpFetcher};
use hubcrawl::hub::HubClient;
use hubcrawl::output::{print_statistics, CrawlStatistics, ImageStore};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Hubcrawl: a hub-driven domain crawler worker
///
/// Hubcrawl asks a hub for domains, crawls each one within its own host,
/// and posts the collected text and images back to the hub.
#[derive(Parser, Debug)]
#[command(name = "hubcrawl")]
#[command(version = "1.0.0")]
#[command(about = "A hub-driven domain crawler worker", long_about = None)]
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

    /// Crawl these domains instead of requesting jobs from the hub
    #[arg(long = "domain", value_name = "DOMAIN")]
    domains: Vec<String>,

    /// Crawl but keep results local
    #[arg(long)]
    no_submit: bool,

    /// Validate config and print it without crawling
    #[arg(long)]
    dry_run: bool,

    /// Number of request, crawl and submit cycles
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    cycles: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    if cli.dry_run {
        print_dry_run(&config, &cli.domains);
        return Ok(());
    }

    run(config, cli).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("hubcrawl=info,warn"),
            1 => EnvFilter::new("hubcrawl=debug,info"),
            2 => EnvFilter::new("hubcrawl=trace,debug"),
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

fn print_dry_run(config: &Config, domains: &[String]) {
    println!("=== Hubcrawl Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Crawl budget: {} pages", config.crawler.crawl_budget);
    println!("  Politeness delay: {}ms", config.crawler.politeness_delay_ms);
    println!("  Max images per page: {}", config.crawler.max_images_per_page);
    println!("  Root scheme: {}", config.crawler.root_scheme);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    match config.crawler.domain_deadline_secs {
        Some(secs) => println!("  Domain deadline: {}s", secs),
        None => println!("  Domain deadline: none"),
    }

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header);

    println!("\nHub:");
    println!("  Base URL: {}", config.hub.base_url);
    println!("  Domains per request: {}", config.hub.num_domains);

    println!("\nOutput:");
    match &config.output.image_dir {
        Some(dir) => println!("  Image directory: {}", dir),
        None => println!("  Image directory: none"),
    }

    if !domains.is_empty() {
        println!("\nDomains ({}):", domains.len());
        for domain in domains {
            println!("  - {}", domain);
        }
    }

    println!("\n✓ Configuration is valid");
}

async fn run(config: Config, cli: Cli) -> anyhow::Result<()> {
    let fetcher = HttpFetcher::from_config(&config.crawler, &config.user_agent)
        .context("Failed to build HTTP client")?;
    let hub = HubClient::new(&config.hub.base_url, fetcher.client().clone())
        .context("Invalid hub base URL")?;

    let cancel = CancellationToken::new();
    spawn_shutdown_listener(cancel.clone());

    let image_store = config.output.image_dir.as_ref().map(ImageStore::new);
    let mut session = CrawlSession::new(fetcher, config.crawler.clone())
        .with_image_store(image_store)
        .with_cancellation(cancel.clone());

    let mut totals = CrawlStatistics::default();

    for cycle in 1..=cli.cycles {
        if cancel.is_cancelled() {
            break;
        }

        if !cli.domains.is_empty() {
            if cycle > 1 {
                break;
            }
            session.insert_domains(cli.domains.iter().cloned());
        } else {
            let received = session.request_jobs(&hub, config.hub.num_domains).await;
            if received == 0 && session.pending_domains().is_empty() {
                tracing::info!("No crawl jobs available, stopping after {} cycles", cycle - 1);
                break;
            }
        }

        tracing::info!(
            "Cycle {}: crawling {} domains",
            cycle,
            session.pending_domains().len()
        );
        let stats = session.crawl_all().await;
        totals.merge(stats);

        if cli.no_submit {
            continue;
        }

        let outcome = session.submit_all(&hub).await;
        tracing::info!("Submitted {} domains", outcome.delivered.len());
        if !outcome.is_complete() {
            tracing::error!(
                "{} submissions rejected, results kept for the next cycle",
                outcome.errors.len()
            );
        }
    }

    if !cli.no_submit && !session.completed().is_empty() {
        let unsent: Vec<&str> = session
            .completed()
            .iter()
            .map(|data| data.domain_name.as_str())
            .collect();
        tracing::error!(
            "{} crawled domains were never accepted by the hub: {}",
            unsent.len(),
            unsent.join(", ")
        );
    }

    if !session.pending_domains().is_empty() {
        tracing::warn!(
            "{} domains were not crawled",
            session.pending_domains().len()
        );
    }

    if !cli.quiet {
        print_statistics(&totals);
    }

    Ok(())
}

fn spawn_shutdown_listener(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current step");
            cancel.cancel();
        }
    });
}
