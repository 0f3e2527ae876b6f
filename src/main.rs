//! Gergle main entry point
//!
//! This is the command-line interface for the Gergle website crawler.

use anyhow::Context;
use clap::Parser;
use gergle::config::{load_config_with_hash, validate, AuthConfig, Config, OutputFormat};
use gergle::crawler::CrawlSession;
use gergle::output::{write_page, CrawlSummary};
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Gergle: a polite, concurrent website crawler
///
/// Gergle crawls a single site from a seed URL, following same-site links
/// while respecting robots.txt, and prints one line per page it visits.
#[derive(Parser, Debug)]
#[command(name = "gergle")]
#[command(version)]
#[command(about = "A polite, concurrent website crawler", long_about = None)]
struct Cli {
    /// URL to start crawling from
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Maximum depth of links to follow
    #[arg(short, long)]
    depth: Option<u32>,

    /// Path patterns not to crawl (repeatable or comma separated, `*` wildcard)
    #[arg(short = 'i', long, value_delimiter = ',')]
    disallow: Vec<String>,

    /// Idle connections to keep open per host
    #[arg(short, long)]
    connections: Option<usize>,

    /// Maximum number of pages fetched at once
    #[arg(short, long)]
    workers: Option<usize>,

    /// Seconds to wait between requests (defaults to robots.txt Crawl-Delay)
    #[arg(short = 't', long)]
    delay: Option<f64>,

    /// Zero bothers given: ignore robots.txt
    #[arg(long)]
    zero: bool,

    /// Basic auth username
    #[arg(short, long)]
    username: Option<String>,

    /// Basic auth password
    #[arg(short, long)]
    password: Option<String>,

    /// Path to TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// List every link and asset under each page
    #[arg(short, long)]
    long: bool,

    /// Print one JSON object per page
    #[arg(long)]
    json: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    apply_overrides(&cli, &mut config);
    validate(&config).context("invalid configuration")?;

    run_crawl(&config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout carries only page records.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("gergle=info,warn"),
            1 => EnvFilter::new("gergle=debug,info"),
            2 => EnvFilter::new("gergle=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Layers command-line flags over the file configuration
fn apply_overrides(cli: &Cli, config: &mut Config) {
    if let Some(url) = &cli.url {
        config.seed = Some(url.clone());
    }
    if let Some(depth) = cli.depth {
        config.crawler.max_depth = depth;
    }
    config
        .crawler
        .disallow
        .extend(cli.disallow.iter().filter(|rule| !rule.trim().is_empty()).cloned());
    if let Some(connections) = cli.connections {
        config.crawler.connections = connections;
    }
    if cli.workers.is_some() {
        config.crawler.workers = cli.workers;
    }
    if cli.delay.is_some() {
        config.crawler.delay = cli.delay;
    }
    if cli.zero {
        config.robots.ignore = true;
    }

    // A password without any username is left for validation to reject.
    if let Some(username) = &cli.username {
        config.auth.get_or_insert_with(AuthConfig::default).username = username.clone();
    }
    if let Some(password) = &cli.password {
        config.auth.get_or_insert_with(AuthConfig::default).password = Some(password.clone());
    }

    if cli.long {
        config.output.long = true;
    }
    if cli.json {
        config.output.format = OutputFormat::Json;
    }
}

/// Runs the crawl, printing each page as it arrives
///
/// Ctrl-C stops the crawl early; the pages seen so far are still summarized.
async fn run_crawl(config: &Config) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut session = CrawlSession::start(config)
        .await
        .context("failed to start crawl")?;
    tracing::info!("Crawling {}", session.seed());

    let mut summary = CrawlSummary::default();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    loop {
        tokio::select! {
            page = session.next_page() => {
                let Some(page) = page else { break };
                summary.record(&page);
                write_page(&mut out, &page, &config.output).context("failed to write page")?;
            }
            _ = &mut interrupt => {
                tracing::warn!("Interrupted, stopping crawl");
                break;
            }
        }
    }

    out.flush().context("failed to flush output")?;
    session.finish();
    summary.log(start.elapsed());

    Ok(())
}
