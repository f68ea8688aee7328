//! Sitegraph main entry point
//!
//! This is the command-line interface for the Sitegraph site mapper.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use sitegraph::config::{load_config, Config};
use sitegraph::output::{generate_markdown_summary, print_report, print_statistics, CrawlStatistics};
use sitegraph::Crawler;
use tracing_subscriber::EnvFilter;

/// Sitegraph: a same-host site mapper
///
/// Sitegraph crawls every page reachable from a root URL without leaving its host, then prints
/// each page with the pages it links to and the assets it references.
#[derive(Parser, Debug)]
#[command(name = "sitegraph")]
#[command(version)]
#[command(about = "A same-host site mapper", long_about = None)]
struct Cli {
    /// URL to start crawling from
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print crawl statistics after the report
    #[arg(long)]
    stats: bool,

    /// Also write a markdown sitemap to this path
    #[arg(long, value_name = "FILE")]
    markdown: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    let crawler = Crawler::new(&cli.url, &config).context("cannot start crawl")?;
    let site_map = crawler.crawl().await;

    print_report(&site_map).context("failed to print report")?;

    if cli.stats {
        println!();
        print_statistics(&CrawlStatistics::from_site_map(&site_map));
    }

    let markdown_path = cli
        .markdown
        .or_else(|| config.output.markdown_path.as_ref().map(PathBuf::from));
    if let Some(path) = markdown_path {
        write_markdown(&site_map, &path)?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitegraph=info,warn"),
            1 => EnvFilter::new("sitegraph=debug,info"),
            2 => EnvFilter::new("sitegraph=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr so the report on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn write_markdown(site_map: &sitegraph::SiteMap, path: &Path) -> anyhow::Result<()> {
    tracing::info!("Writing markdown sitemap to {}", path.display());
    generate_markdown_summary(site_map, path)
        .with_context(|| format!("failed to write markdown sitemap to {}", path.display()))
}
