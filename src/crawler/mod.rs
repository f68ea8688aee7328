//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a per-request timeout
//! - HTML parsing and reference extraction
//! - Recursive, concurrent crawl coordination over one host

mod coordinator;
mod extractor;
mod fetcher;

pub use coordinator::Crawler;
pub use extractor::{extract_references, unique_urls, REFERENCE_ATTRIBUTES};
pub use fetcher::{build_http_client, Body, FetchedResponse, Fetcher};

use crate::config::Config;
use crate::storage::SiteMap;

/// Runs a complete crawl operation
///
/// This is the main entry point for a one-off crawl. It will:
/// 1. Validate the root URL and configuration
/// 2. Build the HTTP client
/// 3. Fetch pages and follow same-host references concurrently
/// 4. Return the finished graph
///
/// # Arguments
///
/// * `root` - The URL to start from
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(SiteMap)` - Every resource reached from the root
/// * `Err(SiteGraphError)` - The crawl could not start
///
/// # Example
///
/// ```no_run
/// use sitegraph::config::Config;
/// use sitegraph::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let site_map = crawl("https://example.com/", &Config::default()).await?;
/// println!("{} resources", site_map.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(root: &str, config: &Config) -> crate::Result<SiteMap> {
    let crawler = Crawler::new(root, config)?;
    Ok(crawler.crawl().await)
}
