//! Statistics generation from a finished crawl
//!
//! This module provides functionality for summarising a `SiteMap` and displaying the numbers.

use crate::storage::SiteMap;
use std::collections::BTreeMap;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlStatistics {
    /// Total number of registered resources
    pub total_resources: u64,

    /// Successfully fetched HTML pages
    pub pages: u64,

    /// Successfully fetched non-HTML resources
    pub assets: u64,

    /// Resources whose fetch failed
    pub failed: u64,

    /// Fetched resources with a status outside 2xx
    pub error_statuses: u64,

    /// Total number of reference edges in the graph
    pub total_references: u64,

    /// Count of fetched resources by HTTP status code
    pub status_codes: BTreeMap<u16, u64>,
}

impl CrawlStatistics {
    /// Collects statistics from a finished crawl
    pub fn from_site_map(site_map: &SiteMap) -> Self {
        let mut stats = Self::default();

        for resource in site_map.iter() {
            stats.total_resources += 1;
            stats.total_references += resource.references().len() as u64;

            if !resource.is_fetched() {
                stats.failed += 1;
                continue;
            }

            if resource.is_web_page() {
                stats.pages += 1;
            } else {
                stats.assets += 1;
            }

            if let Some(code) = resource.status_code() {
                *stats.status_codes.entry(code).or_insert(0) += 1;
                if !(200..300).contains(&code) {
                    stats.error_statuses += 1;
                }
            }
        }

        stats
    }

    /// Percentage of resources fetched without a transport error
    pub fn success_rate(&self) -> f64 {
        if self.total_resources == 0 {
            return 0.0;
        }
        ((self.total_resources - self.failed) as f64 / self.total_resources as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Total resources: {}", stats.total_resources);
    println!("  Web pages: {}", stats.pages);
    println!("  Assets: {}", stats.assets);
    println!("  Failed fetches: {}", stats.failed);
    println!("  References: {}", stats.total_references);
    println!("  Success rate: {:.1}%", stats.success_rate());
    println!();

    if !stats.status_codes.is_empty() {
        println!("Status Codes:");
        for (code, count) in &stats.status_codes {
            println!("  {}: {}", code, count);
        }
    }
}
