//! Output module for reporting crawl results
//!
//! This module handles:
//! - Printing the plain-text sitemap report
//! - Generating markdown sitemaps
//! - Computing and printing crawl statistics

mod markdown;
mod report;
pub mod stats;

pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use report::{format_report, print_report, write_report};
pub use stats::{print_statistics, CrawlStatistics};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
