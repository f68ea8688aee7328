//! Markdown sitemap generation
//!
//! This module renders a finished crawl as a markdown document: run information, statistics,
//! and one section per web page with its links and assets.

use crate::output::report::{is_asset, is_link};
use crate::output::stats::CrawlStatistics;
use crate::output::OutputResult;
use crate::storage::SiteMap;
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a markdown sitemap to `output_path`
///
/// # Arguments
///
/// * `site_map` - The finished crawl
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the sitemap
/// * `Err(OutputError)` - Failed to write the file
pub fn generate_markdown_summary(site_map: &SiteMap, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(site_map, Utc::now());

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a finished crawl as markdown
pub fn format_markdown_summary(site_map: &SiteMap, generated_at: DateTime<Utc>) -> String {
    let stats = CrawlStatistics::from_site_map(site_map);
    let mut md = String::new();

    md.push_str(&format!("# Sitemap of {}\n\n", site_map.root()));

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Root**: {}\n", site_map.root()));
    md.push_str(&format!(
        "- **Generated**: {}\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    md.push_str("## Statistics\n\n");
    md.push_str("| Metric | Count |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Resources | {} |\n", stats.total_resources));
    md.push_str(&format!("| Web Pages | {} |\n", stats.pages));
    md.push_str(&format!("| Assets | {} |\n", stats.assets));
    md.push_str(&format!("| Failed Fetches | {} |\n", stats.failed));
    md.push_str(&format!("| Non-2xx Responses | {} |\n", stats.error_statuses));
    md.push_str(&format!("| References | {} |\n\n", stats.total_references));

    md.push_str("## Pages\n\n");
    let pages = site_map.web_pages();
    if pages.is_empty() {
        md.push_str("_No pages were fetched._\n");
    }

    for page in pages {
        md.push_str(&format!("### {}\n\n", page.url()));
        if let Some(modified) = page.last_modified() {
            md.push_str(&format!("Last modified: {}\n\n", modified));
        }

        let links: Vec<_> = site_map.references(page).filter(|r| is_link(r)).collect();
        if !links.is_empty() {
            md.push_str("**Links**\n\n");
            for link in links {
                md.push_str(&format!("- <{}>\n", link.url()));
            }
            md.push('\n');
        }

        let assets: Vec<_> = site_map.references(page).filter(|r| is_asset(r)).collect();
        if !assets.is_empty() {
            md.push_str("**Assets**\n\n");
            for asset in assets {
                md.push_str(&format!("- `{}` <{}>\n", asset.content_type(), asset.url()));
            }
            md.push('\n');
        }
    }

    md
}
