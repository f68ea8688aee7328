//! Plain-text sitemap report
//!
//! For every successfully fetched HTML page the report lists the page, the pages it links to
//! and the assets it references:
//!
//! ```text
//! (webpage) https://site.test/
//!     Links
//!         (webpage) https://site.test/about
//!     Assets
//!         (image/png) https://site.test/logo.png
//! ```
//!
//! Resources whose fetch failed never appear, neither as entries nor as references.

use crate::storage::{Resource, SiteMap};
use std::io::{self, Write};

/// Writes the report for `site_map` to `out`
pub fn write_report<W: Write>(site_map: &SiteMap, out: &mut W) -> io::Result<()> {
    for page in site_map.web_pages() {
        writeln!(out, "(webpage) {}", page.url())?;

        writeln!(out, "    Links")?;
        for link in site_map.references(page).filter(|r| is_link(r)) {
            writeln!(out, "        (webpage) {}", link.url())?;
        }

        writeln!(out, "    Assets")?;
        for asset in site_map.references(page).filter(|r| is_asset(r)) {
            writeln!(out, "        ({}) {}", asset.content_type(), asset.url())?;
        }
    }
    Ok(())
}

/// Renders the report into a string
pub fn format_report(site_map: &SiteMap) -> String {
    let mut buffer = Vec::new();
    // Writing into a Vec cannot fail
    let _ = write_report(site_map, &mut buffer);
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Prints the report to stdout
pub fn print_report(site_map: &SiteMap) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(site_map, &mut out)?;
    out.flush()
}

pub(crate) fn is_link(resource: &Resource) -> bool {
    resource.is_fetched() && resource.is_web_page()
}

pub(crate) fn is_asset(resource: &Resource) -> bool {
    resource.is_fetched() && !resource.is_web_page()
}
