//! In-memory storage for a single crawl run
//!
//! This module provides:
//! - `Resource`: one fetched or attempted URL and its outgoing references
//! - `Registry`: the shared URL → resource map with atomic get-or-create semantics
//! - `SiteMap`: the frozen result handed to reporting
//!
//! Nothing here outlives the crawl that created it; each crawl builds a fresh registry.

mod registry;
mod resource;
mod site_map;

pub use registry::Registry;
pub use resource::{Resource, ResourceDetails, ResourceId};
pub use site_map::SiteMap;
