//! URL handling module for Sitegraph
//!
//! This module provides reference resolution, root URL validation and the host scope that
//! decides which discovered URLs a crawl follows.

mod resolve;
mod scope;

// Re-export main functions
pub use resolve::{parse_root_url, resolve_reference};
pub use scope::HostScope;
