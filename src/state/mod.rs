//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: the lifecycle of a single URL (registered, fetching, parsed, dispatched, ...)

mod crawl_state;

pub use crawl_state::CrawlState;
