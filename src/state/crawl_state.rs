//! Crawl state definitions for a single URL
//!
//! A URL moves through these states in order while its owning task processes it. A URL outside
//! the host scope is `Skipped` and never enters the sequence.

use std::fmt;

/// Represents where a URL is in its crawl lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    // ===== Active States =====
    /// Not yet seen by the registry
    Unvisited,

    /// Registered in the registry; the owning task holds it
    Registered,

    /// The request is in flight
    Fetching,

    /// Fetched and, for HTML pages, scanned for references
    Parsed,

    /// Child tasks have been started for every reference
    Dispatched,

    // ===== Terminal States =====
    /// The fetch failed; the error is recorded on the resource
    Failed,

    /// Every child has completed and the references are attached
    Joined,

    /// Outside the host scope; never registered or fetched
    Skipped,
}

impl CrawlState {
    /// Returns true if this is a terminal state (no further processing happens)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Failed | Self::Joined | Self::Skipped)
    }

    /// Returns true if the URL is still being worked on
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if the URL was fetched without a transport error
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Joined)
    }

    /// Returns true if moving from this state to `next` is a legal step
    pub fn can_transition_to(&self, next: CrawlState) -> bool {
        matches!(
            (self, next),
            (Self::Unvisited, Self::Registered)
                | (Self::Unvisited, Self::Skipped)
                | (Self::Registered, Self::Fetching)
                | (Self::Fetching, Self::Failed)
                | (Self::Fetching, Self::Parsed)
                | (Self::Parsed, Self::Dispatched)
                | (Self::Dispatched, Self::Joined)
        )
    }

    /// Returns a short lowercase name for logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unvisited => "unvisited",
            Self::Registered => "registered",
            Self::Fetching => "fetching",
            Self::Parsed => "parsed",
            Self::Dispatched => "dispatched",
            Self::Failed => "failed",
            Self::Joined => "joined",
            Self::Skipped => "skipped",
        }
    }

    /// Returns all possible crawl states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Unvisited,
            Self::Registered,
            Self::Fetching,
            Self::Parsed,
            Self::Dispatched,
            Self::Failed,
            Self::Joined,
            Self::Skipped,
        ]
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
