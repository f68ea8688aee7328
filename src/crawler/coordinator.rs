//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the recursive process-and-fan-out engine. For each URL it:
//! - Drops URLs outside the root's host
//! - Claims the URL in the shared registry (or returns the resource someone else claimed)
//! - Fetches the URL and extracts references from HTML pages
//! - Starts one task per reference, joins them all, and attaches the results
//!
//! Cycles and repeated links terminate through the registry alone: whichever task registers a
//! URL first owns it, every later discoverer just links to it.

use crate::config::{validate, Config};
use crate::crawler::extractor::extract_references;
use crate::crawler::fetcher::Fetcher;
use crate::state::CrawlState;
use crate::storage::{Registry, ResourceDetails, ResourceId, SiteMap};
use crate::url::{parse_root_url, HostScope};
use crate::FetchError;
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// Crawl context: root URL, host scope and fetch configuration
///
/// A `Crawler` can run any number of crawls; each call to [`Crawler::crawl`] starts from an
/// empty registry.
#[derive(Debug, Clone)]
pub struct Crawler {
    root: Url,
    scope: HostScope,
    fetcher: Fetcher,
    max_concurrent_fetches: Option<usize>,
}

impl Crawler {
    /// Creates a crawler for the given root URL
    ///
    /// # Arguments
    ///
    /// * `root` - The URL to start from; its host defines the crawl scope
    /// * `config` - The crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to crawl
    /// * `Err(SiteGraphError)` - Malformed root URL, invalid configuration, or HTTP client failure
    pub fn new(root: &str, config: &Config) -> crate::Result<Self> {
        validate(config)?;
        let root = parse_root_url(root)?;
        let fetcher = Fetcher::new(config)?;

        Ok(Self {
            scope: HostScope::from_root(&root),
            root,
            fetcher,
            max_concurrent_fetches: config.crawler.max_concurrent_fetches,
        })
    }

    pub fn root(&self) -> &Url {
        &self.root
    }

    pub fn scope(&self) -> &HostScope {
        &self.scope
    }

    /// Crawls everything reachable on the root's host and returns the resulting graph
    ///
    /// Individual fetch failures are recorded on their resources; the crawl itself cannot fail.
    pub async fn crawl(&self) -> SiteMap {
        let session = Arc::new(CrawlSession {
            scope: self.scope.clone(),
            fetcher: self.fetcher.clone(),
            registry: Registry::new(),
            gate: self.max_concurrent_fetches.map(Semaphore::new),
        });

        tracing::info!("Starting crawl of {}", self.root);
        let start_time = Instant::now();

        let entry = Arc::clone(&session).process(self.root.clone()).await;
        let site_map = session.registry.snapshot(self.root.clone(), entry);

        tracing::info!(
            "Crawl completed: {} resources in {:?}",
            site_map.len(),
            start_time.elapsed()
        );

        site_map
    }
}

/// State shared by every task of one crawl
struct CrawlSession {
    scope: HostScope,
    fetcher: Fetcher,
    registry: Registry,
    gate: Option<Semaphore>,
}

impl CrawlSession {
    /// Processes one URL and everything reachable from it
    ///
    /// Returns `None` for URLs outside the host scope, otherwise the id of the URL's resource.
    /// When this task owns the URL, the resource is fully populated before the id is returned.
    fn process(self: Arc<Self>, url: Url) -> BoxFuture<'static, Option<ResourceId>> {
        async move {
            let mut state = CrawlState::Unvisited;

            if !self.scope.contains(&url) {
                advance(&url, &mut state, CrawlState::Skipped);
                return None;
            }

            let (resource, already_visited) = self.registry.visit_or_create(&url);
            if already_visited {
                return Some(resource.id());
            }
            advance(&url, &mut state, CrawlState::Registered);

            advance(&url, &mut state, CrawlState::Fetching);
            let (mut details, references) = match self.fetch_and_extract(&url).await {
                Ok(fetched) => fetched,
                Err(error) => {
                    tracing::warn!("Failed to fetch {}: {}", url, error);
                    advance(&url, &mut state, CrawlState::Failed);
                    resource.complete(ResourceDetails::failed(error));
                    return Some(resource.id());
                }
            };
            advance(&url, &mut state, CrawlState::Parsed);

            let mut children = JoinSet::new();
            for reference in references {
                children.spawn(Arc::clone(&self).process(reference));
            }
            advance(&url, &mut state, CrawlState::Dispatched);

            while let Some(joined) = children.join_next().await {
                match joined {
                    Ok(Some(child)) => details.references.push(child),
                    Ok(None) => {}
                    Err(e) => tracing::error!("Reference task of {} failed: {}", url, e),
                }
            }
            advance(&url, &mut state, CrawlState::Joined);

            tracing::debug!(
                "Processed {} ({} references)",
                url,
                details.references.len()
            );
            resource.complete(details);
            Some(resource.id())
        }
        .boxed()
    }

    /// Fetches `url` and, for HTML pages, extracts its references
    ///
    /// The fetch gate, when configured, is held only for this step so that a parent waiting on
    /// its children never holds a permit.
    async fn fetch_and_extract(
        &self,
        url: &Url,
    ) -> Result<(ResourceDetails, Vec<Url>), FetchError> {
        let _permit = match &self.gate {
            Some(gate) => gate.acquire().await.ok(),
            None => None,
        };

        let response = self.fetcher.fetch(url).await?;
        let details = ResourceDetails {
            content_type: response.content_type().to_string(),
            status_code: Some(response.status_code()),
            last_modified: response.last_modified().map(str::to_string),
            ..ResourceDetails::default()
        };

        if !response.is_html() {
            tracing::debug!("{} is an asset ({})", url, details.content_type);
            return Ok((details, Vec::new()));
        }

        let body = response.read_body().await;
        if let Some(e) = &body.truncation {
            tracing::warn!(
                "Error reading HTML document {} after {} bytes: {}",
                url,
                body.bytes.len(),
                e
            );
        }

        let references = extract_references(&body.text(), url);
        Ok((details, references))
    }
}

fn advance(url: &Url, state: &mut CrawlState, next: CrawlState) {
    debug_assert!(
        state.can_transition_to(next),
        "illegal transition {} -> {} for {}",
        state,
        next,
        url
    );
    tracing::trace!("{}: {} -> {}", url, state, next);
    *state = next;
}
