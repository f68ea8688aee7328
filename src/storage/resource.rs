//! Resource nodes of the crawl graph

use crate::state::CrawlState;
use crate::FetchError;
use std::fmt;
use std::sync::OnceLock;
use url::Url;

/// Index of a resource in the registry arena
///
/// References between resources are stored as ids, so cycles and shared targets never create a
/// second ownership path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(usize);

impl ResourceId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the arena index (registration order, starting at zero)
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What the owning task learned about a resource
#[derive(Debug, Default)]
pub struct ResourceDetails {
    /// Content-Type header value, empty if absent
    pub content_type: String,

    /// HTTP status code of the response
    pub status_code: Option<u16>,

    /// Last-Modified header value
    pub last_modified: Option<String>,

    /// Present iff the fetch failed
    pub error: Option<FetchError>,

    /// Same-host resources this one references, in completion order
    pub references: Vec<ResourceId>,
}

impl ResourceDetails {
    /// Details for a resource whose fetch failed
    pub fn failed(error: FetchError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }
}

/// One fetched or attempted URL
///
/// A resource is created empty when the registry first sees its URL. Its details are written
/// exactly once, by the task that owns it, and only read afterwards.
#[derive(Debug)]
pub struct Resource {
    id: ResourceId,
    url: Url,
    details: OnceLock<ResourceDetails>,
}

impl Resource {
    pub(crate) fn new(id: ResourceId, url: Url) -> Self {
        Self {
            id,
            url,
            details: OnceLock::new(),
        }
    }

    /// Publishes the details of this resource
    ///
    /// Returns false if the details were already published; the first write wins.
    pub(crate) fn complete(&self, details: ResourceDetails) -> bool {
        self.details.set(details).is_ok()
    }

    pub fn id(&self) -> ResourceId {
        self.id
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Content-Type of the response; empty until the fetch completes
    pub fn content_type(&self) -> &str {
        self.details
            .get()
            .map(|d| d.content_type.as_str())
            .unwrap_or("")
    }

    pub fn status_code(&self) -> Option<u16> {
        self.details.get().and_then(|d| d.status_code)
    }

    pub fn last_modified(&self) -> Option<&str> {
        self.details.get().and_then(|d| d.last_modified.as_deref())
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.details.get().and_then(|d| d.error.as_ref())
    }

    pub fn references(&self) -> &[ResourceId] {
        self.details
            .get()
            .map(|d| d.references.as_slice())
            .unwrap_or(&[])
    }

    /// Returns true once the owning task has published the details
    pub fn is_complete(&self) -> bool {
        self.details.get().is_some()
    }

    /// Returns true if the content type marks this resource as an HTML document
    pub fn is_web_page(&self) -> bool {
        self.content_type().contains("text/html")
    }

    /// Returns true if this resource was fetched without a transport error
    pub fn is_fetched(&self) -> bool {
        self.is_complete() && self.error().is_none()
    }

    /// Returns the lifecycle state visible from outside the owning task
    pub fn state(&self) -> CrawlState {
        match self.details.get() {
            None => CrawlState::Registered,
            Some(details) if details.error.is_some() => CrawlState::Failed,
            Some(_) => CrawlState::Joined,
        }
    }
}
