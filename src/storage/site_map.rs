//! The finished graph of one crawl

use crate::storage::resource::{Resource, ResourceId};
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

/// Every resource reached from a root URL, with their references
///
/// Resources are kept in registration order. References may form cycles; follow them with
/// [`SiteMap::references`] rather than by recursion without a visited set.
#[derive(Debug)]
pub struct SiteMap {
    root: Url,
    entry: Option<ResourceId>,
    resources: Vec<Arc<Resource>>,
    index: HashMap<String, ResourceId>,
}

impl SiteMap {
    pub(crate) fn new(
        root: Url,
        entry: Option<ResourceId>,
        resources: Vec<Arc<Resource>>,
        index: HashMap<String, ResourceId>,
    ) -> Self {
        Self {
            root,
            entry,
            resources,
            index,
        }
    }

    /// The URL the crawl started from
    pub fn root(&self) -> &Url {
        &self.root
    }

    /// The resource for the root URL, if the root was in scope
    pub fn entry(&self) -> Option<&Resource> {
        self.entry.and_then(|id| self.get(id))
    }

    pub fn get(&self, id: ResourceId) -> Option<&Resource> {
        self.resources.get(id.index()).map(Arc::as_ref)
    }

    /// Looks a resource up by its canonical URL string
    pub fn lookup(&self, url: &str) -> Option<&Resource> {
        self.index.get(url).and_then(|&id| self.get(id))
    }

    pub fn contains(&self, url: &str) -> bool {
        self.index.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Iterates over all resources in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter().map(Arc::as_ref)
    }

    /// Iterates over the resources `resource` references, in stored order
    pub fn references<'a>(&'a self, resource: &'a Resource) -> impl Iterator<Item = &'a Resource> {
        resource.references().iter().filter_map(|&id| self.get(id))
    }

    /// Successfully fetched HTML pages, sorted by URL
    pub fn web_pages(&self) -> Vec<&Resource> {
        let mut pages: Vec<&Resource> = self
            .iter()
            .filter(|r| r.is_fetched() && r.is_web_page())
            .collect();
        pages.sort_by(|a, b| a.url().as_str().cmp(b.url().as_str()));
        pages
    }
}
