//! Shared registry of every resource seen during one crawl

use crate::storage::resource::{Resource, ResourceId};
use crate::storage::site_map::SiteMap;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use url::Url;

/// Mapping from canonical URL to resource, guarded by a single lock
///
/// The registry owns every resource in an arena; ids index into it. The lock is held only for
/// the lookup-or-insert, never across a fetch.
#[derive(Debug, Default)]
pub struct Registry {
    inner: Mutex<RegistryInner>,
}

#[derive(Debug, Default)]
struct RegistryInner {
    index: HashMap<String, ResourceId>,
    resources: Vec<Arc<Resource>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the resource for `url`, creating and registering it if needed
    ///
    /// The boolean is `false` for exactly one caller per URL: the one that created the resource
    /// and is now responsible for fetching it. Every other caller, concurrent or later, gets the
    /// same resource with `true`.
    pub fn visit_or_create(&self, url: &Url) -> (Arc<Resource>, bool) {
        let mut guard = self.lock();
        let inner = &mut *guard;

        if let Some(&id) = inner.index.get(url.as_str()) {
            return (Arc::clone(&inner.resources[id.index()]), true);
        }

        let id = ResourceId::new(inner.resources.len());
        let resource = Arc::new(Resource::new(id, url.clone()));
        inner.resources.push(Arc::clone(&resource));
        inner.index.insert(url.as_str().to_string(), id);

        (resource, false)
    }

    pub fn get(&self, id: ResourceId) -> Option<Arc<Resource>> {
        self.lock().resources.get(id.index()).cloned()
    }

    /// Returns true if a resource is registered under this exact URL string
    pub fn contains(&self, url: &str) -> bool {
        self.lock().index.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.lock().resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Freezes the current contents into a `SiteMap`
    pub fn snapshot(&self, root: Url, entry: Option<ResourceId>) -> SiteMap {
        let inner = self.lock();
        SiteMap::new(root, entry, inner.resources.clone(), inner.index.clone())
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        // Poisoning is ignored: an orphaned arena slot is the worst a panic can leave behind
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
