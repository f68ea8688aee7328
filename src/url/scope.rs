use url::Url;

/// The set of URLs a crawl is allowed to visit: everything on the root's hostname
///
/// Hostnames are compared without the port, so `http://site.test:8080/` and
/// `https://site.test/` are in the same scope. URLs without a host (`mailto:`, `data:`,
/// `javascript:`) are never in scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostScope {
    host: String,
}

impl HostScope {
    /// Creates the scope defined by a root URL
    pub fn from_root(root: &Url) -> Self {
        Self {
            host: root.host_str().unwrap_or_default().to_string(),
        }
    }

    /// Returns the hostname that defines this scope
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns true if the URL's hostname matches the root's hostname
    ///
    /// # Examples
    ///
    /// ```
    /// use sitegraph::url::HostScope;
    /// use url::Url;
    ///
    /// let scope = HostScope::from_root(&Url::parse("https://site.test/").unwrap());
    /// assert!(scope.contains(&Url::parse("https://site.test/about").unwrap()));
    /// assert!(!scope.contains(&Url::parse("https://external.test/").unwrap()));
    /// ```
    pub fn contains(&self, url: &Url) -> bool {
        match url.host_str() {
            Some(host) => !self.host.is_empty() && host == self.host,
            None => false,
        }
    }
}
