use crate::{UrlError, UrlResult};
use url::Url;

/// Resolves a raw attribute value against the URL of the document it came from
///
/// The value is trimmed and parsed as a URL reference. Absolute references are returned as-is;
/// relative ones are resolved against `base` using standard URL resolution (scheme and host come
/// from the base, dot segments are collapsed, query and fragment come from the reference).
///
/// The result is not normalized any further: its string form is the canonical key.
///
/// # Examples
///
/// ```
/// use sitegraph::url::resolve_reference;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/dir/page.html").unwrap();
/// let url = resolve_reference(&base, "../assets/logo.png").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/assets/logo.png");
/// ```
pub fn resolve_reference(base: &Url, raw: &str) -> UrlResult<Url> {
    let trimmed = raw.trim();
    base.join(trimmed).map_err(|source| UrlError::Parse {
        input: trimmed.to_string(),
        source,
    })
}

/// Parses and validates the URL a crawl starts from
///
/// The root must be absolute, use `http` or `https`, and carry a host, since the host defines
/// the crawl's scope.
pub fn parse_root_url(input: &str) -> UrlResult<Url> {
    let trimmed = input.trim();
    let url = Url::parse(trimmed).map_err(|source| UrlError::Parse {
        input: trimmed.to_string(),
        source,
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost(url.to_string()));
    }

    Ok(url)
}
