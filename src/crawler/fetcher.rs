//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent and timeout
//! - GET requests returning status, headers and a body handle
//! - Incremental body reads that keep whatever arrived before an error
//! - Error classification
//!
//! There are no retries: one failure is final for that URL within a crawl.

use crate::config::Config;
use crate::FetchError;
use reqwest::header::{HeaderMap, CONTENT_TYPE, LAST_MODIFIED};
use reqwest::{Client, Response};
use std::borrow::Cow;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// The request timeout covers the whole exchange (connect, headers and body).
///
/// # Example
///
/// ```
/// use sitegraph::config::Config;
/// use sitegraph::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(config.crawler.request_timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Performs GET requests for the crawler
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a fetcher with a client built from `config`
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Sends a single GET request
    ///
    /// Any response, whatever its status, is a success; only transport failures and timeouts
    /// are errors.
    pub async fn fetch(&self, url: &Url) -> Result<FetchedResponse, FetchError> {
        match self.client.get(url.clone()).send().await {
            Ok(response) => Ok(FetchedResponse::new(response)),
            Err(e) => Err(FetchError::from_reqwest(url.as_str(), e)),
        }
    }
}

/// A response whose headers have arrived and whose body has not been read yet
///
/// Dropping it without calling [`FetchedResponse::read_body`] releases the connection.
#[derive(Debug)]
pub struct FetchedResponse {
    status_code: u16,
    content_type: String,
    last_modified: Option<String>,
    response: Response,
}

impl FetchedResponse {
    fn new(response: Response) -> Self {
        let headers = response.headers();
        let content_type = header_value(headers, CONTENT_TYPE.as_str()).unwrap_or_default();
        let last_modified = header_value(headers, LAST_MODIFIED.as_str());

        Self {
            status_code: response.status().as_u16(),
            content_type,
            last_modified,
            response,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Content-Type header value, empty if the server sent none
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn last_modified(&self) -> Option<&str> {
        self.last_modified.as_deref()
    }

    /// Returns true if the Content-Type marks the body as an HTML document
    pub fn is_html(&self) -> bool {
        self.content_type.contains("text/html")
    }

    /// Reads the body chunk by chunk until the end of the stream or the first error
    pub async fn read_body(self) -> Body {
        let mut response = self.response;
        let mut bytes = Vec::new();

        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => bytes.extend_from_slice(&chunk),
                Ok(None) => {
                    return Body {
                        bytes,
                        truncation: None,
                    }
                }
                Err(e) => {
                    return Body {
                        bytes,
                        truncation: Some(e),
                    }
                }
            }
        }
    }
}

/// A response body, possibly cut short by a read error
#[derive(Debug)]
pub struct Body {
    /// Every byte received before the stream ended or failed
    pub bytes: Vec<u8>,

    /// The error that ended the stream early, if any
    pub truncation: Option<reqwest::Error>,
}

impl Body {
    /// Returns true if the stream failed before its end
    pub fn is_truncated(&self) -> bool {
        self.truncation.is_some()
    }

    /// Decodes the body as UTF-8, replacing invalid sequences
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
