//! Resource fetchers
//!
//! Design: the measurer only needs a body length and a content type per URL.
//! The [`Fetcher`] trait keeps the transport swappable; [`HttpFetcher`] is the
//! default, backed by reqwest.

mod http;

pub use http::HttpFetcher;

use crate::error::SizeError;
use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

/// Media types whose documents are scanned for linked assets
const HTML_MEDIA_TYPES: &[&str] = &["text/html", "application/xhtml+xml"];

/// Trait for resource fetchers
///
/// A fetch reads the whole body before returning. Implementations must not
/// fail on non-2xx statuses: the body of an error page is still transferred
/// and still counts.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Identifier for logging
    fn name(&self) -> &'static str;

    /// Fetch `url` and read its full body
    async fn fetch(&self, url: &Url) -> Result<FetchedResource, SizeError>;
}

/// A fetched resource with its body fully read
#[derive(Debug, Clone)]
pub struct FetchedResource {
    /// The fetched URL
    pub url: Url,
    /// HTTP status code
    pub status_code: u16,
    /// Content-Type header value
    pub content_type: Option<String>,
    /// Raw body
    pub body: Bytes,
}

impl FetchedResource {
    /// Body length in bytes
    pub fn size(&self) -> u64 {
        self.body.len() as u64
    }

    /// Whether the declared content type is HTML
    pub fn is_html(&self) -> bool {
        self.content_type.as_deref().is_some_and(is_html_content_type)
    }
}

/// Check a Content-Type value for an HTML media type, ignoring parameters
pub fn is_html_content_type(content_type: &str) -> bool {
    let media_type = content_type.split(';').next().unwrap_or_default().trim();
    HTML_MEDIA_TYPES
        .iter()
        .any(|html| media_type.eq_ignore_ascii_case(html))
}
