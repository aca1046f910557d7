//! HTTP fetcher
//!
//! One plain GET per resource: no custom headers, no timeout, no retry.
//! Redirects follow the reqwest default policy.

use crate::error::SizeError;
use crate::fetchers::{FetchedResource, Fetcher};
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};
use url::Url;

/// HTTP/HTTPS fetcher backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with a default client
    pub fn new() -> Result<Self, SizeError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(SizeError::ClientBuild)?;
        Ok(Self::with_client(client))
    }

    /// Create a fetcher around a preconfigured client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch(&self, url: &Url) -> Result<FetchedResource, SizeError> {
        debug!(url = %url, "Fetching");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| SizeError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                url = %url,
                status = status.as_u16(),
                "Non-success status, measuring body anyway"
            );
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = read_body(response)
            .await
            .map_err(|source| SizeError::Read {
                url: url.to_string(),
                source,
            })?;

        debug!(url = %url, size = body.len(), content_type = ?content_type, "Fetched");

        Ok(FetchedResource {
            url: url.clone(),
            status_code: status.as_u16(),
            content_type,
            body,
        })
    }
}

/// Read the whole response body into memory
///
/// Consumes the response, so the connection is released on every return path.
async fn read_body(response: reqwest::Response) -> Result<Bytes, reqwest::Error> {
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        body.extend_from_slice(&chunk?);
    }
    Ok(Bytes::from(body))
}
