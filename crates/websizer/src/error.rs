//! Error types for websizer

use thiserror::Error;

/// Errors that can occur while measuring a page
#[derive(Debug, Error)]
pub enum SizeError {
    /// URL could not be parsed
    #[error("Invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// URL parsed but cannot be fetched over HTTP
    #[error("Invalid URL {url:?}: must start with http:// or https://")]
    UnsupportedScheme { url: String },

    /// Failed to build HTTP client
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// Request could not be sent or the connection failed
    #[error("Failed to fetch {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Response body could not be fully read
    #[error("Failed to read body of {url}: {source}")]
    Read {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Markup scanner failure (not malformed markup, which is tolerated)
    #[error("Failed to extract <{tag} {attribute}>: {reason}")]
    Parse {
        tag: String,
        attribute: String,
        reason: String,
    },

    /// Scanning or link resolution failed on a fetched page
    #[error("Failed to scan page {url}: {source}")]
    Page {
        url: String,
        #[source]
        source: Box<SizeError>,
    },

    /// A linked resource failed; wraps the failure of that child measurement
    #[error("Failed to measure link {url}: {source}")]
    Link {
        url: String,
        #[source]
        source: Box<SizeError>,
    },
}

impl SizeError {
    /// Wrap a child failure with the URL of the link that led to it
    pub fn link(url: impl Into<String>, source: SizeError) -> Self {
        SizeError::Link {
            url: url.into(),
            source: Box::new(source),
        }
    }

    /// Wrap a scan or resolution failure with the page it happened on
    pub fn page(url: impl Into<String>, source: SizeError) -> Self {
        SizeError::Page {
            url: url.into(),
            source: Box::new(source),
        }
    }

    /// The deepest cause, skipping every [`SizeError::Link`] and
    /// [`SizeError::Page`] layer
    pub fn innermost(&self) -> &SizeError {
        let mut current = self;
        while let SizeError::Link { source, .. } | SizeError::Page { source, .. } = current {
            current = source;
        }
        current
    }

    /// URLs of the links traversed from the root down to the failing resource
    pub fn link_chain(&self) -> Vec<&str> {
        let mut chain = Vec::new();
        let mut current = self;
        while let SizeError::Link { url, source } = current {
            chain.push(url.as_str());
            current = source;
        }
        chain
    }
}
