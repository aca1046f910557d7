//! Recursive page measurement
//!
//! Each call fetches one resource and records its byte length. HTML pages are
//! scanned for linked assets, every link is measured recursively, and only the
//! child's total is recorded under the child's URL (its own breakdown is
//! flattened away). The first error aborts the whole measurement.

use crate::client::MeasureOptions;
use crate::error::SizeError;
use crate::fetchers::{Fetcher, HttpFetcher};
use crate::report::SizeReport;
use crate::resolve::{is_http, resolve_link};
use crate::rules::{TagRule, TagRules};
use crate::scan;
use futures::future::BoxFuture;
use futures::{stream, StreamExt, TryStreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Builder for [`PageSizer`]
#[derive(Default)]
pub struct PageSizerBuilder {
    fetcher: Option<Arc<dyn Fetcher>>,
    options: MeasureOptions,
}

impl PageSizerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all options at once
    pub fn options(mut self, options: MeasureOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the rule set
    pub fn rules(mut self, rules: TagRules) -> Self {
        self.options.rules = rules;
        self
    }

    /// Add one rule to the current rule set
    pub fn rule(mut self, rule: TagRule) -> Self {
        self.options.rules = self.options.rules.with_rule(rule);
        self
    }

    /// Do not scan pages at depth `depth` or deeper (root is 0)
    ///
    /// Those pages are still fetched and measured. `max_depth(0)` disables
    /// scanning entirely, so only the root is measured.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.options.max_depth = Some(depth);
        self
    }

    /// Measure up to `limit` sibling links at once (0 is treated as 1)
    pub fn concurrency(mut self, limit: usize) -> Self {
        self.options.concurrency = limit.max(1);
        self
    }

    /// Use a custom fetcher instead of [`HttpFetcher`]
    pub fn fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn build(self) -> Result<PageSizer, SizeError> {
        let fetcher = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(HttpFetcher::new()?),
        };
        Ok(PageSizer {
            fetcher,
            options: self.options,
        })
    }
}

/// Measures pages with a fixed fetcher and options
#[derive(Clone)]
pub struct PageSizer {
    fetcher: Arc<dyn Fetcher>,
    options: MeasureOptions,
}

impl PageSizer {
    pub fn builder() -> PageSizerBuilder {
        PageSizerBuilder::new()
    }

    /// Sizer with default options and an [`HttpFetcher`]
    pub fn new() -> Result<Self, SizeError> {
        Self::builder().build()
    }

    pub fn options(&self) -> &MeasureOptions {
        &self.options
    }

    /// Measure `src_url` and, if it is HTML, every asset it links to
    ///
    /// The page itself is recorded under the parsed form of `src_url`, so
    /// `http://host` becomes `http://host/`.
    pub async fn measure(&self, src_url: &str) -> Result<SizeReport, SizeError> {
        let url = Url::parse(src_url).map_err(|source| SizeError::InvalidUrl {
            url: src_url.to_string(),
            source,
        })?;
        if !is_http(&url) {
            return Err(SizeError::UnsupportedScheme {
                url: src_url.to_string(),
            });
        }

        let report = self
            .measure_page(url.to_string(), url, Traversal::default())
            .await?;
        info!(
            url = src_url,
            resources = report.len(),
            total = report.total(),
            "Measured page"
        );
        Ok(report)
    }

    fn measure_page(
        &self,
        key: String,
        url: Url,
        traversal: Traversal,
    ) -> BoxFuture<'_, Result<SizeReport, SizeError>> {
        Box::pin(async move {
            debug!(fetcher = self.fetcher.name(), url = %url, depth = traversal.depth, "Measuring");
            let resource = self.fetcher.fetch(&url).await?;

            let mut report = SizeReport::new();
            report.insert(key, resource.size());

            if !resource.is_html() || !self.should_scan(&url, &traversal) {
                return Ok(report);
            }

            let raw_links = scan::extract_all(&resource.body, &self.options.rules)
                .map_err(|e| SizeError::page(url.as_str(), e))?;
            let mut links = Vec::with_capacity(raw_links.len());
            for raw in &raw_links {
                let resolved =
                    resolve_link(&url, raw).map_err(|e| SizeError::page(url.as_str(), e))?;
                if let Some(link) = resolved {
                    debug!(page = %url, raw = raw.as_str(), link = %link, "Resolved link");
                    links.push(link);
                }
            }

            let child = traversal.descend(&url);
            let entries: Vec<(String, u64)> = stream::iter(links)
                .map(|link| self.measure_link(link, child.clone()))
                .buffered(self.options.concurrency.max(1))
                .try_collect()
                .await?;

            for (link, size) in entries {
                report.insert(link, size);
            }
            Ok(report)
        })
    }

    /// Measure one link and flatten it to `(url, total)`
    async fn measure_link(
        &self,
        link: Url,
        traversal: Traversal,
    ) -> Result<(String, u64), SizeError> {
        let key = link.to_string();
        let report = self
            .measure_page(key.clone(), link, traversal)
            .await
            .map_err(|e| SizeError::link(key.as_str(), e))?;
        Ok((key, report.total()))
    }

    fn should_scan(&self, url: &Url, traversal: &Traversal) -> bool {
        if traversal.is_ancestor(url) {
            warn!(url = %url, "Link cycle detected, measuring without scanning");
            return false;
        }
        if let Some(max_depth) = self.options.max_depth {
            if traversal.depth >= max_depth {
                debug!(url = %url, max_depth, "Depth limit reached, not scanning");
                return false;
            }
        }
        true
    }
}

/// Per-branch traversal context
///
/// Carries the pages above the current one and the current depth. Each
/// branch owns its copy, so siblings never see each other's pages.
#[derive(Debug, Clone, Default)]
struct Traversal {
    ancestors: HashSet<String>,
    depth: usize,
}

impl Traversal {
    fn descend(&self, page: &Url) -> Self {
        let mut ancestors = self.ancestors.clone();
        ancestors.insert(page.to_string());
        Self {
            ancestors,
            depth: self.depth + 1,
        }
    }

    fn is_ancestor(&self, url: &Url) -> bool {
        self.ancestors.contains(url.as_str())
    }
}
