//! Entry points for measuring pages
//!
//! The recursive measurement itself lives in [`PageSizer`](crate::PageSizer);
//! these helpers build one with an [`HttpFetcher`](crate::HttpFetcher).

use crate::error::SizeError;
use crate::measure::PageSizer;
use crate::report::SizeReport;
use crate::rules::TagRules;

/// Measurement options
#[derive(Debug, Clone)]
pub struct MeasureOptions {
    /// Which tag/attribute pairs count as linked assets
    pub rules: TagRules,
    /// Pages at this depth or deeper are not scanned (`None` = unbounded)
    ///
    /// The root page is depth 0, so `Some(0)` disables scanning. Pages at or
    /// past the limit are still fetched and measured as leaves.
    pub max_depth: Option<usize>,
    /// Maximum number of sibling links measured at once (1 = sequential)
    pub concurrency: usize,
}

impl Default for MeasureOptions {
    fn default() -> Self {
        Self {
            rules: TagRules::default(),
            max_depth: None,
            concurrency: 1,
        }
    }
}

/// Measure a page and its linked assets with default options
///
/// For custom options, use [`measure_with_options`].
pub async fn measure(src_url: &str) -> Result<SizeReport, SizeError> {
    measure_with_options(src_url, MeasureOptions::default()).await
}

/// Measure a page and its linked assets with custom options
///
/// For a custom fetcher, use [`PageSizer::builder`] directly.
pub async fn measure_with_options(
    src_url: &str,
    options: MeasureOptions,
) -> Result<SizeReport, SizeError> {
    PageSizer::builder()
        .options(options)
        .build()?
        .measure(src_url)
        .await
}
