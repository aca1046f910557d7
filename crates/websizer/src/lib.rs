//! websizer - measure the transfer weight of a web page
//!
//! Fetches a resource over HTTP and, when it is an HTML document, measures
//! every asset its markup links to (stylesheets, scripts, favicons, images,
//! poster images), recursively. The result is a [`SizeReport`] mapping each
//! traversed URL to its byte size.
//!
//! ## Measurement
//!
//! - Relative links are resolved against the linking page's origin with a
//!   root-anchored, path-cleaned path (see [`resolve`]).
//! - Each link contributes its *total* under its own URL; a linked page's own
//!   breakdown is not propagated to its parent.
//! - The first failure anywhere aborts the measurement.
//!
//! ```no_run
//! # async fn run() -> Result<(), websizer::SizeError> {
//! let report = websizer::measure("https://example.com/").await?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

pub mod client;
mod error;
pub mod fetchers;
mod measure;
mod report;
pub mod resolve;
mod rules;
pub mod scan;

pub use client::{measure, measure_with_options, MeasureOptions};
pub use error::SizeError;
pub use fetchers::{FetchedResource, Fetcher, HttpFetcher};
pub use measure::{PageSizer, PageSizerBuilder};
pub use report::SizeReport;
pub use rules::{TagRule, TagRules};
