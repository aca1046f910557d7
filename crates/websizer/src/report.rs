//! Size report: measured resources keyed by URL

use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Byte sizes of measured resources, keyed by fully resolved URL
///
/// A report is assembled by the measurer and not modified afterwards. Each
/// entry is either the measured page itself or one link traversed from it,
/// carrying that link's aggregate size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeReport {
    resources: BTreeMap<String, u64>,
}

impl SizeReport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, url: impl Into<String>, size: u64) {
        self.resources.insert(url.into(), size);
    }

    /// Sum of every entry
    pub fn total(&self) -> u64 {
        self.resources.values().sum()
    }

    /// Size recorded for `url`, if any
    pub fn get(&self, url: &str) -> Option<u64> {
        self.resources.get(url).copied()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Entries sorted by URL
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.resources.iter().map(|(url, size)| (url.as_str(), *size))
    }

    /// Total expressed in megabytes (10^6 bytes)
    pub fn total_megabytes(&self) -> f64 {
        self.total() as f64 / 1_000_000.0
    }
}

impl FromIterator<(String, u64)> for SizeReport {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self {
            resources: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for SizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "total page size: {:.6} MB", self.total_megabytes())?;
        for (url, size) in self.iter() {
            writeln!(f, "{size:>12} {url:?}")?;
        }
        Ok(())
    }
}

impl Serialize for SizeReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SizeReport", 2)?;
        state.serialize_field("total", &self.total())?;
        state.serialize_field("resources", &self.resources)?;
        state.end()
    }
}
