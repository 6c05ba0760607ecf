//! License frequency table and license-expression classification.
//!
//! Expression detection uses the `spdx` crate in lax mode, so `MIT/Apache-2.0`
//! counts as a composite just like `MIT OR Apache-2.0`.

use crate::model::{Package, SbomFile, NOASSERTION};
use serde::Serialize;
use std::collections::BTreeMap;

/// Placeholder shown when an element carries no concluded license.
pub const NOT_KNOWN: &str = "NOT KNOWN";

/// Concluded license for display and counting, with the `NOT KNOWN` fallback.
#[must_use]
pub fn concluded_license(license: Option<&str>) -> &str {
    license.unwrap_or(NOT_KNOWN)
}

/// Occurrence count per license string, iterated in lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LicenseFrequency {
    counts: BTreeMap<String, usize>,
}

impl LicenseFrequency {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table from every file's and package's concluded license.
    #[must_use]
    pub fn from_inventory(files: &[SbomFile], packages: &[Package]) -> Self {
        let mut frequency = Self::new();
        for file in files {
            frequency.record(concluded_license(file.license_concluded.as_deref()));
        }
        for package in packages {
            frequency.record(concluded_license(package.license_concluded.as_deref()));
        }
        frequency
    }

    /// Count one occurrence of `license`.
    pub fn record(&mut self, license: &str) {
        *self.counts.entry(license.to_string()).or_insert(0) += 1;
    }

    /// Count for a single license string
    #[must_use]
    pub fn get(&self, license: &str) -> usize {
        self.counts.get(license).copied().unwrap_or(0)
    }

    /// `(license, count)` pairs in ascending license order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Sum of all counts; equals the number of recorded elements
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Number of distinct license strings
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Distinct licenses whose full text can be looked up: neither
    /// `NOASSERTION` nor a composite expression.
    pub fn text_candidates(&self) -> impl Iterator<Item = &str> {
        self.counts
            .keys()
            .map(String::as_str)
            .filter(|license| *license != NOASSERTION && !is_license_expression(license))
    }
}

/// Whether `license` combines several licenses (`AND`, `OR`, `WITH`, grouping).
#[must_use]
pub fn is_license_expression(license: &str) -> bool {
    if license.contains('(') || license.contains(')') {
        return true;
    }

    let has_operator = license
        .split_whitespace()
        .any(|token| matches!(token.to_ascii_uppercase().as_str(), "AND" | "OR" | "WITH"));
    if has_operator {
        return true;
    }

    spdx::Expression::parse_mode(license, spdx::ParseMode::LAX)
        .map(|expr| expr.requirements().count() > 1)
        .unwrap_or(false)
}
