//! Package ecosystem extraction from package URLs.

use crate::model::Package;
use packageurl::PackageUrl;
use std::fmt;
use std::str::FromStr;

/// Ecosystem of a package as shown in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ecosystem {
    /// The purl type, e.g. `pypi`, `npm`, `cargo`
    Known(String),
    /// A purl reference exists but does not parse
    Invalid,
    /// No purl reference
    Unspecified,
}

impl Ecosystem {
    /// Ecosystem of a package from its first `purl` external reference.
    #[must_use]
    pub fn of(package: &Package) -> Self {
        package
            .reference_of_type("purl")
            .map_or(Self::Unspecified, |reference| {
                Self::from_purl(&reference.locator)
            })
    }

    /// Parse a package URL and return its type.
    #[must_use]
    pub fn from_purl(purl: &str) -> Self {
        match PackageUrl::from_str(purl) {
            Ok(parsed) => Self::Known(parsed.ty().to_string()),
            Err(e) => {
                tracing::debug!("Invalid package URL '{}': {}", purl, e);
                Self::Invalid
            }
        }
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(ty) => write!(f, "{ty}"),
            Self::Invalid => write!(f, "INVALID"),
            Self::Unspecified => write!(f, "-"),
        }
    }
}
