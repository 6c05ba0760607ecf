//! File, package and relationship records.

use serde::{Deserialize, Serialize};

/// Supplier value meaning "the SBOM author makes no claim".
pub const NOASSERTION: &str = "NOASSERTION";

/// A file entry in the SBOM.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SbomFile {
    /// Format-specific identifier (SPDXID, bom-ref)
    pub id: Option<String>,
    /// File name
    pub name: Option<String>,
    /// File type tags (SOURCE, BINARY, ...)
    pub file_types: Vec<String>,
    /// Concluded license expression
    pub license_concluded: Option<String>,
    /// Copyright text
    pub copyright_text: Option<String>,
}

impl SbomFile {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_file_type(mut self, file_type: impl Into<String>) -> Self {
        self.file_types.push(file_type.into());
        self
    }

    #[must_use]
    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license_concluded = Some(license.into());
        self
    }

    #[must_use]
    pub fn with_copyright(mut self, copyright: impl Into<String>) -> Self {
        self.copyright_text = Some(copyright.into());
        self
    }
}

/// A package entry in the SBOM.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Format-specific identifier (SPDXID, bom-ref)
    pub id: Option<String>,
    /// Package name
    pub name: Option<String>,
    /// Package version
    pub version: Option<String>,
    /// Supplier name, with any `Organization:`/`Person:` prefix removed
    pub supplier: Option<String>,
    /// Concluded license expression
    pub license_concluded: Option<String>,
    /// External references (purl, cpe, websites, ...)
    pub external_references: Vec<ExternalReference>,
    /// Download location
    pub download_location: Option<String>,
    /// Copyright text
    pub copyright_text: Option<String>,
}

impl Package {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    #[must_use]
    pub fn with_supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Some(supplier.into());
        self
    }

    #[must_use]
    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license_concluded = Some(license.into());
        self
    }

    #[must_use]
    pub fn with_purl(mut self, purl: impl Into<String>) -> Self {
        self.external_references
            .push(ExternalReference::new("PACKAGE-MANAGER", "purl", purl));
        self
    }

    #[must_use]
    pub fn with_external_reference(mut self, reference: ExternalReference) -> Self {
        self.external_references.push(reference);
        self
    }

    #[must_use]
    pub fn with_download_location(mut self, location: impl Into<String>) -> Self {
        self.download_location = Some(location.into());
        self
    }

    #[must_use]
    pub fn with_copyright(mut self, copyright: impl Into<String>) -> Self {
        self.copyright_text = Some(copyright.into());
        self
    }

    /// First external reference of the given type, if any.
    #[must_use]
    pub fn reference_of_type(&self, reference_type: &str) -> Option<&ExternalReference> {
        self.external_references
            .iter()
            .find(|r| r.reference_type == reference_type)
    }
}

/// External reference attached to a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalReference {
    /// Reference category (`PACKAGE-MANAGER`, `SECURITY`, ...)
    pub category: Option<String>,
    /// Reference type tag (`purl`, `cpe23Type`, ...)
    pub reference_type: String,
    /// Locator value
    pub locator: String,
}

impl ExternalReference {
    #[must_use]
    pub fn new(
        category: impl Into<String>,
        reference_type: impl Into<String>,
        locator: impl Into<String>,
    ) -> Self {
        Self {
            category: Some(category.into()),
            reference_type: reference_type.into(),
            locator: locator.into(),
        }
    }
}

/// Relationship between two SBOM elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Source element identifier
    pub source: String,
    /// Relationship type (`DEPENDS_ON`, `CONTAINS`, ...)
    pub relationship_type: String,
    /// Target element identifier
    pub target: String,
}

impl Relationship {
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        relationship_type: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            relationship_type: relationship_type.into(),
            target: target.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_of_type_returns_first_match() {
        let pkg = Package::new("SPDXRef-a", "a")
            .with_external_reference(ExternalReference::new("SECURITY", "cpe23Type", "cpe:2.3:a"))
            .with_purl("pkg:npm/a@1.0.0")
            .with_purl("pkg:npm/a@2.0.0");

        let purl = pkg.reference_of_type("purl").map(|r| r.locator.as_str());
        assert_eq!(purl, Some("pkg:npm/a@1.0.0"));
        assert!(pkg.reference_of_type("swid").is_none());
    }
}
