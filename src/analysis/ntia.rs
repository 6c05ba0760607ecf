//! NTIA minimum elements conformance.
//!
//! A reduced form of the NTIA check: it only looks at the elements the
//! report itself displays. Blank strings count as missing.

use crate::model::{Document, Package, SbomFile, SbomSource, NOASSERTION};
use serde::Serialize;

/// The five NTIA minimum-element flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NtiaConformance {
    /// Every file has an identifier and a name
    pub files_valid: bool,
    /// Every package has identifier, name, version and an asserted supplier
    pub packages_valid: bool,
    /// The document names at least one creator
    pub creator_identified: bool,
    /// The document carries a creation timestamp
    pub creation_time_identified: bool,
    /// At least one relationship is present
    pub relationships_present: bool,
}

impl NtiaConformance {
    /// Evaluate all five flags against an SBOM.
    pub fn evaluate<S: SbomSource + ?Sized>(source: &S) -> Self {
        let document = source.document();
        Self {
            files_valid: files_valid(source.files()),
            packages_valid: packages_valid(source.packages()),
            creator_identified: document.is_some_and(|d| !d.creators.is_empty()),
            creation_time_identified: document.is_some_and(creation_time_identified),
            relationships_present: !source.relationships().is_empty(),
        }
    }

    /// Overall conformance: every flag holds.
    #[must_use]
    pub const fn is_conformant(&self) -> bool {
        self.files_valid
            && self.packages_valid
            && self.creator_identified
            && self.creation_time_identified
            && self.relationships_present
    }

    /// Flags paired with the question shown in the report, in report order.
    #[must_use]
    pub const fn elements(&self) -> [(&'static str, bool); 5] {
        [
            ("All file information provided?", self.files_valid),
            ("All package information provided?", self.packages_valid),
            ("Creator identified?", self.creator_identified),
            ("Creation time identified?", self.creation_time_identified),
            ("Dependency relationships provided?", self.relationships_present),
        ]
    }
}

fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// A file satisfies the minimum elements when it has an id and a name.
#[must_use]
pub fn file_is_complete(file: &SbomFile) -> bool {
    is_present(file.id.as_deref()) && is_present(file.name.as_deref())
}

/// A package satisfies the minimum elements when it has id, name, version
/// and a supplier other than `NOASSERTION`.
#[must_use]
pub fn package_is_complete(package: &Package) -> bool {
    is_present(package.id.as_deref())
        && is_present(package.name.as_deref())
        && is_present(package.version.as_deref())
        && is_present(package.supplier.as_deref())
        && package.supplier.as_deref() != Some(NOASSERTION)
}

/// True for an empty list.
#[must_use]
pub fn files_valid(files: &[SbomFile]) -> bool {
    files.iter().all(file_is_complete)
}

/// True for an empty list.
#[must_use]
pub fn packages_valid(packages: &[Package]) -> bool {
    packages.iter().all(package_is_complete)
}

fn creation_time_identified(document: &Document) -> bool {
    is_present(document.created.as_deref())
}
