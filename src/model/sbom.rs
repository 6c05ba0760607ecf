//! The read-only SBOM view consumed by the report generator.

use super::{Document, Package, Relationship, SbomFile};
use serde::{Deserialize, Serialize};

/// Source of normalized SBOM data.
///
/// The report generator only reads through this trait, so any loader (or a
/// test fixture) can feed it.
pub trait SbomSource {
    /// Document metadata, if the SBOM has any
    fn document(&self) -> Option<&Document>;

    /// File entries
    fn files(&self) -> &[SbomFile];

    /// Package entries
    fn packages(&self) -> &[Package];

    /// Relationships between elements
    fn relationships(&self) -> &[Relationship];
}

/// In-memory SBOM.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sbom {
    pub document: Option<Document>,
    pub files: Vec<SbomFile>,
    pub packages: Vec<Package>,
    pub relationships: Vec<Relationship>,
}

impl Sbom {
    /// Create an SBOM with the given document metadata and no content
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self {
            document: Some(document),
            ..Self::default()
        }
    }

    pub fn add_file(&mut self, file: SbomFile) {
        self.files.push(file);
    }

    pub fn add_package(&mut self, package: Package) {
        self.packages.push(package);
    }

    pub fn add_relationship(&mut self, relationship: Relationship) {
        self.relationships.push(relationship);
    }
}

impl SbomSource for Sbom {
    fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    fn files(&self) -> &[SbomFile] {
        &self.files
    }

    fn packages(&self) -> &[Package] {
        &self.packages
    }

    fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }
}
