//! Normalized SBOM model.
//!
//! Both SPDX and CycloneDX inputs are reduced to these structures before a
//! report is generated. The report layer reads them through [`SbomSource`]
//! and never mutates them.

mod inventory;
mod metadata;
mod sbom;

pub use inventory::*;
pub use metadata::*;
pub use sbom::*;
