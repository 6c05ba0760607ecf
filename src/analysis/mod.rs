//! Summaries derived from the SBOM model: license frequency, NTIA
//! conformance and package ecosystems.

mod ecosystem;
mod licenses;
mod ntia;

pub use ecosystem::Ecosystem;
pub use licenses::{concluded_license, is_license_expression, LicenseFrequency, NOT_KNOWN};
pub use ntia::{
    file_is_complete, files_valid, package_is_complete, packages_valid, NtiaConformance,
};
