//! License text enrichment.
//!
//! The report's optional "License Text" section asks a
//! [`LicenseTextProvider`] for the full text of each license it lists.
//! [`SpdxLicenseClient`] reads the public SPDX license list (network access
//! requires the `enrichment` feature) and [`NoLicenseText`] is the offline
//! stand-in.
//!
//! # Example
//!
//! ```no_run
//! use sbom_doc::enrichment::{LicenseTextProvider, SpdxClientConfig, SpdxLicenseClient};
//!
//! let client = SpdxLicenseClient::new(SpdxClientConfig::default()).unwrap();
//! if let Ok(Some(text)) = client.fetch("MIT") {
//!     println!("{text}");
//! }
//! ```

mod cache;
mod spdx;
mod traits;

pub use cache::FileCache;
pub use spdx::{SpdxClientConfig, SpdxLicenseClient};
pub use traits::{LicenseTextProvider, NoLicenseText};

use thiserror::Error;

/// Errors from license text retrieval.
///
/// None of these abort a report; the generator logs them and prints a
/// placeholder instead of the text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LicenseTextError {
    #[error("network error: {0}")]
    Network(String),

    #[error("license service returned status {0}")]
    Status(u16),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("cache error: {0}")]
    Cache(String),

    #[error("license text retrieval is not available in this build")]
    Unavailable,
}
