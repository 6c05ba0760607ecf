//! **Readable documentation for Software Bills of Materials.**
//!
//! `sbom-doc` loads an SPDX or CycloneDX SBOM and produces a summary report:
//! document metadata, file and package inventories, a license frequency
//! table, an optional NTIA minimum-elements check, optional full license
//! texts and an optional closing notice. The same report renders to the
//! console, to Markdown, or to a paginated PDF.
//!
//! ## Modules
//!
//! - **[`model`]**: the normalized [`Sbom`] and the [`SbomSource`] trait the
//!   report reads from.
//! - **[`parsers`]**: SPDX 2.x (JSON, YAML, tag-value) and CycloneDX (JSON)
//!   loaders with content-based format detection.
//! - **[`analysis`]**: license frequency, NTIA conformance and package
//!   ecosystems.
//! - **[`render`]**: the [`DocumentBuilder`] capability and its console,
//!   Markdown and PDF implementations.
//! - **[`report`]**: the [`ReportGenerator`] that drives a builder through
//!   the report sections.
//! - **[`enrichment`]**: license text lookup against `spdx.org`, with an
//!   on-disk cache. Network access requires the `enrichment` feature.
//! - **[`pipeline`]**: load → render → publish in one call, as the CLI uses it.
//! - **[`config`]**: `.sbom-doc.yaml` discovery, validation and merging.
//!
//! ## Getting Started
//!
//! ```no_run
//! use std::path::Path;
//! use sbom_doc::{parse_sbom, MarkdownRenderer, OutputTarget, RenderOptions};
//! use sbom_doc::{ReportGenerator, ReportOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sbom = parse_sbom(Path::new("app.spdx.json"))?;
//!
//!     let options = ReportOptions {
//!         sbom_label: "app.spdx.json".to_string(),
//!         ntia_summary: true,
//!         ..ReportOptions::default()
//!     };
//!     let mut markdown = MarkdownRenderer::new(&RenderOptions::default());
//!     let summary = ReportGenerator::new(&sbom, options)
//!         .generate(&mut markdown, &OutputTarget::Stdout)?;
//!
//!     eprintln!("NTIA conformant: {}", summary.ntia.is_conformant());
//!     Ok(())
//! }
//! ```

#![warn(clippy::unwrap_used, clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod analysis;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod model;
pub mod parsers;
pub mod pipeline;
pub mod render;
pub mod report;

pub use analysis::{Ecosystem, LicenseFrequency, NtiaConformance};
pub use config::AppConfig;
pub use enrichment::{LicenseTextProvider, NoLicenseText, SpdxLicenseClient};
pub use error::{ErrorContext, Result, SbomDocError};
pub use model::{Document, Package, Relationship, Sbom, SbomFile, SbomSource};
pub use parsers::{detect_format, parse_sbom, parse_sbom_str};
pub use pipeline::OutputTarget;
pub use render::{
    ConsoleRenderer, DocumentBuilder, MarkdownRenderer, OutputFormat, PdfRenderer, RenderOptions,
    Renderer, ReportError,
};
pub use report::{ReportGenerator, ReportOptions, ReportSummary};
