//! Report generation.
//!
//! [`ReportGenerator`] walks a parsed SBOM and drives any
//! [`DocumentBuilder`](crate::render::DocumentBuilder) through the summary
//! sections, so the same report comes out as console text, Markdown or PDF.

mod generator;

pub use generator::{ReportGenerator, ReportOptions, ReportSummary, LICENSE_TEXT_FALLBACK};
