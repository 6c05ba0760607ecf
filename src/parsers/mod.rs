//! SBOM loaders.
//!
//! A deliberately small reader for SPDX 2.x (JSON, YAML, tag-value) and
//! CycloneDX (JSON) that fills the normalized [`Sbom`](crate::model::Sbom).
//! It is not a validator: anything the report does not display is ignored.
//!
//! ## Usage
//!
//! ```no_run
//! use sbom_doc::parsers::{detect_format, parse_sbom};
//! use std::path::Path;
//!
//! let sbom = parse_sbom(Path::new("sbom.spdx.json")).unwrap();
//!
//! let content = std::fs::read_to_string("sbom.json").unwrap();
//! if let Some(detected) = detect_format(&content) {
//!     println!("Detected: {} ({:?})", detected.format_name, detected.variant);
//! }
//! ```

mod cyclonedx;
mod spdx;
mod traits;

pub use cyclonedx::CycloneDxParser;
pub use spdx::SpdxParser;
pub use traits::{FormatConfidence, FormatDetection, ParseError, SbomParser};

use crate::model::Sbom;
use std::path::Path;

/// Result of format detection
#[derive(Debug, Clone)]
pub struct DetectedFormat {
    /// Name of the detected format
    pub format_name: &'static str,
    /// Confidence score (0.0-1.0)
    pub confidence: f32,
    /// Detected variant (`JSON`, `YAML`, `tag-value`)
    pub variant: Option<String>,
    /// Detected version if available
    pub version: Option<String>,
}

/// Maximum SBOM file size (512 MB)
const MAX_SBOM_FILE_SIZE: u64 = 512 * 1024 * 1024;

/// Pick the parser most confident it can read `content`.
fn best_parser(content: &str) -> Option<(&'static dyn SbomParser, FormatDetection)> {
    const PARSERS: [&dyn SbomParser; 2] = [&SpdxParser, &CycloneDxParser];

    PARSERS
        .into_iter()
        .map(|parser| (parser, parser.detect(content)))
        .filter(|(_, detection)| detection.confidence.can_parse())
        .max_by(|(_, a), (_, b)| a.confidence.value().total_cmp(&b.confidence.value()))
}

/// Detect SBOM format from content without parsing
///
/// Returns None if no format could be detected with sufficient confidence.
#[must_use]
pub fn detect_format(content: &str) -> Option<DetectedFormat> {
    best_parser(content).map(|(parser, detection)| DetectedFormat {
        format_name: parser.format_name(),
        confidence: detection.confidence.value(),
        variant: detection.variant,
        version: detection.version,
    })
}

/// Load an SBOM file, detecting its format from the content.
///
/// Returns an error if the file exceeds the 512 MB size limit.
pub fn parse_sbom(path: &Path) -> Result<Sbom, ParseError> {
    let metadata = std::fs::metadata(path)?;
    if !metadata.is_file() {
        return Err(ParseError::Io(format!(
            "{} is not a regular file",
            path.display()
        )));
    }
    if metadata.len() > MAX_SBOM_FILE_SIZE {
        return Err(ParseError::Io(format!(
            "SBOM file is {} MB, exceeding the {} MB limit",
            metadata.len() / (1024 * 1024),
            MAX_SBOM_FILE_SIZE / (1024 * 1024),
        )));
    }
    let content = std::fs::read_to_string(path)?;
    parse_sbom_str(&content)
}

/// Parse SBOM from string content
pub fn parse_sbom_str(content: &str) -> Result<Sbom, ParseError> {
    if content.trim().is_empty() {
        return Err(ParseError::InvalidStructure("SBOM content is empty".to_string()));
    }
    let (parser, detection) = best_parser(content).ok_or_else(|| {
        ParseError::UnknownFormat("content is neither SPDX nor CycloneDX".to_string())
    })?;
    tracing::debug!(
        "Detected {} {} (confidence {:.2})",
        parser.format_name(),
        detection.variant.as_deref().unwrap_or("?"),
        detection.confidence.value()
    );
    parser.parse_str(content)
}
