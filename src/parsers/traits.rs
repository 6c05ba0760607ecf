//! Parser trait definitions and error types.
//!
//! Each format parser reports how confident it is that it can read a piece
//! of content, so the loader can pick one without trial-and-error parsing.

use crate::model::Sbom;
use thiserror::Error;

/// Why an SBOM could not be loaded.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Unreadable file, or one that is not a regular file
    #[error("cannot read SBOM: {0}")]
    Io(String),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid SBOM structure: {0}")]
    InvalidStructure(String),

    /// SPDX 3 and other versions the loaders do not read
    #[error("unsupported format version: {0}")]
    UnsupportedVersion(String),

    #[error("not a recognised SBOM: {0}")]
    UnknownFormat(String),

    #[error("missing required field: {0}")]
    MissingField(String),
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Confidence level for format detection
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct FormatConfidence(f32);

impl FormatConfidence {
    /// Definitely not this format
    pub const NONE: Self = Self(0.0);
    /// Might be this format
    pub const LOW: Self = Self(0.25);
    /// Likely this format
    pub const MEDIUM: Self = Self(0.5);
    /// Almost certainly this format
    pub const HIGH: Self = Self(0.75);
    /// Definitely this format
    pub const CERTAIN: Self = Self(1.0);

    #[must_use]
    pub const fn value(&self) -> f32 {
        self.0
    }

    /// Whether this confidence is high enough to attempt a parse
    #[must_use]
    pub fn can_parse(&self) -> bool {
        self.0 >= Self::LOW.0
    }
}

/// Detection result from a parser
#[derive(Debug, Clone, Default)]
pub struct FormatDetection {
    /// Confidence that this parser can handle the content
    pub confidence: FormatConfidence,
    /// Detected variant (`JSON`, `YAML`, `tag-value`)
    pub variant: Option<String>,
    /// Detected specification version, if visible
    pub version: Option<String>,
}

impl FormatDetection {
    #[must_use]
    pub fn no_match() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_confidence(confidence: FormatConfidence) -> Self {
        Self {
            confidence,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn variant(mut self, variant: &str) -> Self {
        self.variant = Some(variant.to_string());
        self
    }

    #[must_use]
    pub fn version(mut self, version: Option<String>) -> Self {
        self.version = version;
        self
    }
}

/// Trait for SBOM format parsers
pub trait SbomParser {
    /// Parse SBOM from string content
    fn parse_str(&self, content: &str) -> Result<Sbom, ParseError>;

    /// Format name (`SPDX`, `CycloneDX`)
    fn format_name(&self) -> &'static str;

    /// Lightweight structural check of `content`, without a full parse
    fn detect(&self, content: &str) -> FormatDetection;

    /// Quick check if this parser can likely handle the content
    fn can_parse(&self, content: &str) -> bool {
        self.detect(content).confidence.can_parse()
    }
}
