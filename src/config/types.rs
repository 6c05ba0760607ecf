//! Configuration types for sbom-doc.
//!
//! Every section deserializes with defaults for missing keys, so a config
//! file only needs the values it changes.

use super::defaults::{
    DEFAULT_CACHE_TTL_HOURS, DEFAULT_CONSOLE_WIDTH, DEFAULT_FONT_SIZE, DEFAULT_LICENSE_BASE_URL,
    DEFAULT_LICENSE_TIMEOUT_SECS,
};
use crate::render::{OutputFormat, PageSize, RenderOptions, DEFAULT_MAX_ROW_VALUES};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified configuration, as loaded from `.sbom-doc.yaml` and merged with
/// command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Output destination and format
    pub output: OutputConfig,
    /// Which optional report sections to include
    pub report: ReportConfig,
    /// Renderer layout settings
    pub render: RenderConfig,
    /// License text retrieval
    pub license_text: LicenseTextConfig,
}

impl AppConfig {
    /// Renderer settings derived from this configuration
    #[must_use]
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            max_row_values: self.render.max_row_values,
            numbered_headings: self.report.numbered_headings,
            console_width: self.render.console_width,
            color: !self.output.no_color,
            page_size: self.render.page_size,
            font_size: self.render.font_size,
            font_dir: self.render.font_dir.clone(),
        }
    }
}

// ============================================================================
// Sub-configuration Types
// ============================================================================

/// Output-related configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: OutputFormat,
    /// Output file path (None for stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Disable colored console output
    pub no_color: bool,
}

/// Optional report sections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ReportConfig {
    /// Append the full text of each license found
    pub include_license: bool,
    /// Include the NTIA minimum elements summary
    pub ntia_summary: bool,
    /// File whose contents are appended as an extra notice
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_text: Option<PathBuf>,
    /// Number section headings (markdown and PDF)
    pub numbered_headings: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            include_license: false,
            ntia_summary: false,
            extra_text: None,
            numbered_headings: true,
        }
    }
}

/// Renderer layout settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RenderConfig {
    /// Total width of console tables, in columns
    #[schemars(range(min = 20))]
    pub console_width: usize,
    /// Maximum number of values in a table row; longer rows are dropped
    #[schemars(range(min = 1))]
    pub max_row_values: usize,
    /// PDF paper size
    pub page_size: PageSize,
    /// PDF body font size in points
    #[schemars(range(min = 6.0, max = 24.0))]
    pub font_size: f32,
    /// Directory holding a TrueType family for PDF output
    /// (`<Name>-Regular.ttf` and `<Name>-Bold.ttf`); system fonts otherwise
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_dir: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            console_width: DEFAULT_CONSOLE_WIDTH,
            max_row_values: DEFAULT_MAX_ROW_VALUES,
            page_size: PageSize::default(),
            font_size: DEFAULT_FONT_SIZE,
            font_dir: None,
        }
    }
}

/// License text retrieval configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LicenseTextConfig {
    /// Fetch license text over the network (false means always fall back)
    pub enabled: bool,
    /// Base URL of the SPDX license list
    pub base_url: String,
    /// Per-request timeout in seconds
    #[schemars(range(min = 1))]
    pub timeout_secs: u64,
    /// Cache directory for downloaded license text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
    /// Cache time-to-live in hours
    #[schemars(range(min = 1))]
    pub cache_ttl_hours: u64,
    /// Ignore cached entries and fetch fresh text
    pub bypass_cache: bool,
}

impl Default for LicenseTextConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: DEFAULT_LICENSE_BASE_URL.to_string(),
            timeout_secs: DEFAULT_LICENSE_TIMEOUT_SECS,
            cache_dir: None,
            cache_ttl_hours: DEFAULT_CACHE_TTL_HOURS,
            bypass_cache: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.output.format, OutputFormat::Console);
        assert!(!config.report.include_license);
        assert!(config.report.numbered_headings);
        assert_eq!(config.render.console_width, 150);
        assert_eq!(config.render.max_row_values, 5);
        assert_eq!(config.license_text.timeout_secs, 10);
        assert_eq!(config.license_text.base_url, "https://spdx.org/licenses");
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "report:\n  ntia_summary: true\nrender:\n  page_size: letter\n";
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.report.ntia_summary);
        assert!(config.report.numbered_headings);
        assert_eq!(config.render.page_size, PageSize::Letter);
        assert_eq!(config.render.console_width, 150);
    }

    #[test]
    fn test_render_options_follow_config() {
        let mut config = AppConfig::default();
        config.output.no_color = true;
        config.report.numbered_headings = false;
        config.render.max_row_values = 7;
        config.render.font_dir = Some(PathBuf::from("/opt/fonts"));

        let options = config.render_options();
        assert_eq!(options.font_dir, Some(PathBuf::from("/opt/fonts")));
        assert!(!options.color);
        assert!(!options.numbered_headings);
        assert_eq!(options.max_row_values, 7);
    }
}
