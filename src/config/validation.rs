//! Configuration validation for sbom-doc.
//!
//! Validation collects every problem instead of stopping at the first, so a
//! user fixing a config file sees the whole list at once.

use super::types::{AppConfig, LicenseTextConfig, OutputConfig, RenderConfig, ReportConfig};
use std::path::Path;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.output.validate());
        errors.extend(self.report.validate());
        errors.extend(self.render.validate());
        errors.extend(self.license_text.validate());
        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Some(ref file_path) = self.file {
            if let Some(parent) = file_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    errors.push(ConfigError::new(
                        "output.file",
                        format!("Parent directory does not exist: {}", parent.display()),
                    ));
                }
            }
        }

        if !self.format.supports_stdout() && self.file.is_none() {
            errors.push(ConfigError::new(
                "output.file",
                format!("An output file is required for {} output", self.format),
            ));
        }

        errors
    }
}

impl Validatable for ReportConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if let Some(ref extra) = self.extra_text {
            if !Path::new(extra).is_file() {
                errors.push(ConfigError::new(
                    "report.extra_text",
                    format!("Extra text file not found: {}", extra.display()),
                ));
            }
        }
        errors
    }
}

impl Validatable for RenderConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.max_row_values == 0 {
            errors.push(ConfigError::new(
                "render.max_row_values",
                "Max row values must be at least 1",
            ));
        }
        if self.console_width < 20 {
            errors.push(ConfigError::new(
                "render.console_width",
                format!("Console width must be at least 20, got {}", self.console_width),
            ));
        }
        if !(6.0..=24.0).contains(&self.font_size) {
            errors.push(ConfigError::new(
                "render.font_size",
                format!("Font size must be between 6 and 24, got {}", self.font_size),
            ));
        }
        if let Some(ref dir) = self.font_dir {
            if !dir.is_dir() {
                errors.push(ConfigError::new(
                    "render.font_dir",
                    format!("Font directory not found: {}", dir.display()),
                ));
            }
        }

        errors
    }
}

impl Validatable for LicenseTextConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.timeout_secs == 0 {
            errors.push(ConfigError::new(
                "license_text.timeout_secs",
                "Timeout must be at least 1 second",
            ));
        }
        if self.cache_ttl_hours == 0 {
            errors.push(ConfigError::new(
                "license_text.cache_ttl_hours",
                "Cache TTL must be at least 1 hour",
            ));
        }
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            errors.push(ConfigError::new(
                "license_text.base_url",
                format!("Base URL must be http(s), got '{}'", self.base_url),
            ));
        }

        errors
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::OutputFormat;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().is_valid());
    }

    #[test]
    fn test_pdf_requires_output_file() {
        let mut config = AppConfig::default();
        config.output.format = OutputFormat::Pdf;

        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "output.file");

        config.output.file = Some(PathBuf::from("report.pdf"));
        assert!(config.is_valid());
    }

    #[test]
    fn test_output_parent_must_exist() {
        let config = OutputConfig {
            file: Some(PathBuf::from("/nonexistent/dir/report.md")),
            ..OutputConfig::default()
        };
        assert!(!config.is_valid());
    }

    #[test]
    fn test_render_config_validation() {
        let invalid = RenderConfig {
            max_row_values: 0,
            console_width: 10,
            font_size: 40.0,
            font_dir: Some(PathBuf::from("/nonexistent/fonts")),
            ..RenderConfig::default()
        };
        let fields: Vec<String> = invalid.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "render.max_row_values",
                "render.console_width",
                "render.font_size",
                "render.font_dir"
            ]
        );
    }

    #[test]
    fn test_license_text_config_validation() {
        assert!(LicenseTextConfig::default().is_valid());

        let invalid = LicenseTextConfig {
            timeout_secs: 0,
            base_url: "ftp://example.org".to_string(),
            ..LicenseTextConfig::default()
        };
        assert_eq!(invalid.validate().len(), 2);
    }

    #[test]
    fn test_missing_extra_text() {
        let config = ReportConfig {
            extra_text: Some(PathBuf::from("/nonexistent/notice.txt")),
            ..ReportConfig::default()
        };
        assert!(!config.is_valid());
    }

    #[test]
    fn test_config_error_display() {
        let error = ConfigError::new("test_field", "test error message");
        assert_eq!(error.to_string(), "test_field: test error message");
    }
}
