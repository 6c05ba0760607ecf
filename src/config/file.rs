//! Configuration file loading and discovery.
//!
//! Configuration lives in YAML files that are found automatically, then
//! layered under the command-line flags.

use super::types::AppConfig;
use crate::render::OutputFormat;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".sbom-doc.yaml",
    ".sbom-doc.yml",
    "sbom-doc.yaml",
    "sbom-doc.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/sbom-doc/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
        tracing::debug!("Explicit config path {} does not exist", path.display());
    }

    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd);
    }
    if let Some(git_root) = find_git_root() {
        candidates.push(git_root);
    }
    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join("sbom-doc"));
    }
    if let Some(home) = dirs::home_dir() {
        candidates.push(home);
    }

    candidates.iter().find_map(|dir| find_config_in_dir(dir))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Find the git repository root by walking up the directory tree.
fn find_git_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    cwd.ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Error, Debug)]
pub enum ConfigFileError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    let config: AppConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
///
/// A file that exists but fails to load is reported and skipped.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl AppConfig {
    /// Merge another config into this one, with `other` taking precedence
    /// wherever it differs from the defaults.
    ///
    /// Used to layer command-line flags over file config.
    pub fn merge(&mut self, other: &Self) {
        let defaults = Self::default();

        // Output
        if other.output.format != OutputFormat::default() {
            self.output.format = other.output.format;
        }
        if other.output.file.is_some() {
            self.output.file.clone_from(&other.output.file);
        }
        if other.output.no_color {
            self.output.no_color = true;
        }

        // Report sections
        if other.report.include_license {
            self.report.include_license = true;
        }
        if other.report.ntia_summary {
            self.report.ntia_summary = true;
        }
        if other.report.extra_text.is_some() {
            self.report.extra_text.clone_from(&other.report.extra_text);
        }
        if !other.report.numbered_headings {
            self.report.numbered_headings = false;
        }

        // Rendering
        if other.render.console_width != defaults.render.console_width {
            self.render.console_width = other.render.console_width;
        }
        if other.render.max_row_values != defaults.render.max_row_values {
            self.render.max_row_values = other.render.max_row_values;
        }
        if other.render.page_size != defaults.render.page_size {
            self.render.page_size = other.render.page_size;
        }
        if (other.render.font_size - defaults.render.font_size).abs() > f32::EPSILON {
            self.render.font_size = other.render.font_size;
        }
        if other.render.font_dir.is_some() {
            self.render.font_dir.clone_from(&other.render.font_dir);
        }

        // License text
        if !other.license_text.enabled {
            self.license_text.enabled = false;
        }
        if other.license_text.base_url != defaults.license_text.base_url {
            self.license_text.base_url.clone_from(&other.license_text.base_url);
        }
        if other.license_text.timeout_secs != defaults.license_text.timeout_secs {
            self.license_text.timeout_secs = other.license_text.timeout_secs;
        }
        if other.license_text.cache_dir.is_some() {
            self.license_text.cache_dir.clone_from(&other.license_text.cache_dir);
        }
        if other.license_text.cache_ttl_hours != defaults.license_text.cache_ttl_hours {
            self.license_text.cache_ttl_hours = other.license_text.cache_ttl_hours;
        }
        if other.license_text.bypass_cache {
            self.license_text.bypass_cache = true;
        }
    }

    /// Load from file and merge with CLI overrides.
    ///
    /// `format` is the format given explicitly on the command line. It is
    /// applied after the merge, so it wins even when it equals the default.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        cli_overrides: &Self,
        format: Option<OutputFormat>,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.merge(cli_overrides);
        if let Some(format) = format {
            config.output.format = format;
        }
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate an example config file from the defaults.
#[must_use]
pub fn generate_example_config() -> String {
    let example = AppConfig::default();
    format!(
        r"# sbom-doc configuration
# Place this file at .sbom-doc.yaml in your project root or ~/.config/sbom-doc/
# Command-line flags always override file settings.

{}",
        serde_yaml::to_string(&example).unwrap_or_default()
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::PageSize;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_dir() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(".sbom-doc.yaml");
        std::fs::write(&config_path, "report:\n  ntia_summary: true\n").unwrap();

        let found = find_config_in_dir(tmp.path());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_dir_not_found() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(find_config_in_dir(tmp.path()), None);
    }

    #[test]
    fn test_find_config_prefers_first_name() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("sbom-doc.yaml"), "").unwrap();
        std::fs::write(tmp.path().join(".sbom-doc.yml"), "").unwrap();

        let found = find_config_in_dir(tmp.path()).unwrap();
        assert!(found.ends_with(".sbom-doc.yml"));
    }

    #[test]
    fn test_load_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yaml");

        let yaml = r"
output:
  format: markdown
report:
  include_license: true
render:
  max_row_values: 8
license_text:
  timeout_secs: 3
";
        std::fs::write(&config_path, yaml).unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.output.format, OutputFormat::Markdown);
        assert!(config.report.include_license);
        assert_eq!(config.render.max_row_values, 8);
        assert_eq!(config.license_text.timeout_secs, 3);
    }

    #[test]
    fn test_load_empty_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("empty.yaml");
        std::fs::write(&config_path, "\n").unwrap();

        assert_eq!(load_config_file(&config_path).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config_file(Path::new("/nonexistent/config.yaml"));
        assert!(matches!(result, Err(ConfigFileError::NotFound(_))));
    }

    #[test]
    fn test_load_config_file_invalid_yaml() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("bad.yaml");
        std::fs::write(&config_path, "output: [unclosed").unwrap();

        let result = load_config_file(&config_path);
        assert!(matches!(result, Err(ConfigFileError::Parse(_))));
    }

    #[test]
    fn test_config_merge() {
        let mut base = AppConfig::default();
        base.render.page_size = PageSize::Letter;
        base.report.ntia_summary = true;

        let mut cli = AppConfig::default();
        cli.output.format = OutputFormat::Pdf;
        cli.output.file = Some(PathBuf::from("out.pdf"));
        cli.report.include_license = true;
        cli.report.numbered_headings = false;

        base.merge(&cli);

        assert_eq!(base.output.format, OutputFormat::Pdf);
        assert_eq!(base.output.file, Some(PathBuf::from("out.pdf")));
        assert!(base.report.include_license);
        assert!(!base.report.numbered_headings);
        // untouched by the override
        assert!(base.report.ntia_summary);
        assert_eq!(base.render.page_size, PageSize::Letter);
    }

    #[test]
    fn test_explicit_console_format_beats_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("pdf.yaml");
        std::fs::write(&config_path, "output:\n  format: pdf\n  file: out.pdf\n").unwrap();

        let cli = AppConfig::default();
        let (config, loaded) = AppConfig::from_file_with_overrides(
            Some(&config_path),
            &cli,
            Some(OutputFormat::Console),
        );
        assert_eq!(loaded, Some(config_path.clone()));
        assert_eq!(config.output.format, OutputFormat::Console);

        // Without an explicit format the file setting stands
        let (config, _) = AppConfig::from_file_with_overrides(Some(&config_path), &cli, None);
        assert_eq!(config.output.format, OutputFormat::Pdf);
    }

    #[test]
    fn test_generate_example_config() {
        let example = generate_example_config();
        assert!(example.contains("report:"));
        assert!(example.contains("numbered_headings"));

        let parsed: AppConfig = serde_yaml::from_str(&example).unwrap();
        assert_eq!(parsed, AppConfig::default());
    }

    #[test]
    fn test_discover_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("custom-config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "report:\n  ntia_summary: true").unwrap();

        let discovered = discover_config_file(Some(&config_path));
        assert_eq!(discovered, Some(config_path));
    }
}
