//! Configuration module for sbom-doc.
//!
//! This module provides:
//! - Type-safe configuration structures with defaults for every field
//! - Validation that reports every problem at once
//! - YAML config file loading and discovery
//! - Merging of command-line flags over file settings
//!
//! # Configuration File
//!
//! Place a `.sbom-doc.yaml` file in your project root or `~/.config/sbom-doc/`:
//!
//! ```yaml
//! output:
//!   format: markdown
//! report:
//!   ntia_summary: true
//! license_text:
//!   timeout_secs: 5
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{
    DEFAULT_CACHE_TTL_HOURS, DEFAULT_CONSOLE_WIDTH, DEFAULT_FONT_SIZE, DEFAULT_LICENSE_BASE_URL,
    DEFAULT_LICENSE_TIMEOUT_SECS,
};
pub use types::{AppConfig, LicenseTextConfig, OutputConfig, RenderConfig, ReportConfig};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, load_config_file, load_or_default,
    ConfigFileError, CONFIG_FILE_NAMES,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// Editors can use the schema to validate and autocomplete
/// `.sbom-doc.yaml` files.
pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema)
}
