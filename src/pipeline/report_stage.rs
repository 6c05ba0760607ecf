//! Report output stage.
//!
//! Builds the renderer and license source from the configuration, runs the
//! generator, and publishes to the configured destination.

use crate::config::{AppConfig, LicenseTextConfig};
use crate::enrichment::{LicenseTextProvider, NoLicenseText, SpdxClientConfig, SpdxLicenseClient};
use crate::error::{ErrorContext, Result};
use crate::render::Renderer;
use crate::report::{ReportGenerator, ReportOptions, ReportSummary};
use std::path::Path;
use std::time::Duration;

use super::{dirs, should_use_color, OutputTarget};

/// Choose where license text comes from.
///
/// Disabled or offline runs get [`NoLicenseText`], so every license text
/// section shows the fallback paragraph. A client that cannot be built
/// (unwritable cache directory, TLS setup failure) degrades the same way.
#[must_use]
pub fn build_license_provider(
    config: &LicenseTextConfig,
    offline: bool,
) -> Box<dyn LicenseTextProvider> {
    if offline || !config.enabled {
        tracing::debug!("License text lookup disabled");
        return Box::new(NoLicenseText);
    }

    let client_config = SpdxClientConfig {
        base_url: config.base_url.clone(),
        timeout: Duration::from_secs(config.timeout_secs),
        cache_dir: Some(
            config
                .cache_dir
                .clone()
                .unwrap_or_else(dirs::license_cache_dir),
        ),
        cache_ttl: Duration::from_secs(config.cache_ttl_hours * 3600),
        bypass_cache: config.bypass_cache,
    };

    match SpdxLicenseClient::new(client_config) {
        Ok(client) => Box::new(client),
        Err(e) => {
            tracing::warn!("License text lookup unavailable: {e}");
            Box::new(NoLicenseText)
        }
    }
}

/// Generate the report for `sbom_path` as configured.
///
/// `offline` suppresses network lookups regardless of the config file.
pub fn run_report(config: &AppConfig, sbom_path: &Path, offline: bool) -> Result<ReportSummary> {
    let sbom = super::load_sbom(sbom_path)?;

    let destination = OutputTarget::from_option(config.output.file.clone());
    let mut render_options = config.render_options();
    render_options.color = should_use_color(config.output.no_color) && destination.is_terminal();

    let options = ReportOptions {
        sbom_label: sbom_path.display().to_string(),
        include_license: config.report.include_license,
        ntia_summary: config.report.ntia_summary,
        extra_text: config.report.extra_text.clone(),
    };

    let mut generator = ReportGenerator::new(&sbom, options);
    if config.report.include_license {
        generator = generator.with_license_provider(build_license_provider(
            &config.license_text,
            offline,
        ));
    }

    let mut renderer = Renderer::for_format(config.output.format, &render_options);
    let summary = generator
        .generate(&mut renderer, &destination)
        .with_context(|| format!("Failed to write {} report", config.output.format))?;

    tracing::debug!(
        "{} distinct licenses, NTIA conformant: {}",
        summary.frequency.len(),
        summary.ntia.is_conformant()
    );
    Ok(summary)
}
