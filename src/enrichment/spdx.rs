//! License text client for the SPDX license list.
//!
//! Each license on `spdx.org` is published as `<base>/<id>.json`; the text
//! lives in the optional `licenseText` field.

use super::cache::FileCache;
use super::traits::LicenseTextProvider;
use super::LicenseTextError;
use crate::config::{DEFAULT_CACHE_TTL_HOURS, DEFAULT_LICENSE_BASE_URL, DEFAULT_LICENSE_TIMEOUT_SECS};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for [`SpdxLicenseClient`].
#[derive(Debug, Clone)]
pub struct SpdxClientConfig {
    /// License list base URL, without the trailing slash
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Cache directory (None disables caching)
    pub cache_dir: Option<PathBuf>,
    /// Cache TTL
    pub cache_ttl: Duration,
    /// Skip cache reads; fetched text is still written back
    pub bypass_cache: bool,
}

impl Default for SpdxClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_LICENSE_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_LICENSE_TIMEOUT_SECS),
            cache_dir: None,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_HOURS * 3600),
            bypass_cache: false,
        }
    }
}

/// The subset of an SPDX license details document we read.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(not(feature = "enrichment"), allow(dead_code))]
struct LicenseDetails {
    #[serde(default)]
    license_text: Option<String>,
}

#[cfg_attr(not(feature = "enrichment"), allow(dead_code))]
impl LicenseDetails {
    /// The license text, if present and not blank
    fn into_text(self) -> Option<String> {
        self.license_text.filter(|text| !text.trim().is_empty())
    }
}

/// Whether `id` can be used as a path segment of the license list.
///
/// SPDX identifiers are letters, digits, `-`, `.` and `+`; anything else
/// (spaces, slashes, `NOT KNOWN`) cannot name a published license.
fn is_lookup_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '+'))
}

/// Fetches license texts from the SPDX license list, with an optional
/// on-disk cache in front.
pub struct SpdxLicenseClient {
    config: SpdxClientConfig,
    cache: Option<FileCache>,
    #[cfg(feature = "enrichment")]
    client: reqwest::blocking::Client,
}

impl SpdxLicenseClient {
    /// Create a client; fails if the cache directory or HTTP client cannot
    /// be set up.
    pub fn new(config: SpdxClientConfig) -> Result<Self, LicenseTextError> {
        let cache = match &config.cache_dir {
            Some(dir) => Some(FileCache::new(dir.clone(), config.cache_ttl)?),
            None => None,
        };

        #[cfg(feature = "enrichment")]
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| LicenseTextError::Network(e.to_string()))?;

        Ok(Self {
            config,
            cache,
            #[cfg(feature = "enrichment")]
            client,
        })
    }

    fn license_url(&self, license_id: &str) -> String {
        format!(
            "{}/{license_id}.json",
            self.config.base_url.trim_end_matches('/')
        )
    }

    #[cfg(feature = "enrichment")]
    fn fetch_from_api(&self, license_id: &str) -> Result<Option<String>, LicenseTextError> {
        let url = self.license_url(license_id);
        tracing::debug!("Fetching license text from {url}");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .map_err(|e| LicenseTextError::Network(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(LicenseTextError::Status(status.as_u16()));
        }

        let details: LicenseDetails = response
            .json()
            .map_err(|e| LicenseTextError::InvalidResponse(e.to_string()))?;
        Ok(details.into_text())
    }

    #[cfg(not(feature = "enrichment"))]
    fn fetch_from_api(&self, license_id: &str) -> Result<Option<String>, LicenseTextError> {
        tracing::debug!(
            "Cannot fetch {}: built without network support",
            self.license_url(license_id)
        );
        Err(LicenseTextError::Unavailable)
    }
}

impl LicenseTextProvider for SpdxLicenseClient {
    fn fetch(&self, license_id: &str) -> Result<Option<String>, LicenseTextError> {
        if !is_lookup_id(license_id) {
            tracing::debug!("Skipping license text lookup for '{license_id}'");
            return Ok(None);
        }

        if let Some(cache) = &self.cache {
            if !self.config.bypass_cache {
                if let Some(text) = cache.get(license_id) {
                    tracing::debug!("License text for {license_id} served from cache");
                    return Ok(Some(text));
                }
            }
        }

        let text = self.fetch_from_api(license_id)?;

        if let (Some(cache), Some(text)) = (&self.cache, &text) {
            if let Err(e) = cache.set(license_id, text) {
                tracing::debug!(
                    "Could not cache license text in {}: {e}",
                    cache.dir().display()
                );
            }
        }

        Ok(text)
    }

    fn name(&self) -> &'static str {
        "spdx.org"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn unreachable_config(cache_dir: Option<PathBuf>) -> SpdxClientConfig {
        SpdxClientConfig {
            // Discard port; any request fails fast
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(1),
            cache_dir,
            ..SpdxClientConfig::default()
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = SpdxClientConfig::default();
        assert_eq!(config.base_url, "https://spdx.org/licenses");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.cache_dir.is_none());
    }

    #[test]
    fn test_license_url() {
        let client = SpdxLicenseClient::new(SpdxClientConfig {
            base_url: "https://spdx.org/licenses/".to_string(),
            ..SpdxClientConfig::default()
        })
        .unwrap();
        assert_eq!(
            client.license_url("Apache-2.0"),
            "https://spdx.org/licenses/Apache-2.0.json"
        );
    }

    fn details(body: &str) -> serde_json::Result<Option<String>> {
        serde_json::from_str::<LicenseDetails>(body).map(LicenseDetails::into_text)
    }

    #[test]
    fn test_license_details_text() {
        let body = r#"{"licenseId": "MIT", "licenseText": "MIT License\n\nPermission..."}"#;
        assert_eq!(
            details(body).unwrap().as_deref(),
            Some("MIT License\n\nPermission...")
        );

        assert_eq!(details(r#"{"licenseId": "X"}"#).unwrap(), None);
        assert_eq!(details(r#"{"licenseText": "  "}"#).unwrap(), None);
        assert!(details("<html>").is_err());
    }

    #[test]
    fn test_lookup_ids() {
        assert!(is_lookup_id("MIT"));
        assert!(is_lookup_id("GPL-2.0+"));
        assert!(is_lookup_id("LGPL-2.1-only"));
        assert!(!is_lookup_id("NOT KNOWN"));
        assert!(!is_lookup_id("../etc/passwd"));
        assert!(!is_lookup_id(""));
    }

    #[test]
    fn test_unusable_id_skips_lookup() {
        let client = SpdxLicenseClient::new(unreachable_config(None)).unwrap();
        assert_eq!(client.fetch("NOT KNOWN").unwrap(), None);
    }

    #[test]
    fn test_cache_hit_avoids_network() {
        let tmp = TempDir::new().unwrap();
        let cache = FileCache::new(tmp.path().to_path_buf(), Duration::from_secs(3600)).unwrap();
        cache.set("MIT", "cached MIT text").unwrap();

        let client =
            SpdxLicenseClient::new(unreachable_config(Some(tmp.path().to_path_buf()))).unwrap();
        assert_eq!(client.fetch("MIT").unwrap().as_deref(), Some("cached MIT text"));
    }

    #[test]
    fn test_network_failure_is_an_error() {
        let client = SpdxLicenseClient::new(unreachable_config(None)).unwrap();
        assert!(client.fetch("MIT").is_err());
    }
}
