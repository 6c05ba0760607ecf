//! License text provider trait and its null implementation.

use super::LicenseTextError;

/// Source of full license texts, keyed by SPDX license identifier.
///
/// `Ok(None)` means the provider knows nothing about the identifier; callers
/// treat that exactly like an error and fall back to a placeholder.
///
/// # Example
///
/// ```ignore
/// use sbom_doc::enrichment::{LicenseTextProvider, NoLicenseText, SpdxLicenseClient};
///
/// let provider: Box<dyn LicenseTextProvider> = if offline {
///     Box::new(NoLicenseText)
/// } else {
///     Box::new(SpdxLicenseClient::new(config)?)
/// };
/// let text = provider.fetch("MIT")?;
/// ```
pub trait LicenseTextProvider {
    /// Look up the text for `license_id`.
    fn fetch(&self, license_id: &str) -> Result<Option<String>, LicenseTextError>;

    /// Short provider name for diagnostics.
    fn name(&self) -> &'static str;
}

impl<P: LicenseTextProvider + ?Sized> LicenseTextProvider for &P {
    fn fetch(&self, license_id: &str) -> Result<Option<String>, LicenseTextError> {
        (**self).fetch(license_id)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<P: LicenseTextProvider + ?Sized> LicenseTextProvider for Box<P> {
    fn fetch(&self, license_id: &str) -> Result<Option<String>, LicenseTextError> {
        (**self).fetch(license_id)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// A provider that never has any text.
///
/// Used when license lookups are disabled or the crate is built without
/// network support.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLicenseText;

impl LicenseTextProvider for NoLicenseText {
    fn fetch(&self, _license_id: &str) -> Result<Option<String>, LicenseTextError> {
        Ok(None)
    }

    fn name(&self) -> &'static str {
        "none"
    }
}
