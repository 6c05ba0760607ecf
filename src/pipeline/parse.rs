//! SBOM loading stage.

use crate::error::{ErrorContext, Result};
use crate::model::{Sbom, SbomSource};
use std::path::Path;

/// Load an SBOM file, adding the path to any error.
pub fn load_sbom(path: &Path) -> Result<Sbom> {
    tracing::info!("Parsing SBOM: {:?}", path);

    let sbom = crate::parsers::parse_sbom(path)
        .with_context(|| format!("Failed to parse SBOM: {}", path.display()))?;

    tracing::info!(
        "Parsed {} files, {} packages, {} relationships",
        sbom.files().len(),
        sbom.packages().len(),
        sbom.relationships().len()
    );
    Ok(sbom)
}
