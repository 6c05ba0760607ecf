//! CycloneDX SBOM parser (JSON).
//!
//! Components of type `file` become file entries; every other component is
//! a package. Dependency edges become `DEPENDS_ON` relationships.

use crate::model::{
    Creator, CreatorType, Document, ExternalReference, Package, Relationship, Sbom, SbomFile,
};
use crate::parsers::traits::{FormatConfidence, FormatDetection, ParseError, SbomParser};
use serde::Deserialize;

/// Parser for CycloneDX SBOM format
#[derive(Debug, Clone, Copy, Default)]
pub struct CycloneDxParser;

impl CycloneDxParser {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Read `"specVersion": "x.y"` without a full parse
    fn extract_spec_version(content: &str) -> Option<String> {
        let key = content.find("\"specVersion\"")?;
        let rest = &content[key + "\"specVersion\"".len()..];
        let open = rest.find('"')?;
        let rest = &rest[open + 1..];
        let close = rest.find('"')?;
        Some(rest[..close].to_string())
    }
}

impl SbomParser for CycloneDxParser {
    fn parse_str(&self, content: &str) -> Result<Sbom, ParseError> {
        if !content.trim_start().starts_with('{') {
            return Err(ParseError::UnknownFormat(
                "only the JSON form of CycloneDX is supported".to_string(),
            ));
        }
        let bom: CycloneDxBom = serde_json::from_str(content)?;
        convert_to_sbom(bom)
    }

    fn format_name(&self) -> &'static str {
        "CycloneDX"
    }

    fn detect(&self, content: &str) -> FormatDetection {
        if !content.trim_start().starts_with('{') {
            return FormatDetection::no_match();
        }
        let confidence = if content.contains("\"bomFormat\"") && content.contains("CycloneDX") {
            FormatConfidence::CERTAIN
        } else if content.contains("\"specVersion\"") && content.contains("\"components\"") {
            FormatConfidence::MEDIUM
        } else {
            return FormatDetection::no_match();
        };
        FormatDetection::with_confidence(confidence)
            .variant("JSON")
            .version(Self::extract_spec_version(content))
    }
}

// ============================================================================
// Conversion to the normalized model
// ============================================================================

fn convert_to_sbom(bom: CycloneDxBom) -> Result<Sbom, ParseError> {
    let spec_version = bom
        .spec_version
        .ok_or_else(|| ParseError::MissingField("specVersion".to_string()))?;

    let mut document = Document::new("CycloneDX").with_version(spec_version);
    if let Some(metadata) = bom.metadata {
        document.created = metadata.timestamp;
        document.name = metadata.component.and_then(|c| c.name);
        if let Some(tools) = metadata.tools {
            document.creators.extend(tools.into_tools().into_iter().filter_map(tool_creator));
        }
        for author in metadata.authors {
            if let Some(name) = author.name {
                let mut creator = Creator::new(CreatorType::Person, name);
                creator.email = author.email;
                document.creators.push(creator);
            }
        }
    }

    let mut sbom = Sbom::new(document);
    // Depth-first, in document order
    let mut pending: Vec<CdxComponent> = bom.components.into_iter().rev().collect();
    while let Some(component) = pending.pop() {
        let CdxComponent {
            component_type,
            bom_ref,
            name,
            version,
            supplier,
            author,
            licenses,
            copyright,
            purl,
            external_references,
            components,
        } = component;
        pending.extend(components.into_iter().rev());

        let license = license_of(&licenses);
        if component_type.as_deref() == Some("file") {
            sbom.add_file(SbomFile {
                id: bom_ref,
                name,
                file_types: Vec::new(),
                license_concluded: license,
                copyright_text: copyright,
            });
            continue;
        }

        let download_location = external_references
            .iter()
            .find(|r| r.ref_type == "distribution")
            .map(|r| r.url.clone());
        let mut references: Vec<ExternalReference> = purl
            .into_iter()
            .map(|p| ExternalReference::new("PACKAGE-MANAGER", "purl", p))
            .collect();
        references.extend(external_references.into_iter().map(|r| ExternalReference {
            category: None,
            reference_type: r.ref_type,
            locator: r.url,
        }));

        sbom.add_package(Package {
            id: bom_ref,
            name,
            version,
            supplier: supplier.and_then(|s| s.name).or(author),
            license_concluded: license,
            external_references: references,
            download_location,
            copyright_text: copyright,
        });
    }

    for dependency in bom.dependencies {
        for target in dependency.depends_on {
            sbom.add_relationship(Relationship::new(
                dependency.ref_field.clone(),
                "DEPENDS_ON",
                target,
            ));
        }
    }

    tracing::debug!(
        "CycloneDX document: {} files, {} packages, {} relationships",
        sbom.files.len(),
        sbom.packages.len(),
        sbom.relationships.len()
    );
    Ok(sbom)
}

/// Tools are recorded the way SPDX writes them: `name-version`.
fn tool_creator(tool: CdxTool) -> Option<Creator> {
    let name = tool.name?;
    let label = match tool.version {
        Some(version) => format!("{name}-{version}"),
        None => name,
    };
    Some(Creator::new(CreatorType::Tool, label))
}

/// Combine a component's license choices into one concluded license.
///
/// A single expression is used as-is; several licenses all apply, so they
/// are joined with `AND`.
fn license_of(choices: &[CdxLicenseChoice]) -> Option<String> {
    let parts: Vec<String> = choices
        .iter()
        .filter_map(|choice| {
            choice.expression.clone().or_else(|| {
                choice
                    .license
                    .as_ref()
                    .and_then(|l| l.id.clone().or_else(|| l.name.clone()))
            })
        })
        .filter(|p| !p.trim().is_empty())
        .collect();

    match parts.len() {
        0 => None,
        1 => parts.into_iter().next(),
        _ => Some(
            parts
                .iter()
                .map(|p| {
                    if p.contains(' ') {
                        format!("({p})")
                    } else {
                        p.clone()
                    }
                })
                .collect::<Vec<_>>()
                .join(" AND "),
        ),
    }
}

// ============================================================================
// CycloneDX JSON structures
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CycloneDxBom {
    spec_version: Option<String>,
    metadata: Option<CdxMetadata>,
    #[serde(default)]
    components: Vec<CdxComponent>,
    #[serde(default)]
    dependencies: Vec<CdxDependency>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxMetadata {
    timestamp: Option<String>,
    tools: Option<CdxTools>,
    #[serde(default)]
    authors: Vec<CdxAuthor>,
    component: Option<CdxMetadataComponent>,
}

/// Tools are an array up to 1.4 and an object of components/services from 1.5
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CdxTools {
    List(Vec<CdxTool>),
    Object {
        #[serde(default)]
        components: Vec<CdxTool>,
        #[serde(default)]
        services: Vec<CdxTool>,
    },
}

impl CdxTools {
    fn into_tools(self) -> Vec<CdxTool> {
        match self {
            Self::List(tools) => tools,
            Self::Object {
                mut components,
                services,
            } => {
                components.extend(services);
                components
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct CdxTool {
    name: Option<String>,
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CdxAuthor {
    name: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CdxMetadataComponent {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxComponent {
    #[serde(rename = "type")]
    component_type: Option<String>,
    #[serde(rename = "bom-ref")]
    bom_ref: Option<String>,
    name: Option<String>,
    version: Option<String>,
    supplier: Option<CdxSupplier>,
    author: Option<String>,
    #[serde(default)]
    licenses: Vec<CdxLicenseChoice>,
    copyright: Option<String>,
    purl: Option<String>,
    #[serde(default)]
    external_references: Vec<CdxExternalReference>,
    #[serde(default)]
    components: Vec<CdxComponent>,
}

#[derive(Debug, Deserialize)]
struct CdxLicenseChoice {
    license: Option<CdxLicense>,
    expression: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CdxLicense {
    id: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CdxSupplier {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CdxExternalReference {
    #[serde(rename = "type")]
    ref_type: String,
    url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxDependency {
    #[serde(rename = "ref")]
    ref_field: String,
    #[serde(default)]
    depends_on: Vec<String>,
}
