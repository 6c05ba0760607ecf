//! SPDX SBOM parser.
//!
//! Reads SPDX 2.x documents in JSON, YAML and tag-value form. Only the
//! fields the report displays are kept; everything else is skipped.

use crate::model::{
    Creator, Document, ExternalReference, Package, Relationship, Sbom, SbomFile,
};
use crate::parsers::traits::{
    FormatConfidence, FormatDetection, ParseError, SbomParser,
};
use serde::Deserialize;

/// Parser for SPDX SBOM format
#[derive(Debug, Clone, Copy, Default)]
pub struct SpdxParser;

impl SpdxParser {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn parse_json(content: &str) -> Result<Sbom, ParseError> {
        let spdx: SpdxDocument = serde_json::from_str(content)?;
        convert_to_sbom(spdx)
    }

    fn parse_yaml(content: &str) -> Result<Sbom, ParseError> {
        let spdx: SpdxDocument = serde_yaml::from_str(content)?;
        convert_to_sbom(spdx)
    }

    fn parse_tag_value(content: &str) -> Result<Sbom, ParseError> {
        convert_to_sbom(parse_tag_value_format(content))
    }

    /// Pull the `SPDX-x.y` version string out of raw content
    fn extract_spdx_version(content: &str) -> Option<String> {
        let start = content.find("SPDX-")?;
        let version: String = content[start..]
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.'))
            .collect();
        (version.len() > "SPDX-".len()).then_some(version)
    }
}

impl SbomParser for SpdxParser {
    fn parse_str(&self, content: &str) -> Result<Sbom, ParseError> {
        let detection = self.detect(content);
        match detection.variant.as_deref() {
            Some("JSON") => Self::parse_json(content),
            Some("YAML") => Self::parse_yaml(content),
            Some("tag-value") => Self::parse_tag_value(content),
            _ => Err(ParseError::UnknownFormat(
                "content does not look like an SPDX document".to_string(),
            )),
        }
    }

    fn format_name(&self) -> &'static str {
        "SPDX"
    }

    fn detect(&self, content: &str) -> FormatDetection {
        let trimmed = content.trim_start();
        let version = Self::extract_spdx_version(content);

        if trimmed.starts_with('{') {
            let has_spdx_version = content.contains("\"spdxVersion\"");
            let has_spdx_id = content.contains("\"SPDXID\"");
            let has_data_license = content.contains("\"dataLicense\"");

            let confidence = if has_spdx_version && has_spdx_id {
                FormatConfidence::CERTAIN
            } else if has_spdx_version || (has_spdx_id && has_data_license) {
                FormatConfidence::HIGH
            } else {
                return FormatDetection::no_match();
            };
            return FormatDetection::with_confidence(confidence)
                .variant("JSON")
                .version(version);
        }

        if trimmed.starts_with("SPDXVersion:") || content.contains("\nSPDXVersion:") {
            return FormatDetection::with_confidence(FormatConfidence::CERTAIN)
                .variant("tag-value")
                .version(version);
        }

        let yaml_key = |key: &str| {
            content
                .lines()
                .any(|line| line.trim_start().starts_with(key))
        };
        if yaml_key("spdxVersion:") {
            let confidence = if yaml_key("SPDXID:") {
                FormatConfidence::CERTAIN
            } else {
                FormatConfidence::HIGH
            };
            return FormatDetection::with_confidence(confidence)
                .variant("YAML")
                .version(version);
        }

        FormatDetection::no_match()
    }
}

// ============================================================================
// Conversion to the normalized model
// ============================================================================

/// Treat empty strings as absent.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Strip the `Organization:` / `Person:` prefix from a supplier field.
fn supplier_name(value: &str) -> String {
    value
        .strip_prefix("Organization:")
        .or_else(|| value.strip_prefix("Person:"))
        .unwrap_or(value)
        .trim()
        .to_string()
}

fn convert_to_sbom(spdx: SpdxDocument) -> Result<Sbom, ParseError> {
    let version = non_empty(spdx.spdx_version);
    if let Some(v) = &version {
        if v.starts_with("SPDX-3") {
            return Err(ParseError::UnsupportedVersion(v.clone()));
        }
    }

    let mut document = Document::new("SPDX");
    document.version = version;
    document.name = non_empty(spdx.name);
    if let Some(info) = spdx.creation_info {
        document.creators = info
            .creators
            .iter()
            .filter(|c| !c.trim().is_empty())
            .map(|c| Creator::from_spdx(c))
            .collect();
        document.created = non_empty(info.created);
    }

    let mut sbom = Sbom::new(document);

    for file in spdx.files {
        sbom.add_file(SbomFile {
            id: non_empty(file.spdx_id),
            name: non_empty(file.file_name),
            file_types: file.file_types,
            license_concluded: non_empty(file.license_concluded),
            copyright_text: non_empty(file.copyright_text),
        });
    }

    for pkg in spdx.packages {
        sbom.add_package(Package {
            id: non_empty(pkg.spdx_id),
            name: non_empty(pkg.name),
            version: non_empty(pkg.version_info),
            supplier: non_empty(pkg.supplier.as_deref().map(supplier_name)),
            license_concluded: non_empty(pkg.license_concluded),
            external_references: pkg
                .external_refs
                .into_iter()
                .map(|r| ExternalReference {
                    category: non_empty(r.reference_category),
                    reference_type: r.reference_type,
                    locator: r.reference_locator,
                })
                .collect(),
            download_location: non_empty(pkg.download_location),
            copyright_text: non_empty(pkg.copyright_text),
        });
    }

    for rel in spdx.relationships {
        sbom.add_relationship(Relationship::new(
            rel.spdx_element_id,
            rel.relationship_type,
            rel.related_spdx_element,
        ));
    }

    tracing::debug!(
        "SPDX document: {} files, {} packages, {} relationships",
        sbom.files.len(),
        sbom.packages.len(),
        sbom.relationships.len()
    );
    Ok(sbom)
}

// ============================================================================
// Tag-value format
// ============================================================================

/// Which element the following tag-value lines describe.
enum Section {
    Document,
    File(SpdxFile),
    Package(SpdxPackage),
}

/// Collect the value of a tag, following `<text>...</text>` blocks over
/// multiple lines.
fn read_value<'a, I>(first: &str, lines: &mut I) -> String
where
    I: Iterator<Item = &'a str>,
{
    let value = first.trim();
    let Some(body) = value.strip_prefix("<text>") else {
        return value.to_string();
    };
    if let Some(end) = body.find("</text>") {
        return body[..end].to_string();
    }

    let mut text = body.to_string();
    for line in lines.by_ref() {
        text.push('\n');
        if let Some(end) = line.find("</text>") {
            text.push_str(&line[..end]);
            break;
        }
        text.push_str(line);
    }
    text.trim().to_string()
}

fn parse_tag_value_format(content: &str) -> SpdxDocument {
    let mut doc = SpdxDocument::default();
    let mut creation_info = SpdxCreationInfo::default();
    let mut section = Section::Document;

    let finish = |section: Section, doc: &mut SpdxDocument| match section {
        Section::Document => {}
        Section::File(file) => doc.files.push(file),
        Section::Package(pkg) => doc.packages.push(pkg),
    };

    let mut lines = content.lines();
    while let Some(raw) = lines.next() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let value = read_value(rest, &mut lines);

        match key.trim() {
            "SPDXVersion" => doc.spdx_version = Some(value),
            "DocumentName" => doc.name = Some(value),
            "Creator" => creation_info.creators.push(value),
            "Created" => creation_info.created = Some(value),
            "FileName" => {
                finish(std::mem::replace(&mut section, Section::Document), &mut doc);
                section = Section::File(SpdxFile {
                    file_name: Some(value),
                    ..SpdxFile::default()
                });
            }
            "PackageName" => {
                finish(std::mem::replace(&mut section, Section::Document), &mut doc);
                section = Section::Package(SpdxPackage {
                    name: Some(value),
                    ..SpdxPackage::default()
                });
            }
            "SPDXID" => match &mut section {
                Section::Document => {}
                Section::File(file) => file.spdx_id = Some(value),
                Section::Package(pkg) => pkg.spdx_id = Some(value),
            },
            "Relationship" => {
                if let Some(rel) = parse_relationship_line(&value) {
                    doc.relationships.push(rel);
                }
            }
            tag => match &mut section {
                Section::File(file) => match tag {
                    "FileType" => file.file_types.push(value),
                    "LicenseConcluded" => file.license_concluded = Some(value),
                    "FileCopyrightText" => file.copyright_text = Some(value),
                    _ => {}
                },
                Section::Package(pkg) => match tag {
                    "PackageVersion" => pkg.version_info = Some(value),
                    "PackageSupplier" => pkg.supplier = Some(value),
                    "PackageDownloadLocation" => pkg.download_location = Some(value),
                    "PackageLicenseConcluded" => pkg.license_concluded = Some(value),
                    "PackageCopyrightText" => pkg.copyright_text = Some(value),
                    "ExternalRef" => {
                        if let Some(ext_ref) = parse_external_ref_line(&value) {
                            pkg.external_refs.push(ext_ref);
                        }
                    }
                    _ => {}
                },
                Section::Document => {}
            },
        }
    }
    finish(section, &mut doc);

    doc.creation_info = Some(creation_info);
    doc
}

/// `Relationship: <source> <TYPE> <target>`
fn parse_relationship_line(value: &str) -> Option<SpdxRelationship> {
    let mut parts = value.split_whitespace();
    Some(SpdxRelationship {
        spdx_element_id: parts.next()?.to_string(),
        relationship_type: parts.next()?.to_string(),
        related_spdx_element: parts.next()?.to_string(),
    })
}

/// `ExternalRef: <category> <type> <locator>`
fn parse_external_ref_line(value: &str) -> Option<SpdxExternalRef> {
    let mut parts = value.split_whitespace();
    Some(SpdxExternalRef {
        reference_category: Some(parts.next()?.to_string()),
        reference_type: parts.next()?.to_string(),
        reference_locator: parts.next()?.to_string(),
    })
}

// ============================================================================
// SPDX serde structures (JSON and YAML share the same keys)
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SpdxDocument {
    spdx_version: Option<String>,
    name: Option<String>,
    creation_info: Option<SpdxCreationInfo>,
    files: Vec<SpdxFile>,
    packages: Vec<SpdxPackage>,
    relationships: Vec<SpdxRelationship>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SpdxCreationInfo {
    created: Option<String>,
    creators: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SpdxFile {
    #[serde(rename = "SPDXID")]
    spdx_id: Option<String>,
    file_name: Option<String>,
    file_types: Vec<String>,
    license_concluded: Option<String>,
    copyright_text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SpdxPackage {
    #[serde(rename = "SPDXID")]
    spdx_id: Option<String>,
    name: Option<String>,
    version_info: Option<String>,
    supplier: Option<String>,
    download_location: Option<String>,
    license_concluded: Option<String>,
    copyright_text: Option<String>,
    external_refs: Vec<SpdxExternalRef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxExternalRef {
    #[serde(default)]
    reference_category: Option<String>,
    reference_type: String,
    reference_locator: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxRelationship {
    spdx_element_id: String,
    relationship_type: String,
    related_spdx_element: String,
}
