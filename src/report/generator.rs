//! The fixed section sequence of an SBOM summary report.

use crate::analysis::{concluded_license, Ecosystem, LicenseFrequency, NtiaConformance, NOT_KNOWN};
use crate::enrichment::{LicenseTextProvider, NoLicenseText};
use crate::model::SbomSource;
use crate::pipeline::OutputTarget;
use crate::render::{DocumentBuilder, ReportError};
use serde::Serialize;
use std::path::PathBuf;

/// Placeholder for a missing text value
const MISSING: &str = "-";

/// Paragraph shown when a license text cannot be retrieved
pub const LICENSE_TEXT_FALLBACK: &str = "Unable to find license text.";

/// Which optional sections to produce, and how to label the input.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Shown as the "SBOM File" row, usually the input path
    pub sbom_label: String,
    /// Append a "License Text" section
    pub include_license: bool,
    /// Append the NTIA minimum elements table
    pub ntia_summary: bool,
    /// File appended verbatim as an "Extra notice" section
    pub extra_text: Option<PathBuf>,
}

/// What the generator computed while producing a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub frequency: LicenseFrequency,
    pub ntia: NtiaConformance,
}

/// Drives a [`DocumentBuilder`] through the report sections for one SBOM.
pub struct ReportGenerator<'a, S: SbomSource + ?Sized> {
    source: &'a S,
    options: ReportOptions,
    license_provider: Box<dyn LicenseTextProvider + 'a>,
}

impl<'a, S: SbomSource + ?Sized> ReportGenerator<'a, S> {
    /// Generator with no license text source; use
    /// [`with_license_provider`](Self::with_license_provider) to add one.
    pub fn new(source: &'a S, options: ReportOptions) -> Self {
        Self {
            source,
            options,
            license_provider: Box::new(NoLicenseText),
        }
    }

    #[must_use]
    pub fn with_license_provider(mut self, provider: impl LicenseTextProvider + 'a) -> Self {
        self.license_provider = Box::new(provider);
        self
    }

    /// Emit every section and publish the document to `destination`.
    ///
    /// Only sink errors and an unreadable extra-text file fail the report;
    /// license lookups degrade to a placeholder paragraph.
    pub fn generate<B: DocumentBuilder + ?Sized>(
        &self,
        builder: &mut B,
        destination: &OutputTarget,
    ) -> Result<ReportSummary, ReportError> {
        let summary = self.render_sections(builder)?;
        builder.publish(destination)?;
        Ok(summary)
    }

    /// Emit every section without publishing, leaving the document in
    /// `builder`.
    pub fn render_sections<B: DocumentBuilder + ?Sized>(
        &self,
        builder: &mut B,
    ) -> Result<ReportSummary, ReportError> {
        let frequency = LicenseFrequency::from_inventory(self.source.files(), self.source.packages());
        let ntia = NtiaConformance::evaluate(self.source);

        self.sbom_summary(builder)?;
        self.file_summary(builder)?;
        self.package_summary(builder)?;
        license_summary(builder, &frequency)?;
        if self.options.ntia_summary {
            ntia_summary(builder, &ntia)?;
        }
        if self.options.include_license {
            self.license_text(builder, &frequency)?;
        }
        if let Some(path) = &self.options.extra_text {
            extra_notice(builder, path)?;
        }
        Ok(ReportSummary { frequency, ntia })
    }

    fn sbom_summary<B: DocumentBuilder + ?Sized>(&self, builder: &mut B) -> Result<(), ReportError> {
        let document = self.source.document();
        let field = |value: Option<&str>| value.unwrap_or(MISSING).to_string();

        builder.heading(1, "SBOM Summary", true)?;
        builder.create_table(&["Item", "Details"], None);
        builder.add_row(vec!["SBOM File".into(), self.options.sbom_label.clone()]);
        builder.add_row(vec![
            "SBOM Type".into(),
            field(document.map(|d| d.doc_type.as_str())),
        ]);
        builder.add_row(vec![
            "Version".into(),
            field(document.and_then(|d| d.version.as_deref())),
        ]);
        builder.add_row(vec![
            "Name".into(),
            field(document.and_then(|d| d.name.as_deref())),
        ]);
        for creator in document.map(|d| d.creators.as_slice()).unwrap_or_default() {
            builder.add_row(vec!["Creator".into(), creator.to_string()]);
        }
        builder.add_row(vec![
            "Created".into(),
            field(document.and_then(|d| d.created.as_deref())),
        ]);
        builder.add_row(vec!["Files".into(), self.source.files().len().to_string()]);
        builder.add_row(vec![
            "Packages".into(),
            self.source.packages().len().to_string(),
        ]);
        builder.add_row(vec![
            "Relationships".into(),
            self.source.relationships().len().to_string(),
        ]);
        builder.show_table(Some(&[5, 9]))
    }

    fn file_summary<B: DocumentBuilder + ?Sized>(&self, builder: &mut B) -> Result<(), ReportError> {
        let files = self.source.files();
        if files.is_empty() {
            return Ok(());
        }

        builder.heading(1, "File Summary", true)?;
        builder.create_table(&["Name", "Type", "License", "Copyright"], None);
        for file in files {
            let file_type = if file.file_types.is_empty() {
                NOT_KNOWN.to_string()
            } else {
                file.file_types.join(", ")
            };
            builder.add_row(vec![
                file.name.clone().unwrap_or_else(|| MISSING.to_string()),
                file_type,
                concluded_license(file.license_concluded.as_deref()).to_string(),
                file.copyright_text.clone().unwrap_or_else(|| MISSING.to_string()),
            ]);
        }
        builder.show_table(Some(&[3, 2, 4, 5]))
    }

    fn package_summary<B: DocumentBuilder + ?Sized>(
        &self,
        builder: &mut B,
    ) -> Result<(), ReportError> {
        let packages = self.source.packages();
        if packages.is_empty() {
            return Ok(());
        }
        let text = |value: &Option<String>| value.clone().unwrap_or_else(|| MISSING.to_string());

        builder.heading(1, "Package Summary", true)?;
        builder.create_table(&["Name", "Version", "Supplier", "License"], Some(&[12, 8, 8, 12]));
        for package in packages {
            builder.add_row(vec![
                text(&package.name),
                text(&package.version),
                package
                    .supplier
                    .clone()
                    .unwrap_or_else(|| NOT_KNOWN.to_string()),
                concluded_license(package.license_concluded.as_deref()).to_string(),
            ]);
        }
        builder.show_table(Some(&[5, 2, 2, 5]))?;

        // Too many columns for one table
        builder.paragraph("")?;
        builder.create_table(
            &["Name", "Version", "Ecosystem", "Download", "Copyright"],
            Some(&[12, 8, 5, 8, 7]),
        );
        for package in packages {
            builder.add_row(vec![
                text(&package.name),
                text(&package.version),
                Ecosystem::of(package).to_string(),
                package
                    .download_location
                    .clone()
                    .unwrap_or_else(|| NOT_KNOWN.to_string()),
                text(&package.copyright_text),
            ]);
        }
        builder.show_table(Some(&[5, 2, 2, 2, 2]))
    }

    fn license_text<B: DocumentBuilder + ?Sized>(
        &self,
        builder: &mut B,
        frequency: &LicenseFrequency,
    ) -> Result<(), ReportError> {
        builder.page_break()?;
        builder.heading(1, "License Text", true)?;

        for license in frequency.text_candidates() {
            let text = match self.license_provider.fetch(license) {
                Ok(Some(text)) => Some(text),
                Ok(None) => {
                    tracing::warn!(
                        "No license text for {license} from {}",
                        self.license_provider.name()
                    );
                    None
                }
                Err(e) => {
                    tracing::warn!(
                        "License text lookup for {license} via {} failed: {e}",
                        self.license_provider.name()
                    );
                    None
                }
            };
            builder.heading(2, license, false)?;
            builder.paragraph(text.as_deref().unwrap_or(LICENSE_TEXT_FALLBACK))?;
        }
        Ok(())
    }
}

fn license_summary<B: DocumentBuilder + ?Sized>(
    builder: &mut B,
    frequency: &LicenseFrequency,
) -> Result<(), ReportError> {
    builder.heading(1, "License Summary", true)?;
    builder.create_table(&["License", "Count"], Some(&[25, 6]));
    for (license, count) in frequency.iter() {
        builder.add_row(vec![license.to_string(), count.to_string()]);
    }
    builder.show_table(Some(&[10, 4]))
}

/// `True` / `False`, as the NTIA table prints them
fn yes_no(value: bool) -> String {
    if value { "True" } else { "False" }.to_string()
}

fn ntia_summary<B: DocumentBuilder + ?Sized>(
    builder: &mut B,
    ntia: &NtiaConformance,
) -> Result<(), ReportError> {
    builder.heading(1, "NTIA Summary", true)?;
    builder.create_table(&["Element", "Status"], None);
    for (element, status) in ntia.elements() {
        builder.add_row(vec![element.to_string(), yes_no(status)]);
    }
    builder.add_row(vec![
        "NTIA conformant?".to_string(),
        yes_no(ntia.is_conformant()),
    ]);
    builder.show_table(Some(&[10, 4]))
}

fn extra_notice<B: DocumentBuilder + ?Sized>(
    builder: &mut B,
    path: &std::path::Path,
) -> Result<(), ReportError> {
    let text = std::fs::read_to_string(path).map_err(|source| ReportError::ExtraText {
        path: path.to_path_buf(),
        source,
    })?;
    builder.page_break()?;
    builder.heading(1, "Extra notice", true)?;
    builder.paragraph(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::LicenseTextError;
    use crate::model::{Creator, CreatorType, Document, Package, Relationship, Sbom, SbomFile};
    use std::cell::RefCell;

    /// Builder that records every call as a line of text.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        tables: Vec<(Vec<String>, Vec<Vec<String>>)>,
        open: Option<(Vec<String>, Vec<Vec<String>>)>,
    }

    impl DocumentBuilder for Recorder {
        fn heading(&mut self, level: u8, title: &str, numbered: bool) -> Result<(), ReportError> {
            self.calls.push(format!("heading {level} {title} {numbered}"));
            Ok(())
        }

        fn paragraph(&mut self, text: &str) -> Result<(), ReportError> {
            self.calls.push(format!("paragraph {text}"));
            Ok(())
        }

        fn create_table(&mut self, headers: &[&str], _width_hints: Option<&[u32]>) {
            self.calls.push(format!("table {}", headers.join("|")));
            self.open = Some((headers.iter().map(|h| h.to_string()).collect(), Vec::new()));
        }

        fn add_row(&mut self, values: Vec<String>) {
            if let Some((_, rows)) = &mut self.open {
                rows.push(values);
            }
        }

        fn show_table(&mut self, widths: Option<&[u32]>) -> Result<(), ReportError> {
            self.calls.push(format!("show {widths:?}"));
            if let Some(table) = self.open.take() {
                self.tables.push(table);
            }
            Ok(())
        }

        fn page_break(&mut self) -> Result<(), ReportError> {
            self.calls.push("page_break".to_string());
            Ok(())
        }

        fn publish(&mut self, destination: &OutputTarget) -> Result<(), ReportError> {
            self.calls.push(format!("publish {destination:?}"));
            Ok(())
        }
    }

    impl Recorder {
        fn table(&self, first_header: &str) -> &Vec<Vec<String>> {
            &self
                .tables
                .iter()
                .find(|(headers, _)| headers[0] == first_header)
                .unwrap()
                .1
        }
    }

    /// Provider that serves one license and counts calls.
    struct OneLicense {
        calls: RefCell<Vec<String>>,
    }

    impl LicenseTextProvider for OneLicense {
        fn fetch(&self, license_id: &str) -> Result<Option<String>, LicenseTextError> {
            self.calls.borrow_mut().push(license_id.to_string());
            match license_id {
                "MIT" => Ok(Some("MIT text".to_string())),
                "Apache-2.0" => Err(LicenseTextError::Status(500)),
                _ => Ok(None),
            }
        }

        fn name(&self) -> &'static str {
            "one-license"
        }
    }

    fn sample_sbom() -> Sbom {
        let document = Document::new("SPDX")
            .with_version("SPDX-2.3")
            .with_name("demo")
            .with_creator(Creator::new(CreatorType::Tool, "sbom4python"))
            .with_created("2024-01-01T00:00:00Z");
        let mut sbom = Sbom::new(document);
        sbom.add_file(SbomFile::new("SPDXRef-F1", "main.py").with_file_type("SOURCE"));
        sbom.add_package(
            Package::new("SPDXRef-P1", "requests")
                .with_version("2.28.0")
                .with_supplier("PSF")
                .with_license("Apache-2.0")
                .with_purl("pkg:pypi/requests@2.28.0"),
        );
        sbom.add_package(
            Package::new("SPDXRef-P2", "left-pad")
                .with_version("1.3.0")
                .with_license("MIT OR ISC")
                .with_purl("not a purl"),
        );
        sbom.add_package(Package::new("SPDXRef-P3", "six").with_license("MIT"));
        sbom.add_relationship(Relationship::new("SPDXRef-P1", "DEPENDS_ON", "SPDXRef-P2"));
        sbom
    }

    #[test]
    fn test_section_sequence() {
        let sbom = sample_sbom();
        let options = ReportOptions {
            sbom_label: "demo.spdx.json".to_string(),
            ntia_summary: true,
            ..ReportOptions::default()
        };
        let mut recorder = Recorder::default();
        ReportGenerator::new(&sbom, options)
            .generate(&mut recorder, &OutputTarget::Stdout)
            .unwrap();

        let headings: Vec<&str> = recorder
            .calls
            .iter()
            .filter(|c| c.starts_with("heading"))
            .map(String::as_str)
            .collect();
        assert_eq!(
            headings,
            vec![
                "heading 1 SBOM Summary true",
                "heading 1 File Summary true",
                "heading 1 Package Summary true",
                "heading 1 License Summary true",
                "heading 1 NTIA Summary true",
            ]
        );
        assert_eq!(recorder.calls.last().unwrap(), "publish Stdout");
        assert!(recorder.calls.contains(&"show Some([5, 9])".to_string()));
        assert!(recorder.calls.contains(&"show Some([5, 2, 2, 2, 2])".to_string()));
    }

    #[test]
    fn test_summary_rows() {
        let sbom = sample_sbom();
        let options = ReportOptions {
            sbom_label: "demo.spdx.json".to_string(),
            ..ReportOptions::default()
        };
        let mut recorder = Recorder::default();
        let summary = ReportGenerator::new(&sbom, options)
            .generate(&mut recorder, &OutputTarget::Stdout)
            .unwrap();

        let items = recorder.table("Item");
        assert_eq!(items[0], vec!["SBOM File", "demo.spdx.json"]);
        assert_eq!(items[4], vec!["Creator", "Tool:sbom4python"]);
        assert_eq!(items[7], vec!["Packages", "3"]);

        let files = recorder.table("Name");
        assert_eq!(files[0], vec!["main.py", "SOURCE", "NOT KNOWN", "-"]);

        let ecosystems: Vec<&str> = recorder
            .tables
            .iter()
            .find(|(headers, _)| headers.len() == 5)
            .unwrap()
            .1
            .iter()
            .map(|row| row[2].as_str())
            .collect();
        assert_eq!(ecosystems, vec!["pypi", "INVALID", "-"]);

        assert_eq!(summary.frequency.total(), 4);
        assert_eq!(summary.frequency.get("NOT KNOWN"), 1);
        assert!(!summary.ntia.packages_valid);
        // NTIA table only on request
        assert!(!recorder.calls.iter().any(|c| c.contains("NTIA")));
    }

    #[test]
    fn test_missing_supplier_shows_not_known() {
        let sbom = sample_sbom();
        let mut recorder = Recorder::default();
        ReportGenerator::new(&sbom, ReportOptions::default())
            .generate(&mut recorder, &OutputTarget::Stdout)
            .unwrap();

        let packages = &recorder
            .tables
            .iter()
            .find(|(headers, _)| headers.get(2).map(String::as_str) == Some("Supplier"))
            .unwrap()
            .1;
        assert_eq!(packages[1][2], "NOT KNOWN");
        assert_eq!(packages[2][1], "-");
    }

    #[test]
    fn test_ntia_table() {
        let sbom = sample_sbom();
        let options = ReportOptions {
            ntia_summary: true,
            ..ReportOptions::default()
        };
        let mut recorder = Recorder::default();
        ReportGenerator::new(&sbom, options)
            .generate(&mut recorder, &OutputTarget::Stdout)
            .unwrap();

        let rows = recorder.table("Element");
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0], vec!["All file information provided?", "True"]);
        assert_eq!(rows[1], vec!["All package information provided?", "False"]);
        assert_eq!(rows[5], vec!["NTIA conformant?", "False"]);
    }

    #[test]
    fn test_license_text_section() {
        let sbom = sample_sbom();
        let options = ReportOptions {
            include_license: true,
            ..ReportOptions::default()
        };
        let provider = OneLicense {
            calls: RefCell::new(Vec::new()),
        };
        let mut recorder = Recorder::default();
        ReportGenerator::new(&sbom, options)
            .with_license_provider(&provider)
            .generate(&mut recorder, &OutputTarget::Stdout)
            .unwrap();

        // The expression is never looked up
        assert_eq!(
            *provider.calls.borrow(),
            vec!["Apache-2.0", "MIT", "NOT KNOWN"]
        );

        let start = recorder.calls.iter().position(|c| c == "page_break").unwrap();
        assert_eq!(
            &recorder.calls[start..start + 8],
            &[
                "page_break",
                "heading 1 License Text true",
                "heading 2 Apache-2.0 false",
                "paragraph Unable to find license text.",
                "heading 2 MIT false",
                "paragraph MIT text",
                "heading 2 NOT KNOWN false",
                "paragraph Unable to find license text.",
            ]
        );
    }

    #[test]
    fn test_extra_notice() {
        let dir = tempfile::tempdir().unwrap();
        let notice = dir.path().join("notice.txt");
        std::fs::write(&notice, "Internal use only").unwrap();

        let sbom = Sbom::default();
        let options = ReportOptions {
            extra_text: Some(notice),
            ..ReportOptions::default()
        };
        let mut recorder = Recorder::default();
        ReportGenerator::new(&sbom, options)
            .generate(&mut recorder, &OutputTarget::Stdout)
            .unwrap();

        let tail: Vec<&str> = recorder.calls[recorder.calls.len() - 4..]
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(
            tail,
            vec![
                "page_break",
                "heading 1 Extra notice true",
                "paragraph Internal use only",
                "publish Stdout"
            ]
        );
    }

    #[test]
    fn test_unreadable_extra_text_is_fatal() {
        let sbom = Sbom::default();
        let options = ReportOptions {
            extra_text: Some(PathBuf::from("/nonexistent/notice.txt")),
            ..ReportOptions::default()
        };
        let mut recorder = Recorder::default();
        let result = ReportGenerator::new(&sbom, options).generate(&mut recorder, &OutputTarget::Stdout);

        assert!(matches!(result, Err(ReportError::ExtraText { .. })));
        assert!(!recorder.calls.iter().any(|c| c.starts_with("publish")));
    }

    #[test]
    fn test_empty_sbom_has_summary_and_licenses_only() {
        let sbom = Sbom::default();
        let mut recorder = Recorder::default();
        let summary = ReportGenerator::new(&sbom, ReportOptions::default())
            .generate(&mut recorder, &OutputTarget::Stdout)
            .unwrap();

        let headings = recorder.calls.iter().filter(|c| c.starts_with("heading")).count();
        assert_eq!(headings, 2);
        assert!(summary.frequency.is_empty());
        assert_eq!(recorder.table("Item")[1], vec!["SBOM Type", "-"]);
    }
}
