//! Integration tests for sbom-doc
//!
//! These tests load the fixture SBOMs and run them through the report
//! generator and every renderer.

use sbom_doc::{
    analysis::Ecosystem,
    config::AppConfig,
    parsers::{detect_format, parse_sbom},
    pipeline::run_report,
    render::fonts,
    ConsoleRenderer, DocumentBuilder, MarkdownRenderer, OutputFormat, OutputTarget, PdfRenderer,
    RenderOptions, ReportError, ReportGenerator, ReportOptions, SbomSource,
};
use std::path::{Path, PathBuf};

// ============================================================================
// Test Fixtures
// ============================================================================

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> PathBuf {
    Path::new(FIXTURES_DIR).join(name)
}

fn markdown_report(name: &str, options: ReportOptions) -> String {
    let sbom = parse_sbom(&fixture_path(name)).expect("fixture should parse");
    let mut markdown = MarkdownRenderer::new(&RenderOptions::default());
    ReportGenerator::new(&sbom, options)
        .render_sections(&mut markdown)
        .expect("report should render");
    markdown.as_str().to_string()
}

// ============================================================================
// Parser Tests
// ============================================================================

mod parser_tests {
    use super::*;

    #[test]
    fn test_parse_spdx_json() {
        let sbom = parse_sbom(&fixture_path("spdx/app.spdx.json")).unwrap();
        let document = sbom.document().unwrap();

        assert_eq!(document.doc_type, "SPDX");
        assert_eq!(document.version.as_deref(), Some("SPDX-2.3"));
        assert_eq!(document.name.as_deref(), Some("demo-app"));
        assert_eq!(document.creators.len(), 2);
        assert_eq!(
            document.creators[1].to_string(),
            "Organization:ACME Corp <oss@acme.example>"
        );
        assert_eq!(sbom.files().len(), 2);
        assert_eq!(sbom.packages().len(), 3);
        assert_eq!(sbom.relationships().len(), 3);
        assert_eq!(
            sbom.packages()[0].supplier.as_deref(),
            Some("Python Software Foundation")
        );
    }

    #[test]
    fn test_parse_spdx_tag_value() {
        let sbom = parse_sbom(&fixture_path("spdx/app.spdx")).unwrap();

        assert_eq!(sbom.document().unwrap().name.as_deref(), Some("firmware-image"));
        assert_eq!(sbom.files().len(), 1);
        assert_eq!(
            sbom.files()[0].copyright_text.as_deref(),
            Some("Copyright (C) 1998-2011\nErik Andersen, Rob Landley, Denys Vlasenko")
        );
        assert_eq!(sbom.packages().len(), 2);
        assert_eq!(Ecosystem::of(&sbom.packages()[0]).to_string(), "generic");
        assert_eq!(sbom.relationships().len(), 2);
    }

    #[test]
    fn test_parse_cyclonedx_json() {
        let sbom = parse_sbom(&fixture_path("cyclonedx/app.cdx.json")).unwrap();
        let document = sbom.document().unwrap();

        assert_eq!(document.doc_type, "CycloneDX");
        assert_eq!(document.version.as_deref(), Some("1.5"));
        assert_eq!(document.name.as_deref(), Some("web-frontend"));
        assert_eq!(document.creators[0].to_string(), "Tool:cyclonedx-npm-1.16.1");

        let names: Vec<_> = sbom
            .packages()
            .iter()
            .map(|p| p.name.as_deref().unwrap())
            .collect();
        assert_eq!(names, vec!["express", "body-parser", "lodash"]);
        assert_eq!(sbom.files().len(), 1);

        let lodash = &sbom.packages()[2];
        assert_eq!(lodash.supplier.as_deref(), Some("John-David Dalton"));
        assert_eq!(
            lodash.download_location.as_deref(),
            Some("https://registry.npmjs.org/lodash/-/lodash-4.17.21.tgz")
        );
        assert_eq!(Ecosystem::of(lodash).to_string(), "npm");
    }

    #[test]
    fn test_detect_fixture_formats() {
        let cases = [
            ("spdx/app.spdx.json", "SPDX", "JSON"),
            ("spdx/app.spdx", "SPDX", "tag-value"),
            ("cyclonedx/app.cdx.json", "CycloneDX", "JSON"),
        ];
        for (name, format, variant) in cases {
            let content = std::fs::read_to_string(fixture_path(name)).unwrap();
            let detected = detect_format(&content).unwrap();
            assert_eq!(detected.format_name, format, "{name}");
            assert_eq!(detected.variant.as_deref(), Some(variant), "{name}");
        }
    }
}

// ============================================================================
// Report Tests
// ============================================================================

mod report_tests {
    use super::*;

    #[test]
    fn test_spdx_markdown_sections() {
        let options = ReportOptions {
            sbom_label: "app.spdx.json".to_string(),
            ntia_summary: true,
            ..ReportOptions::default()
        };
        let md = markdown_report("spdx/app.spdx.json", options);

        assert!(md.contains("# 1 SBOM Summary"));
        assert!(md.contains("# 2 File Summary"));
        assert!(md.contains("# 3 Package Summary"));
        assert!(md.contains("# 4 License Summary"));
        assert!(md.contains("# 5 NTIA Summary"));
        assert!(md.contains("| ./README.md | DOCUMENTATION, TEXT | NOT KNOWN | - |"));
        assert!(md.contains("| certifi | 2023.11.17 | NOT KNOWN | MPL-2.0 OR MIT |"));
        assert!(md.contains("| requests | 2.31.0 | pypi | https://pypi.org/project/requests/2.31.0 | NOASSERTION |"));
        // certifi has no supplier
        assert!(md.contains("| All package information provided? | False |"));
        assert!(md.contains("| NTIA conformant? | False |"));
    }

    #[test]
    fn test_license_summary_is_sorted() {
        let md = markdown_report("spdx/app.spdx.json", ReportOptions::default());
        let start = md.find("License Summary").unwrap();
        let rows: Vec<&str> = md[start..]
            .lines()
            .filter(|l| l.starts_with("| ") && !l.starts_with("| License") && !l.starts_with("| ---"))
            .collect();
        assert_eq!(
            rows,
            vec![
                "| Apache-2.0 | 1 |",
                "| MIT | 2 |",
                "| MPL-2.0 OR MIT | 1 |",
                "| NOT KNOWN | 1 |",
            ]
        );
    }

    #[test]
    fn test_tag_value_ntia_conformant() {
        let sbom = parse_sbom(&fixture_path("spdx/app.spdx")).unwrap();
        let options = ReportOptions {
            ntia_summary: true,
            ..ReportOptions::default()
        };
        let mut markdown = MarkdownRenderer::new(&RenderOptions::default());
        let summary = ReportGenerator::new(&sbom, options)
            .render_sections(&mut markdown)
            .unwrap();

        assert!(summary.ntia.is_conformant());
        assert!(markdown.as_str().contains("| NTIA conformant? | True |"));
    }

    #[test]
    fn test_offline_license_text_falls_back() {
        let options = ReportOptions {
            include_license: true,
            ..ReportOptions::default()
        };
        let md = markdown_report("cyclonedx/app.cdx.json", options);

        assert!(md.contains("\n---\n"));
        assert!(md.contains("# 5 License Text"));
        assert!(md.contains("## MIT\n\nUnable to find license text."));
        // Expressions never get a text section
        assert!(!md.contains("## MIT OR CC0-1.0"));
    }

    #[test]
    fn test_extra_notice_is_last() {
        let options = ReportOptions {
            extra_text: Some(fixture_path("notice.txt")),
            ..ReportOptions::default()
        };
        let md = markdown_report("spdx/app.spdx", options);

        let notice = md.find("Extra notice").unwrap();
        assert!(notice > md.find("License Summary").unwrap());
        assert!(md.trim_end().ends_with("Contact oss@acme.example with questions."));
    }

    #[test]
    fn test_console_report() {
        let sbom = parse_sbom(&fixture_path("cyclonedx/app.cdx.json")).unwrap();
        let options = RenderOptions {
            color: false,
            console_width: 100,
            ..RenderOptions::default()
        };
        let mut console = ConsoleRenderer::new(Vec::new(), &options);
        ReportGenerator::new(&sbom, ReportOptions::default())
            .generate(&mut console, &OutputTarget::Stdout)
            .unwrap();

        let text = String::from_utf8(console.into_inner()).unwrap();
        assert!(text.contains("SBOM Summary"));
        assert!(text.contains("body-parser"));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn test_pdf_report_written_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("app.pdf");
        let sbom = parse_sbom(&fixture_path("spdx/app.spdx.json")).unwrap();
        let options = ReportOptions {
            include_license: true,
            ntia_summary: true,
            extra_text: Some(fixture_path("notice.txt")),
            ..ReportOptions::default()
        };

        let mut pdf = PdfRenderer::new(&RenderOptions::default());
        ReportGenerator::new(&sbom, options)
            .render_sections(&mut pdf)
            .unwrap();

        // Summary page, license text page, notice page
        assert!(pdf.minimum_page_count() >= 3);

        // Layout needs a TrueType font installed on the machine
        if fonts::find_font_files(None).is_none() {
            return;
        }
        pdf.publish(&OutputTarget::File(out.clone())).unwrap();
        let bytes = std::fs::read(out).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_pdf_to_stdout_is_rejected() {
        let sbom = parse_sbom(&fixture_path("spdx/app.spdx")).unwrap();
        let mut pdf = PdfRenderer::new(&RenderOptions::default());
        let result = ReportGenerator::new(&sbom, ReportOptions::default())
            .generate(&mut pdf, &OutputTarget::Stdout);

        assert!(matches!(result, Err(ReportError::UnsupportedDestination(_))));
    }
}

// ============================================================================
// Pipeline Tests
// ============================================================================

mod pipeline_tests {
    use super::*;

    #[test]
    fn test_run_report_markdown_with_notice() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("report.md");

        let mut config = AppConfig::default();
        config.output.format = OutputFormat::Markdown;
        config.output.file = Some(out.clone());
        config.report.ntia_summary = true;
        config.report.numbered_headings = false;
        config.report.extra_text = Some(fixture_path("notice.txt"));

        let summary = run_report(&config, &fixture_path("spdx/app.spdx"), true).unwrap();
        assert!(summary.ntia.is_conformant());
        assert_eq!(summary.frequency.total(), 3);

        let md = std::fs::read_to_string(out).unwrap();
        assert!(md.contains("# SBOM Summary"));
        assert!(md.contains("# Extra notice"));
    }

    #[test]
    fn test_run_report_missing_extra_text_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.output.format = OutputFormat::Markdown;
        config.output.file = Some(dir.path().join("report.md"));
        config.report.extra_text = Some(dir.path().join("missing.txt"));

        let err = run_report(&config, &fixture_path("spdx/app.spdx"), true).unwrap_err();
        assert!(err.to_string().contains("markdown"));
        assert!(!dir.path().join("report.md").exists());
    }

    #[test]
    fn test_run_report_unknown_format() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        std::fs::write(&input, "just some notes").unwrap();

        let mut config = AppConfig::default();
        config.output.format = OutputFormat::Markdown;
        config.output.file = Some(dir.path().join("report.md"));

        assert!(run_report(&config, &input, true).is_err());
    }
}
