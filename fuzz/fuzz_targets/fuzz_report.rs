#![no_main]
use libfuzzer_sys::fuzz_target;
use sbom_doc::{MarkdownRenderer, RenderOptions, ReportGenerator, ReportOptions};

/// Load arbitrary content and, when it parses, render the full Markdown
/// report into memory.
///
/// The markdown buffer is never published, so nothing touches the disk.
fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(sbom) = sbom_doc::parse_sbom_str(s) else {
        return;
    };

    let options = ReportOptions {
        sbom_label: "fuzz".to_string(),
        include_license: true,
        ntia_summary: true,
        extra_text: None,
    };
    let generator = ReportGenerator::new(&sbom, options);
    let mut markdown = MarkdownRenderer::new(&RenderOptions::default());
    let _ = generator.render_sections(&mut markdown);
});
