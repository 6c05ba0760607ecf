#![no_main]
use libfuzzer_sys::fuzz_target;
use sbom_doc::parsers::{SbomParser, SpdxParser};

/// Fuzz the SPDX tag-value reader behind a valid document header, so the
/// file/package section switching and `<text>` blocks are reached.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if s.len() < 10_000 {
            let wrapped = format!(
                "SPDXVersion: SPDX-2.3\nDataLicense: CC0-1.0\nSPDXID: SPDXRef-DOCUMENT\nDocumentName: fuzz\n{s}",
            );
            let _ = SpdxParser.parse_str(&wrapped);
        }
    }
});
