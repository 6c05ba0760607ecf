#![no_main]
use libfuzzer_sys::fuzz_target;
use sbom_doc::parsers::{CycloneDxParser, SbomParser};

const MAX_WRAPPED_INPUT_LEN: usize = 10_000;

/// Fuzz the CycloneDX JSON parser, both raw and with the input spliced
/// into a component list so nested traversal gets exercised.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = CycloneDxParser.parse_str(s);

        if s.len() < MAX_WRAPPED_INPUT_LEN {
            let wrapped = format!(
                r#"{{"bomFormat":"CycloneDX","specVersion":"1.5","components":[{s}]}}"#,
            );
            let _ = CycloneDxParser.parse_str(&wrapped);
        }
    }
});
