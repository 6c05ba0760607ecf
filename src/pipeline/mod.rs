//! Pipeline orchestration: load → render → publish.
//!
//! Shared by the CLI and by library callers that want the whole run rather
//! than driving a [`ReportGenerator`](crate::report::ReportGenerator) by hand.

mod output;
mod parse;
mod report_stage;

pub use output::{should_use_color, OutputTarget};
pub use parse::load_sbom;
pub use report_stage::{build_license_provider, run_report};

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Report produced
    pub const SUCCESS: i32 = 0;
    /// NTIA summary requested and the SBOM is not conformant
    pub const NON_CONFORMANT: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 3;
}

/// Platform-specific cache directory utilities
pub mod dirs {
    use std::path::PathBuf;

    /// Default directory for downloaded license text
    #[must_use]
    pub fn license_cache_dir() -> PathBuf {
        ::dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("sbom-doc")
            .join("licenses")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_values() {
        assert_eq!(exit_codes::SUCCESS, 0);
        assert_eq!(exit_codes::NON_CONFORMANT, 1);
        assert_eq!(exit_codes::ERROR, 3);
    }

    #[test]
    fn test_license_cache_dir_path() {
        let path = dirs::license_cache_dir();
        assert!(path.ends_with("sbom-doc/licenses"));
    }
}
