//! Unified error types for sbom-doc.
//!
//! Each layer owns a focused error enum (`ParseError`, `ReportError`,
//! `LicenseTextError`, `ConfigFileError`); [`SbomDocError`] wraps them for
//! callers that drive the whole pipeline.

use crate::config::ConfigFileError;
use crate::enrichment::LicenseTextError;
use crate::parsers::ParseError;
use crate::render::ReportError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sbom-doc operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SbomDocError {
    /// Errors while loading the SBOM
    #[error("Failed to load SBOM: {context}")]
    Parse {
        context: String,
        #[source]
        source: ParseError,
    },

    /// Errors while generating or publishing the report
    #[error("Report generation failed: {context}")]
    Report {
        context: String,
        #[source]
        source: ReportError,
    },

    /// Errors from the license text service
    #[error("License text lookup failed: {context}")]
    LicenseText {
        context: String,
        #[source]
        source: LicenseTextError,
    },

    /// Configuration file errors
    #[error("Configuration error: {context}")]
    ConfigFile {
        context: String,
        #[source]
        source: ConfigFileError,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration values
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Convenient Result type for sbom-doc operations
pub type Result<T> = std::result::Result<T, SbomDocError>;

impl SbomDocError {
    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let message = format!("{source}");
        Self::Io {
            path: Some(path.into()),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl From<std::io::Error> for SbomDocError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<ParseError> for SbomDocError {
    fn from(err: ParseError) -> Self {
        Self::Parse {
            context: String::new(),
            source: err,
        }
    }
}

impl From<ReportError> for SbomDocError {
    fn from(err: ReportError) -> Self {
        Self::Report {
            context: String::new(),
            source: err,
        }
    }
}

impl From<LicenseTextError> for SbomDocError {
    fn from(err: LicenseTextError) -> Self {
        Self::LicenseText {
            context: String::new(),
            source: err,
        }
    }
}

impl From<ConfigFileError> for SbomDocError {
    fn from(err: ConfigFileError) -> Self {
        Self::ConfigFile {
            context: String::new(),
            source: err,
        }
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings chain, so an error that passes through several layers
/// reads `outer: middle: inner`.
///
/// ```ignore
/// use sbom_doc::error::ErrorContext;
///
/// let sbom = parse_sbom(&path)
///     .with_context(|| format!("loading {}", path.display()))?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<SbomDocError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

fn add_context_to_error(err: SbomDocError, new_ctx: &str) -> SbomDocError {
    match err {
        SbomDocError::Parse { context, source } => SbomDocError::Parse {
            context: chain_context(new_ctx, &context),
            source,
        },
        SbomDocError::Report { context, source } => SbomDocError::Report {
            context: chain_context(new_ctx, &context),
            source,
        },
        SbomDocError::LicenseText { context, source } => SbomDocError::LicenseText {
            context: chain_context(new_ctx, &context),
            source,
        },
        SbomDocError::ConfigFile { context, source } => SbomDocError::ConfigFile {
            context: chain_context(new_ctx, &context),
            source,
        },
        SbomDocError::Io {
            path,
            message,
            source,
        } => SbomDocError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        SbomDocError::Config(msg) => SbomDocError::Config(chain_context(new_ctx, &msg)),
        SbomDocError::Validation(msg) => SbomDocError::Validation(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings together: `new: existing`, or just `new`.
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}
