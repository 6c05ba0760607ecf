//! Document rendering.
//!
//! A report is produced by driving a [`DocumentBuilder`] through a sequence
//! of headings, paragraphs and tables. Three builders exist:
//! - Console: box-drawn tables written straight to a terminal
//! - Markdown: a single markup document
//! - PDF: a paginated document laid out by `genpdf` with an embedded font
//!
//! [`Renderer`] selects one of them per report from an [`OutputFormat`].
//!
//! # Tables
//!
//! Every builder tracks its current table with a [`TableState`]. Calls made
//! out of order (a row with no open table, a new table while one is open,
//! publishing with a table pending) are logged and recovered from rather
//! than reported as errors.

mod console;
pub mod escape;
mod markdown;
mod pdf;
mod table;
mod wrap;

pub use console::ConsoleRenderer;
pub use markdown::MarkdownRenderer;
pub use pdf::{fonts, PageSize, PdfRenderer};
pub use table::{SectionNumbering, TableBuffer, TableState, DEFAULT_MAX_ROW_VALUES};
pub use wrap::wrap_text;

use crate::pipeline::OutputTarget;
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while rendering or publishing a report
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Format error: {0}")]
    FormatError(#[from] std::fmt::Error),

    #[error("Unsupported destination: {0}")]
    UnsupportedDestination(String),

    #[error("PDF layout failed: {0}")]
    Pdf(#[from] genpdf::error::Error),

    #[error("No TrueType font found for PDF output (searched: {0}); set render.font_dir")]
    FontNotFound(String),

    #[error("Unusable font {path:?}: {reason}")]
    Font { path: PathBuf, reason: String },

    #[error("Failed to read extra text from {path:?}: {source}")]
    ExtraText {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Output format for reports
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tables and panels written to the terminal
    #[default]
    Console,
    /// Markdown document
    #[value(alias = "md")]
    Markdown,
    /// Paginated PDF document (requires an output file)
    Pdf,
}

impl OutputFormat {
    /// Whether this format can be written to stdout
    #[must_use]
    pub const fn supports_stdout(self) -> bool {
        !matches!(self, Self::Pdf)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Console => write!(f, "console"),
            Self::Markdown => write!(f, "markdown"),
            Self::Pdf => write!(f, "pdf"),
        }
    }
}

/// Settings shared by all renderers.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Maximum values accepted in a table row
    pub max_row_values: usize,
    /// Prefix numbered headings with dotted section numbers
    pub numbered_headings: bool,
    /// Total console table width, in columns
    pub console_width: usize,
    /// Emit ANSI styling on the console
    pub color: bool,
    /// PDF page size
    pub page_size: PageSize,
    /// PDF body font size, in points
    pub font_size: f32,
    /// Directory holding the TrueType family for PDF output
    pub font_dir: Option<PathBuf>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_row_values: DEFAULT_MAX_ROW_VALUES,
            numbered_headings: true,
            console_width: 150,
            color: true,
            page_size: PageSize::default(),
            font_size: 10.0,
            font_dir: None,
        }
    }
}

/// Capability set every renderer provides.
///
/// Operations that touch the output sink return a `Result`; building a
/// table in memory cannot fail.
pub trait DocumentBuilder {
    /// Start a section. `numbered = false` suppresses the section number.
    fn heading(&mut self, level: u8, title: &str, numbered: bool) -> Result<(), ReportError>;

    /// Emit a block of free text
    fn paragraph(&mut self, text: &str) -> Result<(), ReportError>;

    /// Begin a table. `width_hints` are relative column proportions.
    fn create_table(&mut self, headers: &[&str], width_hints: Option<&[u32]>);

    /// Append a row to the current table
    fn add_row(&mut self, values: Vec<String>);

    /// Emit the current table. `widths` override the creation hints.
    fn show_table(&mut self, widths: Option<&[u32]>) -> Result<(), ReportError>;

    /// Start a new page, where the format has pages
    fn page_break(&mut self) -> Result<(), ReportError>;

    /// Write the finished document to `destination`
    fn publish(&mut self, destination: &OutputTarget) -> Result<(), ReportError>;
}

/// One renderer per report, chosen from the output format.
pub enum Renderer {
    Console(ConsoleRenderer),
    Markdown(MarkdownRenderer),
    Pdf(PdfRenderer),
}

impl Renderer {
    /// Create the renderer for `format`
    #[must_use]
    pub fn for_format(format: OutputFormat, options: &RenderOptions) -> Self {
        tracing::debug!("Creating {} renderer", format);
        match format {
            OutputFormat::Console => Self::Console(ConsoleRenderer::stdout(options)),
            OutputFormat::Markdown => Self::Markdown(MarkdownRenderer::new(options)),
            OutputFormat::Pdf => Self::Pdf(PdfRenderer::new(options)),
        }
    }

    /// Format this renderer produces
    #[must_use]
    pub const fn format(&self) -> OutputFormat {
        match self {
            Self::Console(_) => OutputFormat::Console,
            Self::Markdown(_) => OutputFormat::Markdown,
            Self::Pdf(_) => OutputFormat::Pdf,
        }
    }
}

impl DocumentBuilder for Renderer {
    fn heading(&mut self, level: u8, title: &str, numbered: bool) -> Result<(), ReportError> {
        match self {
            Self::Console(r) => r.heading(level, title, numbered),
            Self::Markdown(r) => r.heading(level, title, numbered),
            Self::Pdf(r) => r.heading(level, title, numbered),
        }
    }

    fn paragraph(&mut self, text: &str) -> Result<(), ReportError> {
        match self {
            Self::Console(r) => r.paragraph(text),
            Self::Markdown(r) => r.paragraph(text),
            Self::Pdf(r) => r.paragraph(text),
        }
    }

    fn create_table(&mut self, headers: &[&str], width_hints: Option<&[u32]>) {
        match self {
            Self::Console(r) => r.create_table(headers, width_hints),
            Self::Markdown(r) => r.create_table(headers, width_hints),
            Self::Pdf(r) => r.create_table(headers, width_hints),
        }
    }

    fn add_row(&mut self, values: Vec<String>) {
        match self {
            Self::Console(r) => r.add_row(values),
            Self::Markdown(r) => r.add_row(values),
            Self::Pdf(r) => r.add_row(values),
        }
    }

    fn show_table(&mut self, widths: Option<&[u32]>) -> Result<(), ReportError> {
        match self {
            Self::Console(r) => r.show_table(widths),
            Self::Markdown(r) => r.show_table(widths),
            Self::Pdf(r) => r.show_table(widths),
        }
    }

    fn page_break(&mut self) -> Result<(), ReportError> {
        match self {
            Self::Console(r) => r.page_break(),
            Self::Markdown(r) => r.page_break(),
            Self::Pdf(r) => r.page_break(),
        }
    }

    fn publish(&mut self, destination: &OutputTarget) -> Result<(), ReportError> {
        match self {
            Self::Console(r) => r.publish(destination),
            Self::Markdown(r) => r.publish(destination),
            Self::Pdf(r) => r.publish(destination),
        }
    }
}
