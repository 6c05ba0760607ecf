//! Paginated PDF renderer.
//!
//! Builder calls are recorded as blocks and laid out by `genpdf` when the
//! report is published. `genpdf` flows paragraphs and table rows onto new
//! pages as space runs out; an explicit page break always starts one. The
//! text is set in an embedded TrueType family (see [`fonts`]), so
//! non-Latin supplier and copyright strings keep their characters.

pub mod fonts;

use super::escape::strip_control;
use super::table::{SectionNumbering, TableBuffer, TableState};
use super::wrap::break_long_words;
use super::{DocumentBuilder, RenderOptions, ReportError};
use crate::pipeline::OutputTarget;
use clap::ValueEnum;
use genpdf::elements::{Break, FrameCellDecorator, LinearLayout, PageBreak, Paragraph, TableLayout};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::{style, Alignment, Element};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use unicode_width::UnicodeWidthStr;

/// Page margin on every side, in millimetres
const MARGIN_MM: i32 = 15;
/// Padding inside each table cell, in millimetres
const CELL_PADDING_MM: i32 = 1;
/// Average advance of one character column, as a fraction of the font size
const COLUMN_EM: f32 = 0.6;
const POINTS_PER_MM: f32 = 72.0 / 25.4;
const LINE_SPACING: f64 = 1.25;

/// Paper size for PDF output
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    A4,
    Letter,
}

impl PageSize {
    /// Page width in millimetres
    #[must_use]
    pub const fn width_mm(self) -> f32 {
        match self {
            Self::A4 => 210.0,
            Self::Letter => 215.9,
        }
    }

    const fn paper(self) -> genpdf::PaperSize {
        match self {
            Self::A4 => genpdf::PaperSize::A4,
            Self::Letter => genpdf::PaperSize::Letter,
        }
    }
}

/// One recorded piece of the document.
#[derive(Debug, Clone, PartialEq)]
enum Block {
    Heading { level: u8, text: String },
    Paragraph(String),
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
        weights: Vec<usize>,
    },
    PageBreak,
}

/// Lays out a report onto PDF pages.
pub struct PdfRenderer {
    blocks: Vec<Block>,
    title: Option<String>,
    page_size: PageSize,
    font_size: u8,
    font_dir: Option<PathBuf>,
    numbering: SectionNumbering,
    table: TableState,
    max_row_values: usize,
}

impl PdfRenderer {
    #[must_use]
    pub fn new(options: &RenderOptions) -> Self {
        Self {
            blocks: Vec::new(),
            title: None,
            page_size: options.page_size,
            font_size: options.font_size.clamp(4.0, 72.0).round() as u8,
            font_dir: options.font_dir.clone(),
            numbering: SectionNumbering::new(options.numbered_headings),
            table: TableState::default(),
            max_row_values: options.max_row_values,
        }
    }

    /// Pages forced by explicit page breaks, plus the first one. Content
    /// overflow adds more when the document is laid out.
    #[must_use]
    pub fn minimum_page_count(&self) -> usize {
        1 + self
            .blocks
            .iter()
            .filter(|block| matches!(block, Block::PageBreak))
            .count()
    }

    fn usable_width_mm(&self) -> f32 {
        self.page_size.width_mm() - 2.0 * MARGIN_MM as f32
    }

    /// Character columns that fit in `width_mm` at `font_size`
    fn columns_for(width_mm: f32, font_size: u8) -> f32 {
        let column_mm = f32::from(font_size) * COLUMN_EM / POINTS_PER_MM;
        (width_mm / column_mm).floor().max(1.0)
    }

    /// Clean `text` for layout: strip control characters and pre-break
    /// words too wide for `width_mm`.
    fn prepare(text: &str, width_mm: f32, font_size: u8) -> String {
        let columns = Self::columns_for(width_mm, font_size);
        break_long_words(&strip_control(text), columns, |s| s.width() as f32)
    }

    fn heading_size(&self, level: u8) -> u8 {
        let scale = match level {
            0 | 1 => 1.6,
            2 => 1.3,
            _ => 1.1,
        };
        (f32::from(self.font_size) * scale).round() as u8
    }

    fn record_table(&mut self, table: &TableBuffer, widths: Option<&[u32]>) {
        let weights: Vec<usize> = table
            .proportions(widths)
            .iter()
            .map(|p| (*p).max(1) as usize)
            .collect();
        if weights.is_empty() {
            return;
        }
        let total: usize = weights.iter().sum();
        let size = self.table_font_size();
        let usable = self.usable_width_mm();
        let padding = 2.0 * CELL_PADDING_MM as f32;
        let cell_width = |column: usize| usable * weights[column] as f32 / total as f32 - padding;
        let prepare_row = |row: &[String]| -> Vec<String> {
            row.iter()
                .enumerate()
                .map(|(column, value)| Self::prepare(value, cell_width(column), size))
                .collect()
        };

        let headers = prepare_row(table.headers());
        let rows = table.rows().iter().map(|row| prepare_row(row)).collect();
        self.blocks.push(Block::Table {
            headers,
            rows,
            weights,
        });
    }

    fn table_font_size(&self) -> u8 {
        (f32::from(self.font_size) * 0.9).round() as u8
    }

    /// Lay out the recorded blocks with `fonts` and return the PDF bytes.
    pub fn render_with_fonts(
        &mut self,
        fonts: FontFamily<FontData>,
    ) -> Result<Vec<u8>, ReportError> {
        if self.table.is_open() {
            tracing::warn!("Publishing with an unfinished table; emitting it first");
            if let Some(table) = self.table.take() {
                self.record_table(&table, None);
            }
        }

        let mut document = genpdf::Document::new(fonts);
        document.set_title(self.title.clone().unwrap_or_else(|| "SBOM report".to_string()));
        document.set_paper_size(self.page_size.paper());
        document.set_font_size(self.font_size);
        document.set_line_spacing(LINE_SPACING);

        let header_size = self.table_font_size();
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(MARGIN_MM);
        decorator.set_header(move |page| {
            let mut layout = LinearLayout::vertical();
            layout.push(
                Paragraph::new(format!("Page {page}"))
                    .aligned(Alignment::Right)
                    .styled(style::Style::new().with_font_size(header_size)),
            );
            layout.push(Break::new(1));
            layout
        });
        document.set_page_decorator(decorator);

        for block in &self.blocks {
            match block {
                Block::Heading { level, text } => {
                    let style = style::Style::new()
                        .bold()
                        .with_font_size(self.heading_size(*level));
                    document.push(Break::new(0.5));
                    document.push(Paragraph::new(text.as_str()).styled(style));
                    document.push(Break::new(0.3));
                }
                Block::Paragraph(text) => {
                    document.push(text_layout(text, style::Style::new()));
                    document.push(Break::new(0.5));
                }
                Block::Table {
                    headers,
                    rows,
                    weights,
                } => {
                    document.push(self.table_layout(headers, rows, weights)?);
                    document.push(Break::new(0.8));
                }
                Block::PageBreak => document.push(PageBreak::new()),
            }
        }

        let mut bytes = Vec::new();
        document.render(&mut bytes)?;
        tracing::debug!("Rendered PDF of {} bytes", bytes.len());
        Ok(bytes)
    }

    /// Find the configured font family and lay out the document.
    pub fn render(&mut self) -> Result<Vec<u8>, ReportError> {
        let fonts = fonts::load_font_family(self.font_dir.as_deref())?;
        self.render_with_fonts(fonts)
    }

    fn table_layout(
        &self,
        headers: &[String],
        rows: &[Vec<String>],
        weights: &[usize],
    ) -> Result<TableLayout, ReportError> {
        let size = self.table_font_size();
        let header_style = style::Style::new().bold().with_font_size(size);
        let body_style = style::Style::new().with_font_size(size);

        let mut table = TableLayout::new(weights.to_vec());
        table.set_cell_decorator(FrameCellDecorator::new(true, true, false));

        let mut push_row = |cells: &[String], style: style::Style| -> Result<(), ReportError> {
            let mut row = table.row();
            for cell in cells {
                row.push_element(text_layout(cell, style).padded(CELL_PADDING_MM));
            }
            row.push()?;
            Ok(())
        };
        push_row(headers, header_style)?;
        for cells in rows {
            push_row(cells, body_style)?;
        }
        Ok(table)
    }
}

/// One paragraph per source line; blank lines become vertical space.
fn text_layout(text: &str, style: style::Style) -> LinearLayout {
    let mut layout = LinearLayout::vertical();
    for line in text.lines() {
        if line.trim().is_empty() {
            layout.push(Break::new(1));
        } else {
            layout.push(Paragraph::new(line).styled(style));
        }
    }
    layout
}

impl DocumentBuilder for PdfRenderer {
    fn heading(&mut self, level: u8, title: &str, numbered: bool) -> Result<(), ReportError> {
        if self.title.is_none() && level <= 1 {
            self.title = Some(title.to_string());
        }
        let label = self.numbering.label(level, title, numbered);
        let size = self.heading_size(level);
        let text = Self::prepare(&label, self.usable_width_mm(), size);
        self.blocks.push(Block::Heading { level, text });
        Ok(())
    }

    fn paragraph(&mut self, text: &str) -> Result<(), ReportError> {
        let text = Self::prepare(text, self.usable_width_mm(), self.font_size);
        self.blocks.push(Block::Paragraph(text));
        Ok(())
    }

    fn create_table(&mut self, headers: &[&str], width_hints: Option<&[u32]>) {
        self.table.open(headers, width_hints, self.max_row_values);
    }

    fn add_row(&mut self, values: Vec<String>) {
        self.table.push_row(values);
    }

    fn show_table(&mut self, widths: Option<&[u32]>) -> Result<(), ReportError> {
        match self.table.take() {
            Some(table) => self.record_table(&table, widths),
            None => tracing::warn!("show_table called with no open table"),
        }
        Ok(())
    }

    fn page_break(&mut self) -> Result<(), ReportError> {
        self.blocks.push(Block::PageBreak);
        Ok(())
    }

    fn publish(&mut self, destination: &OutputTarget) -> Result<(), ReportError> {
        let path = match destination {
            OutputTarget::File(path) => path,
            OutputTarget::Stdout => {
                return Err(ReportError::UnsupportedDestination(
                    "PDF output requires an output file".to_string(),
                ))
            }
        };
        let bytes = self.render()?;
        std::fs::write(path, bytes)?;
        tracing::info!("Report written to {:?}", path);
        Ok(())
    }
}
