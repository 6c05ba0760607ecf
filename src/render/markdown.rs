//! Markdown renderer.

use super::escape::escape_markdown_table;
use super::table::{SectionNumbering, TableBuffer, TableState};
use super::{DocumentBuilder, RenderOptions, ReportError};
use crate::pipeline::OutputTarget;
use std::fmt::Write as _;
use std::io::Write as _;

/// Accumulates the report as one markdown document.
pub struct MarkdownRenderer {
    buffer: String,
    table: TableState,
    numbering: SectionNumbering,
    max_row_values: usize,
}

impl MarkdownRenderer {
    #[must_use]
    pub fn new(options: &RenderOptions) -> Self {
        Self {
            buffer: String::new(),
            table: TableState::default(),
            numbering: SectionNumbering::new(options.numbered_headings),
            max_row_values: options.max_row_values,
        }
    }

    /// Document rendered so far
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    fn write_table(&mut self, table: &TableBuffer) -> std::fmt::Result {
        let columns = table.column_count();
        if columns == 0 {
            return Ok(());
        }
        let md = &mut self.buffer;

        writeln!(md)?;
        let header: Vec<String> = (0..columns)
            .map(|i| {
                table
                    .headers()
                    .get(i)
                    .map_or_else(String::new, |h| escape_markdown_table(h))
            })
            .collect();
        writeln!(md, "| {} |", header.join(" | "))?;
        writeln!(md, "|{}", " --- |".repeat(columns))?;

        for row in table.rows() {
            let cells: Vec<String> = (0..columns)
                .map(|i| row.get(i).map_or_else(String::new, |c| escape_markdown_table(c)))
                .collect();
            writeln!(md, "| {} |", cells.join(" | "))?;
        }
        writeln!(md)
    }
}

impl DocumentBuilder for MarkdownRenderer {
    fn heading(&mut self, level: u8, title: &str, numbered: bool) -> Result<(), ReportError> {
        let label = self.numbering.label(level, title, numbered);
        let hashes = "#".repeat(usize::from(level.clamp(1, 6)));
        writeln!(self.buffer, "\n{hashes} {label}\n")?;
        Ok(())
    }

    fn paragraph(&mut self, text: &str) -> Result<(), ReportError> {
        writeln!(self.buffer, "{text}\n")?;
        Ok(())
    }

    fn create_table(&mut self, headers: &[&str], width_hints: Option<&[u32]>) {
        self.table.open(headers, width_hints, self.max_row_values);
    }

    fn add_row(&mut self, values: Vec<String>) {
        self.table.push_row(values);
    }

    fn show_table(&mut self, _widths: Option<&[u32]>) -> Result<(), ReportError> {
        match self.table.take() {
            Some(table) => Ok(self.write_table(&table)?),
            None => {
                tracing::warn!("show_table called with no open table");
                Ok(())
            }
        }
    }

    fn page_break(&mut self) -> Result<(), ReportError> {
        writeln!(self.buffer, "\n---\n")?;
        Ok(())
    }

    fn publish(&mut self, destination: &OutputTarget) -> Result<(), ReportError> {
        if self.table.is_open() {
            tracing::warn!("Publishing with an unfinished table; emitting it first");
            self.show_table(None)?;
        }
        match destination {
            OutputTarget::Stdout => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(self.buffer.as_bytes())?;
                stdout.flush()?;
            }
            OutputTarget::File(path) => {
                std::fs::write(path, &self.buffer)?;
                tracing::info!("Report written to {:?}", path);
            }
        }
        Ok(())
    }
}
