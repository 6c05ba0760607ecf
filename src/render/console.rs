//! Terminal renderer.
//!
//! Output goes straight to the writer as each element is emitted; nothing is
//! buffered apart from the table being built.

use super::escape::strip_control;
use super::table::{TableBuffer, TableState};
use super::wrap::wrap_text;
use super::{DocumentBuilder, RenderOptions, ReportError};
use crate::pipeline::OutputTarget;
use crossterm::style::{style, Stylize};
use std::io::{self, Stdout, Write};
use unicode_width::UnicodeWidthStr;

/// Box-drawing set with a heavy header, as used by most terminal table
/// libraries.
mod glyph {
    pub const TOP: [&str; 4] = ["┏", "━", "┳", "┓"];
    pub const HEAD: [&str; 2] = ["┃", "┃"];
    pub const HEAD_SEP: [&str; 4] = ["┡", "━", "╇", "┩"];
    pub const BODY: [&str; 2] = ["│", "│"];
    pub const BOTTOM: [&str; 4] = ["└", "─", "┴", "┘"];
    pub const PANEL: [&str; 6] = ["╭", "─", "╮", "│", "╰", "╯"];
}

/// Renders a report as panels and box-drawn tables on a terminal.
pub struct ConsoleRenderer<W: Write = Stdout> {
    writer: W,
    table: TableState,
    width: usize,
    color: bool,
    max_row_values: usize,
}

impl ConsoleRenderer<Stdout> {
    /// Renderer writing to standard output
    #[must_use]
    pub fn stdout(options: &RenderOptions) -> Self {
        Self::new(io::stdout(), options)
    }
}

impl<W: Write> ConsoleRenderer<W> {
    /// Renderer writing to an arbitrary sink
    pub fn new(writer: W, options: &RenderOptions) -> Self {
        Self {
            writer,
            table: TableState::default(),
            width: options.console_width,
            color: options.color,
            max_row_values: options.max_row_values,
        }
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn styled(&self, text: &str) -> String {
        if self.color {
            style(text).bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn write_table(&mut self, table: &TableBuffer) -> io::Result<()> {
        let widths = column_widths(table, self.width);
        let columns = widths.len();
        if columns == 0 {
            return Ok(());
        }

        writeln!(self.writer, "{}", rule(glyph::TOP, &widths))?;

        let header: Vec<String> = (0..columns)
            .map(|i| table.headers().get(i).map_or_else(String::new, |h| strip_control(h)))
            .collect();
        self.write_row(&header, &widths, glyph::HEAD, true)?;

        writeln!(self.writer, "{}", rule(glyph::HEAD_SEP, &widths))?;

        for row in table.rows() {
            let cells: Vec<String> = (0..columns)
                .map(|i| row.get(i).map_or_else(String::new, |c| strip_control(c)))
                .collect();
            self.write_row(&cells, &widths, glyph::BODY, false)?;
        }

        writeln!(self.writer, "{}", rule(glyph::BOTTOM, &widths))
    }

    fn write_row(
        &mut self,
        cells: &[String],
        widths: &[usize],
        edges: [&str; 2],
        header: bool,
    ) -> io::Result<()> {
        let wrapped: Vec<Vec<String>> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| wrap_text(cell, *width as f32, display_width))
            .collect();
        let height = wrapped.iter().map(Vec::len).max().unwrap_or(1);

        for line_index in 0..height {
            let mut line = String::from(edges[0]);
            for (lines, width) in wrapped.iter().zip(widths) {
                let text = lines.get(line_index).map_or("", String::as_str);
                let padding = width.saturating_sub(text.width());
                let text = if header && !text.is_empty() {
                    self.styled(text)
                } else {
                    text.to_string()
                };
                line.push(' ');
                line.push_str(&text);
                line.push_str(&" ".repeat(padding));
                line.push(' ');
                line.push_str(edges[1]);
            }
            writeln!(self.writer, "{line}")?;
        }
        Ok(())
    }
}

fn display_width(s: &str) -> f32 {
    s.width() as f32
}

/// Horizontal rule such as `┏━━━┳━━━┓` for the given column widths.
fn rule(parts: [&str; 4], widths: &[usize]) -> String {
    let [left, fill, join, right] = parts;
    let segments: Vec<String> = widths.iter().map(|w| fill.repeat(w + 2)).collect();
    format!("{left}{}{right}", segments.join(join))
}

/// Fit column widths into `total` columns.
///
/// Each column starts at its natural width (widest line of any cell); while
/// the table is too wide the widest column gives up one column at a time.
/// Cells that no longer fit are folded by [`wrap_text`].
fn column_widths(table: &TableBuffer, total: usize) -> Vec<usize> {
    let columns = table.column_count();
    if columns == 0 {
        return Vec::new();
    }

    let mut widths = vec![1usize; columns];
    let cells = std::iter::once(table.headers()).chain(table.rows().iter().map(Vec::as_slice));
    for row in cells {
        for (i, cell) in row.iter().enumerate() {
            let natural = cell.lines().map(UnicodeWidthStr::width).max().unwrap_or(0);
            widths[i] = widths[i].max(natural);
        }
    }

    // Each column costs one border plus two spaces of padding
    let chrome = columns * 3 + 1;
    let available = total.saturating_sub(chrome).max(columns);

    let mut used: usize = widths.iter().sum();
    while used > available {
        let Some((widest, width)) = widths
            .iter()
            .copied()
            .enumerate()
            .max_by_key(|(i, w)| (*w, std::cmp::Reverse(*i)))
        else {
            break;
        };
        if width <= 1 {
            break;
        }
        widths[widest] -= 1;
        used -= 1;
    }
    widths
}

impl<W: Write> DocumentBuilder for ConsoleRenderer<W> {
    fn heading(&mut self, _level: u8, title: &str, _numbered: bool) -> Result<(), ReportError> {
        let title = strip_control(title).replace('\n', " ");
        let inner = title.width() + 2;
        let [tl, h, tr, v, bl, br] = glyph::PANEL;
        writeln!(self.writer, "{tl}{}{tr}", h.repeat(inner))?;
        writeln!(self.writer, "{v} {} {v}", self.styled(&title))?;
        writeln!(self.writer, "{bl}{}{br}", h.repeat(inner))?;
        Ok(())
    }

    fn paragraph(&mut self, text: &str) -> Result<(), ReportError> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", strip_control(text))?;
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
        Ok(())
    }

    fn publish(&mut self, destination: &OutputTarget) -> Result<(), ReportError> {
        if self.table.is_open() {
            tracing::warn!("Publishing with an unfinished table; emitting it first");
            self.show_table(None)?;
        }
        if let OutputTarget::File(path) = destination {
            tracing::debug!("Console output is written to the terminal, not {:?}", path);
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer(width: usize) -> ConsoleRenderer<Vec<u8>> {
        let options = RenderOptions {
            console_width: width,
            color: false,
            ..RenderOptions::default()
        };
        ConsoleRenderer::new(Vec::new(), &options)
    }

    fn output(renderer: ConsoleRenderer<Vec<u8>>) -> String {
        String::from_utf8(renderer.into_inner()).expect("utf-8 output")
    }

    #[test]
    fn test_heading_draws_panel() {
        let mut r = renderer(150);
        r.heading(1, "SBOM Summary", true).unwrap();
        assert_eq!(
            output(r),
            "╭──────────────╮\n│ SBOM Summary │\n╰──────────────╯\n"
        );
    }

    #[test]
    fn test_table_layout() {
        let mut r = renderer(150);
        r.create_table(&["Item", "Details"], None);
        r.add_row(vec!["Name".to_string(), "demo".to_string()]);
        r.show_table(None).unwrap();
        let expected = "\
┏━━━━━━┳━━━━━━━━━┓
┃ Item ┃ Details ┃
┡━━━━━━╇━━━━━━━━━┩
│ Name │ demo    │
└──────┴─────────┘
";
        assert_eq!(output(r), expected);
    }

    #[test]
    fn test_long_cells_fold_within_width() {
        let mut r = renderer(40);
        r.create_table(&["License", "Count"], None);
        r.add_row(vec![
            "GPL-2.0-only WITH Classpath-exception-2.0 OR MIT".to_string(),
            "3".to_string(),
        ]);
        r.show_table(None).unwrap();
        let out = output(r);
        assert!(out.lines().count() > 5, "expected folded rows:\n{out}");
        for line in out.lines() {
            assert!(line.width() <= 40, "line exceeds width: {line}");
        }
        assert!(out.contains("Classpath"));
    }

    #[test]
    fn test_paragraph_and_page_break() {
        let mut r = renderer(150);
        r.paragraph("Hello").unwrap();
        r.page_break().unwrap();
        assert_eq!(output(r), "\nHello\n");
    }

    #[test]
    fn test_publish_flushes_pending_table() {
        let mut r = renderer(150);
        r.create_table(&["A"], None);
        r.add_row(vec!["x".to_string()]);
        r.publish(&OutputTarget::Stdout).unwrap();
        assert!(output(r).contains("│ x │"));
    }

    #[test]
    fn test_control_sequences_are_stripped() {
        let mut r = renderer(150);
        r.paragraph("\x1b[2Jcleared").unwrap();
        assert_eq!(output(r), "\n[2Jcleared\n");
    }
}
