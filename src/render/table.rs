//! Table buffering and the table state machine shared by every renderer.

/// Default maximum number of values a row may carry.
pub const DEFAULT_MAX_ROW_VALUES: usize = 5;

/// A table being assembled between `create_table` and `show_table`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBuffer {
    headers: Vec<String>,
    width_hints: Option<Vec<u32>>,
    rows: Vec<Vec<String>>,
    max_row_values: usize,
}

impl TableBuffer {
    #[must_use]
    pub fn new(headers: &[&str], width_hints: Option<&[u32]>, max_row_values: usize) -> Self {
        Self {
            headers: headers.iter().map(|h| (*h).to_string()).collect(),
            width_hints: width_hints.map(<[u32]>::to_vec),
            rows: Vec::new(),
            max_row_values,
        }
    }

    /// Append a row. Rows longer than the limit are dropped with a warning;
    /// shorter rows are padded with empty cells to the column count.
    pub fn push_row(&mut self, mut values: Vec<String>) -> bool {
        if values.len() > self.max_row_values {
            tracing::warn!(
                "Dropping table row with {} values (limit is {}): {:?}",
                values.len(),
                self.max_row_values,
                values
            );
            return false;
        }
        if values.len() < self.headers.len() {
            values.resize(self.headers.len(), String::new());
        }
        self.rows.push(values);
        true
    }

    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    #[must_use]
    pub fn width_hints(&self) -> Option<&[u32]> {
        self.width_hints.as_deref()
    }

    /// Number of columns: the widest of the header and every row.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0)
    }

    /// Relative column proportions: explicit widths, else the hints given at
    /// creation, else equal columns. Missing or zero entries count as 1.
    #[must_use]
    pub fn proportions(&self, widths: Option<&[u32]>) -> Vec<u32> {
        let source = widths.or(self.width_hints.as_deref()).unwrap_or(&[]);
        (0..self.column_count())
            .map(|i| source.get(i).copied().filter(|w| *w > 0).unwrap_or(1))
            .collect()
    }
}

/// Lifecycle of the table a renderer is building.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TableState {
    #[default]
    Idle,
    Open(TableBuffer),
}

impl TableState {
    /// Begin a table, replacing (and warning about) an unfinished one.
    pub fn open(&mut self, headers: &[&str], width_hints: Option<&[u32]>, max_row_values: usize) {
        if let Self::Open(previous) = self {
            tracing::warn!(
                "create_table called while a table is open; discarding {} pending row(s)",
                previous.rows().len()
            );
        }
        *self = Self::Open(TableBuffer::new(headers, width_hints, max_row_values));
    }

    /// Append a row to the open table; ignored with a warning when idle.
    pub fn push_row(&mut self, values: Vec<String>) {
        match self {
            Self::Open(table) => {
                table.push_row(values);
            }
            Self::Idle => tracing::warn!("add_row called with no open table; row ignored"),
        }
    }

    /// Close the open table and hand it back for rendering.
    pub fn take(&mut self) -> Option<TableBuffer> {
        match std::mem::take(self) {
            Self::Open(table) => Some(table),
            Self::Idle => None,
        }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }
}

/// Dotted section numbers for numbered headings (`1`, `1.2`, `1.2.1`).
#[derive(Debug, Clone, Default)]
pub struct SectionNumbering {
    counters: Vec<u32>,
    enabled: bool,
}

impl SectionNumbering {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            counters: Vec::new(),
            enabled,
        }
    }

    /// Advance the counter for `level` and return its dotted number, or
    /// `None` when numbering is off or the heading is unnumbered.
    pub fn next(&mut self, level: u8, numbered: bool) -> Option<String> {
        if !self.enabled || !numbered {
            return None;
        }
        let depth = usize::from(level.max(1));
        self.counters.resize(depth, 0);
        if let Some(last) = self.counters.last_mut() {
            *last += 1;
        }
        let parts: Vec<String> = self
            .counters
            .iter()
            .map(|c| if *c == 0 { "1".to_string() } else { c.to_string() })
            .collect();
        Some(parts.join("."))
    }

    /// Prefix `title` with its section number when one applies.
    pub fn label(&mut self, level: u8, title: &str, numbered: bool) -> String {
        match self.next(level, numbered) {
            Some(number) => format!("{number} {title}"),
            None => title.to_string(),
        }
    }
}
