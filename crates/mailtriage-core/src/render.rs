//! Fixed-width table output for header records.

use std::collections::HashMap;
use std::io::{self, Write};

use crossterm::style::Stylize;
use unicode_width::UnicodeWidthChar as _;

use crate::record::{
    FROM, FieldValue, HeaderRecord, INDEX, PROBABLE_SPAM, SENDER_ADDRESS, SUBJECT,
};

/// Width used for columns without a configured width.
pub const DEFAULT_WIDTH: usize = 10;

/// Width used for boolean cells.
pub const DEFAULT_BOOL_WIDTH: usize = 5;

const SEPARATOR: &str = " | ";
const ELLIPSIS: &str = "...";

/// Columns printed for each selected message while a batch is fetched.
pub const BATCH_COLUMNS: [&str; 4] = [INDEX, FROM, SUBJECT, SENDER_ADDRESS];

/// Columns of the order summary printed after a batch.
pub const ORDER_COLUMNS: [&str; 4] = [INDEX, PROBABLE_SPAM, FROM, SUBJECT];

/// Per-column widths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnWidths {
    widths: HashMap<String, usize>,
    bool_width: usize,
}

impl ColumnWidths {
    /// Standard widths for a mailbox of `size` messages.
    #[must_use]
    pub fn for_mailbox(size: u32) -> Self {
        let index_width = size.to_string().len().max(5);
        let widths = HashMap::from([
            (INDEX.to_string(), index_width),
            (FROM.to_string(), 25),
            (SUBJECT.to_string(), 50),
        ]);
        Self {
            widths,
            bool_width: DEFAULT_BOOL_WIDTH,
        }
    }

    /// Applies configured overrides on top of the current widths.
    #[must_use]
    pub fn with_overrides(
        mut self,
        overrides: &HashMap<String, usize>,
        bool_width: Option<usize>,
    ) -> Self {
        self.widths.extend(overrides.iter().map(|(k, v)| (k.clone(), *v)));
        if let Some(width) = bool_width {
            self.bool_width = width;
        }
        self
    }

    /// Width for a column, falling back to [`DEFAULT_WIDTH`].
    #[must_use]
    pub fn get(&self, column: &str) -> usize {
        self.widths.get(column).copied().unwrap_or(DEFAULT_WIDTH)
    }

    /// Width for boolean cells.
    #[must_use]
    pub const fn bool_width(&self) -> usize {
        self.bool_width
    }
}

/// Shortens `s` to `width` characters, ending in `...` when cut.
#[must_use]
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let keep = width.saturating_sub(ELLIPSIS.len());
    let mut out: String = s.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Left-aligns `s` in `width` columns. Each double-width glyph uses up one
/// extra unit of padding.
fn pad(s: &str, width: usize) -> String {
    let chars = s.chars().count();
    let wide = s.chars().filter(|c| c.width() == Some(2)).count();
    let fill = width.saturating_sub(chars + wide);
    format!("{s}{}", " ".repeat(fill))
}

/// Writes records as aligned rows.
#[derive(Debug, Clone)]
pub struct TableRenderer {
    widths: ColumnWidths,
    styled: bool,
}

impl TableRenderer {
    /// Creates a renderer. With `styled` set the header row is bold.
    #[must_use]
    pub const fn new(widths: ColumnWidths, styled: bool) -> Self {
        Self { widths, styled }
    }

    /// Column widths in use.
    #[must_use]
    pub const fn widths(&self) -> &ColumnWidths {
        &self.widths
    }

    fn format_line(&self, columns: &[&str], cell: impl Fn(&str) -> (String, bool)) -> String {
        let mut line = String::new();
        for (i, column) in columns.iter().enumerate() {
            let (text, is_flag) = cell(column);
            if i + 1 == columns.len() {
                line.push_str(&text);
                break;
            }
            let width = if is_flag {
                self.widths.bool_width()
            } else {
                self.widths.get(column)
            };
            line.push_str(&pad(&truncate(&text, width), width));
            line.push_str(SEPARATOR);
        }
        line
    }

    /// Writes the column names, sized like the cells of `sample`.
    ///
    /// # Errors
    ///
    /// Returns any error from the writer.
    pub fn write_header(
        &self,
        out: &mut impl Write,
        columns: &[&str],
        sample: &HeaderRecord,
    ) -> io::Result<()> {
        let line = self.format_line(columns, |c| {
            let is_flag = sample.get(c).is_some_and(FieldValue::is_flag);
            (c.to_string(), is_flag)
        });
        if self.styled {
            writeln!(out, "{}", line.bold())
        } else {
            writeln!(out, "{line}")
        }
    }

    /// Writes one record. Missing fields print as empty cells.
    ///
    /// # Errors
    ///
    /// Returns any error from the writer.
    pub fn write_row(
        &self,
        out: &mut impl Write,
        columns: &[&str],
        record: &HeaderRecord,
    ) -> io::Result<()> {
        let line = self.format_line(columns, |c| match record.get(c) {
            Some(value) => (value.to_string(), value.is_flag()),
            None => (String::new(), false),
        });
        writeln!(out, "{line}")
    }

    /// Writes a blank line, the header row and every record. Writes nothing
    /// for an empty slice.
    ///
    /// # Errors
    ///
    /// Returns any error from the writer.
    pub fn write_table(
        &self,
        out: &mut impl Write,
        columns: &[&str],
        records: &[HeaderRecord],
    ) -> io::Result<()> {
        let Some(first) = records.first() else {
            return Ok(());
        };
        writeln!(out)?;
        self.write_header(out, columns, first)?;
        for record in records {
            self.write_row(out, columns, record)?;
        }
        Ok(())
    }
}
