//! CSV serialization for exports.
//!
//! Free-text columns are always double-quoted with inner quotes doubled. Ids,
//! numbers, dates and statuses are written verbatim. Lines are joined with `\n`
//! and there is no trailing newline.

use crate::error::{FarmError, Result};
use crate::model::Record;

/// Rendered in place of a missing date or free-text value.
pub const MISSING: &str = "—";

/// One cell of an exported row.
#[derive(Debug, Clone, PartialEq)]
pub enum CsvField {
    /// Free text, always quoted.
    Text(String),
    /// Emitted as-is.
    Plain(String),
}

impl CsvField {
    pub fn text(value: impl Into<String>) -> Self {
        CsvField::Text(value.into())
    }

    pub fn plain(value: impl ToString) -> Self {
        CsvField::Plain(value.to_string())
    }

    /// A plain field that renders [`MISSING`] when absent.
    pub fn optional(value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => CsvField::Plain(v.to_string()),
            None => CsvField::Plain(MISSING.to_string()),
        }
    }

    fn render(&self) -> String {
        match self {
            CsvField::Text(s) => format!("\"{}\"", s.replace('"', "\"\"")),
            CsvField::Plain(s) => s.clone(),
        }
    }
}

/// Serializes `rows` under the record type's fixed header.
pub fn render<R: Record>(rows: &[R]) -> Result<Vec<u8>> {
    if rows.is_empty() {
        return Err(FarmError::EmptyExport);
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(R::CSV_HEADER.join(","));
    for row in rows {
        let cells: Vec<String> = row.csv_row().iter().map(CsvField::render).collect();
        lines.push(cells.join(","));
    }
    Ok(lines.join("\n").into_bytes())
}
