//! Delimiter-separated values (CSV, TSV, PSV and arbitrary single-character delimiters).
//!
//! Rules:
//!
//! - The first line is the header row; every later line becomes one [`Row`] keyed by header.
//! - All cell values are strings. A row shorter than the header gets `""` for the missing cells.
//! - Empty input yields an empty array.

use crate::error::{DataIoError, DataIoResult};
use crate::transform::RowFn;
use crate::types::{Row, Value};

use super::ParseText;

/// A delimited-text dialect, identified by its delimiter byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dsv {
    delimiter: u8,
}

impl Dsv {
    pub const CSV: Dsv = Dsv { delimiter: b',' };
    pub const TSV: Dsv = Dsv { delimiter: b'\t' };
    pub const PSV: Dsv = Dsv { delimiter: b'|' };

    /// Dialect for an arbitrary delimiter.
    ///
    /// The delimiter must be a single ASCII character other than `"`, `\r` or `\n`.
    pub fn new(delimiter: char) -> DataIoResult<Self> {
        if !delimiter.is_ascii() || matches!(delimiter, '"' | '\r' | '\n') {
            return Err(DataIoError::configuration(format!(
                "invalid delimiter {delimiter:?}: expected a single ASCII character other than a quote or line break"
            )));
        }
        Ok(Self {
            delimiter: delimiter as u8,
        })
    }

    pub fn delimiter(&self) -> char {
        self.delimiter as char
    }

    /// Parse `text` into an array of rows, calling `row_fn` (if any) on each row.
    pub fn parse_rows(&self, text: &str, row_fn: Option<&RowFn>) -> DataIoResult<Value> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let columns: Vec<String> = rdr.headers()?.iter().map(str::to_owned).collect();

        let mut rows = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let record = result?;
            let mut row = Row::with_capacity(columns.len());
            for (i, column) in columns.iter().enumerate() {
                let cell = record.get(i).unwrap_or("");
                row.insert(column.clone(), Value::String(cell.to_owned()));
            }

            match row_fn {
                Some(f) => {
                    let out = f(row, idx, &columns).map_err(DataIoError::Transform)?;
                    if !out.is_null() {
                        rows.push(out);
                    }
                }
                None => rows.push(Value::Object(row)),
            }
        }

        Ok(Value::Array(rows))
    }

    /// Format an array of row objects.
    ///
    /// The header is the union of row keys in first-appearance order. Strings are written
    /// verbatim, nulls as empty cells, everything else as JSON text.
    pub fn format_rows(&self, value: &Value) -> DataIoResult<String> {
        let rows = value.as_array().ok_or_else(|| DataIoError::UnsupportedValue {
            message: format!(
                "delimited output needs an array of objects, got {}",
                kind_of(value)
            ),
        })?;

        let mut objects = Vec::with_capacity(rows.len());
        let mut columns: Vec<&str> = Vec::new();
        for (i, row) in rows.iter().enumerate() {
            let obj = row.as_object().ok_or_else(|| DataIoError::UnsupportedValue {
                message: format!("row {i} is {}, expected an object", kind_of(row)),
            })?;
            for key in obj.keys() {
                if !columns.contains(&key.as_str()) {
                    columns.push(key);
                }
            }
            objects.push(obj);
        }

        if columns.is_empty() {
            return Ok(String::new());
        }

        let mut wtr = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(Vec::new());
        wtr.write_record(&columns)?;
        for obj in objects {
            wtr.write_record(columns.iter().map(|c| cell_text(obj.get(*c))))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| DataIoError::Io(e.into_error()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl ParseText for Dsv {
    fn parse(&self, text: &str) -> DataIoResult<Value> {
        self.parse_rows(text, None)
    }
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
