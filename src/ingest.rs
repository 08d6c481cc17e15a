//! Tabular ingestion: whole-file CSV and spreadsheet byte streams in,
//! ordered columns and typed rows out.
//!
//! Spreadsheet cells are textified first (numbers, dates, booleans, and
//! formulas each have a fixed text form) and the text is then re-inferred
//! exactly like a CSV cell. Boolean and date cells therefore come back as
//! `Text`, not `Bool` or a date type; that round-trip-through-text is the
//! contract, not an accident of this implementation.

use crate::dataset::Row;
use crate::error::EngineError;
use crate::value::Value;
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use std::fmt;
use std::io::Cursor;
use tracing::debug;

/// Declared input kind for an upload.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FileKind {
    Csv,
    Xlsx,
    Xls,
}

impl FileKind {
    /// Sniffs the kind from a file name's extension, case-insensitively.
    /// Anything but `.csv`, `.xlsx`, or `.xls` is rejected.
    pub fn from_file_name(file_name: &str) -> Result<FileKind, EngineError> {
        let lower = file_name.to_lowercase();
        if lower.ends_with(".csv") {
            Ok(FileKind::Csv)
        } else if lower.ends_with(".xlsx") {
            Ok(FileKind::Xlsx)
        } else if lower.ends_with(".xls") {
            Ok(FileKind::Xls)
        } else {
            Err(EngineError::UnsupportedFormat(file_name.to_string()))
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Csv => "csv",
            FileKind::Xlsx => "xlsx",
            FileKind::Xls => "xls",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ingestion output: header names in file order (duplicates kept
/// verbatim) and one typed row per data record.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

/// Parses raw upload bytes as the declared kind.
pub fn parse(bytes: &[u8], kind: FileKind) -> Result<ParsedTable, EngineError> {
    match kind {
        FileKind::Csv => parse_csv(bytes),
        FileKind::Xlsx | FileKind::Xls => parse_workbook(bytes, kind),
    }
}

/// Parses CSV bytes. The first record is the header, used verbatim.
/// Records shorter than the header are padded with empty cells (which
/// infer to `Null`); extra trailing cells are ignored.
pub fn parse_csv(bytes: &[u8]) -> Result<ParsedTable, EngineError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    let mut records = reader.records();

    let header = match records.next() {
        Some(record) => record.map_err(|e| EngineError::format(FileKind::Csv, e))?,
        None => return Err(EngineError::EmptyInput),
    };
    let columns: Vec<String> = header.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(|e| EngineError::format(FileKind::Csv, e))?;
        let mut row = Row::new();
        for (idx, name) in columns.iter().enumerate() {
            let cell = record.get(idx).unwrap_or("");
            row.insert(name.clone(), Value::infer(cell));
        }
        rows.push(row);
    }
    if rows.is_empty() {
        return Err(EngineError::EmptyInput);
    }

    debug!(columns = columns.len(), rows = rows.len(), "parsed csv");
    Ok(ParsedTable { columns, rows })
}

/// Parses spreadsheet bytes (xlsx or xls) from the first sheet. The first
/// row is the header; a missing header cell is synthesized as
/// `Column{n}` (1-based). Fully blank rows are skipped.
pub fn parse_workbook(bytes: &[u8], kind: FileKind) -> Result<ParsedTable, EngineError> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook =
        open_workbook_auto_from_rs(cursor).map_err(|e| EngineError::format(kind, e))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(EngineError::EmptyInput)?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| EngineError::format(kind, e))?;
    // Cached formula texts, by absolute cell position. An unreadable
    // formula plane just means no formula cells.
    let formulas = workbook
        .worksheet_formula(&sheet_name)
        .unwrap_or_else(|_| Range::empty());

    let mut sheet_rows = range.rows().enumerate();
    let (start_row, start_col) = range.start().unwrap_or((0, 0));

    let header_cells = match sheet_rows.next() {
        Some((_, cells)) => cells,
        None => return Err(EngineError::EmptyInput),
    };
    let columns: Vec<String> = header_cells
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let text = cell_to_text(cell).trim().to_string();
            if text.is_empty() {
                format!("Column{}", idx + 1)
            } else {
                text
            }
        })
        .collect();

    let mut rows = Vec::new();
    for (row_idx, cells) in sheet_rows {
        if cells.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }
        let mut row = Row::new();
        for (col_idx, name) in columns.iter().enumerate() {
            let cell = cells.get(col_idx).unwrap_or(&Data::Empty);
            let abs = (start_row + row_idx as u32, start_col + col_idx as u32);
            let text = match formulas.get_value(abs) {
                Some(formula) if !formula.is_empty() => formula.clone(),
                _ => cell_to_text(cell),
            };
            row.insert(name.clone(), Value::infer(&text));
        }
        rows.push(row);
    }
    if rows.is_empty() {
        return Err(EngineError::EmptyInput);
    }

    debug!(
        sheet = %sheet_name,
        columns = columns.len(),
        rows = rows.len(),
        "parsed workbook"
    );
    Ok(ParsedTable { columns, rows })
}

/// Text form of a spreadsheet cell, before type inference.
///
/// Numbers with no fractional part format as integer text; date cells use
/// this crate's canonical date text (`%Y-%m-%d`, with a time part when
/// not midnight); booleans as `true`/`false`; error and empty cells as
/// empty text.
fn cell_to_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.is_finite() {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => {
            use calamine::DataType as _;
            match cell.as_datetime() {
                Some(ndt) => {
                    if ndt.time() == chrono::NaiveTime::MIN {
                        ndt.format("%Y-%m-%d").to_string()
                    } else {
                        ndt.format("%Y-%m-%d %H:%M:%S").to_string()
                    }
                }
                None => dt.as_f64().to_string(),
            }
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}
