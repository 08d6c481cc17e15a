//! Rows, datasets, and the helpers the persistence collaborator relies on:
//! JSON blob round-tripping and upload naming.

use crate::ingest::ParsedTable;
use crate::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One record: an ordered mapping from column name to cell value.
/// Key order reflects the header order at ingestion time. Rows may be
/// sparse; a missing key reads as `Value::Null` everywhere.
pub type Row = IndexMap<String, Value>;

/// An immutable named table. `columns` is fixed at creation and never
/// recomputed from later rows; `rows` keeps ingestion order. Replacing a
/// dataset means building a new one.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Dataset {
    pub id: u64,
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Dataset {
    /// Builds a dataset from ingestion output. The parsed header carries
    /// the column order (including any duplicate names, verbatim).
    pub fn from_table(id: u64, name: impl Into<String>, table: ParsedTable) -> Dataset {
        Dataset {
            id,
            name: name.into(),
            columns: table.columns,
            rows: table.rows,
        }
    }

    /// Builds a dataset from a direct structured submission, bypassing
    /// ingestion. Columns are captured once from the first row's key
    /// order; an empty submission yields an empty column list.
    pub fn from_rows(id: u64, name: impl Into<String>, rows: Vec<Row>) -> Dataset {
        let columns = rows
            .first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default();
        Dataset {
            id,
            name: name.into(),
            columns,
            rows,
        }
    }

    /// Encodes the rows as the single JSON blob the persistence layer
    /// stores alongside `columns`.
    pub fn encode_rows(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.rows)
    }

    /// Decodes a stored rows blob. Value variants survive the cycle
    /// unchanged.
    pub fn decode_rows(blob: &str) -> serde_json::Result<Vec<Row>> {
        serde_json::from_str(blob)
    }
}

/// Default dataset name for an uploaded file: the file name with its
/// final extension stripped. A name without a dot is used whole.
pub fn dataset_name_from_file(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) => &file_name[..idx],
        None => file_name,
    }
}

/// Resolves a name collision by suffixing ` (n)` with the first free n,
/// mirroring how uploads are renamed next to existing datasets.
/// `exists` is the caller's taken-name predicate.
pub fn unique_dataset_name(base: &str, exists: impl Fn(&str) -> bool) -> String {
    if !exists(base) {
        return base.to_string();
    }
    let mut counter = 1;
    loop {
        let candidate = format!("{} ({})", base, counter);
        if !exists(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn from_rows_captures_first_row_columns() {
        let rows = vec![
            row(&[("a", Value::Integer(1)), ("b", Value::Text("x".into()))]),
            // Sparse second row with an extra key: columns must not change.
            row(&[("c", Value::Integer(9))]),
        ];
        let ds = Dataset::from_rows(1, "t", rows);
        assert_eq!(ds.columns, vec!["a", "b"]);
        assert_eq!(ds.rows.len(), 2);
    }

    #[test]
    fn from_rows_empty_submission() {
        let ds = Dataset::from_rows(1, "empty", Vec::new());
        assert!(ds.columns.is_empty());
        assert!(ds.rows.is_empty());
    }

    #[test]
    fn rows_blob_round_trip() {
        let rows = vec![row(&[
            ("n", Value::Null),
            ("b", Value::Bool(false)),
            ("i", Value::Integer(7)),
            ("f", Value::Float(2.5)),
            ("s", Value::Text("hi".into())),
        ])];
        let ds = Dataset::from_rows(3, "rt", rows.clone());
        let blob = ds.encode_rows().unwrap();
        let back = Dataset::decode_rows(&blob).unwrap();
        assert_eq!(back, rows);
        // Key order survives too.
        let keys: Vec<&String> = back[0].keys().collect();
        assert_eq!(keys, ["n", "b", "i", "f", "s"]);
    }

    #[test]
    fn name_from_file_strips_extension() {
        assert_eq!(dataset_name_from_file("sales.csv"), "sales");
        assert_eq!(dataset_name_from_file("q1.report.xlsx"), "q1.report");
        assert_eq!(dataset_name_from_file("nodot"), "nodot");
    }

    #[test]
    fn unique_name_counts_up() {
        let taken = ["sales", "sales (1)", "sales (2)"];
        let name = unique_dataset_name("sales", |n| taken.contains(&n));
        assert_eq!(name, "sales (3)");
        assert_eq!(unique_dataset_name("fresh", |_| false), "fresh");
    }
}
