//! The dynamically-tagged scalar stored in every dataset cell, plus the
//! inference and coercion rules shared by ingestion, filtering, and
//! aggregation.

use serde::{Deserialize, Serialize};

/// A single cell value. Datasets have no schema; any column may hold any
/// of these kinds on a per-row basis.
///
/// Serialization is untagged so rows round-trip through the persistence
/// blob as plain JSON scalars. Deserialization preserves the variant:
/// integral JSON numbers come back as `Integer`, fractional ones as
/// `Float`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Infer a typed value from raw cell text.
    ///
    /// Empty or all-whitespace text is `Null`. Text containing a `.` is
    /// tried as a float, everything else as an integer; whatever fails to
    /// parse stays text. Booleans are never inferred from text, so CSV
    /// cells reading `true` stay `Text("true")`.
    pub fn infer(text: &str) -> Value {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Value::Null;
        }
        if trimmed.contains('.') {
            if let Ok(f) = trimmed.parse::<f64>() {
                return Value::Float(f);
            }
        } else if let Ok(i) = trimmed.parse::<i64>() {
            return Value::Integer(i);
        }
        Value::Text(trimmed.to_string())
    }

    /// Text form used for filter comparison and group-key construction.
    /// `Null` stringifies to empty text, numbers to their canonical
    /// decimal form.
    pub fn stringify(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Text(s) => s.clone(),
        }
    }

    /// Numeric coercion via the string form. Returns `None` when the
    /// value has no float reading; callers decide the fallback (clause
    /// failure for filters, 0.0 for aggregation).
    pub fn numeric(&self) -> Option<f64> {
        self.stringify().parse::<f64>().ok()
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}
