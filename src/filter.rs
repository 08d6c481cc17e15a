//! Filter clauses and the predicate evaluator applied before grouping.

use crate::dataset::Row;
use serde::{Deserialize, Serialize};

/// One filter clause as it arrives on the wire. The operator stays text;
/// an operator this engine does not recognize makes the clause a no-op
/// rather than an error.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterClause {
    pub column: String,
    pub operator: String,
    pub value: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FilterOp {
    Eq,
    Neq,
    Gt,
    Lt,
    Gte,
    Lte,
    Contains,
}

impl FilterOp {
    pub fn parse(op: &str) -> Option<FilterOp> {
        match op {
            "eq" => Some(FilterOp::Eq),
            "neq" => Some(FilterOp::Neq),
            "gt" => Some(FilterOp::Gt),
            "lt" => Some(FilterOp::Lt),
            "gte" => Some(FilterOp::Gte),
            "lte" => Some(FilterOp::Lte),
            "contains" => Some(FilterOp::Contains),
            _ => None,
        }
    }
}

/// True when the row passes every clause. Clauses are AND-combined in
/// list order and short-circuit on the first failure.
pub fn row_matches(row: &Row, clauses: &[FilterClause]) -> bool {
    clauses.iter().all(|clause| clause_matches(row, clause))
}

/// A Null or absent column value fails the clause for every operator —
/// including `neq`, where absence is non-matching rather than "not
/// equal". Numeric operators fail the clause when either side has no
/// float reading.
fn clause_matches(row: &Row, clause: &FilterClause) -> bool {
    let value = match row.get(&clause.column) {
        Some(v) if !v.is_null() => v,
        _ => return false,
    };
    let op = match FilterOp::parse(&clause.operator) {
        Some(op) => op,
        None => return true,
    };
    let row_text = value.stringify();
    match op {
        FilterOp::Eq => row_text == clause.value,
        FilterOp::Neq => row_text != clause.value,
        FilterOp::Contains => row_text.contains(&clause.value),
        FilterOp::Gt | FilterOp::Lt | FilterOp::Gte | FilterOp::Lte => {
            let (lhs, rhs) = match (row_text.parse::<f64>(), clause.value.parse::<f64>()) {
                (Ok(lhs), Ok(rhs)) => (lhs, rhs),
                _ => return false,
            };
            match op {
                FilterOp::Gt => lhs > rhs,
                FilterOp::Lt => lhs < rhs,
                FilterOp::Gte => lhs >= rhs,
                FilterOp::Lte => lhs <= rhs,
                _ => unreachable!(),
            }
        }
    }
}
