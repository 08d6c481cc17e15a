//! Streaming group-by aggregation: one pass over the filtered rows, one
//! accumulator per group, groups emitted in first-encounter order.

use crate::dataset::Row;
use crate::value::Value;
use indexmap::IndexMap;

/// Null and absent group-key components stringify to this literal so
/// they collide into one group.
const NULL_KEY: &str = "null";

/// How the y-axis values of a group collapse into one scalar.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Aggregation {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl Aggregation {
    /// Lenient parse: any name this engine does not recognize (including
    /// `none`, which the orchestrator has already routed past) behaves
    /// as `sum`.
    pub fn parse(name: &str) -> Aggregation {
        match name {
            "count" => Aggregation::Count,
            "avg" => Aggregation::Avg,
            "min" => Aggregation::Min,
            "max" => Aggregation::Max,
            _ => Aggregation::Sum,
        }
    }
}

/// Running statistics for one group, updated row by row. A y value with
/// no float reading contributes 0.0 and the row still counts.
#[derive(Clone, Debug)]
pub struct Accumulator {
    count: u64,
    sum: f64,
    min: f64,
    max: f64,
}

impl Accumulator {
    pub fn new() -> Accumulator {
        Accumulator {
            count: 0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    pub fn update(&mut self, y: f64) {
        self.count += 1;
        self.sum += y;
        self.min = self.min.min(y);
        self.max = self.max.max(y);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Final scalar for the requested aggregation. `min`/`max` are Null
    /// while their sentinels never moved; `avg` of zero rows is 0.0.
    /// Counts come out as integers, everything else as floats.
    pub fn select(&self, aggregation: Aggregation) -> Value {
        match aggregation {
            Aggregation::Count => Value::Integer(self.count as i64),
            Aggregation::Sum => Value::Float(self.sum),
            Aggregation::Avg => {
                if self.count > 0 {
                    Value::Float(self.sum / self.count as f64)
                } else {
                    Value::Float(0.0)
                }
            }
            Aggregation::Min => {
                if self.min == f64::INFINITY {
                    Value::Null
                } else {
                    Value::Float(self.min)
                }
            }
            Aggregation::Max => {
                if self.max == f64::NEG_INFINITY {
                    Value::Null
                } else {
                    Value::Float(self.max)
                }
            }
        }
    }
}

impl Default for Accumulator {
    fn default() -> Accumulator {
        Accumulator::new()
    }
}

/// Composite group key: the stringified group-by values joined with `|`
/// in list order. Rows land in the same group iff their keys are
/// textually identical.
fn group_key(row: &Row, group_by: &[String]) -> String {
    group_by
        .iter()
        .map(|column| match row.get(column) {
            Some(v) if !v.is_null() => v.stringify(),
            _ => NULL_KEY.to_string(),
        })
        .collect::<Vec<_>>()
        .join("|")
}

fn y_value(row: &Row, y_axis: &str) -> f64 {
    row.get(y_axis).and_then(Value::numeric).unwrap_or(0.0)
}

/// Partitions rows by group key and emits one output row per group, in
/// first-encounter order. Each output row holds the group-by columns
/// (their original values, from the first row of the group) plus one key
/// named exactly `y_axis` holding the aggregated scalar.
pub fn aggregate_grouped(
    rows: &[Row],
    group_by: &[String],
    y_axis: &str,
    aggregation: Aggregation,
) -> Vec<Row> {
    let mut groups: IndexMap<String, (Row, Accumulator)> = IndexMap::new();
    for row in rows {
        let key = group_key(row, group_by);
        let entry = groups.entry(key).or_insert_with(|| {
            let mut group_row = Row::new();
            for column in group_by {
                let value = row.get(column).cloned().unwrap_or(Value::Null);
                group_row.insert(column.clone(), value);
            }
            (group_row, Accumulator::new())
        });
        entry.1.update(y_value(row, y_axis));
    }

    groups
        .into_values()
        .map(|(mut group_row, acc)| {
            group_row.insert(y_axis.to_string(), acc.select(aggregation));
            group_row
        })
        .collect()
}

/// Aggregates the whole row set as one implicit group, producing a
/// single `{y_axis: value}` row. Used when a query asks for an aggregate
/// without any group-by columns.
pub fn aggregate_global(rows: &[Row], y_axis: &str, aggregation: Aggregation) -> Vec<Row> {
    let mut acc = Accumulator::new();
    for row in rows {
        acc.update(y_value(row, y_axis));
    }
    let mut out = Row::new();
    out.insert(y_axis.to_string(), acc.select(aggregation));
    vec![out]
}
