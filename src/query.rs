//! The chart query orchestrator: filter, then group/aggregate (or pass
//! the filtered rows through), producing chart-ready output rows.

use crate::aggregate::{aggregate_global, aggregate_grouped, Aggregation};
use crate::dataset::{Dataset, Row};
use crate::filter::{row_matches, FilterClause};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A chart render request against one dataset.
///
/// `x_axis` is carried but only matters on the pass-through path, where
/// the caller reads the x column off the returned rows itself; the
/// aggregated paths ignore it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartQuery {
    pub dataset_id: u64,
    #[serde(default)]
    pub x_axis: String,
    #[serde(default)]
    pub y_axis: String,
    /// Aggregation name as sent by the caller; `""`/`"none"` means no
    /// global aggregation, anything unrecognized aggregates as `sum`.
    #[serde(default)]
    pub aggregation: String,
    #[serde(default)]
    pub group_by: Vec<String>,
    #[serde(default)]
    pub filters: Vec<FilterClause>,
}

impl ChartQuery {
    fn wants_global_aggregation(&self) -> bool {
        !self.aggregation.is_empty() && self.aggregation != "none" && !self.y_axis.is_empty()
    }
}

/// Runs a query as a pure read over the dataset:
///
/// 1. drop filter clauses with empty column names (no-ops, not errors);
/// 2. keep only matching rows, in dataset order;
/// 3. grouped aggregation when both `group_by` and `y_axis` are set;
/// 4. else one global aggregate when an aggregation is requested;
/// 5. else the filtered rows unchanged.
pub fn run_query(dataset: &Dataset, query: &ChartQuery) -> Vec<Row> {
    let clauses: Vec<FilterClause> = query
        .filters
        .iter()
        .filter(|clause| !clause.column.is_empty())
        .cloned()
        .collect();

    let filtered: Vec<Row> = dataset
        .rows
        .iter()
        .filter(|row| row_matches(row, &clauses))
        .cloned()
        .collect();
    debug!(
        dataset = dataset.id,
        total = dataset.rows.len(),
        kept = filtered.len(),
        "filtered rows"
    );

    if !query.group_by.is_empty() && !query.y_axis.is_empty() {
        return aggregate_grouped(
            &filtered,
            &query.group_by,
            &query.y_axis,
            Aggregation::parse(&query.aggregation),
        );
    }
    if query.wants_global_aggregation() {
        return aggregate_global(
            &filtered,
            &query.y_axis,
            Aggregation::parse(&query.aggregation),
        );
    }
    filtered
}
