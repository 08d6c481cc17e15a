//! chartable - dataset ingestion and chart query engine
//!
//! Turns uploaded tabular files (CSV, xlsx/xls) into an in-memory row
//! store with per-cell inferred types, and answers filter → group →
//! aggregate queries against that store to produce chart-ready result
//! rows.
//!
//! The pipeline:
//! - `value` - the dynamically-tagged scalar and its inference rules
//! - `ingest` - file bytes → ordered columns + typed rows
//! - `dataset` - the immutable row store and persistence round-trip
//! - `filter` - AND-combined predicate evaluation over rows
//! - `aggregate` - streaming group-by with per-group accumulators
//! - `query` - orchestration and output-shape selection
//!
//! Datasets are immutable after ingestion, so concurrent queries need no
//! locking; queries are synchronous, single-threaded, pure reads. All
//! hard failures happen at ingestion time — query-time coercion failures
//! degrade to defined fallbacks instead of erroring.

pub mod aggregate;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod ingest;
pub mod query;
pub mod value;

pub use aggregate::{aggregate_global, aggregate_grouped, Accumulator, Aggregation};
pub use dataset::{dataset_name_from_file, unique_dataset_name, Dataset, Row};
pub use error::EngineError;
pub use filter::{row_matches, FilterClause, FilterOp};
pub use ingest::{parse, parse_csv, parse_workbook, FileKind, ParsedTable};
pub use query::{run_query, ChartQuery};
pub use value::Value;
