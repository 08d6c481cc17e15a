//! Engine error taxonomy.
//!
//! Only ingestion can fail hard. Column misses and numeric coercion
//! failures during query evaluation degrade to defined fallbacks
//! (see `filter` and `aggregate`) rather than surfacing here.

use crate::ingest::FileKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The byte stream could not be decoded as the declared format.
    #[error("cannot decode input as {kind}: {detail}")]
    Format { kind: FileKind, detail: String },

    /// The input decoded, but held no data rows.
    #[error("no data rows in input")]
    EmptyInput,

    /// The file name carries an extension this engine does not ingest.
    #[error("unsupported file format: {0}. Upload a CSV or Excel file")]
    UnsupportedFormat(String),
}

impl EngineError {
    pub(crate) fn format(kind: FileKind, err: impl std::fmt::Display) -> Self {
        EngineError::Format {
            kind,
            detail: err.to_string(),
        }
    }
}
