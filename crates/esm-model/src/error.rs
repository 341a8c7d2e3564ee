use serde::Serialize;
use thiserror::Error;

use crate::columns::Column;
use crate::ids::RecordId;

/// Why a single input record could not be turned into a normalized record.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordErrorKind {
    #[error("required field {column} is empty")]
    MissingRequired { column: Column },

    #[error("{column} value '{raw}' is not a valid date")]
    InvalidDate { column: Column, raw: String },

    #[error("unreadable record: {message}")]
    Unreadable { message: String },
}

/// A record that cannot be normalized at all. Fatal for the run.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("record {position} ({record_id}): {kind}")]
pub struct RecordError {
    /// 1-based record position in the source.
    pub position: u64,
    pub record_id: RecordId,
    pub kind: RecordErrorKind,
}

impl RecordError {
    pub fn new(position: u64, record_id: RecordId, kind: RecordErrorKind) -> Self {
        Self {
            position,
            record_id,
            kind,
        }
    }
}
