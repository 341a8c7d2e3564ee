//! Result types for a modeling run.

use std::collections::BTreeMap;
use std::path::PathBuf;

use esm_model::{DimensionKind, RecordError, StarSchema, TableCount, ValidationReport};
use esm_transform::NormalizationStats;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// All tables were written.
    Exported,
    /// Modeled and validated; nothing was written by request.
    DryRun,
    /// Validation failed; no table was written.
    Blocked,
    /// At least one record could not be normalized; nothing was modeled.
    RecordsRejected,
}

impl RunOutcome {
    pub fn label(self) -> &'static str {
        match self {
            RunOutcome::Exported => "exported",
            RunOutcome::DryRun => "dry run",
            RunOutcome::Blocked => "blocked",
            RunOutcome::RecordsRejected => "records rejected",
        }
    }

    pub fn is_failure(self) -> bool {
        matches!(self, RunOutcome::Blocked | RunOutcome::RecordsRejected)
    }
}

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub input: PathBuf,
    pub source_id: String,
    pub output_dir: PathBuf,
    pub outcome: RunOutcome,
    /// Data rows read, including rejected ones.
    pub record_count: usize,
    pub normalization: NormalizationStats,
    pub record_errors: Vec<RecordError>,
    /// Empty when records were rejected.
    pub schema: StarSchema,
    /// `None` when the run stopped before validation.
    pub report: Option<ValidationReport>,
    pub divergent: BTreeMap<DimensionKind, usize>,
    /// Table files written, in table order.
    pub written: Vec<PathBuf>,
    pub report_path: Option<PathBuf>,
}

impl RunResult {
    pub fn has_errors(&self) -> bool {
        self.outcome.is_failure()
    }

    pub fn table_counts(&self) -> Vec<TableCount> {
        self.schema.table_counts()
    }
}
