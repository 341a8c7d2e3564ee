//! Validation issue types.
//!
//! Each [`Issue`] variant carries only the data needed to locate the offending
//! row: a table row key, a record position/id, or a natural key.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dimension::DimensionKind;
use crate::fact::{FactKind, ResolutionGap};
use crate::ids::{RecordId, SurrogateKey};

/// Issue severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Integrity violation; blocks export.
    Error,
    /// Surfaced in the report; does not block export.
    Warning,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Warning => "Warning",
        }
    }
}

/// Validation issue - each variant carries only its needed data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Issue {
    /// Fact row references a surrogate key missing from its dimension.
    OrphanForeignKey {
        fact: FactKind,
        fact_key: SurrogateKey,
        record_id: RecordId,
        dimension: DimensionKind,
        key: SurrogateKey,
    },
    /// Two dimension rows carry the same surrogate key.
    DuplicateSurrogateKey {
        dimension: DimensionKind,
        key: SurrogateKey,
        count: usize,
    },
    /// Dimension keys are not the range 1..=n in row order.
    NonContiguousSurrogateKey {
        dimension: DimensionKind,
        row: usize,
        expected: SurrogateKey,
        found: SurrogateKey,
    },
    /// Two dimension rows share a natural key.
    DuplicateNaturalKey {
        dimension: DimensionKind,
        natural_key: String,
        first: SurrogateKey,
        duplicate: SurrogateKey,
    },
    /// Required fact measure is null or not finite.
    NullMeasure {
        fact: FactKind,
        fact_key: SurrogateKey,
        record_id: RecordId,
        measure: String,
    },
    /// Fact row keys are not the range 1..=n in row order.
    NonContiguousFactKey {
        fact: FactKind,
        row: usize,
        expected: SurrogateKey,
        found: SurrogateKey,
    },
    /// Record excluded from a fact table because a dimension lookup failed.
    ResolutionGap(ResolutionGap),
}

impl Issue {
    /// Stable short code for reports.
    pub fn code(&self) -> &'static str {
        match self {
            Issue::OrphanForeignKey { .. } => "RI001",
            Issue::DuplicateSurrogateKey { .. } => "KY001",
            Issue::NonContiguousSurrogateKey { .. } => "KY002",
            Issue::DuplicateNaturalKey { .. } => "KY003",
            Issue::NonContiguousFactKey { .. } => "KY004",
            Issue::NullMeasure { .. } => "MS001",
            Issue::ResolutionGap(_) => "RG001",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Issue::ResolutionGap(_) => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Table the issue was found in.
    pub fn table(&self) -> &'static str {
        match self {
            Issue::OrphanForeignKey { fact, .. }
            | Issue::NullMeasure { fact, .. }
            | Issue::NonContiguousFactKey { fact, .. } => fact.table_name(),
            Issue::DuplicateSurrogateKey { dimension, .. }
            | Issue::NonContiguousSurrogateKey { dimension, .. }
            | Issue::DuplicateNaturalKey { dimension, .. } => dimension.table_name(),
            Issue::ResolutionGap(gap) => gap.fact.table_name(),
        }
    }

    /// Source record the issue traces back to, if known.
    pub fn record_id(&self) -> Option<RecordId> {
        match self {
            Issue::OrphanForeignKey { record_id, .. } | Issue::NullMeasure { record_id, .. } => {
                Some(*record_id)
            }
            Issue::ResolutionGap(gap) => Some(gap.record_id),
            _ => None,
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::OrphanForeignKey {
                fact,
                fact_key,
                dimension,
                key,
                ..
            } => write!(
                f,
                "{} row {fact_key}: {} {key} not found in {}",
                fact.table_name(),
                dimension.key_column(),
                dimension.table_name()
            ),
            Issue::DuplicateSurrogateKey {
                dimension,
                key,
                count,
            } => write!(
                f,
                "{}: surrogate key {key} assigned to {count} rows",
                dimension.table_name()
            ),
            Issue::NonContiguousSurrogateKey {
                dimension,
                row,
                expected,
                found,
            } => write!(
                f,
                "{} row {row}: expected key {expected}, found {found}",
                dimension.table_name()
            ),
            Issue::DuplicateNaturalKey {
                dimension,
                natural_key,
                first,
                duplicate,
            } => write!(
                f,
                "{}: natural key {natural_key} on keys {first} and {duplicate}",
                dimension.table_name()
            ),
            Issue::NullMeasure {
                fact,
                fact_key,
                measure,
                ..
            } => write!(
                f,
                "{} row {fact_key}: required measure {measure} is null",
                fact.table_name()
            ),
            Issue::NonContiguousFactKey {
                fact,
                row,
                expected,
                found,
            } => write!(
                f,
                "{} row {row}: expected key {expected}, found {found}",
                fact.table_name()
            ),
            Issue::ResolutionGap(gap) => gap.fmt(f),
        }
    }
}

/// Outcome of integrity validation for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn extend(&mut self, issues: impl IntoIterator<Item = Issue>) {
        self.issues.extend(issues);
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity() == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity() == Severity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Overall pass/fail: any error-level issue fails the run.
    pub fn passed(&self) -> bool {
        !self.has_errors()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity() == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity() == Severity::Warning)
    }
}
