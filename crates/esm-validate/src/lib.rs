//! Integrity validation for the assembled star schema.
//!
//! Checks referential integrity, key uniqueness and contiguity, and required
//! measures. Violations are errors and block export; resolution gaps from fact
//! assembly are carried into the report as warnings.

mod checks;

use std::time::Instant;

use esm_model::redact::redact_value;
use esm_model::{Issue, ResolutionGap, StarSchema, ValidationReport};
use tracing::info_span;

/// Validate a schema and fold in the assembler's resolution gaps.
pub fn validate_schema(schema: &StarSchema, gaps: &[ResolutionGap]) -> ValidationReport {
    let span = info_span!("validate", tables = schema.table_counts().len());
    let _guard = span.enter();
    let start = Instant::now();

    let mut report = ValidationReport::new();
    report.extend(checks::run_all(schema));
    report.extend(gaps.iter().cloned().map(Issue::ResolutionGap));

    for issue in report.errors() {
        let message = issue.to_string();
        tracing::error!(
            code = issue.code(),
            table = issue.table(),
            detail = %redact_value(&message),
            "integrity violation"
        );
    }
    tracing::info!(
        errors = report.error_count(),
        warnings = report.warning_count(),
        passed = report.passed(),
        duration_ms = start.elapsed().as_millis(),
        "validation complete"
    );

    report
}
