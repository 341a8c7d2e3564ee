//! Modeling pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Ingest**: Read the input file and normalize every record
//! 2. **Model**: Build dimensions, then assemble facts
//! 3. **Validate**: Run integrity checks over the assembled schema
//! 4. **Output**: Write the six tables and the run report
//!
//! Any record error stops the run after ingestion. Any validation error stops
//! it before output; the report is still written so the failure can be read.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info, info_span, warn};

use esm_core::{StarModel, model_star_schema};
use esm_ingest::{ReadOptions, open_records, source_id_for};
use esm_model::{NormalizedRecord, PipelineOptions, RecordError, ValidationReport};
use esm_output::{ReportDocument, export_schema, write_report_json};
use esm_transform::{NormalizationStats, Normalizer};
use esm_validate::validate_schema;

use crate::types::{RunOutcome, RunResult};

/// Directory name used next to the input when no output directory is given.
pub const DEFAULT_OUTPUT_DIR: &str = "star_schema";

/// `<INPUT_DIR>/star_schema`.
pub fn default_output_dir(input: &Path) -> PathBuf {
    input
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(DEFAULT_OUTPUT_DIR)
}

// ============================================================================
// Stage 1: Ingest
// ============================================================================

/// Result of the ingest stage.
#[derive(Debug, Default)]
pub struct IngestResult {
    pub records: Vec<NormalizedRecord>,
    pub record_errors: Vec<RecordError>,
    pub stats: NormalizationStats,
}

impl IngestResult {
    /// Data rows seen, including rejected ones.
    pub fn record_count(&self) -> usize {
        self.stats.records
    }
}

/// Read and normalize every record of `input`.
///
/// File-level problems (missing file, bad header, encoding) are returned as
/// errors. Record-level problems are collected so all of them can be reported.
pub fn ingest(input: &Path, source_id: &str) -> Result<IngestResult> {
    let span = info_span!("ingest", input = %input.display());
    let _guard = span.enter();
    let start = Instant::now();

    let options = ReadOptions::default().with_source_id(Some(source_id.to_string()));
    let reader =
        open_records(input, &options).with_context(|| format!("read {}", input.display()))?;
    let absent = reader.schema().absent_optional();
    if !absent.is_empty() {
        debug!(columns = ?absent, "optional columns absent");
    }

    let mut normalizer = Normalizer::new(reader);
    let mut records = Vec::new();
    let mut record_errors = Vec::new();
    for result in normalizer.by_ref() {
        match result {
            Ok(record) => records.push(record),
            Err(error) => {
                warn!(position = error.position, "{error}");
                record_errors.push(error);
            }
        }
    }
    let stats = normalizer.stats().clone();

    info!(
        records = stats.records,
        rejected = stats.rejected,
        imputed_records = stats.imputed_records,
        imputations = stats.total_imputations(),
        duration_ms = start.elapsed().as_millis(),
        "ingest complete"
    );

    Ok(IngestResult {
        records,
        record_errors,
        stats,
    })
}

// ============================================================================
// Stage 2: Model
// ============================================================================

/// Build the star schema from normalized records.
pub fn model(records: &[NormalizedRecord], options: &PipelineOptions) -> StarModel {
    model_star_schema(records, options.tie_break)
}

// ============================================================================
// Stage 3: Validate
// ============================================================================

/// Check the modeled schema.
pub fn validate(model: &StarModel) -> ValidationReport {
    validate_schema(&model.schema, &model.gaps)
}

// ============================================================================
// Stage 4: Output
// ============================================================================

/// Paths written by the output stage.
#[derive(Debug, Default)]
pub struct OutputResult {
    pub tables: Vec<PathBuf>,
    pub report: Option<PathBuf>,
}

/// Write tables when validation passed, then the report when enabled.
pub fn output(
    output_dir: &Path,
    source_id: &str,
    input: &Path,
    ingest: &IngestResult,
    model: &StarModel,
    report: &ValidationReport,
    options: &PipelineOptions,
) -> Result<OutputResult> {
    let span = info_span!("output", output_dir = %output_dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    let mut result = OutputResult::default();
    if report.passed() {
        result.tables = export_schema(output_dir, &model.schema)
            .with_context(|| format!("export to {}", output_dir.display()))?;
    } else {
        warn!(
            errors = report.error_count(),
            "validation failed, tables not written"
        );
    }

    if options.write_report {
        let document = ReportDocument::validated(
            source_id,
            input,
            ingest.record_count(),
            &model.schema,
            report,
        )
        .with_exported(!result.tables.is_empty());
        result.report = Some(write_report_json(output_dir, &document)?);
    }

    info!(
        tables = result.tables.len(),
        report = result.report.is_some(),
        duration_ms = start.elapsed().as_millis(),
        "output complete"
    );
    Ok(result)
}

/// Report-only output for a run stopped by record errors.
fn output_rejected(
    output_dir: &Path,
    source_id: &str,
    input: &Path,
    ingest: &IngestResult,
) -> Result<PathBuf> {
    let document = ReportDocument::rejected(
        source_id,
        input,
        ingest.record_count(),
        &ingest.record_errors,
    );
    write_report_json(output_dir, &document)
}

// ============================================================================
// Full run
// ============================================================================

/// Run every stage for one input file.
///
/// # Errors
///
/// Returns an error for file-level failures: unreadable input, header
/// problems, or output that cannot be written. Record errors and validation
/// failures are reported through [`RunResult::outcome`].
pub fn run(input: &Path, options: &PipelineOptions) -> Result<RunResult> {
    let source_id = source_id_for(input, options.source_id.as_deref());
    let output_dir = options
        .output_dir
        .clone()
        .unwrap_or_else(|| default_output_dir(input));
    let span = info_span!("run", source_id = %source_id);
    let _guard = span.enter();
    let start = Instant::now();

    let ingested = ingest(input, &source_id)?;

    let mut result = RunResult {
        input: input.to_path_buf(),
        source_id: source_id.clone(),
        output_dir: output_dir.clone(),
        outcome: RunOutcome::RecordsRejected,
        record_count: ingested.record_count(),
        normalization: ingested.stats.clone(),
        record_errors: Vec::new(),
        schema: Default::default(),
        report: None,
        divergent: Default::default(),
        written: Vec::new(),
        report_path: None,
    };

    if !ingested.record_errors.is_empty() {
        warn!(
            rejected = ingested.record_errors.len(),
            "records rejected, nothing modeled"
        );
        if options.write_report && !options.dry_run {
            result.report_path = Some(output_rejected(
                &output_dir,
                &source_id,
                input,
                &ingested,
            )?);
        }
        result.record_errors = ingested.record_errors;
        return Ok(result);
    }

    let modeled = model(&ingested.records, options);
    let report = validate(&modeled);

    if !options.dry_run {
        let written = output(
            &output_dir,
            &source_id,
            input,
            &ingested,
            &modeled,
            &report,
            options,
        )?;
        result.written = written.tables;
        result.report_path = written.report;
    }
    result.outcome = if !report.passed() {
        RunOutcome::Blocked
    } else if options.dry_run {
        RunOutcome::DryRun
    } else {
        RunOutcome::Exported
    };

    info!(
        outcome = result.outcome.label(),
        duration_ms = start.elapsed().as_millis(),
        "run complete"
    );

    result.schema = modeled.schema;
    result.divergent = modeled.divergent;
    result.report = Some(report);
    Ok(result)
}
