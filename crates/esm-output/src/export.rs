//! CSV table and JSON report writing.
//!
//! Every file is written to a hidden sibling first and renamed into place.
//! The six tables are staged together and only swapped in once all of them
//! are complete, so the directory holds either the previous set or the new
//! one.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use polars::prelude::{CsvWriter, SerWriter};
use serde::Serialize;
use tracing::{debug, warn};

use esm_model::{Issue, RecordError, StarSchema, TableCount, ValidationReport};

use crate::frames::{TableFrame, schema_frames};

/// Report file name inside the output directory.
pub const REPORT_FILE: &str = "validation_report.json";

/// Ensure an output directory exists and return it.
pub fn ensure_output_dir(dir: &Path) -> Result<&Path> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

fn hidden_sibling(target: &Path, suffix: &str) -> PathBuf {
    let name = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.{suffix}"))
}

/// A complete file waiting to be renamed over its target.
#[derive(Debug)]
struct StagedFile {
    staging: PathBuf,
    target: PathBuf,
}

impl StagedFile {
    fn discard(&self) {
        let _ = fs::remove_file(&self.staging);
    }
}

/// Write and sync the staging sibling of `target`.
fn stage_file(target: &Path, write: impl FnOnce(&mut File) -> Result<()>) -> Result<StagedFile> {
    let staging = hidden_sibling(target, "tmp");
    let outcome = File::create(&staging)
        .with_context(|| format!("create {}", staging.display()))
        .and_then(|mut file| {
            write(&mut file)?;
            file.sync_all()
                .with_context(|| format!("sync {}", staging.display()))
        });
    if let Err(error) = outcome {
        let _ = fs::remove_file(&staging);
        return Err(error);
    }
    Ok(StagedFile {
        staging,
        target: target.to_path_buf(),
    })
}

/// Write through a staging file, then rename over `target`.
fn write_replacing(target: &Path, write: impl FnOnce(&mut File) -> Result<()>) -> Result<()> {
    let staged = stage_file(target, write)?;
    fs::rename(&staged.staging, &staged.target)
        .with_context(|| {
            format!(
                "rename {} to {}",
                staged.staging.display(),
                staged.target.display()
            )
        })
        .inspect_err(|_| staged.discard())
}

fn stage_table(dir: &Path, frame: &mut TableFrame) -> Result<StagedFile> {
    let path = dir.join(frame.file_name());
    let staged = stage_file(&path, |file| {
        CsvWriter::new(file)
            .include_header(true)
            .finish(&mut frame.data)
            .with_context(|| format!("write {}", frame.name))
    })?;
    debug!(table = frame.name, rows = frame.data.height(), path = %path.display(), "staged table");
    Ok(staged)
}

/// Refuse targets that a rename could not replace.
fn check_targets(dir: &Path, frames: &[TableFrame]) -> Result<()> {
    for frame in frames {
        let target = dir.join(frame.file_name());
        if target.exists() && !target.is_file() {
            bail!("{} exists and is not a file", target.display());
        }
    }
    Ok(())
}

/// Move existing targets aside, then rename every staged file into place.
///
/// `backups` and `placed` record progress so a failure can be undone.
fn swap_in(
    staged: &[StagedFile],
    backups: &mut Vec<(PathBuf, PathBuf)>,
    placed: &mut Vec<PathBuf>,
) -> Result<()> {
    for file in staged {
        if file.target.exists() {
            let backup = hidden_sibling(&file.target, "bak");
            fs::rename(&file.target, &backup)
                .with_context(|| format!("move aside {}", file.target.display()))?;
            backups.push((backup, file.target.clone()));
        }
    }
    for file in staged {
        fs::rename(&file.staging, &file.target).with_context(|| {
            format!(
                "rename {} to {}",
                file.staging.display(),
                file.target.display()
            )
        })?;
        placed.push(file.target.clone());
    }
    Ok(())
}

/// Swap the whole staged set in, or restore the previous set.
fn commit_all(staged: &[StagedFile]) -> Result<()> {
    let mut backups = Vec::new();
    let mut placed = Vec::new();
    match swap_in(staged, &mut backups, &mut placed) {
        Ok(()) => {
            for (backup, _) in &backups {
                if let Err(error) = fs::remove_file(backup) {
                    warn!(path = %backup.display(), %error, "stale backup left behind");
                }
            }
            Ok(())
        }
        Err(error) => {
            for target in &placed {
                let _ = fs::remove_file(target);
            }
            for (backup, target) in &backups {
                if let Err(restore) = fs::rename(backup, target) {
                    warn!(path = %target.display(), error = %restore, "previous table not restored");
                }
            }
            staged.iter().for_each(StagedFile::discard);
            Err(error)
        }
    }
}

/// Write all six tables as one set. Returns the written paths in table order.
///
/// Nothing is replaced unless every table was staged; a failure leaves the
/// previous files in place.
pub fn export_schema(dir: &Path, schema: &StarSchema) -> Result<Vec<PathBuf>> {
    ensure_output_dir(dir)?;
    let mut frames = schema_frames(schema).context("build table frames")?;
    check_targets(dir, &frames)?;

    let mut staged = Vec::with_capacity(frames.len());
    for frame in &mut frames {
        match stage_table(dir, frame) {
            Ok(file) => staged.push(file),
            Err(error) => {
                staged.iter().for_each(StagedFile::discard);
                return Err(error);
            }
        }
    }

    commit_all(&staged)?;
    debug!(tables = staged.len(), dir = %dir.display(), "tables replaced");
    Ok(staged.into_iter().map(|file| file.target).collect())
}

/// Machine-readable summary of one run.
#[derive(Debug, Serialize)]
pub struct ReportDocument<'a> {
    pub source_id: &'a str,
    pub input: String,
    pub passed: bool,
    pub exported: bool,
    pub record_count: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub tables: Vec<TableCount>,
    pub record_errors: &'a [RecordError],
    pub issues: &'a [Issue],
}

impl<'a> ReportDocument<'a> {
    /// Report for a run that reached validation.
    pub fn validated(
        source_id: &'a str,
        input: &Path,
        record_count: usize,
        schema: &StarSchema,
        report: &'a ValidationReport,
    ) -> Self {
        Self {
            source_id,
            input: input.display().to_string(),
            passed: report.passed(),
            exported: report.passed(),
            record_count,
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            tables: schema.table_counts(),
            record_errors: &[],
            issues: &report.issues,
        }
    }

    /// Report for a run that stopped on record errors.
    pub fn rejected(
        source_id: &'a str,
        input: &Path,
        record_count: usize,
        record_errors: &'a [RecordError],
    ) -> Self {
        Self {
            source_id,
            input: input.display().to_string(),
            passed: false,
            exported: false,
            record_count,
            error_count: record_errors.len(),
            warning_count: 0,
            tables: Vec::new(),
            record_errors,
            issues: &[],
        }
    }

    #[must_use]
    pub fn with_exported(mut self, exported: bool) -> Self {
        self.exported = exported;
        self
    }
}

/// Write `validation_report.json` into `dir`.
pub fn write_report_json(dir: &Path, document: &ReportDocument<'_>) -> Result<PathBuf> {
    ensure_output_dir(dir)?;
    let path = dir.join(REPORT_FILE);
    write_replacing(&path, |file| {
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, document).context("serialize report")?;
        writer.write_all(b"\n").context("write report")?;
        writer.flush().context("flush report")
    })?;
    debug!(path = %path.display(), "wrote validation report");
    Ok(path)
}
