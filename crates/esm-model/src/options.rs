//! Configuration options for a modeling run.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which record's non-key attributes a dimension row keeps when several
/// records share a natural key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreakPolicy {
    /// Keep the attributes of the record that introduced the key.
    #[default]
    FirstSeen,
    /// Overwrite attributes with each later record. Keys are unaffected.
    LastSeen,
}

/// Options controlling a modeling run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// Identifier used to derive record ids. Defaults to the input file name.
    pub source_id: Option<String>,

    /// Directory the star schema is written to.
    pub output_dir: Option<PathBuf>,

    /// Write `validation_report.json` next to the exported tables.
    pub write_report: bool,

    /// Model and validate without writing any file.
    pub dry_run: bool,

    /// Dimension attribute tie-break.
    pub tie_break: TieBreakPolicy,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            source_id: None,
            output_dir: None,
            write_report: true,
            dry_run: false,
            tie_break: TieBreakPolicy::FirstSeen,
        }
    }
}

impl PipelineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn with_report(mut self, enable: bool) -> Self {
        self.write_report = enable;
        self
    }

    #[must_use]
    pub fn with_dry_run(mut self, enable: bool) -> Self {
        self.dry_run = enable;
        self
    }

    #[must_use]
    pub fn with_tie_break(mut self, policy: TieBreakPolicy) -> Self {
        self.tie_break = policy;
        self
    }
}
