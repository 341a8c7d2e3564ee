//! CLI argument definitions for the star schema modeler.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use esm_model::{PipelineOptions, TieBreakPolicy};

#[derive(Parser)]
#[command(
    name = "esm",
    version,
    about = "Electric product star schema modeler",
    long_about = "Turn a denormalized electric product transaction file into a star schema.\n\n\
                  Writes Date, Product, Customer and Store dimensions plus Sales and\n\
                  Performance facts as CSV files, after integrity validation."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include record values such as customer ids in log output.
    #[arg(long = "log-records", global = true)]
    pub log_records: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Model a transaction file and write the star schema.
    Run(RunArgs),

    /// Normalize, model and validate without writing any file.
    Check(CheckArgs),

    /// List the expected input columns.
    Columns,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Path to the transaction CSV file.
    #[arg(value_name = "INPUT_CSV")]
    pub input: PathBuf,

    /// Output directory for the tables (default: <INPUT_DIR>/star_schema).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Identifier used to derive record ids (default: the input file name).
    #[arg(long = "source-id", value_name = "ID")]
    pub source_id: Option<String>,

    /// Skip writing validation_report.json.
    #[arg(long = "no-report")]
    pub no_report: bool,

    /// Model and validate without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Which record's attributes a dimension row keeps for a repeated key.
    #[arg(long = "tie-break", value_enum, default_value = "first-seen")]
    pub tie_break: TieBreakArg,
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Path to the transaction CSV file.
    #[arg(value_name = "INPUT_CSV")]
    pub input: PathBuf,

    /// Identifier used to derive record ids (default: the input file name).
    #[arg(long = "source-id", value_name = "ID")]
    pub source_id: Option<String>,

    /// Which record's attributes a dimension row keeps for a repeated key.
    #[arg(long = "tie-break", value_enum, default_value = "first-seen")]
    pub tie_break: TieBreakArg,
}

impl RunArgs {
    pub fn options(&self) -> PipelineOptions {
        let mut options = PipelineOptions::new()
            .with_report(!self.no_report)
            .with_dry_run(self.dry_run)
            .with_tie_break(self.tie_break.into());
        options.source_id = self.source_id.clone();
        options.output_dir = self.output_dir.clone();
        options
    }
}

impl CheckArgs {
    pub fn options(&self) -> PipelineOptions {
        let mut options = PipelineOptions::new()
            .with_report(false)
            .with_dry_run(true)
            .with_tie_break(self.tie_break.into());
        options.source_id = self.source_id.clone();
        options
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum TieBreakArg {
    FirstSeen,
    LastSeen,
}

impl From<TieBreakArg> for TieBreakPolicy {
    fn from(arg: TieBreakArg) -> Self {
        match arg {
            TieBreakArg::FirstSeen => TieBreakPolicy::FirstSeen,
            TieBreakArg::LastSeen => TieBreakPolicy::LastSeen,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
