//! CLI argument definitions for the TSE candidate pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tse_core::{DEFAULT_OUTPUT_NAME, DEFAULT_STATE_COLUMN, DEFAULT_TARGET};

#[derive(Parser)]
#[command(
    name = "tse",
    version,
    about = "Collect and clean TSE candidate registration tables",
    long_about = "Collect TSE candidate archives into a raw store and clean them \
                  with a declarative YAML schema.\n\n\
                  Each election year is processed independently; a failing year \
                  is reported and the remaining years still run."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Extract each year's national candidate table into the raw store.
    Collect(CollectArgs),

    /// Clean every year in the raw store and write the combined table.
    Clean(CleanArgs),

    /// Print the resolved cleaning schema.
    Schema(SchemaArgs),
}

#[derive(Parser)]
pub struct CollectArgs {
    /// Sources YAML mapping years to archive paths (relative to the file).
    #[arg(long = "sources", value_name = "YAML")]
    pub sources: PathBuf,

    /// Raw store directory (a `gs://` prefix is stripped).
    #[arg(long = "raw-dir", value_name = "DIR", default_value = "data/raw")]
    pub raw_dir: String,

    /// Only collect these years (default: every configured year).
    #[arg(long = "years", value_name = "YEAR", value_delimiter = ',', num_args = 1..)]
    pub years: Vec<String>,

    /// Geographic scope of the archive member to extract.
    #[arg(long = "target", default_value = DEFAULT_TARGET)]
    pub target: String,

    /// Write the batch report as JSON.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,
}

#[derive(Parser)]
pub struct CleanArgs {
    /// Cleaning schema YAML.
    #[arg(long = "schema", value_name = "YAML")]
    pub schema: PathBuf,

    /// Raw store directory (a `gs://` prefix is stripped).
    #[arg(long = "raw-dir", value_name = "DIR", default_value = "data/raw")]
    pub raw_dir: String,

    /// Processed store directory (a `gs://` prefix is stripped).
    #[arg(long = "processed-dir", value_name = "DIR", default_value = "data/processed")]
    pub processed_dir: String,

    /// Name of the combined output in the processed store.
    #[arg(long = "output-name", default_value = DEFAULT_OUTPUT_NAME)]
    pub output_name: String,

    /// States to keep (default: the Legal Amazon states).
    #[arg(long = "states", value_name = "UF", value_delimiter = ',', num_args = 1..)]
    pub states: Vec<String>,

    /// Keep every row regardless of state.
    #[arg(long = "no-state-filter", conflicts_with = "states")]
    pub no_state_filter: bool,

    /// Output column holding the state code.
    #[arg(long = "state-column", default_value = DEFAULT_STATE_COLUMN)]
    pub state_column: String,

    /// Also write each cleaned year to the processed store.
    #[arg(long = "per-year")]
    pub per_year: bool,

    /// Write the batch report as JSON.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,
}

#[derive(Parser)]
pub struct SchemaArgs {
    /// Cleaning schema YAML.
    #[arg(long = "schema", value_name = "YAML")]
    pub schema: PathBuf,
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
