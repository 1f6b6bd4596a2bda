//! CLI argument parsing for runtime-log

use clap::{Parser, Subcommand, ValueEnum};
use std::num::NonZeroUsize;
use std::path::PathBuf;

use crate::history::{DurationSlot, FileKey};

/// Output format for `show`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Tab-separated, identical to the history file (default)
    Text,
    /// JSON array for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "runtime-log")]
#[command(version)]
#[command(about = "Rolling per-file history of test-suite durations", long_about = None)]
pub struct Cli {
    /// History file (default: $RUNTIME_LOG_PATH, then spec_runtime_log.tsv)
    #[arg(short, long, value_name = "PATH", global = true)]
    pub output: Option<PathBuf>,

    /// Runs kept per file (default: $RUNTIME_LOG_MAX_RECORDS, then 20)
    #[arg(short = 'n', long = "max-records", value_name = "N", global = true)]
    pub max_records: Option<NonZeroUsize>,

    /// Start from an empty history if the existing file cannot be parsed
    #[arg(long = "reset-corrupt", global = true)]
    pub reset_corrupt: bool,

    /// Enable debug tracing output to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a command once per file, timing each, and record the run
    Time {
        /// Shell command template; `{}` is replaced by the file
        #[arg(short, long, value_name = "TEMPLATE", default_value = "rspec {}")]
        command: String,

        /// Files to run, in order
        #[arg(required = true, value_parser = parse_file_key)]
        files: Vec<FileKey>,
    },

    /// Record a run from durations measured elsewhere (FILE=MILLISECONDS)
    Record {
        #[arg(required = true, value_name = "FILE=MS", value_parser = parse_measurement)]
        measurements: Vec<(FileKey, u64)>,
    },

    /// Print the current history without modifying it
    Show {
        #[arg(long = "format", value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

fn parse_file_key(s: &str) -> Result<FileKey, String> {
    FileKey::new(s).map_err(|e| e.to_string())
}

fn parse_measurement(s: &str) -> Result<(FileKey, u64), String> {
    let (file, ms) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected FILE=MILLISECONDS, got {:?}", s))?;
    let file = parse_file_key(file)?;
    // same digits-only rule as a slot in the history file
    match ms.parse() {
        Ok(DurationSlot::Measured(millis)) => Ok((file, millis)),
        _ => Err(format!("invalid millisecond count {:?}", ms)),
    }
}
