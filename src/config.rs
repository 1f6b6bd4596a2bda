// Configuration for a runtime logging run
//
// Values come from, in increasing priority: built-in defaults, environment
// variables, then explicit settings (command-line flags or the host).

use serde::{Deserialize, Serialize};
use std::env;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use thiserror::Error;

use crate::history::CorruptHistoryPolicy;

/// History file written when no other path is configured
pub const DEFAULT_FILENAME: &str = "spec_runtime_log.tsv";

/// Environment variable overriding the history file path
pub const PATH_ENV: &str = "RUNTIME_LOG_PATH";

/// Environment variable overriding the number of runs kept per file
pub const MAX_RECORDS_ENV: &str = "RUNTIME_LOG_MAX_RECORDS";

/// Runs kept per file unless configured otherwise
pub const DEFAULT_MAX_RECORD_COUNT: NonZeroUsize = match NonZeroUsize::new(20) {
    Some(n) => n,
    None => unreachable!(),
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidMaxRecords { var: &'static str, value: String },

    #[error("output path must not be empty")]
    EmptyOutput,
}

/// Settings for one run of the runtime logger
///
/// # Example
/// ```
/// use runtime_log::config::LoggerConfig;
///
/// let config = LoggerConfig::default();
/// assert_eq!(config.max_record_count.get(), 20);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Explicit history file path; highest priority when set
    pub output: Option<PathBuf>,

    /// Number of runs kept per file, most recent first
    ///
    /// Applied when the new history is merged, never when the old one is
    /// loaded: narrowing drops the oldest slots on the next write.
    pub max_record_count: NonZeroUsize,

    /// How to treat a history file that fails to parse
    pub on_corrupt: CorruptHistoryPolicy,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            output: None,
            max_record_count: DEFAULT_MAX_RECORD_COUNT,
            on_corrupt: CorruptHistoryPolicy::Abort,
        }
    }
}

impl LoggerConfig {
    /// Defaults with `RUNTIME_LOG_MAX_RECORDS` applied
    ///
    /// `RUNTIME_LOG_PATH` is consulted later by [`LoggerConfig::resolve_output`]
    /// so an explicit output set after this call still wins.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(value) = env::var_os(MAX_RECORDS_ENV) {
            let value = value.to_string_lossy().into_owned();
            config.max_record_count = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidMaxRecords {
                    var: MAX_RECORDS_ENV,
                    value,
                })?;
        }
        Ok(config)
    }

    /// Path of the history file for this run
    ///
    /// Explicit output, then `RUNTIME_LOG_PATH`, then [`DEFAULT_FILENAME`]
    /// in the working directory.
    pub fn resolve_output(&self) -> PathBuf {
        if let Some(output) = &self.output {
            return output.clone();
        }
        match env::var_os(PATH_ENV) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => PathBuf::from(DEFAULT_FILENAME),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if matches!(&self.output, Some(path) if path.as_os_str().is_empty()) {
            return Err(ConfigError::EmptyOutput);
        }
        Ok(())
    }
}
