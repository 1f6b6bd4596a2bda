//! Time a shell command per file as one top-level unit each
//!
//! Backs `runtime-log time`: every file is run through `sh -c` in order,
//! bracketed by unit start/finish so the logger sees the same callbacks a
//! test framework would produce.

use anyhow::{Context, Result};
use std::process::{Command, ExitStatus};

use crate::aggregator::Clock;
use crate::history::FileKey;
use crate::logger::RuntimeLogger;

/// Placeholder replaced by the file in a command template
pub const FILE_PLACEHOLDER: &str = "{}";

const FILE_ARG: &str = "\"$1\"";

/// Outcome of timing one file
#[derive(Debug, Clone)]
pub struct FileRun {
    pub file: FileKey,
    pub status: ExitStatus,
}

/// Build the `sh -c` script for a template
///
/// The file is passed as `$1` rather than pasted into the script, so paths
/// with spaces or shell metacharacters are safe. A quoted placeholder
/// (`'{}'` or `"{}"`) is replaced as a whole, quotes included, since `$1`
/// does not expand inside single quotes. A template without `{}` gets the
/// file appended as its last argument.
pub fn shell_script(template: &str) -> String {
    if !template.contains(FILE_PLACEHOLDER) {
        return format!("{} {}", template, FILE_ARG);
    }
    template
        .replace("'{}'", FILE_ARG)
        .replace("\"{}\"", FILE_ARG)
        .replace(FILE_PLACEHOLDER, FILE_ARG)
}

/// Run `template` for every file, timing each run against its file key
///
/// Non-zero exit statuses are reported in the result and still timed; a
/// command that cannot be spawned aborts the whole run.
pub fn time_files<C: Clock>(
    logger: &mut RuntimeLogger<C>,
    template: &str,
    files: &[FileKey],
) -> Result<Vec<FileRun>> {
    let script = shell_script(template);
    let mut runs = Vec::with_capacity(files.len());

    for file in files {
        tracing::debug!(file = %file, script = %script, "running");
        logger.unit_started(file, true);
        let status = Command::new("sh")
            .arg("-c")
            .arg(&script)
            .arg("runtime-log")
            .arg(file.as_str())
            .status()
            .with_context(|| format!("Failed to run command for {}", file))?;
        logger.unit_finished(file, true);

        if !status.success() {
            tracing::warn!("Command for {} exited with {}", file, status);
        }
        runs.push(FileRun {
            file: file.clone(),
            status,
        });
    }

    Ok(runs)
}
