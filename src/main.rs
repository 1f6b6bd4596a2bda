use anyhow::{Context, Result};
use clap::Parser;
use runtime_log::cli::{Cli, Command, OutputFormat};
use runtime_log::config::LoggerConfig;
use runtime_log::history::{CorruptHistoryPolicy, FileKey, HistoryStore, HistoryTable};
use runtime_log::logger::RuntimeLogger;
use runtime_log::{report, runner};
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Environment settings overlaid with command-line flags
fn build_config(args: &Cli) -> Result<LoggerConfig> {
    let mut config = LoggerConfig::from_env()?;
    if let Some(output) = &args.output {
        config.output = Some(output.clone());
    }
    if let Some(max_records) = args.max_records {
        config.max_record_count = max_records;
    }
    if args.reset_corrupt {
        config.on_corrupt = CorruptHistoryPolicy::Reset;
    }
    config.validate()?;
    Ok(config)
}

fn print_summary(path: &Path, table: &HistoryTable) {
    eprintln!(
        "[runtime-log: {} files, {} runs each, written to {}]",
        table.len(),
        table.width(),
        path.display()
    );
}

/// Time the command for each file and record the run
fn run_time(config: &LoggerConfig, template: &str, files: &[FileKey]) -> Result<ExitCode> {
    let mut logger = RuntimeLogger::start(config)?;
    let path = logger.path().to_path_buf();

    let runs = runner::time_files(&mut logger, template, files)?;
    let table = logger
        .dump()
        .with_context(|| format!("Failed to record runtimes to {}", path.display()))?;
    print_summary(&path, &table);

    let failed = runs.iter().filter(|run| !run.status.success()).count();
    if failed > 0 {
        eprintln!("[runtime-log: {} of {} commands failed]", failed, runs.len());
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Record durations measured elsewhere as one run
fn run_record(config: &LoggerConfig, measurements: &[(FileKey, u64)]) -> Result<ExitCode> {
    let mut logger = RuntimeLogger::start(config)?;
    let path = logger.path().to_path_buf();

    for (file, ms) in measurements {
        logger.record(file, Duration::from_millis(*ms));
    }
    let table = logger
        .dump()
        .with_context(|| format!("Failed to record runtimes to {}", path.display()))?;
    print_summary(&path, &table);
    Ok(ExitCode::SUCCESS)
}

/// Print the history without modifying it
fn run_show(config: &LoggerConfig, format: OutputFormat) -> Result<ExitCode> {
    let store = HistoryStore::open(config.resolve_output(), config.on_corrupt)?;
    match format {
        OutputFormat::Text => print!("{}", report::to_text(store.table())),
        OutputFormat::Json => println!("{}", report::to_json(store.table())?),
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config = build_config(&args)?;

    match &args.command {
        Command::Time { command, files } => run_time(&config, command, files),
        Command::Record { measurements } => run_record(&config, measurements),
        Command::Show { format } => run_show(&config, *format),
    }
}
