//! CLI for the sensorlog readout engine.
//!
//! Provides commands for inspecting, checking, feeding and pruning sensorlog
//! data files.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveTime};
use clap::{Parser, Subcommand, ValueEnum};
use sensorlog::readout::{DATE_FORMAT, TIME_FORMAT};
use sensorlog::{DataFile, LoggerConfig, ReadoutAssembler, Store};
use tracing_subscriber::EnvFilter;

/// sensorlog — Environmental sensor readout logger CLI.
#[derive(Parser)]
#[command(name = "sensorlog", version, about)]
struct Cli {
    /// Path to a JSON logger configuration.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// List the readouts stored in a data file.
    Show {
        /// Path to the data file (defaults to the configured one).
        data_file: Option<PathBuf>,

        /// Output format.
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Validate a data file and report skipped entries.
    Check {
        /// Path to the data file (defaults to the configured one).
        data_file: Option<PathBuf>,
    },

    /// Read device protocol lines, store admitted readouts, prune and save.
    Ingest {
        /// Path to the data file (defaults to the configured one).
        data_file: Option<PathBuf>,

        /// Sampling interval in minutes (10, 20, 30, 40, 50 or 60).
        #[arg(long)]
        interval: Option<u32>,

        /// File with protocol lines; standard input if omitted.
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Drop readouts older than a maximum age and save.
    Prune {
        /// Path to the data file (defaults to the configured one).
        data_file: Option<PathBuf>,

        /// Maximum age in whole days.
        #[arg(long)]
        days: Option<u32>,

        /// Additional maximum age as HH:MM:SS.
        #[arg(long)]
        time: Option<String>,
    },
}

/// Output format for `show`.
#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// One human-readable line per readout.
    Text,
    /// The persisted JSON document.
    Json,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Show { data_file, format } => {
            cmd_show(&resolve(data_file, &config), &config, &format)
        }
        Commands::Check { data_file } => cmd_check(&resolve(data_file, &config), &config),
        Commands::Ingest {
            data_file,
            interval,
            input,
        } => cmd_ingest(
            &resolve(data_file, &config),
            &config,
            interval,
            input.as_deref(),
        ),
        Commands::Prune {
            data_file,
            days,
            time,
        } => cmd_prune(&resolve(data_file, &config), &config, days, time.as_deref()),
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Loads the configuration file, or defaults if none was given.
fn load_config(path: Option<&Path>) -> CliResult<LoggerConfig> {
    match path {
        Some(path) => Ok(LoggerConfig::load(path)?),
        None => Ok(LoggerConfig::default()),
    }
}

/// Picks the data file from the command line, falling back to the config.
fn resolve(data_file: Option<PathBuf>, config: &LoggerConfig) -> PathBuf {
    data_file.unwrap_or_else(|| config.data_file.clone())
}

/// Opens a data file into a store built from the config.
fn open_store(
    path: &Path,
    config: &LoggerConfig,
) -> CliResult<(DataFile, Store, sensorlog::LoadReport)> {
    let file = DataFile::new(path);
    let mut store = config.store();
    let report = file.load_into(&mut store)?;
    Ok((file, store, report))
}

/// Implements `sensorlog show [data_file]`.
fn cmd_show(path: &Path, config: &LoggerConfig, format: &OutputFormat) -> CliResult<()> {
    let (_, store, _) = open_store(path, config)?;

    match format {
        OutputFormat::Text => {
            println!("# file={}, readouts={}", path.display(), store.len());
            for readout in &store {
                println!(
                    "{} {}  {}",
                    readout.timestamp().format(DATE_FORMAT),
                    readout.timestamp().format(TIME_FORMAT),
                    readout
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&store.to_json())?);
        }
    }

    Ok(())
}

/// Implements `sensorlog check [data_file]`.
fn cmd_check(path: &Path, config: &LoggerConfig) -> CliResult<()> {
    if !path.exists() {
        return Err(format!("No data file found at '{}'", path.display()).into());
    }

    let (_, _, report) = open_store(path, config)?;

    println!("Data file: {}", path.display());
    println!("  Loaded: {}", report.loaded);
    println!("  Skipped: {}", report.skipped.len());
    for (index, reason) in &report.skipped {
        println!("    [{index}] {reason}");
    }

    if report.is_clean() {
        Ok(())
    } else {
        Err(format!("{} malformed entries", report.skipped.len()).into())
    }
}

/// Implements `sensorlog ingest [data_file]`.
fn cmd_ingest(
    path: &Path,
    config: &LoggerConfig,
    interval: Option<u32>,
    input: Option<&Path>,
) -> CliResult<()> {
    let file = DataFile::new(path);
    let mut store = Store::new(interval.unwrap_or(config.interval_minutes));
    file.load_into(&mut store)?;
    let before = store.len();

    let reader: Box<dyn BufRead> = match input {
        Some(input) => Box::new(BufReader::new(File::open(input)?)),
        None => Box::new(io::stdin().lock()),
    };

    let mut assembler = ReadoutAssembler::new();
    let mut lines = 0usize;
    let mut readouts = 0usize;

    for line in reader.lines() {
        let line = line?;
        lines += 1;

        match assembler.feed_line_at(&line, Local::now().naive_local()) {
            Ok(Some(readout)) => {
                readouts += 1;
                tracing::debug!(%readout, "assembled readout");
                store.append(readout);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(line = lines, "skipping line: {e}"),
        }
    }

    let removed = store.prune(config.retention_days, config.retention_time()?);
    file.save(&store)?;

    let stored = (store.len() + removed).saturating_sub(before);
    println!("Lines: {lines}");
    println!("Readouts assembled: {readouts}");
    println!("Readouts stored: {stored}");
    println!("Readouts pruned: {removed}");
    println!("Total: {}", store.len());

    Ok(())
}

/// Implements `sensorlog prune [data_file]`.
fn cmd_prune(
    path: &Path,
    config: &LoggerConfig,
    days: Option<u32>,
    time: Option<&str>,
) -> CliResult<()> {
    let max_age_time = match time {
        Some(text) => NaiveTime::parse_from_str(text, TIME_FORMAT)
            .map_err(|_| format!("Invalid time '{text}': expected HH:MM:SS"))?,
        None => config.retention_time()?,
    };
    let max_age_days = days.unwrap_or(config.retention_days);

    let (file, mut store, _) = open_store(path, config)?;
    let removed = store.prune(max_age_days, max_age_time);
    file.save(&store)?;

    println!("Pruned {removed} readouts, {} remaining", store.len());
    Ok(())
}
