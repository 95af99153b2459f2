//! Command-line interface for the eye-tracking log converter.
//!
//! Finds source logs under a directory, converts each one into a BIDS
//! eye-tracking table and sidecar, and records anomalies in a diagnostic log.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use eyetrack_bids::catalog::{discover_jobs, Discovery, TaskMap};
use eyetrack_bids::{Converter, DiagnosticLog, RowTypePolicy, TableFormat};
use log::{info, LevelFilter};
use std::path::Path;
use std::time::Instant;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Tsv,
    Parquet,
}

impl From<Format> for TableFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Tsv => TableFormat::Tsv,
            Format::Parquet => TableFormat::Parquet,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Convert eye-tracker log files to BIDS eye-tracking tables",
    long_about = "Converts tab-separated eye-tracker logs into BIDS `_eyetrack.tsv` tables with \
                  JSON sidecars.\n\n\
                  Logs are named <subject>_<session>_..._<TaskKey>.txt and are searched recursively."
)]
struct Args {
    /// Directory containing eye-tracker log files
    #[arg(value_name = "IN_DIR")]
    in_dir: String,

    /// Root of the output dataset
    #[arg(short, long, value_name = "OUT_ROOT")]
    out_root: String,

    /// Diagnostic log, truncated at the start of each run
    #[arg(long, default_value = "eyetrack_conversion.log")]
    diagnostic_log: String,

    /// Task mapping KEY=LABEL from source file name to output task label (repeatable)
    #[arg(long = "task", value_name = "KEY=LABEL")]
    tasks: Vec<String>,

    /// Only convert these subjects (repeatable)
    #[arg(long = "subject", value_name = "SUBJECT")]
    subjects: Vec<String>,

    /// Output table format
    #[arg(long, value_enum, default_value = "tsv")]
    format: Format,

    /// Skip files whose rows mix several row types instead of flagging them
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .format_timestamp(None)
        .init();

    let args = Args::parse();

    // truncated at the start of every run, even one that converts nothing
    let diagnostics = DiagnosticLog::create(&args.diagnostic_log)?;

    let in_path = Path::new(&args.in_dir);
    let out_path = Path::new(&args.out_root);

    if !in_path.is_dir() {
        anyhow::bail!("'{}' is not a valid directory", args.in_dir);
    }

    let tasks = if args.tasks.is_empty() {
        TaskMap::default()
    } else {
        let mut tasks = TaskMap::new();
        for entry in &args.tasks {
            let (key, label) = TaskMap::parse_entry(entry)?;
            tasks.insert(key, label);
        }
        tasks
    };

    let discovery = Discovery {
        tasks,
        subjects: args.subjects.clone(),
        format: args.format.into(),
    };
    let jobs = discover_jobs(in_path, out_path, &discovery)?;

    if jobs.is_empty() {
        info!("No eye-tracker logs found in {}", args.in_dir);
        return Ok(());
    }

    let policy = if args.strict {
        RowTypePolicy::Reject
    } else {
        RowTypePolicy::Flag
    };
    let converter = Converter::builder()
        .row_type_policy(policy)
        .table_format(discovery.format)
        .build();

    info!("");
    info!("╔════════════════════════════════════════════╗");
    info!("║     Eye-tracker log → BIDS Converter       ║");
    info!("╚════════════════════════════════════════════╝");
    info!("");
    info!("📂 Found {} log file(s) in {}", jobs.len(), args.in_dir);
    info!("📁 Output directory: {}", args.out_root);
    info!("📝 Diagnostic log: {}", args.diagnostic_log);
    info!("");

    let total_start = Instant::now();
    let summary = converter.run(&jobs, &diagnostics);

    info!("═══════════════════════════════════════════");
    info!("🏁 {} in {:.2?}", summary.summary(), total_start.elapsed());
    if !diagnostics.is_empty() {
        info!("⚠ {} diagnostic(s) written to {}", diagnostics.len(), args.diagnostic_log);
    }
    info!("");

    Ok(())
}
