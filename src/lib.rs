pub mod db;
pub mod harness;
pub mod report;
pub mod strategy;
pub mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use db::Database;
use harness::{run_benchmarks, sort_by_digest_length};
use strategy::{build_registry, StrategyKind};
use utils::{format_bytes, format_duration, Logger};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// File whose contents are fed to every hash strategy
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Local history database file path
    #[arg(long, default_value = "hashmark.db")]
    pub db: String,

    /// Audit log file path
    #[arg(long, default_value = "hashmark.log")]
    pub log: String,

    /// Comma-separated subset of strategies to run (default: all)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub strategies: Vec<StrategyKind>,

    /// Sort displayed results by digest length instead of run order
    #[arg(long)]
    pub sort_by_length: bool,

    /// Print all recorded runs and exit
    #[arg(long)]
    pub history: bool,

    /// Export all recorded runs as JSON to the given path and exit
    #[arg(long)]
    pub export: Option<PathBuf>,
}

pub fn run(args: Args) -> Result<()> {
    let mut db = Database::new(&args.db)?;
    let logger = Logger::new(&args.log);

    if let Some(path) = &args.export {
        return export_history(&db, path);
    }
    if args.history {
        return print_history(&db);
    }

    let file = args
        .file
        .as_ref()
        .context("--file is required unless --history or --export is given")?;
    let payload =
        fs::read(file).with_context(|| format!("Failed to read payload file {:?}", file))?;
    println!(
        "Benchmarking {} ({})",
        file.display(),
        format_bytes(payload.len() as u64)
    );

    let kinds = if args.strategies.is_empty() {
        StrategyKind::all()
    } else {
        args.strategies.clone()
    };
    let registry = build_registry(&kinds);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(format!("Running {} strategies...", registry.len()));
    pb.enable_steady_tick(Duration::from_millis(100));

    let started = Instant::now();
    let benchmark_run = run_benchmarks(&payload, &registry, &logger)?;
    pb.finish_with_message(format!(
        "{} strategies completed in {}",
        benchmark_run.results.len(),
        format_duration(started.elapsed())
    ));

    db.record_run(&benchmark_run)?;
    logger.log(&format!(
        "Run recorded: {:?} ({}, {} strategies, {} failed)",
        file,
        format_bytes(payload.len() as u64),
        benchmark_run.results.len(),
        benchmark_run.results.iter().filter(|r| r.is_failure()).count()
    ))?;

    // History keeps run order; only the displayed copy is re-sorted.
    let display = if args.sort_by_length {
        sort_by_digest_length(&benchmark_run.results)
    } else {
        benchmark_run.results.clone()
    };

    report::print_results(&display);
    println!();
    print!("{}", report::render_chart(&display));

    Ok(())
}

fn print_history(db: &Database) -> Result<()> {
    let history = db.load_history()?;
    if history.is_empty() {
        println!("No recorded runs.");
        return Ok(());
    }

    for (index, run) in history.iter().enumerate() {
        println!("Run {} ({})", index + 1, run.date);
        report::print_results(&run.results);
        println!();
    }
    Ok(())
}

fn export_history(db: &Database, path: &Path) -> Result<()> {
    let history = db.load_history()?;
    let file = File::create(path)
        .with_context(|| format!("Failed to create export file {:?}", path))?;
    serde_json::to_writer_pretty(file, &history)?;
    println!("Exported {} runs to {}", history.len(), path.display());
    Ok(())
}
