//! acx CLI
//!
//! CLI tool for compiling pattern lists into snapshots and scanning text.

mod scan;
mod snapshot;

use std::time::Instant;

use clap::{Parser, Subcommand};

use acx_core::snapshot::{Snapshot, HEADER_SIZE, STATE_RECORD_SIZE};

use crate::scan::{run_scan, CaseMode, ScanOptions};
use crate::snapshot::{compile_snapshot_bytes, read_snapshot, write_snapshot};

#[derive(Parser)]
#[command(name = "acx")]
#[command(about = "Multi-pattern exact string matcher (Aho-Corasick) compiler and scanner")]
struct Cli {
    /// Log build and load details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile pattern lists into an ACX snapshot
    Compile {
        /// Input pattern list files
        #[arg(short, long, required = true)]
        input: Vec<String>,

        /// Output snapshot file
        #[arg(short, long, default_value = "patterns.acx")]
        output: String,

        /// Fold ASCII letters to lowercase when inserting patterns
        #[arg(long)]
        fold_case: bool,
    },

    /// Scan files for every pattern in a snapshot
    Scan {
        /// Snapshot file to load
        #[arg(short, long)]
        snapshot: String,

        /// Files to scan
        #[arg(short, long, required = true)]
        input: Vec<String>,

        /// Case folding for the scan (auto uses the snapshot's setting)
        #[arg(long, value_enum, default_value_t = CaseMode::Auto)]
        case: CaseMode,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Validate an ACX snapshot
    Validate {
        /// Snapshot file to validate
        #[arg(short, long)]
        input: String,
    },

    /// Dump snapshot info
    Info {
        /// Snapshot file to inspect
        #[arg(short, long)]
        input: String,
    },
}

fn main() {
    let cli = Cli::parse();

    log_builder(env_logger::Env::default(), cli.verbose).init();

    let result = match cli.command {
        Commands::Compile {
            input,
            output,
            fold_case,
        } => cmd_compile(&input, &output, fold_case, cli.verbose),
        Commands::Scan {
            snapshot,
            input,
            case,
            json,
        } => run_scan(ScanOptions {
            snapshot,
            inputs: input,
            case,
            json,
        }),
        Commands::Validate { input } => cmd_validate(&input),
        Commands::Info { input } => cmd_info(&input),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Warn by default, debug with `-v`; the environment filter (`RUST_LOG`) wins.
fn log_builder(env: env_logger::Env<'_>, verbose: bool) -> env_logger::Builder {
    let default_filter = if verbose { "debug" } else { "warn" };
    let mut builder = env_logger::Builder::from_env(env.default_filter_or(default_filter));
    builder.format_timestamp(None);
    builder
}

fn cmd_compile(inputs: &[String], output: &str, fold_case: bool, verbose: bool) -> Result<(), String> {
    let start = Instant::now();
    let (snapshot_bytes, stats) = compile_snapshot_bytes(inputs, fold_case, verbose)?;

    write_snapshot(output.as_ref(), &snapshot_bytes)?;

    println!("Compiled {} pattern lists to '{}'", inputs.len(), output);
    println!("  Lines:    {}", stats.lines);
    println!(
        "  Patterns: {} -> {} (dedupe removed {}, empty removed {})",
        stats.patterns_before, stats.patterns_after, stats.patterns_deduped, stats.patterns_empty
    );
    if verbose {
        for (list_id, count) in &stats.deduped_by_list {
            println!("    [{}] {} shadowed by later duplicates", list_id, count);
        }
    }
    println!("  States:   {}", stats.states);
    println!("  Folding:  {}", if fold_case { "ascii" } else { "none" });
    println!("  Size:     {} bytes ({:.1} KB)", snapshot_bytes.len(), snapshot_bytes.len() as f64 / 1024.0);
    println!("  Time:     {:.1}ms", start.elapsed().as_secs_f64() * 1000.0);

    Ok(())
}

fn cmd_validate(input: &str) -> Result<(), String> {
    let bytes = read_snapshot(input.as_ref())?;

    let snapshot = Snapshot::load(&bytes)
        .map_err(|e| format!("Invalid snapshot: {}", e))?;

    println!("Snapshot '{}' is valid", input);
    println!("  Version:     {}", snapshot.version);
    println!("  States:      {}", snapshot.automaton().state_count());
    println!("  Size:        {} bytes", bytes.len());

    Ok(())
}

fn cmd_info(input: &str) -> Result<(), String> {
    let bytes = read_snapshot(input.as_ref())?;

    let snapshot = Snapshot::load(&bytes)
        .map_err(|e| format!("Invalid snapshot: {}", e))?;
    let automaton = snapshot.automaton();

    println!("Snapshot: {}", input);
    println!("  Magic:       ACX1");
    println!("  Version:     {}", snapshot.version);
    println!("  Flags:       {:?}", snapshot.flags);
    println!("  Total size:  {} bytes ({:.1} KB)", bytes.len(), bytes.len() as f64 / 1024.0);
    println!("  Header:      {} bytes, {} bytes per state", HEADER_SIZE, STATE_RECORD_SIZE);
    println!();

    let max_depth = automaton.states().iter().map(|s| s.depth()).max().unwrap_or(0);
    println!("Automaton:");
    println!("  States:      {}", automaton.state_count());
    println!("  Patterns:    {} inserted, {} distinct outputs", automaton.pattern_count(), automaton.output_count());
    println!("  Max depth:   {}", max_depth);
    println!("  Case fold:   {}", snapshot.fold_case());

    Ok(())
}
