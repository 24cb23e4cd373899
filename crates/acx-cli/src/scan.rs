use std::fs;
use std::path::Path;
use std::time::Instant;

use clap::ValueEnum;
use serde::Serialize;

use acx_core::snapshot::Snapshot;
use acx_core::{Automaton, Match};

use crate::snapshot::read_snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CaseMode {
    /// Use the folding recorded in the snapshot
    Auto,
    /// Fold ASCII letters to lowercase
    Fold,
    /// Match bytes exactly
    Exact,
}

impl CaseMode {
    fn resolve(self, snapshot: &Snapshot) -> bool {
        match self {
            CaseMode::Auto => snapshot.fold_case(),
            CaseMode::Fold => true,
            CaseMode::Exact => false,
        }
    }
}

pub struct ScanOptions {
    pub snapshot: String,
    pub inputs: Vec<String>,
    pub case: CaseMode,
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct MatchRecord {
    pattern: u32,
    start: usize,
    end: usize,
}

impl From<Match> for MatchRecord {
    fn from(m: Match) -> Self {
        Self {
            pattern: m.pattern().as_u32(),
            start: m.start(),
            end: m.end(),
        }
    }
}

#[derive(Debug, Serialize)]
struct FileReport {
    file: String,
    bytes: usize,
    match_count: usize,
    matches: Vec<MatchRecord>,
}

#[derive(Debug, Serialize)]
struct ScanReport {
    snapshot: String,
    fold_case: bool,
    files: Vec<FileReport>,
    total_matches: usize,
    elapsed_ms: f64,
}

pub fn run_scan(opts: ScanOptions) -> Result<(), String> {
    let bytes = read_snapshot(Path::new(&opts.snapshot))?;
    let snapshot = Snapshot::load(&bytes)
        .map_err(|e| format!("Invalid snapshot: {}", e))?;
    let fold_case = opts.case.resolve(&snapshot);
    if fold_case != snapshot.fold_case() {
        log::warn!(
            "scanning with fold_case={} but snapshot was built with fold_case={}",
            fold_case,
            snapshot.fold_case()
        );
    }

    let start = Instant::now();
    let mut files = Vec::with_capacity(opts.inputs.len());
    for path in &opts.inputs {
        let text = fs::read(path)
            .map_err(|e| format!("Failed to read '{}': {}", path, e))?;
        files.push(scan_file(snapshot.automaton(), path, &text, fold_case));
    }

    let report = ScanReport {
        snapshot: opts.snapshot,
        fold_case,
        total_matches: files.iter().map(|f| f.match_count).sum(),
        files,
        elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
    };

    if opts.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Failed to serialize JSON: {}", e))?;
        println!("{}", json);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn scan_file(automaton: &Automaton, path: &str, text: &[u8], fold_case: bool) -> FileReport {
    let matches: Vec<MatchRecord> = automaton
        .find_matches(text, fold_case)
        .map(MatchRecord::from)
        .collect();
    log::debug!("{}: {} matches in {} bytes", path, matches.len(), text.len());

    FileReport {
        file: path.to_string(),
        bytes: text.len(),
        match_count: matches.len(),
        matches,
    }
}

fn print_report(report: &ScanReport) {
    for file in &report.files {
        for m in &file.matches {
            println!("{}:{}-{}: pattern {}", file.file, m.start, m.end, m.pattern);
        }
    }
    println!(
        "Scanned {} files: {} matches in {:.1}ms",
        report.files.len(),
        report.total_matches,
        report.elapsed_ms
    );
}
