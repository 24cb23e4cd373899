use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use acx_compiler::{build_automaton, build_snapshot, optimize_patterns, parse_pattern_list};
use acx_core::snapshot::Snapshot;

#[derive(Debug, Clone)]
pub struct CompileStats {
    pub lines: usize,
    pub patterns_before: usize,
    pub patterns_after: usize,
    pub patterns_deduped: usize,
    pub patterns_empty: usize,
    /// Duplicates dropped from each input list, by list index.
    pub deduped_by_list: BTreeMap<u16, usize>,
    pub states: usize,
}

pub fn compile_snapshot_bytes(
    inputs: &[String],
    fold_case: bool,
    verbose: bool,
) -> Result<(Vec<u8>, CompileStats), String> {
    if inputs.is_empty() {
        return Err("No input files specified".to_string());
    }

    let mut all_entries = Vec::new();
    let mut total_lines = 0usize;

    for (list_index, path) in inputs.iter().enumerate() {
        let list_id = u16::try_from(list_index)
            .map_err(|_| format!("Too many input lists (max {})", u16::MAX as usize + 1))?;
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read '{}': {}", path, e))?;

        let line_count = content.lines().count();
        total_lines += line_count;

        let first_id = u32::try_from(all_entries.len())
            .map_err(|_| "Too many patterns".to_string())?;
        let mut entries = parse_pattern_list(&content, first_id)
            .map_err(|e| format!("{}: {}", path, e))?;

        for entry in &mut entries {
            entry.list_id = list_id;
        }

        if verbose {
            println!(
                "  [{}] {} - {} lines, {} patterns",
                list_id,
                Path::new(path).file_name().unwrap_or_default().to_string_lossy(),
                line_count,
                entries.len()
            );
        }

        all_entries.extend(entries);
    }

    let optimize_stats = optimize_patterns(&mut all_entries, fold_case);
    let automaton = build_automaton(&all_entries, fold_case)
        .map_err(|e| format!("Failed to build automaton: {}", e))?;
    let snapshot_bytes = build_snapshot(&automaton, fold_case)
        .map_err(|e| format!("Failed to write snapshot: {}", e))?;

    Snapshot::load(&snapshot_bytes)
        .map_err(|e| format!("Generated snapshot failed validation: {}", e))?;

    let stats = CompileStats {
        lines: total_lines,
        patterns_before: optimize_stats.before,
        patterns_after: optimize_stats.after,
        patterns_deduped: optimize_stats.deduped,
        patterns_empty: optimize_stats.empty,
        deduped_by_list: optimize_stats.deduped_by_list,
        states: automaton.state_count(),
    };

    Ok((snapshot_bytes, stats))
}

pub fn write_snapshot(path: &Path, bytes: &[u8]) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create '{}': {}", parent.display(), e))?;
        }
    }
    fs::write(path, bytes)
        .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;
    Ok(())
}

pub fn read_snapshot(path: &Path) -> Result<Vec<u8>, String> {
    fs::read(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_list(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("acx-cli-{}-{}", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        path
    }

    fn ids(snapshot: &Snapshot, text: &[u8]) -> Vec<u32> {
        snapshot
            .automaton()
            .find_matches(text, snapshot.fold_case())
            .map(|m| m.pattern().as_u32())
            .collect()
    }

    #[test]
    fn implicit_ids_continue_across_lists() {
        let first = write_list("first.txt", "! pronouns\nhe\nshe\n");
        let second = write_list("second.txt", "his\nhers\n");
        let inputs = vec![
            first.to_string_lossy().into_owned(),
            second.to_string_lossy().into_owned(),
        ];

        let (bytes, stats) = compile_snapshot_bytes(&inputs, false, false).unwrap();
        fs::remove_file(&first).ok();
        fs::remove_file(&second).ok();

        assert_eq!(stats.lines, 5);
        assert_eq!(stats.patterns_after, 4);
        assert_eq!(stats.states, 10);

        let snapshot = Snapshot::load(&bytes).unwrap();
        assert_eq!(snapshot.automaton().pattern_count(), 4);
        // "his" and "hers" come from the second list, so they get ids 2 and 3.
        assert_eq!(ids(&snapshot, b"ushers"), vec![1, 0, 3]);
        assert_eq!(ids(&snapshot, b"this"), vec![2]);
    }

    #[test]
    fn duplicates_are_counted_against_their_list() {
        let first = write_list("dup-first.txt", "abc\nxyz\n");
        let second = write_list("dup-second.txt", "abc\n");
        let inputs = vec![
            first.to_string_lossy().into_owned(),
            second.to_string_lossy().into_owned(),
        ];

        let (bytes, stats) = compile_snapshot_bytes(&inputs, false, false).unwrap();
        fs::remove_file(&first).ok();
        fs::remove_file(&second).ok();

        assert_eq!(stats.patterns_deduped, 1);
        assert_eq!(stats.deduped_by_list.get(&0), Some(&1));

        // The later list's "abc" (id 2) is the one that survives.
        let snapshot = Snapshot::load(&bytes).unwrap();
        assert_eq!(ids(&snapshot, b"-abc-"), vec![2]);
    }

    #[test]
    fn missing_inputs_are_reported() {
        assert!(compile_snapshot_bytes(&[], false, false).is_err());

        let missing = std::env::temp_dir().join("acx-cli-does-not-exist.txt");
        let err = compile_snapshot_bytes(&[missing.to_string_lossy().into_owned()], false, false)
            .unwrap_err();
        assert!(err.contains("Failed to read"));
    }
}
