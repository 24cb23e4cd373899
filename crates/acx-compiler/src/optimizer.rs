use std::collections::{BTreeMap, HashSet};

use crate::parser::PatternEntry;

pub struct OptimizeStats {
    pub before: usize,
    pub after: usize,
    pub deduped: usize,
    pub empty: usize,
    /// Shadowed entries dropped from each source list, keyed by list id.
    pub deduped_by_list: BTreeMap<u16, usize>,
}

/// Drop empty patterns and every entry whose bytes are repeated later in the
/// list. Only the last occurrence of a byte sequence survives, which is the
/// one that would win at insertion time anyway.
pub fn optimize_patterns(entries: &mut Vec<PatternEntry>, fold_case: bool) -> OptimizeStats {
    let before = entries.len();

    let mut empty = 0usize;
    entries.retain(|entry| {
        if entry.bytes.is_empty() {
            log::warn!(
                "dropping empty pattern (list {}, line {}, id {})",
                entry.list_id,
                entry.line,
                entry.id
            );
            empty += 1;
            false
        } else {
            true
        }
    });

    // Walk backwards so the last writer is the one we keep.
    let mut seen: HashSet<Vec<u8>> = HashSet::new();
    let mut keep = vec![false; entries.len()];
    for (idx, entry) in entries.iter().enumerate().rev() {
        keep[idx] = seen.insert(pattern_key(&entry.bytes, fold_case));
    }

    let mut deduped = 0usize;
    let mut deduped_by_list = BTreeMap::new();
    let mut flags = keep.into_iter();
    entries.retain(|entry| {
        let kept = flags.next().unwrap_or(true);
        if !kept {
            log::trace!(
                "pattern id {} (list {}, line {}) shadowed by a later duplicate",
                entry.id,
                entry.list_id,
                entry.line
            );
            deduped += 1;
            *deduped_by_list.entry(entry.list_id).or_insert(0usize) += 1;
        }
        kept
    });

    let after = entries.len();
    log::debug!(
        "optimized patterns: {} -> {} ({} duplicates, {} empty)",
        before,
        after,
        deduped,
        empty
    );

    OptimizeStats {
        before,
        after,
        deduped,
        empty,
        deduped_by_list,
    }
}

fn pattern_key(bytes: &[u8], fold_case: bool) -> Vec<u8> {
    if fold_case {
        bytes.to_ascii_lowercase()
    } else {
        bytes.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_pattern_list;

    #[test]
    fn keeps_last_duplicate() {
        let mut entries = parse_pattern_list("abc\nxyz\nabc$id=7", 0).unwrap();
        let stats = optimize_patterns(&mut entries, false);

        assert_eq!(stats.before, 3);
        assert_eq!(stats.after, 2);
        assert_eq!(stats.deduped, 1);
        let ids: Vec<u32> = entries.iter().map(|e| e.id.as_u32()).collect();
        assert_eq!(ids, vec![1, 7]);
    }

    #[test]
    fn folded_duplicates_collapse_only_when_folding() {
        let mut exact = parse_pattern_list("ABC\nabc", 0).unwrap();
        assert_eq!(optimize_patterns(&mut exact, false).deduped, 0);

        let mut folded = parse_pattern_list("ABC\nabc", 0).unwrap();
        let stats = optimize_patterns(&mut folded, true);
        assert_eq!(stats.deduped, 1);
        assert_eq!(folded[0].id.as_u32(), 1);
    }

    #[test]
    fn drops_empty_patterns() {
        let mut entries = parse_pattern_list("$id=3\nabc", 0).unwrap();
        let stats = optimize_patterns(&mut entries, false);
        assert_eq!(stats.empty, 1);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].bytes, b"abc");
    }

    #[test]
    fn counts_shadowed_entries_per_list() {
        let mut first = parse_pattern_list("abc\nxyz\nabc", 0).unwrap();
        let mut second = parse_pattern_list("xyz\nqrs", 3).unwrap();
        for entry in &mut second {
            entry.list_id = 1;
        }
        first.append(&mut second);

        let stats = optimize_patterns(&mut first, false);
        assert_eq!(stats.deduped, 2);
        // List 0 loses its first "abc" and its "xyz"; list 1 keeps everything.
        assert_eq!(stats.deduped_by_list.get(&0), Some(&2));
        assert_eq!(stats.deduped_by_list.get(&1), None);

        let survivors: Vec<(u16, u32)> = first.iter().map(|e| (e.list_id, e.id.as_u32())).collect();
        assert_eq!(survivors, vec![(0, 2), (1, 3), (1, 4)]);
    }
}
