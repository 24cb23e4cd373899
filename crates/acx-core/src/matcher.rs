//! Match iteration.
//!
//! Scanning holds a single cursor. Each byte costs one transition lookup; the
//! current state's own output is reported first, then every output on its
//! suffix-output chain. Queries never touch the automaton's state, so the same
//! automaton can serve any number of concurrent scans.

use crate::automaton::Automaton;
use crate::types::{fold_byte, Match, StateId};

impl Automaton {
    /// Iterate over every pattern occurrence in `text`, ordered by end offset.
    ///
    /// `fold_case` must match the setting used at insertion; a mismatch
    /// silently misses matches.
    pub fn find_matches<'a, 't>(&'a self, text: &'t [u8], fold_case: bool) -> Matches<'a, 't> {
        Matches {
            automaton: self,
            text,
            pos: 0,
            state: StateId::ROOT,
            fold_case,
            pending: Outputs::empty(self),
        }
    }

    /// Return true if any pattern occurs in `text`.
    pub fn is_match(&self, text: &[u8], fold_case: bool) -> bool {
        self.find_matches(text, fold_case).next().is_some()
    }

    /// Outputs reported when the scan is at `state` with `end` bytes consumed.
    ///
    /// `end` must be at least the depth of `state`, which holds for any state
    /// reached by walking `end` bytes from the root.
    #[inline]
    pub(crate) fn outputs(&self, state: StateId, end: usize) -> Outputs<'_> {
        Outputs {
            automaton: self,
            next: Some(state),
            end,
        }
    }

    /// Start a streaming scan over chunked input.
    pub fn scanner(&self, fold_case: bool) -> Scanner<'_> {
        Scanner {
            automaton: self,
            state: StateId::ROOT,
            offset: 0,
            fold_case,
        }
    }
}

// =============================================================================
// Outputs
// =============================================================================

/// Outputs of one state: its own, then its suffix-output chain.
#[derive(Debug, Clone)]
pub(crate) struct Outputs<'a> {
    automaton: &'a Automaton,
    next: Option<StateId>,
    end: usize,
}

impl<'a> Outputs<'a> {
    fn empty(automaton: &'a Automaton) -> Self {
        Self {
            automaton,
            next: None,
            end: 0,
        }
    }
}

impl Iterator for Outputs<'_> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        while let Some(id) = self.next {
            let state = self.automaton.state(id);
            self.next = state.suffix_output();
            if let Some(pattern) = state.output() {
                let start = self.end - state.depth() as usize;
                return Some(Match::new(pattern, start, self.end));
            }
        }
        None
    }
}

// =============================================================================
// Matches
// =============================================================================

/// Lazy iterator over the matches in one text.
#[derive(Debug, Clone)]
pub struct Matches<'a, 't> {
    automaton: &'a Automaton,
    text: &'t [u8],
    pos: usize,
    state: StateId,
    fold_case: bool,
    pending: Outputs<'a>,
}

impl Iterator for Matches<'_, '_> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        loop {
            if let Some(m) = self.pending.next() {
                return Some(m);
            }

            let &byte = self.text.get(self.pos)?;
            self.state = self
                .automaton
                .next_state(self.state, fold_byte(byte, self.fold_case));
            self.pos += 1;
            self.pending = self.automaton.outputs(self.state, self.pos);
        }
    }
}

// =============================================================================
// Scanner
// =============================================================================

/// Streaming cursor: feed input in chunks, matches carry absolute offsets.
///
/// Matches that straddle a chunk boundary are reported when the chunk holding
/// their last byte is fed.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    automaton: &'a Automaton,
    state: StateId,
    offset: usize,
    fold_case: bool,
}

impl Scanner<'_> {
    /// Scan `chunk`, calling `on_match` for every match ending inside it.
    pub fn feed(&mut self, chunk: &[u8], mut on_match: impl FnMut(Match)) {
        for &byte in chunk {
            self.state = self
                .automaton
                .next_state(self.state, fold_byte(byte, self.fold_case));
            self.offset += 1;
            for m in self.automaton.outputs(self.state, self.offset) {
                on_match(m);
            }
        }
    }

    /// Total number of bytes fed so far.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Forget all input and return to the root.
    pub fn reset(&mut self) {
        self.state = StateId::ROOT;
        self.offset = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::AutomatonBuilder;
    use crate::types::PatternId;

    fn build(patterns: &[&[u8]], fold_case: bool) -> Automaton {
        let mut builder = AutomatonBuilder::new().unwrap();
        for (idx, pattern) in patterns.iter().enumerate() {
            builder
                .insert(pattern, PatternId::new(idx as u32), fold_case)
                .unwrap();
        }
        builder.compile().unwrap()
    }

    fn ids(automaton: &Automaton, text: &[u8], fold_case: bool) -> Vec<u32> {
        automaton
            .find_matches(text, fold_case)
            .map(|m| m.pattern().as_u32())
            .collect()
    }

    /// Every (end, pattern) pair found by checking each pattern at each offset.
    fn brute_force(patterns: &[&[u8]], text: &[u8]) -> Vec<(usize, u32)> {
        let mut found = Vec::new();
        for end in 1..=text.len() {
            for (idx, pattern) in patterns.iter().enumerate() {
                if pattern.len() <= end && &text[end - pattern.len()..end] == *pattern {
                    found.push((end, idx as u32));
                }
            }
        }
        found.sort();
        found
    }

    #[test]
    fn classic_ushers() {
        let automaton = build(&[b"he", b"she", b"his", b"hers"], false);
        let matches: Vec<Match> = automaton.find_matches(b"ushers", false).collect();

        let got: Vec<(u32, usize, usize)> = matches
            .iter()
            .map(|m| (m.pattern().as_u32(), m.start(), m.end()))
            .collect();
        // she and he end at the same 'e'; hers ends at the final 's'.
        assert_eq!(got, vec![(1, 1, 4), (0, 2, 4), (3, 2, 6)]);
    }

    #[test]
    fn case_folding_is_a_query_contract() {
        let automaton = build(&[b"ABC"], true);
        assert_eq!(ids(&automaton, b"abc", true), vec![0]);
        assert_eq!(ids(&automaton, b"xAbCx", true), vec![0]);
        assert!(ids(&automaton, b"ABC", false).is_empty());
        assert!(ids(&automaton, b"aBc", false).is_empty());
        // The folded trie stores "abc", so raw lowercase text reaches it unfolded.
        assert_eq!(ids(&automaton, b"abc", false), vec![0]);
    }

    #[test]
    fn outputs_start_at_the_walked_prefix() {
        let patterns: [&[u8]; 3] = [b"he", b"she", b"hers"];
        let automaton = build(&patterns, false);
        let mut state = automaton.root();
        for &byte in b"she" {
            state = automaton.next_state(state, byte);
        }

        let got: Vec<(u32, usize, usize)> = automaton
            .outputs(state, 3)
            .map(|m| (m.pattern().as_u32(), m.start(), m.end()))
            .collect();
        assert_eq!(got, vec![(1, 0, 3), (0, 1, 3)]);

        // Every reachable state has depth no greater than the bytes walked.
        let text = b"shershehers";
        let mut state = automaton.root();
        for (idx, &byte) in text.iter().enumerate() {
            state = automaton.next_state(state, byte);
            assert!(automaton.state(state).depth() as usize <= idx + 1);
            for m in automaton.outputs(state, idx + 1) {
                assert_eq!(&text[m.range()], patterns[m.pattern().as_u32() as usize]);
            }
        }
    }

    #[test]
    fn empty_pattern_set_never_matches() {
        let automaton = build(&[], false);
        assert!(ids(&automaton, b"anything at all", false).is_empty());
        assert!(ids(&automaton, b"", false).is_empty());
        assert!(!automaton.is_match(b"abc", false));
    }

    #[test]
    fn reinsertion_reports_only_latest_id() {
        let mut builder = AutomatonBuilder::new().unwrap();
        builder.insert(b"dup", PatternId::new(10), false).unwrap();
        builder.insert(b"dup", PatternId::new(20), false).unwrap();
        let automaton = builder.compile().unwrap();
        assert_eq!(ids(&automaton, b"a dup here", false), vec![20]);
    }

    #[test]
    fn querying_is_idempotent() {
        let automaton = build(&[b"a", b"aa", b"aaa"], false);
        let first = ids(&automaton, b"aaaa", false);
        let second = ids(&automaton, b"aaaa", false);
        assert_eq!(first, second);
        assert_eq!(first.len(), 4 + 3 + 2);
    }

    #[test]
    fn overlapping_and_nested_occurrences() {
        let automaton = build(&[b"aba", b"ab", b"b"], false);
        let got: Vec<(u32, usize)> = automaton
            .find_matches(b"ababa", false)
            .map(|m| (m.pattern().as_u32(), m.end()))
            .collect();
        assert_eq!(got, vec![(1, 2), (2, 2), (0, 3), (1, 4), (2, 4), (0, 5)]);
    }

    #[test]
    fn embedded_zero_bytes_match() {
        let automaton = build(&[b"\0\0", b"x\0y"], false);
        assert_eq!(ids(&automaton, b"ax\0y\0\0\0", false), vec![1, 0, 0]);
    }

    #[test]
    fn growth_matches_identically() {
        // 40 three-byte patterns need far more than the initial 16 states.
        let owned: Vec<Vec<u8>> = (0..40u32)
            .map(|i| {
                [i % 26, i / 2 % 26, i * 7 % 26]
                    .iter()
                    .map(|&offset| b'a' + offset as u8)
                    .collect()
            })
            .collect();
        let patterns: Vec<&[u8]> = owned.iter().map(|p| p.as_slice()).collect();
        let automaton = build(&patterns, false);
        assert!(automaton.state_count() > 64);

        let text: Vec<u8> = owned.iter().flatten().copied().collect();
        let mut got: Vec<(usize, u32)> = automaton
            .find_matches(&text, false)
            .map(|m| (m.end(), m.pattern().as_u32()))
            .collect();
        got.sort();

        let mut expected = brute_force(&patterns, &text);
        // Duplicate byte content: only the last identifier survives.
        expected.retain(|&(_, id)| {
            let bytes = patterns[id as usize];
            !patterns[id as usize + 1..].contains(&bytes)
        });
        assert_eq!(got, expected);
    }

    #[test]
    fn agrees_with_brute_force() {
        let mut seed = 0x2545_f491_u32;
        let mut next = move || {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            seed
        };

        for _ in 0..50 {
            let mut owned: Vec<Vec<u8>> = Vec::new();
            let count = 1 + next() % 8;
            for _ in 0..count {
                let len = 1 + next() % 4;
                let pattern: Vec<u8> = (0..len).map(|_| b'a' + (next() % 3) as u8).collect();
                if !owned.contains(&pattern) {
                    owned.push(pattern);
                }
            }
            let text: Vec<u8> = (0..64).map(|_| b'a' + (next() % 3) as u8).collect();
            let patterns: Vec<&[u8]> = owned.iter().map(|p| p.as_slice()).collect();

            let automaton = build(&patterns, false);
            let mut got: Vec<(usize, u32)> = automaton
                .find_matches(&text, false)
                .map(|m| (m.end(), m.pattern().as_u32()))
                .collect();
            got.sort();
            assert_eq!(got, brute_force(&patterns, &text));
        }
    }

    #[test]
    fn match_offsets_cover_pattern_bytes() {
        let patterns: [&[u8]; 3] = [b"needle", b"eed", b"le"];
        let automaton = build(&patterns, false);
        let text = b"haystack needle haystack";
        for m in automaton.find_matches(text, false) {
            assert_eq!(&text[m.range()], patterns[m.pattern().as_u32() as usize]);
        }
    }

    #[test]
    fn scanner_finds_matches_across_chunks() {
        let automaton = build(&[b"hers", b"she"], false);
        let mut scanner = automaton.scanner(false);
        let mut found = Vec::new();
        scanner.feed(b"ush", |m| found.push(m));
        scanner.feed(b"e", |m| found.push(m));
        scanner.feed(b"rs", |m| found.push(m));

        let got: Vec<(u32, usize, usize)> = found
            .iter()
            .map(|m| (m.pattern().as_u32(), m.start(), m.end()))
            .collect();
        assert_eq!(got, vec![(1, 1, 4), (0, 2, 6)]);
        assert_eq!(scanner.offset(), 6);

        scanner.reset();
        assert_eq!(scanner.offset(), 0);
        let mut count = 0;
        scanner.feed(b"rs", |_| count += 1);
        assert_eq!(count, 0);
    }

    #[test]
    fn concurrent_queries_share_one_automaton() {
        let automaton = build(&[b"he", b"she", b"his", b"hers"], false);
        let expected = ids(&automaton, b"ushers and his", false);

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| ids(&automaton, b"ushers and his", false)))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
