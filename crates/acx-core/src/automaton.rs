//! The frozen, queryable automaton.
//!
//! Every state stores a full 256-entry transition table. This trades
//! `O(states * 256)` memory for a single table lookup per input byte with no
//! fallback search at match time.

use crate::types::{PatternId, StateId, ALPHABET_SIZE};

/// A state after compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledState {
    transitions: [StateId; ALPHABET_SIZE],
    fail: StateId,
    suffix_output: Option<StateId>,
    output: Option<PatternId>,
    depth: u32,
}

impl CompiledState {
    /// A state with default links: everything to the root, no suffix output.
    pub(crate) fn unlinked(output: Option<PatternId>, depth: u32) -> Self {
        Self {
            transitions: [StateId::ROOT; ALPHABET_SIZE],
            fail: StateId::ROOT,
            suffix_output: None,
            output,
            depth,
        }
    }

    pub(crate) fn from_raw(
        transitions: [StateId; ALPHABET_SIZE],
        fail: StateId,
        suffix_output: Option<StateId>,
        output: Option<PatternId>,
        depth: u32,
    ) -> Self {
        Self {
            transitions,
            fail,
            suffix_output,
            output,
            depth,
        }
    }

    /// Successor for `byte`. Defined for every byte.
    #[inline]
    pub fn next(&self, byte: u8) -> StateId {
        self.transitions[byte as usize]
    }

    #[inline]
    pub fn transitions(&self) -> &[StateId; ALPHABET_SIZE] {
        &self.transitions
    }

    /// State of the longest proper suffix that is also a trie prefix.
    #[inline]
    pub fn fail(&self) -> StateId {
        self.fail
    }

    /// Nearest shallower state, along the failure chain, that has an output.
    #[inline]
    pub fn suffix_output(&self) -> Option<StateId> {
        self.suffix_output
    }

    #[inline]
    pub fn output(&self) -> Option<PatternId> {
        self.output
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub(crate) fn set_transition(&mut self, byte: u8, target: StateId) {
        self.transitions[byte as usize] = target;
    }

    #[inline]
    pub(crate) fn set_fail(&mut self, fail: StateId) {
        self.fail = fail;
    }

    #[inline]
    pub(crate) fn set_suffix_output(&mut self, link: Option<StateId>) {
        self.suffix_output = link;
    }
}

/// A compiled Aho-Corasick automaton.
///
/// Immutable once constructed; concurrent queries from several threads are
/// safe because each query owns its own cursor.
#[derive(Debug, Clone)]
pub struct Automaton {
    states: Vec<CompiledState>,
    pattern_count: usize,
}

impl Automaton {
    pub(crate) fn from_parts(states: Vec<CompiledState>, pattern_count: usize) -> Self {
        debug_assert!(!states.is_empty());
        Self {
            states,
            pattern_count,
        }
    }

    #[inline]
    pub fn root(&self) -> StateId {
        StateId::ROOT
    }

    #[inline]
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Number of insertions the automaton was built from.
    #[inline]
    pub fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    #[inline]
    pub fn state(&self, id: StateId) -> &CompiledState {
        &self.states[id.index()]
    }

    #[inline]
    pub fn states(&self) -> &[CompiledState] {
        &self.states
    }

    #[inline]
    pub fn next_state(&self, current: StateId, byte: u8) -> StateId {
        self.states[current.index()].next(byte)
    }

    /// Number of states that carry an output.
    pub fn output_count(&self) -> usize {
        self.states.iter().filter(|s| s.output.is_some()).count()
    }

    /// Approximate heap footprint of the transition tables.
    pub fn memory_usage(&self) -> usize {
        self.states.len() * std::mem::size_of::<CompiledState>()
    }
}
