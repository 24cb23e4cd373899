//! Trie construction.
//!
//! The builder is the exclusively-owned, mutable half of the automaton
//! lifecycle. [`AutomatonBuilder::compile`] consumes it, so inserting after
//! compilation or compiling twice cannot be expressed.

use crate::arena::StateArena;
use crate::automaton::Automaton;
use crate::error::AutomatonError;
use crate::link;
use crate::types::{fold_byte, PatternId, StateId};

/// Build-phase automaton: a trie of inserted patterns.
#[derive(Debug, Clone)]
pub struct AutomatonBuilder {
    arena: StateArena,
    pattern_count: usize,
}

impl AutomatonBuilder {
    /// Create a builder containing only the root state.
    pub fn new() -> Result<Self, AutomatonError> {
        Ok(Self {
            arena: StateArena::new()?,
            pattern_count: 0,
        })
    }

    /// Insert `pattern` under `id`.
    ///
    /// Bytes are folded to ASCII lowercase first when `fold_case` is set; the
    /// same setting must be used when querying. Inserting identical bytes a
    /// second time replaces the earlier identifier.
    pub fn insert(
        &mut self,
        pattern: &[u8],
        id: PatternId,
        fold_case: bool,
    ) -> Result<(), AutomatonError> {
        if pattern.is_empty() {
            return Err(AutomatonError::EmptyPattern(id));
        }

        let mut current = StateId::ROOT;
        for &raw in pattern {
            let byte = fold_byte(raw, fold_case);
            current = match self.arena.get(current).transition(byte) {
                Some(next) => next,
                None => {
                    let depth = self.arena.get(current).depth() + 1;
                    let next = self.arena.push(depth)?;
                    self.arena.get_mut(current).set_transition(byte, next);
                    next
                }
            };
        }

        if let Some(previous) = self.arena.get_mut(current).set_output(id) {
            log::trace!("pattern {} replaces pattern {} at {}", id, previous, current);
        }
        self.pattern_count += 1;
        Ok(())
    }

    /// Number of states created so far, root included.
    #[inline]
    pub fn state_count(&self) -> usize {
        self.arena.len()
    }

    /// Number of `insert` calls that succeeded, re-insertions included.
    #[inline]
    pub fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    #[inline]
    pub fn arena(&self) -> &StateArena {
        &self.arena
    }

    /// Compile into a frozen automaton. See the `link` module.
    pub fn compile(self) -> Result<Automaton, AutomatonError> {
        self.compile_ref()
    }

    /// Compile without consuming the builder. Used by [`crate::PatternSet`],
    /// which must keep the builder if compilation fails.
    pub(crate) fn compile_ref(&self) -> Result<Automaton, AutomatonError> {
        let states = link::build_links(&self.arena)?;
        log::debug!(
            "compiled automaton: {} states, {} patterns",
            states.len(),
            self.pattern_count
        );
        Ok(Automaton::from_parts(states, self.pattern_count))
    }
}
