//! Index-based state storage for the build phase.
//!
//! States are owned by the arena and addressed by [`StateId`]. Growth doubles
//! the capacity, and identifiers stay valid across reallocation because they
//! are indices, not references.

use crate::error::AutomatonError;
use crate::types::{PatternId, StateId, ALPHABET_SIZE};

/// Number of states reserved by a fresh arena.
pub const INITIAL_CAPACITY: usize = 16;

/// Build-phase state: explicit trie edges only.
#[derive(Debug, Clone)]
pub struct State {
    /// Trie edges; `None` means no transition for that byte yet.
    transitions: [Option<StateId>; ALPHABET_SIZE],
    /// Pattern ending exactly at this state.
    output: Option<PatternId>,
    /// Length of the path from the root.
    depth: u32,
}

impl State {
    fn new(depth: u32) -> Self {
        Self {
            transitions: [None; ALPHABET_SIZE],
            output: None,
            depth,
        }
    }

    #[inline]
    pub fn transition(&self, byte: u8) -> Option<StateId> {
        self.transitions[byte as usize]
    }

    #[inline]
    pub fn set_transition(&mut self, byte: u8, target: StateId) {
        self.transitions[byte as usize] = Some(target);
    }

    #[inline]
    pub fn output(&self) -> Option<PatternId> {
        self.output
    }

    /// Set the output, returning the identifier it replaced.
    #[inline]
    pub fn set_output(&mut self, pattern: PatternId) -> Option<PatternId> {
        self.output.replace(pattern)
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }
}

/// Growable collection of build-phase states. Index 0 is the root.
#[derive(Debug, Clone)]
pub struct StateArena {
    states: Vec<State>,
}

impl StateArena {
    /// Create an arena holding only the root state.
    pub fn new() -> Result<Self, AutomatonError> {
        let mut states = Vec::new();
        states
            .try_reserve_exact(INITIAL_CAPACITY)
            .map_err(|_| AutomatonError::AllocationFailed { requested: INITIAL_CAPACITY })?;
        states.push(State::new(0));
        Ok(Self { states })
    }

    /// Append a fresh state at `depth` and return its identifier.
    pub fn push(&mut self, depth: u32) -> Result<StateId, AutomatonError> {
        let id = u32::try_from(self.states.len())
            .map_err(|_| AutomatonError::TooManyStates(self.states.len()))?;

        if self.states.len() == self.states.capacity() {
            let additional = self.states.capacity().max(1);
            self.states.try_reserve_exact(additional).map_err(|_| {
                AutomatonError::AllocationFailed {
                    requested: self.states.len() + additional,
                }
            })?;
            log::trace!("state arena grown to capacity {}", self.states.capacity());
        }

        self.states.push(State::new(depth));
        Ok(StateId::new(id))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.states.capacity()
    }

    #[inline]
    pub fn get(&self, id: StateId) -> &State {
        &self.states[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: StateId) -> &mut State {
        &mut self.states[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (StateId, &State)> + '_ {
        self.states
            .iter()
            .enumerate()
            .map(|(idx, state)| (StateId::new(idx as u32), state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_arena_has_only_root() {
        let arena = StateArena::new().unwrap();
        assert_eq!(arena.len(), 1);
        assert!(arena.capacity() >= INITIAL_CAPACITY);

        let root = arena.get(StateId::ROOT);
        assert_eq!(root.depth(), 0);
        assert_eq!(root.output(), None);
        assert!((0..=255u8).all(|b| root.transition(b).is_none()));
    }

    #[test]
    fn push_assigns_sequential_ids() {
        let mut arena = StateArena::new().unwrap();
        assert_eq!(arena.push(1).unwrap(), StateId::new(1));
        assert_eq!(arena.push(2).unwrap(), StateId::new(2));
        assert_eq!(arena.get(StateId::new(2)).depth(), 2);
    }

    #[test]
    fn growth_preserves_existing_states() {
        let mut arena = StateArena::new().unwrap();
        let initial = arena.capacity();

        let mut prev = StateId::ROOT;
        for i in 0..(initial * 4) {
            let id = arena.push(i as u32 + 1).unwrap();
            arena.get_mut(prev).set_transition((i % 256) as u8, id);
            arena.get_mut(id).set_output(PatternId::new(i as u32));
            prev = id;
        }

        assert!(arena.capacity() >= initial * 4);

        let mut prev = StateId::ROOT;
        for i in 0..(initial * 4) {
            let id = StateId::new(i as u32 + 1);
            assert_eq!(arena.get(prev).transition((i % 256) as u8), Some(id));
            assert_eq!(arena.get(id).output(), Some(PatternId::new(i as u32)));
            assert_eq!(arena.get(id).depth(), i as u32 + 1);
            prev = id;
        }
    }

    #[test]
    fn set_output_returns_previous() {
        let mut arena = StateArena::new().unwrap();
        let id = arena.push(1).unwrap();
        assert_eq!(arena.get_mut(id).set_output(PatternId::new(1)), None);
        assert_eq!(
            arena.get_mut(id).set_output(PatternId::new(2)),
            Some(PatternId::new(1))
        );
    }
}
