//! Failure and suffix-output link computation.
//!
//! One breadth-first pass over the trie. Every state's failure target is
//! strictly shallower than the state itself, so visiting states in order of
//! non-decreasing depth guarantees the failure target is fully linked (or is
//! the root, which is total after seeding) before it is consulted.
//!
//! Missing edges are resolved through the failure target during the same
//! pass, which turns the trie into a total transition function: matching
//! never has to follow failure links.

use std::collections::VecDeque;

use crate::arena::StateArena;
use crate::automaton::CompiledState;
use crate::error::AutomatonError;
use crate::types::{StateId, ALPHABET_SIZE};

pub(crate) fn build_links(arena: &StateArena) -> Result<Vec<CompiledState>, AutomatonError> {
    let mut states: Vec<CompiledState> = Vec::new();
    states
        .try_reserve_exact(arena.len())
        .map_err(|_| AutomatonError::AllocationFailed { requested: arena.len() })?;
    states.extend(
        arena
            .iter()
            .map(|(_, state)| CompiledState::unlinked(state.output(), state.depth())),
    );

    let mut queue: VecDeque<StateId> = VecDeque::new();
    queue
        .try_reserve(arena.len())
        .map_err(|_| AutomatonError::AllocationFailed { requested: arena.len() })?;

    // Root: explicit edges seed the queue, everything else loops back.
    let root = arena.get(StateId::ROOT);
    for byte in 0..ALPHABET_SIZE {
        let byte = byte as u8;
        match root.transition(byte) {
            Some(next) => {
                states[StateId::ROOT.index()].set_transition(byte, next);
                states[next.index()].set_fail(StateId::ROOT);
                queue.push_back(next);
            }
            None => states[StateId::ROOT.index()].set_transition(byte, StateId::ROOT),
        }
    }

    while let Some(current) = queue.pop_front() {
        let fail = states[current.index()].fail();
        let trie_state = arena.get(current);

        for byte in 0..ALPHABET_SIZE {
            let byte = byte as u8;
            let via_fail = states[fail.index()].next(byte);

            match trie_state.transition(byte) {
                Some(next) => {
                    debug_assert!(states[via_fail.index()].depth() < states[next.index()].depth());

                    let target = &states[via_fail.index()];
                    let suffix_output = if target.output().is_some() {
                        Some(via_fail)
                    } else {
                        target.suffix_output()
                    };

                    states[current.index()].set_transition(byte, next);
                    let next_state = &mut states[next.index()];
                    next_state.set_fail(via_fail);
                    next_state.set_suffix_output(suffix_output);
                    queue.push_back(next);
                }
                None => states[current.index()].set_transition(byte, via_fail),
            }
        }
    }

    Ok(states)
}
