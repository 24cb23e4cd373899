//! Error types for automaton construction and lifecycle checks.

use crate::types::PatternId;

/// Error type for building, compiling and querying automata.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AutomatonError {
    #[error("Failed to allocate room for {requested} states")]
    AllocationFailed { requested: usize },
    #[error("State limit exceeded: {0} states")]
    TooManyStates(usize),
    #[error("Empty pattern (id {0}) cannot be inserted")]
    EmptyPattern(PatternId),
    #[error("Automaton is already compiled")]
    AlreadyCompiled,
    #[error("Automaton is not compiled yet")]
    NotCompiled,
}
