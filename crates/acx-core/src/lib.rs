//! acx Core Library
//!
//! This crate provides the Aho-Corasick automaton used by acx: a multi-pattern
//! exact matcher that scans its input once, left to right, and reports every
//! occurrence of every pattern, overlapping and nested ones included.
//!
//! # Architecture
//!
//! An automaton lives through two phases. During the build phase an
//! [`AutomatonBuilder`] owns a growable [`StateArena`] and inserts patterns
//! into a trie. [`AutomatonBuilder::compile`] consumes the builder and runs a
//! single breadth-first pass that computes failure links, suffix-output links
//! and a total transition table. The resulting [`Automaton`] is frozen: it is
//! `Send + Sync`, never mutated again, and every byte of input costs exactly
//! one table lookup.
//!
//! # Modules
//!
//! - `types`: Identifiers, match records and case folding
//! - `error`: Build-phase and lifecycle errors
//! - `arena`: Index-based state storage for the build phase
//! - `builder`: Trie construction from inserted patterns
//! - `link`: Failure/suffix-output link computation (compilation)
//! - `automaton`: The frozen, queryable automaton
//! - `matcher`: Match iteration and streaming scans
//! - `set`: Runtime-checked lifecycle wrapper for FFI callers
//! - `snapshot`: ACX binary snapshot format and loader
//! - `hash`: CRC32 for snapshot integrity

pub mod types;
pub mod error;
pub mod arena;
pub mod builder;
mod link;
pub mod automaton;
pub mod matcher;
pub mod set;
pub mod snapshot;
pub mod hash;

// Re-export commonly used types
pub use arena::StateArena;
pub use automaton::{Automaton, CompiledState};
pub use builder::AutomatonBuilder;
pub use error::AutomatonError;
pub use matcher::{Matches, Scanner};
pub use set::PatternSet;
pub use snapshot::{Snapshot, SnapshotError};
pub use types::{Match, PatternId, StateId, ALPHABET_SIZE};
