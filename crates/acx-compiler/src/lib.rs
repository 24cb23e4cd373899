//! acx Pattern List Compiler
//!
//! This crate compiles pattern lists into acx automata and ACX snapshots.

pub mod parser;
pub mod optimizer;
pub mod builder;

pub use builder::{build_automaton, build_snapshot};
pub use optimizer::{optimize_patterns, OptimizeStats};
pub use parser::{parse_pattern_list, ParseError, PatternEntry};
