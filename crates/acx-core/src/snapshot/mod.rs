//! ACX Snapshot Format and Loader
//!
//! This module provides the binary format specification and loader for
//! compiled automata. The writer lives in `acx-compiler`.

mod format;
mod loader;

pub use format::*;
pub use loader::*;
