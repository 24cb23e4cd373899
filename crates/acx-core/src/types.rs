//! Core type definitions for acx
//!
//! Identifiers are plain integer newtypes so states can reference each other
//! freely (including cyclically) without ownership concerns.

use std::fmt;
use std::ops::Range;

/// Number of distinct input symbols. The alphabet is every byte value.
pub const ALPHABET_SIZE: usize = 256;

// =============================================================================
// Identifiers
// =============================================================================

/// Index of a state inside an automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(u32);

impl StateId {
    /// The root state. Created first and never removed.
    pub const ROOT: StateId = StateId(0);

    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_root(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

/// Caller-chosen identifier reported when a pattern matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PatternId(u32);

impl PatternId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl From<u32> for PatternId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Match
// =============================================================================

/// A single pattern occurrence.
///
/// `end` is the offset just past the last matched byte; `start` is derived
/// from the depth of the state that carries the pattern, which is exactly the
/// pattern length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Match {
    pattern: PatternId,
    start: usize,
    end: usize,
}

impl Match {
    #[inline]
    pub(crate) fn new(pattern: PatternId, start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { pattern, start, end }
    }

    /// Identifier of the matched pattern.
    #[inline]
    pub fn pattern(&self) -> PatternId {
        self.pattern
    }

    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

// =============================================================================
// Case folding
// =============================================================================

/// Fold `byte` to ASCII lowercase when `fold_case` is set.
///
/// Only `A-Z` are affected; bytes outside the ASCII range pass through.
#[inline]
pub fn fold_byte(byte: u8, fold_case: bool) -> u8 {
    if fold_case {
        byte.to_ascii_lowercase()
    } else {
        byte
    }
}
