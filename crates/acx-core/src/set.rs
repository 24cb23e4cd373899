//! Runtime-checked lifecycle.
//!
//! [`AutomatonBuilder`] and [`Automaton`] encode the build/query split in the
//! type system. Callers that hold a single long-lived handle (wasm, FFI) use
//! [`PatternSet`] instead, which enforces the same ordering at runtime and
//! reports violations as [`AutomatonError::AlreadyCompiled`] and
//! [`AutomatonError::NotCompiled`].

use crate::automaton::Automaton;
use crate::builder::AutomatonBuilder;
use crate::error::AutomatonError;
use crate::matcher::Matches;
use crate::types::PatternId;

#[derive(Debug, Clone)]
pub enum PatternSet {
    Building(AutomatonBuilder),
    Compiled(Automaton),
}

impl PatternSet {
    pub fn new() -> Result<Self, AutomatonError> {
        Ok(Self::Building(AutomatonBuilder::new()?))
    }

    pub fn insert(
        &mut self,
        pattern: &[u8],
        id: PatternId,
        fold_case: bool,
    ) -> Result<(), AutomatonError> {
        match self {
            Self::Building(builder) => builder.insert(pattern, id, fold_case),
            Self::Compiled(_) => Err(AutomatonError::AlreadyCompiled),
        }
    }

    /// Compile in place. On failure the set stays in the build phase.
    pub fn compile(&mut self) -> Result<(), AutomatonError> {
        let automaton = match self {
            Self::Building(builder) => builder.compile_ref()?,
            Self::Compiled(_) => return Err(AutomatonError::AlreadyCompiled),
        };
        *self = Self::Compiled(automaton);
        Ok(())
    }

    pub fn find_matches<'a, 't>(
        &'a self,
        text: &'t [u8],
        fold_case: bool,
    ) -> Result<Matches<'a, 't>, AutomatonError> {
        Ok(self.automaton()?.find_matches(text, fold_case))
    }

    pub fn automaton(&self) -> Result<&Automaton, AutomatonError> {
        match self {
            Self::Compiled(automaton) => Ok(automaton),
            Self::Building(_) => Err(AutomatonError::NotCompiled),
        }
    }

    #[inline]
    pub fn is_compiled(&self) -> bool {
        matches!(self, Self::Compiled(_))
    }

    pub fn pattern_count(&self) -> usize {
        match self {
            Self::Building(builder) => builder.pattern_count(),
            Self::Compiled(automaton) => automaton.pattern_count(),
        }
    }
}

impl From<Automaton> for PatternSet {
    fn from(automaton: Automaton) -> Self {
        Self::Compiled(automaton)
    }
}
