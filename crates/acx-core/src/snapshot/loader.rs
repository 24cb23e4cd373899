//! ACX Snapshot Loader
//!
//! Decodes a snapshot into an owned [`Automaton`], checking every structural
//! invariant the matcher relies on: ids in range, no transition more than one
//! level deeper than its source, failure targets strictly shallower,
//! suffix-output links pointing at shallower output states.

use crate::automaton::{Automaton, CompiledState};
use crate::hash::crc32_update;
use crate::types::{PatternId, StateId, ALPHABET_SIZE};
use super::format::*;

/// Error type for snapshot loading.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("Invalid magic bytes")]
    InvalidMagic,
    #[error("Unsupported version: {0}")]
    UnsupportedVersion(u16),
    #[error("CRC32 mismatch: stored={stored}, computed={computed}")]
    Crc32Mismatch { stored: u32, computed: u32 },
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
    #[error("Invalid state {state}: {reason}")]
    InvalidState { state: u32, reason: &'static str },
    #[error("Data too short")]
    DataTooShort,
    #[error("{field} does not fit a u32 header field: {count}")]
    HeaderOverflow { field: &'static str, count: usize },
}

/// A loaded snapshot.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub version: u16,
    pub flags: SnapshotFlags,
    automaton: Automaton,
}

impl Snapshot {
    /// Load a snapshot from bytes.
    pub fn load(data: &[u8]) -> Result<Self, SnapshotError> {
        if data.len() < HEADER_SIZE {
            return Err(SnapshotError::DataTooShort);
        }

        // Validate magic
        if !validate_magic(data) {
            return Err(SnapshotError::InvalidMagic);
        }

        // Read header
        let version = read_u16_le(data, header::VERSION);
        if version != ACX_VERSION {
            return Err(SnapshotError::UnsupportedVersion(version));
        }

        let flags = SnapshotFlags::from_bits_truncate(read_u16_le(data, header::FLAGS));
        let header_bytes = read_u32_le(data, header::HEADER_BYTES) as usize;
        if header_bytes != HEADER_SIZE {
            return Err(SnapshotError::InvalidHeader(format!(
                "header size {header_bytes}, expected {HEADER_SIZE}"
            )));
        }

        let record_bytes = read_u32_le(data, header::STATE_RECORD_BYTES) as usize;
        if record_bytes != STATE_RECORD_SIZE {
            return Err(SnapshotError::InvalidHeader(format!(
                "state record size {record_bytes}, expected {STATE_RECORD_SIZE}"
            )));
        }

        let state_count = read_u32_le(data, header::STATE_COUNT) as usize;
        if state_count == 0 {
            return Err(SnapshotError::InvalidHeader("no root state".to_string()));
        }
        let expected_len = state_count
            .checked_mul(STATE_RECORD_SIZE)
            .and_then(|n| n.checked_add(HEADER_SIZE))
            .ok_or_else(|| SnapshotError::InvalidHeader("state count overflow".to_string()))?;
        if data.len() < expected_len {
            return Err(SnapshotError::DataTooShort);
        }
        if data.len() > expected_len {
            return Err(SnapshotError::InvalidHeader(format!(
                "{} trailing bytes",
                data.len() - expected_len
            )));
        }

        // Validate CRC32 if present
        if flags.contains(SnapshotFlags::HAS_CRC32) {
            let stored = read_u32_le(data, header::SNAPSHOT_CRC32);
            // CRC covers everything except the CRC field itself
            let computed = crc32_update(
                crc32_update(0, &data[..header::SNAPSHOT_CRC32]),
                &data[header::SNAPSHOT_CRC32 + 4..],
            );
            if stored != computed {
                return Err(SnapshotError::Crc32Mismatch { stored, computed });
            }
        }

        let pattern_count = read_u32_le(data, header::PATTERN_COUNT) as usize;

        let mut states = Vec::with_capacity(state_count);
        for idx in 0..state_count {
            let offset = HEADER_SIZE + idx * STATE_RECORD_SIZE;
            states.push(decode_state(data, offset, idx as u32, state_count)?);
        }
        validate_links(&states)?;

        log::debug!(
            "loaded snapshot v{}: {} states, {} patterns",
            version,
            state_count,
            pattern_count
        );

        Ok(Self {
            version,
            flags,
            automaton: Automaton::from_parts(states, pattern_count),
        })
    }

    /// True if the patterns were inserted with ASCII case folding.
    #[inline]
    pub fn fold_case(&self) -> bool {
        self.flags.contains(SnapshotFlags::FOLD_CASE)
    }

    #[inline]
    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    pub fn into_automaton(self) -> Automaton {
        self.automaton
    }
}

fn decode_state(
    data: &[u8],
    offset: usize,
    id: u32,
    state_count: usize,
) -> Result<CompiledState, SnapshotError> {
    let state_id = |raw: u32, reason: &'static str| -> Result<StateId, SnapshotError> {
        if (raw as usize) < state_count {
            Ok(StateId::new(raw))
        } else {
            Err(SnapshotError::InvalidState { state: id, reason })
        }
    };

    let mut transitions = [StateId::ROOT; ALPHABET_SIZE];
    for (byte, slot) in transitions.iter_mut().enumerate() {
        let raw = read_u32_le(data, offset + state_record::TRANSITIONS + byte * 4);
        *slot = state_id(raw, "transition out of range")?;
    }

    let fail = state_id(
        read_u32_le(data, offset + state_record::FAIL),
        "fail link out of range",
    )?;
    let flags = StateFlags::from_bits_truncate(read_u32_le(data, offset + state_record::FLAGS));

    let suffix_output = if flags.contains(StateFlags::HAS_SUFFIX_OUTPUT) {
        Some(state_id(
            read_u32_le(data, offset + state_record::SUFFIX_OUTPUT),
            "suffix-output link out of range",
        )?)
    } else {
        None
    };
    let output = flags
        .contains(StateFlags::HAS_OUTPUT)
        .then(|| PatternId::new(read_u32_le(data, offset + state_record::OUTPUT)));
    let depth = read_u32_le(data, offset + state_record::DEPTH);

    Ok(CompiledState::from_raw(
        transitions,
        fail,
        suffix_output,
        output,
        depth,
    ))
}

fn validate_links(states: &[CompiledState]) -> Result<(), SnapshotError> {
    let root = &states[StateId::ROOT.index()];
    if root.depth() != 0 || !root.fail().is_root() {
        return Err(SnapshotError::InvalidState {
            state: 0,
            reason: "root must have depth 0 and fail to itself",
        });
    }
    if root.output().is_some() || root.suffix_output().is_some() {
        return Err(SnapshotError::InvalidState {
            state: 0,
            reason: "root cannot carry outputs",
        });
    }

    for (idx, state) in states.iter().enumerate() {
        let invalid = |reason| SnapshotError::InvalidState {
            state: idx as u32,
            reason,
        };

        // A walk of n bytes must never sit deeper than n.
        let limit = state.depth().saturating_add(1);
        if state
            .transitions()
            .iter()
            .any(|next| states[next.index()].depth() > limit)
        {
            return Err(invalid("transition skips a depth level"));
        }
        if idx == StateId::ROOT.index() {
            continue;
        }

        if states[state.fail().index()].depth() >= state.depth() {
            return Err(invalid("fail link is not shallower"));
        }
        if let Some(link) = state.suffix_output() {
            let target = &states[link.index()];
            if target.output().is_none() {
                return Err(invalid("suffix-output link targets a state without output"));
            }
            if target.depth() >= state.depth() {
                return Err(invalid("suffix-output link is not shallower"));
            }
        }
    }

    Ok(())
}
