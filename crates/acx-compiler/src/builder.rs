use acx_core::hash::crc32_update;
use acx_core::snapshot::{
    header, state_record, write_u16_le, write_u32_le, SnapshotError, SnapshotFlags, StateFlags,
    ACX_MAGIC, ACX_VERSION, HEADER_SIZE, STATE_RECORD_SIZE,
};
use acx_core::{Automaton, AutomatonBuilder, AutomatonError};

use crate::parser::PatternEntry;

/// Insert every entry, in order, and compile.
pub fn build_automaton(
    entries: &[PatternEntry],
    fold_case: bool,
) -> Result<Automaton, AutomatonError> {
    let mut builder = AutomatonBuilder::new()?;
    for entry in entries {
        builder.insert(&entry.bytes, entry.id, fold_case)?;
    }
    log::debug!(
        "built trie: {} patterns, {} states",
        builder.pattern_count(),
        builder.state_count()
    );
    builder.compile()
}

fn header_count(field: &'static str, count: usize) -> Result<u32, SnapshotError> {
    u32::try_from(count).map_err(|_| SnapshotError::HeaderOverflow { field, count })
}

/// Serialize a compiled automaton into an ACX snapshot.
///
/// Fails when the state or pattern count cannot be stored in the header's
/// u32 fields.
pub fn build_snapshot(automaton: &Automaton, fold_case: bool) -> Result<Vec<u8>, SnapshotError> {
    let states = automaton.states();
    let state_count = header_count("state count", states.len())?;
    let pattern_count = header_count("pattern count", automaton.pattern_count())?;
    let total_size = HEADER_SIZE + states.len() * STATE_RECORD_SIZE;
    let mut buffer = vec![0u8; total_size];

    let mut flags = SnapshotFlags::HAS_CRC32;
    if fold_case {
        flags |= SnapshotFlags::FOLD_CASE;
    }

    buffer[0..4].copy_from_slice(&ACX_MAGIC);
    write_u16_le(&mut buffer, header::VERSION, ACX_VERSION);
    write_u16_le(&mut buffer, header::FLAGS, flags.bits());
    write_u32_le(&mut buffer, header::HEADER_BYTES, HEADER_SIZE as u32);
    write_u32_le(&mut buffer, header::STATE_COUNT, state_count);
    write_u32_le(&mut buffer, header::PATTERN_COUNT, pattern_count);
    write_u32_le(&mut buffer, header::STATE_RECORD_BYTES, STATE_RECORD_SIZE as u32);

    for (idx, state) in states.iter().enumerate() {
        let offset = HEADER_SIZE + idx * STATE_RECORD_SIZE;

        for (byte, target) in state.transitions().iter().enumerate() {
            write_u32_le(
                &mut buffer,
                offset + state_record::TRANSITIONS + byte * 4,
                target.as_u32(),
            );
        }
        write_u32_le(&mut buffer, offset + state_record::FAIL, state.fail().as_u32());

        let mut state_flags = StateFlags::empty();
        if let Some(link) = state.suffix_output() {
            state_flags |= StateFlags::HAS_SUFFIX_OUTPUT;
            write_u32_le(&mut buffer, offset + state_record::SUFFIX_OUTPUT, link.as_u32());
        }
        if let Some(pattern) = state.output() {
            state_flags |= StateFlags::HAS_OUTPUT;
            write_u32_le(&mut buffer, offset + state_record::OUTPUT, pattern.as_u32());
        }
        write_u32_le(&mut buffer, offset + state_record::DEPTH, state.depth());
        write_u32_le(&mut buffer, offset + state_record::FLAGS, state_flags.bits());
    }

    let crc = crc32_update(
        crc32_update(0, &buffer[..header::SNAPSHOT_CRC32]),
        &buffer[header::SNAPSHOT_CRC32 + 4..],
    );
    write_u32_le(&mut buffer, header::SNAPSHOT_CRC32, crc);

    log::debug!("built snapshot: {} bytes", buffer.len());
    Ok(buffer)
}
