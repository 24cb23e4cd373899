//! ACX Snapshot Format v1 Constants
//!
//! All values are little-endian. A snapshot is a fixed header followed by one
//! fixed-size record per state, in state-id order.

use crate::types::ALPHABET_SIZE;

/// Magic bytes: "ACX1"
pub const ACX_MAGIC: [u8; 4] = [0x41, 0x43, 0x58, 0x31];

/// Current format version
pub const ACX_VERSION: u16 = 1;

/// Header size in bytes
pub const HEADER_SIZE: usize = 32;

/// State record size in bytes
pub const STATE_RECORD_SIZE: usize = ALPHABET_SIZE * 4 + 20;

// =============================================================================
// Header Field Offsets
// =============================================================================

/// Header field byte offsets.
pub mod header {
    /// u8[4] magic = "ACX1"
    pub const MAGIC: usize = 0;
    /// u16 version
    pub const VERSION: usize = 4;
    /// u16 flags
    pub const FLAGS: usize = 6;
    /// u32 headerBytes (always 32)
    pub const HEADER_BYTES: usize = 8;
    /// u32 stateCount
    pub const STATE_COUNT: usize = 12;
    /// u32 patternCount
    pub const PATTERN_COUNT: usize = 16;
    /// u32 stateRecordBytes
    pub const STATE_RECORD_BYTES: usize = 20;
    /// u32 snapshotCrc32
    pub const SNAPSHOT_CRC32: usize = 24;
    /// u32 reserved (zero)
    pub const RESERVED: usize = 28;
}

// =============================================================================
// State Record Offsets
// =============================================================================

pub mod state_record {
    use super::ALPHABET_SIZE;

    /// u32[256] transitions
    pub const TRANSITIONS: usize = 0;
    /// u32 fail state id
    pub const FAIL: usize = ALPHABET_SIZE * 4;
    /// u32 suffix-output state id (valid if HAS_SUFFIX_OUTPUT)
    pub const SUFFIX_OUTPUT: usize = FAIL + 4;
    /// u32 pattern id (valid if HAS_OUTPUT)
    pub const OUTPUT: usize = SUFFIX_OUTPUT + 4;
    /// u32 depth
    pub const DEPTH: usize = OUTPUT + 4;
    /// u32 state flags
    pub const FLAGS: usize = DEPTH + 4;
}

bitflags::bitflags! {
    /// Snapshot header flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SnapshotFlags: u16 {
        /// Snapshot includes CRC32 checksum
        const HAS_CRC32 = 1 << 0;
        /// Patterns were inserted with ASCII case folding
        const FOLD_CASE = 1 << 1;
    }
}

bitflags::bitflags! {
    /// Per-state record flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StateFlags: u32 {
        /// OUTPUT field holds a pattern id
        const HAS_OUTPUT = 1 << 0;
        /// SUFFIX_OUTPUT field holds a state id
        const HAS_SUFFIX_OUTPUT = 1 << 1;
    }
}

/// Validate magic bytes.
#[inline]
pub fn validate_magic(data: &[u8]) -> bool {
    data.len() >= 4 && data[0..4] == ACX_MAGIC
}

/// Read u16 little-endian.
#[inline]
pub fn read_u16_le(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

/// Read u32 little-endian.
#[inline]
pub fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

/// Write u16 little-endian.
#[inline]
pub fn write_u16_le(data: &mut [u8], offset: usize, value: u16) {
    data[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

/// Write u32 little-endian.
#[inline]
pub fn write_u32_le(data: &mut [u8], offset: usize, value: u32) {
    data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}
