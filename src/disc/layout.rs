// discfinalize/src/disc/layout.rs
//! On-disc layout of the recordable zone metadata. All offsets are byte offsets
//! within the 2048-byte sector named by the matching `*_LBA` constant.

use crate::utils::SECTOR_SIZE;

// Top-level descriptor (the "MIT_RW_ZN" sector).
pub const DESCRIPTOR_LBA: u32 = 0xA00;
pub const SIGNATURE: &[u8; SIGNATURE_LEN] = b"MIT_RW_ZN";
pub const SIGNATURE_LEN: usize = 9;
pub const SIGNATURE_OFFSET: usize = 0x00;
pub const FILE_COUNT_OFFSET: usize = 0x12; // u16 LE
pub const DISC_SIZE_OFFSET: usize = 0x14; // u32 LE, in sectors
pub const FINALIZED_OFFSET: usize = 0x18; // u8, nonzero = finalized
pub const TABLE_POINTER_OFFSET: usize = 0x2C; // u32 LE

// Master index table, located at (table pointer + 1).
pub const INDEX_TABLE_LBA_DELTA: u32 = 1;
pub const VOLUME_INFO_OFFSET: usize = 0x00;
pub const VOLUME_INFO_LEN: usize = 0x44;
pub const FILE_STRUCTURE_OFFSET: usize = 0x2C0;
pub const FILE_STRUCTURE_LEN: usize = SECTOR_SIZE - FILE_STRUCTURE_OFFSET;
pub const TABLE_ENTRY_SIZE: usize = 4; // u32 BE
pub const VOLUME_INFO_ENTRIES: usize = VOLUME_INFO_LEN / TABLE_ENTRY_SIZE;
pub const FILE_STRUCTURE_ENTRIES: usize = FILE_STRUCTURE_LEN / TABLE_ENTRY_SIZE;
/// The top bit of every table entry is a flag, not part of the address.
pub const TABLE_ENTRY_ADDRESS_MASK: u32 = 0x7fff_ffff;

/// Each table entry names a run of this many sectors.
pub const BLOCK_SECTORS: u32 = 0x10;

// Partition area.
pub const PARTITION_START_LBA: u32 = 0xB00;
pub const VOLUME_INFO_DEST_LBA: u32 = 0;
