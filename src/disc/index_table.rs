// discfinalize/src/disc/index_table.rs
use std::io::{Read, Seek};

use crate::disc::layout::{
    FILE_STRUCTURE_LEN, FILE_STRUCTURE_OFFSET, TABLE_ENTRY_ADDRESS_MASK, TABLE_ENTRY_SIZE,
    VOLUME_INFO_LEN, VOLUME_INFO_OFFSET,
};
use crate::disc::sector_io::SectorReader;
use crate::error::{IoContext, RepairError};
use crate::utils::{SECTOR_SIZE, read_u32_be};

/// Strips the flag bit from a raw table entry, leaving the sector address.
pub fn entry_address(raw: u32) -> u32 {
    raw & TABLE_ENTRY_ADDRESS_MASK
}

fn decode_region(sector: &[u8], offset: usize, len: usize) -> Vec<u32> {
    sector[offset..offset + len]
        .chunks_exact(TABLE_ENTRY_SIZE)
        .map(|entry| entry_address(read_u32_be(entry, 0)))
        .collect()
}

/// The master index table: where the current volume-info and file-structure
/// blocks actually live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MasterIndexTable {
    /// Always the full fixed-length region; zero entries are real addresses.
    pub volume_info: Vec<u32>,
    /// The full fixed-length region, including any zero terminator and what follows it.
    pub file_structure: Vec<u32>,
}

impl MasterIndexTable {
    pub fn from_sector(sector: &[u8; SECTOR_SIZE]) -> Self {
        MasterIndexTable {
            volume_info: decode_region(sector, VOLUME_INFO_OFFSET, VOLUME_INFO_LEN),
            file_structure: decode_region(sector, FILE_STRUCTURE_OFFSET, FILE_STRUCTURE_LEN),
        }
    }

    /// Reads the table from the sector at `lba`.
    pub fn read<R: Read + Seek>(
        reader: &mut SectorReader<R>,
        lba: u32,
    ) -> Result<Self, RepairError> {
        let mut sector = [0u8; SECTOR_SIZE];
        reader
            .read_sectors_into(lba, &mut sector)
            .context_with(|| format!("failed to read master index table at sector {lba:#x}"))?;

        let table = Self::from_sector(&sector);
        log::debug!(
            "master index table at {:#x}: volume info {:x?}, file structure {:x?}",
            lba,
            table.volume_info,
            table.file_structure_entries()
        );
        Ok(table)
    }

    /// File-structure entries up to, not including, the first zero entry.
    pub fn file_structure_entries(&self) -> &[u32] {
        let end = self
            .file_structure
            .iter()
            .position(|&lba| lba == 0)
            .unwrap_or(self.file_structure.len());
        &self.file_structure[..end]
    }
}
