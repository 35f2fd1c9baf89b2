// discfinalize/src/disc/descriptor.rs
use std::io::{Read, Seek};

use crate::disc::layout::{
    DESCRIPTOR_LBA, DISC_SIZE_OFFSET, FILE_COUNT_OFFSET, FINALIZED_OFFSET, INDEX_TABLE_LBA_DELTA,
    SIGNATURE, SIGNATURE_LEN, SIGNATURE_OFFSET, TABLE_POINTER_OFFSET,
};
use crate::disc::sector_io::SectorReader;
use crate::error::{IoContext, RepairError};
use crate::utils::{SECTOR_SIZE, read_u16_le, read_u32_le};

/// Decoded top-level descriptor sector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TopLevelDescriptor {
    /// Raw finalization flag byte; nonzero means the disc was sealed.
    pub finalized_flag: u8,
    pub file_count: u16,
    /// Disc size in sectors.
    pub disc_size: u32,
    /// Sector preceding the master index table.
    pub table_pointer: u32,
}

impl TopLevelDescriptor {
    /// Decodes a descriptor sector, rejecting it unless it starts with the signature.
    pub fn from_sector(sector: &[u8; SECTOR_SIZE]) -> Result<Self, RepairError> {
        let signature = &sector[SIGNATURE_OFFSET..SIGNATURE_OFFSET + SIGNATURE_LEN];
        if signature != SIGNATURE {
            let mut found = [0u8; SIGNATURE_LEN];
            found.copy_from_slice(signature);
            return Err(RepairError::Format { found });
        }

        Ok(TopLevelDescriptor {
            finalized_flag: sector[FINALIZED_OFFSET],
            file_count: read_u16_le(sector, FILE_COUNT_OFFSET),
            disc_size: read_u32_le(sector, DISC_SIZE_OFFSET),
            table_pointer: read_u32_le(sector, TABLE_POINTER_OFFSET),
        })
    }

    /// Reads and decodes the descriptor at its fixed sector.
    pub fn read<R: Read + Seek>(reader: &mut SectorReader<R>) -> Result<Self, RepairError> {
        let mut sector = [0u8; SECTOR_SIZE];
        reader
            .read_sectors_into(DESCRIPTOR_LBA, &mut sector)
            .context_with(|| {
                format!("failed to read top-level descriptor at sector {DESCRIPTOR_LBA:#x}")
            })?;
        let descriptor = Self::from_sector(&sector)?;
        log::debug!("top-level descriptor: {:?}", descriptor);
        Ok(descriptor)
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized_flag != 0
    }

    pub fn disc_size_bytes(&self) -> u64 {
        self.disc_size as u64 * SECTOR_SIZE as u64
    }

    /// Sector holding the master index table, or `None` if the pointer is at
    /// the top of the address space.
    pub fn index_table_lba(&self) -> Option<u32> {
        self.table_pointer.checked_add(INDEX_TABLE_LBA_DELTA)
    }
}
