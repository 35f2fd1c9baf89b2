// discfinalize/src/disc/reconstruct.rs
//! The three copy passes that turn a non-finalized image into a finalized one.
//! Order matters: the partition body is laid down first, then the volume-info
//! and file-structure blocks overwrite their regions.

use std::io::{Read, Seek, Write};

use crate::disc::descriptor::TopLevelDescriptor;
use crate::disc::index_table::MasterIndexTable;
use crate::disc::layout::{BLOCK_SECTORS, PARTITION_START_LBA, VOLUME_INFO_DEST_LBA};
use crate::disc::sector_io::{SectorReader, SectorWriter};
use crate::error::{IoContext, RepairError};
use crate::utils::SECTOR_SIZE;

/// Upper bound on sectors moved per read during the partition copy.
pub const PARTITION_COPY_BATCH: u32 = 256;

/// What a completed reconstruction wrote.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RepairReport {
    pub file_count: u16,
    pub disc_size: u32,
    pub partition_sectors: u32,
    pub volume_info_blocks: usize,
    pub file_structure_blocks: usize,
}

impl RepairReport {
    pub fn disc_size_bytes(&self) -> u64 {
        self.disc_size as u64 * SECTOR_SIZE as u64
    }
}

/// Pass 1: copies sectors `PARTITION_START_LBA..disc_size` verbatim.
/// Returns the number of sectors copied.
pub fn copy_partition<R, W>(
    reader: &mut SectorReader<R>,
    writer: &mut SectorWriter<W>,
    disc_size: u32,
) -> Result<u32, RepairError>
where
    R: Read + Seek,
    W: Write + Seek,
{
    if disc_size <= PARTITION_START_LBA {
        log::warn!(
            "disc size {:#x} does not extend past the partition start {:#x}; nothing to copy",
            disc_size,
            PARTITION_START_LBA
        );
        return Ok(0);
    }

    log::info!(
        "copying partition body, sectors {:#x}..{:#x}",
        PARTITION_START_LBA,
        disc_size
    );
    let mut buf = vec![0u8; PARTITION_COPY_BATCH as usize * SECTOR_SIZE];
    let mut lba = PARTITION_START_LBA;
    while lba < disc_size {
        let count = (disc_size - lba).min(PARTITION_COPY_BATCH);
        let chunk = &mut buf[..count as usize * SECTOR_SIZE];
        reader
            .read_sectors_into(lba, chunk)
            .context_with(|| format!("failed to read partition sectors at {lba:#x}"))?;
        writer
            .write_sectors(lba, chunk)
            .context_with(|| format!("failed to write partition sectors at {lba:#x}"))?;
        lba += count;
    }
    Ok(disc_size - PARTITION_START_LBA)
}

/// Copies one `BLOCK_SECTORS` run per source address, packing them
/// contiguously from `dest_lba`. Returns the number of blocks copied.
fn copy_blocks<R, W, I>(
    reader: &mut SectorReader<R>,
    writer: &mut SectorWriter<W>,
    dest_lba: u32,
    sources: I,
    area: &str,
) -> Result<usize, RepairError>
where
    R: Read + Seek,
    W: Write + Seek,
    I: IntoIterator<Item = u32>,
{
    let mut buf = vec![0u8; BLOCK_SECTORS as usize * SECTOR_SIZE];
    let mut dest = dest_lba;
    let mut copied = 0;
    for src in sources {
        reader.read_sectors_into(src, &mut buf).context_with(|| {
            format!("failed to read {area} block {copied} from sector {src:#x}")
        })?;
        writer.write_sectors(dest, &buf).context_with(|| {
            format!("failed to write {area} block {copied} to sector {dest:#x}")
        })?;
        log::debug!("{} block {}: {:#x} -> {:#x}", area, copied, src, dest);
        dest += BLOCK_SECTORS;
        copied += 1;
    }
    Ok(copied)
}

/// Pass 2: every volume-info entry, zero or not, lands at the start of the image.
pub fn copy_volume_info<R, W>(
    reader: &mut SectorReader<R>,
    writer: &mut SectorWriter<W>,
    volume_info: &[u32],
) -> Result<usize, RepairError>
where
    R: Read + Seek,
    W: Write + Seek,
{
    log::info!("copying {} volume info blocks", volume_info.len());
    copy_blocks(
        reader,
        writer,
        VOLUME_INFO_DEST_LBA,
        volume_info.iter().copied(),
        "volume info",
    )
}

/// Pass 3: file-structure entries land at the partition start. `entries` is
/// expected to be already cut at the terminator, see
/// [`MasterIndexTable::file_structure_entries`].
pub fn copy_file_structure<R, W>(
    reader: &mut SectorReader<R>,
    writer: &mut SectorWriter<W>,
    entries: &[u32],
) -> Result<usize, RepairError>
where
    R: Read + Seek,
    W: Write + Seek,
{
    let copied = copy_blocks(
        reader,
        writer,
        PARTITION_START_LBA,
        entries.iter().copied(),
        "file structure",
    )?;
    log::info!("copied {} file structure blocks", copied);
    Ok(copied)
}

/// Runs all three passes in order.
pub fn reconstruct<R, W>(
    reader: &mut SectorReader<R>,
    writer: &mut SectorWriter<W>,
    descriptor: &TopLevelDescriptor,
    table: &MasterIndexTable,
) -> Result<RepairReport, RepairError>
where
    R: Read + Seek,
    W: Write + Seek,
{
    let partition_sectors = copy_partition(reader, writer, descriptor.disc_size)?;
    let volume_info_blocks = copy_volume_info(reader, writer, &table.volume_info)?;
    let file_structure_blocks =
        copy_file_structure(reader, writer, table.file_structure_entries())?;
    writer
        .flush()
        .context_with(|| "failed to flush output image".to_string())?;

    Ok(RepairReport {
        file_count: descriptor.file_count,
        disc_size: descriptor.disc_size,
        partition_sectors,
        volume_info_blocks,
        file_structure_blocks,
    })
}
