// discfinalize/src/utils.rs

pub const SECTOR_SIZE: usize = 2048;

use std::io::{self, Seek, SeekFrom};

/// Byte offset of the first byte of sector `lba`.
pub fn lba_to_offset(lba: u32) -> u64 {
    lba as u64 * SECTOR_SIZE as u64
}

/// Positions a stream at the start of the given sector.
pub fn seek_to_lba<S: Seek>(stream: &mut S, lba: u32) -> io::Result<()> {
    stream.seek(SeekFrom::Start(lba_to_offset(lba)))?;
    Ok(())
}

/// Reads a little-endian u16 at `offset` within `buf`.
pub fn read_u16_le(buf: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([buf[offset], buf[offset + 1]])
}

/// Reads a little-endian u32 at `offset` within `buf`.
pub fn read_u32_le(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ])
}

/// Reads a big-endian u32 at `offset` within `buf`.
pub fn read_u32_be(buf: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ])
}
