// discfinalize/src/disc/sector_io.rs
//! Whole-sector positioned reads and writes.

use std::io::{self, Read, Seek, SeekFrom, Write};

use crate::utils::{SECTOR_SIZE, seek_to_lba};

fn check_whole_sectors(len: usize) -> io::Result<()> {
    if len % SECTOR_SIZE != 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "transfer of {} bytes is not a multiple of the {}-byte sector size",
                len, SECTOR_SIZE
            ),
        ));
    }
    Ok(())
}

/// Read side of a disc image. Knows the image length so that addresses at or
/// past the end fail up front instead of producing short reads.
pub struct SectorReader<R> {
    inner: R,
    total_sectors: u64,
}

impl<R: Read + Seek> SectorReader<R> {
    pub fn new(mut inner: R) -> io::Result<Self> {
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self {
            inner,
            total_sectors: len / SECTOR_SIZE as u64,
        })
    }

    /// Number of complete sectors in the image.
    pub fn total_sectors(&self) -> u64 {
        self.total_sectors
    }

    /// Reads `count` sectors starting at `lba`.
    pub fn read_sectors(&mut self, lba: u32, count: u32) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; count as usize * SECTOR_SIZE];
        self.read_sectors_into(lba, &mut buf)?;
        Ok(buf)
    }

    /// Fills `buf` with consecutive sectors starting at `lba`.
    pub fn read_sectors_into(&mut self, lba: u32, buf: &mut [u8]) -> io::Result<()> {
        check_whole_sectors(buf.len())?;
        let count = (buf.len() / SECTOR_SIZE) as u64;
        let end = lba as u64 + count;
        if end > self.total_sectors {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "sectors {:#x}..{:#x} lie beyond the end of the image ({:#x} sectors)",
                    lba, end, self.total_sectors
                ),
            ));
        }
        seek_to_lba(&mut self.inner, lba)?;
        self.inner.read_exact(buf)
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

/// Write side of a disc image.
pub struct SectorWriter<W> {
    inner: W,
}

impl<W: Write + Seek> SectorWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Writes `data` starting at sector `lba`. Writing past the current end
    /// extends the image; any gap reads back as zeros.
    pub fn write_sectors(&mut self, lba: u32, data: &[u8]) -> io::Result<()> {
        check_whole_sectors(data.len())?;
        seek_to_lba(&mut self.inner, lba)?;
        self.inner.write_all(data)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}
