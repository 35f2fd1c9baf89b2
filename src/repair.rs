// discfinalize/src/repair.rs
use std::fs::File;
use std::io::{self, Read, Seek, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::disc::{
    MasterIndexTable, RepairReport, SectorReader, SectorWriter, TopLevelDescriptor, reconstruct,
};
use crate::error::{IoContext, RepairError};

/// Result of a repair run that did not fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RepairOutcome {
    /// All three passes completed.
    Repaired(RepairReport),
    /// The disc was already finalized and the operator chose not to continue.
    Declined(TopLevelDescriptor),
}

/// The operator's side of a repair run.
///
/// A plain `bool` is an operator that answers every confirmation up front;
/// [`confirm_with`] adapts a closure.
pub trait Operator {
    /// Called once the descriptor has been decoded, before anything is copied.
    fn descriptor_read(&mut self, _descriptor: &TopLevelDescriptor) {}

    /// Asked only when the disc is flagged finalized. `false` aborts the run.
    fn confirm_finalized(&mut self, descriptor: &TopLevelDescriptor) -> bool;
}

impl Operator for bool {
    fn confirm_finalized(&mut self, _descriptor: &TopLevelDescriptor) -> bool {
        *self
    }
}

impl<O: Operator + ?Sized> Operator for &mut O {
    fn descriptor_read(&mut self, descriptor: &TopLevelDescriptor) {
        (**self).descriptor_read(descriptor)
    }

    fn confirm_finalized(&mut self, descriptor: &TopLevelDescriptor) -> bool {
        (**self).confirm_finalized(descriptor)
    }
}

/// Operator that answers the confirmation with a closure.
pub struct ConfirmWith<F>(F);

pub fn confirm_with<F>(f: F) -> ConfirmWith<F>
where
    F: FnMut(&TopLevelDescriptor) -> bool,
{
    ConfirmWith(f)
}

impl<F> Operator for ConfirmWith<F>
where
    F: FnMut(&TopLevelDescriptor) -> bool,
{
    fn confirm_finalized(&mut self, descriptor: &TopLevelDescriptor) -> bool {
        (self.0)(descriptor)
    }
}

enum Prepared<R> {
    Ready(SectorReader<R>, TopLevelDescriptor, MasterIndexTable),
    Declined(TopLevelDescriptor),
}

/// Reads the descriptor, reports it to the operator and, if the disc is
/// flagged finalized, asks whether to carry on before reading the index table.
fn prepare<R, O>(source: R, operator: &mut O) -> Result<Prepared<R>, RepairError>
where
    R: Read + Seek,
    O: Operator,
{
    let mut reader =
        SectorReader::new(source).context_with(|| "failed to size source image".to_string())?;
    let descriptor = TopLevelDescriptor::read(&mut reader)?;
    log::info!(
        "disc holds {} files, {:#x} sectors ({} bytes), index table pointer {:#x}",
        descriptor.file_count,
        descriptor.disc_size,
        descriptor.disc_size_bytes(),
        descriptor.table_pointer
    );
    operator.descriptor_read(&descriptor);

    if descriptor.is_finalized() {
        log::warn!(
            "finalization flag is set ({:#04x}); disc appears already finalized",
            descriptor.finalized_flag
        );
        if !operator.confirm_finalized(&descriptor) {
            log::info!("repair declined");
            return Ok(Prepared::Declined(descriptor));
        }
    }

    let table_lba = descriptor.index_table_lba().ok_or_else(|| {
        RepairError::io(
            format!(
                "master index table pointer {:#x} is out of range",
                descriptor.table_pointer
            ),
            io::Error::new(io::ErrorKind::UnexpectedEof, "sector address overflow"),
        )
    })?;
    let table = MasterIndexTable::read(&mut reader, table_lba)?;
    Ok(Prepared::Ready(reader, descriptor, table))
}

/// Repairs `source` into `destination`. Both are plain seekable streams, so
/// this works equally on files and in-memory buffers.
pub fn repair_image<R, W, O>(
    source: R,
    destination: &mut W,
    mut operator: O,
) -> Result<RepairOutcome, RepairError>
where
    R: Read + Seek,
    W: Write + Seek,
    O: Operator,
{
    let (mut reader, descriptor, table) = match prepare(source, &mut operator)? {
        Prepared::Ready(reader, descriptor, table) => (reader, descriptor, table),
        Prepared::Declined(descriptor) => return Ok(RepairOutcome::Declined(descriptor)),
    };

    let mut writer = SectorWriter::new(destination);
    let report = reconstruct(&mut reader, &mut writer, &descriptor, &table)?;
    Ok(RepairOutcome::Repaired(report))
}

/// Repairs the image at `input`, writing the result to `output`.
///
/// The output is assembled in a temporary file beside `output` and only
/// renamed into place once every pass has succeeded, so a failed run leaves
/// no partial image behind. Declining the confirmation creates no file.
pub fn repair_image_file<O>(
    input: &Path,
    output: &Path,
    mut operator: O,
) -> Result<RepairOutcome, RepairError>
where
    O: Operator,
{
    let source = File::open(input)
        .context_with(|| format!("failed to open source image {}", input.display()))?;
    let (mut reader, descriptor, table) = match prepare(source, &mut operator)? {
        Prepared::Ready(reader, descriptor, table) => (reader, descriptor, table),
        Prepared::Declined(descriptor) => return Ok(RepairOutcome::Declined(descriptor)),
    };

    let output_dir = match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(output_dir).context_with(|| {
        format!(
            "failed to create temporary output in {}",
            output_dir.display()
        )
    })?;
    log::debug!("assembling output in {}", temp.path().display());

    let report = {
        let mut writer = SectorWriter::new(temp.as_file_mut());
        reconstruct(&mut reader, &mut writer, &descriptor, &table)?
    };

    temp.persist(output)
        .map_err(|e| e.error)
        .context_with(|| format!("failed to move output into place at {}", output.display()))?;
    log::info!("wrote {}", output.display());

    Ok(RepairOutcome::Repaired(report))
}
