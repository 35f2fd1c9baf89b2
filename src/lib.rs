//! Finalizes disc images left open by their recorder.
//!
//! A non-finalized disc keeps its current volume descriptors and file-structure
//! blocks scattered across update zones, listed by a master index table. This
//! crate copies the partition body and then gathers those blocks into their
//! nominal positions, producing a finalized image.

pub use crate::disc::layout::{DESCRIPTOR_LBA, PARTITION_START_LBA, SIGNATURE};
pub use crate::disc::{
    MasterIndexTable, RepairReport, SectorReader, SectorWriter, TopLevelDescriptor,
};
pub use crate::error::RepairError;
pub use crate::repair::{
    ConfirmWith, Operator, RepairOutcome, confirm_with, repair_image, repair_image_file,
};
pub use crate::utils::SECTOR_SIZE;

pub mod disc;
mod error;
mod repair;
mod utils;

/// Output file name used when none is given.
pub const DEFAULT_OUTPUT: &str = "fixed.iso";
