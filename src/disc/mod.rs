// discfinalize/src/disc/mod.rs
pub mod descriptor;
pub mod index_table;
pub mod layout;
pub mod reconstruct;
pub mod sector_io;

pub use self::descriptor::TopLevelDescriptor;
pub use self::index_table::MasterIndexTable;
pub use self::reconstruct::{RepairReport, reconstruct};
pub use self::sector_io::{SectorReader, SectorWriter};
