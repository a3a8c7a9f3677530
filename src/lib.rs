#![cfg_attr(not(feature = "std"), no_std)]

//! Find the partitions on an original Xbox hard drive.
//!
//! The console's kernel doesn't read a partition table at all: the layout is fixed. Some drive
//! tools add a table at sector 0 anyway, which may or may not agree with that layout. This crate
//! checks the drive really is an Xbox drive, then either reconciles the table against the fixed
//! layout or, without a table, reports the fixed layout itself.

extern crate alloc;

use alloc::vec::Vec;

mod errors;
mod io;
pub mod layout;
mod le;
mod probe;
mod reconcile;
mod sink;
mod table;
#[cfg(test)]
mod testing;

pub use errors::Error;
pub use io::{BlockDevice, Disk, ReadAt, Sector, Size, SECTOR_SIZE};
pub use probe::has_magic;
pub use sink::{PartitionSink, FIRST_SLOT};
pub use table::{PartitionTable, PartitionTableEntry, ENTRY_COUNT, FLAG_IN_USE, TABLE_MAGIC};

use sink::Emitter;

/// A resolved partition.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Partition {
    /// Assigned in discovery order, counting up from `FIRST_SLOT`. Not stored on disk.
    pub slot: usize,
    pub first_sector: u64,
    pub sector_count: u64,
}

// Saturating, as the extended partition of an undersized device has a nonsense length.
impl Partition {
    pub fn first_byte(&self) -> u64 {
        self.first_sector.saturating_mul(SECTOR_SIZE as u64)
    }

    pub fn len(&self) -> u64 {
        self.sector_count.saturating_mul(SECTOR_SIZE as u64)
    }
}

pub enum Identity {
    /// The config area signature, and a FATX volume at both fixed system and data locations.
    Strict,
    /// Only the config area signature.
    ConfigOnly,
}

pub enum ReadTable {
    /// Use the table at sector 0 when there is one, and the fixed layout otherwise.
    OnDisk,
    /// Always report the fixed layout.
    Never,
}

pub struct Options {
    pub identity: Identity,
    pub table: ReadTable,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            identity: Identity::Strict,
            table: ReadTable::OnDisk,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Layout {
    /// Partitions came from the table at sector 0.
    Table,
    /// There was no table; partitions are the fixed layout.
    Static,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Outcome {
    /// The drive isn't in this format; some other reader may recognise it.
    NotThisFormat,
    Resolved { emitted: usize, layout: Layout },
}

/// Find the partitions on `device`, passing each to `sink` as it's found.
///
/// Nothing here fails: unreadable sectors count as missing signatures, and table entries that
/// can't be reconciled are left out.
pub fn resolve<D, S>(device: &D, options: &Options, sink: &mut S) -> Outcome
where
    D: BlockDevice + ?Sized,
    S: PartitionSink + ?Sized,
{
    if !probe::is_xbox_drive(device, &options.identity) {
        return Outcome::NotThisFormat;
    }

    let table = match options.table {
        ReadTable::OnDisk => table::locate(device),
        ReadTable::Never => None,
    };

    let mut emitter = Emitter::new(sink);

    let layout = match table {
        Some(table) => {
            table::emit_entries(device, &table, &mut emitter);
            Layout::Table
        }
        None => {
            layout::emit_static(device.capacity(), &mut emitter);
            Layout::Static
        }
    };

    Outcome::Resolved {
        emitted: emitter.emitted(),
        layout,
    }
}

pub fn list_partitions<D>(device: &D, options: &Options) -> Result<Vec<Partition>, Error>
where
    D: BlockDevice + ?Sized,
{
    let mut partitions = Vec::with_capacity(ENTRY_COUNT);
    match resolve(device, options, &mut partitions) {
        Outcome::NotThisFormat => Err(Error::NotFound),
        Outcome::Resolved { .. } => Ok(partitions),
    }
}

/// List the partitions of an image or device, taking its capacity from its size.
pub fn open<R>(reader: R, options: &Options) -> Result<Vec<Partition>, Error>
where
    R: ReadAt + Size,
{
    list_partitions(&Disk::open(reader)?, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{CONFIG_MAGIC, DATA, EXTEND_START, MAGIC_SECTOR, SYSTEM};
    use crate::testing::SparseDisk;

    #[test]
    fn not_this_format() {
        let mut disk = SparseDisk::xbox();
        disk.erase(MAGIC_SECTOR);
        disk.write_table(&[(&SYSTEM.name, FLAG_IN_USE, 1, 1)]);

        let mut found: Vec<Partition> = Vec::new();
        assert_eq!(
            Outcome::NotThisFormat,
            resolve(&disk, &Options::default(), &mut found)
        );
        assert!(found.is_empty());

        match list_partitions(&disk, &Options::default()) {
            Err(Error::NotFound) => {}
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn reports_layout() {
        let mut disk = SparseDisk::xbox();
        let mut found: Vec<Partition> = Vec::new();
        assert_eq!(
            Outcome::Resolved {
                emitted: 5,
                layout: Layout::Static
            },
            resolve(&disk, &Options::default(), &mut found)
        );

        disk.write_table(&[(b"EMPTY ENTRY     ", 0, 0, 0)]);
        let mut found: Vec<Partition> = Vec::new();
        assert_eq!(
            Outcome::Resolved {
                emitted: 0,
                layout: Layout::Table
            },
            resolve(&disk, &Options::default(), &mut found)
        );
    }

    #[test]
    fn never_read_table() {
        let mut disk = SparseDisk::xbox();
        disk.write_table(&[(b"OTHER           ", FLAG_IN_USE, 0x10, 0x10)]);

        let options = Options {
            table: ReadTable::Never,
            ..Options::default()
        };

        let parts = list_partitions(&disk, &options).expect("xbox");
        assert_eq!(5, parts.len());
        assert_eq!(DATA.extent.first_sector, parts[0].first_sector);
    }

    #[test]
    fn config_only_identity() {
        let mut disk = SparseDisk::new(EXTEND_START);
        disk.sign(MAGIC_SECTOR, &CONFIG_MAGIC);

        assert!(list_partitions(&disk, &Options::default()).is_err());

        let options = Options {
            identity: Identity::ConfigOnly,
            ..Options::default()
        };
        assert_eq!(5, list_partitions(&disk, &options).expect("xbox").len());
    }

    #[test]
    fn byte_helpers() {
        let part = Partition {
            slot: FIRST_SLOT,
            first_sector: 0x400,
            sector_count: 2,
        };
        assert_eq!(0x80000, part.first_byte());
        assert_eq!(1024, part.len());
    }
}
