use core::convert::TryInto;

use crate::io::{BlockDevice, Sector};
use crate::layout::{well_known, Extent};
use crate::reconcile::preferred_extent;
use crate::sink::{Emitter, PartitionSink};
use crate::le;

pub const TABLE_SECTOR: u64 = 0;
pub const TABLE_MAGIC: &[u8; 16] = b"****PARTINFO****";
pub const ENTRY_COUNT: usize = 14;
pub const FLAG_IN_USE: u32 = 0x8000_0000;

pub(crate) const FIRST_ENTRY_OFFSET: usize = 0x30;
pub(crate) const ENTRY_SIZE: usize = 0x20;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct PartitionTableEntry {
    /// Space padded, not terminated.
    pub name: [u8; 16],
    pub flags: u32,
    pub first_sector: u32,
    pub sector_count: u32,
    pub reserved: u32,
}

impl PartitionTableEntry {
    fn parse(entry: &[u8]) -> PartitionTableEntry {
        PartitionTableEntry {
            name: entry[0x00..0x10].try_into().expect("fixed size slice"),
            flags: le::read_u32(&entry[0x10..0x14]),
            first_sector: le::read_u32(&entry[0x14..0x18]),
            sector_count: le::read_u32(&entry[0x18..0x1c]),
            reserved: le::read_u32(&entry[0x1c..0x20]),
        }
    }

    pub fn in_use(&self) -> bool {
        FLAG_IN_USE == self.flags & FLAG_IN_USE
    }

    /// In use, and describes a non-empty run of sectors.
    pub fn is_usable(&self) -> bool {
        self.in_use() && !self.extent().is_empty()
    }

    /// What the table claims, before any reconciliation.
    pub fn extent(&self) -> Extent {
        Extent::new(
            u64::from(self.first_sector),
            u64::from(self.sector_count),
        )
    }

    /// The name with its padding removed, for display. `None` if it isn't UTF-8.
    pub fn name_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.name)
            .ok()
            .map(|name| name.trim_end_matches(' '))
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PartitionTable {
    pub reserved: [u8; 32],
    /// In on-disk order, unused slots included.
    pub entries: [PartitionTableEntry; ENTRY_COUNT],
}

impl PartitionTable {
    /// Interpret a sector as a table. `None` unless it starts with `TABLE_MAGIC`.
    pub fn parse(sector: &Sector) -> Option<PartitionTable> {
        if TABLE_MAGIC[..] != sector[0x00..0x10] {
            return None;
        }

        let entries = core::array::from_fn(|id| {
            let offset = FIRST_ENTRY_OFFSET + id * ENTRY_SIZE;
            PartitionTableEntry::parse(&sector[offset..offset + ENTRY_SIZE])
        });

        Some(PartitionTable {
            reserved: sector[0x10..FIRST_ENTRY_OFFSET]
                .try_into()
                .expect("fixed size slice"),
            entries,
        })
    }
}

/// Read the table from its sector, if there is one.
pub fn locate<D>(device: &D) -> Option<PartitionTable>
where
    D: BlockDevice + ?Sized,
{
    match device.read_sector(TABLE_SECTOR) {
        Ok(sector) => PartitionTable::parse(&sector),
        Err(e) => {
            log::debug!("partition table sector unreadable: {}", e);
            None
        }
    }
}

pub(crate) fn emit_entries<D, S>(device: &D, table: &PartitionTable, emitter: &mut Emitter<'_, S>)
where
    D: BlockDevice + ?Sized,
    S: PartitionSink + ?Sized,
{
    for (id, entry) in table.entries.iter().enumerate() {
        if !entry.is_usable() {
            continue;
        }

        let extent = match well_known(&entry.name) {
            Some(known) => preferred_extent(device, entry, known),
            None => entry.extent(),
        };

        if !emitter.emit(extent) {
            log::trace!("entry {} ({:?}) produced nothing", id, entry.name_str());
        }
    }
}
