//! An in-memory device that only stores the sectors a test writes to, since a real drive image is
//! gigabytes.

use alloc::collections::{BTreeMap, BTreeSet};
use core::cell::Cell;

use crate::io::{BlockDevice, Sector, SECTOR_SIZE};
use crate::layout::{CONFIG_MAGIC, DATA_START, EXTEND_START, FATX_MAGIC, MAGIC_SECTOR, SYSTEM_START};
use crate::table::{FIRST_ENTRY_OFFSET, ENTRY_SIZE, TABLE_MAGIC};
use crate::Error;

pub(crate) struct SparseDisk {
    sectors: BTreeMap<u64, Sector>,
    unreadable: BTreeSet<u64>,
    capacity: u64,
    reads: Cell<usize>,
}

impl SparseDisk {
    pub(crate) fn new(capacity: u64) -> SparseDisk {
        SparseDisk {
            sectors: BTreeMap::new(),
            unreadable: BTreeSet::new(),
            capacity,
            reads: Cell::new(0),
        }
    }

    /// A stock-sized drive with all three identity signatures.
    pub(crate) fn xbox() -> SparseDisk {
        let mut disk = SparseDisk::new(EXTEND_START);
        disk.sign(MAGIC_SECTOR, &CONFIG_MAGIC);
        disk.sign(SYSTEM_START, &FATX_MAGIC);
        disk.sign(DATA_START, &FATX_MAGIC);
        disk
    }

    pub(crate) fn sign(&mut self, sector: u64, magic: &[u8]) {
        self.write(sector, 0, magic);
    }

    pub(crate) fn erase(&mut self, sector: u64) {
        self.sectors.remove(&sector);
    }

    pub(crate) fn break_sector(&mut self, sector: u64) {
        self.unreadable.insert(sector);
    }

    pub(crate) fn write(&mut self, sector: u64, offset: usize, bytes: &[u8]) {
        let data = self.sectors.entry(sector).or_insert([0u8; SECTOR_SIZE]);
        data[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    /// Write a table to sector 0, one `(name, flags, first_sector, sector_count)` per entry.
    pub(crate) fn write_table(&mut self, entries: &[(&[u8; 16], u32, u32, u32)]) {
        self.write(0, 0, TABLE_MAGIC);
        for (id, (name, flags, start, count)) in entries.iter().enumerate() {
            let offset = FIRST_ENTRY_OFFSET + id * ENTRY_SIZE;
            self.write(0, offset, &name[..]);
            self.write(0, offset + 16, &flags.to_le_bytes());
            self.write(0, offset + 20, &start.to_le_bytes());
            self.write(0, offset + 24, &count.to_le_bytes());
        }
    }

    pub(crate) fn reads(&self) -> usize {
        self.reads.get()
    }

    pub(crate) fn reset_reads(&self) {
        self.reads.set(0);
    }
}

impl BlockDevice for SparseDisk {
    fn read_sector(&self, index: u64) -> Result<Sector, Error> {
        self.reads.set(self.reads.get() + 1);
        if index >= self.capacity || self.unreadable.contains(&index) {
            return Err(Error::UnexpectedEof {
                pos: index.wrapping_mul(SECTOR_SIZE as u64),
            });
        }
        Ok(self
            .sectors
            .get(&index)
            .copied()
            .unwrap_or([0u8; SECTOR_SIZE]))
    }

    fn capacity(&self) -> u64 {
        self.capacity
    }
}
