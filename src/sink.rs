use alloc::vec::Vec;

use crate::layout::Extent;
use crate::Partition;

/// Slot number given to the first partition found; the rest count up from here.
pub const FIRST_SLOT: usize = 50;

/// Receives partitions as they're resolved.
pub trait PartitionSink {
    fn emit_partition(&mut self, slot: usize, first_sector: u64, sector_count: u64);
}

impl PartitionSink for Vec<Partition> {
    fn emit_partition(&mut self, slot: usize, first_sector: u64, sector_count: u64) {
        self.push(Partition {
            slot,
            first_sector,
            sector_count,
        });
    }
}

/// Hands out slot numbers for one resolution, and refuses empty extents.
pub(crate) struct Emitter<'s, S: ?Sized> {
    sink: &'s mut S,
    next_slot: usize,
}

impl<'s, S: PartitionSink + ?Sized> Emitter<'s, S> {
    pub(crate) fn new(sink: &'s mut S) -> Emitter<'s, S> {
        Emitter {
            sink,
            next_slot: FIRST_SLOT,
        }
    }

    /// Returns whether anything was emitted.
    pub(crate) fn emit(&mut self, extent: Extent) -> bool {
        if extent.is_empty() {
            return false;
        }

        log::trace!(
            "slot {}: {} sectors from sector {}",
            self.next_slot,
            extent.sector_count,
            extent.first_sector
        );

        self.sink
            .emit_partition(self.next_slot, extent.first_sector, extent.sector_count);
        self.next_slot += 1;
        true
    }

    pub(crate) fn emitted(&self) -> usize {
        self.next_slot - FIRST_SLOT
    }
}
