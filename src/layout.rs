//! The fixed layout the console's own kernel assumes, independent of any on-disk table.
//!
//! All locations are in 512-byte sectors. Each region runs up to the start of the next one.

use crate::sink::{Emitter, PartitionSink};

pub const CONFIG_START: u64 = 0x0000_0000;
pub const CACHE1_START: u64 = 0x0000_0400;
pub const CACHE2_START: u64 = 0x0017_7400;
pub const CACHE3_START: u64 = 0x002e_e400;
pub const SYSTEM_START: u64 = 0x0046_5400;
pub const DATA_START: u64 = 0x0055_f400;

/// Where the stock 8GB drive ends. Anything past here is only reachable as an extra partition.
pub const EXTEND_START: u64 = 0x00ee_8ab0;

pub const CONFIG_SIZE: u64 = CACHE1_START - CONFIG_START;
pub const CACHE1_SIZE: u64 = CACHE2_START - CACHE1_START;
pub const CACHE2_SIZE: u64 = CACHE3_START - CACHE2_START;
pub const CACHE3_SIZE: u64 = SYSTEM_START - CACHE3_START;
pub const SYSTEM_SIZE: u64 = DATA_START - SYSTEM_START;
pub const DATA_SIZE: u64 = EXTEND_START - DATA_START;

/// The config area carries this at its `MAGIC_SECTOR`.
pub const CONFIG_MAGIC: [u8; 4] = *b"BRFR";
pub const MAGIC_SECTOR: u64 = 3;

/// First four bytes of every FATX volume.
pub const FATX_MAGIC: [u8; 4] = *b"FATX";

/// A run of sectors. Either field being zero means "nothing here".
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Extent {
    pub first_sector: u64,
    pub sector_count: u64,
}

impl Extent {
    pub const EMPTY: Extent = Extent::new(0, 0);

    pub const fn new(first_sector: u64, sector_count: u64) -> Extent {
        Extent {
            first_sector,
            sector_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        0 == self.first_sector || 0 == self.sector_count
    }
}

/// A partition whose location is compiled in, but which may also be listed in the on-disk table.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct WellKnownPartition {
    /// Exactly as it appears in a table entry: space padded, no terminator.
    pub name: [u8; 16],
    pub extent: Extent,
}

pub const SYSTEM: WellKnownPartition = WellKnownPartition {
    name: *b"XBOX DATA       ",
    extent: Extent::new(SYSTEM_START, SYSTEM_SIZE),
};

pub const DATA: WellKnownPartition = WellKnownPartition {
    name: *b"XBOX SHELL      ",
    extent: Extent::new(DATA_START, DATA_SIZE),
};

static WELL_KNOWN: [WellKnownPartition; 2] = [SYSTEM, DATA];

/// The well-known partition a table entry name refers to, if any. Compares all 16 bytes.
pub fn well_known(name: &[u8; 16]) -> Option<&'static WellKnownPartition> {
    WELL_KNOWN.iter().find(|known| known.name == *name)
}

/// What gets emitted, in this order, when the drive has no table.
pub const STATIC_LAYOUT: [Extent; 5] = [
    DATA.extent,
    SYSTEM.extent,
    Extent::new(CACHE1_START, CACHE1_SIZE),
    Extent::new(CACHE2_START, CACHE2_SIZE),
    Extent::new(CACHE3_START, CACHE3_SIZE),
];

/// Space beyond the stock drive size, for a device of `capacity` sectors.
///
/// A device smaller than the stock size isn't rejected here; the resulting extent is nonsense
/// and it's left to whoever consumes the partitions to refuse it.
pub fn extended(capacity: u64) -> Option<Extent> {
    if capacity == EXTEND_START {
        return None;
    }

    if capacity < EXTEND_START {
        log::warn!(
            "device has {} sectors, fewer than the {} of a stock drive",
            capacity,
            EXTEND_START
        );
    }

    Some(Extent::new(
        EXTEND_START,
        capacity.wrapping_sub(EXTEND_START),
    ))
}

pub(crate) fn emit_static<S>(capacity: u64, emitter: &mut Emitter<'_, S>)
where
    S: PartitionSink + ?Sized,
{
    log::debug!("no partition table, using the static layout");

    for extent in STATIC_LAYOUT.iter() {
        emitter.emit(*extent);
    }

    if let Some(extent) = extended(capacity) {
        emitter.emit(extent);
    }
}
