//! Choosing between a table entry and the compiled-in location of the partition it names.
//!
//! Tools that write the table don't reliably keep it in step with the fixed layout, so when the
//! two disagree the FATX signature decides: whichever start sector actually holds a volume wins.
//! Evidence for both, or for neither, gives nothing at all.

use crate::io::BlockDevice;
use crate::layout::{Extent, WellKnownPartition, FATX_MAGIC};
use crate::probe::has_magic;
use crate::table::PartitionTableEntry;

pub fn preferred_extent<D>(
    device: &D,
    entry: &PartitionTableEntry,
    known: &WellKnownPartition,
) -> Extent
where
    D: BlockDevice + ?Sized,
{
    let recorded = entry.extent();
    let expected = known.extent;

    let start_matches = recorded.first_sector == expected.first_sector;
    let count_matches = recorded.sector_count == expected.sector_count;

    if start_matches && count_matches {
        return recorded;
    }

    log::trace!(
        "{:?} disagrees with the fixed layout (start {}, count {})",
        entry.name_str(),
        if start_matches { "matches" } else { "differs" },
        if count_matches { "matches" } else { "differs" },
    );

    let at_recorded = has_magic(device, recorded.first_sector, &FATX_MAGIC);
    let at_expected = has_magic(device, expected.first_sector, &FATX_MAGIC);

    match (at_recorded, at_expected) {
        (true, false) => recorded,
        (false, true) => expected,
        _ => {
            log::debug!(
                "{:?}: FATX found at {} of sectors {} and {}, dropping",
                entry.name_str(),
                if at_recorded { "both" } else { "neither" },
                recorded.first_sector,
                expected.first_sector,
            );
            Extent::EMPTY
        }
    }
}
