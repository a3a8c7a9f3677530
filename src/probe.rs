use crate::io::BlockDevice;
use crate::layout::{CONFIG_MAGIC, DATA, FATX_MAGIC, MAGIC_SECTOR, SYSTEM};
use crate::Identity;

/// Whether `sector` starts with `magic`. A sector that can't be read doesn't.
pub fn has_magic<D>(device: &D, sector: u64, magic: &[u8; 4]) -> bool
where
    D: BlockDevice + ?Sized,
{
    match device.read_sector(sector) {
        Ok(data) => data[..4] == magic[..],
        Err(e) => {
            log::debug!("sector {} unreadable, treating as unsigned: {}", sector, e);
            false
        }
    }
}

pub fn is_xbox_drive<D>(device: &D, identity: &Identity) -> bool
where
    D: BlockDevice + ?Sized,
{
    if !has_magic(device, MAGIC_SECTOR, &CONFIG_MAGIC) {
        log::debug!("no config area signature at sector {}", MAGIC_SECTOR);
        return false;
    }

    match identity {
        Identity::ConfigOnly => true,
        Identity::Strict => [SYSTEM, DATA].iter().all(|known| {
            let found = has_magic(device, known.extent.first_sector, &FATX_MAGIC);
            if !found {
                log::debug!(
                    "no FATX signature at sector {}",
                    known.extent.first_sector
                );
            }
            found
        }),
    }
}
