use snafu::prelude::*;

use crate::errors::OutOfRangeSnafu;
use crate::Error;

pub const SECTOR_SIZE: usize = 512;

/// The raw contents of one sector.
pub type Sector = [u8; SECTOR_SIZE];

pub trait ReadAt {
    fn read_exact_at(&self, pos: u64, buf: &mut [u8]) -> Result<(), Error>;
}

/// Total length of the backing store, in bytes.
pub trait Size {
    fn size(&self) -> Result<u64, Error>;
}

/// Sector-addressed access to a device, as the resolver sees it.
pub trait BlockDevice {
    fn read_sector(&self, index: u64) -> Result<Sector, Error>;

    /// Number of sectors on the device.
    fn capacity(&self) -> u64;
}

impl<'d, D: BlockDevice + ?Sized> BlockDevice for &'d D {
    fn read_sector(&self, index: u64) -> Result<Sector, Error> {
        (**self).read_sector(index)
    }

    fn capacity(&self) -> u64 {
        (**self).capacity()
    }
}

/// A `BlockDevice` over anything that supports positioned reads: an image file, a device node,
/// or bytes in memory.
pub struct Disk<R> {
    inner: R,
    capacity: u64,
}

impl<R: ReadAt> Disk<R> {
    /// Use a known capacity, in sectors, rather than asking the reader.
    pub fn with_capacity(inner: R, capacity: u64) -> Disk<R> {
        Disk { inner, capacity }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: ReadAt + Size> Disk<R> {
    /// Derive the capacity from the reader's size. A trailing partial sector is not counted.
    pub fn open(inner: R) -> Result<Disk<R>, Error> {
        let bytes = inner.size()?;
        Ok(Disk {
            inner,
            capacity: bytes / SECTOR_SIZE as u64,
        })
    }
}

impl<R: ReadAt> BlockDevice for Disk<R> {
    fn read_sector(&self, index: u64) -> Result<Sector, Error> {
        let pos = index
            .checked_mul(SECTOR_SIZE as u64)
            .context(OutOfRangeSnafu { sector: index })?;

        let mut sector = [0u8; SECTOR_SIZE];
        self.inner.read_exact_at(pos, &mut sector)?;
        Ok(sector)
    }

    fn capacity(&self) -> u64 {
        self.capacity
    }
}

#[cfg(feature = "std")]
impl<R: positioned_io2::ReadAt> ReadAt for R {
    fn read_exact_at(&self, pos: u64, buf: &mut [u8]) -> Result<(), Error> {
        use crate::errors::IoSnafu;
        positioned_io2::ReadAt::read_exact_at(self, pos, buf).context(IoSnafu { pos })
    }
}

#[cfg(feature = "std")]
impl<R: positioned_io2::Size> Size for R {
    fn size(&self) -> Result<u64, Error> {
        use crate::errors::{IoSnafu, UnknownSizeSnafu};
        positioned_io2::Size::size(self)
            .context(IoSnafu { pos: 0u64 })?
            .context(UnknownSizeSnafu)
    }
}

#[cfg(not(feature = "std"))]
impl<'a> ReadAt for &'a [u8] {
    fn read_exact_at(&self, pos: u64, buf: &mut [u8]) -> Result<(), Error> {
        use core::convert::TryFrom;
        let read_len = u64::try_from(buf.len()).map_err(|_| Error::BiggerThanMemory)?;
        let self_len = u64::try_from(self.len()).map_err(|_| Error::BiggerThanMemory)?;
        if pos.checked_add(read_len).map_or(true, |end| end > self_len) {
            return Err(Error::UnexpectedEof { pos });
        }
        let start = usize::try_from(pos).map_err(|_| Error::BiggerThanMemory)?;
        let end = start
            .checked_add(buf.len())
            .ok_or(Error::BiggerThanMemory)?;

        buf.copy_from_slice(&self[start..end]);
        Ok(())
    }
}

#[cfg(not(feature = "std"))]
impl<'a> Size for &'a [u8] {
    fn size(&self) -> Result<u64, Error> {
        use core::convert::TryFrom;
        u64::try_from(self.len()).map_err(|_| Error::BiggerThanMemory)
    }
}
