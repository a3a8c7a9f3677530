use snafu::prelude::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[cfg(feature = "std")]
    #[snafu(display("I/O error at byte {}: {}", pos, source))]
    Io {
        source: std::io::Error,
        pos: u64,
    },

    /// None of the console's signatures were where they should be.
    #[snafu(display("not an Xbox drive"))]
    NotFound,

    #[snafu(display("read past the end of the image at byte {}", pos))]
    UnexpectedEof {
        pos: u64,
    },

    #[snafu(display("sector {} is not addressable", sector))]
    OutOfRange {
        sector: u64,
    },

    #[snafu(display("backing store did not report a size"))]
    UnknownSize,

    BiggerThanMemory,
}
