//! Read-only analysis of Minecraft's region format, Anvil.
//!
//! A world's dimension directory holds `r.<x>.<z>.mca` region files, each a
//! 32x32 grid of chunks. [`Region`] decodes the container, [`Chunk`] answers
//! block queries over the paletted, bit-packed voxel storage, and
//! [`RegionFileLoader`] resolves a rectangle of chunk coordinates to the
//! regions that cover it. [`SurfaceMap`] projects the surface block of every
//! column in an area.
//!
//! Corruption is isolated at the chunk or region boundary: a bad chunk never
//! poisons its siblings, and area queries return partial results together
//! with per-unit diagnostics.

mod area;
mod bits;
mod chunk;
mod dimension;
mod files;
mod region;
mod section;
mod surface;
mod world;

pub use area::*;
pub use bits::*;
pub use chunk::*;
pub use dimension::*;
pub use files::*;
pub use region::*;
pub use section::*;
pub use surface::*;
pub use world::*;

#[cfg(test)]
mod test;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    /// A file name that does not parse as `r.<x>.<z>.mca`.
    InvalidRegionName(String),
    /// A region whose header could not be read. Carries region coordinates.
    CorruptRegion(isize, isize, String),
    /// A chunk whose frame or NBT could not be decoded. Carries absolute
    /// chunk coordinates.
    CorruptChunk(isize, isize, String),
    /// A chunk frame with a compression byte other than 1, 2 or 3.
    UnsupportedCompression(isize, isize, u8),
    /// Chunk NBT that parsed but did not have the expected shape.
    Schema {
        path: &'static str,
        expected: &'static str,
        found: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io error: {e}"),
            Error::InvalidRegionName(name) => {
                write!(f, "not a region file name (r.<x>.<z>.mca): {name}")
            }
            Error::CorruptRegion(x, z, cause) => {
                write!(f, "corrupt region ({x}, {z}): {cause}")
            }
            Error::CorruptChunk(x, z, cause) => {
                write!(f, "corrupt chunk ({x}, {z}): {cause}")
            }
            Error::UnsupportedCompression(x, z, scheme) => {
                write!(
                    f,
                    "compression scheme {scheme} of chunk ({x}, {z}) is not recognised"
                )
            }
            Error::Schema {
                path,
                expected,
                found,
            } => {
                write!(f, "unexpected chunk structure at {path}: expected {expected}, found {found}")
            }
        }
    }
}

impl std::error::Error for Error {}
