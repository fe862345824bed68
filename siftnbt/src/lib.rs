//! Reading of Minecraft's NBT format.
//!
//! NBT is a tagged tree serialization with big-endian scalars. This crate
//! reads a document held fully in memory and offers two modes through
//! [`NbtReader`]:
//!
//! * [`NbtReader::read_full`] materializes the entire tree as a [`Value`].
//! * [`NbtReader::read_path`] descends by name to a single element and
//!   materializes only that, stream-skipping every unrelated subtree. Chunk
//!   data runs to megabytes; extracting one long array should not allocate
//!   the rest of the tree.
//!
//! Strings are Java modified UTF-8 (CESU-8). Broken sequences produced by
//! some writers decode lossily rather than failing the document.

mod error;
mod input;
mod reader;
mod value;

pub use error::{Error, Result};
pub use reader::NbtReader;
pub use value::Value;

#[cfg(test)]
mod test;

use num_enum::TryFromPrimitive;

/// The NBT tag id. This does not carry the value or the name.
#[derive(Debug, TryFromPrimitive, PartialEq, Eq, Clone, Copy)]
#[repr(u8)]
pub enum Tag {
    End = 0,
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    ByteArray = 7,
    String = 8,
    List = 9,
    Compound = 10,
    IntArray = 11,
    LongArray = 12,
}
