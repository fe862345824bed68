//! Contains the Error and Result type used by the reader.

/// Errors that can occur while reading NBT data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Input ended part way through a tag, name or payload.
    Truncated,

    /// A tag id outside 0..=12, or an End tag where a value was required.
    InvalidTag(u8),

    /// A length-prefixed payload declared a negative length. Carries the tag
    /// kind and the declared length.
    NegativeLength(&'static str, i32),

    /// The root of the document was not a compound.
    NoRootCompound,
}

/// Convenience type for Result.
pub type Result<T> = std::result::Result<T, Error>;

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Truncated => f.write_str("nbt: unexpectedly ran out of input"),
            Error::InvalidTag(t) => write!(f, "nbt: invalid tag id: {t}"),
            Error::NegativeLength(kind, n) => {
                write!(f, "nbt: {kind} declared negative length: {n}")
            }
            Error::NoRootCompound => f.write_str("nbt: root tag was not a compound"),
        }
    }
}
