use std::ops::Range;

use byteorder::{BigEndian, ReadBytesExt};

use crate::{Error, Result, Tag};

/// Single-cursor reader over an in-memory NBT document.
///
/// Every method advances the cursor by exactly the bytes it consumed, so a
/// successful read or skip of a value leaves the cursor one byte past that
/// value's last payload byte.
pub(crate) struct Slice<'a> {
    data: &'a [u8],
}

impl<'a> Slice<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn remaining(&self) -> usize {
        self.data.len()
    }

    fn consume(&mut self, r: Range<usize>) -> Result<&'a [u8]> {
        if r.end <= self.data.len() {
            let ret = &self.data[r.start..r.end];
            self.data = &self.data[r.end..];
            Ok(ret)
        } else {
            Err(Error::Truncated)
        }
    }

    pub fn consume_byte(&mut self) -> Result<u8> {
        Ok(self.consume(0..1)?[0])
    }

    pub fn consume_tag(&mut self) -> Result<Tag> {
        let tag = self.consume_byte()?;
        Tag::try_from(tag).map_err(|_| Error::InvalidTag(tag))
    }

    pub fn consume_i16(&mut self) -> Result<i16> {
        let mut bs = self.consume(0..std::mem::size_of::<i16>())?;
        bs.read_i16::<BigEndian>().map_err(|_| Error::Truncated)
    }

    pub fn consume_i32(&mut self) -> Result<i32> {
        let mut bs = self.consume(0..std::mem::size_of::<i32>())?;
        bs.read_i32::<BigEndian>().map_err(|_| Error::Truncated)
    }

    pub fn consume_i64(&mut self) -> Result<i64> {
        let mut bs = self.consume(0..std::mem::size_of::<i64>())?;
        bs.read_i64::<BigEndian>().map_err(|_| Error::Truncated)
    }

    pub fn consume_f32(&mut self) -> Result<f32> {
        let mut bs = self.consume(0..std::mem::size_of::<f32>())?;
        bs.read_f32::<BigEndian>().map_err(|_| Error::Truncated)
    }

    pub fn consume_f64(&mut self) -> Result<f64> {
        let mut bs = self.consume(0..std::mem::size_of::<f64>())?;
        bs.read_f64::<BigEndian>().map_err(|_| Error::Truncated)
    }

    /// i32 length prefix for arrays and lists. Negative lengths are a
    /// document error, not a cursor error.
    pub fn consume_len(&mut self, kind: &'static str) -> Result<usize> {
        let n = self.consume_i32()?;
        usize::try_from(n).map_err(|_| Error::NegativeLength(kind, n))
    }

    pub fn consume_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.consume(0..n)
    }

    /// The raw byte block of an array of `n` elements, `width` bytes each.
    pub fn consume_array(&mut self, n: usize, width: usize) -> Result<&'a [u8]> {
        let len = n.checked_mul(width).ok_or(Error::Truncated)?;
        self.consume(0..len)
    }

    /// A u16-length-prefixed string. Decoding is tolerant: chunk producers
    /// occasionally emit broken CESU-8, which decodes lossily instead of
    /// failing the document.
    pub fn consume_str(&mut self) -> Result<String> {
        let len = self.consume(0..2)?.read_u16::<BigEndian>().map_err(|_| Error::Truncated)? as usize;
        let bytes = self.consume(0..len)?;
        Ok(match cesu8::from_java_cesu8(bytes) {
            Ok(s) => s.into_owned(),
            Err(_) => String::from_utf8_lossy(bytes).into_owned(),
        })
    }

    pub fn skip_str(&mut self) -> Result<()> {
        let len = self.consume(0..2)?.read_u16::<BigEndian>().map_err(|_| Error::Truncated)? as usize;
        self.consume(0..len).map(|_| ())
    }

    /// Advance past a payload of the given tag without materializing it.
    pub fn skip_value(&mut self, tag: Tag) -> Result<()> {
        match tag {
            Tag::Byte => {
                self.consume(0..1)?;
            }
            Tag::Short => {
                self.consume(0..2)?;
            }
            Tag::Int | Tag::Float => {
                self.consume(0..4)?;
            }
            Tag::Long | Tag::Double => {
                self.consume(0..8)?;
            }
            Tag::String => self.skip_str()?,
            Tag::ByteArray => {
                let n = self.consume_len("byte array")?;
                self.consume(0..n)?;
            }
            Tag::IntArray => {
                let n = self.consume_len("int array")?;
                self.consume_array(n, 4)?;
            }
            Tag::LongArray => {
                let n = self.consume_len("long array")?;
                self.consume_array(n, 8)?;
            }
            Tag::List => {
                let element = self.consume_tag()?;
                let n = self.consume_len("list")?;
                for _ in 0..n {
                    self.skip_value(element)?;
                }
            }
            Tag::Compound => loop {
                let tag = self.consume_tag()?;
                if tag == Tag::End {
                    break;
                }
                self.skip_str()?;
                self.skip_value(tag)?;
            },
            Tag::End => return Err(Error::InvalidTag(Tag::End as u8)),
        }
        Ok(())
    }
}
