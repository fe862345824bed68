use std::collections::HashMap;

use crate::input::Slice;
use crate::{Error, Result, Tag, Value};

/// Reads one NBT document from an in-memory buffer.
///
/// A reader is cheap to construct and is consumed by a single read, so code
/// that wants several subtrees of the same buffer builds one reader per
/// lookup:
///
/// ```
/// use siftnbt::{NbtReader, Value};
///
/// # fn doc() -> Vec<u8> {
/// #     vec![
/// #         0x0a, 0x00, 0x00, // root compound, empty name
/// #         0x03, 0x00, 0x04, b't', b'e', b's', b't', // int "test"
/// #         0x00, 0x00, 0x30, 0x39, // 12345
/// #         0x00, // end
/// #     ]
/// # }
/// let doc = doc();
/// let value = NbtReader::new(&doc).read_path(&["test"]).unwrap();
/// assert_eq!(value, Some(Value::Int(12345)));
/// ```
pub struct NbtReader<'a> {
    input: Slice<'a>,
}

impl<'a> NbtReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            input: Slice::new(data),
        }
    }

    /// Materialize the whole document. The root must be a named compound;
    /// its name (usually empty) is returned alongside the tree.
    pub fn read_full(mut self) -> Result<(String, Value)> {
        if self.input.consume_tag()? != Tag::Compound {
            return Err(Error::NoRootCompound);
        }
        let name = self.input.consume_str()?;
        let value = self.read_payload(Tag::Compound)?;
        Ok((name, value))
    }

    /// Descend from the root compound following `path`, materializing only
    /// the final element. Siblings that do not match are skipped without
    /// being decoded.
    ///
    /// Returns `Ok(None)` when any path element is missing, or when an
    /// intermediate element is not a compound — list elements are unnamed,
    /// so a path cannot address through a list.
    pub fn read_path(mut self, path: &[&str]) -> Result<Option<Value>> {
        if self.input.consume_tag()? != Tag::Compound {
            return Err(Error::NoRootCompound);
        }
        self.input.skip_str()?;

        let (last, descend) = match path.split_last() {
            Some(p) => p,
            None => return Ok(None),
        };

        'levels: for want in descend {
            loop {
                let tag = self.input.consume_tag()?;
                if tag == Tag::End {
                    return Ok(None);
                }
                let name = self.input.consume_str()?;
                if name == *want {
                    if tag == Tag::Compound {
                        continue 'levels;
                    }
                    return Ok(None);
                }
                self.input.skip_value(tag)?;
            }
        }

        loop {
            let tag = self.input.consume_tag()?;
            if tag == Tag::End {
                return Ok(None);
            }
            let name = self.input.consume_str()?;
            if name == *last {
                return Ok(Some(self.read_payload(tag)?));
            }
            self.input.skip_value(tag)?;
        }
    }

    fn read_payload(&mut self, tag: Tag) -> Result<Value> {
        Ok(match tag {
            Tag::Byte => Value::Byte(self.input.consume_byte()? as i8),
            Tag::Short => Value::Short(self.input.consume_i16()?),
            Tag::Int => Value::Int(self.input.consume_i32()?),
            Tag::Long => Value::Long(self.input.consume_i64()?),
            Tag::Float => Value::Float(self.input.consume_f32()?),
            Tag::Double => Value::Double(self.input.consume_f64()?),
            Tag::String => Value::String(self.input.consume_str()?),
            Tag::ByteArray => {
                let n = self.input.consume_len("byte array")?;
                let bytes = self.input.consume_bytes(n)?;
                Value::ByteArray(bytes.iter().map(|&b| b as i8).collect())
            }
            Tag::IntArray => Value::IntArray(self.read_int_array()?),
            Tag::LongArray => Value::LongArray(self.read_long_array()?),
            Tag::List => Value::List(self.read_list()?),
            Tag::Compound => Value::Compound(self.read_compound()?),
            Tag::End => return Err(Error::InvalidTag(Tag::End as u8)),
        })
    }

    fn read_compound(&mut self) -> Result<HashMap<String, Value>> {
        let mut fields = HashMap::new();
        loop {
            let tag = self.input.consume_tag()?;
            if tag == Tag::End {
                return Ok(fields);
            }
            let name = self.input.consume_str()?;
            let value = self.read_payload(tag)?;
            fields.insert(name, value);
        }
    }

    fn read_list(&mut self) -> Result<Vec<Value>> {
        let element = self.input.consume_tag()?;
        let n = self.input.consume_len("list")?;
        if element == Tag::End {
            // Empty lists are written with element type End.
            return if n == 0 {
                Ok(Vec::new())
            } else {
                Err(Error::InvalidTag(Tag::End as u8))
            };
        }
        let mut items = Vec::with_capacity(n.min(self.input.remaining()));
        for _ in 0..n {
            items.push(self.read_payload(element)?);
        }
        Ok(items)
    }

    // The array kinds dominate chunk parsing, so they are lifted as one byte
    // block and converted in a single pass instead of per-element cursor
    // bumps.

    fn read_int_array(&mut self) -> Result<Vec<i32>> {
        let n = self.input.consume_len("int array")?;
        let bytes = self.input.consume_array(n, 4)?;
        Ok(bytes
            .chunks_exact(4)
            .map(|b| i32::from_be_bytes(b.try_into().unwrap()))
            .collect())
    }

    fn read_long_array(&mut self) -> Result<Vec<i64>> {
        let n = self.input.consume_len("long array")?;
        let bytes = self.input.consume_array(n, 8)?;
        Ok(bytes
            .chunks_exact(8)
            .map(|b| i64::from_be_bytes(b.try_into().unwrap()))
            .collect())
    }
}
