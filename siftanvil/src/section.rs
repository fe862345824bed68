use siftnbt::Value;

use crate::{bits, Error, Result, AIR};

/// A vertical section of a chunk (ie a 16x16x16 block cube).
///
/// Holds the decoded block palette and the packed id words. A section with a
/// single palette entry carries no data: every voxel is that entry.
#[derive(Debug, Clone)]
pub struct Section {
    pub y: i8,
    pub palette: Vec<String>,
    pub data: Option<Vec<i64>>,
    pub bits_per_block: usize,
}

impl Section {
    /// Decode one element of the `sections` list.
    ///
    /// Consumes `Y`, `block_states.palette[].Name` and `block_states.data`;
    /// everything else (biomes, light) is left behind. `Y` is a signed byte:
    /// a raw byte of 252 means section -4, never 252.
    pub fn from_nbt(nbt: Value) -> Result<Self> {
        let mut fields = match nbt {
            Value::Compound(fields) => fields,
            other => {
                return Err(Error::Schema {
                    path: "sections[]",
                    expected: "compound",
                    found: other.kind().to_string(),
                })
            }
        };

        let y = match fields.remove("Y") {
            Some(Value::Byte(y)) => y,
            // Some writers store Y as an int; accept it when it fits.
            Some(Value::Int(y)) => i8::try_from(y).map_err(|_| Error::Schema {
                path: "sections[].Y",
                expected: "byte-sized int",
                found: y.to_string(),
            })?,
            Some(other) => {
                return Err(Error::Schema {
                    path: "sections[].Y",
                    expected: "byte",
                    found: other.kind().to_string(),
                })
            }
            None => {
                return Err(Error::Schema {
                    path: "sections[].Y",
                    expected: "byte",
                    found: "missing".to_string(),
                })
            }
        };

        let mut palette = Vec::new();
        let mut data = None;

        if let Some(states) = fields.remove("block_states") {
            let mut states = match states {
                Value::Compound(states) => states,
                other => {
                    return Err(Error::Schema {
                        path: "sections[].block_states",
                        expected: "compound",
                        found: other.kind().to_string(),
                    })
                }
            };

            match states.remove("palette") {
                Some(Value::List(entries)) => {
                    palette.reserve(entries.len());
                    for entry in &entries {
                        match entry.get("Name").and_then(Value::as_str) {
                            Some(name) => palette.push(name.to_string()),
                            None => {
                                return Err(Error::Schema {
                                    path: "sections[].block_states.palette[].Name",
                                    expected: "string",
                                    found: entry.kind().to_string(),
                                })
                            }
                        }
                    }
                }
                Some(other) => {
                    return Err(Error::Schema {
                        path: "sections[].block_states.palette",
                        expected: "list",
                        found: other.kind().to_string(),
                    })
                }
                None => {}
            }

            match states.remove("data") {
                Some(Value::LongArray(words)) => data = Some(words),
                Some(other) => {
                    return Err(Error::Schema {
                        path: "sections[].block_states.data",
                        expected: "long array",
                        found: other.kind().to_string(),
                    })
                }
                None => {}
            }
        }

        Ok(Self {
            y,
            bits_per_block: bits::bits_per_block(palette.len()),
            palette,
            data,
        })
    }

    pub fn single_block(&self) -> bool {
        self.palette.len() == 1
    }

    /// Block name at a section-local coordinate, all in 0..16.
    pub fn block(&self, x: usize, y: usize, z: usize) -> &str {
        if self.palette.is_empty() {
            return AIR;
        }
        if self.single_block() {
            return &self.palette[0];
        }
        let data = match &self.data {
            Some(data) => data,
            None => return AIR,
        };
        let id = bits::block_id(
            data,
            self.bits_per_block,
            bits::packed_index(x, y, z),
            self.palette.len(),
        );
        self.palette.get(id).map(String::as_str).unwrap_or(AIR)
    }
}
