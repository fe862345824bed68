use std::collections::{HashMap, HashSet};

use bit_field::BitField;
use siftnbt::{NbtReader, Value};

use crate::{bits, CCoord, Dimension, Error, Result, Section};

/// Name of the block that every out-of-storage lookup resolves to.
pub const AIR: &str = "minecraft:air";

/// One region slot: an absolute chunk coordinate plus its decompressed NBT,
/// absent for chunks that were never generated.
#[derive(Debug, Clone)]
pub struct RawChunk {
    pub x: CCoord,
    pub z: CCoord,
    pub dimension: Dimension,
    pub data: Option<Vec<u8>>,
}

impl RawChunk {
    pub fn exists(&self) -> bool {
        self.data.is_some()
    }

    pub fn byte_len(&self) -> usize {
        self.data.as_ref().map_or(0, Vec::len)
    }
}

/// Decoded block storage of one chunk, ready for random-access lookups and
/// predicate searches.
#[derive(Debug)]
pub struct Chunk {
    pub x: CCoord,
    pub z: CCoord,
    sections: Vec<Section>,
}

impl Chunk {
    /// Decode the `sections` list out of chunk NBT, skipping the rest of the
    /// tree. A chunk with no `sections` element decodes as empty: every
    /// lookup answers air.
    pub fn from_nbt_bytes(x: CCoord, z: CCoord, data: &[u8]) -> Result<Self> {
        let sections = NbtReader::new(data)
            .read_path(&["sections"])
            .map_err(|e| Error::CorruptChunk(x.0, z.0, e.to_string()))?;
        let sections = match sections {
            Some(Value::List(items)) => items
                .into_iter()
                .map(Section::from_nbt)
                .collect::<Result<Vec<_>>>()?,
            Some(other) => {
                return Err(Error::Schema {
                    path: "sections",
                    expected: "list",
                    found: other.kind().to_string(),
                })
            }
            None => Vec::new(),
        };
        Ok(Self { x, z, sections })
    }

    /// Decode a raw region slot. `Ok(None)` for chunks that were never
    /// generated; every query against such a chunk is air by definition.
    pub fn from_raw(raw: &RawChunk) -> Result<Option<Self>> {
        match &raw.data {
            Some(data) => Chunk::from_nbt_bytes(raw.x, raw.z, data).map(Some),
            None => Ok(None),
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Range of world-Y covered by present sections; empty when the chunk
    /// has none.
    pub fn y_range(&self) -> std::ops::Range<isize> {
        let ys = || self.sections.iter().map(|s| isize::from(s.y));
        match (ys().min(), ys().max()) {
            (Some(min), Some(max)) => min * 16..(max + 1) * 16,
            _ => 0..0,
        }
    }

    fn section_for_y(&self, y: isize) -> Option<&Section> {
        // Floor division: y = -1 is in section -1, not section 0.
        let section_y = y.div_euclid(16);
        self.sections
            .iter()
            .find(|s| isize::from(s.y) == section_y)
    }

    /// Whether any section's palette holds `name`. Cheaper than a search:
    /// no packed data is touched.
    pub fn contains(&self, name: &str) -> bool {
        self.sections
            .iter()
            .any(|s| s.palette.iter().any(|p| p == name))
    }

    /// Block name at a chunk-local x/z and world-absolute y. Anything
    /// outside the stored voxels is air.
    pub fn get(&self, x: isize, y: isize, z: isize) -> &str {
        if !(0..16).contains(&x) || !(0..16).contains(&z) {
            return AIR;
        }
        match self.section_for_y(y) {
            Some(section) => section.block(x as usize, y.rem_euclid(16) as usize, z as usize),
            None => AIR,
        }
    }

    /// `get` mapped over `coords`, preserving order.
    pub fn get_bulk(&self, coords: &[(isize, isize, isize)]) -> Vec<&str> {
        coords.iter().map(|&(x, y, z)| self.get(x, y, z)).collect()
    }

    /// Every block whose palette name is `name`, restricted to world-Y in
    /// `y_min..=y_max`. Coordinates are (chunk-local x, world y, chunk-local
    /// z), in no particular order.
    pub fn find_in_area(&self, name: &str, y_min: isize, y_max: isize) -> Vec<(usize, isize, usize)> {
        let mut found = Vec::new();
        self.find_into(&mut |n, pos| {
            if n == name {
                found.push(pos);
            }
        }, y_min, y_max, &|palette| palette.iter().any(|p| p == name));
        found
    }

    /// Search for several names in one pass over the packed data. Names with
    /// no hits are omitted from the result.
    pub fn find_many(
        &self,
        names: &[&str],
        y_min: isize,
        y_max: isize,
    ) -> HashMap<String, Vec<(usize, isize, usize)>> {
        let mut found: HashMap<String, Vec<(usize, isize, usize)>> = HashMap::new();
        self.find_into(&mut |n, pos| {
            if names.contains(&n) {
                found.entry(n.to_string()).or_default().push(pos);
            }
        }, y_min, y_max, &|palette| {
            palette.iter().any(|p| names.contains(&p.as_str()))
        });
        found
    }

    /// Walk every stored voxel of sections accepted by `wanted`, calling
    /// `visit` with the block name and position. Sections outside the y
    /// window are skipped wholesale.
    fn find_into(
        &self,
        visit: &mut dyn FnMut(&str, (usize, isize, usize)),
        y_min: isize,
        y_max: isize,
        wanted: &dyn Fn(&[String]) -> bool,
    ) {
        for section in &self.sections {
            let base = isize::from(section.y) * 16;
            if base + 15 < y_min || base > y_max {
                continue;
            }
            if section.palette.is_empty() || !wanted(&section.palette) {
                continue;
            }

            if section.single_block() {
                let name = &section.palette[0];
                for y in 0..16 {
                    let y_world = base + y;
                    if !(y_min..=y_max).contains(&y_world) {
                        continue;
                    }
                    for z in 0..16 {
                        for x in 0..16 {
                            visit(name, (x, y_world, z));
                        }
                    }
                }
                continue;
            }

            let data = match &section.data {
                Some(data) => data,
                None => continue,
            };
            let bits_per_block = section.bits_per_block;
            let per_word = 64 / bits_per_block;
            for (word_index, &word) in data.iter().enumerate() {
                let word = word as u64;
                for slot in 0..per_word {
                    // Ids never straddle words; anything past 4095 is padding
                    // in the final word.
                    let idx = word_index * per_word + slot;
                    if idx >= bits::SECTION_BLOCKS {
                        break;
                    }
                    let id = word.get_bits(slot * bits_per_block..(slot + 1) * bits_per_block)
                        as usize;
                    let name = match section.palette.get(id) {
                        Some(name) => name,
                        None => continue,
                    };
                    let y_world = base + (idx / 256) as isize;
                    if !(y_min..=y_max).contains(&y_world) {
                        continue;
                    }
                    let rem = idx % 256;
                    visit(name, (rem % 16, y_world, rem / 16));
                }
            }
        }
    }

    /// Union of every section's palette.
    pub fn palette(&self) -> HashSet<&str> {
        self.sections
            .iter()
            .flat_map(|s| s.palette.iter().map(String::as_str))
            .collect()
    }

    /// Census of every voxel in present sections.
    pub fn block_counts(&self) -> HashMap<&str, usize> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for section in &self.sections {
            if section.palette.is_empty() {
                continue;
            }
            if section.single_block() {
                *counts.entry(section.palette[0].as_str()).or_default() += bits::SECTION_BLOCKS;
                continue;
            }
            let data = match &section.data {
                Some(data) => data,
                None => continue, // multi-entry palette but no data: nothing stored
            };
            for idx in 0..bits::SECTION_BLOCKS {
                let id = bits::block_id(data, section.bits_per_block, idx, section.palette.len());
                *counts.entry(section.palette[id].as_str()).or_default() += 1;
            }
        }
        counts
    }
}
