//! Byte-level fixtures: hand-assembled chunk NBT and region files.

use std::io::Write;

use bit_field::BitField;
use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;

use crate::{CompressionScheme, SECTOR_SIZE};

/// One `sections` entry of a chunk fixture.
pub(crate) struct SectionFixture {
    pub y: i8,
    pub palette: Vec<&'static str>,
    pub data: Option<Vec<i64>>,
}

fn write_tag(buf: &mut Vec<u8>, tag: u8, name: &str) {
    buf.push(tag);
    buf.extend_from_slice(&(name.len() as u16).to_be_bytes());
    buf.extend_from_slice(name.as_bytes());
}

fn write_long_array(buf: &mut Vec<u8>, name: &str, words: &[i64]) {
    write_tag(buf, 12, name);
    buf.extend_from_slice(&(words.len() as i32).to_be_bytes());
    for word in words {
        buf.extend_from_slice(&word.to_be_bytes());
    }
}

/// Serialize a chunk with the given sections and optional `WORLD_SURFACE`
/// heightmap, in the modern root-level layout.
pub(crate) fn chunk_nbt(sections: &[SectionFixture], world_surface: Option<&[i64]>) -> Vec<u8> {
    let mut buf = Vec::new();
    write_tag(&mut buf, 10, ""); // root compound

    write_tag(&mut buf, 3, "DataVersion");
    buf.extend_from_slice(&3465i32.to_be_bytes());

    if let Some(words) = world_surface {
        write_tag(&mut buf, 10, "Heightmaps");
        write_long_array(&mut buf, "WORLD_SURFACE", words);
        buf.push(0); // end Heightmaps
    }

    write_tag(&mut buf, 9, "sections");
    buf.push(10); // element type: compound
    buf.extend_from_slice(&(sections.len() as i32).to_be_bytes());
    for section in sections {
        write_tag(&mut buf, 1, "Y");
        buf.push(section.y as u8);

        write_tag(&mut buf, 10, "block_states");
        write_tag(&mut buf, 9, "palette");
        buf.push(10);
        buf.extend_from_slice(&(section.palette.len() as i32).to_be_bytes());
        for name in &section.palette {
            write_tag(&mut buf, 8, "Name");
            buf.extend_from_slice(&(name.len() as u16).to_be_bytes());
            buf.extend_from_slice(name.as_bytes());
            buf.push(0); // end palette entry
        }
        if let Some(data) = &section.data {
            write_long_array(&mut buf, "data", data);
        }
        buf.push(0); // end block_states
        buf.push(0); // end section
    }

    buf.push(0); // end root
    buf
}

/// Pack palette ids with the aligned layout: `64 / bits` ids per word,
/// low-order-first, no straddling.
pub(crate) fn pack_ids(ids: &[usize], bits: usize) -> Vec<i64> {
    let per_word = 64 / bits;
    let words = (ids.len() + per_word - 1) / per_word;
    let mut out = vec![0u64; words];
    for (i, &id) in ids.iter().enumerate() {
        out[i / per_word].set_bits((i % per_word) * bits..(i % per_word + 1) * bits, id as u64);
    }
    out.into_iter().map(|w| w as i64).collect()
}

/// Pack 256 surface heights into the 37-long heightmap layout.
pub(crate) fn pack_heights(heights: &[u16; 256]) -> Vec<i64> {
    let mut words = vec![0u64; 37];
    for (i, &h) in heights.iter().enumerate() {
        words[i / 7].set_bits((i % 7) * 9..(i % 7) * 9 + 9, u64::from(h));
    }
    words.into_iter().map(|w| w as i64).collect()
}

fn compress(data: &[u8], scheme: CompressionScheme) -> Vec<u8> {
    match scheme {
        CompressionScheme::Gzip => {
            let mut enc = GzEncoder::new(Vec::new(), Compression::default());
            enc.write_all(data).unwrap();
            enc.finish().unwrap()
        }
        CompressionScheme::Zlib => {
            let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
            enc.write_all(data).unwrap();
            enc.finish().unwrap()
        }
        CompressionScheme::Uncompressed => data.to_vec(),
    }
}

/// Assemble a region file holding the given chunks at region-relative
/// coordinates. Slots not listed stay absent.
pub(crate) fn region_file(chunks: &[(usize, usize, Vec<u8>, CompressionScheme)]) -> Vec<u8> {
    let mut file = vec![0u8; 2 * SECTOR_SIZE];

    for (x, z, nbt, scheme) in chunks {
        let compressed = compress(nbt, *scheme);
        let frame_len = 5 + compressed.len();
        let sectors = (frame_len + SECTOR_SIZE - 1) / SECTOR_SIZE;
        let begin_sector = file.len() / SECTOR_SIZE;

        let entry = ((begin_sector as u32) << 8) | sectors as u32;
        let loc = 4 * (x + z * 32);
        file[loc..loc + 4].copy_from_slice(&entry.to_be_bytes());

        let mut frame = Vec::with_capacity(sectors * SECTOR_SIZE);
        frame.extend_from_slice(&((compressed.len() + 1) as u32).to_be_bytes());
        frame.push(*scheme as u8);
        frame.extend_from_slice(&compressed);
        frame.resize(sectors * SECTOR_SIZE, 0);
        file.extend_from_slice(&frame);
    }

    file
}
