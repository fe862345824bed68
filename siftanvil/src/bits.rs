//! Bit-level arithmetic for the aligned packed-word block format.
//!
//! Modern chunks pack palette ids into 64-bit words without crossing word
//! boundaries: each word holds `64 / bits` ids low-order-first, and the top
//! `64 % bits` bits are padding. Older tightly-packed data is a documented
//! non-goal and is never reinterpreted.

use bit_field::BitField;

/// Blocks in a section: 16 * 16 * 16.
pub const SECTION_BLOCKS: usize = 4096;

/// Number of bits used per block for a palette of the given size, floored
/// at 4.
pub fn bits_per_block(palette_len: usize) -> usize {
    match palette_len {
        0 | 1 => 4,
        n => std::cmp::max(usize::BITS as usize - (n - 1).leading_zeros() as usize, 4),
    }
}

/// Flat index of a section-local coordinate: `y * 256 + z * 16 + x`.
pub fn packed_index(x: usize, y: usize, z: usize) -> usize {
    y * 256 + z * 16 + x
}

/// The id stored in one slot of a word.
pub(crate) fn slot_id(word: u64, bits: usize, slot: usize) -> usize {
    word.get_bits(slot * bits..(slot + 1) * bits) as usize
}

/// Palette id at `idx` of aligned packed data. An index past the data or an
/// id past the palette decodes to 0, never out of range.
pub fn block_id(data: &[i64], bits: usize, idx: usize, palette_len: usize) -> usize {
    let per_word = 64 / bits;
    let word = match data.get(idx / per_word) {
        Some(w) => *w as u64,
        None => return 0,
    };
    let id = slot_id(word, bits, idx % per_word);
    if id < palette_len {
        id
    } else {
        0
    }
}

/// Unpack `WORLD_SURFACE` heights: 256 values of 9 bits, stored seven to a
/// long low-bit-first with one bit of padding, 37 longs in total.
pub fn expand_heightmap(data: &[i64]) -> Vec<u16> {
    let mut out = Vec::with_capacity(256);
    'words: for &word in data {
        let word = word as u64;
        for slot in 0..7 {
            if out.len() == 256 {
                break 'words;
            }
            out.push(word.get_bits(slot * 9..slot * 9 + 9) as u16);
        }
    }
    out
}
