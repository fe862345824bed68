use std::io::{Read, Seek, SeekFrom};

use byteorder::{BigEndian, ReadBytesExt};
use flate2::read::{GzDecoder, ZlibDecoder};
use num_enum::TryFromPrimitive;

use crate::{CCoord, Dimension, Error, RCoord, RawChunk, Result};

/// The size in bytes of a 'sector' in a region file. Chunk frames occupy a
/// whole number of sectors.
pub const SECTOR_SIZE: usize = 4096;

/// The size of the region file header: the location table then the
/// timestamp table, one sector each.
pub const HEADER_SIZE: usize = 2 * SECTOR_SIZE;

/// Chunks along one side of a region.
pub const REGION_CHUNKS: usize = 32;

/// Where a chunk's frame lives within its region file, in sectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChunkLocation {
    pub begin_sector: usize,
    pub sector_count: usize,
}

impl ChunkLocation {
    /// A zero offset or count marks a chunk that was never generated.
    pub fn is_absent(&self) -> bool {
        self.begin_sector == 0 || self.sector_count == 0
    }
}

/// The 1024-entry location table at the front of a region file, ordered by
/// (z, x).
#[derive(Debug)]
pub struct LocationTable {
    entries: Vec<ChunkLocation>,
}

impl LocationTable {
    /// Decode the first 4096 header bytes: each big-endian u32 is a 24-bit
    /// sector offset over an 8-bit sector count. `None` if the data cannot
    /// hold a full table.
    pub fn from_bytes(mut data: &[u8]) -> Option<Self> {
        let mut entries = Vec::with_capacity(REGION_CHUNKS * REGION_CHUNKS);
        for _ in 0..REGION_CHUNKS * REGION_CHUNKS {
            let entry = data.read_u32::<BigEndian>().ok()?;
            entries.push(ChunkLocation {
                begin_sector: (entry >> 8) as usize,
                sector_count: (entry & 0xFF) as usize,
            });
        }
        Some(Self { entries })
    }

    /// Entry for the region-relative chunk (x, z), both in 0..32.
    pub fn get(&self, x: usize, z: usize) -> ChunkLocation {
        self.entries[(x % REGION_CHUNKS) + (z % REGION_CHUNKS) * REGION_CHUNKS]
    }

    /// Re-encode the table. Decoding then encoding is byte-identical.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.entries.len() * 4);
        for entry in &self.entries {
            let word = ((entry.begin_sector as u32) << 8) | (entry.sector_count as u32 & 0xFF);
            out.extend_from_slice(&word.to_be_bytes());
        }
        out
    }
}

/// Various compression schemes that chunk frames are stored with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum CompressionScheme {
    Gzip = 1,
    Zlib = 2,
    Uncompressed = 3,
}

enum FrameError {
    Truncated,
    BadLength(usize),
    UnknownScheme(u8),
    Decompress(std::io::Error),
}

impl FrameError {
    fn into_error(self, cx: CCoord, cz: CCoord) -> Error {
        match self {
            FrameError::Truncated => {
                Error::CorruptChunk(cx.0, cz.0, "frame header cut short".to_string())
            }
            FrameError::BadLength(len) => Error::CorruptChunk(
                cx.0,
                cz.0,
                format!("declared frame length {len} exceeds its sectors"),
            ),
            FrameError::UnknownScheme(scheme) => Error::UnsupportedCompression(cx.0, cz.0, scheme),
            FrameError::Decompress(e) => {
                Error::CorruptChunk(cx.0, cz.0, format!("decompress: {e}"))
            }
        }
    }
}

/// Split a chunk frame into its compression scheme and compressed payload.
/// The frame starts with a big-endian u32 length (which counts the scheme
/// byte) followed by the scheme byte itself.
fn parse_frame(frame: &[u8]) -> std::result::Result<(CompressionScheme, &[u8]), FrameError> {
    if frame.len() < 5 {
        return Err(FrameError::Truncated);
    }
    let mut header = &frame[..5];
    let length = header.read_u32::<BigEndian>().map_err(|_| FrameError::Truncated)? as usize;
    let scheme = header.read_u8().map_err(|_| FrameError::Truncated)?;
    let scheme = CompressionScheme::try_from(scheme).map_err(|_| FrameError::UnknownScheme(scheme))?;

    let payload_len = length.checked_sub(1).ok_or(FrameError::BadLength(length))?;
    if payload_len > frame.len() - 5 {
        return Err(FrameError::BadLength(length));
    }
    Ok((scheme, &frame[5..5 + payload_len]))
}

fn decompress(scheme: CompressionScheme, payload: &[u8]) -> std::result::Result<Vec<u8>, FrameError> {
    let mut out = Vec::new();
    match scheme {
        CompressionScheme::Gzip => GzDecoder::new(payload)
            .read_to_end(&mut out)
            .map_err(FrameError::Decompress)?,
        CompressionScheme::Zlib => ZlibDecoder::new(payload)
            .read_to_end(&mut out)
            .map_err(FrameError::Decompress)?,
        CompressionScheme::Uncompressed => {
            out.extend_from_slice(payload);
            payload.len()
        }
    };
    Ok(out)
}

/// A Minecraft region: up to 1024 chunks stored behind a seekable stream.
pub struct Region<S> {
    x: RCoord,
    z: RCoord,
    dimension: Dimension,
    locations: LocationTable,
    stream: S,
}

impl<S> Region<S>
where
    S: Read + Seek,
{
    /// Read the header from the start of the stream. The timestamp table is
    /// consumed and ignored.
    pub fn from_stream(x: RCoord, z: RCoord, dimension: Dimension, mut stream: S) -> Result<Self> {
        stream.seek(SeekFrom::Start(0))?;
        let mut header = [0u8; HEADER_SIZE];
        stream
            .read_exact(&mut header)
            .map_err(|e| Error::CorruptRegion(x.0, z.0, format!("header: {e}")))?;
        let locations = LocationTable::from_bytes(&header[..SECTOR_SIZE])
            .ok_or_else(|| Error::CorruptRegion(x.0, z.0, "location table cut short".to_string()))?;
        Ok(Self {
            x,
            z,
            dimension,
            locations,
            stream,
        })
    }

    pub fn coord(&self) -> (RCoord, RCoord) {
        (self.x, self.z)
    }

    pub fn locations(&self) -> &LocationTable {
        &self.locations
    }

    /// Absolute coordinates of the region-relative chunk (x, z).
    fn chunk_coord(&self, x: usize, z: usize) -> (CCoord, CCoord) {
        (
            CCoord(self.x.0 * REGION_CHUNKS as isize + x as isize),
            CCoord(self.z.0 * REGION_CHUNKS as isize + z as isize),
        )
    }

    /// The decompressed NBT of the chunk at region-relative (x, z), both in
    /// 0..32. `Ok(None)` for chunks that were never generated.
    pub fn read_chunk(&mut self, x: usize, z: usize) -> Result<Option<Vec<u8>>> {
        let location = self.locations.get(x, z);
        if location.is_absent() {
            return Ok(None);
        }

        let (cx, cz) = self.chunk_coord(x, z);
        self.stream
            .seek(SeekFrom::Start((location.begin_sector * SECTOR_SIZE) as u64))?;
        let mut frame = vec![0u8; location.sector_count * SECTOR_SIZE];
        self.stream
            .read_exact(&mut frame)
            .map_err(|e| Error::CorruptChunk(cx.0, cz.0, format!("frame: {e}")))?;

        let (scheme, payload) = parse_frame(&frame).map_err(|e| e.into_error(cx, cz))?;
        let data = decompress(scheme, payload).map_err(|e| e.into_error(cx, cz))?;
        Ok(Some(data))
    }

    /// Decode every slot of the region into [`RawChunk`]s. A slot that fails
    /// becomes an absent chunk and its error is pushed to `diagnostics`; one
    /// bad chunk never fails the region.
    pub fn raw_chunks(&mut self, diagnostics: &mut Vec<Error>) -> Vec<RawChunk> {
        let mut chunks = Vec::with_capacity(REGION_CHUNKS * REGION_CHUNKS);
        for i in 0..REGION_CHUNKS * REGION_CHUNKS {
            let (x, z) = (i % REGION_CHUNKS, i / REGION_CHUNKS);
            let (cx, cz) = self.chunk_coord(x, z);
            let data = match self.read_chunk(x, z) {
                Ok(data) => data,
                Err(e) => {
                    log::warn!("skipping chunk ({}, {}): {e}", cx.0, cz.0);
                    diagnostics.push(e);
                    None
                }
            };
            chunks.push(RawChunk {
                x: cx,
                z: cz,
                dimension: self.dimension,
                data,
            });
        }
        chunks
    }
}
