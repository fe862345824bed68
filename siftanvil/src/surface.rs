use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use siftnbt::{NbtReader, Value};

use crate::{expand_heightmap, Chunk, Error, RawChunk, Result, AIR};

/// Cooperative stop flag for long projections, observed between chunks.
/// Cancelling mid-run leaves the remaining cells unset; they read as air.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// The surface blocks of a rectangle of chunks.
///
/// One cell per chunk, indexed by the chunk coordinate relative to the
/// rectangle's minimum corner. A cell holds 256 block names in `z * 16 + x`
/// order, or nothing for chunks that were absent, unreadable, cancelled or
/// carry no surface heightmap.
#[derive(Debug, Default)]
pub struct SurfaceMap {
    x_min: isize,
    z_min: isize,
    width: usize,
    height: usize,
    cells: Vec<Option<Vec<String>>>,
    pub diagnostics: Vec<Error>,
}

impl SurfaceMap {
    /// Project every chunk into its surface cell. Failures are localized:
    /// a chunk that cannot be projected leaves a diagnostic and an empty
    /// cell, and the rest of the matrix is still produced.
    pub fn project(chunks: &[RawChunk], cancel: &CancelToken) -> SurfaceMap {
        let mut map = match SurfaceMap::sized_for(chunks) {
            Some(map) => map,
            None => return SurfaceMap::default(),
        };

        for chunk in chunks {
            if cancel.is_cancelled() {
                log::debug!("surface projection cancelled");
                break;
            }
            match project_chunk(chunk) {
                Ok(Some(cell)) => map.set(chunk.x.0, chunk.z.0, cell),
                Ok(None) => {}
                Err(e) => {
                    log::warn!("surface cell ({}, {}): {e}", chunk.x.0, chunk.z.0);
                    map.diagnostics.push(e);
                }
            }
        }
        map
    }

    fn sized_for(chunks: &[RawChunk]) -> Option<SurfaceMap> {
        let x_min = chunks.iter().map(|c| c.x.0).min()?;
        let x_max = chunks.iter().map(|c| c.x.0).max()?;
        let z_min = chunks.iter().map(|c| c.z.0).min()?;
        let z_max = chunks.iter().map(|c| c.z.0).max()?;
        let width = (x_max - x_min + 1) as usize;
        let height = (z_max - z_min + 1) as usize;
        Some(SurfaceMap {
            x_min,
            z_min,
            width,
            height,
            cells: vec![None; width * height],
            diagnostics: Vec::new(),
        })
    }

    fn set(&mut self, cx: isize, cz: isize, cell: Vec<String>) {
        let col = (cx - self.x_min) as usize;
        let row = (cz - self.z_min) as usize;
        self.cells[row * self.width + col] = Some(cell);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The cell for the chunk at absolute coordinates, if it was produced.
    pub fn cell(&self, cx: isize, cz: isize) -> Option<&[String]> {
        let col = usize::try_from(cx - self.x_min).ok()?;
        let row = usize::try_from(cz - self.z_min).ok()?;
        if col >= self.width || row >= self.height {
            return None;
        }
        self.cells[row * self.width + col].as_deref()
    }

    /// Surface block of one column. Missing cells read as air.
    pub fn block_at(&self, cx: isize, cz: isize, x: usize, z: usize) -> &str {
        self.cell(cx, cz)
            .and_then(|cell| cell.get(z * 16 + x))
            .map_or(AIR, String::as_str)
    }
}

/// Surface blocks of one chunk: `None` when the chunk is absent or has no
/// surface heightmap.
fn project_chunk(chunk: &RawChunk) -> Result<Option<Vec<String>>> {
    let data = match &chunk.data {
        Some(data) => data,
        None => return Ok(None),
    };

    let heights = NbtReader::new(data)
        .read_path(&["Heightmaps", "WORLD_SURFACE"])
        .map_err(|e| Error::CorruptChunk(chunk.x.0, chunk.z.0, e.to_string()))?;
    let heights = match heights {
        Some(Value::LongArray(words)) => {
            if words.len() != 37 {
                return Err(Error::Schema {
                    path: "Heightmaps.WORLD_SURFACE",
                    expected: "37 longs",
                    found: format!("{} longs", words.len()),
                });
            }
            expand_heightmap(&words)
        }
        Some(other) => {
            return Err(Error::Schema {
                path: "Heightmaps.WORLD_SURFACE",
                expected: "long array",
                found: other.kind().to_string(),
            })
        }
        None => return Ok(None),
    };

    let blocks = Chunk::from_nbt_bytes(chunk.x, chunk.z, data)?;
    let offset = chunk.dimension.surface_offset();

    let mut coords = Vec::with_capacity(256);
    for z in 0..16isize {
        for x in 0..16isize {
            let raw = heights[(z * 16 + x) as usize];
            coords.push((x, raw as isize - offset, z));
        }
    }

    let names = blocks
        .get_bulk(&coords)
        .into_iter()
        .map(str::to_owned)
        .collect();
    Ok(Some(names))
}
