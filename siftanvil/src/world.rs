use std::fs::File;
use std::path::PathBuf;

use crate::{
    coords_from_path, find_region_files, region_file_name, CancelToken, Corners, Dimension, Error,
    RawChunk, Region, SurfaceMap,
};

/// Results of an area scan: the chunks that could be loaded plus one
/// diagnostic per unit that could not. Partial success never turns into
/// total failure.
#[derive(Debug, Default)]
pub struct Scan {
    pub chunks: Vec<RawChunk>,
    pub diagnostics: Vec<Error>,
}

/// Resolves chunk rectangles to the region files of one dimension of one
/// world.
///
/// `root` is the dimension root; region files may sit at any depth below it,
/// covering both `saves/<world>/region` and server-cache layouts.
pub struct RegionFileLoader {
    root: PathBuf,
    dimension: Dimension,
}

impl RegionFileLoader {
    pub fn new(root: PathBuf, dimension: Dimension) -> Self {
        Self { root, dimension }
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// All chunks of the regions overlapping `corners`, filtered to
    /// `corners` expanded by one chunk so neighbour-aware consumers have
    /// their margin. Missing region files are not an error; unreadable ones
    /// are logged, recorded and skipped.
    pub fn chunks_in(&self, corners: Corners) -> Scan {
        let mut scan = Scan::default();

        let wanted: Vec<String> = corners
            .regions()
            .into_iter()
            .map(|(x, z)| region_file_name(x, z))
            .collect();
        log::debug!(
            "scanning {} for {} region files",
            self.root.display(),
            wanted.len()
        );

        let paths = match find_region_files(&self.root, &wanted) {
            Ok(paths) => paths,
            Err(e) => {
                scan.diagnostics.push(Error::Io(e));
                return scan;
            }
        };

        let keep = corners.expand(1);
        for path in paths {
            let (rx, rz) = match coords_from_path(&path) {
                Ok(coord) => coord,
                Err(e) => {
                    log::warn!("skipping {}: {e}", path.display());
                    scan.diagnostics.push(e);
                    continue;
                }
            };
            let file = match File::open(&path) {
                Ok(file) => file,
                Err(e) => {
                    log::warn!("skipping {}: {e}", path.display());
                    scan.diagnostics.push(Error::Io(e));
                    continue;
                }
            };
            let mut region = match Region::from_stream(rx, rz, self.dimension, file) {
                Ok(region) => region,
                Err(e) => {
                    log::warn!("skipping unreadable region {}: {e}", path.display());
                    scan.diagnostics.push(e);
                    continue;
                }
            };

            let chunks = region.raw_chunks(&mut scan.diagnostics);
            scan.chunks
                .extend(chunks.into_iter().filter(|c| keep.contains(c.x.0, c.z.0)));
        }

        scan
    }

    /// Load the chunks of `corners` and project their surface blocks in one
    /// step. Scan diagnostics carry over into the map.
    pub fn surface_in(&self, corners: Corners, cancel: &CancelToken) -> SurfaceMap {
        let scan = self.chunks_in(corners);
        let mut map = SurfaceMap::project(&scan.chunks, cancel);
        map.diagnostics.extend(scan.diagnostics);
        map
    }
}
