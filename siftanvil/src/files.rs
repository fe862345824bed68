use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, RCoord, Result};

/// `r.<x>.<z>.mca` for a region coordinate.
pub fn region_file_name(x: RCoord, z: RCoord) -> String {
    format!("r.{}.{}.mca", x.0, z.0)
}

/// Parse region coordinates out of a region file path. Strict: exactly
/// `r.<x>.<z>.mca` with signed decimal coordinates.
pub fn coords_from_path(path: &Path) -> Result<(RCoord, RCoord)> {
    let invalid = || Error::InvalidRegionName(path.display().to_string());
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(invalid)?;

    let mut parts = name.split('.');
    if parts.next() != Some("r") {
        return Err(invalid());
    }
    let x = parts
        .next()
        .and_then(|p| p.parse().ok())
        .ok_or_else(invalid)?;
    let z = parts
        .next()
        .and_then(|p| p.parse().ok())
        .ok_or_else(invalid)?;
    if parts.next() != Some("mca") || parts.next().is_some() {
        return Err(invalid());
    }
    Ok((RCoord(x), RCoord(z)))
}

/// Recursively scan `root` for files with one of the wanted names. Name
/// comparison is exact, including case. The nesting below the dimension root
/// differs between singleplayer saves and server caches, which is why the
/// scan recurses rather than assuming a layout.
pub fn find_region_files(root: &Path, wanted: &[String]) -> std::io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    walk(root, wanted, &mut found)?;
    Ok(found)
}

fn walk(dir: &Path, wanted: &[String], found: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(&path, wanted, found)?;
        } else if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if wanted.iter().any(|w| w == name) {
                found.push(path);
            }
        }
    }
    Ok(())
}
