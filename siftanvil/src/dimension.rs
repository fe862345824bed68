use std::ops::Range;

/// A region coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RCoord(pub isize);

/// An absolute chunk coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CCoord(pub isize);

impl CCoord {
    /// The region this chunk falls in. Floor division, so chunk -1 lands in
    /// region -1, not region 0.
    pub fn region(self) -> RCoord {
        RCoord(self.0.div_euclid(32))
    }
}

/// One of the three vanilla dimensions.
///
/// The dimension fixes the readable world-Y range and the offset that turns
/// a raw `WORLD_SURFACE` height into an absolute Y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Overworld,
    Nether,
    End,
}

impl Dimension {
    /// Offset subtracted from a raw surface-heightmap value to get the
    /// world-absolute Y of the surface block.
    pub fn surface_offset(self) -> isize {
        match self {
            Dimension::Overworld => 65,
            Dimension::Nether | Dimension::End => 1,
        }
    }

    /// World-Y values that can hold blocks, read side.
    pub fn y_range(self) -> Range<isize> {
        match self {
            Dimension::Overworld => -64..320,
            Dimension::Nether | Dimension::End => 0..256,
        }
    }

    /// Subdirectory of a singleplayer save that holds this dimension's
    /// region files.
    pub fn save_subdir(self) -> &'static str {
        match self {
            Dimension::Overworld => "region",
            Dimension::Nether => "DIM-1/region",
            Dimension::End => "DIM1/region",
        }
    }

    /// Folder name used by multiplayer cache layouts
    /// (`.../minecraft/<folder>/region`).
    pub fn cache_folder(self) -> &'static str {
        match self {
            Dimension::Overworld => "overworld",
            Dimension::Nether => "the_nether",
            Dimension::End => "the_end",
        }
    }
}
