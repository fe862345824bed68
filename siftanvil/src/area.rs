use crate::RCoord;

/// An inclusive rectangle of chunk coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corners {
    pub x_min: isize,
    pub x_max: isize,
    pub z_min: isize,
    pub z_max: isize,
}

impl Corners {
    /// Build a rectangle from two opposite corners, in either order.
    pub fn new(x1: isize, x2: isize, z1: isize, z2: isize) -> Self {
        Self {
            x_min: x1.min(x2),
            x_max: x1.max(x2),
            z_min: z1.min(z2),
            z_max: z1.max(z2),
        }
    }

    /// The chunk rectangle covering two opposite corners given in block
    /// coordinates.
    pub fn from_blocks(p1: (isize, isize), p2: (isize, isize)) -> Self {
        Self::new(
            p1.0.div_euclid(16),
            p2.0.div_euclid(16),
            p1.1.div_euclid(16),
            p2.1.div_euclid(16),
        )
    }

    /// Grow the rectangle by `margin` chunks on every side.
    pub fn expand(self, margin: isize) -> Self {
        Self {
            x_min: self.x_min - margin,
            x_max: self.x_max + margin,
            z_min: self.z_min - margin,
            z_max: self.z_max + margin,
        }
    }

    pub fn contains(&self, cx: isize, cz: isize) -> bool {
        (self.x_min..=self.x_max).contains(&cx) && (self.z_min..=self.z_max).contains(&cz)
    }

    /// Region coordinates covered by the rectangle, row-major.
    pub fn regions(&self) -> Vec<(RCoord, RCoord)> {
        let mut out = Vec::new();
        for rz in self.z_min.div_euclid(32)..=self.z_max.div_euclid(32) {
            for rx in self.x_min.div_euclid(32)..=self.x_max.div_euclid(32) {
                out.push((RCoord(rx), RCoord(rz)));
            }
        }
        out
    }
}
