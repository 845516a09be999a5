//! Integer placement and extent math shared by the compositor and the
//! boundary policy.
//!
//! Both sides use the same half-open `[0, width) x [0, height)` test: a sprite
//! "fits" exactly when every one of its pixels would pass [`Extent::contains`].

use serde::{Deserialize, Serialize};

/// Top-left placement of a sprite in buffer coordinates. May be negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Width and height of a raster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Is the cell (x, y) addressable?
    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && x < self.width as i64 && y >= 0 && y < self.height as i64
    }

    /// Does a `inner`-sized rectangle placed at `pos` lie entirely inside?
    ///
    /// Equivalent to `contains` holding for both the top-left and the
    /// bottom-right pixel of the rectangle.
    pub fn fits(&self, pos: Position, inner: Extent) -> bool {
        let (x, y) = (pos.x as i64, pos.y as i64);
        x >= 0
            && x <= self.width as i64 - inner.width as i64
            && y >= 0
            && y <= self.height as i64 - inner.height as i64
    }

    /// Top-left position that centres `inner`, using truncating division on
    /// each half separately
    pub fn centered(&self, inner: Extent) -> Position {
        Position {
            x: (self.width / 2) as i32 - (inner.width / 2) as i32,
            y: (self.height / 2) as i32 - (inner.height / 2) as i32,
        }
    }

    #[inline]
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_half_open() {
        let e = Extent::new(10, 5);
        assert!(e.contains(0, 0));
        assert!(e.contains(9, 4));
        assert!(!e.contains(10, 4));
        assert!(!e.contains(9, 5));
        assert!(!e.contains(-1, 0));
    }

    #[test]
    fn test_fits_matches_corner_containment() {
        let outer = Extent::new(20, 12);
        let inner = Extent::new(4, 3);
        for x in -6..24 {
            for y in -6..16 {
                let pos = Position::new(x, y);
                let corners = outer.contains(x as i64, y as i64)
                    && outer.contains(
                        (x + inner.width as i32 - 1) as i64,
                        (y + inner.height as i32 - 1) as i64,
                    );
                assert_eq!(outer.fits(pos, inner), corners, "mismatch at {:?}", pos);
            }
        }
    }

    #[test]
    fn test_centered_truncates_each_half() {
        let outer = Extent::new(1024, 768);
        assert_eq!(outer.centered(Extent::new(64, 64)), Position::new(480, 352));
        // 11/2 = 5, 3/2 = 1
        assert_eq!(Extent::new(11, 11).centered(Extent::new(3, 3)), Position::new(4, 4));
    }
}
