//! Axis-aligned frame regions
//!
//! Every detection is reported as a `Region` in full-frame pixel coordinates.
//! A region with zero area means "nothing detected".

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rectangle in frame pixel coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    /// Create a new region
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// The empty region, reported when no signal is found
    pub const fn empty() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Area in pixels
    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    /// True when the region carries no detection
    pub fn is_empty(&self) -> bool {
        self.area() == 0
    }

    /// Exclusive right edge
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Shift by an offset, e.g. from zone-local to frame coordinates
    pub fn translate(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Grow the region by `margin` on every side, clamped to the frame.
    ///
    /// The origin is clamped at zero first and the size is then capped at the
    /// remaining frame extent, so a region pushed against the left or top edge
    /// keeps its full grown size where the frame allows it.
    pub fn expand_clamped(self, margin: i32, frame_width: i32, frame_height: i32) -> Self {
        let x = (self.x - margin).max(0);
        let y = (self.y - margin).max(0);
        let width = (frame_width - x).min(self.width + margin * 2);
        let height = (frame_height - y).min(self.height + margin * 2);

        Self::new(x, y, width.max(0), height.max(0))
    }

    /// Intersection with another region, empty when they do not overlap
    pub fn intersect(&self, other: &Region) -> Region {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());

        if x2 <= x1 || y2 <= y1 {
            return Region::empty();
        }

        Region::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// Check whether the region lies fully inside a frame of the given size
    pub fn fits_within(&self, frame_width: i32, frame_height: i32) -> bool {
        self.x >= 0 && self.y >= 0 && self.right() <= frame_width && self.bottom() <= frame_height
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}x{}]", self.x, self.y, self.width, self.height)
    }
}
