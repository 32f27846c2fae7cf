//! Quadratic Bézier curve primitives in glyph-local coordinates.

use crate::math::{max3, min3};

pub type Point = [f32; 2];

/// A quadratic Bézier segment with endpoints `p1`, `p3` and control `p2`.
///
/// Coordinates are in font units, translated so the glyph bounding box's
/// lower-left corner is the origin. `texel_index` is assigned by the packer
/// and names the curves-table texel holding `p1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Curve {
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
    pub texel_index: u32,
    /// First curve of a contour.
    pub first: bool,
}

impl Curve {
    pub fn from_quad(p1: Point, p2: Point, p3: Point, first: bool) -> Self {
        Self {
            p1,
            p2,
            p3,
            texel_index: 0,
            first,
        }
    }

    /// Builds the quadratic form of a straight line. The control point is the
    /// floored midpoint, keeping it on the font-unit integer grid.
    pub fn from_line(p1: Point, p3: Point, first: bool) -> Self {
        let p2 = [
            ((p1[0] + p3[0]) / 2.0).floor(),
            ((p1[1] + p3[1]) / 2.0).floor(),
        ];
        Self::from_quad(p1, p2, p3, first)
    }

    /// Moves a control point that coincides with either endpoint to the exact
    /// midpoint, so the quadratic form stays nondegenerate.
    pub fn repair_control(&mut self) {
        if self.p2 == self.p1 || self.p2 == self.p3 {
            self.p2 = [
                (self.p1[0] + self.p3[0]) / 2.0,
                (self.p1[1] + self.p3[1]) / 2.0,
            ];
        }
    }

    #[inline]
    pub fn min_coord(&self, axis: usize) -> f32 {
        min3(self.p1[axis], self.p2[axis], self.p3[axis])
    }

    #[inline]
    pub fn max_coord(&self, axis: usize) -> f32 {
        max3(self.p1[axis], self.p2[axis], self.p3[axis])
    }

    /// True when all three points share one coordinate, i.e. the curve is
    /// perfectly horizontal (`axis` = 1) or perfectly vertical (`axis` = 0).
    #[inline]
    pub fn is_flat(&self, axis: usize) -> bool {
        self.p1[axis] == self.p2[axis] && self.p2[axis] == self.p3[axis]
    }
}
