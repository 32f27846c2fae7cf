//! Curves-table packing.
//!
//! The curves table is a row-major grid of RGBA-f32 texels, 4096 texels wide.
//! A curve spans two consecutive texels in one row: `[p1.x p1.y p2.x p2.y]`
//! then `[p3.x p3.y _ _]`. Consecutive curves of a contour share an endpoint,
//! so the second curve's `p1` is read from the previous curve's trailing `p3`
//! texel and chains overlap: `[p1 p2][p3 p2'][p3' p2''] …`.

use crate::curves::Curve;
use crate::format::TEXTURE_WIDTH;

/// Padding value for texels no live curve lookup may ever fetch.
const SENTINEL: f32 = -1.0;

/// The packed curves table, grown one curve at a time.
#[derive(Debug, Default)]
pub struct CurvesTable {
    floats: Vec<f32>,
}

impl CurvesTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a curve and assigns its `texel_index`.
    ///
    /// A first-of-contour curve must start on a texel boundary, and no curve
    /// may span two rows; both constraints are met by emitting sentinel
    /// padding before the curve's floats.
    pub fn push_curve(&mut self, curve: &mut Curve) {
        if curve.first && self.floats.len() % 4 != 0 {
            let pad = 4 - self.floats.len() % 4;
            self.floats.extend(std::iter::repeat(SENTINEL).take(pad));
        }

        // A curve placed in the last column would spill into the next row;
        // pad through the row end and one texel beyond, then re-emit p1.
        let new_row =
            (self.floats.len() / 4) % TEXTURE_WIDTH as usize == TEXTURE_WIDTH as usize - 1;
        if new_row {
            let pad = 8 - self.floats.len() % 4;
            self.floats.extend(std::iter::repeat(SENTINEL).take(pad));
        }

        if curve.first || new_row {
            curve.texel_index = (self.floats.len() / 4) as u32;
            debug_assert_eq!(self.floats.len() % 4, 0);
            self.floats.push(curve.p1[0]);
            self.floats.push(curve.p1[1]);
        } else {
            // Chained: p1 lives in the first half of the texel holding the
            // previous curve's p3.
            curve.texel_index = ((self.floats.len() as u32 / 2) - 1) / 2;
        }

        debug_assert_eq!(self.floats.len() % 2, 0);
        self.floats.push(curve.p2[0]);
        self.floats.push(curve.p2[1]);
        self.floats.push(curve.p3[0]);
        self.floats.push(curve.p3[1]);
    }

    /// Occupied texel count (trailing partial texel excluded, as on disk).
    pub fn texel_count(&self) -> u32 {
        (self.floats.len() / 4) as u32
    }

    pub fn rows(&self) -> u32 {
        self.texel_count().div_ceil(TEXTURE_WIDTH)
    }

    pub fn floats(&self) -> &[f32] {
        &self.floats
    }

    pub fn into_floats(self) -> Vec<f32> {
        self.floats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(points: &[[f32; 2]]) -> Vec<Curve> {
        points
            .windows(2)
            .enumerate()
            .map(|(i, w)| Curve::from_line(w[0], w[1], i == 0))
            .collect()
    }

    #[test]
    fn first_curve_layout() {
        let mut table = CurvesTable::new();
        let mut c = Curve::from_quad([1.0, 2.0], [3.0, 4.0], [5.0, 6.0], true);
        table.push_curve(&mut c);
        assert_eq!(c.texel_index, 0);
        assert_eq!(table.floats(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn chained_curve_reuses_trailing_endpoint() {
        let mut table = CurvesTable::new();
        let mut curves = chain(&[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]);
        for c in &mut curves {
            table.push_curve(c);
        }
        assert_eq!(curves[0].texel_index, 0);
        assert_eq!(curves[1].texel_index, 1);
        assert_eq!(curves[2].texel_index, 2);

        // Reading texels (i, i+1) must yield each curve's three points, with
        // p1 aliased onto the previous p3.
        let floats = table.floats();
        for c in &curves {
            let base = c.texel_index as usize * 4;
            assert_eq!([floats[base], floats[base + 1]], c.p1);
            assert_eq!([floats[base + 2], floats[base + 3]], c.p2);
            assert_eq!([floats[base + 4], floats[base + 5]], c.p3);
        }
    }

    #[test]
    fn contour_start_is_texel_aligned() {
        let mut table = CurvesTable::new();
        let mut curves = chain(&[[0.0, 0.0], [10.0, 0.0], [0.0, 10.0]]);
        for c in &mut curves {
            table.push_curve(c);
        }
        // Table now holds 10 floats; a fresh contour pads to the boundary.
        let mut next = Curve::from_line([50.0, 50.0], [60.0, 50.0], true);
        table.push_curve(&mut next);
        assert_eq!(next.texel_index, 3);
        assert_eq!(table.floats()[10], SENTINEL);
        assert_eq!(table.floats()[11], SENTINEL);
        assert_eq!(table.floats()[12], 50.0);
    }

    #[test]
    fn row_boundary_restarts_curve() {
        let mut table = CurvesTable::new();
        // One long chain: 6 floats for the first curve, 4 per link. 4095
        // links put the trailing endpoint in the row's last column.
        let mut first = Curve::from_line([0.0, 0.0], [1.0, 1.0], true);
        table.push_curve(&mut first);
        let mut prev = first.p3;
        for i in 0..4094 {
            let p3 = [i as f32, i as f32];
            let mut link = Curve::from_line(prev, p3, false);
            table.push_curve(&mut link);
            prev = p3;
        }
        assert_eq!(table.floats().len(), 4 * 4095 + 2);

        let mut overflowing = Curve::from_line(prev, [7.0, 7.0], false);
        table.push_curve(&mut overflowing);

        // Six sentinels close out the row, then the curve restarts on the
        // next row with p1 written again.
        let floats = table.floats();
        assert!(floats[16382..16388].iter().all(|&f| f == SENTINEL));
        assert_eq!(overflowing.texel_index, 4097);
        let base = overflowing.texel_index as usize * 4;
        assert_eq!([floats[base], floats[base + 1]], overflowing.p1);
        assert_eq!([floats[base + 4], floats[base + 5]], [7.0, 7.0]);
    }

    #[test]
    fn packed_curves_never_span_rows() {
        let mut table = CurvesTable::new();
        let mut prev = [0.0, 0.0];
        let mut indices = Vec::new();
        let mut first = true;
        for i in 0..6000 {
            let p3 = [(i % 100) as f32, (i / 100) as f32];
            let mut c = Curve::from_line(prev, p3, first);
            table.push_curve(&mut c);
            indices.push(c.texel_index);
            prev = p3;
            first = false;
        }
        for t in indices {
            assert_eq!(t / TEXTURE_WIDTH, (t + 1) / TEXTURE_WIDTH);
        }
    }
}
