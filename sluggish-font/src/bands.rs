//! Band index construction.
//!
//! A band is an axis-aligned slab of the glyph bounding box. Horizontal bands
//! stack bottom to top, vertical bands run left to right; each lists the
//! curves whose span crosses it, so the rasterizer only intersects a handful
//! of curves per pixel.

use crate::curves::Curve;
use crate::encode::EncodeError;
use crate::format::TEXTURE_WIDTH;

/// The growing bands table: per-glyph descriptor headers and per-band curve
/// references, kept separate until the final fix-up concatenates them.
#[derive(Debug, Default)]
pub struct BandTables {
    headers: Vec<u16>,
    curve_refs: Vec<u16>,
}

impl BandTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Texel index the next glyph's header region will start at.
    pub fn next_glyph_texel_index(&self) -> u32 {
        (self.headers.len() / 2) as u32
    }

    pub fn header_texel_count(&self) -> u32 {
        (self.headers.len() / 2) as u32
    }

    pub fn headers(&self) -> &[u16] {
        &self.headers
    }

    pub fn curve_refs(&self) -> &[u16] {
        &self.curve_refs
    }

    pub fn into_parts(self) -> (Vec<u16>, Vec<u16>) {
        (self.headers, self.curve_refs)
    }

    /// Emits both band passes for one glyph. Curves are reordered in place;
    /// their `texel_index` must already be assigned.
    pub fn add_glyph(
        &mut self,
        curves: &mut [Curve],
        band_count: u32,
        band_dim_x: u32,
        band_dim_y: u32,
    ) -> Result<(), EncodeError> {
        self.add_axis(curves, 0, band_count, band_dim_y)?;
        self.add_axis(curves, 1, band_count, band_dim_x)?;
        Ok(())
    }

    /// One band pass. `ray_axis` is the axis the rasterizer's ray travels
    /// along (0 for horizontal bands, 1 for vertical); curves are tested
    /// against the band on the other axis.
    fn add_axis(
        &mut self,
        curves: &mut [Curve],
        ray_axis: usize,
        band_count: u32,
        band_dim: u32,
    ) -> Result<(), EncodeError> {
        let test_axis = 1 - ray_axis;

        // The rasterizer scans a band's curves in order and stops at the
        // first one entirely behind the pixel along the negative ray
        // direction. That early exit requires a stable sort by maximum
        // ray-axis coordinate, descending.
        curves.sort_by(|a, b| b.max_coord(ray_axis).total_cmp(&a.max_coord(ray_axis)));

        let band_dim = band_dim as f32;
        let mut band_min = 0.0f32;
        let mut band_max = band_dim;
        for _ in 0..band_count {
            let texel_offset = (self.curve_refs.len() / 2) as u32;
            let mut curve_count = 0u32;

            for curve in curves.iter() {
                // A curve flat on the test axis never crosses a ray shot
                // along the other axis.
                if curve.is_flat(test_axis) {
                    continue;
                }
                if curve.min_coord(test_axis) > band_max
                    || curve.max_coord(test_axis) < band_min
                {
                    continue;
                }

                let row = curve.texel_index / TEXTURE_WIDTH;
                if row > u16::MAX as u32 {
                    return Err(EncodeError::CurvesCapacity);
                }
                self.curve_refs
                    .push((curve.texel_index % TEXTURE_WIDTH) as u16);
                self.curve_refs.push(row as u16);
                curve_count += 1;
            }

            if texel_offset >= 0xFFFF || self.curve_refs.len() / 2 >= 0xFFFF {
                return Err(EncodeError::BandCapacity);
            }
            self.headers.push(curve_count as u16);
            self.headers.push(texel_offset as u16);

            band_min += band_dim;
            band_max += band_dim;
        }
        Ok(())
    }
}
