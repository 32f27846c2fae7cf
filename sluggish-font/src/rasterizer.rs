//! Software rasterizer for banded fonts.
//!
//! Each output pixel shoots one ray along −x against the curves of its
//! horizontal band and one along −y against its vertical band. Per curve, a
//! sign-pattern lookup classifies how the two quadratic roots cross the ray,
//! and the crossing positions accumulate into signed coverage. The two axes
//! are averaged into the pixel's alpha, which doubles as cheap antialiasing.

use thiserror::Error;

use crate::format::{SluggishFont, TEXTURE_WIDTH};
use crate::math::{bezier_at, max3};

/// Truth table over the sign bits of (p1, p2, p3) on the ray-normal axis,
/// two bits per pattern: bit 0 means the root `(b - d) / a` crosses and adds
/// coverage, bit 1 means the root `(b + d) / a` crosses and subtracts.
///
///   p3 p2 p1   code
///    -  -  -    0      no crossing
///    -  -  +    1      entering crossing on the first root
///    -  +  -    3      both roots cross
///    -  +  +    1
///    +  -  -    2      exiting crossing on the second root
///    +  -  +    3
///    +  +  -    2
///    +  +  +    0
///
/// Packed with pattern 0 in the low bits: 0b00_10_11_10_01_11_01_00 = 0x2E74.
const CROSSING_CLASSES: u32 = 0x2E74;

/// Rasterization failures. Missing code points are reported per glyph so a
/// range render can keep going.
#[derive(Error, Debug)]
pub enum RasterError {
    #[error("code point U+{0:04X} not present in the font")]
    MissingCodePoint(u32),
}

/// An 8-bit grayscale coverage image, row 0 at the top.
#[derive(Debug, Clone)]
pub struct Image {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Renders glyphs from a loaded font.
pub struct Rasterizer<'a> {
    font: &'a SluggishFont,
}

impl<'a> Rasterizer<'a> {
    pub fn new(font: &'a SluggishFont) -> Self {
        Self { font }
    }

    /// Rasterizes `code_point` into a `width` × `height` image. With
    /// `preserve_aspect` the glyph keeps its aspect ratio inside the image;
    /// otherwise it stretches to fill it.
    pub fn render(
        &self,
        code_point: u32,
        width: u32,
        height: u32,
        preserve_aspect: bool,
    ) -> Result<Image, RasterError> {
        let cp = self
            .font
            .code_points
            .iter()
            .find(|c| c.code_point == code_point)
            .ok_or(RasterError::MissingCodePoint(code_point))?;

        let mut scale_x = cp.width as f32 / width as f32;
        let mut scale_y = cp.height as f32 / height as f32;
        if preserve_aspect {
            let s = scale_x.max(scale_y);
            scale_x = s;
            scale_y = s;
        }
        let pixels_per_em_x = 1.0 / scale_x;
        let pixels_per_em_y = 1.0 / scale_y;

        let header = cp.bands_tex_coord_y as u32 * TEXTURE_WIDTH + cp.bands_tex_coord_x as u32;
        let mut data = vec![0u8; width as usize * height as usize];

        for y in 0..height {
            // Image rows run top-down; glyph space runs bottom-up.
            let yi = height - 1 - y;
            let fy0 = y as f32 * scale_y;
            let h_band = (fy0 / cp.band_dim_y as f32) as u32;
            if h_band >= cp.band_count {
                continue;
            }
            let h_desc = self.font.band_texel(header + h_band);

            for x in 0..width {
                let fx0 = x as f32 * scale_x;
                let v_band = (fx0 / cp.band_dim_x as f32) as u32;
                if v_band >= cp.band_count {
                    continue;
                }
                let v_desc = self.font.band_texel(header + cp.band_count + v_band);

                let coverage_x = self.trace_ray(0, h_desc, fx0, fy0, pixels_per_em_x);
                let coverage_y = self.trace_ray(1, v_desc, fx0, fy0, pixels_per_em_y);
                let coverage =
                    (coverage_x.abs().min(1.0) + coverage_y.abs().min(1.0)) * 0.5;
                data[(yi * width + x) as usize] = (coverage * 255.0) as u8;
            }
        }

        Ok(Image {
            data,
            width,
            height,
        })
    }

    /// Intersects the ray from pixel `(fx0, fy0)` along negative `axis0` with
    /// every curve in the band, returning signed coverage.
    fn trace_ray(
        &self,
        axis0: usize,
        (curve_count, texel_offset): (u16, u16),
        fx0: f32,
        fy0: f32,
        pixels_per_em: f32,
    ) -> f32 {
        let axis1 = 1 - axis0;
        let mut coverage = 0.0f32;

        for i in 0..curve_count as u32 {
            let (col, row) = self.font.band_texel(texel_offset as u32 + i);
            let base = (row as usize * TEXTURE_WIDTH as usize + col as usize) * 4;
            let t = &self.font.curve_floats[base..base + 6];

            // Curve points relative to the pixel.
            let p1 = [t[0] - fx0, t[1] - fy0];
            let p2 = [t[2] - fx0, t[3] - fy0];
            let p3 = [t[4] - fx0, t[5] - fy0];

            // Curves arrive sorted by maximum ray-axis coordinate; once one
            // sits more than half a pixel behind the pixel, they all do.
            if max3(p1[axis0], p2[axis0], p3[axis0]) * pixels_per_em < -0.5 {
                break;
            }

            // Roots of a*t^2 - 2*b*t + c = 0 on the ray-normal axis.
            let a = p1[axis1] - 2.0 * p2[axis1] + p3[axis1];
            let b = p1[axis1] - p2[axis1];
            let c = p1[axis1];
            let (t1, t2) = if a.abs() < 1e-4 {
                // Degenerates to the linear equation c - 2*b*t = 0.
                let t = c / (2.0 * b);
                (t, t)
            } else {
                let d = (b * b - a * c).max(0.0).sqrt();
                ((b - d) / a, (b + d) / a)
            };

            let pattern = ((p1[axis1] > 0.0) as u32) * 2
                + ((p2[axis1] > 0.0) as u32) * 4
                + ((p3[axis1] > 0.0) as u32) * 8;
            let code = CROSSING_CLASSES >> pattern;
            if code & 1 != 0 {
                let r = bezier_at(p1[axis0], p2[axis0], p3[axis0], t1);
                coverage += (0.5 + r * pixels_per_em).clamp(0.0, 1.0);
            }
            if code & 2 != 0 {
                let r = bezier_at(p1[axis0], p2[axis0], p3[axis0], t2);
                coverage -= (0.5 + r * pixels_per_em).clamp(0.0, 1.0);
            }
        }

        coverage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::Encoder;
    use crate::font::GlyphOutline;
    use crate::curves::Curve;

    fn classes(pattern: u32) -> u32 {
        (CROSSING_CLASSES >> (2 * pattern)) & 3
    }

    #[test]
    fn crossing_table_matches_reference() {
        // Patterns indexed s1 + 2*s2 + 4*s3 over the > 0 signs of p1..p3.
        let reference = [0, 1, 3, 1, 2, 3, 2, 0];
        for (pattern, expected) in reference.into_iter().enumerate() {
            assert_eq!(classes(pattern as u32), expected, "pattern {pattern:03b}");
        }
    }

    #[test]
    fn crossing_table_is_winding_symmetric() {
        // Flipping all three signs reverses the traversal, which swaps the
        // entering and exiting roots.
        for pattern in 0u32..8 {
            let flipped = !pattern & 7;
            let swapped = match classes(pattern) {
                1 => 2,
                2 => 1,
                other => other,
            };
            assert_eq!(classes(flipped), swapped);
        }
    }

    fn encoded_square() -> SluggishFont {
        let points = [
            [0.0, 0.0],
            [100.0, 0.0],
            [100.0, 100.0],
            [0.0, 100.0],
        ];
        let curves: Vec<Curve> = (0..4)
            .map(|i| Curve::from_line(points[i], points[(i + 1) % 4], i == 0))
            .collect();
        let mut encoder = Encoder::new(2);
        encoder
            .add_glyph(
                65,
                GlyphOutline {
                    curves,
                    width: 100,
                    height: 100,
                },
            )
            .unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn square_fills_solid() {
        let font = encoded_square();
        let image = Rasterizer::new(&font).render(65, 32, 32, true).unwrap();

        // Interior pixels are fully covered.
        for y in 2..30 {
            for x in 2..30 {
                assert_eq!(image.data[y * 32 + x], 255, "pixel ({x}, {y})");
            }
        }
        // The corner pixel sits exactly on both edges: half coverage on
        // each axis.
        assert_eq!(image.data[31 * 32], 127);
    }

    #[test]
    fn missing_code_point_is_reported() {
        let font = encoded_square();
        let err = Rasterizer::new(&font).render(90, 32, 32, true).unwrap_err();
        assert!(matches!(err, RasterError::MissingCodePoint(90)));
    }

    #[test]
    fn tangent_touch_contributes_nothing() {
        // A curve dipping to the ray without crossing it: signs (+, 0, +)
        // classify as both roots, whose contributions cancel at the tangent
        // point.
        let font = SluggishFont {
            code_points: encoded_square().code_points,
            curve_floats: vec![40.0, 55.0, 60.0, 50.0, 60.0, 55.0],
            band_words: vec![1, 1, 0, 0],
        };
        let raster = Rasterizer::new(&font);
        let coverage = raster.trace_ray(0, (1, 1), 50.0, 50.0, 0.32);
        assert!(coverage.abs() < 1e-3, "coverage = {coverage}");
    }
}
