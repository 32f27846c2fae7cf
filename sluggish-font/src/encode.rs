//! Per-font encoding context.
//!
//! The [`Encoder`] owns every buffer that grows across glyphs: the packed
//! curves table, the band tables and the codepoint directory. Feed it glyphs
//! one at a time, then call [`Encoder::finish`] to get a serializable
//! [`SluggishFont`].

use log::{debug, warn};
use thiserror::Error;

use crate::bands::BandTables;
use crate::font::{Font, GlyphOutline};
use crate::format::{CodePointDesc, SluggishFont, MAX_BAND_COUNT, TEXTURE_WIDTH};
use crate::pack::CurvesTable;

/// Fatal encoding failures. Per-glyph problems are not errors; they are
/// skipped and counted.
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("too much band data generated to be indexed, try a lower band count")]
    BandCapacity,
    #[error("too much curve data generated")]
    CurvesCapacity,
    #[error("no valid code point found")]
    NoCodePoints,
    #[error("too many code points for one font file")]
    TooManyCodePoints,
}

/// Encodes one font's glyphs into the banded representation.
pub struct Encoder {
    band_count: u32,
    curves: CurvesTable,
    bands: BandTables,
    code_points: Vec<CodePointDesc>,
    ignored: u32,
}

impl Encoder {
    /// `band_count` is the requested bands per axis, in `[1, MAX_BAND_COUNT]`;
    /// small glyphs get fewer.
    pub fn new(band_count: u32) -> Self {
        debug_assert!((1..=MAX_BAND_COUNT).contains(&band_count));
        Self {
            band_count,
            curves: CurvesTable::new(),
            bands: BandTables::new(),
            code_points: Vec::new(),
            ignored: 0,
        }
    }

    /// Extracts and encodes one code point, skipping (with a warning) glyphs
    /// the format cannot represent. Returns whether the glyph was encoded.
    pub fn encode_code_point(&mut self, font: &Font, code_point: u32) -> Result<bool, EncodeError> {
        match font.outline(code_point) {
            Ok(outline) => {
                self.add_glyph(code_point, outline)?;
                Ok(true)
            }
            Err(reason) => {
                warn!("{reason}");
                self.ignored += 1;
                Ok(false)
            }
        }
    }

    /// Encodes an already-normalized outline.
    pub fn add_glyph(
        &mut self,
        code_point: u32,
        mut outline: GlyphOutline,
    ) -> Result<(), EncodeError> {
        let size_x = 1 + outline.width;
        let size_y = 1 + outline.height;
        let mut band_count = self.band_count;
        if size_x < band_count || size_y < band_count {
            band_count = (size_x.min(size_y) / 2).max(1);
        }

        let bands_texel_index = self.bands.next_glyph_texel_index();
        if bands_texel_index / TEXTURE_WIDTH >= 0xFFFF {
            return Err(EncodeError::CurvesCapacity);
        }

        for curve in &mut outline.curves {
            self.curves.push_curve(curve);
        }

        let band_dim_x = size_x.div_ceil(band_count);
        let band_dim_y = size_y.div_ceil(band_count);
        self.bands
            .add_glyph(&mut outline.curves, band_count, band_dim_x, band_dim_y)?;

        self.code_points.push(CodePointDesc {
            code_point,
            width: outline.width,
            height: outline.height,
            band_count,
            band_dim_x,
            band_dim_y,
            bands_tex_coord_x: (bands_texel_index % TEXTURE_WIDTH) as u16,
            bands_tex_coord_y: (bands_texel_index / TEXTURE_WIDTH) as u16,
        });
        Ok(())
    }

    /// Glyphs skipped so far.
    pub fn ignored(&self) -> u32 {
        self.ignored
    }

    /// Concatenates the band tables, rewriting every descriptor's relative
    /// `texel_offset` to an absolute offset into the unified table.
    pub fn finish(self) -> Result<SluggishFont, EncodeError> {
        if self.code_points.is_empty() {
            return Err(EncodeError::NoCodePoints);
        }
        if self.code_points.len() > u16::MAX as usize {
            return Err(EncodeError::TooManyCodePoints);
        }
        if self.curves.rows() > u16::MAX as u32 {
            return Err(EncodeError::CurvesCapacity);
        }

        let header_texels = self.bands.header_texel_count();
        let (mut headers, curve_refs) = self.bands.into_parts();
        let total_texels = header_texels + (curve_refs.len() / 2) as u32;
        for desc in headers.chunks_exact_mut(2) {
            let absolute = desc[1] as u32 + header_texels;
            if absolute >= 0xFFFF || absolute >= total_texels {
                return Err(EncodeError::BandCapacity);
            }
            desc[1] = absolute as u16;
        }

        let mut band_words = headers;
        band_words.extend_from_slice(&curve_refs);

        debug!(
            "encoded {} code points: {} curve texels, {} band texels",
            self.code_points.len(),
            self.curves.texel_count(),
            total_texels
        );

        Ok(SluggishFont {
            code_points: self.code_points,
            curve_floats: self.curves.into_floats(),
            band_words,
        })
    }
}
