//! sluggish-font: banded quadratic Bézier font encoding and rendering.
//!
//! A TrueType glyph's outline is flattened into quadratic curves, packed into
//! a row-addressable curves table, and indexed by horizontal and vertical
//! bands. Rendering shoots two rays per pixel against only the curves whose
//! bands cross that pixel, so glyphs scale to arbitrary resolution straight
//! from the curve data.
//!
//! ```ignore
//! let font = Font::from_bytes(&ttf_data)?;
//! let mut encoder = Encoder::new(16);
//! for cp in 33..=126 {
//!     encoder.encode_code_point(&font, cp)?;
//! }
//! let encoded = encoder.finish()?;
//! let image = Rasterizer::new(&encoded).render('A' as u32, 1024, 1024, true)?;
//! ```

pub mod bands;
pub mod curves;
pub mod encode;
pub mod font;
pub mod format;
pub mod math;
pub mod pack;
pub mod rasterizer;

pub use encode::{EncodeError, Encoder};
pub use font::{Font, FontError, GlyphError, GlyphOutline, OutlineSink};
pub use format::{
    CodePointDesc, FormatError, SluggishFont, EXTENSION, MAX_BAND_COUNT, TEXTURE_WIDTH,
};
pub use rasterizer::{Image, RasterError, Rasterizer};
