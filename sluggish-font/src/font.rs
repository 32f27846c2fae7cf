//! TrueType glyph source.
//!
//! [`Font`] wraps a parsed face and turns one glyph at a time into the
//! normalized quadratic curve list the encoder consumes. Outlines are
//! translated so the glyph bounding box's lower-left corner is the origin.

use thiserror::Error;
use ttf_parser::{Face, FaceParsingError, OutlineBuilder};

use crate::curves::{Curve, Point};

/// Errors that can occur when parsing a font file.
#[derive(Error, Debug)]
pub enum FontError {
    #[error("failed to parse font: {0}")]
    Parse(#[from] FaceParsingError),
}

/// Per-glyph reasons a code point cannot be encoded. These are recoverable:
/// the encoder skips the glyph and keeps going.
#[derive(Error, Debug)]
pub enum GlyphError {
    #[error("U+{0:04X} is not mapped by the font")]
    Unmapped(u32),
    #[error("U+{0:04X} has no vertices")]
    Empty(u32),
    #[error("U+{0:04X} has cubic curves")]
    Cubic(u32),
}

/// A glyph's outline as a flat quadratic curve list, plus its bounding box
/// dimensions in font units.
#[derive(Debug, Clone)]
pub struct GlyphOutline {
    pub curves: Vec<Curve>,
    pub width: u32,
    pub height: u32,
}

/// A handle to a parsed TrueType font.
pub struct Font<'a> {
    face: Face<'a>,
}

impl<'a> Font<'a> {
    /// Parses raw TTF/OTF data.
    pub fn from_bytes(data: &'a [u8]) -> Result<Self, FontError> {
        let face = Face::parse(data, 0)?;
        Ok(Self { face })
    }

    /// Extracts the normalized outline of `code_point`.
    ///
    /// Glyphs with cubic contours are rejected whole: the banded format only
    /// stores quadratics.
    pub fn outline(&self, code_point: u32) -> Result<GlyphOutline, GlyphError> {
        let ch = char::from_u32(code_point).ok_or(GlyphError::Unmapped(code_point))?;
        let glyph_id = self
            .face
            .glyph_index(ch)
            .ok_or(GlyphError::Unmapped(code_point))?;

        let bbox = self
            .face
            .glyph_bounding_box(glyph_id)
            .ok_or(GlyphError::Empty(code_point))?;

        let mut sink = OutlineSink::new(bbox.x_min as f32, bbox.y_min as f32);
        let _ = self.face.outline_glyph(glyph_id, &mut sink);

        if sink.has_cubic() {
            return Err(GlyphError::Cubic(code_point));
        }
        let curves = sink.into_curves();
        if curves.is_empty() {
            return Err(GlyphError::Empty(code_point));
        }

        Ok(GlyphOutline {
            curves,
            width: (bbox.x_max - bbox.x_min) as u32,
            height: (bbox.y_max - bbox.y_min) as u32,
        })
    }
}

/// Accumulates contour commands into the normalized curve list.
///
/// Lines become quadratics with a floored-midpoint control; an open contour is
/// closed with a synthesized line back to its starting point. Cubics are not
/// representable and only flagged.
pub struct OutlineSink {
    curves: Vec<Curve>,
    origin: Point,
    cursor: Point,
    start: Point,
    first: bool,
    cubic: bool,
}

impl OutlineSink {
    /// `origin_x`/`origin_y` is the glyph bounding box's lower-left corner;
    /// it is subtracted from every incoming coordinate.
    pub fn new(origin_x: f32, origin_y: f32) -> Self {
        Self {
            curves: Vec::with_capacity(32),
            origin: [origin_x, origin_y],
            cursor: [0.0, 0.0],
            start: [0.0, 0.0],
            first: false,
            cubic: false,
        }
    }

    pub fn has_cubic(&self) -> bool {
        self.cubic
    }

    /// Finishes accumulation and runs the control-point repair pass.
    pub fn into_curves(mut self) -> Vec<Curve> {
        for curve in &mut self.curves {
            curve.repair_control();
        }
        self.curves
    }

    fn push(&mut self, curve: Curve) {
        self.curves.push(curve);
        self.first = false;
    }
}

impl OutlineBuilder for OutlineSink {
    fn move_to(&mut self, x: f32, y: f32) {
        self.cursor = [x - self.origin[0], y - self.origin[1]];
        self.start = self.cursor;
        self.first = true;
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p3 = [x - self.origin[0], y - self.origin[1]];
        let first = self.first;
        self.push(Curve::from_line(self.cursor, p3, first));
        self.cursor = p3;
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let p2 = [x1 - self.origin[0], y1 - self.origin[1]];
        let p3 = [x - self.origin[0], y - self.origin[1]];
        let first = self.first;
        self.push(Curve::from_quad(self.cursor, p2, p3, first));
        self.cursor = p3;
    }

    fn curve_to(&mut self, _x1: f32, _y1: f32, _x2: f32, _y2: f32, _x: f32, _y: f32) {
        self.cubic = true;
    }

    fn close(&mut self) {
        if (self.cursor[0] - self.start[0]).abs() > 1e-4
            || (self.cursor[1] - self.start[1]).abs() > 1e-4
        {
            let first = self.first;
            let (p1, p3) = (self.cursor, self.start);
            self.push(Curve::from_line(p1, p3, first));
            self.cursor = self.start;
        }
    }
}
