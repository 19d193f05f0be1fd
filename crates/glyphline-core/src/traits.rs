//! The contracts between stages
//!
//! Three traits, one per seam. The pipeline only ever talks to these, so a
//! font backend, rasterizer or file format can be swapped without touching
//! the code that walks the string.
//!
//! - [`FontModel`] - outlines and metrics in design units
//! - [`Rasterizer`] - outlines become coverage masks
//! - [`Exporter`] - a finished canvas becomes file bytes

use crate::{
    canvas::Canvas,
    error::{FontError, Result},
    types::*,
    HintingMode,
};

/// Read-only view of one font face
///
/// ```ignore
/// struct MyFont;
///
/// impl FontModel for MyFont {
///     fn units_per_em(&self) -> u16 { 1000 }
///     fn ascent_units(&self) -> i16 { 800 }
///     fn descent_units(&self) -> i16 { 200 }
///     fn glyph_for(&self, ch: char) -> Result<Glyph, FontError> {
///         Err(FontError::GlyphNotFound(ch))
///     }
/// }
/// ```
pub trait FontModel: Send + Sync {
    /// Design units per em, never zero for a loaded face
    fn units_per_em(&self) -> u16;

    /// Outline and advance for `ch`
    ///
    /// Fails with [`FontError::GlyphNotFound`] when the face has no mapping;
    /// callers substitute [`Glyph::empty`].
    fn glyph_for(&self, ch: char) -> std::result::Result<Glyph, FontError>;

    /// Ascender above the baseline, in design units
    fn ascent_units(&self) -> i16;

    /// Descender below the baseline as a positive magnitude, in design units
    fn descent_units(&self) -> i16;

    /// Face ascent and descent at `point_size`, each rounded up to a pixel
    fn face_metrics(&self, point_size: f32) -> FaceMetrics {
        let upem = self.units_per_em();
        FaceMetrics {
            ascent: ceil_pixels(self.ascent_units(), point_size, upem),
            descent: ceil_pixels(self.descent_units(), point_size, upem),
        }
    }
}

/// `ceil(units * point_size / upem)`, clamped at zero
///
/// The product is taken before the division so that exact results such as
/// `800 * 10 / 1000` stay exact and do not ceil up to the next pixel.
pub fn ceil_pixels(units: i16, point_size: f32, units_per_em: u16) -> u32 {
    if units_per_em == 0 {
        return 0;
    }
    let px = (units as f64 * point_size as f64 / units_per_em as f64).ceil();
    if px.is_finite() && px > 0.0 {
        px as u32
    } else {
        0
    }
}

/// Turns one glyph outline into a coverage mask
pub trait Rasterizer: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Rasterize with the pen on a whole pixel
    fn rasterize(
        &self,
        glyph: &Glyph,
        point_size: f32,
        hinting: HintingMode,
    ) -> Result<RasterizedGlyph> {
        self.rasterize_at(glyph, point_size, hinting, 0.0)
    }

    /// Rasterize with the outline shifted right by `x_offset` pixels
    ///
    /// `x_offset` is the sub-pixel pen phase, in `[0, 1)`.
    fn rasterize_at(
        &self,
        glyph: &Glyph,
        point_size: f32,
        hinting: HintingMode,
        x_offset: f32,
    ) -> Result<RasterizedGlyph>;
}

/// Encodes a finished canvas into file bytes
pub trait Exporter: Send + Sync {
    fn name(&self) -> &'static str;

    fn export(&self, canvas: &Canvas) -> Result<Vec<u8>>;

    /// File extension without the dot
    fn extension(&self) -> &'static str;

    fn mime_type(&self) -> &'static str;
}
