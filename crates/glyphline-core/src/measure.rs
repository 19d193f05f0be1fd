//! How big will the picture be?
//!
//! Measurement never rasterizes. It sums advances, asks the face for its
//! ascent and descent, and leaves hinting out of it entirely, so the canvas
//! size for a request is the same whatever the rasterizer later does.

use crate::{
    error::{FontError, Result},
    fixed::F26Dot6,
    traits::FontModel,
    types::{Glyph, StringMetrics},
    GlyphlineError, RenderRequest,
};

/// Computes [`StringMetrics`] for a string in a face
pub struct Measurer;

impl Measurer {
    /// Width, ascent and descent of `text` at `point_size`, with no padding
    ///
    /// Each advance is scaled to the nearest 1/64 px and summed in 26.6
    /// fixed point; the total is rounded up to a whole pixel once. A total
    /// outside the 26.6 range is a configuration error. `point_size` is
    /// expected to have passed [`RenderRequest::validate`].
    pub fn measure(font: &dyn FontModel, point_size: f32, text: &str) -> Result<StringMetrics> {
        let too_wide = || {
            GlyphlineError::config(format!(
                "{} chars at {point_size}pt are too wide to measure",
                text.chars().count()
            ))
        };

        let upem = font.units_per_em();
        let mut total = F26Dot6::ZERO;
        for ch in text.chars() {
            let glyph = resolve_glyph(font, ch)?;
            total = scaled_advance(glyph.advance, point_size, upem)
                .and_then(|advance| total.checked_add(advance))
                .ok_or_else(too_wide)?;
        }

        let width = total
            .checked_ceil()
            .ok_or_else(too_wide)?
            .to_int()
            .max(0)
            .unsigned_abs();
        let face = font.face_metrics(point_size);
        log::debug!(
            "Measured {} chars at {point_size}pt: width {width}, ascent {}, descent {}",
            text.chars().count(),
            face.ascent,
            face.descent
        );

        Ok(StringMetrics {
            width,
            ascent: face.ascent,
            descent: face.descent,
            baseline: face.ascent,
            padding: 0,
        })
    }

    /// [`Measurer::measure`] plus the request's padding on every side
    ///
    /// Fails with a configuration error when the padded image would not fit
    /// a canvas.
    pub fn measure_request(font: &dyn FontModel, request: &RenderRequest) -> Result<StringMetrics> {
        let metrics = Self::measure(font, request.point_size, &request.text)?;
        let padded = StringMetrics {
            baseline: metrics.ascent.saturating_add(request.padding),
            padding: request.padding,
            ..metrics
        };

        if padded.checked_image_size().is_none() {
            return Err(GlyphlineError::config(format!(
                "A {}x{} px image (padding {}) is too large",
                padded.image_width(),
                padded.image_height(),
                request.padding
            )));
        }
        Ok(padded)
    }
}

/// Look up `ch`, falling back to an empty glyph when the face has no mapping
pub(crate) fn resolve_glyph(font: &dyn FontModel, ch: char) -> Result<Glyph> {
    match font.glyph_for(ch) {
        Ok(glyph) => Ok(glyph),
        Err(FontError::GlyphNotFound(_)) => {
            log::debug!("No glyph for {ch:?}, substituting an empty glyph");
            Ok(Glyph::empty(ch, font.units_per_em()))
        },
        Err(e) => Err(e.into()),
    }
}

/// Design-unit advance to the nearest 1/64 px; `None` when that is out of
/// the 26.6 range
pub(crate) fn scaled_advance(advance: f32, point_size: f32, units_per_em: u16) -> Option<F26Dot6> {
    if units_per_em == 0 {
        return Some(F26Dot6::ZERO);
    }
    F26Dot6::checked_from_f64(advance as f64 * point_size as f64 / units_per_em as f64)
}
