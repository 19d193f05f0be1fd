//! glyphline - one line of text, straight to pixels
//!
//! Hand it font bytes and a [`RenderRequest`]; get back a [`Canvas`] or a PNG.
//! The canvas is exactly as tall as the face and exactly as wide as the
//! string, plus padding on every side, with the baseline at
//! `ceil(ascent) + padding`.
//!
//! # Example
//!
//! ```no_run
//! use glyphline::prelude::*;
//!
//! let font_bytes = std::fs::read("DejaVuSans.ttf")?;
//! let request = RenderRequest::new("Hello").with_point_size(24.0).with_padding(2);
//!
//! let metrics = glyphline::measure_text(&font_bytes, &request)?;
//! let canvas = glyphline::render_text(&font_bytes, &request)?;
//! assert_eq!(canvas.width(), metrics.image_width());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The backends are re-exported as [`fontdb`], [`raster`] and [`export`] for
//! anyone wiring their own [`Pipeline`].

use std::sync::Arc;

pub use glyphline_core::{
    canvas, error, traits, types, Canvas, Color, GlyphlineError, HintingMode, Pipeline,
    RenderRequest, Result,
};

pub use glyphline_export as export;
pub use glyphline_fontdb as fontdb;
pub use glyphline_raster as raster;

use glyphline_core::types::StringMetrics;
use glyphline_export::PngExporter;
use glyphline_fontdb::Font;
use glyphline_raster::OutlineRasterizer;

/// Common imports for typical usage
pub mod prelude {
    pub use glyphline_core::{
        canvas::{Canvas, CoverageMask},
        error::{GlyphlineError, Result},
        traits::{Exporter, FontModel, Rasterizer},
        types::StringMetrics,
        Color, HintingMode, Pipeline, RenderRequest,
    };
    pub use glyphline_export::PngExporter;
    pub use glyphline_fontdb::Font;
    pub use glyphline_raster::OutlineRasterizer;
}

/// Build a pipeline over face `face_index` of `font_bytes`
pub fn pipeline(font_bytes: &[u8], face_index: u32) -> Result<Pipeline> {
    if font_bytes.is_empty() {
        return Err(GlyphlineError::config("no font data given"));
    }
    let font = Font::from_data_index(font_bytes.to_vec(), face_index)?;
    log::debug!("Using face {face_index} of a {} byte font", font_bytes.len());
    Ok(Pipeline::new(
        Arc::new(font),
        Arc::new(OutlineRasterizer::new()),
    ))
}

/// Measure what [`render_text`] would produce, without rasterizing
pub fn measure_text(font_bytes: &[u8], request: &RenderRequest) -> Result<StringMetrics> {
    pipeline(font_bytes, 0)?.measure(request)
}

/// Render `request` with the first face in `font_bytes`
pub fn render_text(font_bytes: &[u8], request: &RenderRequest) -> Result<Canvas> {
    pipeline(font_bytes, 0)?.render(request)
}

/// [`render_text`], encoded as PNG
pub fn render_png(font_bytes: &[u8], request: &RenderRequest) -> Result<Vec<u8>> {
    let canvas = render_text(font_bytes, request)?;
    PngExporter::new().encode(&canvas)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_font_bytes_are_a_config_error() {
        let request = RenderRequest::new("A");
        assert!(matches!(
            render_text(&[], &request),
            Err(GlyphlineError::Config(_))
        ));
        assert!(matches!(
            measure_text(&[], &request),
            Err(GlyphlineError::Config(_))
        ));
        assert!(matches!(
            render_png(&[], &request),
            Err(GlyphlineError::Config(_))
        ));
    }

    #[test]
    fn garbage_bytes_are_a_font_error() {
        let request = RenderRequest::new("A");
        assert!(matches!(
            render_text(b"not a font at all", &request),
            Err(GlyphlineError::Font(_))
        ));
    }
}
