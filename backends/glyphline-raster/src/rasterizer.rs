//! Glyph rasterizer: scaled outline in, coverage mask out
//!
//! Ties the pieces together. The outline is scaled to pixels and shifted by
//! the pen phase, optionally grid-fitted, then flipped into bitmap space and
//! scan-converted at `oversample × oversample` samples per pixel.

use glyphline_core::{
    canvas::CoverageMask,
    error::{RasterizeError, Result},
    fixed::F26Dot6,
    outline::{GlyphOutline, OutlineCommand, Point},
    traits::Rasterizer,
    types::{Glyph, RasterizedGlyph},
    HintingMode,
};

use crate::curves::FixedPoint;
use crate::grayscale::render_grayscale;
use crate::hinting::{fit_advance, grid_fit};
use crate::scan_converter::ScanConverter;
use crate::FillRule;

/// Largest mask edge, in samples
///
/// Sample coordinates are 26.6 fixed point; this keeps them, and the sum
/// of any two of them, inside an `i32`.
pub const MAX_SAMPLE_SPAN: u64 = 1 << 23;

/// Largest mask area, in pixels
pub const MAX_MASK_PIXELS: u64 = 1 << 28;

/// Samples scan-converted at once; larger masks are filled in bands of rows
const BAND_SAMPLES: usize = 1 << 20;

/// Samples per pixel on each axis unless configured otherwise
pub const DEFAULT_OVERSAMPLE: u8 = 4;

/// The outline rasterizer
///
/// ```ignore
/// let rasterizer = OutlineRasterizer::new().with_oversample(8);
/// let glyph = rasterizer.rasterize(&glyph, 24.0, HintingMode::None)?;
/// ```
#[derive(Debug, Clone)]
pub struct OutlineRasterizer {
    oversample: u8,
    fill_rule: FillRule,
}

impl OutlineRasterizer {
    pub fn new() -> Self {
        Self {
            oversample: DEFAULT_OVERSAMPLE,
            fill_rule: FillRule::NonZeroWinding,
        }
    }

    /// Samples per pixel on each axis, clamped to `1..=16`
    pub fn with_oversample(mut self, oversample: u8) -> Self {
        self.oversample = oversample.clamp(1, 16);
        self
    }

    pub fn with_fill_rule(mut self, fill_rule: FillRule) -> Self {
        self.fill_rule = fill_rule;
        self
    }

    pub fn oversample(&self) -> u8 {
        self.oversample
    }

    /// Rasterize an outline already in pixel space (y up)
    pub fn rasterize_outline(&self, outline: &GlyphOutline) -> Result<CoverageMask> {
        self.rasterize_in_bands(outline, BAND_SAMPLES)
    }

    fn rasterize_in_bands(
        &self,
        outline: &GlyphOutline,
        band_samples: usize,
    ) -> Result<CoverageMask> {
        let Some(bounds) = outline.bounds() else {
            return Ok(CoverageMask::empty());
        };

        let x_min = (bounds.x_min as f64).floor();
        let y_min = (bounds.y_min as f64).floor();
        let x_max = (bounds.x_max as f64).ceil().max(x_min + 1.0);
        let y_max = (bounds.y_max as f64).ceil().max(y_min + 1.0);

        let n = self.oversample as usize;
        let (width, height) = mask_size(x_min, y_min, x_max, y_max, n as u64)?;

        // the 1-bit buffer grows with the square of the size, so only
        // `band_rows` pixel rows are sampled at a time
        let row_samples = (width * n * n).max(1);
        let band_rows = (band_samples / row_samples).clamp(1, height);
        if band_rows < height {
            log::trace!("Filling {width}x{height} mask in bands of {band_rows} rows");
        }

        let factor = n as f64;
        let mut data = Vec::with_capacity(width * height);
        let mut row = 0;
        while row < height {
            let rows = band_rows.min(height - row);
            let mut sc = ScanConverter::new(width * n, rows * n);
            sc.set_fill_rule(self.fill_rule);

            // font space (y up, origin at the pen) to sample space (y down,
            // origin at the band's top-left corner)
            let top = y_max - row as f64;
            trace_outline(&mut sc, outline, |p: Point| {
                FixedPoint::new(
                    F26Dot6::from_f64((p.x as f64 - x_min) * factor),
                    F26Dot6::from_f64((top - p.y as f64) * factor),
                )
            });

            data.extend(render_grayscale(&mut sc, width, rows, n));
            row += rows;
        }

        Ok(CoverageMask {
            width: width as u32,
            height: height as u32,
            left: x_min as i32,
            top: y_max as i32,
            data,
        })
    }
}

/// Pixel size of the mask spanning `x_min..x_max` by `y_min..y_max`
///
/// Fails only when the span is not finite or cannot be addressed in 26.6
/// sample coordinates.
fn mask_size(
    x_min: f64,
    y_min: f64,
    x_max: f64,
    y_max: f64,
    oversample: u64,
) -> Result<(usize, usize)> {
    let width = x_max - x_min;
    let height = y_max - y_min;
    let too_large = || RasterizeError::TooLarge {
        width: width.clamp(0.0, u32::MAX as f64) as u32,
        height: height.clamp(0.0, u32::MAX as f64) as u32,
    };

    let addressable = |v: f64| v.is_finite() && v.abs() <= i32::MAX as f64;
    if ![x_min, y_min, x_max, y_max].into_iter().all(addressable) {
        return Err(too_large().into());
    }

    let (w, h) = (width as u64, height as u64);
    if w * oversample > MAX_SAMPLE_SPAN
        || h * oversample > MAX_SAMPLE_SPAN
        || w * h > MAX_MASK_PIXELS
    {
        return Err(too_large().into());
    }
    Ok((w as usize, h as usize))
}

fn trace_outline(
    sc: &mut ScanConverter,
    outline: &GlyphOutline,
    to_samples: impl Fn(Point) -> FixedPoint,
) {
    for command in outline.commands() {
        match *command {
            OutlineCommand::MoveTo(p) => sc.move_to(to_samples(p)),
            OutlineCommand::LineTo(p) => sc.line_to(to_samples(p)),
            OutlineCommand::QuadTo(c, p) => sc.quad_to(to_samples(c), to_samples(p)),
            OutlineCommand::CurveTo(c0, c1, p) => {
                sc.cubic_to(to_samples(c0), to_samples(c1), to_samples(p))
            },
            OutlineCommand::Close => sc.close(),
        }
    }
}

impl Default for OutlineRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer for OutlineRasterizer {
    fn name(&self) -> &'static str {
        "outline"
    }

    fn rasterize_at(
        &self,
        glyph: &Glyph,
        point_size: f32,
        hinting: HintingMode,
        x_offset: f32,
    ) -> Result<RasterizedGlyph> {
        if !point_size.is_finite() || point_size <= 0.0 {
            return Err(RasterizeError::InvalidSize(point_size).into());
        }
        if glyph.units_per_em == 0 {
            return Err(RasterizeError::InvalidUnitsPerEm.into());
        }

        // multiply before dividing so whole design units land on whole pixels
        let size = point_size as f64;
        let upem = glyph.units_per_em as f64;
        let to_pixels = |v: f32| (v as f64 * size / upem) as f32;

        let advance = match hinting {
            HintingMode::None => to_pixels(glyph.advance),
            HintingMode::Full => fit_advance(to_pixels(glyph.advance)),
        };

        if glyph.outline.is_empty() {
            return Ok(RasterizedGlyph {
                mask: CoverageMask::empty(),
                advance,
            });
        }

        let scaled = glyph
            .outline
            .map_points(|p| Point::new(to_pixels(p.x) + x_offset, to_pixels(p.y)));
        let outline = match hinting {
            HintingMode::None => scaled,
            HintingMode::Full => grid_fit(&scaled, point_size),
        };

        let mask = self.rasterize_outline(&outline)?;
        log::trace!(
            "Rasterized {:?}: {}x{} at ({}, {}), advance {advance}",
            glyph.ch,
            mask.width,
            mask.height,
            mask.left,
            mask.top
        );

        Ok(RasterizedGlyph { mask, advance })
    }
}
