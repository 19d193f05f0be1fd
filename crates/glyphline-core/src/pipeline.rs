//! The engine that walks one string along one baseline
//!
//! A render moves through five states, each logged at debug level:
//!
//! 1. **Init** - the request is validated
//! 2. **Measured** - width, ascent and descent are known
//! 3. **Sized** - the canvas exists, filled with the background
//! 4. **Rendering** - glyphs are rasterized and composited left to right
//! 5. **Done** - the canvas is handed back
//!
//! Any error aborts the render; no partial canvas escapes.

use std::fmt;
use std::sync::Arc;

use crate::{
    canvas::Canvas,
    error::{GlyphlineError, Result},
    fixed::F26Dot6,
    glyph_cache::{split_pen, GlyphCache, GlyphCacheKey},
    measure::{resolve_glyph, Measurer},
    traits::{FontModel, Rasterizer},
    types::{RasterizedGlyph, StringMetrics},
    RenderRequest,
};

/// Where a render currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Init,
    Measured,
    Sized,
    Rendering,
    Done,
}

impl fmt::Display for RenderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::Measured => "measured",
            Self::Sized => "sized",
            Self::Rendering => "rendering",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// A finished render plus where each glyph was placed
#[derive(Debug, Clone)]
pub struct RenderTrace {
    pub canvas: Canvas,
    pub metrics: StringMetrics,
    /// Canvas x of every glyph's pen origin, in string order
    pub origins: Vec<i32>,
}

/// Text in, pixels out
///
/// ```ignore
/// let pipeline = Pipeline::new(Arc::new(font), Arc::new(OutlineRasterizer::new()));
/// let canvas = pipeline.render(&RenderRequest::new("Hello"))?;
/// ```
pub struct Pipeline {
    font: Arc<dyn FontModel>,
    rasterizer: Arc<dyn Rasterizer>,
    glyph_cache: bool,
}

impl Pipeline {
    /// A pipeline with the per-render glyph cache switched on
    pub fn new(font: Arc<dyn FontModel>, rasterizer: Arc<dyn Rasterizer>) -> Self {
        Self {
            font,
            rasterizer,
            glyph_cache: true,
        }
    }

    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn font(&self) -> &dyn FontModel {
        self.font.as_ref()
    }

    /// Canvas dimensions and baseline, without rasterizing anything
    pub fn measure(&self, request: &RenderRequest) -> Result<StringMetrics> {
        enter(RenderState::Init);
        request.validate()?;
        let metrics = Measurer::measure_request(self.font.as_ref(), request)?;
        enter(RenderState::Measured);
        Ok(metrics)
    }

    /// Render `request` to a canvas
    pub fn render(&self, request: &RenderRequest) -> Result<Canvas> {
        self.render_traced(request).map(|trace| trace.canvas)
    }

    /// Render `request` and report where each glyph's pen origin landed
    pub fn render_traced(&self, request: &RenderRequest) -> Result<RenderTrace> {
        let metrics = self.measure(request)?;

        let mut canvas = Canvas::new(
            metrics.image_width(),
            metrics.image_height(),
            request.background,
        );
        enter(RenderState::Sized);
        log::debug!(
            "Canvas {}x{}, baseline {}",
            canvas.width(),
            canvas.height(),
            metrics.baseline
        );

        enter(RenderState::Rendering);
        let mut cache = self.glyph_cache.then(GlyphCache::default);
        let mut origins = Vec::with_capacity(request.text.len());
        let mut pen = F26Dot6::ZERO;
        let padding = canvas_coordinate(metrics.padding)?;
        let baseline = canvas_coordinate(metrics.baseline)?;

        for ch in request.text.chars() {
            let (pixel, phase, offset) = split_pen(pen);
            let rasterized = match cache.as_mut() {
                Some(cache) => {
                    let key = GlyphCacheKey::new(ch, phase);
                    match cache.get(&key) {
                        Some(hit) => hit.clone(),
                        None => {
                            let fresh = self.rasterize(ch, request, offset)?;
                            cache.insert(key, fresh.clone());
                            fresh
                        },
                    }
                },
                None => self.rasterize(ch, request, offset)?,
            };

            let origin = padding + pixel;
            let mask = &rasterized.mask;
            let x = origin + mask.left;
            let y = baseline - mask.top;
            if !mask.is_empty()
                && (x < 0
                    || y < 0
                    || x as i64 + mask.width as i64 > canvas.width() as i64
                    || y as i64 + mask.height as i64 > canvas.height() as i64)
            {
                log::warn!("Glyph {ch:?} extends past the canvas and will be clipped");
            }
            canvas.composite(x, y, mask, request.foreground);

            origins.push(origin);
            pen = F26Dot6::checked_from_f64(rasterized.advance as f64)
                .and_then(|advance| pen.checked_add(advance))
                .ok_or_else(|| {
                    GlyphlineError::config(format!("Pen position overflowed after {ch:?}"))
                })?;
        }

        if let Some(cache) = &cache {
            log::debug!(
                "Glyph cache: {} hits, {} misses",
                cache.hits(),
                cache.misses()
            );
        }
        enter(RenderState::Done);

        Ok(RenderTrace {
            canvas,
            metrics,
            origins,
        })
    }

    fn rasterize(&self, ch: char, request: &RenderRequest, offset: f32) -> Result<RasterizedGlyph> {
        let glyph = resolve_glyph(self.font.as_ref(), ch)?;
        log::trace!(
            "Rasterizing {ch:?} with {} at phase {offset}",
            self.rasterizer.name()
        );
        self.rasterizer
            .rasterize_at(&glyph, request.point_size, request.hinting, offset)
    }
}

fn canvas_coordinate(v: u32) -> Result<i32> {
    i32::try_from(v).map_err(|_| {
        GlyphlineError::config(format!("{v} px is past the canvas coordinate range"))
    })
}

fn enter(state: RenderState) {
    log::debug!("Render state: {state}");
}

/// Assemble a pipeline piece by piece
///
/// ```ignore
/// let pipeline = Pipeline::builder()
///     .font(Arc::new(font))
///     .rasterizer(Arc::new(OutlineRasterizer::new()))
///     .glyph_cache(false)
///     .build()?;
/// ```
pub struct PipelineBuilder {
    font: Option<Arc<dyn FontModel>>,
    rasterizer: Option<Arc<dyn Rasterizer>>,
    glyph_cache: bool,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            font: None,
            rasterizer: None,
            glyph_cache: true,
        }
    }

    pub fn font(mut self, font: Arc<dyn FontModel>) -> Self {
        self.font = Some(font);
        self
    }

    pub fn rasterizer(mut self, rasterizer: Arc<dyn Rasterizer>) -> Self {
        self.rasterizer = Some(rasterizer);
        self
    }

    /// Reuse masks for repeated characters within one render
    pub fn glyph_cache(mut self, enabled: bool) -> Self {
        self.glyph_cache = enabled;
        self
    }

    pub fn build(self) -> Result<Pipeline> {
        let font = self
            .font
            .ok_or_else(|| GlyphlineError::config("No font configured"))?;
        let rasterizer = self
            .rasterizer
            .ok_or_else(|| GlyphlineError::config("No rasterizer configured"))?;
        Ok(Pipeline {
            font,
            rasterizer,
            glyph_cache: self.glyph_cache,
        })
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
