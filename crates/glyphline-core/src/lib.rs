//! glyphline core: one line of text, one raster
//!
//! Text enters as characters and leaves as an RGBA pixel buffer. The
//! transformation happens in five small steps that never call back upstream:
//!
//! 1. **FontModel** - outlines, advances and face metrics in design units
//! 2. **Measurer** - the string's advance width and the face's pixel height
//! 3. **Pipeline** - sizes the canvas and walks the string along one baseline
//! 4. **Rasterizer** - outline to coverage mask, optionally grid-fitted
//! 5. **Canvas** - source-over compositing of each mask onto the background
//!
//! ## Render a line
//!
//! ```rust,no_run
//! use glyphline_core::{Pipeline, RenderRequest};
//! use std::sync::Arc;
//!
//! # use glyphline_core::traits::*;
//! # use glyphline_core::types::*;
//! # use glyphline_core::HintingMode;
//! # use glyphline_core::error::{FontError, Result};
//! # struct MyFont;
//! # impl FontModel for MyFont {
//! #     fn units_per_em(&self) -> u16 { 1000 }
//! #     fn ascent_units(&self) -> i16 { 800 }
//! #     fn descent_units(&self) -> i16 { 200 }
//! #     fn glyph_for(&self, ch: char) -> std::result::Result<Glyph, FontError> {
//! #         Err(FontError::GlyphNotFound(ch))
//! #     }
//! # }
//! # struct MyRasterizer;
//! # impl Rasterizer for MyRasterizer {
//! #     fn name(&self) -> &'static str { "mine" }
//! #     fn rasterize_at(&self, _: &Glyph, _: f32, _: HintingMode, _: f32)
//! #         -> Result<RasterizedGlyph> { unimplemented!() }
//! # }
//! let pipeline = Pipeline::builder()
//!     .font(Arc::new(MyFont))
//!     .rasterizer(Arc::new(MyRasterizer))
//!     .build()?;
//!
//! let request = RenderRequest::new("Hello").with_point_size(24.0).with_padding(4);
//! let canvas = pipeline.render(&request)?;
//! println!("{}x{}", canvas.width(), canvas.height());
//! # Ok::<(), glyphline_core::GlyphlineError>(())
//! ```
//!
//! Backends plug in through the traits in [`traits`]; the data they exchange
//! lives in [`types`].

use std::fmt;
use std::str::FromStr;

pub mod canvas;
pub mod error;
pub mod fixed;
pub mod glyph_cache;
pub mod measure;
pub mod outline;
pub mod pipeline;
pub mod traits;

pub use canvas::{Canvas, CoverageMask};
pub use error::{GlyphlineError, Result};
pub use measure::Measurer;
pub use pipeline::{Pipeline, PipelineBuilder, RenderState, RenderTrace};
pub use traits::{Exporter, FontModel, Rasterizer};

/// The data structures exchanged between stages
pub mod types {
    use crate::canvas::CoverageMask;
    use crate::outline::GlyphOutline;

    /// One character's shape and advance, in font design units
    #[derive(Debug, Clone, PartialEq)]
    pub struct Glyph {
        pub ch: char,
        pub outline: GlyphOutline,
        /// Horizontal advance in design units
        pub advance: f32,
        pub units_per_em: u16,
    }

    impl Glyph {
        /// Stand-in for a character the font cannot map: no ink, no advance
        pub fn empty(ch: char, units_per_em: u16) -> Self {
            Self {
                ch,
                outline: GlyphOutline::new(),
                advance: 0.0,
                units_per_em,
            }
        }

        /// Design units to pixels at `point_size`
        pub fn scale(&self, point_size: f32) -> f32 {
            point_size / self.units_per_em as f32
        }
    }

    /// Face ascent and descent in whole device pixels (rounded up)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FaceMetrics {
        pub ascent: u32,
        pub descent: u32,
    }

    /// Everything needed to size the canvas and place the baseline
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct StringMetrics {
        /// Advance width of the string in pixels, rounded up once
        pub width: u32,
        pub ascent: u32,
        pub descent: u32,
        /// Distance from the top edge of the image to the baseline
        pub baseline: u32,
        pub padding: u32,
    }

    impl StringMetrics {
        /// Largest image side; canvas coordinates are `i32`
        pub const MAX_IMAGE_SIDE: u32 = i32::MAX as u32;

        /// Largest image area, in pixels (4 GiB of RGBA)
        pub const MAX_IMAGE_PIXELS: u64 = 1 << 30;

        pub fn height(&self) -> u32 {
            self.ascent.saturating_add(self.descent)
        }

        /// Saturates; [`StringMetrics::checked_image_size`] says whether it fits
        pub fn image_width(&self) -> u32 {
            self.padding.saturating_mul(2).saturating_add(self.width)
        }

        /// Saturates; [`StringMetrics::checked_image_size`] says whether it fits
        pub fn image_height(&self) -> u32 {
            self.padding.saturating_mul(2).saturating_add(self.height())
        }

        /// `(image_width, image_height)`, or `None` when a side overflows or
        /// the image is larger than [`StringMetrics::MAX_IMAGE_SIDE`] or
        /// [`StringMetrics::MAX_IMAGE_PIXELS`] allow
        pub fn checked_image_size(&self) -> Option<(u32, u32)> {
            let border = self.padding.checked_mul(2)?;
            let width = border.checked_add(self.width)?;
            let height = border.checked_add(self.ascent.checked_add(self.descent)?)?;
            let fits = width <= Self::MAX_IMAGE_SIDE
                && height <= Self::MAX_IMAGE_SIDE
                && width as u64 * height as u64 <= Self::MAX_IMAGE_PIXELS;
            fits.then_some((width, height))
        }
    }

    /// A rasterized glyph ready for compositing
    #[derive(Debug, Clone, PartialEq)]
    pub struct RasterizedGlyph {
        pub mask: CoverageMask,
        /// Pen advance in pixels
        pub advance: f32,
    }
}

/// Grid fitting applied before rasterization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HintingMode {
    /// Scaled outline, untouched
    #[default]
    None,
    /// Stems, baseline and flat extremes snapped to whole pixels
    Full,
}

impl HintingMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Full => "full",
        }
    }
}

impl fmt::Display for HintingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HintingMode {
    type Err = GlyphlineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "full" => Ok(Self::Full),
            other => Err(GlyphlineError::config(format!(
                "Unknown hinting mode: {other} (expected none or full)"
            ))),
        }
    }
}

/// Simple RGBA color that works everywhere
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::rgba(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::rgba(255, 255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::rgba(0, 0, 0, 0)
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Parse `RRGGBB` or `RRGGBBAA`, with or without a leading `#`
    pub fn from_hex(hex: &str) -> Result<Self> {
        let hex = hex.trim_start_matches('#');
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(GlyphlineError::config(format!(
                "Color must be in RRGGBB or RRGGBBAA format, got {hex:?}"
            )));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| GlyphlineError::config(format!("Invalid color: {hex:?}")))
        };

        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl FromStr for Color {
    type Err = GlyphlineError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

/// Everything one render needs besides the font
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    /// Already unescaped text, rendered on a single line
    pub text: String,
    pub point_size: f32,
    /// Empty border in pixels on every side
    pub padding: u32,
    pub hinting: HintingMode,
    pub foreground: Color,
    pub background: Color,
}

impl RenderRequest {
    pub const DEFAULT_POINT_SIZE: f32 = 12.0;
    pub const DEFAULT_PADDING: u32 = 0;
    pub const DEFAULT_FOREGROUND: Color = Color::black();
    pub const DEFAULT_BACKGROUND: Color = Color::transparent();

    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_point_size(mut self, point_size: f32) -> Self {
        self.point_size = point_size;
        self
    }

    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_hinting(mut self, hinting: HintingMode) -> Self {
        self.hinting = hinting;
        self
    }

    pub fn with_foreground(mut self, foreground: Color) -> Self {
        self.foreground = foreground;
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// Reject requests the pipeline cannot honor
    pub fn validate(&self) -> Result<()> {
        if !self.point_size.is_finite() || self.point_size <= 0.0 {
            return Err(GlyphlineError::config(format!(
                "Point size must be a positive number, got {}",
                self.point_size
            )));
        }
        Ok(())
    }
}

impl Default for RenderRequest {
    fn default() -> Self {
        Self {
            text: String::new(),
            point_size: Self::DEFAULT_POINT_SIZE,
            padding: Self::DEFAULT_PADDING,
            hinting: HintingMode::None,
            foreground: Self::DEFAULT_FOREGROUND,
            background: Self::DEFAULT_BACKGROUND,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::StringMetrics;

    #[test]
    fn request_defaults_match_the_command_line_tool() {
        let request = RenderRequest::new("hi");
        assert_eq!(request.point_size, 12.0);
        assert_eq!(request.padding, 0);
        assert_eq!(request.hinting, HintingMode::None);
        assert_eq!(request.foreground, Color::black());
        assert_eq!(request.background, Color::transparent());
    }

    #[test]
    fn validate_rejects_non_positive_sizes() {
        assert!(RenderRequest::new("x").validate().is_ok());
        for size in [0.0, -3.0, f32::NAN, f32::INFINITY] {
            let err = RenderRequest::new("x").with_point_size(size).validate();
            assert!(matches!(err, Err(GlyphlineError::Config(_))), "size {size}");
        }
    }

    #[test]
    fn string_metrics_derive_image_size() {
        let metrics = StringMetrics {
            width: 7,
            ascent: 8,
            descent: 2,
            baseline: 10,
            padding: 2,
        };
        assert_eq!(metrics.height(), 10);
        assert_eq!(metrics.image_width(), 11);
        assert_eq!(metrics.image_height(), 14);
        assert_eq!(metrics.checked_image_size(), Some((11, 14)));
    }

    #[test]
    fn oversized_padding_does_not_fit() {
        let metrics = StringMetrics {
            width: 7,
            ascent: 8,
            descent: 2,
            baseline: 10,
            padding: 3_000_000_000,
        };
        assert_eq!(metrics.checked_image_size(), None);
        assert_eq!(metrics.image_width(), u32::MAX);
        assert_eq!(metrics.image_height(), u32::MAX);

        // fits a u32 but not a canvas coordinate
        let metrics = StringMetrics {
            padding: 1 << 30,
            ..metrics
        };
        assert_eq!(metrics.checked_image_size(), None);

        // each side fits, the area does not
        let metrics = StringMetrics {
            padding: 40_000,
            ..metrics
        };
        assert_eq!(metrics.checked_image_size(), None);
        assert_eq!(metrics.image_width(), 80_007);
    }

    #[test]
    fn color_parses_hex() {
        assert_eq!(Color::from_hex("FF8000").unwrap(), Color::rgba(255, 128, 0, 255));
        assert_eq!(Color::from_hex("#00000080").unwrap(), Color::rgba(0, 0, 0, 128));
        assert!(Color::from_hex("FFF").is_err());
        assert!(Color::from_hex("GG0000").is_err());
        assert!("12345678".parse::<Color>().is_ok());
    }

    #[test]
    fn hinting_mode_round_trips_names() {
        assert_eq!("full".parse::<HintingMode>().unwrap(), HintingMode::Full);
        assert_eq!("None".parse::<HintingMode>().unwrap(), HintingMode::None);
        assert!("slight".parse::<HintingMode>().is_err());
        assert_eq!(HintingMode::Full.to_string(), "full");
    }
}
