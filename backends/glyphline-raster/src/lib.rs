//! glyphline-raster: outlines become coverage
//!
//! A pure Rust scanline rasterizer. It takes the design-unit outlines a
//! [`glyphline_core::FontModel`] hands out and produces 8-bit coverage masks
//! for the pipeline to composite.
//!
//! - `curves`: de Casteljau flattening in 26.6 fixed point
//! - `edge`: edges and the edge table, sampled at row centres
//! - `scan_converter`: the active edge list and span filling
//! - `grayscale`: oversampled samples summed into coverage bytes
//! - `hinting`: per-axis grid fitting for `HintingMode::Full`
//! - `rasterizer`: [`OutlineRasterizer`], the [`Rasterizer`] implementation
//!
//! [`Rasterizer`]: glyphline_core::Rasterizer

pub mod curves;
pub mod edge;
pub mod grayscale;
pub mod hinting;
pub mod rasterizer;
pub mod scan_converter;

pub use rasterizer::{OutlineRasterizer, DEFAULT_OVERSAMPLE, MAX_MASK_PIXELS, MAX_SAMPLE_SPAN};

/// Which samples count as inside a shape
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum FillRule {
    /// Inside when the signed crossing count is non-zero; TrueType's rule
    #[default]
    NonZeroWinding,
    /// Inside when the crossing count is odd
    EvenOdd,
}
