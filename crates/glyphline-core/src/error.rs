//! Error types for glyphline

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GlyphlineError>;

/// Main error type for glyphline
#[derive(Debug, Error)]
pub enum GlyphlineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Font loading failed: {0}")]
    Font(#[from] FontError),

    #[error("Rasterization failed: {0}")]
    Rasterize(#[from] RasterizeError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GlyphlineError {
    /// Shorthand for a [`GlyphlineError::Config`] with any message
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Font loading and lookup errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FontError {
    #[error("Font file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid font data: {0}")]
    Parse(String),

    /// Recovered locally: the caller substitutes an empty glyph
    #[error("No glyph for character {0:?}")]
    GlyphNotFound(char),
}

/// Rasterization errors
#[derive(Debug, Error, PartialEq)]
pub enum RasterizeError {
    #[error("Invalid point size: {0}")]
    InvalidSize(f32),

    #[error("Font reports zero units per em")]
    InvalidUnitsPerEm,

    #[error("Glyph mask too large: {width}x{height}")]
    TooLarge { width: u32, height: u32 },
}

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),
}
