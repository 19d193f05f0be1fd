//! Where fonts come to life: loading faces for glyphline
//!
//! Fonts keep their raw bytes and build a parser view on demand, so a loaded
//! [`Font`] owns no borrowed data and TrueType collections work by face
//! index. Outlines are read with `skrifa` in unscaled design units and
//! recorded into [`GlyphOutline`]s; everything else comes straight from the
//! tables via `read-fonts`.

use std::fs;
use std::io;
use std::path::Path;

use read_fonts::types::GlyphId;
use read_fonts::{FontRef as ReadFontRef, TableProvider};
use skrifa::instance::Size;
use skrifa::outline::{DrawSettings, OutlinePen};
use skrifa::prelude::LocationRef;
use skrifa::MetadataProvider;

use glyphline_core::{
    error::{FontError, GlyphlineError, Result},
    outline::GlyphOutline,
    traits::FontModel,
    types::Glyph,
};

/// One loaded font face
pub struct Font {
    data: Vec<u8>,
    face_index: u32,
    units_per_em: u16,
    ascent: i16,
    descent: i16,
}

impl Font {
    /// Read a font file from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file_index(path, 0)
    }

    /// Read one face of a font file (for TTC collections)
    pub fn from_file_index(path: impl AsRef<Path>, face_index: u32) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => {
                GlyphlineError::Font(FontError::FileNotFound(path.display().to_string()))
            },
            _ => GlyphlineError::Io(e),
        })?;
        log::debug!("Read {} bytes from {}", data.len(), path.display());

        Self::from_data_index(data, face_index)
    }

    /// Parse raw font bytes
    pub fn from_data(data: Vec<u8>) -> Result<Self> {
        Self::from_data_index(data, 0)
    }

    /// Parse one face out of raw font bytes (for TTC collections)
    pub fn from_data_index(data: Vec<u8>, face_index: u32) -> Result<Self> {
        if data.is_empty() {
            return Err(FontError::Parse("font data is empty".into()).into());
        }

        let font = ReadFontRef::from_index(&data, face_index)
            .map_err(|e| FontError::Parse(format!("not a font (face {face_index}): {e}")))?;

        let head = font
            .head()
            .map_err(|e| FontError::Parse(format!("head table: {e}")))?;
        let units_per_em = head.units_per_em();
        if units_per_em == 0 {
            return Err(FontError::Parse("units per em is zero".into()).into());
        }

        let hhea = font
            .hhea()
            .map_err(|e| FontError::Parse(format!("hhea table: {e}")))?;
        let ascent = hhea.ascender().to_i16();
        let descent = hhea.descender().to_i16().saturating_neg();

        font.hmtx()
            .map_err(|e| FontError::Parse(format!("hmtx table: {e}")))?;
        font.cmap()
            .map_err(|e| FontError::Parse(format!("cmap table: {e}")))?;

        log::debug!(
            "Loaded face {face_index}: {units_per_em} units/em, ascent {ascent}, descent {descent}"
        );

        Ok(Font {
            data,
            face_index,
            units_per_em,
            ascent,
            descent,
        })
    }

    /// Face index within a collection (0 for single fonts)
    pub fn face_index(&self) -> u32 {
        self.face_index
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn font_ref(&self) -> std::result::Result<ReadFontRef<'_>, FontError> {
        ReadFontRef::from_index(&self.data, self.face_index)
            .map_err(|e| FontError::Parse(e.to_string()))
    }

    /// Glyph id for `ch`, `None` when unmapped or mapped to `.notdef`
    pub fn glyph_id(&self, ch: char) -> Option<GlyphId> {
        let font = self.font_ref().ok()?;
        font.cmap()
            .ok()?
            .map_codepoint(ch)
            .filter(|gid| gid.to_u32() != 0)
    }

    /// Advance of `glyph_id` in design units
    pub fn advance_width(&self, glyph_id: GlyphId) -> Option<u16> {
        self.font_ref().ok()?.hmtx().ok()?.advance(glyph_id)
    }

    /// Number of glyphs in the face
    pub fn glyph_count(&self) -> Option<u32> {
        self.font_ref()
            .ok()?
            .maxp()
            .ok()
            .map(|maxp| maxp.num_glyphs() as u32)
    }

    /// Outline of `glyph_id` in design units, y up
    pub fn outline(&self, glyph_id: GlyphId) -> std::result::Result<GlyphOutline, FontError> {
        let font = self.font_ref()?;
        let outlines = font.outline_glyphs();
        let Some(glyph) = outlines.get(glyph_id) else {
            return Ok(GlyphOutline::new());
        };

        let settings = DrawSettings::unhinted(Size::unscaled(), LocationRef::default());
        let mut recorder = OutlineRecorder::default();
        glyph
            .draw(settings, &mut recorder)
            .map_err(|e| FontError::Parse(format!("glyph {}: {e}", glyph_id.to_u32())))?;
        Ok(recorder.0)
    }
}

impl FontModel for Font {
    fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    fn glyph_for(&self, ch: char) -> std::result::Result<Glyph, FontError> {
        let gid = self.glyph_id(ch).ok_or(FontError::GlyphNotFound(ch))?;
        let advance = self.advance_width(gid).unwrap_or(0);
        let outline = self.outline(gid)?;
        Ok(Glyph {
            ch,
            outline,
            advance: advance as f32,
            units_per_em: self.units_per_em,
        })
    }

    fn ascent_units(&self) -> i16 {
        self.ascent
    }

    fn descent_units(&self) -> i16 {
        self.descent
    }
}

/// Pen that records skrifa's drawing calls
#[derive(Default)]
struct OutlineRecorder(GlyphOutline);

impl OutlinePen for OutlineRecorder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.0.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.0.line_to(x, y);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.0.quad_to(cx0, cy0, x, y);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.0.curve_to(cx0, cy0, cx1, cy1, x, y);
    }

    fn close(&mut self) {
        self.0.close();
    }
}
