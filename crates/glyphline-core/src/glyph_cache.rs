//! Per-render glyph mask cache
//!
//! Repeated letters at the same sub-pixel phase rasterize to the same mask.
//! The cache lives for one render call and is dropped with it; nothing is
//! shared between renders.

use std::num::NonZeroUsize;

use lru::LruCache;

use crate::{fixed::F26Dot6, types::RasterizedGlyph};

/// Sub-pixel phases per pixel the cache distinguishes
pub const PHASE_STEPS: i32 = 4;

/// Default number of masks kept per render
const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(256) {
    Some(v) => v,
    None => unreachable!(),
};

/// A character at one quantized pen phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlyphCacheKey {
    pub ch: char,
    /// Phase in `0..PHASE_STEPS`
    pub phase: u8,
}

impl GlyphCacheKey {
    pub fn new(ch: char, phase: u8) -> Self {
        Self { ch, phase }
    }
}

/// Split a pen position into a whole pixel and a quantized phase
///
/// The pen is rounded to the nearest `1 / PHASE_STEPS` px first, so a
/// fraction that rounds up to a whole pixel carries into the integer part.
/// Returns `(pixel, phase index, phase offset in pixels)`.
pub fn split_pen(pen: F26Dot6) -> (i32, u8, f32) {
    let step = 64 / PHASE_STEPS;
    let steps = (pen.raw() + step / 2).div_euclid(step);
    let pixel = steps.div_euclid(PHASE_STEPS);
    let phase = steps.rem_euclid(PHASE_STEPS);
    (pixel, phase as u8, phase as f32 / PHASE_STEPS as f32)
}

/// LRU cache of rasterized glyphs, with hit and miss counts
pub struct GlyphCache {
    cache: LruCache<GlyphCacheKey, RasterizedGlyph>,
    hits: u64,
    misses: u64,
}

impl GlyphCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(DEFAULT_CAPACITY);
        Self {
            cache: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    pub fn get(&mut self, key: &GlyphCacheKey) -> Option<&RasterizedGlyph> {
        match self.cache.get(key) {
            Some(glyph) => {
                self.hits += 1;
                Some(glyph)
            },
            None => {
                self.misses += 1;
                None
            },
        }
    }

    pub fn insert(&mut self, key: GlyphCacheKey, glyph: RasterizedGlyph) {
        self.cache.put(key, glyph);
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

impl Default for GlyphCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY.get())
    }
}
