//! Pixels in, pixels out
//!
//! A [`CoverageMask`] is what the rasterizer hands back: one byte of ink per
//! pixel. A [`Canvas`] is the RGBA image those masks are painted onto.

use crate::Color;

/// One glyph's coverage, 0 for no ink and 255 for a fully covered pixel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageMask {
    pub width: u32,
    pub height: u32,
    /// Offset of column 0 from the pen origin, in pixels
    pub left: i32,
    /// Distance from the baseline up to row 0, in pixels
    pub top: i32,
    /// Row-major coverage, `width * height` bytes
    pub data: Vec<u8>,
}

impl CoverageMask {
    /// A mask with no pixels
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Coverage at `(x, y)` as a fraction in `[0, 1]`, zero outside the mask
    pub fn coverage(&self, x: u32, y: u32) -> f32 {
        if x >= self.width || y >= self.height {
            return 0.0;
        }
        self.data
            .get((y * self.width + x) as usize)
            .map_or(0.0, |&c| c as f32 / 255.0)
    }
}

/// An RGBA8 image, row-major, four bytes per pixel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    /// A canvas with every pixel set to `background`
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        let count = width as usize * height as usize;
        let pixels = background.to_array().repeat(count);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// The pixel at `(x, y)`, or `None` outside the canvas
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.pixels.get(i..i + 4)?;
        Some(Color::rgba(px[0], px[1], px[2], px[3]))
    }

    /// Paint `foreground` through `mask` with its top-left corner at `(x, y)`
    ///
    /// Source-over per channel, alpha included:
    /// `pixel = foreground * c + pixel * (1 - c)`. Mask pixels that land
    /// outside the canvas are dropped.
    pub fn composite(&mut self, x: i32, y: i32, mask: &CoverageMask, foreground: Color) {
        if mask.is_empty() {
            return;
        }

        let fg = foreground.to_array();
        let width = self.width as i64;
        let height = self.height as i64;

        for my in 0..mask.height {
            let cy = y as i64 + my as i64;
            if cy < 0 || cy >= height {
                continue;
            }
            let row = (my * mask.width) as usize;

            for mx in 0..mask.width {
                let cx = x as i64 + mx as i64;
                if cx < 0 || cx >= width {
                    continue;
                }

                let coverage = match mask.data.get(row + mx as usize) {
                    Some(&0) | None => continue,
                    Some(&c) => c as u32,
                };

                let i = ((cy * width + cx) * 4) as usize;
                if let Some(px) = self.pixels.get_mut(i..i + 4) {
                    for (dst, &src) in px.iter_mut().zip(fg.iter()) {
                        *dst = blend(src, *dst, coverage);
                    }
                }
            }
        }
    }
}

/// `src * c + dst * (1 - c)` with `c = coverage / 255`, rounded to nearest
#[inline]
fn blend(src: u8, dst: u8, coverage: u32) -> u8 {
    let value = src as u32 * coverage + dst as u32 * (255 - coverage);
    ((value + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_mask(width: u32, height: u32, value: u8) -> CoverageMask {
        CoverageMask {
            width,
            height,
            left: 0,
            top: 0,
            data: vec![value; (width * height) as usize],
        }
    }

    #[test]
    fn new_fills_background() {
        let canvas = Canvas::new(3, 2, Color::rgba(1, 2, 3, 4));
        assert_eq!(canvas.pixels().len(), 24);
        assert!(canvas.pixels().chunks(4).all(|px| px == [1, 2, 3, 4]));
        assert_eq!(canvas.pixel(2, 1), Some(Color::rgba(1, 2, 3, 4)));
        assert_eq!(canvas.pixel(3, 0), None);
    }

    #[test]
    fn zero_sized_canvas_has_no_pixels() {
        let canvas = Canvas::new(0, 5, Color::white());
        assert!(canvas.pixels().is_empty());
    }

    #[test]
    fn zero_coverage_is_a_no_op() {
        let mut canvas = Canvas::new(4, 4, Color::rgba(10, 20, 30, 40));
        let before = canvas.clone();
        canvas.composite(0, 0, &solid_mask(4, 4, 0), Color::black());
        assert_eq!(canvas, before);
    }

    #[test]
    fn full_coverage_writes_foreground_exactly() {
        let mut canvas = Canvas::new(2, 2, Color::transparent());
        canvas.composite(0, 0, &solid_mask(1, 1, 255), Color::rgba(200, 100, 50, 255));
        assert_eq!(canvas.pixel(0, 0), Some(Color::rgba(200, 100, 50, 255)));
        assert_eq!(canvas.pixel(1, 0), Some(Color::transparent()));
    }

    #[test]
    fn partial_coverage_blends_every_channel() {
        let mut canvas = Canvas::new(1, 1, Color::white());
        canvas.composite(0, 0, &solid_mask(1, 1, 128), Color::black());
        // 255 * 127 / 255 = 127 for colour, alpha stays 255
        assert_eq!(canvas.pixel(0, 0), Some(Color::rgba(127, 127, 127, 255)));

        let mut canvas = Canvas::new(1, 1, Color::transparent());
        canvas.composite(0, 0, &solid_mask(1, 1, 51), Color::black());
        // alpha 255 * 0.2 = 51
        assert_eq!(canvas.pixel(0, 0), Some(Color::rgba(0, 0, 0, 51)));
    }

    #[test]
    fn out_of_bounds_pixels_are_discarded() {
        let mut canvas = Canvas::new(3, 3, Color::transparent());
        canvas.composite(-1, -1, &solid_mask(2, 2, 255), Color::black());
        canvas.composite(2, 2, &solid_mask(4, 4, 255), Color::black());
        canvas.composite(10, 10, &solid_mask(4, 4, 255), Color::black());

        let inked: Vec<_> = (0..3)
            .flat_map(|y| (0..3).map(move |x| (x, y)))
            .filter(|&(x, y)| canvas.pixel(x, y) == Some(Color::black()))
            .collect();
        assert_eq!(inked, vec![(0, 0), (2, 2)]);
    }

    #[test]
    fn mask_coverage_is_normalised() {
        let mask = CoverageMask {
            width: 2,
            height: 1,
            left: 0,
            top: 0,
            data: vec![0, 255],
        };
        assert_eq!(mask.coverage(0, 0), 0.0);
        assert_eq!(mask.coverage(1, 0), 1.0);
        assert_eq!(mask.coverage(5, 0), 0.0);
    }
}
