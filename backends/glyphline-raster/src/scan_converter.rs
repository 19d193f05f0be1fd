//! Scanline conversion of flattened outlines into a 1-bit sample grid
//!
//! Every sample is tested at its centre. A sample is inside when the
//! accumulated winding of the crossings to its left is non-zero (or odd,
//! under [`FillRule::EvenOdd`]).

use glyphline_core::fixed::F26Dot6;

use crate::curves::{subdivide_cubic, subdivide_quadratic, FixedPoint};
use crate::edge::{first_center_at_or_after, Edge, EdgeTable};
use crate::FillRule;

/// Collects outline segments and fills them into a sample grid
#[derive(Debug)]
pub struct ScanConverter {
    table: EdgeTable,
    current: FixedPoint,
    contour_start: FixedPoint,
    contour_open: bool,
    fill_rule: FillRule,
    width: usize,
    height: usize,
}

impl ScanConverter {
    /// A converter for a grid of `width * height` samples
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            table: EdgeTable::new(height),
            current: FixedPoint::default(),
            contour_start: FixedPoint::default(),
            contour_open: false,
            fill_rule: FillRule::NonZeroWinding,
            width,
            height,
        }
    }

    pub fn set_fill_rule(&mut self, rule: FillRule) {
        self.fill_rule = rule;
    }

    pub fn fill_rule(&self) -> FillRule {
        self.fill_rule
    }

    /// Start a new contour, closing any contour left open
    pub fn move_to(&mut self, p: FixedPoint) {
        if self.contour_open {
            self.close();
        }
        self.current = p;
        self.contour_start = p;
        self.contour_open = true;
    }

    pub fn line_to(&mut self, p: FixedPoint) {
        self.add_line(self.current, p);
        self.current = p;
    }

    pub fn quad_to(&mut self, control: FixedPoint, p: FixedPoint) {
        let start = self.current;
        subdivide_quadratic(start, control, p, &mut |end| self.line_to(end), 0);
    }

    pub fn cubic_to(&mut self, c0: FixedPoint, c1: FixedPoint, p: FixedPoint) {
        let start = self.current;
        subdivide_cubic(start, c0, c1, p, &mut |end| self.line_to(end), 0);
    }

    /// Line back to the contour's first point
    pub fn close(&mut self) {
        if self.current != self.contour_start {
            self.add_line(self.current, self.contour_start);
        }
        self.current = self.contour_start;
        self.contour_open = false;
    }

    fn add_line(&mut self, from: FixedPoint, to: FixedPoint) {
        if let Some(edge) = Edge::new(from.x, from.y, to.x, to.y) {
            self.table.insert(edge);
        }
    }

    /// Fill the collected outline into `bitmap`, one byte per sample
    ///
    /// Covered samples become 1, everything else 0. Any open contour is
    /// closed first.
    pub fn render_mono(&mut self, bitmap: &mut [u8]) {
        if self.contour_open {
            self.close();
        }
        bitmap.fill(0);
        if bitmap.len() < self.width * self.height {
            log::warn!(
                "Sample buffer holds {} bytes, {}x{} needed",
                bitmap.len(),
                self.width,
                self.height
            );
            return;
        }

        log::trace!(
            "Scan converting {} edges into {}x{} samples",
            self.table.len(),
            self.width,
            self.height
        );

        let width = self.width as i32;
        for row in 0..self.height {
            let fill_rule = self.fill_rule;
            let crossings = self.table.crossings(row as i32);
            let line = &mut bitmap[row * self.width..(row + 1) * self.width];

            let mut winding = 0i32;
            let mut span_start = F26Dot6::ZERO;
            for crossing in crossings {
                let was_inside = is_inside(fill_rule, winding);
                winding += crossing.direction as i32;
                let inside = is_inside(fill_rule, winding);

                if !was_inside && inside {
                    span_start = crossing.x;
                } else if was_inside && !inside {
                    fill_span(line, width, span_start, crossing.x);
                }
            }
        }
    }
}

#[inline]
fn is_inside(rule: FillRule, winding: i32) -> bool {
    match rule {
        FillRule::NonZeroWinding => winding != 0,
        FillRule::EvenOdd => winding % 2 != 0,
    }
}

/// Set every sample whose centre lies in `[x_start, x_end)`
fn fill_span(line: &mut [u8], width: i32, x_start: F26Dot6, x_end: F26Dot6) {
    let start = first_center_at_or_after(x_start).clamp(0, width) as usize;
    let end = first_center_at_or_after(x_end).clamp(0, width) as usize;
    if start < end {
        line[start..end].fill(1);
    }
}
