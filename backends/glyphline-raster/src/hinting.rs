//! Grid fitting for `HintingMode::Full`
//!
//! Works on an outline that is already in pixel space (y up). Each axis is
//! fitted on its own:
//!
//! 1. Collect features: flat horizontal segments give a y, upright vertical
//!    segments give an x, each tagged with the direction the outline runs
//!    along it. The baseline gives y = 0 and the outline's on-curve extremes
//!    are added on both axes, all without a direction.
//! 2. Merge features closer than 1/64 px, then round each to a whole pixel.
//!    Neighbouring features of opposite direction closer than 0.15 em are a
//!    stem: the far edge is placed from the near one, keeping the rounded
//!    stem width and never less than one pixel.
//! 3. Move every point, control points included. A point between two features
//!    is interpolated between their fitted positions; a point outside them
//!    shifts with the nearest one.

use glyphline_core::outline::{GlyphOutline, OutlineCommand, Point};

/// Features closer than this collapse into one
const MERGE_DISTANCE: f32 = 1.0 / 64.0;

/// Opposite edges closer than this share of the em form a stem
pub const STEM_EM_FRACTION: f32 = 0.15;

/// A segment counts as flat when its cross-axis extent is within 1/16 of
/// its length along the axis
const FLAT_RATIO: f32 = 16.0;

/// A coordinate the fitter snaps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Feature {
    pub pos: f32,
    /// Sign of the outline's travel along the edge; 0 when it is not an edge
    pub direction: i8,
}

impl Feature {
    pub fn edge(pos: f32, direction: i8) -> Self {
        Self { pos, direction }
    }

    pub fn point(pos: f32) -> Self {
        Self::edge(pos, 0)
    }

    fn pairs_with(self, upper: Self, max_stem: f32) -> bool {
        self.direction != 0
            && self.direction == -upper.direction
            && upper.pos - self.pos < max_stem
    }
}

/// Coordinates of one axis and where they land on the pixel grid
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisFit {
    original: Vec<f32>,
    fitted: Vec<f32>,
}

impl AxisFit {
    /// Fit `features` to the pixel grid; stems are narrower than `max_stem`
    pub fn new(mut features: Vec<Feature>, max_stem: f32) -> Self {
        features.retain(|f| f.pos.is_finite());
        features.sort_by(|a, b| a.pos.total_cmp(&b.pos));

        let mut merged: Vec<Feature> = Vec::with_capacity(features.len());
        for f in features {
            match merged.last_mut() {
                Some(last) if f.pos - last.pos < MERGE_DISTANCE => {
                    if last.direction == 0 {
                        last.direction = f.direction;
                    }
                },
                _ => merged.push(f),
            }
        }

        let mut fitted: Vec<f32> = Vec::with_capacity(merged.len());
        for (i, &f) in merged.iter().enumerate() {
            let prev = i.checked_sub(1).and_then(|j| merged.get(j)).copied();
            let snapped = match (prev, fitted.last().copied()) {
                (Some(lower), Some(lower_fit)) if lower.pairs_with(f, max_stem) => {
                    lower_fit + (f.pos - lower.pos).round().max(1.0)
                },
                (_, Some(lower_fit)) => f.pos.round().max(lower_fit),
                _ => f.pos.round(),
            };
            fitted.push(snapped);
        }

        Self {
            original: merged.into_iter().map(|f| f.pos).collect(),
            fitted,
        }
    }

    pub fn features(&self) -> &[f32] {
        &self.original
    }

    pub fn fitted(&self) -> &[f32] {
        &self.fitted
    }

    /// Where `v` moves to
    pub fn map(&self, v: f32) -> f32 {
        let (Some(&first), Some(&last)) = (self.original.first(), self.original.last()) else {
            return v;
        };
        let n = self.original.len();

        if v <= first {
            return v + (self.fitted[0] - first);
        }
        if v >= last {
            return v + (self.fitted[n - 1] - last);
        }

        // first index with original > v; v sits in [i - 1, i)
        let i = self.original.partition_point(|&f| f <= v);
        let (lo, hi) = (self.original[i - 1], self.original[i]);
        let (lo_fit, hi_fit) = (self.fitted[i - 1], self.fitted[i]);
        let t = (v - lo) / (hi - lo);
        lo_fit + t * (hi_fit - lo_fit)
    }
}

/// Feature coordinates of an outline, one list per axis
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Features {
    pub x: Vec<Feature>,
    pub y: Vec<Feature>,
}

/// Collect flat segments, the baseline and on-curve extremes
pub fn collect_features(outline: &GlyphOutline) -> Features {
    let mut features = Features {
        x: Vec::new(),
        y: vec![Feature::point(0.0)],
    };

    let mut extremes: Option<(f32, f32, f32, f32)> = None;
    let mut extend = |p: Point| {
        extremes = Some(match extremes {
            None => (p.x, p.y, p.x, p.y),
            Some((x0, y0, x1, y1)) => (x0.min(p.x), y0.min(p.y), x1.max(p.x), y1.max(p.y)),
        });
    };

    let mut current = Point::default();
    let mut start = Point::default();
    let flat = |a: Point, b: Point, features: &mut Features| {
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        if dx != 0.0 && dy.abs() * FLAT_RATIO <= dx.abs() {
            features.y.push(Feature::edge((a.y + b.y) / 2.0, sign(dx)));
        } else if dy != 0.0 && dx.abs() * FLAT_RATIO <= dy.abs() {
            features.x.push(Feature::edge((a.x + b.x) / 2.0, sign(dy)));
        }
    };

    for command in outline.commands() {
        match *command {
            OutlineCommand::MoveTo(p) => {
                extend(p);
                current = p;
                start = p;
            },
            OutlineCommand::LineTo(p) => {
                extend(p);
                flat(current, p, &mut features);
                current = p;
            },
            OutlineCommand::QuadTo(_, p) | OutlineCommand::CurveTo(_, _, p) => {
                extend(p);
                current = p;
            },
            OutlineCommand::Close => {
                flat(current, start, &mut features);
                current = start;
            },
        }
    }

    if let Some((x0, y0, x1, y1)) = extremes {
        features.x.extend([Feature::point(x0), Feature::point(x1)]);
        features.y.extend([Feature::point(y0), Feature::point(y1)]);
    }
    features
}

fn sign(v: f32) -> i8 {
    if v > 0.0 {
        1
    } else {
        -1
    }
}

/// Snap `outline` (pixel space, y up, `ppem` pixels per em) to the pixel grid
pub fn grid_fit(outline: &GlyphOutline, ppem: f32) -> GlyphOutline {
    if outline.is_empty() {
        return outline.clone();
    }

    let max_stem = ppem * STEM_EM_FRACTION;
    let features = collect_features(outline);
    let fit_x = AxisFit::new(features.x, max_stem);
    let fit_y = AxisFit::new(features.y, max_stem);
    log::trace!(
        "Grid fitting {} x and {} y features",
        fit_x.features().len(),
        fit_y.features().len()
    );

    outline.map_points(|p| Point::new(fit_x.map(p.x), fit_y.map(p.y)))
}

/// Advance width under full hinting
pub fn fit_advance(advance: f32) -> f32 {
    advance.round()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(outline: &mut GlyphOutline, x0: f32, y0: f32, x1: f32, y1: f32) {
        outline.move_to(x0, y0);
        outline.line_to(x1, y0);
        outline.line_to(x1, y1);
        outline.line_to(x0, y1);
        outline.close();
    }

    fn points(positions: &[f32]) -> Vec<Feature> {
        positions.iter().map(|&p| Feature::point(p)).collect()
    }

    fn stem(lower: f32, upper: f32) -> Vec<Feature> {
        vec![Feature::edge(lower, -1), Feature::edge(upper, 1)]
    }

    #[test]
    fn axis_fit_rounds_and_interpolates() {
        let fit = AxisFit::new(points(&[0.0, 2.3, 7.6]), 1.5);
        assert_eq!(fit.fitted(), &[0.0, 2.0, 8.0]);
        assert_eq!(fit.map(2.3), 2.0);
        assert!((fit.map(7.6) - 8.0).abs() < 1e-4);
        // halfway between 2.3 and 7.6 lands halfway between 2 and 8
        assert!((fit.map(4.95) - 5.0).abs() < 1e-4);
        // outside the features: shifted with the nearest one
        assert!((fit.map(9.6) - 10.0).abs() < 1e-4);
        assert!((fit.map(-1.0) - -1.0).abs() < 1e-4);
    }

    #[test]
    fn axis_fit_merges_close_features() {
        let fit = AxisFit::new(points(&[3.0, 3.001, 5.0]), 1.5);
        assert_eq!(fit.features(), &[3.0, 5.0]);
    }

    #[test]
    fn merged_features_keep_the_edge_direction() {
        // the baseline and a bottom edge at 0.004 px form one feature, which
        // still pairs with the top edge as a stem
        let features = vec![
            Feature::point(0.0),
            Feature::edge(0.004, -1),
            Feature::edge(0.4, 1),
        ];
        let fit = AxisFit::new(features, 1.5);
        assert_eq!(fit.features(), &[0.0, 0.4]);
        assert_eq!(fit.fitted(), &[0.0, 1.0]);
    }

    #[test]
    fn thin_stems_keep_a_pixel() {
        // 0.8 px wide stems whose edges both round to the same pixel
        assert_eq!(AxisFit::new(stem(3.6, 4.4), 1.5).fitted(), &[4.0, 5.0]);
        assert_eq!(AxisFit::new(stem(4.55, 5.45), 1.5).fitted(), &[5.0, 6.0]);
        // hairlines too
        assert_eq!(AxisFit::new(stem(4.6, 4.9), 1.5).fitted(), &[5.0, 6.0]);
    }

    #[test]
    fn stems_keep_their_rounded_width() {
        // 1.4 .. 2.6 rounds to 1 .. 3 edge by edge, but the stem is 1.2 px
        assert_eq!(AxisFit::new(stem(1.4, 2.6), 1.5).fitted(), &[1.0, 2.0]);
    }

    #[test]
    fn only_close_opposite_edges_are_stems() {
        // same direction: plain rounding, free to collapse
        let same = vec![Feature::edge(4.6, 1), Feature::edge(4.9, 1)];
        assert_eq!(AxisFit::new(same, 1.5).fitted(), &[5.0, 5.0]);
        // no direction: the same
        assert_eq!(AxisFit::new(points(&[4.6, 4.9]), 1.5).fitted(), &[5.0, 5.0]);
        // opposite but wider than the limit: each edge rounds on its own
        assert_eq!(AxisFit::new(stem(1.4, 2.6), 1.0).fitted(), &[1.0, 3.0]);
    }

    #[test]
    fn empty_fit_is_identity() {
        assert_eq!(AxisFit::default().map(3.7), 3.7);
    }

    #[test]
    fn features_come_from_flat_segments() {
        let mut outline = GlyphOutline::new();
        rect(&mut outline, 1.2, 0.0, 3.7, 6.6);
        let features = collect_features(&outline);
        // counter-clockwise: right side runs up, left side down
        assert!(features.x.contains(&Feature::edge(1.2, -1)));
        assert!(features.x.contains(&Feature::edge(3.7, 1)));
        assert!(features.y.contains(&Feature::point(0.0)));
        assert!(features.y.contains(&Feature::edge(0.0, 1)));
        assert!(features.y.contains(&Feature::edge(6.6, -1)));
    }

    #[test]
    fn grid_fit_lands_rectangles_on_pixels() {
        let mut outline = GlyphOutline::new();
        rect(&mut outline, 1.2, -0.3, 3.7, 6.6);
        let fitted = grid_fit(&outline, 10.0);
        let bounds = fitted.bounds().unwrap();
        assert_eq!(bounds.x_min, 1.0);
        assert_eq!(bounds.x_max, 4.0);
        assert_eq!(bounds.y_max, 7.0);
        // -0.3 sits within half a pixel of the baseline and shares its pixel
        assert_eq!(bounds.y_min, 0.0);
        assert_eq!(fitted.commands().len(), outline.commands().len());
    }

    #[test]
    fn stem_limit_scales_with_the_em() {
        // a 1.4 px wide bar: a stem at 10 ppem (limit 1.5 px) but not at
        // 8 ppem (limit 1.2 px)
        let mut outline = GlyphOutline::new();
        rect(&mut outline, 1.4, 0.0, 2.8, 5.0);

        let bounds = grid_fit(&outline, 10.0).bounds().unwrap();
        assert_eq!((bounds.x_min, bounds.x_max), (1.0, 2.0));

        let bounds = grid_fit(&outline, 8.0).bounds().unwrap();
        assert_eq!((bounds.x_min, bounds.x_max), (1.0, 3.0));
    }

    #[test]
    fn control_points_follow_their_neighbours() {
        let mut outline = GlyphOutline::new();
        outline.move_to(0.0, 0.0);
        outline.line_to(4.4, 0.0);
        outline.quad_to(5.2, 3.0, 4.4, 6.4);
        outline.line_to(0.0, 6.4);
        outline.close();
        let fitted = grid_fit(&outline, 10.0);
        for p in fitted.points() {
            assert!(p.y >= 0.0 && p.y <= 6.0, "y = {}", p.y);
        }
    }

    #[test]
    fn advance_rounds_to_whole_pixels() {
        assert_eq!(fit_advance(7.4), 7.0);
        assert_eq!(fit_advance(7.5), 8.0);
    }
}
