//! Bézier flattening by de Casteljau subdivision
//!
//! Curves are halved until the control points lie within
//! [`FLATNESS_THRESHOLD`] of the chord, then emitted as line ends.

use glyphline_core::fixed::F26Dot6;

/// 4/64 of a sample: flat enough that the polygon and the curve cover the
/// same sample centres in practice
pub const FLATNESS_THRESHOLD: F26Dot6 = F26Dot6::from_raw(4);

/// Recursion cap; 2^16 segments is far past any glyph at the size guard
const MAX_DEPTH: u32 = 16;

/// A point in 26.6 sample space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedPoint {
    pub x: F26Dot6,
    pub y: F26Dot6,
}

impl FixedPoint {
    pub const fn new(x: F26Dot6, y: F26Dot6) -> Self {
        Self { x, y }
    }

    pub fn from_f32(x: f32, y: f32) -> Self {
        Self::new(F26Dot6::from_float(x), F26Dot6::from_float(y))
    }

    /// Rounds towards negative infinity, so shifting both points by whole
    /// pixels shifts the midpoint by exactly the same amount
    #[inline]
    fn midpoint(self, other: Self) -> Self {
        Self::new(
            F26Dot6::from_raw((self.x.raw() + other.x.raw()).div_euclid(2)),
            F26Dot6::from_raw((self.y.raw() + other.y.raw()).div_euclid(2)),
        )
    }

    /// Manhattan distance from `self` to the midpoint of `a` and `b`
    #[inline]
    fn deviation(self, a: Self, b: Self) -> i32 {
        let mid = a.midpoint(b);
        (self.x.raw() - mid.x.raw()).abs() + (self.y.raw() - mid.y.raw()).abs()
    }
}

/// Manhattan distance from the control point to the chord's midpoint
pub fn quadratic_flatness(p0: FixedPoint, p1: FixedPoint, p2: FixedPoint) -> F26Dot6 {
    F26Dot6::from_raw(p1.deviation(p0, p2))
}

/// Larger of the two control points' distances to the chord's midpoint
pub fn cubic_flatness(p0: FixedPoint, p1: FixedPoint, p2: FixedPoint, p3: FixedPoint) -> F26Dot6 {
    F26Dot6::from_raw(p1.deviation(p0, p3).max(p2.deviation(p0, p3)))
}

/// Flatten a quadratic; `output` receives each segment's end point
pub fn subdivide_quadratic<F>(p0: FixedPoint, p1: FixedPoint, p2: FixedPoint, output: &mut F, depth: u32)
where
    F: FnMut(FixedPoint),
{
    if depth >= MAX_DEPTH || quadratic_flatness(p0, p1, p2) <= FLATNESS_THRESHOLD {
        output(p2);
        return;
    }

    let m01 = p0.midpoint(p1);
    let m12 = p1.midpoint(p2);
    let mid = m01.midpoint(m12);

    subdivide_quadratic(p0, m01, mid, output, depth + 1);
    subdivide_quadratic(mid, m12, p2, output, depth + 1);
}

/// Flatten a cubic; `output` receives each segment's end point
pub fn subdivide_cubic<F>(
    p0: FixedPoint,
    p1: FixedPoint,
    p2: FixedPoint,
    p3: FixedPoint,
    output: &mut F,
    depth: u32,
) where
    F: FnMut(FixedPoint),
{
    if depth >= MAX_DEPTH || cubic_flatness(p0, p1, p2, p3) <= FLATNESS_THRESHOLD {
        output(p3);
        return;
    }

    let m01 = p0.midpoint(p1);
    let m12 = p1.midpoint(p2);
    let m23 = p2.midpoint(p3);
    let m012 = m01.midpoint(m12);
    let m123 = m12.midpoint(m23);
    let mid = m012.midpoint(m123);

    subdivide_cubic(p0, m01, m012, mid, output, depth + 1);
    subdivide_cubic(mid, m123, m23, p3, output, depth + 1);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: i32, y: i32) -> FixedPoint {
        FixedPoint::new(F26Dot6::from_int(x), F26Dot6::from_int(y))
    }

    #[test]
    fn straight_quadratic_is_one_segment() {
        let mut ends = Vec::new();
        subdivide_quadratic(pt(0, 0), pt(5, 0), pt(10, 0), &mut |p| ends.push(p), 0);
        assert_eq!(ends, vec![pt(10, 0)]);
    }

    #[test]
    fn bent_quadratic_ends_at_its_end_point() {
        let mut ends = Vec::new();
        subdivide_quadratic(pt(0, 0), pt(10, 20), pt(20, 0), &mut |p| ends.push(p), 0);
        assert!(ends.len() > 4);
        assert_eq!(ends.last(), Some(&pt(20, 0)));
        // the apex of this curve sits at y = 10
        let top = ends.iter().map(|p| p.y).max().unwrap();
        assert!((top.to_float() - 10.0).abs() < 0.25, "apex {}", top.to_float());
    }

    #[test]
    fn cubic_flattens_within_threshold() {
        let mut ends = Vec::new();
        subdivide_cubic(
            pt(0, 0),
            pt(0, 30),
            pt(30, 30),
            pt(30, 0),
            &mut |p| ends.push(p),
            0,
        );
        assert!(ends.len() > 4);
        assert_eq!(ends.last(), Some(&pt(30, 0)));
    }

    #[test]
    fn flatness_measures() {
        assert_eq!(quadratic_flatness(pt(0, 0), pt(5, 0), pt(10, 0)), F26Dot6::ZERO);
        assert_eq!(
            quadratic_flatness(pt(0, 0), pt(5, 2), pt(10, 0)),
            F26Dot6::from_int(2)
        );
        assert_eq!(
            cubic_flatness(pt(0, 0), pt(3, 1), pt(7, 3), pt(10, 0)),
            F26Dot6::from_int(5)
        );
    }
}
