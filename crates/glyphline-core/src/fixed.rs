//! 26.6 fixed point: whole pixels in the high bits, 1/64ths in the low six
//!
//! Advances are accumulated in this format so that a long string rounds once,
//! at the end, instead of once per glyph. The rasterizer feeds its edge
//! tables with the same type.
//!
//! Accumulation is checked: a sum that leaves the `i32` range is `None`,
//! never a wrapped or saturated pixel count.

/// A signed 26.6 fixed-point number
///
/// ```rust
/// use glyphline_core::fixed::F26Dot6;
///
/// let x = F26Dot6::from_int(5);       // exactly 5.0
/// let y = F26Dot6::from_float(5.5);  // 5 + 32/64
/// let total = x.checked_add(y).and_then(F26Dot6::checked_ceil);
/// assert_eq!(total.map(F26Dot6::to_int), Some(11));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct F26Dot6(i32);

impl F26Dot6 {
    pub const FRAC_BITS: u32 = 6;

    pub const FRAC_MASK: i32 = (1 << Self::FRAC_BITS) - 1;

    pub const ONE: F26Dot6 = F26Dot6(1 << Self::FRAC_BITS);

    pub const ZERO: F26Dot6 = F26Dot6(0);

    #[inline]
    pub const fn from_int(x: i32) -> Self {
        F26Dot6(x << Self::FRAC_BITS)
    }

    /// Nearest 1/64th, ties away from zero
    #[inline]
    pub fn from_float(x: f32) -> Self {
        Self::from_f64(x as f64)
    }

    /// Nearest 1/64th of a double-precision value, saturating at the ends
    /// of the range
    #[inline]
    pub fn from_f64(x: f64) -> Self {
        F26Dot6((x * 64.0).round() as i32)
    }

    /// Nearest 1/64th, or `None` when `x` is not finite or out of range
    pub fn checked_from_f64(x: f64) -> Option<Self> {
        let raw = (x * 64.0).round();
        let in_range = raw >= i32::MIN as f64 && raw <= i32::MAX as f64;
        (raw.is_finite() && in_range).then(|| F26Dot6(raw as i32))
    }

    /// Floor to a whole number
    #[inline]
    pub const fn to_int(self) -> i32 {
        self.0 >> Self::FRAC_BITS
    }

    #[inline]
    pub fn to_float(self) -> f32 {
        self.0 as f32 / 64.0
    }

    #[inline]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(raw) => Some(F26Dot6(raw)),
            None => None,
        }
    }

    /// Round up to a whole number; `None` past the largest whole value
    #[inline]
    pub const fn checked_ceil(self) -> Option<Self> {
        if self.0 & Self::FRAC_MASK == 0 {
            return Some(self);
        }
        match (self.0 & !Self::FRAC_MASK).checked_add(Self::ONE.0) {
            Some(raw) => Some(F26Dot6(raw)),
            None => None,
        }
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        F26Dot6(raw)
    }
}
