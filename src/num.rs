//! Deterministic fixed-point numbers
//!
//! All positional and velocity math in the simulation goes through [`Num`] so
//! that every platform produces bit-identical results. The representation is a
//! signed 64-bit integer with 16 fractional bits; products and quotients are
//! widened to `i128` before rescaling.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Number of fractional bits
pub const FRAC_BITS: u32 = 16;
const ONE_RAW: i64 = 1 << FRAC_BITS;

/// Fixed-point scalar (`num_t` in the legacy engine)
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Num(i64);

impl Num {
    pub const ZERO: Num = Num(0);
    pub const ONE: Num = Num(ONE_RAW);
    pub const MAX: Num = Num(i64::MAX);
    pub const MIN: Num = Num(i64::MIN);

    /// Build from a raw fixed-point value
    #[inline]
    pub const fn from_raw(raw: i64) -> Self {
        Num(raw)
    }

    /// Raw fixed-point value
    #[inline]
    pub const fn raw(self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn from_int(v: i32) -> Self {
        Num((v as i64) << FRAC_BITS)
    }

    /// Exact-as-possible `numer / denom`, rounded to nearest.
    ///
    /// Used for decimal literals: `Num::ratio(95, 100)` is 0.95.
    pub const fn ratio(numer: i64, denom: i64) -> Self {
        let scaled = (numer as i128) << FRAC_BITS;
        let half = (denom as i128).abs() / 2;
        let rounded = if (scaled < 0) != (denom < 0) {
            (scaled - half * (denom as i128).signum()) / denom as i128
        } else {
            (scaled + half * (denom as i128).signum()) / denom as i128
        };
        Num(rounded as i64)
    }

    /// Nearest representable value. Only for config input and tests.
    pub fn from_f64(v: f64) -> Self {
        Num((v * ONE_RAW as f64).round() as i64)
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / ONE_RAW as f64
    }

    /// Truncate toward negative infinity
    pub fn floor(self) -> Self {
        Num(self.0 & !(ONE_RAW - 1))
    }

    /// Integer part, truncated toward zero
    pub fn to_int(self) -> i32 {
        (self.0 / ONE_RAW) as i32
    }

    pub fn abs(self) -> Self {
        Num(self.0.saturating_abs())
    }

    pub fn signum(self) -> i32 {
        self.0.signum() as i32
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Square root, truncated. Negative input yields zero.
    pub fn sqrt(self) -> Self {
        if self.0 <= 0 {
            return Num::ZERO;
        }
        // sqrt(v * 2^16) * 2^8 == sqrt(v) * 2^16
        Num(isqrt((self.0 as u128) << FRAC_BITS) as i64)
    }

    /// Euclidean length of `(x, y)`
    pub fn dist(x: Num, y: Num) -> Self {
        let sq = (x.0 as i128) * (x.0 as i128) + (y.0 as i128) * (y.0 as i128);
        Num(isqrt(sq as u128) as i64)
    }

    /// Division that keeps full precision of a pre-scaled numerator.
    /// Division by zero yields zero.
    pub fn divided_by(self, rhs: Num) -> Self {
        if rhs.0 == 0 {
            return Num::ZERO;
        }
        Num((((self.0 as i128) << FRAC_BITS) / rhs.0 as i128) as i64)
    }

    /// Subtraction clamped to the representable range
    pub fn saturating_sub(self, rhs: Num) -> Num {
        Num(self.0.saturating_sub(rhs.0))
    }

    pub fn min(self, other: Num) -> Num {
        Ord::min(self, other)
    }

    pub fn max(self, other: Num) -> Num {
        Ord::max(self, other)
    }
}

fn isqrt(n: u128) -> u128 {
    if n < 2 {
        return n;
    }
    // Newton iteration from an over-estimate
    let mut x = 1u128 << ((128 - n.leading_zeros()).div_ceil(2));
    loop {
        let y = (x + n / x) / 2;
        if y >= x {
            return x;
        }
        x = y;
    }
}

impl From<i32> for Num {
    fn from(v: i32) -> Self {
        Num::from_int(v)
    }
}

impl Add for Num {
    type Output = Num;
    #[inline]
    fn add(self, rhs: Num) -> Num {
        Num(self.0.wrapping_add(rhs.0))
    }
}

impl Sub for Num {
    type Output = Num;
    #[inline]
    fn sub(self, rhs: Num) -> Num {
        Num(self.0.wrapping_sub(rhs.0))
    }
}

impl Mul for Num {
    type Output = Num;
    #[inline]
    fn mul(self, rhs: Num) -> Num {
        Num(((self.0 as i128 * rhs.0 as i128) >> FRAC_BITS) as i64)
    }
}

impl Div for Num {
    type Output = Num;
    /// Division by zero yields zero; the simulation must never abort.
    #[inline]
    fn div(self, rhs: Num) -> Num {
        self.divided_by(rhs)
    }
}

impl Mul<i32> for Num {
    type Output = Num;
    #[inline]
    fn mul(self, rhs: i32) -> Num {
        Num(self.0.wrapping_mul(rhs as i64))
    }
}

impl Mul<Num> for i32 {
    type Output = Num;
    #[inline]
    fn mul(self, rhs: Num) -> Num {
        rhs * self
    }
}

impl Div<i32> for Num {
    type Output = Num;
    #[inline]
    fn div(self, rhs: i32) -> Num {
        if rhs == 0 {
            return Num::ZERO;
        }
        Num(self.0 / rhs as i64)
    }
}

impl Add<i32> for Num {
    type Output = Num;
    #[inline]
    fn add(self, rhs: i32) -> Num {
        self + Num::from_int(rhs)
    }
}

impl Sub<i32> for Num {
    type Output = Num;
    #[inline]
    fn sub(self, rhs: i32) -> Num {
        self - Num::from_int(rhs)
    }
}

impl Neg for Num {
    type Output = Num;
    #[inline]
    fn neg(self) -> Num {
        Num(self.0.wrapping_neg())
    }
}

impl AddAssign for Num {
    fn add_assign(&mut self, rhs: Num) {
        *self = *self + rhs;
    }
}

impl AddAssign<i32> for Num {
    fn add_assign(&mut self, rhs: i32) {
        *self = *self + rhs;
    }
}

impl SubAssign for Num {
    fn sub_assign(&mut self, rhs: Num) {
        *self = *self - rhs;
    }
}

impl SubAssign<i32> for Num {
    fn sub_assign(&mut self, rhs: i32) {
        *self = *self - rhs;
    }
}

impl MulAssign for Num {
    fn mul_assign(&mut self, rhs: Num) {
        *self = *self * rhs;
    }
}

impl DivAssign<i32> for Num {
    fn div_assign(&mut self, rhs: i32) {
        *self = *self / rhs;
    }
}

impl PartialEq<i32> for Num {
    fn eq(&self, other: &i32) -> bool {
        *self == Num::from_int(*other)
    }
}

impl PartialOrd<i32> for Num {
    fn partial_cmp(&self, other: &i32) -> Option<Ordering> {
        Some(self.cmp(&Num::from_int(*other)))
    }
}

impl fmt::Debug for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}

// Config files carry plain decimals.
impl Serialize for Num {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}

impl<'de> Deserialize<'de> for Num {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Num::from_f64)
    }
}
