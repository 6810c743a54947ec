//! Common type aliases used throughout the engine.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::constants::{SCORE_MAX, SCORE_MIN};

/// Search depth.
pub type Depth = u32;

/// Score (disc difference: -64 to +64).
pub type Score = i32;

/// Scaled score used by the alpha-beta search.
///
/// Final game results are disc differences in `-64..=64`. The search works on
/// values eight times larger so that heuristic estimates keep some fractional
/// precision while exact results stay exactly representable.
///
/// # Special Values
///
/// - [`EvalLarge::MIN`] / [`EvalLarge::MAX`]: bounds of every search window (-64/+64 discs)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct EvalLarge(i32);

impl EvalLarge {
    /// Number of bits used for scaling (3 bits = 8x).
    pub const SCALE_BITS: i32 = 3;

    /// Scale factor: 8.
    pub const SCALE: i32 = 1 << Self::SCALE_BITS;

    /// Zero score.
    pub const ZERO: Self = Self(0);

    /// Maximum achievable score: +64 discs.
    pub const MAX: Self = Self(SCORE_MAX * Self::SCALE);

    /// Minimum achievable score: -64 discs.
    pub const MIN: Self = Self(SCORE_MIN * Self::SCALE);

    /// Creates an `EvalLarge` from a raw scaled value.
    ///
    /// # Arguments
    ///
    /// * `raw_value` - The value already expressed in eighths of a disc.
    #[inline(always)]
    pub const fn from_raw(raw_value: i32) -> Self {
        Self(raw_value)
    }

    /// Creates an `EvalLarge` from a disc difference.
    ///
    /// # Arguments
    ///
    /// * `disc_diff` - The disc difference to scale.
    #[inline(always)]
    pub const fn from_disc_diff(disc_diff: Score) -> Self {
        Self(disc_diff * Self::SCALE)
    }

    /// Returns the raw scaled value.
    #[inline(always)]
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Largest disc score `s` with `from_disc_diff(s) <= self`.
    ///
    /// Used to turn a scaled lower bound into the disc window of the exact
    /// solvers without losing soundness.
    #[inline(always)]
    pub const fn to_lower_disc(self) -> Score {
        (self.0 + 8000) / Self::SCALE - 1000
    }

    /// Smallest disc score `s` with `from_disc_diff(s) >= self`.
    #[inline(always)]
    pub const fn to_upper_disc(self) -> Score {
        (self.0 + 8007) / Self::SCALE - 1000
    }

    /// Converts to a floating-point disc difference.
    #[inline(always)]
    pub fn to_disc_diff_f32(self) -> f32 {
        self.0 as f32 / Self::SCALE as f32
    }
}

impl Add<i32> for EvalLarge {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: i32) -> Self {
        Self(self.0 + rhs)
    }
}

impl Sub<i32> for EvalLarge {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: i32) -> Self {
        Self(self.0 - rhs)
    }
}

impl Sub for EvalLarge {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Neg for EvalLarge {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Mul<i32> for EvalLarge {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: i32) -> Self {
        Self(self.0 * rhs)
    }
}

impl Div<i32> for EvalLarge {
    type Output = Self;
    #[inline(always)]
    fn div(self, rhs: i32) -> Self {
        Self(self.0 / rhs)
    }
}

impl fmt::Display for EvalLarge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+.2}", self.to_disc_diff_f32())
    }
}
