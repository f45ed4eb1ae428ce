//! # Sample Type
//!
//! Every DSP building block in this crate is generic over the floating
//! point type it processes. The plugins run everything in `f32` (that is
//! what the host hands us), while tests that need to check phase
//! accumulation or steady-state gain over tens of thousands of samples
//! can switch to `f64`.
//!
//! The [`Sample`] trait collects exactly the arithmetic the delay lines,
//! filters, and ramps need, and nothing more.

use std::fmt::Debug;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

/// A floating point audio sample (`f32` or `f64`).
pub trait Sample:
    Copy
    + Default
    + Debug
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + Send
    + 'static
{
    const ZERO: Self;
    const ONE: Self;
    /// A full turn in radians (2π).
    const TAU: Self;

    /// Convert a literal constant (delay times, ramp durations, limits).
    fn from_f64(value: f64) -> Self;
    fn from_usize(value: usize) -> Self;
    /// Truncate toward zero. Negative values and NaN saturate to 0.
    fn to_usize(self) -> usize;

    fn floor(self) -> Self;
    fn ceil(self) -> Self;
    fn sin(self) -> Self;
    fn powf(self, exponent: Self) -> Self;
    fn clamp(self, min: Self, max: Self) -> Self;
    fn max(self, other: Self) -> Self;
    fn min(self, other: Self) -> Self;
    fn abs(self) -> Self;
    fn is_finite(self) -> bool;
}

macro_rules! impl_sample {
    ($t:ident) => {
        impl Sample for $t {
            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;
            const TAU: Self = std::$t::consts::TAU;

            #[inline]
            fn from_f64(value: f64) -> Self {
                value as $t
            }

            #[inline]
            fn from_usize(value: usize) -> Self {
                value as $t
            }

            #[inline]
            fn to_usize(self) -> usize {
                self as usize
            }

            #[inline]
            fn floor(self) -> Self {
                $t::floor(self)
            }

            #[inline]
            fn ceil(self) -> Self {
                $t::ceil(self)
            }

            #[inline]
            fn sin(self) -> Self {
                $t::sin(self)
            }

            #[inline]
            fn powf(self, exponent: Self) -> Self {
                $t::powf(self, exponent)
            }

            #[inline]
            fn clamp(self, min: Self, max: Self) -> Self {
                $t::clamp(self, min, max)
            }

            #[inline]
            fn max(self, other: Self) -> Self {
                $t::max(self, other)
            }

            #[inline]
            fn min(self, other: Self) -> Self {
                $t::min(self, other)
            }

            #[inline]
            fn abs(self) -> Self {
                $t::abs(self)
            }

            #[inline]
            fn is_finite(self) -> bool {
                $t::is_finite(self)
            }
        }
    };
}

impl_sample!(f32);
impl_sample!(f64);

/// Convert a duration in milliseconds to (fractional) samples.
///
/// Multiplying before dividing keeps whole-millisecond delays at
/// "round" sample rates exact: `1.0 ms * 48000 / 1000 = 48.0`.
#[inline]
pub fn ms_to_samples<T: Sample>(delay_ms: T, sample_rate: T) -> T {
    delay_ms * sample_rate / T::from_f64(1000.0)
}
