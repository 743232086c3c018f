//! # The scalar abstraction
//!
//! All algorithmic logic is written once, over the `SolverScalar` trait. The two instantiations
//! are `f64` (inexact, with nonzero tolerances) and `Rational` (exact, with all tolerances equal
//! to zero, under which the tolerant comparisons of the ratio test collapse to strict ones).
use std::fmt::{Debug, Display};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use num_traits::{One, Zero};

/// A totally ordered field with the constants and conversions the simplex method needs.
///
/// The by-reference right-hand-side operations are part of the contract so that heap-backed
/// implementors are not cloned on every multiplication.
pub trait SolverScalar:
    Zero
    + One
    + Neg<Output = Self>
    + Add<Output = Self>
    + for<'r> Add<&'r Self, Output = Self>
    + AddAssign
    + for<'r> AddAssign<&'r Self>
    + Sub<Output = Self>
    + for<'r> Sub<&'r Self, Output = Self>
    + SubAssign
    + for<'r> SubAssign<&'r Self>
    + Mul<Output = Self>
    + for<'r> Mul<&'r Self, Output = Self>
    + MulAssign
    + for<'r> MulAssign<&'r Self>
    + Div<Output = Self>
    + for<'r> Div<&'r Self, Output = Self>
    + DivAssign
    + for<'r> DivAssign<&'r Self>
    + Sum
    + PartialOrd
    + Clone
    + Display
    + Debug
{
    /// Whether arithmetic in this type is free of rounding error.
    ///
    /// Exact types get zero tolerances and skip the stability heuristics that only exist to
    /// compensate for floating-point noise.
    const EXACT: bool;

    /// The value representing an absent bound.
    fn infinity() -> Self;

    /// Magnitude of the value.
    fn abs(&self) -> Self;

    /// Values with magnitude below this are treated as zero.
    fn epsilon() -> Self;

    /// Default tolerated primal and dual infeasibility.
    fn feasibility_tolerance() -> Self;

    /// Conversion used for algorithmic constants; exact where the type allows it.
    fn from_f64_lossy(value: f64) -> Self;

    /// Round toward the nearest double.
    fn to_f64(&self) -> f64;

    /// Whether the value represents a finite bound.
    fn is_finite_bound(&self) -> bool {
        self.abs() < Self::infinity()
    }
}

impl SolverScalar for f64 {
    const EXACT: bool = false;

    fn infinity() -> Self {
        f64::INFINITY
    }

    fn abs(&self) -> Self {
        f64::abs(*self)
    }

    fn epsilon() -> Self {
        1e-16
    }

    fn feasibility_tolerance() -> Self {
        1e-6
    }

    fn from_f64_lossy(value: f64) -> Self {
        value
    }

    fn to_f64(&self) -> f64 {
        *self
    }
}

#[cfg(test)]
mod test {
    use crate::data::number_types::traits::SolverScalar;

    #[test]
    fn float_constants() {
        assert!(f64::epsilon() > 0.0);
        assert!(f64::feasibility_tolerance() > f64::epsilon());
        assert!(!f64::infinity().is_finite_bound());
        let large: f64 = 1e100;
        assert!(large.is_finite_bound());
    }
}
