//! # An arbitrary precision rational type
//!
//! Wrapping the `num::BigRational` type, following the newtype pattern. The wrapper carries the
//! numerical helpers the refinement loop needs: fused accumulators that avoid intermediate
//! rounding, adjacency testing against doubles, power-of-two rounding for residual scaling and
//! size measurement of the underlying representation.
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use num::bigint::BigInt;
use num::rational::BigRational;
use num::{Integer as _, One, Signed, ToPrimitive, Zero};

use crate::data::number_types::traits::SolverScalar;

mod macros;
mod parse;

pub use parse::ParseRationalError;

/// Arbitrary precision signed integer.
pub type Integer = BigInt;

/// An exact rational number `p/q` with `q > 0` and `gcd(p, q) = 1`.
///
/// The canonical form is maintained by the backing type on every operation.
#[derive(Clone, Ord, PartialOrd, Eq, PartialEq, Debug)]
pub struct Rational(BigRational);

/// Domain error in exact arithmetic.
///
/// These are programmer errors: the operator forms panic with a diagnostic instead of returning
/// this value, the `try_` forms surface it.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ArithError {
    /// Division by an exact zero.
    DivisionByZero,
    /// Inversion of an exact zero.
    InversionOfZero,
}

impl fmt::Display for ArithError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::DivisionByZero => write!(f, "rational domain error: division by zero"),
            Self::InversionOfZero => write!(f, "rational domain error: inversion of zero"),
        }
    }
}

impl std::error::Error for ArithError {
}

impl Rational {
    fn wrap(inner: BigRational) -> Self {
        Self(inner)
    }

    /// Create a new instance by converting the two provided numbers into arbitrary size ints.
    ///
    /// Panics if `denom` is zero.
    pub fn new(numer: i64, denom: i64) -> Self {
        assert_ne!(denom, 0, "{}", ArithError::DivisionByZero);

        Self(BigRational::new(numer.into(), denom.into()))
    }

    /// Build from arbitrary precision parts. Panics if `denom` is zero.
    pub fn from_parts(numer: Integer, denom: Integer) -> Self {
        assert!(!denom.is_zero(), "{}", ArithError::DivisionByZero);

        Self(BigRational::new(numer, denom))
    }

    /// Exact conversion from a double; `None` for non-finite input.
    pub fn from_f64(value: f64) -> Option<Self> {
        BigRational::from_float(value).map(Self)
    }

    /// The value that "inf" parses to: `10^100`.
    pub fn bound_infinity() -> Self {
        Self(BigRational::from_integer(BigInt::from(10).pow(100)))
    }

    /// Numerator `p` of the canonical form `p/q`.
    pub fn numerator(&self) -> &Integer {
        self.0.numer()
    }

    /// Denominator `q > 0` of the canonical form `p/q`.
    pub fn denominator(&self) -> &Integer {
        self.0.denom()
    }

    /// `self += a * b` without rounding of the intermediate product.
    pub fn add_product(&mut self, a: &Self, b: &Self) {
        self.0 += &a.0 * &b.0;
    }

    /// `self -= a * b` without rounding of the intermediate product.
    pub fn sub_product(&mut self, a: &Self, b: &Self) {
        self.0 -= &a.0 * &b.0;
    }

    /// `self += a / b`. Panics if `b` is zero.
    pub fn add_quotient(&mut self, a: &Self, b: &Self) {
        assert!(!b.is_zero(), "{}", ArithError::DivisionByZero);

        self.0 += &a.0 / &b.0;
    }

    /// `self -= a / b`. Panics if `b` is zero.
    pub fn sub_quotient(&mut self, a: &Self, b: &Self) {
        assert!(!b.is_zero(), "{}", ArithError::DivisionByZero);

        self.0 -= &a.0 / &b.0;
    }

    /// Swap numerator and denominator in place. Panics on zero.
    pub fn invert(&mut self) {
        self.try_invert().unwrap_or_else(|error| panic!("{}", error));
    }

    /// Fallible variant of `invert`.
    pub fn try_invert(&mut self) -> Result<(), ArithError> {
        if self.0.numer().is_zero() {
            return Err(ArithError::InversionOfZero);
        }

        self.0 = BigRational::new(self.0.denom().clone(), self.0.numer().clone());
        Ok(())
    }

    /// Fallible division.
    pub fn try_div(&self, rhs: &Self) -> Result<Self, ArithError> {
        if rhs.is_zero() {
            return Err(ArithError::DivisionByZero);
        }

        Ok(Self(&self.0 / &rhs.0))
    }

    /// Whether `d` equals the value after rounding to double precision, or is one of the two
    /// doubles bracketing the value.
    ///
    /// Let `x = double(self)`; when `x` converts back exactly the value is representable and the
    /// test passes. Otherwise the bracket is `(x, next_up(x))` when `x` rounded down and
    /// `(next_down(x), x)` when it rounded up, and `d` must be one of its ends.
    pub fn is_adjacent_to(&self, d: f64) -> bool {
        let x = SolverScalar::to_f64(self);
        match Self::from_f64(x) {
            None => false,
            Some(rounded) => {
                if rounded == *self {
                    true
                } else if rounded < *self {
                    d == x || d == x.next_up()
                } else {
                    d == x.next_down() || d == x
                }
            },
        }
    }

    /// Replace the value by `2^ceil(log2(self))`, the smallest power of two at least as large.
    ///
    /// Only defined for positive values. Used to derive the residual scaling factor during
    /// refinement, where a power of two keeps the subsequent floating-point scaling exact.
    pub fn pow_round(&mut self) {
        debug_assert!(self.0.is_positive());

        // 2^(bits(p) - bits(q) - 1) <= p/q < 2^(bits(p) - bits(q) + 1), so the initial estimate
        // is off by at most one step in either direction.
        let mut exponent = self.0.numer().bits() as i64 - self.0.denom().bits() as i64;
        while power_of_two(exponent) < self.0 {
            exponent += 1;
        }
        while power_of_two(exponent - 1) >= self.0 {
            exponent -= 1;
        }

        self.0 = power_of_two(exponent);
    }

    /// `floor(log10(|p|)) - floor(log10(q))`, or `0` when `p` is zero or the two tie.
    pub fn order_of_magnitude(&self) -> i32 {
        if self.0.numer().is_zero() {
            return 0;
        }

        let numer = decimal_digits(self.0.numer()) as i32 - 1;
        let denom = decimal_digits(self.0.denom()) as i32 - 1;
        if numer == denom {
            0
        } else {
            numer - denom
        }
    }

    /// Combined digit count of `|p|` and `q` in the given base; zero is defined as size `3`.
    pub fn size_in_base(&self, base: u32) -> usize {
        debug_assert!((2..=36).contains(&base));

        if self.0.is_zero() {
            return 3;
        }

        digits_in_base(self.0.numer(), base) + digits_in_base(self.0.denom(), base)
    }

    /// Bit size of the representation: `size_in_base(2)`.
    pub fn size_in_bits(&self) -> usize {
        self.size_in_base(2)
    }
}

/// Combined representation size of a vector of rationals.
pub fn total_size(values: &[Rational], base: u32) -> usize {
    values.iter().map(|value| value.size_in_base(base)).sum()
}

/// Size of the least common multiple of the denominators in a vector.
pub fn lcm_den_size(values: &[Rational], base: u32) -> usize {
    let mut lcm = Integer::one();
    for value in values {
        lcm = lcm.lcm(value.denominator());
    }

    Rational::from(lcm).size_in_base(base) + 1
}

/// Size of the largest denominator in a vector.
pub fn max_den_size(values: &[Rational], base: u32) -> usize {
    values.iter()
        .map(|value| Rational::from(value.denominator().clone()).size_in_base(base) + 1)
        .max()
        .unwrap_or(0)
}

fn power_of_two(exponent: i64) -> BigRational {
    if exponent >= 0 {
        BigRational::from_integer(BigInt::one() << exponent as u64)
    } else {
        BigRational::new(BigInt::one(), BigInt::one() << (-exponent) as u64)
    }
}

fn decimal_digits(value: &Integer) -> usize {
    digits_in_base(value, 10)
}

fn digits_in_base(value: &Integer, base: u32) -> usize {
    debug_assert!(!value.is_zero());

    value.magnitude().to_str_radix(base).len()
}

impl From<i32> for Rational {
    fn from(value: i32) -> Self {
        Self(BigRational::from_integer(value.into()))
    }
}

impl From<i64> for Rational {
    fn from(value: i64) -> Self {
        Self(BigRational::from_integer(value.into()))
    }
}

impl From<u64> for Rational {
    fn from(value: u64) -> Self {
        Self(BigRational::from_integer(value.into()))
    }
}

impl From<Integer> for Rational {
    fn from(value: Integer) -> Self {
        Self(BigRational::from_integer(value))
    }
}

macro_rules! forward_binop {
    ($trait:ident, $method:ident) => {
        impl $trait for Rational {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self::Output {
                Self::wrap($trait::$method(self.0, rhs.0))
            }
        }
        impl $trait<&Rational> for Rational {
            type Output = Self;

            fn $method(self, rhs: &Rational) -> Self::Output {
                Self::wrap($trait::$method(self.0, &rhs.0))
            }
        }
        impl $trait<Rational> for &Rational {
            type Output = Rational;

            fn $method(self, rhs: Rational) -> Self::Output {
                Rational::wrap($trait::$method(&self.0, rhs.0))
            }
        }
        impl $trait<&Rational> for &Rational {
            type Output = Rational;

            fn $method(self, rhs: &Rational) -> Self::Output {
                Rational::wrap($trait::$method(&self.0, &rhs.0))
            }
        }
    };
}

macro_rules! forward_op_assign {
    ($trait:ident, $method:ident) => {
        impl $trait for Rational {
            fn $method(&mut self, rhs: Self) {
                $trait::$method(&mut self.0, rhs.0);
            }
        }
        impl $trait<&Rational> for Rational {
            fn $method(&mut self, rhs: &Rational) {
                $trait::$method(&mut self.0, &rhs.0);
            }
        }
    };
}

forward_binop!(Add, add);
forward_binop!(Sub, sub);
forward_binop!(Mul, mul);
forward_binop!(Div, div);
forward_op_assign!(AddAssign, add_assign);
forward_op_assign!(SubAssign, sub_assign);
forward_op_assign!(MulAssign, mul_assign);
forward_op_assign!(DivAssign, div_assign);

impl Neg for Rational {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Neg for &Rational {
    type Output = Rational;

    fn neg(self) -> Self::Output {
        Rational(-&self.0)
    }
}

impl Zero for Rational {
    fn zero() -> Self {
        Self(BigRational::zero())
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl One for Rational {
    fn one() -> Self {
        Self(BigRational::one())
    }
}

impl Sum for Rational {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl PartialEq<f64> for Rational {
    fn eq(&self, other: &f64) -> bool {
        Self::from_f64(*other).map_or(false, |other| *self == other)
    }
}

impl PartialOrd<f64> for Rational {
    fn partial_cmp(&self, other: &f64) -> Option<std::cmp::Ordering> {
        if other.is_nan() {
            return None;
        }
        if other.is_infinite() {
            // Every rational is finite.
            return if *other > 0.0 {
                Some(std::cmp::Ordering::Less)
            } else {
                Some(std::cmp::Ordering::Greater)
            };
        }

        Self::from_f64(*other).map(|other| self.cmp(&other))
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl SolverScalar for Rational {
    const EXACT: bool = true;

    fn infinity() -> Self {
        Self::bound_infinity()
    }

    fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    fn epsilon() -> Self {
        Self::zero()
    }

    fn feasibility_tolerance() -> Self {
        Self::zero()
    }

    fn from_f64_lossy(value: f64) -> Self {
        match Self::from_f64(value) {
            Some(exact) => exact,
            None if value == f64::INFINITY => Self::bound_infinity(),
            None if value == f64::NEG_INFINITY => -Self::bound_infinity(),
            None => panic!("cannot represent {} as a rational", value),
        }
    }

    fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or_else(|| {
            if self.0.is_positive() { f64::INFINITY } else { f64::NEG_INFINITY }
        })
    }
}

#[cfg(test)]
mod test {
    use num::{One, Zero};

    use crate::data::number_types::rational::{
        lcm_den_size, max_den_size, total_size, ArithError, Rational,
    };
    use crate::data::number_types::traits::SolverScalar;
    use crate::R;

    #[test]
    fn arithmetic() {
        assert_eq!(R!(1, 2) + R!(1, 3), R!(5, 6));
        assert_eq!(R!(1, 2) - R!(1, 3), R!(1, 6));
        assert_eq!(R!(2, 3) * R!(3, 4), R!(1, 2));
        assert_eq!(R!(1, 2) / R!(1, 4), R!(2, 1));
        assert_eq!(-R!(1, 2), R!(-1, 2));
        assert_eq!(&R!(1, 2) + &R!(1, 2), Rational::one());
    }

    #[test]
    fn fused_accumulators() {
        let mut value = R!(1, 7);
        value.add_product(&R!(2, 3), &R!(3, 5));
        assert_eq!(value, R!(1, 7) + R!(2, 5));

        let mut value = R!(1, 7);
        value.sub_product(&R!(2, 3), &R!(3, 5));
        assert_eq!(value, R!(1, 7) - R!(2, 5));

        let mut value = Rational::zero();
        value.add_quotient(&R!(1, 3), &R!(2, 1));
        assert_eq!(value, R!(1, 6));

        let mut value = Rational::zero();
        value.sub_quotient(&R!(1, 3), &R!(2, 1));
        assert_eq!(value, R!(-1, 6));
    }

    #[test]
    fn inversion() {
        let mut value = R!(-3, 7);
        value.invert();
        assert_eq!(value, R!(-7, 3));
        // Canonical form keeps the denominator positive.
        assert!(value.denominator() > &num::BigInt::zero());

        let mut zero = Rational::zero();
        assert_eq!(zero.try_invert(), Err(ArithError::InversionOfZero));
    }

    #[test]
    #[should_panic]
    fn panic_invert_zero() {
        let mut zero = Rational::zero();
        zero.invert();
    }

    #[test]
    fn exact_from_double() {
        assert_eq!(Rational::from_f64(0.5).unwrap(), R!(1, 2));
        assert_eq!(Rational::from_f64(0.1).unwrap() == R!(1, 10), false);
        assert!(Rational::from_f64(f64::NAN).is_none());
        assert!(Rational::from_f64(f64::INFINITY).is_none());
    }

    #[test]
    fn adjacency() {
        // Representable exactly.
        assert!(R!(1, 2).is_adjacent_to(0.5));
        // 1/3 is not representable; the rounded value and both bracket ends are adjacent.
        let third = R!(1, 3);
        let x = SolverScalar::to_f64(&third);
        assert!(third.is_adjacent_to(x));
        assert!(third.is_adjacent_to(x.next_up()));
        assert!(!third.is_adjacent_to(x.next_up().next_up()));
        assert!(!third.is_adjacent_to(0.5));
    }

    #[test]
    fn power_rounding() {
        let mut value = R!(5, 1);
        value.pow_round();
        assert_eq!(value, R!(8, 1));

        // Exact powers of two stay in place.
        let mut value = R!(4, 1);
        value.pow_round();
        assert_eq!(value, R!(4, 1));

        let mut value = Rational::one();
        value.pow_round();
        assert_eq!(value, Rational::one());

        let mut value = R!(1, 3);
        value.pow_round();
        assert_eq!(value, R!(1, 2));

        let mut value = R!(1000000, 1);
        value.pow_round();
        assert_eq!(value, R!(1 << 20, 1));
    }

    #[test]
    fn magnitude_order() {
        assert_eq!(Rational::zero().order_of_magnitude(), 0);
        assert_eq!(R!(100, 1).order_of_magnitude(), 2);
        assert_eq!(R!(1, 100).order_of_magnitude(), -2);
        // Same digit count in numerator and denominator ties to zero.
        assert_eq!(R!(17, 23).order_of_magnitude(), 0);
        assert_eq!(R!(-100, 1).order_of_magnitude(), 2);
    }

    #[test]
    fn representation_sizes() {
        assert_eq!(Rational::zero().size_in_base(2), 3);
        assert_eq!(R!(1, 1).size_in_base(2), 2);
        assert_eq!(R!(5, 3).size_in_base(2), 5);
        assert_eq!(R!(5, 3).size_in_bits(), 5);
        assert_eq!(R!(10, 1).size_in_base(10), 3);

        let values = [R!(1, 2), R!(1, 3)];
        assert_eq!(total_size(&values, 10), 4);
        // lcm(2, 3) = 6.
        assert_eq!(lcm_den_size(&values, 10), 2 + 1);
        assert_eq!(max_den_size(&values, 10), 2 + 1);
    }

    #[test]
    fn double_comparison() {
        assert!(R!(1, 2) == 0.5);
        assert!(R!(1, 3) != (1.0 / 3.0));
        assert!(R!(1, 3) < 0.5);
        assert!(R!(1, 2) < f64::INFINITY);
        assert!(R!(1, 2) > f64::NEG_INFINITY);
        assert_eq!(R!(1, 2).partial_cmp(&f64::NAN), None);
    }

    #[test]
    fn display_canonical() {
        assert_eq!(R!(1, 2).to_string(), "1/2");
        assert_eq!(R!(4, 2).to_string(), "2");
        assert_eq!(R!(-1, 2).to_string(), "-1/2");
        assert_eq!(Rational::zero().to_string(), "0");
    }
}
