//! # Number types
//!
//! The solver runs the same algorithm over two scalar types: `f64` for the fast floating-point
//! passes and an arbitrary precision `Rational` for exact passes and residual computation. The
//! shared behavior is captured by the `SolverScalar` trait.
pub mod rational;
pub mod traits;
