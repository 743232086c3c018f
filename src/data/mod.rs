//! # Data structures
//!
//! Number types, linear algebra primitives and the linear program representation. Everything in
//! this module is independent of the simplex algorithm itself.
pub mod linear_algebra;
pub mod linear_program;
pub mod number_types;
