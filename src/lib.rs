//! # A sequential revised simplex solver
//!
//! Linear programs of the form `minimize c^T x subject to lhs <= Ax <= rhs, l <= x <= u` are
//! solved with the revised simplex method. The basis inverse is maintained as a sparse LU
//! factorization under rank-1 column updates, pivots are selected by a two-phase ratio test with
//! bound shifting to manage degeneracy, and an outer iterative refinement loop composes
//! floating-point solves with rational residual computation to polish a solution toward exact
//! optimality.
//!
//! The crate is split in two: `data` holds the number types, linear algebra and problem
//! representation, `algorithm` holds the simplex machinery and the refinement driver.
pub mod algorithm;
pub mod data;

pub use algorithm::config::Config;
pub use algorithm::refine::RefinementDriver;
pub use algorithm::simplex::SimplexEngine;
pub use algorithm::statistics::Statistics;
pub use algorithm::Status;
pub use data::linear_program::problem::Problem;
pub use data::number_types::rational::Rational;
