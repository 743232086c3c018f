//! # Linear algebra
//!
//! Vectors and matrices, sparse where the simplex method needs them to be.
pub mod matrix;
pub mod vector;

/// A (row or column index, value) combination, the building block of all sparse storage.
pub type SparseTuple<F> = (usize, F);
