//! # Linear program representation
//!
//! The problem data is immutable after load; the solver keeps its own working copies of anything
//! it perturbs.
pub mod elements;
pub mod problem;
pub mod solution;
