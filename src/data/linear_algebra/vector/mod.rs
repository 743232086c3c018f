//! # Vectors
//!
//! Three flavors: `Dense` for the engine's value arrays, `Sparse` for matrix columns and solve
//! results, and `Update` for the direction vectors of the ratio test, which need both fast random
//! access and fast iteration over the nonzero positions.
pub use dense::Dense;
pub use sparse::Sparse;
pub use update::Update;

mod dense;
mod sparse;
mod update;
