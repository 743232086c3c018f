//! # Solutions
use crate::data::number_types::traits::SolverScalar;

/// A primal-dual solution pair, reported in the original problem space after all bound shifts
/// have been unwound.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution<N> {
    /// Objective value in the problem's own optimization direction.
    pub objective: N,
    /// Values of the `n` structural variables.
    pub primal: Vec<N>,
    /// Dual multipliers of the `m` rows.
    pub dual: Vec<N>,
    /// Reduced costs of the `n` structural variables.
    pub reduced_costs: Vec<N>,
    /// Row activities `Ax`.
    pub slacks: Vec<N>,
}

impl<N: SolverScalar> Solution<N> {
    /// Element-wise conversion into another scalar type.
    pub fn map<M: SolverScalar>(&self, f: impl Fn(&N) -> M) -> Solution<M> {
        Solution {
            objective: f(&self.objective),
            primal: self.primal.iter().map(&f).collect(),
            dual: self.dual.iter().map(&f).collect(),
            reduced_costs: self.reduced_costs.iter().map(&f).collect(),
            slacks: self.slacks.iter().map(&f).collect(),
        }
    }
}
