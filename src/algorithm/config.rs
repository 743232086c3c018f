//! # Configuration
//!
//! Every tolerance and trigger threshold the solver consults, in one place. The fields are plain
//! doubles; the engine converts them into its scalar type on load, under which the exact
//! instantiation receives zero tolerances through `SolverScalar` instead of these values.
use std::time::Duration;

/// Tolerances and limits.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Tolerated primal and dual infeasibility (the `delta` of the ratio test).
    pub feasibility_tolerance: f64,
    /// Values with magnitude below this are treated as zero.
    pub zero_epsilon: f64,
    /// Relative magnitude a factorization pivot must have to be accepted.
    pub pivot_threshold: f64,
    /// Magnitude below which a diagonal is considered singular during factorization.
    pub singularity_tolerance: f64,

    /// Refactorize after this many rank-1 updates.
    pub refactor_update_max: usize,
    /// Refactorize when the estimated element growth of the factors exceeds this.
    pub refactor_growth_max: f64,
    /// Refactorize when the residual of a verification solve exceeds this.
    pub refactor_residual_tolerance: f64,

    /// Degenerate pivots tolerated before the degeneracy window starts to close.
    pub max_cycle: u32,
    /// Hard bound on consecutive degenerate pivots before the solve is abandoned as singular.
    pub cycle_abort: u32,

    /// Refinement rounds before giving up.
    pub max_refinements: usize,
    /// Maximum rational violation accepted as "exact" by the refinement driver.
    pub refinement_tolerance: f64,

    /// Iteration limit; `None` is unlimited.
    pub iteration_limit: Option<u64>,
    /// Wall-clock limit; `None` is unlimited.
    pub time_limit: Option<Duration>,
    /// Abort once the objective passes this value (lower bound when minimizing).
    pub objective_limit: Option<f64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feasibility_tolerance: 1e-6,
            zero_epsilon: 1e-16,
            pivot_threshold: 0.01,
            singularity_tolerance: 1e-12,

            refactor_update_max: 200,
            refactor_growth_max: 1e8,
            refactor_residual_tolerance: 1e-9,

            max_cycle: 100,
            cycle_abort: 400,

            max_refinements: 50,
            refinement_tolerance: 0.0,

            iteration_limit: None,
            time_limit: None,
            objective_limit: None,
        }
    }
}
