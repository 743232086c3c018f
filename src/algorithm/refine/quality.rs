//! # Solution quality
//!
//! Violation measures over a primal-dual pair, each reported as a maximum and a sum. Measured in
//! the scalar type of the problem they are given; the refinement driver evaluates them over the
//! rational shadow, where a zero really is a zero.
use crate::data::linear_program::elements::Objective;
use crate::data::linear_program::problem::Problem;
use crate::data::number_types::traits::SolverScalar;

/// Largest single violation and the total over all positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation<N> {
    pub maximum: N,
    pub sum: N,
}

impl<N: SolverScalar> Violation<N> {
    fn none() -> Self {
        Self { maximum: N::zero(), sum: N::zero() }
    }

    fn record(&mut self, amount: N) {
        if amount > self.maximum {
            self.maximum = amount.clone();
        }
        self.sum += amount;
    }
}

/// Distance of `value` outside the interval `[lower, upper]`; zero inside.
fn outside_by<N: SolverScalar>(value: &N, lower: &N, upper: &N) -> N {
    if value < lower {
        lower.clone() - value
    } else if value > upper {
        value.clone() - upper
    } else {
        N::zero()
    }
}

/// Per row, how far the activity `A_i x` lies outside `[lhs_i, rhs_i]`.
pub fn constraint_violation<N: SolverScalar>(problem: &Problem<N>, primal: &[N]) -> Violation<N> {
    debug_assert_eq!(primal.len(), problem.nr_columns());

    let mut violation = Violation::none();
    for i in 0..problem.nr_rows() {
        let activity = problem.matrix().row_dot(i, primal);
        violation.record(outside_by(&activity, problem.lhs(i), problem.rhs(i)));
    }
    violation
}

/// Per column, how far the value lies outside `[l_j, u_j]`.
pub fn bound_violation<N: SolverScalar>(problem: &Problem<N>, primal: &[N]) -> Violation<N> {
    debug_assert_eq!(primal.len(), problem.nr_columns());

    let mut violation = Violation::none();
    for (j, value) in primal.iter().enumerate() {
        let variable = problem.variable(j);
        violation.record(outside_by(value, &variable.lower, &variable.upper));
    }
    violation
}

/// Per row, the mismatch between the activity `A_i x` and the reported slack.
pub fn slack_violation<N: SolverScalar>(
    problem: &Problem<N>,
    primal: &[N],
    slacks: &[N],
) -> Violation<N> {
    debug_assert_eq!(slacks.len(), problem.nr_rows());

    let mut violation = Violation::none();
    for (i, slack) in slacks.iter().enumerate() {
        let activity = problem.matrix().row_dot(i, primal);
        violation.record((activity - slack).abs());
    }
    violation
}

/// The wrong-signed part of the reduced costs `c - A^T y`, computed from scratch.
///
/// Counts every reduced cost with the improving sign, regardless of which bound its variable
/// rests at; a coarse measure, use `dual_violation` for the status-aware one.
pub fn reduced_cost_violation<N: SolverScalar>(problem: &Problem<N>, dual: &[N]) -> Violation<N> {
    debug_assert_eq!(dual.len(), problem.nr_rows());

    let mut violation = Violation::none();
    for j in 0..problem.nr_columns() {
        let reduced = problem.variable(j).cost.clone() - problem.matrix().column_dot(j, dual);
        let amount = match problem.objective() {
            Objective::Minimize if reduced < N::zero() => -reduced,
            Objective::Maximize if reduced > N::zero() => reduced,
            _ => N::zero(),
        };
        violation.record(amount);
    }
    violation
}

/// Status-aware dual infeasibility of a primal-dual pair.
///
/// A variable resting on its lower bound may not have an improving reduced cost, one on its
/// upper bound may not have a worsening one, and one strictly between its bounds must have a
/// vanishing one; rows are held to the same standard through their multipliers.
pub fn dual_violation<N: SolverScalar>(
    problem: &Problem<N>,
    primal: &[N],
    dual: &[N],
) -> Violation<N> {
    debug_assert_eq!(primal.len(), problem.nr_columns());
    debug_assert_eq!(dual.len(), problem.nr_rows());

    let sign = match problem.objective() {
        Objective::Minimize => N::one(),
        Objective::Maximize => -N::one(),
    };

    let mut violation = Violation::none();
    for (j, value) in primal.iter().enumerate() {
        let variable = problem.variable(j);
        let reduced =
            sign.clone() * (variable.cost.clone() - problem.matrix().column_dot(j, dual));
        violation.record(wrong_signed_part(reduced, value, &variable.lower, &variable.upper));
    }
    for (i, multiplier) in dual.iter().enumerate() {
        let activity = problem.matrix().row_dot(i, primal);
        let multiplier = sign.clone() * multiplier;
        violation.record(wrong_signed_part(multiplier, &activity, problem.lhs(i), problem.rhs(i)));
    }
    violation
}

/// The infeasible part of a dual quantity given where its primal partner rests.
fn wrong_signed_part<N: SolverScalar>(dual_value: N, value: &N, lower: &N, upper: &N) -> N {
    if lower == upper {
        // A fixed position constrains nothing.
        N::zero()
    } else if value <= lower {
        // At the lower bound the dual quantity must be nonnegative.
        if dual_value < N::zero() { -dual_value } else { N::zero() }
    } else if value >= upper {
        if dual_value > N::zero() { dual_value } else { N::zero() }
    } else {
        dual_value.abs()
    }
}

#[cfg(test)]
mod test {
    use crate::algorithm::refine::quality::{
        bound_violation, constraint_violation, dual_violation, reduced_cost_violation,
        slack_violation,
    };
    use crate::data::linear_algebra::matrix::SparseMatrix;
    use crate::data::linear_program::elements::Objective;
    use crate::data::linear_program::problem::{Problem, Variable};

    fn cover() -> Problem<f64> {
        Problem::new(
            SparseMatrix::from_columns(vec![vec![(0, 1.0)], vec![(0, 1.0)]], 1),
            vec![
                Variable { cost: 1.0, lower: 0.0, upper: 1.0 },
                Variable { cost: 1.0, lower: 0.0, upper: 1.0 },
            ],
            vec![1.0],
            vec![f64::INFINITY],
            Objective::Minimize,
        ).unwrap()
    }

    #[test]
    fn optimal_pair_has_no_violation() {
        let problem = cover();
        let primal = [1.0, 0.0];
        let dual = [1.0];

        assert_eq!(constraint_violation(&problem, &primal).maximum, 0.0);
        assert_eq!(bound_violation(&problem, &primal).maximum, 0.0);
        assert_eq!(slack_violation(&problem, &primal, &[1.0]).maximum, 0.0);
        assert_eq!(reduced_cost_violation(&problem, &dual).maximum, 0.0);
        assert_eq!(dual_violation(&problem, &primal, &dual).maximum, 0.0);
    }

    #[test]
    fn violations_are_measured() {
        let problem = cover();
        // The row demands x + y >= 1.
        let primal = [0.25, 0.25];
        let violation = constraint_violation(&problem, &primal);
        assert_eq!(violation.maximum, 0.5);
        assert_eq!(violation.sum, 0.5);

        let outside = [-0.5, 2.0];
        let violation = bound_violation(&problem, &outside);
        assert_eq!(violation.maximum, 1.0);
        assert_eq!(violation.sum, 1.5);

        assert_eq!(slack_violation(&problem, &primal, &[1.0]).maximum, 0.5);

        // A dual above both costs makes every reduced cost improving.
        let violation = reduced_cost_violation(&problem, &[1.5]);
        assert_eq!(violation.maximum, 0.5);
        assert_eq!(violation.sum, 1.0);
    }

    #[test]
    fn dual_violation_respects_the_resting_bound() {
        let problem = cover();
        // x rests at its upper bound, so its negative reduced cost 1 - 1.5 is fine; y rests at
        // its lower bound, where the same value is a violation.
        let primal = [1.0, 0.0];
        let violation = dual_violation(&problem, &primal, &[1.5]);
        assert_eq!(violation.maximum, 0.5);
    }
}
