//! # Iterative refinement
//!
//! Solves the floating-point image of an exact problem, measures the residual in rational
//! arithmetic, and feeds a scaled correction problem back to the floating-point engine, warm
//! started from the final basis. The corrections accumulate into an exact primal-dual pair; the
//! loop ends at exact optimality, on stalling progress, or at the round limit.
use itertools::izip;
use log::{debug, info};
use num::{One, Zero};

use crate::algorithm::config::Config;
use crate::algorithm::refine::quality::{
    bound_violation, constraint_violation, dual_violation, reduced_cost_violation,
    slack_violation, Violation,
};
use crate::algorithm::simplex::factorization::Factorization;
use crate::algorithm::simplex::SimplexEngine;
use crate::algorithm::statistics::Statistics;
use crate::algorithm::{SolverError, Status};
use crate::data::linear_program::elements::VariableStatus;
use crate::data::linear_program::problem::{Problem, Variable};
use crate::data::linear_program::solution::Solution;
use crate::data::number_types::rational::Rational;
use crate::data::number_types::traits::SolverScalar;

pub mod quality;

/// The quality surface of a refined solution, all measured exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct RefinementQuality {
    pub constraint: Violation<Rational>,
    pub bound: Violation<Rational>,
    pub slack: Violation<Rational>,
    pub reduced_cost: Violation<Rational>,
    pub dual: Violation<Rational>,
}

/// Outcome of a refinement run.
#[derive(Debug, Clone)]
pub struct RefinementResult {
    pub status: Status,
    /// The accumulated exact solution; present when the underlying solves were optimal.
    pub solution: Option<Solution<Rational>>,
    /// Exact violations of the final pair.
    pub quality: Option<RefinementQuality>,
    /// Whether the target tolerance was reached.
    pub converged: bool,
    pub refinements: u64,
    pub stall_refinements: u64,
}

/// Drives floating-point solves toward an exact rational optimum.
pub struct RefinementDriver {
    problem: Problem<Rational>,
    config: Config,
    engine: Option<SimplexEngine<f64>>,
}

impl RefinementDriver {
    pub fn new(problem: Problem<Rational>, config: Config) -> Self {
        Self { problem, config, engine: None }
    }

    /// Statistics of the underlying engine, including the refinement counters.
    pub fn statistics(&self) -> Option<&Statistics> {
        self.engine.as_ref().map(|engine| engine.statistics())
    }

    /// Solve to the configured rational tolerance.
    pub fn solve(&mut self) -> Result<RefinementResult, SolverError> {
        let tolerance = Rational::from_f64_lossy(self.config.refinement_tolerance);

        let float_problem = self.problem.to_f64();
        let mut engine = SimplexEngine::load(&float_problem, self.config.clone())?;
        let status = engine.solve()?;
        if status != Status::Optimal {
            self.engine = Some(engine);
            return Ok(RefinementResult {
                status,
                solution: None,
                quality: None,
                converged: false,
                refinements: 0,
                stall_refinements: 0,
            });
        }

        let float_solution = engine.solution().expect("optimal engine has a solution");
        engine.statistics_mut().sync_time.start();
        let mut primal: Vec<Rational> = float_solution.primal.iter()
            .map(|&value| Rational::from_f64_lossy(value))
            .collect();
        let mut dual: Vec<Rational> = float_solution.dual.iter()
            .map(|&value| Rational::from_f64_lossy(value))
            .collect();
        engine.statistics_mut().sync_time.stop();

        let mut refinements = 0_u64;
        let mut stall_refinements = 0_u64;
        let mut consecutive_stalls = 0_u32;
        let mut previous_violation: Option<Rational> = None;
        let mut converged = false;
        let mut last_status = status;

        for round in 0..self.config.max_refinements {
            let violation = self.maximum_violation(&primal, &dual);
            if violation <= tolerance {
                converged = true;
                info!("refinement converged after {} corrections", refinements);
                break;
            }

            // A round that fails to halve the violation is a stall; two in a row end the loop.
            if let Some(previous) = &previous_violation {
                if violation.clone() + &violation > *previous {
                    stall_refinements += 1;
                    consecutive_stalls += 1;
                    debug!("refinement round {} stalled", round);
                    if consecutive_stalls >= 2 {
                        break;
                    }
                } else {
                    consecutive_stalls = 0;
                }
            }
            previous_violation = Some(violation.clone());

            // Scale by the next power of two above the reciprocal violation, so that the
            // floating-point image of the correction problem is built from exact doublings.
            let mut scale = Rational::one();
            scale = scale / &violation;
            scale.pow_round();

            engine.statistics_mut().transform_time.start();
            let correction = self.correction_problem(&primal, &dual, &scale)?;
            engine.replace_sides_and_costs(&correction.to_f64())?;
            engine.statistics_mut().transform_time.stop();

            last_status = engine.solve_from_basis()?;
            engine.statistics_mut().refinements += 1;
            refinements += 1;
            if last_status != Status::Optimal {
                debug!("correction solve ended {}; stopping refinement", last_status);
                break;
            }

            let correction_solution = engine.solution().expect("optimal engine has a solution");
            engine.statistics_mut().sync_time.start();
            for (accumulated, &value) in izip!(&mut primal, &correction_solution.primal) {
                accumulated.add_quotient(&Rational::from_f64_lossy(value), &scale);
            }
            for (accumulated, &value) in izip!(&mut dual, &correction_solution.dual) {
                accumulated.add_quotient(&Rational::from_f64_lossy(value), &scale);
            }
            engine.statistics_mut().sync_time.stop();

            // Once the basis has settled on the optimal one, its exact basic solution ends the
            // loop with a residual that is truly zero, which no amount of scaled re-solving
            // reaches from the accumulated doubles.
            if let Some((exact_primal, exact_dual)) = self.exact_basic_solution(&engine) {
                if self.maximum_violation(&exact_primal, &exact_dual).is_zero() {
                    primal = exact_primal;
                    dual = exact_dual;
                    converged = true;
                    info!("exact basic solution optimal after {} corrections", refinements);
                    break;
                }
            }
        }

        engine.statistics_mut().stall_refinements += stall_refinements;

        let result = RefinementResult {
            status: last_status,
            solution: Some(self.assemble(&primal, &dual)),
            quality: Some(self.quality(&primal, &dual)),
            converged,
            refinements,
            stall_refinements,
        };
        self.engine = Some(engine);
        Ok(result)
    }

    /// The exact primal-dual pair determined by the engine's current basis, solved in rational
    /// arithmetic. `None` when the exact basis matrix is singular.
    fn exact_basic_solution(
        &self,
        engine: &SimplexEngine<f64>,
    ) -> Option<(Vec<Rational>, Vec<Rational>)> {
        let nr_columns = self.problem.nr_columns();
        let nr_rows = self.problem.nr_rows();
        let matrix = self.problem.matrix();
        let statuses = engine.variable_statuses();

        let columns = engine.basis_indices().iter()
            .map(|&id| {
                if id < nr_columns {
                    matrix.column(id).to_vec()
                } else {
                    vec![(id - nr_columns, -Rational::one())]
                }
            })
            .collect();
        let threshold = Rational::new(1, 100);
        let factorization =
            Factorization::factor(columns, &threshold, &Rational::zero()).ok()?;

        // The value a non-basic id rests at, exactly.
        let nonbasic_value = |id: usize| -> Rational {
            let (lower, upper) = if id < nr_columns {
                let variable = self.problem.variable(id);
                (variable.lower.clone(), variable.upper.clone())
            } else {
                (self.problem.lhs(id - nr_columns).clone(), self.problem.rhs(id - nr_columns).clone())
            };
            match statuses[id] {
                VariableStatus::AtLower | VariableStatus::Fixed => lower,
                VariableStatus::AtUpper => upper,
                VariableStatus::Free | VariableStatus::Basic => Rational::zero(),
            }
        };

        let mut rhs = vec![Rational::zero(); nr_rows];
        for id in 0..(nr_columns + nr_rows) {
            if statuses[id].is_basic() {
                continue;
            }
            let value = nonbasic_value(id);
            if value.is_zero() {
                continue;
            }
            if id < nr_columns {
                for (i, coefficient) in matrix.column(id) {
                    rhs[*i].sub_product(&value, coefficient);
                }
            } else {
                rhs[id - nr_columns] += &value;
            }
        }
        let basic_values = factorization.solve_right(
            rhs.into_iter()
                .enumerate()
                .filter(|(_, value)| !value.is_zero())
                .collect(),
        );

        let mut primal: Vec<Rational> = (0..nr_columns).map(nonbasic_value).collect();
        for (slot, value) in basic_values.iter() {
            let id = engine.basis_indices()[*slot];
            if id < nr_columns {
                primal[id] = value.clone();
            }
        }

        let basic_costs = engine.basis_indices().iter()
            .enumerate()
            .filter(|(_, &id)| id < nr_columns)
            .map(|(slot, &id)| (slot, self.problem.variable(id).cost.clone()))
            .filter(|(_, cost)| !cost.is_zero())
            .collect::<Vec<_>>();
        let duals = factorization.solve_left(basic_costs);
        let mut dual = vec![Rational::zero(); nr_rows];
        for (i, value) in duals.iter() {
            dual[*i] = value.clone();
        }

        Some((primal, dual))
    }

    /// The largest exact primal or dual violation of the accumulated pair.
    fn maximum_violation(&self, primal: &[Rational], dual: &[Rational]) -> Rational {
        let mut largest = constraint_violation(&self.problem, primal).maximum;
        let bound = bound_violation(&self.problem, primal).maximum;
        if bound > largest {
            largest = bound;
        }
        let dual = dual_violation(&self.problem, primal, dual).maximum;
        if dual > largest {
            largest = dual;
        }
        largest
    }

    /// The shifted problem whose right-hand sides and objective are the scaled residuals.
    fn correction_problem(
        &self,
        primal: &[Rational],
        dual: &[Rational],
        scale: &Rational,
    ) -> Result<Problem<Rational>, SolverError> {
        let infinity = Rational::bound_infinity();
        let matrix = self.problem.matrix();

        let variables = self.problem.variables().iter()
            .enumerate()
            .map(|(j, variable)| {
                let reduced = variable.cost.clone() - matrix.column_dot(j, dual);
                Variable {
                    cost: scale.clone() * reduced,
                    lower: shifted_bound(&variable.lower, &primal[j], scale, &infinity),
                    upper: shifted_bound(&variable.upper, &primal[j], scale, &infinity),
                }
            })
            .collect();

        let mut lhs = Vec::with_capacity(self.problem.nr_rows());
        let mut rhs = Vec::with_capacity(self.problem.nr_rows());
        for i in 0..self.problem.nr_rows() {
            let activity = matrix.row_dot(i, primal);
            lhs.push(shifted_bound(self.problem.lhs(i), &activity, scale, &infinity));
            rhs.push(shifted_bound(self.problem.rhs(i), &activity, scale, &infinity));
        }

        Problem::new(
            matrix.clone(),
            variables,
            lhs,
            rhs,
            self.problem.objective(),
        ).map_err(SolverError::from)
    }

    /// The exact solution record of the accumulated pair.
    fn assemble(&self, primal: &[Rational], dual: &[Rational]) -> Solution<Rational> {
        let matrix = self.problem.matrix();
        let objective = self.problem.variables().iter()
            .zip(primal)
            .map(|(variable, value)| variable.cost.clone() * value)
            .sum();
        let reduced_costs = (0..self.problem.nr_columns())
            .map(|j| self.problem.variable(j).cost.clone() - matrix.column_dot(j, dual))
            .collect();
        let slacks = (0..self.problem.nr_rows())
            .map(|i| matrix.row_dot(i, primal))
            .collect();

        Solution {
            objective,
            primal: primal.to_vec(),
            dual: dual.to_vec(),
            reduced_costs,
            slacks,
        }
    }

    fn quality(&self, primal: &[Rational], dual: &[Rational]) -> RefinementQuality {
        let slacks: Vec<Rational> = (0..self.problem.nr_rows())
            .map(|i| self.problem.matrix().row_dot(i, primal))
            .collect();

        RefinementQuality {
            constraint: constraint_violation(&self.problem, primal),
            bound: bound_violation(&self.problem, primal),
            slack: slack_violation(&self.problem, primal, &slacks),
            reduced_cost: reduced_cost_violation(&self.problem, dual),
            dual: dual_violation(&self.problem, primal, dual),
        }
    }
}

/// `scale * (bound - reference)`, with infinite bounds staying put.
fn shifted_bound(
    bound: &Rational,
    reference: &Rational,
    scale: &Rational,
    infinity: &Rational,
) -> Rational {
    if bound.abs() >= *infinity {
        bound.clone()
    } else {
        scale.clone() * (bound.clone() - reference)
    }
}

#[cfg(test)]
mod test {
    use num::Zero;

    use crate::algorithm::config::Config;
    use crate::algorithm::refine::RefinementDriver;
    use crate::algorithm::Status;
    use crate::data::linear_algebra::matrix::SparseMatrix;
    use crate::data::linear_program::elements::Objective;
    use crate::data::linear_program::problem::{Problem, Variable};
    use crate::data::number_types::rational::Rational;
    use crate::R;

    /// minimize x subject to 3x >= 1, x >= 0: the optimum 1/3 is not a double.
    fn third_problem() -> Problem<Rational> {
        Problem::new(
            SparseMatrix::from_columns(vec![vec![(0, R!(3, 1))]], 1),
            vec![Variable {
                cost: R!(1, 1),
                lower: Rational::zero(),
                upper: Rational::bound_infinity(),
            }],
            vec![R!(1, 1)],
            vec![Rational::bound_infinity()],
            Objective::Minimize,
        ).unwrap()
    }

    #[test]
    fn refines_to_the_exact_third() {
        let mut driver = RefinementDriver::new(third_problem(), Config::default());
        let result = driver.solve().unwrap();

        assert_eq!(result.status, Status::Optimal);
        assert!(result.converged);
        assert!(result.refinements <= 3);

        let solution = result.solution.unwrap();
        assert_eq!(solution.primal[0], R!(1, 3));
        assert_eq!(solution.objective, R!(1, 3));

        let quality = result.quality.unwrap();
        assert_eq!(quality.constraint.maximum, Rational::zero());
        assert_eq!(quality.bound.maximum, Rational::zero());
        assert_eq!(quality.dual.maximum, Rational::zero());
    }

    #[test]
    fn infeasible_problems_are_reported_without_refinement() {
        // x >= 2 and x <= 1 through two rows.
        let problem = Problem::new(
            SparseMatrix::from_columns(vec![vec![(0, R!(1, 1)), (1, R!(1, 1))]], 2),
            vec![Variable {
                cost: Rational::zero(),
                lower: -Rational::bound_infinity(),
                upper: Rational::bound_infinity(),
            }],
            vec![R!(2, 1), -Rational::bound_infinity()],
            vec![Rational::bound_infinity(), R!(1, 1)],
            Objective::Minimize,
        ).unwrap();

        let mut driver = RefinementDriver::new(problem, Config::default());
        let result = driver.solve().unwrap();
        assert_eq!(result.status, Status::Infeasible);
        assert_eq!(result.refinements, 0);
        assert!(result.solution.is_none());
    }
}
