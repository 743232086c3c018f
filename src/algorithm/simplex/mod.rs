//! # The simplex engine
//!
//! A single primal and dual simplex loop over the bounded-variable system `Ax - s = 0` with
//! `l <= x <= u` and `lhs <= s <= rhs`. The engine owns the basis state exclusively; pricing and
//! the ratio test receive read-only views plus capability contexts through which they may request
//! bound shifts, which are journaled and unwound before any terminal status is reported.
//!
//! Internally every problem is a minimization; a maximization problem is loaded with negated
//! costs and reported back in its own orientation.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use log::{debug, trace};

use crate::algorithm::config::Config;
use crate::algorithm::simplex::basis::{Basis, ShiftEntry, ShiftTarget};
use crate::algorithm::simplex::factorization::{ColumnAndSpike, Factorization};
use crate::algorithm::simplex::pricing::{Direction, PivotUpdate, Pricer, Pricing, PricingView};
use crate::algorithm::simplex::ratio_test::harris;
use crate::algorithm::simplex::ratio_test::{EnterContext, EnterId, LeaveContext};
use crate::algorithm::statistics::Statistics;
use crate::algorithm::{SolverError, Status};
use crate::data::linear_algebra::matrix::SparseMatrix;
use crate::data::linear_algebra::vector::{Dense, Sparse, Update};
use crate::data::linear_algebra::SparseTuple;
use crate::data::linear_program::elements::{Objective, VariableStatus};
use crate::data::linear_program::problem::Problem;
use crate::data::linear_program::solution::Solution;
use crate::data::number_types::traits::SolverScalar;

pub mod basis;
pub mod factorization;
pub mod pricing;
pub mod ratio_test;

/// Internal state machine of the engine.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SolveState {
    Loaded,
    PrimalFeasible,
    DualFeasible,
    Optimal,
    Infeasible,
    Unbounded,
    Singular,
    AbortLimit,
}

/// How an inner loop ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum LoopOutcome {
    Optimal,
    Unbounded,
    Infeasible,
    Limit(Status),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum StepOutcome {
    Pivoted,
    Optimal,
    Unbounded,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum DualStepOutcome {
    Pivoted,
    PrimalFeasible,
    Infeasible,
}

/// The revised simplex method over a factorized basis.
pub struct SimplexEngine<N, P = Pricer<N>> {
    // Problem data in internal (minimization) form. Variable ids run over the `n` structural
    // columns first, then the `m` logical row variables.
    matrix: SparseMatrix<N>,
    cost: Vec<N>,
    original_lower: Vec<N>,
    original_upper: Vec<N>,
    lower: Vec<N>,
    upper: Vec<N>,
    objective: Objective,
    nr_columns: usize,
    nr_rows: usize,

    basis: Basis,
    factorization: Factorization<N>,

    fvec: Dense<N>,
    fvec_lb: Dense<N>,
    fvec_ub: Dense<N>,
    reduced_costs: Dense<N>,

    // Dual loop working state: `row_prices` is `y`, `column_prices` is `A^T y`, and the four
    // bound arrays are the dual feasibility boxes derived from costs and statuses.
    row_prices: Dense<N>,
    column_prices: Dense<N>,
    column_price_lb: Dense<N>,
    column_price_ub: Dense<N>,
    row_price_lb: Dense<N>,
    row_price_ub: Dense<N>,

    journal: Vec<ShiftEntry<N>>,
    total_shift: N,
    num_cycle: u32,

    state: SolveState,
    limit_status: Option<Status>,

    pricer: P,
    config: Config,
    epsilon: N,
    delta: N,
    pivot_threshold: N,
    singularity_tolerance: N,

    statistics: Statistics,
    abort: Option<Arc<AtomicBool>>,
    solve_started: Option<Instant>,
    iterations_this_solve: u64,
    warm_start: bool,
}

impl<N: SolverScalar> SimplexEngine<N, Pricer<N>> {
    /// Load a problem with the default pricing strategy.
    pub fn load(problem: &Problem<N>, config: Config) -> Result<Self, SolverError> {
        Self::load_with_pricer(problem, config, Pricer::default())
    }
}

impl<N: SolverScalar, P: Pricing<N>> SimplexEngine<N, P> {
    /// Load a problem, sizing all engine state once.
    pub fn load_with_pricer(
        problem: &Problem<N>,
        config: Config,
        mut pricer: P,
    ) -> Result<Self, SolverError> {
        let nr_columns = problem.nr_columns();
        let nr_rows = problem.nr_rows();
        let total = nr_columns + nr_rows;

        let mut cost = Vec::with_capacity(total);
        let mut lower = Vec::with_capacity(total);
        let mut upper = Vec::with_capacity(total);
        for variable in problem.variables() {
            cost.push(match problem.objective() {
                Objective::Minimize => variable.cost.clone(),
                Objective::Maximize => -variable.cost.clone(),
            });
            lower.push(variable.lower.clone());
            upper.push(variable.upper.clone());
        }
        for i in 0..nr_rows {
            cost.push(N::zero());
            lower.push(problem.lhs(i).clone());
            upper.push(problem.rhs(i).clone());
        }

        let statuses = (0..nr_columns)
            .map(|j| initial_status(&cost[j], &lower[j], &upper[j]))
            .collect();
        let basis = Basis::logical(statuses, nr_rows);

        pricer.load(total, nr_rows);

        let exact = N::EXACT;
        let tolerance = |value: f64| if exact { N::zero() } else { N::from_f64_lossy(value) };

        Ok(Self {
            matrix: problem.matrix().clone(),
            original_lower: lower.clone(),
            original_upper: upper.clone(),
            cost,
            lower,
            upper,
            objective: problem.objective(),
            nr_columns,
            nr_rows,

            basis,
            factorization: Factorization::identity(nr_rows),

            fvec: Dense::zeros(nr_rows),
            fvec_lb: Dense::zeros(nr_rows),
            fvec_ub: Dense::zeros(nr_rows),
            reduced_costs: Dense::zeros(total),

            row_prices: Dense::zeros(nr_rows),
            column_prices: Dense::zeros(nr_columns),
            column_price_lb: Dense::zeros(nr_columns),
            column_price_ub: Dense::zeros(nr_columns),
            row_price_lb: Dense::zeros(nr_rows),
            row_price_ub: Dense::zeros(nr_rows),

            journal: Vec::new(),
            total_shift: N::zero(),
            num_cycle: 0,

            state: SolveState::Loaded,
            limit_status: None,

            epsilon: tolerance(config.zero_epsilon),
            delta: tolerance(config.feasibility_tolerance),
            pivot_threshold: N::from_f64_lossy(config.pivot_threshold),
            singularity_tolerance: tolerance(config.singularity_tolerance),
            pricer,
            config,

            statistics: Statistics::default(),
            abort: None,
            solve_started: None,
            iterations_this_solve: 0,
            warm_start: false,
        })
    }

    /// Solve from the initial (all-logical) basis.
    pub fn solve(&mut self) -> Result<Status, SolverError> {
        self.solve_inner(false)
    }

    /// Solve keeping the current basis and statuses, e.g. after the problem data was replaced by
    /// `replace_sides_and_costs`.
    pub fn solve_from_basis(&mut self) -> Result<Status, SolverError> {
        self.solve_inner(true)
    }

    fn solve_inner(&mut self, warm: bool) -> Result<Status, SolverError> {
        self.statistics.solving_time.start();
        self.solve_started = Some(Instant::now());
        self.iterations_this_solve = 0;
        self.limit_status = None;
        self.warm_start = warm;

        let result = self.run(warm);

        self.statistics.solving_time.stop();

        match result {
            Ok(status) => Ok(status),
            Err(error) => {
                if matches!(error, SolverError::Singular | SolverError::NumericalFailure) {
                    self.state = SolveState::Singular;
                }
                Err(error)
            },
        }
    }

    fn run(&mut self, warm: bool) -> Result<Status, SolverError> {
        self.statistics.preprocessing_time.start();
        if !warm {
            for j in 0..self.nr_columns {
                self.basis.statuses[j] =
                    initial_status(&self.cost[j], &self.lower[j], &self.upper[j]);
            }
            let structural_statuses = self.basis.statuses[..self.nr_columns].to_vec();
            self.basis = Basis::logical(structural_statuses, self.nr_rows);
            self.num_cycle = 0;
        }
        let prepared = self.refactorize();
        self.statistics.preprocessing_time.stop();
        prepared?;

        self.statistics.simplex_time.start();
        let result = self.iterate();
        self.statistics.simplex_time.stop();
        result
    }

    fn iterate(&mut self) -> Result<Status, SolverError> {
        for attempt in 0..2 {
            let outcome = self.main_loops()?;
            match outcome {
                LoopOutcome::Limit(status) => {
                    self.state = SolveState::AbortLimit;
                    self.limit_status = Some(status);
                    return Ok(status);
                },
                LoopOutcome::Unbounded => {
                    self.unshift_all();
                    self.state = SolveState::Unbounded;
                    return Ok(Status::Unbounded);
                },
                LoopOutcome::Infeasible => {
                    self.unshift_all();
                    self.state = SolveState::Infeasible;
                    return Ok(Status::Infeasible);
                },
                LoopOutcome::Optimal => {
                    // Optimal in the possibly shifted problem: unwind all shifts and verify
                    // feasibility in the original one.
                    self.unshift_all();
                    self.refresh_basic_bounds();
                    if self.is_primal_feasible() {
                        // The incremental reduced costs have drifted over the pivots; the
                        // reported duals come from one fresh transpose solve.
                        self.recompute_reduced_costs();
                        self.state = SolveState::Optimal;
                        return Ok(Status::Optimal);
                    }
                    if attempt == 0 {
                        debug!("residual infeasibility after unshifting; refactorizing once");
                        self.refactorize()?;
                    }
                },
            }
        }

        Err(SolverError::NumericalFailure)
    }

    /// Dispatch between the primal and dual loop until one of them concludes.
    fn main_loops(&mut self) -> Result<LoopOutcome, SolverError> {
        loop {
            self.recompute_reduced_costs();

            if self.is_primal_feasible() {
                self.state = SolveState::PrimalFeasible;
                match self.primal_loop()? {
                    LoopOutcome::Optimal => return Ok(LoopOutcome::Optimal),
                    other => return Ok(other),
                }
            } else if self.is_dual_feasible() {
                self.state = SolveState::DualFeasible;
                match self.dual_loop()? {
                    // The dual loop ends primal feasible; one primal pass confirms optimality.
                    LoopOutcome::Optimal => continue,
                    other => return Ok(other),
                }
            } else {
                self.shift_into_primal_feasibility();
            }
        }
    }

    fn primal_loop(&mut self) -> Result<LoopOutcome, SolverError> {
        loop {
            if let Some(status) = self.check_limits()? {
                return Ok(LoopOutcome::Limit(status));
            }
            if self.num_cycle > self.config.cycle_abort {
                return Err(SolverError::Singular);
            }
            match self.primal_step()? {
                StepOutcome::Pivoted => {},
                StepOutcome::Optimal => return Ok(LoopOutcome::Optimal),
                StepOutcome::Unbounded => return Ok(LoopOutcome::Unbounded),
            }
        }
    }

    fn dual_loop(&mut self) -> Result<LoopOutcome, SolverError> {
        self.setup_dual_prices();
        loop {
            if let Some(status) = self.check_limits()? {
                return Ok(LoopOutcome::Limit(status));
            }
            if self.num_cycle > self.config.cycle_abort {
                return Err(SolverError::Singular);
            }
            match self.dual_step()? {
                DualStepOutcome::Pivoted => {},
                DualStepOutcome::PrimalFeasible => return Ok(LoopOutcome::Optimal),
                DualStepOutcome::Infeasible => return Ok(LoopOutcome::Infeasible),
            }
        }
    }

    fn primal_step(&mut self) -> Result<StepOutcome, SolverError> {
        let view = PricingView {
            reduced_costs: &self.reduced_costs,
            status: &self.basis.statuses,
            basis: &self.basis.indices,
            fvec: &self.fvec,
            fvec_lb: &self.fvec_lb,
            fvec_ub: &self.fvec_ub,
            tolerance: &self.delta,
        };
        let Some((entering, direction)) = self.pricer.select_enter(&view) else {
            return Ok(StepOutcome::Optimal);
        };
        trace!("primal pivot: variable {} enters {:?}", entering, direction);

        let column = self.variable_column(entering);
        let ColumnAndSpike { column: w, spike } = self.timed_solve_right(column);

        let sign = match direction {
            Direction::Increasing => N::one(),
            Direction::Decreasing => -N::one(),
        };
        let span_is_finite = self.lower[entering].is_finite_bound()
            && self.upper[entering].is_finite_bound();
        let mut val = if span_is_finite {
            sign.clone() * (self.upper[entering].clone() - &self.lower[entering])
        } else {
            sign.clone() * N::infinity()
        };

        let mut upd = Update::zeros(self.nr_rows);
        for (slot, value) in w.iter() {
            upd.set_value(*slot, -value.clone());
        }

        let mut context = LeaveAdapter {
            epsilon: self.epsilon.clone(),
            delta: self.delta.clone(),
            num_cycle: self.num_cycle,
            max_cycle: self.config.max_cycle,
            basis_indices: &self.basis.indices,
            lower: &mut self.lower,
            upper: &mut self.upper,
            fvec_lb: &mut self.fvec_lb,
            fvec_ub: &mut self.fvec_ub,
            journal: &mut self.journal,
            total_shift: &mut self.total_shift,
        };
        let leave = harris::select_leave(&mut val, &mut upd, &self.fvec, &mut context);

        let Some(slot) = leave else {
            return if span_is_finite {
                // No basic position blocks before the opposite bound: a bound flip.
                for k in 0..upd.size() {
                    let i = upd.index(k);
                    self.fvec[i] += val.clone() * &upd[i];
                }
                self.basis.statuses[entering] = match self.basis.statuses[entering] {
                    VariableStatus::AtLower => VariableStatus::AtUpper,
                    VariableStatus::AtUpper => VariableStatus::AtLower,
                    other => other,
                };
                self.register_step_size(&val);
                self.count_iteration(true);
                Ok(StepOutcome::Pivoted)
            } else {
                Ok(StepOutcome::Unbounded)
            };
        };

        let theta = val;
        // The pivot row, needed for the reduced cost update and the pricing weights.
        let rho = self.timed_solve_left(vec![(slot, N::one())]);
        let alpha_row = self.spread_over_ids(&rho);
        let kappa_row = if self.pricer.wants_transformed_row() {
            let transformed = self.timed_solve_left(
                w.iter().map(|(i, v)| (*i, v.clone())).collect(),
            );
            Some(self.spread_over_ids(&transformed))
        } else {
            None
        };

        for k in 0..upd.size() {
            let i = upd.index(k);
            self.fvec[i] += theta.clone() * &upd[i];
        }

        let leaving = self.basis.indices[slot];
        let leaving_status = self.nearest_bound_status(leaving, &self.fvec[slot]);
        let entering_value = self.nonbasic_value(entering) + &theta;

        // alpha_q = w[slot] = -upd[slot].
        let alpha_q = -upd[slot].clone();
        let ratio = self.reduced_costs[entering].clone() / &alpha_q;
        for (j, alpha) in alpha_row.iter() {
            if j != entering {
                self.reduced_costs[j] -= ratio.clone() * alpha;
            }
        }
        self.reduced_costs[entering] = N::zero();
        self.reduced_costs[leaving] = -ratio.clone();

        self.basis.exchange(slot, entering, leaving_status);
        self.fvec[slot] = entering_value;
        self.fvec_lb[slot] = self.lower[entering].clone();
        self.fvec_ub[slot] = self.upper[entering].clone();

        let mut pivot_column = Update::zeros(self.nr_rows);
        for (s, value) in w.iter() {
            pivot_column.set_value(*s, value.clone());
        }
        self.pricer.update_weights(&PivotUpdate {
            entering,
            slot,
            leaving,
            pivot_column: &pivot_column,
            alpha_row: &alpha_row,
            kappa_row: kappa_row.as_ref(),
            pivot: &alpha_q,
        });

        self.apply_factorization_update(slot, spike)?;
        self.register_step_size(&theta);
        self.count_iteration(true);
        Ok(StepOutcome::Pivoted)
    }

    fn dual_step(&mut self) -> Result<DualStepOutcome, SolverError> {
        let view = PricingView {
            reduced_costs: &self.reduced_costs,
            status: &self.basis.statuses,
            basis: &self.basis.indices,
            fvec: &self.fvec,
            fvec_lb: &self.fvec_lb,
            fvec_ub: &self.fvec_ub,
            tolerance: &self.delta,
        };
        let Some(slot) = self.pricer.select_leave(&view) else {
            return Ok(DualStepOutcome::PrimalFeasible);
        };

        let leaving = self.basis.indices[slot];
        let to_lower = self.fvec[slot] < self.fvec_lb[slot];
        let target_bound = if to_lower {
            self.fvec_lb[slot].clone()
        } else {
            self.fvec_ub[slot].clone()
        };
        let leaving_status = if self.lower[leaving] == self.upper[leaving] {
            VariableStatus::Fixed
        } else if to_lower {
            VariableStatus::AtLower
        } else {
            VariableStatus::AtUpper
        };
        // The leaving variable's reduced cost moves by `-t`; leaving to the lower bound needs it
        // nonnegative afterwards, so the dual step is negative, and vice versa.
        let mut val = if to_lower { -N::infinity() } else { N::infinity() };
        trace!("dual pivot: slot {} leaves {:?}", slot, leaving_status);

        let rho = self.timed_solve_left(vec![(slot, N::one())]);
        let mut pupd = Update::zeros(self.nr_columns);
        let mut cupd = Update::zeros(self.nr_rows);
        for (i, value) in rho.iter() {
            cupd.set_value(*i, value.clone());
            for (j, coefficient) in self.matrix.row(*i) {
                pupd.shift_value(*j, &(value.clone() * coefficient));
            }
        }

        let mut context = EnterAdapter {
            epsilon: self.epsilon.clone(),
            delta: self.delta.clone(),
            num_cycle: self.num_cycle,
            max_cycle: self.config.max_cycle,
            nr_columns: self.nr_columns,
            matrix: &self.matrix,
            positions: &self.basis.positions,
            column_lb: &mut self.column_price_lb,
            column_ub: &mut self.column_price_ub,
            row_lb: &mut self.row_price_lb,
            row_ub: &mut self.row_price_ub,
            journal: &mut self.journal,
            total_shift: &mut self.total_shift,
        };
        let entered = harris::select_enter(
            &mut val,
            &mut pupd,
            &mut self.column_prices,
            &mut cupd,
            &self.row_prices,
            &mut context,
        );

        let Some(enter_id) = entered else {
            // No price bound blocks the dual step: the dual is unbounded, the primal infeasible.
            return Ok(DualStepOutcome::Infeasible);
        };
        let entering = match enter_id {
            EnterId::Column(j) => j,
            EnterId::Row(i) => self.nr_columns + i,
        };
        let step = val;
        if !step.is_finite_bound() {
            // A candidate from an earlier pass survived while the current pass found no blocking
            // bound at all: the dual ray is unbounded.
            return Ok(DualStepOutcome::Infeasible);
        }

        let column = self.variable_column(entering);
        let ColumnAndSpike { column: w, spike } = self.timed_solve_right(column);
        let alpha_q = match w.get(slot) {
            Some(value) if value.abs() > self.epsilon => value.clone(),
            _ => {
                // The pivot is numerically unusable; rebuild the factors and retry, or give up
                // when they are already fresh.
                if self.factorization.nr_updates() > 0 {
                    debug!("tiny dual pivot; refactorizing");
                    self.refactorize()?;
                    self.recompute_reduced_costs();
                    self.setup_dual_prices();
                    return Ok(DualStepOutcome::Pivoted);
                }
                return Err(SolverError::Singular);
            },
        };

        let theta = (self.fvec[slot].clone() - &target_bound) / &alpha_q;
        for (s, value) in w.iter() {
            self.fvec[*s] -= theta.clone() * value;
        }
        let entering_value = self.nonbasic_value(entering) + &theta;

        for (i, value) in rho.iter() {
            self.row_prices[*i] += step.clone() * value;
        }
        for k in 0..pupd.size() {
            let j = pupd.index(k);
            self.column_prices[j] += step.clone() * &pupd[j];
        }

        // Reduced costs follow the prices.
        let ratio = self.reduced_costs[entering].clone() / &alpha_q;
        let alpha_row = {
            let mut alpha = Update::zeros(self.nr_columns + self.nr_rows);
            for k in 0..pupd.size() {
                let j = pupd.index(k);
                if !self.basis.is_basic(j) {
                    alpha.set_value(j, pupd[j].clone());
                }
            }
            for k in 0..cupd.size() {
                let i = cupd.index(k);
                if !self.basis.is_basic(self.nr_columns + i) {
                    alpha.set_value(self.nr_columns + i, -cupd[i].clone());
                }
            }
            alpha
        };
        for (j, alpha) in alpha_row.iter() {
            if j != entering {
                self.reduced_costs[j] -= ratio.clone() * alpha;
            }
        }
        self.reduced_costs[entering] = N::zero();
        self.reduced_costs[leaving] = -ratio;

        self.basis.exchange(slot, entering, leaving_status);
        self.fvec[slot] = entering_value;
        self.fvec_lb[slot] = self.lower[entering].clone();
        self.fvec_ub[slot] = self.upper[entering].clone();
        self.refresh_price_box(leaving);
        self.refresh_price_box(entering);

        let mut pivot_column = Update::zeros(self.nr_rows);
        for (s, value) in w.iter() {
            pivot_column.set_value(*s, value.clone());
        }
        self.pricer.update_weights(&PivotUpdate {
            entering,
            slot,
            leaving,
            pivot_column: &pivot_column,
            alpha_row: &alpha_row,
            kappa_row: None,
            pivot: &alpha_q,
        });

        self.apply_factorization_update_dual(slot, spike)?;
        self.register_dual_step_size(&theta, &step);
        self.count_iteration(false);
        Ok(DualStepOutcome::Pivoted)
    }

    /// Fold the column replacement into the factors, refactorizing when it is rejected or when
    /// the refactorization policy triggers.
    fn apply_factorization_update(
        &mut self,
        slot: usize,
        spike: Vec<SparseTuple<N>>,
    ) -> Result<(), SolverError> {
        let started = Instant::now();
        let result = self.factorization.update(slot, spike, &self.singularity_tolerance);
        self.statistics.lu_factorization_time += started.elapsed().as_secs_f64();

        match result {
            Ok(()) => {
                if self.should_refactor() {
                    self.refactorize()?;
                    self.recompute_reduced_costs();
                }
                Ok(())
            },
            Err(SolverError::UpdateRejected) => {
                // Recovered locally: rebuild the factors from scratch.
                debug!("factorization update rejected; refactorizing");
                self.refactorize()?;
                self.recompute_reduced_costs();
                Ok(())
            },
            Err(other) => Err(other),
        }
    }

    fn apply_factorization_update_dual(
        &mut self,
        slot: usize,
        spike: Vec<SparseTuple<N>>,
    ) -> Result<(), SolverError> {
        let updates_before = self.factorization.nr_updates();
        self.apply_factorization_update(slot, spike)?;
        if self.factorization.nr_updates() <= updates_before {
            // A refactorization happened; the incremental prices are stale.
            self.recompute_reduced_costs();
            self.setup_dual_prices();
        }
        Ok(())
    }

    fn should_refactor(&self) -> bool {
        if self.factorization.nr_updates() > self.config.refactor_update_max {
            return true;
        }
        if !N::EXACT {
            let growth = self.factorization.growth();
            if growth > N::from_f64_lossy(self.config.refactor_growth_max) {
                return true;
            }
            // A periodic residual verification; `B fvec` must reproduce the non-basic offsets.
            if self.factorization.nr_updates() > 0
                && self.factorization.nr_updates() % 32 == 0
            {
                let residual = self.fvec_residual();
                if residual > N::from_f64_lossy(self.config.refactor_residual_tolerance) {
                    debug!("solve residual above tolerance; refactorizing");
                    return true;
                }
            }
        }
        false
    }

    /// `max_i |(B fvec - b)_i|` where `b` collects the non-basic contributions.
    fn fvec_residual(&self) -> N {
        let mut residual = self.nonbasic_offsets();
        for (slot, &id) in self.basis.indices.iter().enumerate() {
            let value = &self.fvec[slot];
            if value.is_zero() {
                continue;
            }
            if id < self.nr_columns {
                for (i, coefficient) in self.matrix.column(id) {
                    residual[*i] -= value.clone() * coefficient;
                }
            } else {
                residual[id - self.nr_columns] += value;
            }
        }

        let mut largest = N::zero();
        for value in residual.iter() {
            let magnitude = value.abs();
            if magnitude > largest {
                largest = magnitude;
            }
        }
        largest
    }

    fn refactorize(&mut self) -> Result<(), SolverError> {
        let columns = self.basis.indices.iter()
            .map(|&id| self.variable_column(id))
            .collect();

        let started = Instant::now();
        let factorization = Factorization::factor(
            columns,
            &self.pivot_threshold,
            &self.singularity_tolerance,
        );
        self.statistics.lu_factorization_time += started.elapsed().as_secs_f64();
        self.statistics.lu_factorizations += 1;

        self.factorization = factorization?;
        self.recompute_fvec();
        Ok(())
    }

    /// Rebuild the feasible vector and its bounds from the current basis and statuses.
    fn recompute_fvec(&mut self) {
        let offsets = self.nonbasic_offsets();
        let rhs = offsets.iter()
            .enumerate()
            .filter(|(_, value)| !value.is_zero())
            .map(|(i, value)| (i, value.clone()))
            .collect();
        let solution = self.timed_solve_right_plain(rhs);

        self.fvec.reset();
        for (slot, value) in solution.iter() {
            self.fvec[*slot] = value.clone();
        }
        self.refresh_basic_bounds();
    }

    /// The right-hand side `-sum_j col_j x_j` over the non-basic variables.
    fn nonbasic_offsets(&self) -> Dense<N> {
        let mut rhs = Dense::zeros(self.nr_rows);
        for id in 0..(self.nr_columns + self.nr_rows) {
            if self.basis.is_basic(id) {
                continue;
            }
            let value = self.nonbasic_value(id);
            if value.is_zero() {
                continue;
            }
            if id < self.nr_columns {
                for (i, coefficient) in self.matrix.column(id) {
                    rhs[*i] -= value.clone() * coefficient;
                }
            } else {
                rhs[id - self.nr_columns] += &value;
            }
        }
        rhs
    }

    fn refresh_basic_bounds(&mut self) {
        for slot in 0..self.nr_rows {
            let id = self.basis.indices[slot];
            self.fvec_lb[slot] = self.lower[id].clone();
            self.fvec_ub[slot] = self.upper[id].clone();
        }
    }

    fn recompute_reduced_costs(&mut self) {
        let basic_costs = self.basis.indices.iter()
            .enumerate()
            .filter(|(_, &id)| !self.cost[id].is_zero())
            .map(|(slot, &id)| (slot, self.cost[id].clone()))
            .collect::<Vec<_>>();
        let duals = self.timed_solve_left(basic_costs);

        let mut y = Dense::zeros(self.nr_rows);
        for (i, value) in duals.iter() {
            y[*i] = value.clone();
        }

        for j in 0..self.nr_columns {
            self.reduced_costs[j] = if self.basis.is_basic(j) {
                N::zero()
            } else {
                self.cost[j].clone() - self.matrix.column_dot(j, y.as_slice())
            };
        }
        for i in 0..self.nr_rows {
            let id = self.nr_columns + i;
            self.reduced_costs[id] = if self.basis.is_basic(id) {
                N::zero()
            } else {
                y[i].clone()
            };
        }
        self.row_prices = y;
    }

    /// Dual-loop price state: `y`, `A^T y` and the dual feasibility boxes.
    fn setup_dual_prices(&mut self) {
        self.recompute_reduced_costs();
        for j in 0..self.nr_columns {
            self.column_prices[j] =
                self.matrix.column_dot(j, self.row_prices.as_slice());
        }
        for id in 0..(self.nr_columns + self.nr_rows) {
            self.refresh_price_box(id);
        }
    }

    /// The dual feasibility box of one variable's price, derived from its cost and status.
    fn refresh_price_box(&mut self, id: usize) {
        let free = (-N::infinity(), N::infinity());
        let status = self.basis.statuses[id];
        if id < self.nr_columns {
            let cost = &self.cost[id];
            let (low, high) = match status {
                VariableStatus::Basic | VariableStatus::Fixed => free,
                VariableStatus::AtLower => (-N::infinity(), cost.clone()),
                VariableStatus::AtUpper => (cost.clone(), N::infinity()),
                VariableStatus::Free => (cost.clone(), cost.clone()),
            };
            self.column_price_lb[id] = low;
            self.column_price_ub[id] = high;
        } else {
            let i = id - self.nr_columns;
            let (low, high) = match status {
                VariableStatus::Basic | VariableStatus::Fixed => free,
                VariableStatus::AtLower => (N::zero(), N::infinity()),
                VariableStatus::AtUpper => (-N::infinity(), N::zero()),
                VariableStatus::Free => (N::zero(), N::zero()),
            };
            self.row_price_lb[i] = low;
            self.row_price_ub[i] = high;
        }
    }

    fn is_primal_feasible(&self) -> bool {
        (0..self.nr_rows).all(|slot| {
            self.fvec[slot] >= self.fvec_lb[slot].clone() - &self.delta
                && self.fvec[slot] <= self.fvec_ub[slot].clone() + &self.delta
        })
    }

    fn is_dual_feasible(&self) -> bool {
        (0..(self.nr_columns + self.nr_rows)).all(|id| {
            let cost = &self.reduced_costs[id];
            match self.basis.statuses[id] {
                VariableStatus::AtLower => cost >= &-self.delta.clone(),
                VariableStatus::AtUpper => cost <= &self.delta,
                VariableStatus::Free => cost.abs() <= self.delta,
                VariableStatus::Fixed | VariableStatus::Basic => true,
            }
        })
    }

    /// Make the current point feasible by relaxing every violated bound onto the value it is
    /// violated by, journaling each move.
    fn shift_into_primal_feasibility(&mut self) {
        let mut shifted = 0_usize;
        for slot in 0..self.nr_rows {
            let id = self.basis.indices[slot];
            if self.fvec[slot] < self.fvec_lb[slot] {
                self.journal.push(ShiftEntry {
                    target: ShiftTarget::VariableLower,
                    index: id,
                    previous: self.lower[id].clone(),
                });
                self.total_shift += (self.lower[id].clone() - &self.fvec[slot]).abs();
                self.lower[id] = self.fvec[slot].clone();
                self.fvec_lb[slot] = self.fvec[slot].clone();
                shifted += 1;
            } else if self.fvec[slot] > self.fvec_ub[slot] {
                self.journal.push(ShiftEntry {
                    target: ShiftTarget::VariableUpper,
                    index: id,
                    previous: self.upper[id].clone(),
                });
                self.total_shift += (self.fvec[slot].clone() - &self.upper[id]).abs();
                self.upper[id] = self.fvec[slot].clone();
                self.fvec_ub[slot] = self.fvec[slot].clone();
                shifted += 1;
            }
        }
        debug!("shifted {} bounds to reach a feasible starting point", shifted);
    }

    /// Unwind the journal in reverse order, restoring every bound that was shifted.
    fn unshift_all(&mut self) {
        while let Some(entry) = self.journal.pop() {
            match entry.target {
                ShiftTarget::VariableLower => {
                    self.lower[entry.index] = entry.previous.clone();
                    if let Some(slot) = self.basis.positions[entry.index] {
                        self.fvec_lb[slot] = entry.previous;
                    }
                },
                ShiftTarget::VariableUpper => {
                    self.upper[entry.index] = entry.previous.clone();
                    if let Some(slot) = self.basis.positions[entry.index] {
                        self.fvec_ub[slot] = entry.previous;
                    }
                },
                ShiftTarget::ColumnPriceLower => {
                    self.column_price_lb[entry.index] = entry.previous;
                },
                ShiftTarget::ColumnPriceUpper => {
                    self.column_price_ub[entry.index] = entry.previous;
                },
                ShiftTarget::RowPriceLower => {
                    self.row_price_lb[entry.index] = entry.previous;
                },
                ShiftTarget::RowPriceUpper => {
                    self.row_price_ub[entry.index] = entry.previous;
                },
            }
        }
        self.total_shift = N::zero();

        // A full unwind puts every working bound back onto the loaded problem.
        debug_assert!(self.lower == self.original_lower);
        debug_assert!(self.upper == self.original_upper);
    }

    fn check_limits(&mut self) -> Result<Option<Status>, SolverError> {
        if let Some(flag) = &self.abort {
            if flag.load(Ordering::Relaxed) {
                self.state = SolveState::AbortLimit;
                return Err(SolverError::Cancelled);
            }
        }
        if let Some(limit) = self.config.iteration_limit {
            if self.iterations_this_solve >= limit {
                return Ok(Some(Status::AbortIter));
            }
        }
        if let Some(limit) = self.config.time_limit {
            if let Some(started) = self.solve_started {
                if started.elapsed() >= limit {
                    return Ok(Some(Status::AbortTime));
                }
            }
        }
        if let Some(limit) = self.config.objective_limit {
            let objective = self.objective_value();
            let passed = match self.objective {
                Objective::Minimize => objective.to_f64() <= limit,
                Objective::Maximize => objective.to_f64() >= limit,
            };
            if passed {
                return Ok(Some(Status::AbortValue));
            }
        }
        Ok(None)
    }

    fn register_step_size(&mut self, step: &N) {
        if step.abs() <= self.epsilon {
            self.num_cycle += 1;
        } else {
            self.num_cycle = 0;
        }
    }

    fn register_dual_step_size(&mut self, theta: &N, step: &N) {
        if theta.abs() <= self.epsilon && step.abs() <= self.epsilon {
            self.num_cycle += 1;
        } else {
            self.num_cycle = 0;
        }
    }

    fn count_iteration(&mut self, primal: bool) {
        self.statistics.iterations += 1;
        self.iterations_this_solve += 1;
        if primal {
            self.statistics.iterations_primal += 1;
        }
        if self.warm_start {
            self.statistics.iterations_from_basis += 1;
        }
    }

    /// The basis column of a variable id: the matrix column for a structural variable, the
    /// negated unit vector for a logical one.
    fn variable_column(&self, id: usize) -> Vec<SparseTuple<N>> {
        if id < self.nr_columns {
            self.matrix.column(id).to_vec()
        } else {
            vec![(id - self.nr_columns, -N::one())]
        }
    }

    fn nonbasic_value(&self, id: usize) -> N {
        match self.basis.statuses[id] {
            VariableStatus::AtLower | VariableStatus::Fixed => self.lower[id].clone(),
            VariableStatus::AtUpper => self.upper[id].clone(),
            VariableStatus::Free => N::zero(),
            VariableStatus::Basic => {
                let slot = self.basis.positions[id].expect("basic variable has a slot");
                self.fvec[slot].clone()
            },
        }
    }

    fn nearest_bound_status(&self, id: usize, value: &N) -> VariableStatus {
        let lower = &self.lower[id];
        let upper = &self.upper[id];
        if lower == upper {
            return VariableStatus::Fixed;
        }
        let to_lower = (value.clone() - lower).abs();
        let to_upper = (upper.clone() - value).abs();
        if lower.is_finite_bound() && (!upper.is_finite_bound() || to_lower <= to_upper) {
            VariableStatus::AtLower
        } else if upper.is_finite_bound() {
            VariableStatus::AtUpper
        } else {
            VariableStatus::Free
        }
    }

    /// Spread a row of the basis inverse over the non-basic variable ids:
    /// `alpha_j = rho^T col_j`.
    fn spread_over_ids(&self, rho: &Sparse<N>) -> Update<N> {
        let mut alpha = Update::zeros(self.nr_columns + self.nr_rows);
        for (i, value) in rho.iter() {
            let logical = self.nr_columns + i;
            if !self.basis.is_basic(logical) {
                alpha.shift_value(logical, &-value.clone());
            }
            for (j, coefficient) in self.matrix.row(*i) {
                if !self.basis.is_basic(*j) {
                    alpha.shift_value(*j, &(value.clone() * coefficient));
                }
            }
        }
        alpha
    }

    fn timed_solve_right(&mut self, rhs: Vec<SparseTuple<N>>) -> ColumnAndSpike<N> {
        let started = Instant::now();
        let result = self.factorization.solve_right_with_spike(rhs);
        self.statistics.lu_solve_time += started.elapsed().as_secs_f64();
        self.statistics.lu_solves += 1;
        result
    }

    fn timed_solve_right_plain(&mut self, rhs: Vec<SparseTuple<N>>) -> Sparse<N> {
        let started = Instant::now();
        let result = self.factorization.solve_right(rhs);
        self.statistics.lu_solve_time += started.elapsed().as_secs_f64();
        self.statistics.lu_solves += 1;
        result
    }

    fn timed_solve_left(&mut self, rhs: Vec<SparseTuple<N>>) -> Sparse<N> {
        let started = Instant::now();
        let result = self.factorization.solve_left(rhs);
        self.statistics.lu_solve_time += started.elapsed().as_secs_f64();
        self.statistics.lu_solves += 1;
        result
    }

    /// The objective value in the problem's own optimization direction.
    pub fn objective_value(&self) -> N {
        let internal = (0..self.nr_columns)
            .map(|j| self.cost[j].clone() * self.primal_value(j))
            .sum::<N>();
        match self.objective {
            Objective::Minimize => internal,
            Objective::Maximize => -internal,
        }
    }

    fn primal_value(&self, id: usize) -> N {
        match self.basis.positions[id] {
            Some(slot) => self.fvec[slot].clone(),
            None => self.nonbasic_value(id),
        }
    }

    /// The current solution; `None` before any solve concluded optimally.
    pub fn solution(&self) -> Option<Solution<N>> {
        if self.state != SolveState::Optimal {
            return None;
        }

        let flip = |value: N| match self.objective {
            Objective::Minimize => value,
            Objective::Maximize => -value,
        };

        let primal: Vec<N> = (0..self.nr_columns).map(|j| self.primal_value(j)).collect();
        let slacks: Vec<N> = (0..self.nr_rows)
            .map(|i| self.primal_value(self.nr_columns + i))
            .collect();
        let dual: Vec<N> = (0..self.nr_rows)
            .map(|i| flip(self.row_prices[i].clone()))
            .collect();
        let reduced_costs: Vec<N> = (0..self.nr_columns)
            .map(|j| flip(self.reduced_costs[j].clone()))
            .collect();

        Some(Solution {
            objective: self.objective_value(),
            primal,
            dual,
            reduced_costs,
            slacks,
        })
    }

    /// Replace costs, bounds and sides while keeping the dimensions, basis and statuses; used by
    /// the refinement driver to load the scaled correction problem.
    pub fn replace_sides_and_costs(&mut self, problem: &Problem<N>) -> Result<(), SolverError> {
        if problem.nr_columns() != self.nr_columns || problem.nr_rows() != self.nr_rows {
            return Err(SolverError::InvalidInput(
                "correction problem has different dimensions".to_string(),
            ));
        }
        debug_assert!(self.journal.is_empty());

        for (j, variable) in problem.variables().iter().enumerate() {
            self.cost[j] = match problem.objective() {
                Objective::Minimize => variable.cost.clone(),
                Objective::Maximize => -variable.cost.clone(),
            };
            self.lower[j] = variable.lower.clone();
            self.upper[j] = variable.upper.clone();
            self.original_lower[j] = variable.lower.clone();
            self.original_upper[j] = variable.upper.clone();
        }
        for i in 0..self.nr_rows {
            let id = self.nr_columns + i;
            self.lower[id] = problem.lhs(i).clone();
            self.upper[id] = problem.rhs(i).clone();
            self.original_lower[id] = problem.lhs(i).clone();
            self.original_upper[id] = problem.rhs(i).clone();
        }
        self.objective = problem.objective();
        self.state = SolveState::Loaded;
        Ok(())
    }

    /// The statuses of the structural variables, for callers that carry a basis between solves.
    pub fn structural_statuses(&self) -> &[VariableStatus] {
        &self.basis.statuses[..self.nr_columns]
    }

    /// The variable ids occupying the basis slots.
    pub fn basis_indices(&self) -> &[usize] {
        &self.basis.indices
    }

    /// The status of every variable id, structural columns first, then logical rows.
    pub fn variable_statuses(&self) -> &[VariableStatus] {
        &self.basis.statuses
    }

    /// Externally visible status.
    pub fn status(&self) -> Status {
        match self.state {
            SolveState::Loaded
            | SolveState::PrimalFeasible
            | SolveState::DualFeasible => Status::Unknown,
            SolveState::Optimal => Status::Optimal,
            SolveState::Infeasible => Status::Infeasible,
            SolveState::Unbounded => Status::Unbounded,
            SolveState::Singular => Status::Singular,
            SolveState::AbortLimit => self.limit_status.unwrap_or(Status::AbortTime),
        }
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn statistics_mut(&mut self) -> &mut Statistics {
        &mut self.statistics
    }

    /// Install a cooperative cancellation flag, checked at every iteration boundary.
    pub fn set_abort_flag(&mut self, flag: Arc<AtomicBool>) {
        self.abort = Some(flag);
    }

    /// Total magnitude of all currently outstanding bound shifts.
    pub fn shift(&self) -> &N {
        &self.total_shift
    }
}

/// A dual-feasible status where the bounds allow one.
fn initial_status<N: SolverScalar>(cost: &N, lower: &N, upper: &N) -> VariableStatus {
    let lower_finite = lower.is_finite_bound();
    let upper_finite = upper.is_finite_bound();
    if lower_finite && upper_finite && lower == upper {
        return VariableStatus::Fixed;
    }

    if *cost >= N::zero() {
        if lower_finite {
            VariableStatus::AtLower
        } else if upper_finite {
            VariableStatus::AtUpper
        } else {
            VariableStatus::Free
        }
    } else if upper_finite {
        VariableStatus::AtUpper
    } else if lower_finite {
        VariableStatus::AtLower
    } else {
        VariableStatus::Free
    }
}

/// The leave test's window into the engine: read access to the working bounds of the basic
/// variables and the ability to shift them, journaled against the underlying variable bounds.
struct LeaveAdapter<'a, N> {
    epsilon: N,
    delta: N,
    num_cycle: u32,
    max_cycle: u32,
    basis_indices: &'a [usize],
    lower: &'a mut Vec<N>,
    upper: &'a mut Vec<N>,
    fvec_lb: &'a mut Dense<N>,
    fvec_ub: &'a mut Dense<N>,
    journal: &'a mut Vec<ShiftEntry<N>>,
    total_shift: &'a mut N,
}

impl<N: SolverScalar> LeaveContext<N> for LeaveAdapter<'_, N> {
    fn epsilon(&self) -> N {
        self.epsilon.clone()
    }

    fn delta(&self) -> N {
        self.delta.clone()
    }

    fn num_cycle(&self) -> u32 {
        self.num_cycle
    }

    fn max_cycle(&self) -> u32 {
        self.max_cycle
    }

    fn shift(&self) -> &N {
        self.total_shift
    }

    fn lower(&self, slot: usize) -> &N {
        &self.fvec_lb[slot]
    }

    fn upper(&self, slot: usize) -> &N {
        &self.fvec_ub[slot]
    }

    fn shift_lower(&mut self, slot: usize, to: N) {
        let id = self.basis_indices[slot];
        self.journal.push(ShiftEntry {
            target: ShiftTarget::VariableLower,
            index: id,
            previous: self.lower[id].clone(),
        });
        *self.total_shift += (self.lower[id].clone() - &to).abs();
        self.lower[id] = to.clone();
        self.fvec_lb[slot] = to;
    }

    fn shift_upper(&mut self, slot: usize, to: N) {
        let id = self.basis_indices[slot];
        self.journal.push(ShiftEntry {
            target: ShiftTarget::VariableUpper,
            index: id,
            previous: self.upper[id].clone(),
        });
        *self.total_shift += (self.upper[id].clone() - &to).abs();
        self.upper[id] = to.clone();
        self.fvec_ub[slot] = to;
    }
}

/// The enter test's window into the engine: the dual-side working bounds and shift requests
/// against them, plus the two lookups the instability recovery needs.
struct EnterAdapter<'a, N> {
    epsilon: N,
    delta: N,
    num_cycle: u32,
    max_cycle: u32,
    nr_columns: usize,
    matrix: &'a SparseMatrix<N>,
    positions: &'a [Option<usize>],
    column_lb: &'a mut Dense<N>,
    column_ub: &'a mut Dense<N>,
    row_lb: &'a mut Dense<N>,
    row_ub: &'a mut Dense<N>,
    journal: &'a mut Vec<ShiftEntry<N>>,
    total_shift: &'a mut N,
}

impl<N: SolverScalar> EnterContext<N> for EnterAdapter<'_, N> {
    fn epsilon(&self) -> N {
        self.epsilon.clone()
    }

    fn delta(&self) -> N {
        self.delta.clone()
    }

    fn num_cycle(&self) -> u32 {
        self.num_cycle
    }

    fn max_cycle(&self) -> u32 {
        self.max_cycle
    }

    fn shift(&self) -> &N {
        self.total_shift
    }

    fn column_lower(&self, j: usize) -> &N {
        &self.column_lb[j]
    }

    fn column_upper(&self, j: usize) -> &N {
        &self.column_ub[j]
    }

    fn row_lower(&self, i: usize) -> &N {
        &self.row_lb[i]
    }

    fn row_upper(&self, i: usize) -> &N {
        &self.row_ub[i]
    }

    fn shift_column_lower(&mut self, j: usize, to: N) {
        self.journal.push(ShiftEntry {
            target: ShiftTarget::ColumnPriceLower,
            index: j,
            previous: self.column_lb[j].clone(),
        });
        *self.total_shift += (self.column_lb[j].clone() - &to).abs();
        self.column_lb[j] = to;
    }

    fn shift_column_upper(&mut self, j: usize, to: N) {
        self.journal.push(ShiftEntry {
            target: ShiftTarget::ColumnPriceUpper,
            index: j,
            previous: self.column_ub[j].clone(),
        });
        *self.total_shift += (self.column_ub[j].clone() - &to).abs();
        self.column_ub[j] = to;
    }

    fn shift_row_lower(&mut self, i: usize, to: N) {
        self.journal.push(ShiftEntry {
            target: ShiftTarget::RowPriceLower,
            index: i,
            previous: self.row_lb[i].clone(),
        });
        *self.total_shift += (self.row_lb[i].clone() - &to).abs();
        self.row_lb[i] = to;
    }

    fn shift_row_upper(&mut self, i: usize, to: N) {
        self.journal.push(ShiftEntry {
            target: ShiftTarget::RowPriceUpper,
            index: i,
            previous: self.row_ub[i].clone(),
        });
        *self.total_shift += (self.row_ub[i].clone() - &to).abs();
        self.row_ub[i] = to;
    }

    fn is_basic(&self, id: EnterId) -> bool {
        let id = match id {
            EnterId::Column(j) => j,
            EnterId::Row(i) => self.nr_columns + i,
        };
        self.positions[id].is_some()
    }

    fn column_price(&self, j: usize, row_prices: &Dense<N>) -> N {
        self.matrix.column_dot(j, row_prices.as_slice())
    }
}

#[cfg(test)]
mod test {
    use crate::algorithm::config::Config;
    use crate::algorithm::simplex::SimplexEngine;
    use crate::algorithm::Status;
    use crate::data::linear_algebra::matrix::SparseMatrix;
    use crate::data::linear_program::elements::Objective;
    use crate::data::linear_program::problem::{Problem, Variable};

    fn cover_problem() -> Problem<f64> {
        // minimize x + y subject to x + y >= 1, 0 <= x, y <= 1.
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
    fn small_cover() {
        let mut engine = SimplexEngine::load(&cover_problem(), Config::default()).unwrap();
        let status = engine.solve().unwrap();
        assert_eq!(status, Status::Optimal);

        let solution = engine.solution().unwrap();
        assert!((solution.objective - 1.0).abs() < 1e-9);
        assert!((solution.primal[0] + solution.primal[1] - 1.0).abs() < 1e-9);
        // The active covering row carries a dual of one.
        assert!((solution.dual[0] - 1.0).abs() < 1e-9);
        assert!(engine.statistics().iterations >= 1);
        assert!(engine.statistics().iterations <= 2);
    }

    #[test]
    fn maximization_reports_in_its_own_orientation() {
        // maximize x with x <= 3 via a row.
        let problem = Problem::new(
            SparseMatrix::from_columns(vec![vec![(0, 1.0)]], 1),
            vec![Variable { cost: 1.0, lower: 0.0, upper: f64::INFINITY }],
            vec![f64::NEG_INFINITY],
            vec![3.0],
            Objective::Maximize,
        ).unwrap();

        let mut engine = SimplexEngine::load(&problem, Config::default()).unwrap();
        assert_eq!(engine.solve().unwrap(), Status::Optimal);
        let solution = engine.solution().unwrap();
        assert!((solution.objective - 3.0).abs() < 1e-9);
        assert!((solution.primal[0] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn infeasible_rows() {
        // x >= 2 and x <= 1 cannot both hold.
        let problem = Problem::new(
            SparseMatrix::from_columns(vec![vec![(0, 1.0), (1, 1.0)]], 2),
            vec![Variable { cost: 0.0, lower: f64::NEG_INFINITY, upper: f64::INFINITY }],
            vec![2.0, f64::NEG_INFINITY],
            vec![f64::INFINITY, 1.0],
            Objective::Minimize,
        ).unwrap();

        let mut engine = SimplexEngine::load(&problem, Config::default()).unwrap();
        assert_eq!(engine.solve().unwrap(), Status::Infeasible);
        assert_eq!(engine.status().code(), 2);
    }

    #[test]
    fn unbounded_below() {
        // minimize -x with x >= 0 and no blocking row.
        let problem = Problem::new(
            SparseMatrix::from_columns(vec![vec![(0, 1.0)]], 1),
            vec![Variable { cost: -1.0, lower: 0.0, upper: f64::INFINITY }],
            vec![0.0],
            vec![f64::INFINITY],
            Objective::Minimize,
        ).unwrap();

        let mut engine = SimplexEngine::load(&problem, Config::default()).unwrap();
        assert_eq!(engine.solve().unwrap(), Status::Unbounded);
    }

    #[test]
    fn iteration_limit_aborts() {
        let mut config = Config::default();
        config.iteration_limit = Some(0);
        let mut engine = SimplexEngine::load(&cover_problem(), config).unwrap();
        assert_eq!(engine.solve().unwrap(), Status::AbortIter);
        assert_eq!(engine.status().code(), 5);
        assert!(engine.solution().is_none());
    }
}
