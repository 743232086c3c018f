//! # Pricing
//!
//! Strategies for choosing the entering variable (primal) or the leaving row (dual) from reduced
//! cost and infeasibility information. The engine is polymorphic over the capability set
//! `{select_enter, select_leave, update_weights}` and never asks what concrete strategy it holds;
//! `Pricer` is the tagged wrapper that dispatches to the variants.
use crate::data::linear_algebra::vector::{Dense, Update};
use crate::data::linear_program::elements::VariableStatus;
use crate::data::number_types::traits::SolverScalar;

pub use devex::DevexPricing;
pub use steepest_edge::SteepestEdgePricing;

mod devex;
mod steepest_edge;

/// Which way an entering variable moves away from its bound.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Direction {
    Increasing,
    Decreasing,
}

/// Read-only view of the engine state that pricing decisions are made from.
pub struct PricingView<'a, N> {
    /// Reduced costs over all `n + m` variable ids; zero on basic ids.
    pub reduced_costs: &'a Dense<N>,
    /// Status per variable id.
    pub status: &'a [VariableStatus],
    /// Variable id per basis slot.
    pub basis: &'a [usize],
    /// Values of the basic variables, by slot.
    pub fvec: &'a Dense<N>,
    /// Working bounds of the basic variables, by slot.
    pub fvec_lb: &'a Dense<N>,
    pub fvec_ub: &'a Dense<N>,
    /// Tolerated infeasibility.
    pub tolerance: &'a N,
}

impl<N: SolverScalar> PricingView<'_, N> {
    /// The direction in which moving this non-basic variable improves the objective, if any.
    pub fn improving_direction(&self, j: usize) -> Option<Direction> {
        let cost = &self.reduced_costs[j];
        match self.status[j] {
            VariableStatus::AtLower => {
                (cost < &-self.tolerance.clone()).then_some(Direction::Increasing)
            },
            VariableStatus::AtUpper => {
                (cost > self.tolerance).then_some(Direction::Decreasing)
            },
            VariableStatus::Free => {
                if cost < &-self.tolerance.clone() {
                    Some(Direction::Increasing)
                } else if cost > self.tolerance {
                    Some(Direction::Decreasing)
                } else {
                    None
                }
            },
            VariableStatus::Fixed | VariableStatus::Basic => None,
        }
    }

    /// How far the basic variable in `slot` sits outside its working bounds.
    pub fn primal_infeasibility(&self, slot: usize) -> Option<N> {
        let value = &self.fvec[slot];
        let below = self.fvec_lb[slot].clone() - value;
        if below > *self.tolerance {
            return Some(below);
        }
        let above = value.clone() - &self.fvec_ub[slot];
        if above > *self.tolerance {
            return Some(above);
        }
        None
    }
}

/// Everything a pricer may want to know about a just-executed pivot.
pub struct PivotUpdate<'a, N> {
    /// Variable id that entered the basis.
    pub entering: usize,
    /// Basis slot that was exchanged.
    pub slot: usize,
    /// Variable id that left the basis.
    pub leaving: usize,
    /// `B^-1 a_q` over the basis slots.
    pub pivot_column: &'a Update<N>,
    /// The pivot row spread over the non-basic variable ids.
    pub alpha_row: &'a Update<N>,
    /// `a_j^T B^-T B^-1 a_q` per non-basic id; only supplied to pricers that ask for it.
    pub kappa_row: Option<&'a Update<N>>,
    /// The pivot element `alpha_q`.
    pub pivot: &'a N,
}

/// Deciding which variables exchange places in the basis.
pub trait Pricing<N> {
    /// Reset all weight state for a problem with the given dimensions.
    fn load(&mut self, nr_variables: usize, nr_rows: usize);

    /// Choose the entering variable for a primal iteration: the improving candidate maximizing
    /// `reduced_cost^2 / weight`. `None` means the current basis is optimal in the (possibly
    /// shifted) problem.
    fn select_enter(&self, view: &PricingView<N>) -> Option<(usize, Direction)>;

    /// Choose the leaving slot for a dual iteration: the infeasible basic variable maximizing
    /// `infeasibility^2 / weight`. `None` means the basis is primal feasible.
    fn select_leave(&self, view: &PricingView<N>) -> Option<usize>;

    /// Fold a pivot into the weights.
    fn update_weights(&mut self, update: &PivotUpdate<N>);

    /// Whether `PivotUpdate::kappa_row` should be computed; it costs an extra solve.
    fn wants_transformed_row(&self) -> bool {
        false
    }
}

/// Runtime-selectable pricing strategy.
#[derive(Debug, Clone)]
pub enum Pricer<N> {
    Devex(DevexPricing<N>),
    SteepestEdge(SteepestEdgePricing<N>),
}

impl<N: SolverScalar> Default for Pricer<N> {
    fn default() -> Self {
        Self::Devex(DevexPricing::new())
    }
}

impl<N: SolverScalar> Pricer<N> {
    pub fn steepest_edge() -> Self {
        Self::SteepestEdge(SteepestEdgePricing::new())
    }
}

impl<N: SolverScalar> Pricing<N> for Pricer<N> {
    fn load(&mut self, nr_variables: usize, nr_rows: usize) {
        match self {
            Self::Devex(pricing) => pricing.load(nr_variables, nr_rows),
            Self::SteepestEdge(pricing) => pricing.load(nr_variables, nr_rows),
        }
    }

    fn select_enter(&self, view: &PricingView<N>) -> Option<(usize, Direction)> {
        match self {
            Self::Devex(pricing) => pricing.select_enter(view),
            Self::SteepestEdge(pricing) => pricing.select_enter(view),
        }
    }

    fn select_leave(&self, view: &PricingView<N>) -> Option<usize> {
        match self {
            Self::Devex(pricing) => pricing.select_leave(view),
            Self::SteepestEdge(pricing) => pricing.select_leave(view),
        }
    }

    fn update_weights(&mut self, update: &PivotUpdate<N>) {
        match self {
            Self::Devex(pricing) => pricing.update_weights(update),
            Self::SteepestEdge(pricing) => pricing.update_weights(update),
        }
    }

    fn wants_transformed_row(&self) -> bool {
        match self {
            Self::Devex(pricing) => pricing.wants_transformed_row(),
            Self::SteepestEdge(pricing) => pricing.wants_transformed_row(),
        }
    }
}

/// Argmax of `value^2 / weight` over candidates, shared by the concrete strategies.
fn best_scored<N: SolverScalar>(
    candidates: impl Iterator<Item = (usize, N)>,
    weight: impl Fn(usize) -> N,
) -> Option<usize> {
    let mut best: Option<(usize, N, N)> = None;
    for (index, value) in candidates {
        let score = value.clone() * &value;
        let weight = weight(index);
        match &best {
            None => best = Some((index, score, weight)),
            Some((_, best_score, best_weight)) => {
                // score / weight > best_score / best_weight, kept division-free.
                if score.clone() * best_weight > best_score.clone() * &weight {
                    best = Some((index, score, weight));
                }
            },
        }
    }

    best.map(|(index, _, _)| index)
}
