//! # Devex pricing
//!
//! Approximate steepest-edge weights in the sense of Harris: reference weights that only ever
//! grow along the pivots actually taken, reset to the unit framework when they have grown too far
//! to be meaningful. Cheap to update and usually close enough to the exact norms.
use crate::algorithm::simplex::pricing::{
    best_scored, Direction, PivotUpdate, Pricing, PricingView,
};
use crate::data::number_types::traits::SolverScalar;

/// Weight growth beyond which the reference framework is reset.
const RESET_LIMIT: f64 = 1e7;

#[derive(Debug, Clone)]
pub struct DevexPricing<N> {
    /// Per variable id, the approximate column norm weight.
    column_weights: Vec<N>,
    /// Per basis slot, the approximate row norm weight.
    row_weights: Vec<N>,
}

impl<N: SolverScalar> DevexPricing<N> {
    pub fn new() -> Self {
        Self {
            column_weights: Vec::new(),
            row_weights: Vec::new(),
        }
    }

    fn reset_reference_framework(&mut self) {
        for weight in &mut self.column_weights {
            *weight = N::one();
        }
        for weight in &mut self.row_weights {
            *weight = N::one();
        }
    }
}

impl<N: SolverScalar> Default for DevexPricing<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: SolverScalar> Pricing<N> for DevexPricing<N> {
    fn load(&mut self, nr_variables: usize, nr_rows: usize) {
        self.column_weights = vec![N::one(); nr_variables];
        self.row_weights = vec![N::one(); nr_rows];
    }

    fn select_enter(&self, view: &PricingView<N>) -> Option<(usize, Direction)> {
        let scored = (0..view.reduced_costs.len())
            .filter(|&j| view.improving_direction(j).is_some())
            .map(|j| (j, view.reduced_costs[j].clone()));
        let best = best_scored(scored, |j| self.column_weights[j].clone())?;

        view.improving_direction(best).map(|direction| (best, direction))
    }

    fn select_leave(&self, view: &PricingView<N>) -> Option<usize> {
        let candidates = (0..view.basis.len())
            .filter_map(|slot| view.primal_infeasibility(slot).map(|amount| (slot, amount)));
        best_scored(candidates, |slot| self.row_weights[slot].clone())
    }

    fn update_weights(&mut self, update: &PivotUpdate<N>) {
        let pivot_squared = update.pivot.clone() * update.pivot;
        let entering_weight = self.column_weights[update.entering].clone();

        // Column weights against the pivot row.
        for (j, alpha) in update.alpha_row.iter() {
            if j == update.entering {
                continue;
            }
            let candidate = alpha.clone() * alpha * &entering_weight / &pivot_squared;
            if candidate > self.column_weights[j] {
                self.column_weights[j] = candidate;
            }
        }
        let left_behind = entering_weight / &pivot_squared;
        self.column_weights[update.leaving] = if left_behind > N::one() {
            left_behind
        } else {
            N::one()
        };

        // Row weights against the pivot column.
        let row_reference = self.row_weights[update.slot].clone();
        for (slot, beta) in update.pivot_column.iter() {
            if slot == update.slot {
                continue;
            }
            let candidate = beta.clone() * beta * &row_reference / &pivot_squared;
            if candidate > self.row_weights[slot] {
                self.row_weights[slot] = candidate;
            }
        }
        let new_row_weight = row_reference / &pivot_squared;
        self.row_weights[update.slot] = if new_row_weight > N::one() {
            new_row_weight
        } else {
            N::one()
        };

        let limit = N::from_f64_lossy(RESET_LIMIT);
        if self.column_weights[update.leaving] > limit
            || self.row_weights[update.slot] > limit
        {
            self.reset_reference_framework();
        }
    }
}

#[cfg(test)]
mod test {
    use crate::algorithm::simplex::pricing::{DevexPricing, Direction, Pricing, PricingView};
    use crate::data::linear_algebra::vector::Dense;
    use crate::data::linear_program::elements::VariableStatus;

    #[test]
    fn selects_most_negative_under_unit_weights() {
        let mut pricing = DevexPricing::<f64>::new();
        pricing.load(3, 1);

        let reduced_costs = Dense::new(vec![-1.0, -3.0, 2.0]);
        let status = vec![
            VariableStatus::AtLower,
            VariableStatus::AtLower,
            VariableStatus::AtLower,
        ];
        let basis = vec![2];
        let fvec = Dense::new(vec![0.0]);
        let lb = Dense::new(vec![0.0]);
        let ub = Dense::new(vec![1.0]);
        let view = PricingView {
            reduced_costs: &reduced_costs,
            status: &status,
            basis: &basis,
            fvec: &fvec,
            fvec_lb: &lb,
            fvec_ub: &ub,
            tolerance: &1e-9,
        };

        assert_eq!(pricing.select_enter(&view), Some((1, Direction::Increasing)));
    }

    #[test]
    fn leave_selection_requires_infeasibility() {
        let mut pricing = DevexPricing::<f64>::new();
        pricing.load(2, 2);

        let reduced_costs = Dense::new(vec![0.0, 0.0]);
        let status = vec![VariableStatus::Basic, VariableStatus::Basic];
        let basis = vec![0, 1];
        let fvec = Dense::new(vec![0.5, 2.0]);
        let lb = Dense::new(vec![0.0, 0.0]);
        let ub = Dense::new(vec![1.0, 1.0]);
        let view = PricingView {
            reduced_costs: &reduced_costs,
            status: &status,
            basis: &basis,
            fvec: &fvec,
            fvec_lb: &lb,
            fvec_ub: &ub,
            tolerance: &1e-9,
        };

        // Only the second slot is outside its bounds.
        assert_eq!(pricing.select_leave(&view), Some(1));
    }
}
