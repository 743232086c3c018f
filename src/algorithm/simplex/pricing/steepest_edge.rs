//! # Steepest edge pricing
//!
//! Maintains `gamma_j = 1 + ||B^-1 a_j||^2` per column under the recurrence that needs, besides
//! the pivot row, the transformed row `kappa_j = a_j^T B^-T B^-1 a_q`. The update is O(m) per
//! pivot on top of the extra solve the engine performs to provide `kappa`.
use crate::algorithm::simplex::pricing::{
    best_scored, Direction, PivotUpdate, Pricing, PricingView,
};
use crate::data::number_types::traits::SolverScalar;

#[derive(Debug, Clone)]
pub struct SteepestEdgePricing<N> {
    /// Per variable id, `gamma_j`.
    column_weights: Vec<N>,
    /// Per basis slot, the dual norm weight.
    row_weights: Vec<N>,
}

impl<N: SolverScalar> SteepestEdgePricing<N> {
    pub fn new() -> Self {
        Self {
            column_weights: Vec::new(),
            row_weights: Vec::new(),
        }
    }
}

impl<N: SolverScalar> Default for SteepestEdgePricing<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: SolverScalar> Pricing<N> for SteepestEdgePricing<N> {
    fn load(&mut self, nr_variables: usize, nr_rows: usize) {
        // Unit weights for the initial (logical) basis; the recurrence keeps them exact from
        // here on for the columns that take part in pivots.
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
        let entering_gamma = self.column_weights[update.entering].clone();

        for (j, alpha) in update.alpha_row.iter() {
            if j == update.entering {
                continue;
            }
            let ratio = alpha.clone() / update.pivot;
            let mut gamma = self.column_weights[j].clone();
            if let Some(kappa_row) = update.kappa_row {
                gamma -= N::from_f64_lossy(2.0) * ratio.clone() * &kappa_row[j];
            }
            gamma += ratio.clone() * &ratio * &entering_gamma;

            // The exact norm can never drop below that of the unit contribution.
            let floor = N::one() + ratio.clone() * &ratio;
            self.column_weights[j] = if gamma > floor { gamma } else { floor };
        }
        self.column_weights[update.leaving] = {
            let candidate = entering_gamma / &pivot_squared;
            if candidate > N::one() { candidate } else { N::one() }
        };

        // Dual norms against the pivot column.
        let row_reference = self.row_weights[update.slot].clone();
        for (slot, beta) in update.pivot_column.iter() {
            if slot == update.slot {
                continue;
            }
            let ratio = beta.clone() / update.pivot;
            let candidate = self.row_weights[slot].clone()
                + ratio.clone() * &ratio * &row_reference;
            self.row_weights[slot] = candidate;
        }
        self.row_weights[update.slot] = row_reference / &pivot_squared;
    }

    fn wants_transformed_row(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod test {
    use crate::algorithm::simplex::pricing::{Pricing, SteepestEdgePricing};
    use crate::data::linear_algebra::vector::Update;

    #[test]
    fn asks_for_the_transformed_row() {
        let pricing = SteepestEdgePricing::<f64>::new();
        assert!(pricing.wants_transformed_row());
    }

    #[test]
    fn weights_stay_above_one() {
        let mut pricing = SteepestEdgePricing::<f64>::new();
        pricing.load(3, 2);

        let mut alpha_row: Update<f64> = Update::zeros(3);
        alpha_row.set_value(1, 4.0);
        let mut kappa_row: Update<f64> = Update::zeros(3);
        kappa_row.set_value(1, 100.0);
        let mut pivot_column: Update<f64> = Update::zeros(2);
        pivot_column.set_value(0, 2.0);

        pricing.update_weights(&crate::algorithm::simplex::pricing::PivotUpdate {
            entering: 0,
            slot: 0,
            leaving: 2,
            pivot_column: &pivot_column,
            alpha_row: &alpha_row,
            kappa_row: Some(&kappa_row),
            pivot: &2.0,
        });

        // A wildly wrong kappa cannot push the weight below its floor.
        assert_eq!(pricing.column_weights[1], 1.0 + 4.0);
    }
}
