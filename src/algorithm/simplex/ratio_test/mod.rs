//! # Ratio test
//!
//! Given an update direction, select the pivot that permits the largest step while keeping the
//! updated vector within (tolerance-relaxed) bounds. The concrete procedure is the two-phase
//! Harris test with bound shifting in `harris`.
//!
//! The tests do not hold a reference back to the engine; everything they need to read or request
//! is a capability on the context traits below, implemented by the engine on small adapters.
use crate::data::linear_algebra::vector::Dense;
use crate::data::number_types::traits::SolverScalar;

pub mod harris;

/// Identity of a variable selected to enter: a structural column or a logical row.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum EnterId {
    Column(usize),
    Row(usize),
}

/// Capabilities the leave selection needs: the working bounds of the basic variables and the
/// ability to request shifts of them.
pub trait LeaveContext<N> {
    /// Zero threshold.
    fn epsilon(&self) -> N;
    /// Tolerated infeasibility.
    fn delta(&self) -> N;
    fn num_cycle(&self) -> u32;
    fn max_cycle(&self) -> u32;
    /// Total accumulated shift; compared before and after a pass to detect shifting.
    fn shift(&self) -> &N;

    /// Working lower bound of the basic variable in `slot`.
    fn lower(&self, slot: usize) -> &N;
    /// Working upper bound of the basic variable in `slot`.
    fn upper(&self, slot: usize) -> &N;

    /// Relax the lower bound of the basic variable in `slot` to `to`.
    fn shift_lower(&mut self, slot: usize, to: N);
    /// Relax the upper bound of the basic variable in `slot` to `to`.
    fn shift_upper(&mut self, slot: usize, to: N);
}

/// Capabilities the enter selection needs: dual-side working bounds over both the column prices
/// and the row prices, shift requests against either, and two lookups that its instability
/// recovery depends on.
pub trait EnterContext<N> {
    fn epsilon(&self) -> N;
    fn delta(&self) -> N;
    fn num_cycle(&self) -> u32;
    fn max_cycle(&self) -> u32;
    fn shift(&self) -> &N;

    fn column_lower(&self, j: usize) -> &N;
    fn column_upper(&self, j: usize) -> &N;
    fn row_lower(&self, i: usize) -> &N;
    fn row_upper(&self, i: usize) -> &N;

    fn shift_column_lower(&mut self, j: usize, to: N);
    fn shift_column_upper(&mut self, j: usize, to: N);
    fn shift_row_lower(&mut self, i: usize, to: N);
    fn shift_row_upper(&mut self, i: usize, to: N);

    /// Whether the candidate already sits in the basis.
    fn is_basic(&self, id: EnterId) -> bool;
    /// Recompute a column price `a_j^T y` from scratch.
    fn column_price(&self, j: usize, row_prices: &Dense<N>) -> N;
}

/// The tolerated amount of degeneracy.
///
/// `num_cycle / max_cycle` is an integer ratio: the window equals `delta` until the cycle counter
/// reaches `max_cycle`, is zero until twice that, and then turns negative, inverting the
/// acceptance test to force strict progress. The algebra of the negative tail does not look ok,
/// but the pivots it admits are what breaks the remaining cycles.
pub(crate) fn degenerate_eps<N: SolverScalar>(delta: &N, num_cycle: u32, max_cycle: u32) -> N {
    debug_assert!(max_cycle > 0);

    let ratio = (num_cycle / max_cycle) as i64;
    delta.clone() * N::from_f64_lossy((1 - ratio) as f64)
}

#[cfg(test)]
mod test {
    use crate::algorithm::simplex::ratio_test::degenerate_eps;

    #[test]
    fn degeneracy_window_collapses_then_inverts() {
        let delta = 1e-6;
        assert_eq!(degenerate_eps(&delta, 0, 100), delta);
        assert_eq!(degenerate_eps(&delta, 99, 100), delta);
        assert_eq!(degenerate_eps(&delta, 100, 100), 0.0);
        assert_eq!(degenerate_eps(&delta, 199, 100), 0.0);
        assert_eq!(degenerate_eps(&delta, 200, 100), -delta);
    }
}
