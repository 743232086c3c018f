//! # Update vector
//!
//! A dense value array paired with a compact list of nonzero indices. The ratio test needs both:
//! random access to compare against bounds, and iteration over the active positions only.
//!
//! The invariant is loose: after `setup()` the index list enumerates exactly the positions
//! holding a nonzero value; while a direction is being assembled the list may be a superset of
//! the true nonzeros, which the next `setup()` cleans.
use std::ops::Index;

use crate::data::number_types::traits::SolverScalar;

/// Dense values plus an index list over the nonzero positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Update<N> {
    values: Vec<N>,
    indices: Vec<usize>,
}

impl<N: SolverScalar> Update<N> {
    /// An all-zero update vector of the given length.
    pub fn zeros(len: usize) -> Self {
        Self {
            values: vec![N::zero(); len],
            indices: Vec::new(),
        }
    }

    /// Build from a dense value array, registering all nonzero positions.
    pub fn from_dense(values: Vec<N>) -> Self {
        let indices = values.iter()
            .enumerate()
            .filter(|(_, value)| !value.is_zero())
            .map(|(i, _)| i)
            .collect();

        Self { values, indices }
    }

    /// Write a value, appending the index when the position transitions away from zero.
    ///
    /// Writing zero to an active position leaves its index in place; `setup` removes it.
    pub fn set_value(&mut self, i: usize, value: N) {
        debug_assert!(i < self.values.len());

        if self.values[i].is_zero() && !value.is_zero() {
            self.indices.push(i);
        }
        self.values[i] = value;
    }

    /// Add to a value, appending the index when the position transitions away from zero.
    pub fn shift_value(&mut self, i: usize, change: &N) {
        debug_assert!(i < self.values.len());

        if self.values[i].is_zero() && !change.is_zero() {
            self.indices.push(i);
        }
        self.values[i] += change;
    }

    /// Remove the `k`-th active index and zero its value.
    ///
    /// The index list order is not part of the contract; the removal swaps from the back.
    pub fn clear_num(&mut self, k: usize) {
        debug_assert!(k < self.indices.len());

        let i = self.indices.swap_remove(k);
        self.values[i] = N::zero();
    }

    /// Re-canonicalize: drop indices whose value has become zero and deduplicate.
    pub fn setup(&mut self) {
        self.indices.sort_unstable();
        self.indices.dedup();
        let values = &self.values;
        self.indices.retain(|&i| !values[i].is_zero());
    }

    /// Zero out all values, keeping the allocation.
    pub fn clear(&mut self) {
        for &i in &self.indices {
            self.values[i] = N::zero();
        }
        self.indices.clear();
    }

    /// The `k`-th active index.
    pub fn index(&self, k: usize) -> usize {
        self.indices[k]
    }

    /// The number of active indices.
    pub fn size(&self) -> usize {
        self.indices.len()
    }

    /// The length of the dense value array.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the dense value array has length zero.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The active index list.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// The dense value array.
    pub fn values(&self) -> &[N] {
        &self.values
    }

    /// Iterate over the active (index, value) pairs in index list order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &N)> {
        self.indices.iter().map(move |&i| (i, &self.values[i]))
    }
}

impl<N: SolverScalar> Index<usize> for Update<N> {
    type Output = N;

    fn index(&self, index: usize) -> &Self::Output {
        debug_assert!(index < self.values.len());

        &self.values[index]
    }
}

#[cfg(test)]
mod test {
    use crate::data::linear_algebra::vector::Update;

    #[test]
    fn tracks_nonzeros() {
        let mut update: Update<f64> = Update::zeros(5);
        update.set_value(3, 1.5);
        update.set_value(0, -2.0);
        assert_eq!(update.size(), 2);
        assert_eq!(update[3], 1.5);

        // Overwriting an active position must not duplicate its index.
        update.set_value(3, 2.5);
        assert_eq!(update.size(), 2);
    }

    #[test]
    fn clear_num_swaps_from_the_back() {
        let mut update: Update<f64> = Update::zeros(4);
        update.set_value(0, 1.0);
        update.set_value(2, 2.0);
        update.set_value(3, 3.0);

        update.clear_num(0);
        assert_eq!(update[0], 0.0);
        assert_eq!(update.size(), 2);
        assert!(update.indices().contains(&2));
        assert!(update.indices().contains(&3));
    }

    #[test]
    fn setup_restores_the_invariant() {
        let mut update: Update<f64> = Update::zeros(4);
        update.set_value(1, 1.0);
        update.set_value(2, 1.0);
        // Writing zero leaves a stale index behind.
        update.set_value(1, 0.0);
        assert_eq!(update.size(), 2);

        update.setup();
        assert_eq!(update.size(), 1);
        assert_eq!(update.index(0), 2);
    }
}
