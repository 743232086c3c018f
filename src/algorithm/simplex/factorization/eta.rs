//! # Eta file
//!
//! One elimination factor per column replacement: `R = I + e_p row^T`, where `row` holds the
//! multipliers that clear the eliminated tail of pivot row `p` out of the upper factor. The
//! factors accumulate in update order and are consumed during every solve until the next
//! refactorization discards them.
//!
//! Both application directions reduce to one primitive, the sparse dot product of the multiplier
//! row with a tuple list; the column replacement itself uses the same primitive to evaluate its
//! new corner element before committing anything.
use std::cmp::Ordering;

use crate::data::linear_algebra::SparseTuple;
use crate::data::number_types::traits::SolverScalar;

#[derive(PartialEq, Clone, Debug)]
pub struct EtaFile<N> {
    pivot: usize,
    /// Sorted, with every index strictly above `pivot`.
    row: Vec<SparseTuple<N>>,
    len: usize,
}

impl<N: SolverScalar> EtaFile<N> {
    pub fn new(row: Vec<SparseTuple<N>>, pivot: usize, len: usize) -> Self {
        debug_assert!(pivot < len);
        debug_assert!(row.windows(2).all(|w| w[0].0 < w[1].0));
        debug_assert!(row.first().map_or(true, |&(i, _)| i > pivot));
        debug_assert!(row.last().map_or(true, |&(i, _)| i < len));

        Self { pivot, row, len }
    }

    /// `row^T x`, matching sparse indices against each other.
    ///
    /// The multiplier row is typically much shorter than `x`; each of its entries probes the
    /// remaining tail of `x` by binary search, shrinking the tail as both lists advance.
    pub fn dot(&self, x: &[SparseTuple<N>]) -> N {
        let mut total = N::zero();
        let mut tail = x;
        for (j, multiplier) in &self.row {
            match tail.binary_search_by_key(j, |&(i, _)| i) {
                Ok(position) => {
                    total += multiplier.clone() * &tail[position].1;
                    tail = &tail[(position + 1)..];
                },
                Err(position) => tail = &tail[position..],
            }
        }
        total
    }

    /// `x <- R x`: the pivot entry absorbs `row^T x`.
    pub fn apply_right(&self, x: &mut Vec<SparseTuple<N>>) {
        debug_assert!(x.windows(2).all(|w| w[0].0 < w[1].0));
        debug_assert!(x.last().map_or(true, |&(i, _)| i < self.len));

        let change = self.dot(x);
        add_at(x, self.pivot, change);
    }

    /// `x^T <- x^T R`: the pivot entry spreads into the row's positions.
    pub fn apply_left(&self, x: &mut Vec<SparseTuple<N>>) {
        debug_assert!(x.windows(2).all(|w| w[0].0 < w[1].0));
        debug_assert!(x.last().map_or(true, |&(i, _)| i < self.len));

        let pivot_value = match x.binary_search_by_key(&self.pivot, |&(i, _)| i) {
            Ok(position) => x[position].1.clone(),
            Err(_) => return,
        };

        let changes = self.row.iter()
            .map(|(j, multiplier)| (*j, multiplier.clone() * &pivot_value))
            .collect();
        let merged = merge_sorted_sum(std::mem::take(x), changes);
        *x = merged;
    }
}

/// `x[index] += change`, keeping the tuples sorted and free of zeros.
fn add_at<N: SolverScalar>(x: &mut Vec<SparseTuple<N>>, index: usize, change: N) {
    if change.is_zero() {
        return;
    }

    match x.binary_search_by_key(&index, |&(i, _)| i) {
        Ok(position) => {
            x[position].1 += &change;
            if x[position].1.is_zero() {
                x.remove(position);
            }
        },
        Err(position) => x.insert(position, (index, change)),
    }
}

/// Merge two sorted tuple lists, summing entries that share an index and dropping the sums that
/// cancel to zero.
fn merge_sorted_sum<N: SolverScalar>(
    left: Vec<SparseTuple<N>>,
    right: Vec<SparseTuple<N>>,
) -> Vec<SparseTuple<N>> {
    debug_assert!(left.windows(2).all(|w| w[0].0 < w[1].0));
    debug_assert!(right.windows(2).all(|w| w[0].0 < w[1].0));

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        let order = match (left.peek(), right.peek()) {
            (None, None) => break,
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(&(i, _)), Some(&(j, _))) => i.cmp(&j),
        };
        match order {
            Ordering::Less => merged.push(left.next().unwrap()),
            Ordering::Greater => merged.push(right.next().unwrap()),
            Ordering::Equal => {
                let (index, value) = left.next().unwrap();
                let (_, change) = right.next().unwrap();
                let sum = value + change;
                if !sum.is_zero() {
                    merged.push((index, sum));
                }
            },
        }
    }
    merged
}

#[cfg(test)]
mod test {
    use crate::algorithm::simplex::factorization::eta::EtaFile;

    fn eta() -> EtaFile<f64> {
        EtaFile::new(vec![(1, 0.5), (3, 4.0)], 0, 4)
    }

    #[test]
    fn empty_row_is_the_identity() {
        let eta: EtaFile<f64> = EtaFile::new(vec![], 2, 4);
        let mut x = vec![(0, 2.5), (3, -1.0)];
        eta.apply_right(&mut x);
        assert_eq!(x, vec![(0, 2.5), (3, -1.0)]);
        eta.apply_left(&mut x);
        assert_eq!(x, vec![(0, 2.5), (3, -1.0)]);
    }

    #[test]
    fn dot_matches_overlapping_indices_only() {
        let eta = eta();
        assert_eq!(eta.dot(&[(1, 6.0), (3, 0.25)]), 0.5 * 6.0 + 4.0 * 0.25);
        assert_eq!(eta.dot(&[(0, 9.0), (2, 9.0)]), 0.0);
        assert_eq!(eta.dot(&[]), 0.0);
    }

    #[test]
    fn right_application_accumulates_into_the_pivot() {
        let eta = eta();
        let mut x = vec![(0, 8.0), (1, 6.0), (3, 0.25)];
        eta.apply_right(&mut x);
        assert_eq!(x, vec![(0, 8.0 + 4.0), (1, 6.0), (3, 0.25)]);

        // A pivot entry that was zero gets created.
        let mut x = vec![(1, 6.0)];
        eta.apply_right(&mut x);
        assert_eq!(x, vec![(0, 3.0), (1, 6.0)]);
    }

    #[test]
    fn left_application_spreads_the_pivot() {
        let eta = eta();
        let mut x = vec![(0, 2.0), (3, 1.0)];
        eta.apply_left(&mut x);
        assert_eq!(x, vec![(0, 2.0), (1, 1.0), (3, 1.0 + 8.0)]);

        // Without a pivot entry there is nothing to spread.
        let mut x = vec![(1, 2.0), (2, 7.0)];
        eta.apply_left(&mut x);
        assert_eq!(x, vec![(1, 2.0), (2, 7.0)]);
    }

    #[test]
    fn cancellation_removes_tuples() {
        let eta = EtaFile::new(vec![(2, -1.5)], 1, 3);

        let mut x = vec![(1, 2.0), (2, 3.0)];
        eta.apply_left(&mut x);
        assert_eq!(x, vec![(1, 2.0)]);

        let mut x = vec![(1, 4.5), (2, 3.0)];
        eta.apply_right(&mut x);
        assert_eq!(x, vec![(2, 3.0)]);
    }
}
