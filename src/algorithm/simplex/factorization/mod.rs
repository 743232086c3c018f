//! # Basis factorization
//!
//! Maintains `L U = P B Q` for the current basis matrix `B`, with `P` and `Q` the row and column
//! permutations chosen during decomposition. Solves run forward through `L` and backward through
//! `U`; a column replacement appends an eta file and a rotate-to-back permutation instead of
//! refactorizing (the Forrest-Tomlin construction). The factors are rebuilt from scratch when the
//! update file grows long, when element growth indicates decay, or when a verification residual
//! fails; those triggers live in the engine, this module only reports its own state.
use std::collections::BTreeMap;

use crate::algorithm::simplex::factorization::eta::EtaFile;
use crate::algorithm::simplex::factorization::permutation::{
    FullPermutation, Permutation, RotateToBack,
};
use crate::algorithm::SolverError;
use crate::data::linear_algebra::vector::Sparse;
use crate::data::linear_algebra::SparseTuple;
use crate::data::number_types::traits::SolverScalar;

mod eta;
mod permutation;

/// The factorized basis.
///
/// `lower` is column major with an implied unit diagonal; `upper` is column major with the
/// diagonal stored as the last entry of each column. Both live in the permuted index space.
#[derive(Debug, Clone, PartialEq)]
pub struct Factorization<N> {
    /// Original row index to permuted position.
    row_permutation: FullPermutation,
    /// Basis slot to permuted position.
    column_permutation: FullPermutation,
    lower: Vec<Vec<SparseTuple<N>>>,
    upper: Vec<Vec<SparseTuple<N>>>,
    updates: Vec<(EtaFile<N>, RotateToBack)>,

    /// Largest magnitude in the original basis matrix, for the growth estimate.
    max_original: N,
    /// Largest magnitude seen in the factors, including update spikes.
    max_factor: N,
}

/// A solved column together with the intermediate the next update needs.
///
/// The spike is the state of the solve after the lower factor and the accumulated updates, right
/// before the upper solve; it becomes the replacement column of `upper` when the basis changes.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnAndSpike<N> {
    pub column: Sparse<N>,
    pub spike: Vec<SparseTuple<N>>,
}

impl<N: SolverScalar> Factorization<N> {
    /// The factorization of the identity basis.
    pub fn identity(m: usize) -> Self {
        Self {
            row_permutation: FullPermutation::identity(m),
            column_permutation: FullPermutation::identity(m),
            lower: vec![Vec::new(); m],
            upper: (0..m).map(|i| vec![(i, N::one())]).collect(),
            updates: Vec::new(),
            max_original: N::one(),
            max_factor: N::one(),
        }
    }

    /// Factor a basis from scratch.
    ///
    /// Columns are processed sparsest first and the pivot within a column is chosen among the
    /// rows passing the relative stability threshold, preferring rows with few nonzeros. Fails
    /// with `Singular` when no pivot above the singularity tolerance can be found for some
    /// column.
    ///
    /// # Arguments
    ///
    /// * `columns`: Per basis slot the sorted (row, value) tuples of the basis column.
    /// * `pivot_threshold`: Relative magnitude, with respect to the largest candidate in the
    ///   eliminated column, a pivot must have.
    /// * `singularity_tolerance`: Absolute magnitude below which a candidate is no pivot at all.
    pub fn factor(
        columns: Vec<Vec<SparseTuple<N>>>,
        pivot_threshold: &N,
        singularity_tolerance: &N,
    ) -> Result<Self, SolverError> {
        let m = columns.len();
        debug_assert!(columns.iter().all(|column| {
            column.windows(2).all(|w| w[0].0 < w[1].0)
                && column.iter().all(|&(i, _)| i < m)
        }));

        let mut row_count = vec![0_usize; m];
        let mut max_original = N::zero();
        for column in &columns {
            for (i, value) in column {
                row_count[*i] += 1;
                let magnitude = value.abs();
                if magnitude > max_original {
                    max_original = magnitude;
                }
            }
        }

        // Sparsest columns first keeps fill-in down without a full Markowitz search.
        let mut order: Vec<usize> = (0..m).collect();
        order.sort_by_key(|&j| columns[j].len());

        let mut row_position: Vec<Option<usize>> = vec![None; m];
        let mut pivot_row_of_step: Vec<usize> = Vec::with_capacity(m);
        // Lower columns hold original row indices until the full permutation is known.
        let mut lower: Vec<Vec<SparseTuple<N>>> = Vec::with_capacity(m);
        let mut upper: Vec<Vec<SparseTuple<N>>> = Vec::with_capacity(m);

        let mut work: Vec<N> = vec![N::zero(); m];
        let mut touched: Vec<usize> = Vec::new();
        let mut is_touched = vec![false; m];
        let mut max_factor = max_original.clone();

        for (k, &j) in order.iter().enumerate() {
            for (i, value) in &columns[j] {
                work[*i] = value.clone();
                is_touched[*i] = true;
                touched.push(*i);
            }

            // Left-looking elimination against the finished part, in pivot order.
            for t in 0..k {
                let pivot_row = pivot_row_of_step[t];
                if !is_touched[pivot_row] || work[pivot_row].is_zero() {
                    continue;
                }
                let coefficient = work[pivot_row].clone();
                for (i, value) in &lower[t] {
                    if !is_touched[*i] {
                        is_touched[*i] = true;
                        touched.push(*i);
                    }
                    work[*i] -= coefficient.clone() * value;
                }
            }

            let mut upper_column = Vec::new();
            let mut candidates = Vec::new();
            let mut maxabs = N::zero();
            for &i in &touched {
                if work[i].is_zero() {
                    continue;
                }
                match row_position[i] {
                    Some(position) => upper_column.push((position, work[i].clone())),
                    None => {
                        let magnitude = work[i].abs();
                        if magnitude > maxabs {
                            maxabs = magnitude;
                        }
                        candidates.push(i);
                    },
                }
            }

            if maxabs <= *singularity_tolerance {
                return Err(SolverError::Singular);
            }

            let mut pivot_row = None;
            for &i in &candidates {
                let magnitude = work[i].abs();
                if magnitude < pivot_threshold.clone() * &maxabs {
                    continue;
                }
                pivot_row = match pivot_row {
                    None => Some(i),
                    Some(best) => {
                        let better = row_count[i] < row_count[best]
                            || (row_count[i] == row_count[best]
                                && magnitude > work[best].abs());
                        Some(if better { i } else { best })
                    },
                };
            }
            // The largest candidate always passes the relative threshold.
            let pivot_row = pivot_row.expect("at least the largest candidate is acceptable");
            let diagonal = work[pivot_row].clone();

            upper_column.sort_unstable_by_key(|&(i, _)| i);
            upper_column.push((k, diagonal.clone()));
            for (_, value) in &upper_column {
                let magnitude = value.abs();
                if magnitude > max_factor {
                    max_factor = magnitude;
                }
            }
            upper.push(upper_column);

            let lower_column = candidates.iter()
                .filter(|&&i| i != pivot_row)
                .map(|&i| (i, work[i].clone() / &diagonal))
                .collect();
            lower.push(lower_column);

            row_position[pivot_row] = Some(k);
            pivot_row_of_step.push(pivot_row);

            for &i in &touched {
                work[i] = N::zero();
                is_touched[i] = false;
            }
            touched.clear();
        }

        let row_permutation = FullPermutation::from_forward(
            row_position.into_iter()
                .map(|position| position.expect("every row was pivotal"))
                .collect(),
        );
        for column in &mut lower {
            for (i, _) in column.iter_mut() {
                *i = row_permutation.forward(*i);
            }
            column.sort_unstable_by_key(|&(i, _)| i);
        }

        let mut column_forward = vec![0; m];
        for (k, &j) in order.iter().enumerate() {
            column_forward[j] = k;
        }

        Ok(Self {
            row_permutation,
            column_permutation: FullPermutation::from_forward(column_forward),
            lower,
            upper,
            updates: Vec::new(),
            max_original,
            max_factor,
        })
    }

    /// Solve `B x = b`; `b` in original row space, `x` over the basis slots.
    pub fn solve_right(&self, rhs: Vec<SparseTuple<N>>) -> Sparse<N> {
        self.solve_right_with_spike(rhs).column
    }

    /// Solve `B x = b`, keeping the intermediate needed to later replace a column.
    pub fn solve_right_with_spike(&self, mut rhs: Vec<SparseTuple<N>>) -> ColumnAndSpike<N> {
        debug_assert!(rhs.iter().all(|&(i, _)| i < self.m()));

        self.row_permutation.apply_forward(&mut rhs);
        let mut w = self.solve_lower_right(rhs.into_iter().collect());

        for (eta, rotation) in &self.updates {
            eta.apply_right(&mut w);
            rotation.apply_forward(&mut w);
        }
        let spike = w.clone();

        let mut column = self.solve_upper_right(w.into_iter().collect());
        for (_, rotation) in self.updates.iter().rev() {
            rotation.apply_backward(&mut column);
        }
        self.column_permutation.apply_backward(&mut column);

        ColumnAndSpike {
            column: Sparse::new(column, self.m()),
            spike,
        }
    }

    /// Solve `B^T y = c`; `c` over the basis slots, `y` in original row space.
    pub fn solve_left(&self, mut rhs: Vec<SparseTuple<N>>) -> Sparse<N> {
        debug_assert!(rhs.iter().all(|&(i, _)| i < self.m()));

        self.column_permutation.apply_forward(&mut rhs);
        for (_, rotation) in &self.updates {
            rotation.apply_forward(&mut rhs);
        }

        let mut w = self.solve_upper_left(rhs.into_iter().collect());
        for (eta, rotation) in self.updates.iter().rev() {
            rotation.apply_backward(&mut w);
            eta.apply_left(&mut w);
        }

        let mut result = self.solve_lower_left(w.into_iter().collect());
        self.row_permutation.apply_backward(&mut result);

        Sparse::new(result, self.m())
    }

    /// Replace the basis column at `slot` by the column whose solve produced `spike`.
    ///
    /// The replacement is decided before anything is touched: the value that would land in the
    /// bottom corner of the triangle is evaluated first, and only when it is acceptably large
    /// relative to the spike does the commit run. `UpdateRejected` therefore always leaves the
    /// factorization unchanged, and the engine refactorizes from scratch instead.
    pub fn update(
        &mut self,
        slot: usize,
        mut spike: Vec<SparseTuple<N>>,
        singularity_tolerance: &N,
    ) -> Result<(), SolverError> {
        let m = self.m();
        debug_assert!(slot < m);

        let pivot = self.updates.iter().fold(
            self.column_permutation.forward(slot),
            |position, (_, rotation)| rotation.forward(position),
        );

        // Clearing the tail of row `pivot` costs one transpose solve against the lower-right
        // part of the triangle; negating the right-hand side up front directly yields the
        // multiplier row of the new eta factor.
        let mut eliminated = Vec::new();
        for column in (pivot + 1)..m {
            if let Ok(position) = self.upper[column].binary_search_by_key(&pivot, |&(i, _)| i) {
                eliminated.push((column, position));
            }
        }
        let tail = eliminated.iter()
            .map(|&(column, position)| (column, -self.upper[column][position].1.clone()))
            .collect();
        let eta = EtaFile::new(self.solve_upper_left(tail), pivot, m);

        // The row operations fold `row^T spike` into the spike's pivot entry, and that sum is
        // the future bottom-corner element; it alone decides acceptance.
        let corner_position = spike.binary_search_by_key(&pivot, |&(i, _)| i);
        let corner = match corner_position {
            Ok(position) => spike[position].1.clone() + eta.dot(&spike),
            Err(_) => eta.dot(&spike),
        };
        let mut spike_max = corner.abs();
        for (_, value) in &spike {
            let magnitude = value.abs();
            if magnitude > spike_max {
                spike_max = magnitude;
            }
        }
        if corner.abs() <= singularity_tolerance.clone() * &spike_max {
            return Err(SolverError::UpdateRejected);
        }
        if spike_max > self.max_factor {
            self.max_factor = spike_max;
        }

        // Commit: write the corner, drop the cleared row entries and the leaving column, slide
        // everything right of it one position down and append the spike as the new right-most
        // column.
        match corner_position {
            Ok(position) => spike[position].1 = corner,
            Err(position) => spike.insert(position, (pivot, corner)),
        }
        for &(column, position) in &eliminated {
            self.upper[column].remove(position);
        }
        self.upper.remove(pivot);
        for column in &mut self.upper[pivot..] {
            for (i, _) in column.iter_mut() {
                if *i > pivot {
                    *i -= 1;
                }
            }
        }
        let rotation = RotateToBack::new(pivot, m);
        rotation.apply_forward(&mut spike);
        self.upper.push(spike);

        debug_assert!(self.upper.iter().enumerate().all(|(j, column)| {
            column.last().map_or(false, |&(i, _)| i == j)
        }));

        self.updates.push((eta, rotation));
        Ok(())
    }

    /// Number of rank-1 updates since the factors were built.
    pub fn nr_updates(&self) -> usize {
        self.updates.len()
    }

    /// Estimated element growth of the factors relative to the basis matrix.
    pub fn growth(&self) -> N {
        if self.max_original.is_zero() {
            N::one()
        } else {
            self.max_factor.clone() / &self.max_original
        }
    }

    /// The dimension of the factorized basis.
    pub fn m(&self) -> usize {
        self.upper.len()
    }

    /// Forward substitution `L z = b`, implied unit diagonal.
    fn solve_lower_right(&self, mut rhs: BTreeMap<usize, N>) -> Vec<SparseTuple<N>> {
        let mut result = Vec::new();

        while let Some((row, value)) = rhs.pop_first() {
            for (i, coefficient) in &self.lower[row] {
                subtract(*i, value.clone() * coefficient, &mut rhs);
            }
            result.push((row, value));
        }

        result
    }

    /// Back substitution `U w = z`, diagonal stored last per column.
    fn solve_upper_right(&self, mut rhs: BTreeMap<usize, N>) -> Vec<SparseTuple<N>> {
        let mut result = Vec::new();

        while let Some((row, value)) = rhs.pop_last() {
            let column = row;
            let diagonal = &self.upper[column].last().unwrap().1;
            let solved = value / diagonal;

            let off_diagonal = self.upper[column].len() - 1;
            for (i, coefficient) in &self.upper[column][..off_diagonal] {
                subtract(*i, solved.clone() * coefficient, &mut rhs);
            }
            result.push((row, solved));
        }

        result.reverse();
        debug_assert!(result.windows(2).all(|w| w[0].0 < w[1].0));
        result
    }

    /// Forward substitution `U^T z = c`.
    fn solve_upper_left(&self, mut rhs: BTreeMap<usize, N>) -> Vec<SparseTuple<N>> {
        let mut result = Vec::new();

        while let Some((column, value)) = rhs.pop_first() {
            let diagonal = &self.upper[column].last().unwrap().1;
            let solved = value / diagonal;

            let row = column;
            for j in (column + 1)..self.m() {
                if let Ok(data_index) = self.upper[j].binary_search_by_key(&row, |&(i, _)| i) {
                    subtract(j, solved.clone() * &self.upper[j][data_index].1, &mut rhs);
                }
            }
            result.push((column, solved));
        }

        debug_assert!(result.windows(2).all(|w| w[0].0 < w[1].0));
        result
    }

    /// Back substitution `L^T y = z`, implied unit diagonal.
    fn solve_lower_left(&self, mut rhs: BTreeMap<usize, N>) -> Vec<SparseTuple<N>> {
        let mut result = Vec::new();

        while let Some((column, value)) = rhs.pop_last() {
            let row = column;
            for j in 0..column {
                if let Ok(data_index) = self.lower[j].binary_search_by_key(&row, |&(i, _)| i) {
                    subtract(j, value.clone() * &self.lower[j][data_index].1, &mut rhs);
                }
            }
            result.push((column, value));
        }

        result.reverse();
        debug_assert!(result.windows(2).all(|w| w[0].0 < w[1].0));
        result
    }
}

fn subtract<N: SolverScalar>(index: usize, change: N, rhs: &mut BTreeMap<usize, N>) {
    if change.is_zero() {
        return;
    }

    match rhs.get_mut(&index) {
        None => {
            rhs.insert(index, -change);
        },
        Some(existing) => {
            *existing -= change;
            if existing.is_zero() {
                rhs.remove(&index);
            }
        },
    }
}

#[cfg(test)]
mod test {
    use crate::algorithm::simplex::factorization::{ColumnAndSpike, Factorization};
    use crate::algorithm::SolverError;
    use crate::data::linear_algebra::vector::Sparse;
    use crate::data::linear_algebra::SparseTuple;

    fn assert_solves(
        factorization: &Factorization<f64>,
        columns: &[Vec<SparseTuple<f64>>],
    ) {
        let m = columns.len();
        for slot in 0..m {
            // B x = b for b the slot's own column must give a unit vector.
            let x = factorization.solve_right(columns[slot].clone());
            assert_eq!(x, Sparse::standard_basis_vector(slot, m), "slot {}", slot);
        }
    }

    #[test]
    fn identity() {
        let factorization = Factorization::<f64>::identity(3);
        let x = factorization.solve_right(vec![(1, 2.0)]);
        assert_eq!(x, Sparse::new(vec![(1, 2.0)], 3));
        let y = factorization.solve_left(vec![(0, 1.0), (2, -1.0)]);
        assert_eq!(y, Sparse::new(vec![(0, 1.0), (2, -1.0)], 3));
    }

    #[test]
    fn diagonal() {
        let columns = vec![vec![(0, 2.0)], vec![(1, -4.0)]];
        let factorization =
            Factorization::factor(columns, &0.01, &1e-12).unwrap();
        assert_eq!(
            factorization.solve_right(vec![(0, 1.0), (1, 1.0)]),
            Sparse::new(vec![(0, 0.5), (1, -0.25)], 2),
        );
        assert_eq!(
            factorization.solve_left(vec![(0, 1.0)]),
            Sparse::new(vec![(0, 0.5)], 2),
        );
    }

    #[test]
    fn dense_2x2() {
        // B = [4 3; 6 3]
        let columns = vec![vec![(0, 4.0), (1, 6.0)], vec![(0, 3.0), (1, 3.0)]];
        let factorization =
            Factorization::factor(columns.clone(), &0.01, &1e-12).unwrap();
        assert_solves(&factorization, &columns);

        // B^T y = (1, 0): y = (-0.5, 0.5).
        let y = factorization.solve_left(vec![(0, 1.0)]);
        assert_eq!(y, Sparse::new(vec![(0, -0.5), (1, 0.5)], 2));
    }

    #[test]
    fn permuted_3x3() {
        // B = [0 1 0; 1 0 2; 0 0 1] needs row swaps.
        let columns = vec![
            vec![(1, 1.0)],
            vec![(0, 1.0)],
            vec![(1, 2.0), (2, 1.0)],
        ];
        let factorization =
            Factorization::factor(columns.clone(), &0.01, &1e-12).unwrap();
        assert_solves(&factorization, &columns);

        // Solve against a mixed right-hand side: x with Bx = (1, 1, 1).
        let x = factorization.solve_right(vec![(0, 1.0), (1, 1.0), (2, 1.0)]);
        assert_eq!(x, Sparse::new(vec![(0, -1.0), (1, 1.0), (2, 1.0)], 3));
    }

    #[test]
    fn singular_is_detected() {
        let columns = vec![
            vec![(0, 1.0), (1, 1.0)],
            vec![(0, 2.0), (1, 2.0)],
        ];
        assert_eq!(
            Factorization::factor(columns, &0.01, &1e-12).unwrap_err(),
            SolverError::Singular,
        );
    }

    #[test]
    fn column_replacement() {
        // Start from the identity and bring in (1, 1)^T at slot 0.
        let mut factorization = Factorization::<f64>::identity(2);
        let new_column = vec![(0, 1.0), (1, 1.0)];
        let ColumnAndSpike { column, spike } =
            factorization.solve_right_with_spike(new_column.clone());
        assert_eq!(column, Sparse::new(new_column.clone(), 2));

        factorization.update(0, spike, &1e-12).unwrap();
        assert_eq!(factorization.nr_updates(), 1);

        // New basis is [1 0; 1 1]; check both unit solves.
        let x = factorization.solve_right(new_column);
        assert_eq!(x, Sparse::standard_basis_vector(0, 2));
        let x = factorization.solve_right(vec![(1, 1.0)]);
        assert_eq!(x, Sparse::standard_basis_vector(1, 2));

        // B^T y = (1, 0) for B = [1 0; 1 1]: the second row gives y_1 = 0, the first y_0 = 1.
        let y = factorization.solve_left(vec![(0, 1.0)]);
        assert_eq!(y, Sparse::new(vec![(0, 1.0)], 2));
        // B^T y = (0, 1): y_1 = 1, y_0 + y_1 = 0.
        let y = factorization.solve_left(vec![(1, 1.0)]);
        assert_eq!(y, Sparse::new(vec![(0, -1.0), (1, 1.0)], 2));
    }

    #[test]
    fn replacement_with_elimination() {
        // Upper-triangular start: B = [2 1; 0 1]. Bringing in (0, 1)^T at slot 0 clears a row
        // entry of the triangle and needs a nonempty eta factor.
        let columns = vec![vec![(0, 2.0)], vec![(0, 1.0), (1, 1.0)]];
        let mut factorization = Factorization::factor(columns, &0.01, &1e-12).unwrap();

        let replacement = vec![(1, 1.0)];
        let ColumnAndSpike { column: _, spike } =
            factorization.solve_right_with_spike(replacement.clone());
        factorization.update(0, spike, &1e-12).unwrap();
        assert_eq!(factorization.nr_updates(), 1);

        // New basis is [0 1; 1 1]; both its columns must solve to unit vectors.
        assert_eq!(
            factorization.solve_right(replacement),
            Sparse::standard_basis_vector(0, 2),
        );
        assert_eq!(
            factorization.solve_right(vec![(0, 1.0), (1, 1.0)]),
            Sparse::standard_basis_vector(1, 2),
        );

        // B^T y = e_0 for B = [0 1; 1 1] gives y = (-1, 1).
        assert_eq!(
            factorization.solve_left(vec![(0, 1.0)]),
            Sparse::new(vec![(0, -1.0), (1, 1.0)], 2),
        );
    }

    #[test]
    fn rejected_update_leaves_factors_intact() {
        let mut factorization = Factorization::<f64>::identity(2);
        let before = factorization.clone();

        // Replacing slot 0 by e_1 would make the basis singular: the spike has no entry in the
        // pivot position.
        let ColumnAndSpike { column: _, spike } =
            factorization.solve_right_with_spike(vec![(1, 1.0)]);
        assert_eq!(
            factorization.update(0, spike, &1e-12).unwrap_err(),
            SolverError::UpdateRejected,
        );
        assert_eq!(factorization, before);
    }

    #[test]
    fn growth_is_tracked() {
        let columns = vec![vec![(0, 1.0)], vec![(1, 1.0)]];
        let factorization =
            Factorization::factor(columns, &0.01, &1e-12).unwrap();
        assert_eq!(factorization.growth(), 1.0);
    }
}
