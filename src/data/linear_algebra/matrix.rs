//! # Sparse matrix
//!
//! Column-major storage with a row-major mirror. The simplex method reads columns when solving
//! for directions and rows when spreading a dual multiplier over the price vector, so both
//! orientations are kept from the moment the problem is loaded.
use std::fmt;

use crate::data::linear_algebra::SparseTuple;
use crate::data::number_types::traits::SolverScalar;

/// An immutable sparse matrix, stored in both orientations.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix<N> {
    /// Per column the (row index, value) tuples, sorted by row index.
    columns: Vec<Vec<SparseTuple<N>>>,
    /// Per row the (column index, value) tuples, sorted by column index.
    rows: Vec<Vec<SparseTuple<N>>>,
    nr_rows: usize,
}

impl<N: SolverScalar> SparseMatrix<N> {
    /// Create a matrix from its columns.
    ///
    /// # Arguments
    ///
    /// * `columns`: Per column the sorted, nonzero (row index, value) tuples.
    /// * `nr_rows`: Row dimension, at least as large as any row index appearing in `columns`.
    pub fn from_columns(columns: Vec<Vec<SparseTuple<N>>>, nr_rows: usize) -> Self {
        debug_assert!(columns.iter().all(|column| {
            column.windows(2).all(|w| w[0].0 < w[1].0)
                && column.iter().all(|&(i, _)| i < nr_rows)
                && column.iter().all(|(_, v)| !v.is_zero())
        }));

        let mut rows = vec![Vec::new(); nr_rows];
        for (j, column) in columns.iter().enumerate() {
            for (i, value) in column {
                rows[*i].push((j, value.clone()));
            }
        }

        Self { columns, rows, nr_rows }
    }

    /// The (row index, value) tuples of column `j`.
    pub fn column(&self, j: usize) -> &[SparseTuple<N>] {
        debug_assert!(j < self.nr_columns());

        &self.columns[j]
    }

    /// The (column index, value) tuples of row `i`.
    pub fn row(&self, i: usize) -> &[SparseTuple<N>] {
        debug_assert!(i < self.nr_rows);

        &self.rows[i]
    }

    /// Inner product of column `j` with a dense array over the rows.
    pub fn column_dot(&self, j: usize, values: &[N]) -> N {
        debug_assert_eq!(values.len(), self.nr_rows);

        self.columns[j].iter()
            .map(|(i, value)| values[*i].clone() * value)
            .sum()
    }

    /// Inner product of row `i` with a dense array over the columns.
    pub fn row_dot(&self, i: usize, values: &[N]) -> N {
        debug_assert_eq!(values.len(), self.nr_columns());

        self.rows[i].iter()
            .map(|(j, value)| values[*j].clone() * value)
            .sum()
    }

    /// Element-wise conversion into another scalar type.
    pub fn map<M: SolverScalar>(&self, f: impl Fn(&N) -> M) -> SparseMatrix<M> {
        SparseMatrix::from_columns(
            self.columns.iter()
                .map(|column| column.iter().map(|(i, value)| (*i, f(value))).collect())
                .collect(),
            self.nr_rows,
        )
    }

    /// The row dimension.
    pub fn nr_rows(&self) -> usize {
        self.nr_rows
    }

    /// The column dimension.
    pub fn nr_columns(&self) -> usize {
        self.columns.len()
    }
}

impl<N: fmt::Display> fmt::Display for SparseMatrix<N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (j, column) in self.columns.iter().enumerate() {
            write!(f, "column {}:", j)?;
            for (i, value) in column {
                write!(f, " ({}, {})", i, value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::data::linear_algebra::matrix::SparseMatrix;

    fn matrix() -> SparseMatrix<f64> {
        // [1 0 2]
        // [0 3 4]
        SparseMatrix::from_columns(
            vec![vec![(0, 1.0)], vec![(1, 3.0)], vec![(0, 2.0), (1, 4.0)]],
            2,
        )
    }

    #[test]
    fn mirror_is_consistent() {
        let matrix = matrix();
        assert_eq!(matrix.row(0), &[(0, 1.0), (2, 2.0)]);
        assert_eq!(matrix.row(1), &[(1, 3.0), (2, 4.0)]);
        assert_eq!(matrix.column(2), &[(0, 2.0), (1, 4.0)]);
    }

    #[test]
    fn products() {
        let matrix = matrix();
        assert_eq!(matrix.column_dot(2, &[1.0, 1.0]), 6.0);
        assert_eq!(matrix.row_dot(1, &[1.0, 1.0, 1.0]), 7.0);
    }
}
