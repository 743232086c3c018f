//! # The problem being solved
//!
//! `minimize/maximize c^T x subject to lhs <= Ax <= rhs, l <= x <= u` with a sparse `A`.
use std::fmt;

use crate::data::linear_algebra::matrix::SparseMatrix;
use crate::data::linear_algebra::SparseTuple;
use crate::data::linear_program::elements::Objective;
use crate::data::number_types::rational::Rational;
use crate::data::number_types::traits::SolverScalar;

/// A single structural variable: objective coefficient and bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable<N> {
    pub cost: N,
    pub lower: N,
    pub upper: N,
}

/// An immutable linear program.
#[derive(Debug, Clone, PartialEq)]
pub struct Problem<N> {
    matrix: SparseMatrix<N>,
    variables: Vec<Variable<N>>,
    lhs: Vec<N>,
    rhs: Vec<N>,
    objective: Objective,
}

/// The provided problem data was inconsistent.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct InvalidProblem {
    reason: String,
}

impl InvalidProblem {
    fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

impl fmt::Display for InvalidProblem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid problem: {}", self.reason)
    }
}

impl std::error::Error for InvalidProblem {
}

impl<N: SolverScalar> Problem<N> {
    /// Create a problem after validating its dimensions and bound orientations.
    pub fn new(
        matrix: SparseMatrix<N>,
        variables: Vec<Variable<N>>,
        lhs: Vec<N>,
        rhs: Vec<N>,
        objective: Objective,
    ) -> Result<Self, InvalidProblem> {
        if matrix.nr_columns() != variables.len() {
            return Err(InvalidProblem::new(format!(
                "matrix has {} columns but {} variables were provided",
                matrix.nr_columns(), variables.len(),
            )));
        }
        if matrix.nr_rows() != lhs.len() || matrix.nr_rows() != rhs.len() {
            return Err(InvalidProblem::new(format!(
                "matrix has {} rows but {} left-hand and {} right-hand sides were provided",
                matrix.nr_rows(), lhs.len(), rhs.len(),
            )));
        }
        if let Some(j) = variables.iter().position(|v| v.lower > v.upper) {
            return Err(InvalidProblem::new(format!("variable {} has crossed bounds", j)));
        }
        if let Some(i) = lhs.iter().zip(&rhs).position(|(l, r)| l > r) {
            return Err(InvalidProblem::new(format!("row {} has crossed sides", i)));
        }

        Ok(Self { matrix, variables, lhs, rhs, objective })
    }

    /// Convenience constructor from column tuples.
    pub fn from_columns(
        columns: Vec<Vec<SparseTuple<N>>>,
        nr_rows: usize,
        variables: Vec<Variable<N>>,
        lhs: Vec<N>,
        rhs: Vec<N>,
        objective: Objective,
    ) -> Result<Self, InvalidProblem> {
        Self::new(SparseMatrix::from_columns(columns, nr_rows), variables, lhs, rhs, objective)
    }

    /// The constraint matrix in both orientations.
    pub fn matrix(&self) -> &SparseMatrix<N> {
        &self.matrix
    }

    /// Number of constraint rows `m`.
    pub fn nr_rows(&self) -> usize {
        self.matrix.nr_rows()
    }

    /// Number of structural columns `n`.
    pub fn nr_columns(&self) -> usize {
        self.matrix.nr_columns()
    }

    pub fn variable(&self, j: usize) -> &Variable<N> {
        &self.variables[j]
    }

    pub fn variables(&self) -> &[Variable<N>] {
        &self.variables
    }

    pub fn lhs(&self, i: usize) -> &N {
        &self.lhs[i]
    }

    pub fn rhs(&self, i: usize) -> &N {
        &self.rhs[i]
    }

    pub fn objective(&self) -> Objective {
        self.objective
    }

    /// Element-wise conversion into another scalar type.
    pub fn map<M: SolverScalar>(&self, f: impl Fn(&N) -> M) -> Problem<M> {
        Problem {
            matrix: self.matrix.map(&f),
            variables: self.variables.iter()
                .map(|v| Variable { cost: f(&v.cost), lower: f(&v.lower), upper: f(&v.upper) })
                .collect(),
            lhs: self.lhs.iter().map(&f).collect(),
            rhs: self.rhs.iter().map(&f).collect(),
            objective: self.objective,
        }
    }
}

impl Problem<Rational> {
    /// The floating-point image of an exact problem, bounds mapped onto `±inf` where they exceed
    /// the double range of the exact representation of infinity.
    pub fn to_f64(&self) -> Problem<f64> {
        let infinity = Rational::bound_infinity();
        self.map(|value| {
            if value >= &infinity {
                f64::INFINITY
            } else if value <= &-&infinity {
                f64::NEG_INFINITY
            } else {
                value.to_f64()
            }
        })
    }
}

impl Problem<f64> {
    /// The exact rational shadow of a floating-point problem.
    pub fn to_rational(&self) -> Problem<Rational> {
        self.map(|&value| Rational::from_f64_lossy(value))
    }
}

#[cfg(test)]
mod test {
    use crate::data::linear_algebra::matrix::SparseMatrix;
    use crate::data::linear_program::elements::Objective;
    use crate::data::linear_program::problem::{Problem, Variable};

    fn variable(cost: f64) -> Variable<f64> {
        Variable { cost, lower: 0.0, upper: f64::INFINITY }
    }

    #[test]
    fn validation() {
        let matrix = SparseMatrix::from_columns(vec![vec![(0, 1.0)], vec![(0, 1.0)]], 1);

        assert!(Problem::new(
            matrix.clone(),
            vec![variable(1.0), variable(1.0)],
            vec![1.0], vec![f64::INFINITY],
            Objective::Minimize,
        ).is_ok());

        // Wrong number of variables.
        assert!(Problem::new(
            matrix.clone(),
            vec![variable(1.0)],
            vec![1.0], vec![f64::INFINITY],
            Objective::Minimize,
        ).is_err());

        // Crossed row sides.
        assert!(Problem::new(
            matrix.clone(),
            vec![variable(1.0), variable(1.0)],
            vec![1.0], vec![0.0],
            Objective::Minimize,
        ).is_err());

        // Crossed variable bounds.
        let mut crossed = variable(1.0);
        crossed.lower = 1.0;
        crossed.upper = 0.0;
        assert!(Problem::new(
            matrix,
            vec![crossed, variable(1.0)],
            vec![1.0], vec![f64::INFINITY],
            Objective::Minimize,
        ).is_err());
    }
}
