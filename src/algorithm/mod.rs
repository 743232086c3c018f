//! # Algorithms
//!
//! The simplex engine and its satellites, plus the iterative refinement driver that composes
//! floating-point solves into an exact one.
use std::fmt;

use crate::data::linear_program::problem::InvalidProblem;

pub mod config;
pub mod refine;
pub mod simplex;
pub mod statistics;

/// Terminal solver status, as reported to collaborators.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Status {
    Optimal,
    Unbounded,
    Infeasible,
    /// The basis could not be (re)factorized, or residual infeasibility survived reshifting.
    Singular,
    AbortTime,
    AbortIter,
    /// The objective crossed the configured limit.
    AbortValue,
    Unknown,
}

impl Status {
    /// The numeric code of this status.
    pub fn code(self) -> i32 {
        match self {
            Self::Optimal => 0,
            Self::Unbounded => 1,
            Self::Infeasible => 2,
            Self::Singular => 3,
            Self::AbortTime => 4,
            Self::AbortIter => 5,
            Self::AbortValue => 6,
            Self::Unknown => -1,
        }
    }

    /// Whether the solve ran to a mathematical conclusion.
    pub fn is_conclusive(self) -> bool {
        matches!(self, Self::Optimal | Self::Unbounded | Self::Infeasible)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Optimal => "optimal",
            Self::Unbounded => "unbounded",
            Self::Infeasible => "infeasible",
            Self::Singular => "singular",
            Self::AbortTime => "aborted on time limit",
            Self::AbortIter => "aborted on iteration limit",
            Self::AbortValue => "aborted on objective limit",
            Self::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// Error kinds emitted by the solver core.
///
/// `UpdateRejected` never escapes the engine: it is recovered by forcing a refactorization and
/// only counted in the statistics. Rational domain errors panic instead of appearing here; they
/// are programmer errors.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SolverError {
    /// The basis could not be factored or refactored.
    Singular,
    /// A rank-1 factorization update exceeded its growth bound.
    UpdateRejected,
    /// Malformed input data.
    InvalidInput(String),
    /// The user raised the abort flag.
    Cancelled,
    /// Residual infeasibility above tolerance survived the recovery cycle.
    NumericalFailure,
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Singular => write!(f, "basis is singular"),
            Self::UpdateRejected => write!(f, "factorization update rejected"),
            Self::InvalidInput(reason) => write!(f, "invalid input: {}", reason),
            Self::Cancelled => write!(f, "cancelled by user"),
            Self::NumericalFailure => write!(f, "numerical failure"),
        }
    }
}

impl std::error::Error for SolverError {
}

impl From<InvalidProblem> for SolverError {
    fn from(error: InvalidProblem) -> Self {
        Self::InvalidInput(error.to_string())
    }
}
