//! Exact arithmetic end to end: parsing, refinement and the quality surface.
use num::Zero;

use seqplex::data::linear_algebra::matrix::SparseMatrix;
use seqplex::data::linear_program::elements::Objective;
use seqplex::data::linear_program::problem::{Problem, Variable};
use seqplex::{Config, Rational, RefinementDriver, Status, R};

#[test]
fn rational_literals() {
    assert_eq!(".5e-2".parse::<Rational>().unwrap(), R!(1, 200));
    assert_eq!("1/3".parse::<Rational>().unwrap(), R!(1, 3));

    let negative_infinity = "-inf".parse::<Rational>().unwrap();
    assert!(negative_infinity < Rational::zero());
    assert!(negative_infinity > -1e200);
}

/// minimize x + y subject to 3x + 3y >= 2, x - y = 0: the optimum puts both variables at 1/3,
/// which no double represents. Three rounds of refinement must recover it exactly.
#[test]
fn refine_to_exact_thirds() {
    let problem = Problem::new(
        SparseMatrix::from_columns(
            vec![
                vec![(0, R!(3, 1)), (1, R!(1, 1))],
                vec![(0, R!(3, 1)), (1, R!(-1, 1))],
            ],
            2,
        ),
        vec![
            Variable {
                cost: R!(1, 1),
                lower: Rational::zero(),
                upper: Rational::bound_infinity(),
            },
            Variable {
                cost: R!(1, 1),
                lower: Rational::zero(),
                upper: Rational::bound_infinity(),
            },
        ],
        vec![R!(2, 1), Rational::zero()],
        vec![Rational::bound_infinity(), Rational::zero()],
        Objective::Minimize,
    ).unwrap();

    let mut driver = RefinementDriver::new(problem, Config::default());
    let result = driver.solve().unwrap();

    assert_eq!(result.status, Status::Optimal);
    assert!(result.converged);
    assert!(result.refinements <= 3, "{} refinement rounds", result.refinements);

    let solution = result.solution.unwrap();
    assert_eq!(solution.primal[0], R!(1, 3));
    assert_eq!(solution.primal[1], R!(1, 3));
    assert_eq!(solution.objective, R!(2, 3));

    // The reported violations are computed in rational arithmetic and are exactly zero.
    let quality = result.quality.unwrap();
    assert_eq!(quality.constraint.maximum, Rational::zero());
    assert_eq!(quality.constraint.sum, Rational::zero());
    assert_eq!(quality.bound.maximum, Rational::zero());
    assert_eq!(quality.slack.maximum, Rational::zero());
    assert_eq!(quality.dual.maximum, Rational::zero());

    let statistics = driver.statistics().unwrap();
    assert_eq!(statistics.refinements, result.refinements);
    assert_eq!(statistics.stall_refinements, result.stall_refinements);
}

/// A problem that is already exactly representable converges without any stalling.
#[test]
fn representable_problem_is_immediate() {
    let problem = Problem::new(
        SparseMatrix::from_columns(vec![vec![(0, R!(2, 1))]], 1),
        vec![Variable {
            cost: R!(1, 1),
            lower: Rational::zero(),
            upper: Rational::bound_infinity(),
        }],
        vec![R!(1, 1)],
        vec![Rational::bound_infinity()],
        Objective::Minimize,
    ).unwrap();

    let mut driver = RefinementDriver::new(problem, Config::default());
    let result = driver.solve().unwrap();

    assert_eq!(result.status, Status::Optimal);
    assert!(result.converged);
    assert_eq!(result.stall_refinements, 0);
    assert_eq!(result.solution.unwrap().primal[0], R!(1, 2));
}
