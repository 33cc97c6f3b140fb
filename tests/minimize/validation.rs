use core::cell::Cell;

use tree_smbo::benchmarks::bench1;
use tree_smbo::prelude::*;

/// Objective that counts how often it was called.
struct Counting<'a> {
    calls: &'a Cell<usize>,
}

impl Objective for Counting<'_> {
    fn evaluate(&self, x: &[f64]) -> f64 {
        self.calls.set(self.calls.get() + 1);
        bench1(x)
    }
}

fn run_all(dimensions: &[(f64, f64)], options: &MinimizeOptions) -> Vec<Result<usize>> {
    vec![
        tree_minimize(bench1, dimensions, options).map(|r| r.n_iters()),
        rf_minimize(bench1, dimensions, options).map(|r| r.n_iters()),
        et_minimize(bench1, dimensions, options).map(|r| r.n_iters()),
        gbrt_minimize(bench1, dimensions, options).map(|r| r.n_iters()),
    ]
}

#[test]
fn zero_iterations_rejected_by_every_minimizer() {
    let options = MinimizeOptions::new().maxiter(0).random_state(1);
    for result in run_all(&[(-2.0, 2.0)], &options) {
        let err = result.unwrap_err();
        assert!(matches!(err, Error::NoIterations));
        assert!(err.to_string().contains("at least one iteration"));
    }
}

#[test]
fn zero_starting_points_rejected_by_every_minimizer() {
    let options = MinimizeOptions::new().n_start(0).maxiter(2).random_state(1);
    for result in run_all(&[(-2.0, 2.0)], &options) {
        let err = result.unwrap_err();
        assert!(matches!(err, Error::NoStartingPoints));
        assert!(err.to_string().contains("at least one starting point"));
    }
}

#[test]
fn iteration_check_comes_first() {
    let options = MinimizeOptions::new().n_start(0).maxiter(0);
    let err = tree_minimize(bench1, &[(2.0, -2.0)], &options).unwrap_err();
    assert!(matches!(err, Error::NoIterations));
}

#[test]
fn invalid_dimension_fails_before_any_evaluation() {
    let calls = Cell::new(0);
    let err = tree_minimize(
        Counting { calls: &calls },
        &[(-1.0, 1.0), (3.0, 3.0)],
        &MinimizeOptions::new().maxiter(5).random_state(1),
    )
    .unwrap_err();
    let Error::InvalidDimension { index, low, high } = err else {
        panic!("expected InvalidDimension, got {err:?}");
    };
    assert_eq!((index, low, high), (1, 3.0, 3.0));
    assert_eq!(calls.get(), 0);
}

#[test]
fn non_finite_bound_is_rejected() {
    let err = rf_minimize(
        bench1,
        &[(f64::NEG_INFINITY, 1.0)],
        &MinimizeOptions::new().random_state(1),
    )
    .unwrap_err();
    assert!(matches!(err, Error::InvalidDimension { index: 0, .. }));
}

#[test]
fn empty_space_is_rejected() {
    let err = et_minimize(bench1, &[], &MinimizeOptions::new().random_state(1)).unwrap_err();
    assert!(matches!(err, Error::EmptySpace));
}

#[test]
fn objective_called_once_per_iteration() {
    let calls = Cell::new(0);
    gbrt_minimize(
        Counting { calls: &calls },
        &[(-2.0, 2.0)],
        &MinimizeOptions::new().n_start(4).maxiter(9).random_state(3),
    )
    .unwrap();
    assert_eq!(calls.get(), 9);
}

#[test]
fn infinite_objective_value_aborts_the_run() {
    let err = tree_minimize(
        |x: &[f64]| if x[0] > 0.0 { f64::INFINITY } else { x[0] },
        &[(-1.0, 1.0)],
        &MinimizeOptions::new().n_start(20).maxiter(25).random_state(2),
    )
    .unwrap_err();
    assert!(matches!(err, Error::SurrogateFit(_)));
}
