use tree_smbo::benchmarks::{bench2, branin};
use tree_smbo::prelude::*;

fn assert_inside<M>(result: &OptimizeResult<M>) {
    for x in &result.x_iters {
        assert!(result.space.contains(x), "{x:?} outside the search space");
    }
}

#[test]
fn every_minimizer_stays_inside_the_space() {
    let dims = [(-5.0, 10.0), (0.0, 15.0)];
    let options = MinimizeOptions::new().n_start(5).maxiter(20).random_state(3);

    assert_inside(&tree_minimize(branin, &dims, &options).unwrap());
    assert_inside(&rf_minimize(branin, &dims, &options).unwrap());
    assert_inside(&et_minimize(branin, &dims, &options).unwrap());
    assert_inside(&gbrt_minimize(branin, &dims, &options).unwrap());
}

#[test]
fn narrow_interval() {
    let dims = [(1.0, 1.0 + 1e-9)];
    let options = MinimizeOptions::new().n_start(3).maxiter(8).random_state(5);
    let result = tree_minimize(bench2, &dims, &options).unwrap();
    assert_inside(&result);
}

#[test]
fn best_so_far_never_increases() {
    let options = MinimizeOptions::new().n_start(4).maxiter(20).random_state(9);
    let result = rf_minimize(bench2, &[(-6.0, 6.0)], &options).unwrap();
    let trace = result.best_so_far();
    assert!(trace.windows(2).all(|w| w[1] <= w[0]));
    assert_eq!(trace.last().copied(), Some(result.fun));
}

#[test]
fn custom_regressor_via_minimize_with() {
    use tree_smbo::surrogate::{ForestKind, ForestRegressor};

    let forest = ForestRegressor::builder(ForestKind::RandomForest)
        .n_trees(10)
        .min_samples_leaf(1)
        .build()
        .unwrap();
    let options = MinimizeOptions::new().n_start(3).maxiter(10).random_state(2);
    let result = minimize_with(&forest, bench2, &[(-6.0, 6.0)], &options).unwrap();

    assert_eq!(result.models.len(), 7);
    assert!(result.models.iter().all(|m| m.n_trees() == 10));
    assert_inside(&result);
}
