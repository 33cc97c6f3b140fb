use tree_smbo::benchmarks::bench1;
use tree_smbo::prelude::*;

const DIMS: [(f64, f64); 2] = [(-2.0, 2.0), (-2.0, 2.0)];

fn check_result<M>(result: &OptimizeResult<M>, n_models: usize, n_iters: usize) {
    assert_eq!(result.models.len(), n_models);
    assert_eq!(result.x_iters.len(), n_iters);
    assert!(result.x_iters.iter().all(|x| x.len() == DIMS.len()));
    assert_eq!(result.func_vals.len(), n_iters);

    let best = result
        .func_vals
        .iter()
        .copied()
        .fold(f64::INFINITY, f64::min);
    assert_eq!(result.fun, best);
    let first = result.func_vals.iter().position(|&v| v == best).unwrap();
    assert_eq!(result.x, result.x_iters[first]);
    assert_eq!(bench1(&result.x), result.fun);
}

macro_rules! shape_tests {
    ($($name:ident => $minimize:ident),* $(,)?) => {
        mod single_iteration {
            use super::*;
            $(
                #[test]
                fn $name() {
                    let options = MinimizeOptions::new().maxiter(1).random_state(1);
                    let result = $minimize(bench1, &DIMS, &options).unwrap();
                    check_result(&result, 0, 1);
                }
            )*
        }

        mod seven_iterations {
            use super::*;
            $(
                #[test]
                fn $name() {
                    let options = MinimizeOptions::new().n_start(3).maxiter(7).random_state(1);
                    let result = $minimize(bench1, &DIMS, &options).unwrap();
                    check_result(&result, 4, 7);
                }
            )*
        }
    };
}

shape_tests! {
    tree => tree_minimize,
    random_forest => rf_minimize,
    extra_trees => et_minimize,
    gradient_boosting => gbrt_minimize,
}

#[test]
fn n_start_larger_than_maxiter_is_purely_random() {
    let options = MinimizeOptions::new().n_start(10).maxiter(4).random_state(1);
    let result = rf_minimize(bench1, &DIMS, &options).unwrap();
    check_result(&result, 0, 4);

    let space = SearchSpace::new(&DIMS).unwrap();
    let mut rng = fastrand::Rng::with_seed(1);
    assert_eq!(result.x_iters, space.sample_many(&mut rng, 4));
}

#[test]
fn result_carries_the_space() {
    let options = MinimizeOptions::new().maxiter(2).random_state(1);
    let result = tree_minimize(bench1, &DIMS, &options).unwrap();
    assert_eq!(result.space, SearchSpace::new(&DIMS).unwrap());
}

#[test]
fn models_predict_on_the_trace() {
    let options = MinimizeOptions::new().n_start(5).maxiter(12).random_state(4);
    let result = gbrt_minimize(bench1, &DIMS, &options).unwrap();

    for model in &result.models {
        let (means, stds) = model.predict(&result.x_iters);
        assert_eq!(means.len(), result.x_iters.len());
        assert!(means.iter().all(|m| m.is_finite()));
        assert!(stds.iter().all(|&s| s >= 0.0));
    }
}

#[test]
fn tree_models_grow_with_the_trace() {
    let options = MinimizeOptions::new().n_start(5).maxiter(30).random_state(8);
    let result = tree_minimize(bench1, &DIMS, &options).unwrap();
    let first = result.models.first().unwrap().n_leaves();
    let last = result.models.last().unwrap().n_leaves();
    assert!(last >= first);
}
