use tree_smbo::benchmarks::{bench3, branin};
use tree_smbo::prelude::*;

macro_rules! same_seed_same_trace {
    ($($name:ident => $minimize:ident),* $(,)?) => {
        $(
            #[test]
            fn $name() {
                let options = MinimizeOptions::new().n_start(5).maxiter(15).random_state(11);
                let dims = [(-5.0, 10.0), (0.0, 15.0)];
                let a = $minimize(branin, &dims, &options).unwrap();
                let b = $minimize(branin, &dims, &options).unwrap();
                assert_eq!(a.x_iters, b.x_iters);
                assert_eq!(a.func_vals, b.func_vals);
                assert_eq!(a.x, b.x);
            }
        )*
    };
}

same_seed_same_trace! {
    tree_is_reproducible => tree_minimize,
    random_forest_is_reproducible => rf_minimize,
    extra_trees_is_reproducible => et_minimize,
    gradient_boosting_is_reproducible => gbrt_minimize,
}

#[test]
fn different_seeds_differ() {
    let dims = [(-2.0, 2.0)];
    let a = tree_minimize(bench3, &dims, &MinimizeOptions::new().maxiter(5).random_state(1))
        .unwrap();
    let b = tree_minimize(bench3, &dims, &MinimizeOptions::new().maxiter(5).random_state(2))
        .unwrap();
    assert_ne!(a.x_iters, b.x_iters);
}

#[test]
fn acquisition_choice_changes_the_model_guided_points() {
    let dims = [(-2.0, 2.0)];
    let base = MinimizeOptions::new().n_start(4).maxiter(10).random_state(6);
    let ei = et_minimize(bench3, &dims, &base).unwrap();
    let lcb = et_minimize(
        bench3,
        &dims,
        &base.clone().acquisition(Acquisition::LowerConfidenceBound { kappa: 50.0 }),
    )
    .unwrap();

    assert_eq!(ei.x_iters[..4], lcb.x_iters[..4]);
    assert_ne!(ei.x_iters[4..], lcb.x_iters[4..]);
}
