//! Each minimizer must reach the known optimum of every benchmark from a
//! single fixed seed: 75 evaluations for the one-dimensional functions,
//! 100 for `branin` and 200 for `hart6`.

use tree_smbo::benchmarks::{bench1, bench2, bench3, branin, hart6};
use tree_smbo::prelude::*;

const SEED: u64 = 1;

const BENCH1_DIMS: [(f64, f64); 1] = [(-2.0, 2.0)];
const BENCH2_DIMS: [(f64, f64); 1] = [(-6.0, 6.0)];
const BENCH3_DIMS: [(f64, f64); 1] = [(-2.0, 2.0)];
const BRANIN_DIMS: [(f64, f64); 2] = [(-5.0, 10.0), (0.0, 15.0)];
const HART6_DIMS: [(f64, f64); 6] = [(0.0, 1.0); 6];

macro_rules! converges {
    ($($name:ident: $minimize:ident($func:ident, $dims:expr, $maxiter:expr) -> $target:expr, $margin:expr);* $(;)?) => {
        $(
            #[test]
            fn $name() {
                let options = MinimizeOptions::new().maxiter($maxiter).random_state(SEED);
                let result = $minimize($func, &$dims, &options).unwrap();
                assert_eq!(result.func_vals.len(), $maxiter);
                assert!(
                    result.fun < $target + $margin,
                    "best {} not below {} + {}",
                    result.fun,
                    $target,
                    $margin
                );
            }
        )*
    };
}

converges! {
    tree_bench1: tree_minimize(bench1, BENCH1_DIMS, 75) -> 0.0, 0.05;
    tree_bench2: tree_minimize(bench2, BENCH2_DIMS, 75) -> -5.0, 0.05;
    tree_bench3: tree_minimize(bench3, BENCH3_DIMS, 75) -> -0.9, 0.05;
    tree_branin: tree_minimize(branin, BRANIN_DIMS, 100) -> 0.39, 0.1;
    tree_hart6: tree_minimize(hart6, HART6_DIMS, 200) -> -3.32, 1.0;

    rf_bench1: rf_minimize(bench1, BENCH1_DIMS, 75) -> 0.0, 0.05;
    rf_bench2: rf_minimize(bench2, BENCH2_DIMS, 75) -> -5.0, 0.05;
    rf_bench3: rf_minimize(bench3, BENCH3_DIMS, 75) -> -0.9, 0.05;
    rf_branin: rf_minimize(branin, BRANIN_DIMS, 100) -> 0.39, 0.1;
    rf_hart6: rf_minimize(hart6, HART6_DIMS, 200) -> -3.32, 1.0;

    et_bench1: et_minimize(bench1, BENCH1_DIMS, 75) -> 0.0, 0.05;
    et_bench2: et_minimize(bench2, BENCH2_DIMS, 75) -> -5.0, 0.05;
    et_bench3: et_minimize(bench3, BENCH3_DIMS, 75) -> -0.9, 0.05;
    et_branin: et_minimize(branin, BRANIN_DIMS, 100) -> 0.39, 0.1;
    et_hart6: et_minimize(hart6, HART6_DIMS, 200) -> -3.32, 1.0;

    gbrt_bench1: gbrt_minimize(bench1, BENCH1_DIMS, 75) -> 0.0, 0.05;
    gbrt_bench2: gbrt_minimize(bench2, BENCH2_DIMS, 75) -> -5.0, 0.05;
    gbrt_bench3: gbrt_minimize(bench3, BENCH3_DIMS, 75) -> -0.9, 0.05;
    gbrt_branin: gbrt_minimize(branin, BRANIN_DIMS, 100) -> 0.39, 0.1;
    gbrt_hart6: gbrt_minimize(hart6, HART6_DIMS, 200) -> -3.32, 1.0;
}
