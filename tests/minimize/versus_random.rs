//! Over a fixed set of seeds, every surrogate reaches the optimum of
//! `bench3` at least as often as pure random search with the same budget,
//! and strictly more often on `branin`, where random points rarely land
//! close to one of the three minimizers.

use core::ops::Range;

use tree_smbo::benchmarks::{bench3, branin};
use tree_smbo::prelude::*;

const SEEDS: Range<u64> = 0..10;

struct Case {
    objective: fn(&[f64]) -> f64,
    dims: &'static [(f64, f64)],
    maxiter: usize,
    threshold: f64,
}

const BENCH3: Case = Case {
    objective: bench3,
    dims: &[(-2.0, 2.0)],
    maxiter: 75,
    threshold: -0.9 + 0.05,
};

const BRANIN: Case = Case {
    objective: branin,
    dims: &[(-5.0, 10.0), (0.0, 15.0)],
    maxiter: 100,
    threshold: 0.39 + 0.1,
};

fn successes<F>(case: &Case, minimize: F, n_start: usize) -> usize
where
    F: Fn(fn(&[f64]) -> f64, &[(f64, f64)], &MinimizeOptions) -> Result<f64>,
{
    SEEDS
        .filter(|&seed| {
            let options = MinimizeOptions::new()
                .n_start(n_start)
                .maxiter(case.maxiter)
                .random_state(seed);
            minimize(case.objective, case.dims, &options).unwrap() < case.threshold
        })
        .count()
}

/// Every evaluation is a uniform random point when `n_start == maxiter`.
fn random_successes(case: &Case) -> usize {
    successes(
        case,
        |f, dims, options| tree_minimize(f, dims, options).map(|r| r.fun),
        case.maxiter,
    )
}

macro_rules! guided_successes {
    ($minimize:ident, $case:expr) => {
        successes(
            $case,
            |f, dims, options| $minimize(f, dims, options).map(|r| r.fun),
            MinimizeOptions::new().get_n_start(),
        )
    };
}

macro_rules! beats_random {
    ($($name:ident: $minimize:ident),* $(,)?) => {
        $(
            #[test]
            fn $name() {
                let random = random_successes(&BENCH3);
                let guided = guided_successes!($minimize, &BENCH3);
                assert!(guided >= random, "bench3: guided {guided} vs random {random}");

                let random = random_successes(&BRANIN);
                let guided = guided_successes!($minimize, &BRANIN);
                assert!(guided > random, "branin: guided {guided} vs random {random}");
            }
        )*
    };
}

beats_random! {
    tree_beats_random: tree_minimize,
    rf_beats_random: rf_minimize,
    et_beats_random: et_minimize,
    gbrt_beats_random: gbrt_minimize,
}
