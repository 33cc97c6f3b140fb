//! Basic minimization example: a single regression tree as the surrogate.
//!
//! Minimizes the Branin function over `[-5, 10] × [0, 15]`, whose minimum
//! value is about 0.3979. No feature flags are required.
//!
//! Run with: `cargo run --example basic_minimize`

use tree_smbo::benchmarks::branin;
use tree_smbo::prelude::*;

fn main() -> Result<()> {
    // 10 random points first, then 90 surrogate-guided ones.
    let options = MinimizeOptions::new()
        .n_start(10)
        .maxiter(100)
        .random_state(42);

    let result = tree_minimize(branin, &[(-5.0, 10.0), (0.0, 15.0)], &options)?;

    println!("Evaluations: {}", result.n_iters());
    println!("Surrogates fitted: {}", result.models.len());
    println!("  x    = [{:.4}, {:.4}]", result.x[0], result.x[1]);
    println!("  f(x) = {:.4}", result.fun);

    // Show how the best value improved over time
    for (i, best) in result.best_so_far().iter().enumerate().step_by(10) {
        println!("  after {:>3} evaluations: {best:.4}", i + 1);
    }
    Ok(())
}
