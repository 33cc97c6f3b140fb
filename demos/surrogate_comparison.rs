//! Compares the four surrogates, plus a custom forest, on the same budget.
//!
//! Each run uses the same seed, so the random starting points are shared and
//! only the surrogate-guided part of the trace differs.
//!
//! Run with: `cargo run --release --example surrogate_comparison`

use tree_smbo::benchmarks::hart6;
use tree_smbo::prelude::*;
use tree_smbo::surrogate::{ForestKind, ForestRegressor};

fn main() -> Result<()> {
    let dims = [(0.0, 1.0); 6];
    let options = MinimizeOptions::new().maxiter(60).random_state(7);

    let results = [
        ("tree", tree_minimize(hart6, &dims, &options)?.fun),
        ("random forest", rf_minimize(hart6, &dims, &options)?.fun),
        ("extra trees", et_minimize(hart6, &dims, &options)?.fun),
        ("gbrt", gbrt_minimize(hart6, &dims, &options)?.fun),
    ];

    // A smaller, deeper-leaved forest scored with a lower confidence bound
    let small_forest = ForestRegressor::builder(ForestKind::ExtraTrees)
        .n_trees(25)
        .min_samples_leaf(1)
        .build()?;
    let lcb = options
        .clone()
        .acquisition(Acquisition::lower_confidence_bound());
    let custom = minimize_with(&small_forest, hart6, &dims, &lcb)?;

    println!("Hartmann 6D, minimum ≈ -3.3224, {} evaluations", options.get_maxiter());
    for (name, fun) in results {
        println!("  {name:<16} {fun:.4}");
    }
    println!("  {:<16} {:.4}", "extra trees/lcb", custom.fun);
    Ok(())
}
