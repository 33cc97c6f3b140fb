//! The [`Objective`] trait defines what gets minimized.
//!
//! Plain functions and closures taking `&[f64]` implement it directly:
//!
//! ```
//! use tree_smbo::prelude::*;
//!
//! let result = tree_minimize(
//!     |x: &[f64]| (x[0] - 3.0).powi(2),
//!     &[(-10.0, 10.0)],
//!     &MinimizeOptions::new().maxiter(20).random_state(0),
//! )
//! .unwrap();
//! assert_eq!(result.func_vals.len(), 20);
//! ```
//!
//! Implement the trait on a struct when the objective carries state, such
//! as a dataset or simulation parameters.

/// An expensive black-box function to minimize.
///
/// `evaluate` is called exactly once per iteration, in order, with a point
/// that has one coordinate per search-space dimension. A run is only
/// reproducible if `evaluate` is deterministic for a fixed point.
pub trait Objective {
    /// Evaluate the objective at `x`.
    fn evaluate(&self, x: &[f64]) -> f64;
}

impl<F> Objective for F
where
    F: Fn(&[f64]) -> f64,
{
    fn evaluate(&self, x: &[f64]) -> f64 {
        self(x)
    }
}
