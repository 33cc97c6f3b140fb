//! Surrogate models: tree-based regressors with an uncertainty estimate.
//!
//! A surrogate is split into two halves:
//!
//! - a [`Regressor`] is an unfitted configuration. Its
//!   [`fit`](Regressor::fit) consumes the observations gathered so far and
//!   returns a fitted model.
//! - a [`Surrogate`] is that fitted model. It is immutable and answers
//!   [`predict`](Surrogate::predict) with a mean and a standard deviation
//!   per candidate point.
//!
//! | Regressor | Fitted model | Uncertainty |
//! |-----------|--------------|-------------|
//! | [`DecisionTreeRegressor`] | [`DecisionTree`] | target spread inside the leaf |
//! | [`ForestRegressor`] (random forest) | [`Forest`] | disagreement between bootstrapped trees |
//! | [`ForestRegressor`] (extra trees) | [`Forest`] | disagreement between randomized trees |
//! | [`GradientBoostingRegressor`] | [`QuantileEnsemble`] | half the 16%–84% quantile gap |
//!
//! Every regressor draws all of its randomness from the `fastrand::Rng`
//! passed to `fit`, so a fit is reproducible from the rng state alone.

mod boosting;
mod forest;
mod tree;

pub use boosting::{GradientBoostingRegressor, GradientBoostingRegressorBuilder, QuantileEnsemble};
pub use forest::{Forest, ForestKind, ForestRegressor, ForestRegressorBuilder};
pub use tree::{DecisionTree, DecisionTreeRegressor, DecisionTreeRegressorBuilder};

use crate::error::{Error, Result};

/// A fitted surrogate that predicts a mean and an uncertainty per point.
pub trait Surrogate {
    /// Predicts `(means, stds)` for every candidate, in candidate order.
    ///
    /// Each standard deviation is non-negative.
    ///
    /// # Panics
    ///
    /// The tree-based models panic if a candidate has fewer coordinates
    /// than the points the model was fit on. Candidates drawn from the
    /// [`SearchSpace`](crate::SearchSpace) used for fitting always match.
    fn predict(&self, candidates: &[Vec<f64>]) -> (Vec<f64>, Vec<f64>);
}

/// An unfitted surrogate configuration.
pub trait Regressor {
    /// The fitted model produced by [`fit`](Regressor::fit).
    type Model: Surrogate;

    /// Fits a fresh model on `points` and their objective `values`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsufficientData`] if there are no observations or
    /// the two slices differ in length, and [`Error::SurrogateFit`] if the
    /// data cannot be fit (non-finite values, ragged rows).
    fn fit(
        &self,
        points: &[Vec<f64>],
        values: &[f64],
        rng: &mut fastrand::Rng,
    ) -> Result<Self::Model>;
}

/// Checks the preconditions shared by every regressor.
pub(crate) fn check_training_data(points: &[Vec<f64>], values: &[f64]) -> Result<()> {
    if points.is_empty() || points.len() != values.len() {
        return Err(Error::InsufficientData {
            points: points.len(),
            values: values.len(),
        });
    }

    let width = points[0].len();
    if width == 0 {
        return Err(Error::SurrogateFit("points have no coordinates".into()));
    }
    for (i, row) in points.iter().enumerate() {
        if row.len() != width {
            return Err(Error::SurrogateFit(format!(
                "point {i} has {} coordinates, expected {width}",
                row.len()
            )));
        }
        if row.iter().any(|v| !v.is_finite()) {
            return Err(Error::SurrogateFit(format!(
                "point {i} has a non-finite coordinate"
            )));
        }
    }
    if let Some(i) = values.iter().position(|v| !v.is_finite()) {
        return Err(Error::SurrogateFit(format!(
            "objective value {i} is not finite ({})",
            values[i]
        )));
    }
    Ok(())
}
