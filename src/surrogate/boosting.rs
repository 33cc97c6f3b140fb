//! Gradient-boosted trees trained on the quantile (pinball) loss.
//!
//! Three boosted ensembles are fit on the same data, one per quantile in
//! `[0.16, 0.5, 0.84]`. The median ensemble gives the predicted mean; half
//! the distance between the outer two approximates one standard deviation
//! of a normal predictive distribution.
//!
//! # Algorithm
//!
//! For quantile `alpha`:
//!
//! 1. Start every prediction at the `alpha`-quantile of the targets.
//! 2. Each stage fits a depth-limited regression tree to the negative
//!    pinball gradient: `alpha` where the target lies above the current
//!    prediction, `alpha - 1` otherwise.
//! 3. Every leaf is then re-estimated as the `alpha`-quantile of the
//!    residuals of the samples it holds, and the predictions move by
//!    `learning_rate` times the leaf value.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::rng_util;

use super::tree::{RegressionTree, Splitter, TreeParams};
use super::{Regressor, Surrogate, check_training_data};

/// Quantiles fit by every [`GradientBoostingRegressor`], low to high.
const QUANTILES: [f64; 3] = [0.16, 0.5, 0.84];

const DEFAULT_N_ESTIMATORS: usize = 50;
const DEFAULT_LEARNING_RATE: f64 = 0.1;
const DEFAULT_MAX_DEPTH: usize = 3;
const DEFAULT_MIN_SAMPLES_LEAF: usize = 4;

/// Gradient boosting regressor producing a [`QuantileEnsemble`].
///
/// # Examples
///
/// ```
/// use tree_smbo::surrogate::{GradientBoostingRegressor, Regressor, Surrogate};
///
/// let points: Vec<Vec<f64>> = (0..40).map(|i| vec![f64::from(i) / 4.0]).collect();
/// let values: Vec<f64> = points.iter().map(|p| (p[0] - 5.0).abs()).collect();
///
/// let regressor = GradientBoostingRegressor::builder()
///     .n_estimators(30)
///     .build()
///     .unwrap();
/// let mut rng = fastrand::Rng::with_seed(0);
/// let model = regressor.fit(&points, &values, &mut rng).unwrap();
///
/// let (means, stds) = model.predict(&[vec![5.0], vec![0.0]]);
/// assert!(means[0] < means[1]);
/// assert!(stds.iter().all(|&s| s >= 0.0));
/// ```
#[derive(Clone, Debug)]
pub struct GradientBoostingRegressor {
    n_estimators: usize,
    learning_rate: f64,
    subsample: f64,
    params: TreeParams,
}

impl GradientBoostingRegressor {
    /// Creates a regressor with the default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            n_estimators: DEFAULT_N_ESTIMATORS,
            learning_rate: DEFAULT_LEARNING_RATE,
            subsample: 1.0,
            params: TreeParams {
                max_depth: Some(DEFAULT_MAX_DEPTH),
                min_samples_split: 2,
                min_samples_leaf: DEFAULT_MIN_SAMPLES_LEAF,
                max_features: None,
                splitter: Splitter::Best,
            },
        }
    }

    /// Creates a builder for configuring a `GradientBoostingRegressor`.
    #[must_use]
    pub fn builder() -> GradientBoostingRegressorBuilder {
        GradientBoostingRegressorBuilder::default()
    }

    /// Fit one boosted ensemble for quantile `alpha`.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    fn fit_quantile(
        &self,
        points: &[Vec<f64>],
        values: &[f64],
        alpha: f64,
        rng: &mut fastrand::Rng,
    ) -> BoostedQuantile {
        let n = points.len();
        let init = quantile(values, alpha);
        let mut current = vec![init; n];
        let n_rows = ((self.subsample * n as f64).round() as usize).clamp(1, n);
        let all: Vec<usize> = (0..n).collect();

        let mut stages = Vec::with_capacity(self.n_estimators);
        for _ in 0..self.n_estimators {
            let gradient: Vec<f64> = values
                .iter()
                .zip(&current)
                .map(|(&y, &f)| if y > f { alpha } else { alpha - 1.0 })
                .collect();

            let rows = if n_rows < n {
                rng_util::partial_shuffle(n, n_rows, rng)
            } else {
                all.clone()
            };
            let mut tree = RegressionTree::build(points, &gradient, &rows, &self.params, rng);

            let mut residuals: BTreeMap<usize, Vec<f64>> = BTreeMap::new();
            for &i in &rows {
                residuals
                    .entry(tree.leaf_index(&points[i]))
                    .or_default()
                    .push(values[i] - current[i]);
            }
            for (leaf, leaf_residuals) in &residuals {
                tree.set_leaf_value(*leaf, quantile(leaf_residuals, alpha));
            }

            for (f, x) in current.iter_mut().zip(points) {
                *f += self.learning_rate * tree.predict(x).0;
            }
            stages.push(tree);
        }

        BoostedQuantile {
            init,
            learning_rate: self.learning_rate,
            stages,
        }
    }
}

impl Default for GradientBoostingRegressor {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for configuring a [`GradientBoostingRegressor`].
///
/// Defaults:
/// - `n_estimators`: 50 boosting stages per quantile
/// - `learning_rate`: 0.1
/// - `max_depth`: 3
/// - `min_samples_leaf`: 4
/// - `subsample`: 1.0 (every stage sees all rows)
#[derive(Clone, Debug, Default)]
pub struct GradientBoostingRegressorBuilder {
    n_estimators: Option<usize>,
    learning_rate: Option<f64>,
    max_depth: Option<usize>,
    min_samples_leaf: Option<usize>,
    subsample: Option<f64>,
}

impl GradientBoostingRegressorBuilder {
    /// Number of boosting stages per quantile.
    #[must_use]
    pub fn n_estimators(mut self, n: usize) -> Self {
        self.n_estimators = Some(n);
        self
    }

    /// Shrinkage applied to every stage.
    #[must_use]
    pub fn learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = Some(rate);
        self
    }

    /// Depth of each stage's tree.
    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Minimum number of samples in each leaf.
    #[must_use]
    pub fn min_samples_leaf(mut self, n: usize) -> Self {
        self.min_samples_leaf = Some(n);
        self
    }

    /// Fraction of rows drawn without replacement for every stage.
    #[must_use]
    pub fn subsample(mut self, fraction: f64) -> Self {
        self.subsample = Some(fraction);
        self
    }

    /// Builds the configured [`GradientBoostingRegressor`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `n_estimators` or `max_depth` is
    /// zero, `learning_rate` is not positive and finite, `subsample` is
    /// outside `(0, 1]` or `min_samples_leaf` is zero.
    pub fn build(self) -> Result<GradientBoostingRegressor> {
        let defaults = GradientBoostingRegressor::new();

        let n_estimators = self.n_estimators.unwrap_or(defaults.n_estimators);
        if n_estimators == 0 {
            return Err(Error::InvalidConfig("n_estimators must be at least 1"));
        }
        let learning_rate = self.learning_rate.unwrap_or(defaults.learning_rate);
        if !(learning_rate.is_finite() && learning_rate > 0.0) {
            return Err(Error::InvalidConfig(
                "learning_rate must be positive and finite",
            ));
        }
        let subsample = self.subsample.unwrap_or(defaults.subsample);
        if !(subsample > 0.0 && subsample <= 1.0) {
            return Err(Error::InvalidConfig("subsample must be in (0, 1]"));
        }
        let max_depth = self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH);
        if max_depth == 0 {
            return Err(Error::InvalidConfig("max_depth must be at least 1"));
        }

        let params = TreeParams {
            max_depth: Some(max_depth),
            min_samples_leaf: self
                .min_samples_leaf
                .unwrap_or(defaults.params.min_samples_leaf),
            ..defaults.params
        };
        params.validate()?;

        Ok(GradientBoostingRegressor {
            n_estimators,
            learning_rate,
            subsample,
            params,
        })
    }
}

/// One boosted ensemble for a single quantile.
#[derive(Clone, Debug)]
struct BoostedQuantile {
    init: f64,
    learning_rate: f64,
    stages: Vec<RegressionTree>,
}

impl BoostedQuantile {
    fn predict(&self, x: &[f64]) -> f64 {
        self.init
            + self.learning_rate * self.stages.iter().map(|t| t.predict(x).0).sum::<f64>()
    }
}

/// A fitted [`GradientBoostingRegressor`]: one boosted ensemble per quantile.
#[derive(Clone, Debug)]
pub struct QuantileEnsemble {
    members: [BoostedQuantile; 3],
}

impl QuantileEnsemble {
    /// The quantile levels this ensemble predicts, low to high.
    #[must_use]
    pub fn quantile_levels(&self) -> [f64; 3] {
        QUANTILES
    }

    /// Predicted 16%, 50% and 84% quantiles at `x`.
    #[must_use]
    pub fn predict_quantiles(&self, x: &[f64]) -> [f64; 3] {
        [
            self.members[0].predict(x),
            self.members[1].predict(x),
            self.members[2].predict(x),
        ]
    }

    /// Number of boosting stages per quantile.
    #[must_use]
    pub fn n_estimators(&self) -> usize {
        self.members[0].stages.len()
    }
}

impl Regressor for GradientBoostingRegressor {
    type Model = QuantileEnsemble;

    fn fit(
        &self,
        points: &[Vec<f64>],
        values: &[f64],
        rng: &mut fastrand::Rng,
    ) -> Result<QuantileEnsemble> {
        check_training_data(points, values)?;
        let [low, mid, high] = QUANTILES;
        let members = [
            self.fit_quantile(points, values, low, rng),
            self.fit_quantile(points, values, mid, rng),
            self.fit_quantile(points, values, high, rng),
        ];
        Ok(QuantileEnsemble { members })
    }
}

impl Surrogate for QuantileEnsemble {
    fn predict(&self, candidates: &[Vec<f64>]) -> (Vec<f64>, Vec<f64>) {
        candidates
            .iter()
            .map(|x| {
                let [low, mid, high] = self.predict_quantiles(x);
                (mid, ((high - low) / 2.0).max(0.0))
            })
            .unzip()
    }
}

/// Linearly interpolated `alpha`-quantile of `values` (non-empty).
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn quantile(values: &[f64], alpha: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let pos = alpha * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
