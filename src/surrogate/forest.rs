//! Random forests and extremely randomized trees.
//!
//! Both variants average regression trees, each grown on a bootstrap
//! resample of the observations:
//!
//! - **Random forest**: every tree uses the exhaustive best split and keeps
//!   at least three samples per leaf.
//! - **Extra trees**: every tree draws one random threshold per candidate
//!   feature, grows down to single samples and uses twice as many trees.
//!
//! The predicted variance follows the law of total variance over the
//! members: the average within-leaf variance plus the spread of the member
//! means around the ensemble mean.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::rng_util;

use super::tree::{RegressionTree, Splitter, TreeParams, check_min_variance};
use super::{Regressor, Surrogate, check_training_data};

const RF_N_TREES: usize = 100;
const RF_MIN_SAMPLES_LEAF: usize = 3;
const ET_N_TREES: usize = 200;
const ET_MIN_SAMPLES_LEAF: usize = 1;

/// Which ensemble a [`ForestRegressor`] grows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ForestKind {
    /// Bootstrapped trees with exhaustive best splits.
    RandomForest,
    /// Bootstrapped trees with random thresholds.
    ExtraTrees,
}

impl ForestKind {
    fn splitter(self) -> Splitter {
        match self {
            Self::RandomForest => Splitter::Best,
            Self::ExtraTrees => Splitter::Random,
        }
    }

    fn n_trees(self) -> usize {
        match self {
            Self::RandomForest => RF_N_TREES,
            Self::ExtraTrees => ET_N_TREES,
        }
    }

    fn min_samples_leaf(self) -> usize {
        match self {
            Self::RandomForest => RF_MIN_SAMPLES_LEAF,
            Self::ExtraTrees => ET_MIN_SAMPLES_LEAF,
        }
    }
}

/// A tree ensemble regressor: random forest or extra trees.
///
/// # Examples
///
/// ```
/// use tree_smbo::surrogate::{ForestRegressor, Regressor, Surrogate};
///
/// let points: Vec<Vec<f64>> = (0..30).map(|i| vec![f64::from(i) / 10.0]).collect();
/// let values: Vec<f64> = points.iter().map(|p| (p[0] - 1.5).powi(2)).collect();
///
/// let mut rng = fastrand::Rng::with_seed(1);
/// let forest = ForestRegressor::random_forest()
///     .fit(&points, &values, &mut rng)
///     .unwrap();
///
/// let (means, stds) = forest.predict(&[vec![1.5], vec![0.0]]);
/// assert!(means[0] < means[1]);
/// assert!(stds.iter().all(|&s| s >= 0.0));
/// ```
#[derive(Clone, Debug)]
pub struct ForestRegressor {
    kind: ForestKind,
    n_trees: usize,
    params: TreeParams,
    bootstrap: bool,
    min_variance: f64,
}

impl ForestRegressor {
    /// A random forest with default settings.
    #[must_use]
    pub fn random_forest() -> Self {
        Self::with_defaults(ForestKind::RandomForest)
    }

    /// An extra-trees ensemble with default settings.
    #[must_use]
    pub fn extra_trees() -> Self {
        Self::with_defaults(ForestKind::ExtraTrees)
    }

    /// Creates a builder for a forest of the given kind.
    #[must_use]
    pub fn builder(kind: ForestKind) -> ForestRegressorBuilder {
        ForestRegressorBuilder {
            kind,
            n_trees: None,
            max_depth: None,
            min_samples_split: None,
            min_samples_leaf: None,
            max_features: None,
            bootstrap: None,
            min_variance: None,
        }
    }

    /// The kind of ensemble this regressor grows.
    #[must_use]
    pub fn kind(&self) -> ForestKind {
        self.kind
    }

    fn with_defaults(kind: ForestKind) -> Self {
        Self {
            kind,
            n_trees: kind.n_trees(),
            params: TreeParams {
                max_depth: None,
                min_samples_split: 2,
                min_samples_leaf: kind.min_samples_leaf(),
                max_features: None,
                splitter: kind.splitter(),
            },
            bootstrap: true,
            min_variance: 0.0,
        }
    }
}

/// Builder for configuring a [`ForestRegressor`].
///
/// Defaults:
/// - `n_trees`: 100 for random forests, 200 for extra trees
/// - `max_depth`: unlimited
/// - `min_samples_split`: 2
/// - `min_samples_leaf`: 3 for random forests, 1 for extra trees
/// - `max_features`: all features
/// - `bootstrap`: `true`
/// - `min_variance`: 0.0
///
/// # Examples
///
/// ```
/// use tree_smbo::surrogate::{ForestKind, ForestRegressor};
///
/// let forest = ForestRegressor::builder(ForestKind::ExtraTrees)
///     .n_trees(50)
///     .min_samples_leaf(1)
///     .build()
///     .unwrap();
/// assert_eq!(forest.kind(), ForestKind::ExtraTrees);
/// ```
#[derive(Clone, Debug)]
pub struct ForestRegressorBuilder {
    kind: ForestKind,
    n_trees: Option<usize>,
    max_depth: Option<usize>,
    min_samples_split: Option<usize>,
    min_samples_leaf: Option<usize>,
    max_features: Option<usize>,
    bootstrap: Option<bool>,
    min_variance: Option<f64>,
}

impl ForestRegressorBuilder {
    /// Number of trees in the ensemble.
    #[must_use]
    pub fn n_trees(mut self, n: usize) -> Self {
        self.n_trees = Some(n);
        self
    }

    /// Limits the depth of every tree.
    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Minimum number of samples a node needs before it may split.
    #[must_use]
    pub fn min_samples_split(mut self, n: usize) -> Self {
        self.min_samples_split = Some(n);
        self
    }

    /// Minimum number of samples in each leaf.
    #[must_use]
    pub fn min_samples_leaf(mut self, n: usize) -> Self {
        self.min_samples_leaf = Some(n);
        self
    }

    /// Number of features drawn at random as split candidates per node.
    #[must_use]
    pub fn max_features(mut self, n: usize) -> Self {
        self.max_features = Some(n);
        self
    }

    /// Whether each tree is grown on a bootstrap resample.
    #[must_use]
    pub fn bootstrap(mut self, bootstrap: bool) -> Self {
        self.bootstrap = Some(bootstrap);
        self
    }

    /// Variance added to every member's leaf variance.
    #[must_use]
    pub fn min_variance(mut self, v: f64) -> Self {
        self.min_variance = Some(v);
        self
    }

    /// Builds the configured [`ForestRegressor`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `n_trees == 0` or any tree
    /// setting is invalid.
    pub fn build(self) -> Result<ForestRegressor> {
        let defaults = ForestRegressor::with_defaults(self.kind);
        let n_trees = self.n_trees.unwrap_or(defaults.n_trees);
        if n_trees == 0 {
            return Err(Error::InvalidConfig("n_trees must be at least 1"));
        }
        let params = TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self
                .min_samples_split
                .unwrap_or(defaults.params.min_samples_split),
            min_samples_leaf: self
                .min_samples_leaf
                .unwrap_or(defaults.params.min_samples_leaf),
            max_features: self.max_features,
            splitter: defaults.params.splitter,
        };
        params.validate()?;
        Ok(ForestRegressor {
            kind: self.kind,
            n_trees,
            params,
            bootstrap: self.bootstrap.unwrap_or(defaults.bootstrap),
            min_variance: check_min_variance(self.min_variance.unwrap_or(defaults.min_variance))?,
        })
    }
}

/// A fitted tree ensemble.
#[derive(Clone, Debug)]
pub struct Forest {
    trees: Vec<RegressionTree>,
    min_variance: f64,
}

impl Forest {
    /// Number of member trees.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl Regressor for ForestRegressor {
    type Model = Forest;

    fn fit(
        &self,
        points: &[Vec<f64>],
        values: &[f64],
        rng: &mut fastrand::Rng,
    ) -> Result<Forest> {
        check_training_data(points, values)?;
        let n = points.len();
        let all: Vec<usize> = (0..n).collect();

        let trees = (0..self.n_trees)
            .map(|_| {
                if self.bootstrap {
                    let sample = rng_util::bootstrap(n, rng);
                    RegressionTree::build(points, values, &sample, &self.params, rng)
                } else {
                    RegressionTree::build(points, values, &all, &self.params, rng)
                }
            })
            .collect();

        Ok(Forest {
            trees,
            min_variance: self.min_variance,
        })
    }
}

impl Surrogate for Forest {
    #[allow(clippy::cast_precision_loss)]
    fn predict(&self, candidates: &[Vec<f64>]) -> (Vec<f64>, Vec<f64>) {
        let n_trees = self.trees.len() as f64;
        let mut members = Vec::with_capacity(self.trees.len());

        candidates
            .iter()
            .map(|x| {
                members.clear();
                members.extend(self.trees.iter().map(|t| t.predict(x)));

                let mean = members.iter().map(|&(mu, _)| mu).sum::<f64>() / n_trees;
                let within = members.iter().map(|&(_, var)| var).sum::<f64>() / n_trees;
                let between = members
                    .iter()
                    .map(|&(mu, _)| (mu - mean).powi(2))
                    .sum::<f64>()
                    / n_trees;
                let variance = within + self.min_variance + between;
                (mean, variance.max(0.0).sqrt())
            })
            .unzip()
    }
}
