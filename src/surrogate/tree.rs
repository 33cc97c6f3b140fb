//! CART regression trees and the single-tree surrogate.
//!
//! `RegressionTree` is the building block shared by every surrogate in
//! this crate. Nodes live in an arena (`Vec<Node>`) and refer to their
//! children by index. Splits minimize the sum of squared errors of the two
//! children; leaves keep the mean and the population variance of the
//! targets that reached them.
//!
//! Two split strategies are supported:
//!
//! - `Splitter::Best` scans every midpoint between consecutive distinct
//!   values of each candidate feature.
//! - `Splitter::Random` draws one uniform threshold between the node's
//!   minimum and maximum of each candidate feature (extremely randomized
//!   trees).

use crate::error::{Error, Result};
use crate::rng_util;

use super::{Regressor, Surrogate, check_training_data};

/// How a node chooses its split threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Splitter {
    Best,
    Random,
}

/// Growth limits shared by all tree-based surrogates.
#[derive(Clone, Debug)]
pub(crate) struct TreeParams {
    pub(crate) max_depth: Option<usize>,
    pub(crate) min_samples_split: usize,
    pub(crate) min_samples_leaf: usize,
    pub(crate) max_features: Option<usize>,
    pub(crate) splitter: Splitter,
}

impl TreeParams {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.min_samples_split < 2 {
            return Err(Error::InvalidConfig("min_samples_split must be at least 2"));
        }
        if self.min_samples_leaf == 0 {
            return Err(Error::InvalidConfig("min_samples_leaf must be at least 1"));
        }
        if self.max_features == Some(0) {
            return Err(Error::InvalidConfig("max_features must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
enum Node {
    Leaf {
        value: f64,
        variance: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A regression tree stored as a node arena; node 0 is the root.
#[derive(Clone, Debug)]
pub(crate) struct RegressionTree {
    nodes: Vec<Node>,
}

/// Best split found on one feature.
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    gain: f64,
}

impl RegressionTree {
    /// Grow a tree on the rows of `points` selected by `indices`.
    ///
    /// `indices` may contain duplicates (bootstrap samples) but must not be
    /// empty.
    pub(crate) fn build(
        points: &[Vec<f64>],
        targets: &[f64],
        indices: &[usize],
        params: &TreeParams,
        rng: &mut fastrand::Rng,
    ) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.build_node(points, targets, indices, 0, params, rng);
        tree
    }

    fn push_leaf(&mut self, value: f64, variance: f64) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(Node::Leaf { value, variance });
        idx
    }

    fn build_node(
        &mut self,
        points: &[Vec<f64>],
        targets: &[f64],
        indices: &[usize],
        depth: usize,
        params: &TreeParams,
        rng: &mut fastrand::Rng,
    ) -> usize {
        let n = indices.len();
        let (mean, variance) = mean_variance(targets, indices);

        if n < params.min_samples_split
            || n < 2 * params.min_samples_leaf
            || params.max_depth.is_some_and(|d| depth >= d)
        {
            return self.push_leaf(mean, variance);
        }

        #[allow(clippy::float_cmp)]
        if indices.iter().all(|&i| targets[i] == targets[indices[0]]) {
            return self.push_leaf(mean, variance);
        }

        let Some(split) = find_split(points, targets, indices, mean, params, rng) else {
            return self.push_leaf(mean, variance);
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| points[i][split.feature] <= split.threshold);

        if left_indices.is_empty() || right_indices.is_empty() {
            return self.push_leaf(mean, variance);
        }

        // Reserve the slot so the root stays at index 0.
        let node_idx = self.push_leaf(mean, variance);
        let left = self.build_node(points, targets, &left_indices, depth + 1, params, rng);
        let right = self.build_node(points, targets, &right_indices, depth + 1, params, rng);

        self.nodes[node_idx] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        node_idx
    }

    /// Index of the leaf that `x` falls into.
    pub(crate) fn leaf_index(&self, x: &[f64]) -> usize {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf { .. } => return idx,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x[feature] <= threshold { left } else { right };
                }
            }
        }
    }

    /// Leaf `(mean, variance)` for `x`.
    pub(crate) fn predict(&self, x: &[f64]) -> (f64, f64) {
        match self.nodes[self.leaf_index(x)] {
            Node::Leaf { value, variance } => (value, variance),
            Node::Split { .. } => (f64::NAN, f64::NAN),
        }
    }

    /// Overwrite the value of leaf `idx`. Split nodes are left untouched.
    pub(crate) fn set_leaf_value(&mut self, idx: usize, new_value: f64) {
        if let Node::Leaf { value, .. } = &mut self.nodes[idx] {
            *value = new_value;
        }
    }

    pub(crate) fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    pub(crate) fn depth(&self) -> usize {
        self.depth_at(0)
    }

    fn depth_at(&self, idx: usize) -> usize {
        match self.nodes[idx] {
            Node::Leaf { .. } => 0,
            Node::Split { left, right, .. } => 1 + self.depth_at(left).max(self.depth_at(right)),
        }
    }
}

// ---------------------------------------------------------------------------
// Split search
// ---------------------------------------------------------------------------

#[allow(clippy::cast_precision_loss)]
fn mean_variance(targets: &[f64], indices: &[usize]) -> (f64, f64) {
    let n = indices.len() as f64;
    let mean = indices.iter().map(|&i| targets[i]).sum::<f64>() / n;
    let variance = indices
        .iter()
        .map(|&i| (targets[i] - mean).powi(2))
        .sum::<f64>()
        / n;
    (mean, variance)
}

/// Reduction in squared error from splitting centered sums `left_sum`
/// and `right_sum` out of a node whose centered total is `left_sum + right_sum`.
#[allow(clippy::cast_precision_loss)]
fn sse_gain(left_sum: f64, n_left: usize, right_sum: f64, n_right: usize) -> f64 {
    let total = left_sum + right_sum;
    let n = (n_left + n_right) as f64;
    left_sum * left_sum / n_left as f64 + right_sum * right_sum / n_right as f64
        - total * total / n
}

fn find_split(
    points: &[Vec<f64>],
    targets: &[f64],
    indices: &[usize],
    mean: f64,
    params: &TreeParams,
    rng: &mut fastrand::Rng,
) -> Option<SplitCandidate> {
    let n_features = points[indices[0]].len();
    let features = match params.max_features {
        Some(k) if k < n_features => rng_util::partial_shuffle(n_features, k, rng),
        _ => (0..n_features).collect(),
    };

    let mut best: Option<SplitCandidate> = None;
    for feature in features {
        let found = match params.splitter {
            Splitter::Best => best_threshold(points, targets, indices, feature, mean, params),
            Splitter::Random => {
                random_threshold(points, targets, indices, feature, mean, params, rng)
            }
        };
        if let Some((threshold, gain)) = found
            && gain > 0.0
            && best.as_ref().is_none_or(|b| gain > b.gain)
        {
            best = Some(SplitCandidate {
                feature,
                threshold,
                gain,
            });
        }
    }
    best
}

/// Exhaustive scan over sorted values of `feature`.
fn best_threshold(
    points: &[Vec<f64>],
    targets: &[f64],
    indices: &[usize],
    feature: usize,
    mean: f64,
    params: &TreeParams,
) -> Option<(f64, f64)> {
    let mut order = indices.to_vec();
    order.sort_by(|&a, &b| points[a][feature].total_cmp(&points[b][feature]));

    let n = order.len();
    let total: f64 = order.iter().map(|&i| targets[i] - mean).sum();
    let mut left_sum = 0.0;
    let mut best: Option<(f64, f64)> = None;

    for k in 0..n - 1 {
        left_sum += targets[order[k]] - mean;
        let lo = points[order[k]][feature];
        let hi = points[order[k + 1]][feature];
        if lo >= hi {
            continue;
        }
        let n_left = k + 1;
        let n_right = n - n_left;
        if n_left < params.min_samples_leaf || n_right < params.min_samples_leaf {
            continue;
        }

        let gain = sse_gain(left_sum, n_left, total - left_sum, n_right);
        if best.is_none_or(|(_, g)| gain > g) {
            // The midpoint can round up to `hi` for adjacent floats.
            let mid = f64::midpoint(lo, hi);
            let threshold = if mid < hi { mid } else { lo };
            best = Some((threshold, gain));
        }
    }
    best
}

/// One uniform threshold between the node's extremes of `feature`.
fn random_threshold(
    points: &[Vec<f64>],
    targets: &[f64],
    indices: &[usize],
    feature: usize,
    mean: f64,
    params: &TreeParams,
    rng: &mut fastrand::Rng,
) -> Option<(f64, f64)> {
    let (lo, hi) = indices.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &i| {
        let v = points[i][feature];
        (lo.min(v), hi.max(v))
    });
    if lo >= hi {
        return None;
    }
    let threshold = rng_util::f64_range(rng, lo, hi);

    let (mut left_sum, mut n_left, mut right_sum, mut n_right) = (0.0, 0usize, 0.0, 0usize);
    for &i in indices {
        let centered = targets[i] - mean;
        if points[i][feature] <= threshold {
            left_sum += centered;
            n_left += 1;
        } else {
            right_sum += centered;
            n_right += 1;
        }
    }
    if n_left < params.min_samples_leaf || n_right < params.min_samples_leaf {
        return None;
    }
    Some((threshold, sse_gain(left_sum, n_left, right_sum, n_right)))
}

// ---------------------------------------------------------------------------
// Single-tree surrogate
// ---------------------------------------------------------------------------

/// Default minimum number of samples per leaf for the single-tree surrogate.
const DEFAULT_MIN_SAMPLES_LEAF: usize = 3;

/// A single CART regression tree used as a surrogate.
///
/// The uncertainty of a prediction is the standard deviation of the
/// training targets in the leaf the candidate falls into, so the default
/// keeps at least three samples per leaf.
///
/// # Examples
///
/// ```
/// use tree_smbo::surrogate::{DecisionTreeRegressor, Regressor, Surrogate};
///
/// let points: Vec<Vec<f64>> = (0..20).map(|i| vec![f64::from(i)]).collect();
/// let values: Vec<f64> = points.iter().map(|p| p[0] * p[0]).collect();
///
/// let mut rng = fastrand::Rng::with_seed(0);
/// let model = DecisionTreeRegressor::new().fit(&points, &values, &mut rng).unwrap();
/// let (means, stds) = model.predict(&[vec![3.0], vec![17.0]]);
/// assert!(means[0] < means[1]);
/// assert!(stds.iter().all(|&s| s >= 0.0));
/// ```
#[derive(Clone, Debug)]
pub struct DecisionTreeRegressor {
    params: TreeParams,
    min_variance: f64,
}

impl DecisionTreeRegressor {
    /// Creates a regressor with the default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            params: TreeParams {
                max_depth: None,
                min_samples_split: 2,
                min_samples_leaf: DEFAULT_MIN_SAMPLES_LEAF,
                max_features: None,
                splitter: Splitter::Best,
            },
            min_variance: 0.0,
        }
    }

    /// Creates a builder for configuring a `DecisionTreeRegressor`.
    #[must_use]
    pub fn builder() -> DecisionTreeRegressorBuilder {
        DecisionTreeRegressorBuilder::default()
    }
}

impl Default for DecisionTreeRegressor {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for configuring a [`DecisionTreeRegressor`].
///
/// Defaults:
/// - `max_depth`: unlimited
/// - `min_samples_split`: 2
/// - `min_samples_leaf`: 3
/// - `max_features`: all features
/// - `min_variance`: 0.0
#[derive(Clone, Debug, Default)]
pub struct DecisionTreeRegressorBuilder {
    max_depth: Option<usize>,
    min_samples_split: Option<usize>,
    min_samples_leaf: Option<usize>,
    max_features: Option<usize>,
    min_variance: Option<f64>,
}

impl DecisionTreeRegressorBuilder {
    /// Limits the depth of the tree.
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

    /// Lower bound on the predicted variance.
    #[must_use]
    pub fn min_variance(mut self, v: f64) -> Self {
        self.min_variance = Some(v);
        self
    }

    /// Builds the configured [`DecisionTreeRegressor`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `min_samples_split < 2`,
    /// `min_samples_leaf == 0`, `max_features == 0` or `min_variance` is
    /// negative or non-finite.
    pub fn build(self) -> Result<DecisionTreeRegressor> {
        let defaults = DecisionTreeRegressor::new();
        let params = TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self
                .min_samples_split
                .unwrap_or(defaults.params.min_samples_split),
            min_samples_leaf: self
                .min_samples_leaf
                .unwrap_or(defaults.params.min_samples_leaf),
            max_features: self.max_features,
            splitter: Splitter::Best,
        };
        params.validate()?;
        let min_variance = check_min_variance(self.min_variance.unwrap_or(defaults.min_variance))?;
        Ok(DecisionTreeRegressor {
            params,
            min_variance,
        })
    }
}

pub(crate) fn check_min_variance(v: f64) -> Result<f64> {
    if v.is_finite() && v >= 0.0 {
        Ok(v)
    } else {
        Err(Error::InvalidConfig(
            "min_variance must be finite and non-negative",
        ))
    }
}

/// A fitted [`DecisionTreeRegressor`].
#[derive(Clone, Debug)]
pub struct DecisionTree {
    tree: RegressionTree,
    min_variance: f64,
}

impl DecisionTree {
    /// Number of leaves in the fitted tree.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.tree.n_leaves()
    }

    /// Length of the longest root-to-leaf path.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.tree.depth()
    }
}

impl Regressor for DecisionTreeRegressor {
    type Model = DecisionTree;

    fn fit(
        &self,
        points: &[Vec<f64>],
        values: &[f64],
        rng: &mut fastrand::Rng,
    ) -> Result<DecisionTree> {
        check_training_data(points, values)?;
        let indices: Vec<usize> = (0..points.len()).collect();
        let tree = RegressionTree::build(points, values, &indices, &self.params, rng);
        Ok(DecisionTree {
            tree,
            min_variance: self.min_variance,
        })
    }
}

impl Surrogate for DecisionTree {
    fn predict(&self, candidates: &[Vec<f64>]) -> (Vec<f64>, Vec<f64>) {
        candidates
            .iter()
            .map(|x| {
                let (mean, variance) = self.tree.predict(x);
                (mean, variance.max(self.min_variance).sqrt())
            })
            .unzip()
    }
}
