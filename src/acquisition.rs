//! Acquisition functions and random-candidate acquisition optimization.
//!
//! At every model-guided iteration the [`AcquisitionOptimizer`] draws a pool
//! of uniform random candidates from the search space, asks the fitted
//! surrogate for a mean and a standard deviation at each one, and returns
//! the candidate with the highest acquisition score. Scores reward a low
//! predicted mean (the objective is minimized) and a high uncertainty.
//!
//! | Acquisition | Score (maximized) |
//! |-------------|-------------------|
//! | [`ExpectedImprovement`](Acquisition::ExpectedImprovement) | `(y* - xi - mu) Φ(z) + sigma φ(z)`, `z = (y* - xi - mu) / sigma` |
//! | [`LowerConfidenceBound`](Acquisition::LowerConfidenceBound) | `-(mu - kappa * sigma)` |
//!
//! where `y*` is the best value observed so far.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::space::SearchSpace;
use crate::surrogate::Surrogate;

/// Default number of random candidates scored per iteration.
pub(crate) const DEFAULT_N_POINTS: usize = 1000;
/// Default exploration margin for expected improvement.
const DEFAULT_XI: f64 = 0.01;
/// Default exploration weight for the lower confidence bound.
const DEFAULT_KAPPA: f64 = 1.96;

/// Scoring rule applied to each candidate.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Acquisition {
    /// Expected improvement over the best observed value minus `xi`.
    ExpectedImprovement {
        /// Improvement margin; larger values favour exploration.
        xi: f64,
    },
    /// Negated lower confidence bound `mu - kappa * sigma`.
    LowerConfidenceBound {
        /// Weight of the uncertainty term.
        kappa: f64,
    },
}

impl Acquisition {
    /// Expected improvement with the default margin `xi = 0.01`.
    #[must_use]
    pub fn expected_improvement() -> Self {
        Self::ExpectedImprovement { xi: DEFAULT_XI }
    }

    /// Lower confidence bound with the default weight `kappa = 1.96`.
    #[must_use]
    pub fn lower_confidence_bound() -> Self {
        Self::LowerConfidenceBound {
            kappa: DEFAULT_KAPPA,
        }
    }

    /// Score a candidate with predicted `mean` and `std` given the best
    /// value observed so far. Higher is better.
    #[must_use]
    pub fn score(&self, mean: f64, std: f64, y_best: f64) -> f64 {
        match *self {
            Self::ExpectedImprovement { xi } => expected_improvement(mean, std, y_best - xi),
            Self::LowerConfidenceBound { kappa } => -(mean - kappa * std),
        }
    }
}

impl Default for Acquisition {
    fn default() -> Self {
        Self::expected_improvement()
    }
}

// ---------------------------------------------------------------------------
// Normal distribution helpers
// ---------------------------------------------------------------------------

/// Standard normal PDF.
fn norm_pdf(x: f64) -> f64 {
    const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;
    INV_SQRT_2PI * (-0.5 * x * x).exp()
}

/// Standard normal CDF (Hart / Abramowitz-Stegun rational approximation).
fn norm_cdf(x: f64) -> f64 {
    if x < -8.0 {
        return 0.0;
    }
    if x > 8.0 {
        return 1.0;
    }

    let abs_x = x.abs();
    let t = 1.0 / (1.0 + 0.231_641_9 * abs_x);
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;
    let t5 = t4 * t;

    let poly = 0.319_381_530 * t - 0.356_563_782 * t2 + 1.781_477_937 * t3 - 1.821_255_978 * t4
        + 1.330_274_429 * t5;
    let cdf = 1.0 - norm_pdf(abs_x) * poly;

    if x >= 0.0 { cdf } else { 1.0 - cdf }
}

/// `EI(x) = (target - mean) Φ(z) + std φ(z)`, `z = (target - mean) / std`.
fn expected_improvement(mean: f64, std: f64, target: f64) -> f64 {
    let improvement = target - mean;
    if std < 1e-12 {
        return improvement.max(0.0);
    }
    let z = improvement / std;
    (improvement * norm_cdf(z) + std * norm_pdf(z)).max(0.0)
}

// ---------------------------------------------------------------------------
// Candidate selection
// ---------------------------------------------------------------------------

/// Picks the next point to evaluate by scoring a pool of random candidates.
///
/// # Examples
///
/// ```
/// use tree_smbo::surrogate::{DecisionTreeRegressor, Regressor};
/// use tree_smbo::{Acquisition, AcquisitionOptimizer, SearchSpace};
///
/// let space = SearchSpace::new(&[(0.0, 10.0)]).unwrap();
/// let points: Vec<Vec<f64>> = (0..10).map(|i| vec![f64::from(i)]).collect();
/// let values: Vec<f64> = points.iter().map(|p| (p[0] - 7.0).powi(2)).collect();
///
/// let mut rng = fastrand::Rng::with_seed(3);
/// let model = DecisionTreeRegressor::new().fit(&points, &values, &mut rng).unwrap();
///
/// let optimizer = AcquisitionOptimizer::new(500, Acquisition::expected_improvement());
/// let next = optimizer.select(&model, &space, 0.0, &mut rng).unwrap();
/// assert!(space.contains(&next));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AcquisitionOptimizer {
    n_points: usize,
    acquisition: Acquisition,
}

impl AcquisitionOptimizer {
    /// Creates an optimizer scoring `n_points` candidates with `acquisition`.
    #[must_use]
    pub fn new(n_points: usize, acquisition: Acquisition) -> Self {
        Self {
            n_points,
            acquisition,
        }
    }

    /// Number of candidates drawn per call to [`select`](Self::select).
    #[must_use]
    pub fn n_points(&self) -> usize {
        self.n_points
    }

    /// The scoring rule.
    #[must_use]
    pub fn acquisition(&self) -> Acquisition {
        self.acquisition
    }

    /// Draws the candidate pool from `space` and returns its best-scoring
    /// point. Ties go to the candidate drawn first.
    ///
    /// `y_best` is the lowest objective value observed so far. The objective
    /// itself is never called.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Acquisition`] if the pool is empty, if `model`
    /// returns a different number of predictions than candidates, or if
    /// every score is NaN.
    pub fn select<S>(
        &self,
        model: &S,
        space: &SearchSpace,
        y_best: f64,
        rng: &mut fastrand::Rng,
    ) -> Result<Vec<f64>>
    where
        S: Surrogate + ?Sized,
    {
        let mut candidates = space.sample_many(rng, self.n_points);
        if candidates.is_empty() {
            return Err(Error::Acquisition("empty candidate pool"));
        }

        let (means, stds) = model.predict(&candidates);
        if means.len() != candidates.len() || stds.len() != candidates.len() {
            return Err(Error::Acquisition(
                "surrogate returned a different number of predictions than candidates",
            ));
        }

        let mut best: Option<(usize, f64)> = None;
        for (i, (&mean, &std)) in means.iter().zip(&stds).enumerate() {
            let score = self.acquisition.score(mean, std, y_best);
            if score.is_nan() {
                continue;
            }
            if best.is_none_or(|(_, b)| score > b) {
                best = Some((i, score));
            }
        }

        let Some((idx, _)) = best else {
            return Err(Error::Acquisition("no candidate received a score"));
        };
        #[cfg(feature = "tracing")]
        let score = best.map_or(f64::NAN, |(_, score)| score);
        trace_debug!(candidate = idx, score, "selected candidate");

        Ok(candidates.swap_remove(idx))
    }
}

impl Default for AcquisitionOptimizer {
    fn default() -> Self {
        Self::new(DEFAULT_N_POINTS, Acquisition::default())
    }
}
