//! The sequential model-based minimization loop and its entry points.
//!
//! A run moves through four phases:
//!
//! 1. **validate**: check `maxiter`, then `n_start`, then the bounds. No
//!    objective call happens before all three pass.
//! 2. **initialize**: evaluate `min(n_start, maxiter)` uniform random points.
//! 3. **refine**: until `maxiter` evaluations exist, fit a fresh surrogate on
//!    every observation, pick the next point with the acquisition optimizer,
//!    evaluate it, and keep the fitted model.
//! 4. **finish**: package the trace into an [`OptimizeResult`].
//!
//! All randomness comes from one `fastrand::Rng` seeded from
//! [`MinimizeOptions::random_state`], consumed in a fixed order: initial
//! points, then per iteration the surrogate fit followed by the candidate
//! pool. The same seed and a deterministic objective reproduce a run bit for
//! bit.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::acquisition::{Acquisition, AcquisitionOptimizer, DEFAULT_N_POINTS};
use crate::error::{Error, Result};
use crate::objective::Objective;
use crate::result::OptimizeResult;
use crate::space::SearchSpace;
use crate::surrogate::{
    DecisionTree, DecisionTreeRegressor, Forest, ForestRegressor, GradientBoostingRegressor,
    QuantileEnsemble, Regressor,
};

const DEFAULT_N_START: usize = 10;
const DEFAULT_MAXITER: usize = 100;

/// Run configuration shared by every entry point.
///
/// # Defaults
///
/// - `n_start`: 10 random evaluations before the first surrogate
/// - `maxiter`: 100 evaluations in total
/// - `n_points`: 1000 candidates scored per model-guided iteration
/// - `acquisition`: expected improvement with `xi = 0.01`
/// - `random_state`: `None` (seeded from entropy)
///
/// # Examples
///
/// ```
/// use tree_smbo::{Acquisition, MinimizeOptions};
///
/// let options = MinimizeOptions::new()
///     .n_start(5)
///     .maxiter(40)
///     .acquisition(Acquisition::lower_confidence_bound())
///     .random_state(42);
/// assert_eq!(options.get_maxiter(), 40);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MinimizeOptions {
    n_start: usize,
    maxiter: usize,
    n_points: usize,
    acquisition: Acquisition,
    random_state: Option<u64>,
}

impl MinimizeOptions {
    /// Options with every field at its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of random evaluations before the first surrogate is fit.
    #[must_use]
    pub fn n_start(mut self, n: usize) -> Self {
        self.n_start = n;
        self
    }

    /// Total number of objective evaluations, random ones included.
    #[must_use]
    pub fn maxiter(mut self, n: usize) -> Self {
        self.maxiter = n;
        self
    }

    /// Number of random candidates scored per model-guided iteration.
    #[must_use]
    pub fn n_points(mut self, n: usize) -> Self {
        self.n_points = n;
        self
    }

    /// Acquisition function used to rank candidates.
    #[must_use]
    pub fn acquisition(mut self, acquisition: Acquisition) -> Self {
        self.acquisition = acquisition;
        self
    }

    /// Seed for the run's random number generator.
    #[must_use]
    pub fn random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Configured number of random starting evaluations.
    #[must_use]
    pub fn get_n_start(&self) -> usize {
        self.n_start
    }

    /// Configured total number of evaluations.
    #[must_use]
    pub fn get_maxiter(&self) -> usize {
        self.maxiter
    }

    /// Configured candidate pool size.
    #[must_use]
    pub fn get_n_points(&self) -> usize {
        self.n_points
    }

    /// Configured acquisition function.
    #[must_use]
    pub fn get_acquisition(&self) -> Acquisition {
        self.acquisition
    }

    /// Configured seed, if any.
    #[must_use]
    pub fn get_random_state(&self) -> Option<u64> {
        self.random_state
    }

    fn rng(&self) -> fastrand::Rng {
        match self.random_state {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        }
    }
}

impl Default for MinimizeOptions {
    fn default() -> Self {
        Self {
            n_start: DEFAULT_N_START,
            maxiter: DEFAULT_MAXITER,
            n_points: DEFAULT_N_POINTS,
            acquisition: Acquisition::default(),
            random_state: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Minimize `objective` with a single regression tree as the surrogate.
///
/// # Errors
///
/// See [`minimize_with`].
///
/// # Examples
///
/// ```
/// use tree_smbo::prelude::*;
///
/// let result = tree_minimize(
///     |x: &[f64]| x[0] * x[0],
///     &[(-2.0, 2.0)],
///     &MinimizeOptions::new().n_start(3).maxiter(7).random_state(1),
/// )
/// .unwrap();
/// assert_eq!(result.models.len(), 4);
/// assert_eq!(result.x_iters.len(), 7);
/// ```
pub fn tree_minimize<O: Objective>(
    objective: O,
    dimensions: &[(f64, f64)],
    options: &MinimizeOptions,
) -> Result<OptimizeResult<DecisionTree>> {
    minimize_with(&DecisionTreeRegressor::new(), objective, dimensions, options)
}

/// Minimize `objective` with a bootstrapped random forest as the surrogate.
///
/// # Errors
///
/// See [`minimize_with`].
pub fn rf_minimize<O: Objective>(
    objective: O,
    dimensions: &[(f64, f64)],
    options: &MinimizeOptions,
) -> Result<OptimizeResult<Forest>> {
    minimize_with(&ForestRegressor::random_forest(), objective, dimensions, options)
}

/// Minimize `objective` with an extremely randomized trees ensemble as the
/// surrogate.
///
/// # Errors
///
/// See [`minimize_with`].
pub fn et_minimize<O: Objective>(
    objective: O,
    dimensions: &[(f64, f64)],
    options: &MinimizeOptions,
) -> Result<OptimizeResult<Forest>> {
    minimize_with(&ForestRegressor::extra_trees(), objective, dimensions, options)
}

/// Minimize `objective` with gradient-boosted quantile trees as the
/// surrogate.
///
/// # Errors
///
/// See [`minimize_with`].
pub fn gbrt_minimize<O: Objective>(
    objective: O,
    dimensions: &[(f64, f64)],
    options: &MinimizeOptions,
) -> Result<OptimizeResult<QuantileEnsemble>> {
    minimize_with(
        &GradientBoostingRegressor::new(),
        objective,
        dimensions,
        options,
    )
}

/// Minimize `objective` over `dimensions` using any [`Regressor`] as the
/// surrogate.
///
/// # Errors
///
/// - [`Error::NoIterations`] if `maxiter` is 0.
/// - [`Error::NoStartingPoints`] if `n_start` is 0.
/// - [`Error::InvalidDimension`] or [`Error::EmptySpace`] for bad bounds.
/// - Any error from [`Regressor::fit`] or
///   [`AcquisitionOptimizer::select`] during the model-guided phase.
///
/// Validation errors are raised before the objective is called.
///
/// # Examples
///
/// ```
/// use tree_smbo::prelude::*;
/// use tree_smbo::surrogate::{ForestKind, ForestRegressor};
///
/// let forest = ForestRegressor::builder(ForestKind::ExtraTrees)
///     .n_trees(20)
///     .build()
///     .unwrap();
///
/// let result = minimize_with(
///     &forest,
///     |x: &[f64]| (x[0] - 1.0).powi(2) + x[1].powi(2),
///     &[(-3.0, 3.0), (-3.0, 3.0)],
///     &MinimizeOptions::new().maxiter(25).random_state(5),
/// )
/// .unwrap();
/// assert_eq!(result.models.len(), 15);
/// ```
#[allow(clippy::needless_pass_by_value)]
pub fn minimize_with<R, O>(
    regressor: &R,
    objective: O,
    dimensions: &[(f64, f64)],
    options: &MinimizeOptions,
) -> Result<OptimizeResult<R::Model>>
where
    R: Regressor + ?Sized,
    O: Objective,
{
    let space = validate(dimensions, options)?;

    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!(
        "minimize",
        n_dims = space.n_dims(),
        n_start = options.n_start,
        maxiter = options.maxiter,
    )
    .entered();

    let mut run = Run::new(regressor, &objective, space, options);
    run.initialize();
    run.refine()?;
    run.finish()
}

/// Checks options in a fixed order and builds the search space.
fn validate(dimensions: &[(f64, f64)], options: &MinimizeOptions) -> Result<SearchSpace> {
    if options.maxiter < 1 {
        return Err(Error::NoIterations);
    }
    if options.n_start < 1 {
        return Err(Error::NoStartingPoints);
    }
    SearchSpace::new(dimensions)
}

// ---------------------------------------------------------------------------
// Run state
// ---------------------------------------------------------------------------

/// State of one minimization run. Observations are only ever appended.
struct Run<'a, R: Regressor + ?Sized, O> {
    regressor: &'a R,
    objective: &'a O,
    space: SearchSpace,
    acquisition: AcquisitionOptimizer,
    maxiter: usize,
    n_start: usize,
    rng: fastrand::Rng,
    x_iters: Vec<Vec<f64>>,
    func_vals: Vec<f64>,
    models: Vec<R::Model>,
    best: f64,
}

impl<'a, R, O> Run<'a, R, O>
where
    R: Regressor + ?Sized,
    O: Objective,
{
    fn new(
        regressor: &'a R,
        objective: &'a O,
        space: SearchSpace,
        options: &MinimizeOptions,
    ) -> Self {
        Self {
            regressor,
            objective,
            space,
            acquisition: AcquisitionOptimizer::new(options.n_points, options.acquisition),
            maxiter: options.maxiter,
            n_start: options.n_start.min(options.maxiter),
            rng: options.rng(),
            x_iters: Vec::with_capacity(options.maxiter),
            func_vals: Vec::with_capacity(options.maxiter),
            models: Vec::with_capacity(options.maxiter - options.n_start.min(options.maxiter)),
            best: f64::INFINITY,
        }
    }

    /// Evaluates the random starting points.
    fn initialize(&mut self) {
        trace_info!(n_start = self.n_start, "evaluating random starting points");
        for _ in 0..self.n_start {
            let x = self.space.sample(&mut self.rng);
            self.observe(x);
        }
    }

    /// Runs the model-guided iterations until `maxiter` evaluations exist.
    fn refine(&mut self) -> Result<()> {
        if self.x_iters.len() < self.maxiter {
            trace_info!(
                n_iterations = self.maxiter - self.x_iters.len(),
                "starting model-guided iterations"
            );
        }

        while self.x_iters.len() < self.maxiter {
            let model = self
                .regressor
                .fit(&self.x_iters, &self.func_vals, &mut self.rng)?;
            trace_debug!(
                iteration = self.x_iters.len(),
                n_observations = self.func_vals.len(),
                "surrogate fitted"
            );

            let x = self
                .acquisition
                .select(&model, &self.space, self.best, &mut self.rng)?;
            self.observe(x);
            self.models.push(model);
        }
        Ok(())
    }

    /// Evaluates `x` and appends the observation.
    fn observe(&mut self, x: Vec<f64>) {
        let value = self.objective.evaluate(&x);
        if value < self.best {
            self.best = value;
            trace_info!(iteration = self.x_iters.len(), value, "new best value found");
        }
        self.x_iters.push(x);
        self.func_vals.push(value);
    }

    fn finish(self) -> Result<OptimizeResult<R::Model>> {
        trace_info!(n_iters = self.func_vals.len(), best = self.best, "minimization finished");
        OptimizeResult::from_trace(self.x_iters, self.func_vals, self.models, self.space)
            .ok_or(Error::NoIterations)
    }
}
