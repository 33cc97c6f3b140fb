use crate::space::SearchSpace;

/// Everything a minimization run produced.
///
/// `x_iters` and `func_vals` hold every evaluation in the order it happened.
/// `models` holds one fitted surrogate per model-guided iteration, so the
/// first `min(n_start, maxiter)` evaluations have no model.
#[derive(Clone, Debug)]
pub struct OptimizeResult<M> {
    /// Point with the lowest observed value (first one on ties).
    pub x: Vec<f64>,
    /// Objective value recorded for `x`.
    pub fun: f64,
    /// Every evaluated point, in evaluation order.
    pub x_iters: Vec<Vec<f64>>,
    /// Objective value of each point in `x_iters`.
    pub func_vals: Vec<f64>,
    /// Surrogate fitted before each model-guided evaluation.
    pub models: Vec<M>,
    /// Search space the run sampled from.
    pub space: SearchSpace,
}

impl<M> OptimizeResult<M> {
    /// Packages a finished trace. The best observation is the first minimum
    /// of `func_vals` under [`f64::total_cmp`].
    ///
    /// Returns `None` when the trace is empty.
    pub(crate) fn from_trace(
        x_iters: Vec<Vec<f64>>,
        func_vals: Vec<f64>,
        models: Vec<M>,
        space: SearchSpace,
    ) -> Option<Self> {
        let best = argmin(&func_vals)?;
        Some(Self {
            x: x_iters.get(best)?.clone(),
            fun: func_vals[best],
            x_iters,
            func_vals,
            models,
            space,
        })
    }

    /// Number of objective evaluations.
    #[must_use]
    pub fn n_iters(&self) -> usize {
        self.func_vals.len()
    }

    /// Lowest value seen after each evaluation.
    ///
    /// ```
    /// use tree_smbo::prelude::*;
    ///
    /// let result = tree_minimize(
    ///     |x: &[f64]| x[0].abs(),
    ///     &[(-1.0, 1.0)],
    ///     &MinimizeOptions::new().n_start(3).maxiter(6).random_state(7),
    /// )
    /// .unwrap();
    ///
    /// let trace = result.best_so_far();
    /// assert_eq!(trace.len(), 6);
    /// assert!(trace.windows(2).all(|w| w[1] <= w[0]));
    /// assert_eq!(*trace.last().unwrap(), result.fun);
    /// ```
    #[must_use]
    pub fn best_so_far(&self) -> Vec<f64> {
        let mut best = f64::INFINITY;
        self.func_vals
            .iter()
            .map(|&v| {
                if v.total_cmp(&best).is_lt() {
                    best = v;
                }
                best
            })
            .collect()
    }
}

/// Index of the first minimum under a total order on `f64`.
fn argmin(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if best.is_none_or(|(_, b)| v.total_cmp(&b).is_lt()) {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}
