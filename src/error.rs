/// Errors returned by search space construction, surrogate fitting,
/// acquisition and the minimization driver.
///
/// Every variant is fatal for a run: the driver never returns a partial
/// [`OptimizeResult`](crate::OptimizeResult).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when a dimension is not a finite interval with `low < high`.
    #[error("invalid dimension {index}: low ({low}) must be less than high ({high})")]
    InvalidDimension {
        /// Position of the offending dimension.
        index: usize,
        /// The lower bound value.
        low: f64,
        /// The upper bound value.
        high: f64,
    },

    /// Returned when a search space is built from zero dimensions.
    #[error("search space must have at least one dimension")]
    EmptySpace,

    /// Returned when `maxiter` is zero.
    #[error("expected at least one iteration")]
    NoIterations,

    /// Returned when `n_start` is zero.
    #[error("expected at least one starting point")]
    NoStartingPoints,

    /// Returned when a surrogate is fit on no data, or on points and values
    /// of different lengths.
    #[error("surrogate needs at least one observation (got {points} points and {values} values)")]
    InsufficientData {
        /// Number of covariate rows passed to `fit`.
        points: usize,
        /// Number of target values passed to `fit`.
        values: usize,
    },

    /// Returned when the regression fit itself cannot proceed.
    #[error("surrogate fit failed: {0}")]
    SurrogateFit(String),

    /// Returned when the acquisition step's internal contract is violated.
    #[error("acquisition failed: {0}")]
    Acquisition(&'static str),

    /// Returned when a surrogate builder is given an invalid setting.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

/// A convenience type alias for `Result<T, Error>`.
pub type Result<T> = core::result::Result<T, Error>;
