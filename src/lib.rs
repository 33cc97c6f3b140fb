#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Sequential model-based minimization of expensive black-box functions with
//! tree-based surrogate models.
//!
//! Each run spends a few evaluations on uniform random points, then
//! alternates between fitting a surrogate to every observation so far and
//! evaluating the point the surrogate considers most promising.
//!
//! # Getting Started
//!
//! ```
//! use tree_smbo::prelude::*;
//!
//! let result = gbrt_minimize(
//!     |x: &[f64]| (x[0] - 0.5).powi(2) + (x[1] + 1.0).powi(2),
//!     &[(-2.0, 2.0), (-2.0, 2.0)],
//!     &MinimizeOptions::new().maxiter(30).random_state(1),
//! )
//! .unwrap();
//!
//! println!("x = {:?}, f(x) = {:.4}", result.x, result.fun);
//! assert_eq!(result.func_vals.len(), 30);
//! ```
//!
//! # Surrogates
//!
//! | Entry point | Surrogate | Uncertainty from |
//! |-------------|-----------|------------------|
//! | [`tree_minimize`] | single regression tree | spread of the targets in a leaf |
//! | [`rf_minimize`] | random forest | bootstrapped trees disagreeing |
//! | [`et_minimize`] | extra trees | randomized trees disagreeing |
//! | [`gbrt_minimize`] | gradient-boosted quantile trees | 16%–84% quantile gap |
//!
//! [`minimize_with`] accepts any configured [`Regressor`](surrogate::Regressor),
//! for example a forest with fewer trees or a deeper boosting ensemble.
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `serde` | `Serialize`/`Deserialize` on [`MinimizeOptions`], [`Acquisition`], [`SearchSpace`] and [`Dimension`] | off |
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) at phase transitions and new best values | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

mod acquisition;
pub mod benchmarks;
mod error;
mod minimize;
pub mod objective;
mod result;
mod rng_util;
mod space;
pub mod surrogate;

pub use acquisition::{Acquisition, AcquisitionOptimizer};
pub use error::{Error, Result};
pub use minimize::{
    MinimizeOptions, et_minimize, gbrt_minimize, minimize_with, rf_minimize, tree_minimize,
};
pub use objective::Objective;
pub use result::OptimizeResult;
pub use space::{Dimension, SearchSpace};

/// Convenient wildcard import for the most common types.
///
/// ```
/// use tree_smbo::prelude::*;
/// ```
pub mod prelude {
    pub use crate::acquisition::{Acquisition, AcquisitionOptimizer};
    pub use crate::error::{Error, Result};
    pub use crate::minimize::{
        MinimizeOptions, et_minimize, gbrt_minimize, minimize_with, rf_minimize, tree_minimize,
    };
    pub use crate::objective::Objective;
    pub use crate::result::OptimizeResult;
    pub use crate::space::{Dimension, SearchSpace};
    pub use crate::surrogate::{Regressor, Surrogate};
}
