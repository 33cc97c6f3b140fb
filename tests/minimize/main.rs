#![allow(clippy::float_cmp)]

mod bounds;
mod convergence;
mod reproducibility;
mod trace;
mod validation;
mod versus_random;
