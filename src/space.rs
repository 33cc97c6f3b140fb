//! Bounded search spaces and uniform sampling.
//!
//! A [`SearchSpace`] is an ordered list of closed real intervals. The order
//! of the dimensions defines the coordinate order of every point handed to
//! the objective and to the surrogate models.
//!
//! ```
//! use tree_smbo::SearchSpace;
//!
//! let space = SearchSpace::new(&[(-5.0, 10.0), (0.0, 15.0)]).unwrap();
//! let mut rng = fastrand::Rng::with_seed(42);
//!
//! let x = space.sample(&mut rng);
//! assert_eq!(x.len(), 2);
//! assert!(space.contains(&x));
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::rng_util;

/// A closed interval `[low, high]` with `low < high`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dimension {
    low: f64,
    high: f64,
}

impl Dimension {
    /// Creates a dimension, checking that both bounds are finite and `low < high`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if the interval is empty, inverted
    /// or has a non-finite bound. A standalone dimension reports index 0;
    /// [`SearchSpace::new`] reports its position in the bounds.
    ///
    /// ```
    /// use tree_smbo::Dimension;
    ///
    /// let dim = Dimension::new(-1.0, 3.0).unwrap();
    /// assert!(dim.contains(3.0));
    /// assert!(Dimension::new(2.0, 2.0).is_err());
    /// ```
    pub fn new(low: f64, high: f64) -> Result<Self> {
        Self::at(0, low, high)
    }

    fn at(index: usize, low: f64, high: f64) -> Result<Self> {
        if !(low.is_finite() && high.is_finite() && low < high) {
            return Err(Error::InvalidDimension { index, low, high });
        }
        Ok(Self { low, high })
    }

    /// Lower bound (inclusive).
    #[must_use]
    pub fn low(&self) -> f64 {
        self.low
    }

    /// Upper bound (inclusive).
    #[must_use]
    pub fn high(&self) -> f64 {
        self.high
    }

    /// Returns `true` if `value` lies inside the interval.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.low..=self.high).contains(&value)
    }

    fn sample(&self, rng: &mut fastrand::Rng) -> f64 {
        rng_util::f64_range(rng, self.low, self.high)
    }
}

/// An ordered sequence of [`Dimension`]s.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchSpace {
    dimensions: Vec<Dimension>,
}

impl SearchSpace {
    /// Builds a search space from `(low, high)` pairs, one per dimension.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySpace`] if `bounds` is empty and
    /// [`Error::InvalidDimension`] for the first pair that is not a valid
    /// interval.
    pub fn new(bounds: &[(f64, f64)]) -> Result<Self> {
        if bounds.is_empty() {
            return Err(Error::EmptySpace);
        }
        let dimensions = bounds
            .iter()
            .enumerate()
            .map(|(index, &(low, high))| Dimension::at(index, low, high))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { dimensions })
    }

    /// The dimensions in coordinate order.
    #[must_use]
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Number of dimensions.
    #[must_use]
    pub fn n_dims(&self) -> usize {
        self.dimensions.len()
    }

    /// Returns `true` if `point` has one coordinate per dimension and every
    /// coordinate is within bounds.
    #[must_use]
    pub fn contains(&self, point: &[f64]) -> bool {
        point.len() == self.dimensions.len()
            && self
                .dimensions
                .iter()
                .zip(point)
                .all(|(dim, &v)| dim.contains(v))
    }

    /// Draws one point, each coordinate uniform in its interval.
    pub fn sample(&self, rng: &mut fastrand::Rng) -> Vec<f64> {
        self.dimensions.iter().map(|dim| dim.sample(rng)).collect()
    }

    /// Draws `n` independent points, one after another.
    pub fn sample_many(&self, rng: &mut fastrand::Rng, n: usize) -> Vec<Vec<f64>> {
        (0..n).map(|_| self.sample(rng)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_bounds() {
        let err = SearchSpace::new(&[(0.0, 1.0), (2.0, -2.0)]).unwrap_err();
        assert!(matches!(err, Error::InvalidDimension { index: 1, .. }));
    }

    #[test]
    fn rejects_degenerate_bounds() {
        assert!(matches!(
            SearchSpace::new(&[(1.0, 1.0)]),
            Err(Error::InvalidDimension { index: 0, .. })
        ));
    }

    #[test]
    fn standalone_dimension_validates_bounds() {
        let dim = Dimension::new(-2.0, 2.0).unwrap();
        assert_eq!((dim.low(), dim.high()), (-2.0, 2.0));
        assert!(matches!(
            Dimension::new(3.0, -3.0),
            Err(Error::InvalidDimension { index: 0, .. })
        ));
    }

    #[test]
    fn space_reports_position_of_bad_dimension() {
        let err = SearchSpace::new(&[(0.0, 1.0), (0.0, 1.0), (5.0, f64::NAN)]).unwrap_err();
        assert!(matches!(err, Error::InvalidDimension { index: 2, .. }));
    }

    #[test]
    fn rejects_non_finite_bounds() {
        assert!(SearchSpace::new(&[(f64::NAN, 1.0)]).is_err());
        assert!(SearchSpace::new(&[(0.0, f64::INFINITY)]).is_err());
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(SearchSpace::new(&[]), Err(Error::EmptySpace)));
    }

    #[test]
    fn samples_within_bounds() {
        let space = SearchSpace::new(&[(-5.0, 10.0), (0.0, 15.0), (0.0, 1e-3)]).unwrap();
        let mut rng = fastrand::Rng::with_seed(0);
        for x in space.sample_many(&mut rng, 500) {
            assert_eq!(x.len(), 3);
            assert!(space.contains(&x), "{x:?} outside space");
        }
    }

    #[test]
    fn sample_many_matches_repeated_sample() {
        let space = SearchSpace::new(&[(0.0, 1.0), (-1.0, 1.0)]).unwrap();
        let mut a = fastrand::Rng::with_seed(11);
        let mut b = fastrand::Rng::with_seed(11);

        let many = space.sample_many(&mut a, 5);
        let one_by_one: Vec<Vec<f64>> = (0..5).map(|_| space.sample(&mut b)).collect();
        assert_eq!(many, one_by_one);
    }

    #[test]
    fn contains_checks_arity() {
        let space = SearchSpace::new(&[(0.0, 1.0), (0.0, 1.0)]).unwrap();
        assert!(space.contains(&[0.0, 1.0]));
        assert!(!space.contains(&[0.5]));
        assert!(!space.contains(&[0.5, 1.5]));
    }
}
