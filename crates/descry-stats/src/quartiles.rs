//! Quartiles, interquartile range and outlier fences
//!
//! Two quartile conventions are in common use and they disagree on the same input,
//! so every computation takes an explicit [`QuartileMethod`]:
//!
//! - [`QuartileMethod::MedianOfHalves`] splits the sorted sample at its midpoint
//!   (excluding the central element when `n` is odd) and takes the median of each
//!   half.
//! - [`QuartileMethod::InterpolatedRank`] computes the rank `p * (n + 1)`, clamps it
//!   to `[1, n]` and interpolates linearly between the two bracketing values.
//!
//! # Examples
//!
//! ```
//! use descry_stats::quartiles::{QuartileMethod, Quartiles};
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
//!
//! let halves = Quartiles::new(&values, QuartileMethod::MedianOfHalves).unwrap();
//! assert_eq!((halves.q1, halves.q3), (2.5, 6.5));
//!
//! let ranks = Quartiles::new(&values, QuartileMethod::InterpolatedRank).unwrap();
//! assert_eq!((ranks.q1, ranks.q3), (2.25, 6.75));
//! ```

use serde::Serialize;

use crate::{StatsError, central};

/// Multiplier applied to the IQR to place the outlier fences.
pub const FENCE_FACTOR: f64 = 1.5;

/// Convention used to compute the first and third quartiles.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    derive_more::Display,
    derive_more::FromStr,
)]
pub enum QuartileMethod {
    /// Median of the lower and upper halves of the sorted sample.
    #[default]
    MedianOfHalves,
    /// Linear interpolation at rank `p * (n + 1)`.
    InterpolatedRank,
}

/// First and third quartiles of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quartiles {
    pub q1: f64,
    pub q3: f64,
    pub method: QuartileMethod,
}

/// Outlier thresholds at [`FENCE_FACTOR`] times the IQR beyond Q1 and Q3.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Fences {
    pub low: f64,
    pub high: f64,
}

impl Quartiles {
    /// Computes quartiles from unsorted values.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::EmptySample`] if `values` is empty.
    pub fn new(values: &[f64], method: QuartileMethod) -> Result<Self, StatsError> {
        Self::from_sorted(&crate::sorted_copy(values), method)
    }

    /// Computes quartiles from values sorted in ascending order.
    ///
    /// A single observation is its own first and third quartile under both methods.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::EmptySample`] if `sorted_values` is empty.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    pub fn from_sorted(sorted_values: &[f64], method: QuartileMethod) -> Result<Self, StatsError> {
        crate::assert_sorted(sorted_values);

        let (q1, q3) = match method {
            QuartileMethod::MedianOfHalves => {
                let (lower, upper) = halves(sorted_values)?;
                (
                    central::median_of_sorted(lower).ok_or(StatsError::EmptySample)?,
                    central::median_of_sorted(upper).ok_or(StatsError::EmptySample)?,
                )
            }
            QuartileMethod::InterpolatedRank => (
                rank_interpolated(sorted_values, 0.25).ok_or(StatsError::EmptySample)?,
                rank_interpolated(sorted_values, 0.75).ok_or(StatsError::EmptySample)?,
            ),
        };
        Ok(Self { q1, q3, method })
    }

    /// Returns the interquartile range `Q3 - Q1`.
    #[must_use]
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Returns the outlier fences `Q1 - 1.5 * IQR` and `Q3 + 1.5 * IQR`.
    #[must_use]
    pub fn fences(&self) -> Fences {
        let iqr = self.iqr();
        Fences {
            low: self.q1 - FENCE_FACTOR * iqr,
            high: self.q3 + FENCE_FACTOR * iqr,
        }
    }
}

impl Fences {
    /// Returns `true` if `value` lies outside `[low, high]`.
    #[must_use]
    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.low || value > self.high
    }

    /// Returns the observations flagged as potential outliers, in input order.
    ///
    /// This only classifies; nothing is removed from the sample.
    #[must_use]
    pub fn outliers(&self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .copied()
            .filter(|v| self.is_outlier(*v))
            .collect()
    }
}

/// Splits sorted values into the lower and upper halves used by
/// [`QuartileMethod::MedianOfHalves`].
///
/// For odd `n` the central element belongs to neither half. A single observation
/// is returned as both halves.
///
/// # Errors
///
/// Returns [`StatsError::EmptySample`] if `sorted_values` is empty.
///
/// # Examples
///
/// ```
/// # use descry_stats::quartiles::halves;
/// let (lower, upper) = halves(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
/// assert_eq!(lower, [1.0, 2.0]);
/// assert_eq!(upper, [4.0, 5.0]);
/// ```
pub fn halves(sorted_values: &[f64]) -> Result<(&[f64], &[f64]), StatsError> {
    let n = sorted_values.len();
    match n {
        0 => Err(StatsError::EmptySample),
        1 => Ok((sorted_values, sorted_values)),
        _ => {
            let mid = n / 2;
            let upper_start = if n % 2 == 0 { mid } else { mid + 1 };
            Ok((&sorted_values[..mid], &sorted_values[upper_start..]))
        }
    }
}

/// Computes the `p`-quantile (`0.0..=1.0`) of sorted values by rank interpolation.
///
/// The rank is `p * (n + 1)`, clamped to `[1, n]`; the result interpolates between
/// the values at the floor and ceiling of the rank (1-based). Returns `None` for an
/// empty slice or a `p` that is not finite.
///
/// # Panics
///
/// Panics if `sorted_values` is not sorted in ascending order.
///
/// # Examples
///
/// ```
/// # use descry_stats::quartiles::rank_interpolated;
/// let values = [10.0, 20.0, 30.0, 40.0];
/// assert_eq!(rank_interpolated(&values, 0.5), Some(25.0));
/// assert_eq!(rank_interpolated(&values, 0.0), Some(10.0));
/// assert_eq!(rank_interpolated(&values, 1.0), Some(40.0));
/// ```
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
#[must_use]
pub fn rank_interpolated(sorted_values: &[f64], p: f64) -> Option<f64> {
    crate::assert_sorted(sorted_values);
    if !p.is_finite() {
        return None;
    }

    let first = *sorted_values.first()?;
    let last = *sorted_values.last()?;
    let n = sorted_values.len() as f64;
    let rank = p * (n + 1.0);
    if rank <= 1.0 {
        return Some(first);
    }
    if rank >= n {
        return Some(last);
    }
    let lower = rank.floor() as usize - 1;
    let frac = rank - rank.floor();
    let (a, b) = (sorted_values[lower], sorted_values[lower + 1]);
    Some(a + frac * (b - a))
}
