//! Measures of dispersion and distribution shape.

use serde::Serialize;

use crate::{StatsError, central};

/// Absolute skewness below which a distribution is treated as symmetric.
pub const SYMMETRY_THRESHOLD: f64 = 0.5;

/// Denominator used when computing a variance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
pub enum VarianceKind {
    /// Divide by `n`.
    Population,
    /// Divide by `n - 1` (Bessel's correction).
    Sample,
}

impl VarianceKind {
    /// Smallest sample size for which this kind of variance is defined.
    #[must_use]
    pub fn min_len(self) -> usize {
        match self {
            Self::Population => 1,
            Self::Sample => 2,
        }
    }
}

/// Computes `max - min`.
///
/// # Errors
///
/// Returns [`StatsError::EmptySample`] if `values` is empty.
///
/// # Examples
///
/// ```
/// # use descry_stats::dispersion::range;
/// assert_eq!(range(&[145.0, 172.0, 138.0]).unwrap(), 34.0);
/// ```
pub fn range(values: &[f64]) -> Result<f64, StatsError> {
    let min = values.iter().copied().min_by(f64::total_cmp);
    let max = values.iter().copied().max_by(f64::total_cmp);
    match (min, max) {
        (Some(min), Some(max)) => Ok(max - min),
        _ => Err(StatsError::EmptySample),
    }
}

/// Computes the variance: the sum of squared deviations from the mean divided by
/// `n` ([`VarianceKind::Population`]) or `n - 1` ([`VarianceKind::Sample`]).
///
/// # Errors
///
/// - [`StatsError::EmptySample`] if `values` is empty
/// - [`StatsError::InsufficientData`] for a sample variance of a single value
///
/// # Examples
///
/// ```
/// # use descry_stats::dispersion::{variance, VarianceKind};
/// let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// assert_eq!(variance(&values, VarianceKind::Population).unwrap(), 4.0);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn variance(values: &[f64], kind: VarianceKind) -> Result<f64, StatsError> {
    let mean = central::mean(values)?;
    let n = values.len();
    if n < kind.min_len() {
        return Err(StatsError::InsufficientData {
            required: kind.min_len(),
            actual: n,
        });
    }
    let denominator = match kind {
        VarianceKind::Population => n,
        VarianceKind::Sample => n - 1,
    };
    let sum_sq = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    Ok(sum_sq / denominator as f64)
}

/// Computes the standard deviation, the square root of [`variance`].
///
/// # Errors
///
/// Same as [`variance`].
pub fn std_dev(values: &[f64], kind: VarianceKind) -> Result<f64, StatsError> {
    variance(values, kind).map(f64::sqrt)
}

/// Computes the population skewness, the third standardized moment
/// `(Σ(x - μ)³ / n) / σ³` with the population standard deviation σ.
///
/// A constant sample has no spread to standardize by; its skewness is reported
/// as 0.
///
/// # Errors
///
/// Returns [`StatsError::EmptySample`] if `values` is empty.
///
/// # Examples
///
/// ```
/// # use descry_stats::dispersion::skewness;
/// assert_eq!(skewness(&[1.0, 2.0, 3.0]).unwrap(), 0.0);
/// assert!(skewness(&[1.0, 1.0, 1.0, 10.0]).unwrap() > 0.0);
/// assert_eq!(skewness(&[5.0, 5.0]).unwrap(), 0.0);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn skewness(values: &[f64]) -> Result<f64, StatsError> {
    let mean = central::mean(values)?;
    let n = values.len() as f64;
    let (m2, m3) = values.iter().fold((0.0, 0.0), |(m2, m3), v| {
        let d = v - mean;
        (m2 + d * d, m3 + d * d * d)
    });
    let sigma = (m2 / n).sqrt();
    if sigma == 0.0 {
        return Ok(0.0);
    }
    Ok((m3 / n) / sigma.powi(3))
}

/// Coarse shape of a distribution, judged from its skewness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
pub enum Shape {
    #[display("approximately symmetric")]
    Symmetric,
    #[display("positively skewed (right-skewed)")]
    PositivelySkewed,
    #[display("negatively skewed (left-skewed)")]
    NegativelySkewed,
}

/// The spread measure best suited to a distribution's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
pub enum SpreadMeasure {
    #[display("standard deviation")]
    StdDev,
    #[display("interquartile range")]
    Iqr,
}

impl Shape {
    /// Classifies a skewness value using [`SYMMETRY_THRESHOLD`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use descry_stats::dispersion::Shape;
    /// assert_eq!(Shape::classify(0.1), Shape::Symmetric);
    /// assert_eq!(Shape::classify(0.9), Shape::PositivelySkewed);
    /// assert_eq!(Shape::classify(-0.9), Shape::NegativelySkewed);
    /// ```
    #[must_use]
    pub fn classify(skewness: f64) -> Self {
        if skewness.abs() < SYMMETRY_THRESHOLD {
            Self::Symmetric
        } else if skewness > 0.0 {
            Self::PositivelySkewed
        } else {
            Self::NegativelySkewed
        }
    }

    /// Returns the spread measure to report for this shape.
    ///
    /// The standard deviation is sensitive to long tails, so skewed data is better
    /// summarized by the IQR.
    #[must_use]
    pub fn preferred_spread(self) -> SpreadMeasure {
        match self {
            Self::Symmetric => SpreadMeasure::StdDev,
            Self::PositivelySkewed | Self::NegativelySkewed => SpreadMeasure::Iqr,
        }
    }
}
