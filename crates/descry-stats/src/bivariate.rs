//! Correlation and least-squares regression for paired observations.
//!
//! All moments here are population moments (divided by `n`); the factor cancels in
//! both the correlation coefficient and the regression slope.

use serde::Serialize;

use crate::{StatsError, central};

/// A fitted line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearRegression {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearRegression {
    /// Evaluates the fitted line at `x`.
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Population moments of a paired sample.
struct Moments {
    mean_x: f64,
    mean_y: f64,
    cov: f64,
    var_x: f64,
    var_y: f64,
}

#[expect(clippy::cast_precision_loss)]
fn moments(xs: &[f64], ys: &[f64]) -> Result<Moments, StatsError> {
    if xs.len() != ys.len() {
        return Err(StatsError::LengthMismatch {
            left: xs.len(),
            right: ys.len(),
        });
    }
    let mean_x = central::mean(xs)?;
    let mean_y = central::mean(ys)?;
    let n = xs.len() as f64;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    Ok(Moments {
        mean_x,
        mean_y,
        cov: cov / n,
        var_x: var_x / n,
        var_y: var_y / n,
    })
}

/// Computes the population covariance of two equal-length sequences.
///
/// # Errors
///
/// - [`StatsError::LengthMismatch`] if the sequences differ in length
/// - [`StatsError::EmptySample`] if they are empty
pub fn covariance(xs: &[f64], ys: &[f64]) -> Result<f64, StatsError> {
    moments(xs, ys).map(|m| m.cov)
}

/// Computes the Pearson correlation coefficient.
///
/// # Errors
///
/// - [`StatsError::LengthMismatch`] if the sequences differ in length
/// - [`StatsError::EmptySample`] if they are empty
/// - [`StatsError::ZeroVariance`] if either sequence is constant
///
/// # Examples
///
/// ```
/// # use descry_stats::bivariate::pearson_correlation;
/// let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let r = pearson_correlation(&xs, &[10.0, 8.0, 6.0, 4.0, 2.0]).unwrap();
/// assert!((r + 1.0).abs() < 1e-12);
/// ```
pub fn pearson_correlation(xs: &[f64], ys: &[f64]) -> Result<f64, StatsError> {
    let m = moments(xs, ys)?;
    if m.var_x == 0.0 || m.var_y == 0.0 {
        return Err(StatsError::ZeroVariance);
    }
    Ok(m.cov / (m.var_x.sqrt() * m.var_y.sqrt()))
}

/// Fits `ys` against `xs` by ordinary least squares.
///
/// The slope is `cov(x, y) / var(x)` and the intercept `mean(y) - slope * mean(x)`.
///
/// # Errors
///
/// - [`StatsError::LengthMismatch`] if the sequences differ in length
/// - [`StatsError::EmptySample`] if they are empty
/// - [`StatsError::ZeroVariance`] if `xs` is constant
pub fn linear_regression(xs: &[f64], ys: &[f64]) -> Result<LinearRegression, StatsError> {
    let m = moments(xs, ys)?;
    if m.var_x == 0.0 {
        return Err(StatsError::ZeroVariance);
    }
    let slope = m.cov / m.var_x;
    Ok(LinearRegression {
        slope,
        intercept: m.mean_y - slope * m.mean_x,
    })
}
