//! Descriptive statistics for small in-memory samples.
//!
//! This crate provides a collection of stateless statistical tools:
//!
//! - **Central tendency**: mean, median and (multi)mode
//! - **Dispersion**: range, variance, standard deviation, skewness
//! - **Quartiles**: two explicit conventions, IQR and outlier fences
//! - **Frequency tables**: exact value counts for numeric and categorical data
//! - **Class binning**: fixed-count and square-root-rule class intervals
//! - **Bivariate analysis**: covariance, Pearson correlation, least-squares regression
//!   and bucketed contingency tables
//! - **Summary statistics**: every measure above computed once into a value object
//!
//! No function in this crate mutates its input; operations that need ordered data
//! sort a private copy.
//!
//! # Modules
//!
//! - [`central`]: Mean, median and mode
//! - [`dispersion`]: Range, variance, standard deviation and skewness
//! - [`quartiles`]: Quartile conventions, IQR and outlier fences
//! - [`frequency`]: Frequency tables
//! - [`binning`]: Class intervals for histograms and grouped frequency tables
//! - [`bivariate`]: Correlation and linear regression
//! - [`contingency`]: Bucket-by-group contingency tables
//! - [`summary`]: Combined summary statistics
//!
//! # Examples
//!
//! ## Computing summary statistics
//!
//! ```
//! use descry_stats::{quartiles::QuartileMethod, summary::SummaryStatistics};
//!
//! let values = [38.0, 42.0, 35.0, 40.0, 44.0, 37.0, 41.0, 39.0, 45.0, 36.0];
//! let stats = SummaryStatistics::new(&values, QuartileMethod::MedianOfHalves).unwrap();
//! assert_eq!(stats.median, 39.5);
//! assert!(stats.mode.is_empty());
//! ```
//!
//! ## Building a grouped frequency table
//!
//! ```
//! use descry_stats::binning::{ClassBinning, sqrt_rule_class_count};
//!
//! let values = [8.0, 9.0, 12.0, 19.0, 21.0, 25.0, 28.0, 31.0, 35.0];
//! let binning = ClassBinning::new(&values, sqrt_rule_class_count(values.len())).unwrap();
//! assert_eq!(binning.total(), values.len());
//! ```
//!
//! ## Fitting a regression line
//!
//! ```
//! use descry_stats::bivariate::linear_regression;
//!
//! let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let ys = [3.0, 5.0, 7.0, 9.0, 11.0];
//! let fit = linear_regression(&xs, &ys).unwrap();
//! assert!((fit.slope - 2.0).abs() < 1e-12);
//! assert!((fit.intercept - 1.0).abs() < 1e-12);
//! ```

pub use self::error::StatsError;

pub mod binning;
pub mod bivariate;
pub mod central;
pub mod contingency;
pub mod dispersion;
mod error;
pub mod frequency;
pub mod quartiles;
pub mod summary;

/// Returns an ascending copy of `values`, leaving the caller's order untouched.
pub(crate) fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Asserts that `values` is in ascending [`f64::total_cmp`] order, the order
/// [`sorted_copy`] produces. NaN sorts after every number.
pub(crate) fn assert_sorted(values: &[f64]) {
    assert!(
        values.is_sorted_by(|a, b| a.total_cmp(b).is_le()),
        "values must be sorted in ascending order"
    );
}
