//! Class binning for grouped frequency tables and histograms
//!
//! This module partitions the range `[min, max]` of a sample into a fixed number of
//! contiguous, non-overlapping class intervals and tallies each observation into
//! the first interval that contains it.
//!
//! # Binning Algorithm
//!
//! 1. Compute the class width `ceil((max - min) / num_classes)`, at least 1
//! 2. Lay out `num_classes` intervals starting at `min`, each `width` wide
//! 3. Extend the last interval so that `max` always falls inside it
//! 4. Tally every observation into the first matching interval
//!
//! Two boundary policies are supported (see [`BoundaryPolicy`]). With
//! [`BoundaryPolicy::Closed`] the intervals are integer-aligned and inclusive on
//! both ends, which is the natural choice for whole-number data but leaves gaps
//! between classes for fractional values. Observations falling into such a gap are
//! not tallied; the binning records them and emits a warning instead of failing.
//!
//! # Examples
//!
//! ```
//! use descry_stats::binning::ClassBinning;
//!
//! let yields = [145.0, 152.0, 138.0, 167.0, 155.0, 161.0, 143.0, 158.0, 149.0, 172.0];
//! let binning = ClassBinning::new(&yields, 3).unwrap();
//!
//! assert_eq!(binning.width(), 12.0);
//! assert_eq!(binning.intervals()[0].lower, 138.0);
//! assert_eq!(binning.intervals()[0].upper, 149.0);
//! assert_eq!(binning.total(), yields.len());
//! ```

use std::fmt;

use serde::Serialize;

use crate::StatsError;

/// How class interval boundaries are treated.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BoundaryPolicy {
    /// `[lower, lower + width - 1]`, inclusive on both ends.
    #[default]
    Closed,
    /// `[lower, lower + width)`, with the last interval closed at the maximum.
    HalfOpen,
}

/// A single class interval and the number of observations it holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassInterval {
    /// Inclusive lower bound.
    pub lower: f64,
    /// Upper bound; inclusive when `upper_inclusive` is set.
    pub upper: f64,
    pub upper_inclusive: bool,
    /// Number of observations tallied into this interval.
    pub count: usize,
}

impl ClassInterval {
    /// Returns `true` if `value` lies within this interval's bounds.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower
            && if self.upper_inclusive {
                value <= self.upper
            } else {
                value < self.upper
            }
    }
}

impl fmt::Display for ClassInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let close = if self.upper_inclusive { ']' } else { ')' };
        write!(f, "[{}, {}{close}", self.lower, self.upper)
    }
}

/// A grouped frequency table over contiguous class intervals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassBinning {
    intervals: Vec<ClassInterval>,
    width: f64,
    policy: BoundaryPolicy,
    sample_size: usize,
    untallied: usize,
}

impl ClassBinning {
    /// Bins unsorted values into `num_classes` closed, integer-aligned intervals.
    ///
    /// # Errors
    ///
    /// - [`StatsError::EmptySample`] if `values` is empty
    /// - [`StatsError::InvalidClassCount`] if `num_classes` is 0
    /// - [`StatsError::TooManyClasses`] if `num_classes` exceeds the sample size
    pub fn new(values: &[f64], num_classes: usize) -> Result<Self, StatsError> {
        Self::with_policy(values, num_classes, BoundaryPolicy::Closed)
    }

    /// Bins unsorted values into `num_classes` intervals using the given policy.
    ///
    /// # Errors
    ///
    /// - [`StatsError::EmptySample`] if `values` is empty
    /// - [`StatsError::InvalidClassCount`] if `num_classes` is 0
    /// - [`StatsError::TooManyClasses`] if `num_classes` exceeds the sample size
    ///
    /// # Examples
    ///
    /// ```
    /// use descry_stats::binning::{BoundaryPolicy, ClassBinning};
    ///
    /// let values = [22.5, 23.1, 21.8, 24.0, 25.5, 20.0];
    /// let closed = ClassBinning::new(&values, 3).unwrap();
    /// assert!(!closed.is_consistent()); // fractional values fall between classes
    ///
    /// let half_open = ClassBinning::with_policy(&values, 3, BoundaryPolicy::HalfOpen).unwrap();
    /// assert!(half_open.is_consistent());
    /// ```
    #[expect(clippy::cast_precision_loss)]
    pub fn with_policy(
        values: &[f64],
        num_classes: usize,
        policy: BoundaryPolicy,
    ) -> Result<Self, StatsError> {
        if num_classes == 0 {
            return Err(StatsError::InvalidClassCount);
        }
        let min = values
            .iter()
            .copied()
            .min_by(f64::total_cmp)
            .ok_or(StatsError::EmptySample)?;
        let max = values
            .iter()
            .copied()
            .max_by(f64::total_cmp)
            .ok_or(StatsError::EmptySample)?;
        if num_classes > values.len() {
            return Err(StatsError::TooManyClasses {
                requested: num_classes,
                sample_size: values.len(),
            });
        }

        let width = class_width(max - min, num_classes);
        let mut intervals = (0..num_classes)
            .map(|idx| {
                // Compute each bound from the index to avoid accumulating rounding errors
                let lower = min + idx as f64 * width;
                match policy {
                    BoundaryPolicy::Closed => ClassInterval {
                        lower,
                        upper: lower + width - 1.0,
                        upper_inclusive: true,
                        count: 0,
                    },
                    BoundaryPolicy::HalfOpen => ClassInterval {
                        lower,
                        upper: lower + width,
                        upper_inclusive: false,
                        count: 0,
                    },
                }
            })
            .collect::<Vec<_>>();

        if let Some(last) = intervals.last_mut() {
            match policy {
                BoundaryPolicy::Closed => last.upper = last.upper.max(max),
                BoundaryPolicy::HalfOpen => {
                    // A narrow range can leave the last class entirely above max
                    if max >= last.lower {
                        last.upper = max;
                    }
                    last.upper_inclusive = true;
                }
            }
        }

        let mut untallied = 0;
        for &value in values {
            match intervals.iter_mut().find(|interval| interval.contains(value)) {
                Some(interval) => interval.count += 1,
                None => untallied += 1,
            }
        }

        if untallied > 0 {
            tracing::warn!(
                untallied,
                sample_size = values.len(),
                ?policy,
                "class intervals do not cover every observation"
            );
        }

        Ok(Self {
            intervals,
            width,
            policy,
            sample_size: values.len(),
            untallied,
        })
    }

    /// Returns the class intervals in ascending order.
    #[must_use]
    pub fn intervals(&self) -> &[ClassInterval] {
        &self.intervals
    }

    /// Returns the class width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns the boundary policy the intervals were built with.
    #[must_use]
    pub fn policy(&self) -> BoundaryPolicy {
        self.policy
    }

    /// Returns the number of observations that were binned.
    #[must_use]
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Returns the number of observations tallied across all intervals.
    #[must_use]
    pub fn total(&self) -> usize {
        self.intervals.iter().map(|interval| interval.count).sum()
    }

    /// Returns the number of observations that fell into no interval.
    #[must_use]
    pub fn untallied(&self) -> usize {
        self.untallied
    }

    /// Returns `true` if the tallied total equals the sample size.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.total() == self.sample_size
    }

    /// Returns the per-interval counts, in interval order.
    #[must_use]
    pub fn counts(&self) -> Vec<usize> {
        self.intervals.iter().map(|interval| interval.count).collect()
    }
}

/// Computes the class width `ceil(range / num_classes)`, never less than 1.
#[expect(clippy::cast_precision_loss)]
fn class_width(range: f64, num_classes: usize) -> f64 {
    (range / num_classes as f64).ceil().max(1.0)
}

/// Suggests a number of classes by the square-root rule: `round(sqrt(n))`, at least 1.
///
/// # Examples
///
/// ```
/// # use descry_stats::binning::sqrt_rule_class_count;
/// assert_eq!(sqrt_rule_class_count(25), 5);
/// assert_eq!(sqrt_rule_class_count(30), 5);
/// assert_eq!(sqrt_rule_class_count(0), 1);
/// ```
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
#[must_use]
pub fn sqrt_rule_class_count(n: usize) -> usize {
    ((n as f64).sqrt().round() as usize).max(1)
}
