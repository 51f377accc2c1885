//! Combined summary statistics for a single sample.
//!
//! [`SummaryStatistics`] computes every univariate measure in this crate in one pass
//! over a sorted copy of the data, so a report can print them together without
//! recomputing intermediate results.

use serde::Serialize;

use crate::{
    StatsError, central,
    dispersion::{self, Shape, VarianceKind},
    frequency::{FrequencyTable, Mode},
    quartiles::{Fences, QuartileMethod, Quartiles},
};

/// Univariate summary of a sample.
///
/// Sample variance and sample standard deviation are `None` for a single
/// observation, where Bessel's correction is undefined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    /// Number of observations.
    pub count: usize,
    pub min: f64,
    pub max: f64,
    /// `max - min`.
    pub range: f64,
    pub mean: f64,
    pub median: f64,
    /// Most frequent values; empty when no value repeats.
    pub mode: Mode<f64>,
    pub population_variance: f64,
    pub sample_variance: Option<f64>,
    pub population_std_dev: f64,
    pub sample_std_dev: Option<f64>,
    pub quartiles: Quartiles,
    /// `Q3 - Q1`.
    pub iqr: f64,
    pub fences: Fences,
    /// Observations outside the fences, in ascending order.
    pub outliers: Vec<f64>,
    /// Population skewness.
    pub skewness: f64,
    pub shape: Shape,
}

impl SummaryStatistics {
    /// Computes summary statistics from unsorted values.
    ///
    /// The input is not modified; a sorted copy is used internally.
    ///
    /// # Arguments
    ///
    /// * `values` - Observations in any order
    /// * `method` - Quartile convention used for Q1, Q3, the IQR and the fences
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::EmptySample`] if `values` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use descry_stats::{quartiles::QuartileMethod, summary::SummaryStatistics};
    /// let values = [65.0, 64.0, 80.0, 66.0, 62.0, 67.0, 75.0, 54.0, 50.0, 74.0, 68.0, 65.0,
    ///               67.0, 55.0, 73.0, 71.0, 74.0, 61.0, 64.0, 52.0, 64.0, 60.0, 72.0];
    /// let stats = SummaryStatistics::new(&values, QuartileMethod::MedianOfHalves).unwrap();
    /// assert_eq!(stats.median, 65.0);
    /// assert_eq!(stats.mode.values, [64.0]);
    /// assert_eq!(stats.mode.frequency, 3);
    /// assert_eq!(stats.iqr, 11.0);
    /// assert!(stats.outliers.is_empty());
    /// ```
    pub fn new(values: &[f64], method: QuartileMethod) -> Result<Self, StatsError> {
        Self::from_sorted(&crate::sorted_copy(values), method)
    }

    /// Computes summary statistics from values sorted in ascending order.
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

        let min = *sorted_values.first().ok_or(StatsError::EmptySample)?;
        let max = *sorted_values.last().ok_or(StatsError::EmptySample)?;
        let mean = central::mean(sorted_values)?;
        let median = central::median_of_sorted(sorted_values).ok_or(StatsError::EmptySample)?;
        let mode = FrequencyTable::from_samples(sorted_values).mode();

        let population_variance = dispersion::variance(sorted_values, VarianceKind::Population)?;
        let sample_variance = dispersion::variance(sorted_values, VarianceKind::Sample).ok();

        let quartiles = Quartiles::from_sorted(sorted_values, method)?;
        let fences = quartiles.fences();
        let outliers = fences.outliers(sorted_values);

        let skewness = dispersion::skewness(sorted_values)?;

        Ok(Self {
            count: sorted_values.len(),
            min,
            max,
            range: max - min,
            mean,
            median,
            mode,
            population_variance,
            sample_variance,
            population_std_dev: population_variance.sqrt(),
            sample_std_dev: sample_variance.map(f64::sqrt),
            quartiles,
            iqr: quartiles.iqr(),
            fences,
            outliers,
            skewness,
            shape: Shape::classify(skewness),
        })
    }

    /// Returns the fraction of observations within one population standard deviation
    /// of the mean, inclusive.
    ///
    /// Roughly 0.68 for normally distributed data.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn fraction_within_one_std_dev(&self, values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        let low = self.mean - self.population_std_dev;
        let high = self.mean + self.population_std_dev;
        let inside = values.iter().filter(|v| (low..=high).contains(*v)).count();
        inside as f64 / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, seq::SliceRandom};
    use rand_pcg::Pcg64Mcg;

    use super::*;

    const FERTILIZER_GRAMS: [f64; 23] = [
        65.0, 64.0, 80.0, 66.0, 62.0, 67.0, 75.0, 54.0, 50.0, 74.0, 68.0, 65.0, 67.0, 55.0, 73.0,
        71.0, 74.0, 61.0, 64.0, 52.0, 64.0, 60.0, 72.0,
    ];

    const WORK_HOURS: [f64; 30] = [
        38.0, 42.0, 35.0, 40.0, 44.0, 37.0, 41.0, 39.0, 45.0, 36.0, 43.0, 38.0, 40.0, 42.0, 35.0,
        44.0, 39.0, 41.0, 37.0, 43.0, 36.0, 45.0, 38.0, 40.0, 42.0, 39.0, 41.0, 37.0, 44.0, 40.0,
    ];

    #[test]
    fn test_fertilizer_summary() {
        let stats = SummaryStatistics::new(&FERTILIZER_GRAMS, QuartileMethod::MedianOfHalves)
            .unwrap();
        assert_eq!(stats.count, 23);
        assert_eq!((stats.min, stats.max, stats.range), (50.0, 80.0, 30.0));
        assert!((stats.mean - 1503.0 / 23.0).abs() < 1e-12);
        assert_eq!(stats.median, 65.0);
        assert_eq!(stats.mode.values, [64.0]);
        assert_eq!(stats.mode.frequency, 3);
        assert_eq!((stats.quartiles.q1, stats.quartiles.q3), (61.0, 72.0));
        assert_eq!(stats.iqr, 11.0);
        assert_eq!((stats.fences.low, stats.fences.high), (44.5, 88.5));
        assert!(stats.outliers.is_empty());
    }

    #[test]
    fn test_work_hours_summary() {
        let stats = SummaryStatistics::new(&WORK_HOURS, QuartileMethod::MedianOfHalves).unwrap();
        assert!((stats.mean - 1201.0 / 30.0).abs() < 1e-12);
        assert_eq!(stats.median, 40.0);
        assert_eq!(stats.mode.values, [40.0]);
        assert_eq!(stats.mode.frequency, 4);
        assert_eq!(stats.shape, Shape::Symmetric);

        let sample = stats.sample_variance.unwrap();
        assert!(sample > stats.population_variance);
        assert!((stats.population_std_dev.powi(2) - stats.population_variance).abs() < 1e-9);
    }

    #[test]
    fn test_even_sample_without_mode() {
        let values = [38.0, 42.0, 35.0, 40.0, 44.0, 37.0, 41.0, 39.0, 45.0, 36.0];
        let stats = SummaryStatistics::new(&values, QuartileMethod::MedianOfHalves).unwrap();
        assert_eq!(stats.median, 39.5);
        assert!(stats.mode.is_empty());
    }

    #[test]
    fn test_outliers_are_sorted_and_retained() {
        let values = [100.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, -60.0];
        let stats = SummaryStatistics::new(&values, QuartileMethod::MedianOfHalves).unwrap();
        assert_eq!(stats.outliers, [-60.0, 100.0]);
        assert_eq!(stats.count, values.len());
    }

    #[test]
    fn test_single_observation() {
        let stats = SummaryStatistics::new(&[7.0], QuartileMethod::InterpolatedRank).unwrap();
        assert_eq!(stats.median, 7.0);
        assert_eq!(stats.population_variance, 0.0);
        assert_eq!(stats.sample_variance, None);
        assert_eq!(stats.sample_std_dev, None);
        assert_eq!(stats.skewness, 0.0);
        assert_eq!(stats.iqr, 0.0);
    }

    #[test]
    fn test_empty_sample() {
        assert_eq!(
            SummaryStatistics::new(&[], QuartileMethod::MedianOfHalves),
            Err(StatsError::EmptySample)
        );
    }

    #[test]
    fn test_order_does_not_matter() {
        let expected =
            SummaryStatistics::new(&FERTILIZER_GRAMS, QuartileMethod::InterpolatedRank).unwrap();
        let mut rng = Pcg64Mcg::seed_from_u64(42);
        for _ in 0..10 {
            let mut shuffled = FERTILIZER_GRAMS;
            shuffled.shuffle(&mut rng);
            let stats =
                SummaryStatistics::new(&shuffled, QuartileMethod::InterpolatedRank).unwrap();
            assert_eq!(stats.median, expected.median);
            assert_eq!(stats.quartiles, expected.quartiles);
            assert_eq!(stats.mode, expected.mode);
            assert!((stats.mean - expected.mean).abs() < 1e-12);
        }
    }

    #[test]
    fn test_fraction_within_one_std_dev() {
        let stats = SummaryStatistics::new(&WORK_HOURS, QuartileMethod::MedianOfHalves).unwrap();
        let fraction = stats.fraction_within_one_std_dev(&WORK_HOURS);
        assert!((0.5..=0.9).contains(&fraction));
        assert_eq!(stats.fraction_within_one_std_dev(&[]), 0.0);
    }

    #[test]
    fn test_serializes_for_reports() {
        let stats = SummaryStatistics::new(&[1.0, 2.0, 2.0, 3.0], QuartileMethod::MedianOfHalves)
            .unwrap();
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["median"], 2.0);
        assert_eq!(json["mode"]["values"][0], 2.0);
        assert_eq!(json["quartiles"]["method"], "MedianOfHalves");
        assert_eq!(json["sample_variance"], 2.0 / 3.0);
    }

    #[test]
    fn test_nan_propagates_without_panicking() {
        let stats =
            SummaryStatistics::new(&[2.0, f64::NAN], QuartileMethod::MedianOfHalves).unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.min, 2.0);
        assert!(stats.max.is_nan());
        assert!(stats.mean.is_nan());
        assert!(stats.outliers.is_empty());
    }

    #[test]
    #[should_panic(expected = "values must be sorted in ascending order")]
    fn test_from_sorted_rejects_unsorted() {
        let _ = SummaryStatistics::from_sorted(&[3.0, 1.0, 2.0], QuartileMethod::MedianOfHalves);
    }
}
