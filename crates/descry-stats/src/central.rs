//! Measures of central tendency.

use crate::{
    StatsError,
    frequency::{FrequencyTable, Mode},
};

/// Computes the arithmetic mean (`sum / n`).
///
/// # Errors
///
/// Returns [`StatsError::EmptySample`] if `values` is empty.
///
/// # Examples
///
/// ```
/// # use descry_stats::central::mean;
/// assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0]).unwrap(), 2.5);
/// assert!(mean(&[]).is_err());
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn mean(values: &[f64]) -> Result<f64, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptySample);
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Computes the median of unsorted values.
///
/// A sorted copy is used; the caller's order is left untouched. For an even number
/// of values the two middle values are averaged.
///
/// # Errors
///
/// Returns [`StatsError::EmptySample`] if `values` is empty.
///
/// # Examples
///
/// ```
/// # use descry_stats::central::median;
/// assert_eq!(median(&[5.0, 1.0, 3.0]).unwrap(), 3.0);
/// assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]).unwrap(), 2.5);
/// ```
pub fn median(values: &[f64]) -> Result<f64, StatsError> {
    median_of_sorted(&crate::sorted_copy(values)).ok_or(StatsError::EmptySample)
}

/// Computes the median of values sorted in ascending order.
///
/// Returns `None` for an empty slice.
///
/// # Panics
///
/// Panics if `sorted_values` is not sorted in ascending order.
#[must_use]
pub fn median_of_sorted(sorted_values: &[f64]) -> Option<f64> {
    crate::assert_sorted(sorted_values);

    let n = sorted_values.len();
    if n == 0 {
        return None;
    }
    let median = if n % 2 == 0 {
        f64::midpoint(sorted_values[n / 2 - 1], sorted_values[n / 2])
    } else {
        sorted_values[n / 2]
    };
    Some(median)
}

/// Computes the mode(s) of the values.
///
/// If no value repeats the result is empty ("no mode"), rather than treating every
/// value as a mode. Ties are all reported, in ascending order.
///
/// # Examples
///
/// ```
/// # use descry_stats::central::mode;
/// let mode = mode(&[64.0, 65.0, 64.0, 67.0, 64.0, 65.0]);
/// assert_eq!(mode.values, [64.0]);
/// assert_eq!(mode.frequency, 3);
///
/// assert!(descry_stats::central::mode(&[1.0, 2.0, 3.0]).is_empty());
/// ```
#[must_use]
pub fn mode(values: &[f64]) -> Mode<f64> {
    FrequencyTable::from_samples(values).mode()
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, seq::SliceRandom};
    use rand_pcg::Pcg64Mcg;

    use super::*;

    const FERTILIZER_GRAMS: [f64; 23] = [
        54.0, 50.0, 52.0, 55.0, 60.0, 61.0, 62.0, 64.0, 64.0, 64.0, 65.0, 65.0, 66.0, 67.0, 67.0,
        68.0, 71.0, 72.0, 73.0, 74.0, 74.0, 75.0, 80.0,
    ];

    #[test]
    fn test_fertilizer_median_and_mode() {
        assert_eq!(median(&FERTILIZER_GRAMS).unwrap(), 65.0);
        let mode = mode(&FERTILIZER_GRAMS);
        assert_eq!(mode.values, [64.0]);
        assert_eq!(mode.frequency, 3);
    }

    #[test]
    fn test_even_median_averages_middle_values() {
        let values = [38.0, 42.0, 35.0, 40.0, 44.0, 37.0, 41.0, 39.0, 45.0, 36.0];
        assert_eq!(median(&values).unwrap(), 39.5);
    }

    #[test]
    fn test_median_does_not_mutate_input() {
        let values = vec![3.0, 1.0, 2.0];
        let _ = median(&values).unwrap();
        assert_eq!(values, [3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_median_is_permutation_invariant() {
        let mut rng = Pcg64Mcg::seed_from_u64(0x5eed);
        let mut values = FERTILIZER_GRAMS.to_vec();
        let expected = median(&values).unwrap();
        for _ in 0..50 {
            values.shuffle(&mut rng);
            assert_eq!(median(&values).unwrap(), expected);
        }
    }

    #[test]
    fn test_deviations_from_mean_sum_to_zero() {
        let values = [22.5, 23.1, 21.8, 24.0, 22.7, 23.5, 24.8, 22.0, 23.9, 25.2];
        let mean = mean(&values).unwrap();
        let sum = values.iter().map(|v| v - mean).sum::<f64>();
        assert!(sum.abs() < 1e-9, "sum of deviations was {sum}");
    }

    #[test]
    fn test_empty_sample() {
        assert_eq!(mean(&[]), Err(StatsError::EmptySample));
        assert_eq!(median(&[]), Err(StatsError::EmptySample));
        assert_eq!(median_of_sorted(&[]), None);
        assert!(mode(&[]).is_empty());
    }

    #[test]
    fn test_mode_is_empty_iff_all_frequencies_are_one() {
        assert!(mode(&[1.0, 2.0, 3.0, 4.0]).is_empty());
        assert!(!mode(&[1.0, 2.0, 2.0, 4.0]).is_empty());
    }

    #[test]
    fn test_multimodal_values_are_sorted_and_unique() {
        let mode = mode(&[74.0, 67.0, 65.0, 67.0, 74.0, 65.0, 80.0]);
        assert_eq!(mode.values, [65.0, 67.0, 74.0]);
        assert_eq!(mode.frequency, 2);
        assert!(mode.values.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_nan_sorts_last_instead_of_panicking() {
        assert_eq!(median(&[1.0, f64::NAN, 3.0]).unwrap(), 3.0);
        assert!(median(&[1.0, f64::NAN]).unwrap().is_nan());
    }

    #[test]
    #[should_panic(expected = "values must be sorted")]
    fn test_median_of_sorted_rejects_unsorted_input() {
        let _ = median_of_sorted(&[3.0, 1.0]);
    }
}
