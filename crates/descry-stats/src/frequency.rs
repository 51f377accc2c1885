//! Exact frequency tables
//!
//! A [`FrequencyTable`] maps every distinct observed value to the number of times it
//! occurs. Keys are unique and kept in ascending order, and the counts always sum to
//! the number of observations the table was built from.
//!
//! # Examples
//!
//! ```
//! use descry_stats::frequency::FrequencyTable;
//!
//! let table = FrequencyTable::new(["high", "low", "high", "medium", "high"]);
//! assert_eq!(table.count(&"high"), 3);
//! assert_eq!(table.counts_for(&["high", "medium", "low", "none"]), [3, 1, 1, 0]);
//!
//! let numeric = FrequencyTable::from_samples(&[40.0, 38.0, 40.0, 35.0]);
//! assert_eq!(numeric.keys().collect::<Vec<_>>(), [&35.0, &38.0, &40.0]);
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

/// A value together with the number of times it was observed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyEntry<K> {
    pub value: K,
    pub count: usize,
}

/// Occurrence counts of distinct values, in ascending key order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyTable<K> {
    entries: Vec<FrequencyEntry<K>>,
    total: usize,
}

/// The most frequent value(s) of a dataset.
///
/// When no value repeats (the highest frequency is 1) there is no mode and
/// `values` is empty. Otherwise `values` holds every value attaining the highest
/// frequency, ascending and without duplicates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mode<K> {
    pub values: Vec<K>,
    /// The highest observed frequency (0 for an empty dataset).
    pub frequency: usize,
}

impl<K> Mode<K> {
    /// Returns `true` if the dataset has no mode.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns `true` if more than one value shares the highest frequency.
    #[must_use]
    pub fn is_multimodal(&self) -> bool {
        self.values.len() > 1
    }
}

impl<K> FrequencyTable<K>
where
    K: Ord + Clone,
{
    /// Counts the occurrences of each distinct value.
    ///
    /// Suitable for integers and categorical labels. Use
    /// [`FrequencyTable::from_samples`] for floating-point observations.
    #[must_use]
    pub fn new<I>(values: I) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        let mut counts = BTreeMap::<K, usize>::new();
        let mut total = 0;
        for value in values {
            *counts.entry(value).or_insert(0) += 1;
            total += 1;
        }
        let entries = counts
            .into_iter()
            .map(|(value, count)| FrequencyEntry { value, count })
            .collect();
        Self { entries, total }
    }
}

impl<K> FrequencyTable<K>
where
    K: PartialEq,
{
    /// Returns the number of times `key` was observed (0 if never).
    #[must_use]
    pub fn count(&self, key: &K) -> usize {
        self.entries
            .iter()
            .find(|entry| entry.value == *key)
            .map_or(0, |entry| entry.count)
    }

    /// Returns the counts of `keys` in the given order, with 0 for unseen keys.
    ///
    /// Categorical reports use this to present categories in a meaningful order
    /// (e.g. high, medium, low) rather than alphabetically.
    #[must_use]
    pub fn counts_for(&self, keys: &[K]) -> Vec<usize> {
        keys.iter().map(|key| self.count(key)).collect()
    }
}

impl FrequencyTable<f64> {
    /// Counts the occurrences of each distinct floating-point value.
    ///
    /// Values are compared with [`f64::total_cmp`], so the table is well defined
    /// even for samples containing NaN.
    #[must_use]
    pub fn from_samples(values: &[f64]) -> Self {
        let sorted = crate::sorted_copy(values);
        let mut entries = Vec::<FrequencyEntry<f64>>::new();
        for value in sorted {
            match entries.last_mut() {
                Some(last) if last.value.total_cmp(&value).is_eq() => last.count += 1,
                _ => entries.push(FrequencyEntry { value, count: 1 }),
            }
        }
        Self {
            entries,
            total: values.len(),
        }
    }
}

impl<K> FrequencyTable<K> {
    /// Returns the entries in ascending key order.
    #[must_use]
    pub fn entries(&self) -> &[FrequencyEntry<K>] {
        &self.entries
    }

    /// Returns an iterator over the distinct values in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.iter().map(|entry| &entry.value)
    }

    /// Returns the number of distinct values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table was built from no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the sum of all counts, which equals the number of observations.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Returns the highest count in the table (0 if empty).
    #[must_use]
    pub fn max_frequency(&self) -> usize {
        self.entries.iter().map(|e| e.count).max().unwrap_or(0)
    }

    /// Returns `count / total` for each entry, in ascending key order.
    #[expect(clippy::cast_precision_loss)]
    pub fn relative_frequencies(&self) -> impl Iterator<Item = (&K, f64)> + '_ {
        let total = self.total as f64;
        self.entries
            .iter()
            .map(move |entry| (&entry.value, entry.count as f64 / total))
    }

    /// Returns the mode(s) of the table.
    ///
    /// A table in which every value occurs exactly once has no mode.
    #[must_use]
    pub fn mode(&self) -> Mode<K>
    where
        K: Clone,
    {
        let frequency = self.max_frequency();
        let values = if frequency <= 1 {
            vec![]
        } else {
            self.entries
                .iter()
                .filter(|entry| entry.count == frequency)
                .map(|entry| entry.value.clone())
                .collect()
        };
        Mode { values, frequency }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_sum_to_total() {
        let values = [3.0, 1.0, 2.0, 3.0, 3.0, 1.0];
        let table = FrequencyTable::from_samples(&values);
        assert_eq!(table.total(), values.len());
        assert_eq!(
            table.entries().iter().map(|e| e.count).sum::<usize>(),
            values.len()
        );
    }

    #[test]
    fn test_keys_are_ascending_and_unique() {
        let values = [145.0, 152.0, 138.0, 152.0, 140.0];
        let table = FrequencyTable::from_samples(&values);
        let keys = table.keys().copied().collect::<Vec<_>>();
        assert_eq!(keys, [138.0, 140.0, 145.0, 152.0]);
        assert_eq!(table.count(&152.0), 2);
    }

    #[test]
    fn test_does_not_mutate_input() {
        let values = vec![5.0, 1.0, 3.0];
        let _ = FrequencyTable::from_samples(&values);
        assert_eq!(values, [5.0, 1.0, 3.0]);
    }

    #[test]
    fn test_categorical_counts_in_caller_order() {
        let table = FrequencyTable::new(["good", "bad", "good", "good"]);
        assert_eq!(table.counts_for(&["good", "bad"]), [3, 1]);
        assert_eq!(table.count(&"unknown"), 0);
    }

    #[test]
    fn test_integer_keys() {
        let table = FrequencyTable::new([3, 1, 2, 1, 4, 2, 1]);
        assert_eq!(table.keys().copied().collect::<Vec<_>>(), [1, 2, 3, 4]);
        assert_eq!(table.counts_for(&[1, 2, 3, 4]), [3, 2, 1, 1]);
    }

    #[test]
    fn test_no_mode_when_all_unique() {
        let table = FrequencyTable::from_samples(&[1.0, 2.0, 3.0]);
        let mode = table.mode();
        assert!(mode.is_empty());
        assert_eq!(mode.frequency, 1);
    }

    #[test]
    fn test_multimodal() {
        let table = FrequencyTable::from_samples(&[4.0, 2.0, 2.0, 4.0, 3.0]);
        let mode = table.mode();
        assert_eq!(mode.values, [2.0, 4.0]);
        assert_eq!(mode.frequency, 2);
        assert!(mode.is_multimodal());
    }

    #[test]
    fn test_empty_table() {
        let table = FrequencyTable::from_samples(&[]);
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
        assert_eq!(table.max_frequency(), 0);
        assert!(table.mode().is_empty());
    }

    #[test]
    fn test_relative_frequencies_sum_to_one() {
        let table = FrequencyTable::new(["a", "b", "b", "c"]);
        let sum = table.relative_frequencies().map(|(_, f)| f).sum::<f64>();
        assert!((sum - 1.0).abs() < 1e-12);
    }
}
