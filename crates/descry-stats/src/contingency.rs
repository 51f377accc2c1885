//! Bucket-by-group contingency tables
//!
//! [`binned_contingency`] crosses caller-defined numeric buckets with a categorical
//! grouping field, counting how many records fall into each (bucket, group) cell.
//! It generalizes [`crate::binning::ClassBinning`] to labeled records.
//!
//! Buckets are left-open and right-closed, `(lower, upper]`; use infinite bounds for
//! open-ended first and last buckets. A record is counted in the first bucket that
//! contains its value.
//!
//! # Examples
//!
//! ```
//! use descry_stats::contingency::{Bucket, binned_contingency};
//!
//! let records = [(0.5, "good"), (1.5, "bad"), (2.5, "good"), (3.5, "good")];
//! let buckets = [
//!     Bucket::at_most("<=1", 1.0),
//!     Bucket::new("1-3", 1.0, 3.0),
//!     Bucket::above(">3", 3.0),
//! ];
//! let table = binned_contingency(&records, &buckets, |r| r.0, |r| r.1);
//!
//! assert_eq!(table.groups(), ["bad", "good"]);
//! assert_eq!(table.count(1, &"good"), 1);
//! assert_eq!(table.bucket_total(1), 2);
//! ```

use serde::Serialize;

/// A labeled numeric range `(lower, upper]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub label: String,
    pub lower: f64,
    pub upper: f64,
}

impl Bucket {
    /// Creates a bucket covering `(lower, upper]`.
    pub fn new(label: impl Into<String>, lower: f64, upper: f64) -> Self {
        Self {
            label: label.into(),
            lower,
            upper,
        }
    }

    /// Creates a bucket covering every value `<= upper`.
    pub fn at_most(label: impl Into<String>, upper: f64) -> Self {
        Self::new(label, f64::NEG_INFINITY, upper)
    }

    /// Creates a bucket covering every value `> lower`.
    pub fn above(label: impl Into<String>, lower: f64) -> Self {
        Self::new(label, lower, f64::INFINITY)
    }

    /// Returns `true` if `lower < value <= upper`.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value > self.lower && value <= self.upper
    }
}

/// Per-bucket, per-group counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContingencyTable<G> {
    buckets: Vec<Bucket>,
    /// Distinct groups in ascending order.
    groups: Vec<G>,
    /// `counts[bucket][group]`, indexed like `buckets` and `groups`.
    counts: Vec<Vec<usize>>,
    unmatched: usize,
}

impl<G> ContingencyTable<G>
where
    G: Ord,
{
    /// Returns the count in the cell at `bucket_idx` for `group` (0 if the group is unknown).
    ///
    /// # Panics
    ///
    /// Panics if `bucket_idx` is out of range.
    #[must_use]
    pub fn count(&self, bucket_idx: usize, group: &G) -> usize {
        self.groups
            .binary_search(group)
            .map_or(0, |group_idx| self.counts[bucket_idx][group_idx])
    }

    /// Returns the counts of one group across all buckets, in bucket order.
    #[must_use]
    pub fn group_counts(&self, group: &G) -> Vec<usize> {
        (0..self.buckets.len())
            .map(|bucket_idx| self.count(bucket_idx, group))
            .collect()
    }
}

impl<G> ContingencyTable<G> {
    #[must_use]
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    #[must_use]
    pub fn groups(&self) -> &[G] {
        &self.groups
    }

    /// Returns the counts of one bucket, in group order.
    ///
    /// # Panics
    ///
    /// Panics if `bucket_idx` is out of range.
    #[must_use]
    pub fn row(&self, bucket_idx: usize) -> &[usize] {
        &self.counts[bucket_idx]
    }

    /// Returns the number of records in one bucket across all groups.
    #[must_use]
    pub fn bucket_total(&self, bucket_idx: usize) -> usize {
        self.counts[bucket_idx].iter().sum()
    }

    /// Returns the number of records that fell into some bucket.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Returns the number of records whose value matched no bucket.
    #[must_use]
    pub fn unmatched(&self) -> usize {
        self.unmatched
    }
}

/// Partitions `records` into `buckets` crossed with the group returned by `group_of`.
///
/// Records whose value lies in no bucket are counted as unmatched rather than
/// dropped silently.
pub fn binned_contingency<R, G, V, F>(
    records: &[R],
    buckets: &[Bucket],
    value_of: V,
    group_of: F,
) -> ContingencyTable<G>
where
    G: Ord + Clone,
    V: Fn(&R) -> f64,
    F: Fn(&R) -> G,
{
    let mut groups = records.iter().map(&group_of).collect::<Vec<_>>();
    groups.sort();
    groups.dedup();

    let mut counts = vec![vec![0; groups.len()]; buckets.len()];
    let mut unmatched = 0;
    for record in records {
        let value = value_of(record);
        let Some(bucket_idx) = buckets.iter().position(|b| b.contains(value)) else {
            unmatched += 1;
            continue;
        };
        // every record's group was collected above
        if let Ok(group_idx) = groups.binary_search(&group_of(record)) {
            counts[bucket_idx][group_idx] += 1;
        }
    }

    if unmatched > 0 {
        tracing::debug!(unmatched, "records outside every contingency bucket");
    }

    ContingencyTable {
        buckets: buckets.to_vec(),
        groups,
        counts,
        unmatched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Apple {
        sweetness: f64,
        quality: &'static str,
    }

    fn apples() -> Vec<Apple> {
        [
            (0.5, "good"),
            (1.0, "bad"),
            (1.0, "good"),
            (3.0, "good"),
            (3.0, "good"),
            (1.5, "good"),
            (0.5, "bad"),
            (1.0, "good"),
            (3.5, "good"),
            (2.0, "bad"),
            (2.0, "good"),
            (2.0, "good"),
            (1.5, "bad"),
            (4.0, "good"),
            (2.5, "good"),
            (2.0, "good"),
            (1.0, "good"),
            (3.0, "bad"),
            (3.0, "bad"),
            (0.5, "bad"),
        ]
        .into_iter()
        .map(|(sweetness, quality)| Apple { sweetness, quality })
        .collect()
    }

    fn sweetness_buckets() -> Vec<Bucket> {
        vec![
            Bucket::at_most("<=1", 1.0),
            Bucket::new("1-2", 1.0, 2.0),
            Bucket::new("2-3", 2.0, 3.0),
            Bucket::above(">3", 3.0),
        ]
    }

    #[test]
    fn test_sweetness_by_quality() {
        let records = apples();
        let table = binned_contingency(
            &records,
            &sweetness_buckets(),
            |a| a.sweetness,
            |a| a.quality,
        );
        assert_eq!(table.groups(), ["bad", "good"]);
        assert_eq!(table.group_counts(&"good"), [4, 4, 3, 2]);
        assert_eq!(table.group_counts(&"bad"), [3, 2, 2, 0]);
        assert_eq!(table.total(), records.len());
        assert_eq!(table.unmatched(), 0);
    }

    #[test]
    fn test_bucket_edges_are_right_closed() {
        let bucket = Bucket::new("1-2", 1.0, 2.0);
        assert!(!bucket.contains(1.0));
        assert!(bucket.contains(2.0));
        assert!(Bucket::at_most("low", 1.0).contains(f64::MIN));
        assert!(Bucket::above("high", 3.0).contains(1e300));
    }

    #[test]
    fn test_unmatched_records() {
        let records = [(0.0, 'a'), (5.0, 'a'), (10.0, 'b')];
        let buckets = [Bucket::new("0-5", 0.0, 5.0)];
        let table = binned_contingency(&records, &buckets, |r| r.0, |r| r.1);
        assert_eq!(table.total(), 1);
        assert_eq!(table.unmatched(), 2);
        assert_eq!(table.total() + table.unmatched(), records.len());
        assert_eq!(table.row(0), [1, 0]);
    }

    #[test]
    fn test_unknown_group_counts_zero() {
        let records = [(1.0, 1)];
        let table = binned_contingency(&records, &[Bucket::at_most("all", 10.0)], |r| r.0, |r| r.1);
        assert_eq!(table.count(0, &2), 0);
        assert_eq!(table.count(0, &1), 1);
    }
}
