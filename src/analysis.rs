use std::collections::{btree_map, BTreeMap};

use tracing::debug;

use crate::{Bucketizer, Error};

/// Number of occurrences assigned to each bucket.
///
/// Only buckets that received at least one occurrence have an entry.
/// Iteration is in bucket order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DistributionTable {
    counts: BTreeMap<u32, u64>,
}

impl DistributionTable {
    fn record(&mut self, bucket: u32) {
        *self.counts.entry(bucket).or_default() += 1;
    }

    /// Occurrences assigned to `bucket`, zero if it received none.
    pub fn get(&self, bucket: u32) -> u64 {
        self.counts.get(&bucket).copied().unwrap_or(0)
    }

    /// Number of non-empty buckets.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// `(bucket, count)` pairs in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u64)> + '_ {
        self.counts.iter().map(|(&bucket, &count)| (bucket, count))
    }
}

impl<'a> IntoIterator for &'a DistributionTable {
    type Item = (&'a u32, &'a u64);
    type IntoIter = btree_map::Iter<'a, u32, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.iter()
    }
}

impl FromIterator<(u32, u64)> for DistributionTable {
    fn from_iter<I: IntoIterator<Item = (u32, u64)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().filter(|&(_, count)| count > 0).collect(),
        }
    }
}

/// Outcome of moving a set of identifiers from one bucket count to another.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MigrationResult {
    old_count: u32,
    new_count: u32,
    old_table: DistributionTable,
    new_table: DistributionTable,
    moves_needed: u64,
    total_occurrences: u64,
}

impl MigrationResult {
    pub fn old_count(&self) -> u32 {
        self.old_count
    }

    pub fn new_count(&self) -> u32 {
        self.new_count
    }

    /// Distribution before the change.
    pub fn old_table(&self) -> &DistributionTable {
        &self.old_table
    }

    /// Distribution after the change.
    pub fn new_table(&self) -> &DistributionTable {
        &self.new_table
    }

    /// Occurrences whose bucket differs between the two bucket counts.
    pub fn moves_needed(&self) -> u64 {
        self.moves_needed
    }

    /// Number of identifiers analyzed, duplicates included. Always positive.
    pub fn total_occurrences(&self) -> u64 {
        self.total_occurrences
    }

    /// Percentage of occurrences that moved.
    pub fn move_ratio(&self) -> f64 {
        self.moves_needed as f64 / self.total_occurrences as f64 * 100.0
    }

    /// Lowest percentage any assignment scheme could achieve for this change,
    /// see [`expected_move_ratio`].
    pub fn expected_move_ratio(&self) -> f64 {
        expected_move_ratio(self.old_count, self.new_count)
    }
}

/// Percentage of keys that must move, at the very least, for a uniform
/// assignment over `old_count` buckets to remain uniform over `new_count`
/// buckets. This is what Jump Consistent Hash achieves in expectation.
pub fn expected_move_ratio(old_count: u32, new_count: u32) -> f64 {
    let largest = old_count.max(new_count);
    if largest == 0 {
        return 0.0;
    }
    f64::from(old_count.abs_diff(new_count)) / f64::from(largest) * 100.0
}

/// Assigns every identifier to a bucket with `old_count` buckets and with
/// `old_count + delta` buckets, and counts how many occurrences changed
/// bucket.
///
/// Each occurrence is compared on its own: an identifier that appears twice
/// and moves counts as two moves.
///
/// Fails without computing anything if `old_count` is zero, if the new count
/// would not be positive (or would overflow `u32`), or if `ids` is empty.
pub fn analyze<S, B>(
    ids: &[S],
    old_count: u32,
    delta: i64,
    assign: &B,
) -> Result<MigrationResult, Error>
where
    S: AsRef<str>,
    B: Bucketizer + ?Sized,
{
    if old_count == 0 {
        return Err(Error::InvalidBucketCount(old_count));
    }
    let new_count = i64::from(old_count)
        .checked_add(delta)
        .and_then(|count| u32::try_from(count).ok())
        .filter(|&count| count > 0)
        .ok_or(Error::InvalidDelta { old_count, delta })?;
    if ids.is_empty() {
        return Err(Error::EmptyInput);
    }

    let mut old_table = DistributionTable::default();
    let mut new_table = DistributionTable::default();
    let mut moves_needed = 0_u64;
    for id in ids {
        let id = id.as_ref();
        let old_bucket = assign.bucket(id, old_count)?;
        old_table.record(old_bucket);
        let new_bucket = assign.bucket(id, new_count)?;
        new_table.record(new_bucket);
        if new_bucket != old_bucket {
            moves_needed += 1;
        }
    }

    debug!(
        old_count,
        new_count,
        occurrences = ids.len(),
        moves_needed,
        "analyzed bucket migration"
    );

    Ok(MigrationResult {
        old_count,
        new_count,
        old_table,
        new_table,
        moves_needed,
        total_occurrences: ids.len() as u64,
    })
}
