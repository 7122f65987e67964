//! Generic frequency counter over hashable keys.
//!
//! Supports point increments (by one or by an arbitrary amount) and
//! count/total queries in O(1) expected time. A key that was never
//! incremented counts as zero rather than being an error.

use std::collections::HashMap;
use std::hash::Hash;

/// A frequency counter mapping each key to its occurrence count.
///
/// Lookup of an absent key yields 0; there is no way to store a negative
/// count. The counter keeps a running total so [`total`](Self::total) is O(1).
#[derive(Debug, Clone)]
pub struct CountMap<K> {
    counts: HashMap<K, u64>,
    total: u64,
}

impl<K: Eq + Hash> CountMap<K> {
    /// Create an empty counter.
    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
            total: 0,
        }
    }

    /// Increment the count of `key` by one.
    pub fn increment(&mut self, key: K) {
        self.increment_by(key, 1);
    }

    /// Increment the count of `key` by `n`.
    pub fn increment_by(&mut self, key: K, n: u64) {
        *self.counts.entry(key).or_insert(0) += n;
        self.total += n;
    }

    /// Count of `key`, or 0 if it was never incremented.
    pub fn count(&self, key: &K) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether the counter has no keys.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate over `(key, count)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> {
        self.counts.iter().map(|(k, &c)| (k, c))
    }

    /// The distinct keys, in unspecified order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.counts.keys()
    }

    /// The key with the highest count, provided its share of the total
    /// strictly exceeds `threshold` (a fraction in `[0, 1]`).
    ///
    /// Returns `None` on an empty counter or when no key clears the
    /// threshold. Among equal counts the winner is unspecified.
    pub fn most_frequent(&self, threshold: f64) -> Option<&K> {
        let (key, max_count) = self.counts.iter().max_by_key(|(_, &c)| c)?;
        if *max_count as f64 / self.total as f64 > threshold {
            Some(key)
        } else {
            None
        }
    }

    /// The `n` highest-count `(key, count)` pairs, sorted by descending
    /// count. Returns fewer than `n` entries if the counter is smaller.
    pub fn top_n(&self, n: usize) -> Vec<(&K, u64)> {
        let mut entries: Vec<(&K, u64)> = self.counts.iter().map(|(k, &c)| (k, c)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(n);
        entries
    }
}

impl<K: Eq + Hash + Clone> CountMap<K> {
    /// Add every count of `other` into this counter.
    pub fn merge(&mut self, other: &CountMap<K>) {
        for (key, count) in other.iter() {
            self.increment_by(key.clone(), count);
        }
    }
}

impl<K: Eq + Hash> Default for CountMap<K> {
    fn default() -> Self {
        Self::new()
    }
}
