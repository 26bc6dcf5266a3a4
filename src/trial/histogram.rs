use std::collections::BTreeMap;

use serde::Serialize;

/// Outcome → occurrence count, iterated in ascending outcome order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Histogram {
    counts: BTreeMap<u32, u64>,
}

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: u32) {
        *self.counts.entry(outcome).or_insert(0) += 1;
    }

    pub fn merge(&mut self, other: &Histogram) {
        for (outcome, count) in &other.counts {
            *self.counts.entry(*outcome).or_insert(0) += count;
        }
    }

    pub fn count(&self, outcome: u32) -> u64 {
        self.counts.get(&outcome).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, u64)> + '_ {
        self.counts.iter().map(|(outcome, count)| (*outcome, *count))
    }

    pub fn min(&self) -> Option<u32> {
        self.counts.keys().next().copied()
    }

    pub fn max(&self) -> Option<u32> {
        self.counts.keys().next_back().copied()
    }

    pub fn mean(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let sum: f64 = self
            .counts
            .iter()
            .map(|(outcome, count)| f64::from(*outcome) * *count as f64)
            .sum();
        Some(sum / total as f64)
    }

    /// Each bucket as a percentage of `sample_size` (not of the recorded total).
    pub fn percentages(&self, sample_size: u64) -> Vec<(u32, f64)> {
        self.iter()
            .map(|(outcome, count)| {
                let pct = if sample_size == 0 {
                    0.0
                } else {
                    count as f64 / sample_size as f64 * 100.0
                };
                (outcome, pct)
            })
            .collect()
    }
}

impl FromIterator<u32> for Histogram {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut histogram = Self::new();
        for outcome in iter {
            histogram.record(outcome);
        }
        histogram
    }
}
