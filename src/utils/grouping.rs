//! Per-key accumulation used by the metric and trend tables
//!
//! Metrics group records by company (or location) in an `FxHashMap` and
//! finish with a deterministic descending sort: ties on the score are broken
//! by the key in ascending order so repeated runs produce identical tables.

use std::cmp::Ordering;

/// Running sum and count for an arithmetic mean
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    pub fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Mean of the pushed values, `None` when nothing was pushed
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

/// Descending by score, then ascending by key
pub fn descending_by_score(a_score: f64, a_key: &str, b_score: f64, b_key: &str) -> Ordering {
    b_score.total_cmp(&a_score).then_with(|| a_key.cmp(b_key))
}
