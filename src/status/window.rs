//! Bounded sliding windows of labelled samples for the trend charts.

use serde::Serialize;
use std::collections::VecDeque;

/// Samples kept per window.
pub const WINDOW_CAPACITY: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sample<T> {
    /// Wall-clock time of the sample, formatted for display.
    pub label: String,
    pub value: T,
}

/// FIFO window: pushing into a full window evicts the oldest sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSeriesWindow<T> {
    samples: VecDeque<Sample<T>>,
    capacity: usize,
}

impl<T> TimeSeriesWindow<T> {
    pub fn new() -> Self {
        Self::with_capacity(WINDOW_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a sample and returns the one evicted to make room, if any.
    pub fn push(&mut self, label: impl Into<String>, value: T) -> Option<Sample<T>> {
        let evicted = if self.samples.len() >= self.capacity {
            self.samples.pop_front()
        } else {
            None
        };
        self.samples.push_back(Sample {
            label: label.into(),
            value,
        });
        evicted
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Sample<T>> {
        self.samples.iter()
    }

    pub fn latest(&self) -> Option<&Sample<T>> {
        self.samples.back()
    }

    pub fn labels(&self) -> Vec<String> {
        self.samples.iter().map(|s| s.label.clone()).collect()
    }
}

impl<T: Clone> TimeSeriesWindow<T> {
    pub fn values(&self) -> Vec<T> {
        self.samples.iter().map(|s| s.value.clone()).collect()
    }
}

impl<T> Default for TimeSeriesWindow<T> {
    fn default() -> Self {
        Self::new()
    }
}
