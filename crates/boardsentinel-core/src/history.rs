//! Fixed-capacity rolling window of readings.

use std::collections::VecDeque;

use crate::telemetry::TelemetryReading;

/// Default number of readings kept by hosts.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Largest window a host may configure.
pub const MAX_HISTORY_CAPACITY: usize = 100_000;

/// Time-ascending ring buffer of readings. Pushing past capacity evicts the
/// oldest reading.
#[derive(Debug, Clone)]
pub struct TelemetryHistory {
    readings: VecDeque<TelemetryReading>,
    capacity: usize,
}

impl Default for TelemetryHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl TelemetryHistory {
    /// Create an empty history. A capacity of zero is raised to one.
    ///
    /// Storage grows as readings arrive; only a small default is reserved.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            readings: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY)),
            capacity,
        }
    }

    /// Append a reading, returning the evicted one if the buffer was full.
    pub fn push(&mut self, reading: TelemetryReading) -> Option<TelemetryReading> {
        let evicted = if self.readings.len() == self.capacity {
            self.readings.pop_front()
        } else {
            None
        };
        self.readings.push_back(reading);
        evicted
    }

    pub fn latest(&self) -> Option<&TelemetryReading> {
        self.readings.back()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.readings.len() == self.capacity
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &TelemetryReading> + ExactSizeIterator {
        self.readings.iter()
    }

    /// Copy of the whole window, oldest first.
    pub fn snapshot(&self) -> Vec<TelemetryReading> {
        self.readings.iter().copied().collect()
    }

    /// Copy of the last `n` readings, oldest first.
    pub fn recent(&self, n: usize) -> Vec<TelemetryReading> {
        let skip = self.readings.len().saturating_sub(n);
        self.readings.iter().skip(skip).copied().collect()
    }
}
