//! Host-driven telemetry feed.
//!
//! The feed pairs a generator with a history buffer. It has no timer of its
//! own: the host calls [`TelemetryFeed::tick`] from whatever scheduler it
//! owns (the TUI event loop, a tokio interval in the server).

use rand::Rng;
use rand::rngs::StdRng;

use crate::history::TelemetryHistory;
use crate::telemetry::{TelemetryGenerator, TelemetryReading};

pub struct TelemetryFeed<R = StdRng> {
    generator: TelemetryGenerator<R>,
    history: TelemetryHistory,
    ticks: u64,
}

impl TelemetryFeed<StdRng> {
    /// Feed with the given history capacity, seeded when `seed` is set.
    pub fn with_capacity(capacity: usize, seed: Option<u64>) -> Self {
        Self::new(TelemetryGenerator::with_seed(seed), TelemetryHistory::new(capacity))
    }
}

impl<R: Rng> TelemetryFeed<R> {
    pub fn new(generator: TelemetryGenerator<R>, history: TelemetryHistory) -> Self {
        Self {
            generator,
            history,
            ticks: 0,
        }
    }

    /// Generate one reading from the latest one and append it.
    pub fn tick(&mut self) -> TelemetryReading {
        let reading = self.generator.next_reading(self.history.latest());
        self.history.push(reading);
        self.ticks += 1;
        reading
    }

    /// Run `n` ticks back to back (used to pre-fill a window).
    pub fn fill(&mut self, n: usize) {
        for _ in 0..n {
            self.tick();
        }
    }

    pub fn history(&self) -> &TelemetryHistory {
        &self.history
    }

    pub fn latest(&self) -> Option<&TelemetryReading> {
        self.history.latest()
    }

    /// Total ticks since creation, including evicted readings.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
