// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Bounded exponential backoff with jitter.
//!
//! The patch helper uses this to space out attempts when the store rejects a write
//! because another writer updated the object first. The number of attempts is fixed,
//! so the loop always terminates.

use crate::constants::{
    CONDITIONS_PATCH_BACKOFF_MULTIPLIER, CONDITIONS_PATCH_INITIAL_INTERVAL_MILLIS,
    CONDITIONS_PATCH_JITTER, CONDITIONS_PATCH_MAX_INTERVAL_SECS, CONDITIONS_PATCH_STEPS,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Exponential backoff over a fixed number of attempts.
///
/// `next_backoff` yields at most `steps - 1` waits, one between each pair of
/// attempts. Each wait is the current interval plus a random share of up to
/// `jitter` times that interval.
#[derive(Debug, Clone)]
pub struct Backoff {
    /// Maximum number of attempts
    pub steps: u32,
    /// Interval before the second attempt
    pub initial_interval: Duration,
    /// Upper bound of the interval before jitter
    pub max_interval: Duration,
    /// Growth factor between attempts
    pub multiplier: f64,
    /// Jitter factor (1.0 adds up to +100%)
    pub jitter: f64,
    current_interval: Duration,
    remaining: u32,
    rng: StdRng,
}

impl Backoff {
    /// Create a backoff with the given parameters and an entropy-seeded generator.
    #[must_use]
    pub fn new(
        steps: u32,
        initial_interval: Duration,
        max_interval: Duration,
        multiplier: f64,
        jitter: f64,
    ) -> Self {
        Self {
            steps,
            initial_interval,
            max_interval,
            multiplier,
            jitter,
            current_interval: initial_interval,
            remaining: steps,
            rng: StdRng::from_entropy(),
        }
    }

    /// Use a deterministic generator, for reproducible schedules in tests.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// The wait before the next attempt, or `None` once every attempt is used up.
    pub fn next_backoff(&mut self) -> Option<Duration> {
        if self.remaining <= 1 {
            return None;
        }
        self.remaining -= 1;

        let interval = self.current_interval;
        let jittered = self.apply_jitter(interval);

        let next = interval.as_secs_f64() * self.multiplier;
        self.current_interval = Duration::from_secs_f64(next).min(self.max_interval);

        Some(jittered)
    }

    fn apply_jitter(&mut self, interval: Duration) -> Duration {
        if self.jitter <= 0.0 {
            return interval;
        }

        let secs = interval.as_secs_f64();
        let extra = self.rng.gen_range(0.0..=secs * self.jitter);

        Duration::from_secs_f64(secs + extra)
    }
}

/// Backoff used for condition patches.
///
/// # Configuration
///
/// - **Attempts**: 5
/// - **Initial interval**: 100ms
/// - **Max interval**: 10 seconds
/// - **Multiplier**: 2.0
/// - **Jitter**: up to +100%
///
/// Waits are drawn from roughly 100-200ms, 200-400ms, 400-800ms and 0.8-1.6s.
#[must_use]
pub fn conditions_backoff() -> Backoff {
    Backoff::new(
        CONDITIONS_PATCH_STEPS,
        Duration::from_millis(CONDITIONS_PATCH_INITIAL_INTERVAL_MILLIS),
        Duration::from_secs(CONDITIONS_PATCH_MAX_INTERVAL_SECS),
        CONDITIONS_PATCH_BACKOFF_MULTIPLIER,
        CONDITIONS_PATCH_JITTER,
    )
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod retry_tests;
