//! Exponential backoff with jitter
//!
//! The wait before retry `n` (0-based) is `unit * 2^(n + 1)` plus a random
//! jitter drawn uniformly from `[0, unit)` at millisecond granularity. All
//! clones of a [`BackoffCalculator`] share one random source, so concurrent
//! workers spread their retries instead of waking in lockstep.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Default backoff unit
pub const DEFAULT_UNIT: Duration = Duration::from_secs(1);

/// Computes retry delays from an attempt number and a shared RNG
#[derive(Debug, Clone)]
pub struct BackoffCalculator {
    unit: Duration,
    rng: Arc<Mutex<StdRng>>,
}

impl BackoffCalculator {
    /// Creates a calculator seeded from OS entropy
    pub fn new(unit: Duration) -> Self {
        Self::with_rng(unit, Arc::new(Mutex::new(StdRng::from_entropy())))
    }

    /// Creates a calculator drawing jitter from `rng`
    pub fn with_rng(unit: Duration, rng: Arc<Mutex<StdRng>>) -> Self {
        Self { unit, rng }
    }

    /// Creates a deterministic calculator (for tests and reproducible runs)
    pub fn seeded(unit: Duration, seed: u64) -> Self {
        Self::with_rng(unit, Arc::new(Mutex::new(StdRng::seed_from_u64(seed))))
    }

    /// The backoff unit
    pub fn unit(&self) -> Duration {
        self.unit
    }

    /// Exponential part of the delay for `attempt`, without jitter
    pub fn base_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_add(1));
        self.unit.saturating_mul(factor)
    }

    /// Random jitter in `[0, unit)` with millisecond granularity
    pub fn jitter(&self) -> Duration {
        let unit_ms = u64::try_from(self.unit.as_millis()).unwrap_or(u64::MAX);
        if unit_ms == 0 {
            return Duration::ZERO;
        }
        // A poisoned lock still holds a usable RNG
        let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
        Duration::from_millis(rng.gen_range(0..unit_ms))
    }

    /// Full delay before retrying after failed attempt `attempt`
    pub fn delay(&self, attempt: u32) -> Duration {
        self.base_delay(attempt).saturating_add(self.jitter())
    }
}

impl Default for BackoffCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_UNIT)
    }
}
