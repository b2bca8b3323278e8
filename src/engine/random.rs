//! Injectable randomness.
//!
//! The engine never touches a global RNG: callers hand in a `RandomSource`,
//! so tests can seed or mock every draw.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform integer source.
#[cfg_attr(test, mockall::automock)]
pub trait RandomSource {
    /// Return a uniformly distributed integer in `[0, upper)`.
    /// `upper` is always at least 1.
    fn pick(&mut self, upper: usize) -> usize;
}

/// Adapts any `rand` generator into a `RandomSource`.
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    /// Reproducible source: the same seed yields the same draws.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Source seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn pick(&mut self, upper: usize) -> usize {
        self.rng.random_range(0..upper)
    }
}
