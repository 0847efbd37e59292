//! Random number generator abstraction for determinism.
//!
//! Presentation shuffling takes an explicitly passed random source so
//! it can be seeded or scripted in tests. Production code injects
//! [`SystemRng`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Abstraction over random number generation.
pub trait GameRng: Send {
    /// Generate a random `u32` in the range `[min, max]` inclusive.
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32;
}

/// Production RNG that delegates to the thread-local OS-seeded generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRng;

impl GameRng for SystemRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        rand::rng().random_range(min..=max)
    }
}

/// Seeded RNG for reproducible shuffles.
#[derive(Debug, Clone)]
pub struct SeededRng(StdRng);

impl SeededRng {
    /// Create an RNG whose draw sequence is fully determined by `seed`.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl GameRng for SeededRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        self.0.random_range(min..=max)
    }
}
