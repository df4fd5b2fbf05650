//! Seeded randomness shared by the data generators and the weight initializer.

use std::time::{SystemTime, UNIX_EPOCH};

use oorandom::Rand32;

/// Small seeded PRNG. All sampling goes through one of these so runs can be
/// reproduced from a single seed.
#[derive(Debug, Clone)]
pub struct SeededRng {
    inner: Rand32,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Rand32::new(seed),
        }
    }

    /// Seed from the wall clock when no seed was configured.
    pub fn from_entropy() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x5eed);
        Self::new(nanos)
    }

    pub fn seeded_or_entropy(seed: Option<u64>) -> Self {
        seed.map(Self::new).unwrap_or_else(Self::from_entropy)
    }

    /// Uniform index in `0..n`. `n` must be non-zero.
    pub fn index(&mut self, n: usize) -> usize {
        self.inner.rand_range(0..n as u32) as usize
    }

    /// Uniform in `[0, 1)`.
    pub fn uniform(&mut self) -> f32 {
        self.inner.rand_float()
    }

    /// Uniform in `[low, high)`.
    pub fn uniform_range(&mut self, low: f32, high: f32) -> f32 {
        low + (high - low) * self.uniform()
    }

    /// Standard normal sample (Box-Muller).
    pub fn gauss(&mut self, mean: f32, std: f32) -> f32 {
        let u1 = self.uniform().max(1e-30);
        let u2 = self.uniform();
        let mag = (-2.0 * u1.ln()).sqrt();
        mean + std * mag * (2.0 * std::f32::consts::PI * u2).cos()
    }
}
