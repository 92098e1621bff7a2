//! Source of normally distributed jitter.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Standard normal samples (mean 0, standard deviation 1).
pub trait GaussianSource: Send {
    fn sample(&mut self) -> f64;
}

/// Seedable [`GaussianSource`]; the same seed yields the same sequence.
#[derive(Debug, Clone)]
pub struct SeededGaussian {
    rng: StdRng,
}

impl SeededGaussian {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seed from the current time, for runs that do not ask for reproducibility.
    pub fn from_time() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        Self::new(nanos)
    }
}

impl GaussianSource for SeededGaussian {
    fn sample(&mut self) -> f64 {
        self.rng.sample(StandardNormal)
    }
}
