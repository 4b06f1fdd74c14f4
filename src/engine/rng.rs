//! Shared randomness source for mutation operators.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Random number generator wrapper for mutation operations.
///
/// One instance per engine; every operator draws from it in sequence, so a
/// full population pass is deterministic under a fixed seed and population
/// order.
pub struct MutationRng {
    rng: StdRng,
}

impl MutationRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with random seed.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Uniform f32 in [0, 1).
    pub fn uniform(&mut self) -> f32 {
        self.rng.r#gen::<f32>()
    }

    /// Standard normal draw (mean 0, std 1).
    pub fn standard_normal(&mut self) -> f32 {
        self.rng.sample(StandardNormal)
    }

    /// Uniform integer in [0, bound). `bound` must be non-zero.
    pub fn below(&mut self, bound: usize) -> usize {
        self.rng.gen_range(0..bound)
    }

    /// `amount` distinct indices drawn uniformly from [0, length).
    pub fn sample_distinct(&mut self, length: usize, amount: usize) -> Vec<usize> {
        rand::seq::index::sample(&mut self.rng, length, amount).into_vec()
    }

    /// Access the underlying generator for `rand` distribution sampling and
    /// network parameter initialization.
    pub fn inner(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}
