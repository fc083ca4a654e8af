//! Seeded random source threaded through the generator

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Bernoulli, Distribution, StandardNormal};
use std::fmt;

use crate::simulation::{SimulationError, SimulationResult};

/// Stream of the two kinds of draw the generator needs
///
/// The generator takes this as an explicit `&mut` argument; there is no global
/// random state. Two sources in the same state produce the same sequence.
pub trait DrawSource {
    /// One draw from the standard normal distribution
    fn standard_normal(&mut self) -> f64;

    /// One draw from Bernoulli(`p`); `p` must lie in [0, 1]
    fn bernoulli(&mut self, p: f64) -> SimulationResult<bool>;

    /// Seed that reproduces this source from its start, if there is one
    fn seed(&self) -> Option<u64> {
        None
    }
}

/// [`DrawSource`] backed by [`StdRng`]
pub struct RandomSource {
    rng: StdRng,
    seed: Option<u64>,
}

impl fmt::Debug for RandomSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomSource").field("seed", &self.seed).finish()
    }
}

impl RandomSource {
    /// Create a source with a fixed seed for reproducible results
    pub fn from_seed(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed), seed: Some(seed) }
    }

    /// Create an unseeded source from operating-system entropy
    pub fn from_entropy() -> Self {
        Self { rng: StdRng::from_entropy(), seed: None }
    }

    /// Seeded when `seed` is present, entropy-backed otherwise
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::from_entropy(),
        }
    }

}

impl DrawSource for RandomSource {
    fn standard_normal(&mut self) -> f64 {
        StandardNormal.sample(&mut self.rng)
    }

    fn bernoulli(&mut self, p: f64) -> SimulationResult<bool> {
        let distribution = Bernoulli::new(p)
            .map_err(|e| SimulationError::sampling_error(format!("Bernoulli({}): {}", p, e)))?;
        Ok(distribution.sample(&mut self.rng))
    }

    fn seed(&self) -> Option<u64> {
        self.seed
    }
}
