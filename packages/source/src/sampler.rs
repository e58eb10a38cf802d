//! Placeholder attribute sampling.
//!
//! Output attributes are demo data drawn uniformly from configured ranges.
//! The sampler is injected so tests (and reproducible runs) can seed it.

use gridmap_entity_models::ValueRange;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Draws placeholder attribute values from inclusive ranges.
pub trait AttributeSampler {
    /// Returns a uniformly distributed value within `range` (inclusive).
    fn sample(&mut self, range: ValueRange) -> u64;
}

/// Sampler backed by any [`Rng`]; the pipeline uses [`StdRng`].
pub struct RngSampler<R> {
    rng: R,
}

impl RngSampler<StdRng> {
    /// Deterministic sampler for a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Sampler seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl<R: Rng> AttributeSampler for RngSampler<R> {
    fn sample(&mut self, range: ValueRange) -> u64 {
        self.rng.gen_range(range.min..=range.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_stay_within_inclusive_bounds() {
        let mut sampler = RngSampler::seeded(7);
        let range = ValueRange::new(50, 500);
        for _ in 0..1000 {
            assert!(range.contains(sampler.sample(range)));
        }
    }

    #[test]
    fn degenerate_range_pins_the_value() {
        let mut sampler = RngSampler::seeded(7);
        let range = ValueRange::new(0, 0);
        assert_eq!(sampler.sample(range), 0);
    }

    #[test]
    fn same_seed_reproduces_the_sequence() {
        let range = ValueRange::new(100, 1000);
        let mut a = RngSampler::seeded(42);
        let mut b = RngSampler::seeded(42);
        let first: Vec<u64> = (0..16).map(|_| a.sample(range)).collect();
        let second: Vec<u64> = (0..16).map(|_| b.sample(range)).collect();
        assert_eq!(first, second);
    }
}
