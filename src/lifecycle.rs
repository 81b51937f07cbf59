//! Particle lifetime and trail policy.
//!
//! Every spawned particle gets a lifetime drawn from the [`Lifecycle`] and
//! dies on the frame its age exceeds it. Trail length caps how many
//! history samples each particle keeps.
//!
//! ```ignore
//! let lifecycle = Lifecycle::new()
//!     .lifetime_range(8.0..16.0)
//!     .trail_length(12);
//! ```

use crate::config::PoolConfig;
use crate::spawn::SpawnContext;
use std::ops::Range;

/// Lifetime and trail configuration used when spawning.
#[derive(Clone, Debug, PartialEq)]
pub struct Lifecycle {
    lifetime: Range<f32>,
    max_trail_length: u32,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::from_pool(&PoolConfig::default())
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lifecycle matching a pool configuration.
    pub fn from_pool(pool: &PoolConfig) -> Self {
        Self {
            lifetime: pool.lifetime_min..pool.lifetime_max,
            max_trail_length: pool.max_trail_length,
        }
    }

    /// Every particle lives exactly `time` units.
    pub fn lifetime(mut self, time: f32) -> Self {
        self.lifetime = time..time;
        self
    }

    /// Each particle draws its lifetime uniformly from `range`.
    pub fn lifetime_range(mut self, range: Range<f32>) -> Self {
        self.lifetime = range;
        self
    }

    /// Trail samples older than this many frames are dropped. 0 disables trails.
    pub fn trail_length(mut self, frames: u32) -> Self {
        self.max_trail_length = frames;
        self
    }

    pub fn lifetime_bounds(&self) -> Range<f32> {
        self.lifetime.clone()
    }

    pub fn max_trail_length(&self) -> u32 {
        self.max_trail_length
    }

    /// Draw one particle lifetime.
    pub fn sample(&self, ctx: &mut SpawnContext<'_>) -> f32 {
        ctx.random_range(self.lifetime.start, self.lifetime.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_fixed_lifetime() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut ctx = SpawnContext::new(&mut rng);
        let lifecycle = Lifecycle::new().lifetime(3.0);
        for _ in 0..10 {
            assert_eq!(lifecycle.sample(&mut ctx), 3.0);
        }
    }

    #[test]
    fn test_range_lifetime() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut ctx = SpawnContext::new(&mut rng);
        let lifecycle = Lifecycle::new().lifetime_range(2.0..4.0);
        for _ in 0..100 {
            let t = lifecycle.sample(&mut ctx);
            assert!((2.0..4.0).contains(&t));
        }
    }

    #[test]
    fn test_from_pool() {
        let pool = PoolConfig {
            lifetime_min: 1.0,
            lifetime_max: 2.0,
            max_trail_length: 7,
            ..PoolConfig::default()
        };
        let lifecycle = Lifecycle::from_pool(&pool);
        assert_eq!(lifecycle.lifetime_bounds(), 1.0..2.0);
        assert_eq!(lifecycle.max_trail_length(), 7);
    }
}
