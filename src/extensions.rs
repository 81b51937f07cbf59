//! Optional post-update effects.
//!
//! After the core particle pass, the simulation hands every live particle
//! to each installed [`ExtendedEffects`] stage. The core physics never
//! depends on these stages; a simulation without any behaves identically
//! minus the effects.
//!
//! [`QuantumEffects`] is the built-in stage:
//!
//! | Flag | Effect |
//! |------|--------|
//! | `quantum_state` | Position jitter until the wave function collapses |
//! | `light_speed` | Speed capped below `c`, Lorentz factor tracked |
//!
//! Any `FnMut(&mut LiquidParticle, f32) + Send` closure is also a stage:
//!
//! ```ignore
//! sim.with_extension(|p: &mut LiquidParticle, _dt: f32| {
//!     if p.liquid == LiquidType::Dark {
//!         p.glow *= 0.5;
//!     }
//! });
//! ```

use crate::config::PhysicsConfig;
use crate::particle::LiquidParticle;
use crate::spawn::SpawnContext;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Light-speed particles never exceed this fraction of `c`.
const MAX_LIGHT_FRACTION: f32 = 0.999;

/// Extended-effect state carried by every particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExtendedState {
    /// Wave function collapsed; uncertainty jitter stops.
    pub collapsed: bool,
    /// `1/sqrt(1 - v²/c²)` as of the last relativistic update.
    pub lorentz_factor: f32,
}

impl Default for ExtendedState {
    fn default() -> Self {
        Self {
            collapsed: false,
            lorentz_factor: 1.0,
        }
    }
}

/// A post-processing stage run on every live particle after its update.
pub trait ExtendedEffects: Send {
    fn apply_extended_effects(&mut self, particle: &mut LiquidParticle, delta_time: f32);
}

impl<F> ExtendedEffects for F
where
    F: FnMut(&mut LiquidParticle, f32) + Send,
{
    fn apply_extended_effects(&mut self, particle: &mut LiquidParticle, delta_time: f32) {
        self(particle, delta_time)
    }
}

/// Uncertainty jitter, wave-function collapse and relativistic capping.
#[derive(Clone, Debug)]
pub struct QuantumEffects {
    /// Jitter distance per time unit for uncollapsed quantum particles.
    pub uncertainty: f32,
    /// Collapse probability per time unit.
    pub collapse_rate: f32,
    /// Speed of light `c`.
    pub light_speed: f32,
    rng: SmallRng,
}

impl QuantumEffects {
    pub fn new(light_speed: f32, seed: u64) -> Self {
        Self {
            uncertainty: 0.5,
            collapse_rate: 0.2,
            light_speed,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn from_physics(physics: &PhysicsConfig, seed: u64) -> Self {
        Self::new(physics.light_speed, seed)
    }

    pub fn with_uncertainty(mut self, uncertainty: f32) -> Self {
        self.uncertainty = uncertainty;
        self
    }

    pub fn with_collapse_rate(mut self, rate: f32) -> Self {
        self.collapse_rate = rate;
        self
    }

    fn apply_uncertainty(&mut self, particle: &mut LiquidParticle, dt: f32) {
        if particle.extended.collapsed {
            return;
        }
        if self.rng.gen::<f32>() < self.collapse_rate * dt {
            particle.extended.collapsed = true;
            // A collapsed particle settles and glows brighter.
            particle.glow *= 1.5;
            return;
        }
        let jitter = SpawnContext::new(&mut self.rng).random_in_sphere(self.uncertainty * dt);
        particle.position += jitter;
    }

    fn apply_relativity(&self, particle: &mut LiquidParticle) {
        let c = self.light_speed;
        if !(c > 0.0) {
            return;
        }
        let limit = c * MAX_LIGHT_FRACTION;
        let speed = particle.velocity.length();
        if speed > limit {
            particle.velocity *= limit / speed;
        }
        let beta = particle.velocity.length() / c;
        particle.extended.lorentz_factor = 1.0 / (1.0 - beta * beta).max(f32::EPSILON).sqrt();
    }
}

impl ExtendedEffects for QuantumEffects {
    fn apply_extended_effects(&mut self, particle: &mut LiquidParticle, delta_time: f32) {
        if !particle.alive {
            return;
        }
        let flags = particle.liquid.properties().flags;
        if flags.quantum_state {
            self.apply_uncertainty(particle, delta_time);
        }
        if flags.light_speed {
            self.apply_relativity(particle);
        }
    }
}
