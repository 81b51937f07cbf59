//! Emitters launching liquid into the pool.
//!
//! Each frame, every emitter turns `rate · delta_time` into spawn requests.
//! The fractional remainder carries over, so a rate of 30 at 60 frames per
//! second emits one particle every other frame.
//!
//! # Emitter Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Emitter::Point`] | Single point, random directions |
//! | [`Emitter::Burst`] | One-time release of `count` particles |
//! | [`Emitter::Cone`] | Directional cone emission |
//! | [`Emitter::Sphere`] | Spawn on a sphere surface, moving outward |
//! | [`Emitter::Stream`] | Fixed launch velocity, a colored stream |
//!
//! Emitters are plain data and serialize into scenario files:
//!
//! ```json
//! { "type": "stream", "position": [-30, 0, 0], "velocity": [0, 2, 0],
//!   "rate": 40, "liquid": "photonic" }
//! ```

use crate::liquid::LiquidType;
use crate::spawn::{SpawnContext, SpawnRequest};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Particle emitter configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Emitter {
    /// Emit from a single point in random directions.
    Point {
        position: Vec3,
        /// Particles per time unit.
        rate: f32,
        speed: f32,
        #[serde(default)]
        liquid: LiquidType,
    },

    /// Release `count` particles on the first frame, then stop.
    Burst {
        position: Vec3,
        count: u32,
        /// Outward speed.
        speed: f32,
        #[serde(default)]
        liquid: LiquidType,
    },

    /// Directional cone, for jets and fountains.
    Cone {
        position: Vec3,
        direction: Vec3,
        speed: f32,
        /// Cone half-angle in radians.
        spread: f32,
        rate: f32,
        #[serde(default)]
        liquid: LiquidType,
    },

    /// Spawn on a sphere surface, moving outward (inward if speed < 0).
    Sphere {
        center: Vec3,
        radius: f32,
        speed: f32,
        rate: f32,
        #[serde(default)]
        liquid: LiquidType,
    },

    /// Launch every particle with the same velocity.
    Stream {
        position: Vec3,
        velocity: Vec3,
        rate: f32,
        #[serde(default)]
        liquid: LiquidType,
    },
}

impl Emitter {
    /// Particles per time unit. Bursts report 0.
    pub fn rate(&self) -> f32 {
        match self {
            Emitter::Point { rate, .. }
            | Emitter::Cone { rate, .. }
            | Emitter::Sphere { rate, .. }
            | Emitter::Stream { rate, .. } => *rate,
            Emitter::Burst { .. } => 0.0,
        }
    }

    pub fn liquid(&self) -> LiquidType {
        match self {
            Emitter::Point { liquid, .. }
            | Emitter::Burst { liquid, .. }
            | Emitter::Cone { liquid, .. }
            | Emitter::Sphere { liquid, .. }
            | Emitter::Stream { liquid, .. } => *liquid,
        }
    }

    /// Check the numeric fields a scenario file can get wrong.
    pub fn validate(&self) -> Result<(), &'static str> {
        let speed = match *self {
            Emitter::Point { speed, .. }
            | Emitter::Burst { speed, .. }
            | Emitter::Cone { speed, .. }
            | Emitter::Sphere { speed, .. } => speed,
            Emitter::Stream { velocity, .. } => {
                if !velocity.is_finite() {
                    return Err("velocity must be finite");
                }
                0.0
            }
        };
        if !speed.is_finite() {
            return Err("speed must be finite");
        }
        let rate = self.rate();
        if !rate.is_finite() || rate < 0.0 {
            return Err("rate must be finite and >= 0");
        }
        Ok(())
    }

    /// Build one spawn request for this emitter.
    pub fn sample(&self, ctx: &mut SpawnContext<'_>) -> SpawnRequest {
        match *self {
            Emitter::Point {
                position,
                speed,
                liquid,
                ..
            }
            | Emitter::Burst {
                position,
                speed,
                liquid,
                ..
            } => SpawnRequest::new(position, ctx.random_direction() * speed, liquid),
            Emitter::Cone {
                position,
                direction,
                speed,
                spread,
                liquid,
                ..
            } => SpawnRequest::new(position, ctx.random_in_cone(direction, spread) * speed, liquid),
            Emitter::Sphere {
                center,
                radius,
                speed,
                liquid,
                ..
            } => {
                let normal = ctx.random_direction();
                SpawnRequest::new(center + normal * radius, normal * speed, liquid)
            }
            Emitter::Stream {
                position,
                velocity,
                liquid,
                ..
            } => SpawnRequest::new(position, velocity, liquid),
        }
    }
}

/// An emitter plus its runtime accumulator.
#[derive(Clone, Debug)]
pub struct EmitterState {
    emitter: Emitter,
    pending: f32,
    fired: bool,
}

impl EmitterState {
    pub fn new(emitter: Emitter) -> Self {
        Self {
            emitter,
            pending: 0.0,
            fired: false,
        }
    }

    pub fn emitter(&self) -> &Emitter {
        &self.emitter
    }

    /// Whether a burst has already fired.
    pub fn is_spent(&self) -> bool {
        matches!(self.emitter, Emitter::Burst { .. }) && self.fired
    }

    /// Push this frame's spawn requests onto `out`, at most `limit` of them.
    ///
    /// Requests past `limit` are dropped rather than carried over.
    pub fn emit(
        &mut self,
        delta_time: f32,
        limit: usize,
        ctx: &mut SpawnContext<'_>,
        out: &mut Vec<SpawnRequest>,
    ) {
        let count = match self.emitter {
            Emitter::Burst { count, .. } => {
                if self.fired {
                    0
                } else {
                    self.fired = true;
                    count
                }
            }
            _ => {
                let rate = self.emitter.rate();
                if !(rate > 0.0) || !rate.is_finite() || !(delta_time > 0.0) {
                    return;
                }
                self.pending += rate * delta_time;
                let whole = self.pending.floor();
                self.pending -= whole;
                whole as u32
            }
        };
        let count = (count as usize).min(limit);
        out.extend((0..count).map(|_| self.emitter.sample(ctx)));
    }

    /// Rearm a burst and drop any fractional remainder.
    pub fn reset(&mut self) {
        self.pending = 0.0;
        self.fired = false;
    }
}
