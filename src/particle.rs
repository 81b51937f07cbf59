//! A single liquid particle and its per-frame update.
//!
//! # Update Order
//!
//! [`LiquidParticle::update`] runs these steps in a fixed order:
//!
//! 1. Skip if dead.
//! 2. Age; die (and stop) once `age > max_age`.
//! 3. Remember `last_position`.
//! 4. Clear acceleration.
//! 5. Gravity from every active well. Antimatter feels `-0.5×` the force.
//! 6. Cohesion (same type, averaged) and separation (any type, summed).
//! 7. Viscous damping: `velocity *= viscosity · drag`.
//! 8. Liquid-specific effects (crystal setting, temporal phase,
//!    antimatter bursts, plasma turbulence).
//! 9. Semi-implicit Euler integration.
//! 10. Trail sampling.
//! 11. Alpha, size and glow refresh.
//! 12. Orbit classification.
//!
//! The order is observable: damping happens before the frame's
//! acceleration is integrated, and orbit state reflects the post-move
//! position and speed.

use crate::config::{OrbitDetection, PhysicsConfig};
use crate::extensions::ExtendedState;
use crate::gravity::GravitySystem;
use crate::liquid::LiquidType;
use crate::noise::turbulence3;
use crate::well::GravityWell;
use glam::Vec3;
use rand::rngs::SmallRng;
use rand::Rng;
use std::collections::VecDeque;

/// Crystal viscosity never decays below this.
const CRYSTAL_VISCOSITY_FLOOR: f32 = 0.7;
/// Crystal viscosity lost per time unit while setting.
const CRYSTAL_SET_RATE: f32 = 0.01;
/// Crystallization gained per time unit.
const CRYSTAL_GROWTH: f32 = 0.1;
/// Separation treats closer neighbors as this far away.
const SEPARATION_FLOOR: f32 = 1e-3;

/// One sample of a particle's motion history.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailSample {
    pub position: Vec3,
    pub alpha: f32,
    /// Frames since the sample was taken.
    pub age: u32,
}

/// Snapshot of another particle, as seen during the interaction step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor {
    pub position: Vec3,
    pub liquid: LiquidType,
}

/// Everything a particle reads from the outside world during one update.
pub struct StepContext<'a> {
    pub delta_time: f32,
    pub physics: &'a PhysicsConfig,
    pub wells: &'a GravitySystem,
    pub rng: &'a mut SmallRng,
    /// Trail samples older than this many frames are dropped.
    pub max_trail_length: u32,
}

/// A particle of liquid moving through the gravity field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LiquidParticle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub acceleration: Vec3,
    pub last_position: Vec3,
    pub liquid: LiquidType,
    /// Gravitational mass. Negative for exotic liquid.
    pub mass: f32,
    /// Current per-frame velocity scale. Crystal lowers it over time.
    pub viscosity: f32,
    pub age: f32,
    pub max_age: f32,
    pub alive: bool,
    pub trail: VecDeque<TrailSample>,
    pub in_orbit: bool,
    pub orbit_center: Vec3,
    pub orbit_radius: f32,
    /// Crystal only: 0.0 (liquid) to 1.0 (fully set).
    pub crystallization: f32,
    /// Temporal only: oscillating time-rate hint for alternate consumers.
    pub time_distortion: f32,
    pub alpha: f32,
    pub size: f32,
    pub glow: f32,
    pub extended: ExtendedState,
}

impl LiquidParticle {
    /// Create a live particle with the liquid's default mass.
    pub fn new(position: Vec3, velocity: Vec3, liquid: LiquidType, max_age: f32) -> Self {
        let mut particle = Self::default();
        particle.respawn(position, velocity, liquid, max_age);
        particle
    }

    /// Override the liquid's default mass.
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Reinitialize this particle in place, keeping the trail allocation.
    pub fn respawn(&mut self, position: Vec3, velocity: Vec3, liquid: LiquidType, max_age: f32) {
        self.reset();
        let props = liquid.properties();
        self.position = position;
        self.last_position = position;
        self.velocity = velocity;
        self.liquid = liquid;
        self.mass = props.mass;
        self.viscosity = props.viscosity;
        self.max_age = max_age;
        self.alive = true;
        self.time_distortion = 1.0;
        self.alpha = 1.0;
        self.size = props.base_size;
        self.glow = props.glow_intensity;
    }

    /// Zero every field and mark the particle dead, keeping the trail allocation.
    pub fn reset(&mut self) {
        let mut trail = std::mem::take(&mut self.trail);
        trail.clear();
        *self = Self {
            trail,
            ..Self::default()
        };
    }

    /// Fraction of lifetime used, clamped to [0, 1].
    #[inline]
    pub fn life_ratio(&self) -> f32 {
        if self.max_age > 0.0 {
            (self.age / self.max_age).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Advance the particle one frame. Returns whether it is still alive.
    ///
    /// `neighbors` must come from a snapshot taken before any particle
    /// moved this frame, and must not include this particle.
    pub fn update(&mut self, ctx: &mut StepContext<'_>, neighbors: &[Neighbor]) -> bool {
        if !self.alive {
            return false;
        }

        let dt = ctx.delta_time;
        self.age += dt;
        if self.age > self.max_age {
            self.alive = false;
            return false;
        }

        self.last_position = self.position;
        self.acceleration = Vec3::ZERO;

        self.apply_gravity(ctx.wells);
        self.apply_interactions(neighbors, ctx.physics);

        self.velocity *= self.viscosity * ctx.physics.drag;

        self.apply_liquid_effects(dt, ctx.physics, ctx.rng);

        self.velocity += self.acceleration * dt;
        self.position += self.velocity * dt;

        self.update_trail(ctx.max_trail_length);
        self.refresh_visuals();
        self.classify_orbit(ctx.wells, ctx.physics);

        true
    }

    fn apply_gravity(&mut self, wells: &GravitySystem) {
        let factor = if self.liquid.properties().flags.anti_gravity {
            -0.5
        } else {
            1.0
        };
        for well in wells.active() {
            self.acceleration += well.acceleration_at(self.position, self.mass) * factor;
        }
    }

    fn apply_interactions(&mut self, neighbors: &[Neighbor], physics: &PhysicsConfig) {
        let reach = physics.cohesion_distance;
        let personal_space = reach * 0.5;

        let mut cohesion = Vec3::ZERO;
        let mut same_type = 0u32;
        let mut separation = Vec3::ZERO;

        for other in neighbors {
            let offset = other.position - self.position;
            let dist = offset.length();
            if dist >= reach {
                continue;
            }
            if other.liquid == self.liquid {
                cohesion += offset * physics.surface_tension;
                same_type += 1;
            }
            if dist < personal_space && dist > 0.0 {
                separation -= (offset / dist) * (physics.separation_strength / dist.max(SEPARATION_FLOOR));
            }
        }

        if same_type > 0 {
            cohesion /= same_type as f32;
        }
        self.acceleration += cohesion + separation;
    }

    fn apply_liquid_effects(&mut self, dt: f32, physics: &PhysicsConfig, rng: &mut SmallRng) {
        match self.liquid {
            LiquidType::Crystal => {
                self.crystallization = (self.crystallization + CRYSTAL_GROWTH * dt).min(1.0);
                self.viscosity = (self.viscosity - CRYSTAL_SET_RATE * dt).max(CRYSTAL_VISCOSITY_FLOOR);
            }
            LiquidType::Temporal => {
                self.time_distortion = 1.0 + 0.5 * (self.age * 2.0).sin();
            }
            LiquidType::Antimatter => {
                if rng.gen::<f32>() < physics.antimatter_burst_chance {
                    let kick = Vec3::new(
                        rng.gen_range(-1.0..1.0),
                        rng.gen_range(-1.0..1.0),
                        rng.gen_range(-1.0..1.0),
                    );
                    self.acceleration += kick * physics.antimatter_burst_strength;
                }
            }
            LiquidType::Plasma => {
                let swirl = turbulence3(self.position * physics.turbulence_scale, self.age);
                self.acceleration += swirl * physics.turbulence_strength;
            }
            // Handled by the extended effects stage, if installed.
            LiquidType::Quantum | LiquidType::Dark | LiquidType::Exotic | LiquidType::Photonic => {}
        }
    }

    fn update_trail(&mut self, max_trail_length: u32) {
        self.trail.push_back(TrailSample {
            position: self.position,
            alpha: self.alpha,
            age: 0,
        });

        let fade = 1.0 - 1.0 / (max_trail_length as f32 + 1.0);
        for sample in self.trail.iter_mut() {
            sample.age += 1;
            sample.alpha *= fade;
        }
        while self
            .trail
            .front()
            .is_some_and(|oldest| oldest.age > max_trail_length)
        {
            self.trail.pop_front();
        }
    }

    fn refresh_visuals(&mut self) {
        let props = self.liquid.properties();
        let ratio = self.life_ratio();
        self.alpha = 1.0 - ratio * ratio;

        let mut size = props.base_size * (1.0 + self.velocity.length() * 0.1);
        match self.liquid {
            LiquidType::Crystal => size *= 1.0 + self.crystallization * 0.5,
            LiquidType::Temporal => size *= 1.0 + 0.3 * (self.age * 5.0).sin(),
            LiquidType::Antimatter => size *= 1.0 + 0.2 * (self.age * 10.0).sin(),
            _ => {}
        }
        self.size = size;
        self.glow = props.glow_intensity;
    }

    fn classify_orbit(&mut self, wells: &GravitySystem, physics: &PhysicsConfig) {
        self.clear_orbit();
        match physics.orbit_detection {
            OrbitDetection::AnyWell => {
                for well in wells.active() {
                    if let Some(radius) = self.orbit_radius_around(well, physics) {
                        self.set_orbit(well.position(), radius);
                        break;
                    }
                }
            }
            OrbitDetection::LastWellWins => {
                for well in wells.active() {
                    match self.orbit_radius_around(well, physics) {
                        Some(radius) => self.set_orbit(well.position(), radius),
                        None => self.clear_orbit(),
                    }
                }
            }
        }
    }

    /// Distance to `well` if the particle moves at near-circular speed beyond twice its radius.
    fn orbit_radius_around(&self, well: &GravityWell, physics: &PhysicsConfig) -> Option<f32> {
        let dist = self.position.distance(well.position());
        if dist < physics.min_distance || dist <= well.radius() * 2.0 {
            return None;
        }
        let circular = well.orbital_velocity(dist);
        if !(circular > 0.0) {
            return None;
        }
        let deviation = (self.velocity.length() - circular).abs() / circular;
        (deviation <= physics.orbit_tolerance).then_some(dist)
    }

    fn set_orbit(&mut self, center: Vec3, radius: f32) {
        self.in_orbit = true;
        self.orbit_center = center;
        self.orbit_radius = radius;
    }

    fn clear_orbit(&mut self) {
        self.in_orbit = false;
        self.orbit_center = Vec3::ZERO;
        self.orbit_radius = 0.0;
    }
}
