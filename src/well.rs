//! Gravity wells: fixed point masses that pull on particles.
//!
//! A well computes the inverse-square acceleration it induces at any
//! position, classifies positions into zones, and applies one side-effect
//! policy per [`WellKind`] during the well pass that follows particle
//! integration.
//!
//! # Zones
//!
//! Radii derived once at construction, innermost first:
//!
//! | Zone | Formula | Meaning |
//! |------|---------|---------|
//! | event horizon | `2·G·M / c²` (black holes only) | particles are destroyed |
//! | danger zone | `1.5 · max(radius, event_horizon)` | particle counts as captured |
//! | stable orbit zone | `3·radius + sqrt(M)` | well-specific effects reach here |
//! | influence zone | `2.5 · stable_orbit_zone` | counted for glow feedback |
//!
//! # Caller Invariants
//!
//! `G > 0` and `mass > 0` are expected and not checked here;
//! [`SimConfig::validate`](crate::SimConfig::validate) enforces them for
//! configured wells.

use crate::config::PhysicsConfig;
use crate::liquid::LiquidType;
use crate::particle::LiquidParticle;
use crate::vector::direction_to;
use glam::Vec3;
use gravflow_derive::EnumTable;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Angular speed of a neutron star's rotating field, radians per time unit.
const NEUTRON_SPIN: f32 = 4.0;

/// Maximum black-hole glow multiplier at the event horizon.
const HORIZON_GLOW_BOOST: f32 = 2.0;

/// Kind of celestial body a well represents.
///
/// Unknown names resolve to [`WellKind::Star`], the first variant.
#[derive(EnumTable, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WellKind {
    #[default]
    Star,
    Planet,
    BlackHole,
    Neutron,
    GasGiant,
    Dwarf,
}

impl Serialize for WellKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for WellKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(WellKind::try_from_name(&name).unwrap_or_else(|| {
            log::warn!("unknown well kind '{}', using {}", name, WellKind::Star.name());
            WellKind::Star
        }))
    }
}

/// Result of testing a position against a well's zones.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ZoneClassification {
    /// Inside the danger (capture) zone.
    pub captured: bool,
    /// Inside the stable orbit zone (`d < 3·radius + sqrt(mass)`).
    ///
    /// Despite the name this is the orbit zone; the danger zone test is
    /// [`captured`](Self::captured).
    pub in_danger_zone: bool,
    /// Inside the outer influence zone.
    pub in_influence: bool,
}

/// A fixed point-mass source of gravitational acceleration.
#[derive(Clone, Debug, PartialEq)]
pub struct GravityWell {
    position: Vec3,
    mass: f32,
    radius: f32,
    kind: WellKind,
    event_horizon: f32,
    stable_orbit_zone: f32,
    danger_zone: f32,
    influence_zone: f32,
    active: bool,
    age: f32,
    g: f32,
    min_distance: f32,
    stellar_wind: f32,
    magnetic_field: f32,
    captured_count: u32,
    orbiting_count: u32,
    influenced_count: u32,
}

impl GravityWell {
    /// Create a well and derive its zone radii from `physics`.
    pub fn new(position: Vec3, mass: f32, radius: f32, kind: WellKind, physics: &PhysicsConfig) -> Self {
        let g = physics.gravitational_constant;
        let c = physics.light_speed;

        let event_horizon = match kind {
            WellKind::BlackHole => 2.0 * g * mass / (c * c),
            _ => 0.0,
        };
        let stable_orbit_zone = radius * 3.0 + mass.max(0.0).sqrt();
        let danger_zone = radius.max(event_horizon) * 1.5;

        Self {
            position,
            mass,
            radius,
            kind,
            event_horizon,
            stable_orbit_zone,
            danger_zone,
            influence_zone: stable_orbit_zone * 2.5,
            active: true,
            age: 0.0,
            g,
            min_distance: physics.min_distance,
            stellar_wind: physics.stellar_wind,
            magnetic_field: physics.magnetic_field,
            captured_count: 0,
            orbiting_count: 0,
            influenced_count: 0,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn kind(&self) -> WellKind {
        self.kind
    }

    /// Destruction radius. Zero for everything but black holes.
    #[inline]
    pub fn event_horizon(&self) -> f32 {
        self.event_horizon
    }

    #[inline]
    pub fn stable_orbit_zone(&self) -> f32 {
        self.stable_orbit_zone
    }

    #[inline]
    pub fn danger_zone(&self) -> f32 {
        self.danger_zone
    }

    #[inline]
    pub fn influence_zone(&self) -> f32 {
        self.influence_zone
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Enable or disable the well. Inactive wells exert no force and run no effects.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Time the well has existed, advanced by each well pass.
    #[inline]
    pub fn age(&self) -> f32 {
        self.age
    }

    /// Particles inside the danger zone during the last well pass.
    #[inline]
    pub fn captured_count(&self) -> u32 {
        self.captured_count
    }

    /// Particles inside the stable orbit zone but not captured during the last well pass.
    #[inline]
    pub fn orbiting_count(&self) -> u32 {
        self.orbiting_count
    }

    /// Particles inside the influence zone during the last well pass.
    #[inline]
    pub fn influenced_count(&self) -> u32 {
        self.influenced_count
    }

    /// Gravitational acceleration this well induces on a body of `query_mass` at `position`.
    ///
    /// The force `G·M·m / d²` is divided by the inertial mass `|m|`, so
    /// positive masses feel the usual mass-independent `G·M / d²` pull and
    /// negative masses are pushed away. A zero `query_mass` is treated as 1.
    /// Returns zero inside `min_distance`.
    pub fn acceleration_at(&self, position: Vec3, query_mass: f32) -> Vec3 {
        let (dir, dist) = direction_to(position, self.position);
        if dist < self.min_distance {
            return Vec3::ZERO;
        }
        let m = if query_mass == 0.0 { 1.0 } else { query_mass };
        let force = self.g * self.mass * m / (dist * dist);
        dir * (force / m.abs())
    }

    /// Speed of a circular orbit at `distance`: `sqrt(G·M / d)`.
    #[inline]
    pub fn orbital_velocity(&self, distance: f32) -> f32 {
        (self.g * self.mass / distance).sqrt()
    }

    /// Test a position against the well's zones. Pure.
    pub fn classify(&self, position: Vec3) -> ZoneClassification {
        let dist = position.distance(self.position);
        ZoneClassification {
            captured: dist < self.danger_zone,
            in_danger_zone: dist < self.stable_orbit_zone,
            in_influence: dist < self.influence_zone,
        }
    }

    /// Advance the well's clock and reset activity counts for a new pass.
    pub fn begin_pass(&mut self, delta_time: f32) {
        self.age += delta_time;
        self.captured_count = 0;
        self.orbiting_count = 0;
        self.influenced_count = 0;
    }

    /// Count `particle` in this well's zones and apply the kind-specific effect.
    ///
    /// Velocity perturbations are applied as `velocity += accel · dt` since
    /// this runs after the particle has integrated for the frame.
    pub fn apply_effects(&mut self, particle: &mut LiquidParticle, delta_time: f32) {
        if !self.active || !particle.alive {
            return;
        }

        let zones = self.classify(particle.position);
        if zones.captured {
            self.captured_count += 1;
        } else if zones.in_danger_zone {
            self.orbiting_count += 1;
        }
        if zones.in_influence {
            self.influenced_count += 1;
        }

        match self.kind {
            WellKind::BlackHole => self.swallow(particle),
            WellKind::Neutron => self.magnetize(particle, delta_time),
            WellKind::Star => self.blow(particle, delta_time),
            WellKind::Planet | WellKind::GasGiant | WellKind::Dwarf => {}
        }
    }

    fn swallow(&self, particle: &mut LiquidParticle) {
        let dist = particle.position.distance(self.position);
        if dist < self.event_horizon {
            particle.alive = false;
            return;
        }
        if dist < self.stable_orbit_zone {
            let span = (self.stable_orbit_zone - self.event_horizon).max(f32::EPSILON);
            let proximity = (1.0 - (dist - self.event_horizon) / span).clamp(0.0, 1.0);
            let base = particle.liquid.properties().glow_intensity;
            particle.glow = particle.glow.max(base * (1.0 + HORIZON_GLOW_BOOST * proximity));
        }
    }

    fn magnetize(&self, particle: &mut LiquidParticle, delta_time: f32) {
        if !matches!(particle.liquid, LiquidType::Plasma | LiquidType::Antimatter) {
            return;
        }
        if particle.position.distance(self.position) >= self.stable_orbit_zone {
            return;
        }
        let phase = self.age * NEUTRON_SPIN;
        let field = Vec3::new(phase.sin(), phase.cos(), (phase * 0.5).sin());
        let susceptibility = particle.liquid.properties().magnetic_susceptibility;
        particle.velocity += field * (self.magnetic_field * susceptibility * delta_time);
    }

    fn blow(&self, particle: &mut LiquidParticle, delta_time: f32) {
        let (toward, dist) = direction_to(particle.position, self.position);
        if dist <= self.radius * 2.0 || dist >= self.stable_orbit_zone {
            return;
        }
        let wind = self.stellar_wind * self.mass / (dist * dist);
        particle.velocity -= toward * (wind * delta_time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn physics() -> PhysicsConfig {
        PhysicsConfig::default()
    }

    fn well(kind: WellKind, mass: f32, radius: f32) -> GravityWell {
        GravityWell::new(Vec3::ZERO, mass, radius, kind, &physics())
    }

    #[test]
    fn test_inverse_square_falloff() {
        let w = well(WellKind::Planet, 100.0, 1.0);
        let distances = [1.0, 2.0, 3.5, 5.0, 10.0, 40.0];

        let mut previous = f32::INFINITY;
        for &d in &distances {
            let a = w.acceleration_at(Vec3::new(d, 0.0, 0.0), 1.0).length();
            assert!(a < previous, "accel must decrease with distance");
            previous = a;

            let constant = a * d * d;
            assert!((constant - 100.0).abs() < 1e-2, "a*d^2 = {constant} at d = {d}");
        }
    }

    #[test]
    fn test_acceleration_points_toward_well() {
        let w = well(WellKind::Planet, 50.0, 1.0);
        let a = w.acceleration_at(Vec3::new(0.0, 0.0, -8.0), 1.0);
        assert!(a.z > 0.0);
        assert!(a.x.abs() < 1e-6 && a.y.abs() < 1e-6);
    }

    #[test]
    fn test_acceleration_independent_of_positive_mass() {
        let w = well(WellKind::Planet, 50.0, 1.0);
        let p = Vec3::new(3.0, 4.0, 0.0);
        let light = w.acceleration_at(p, 0.1);
        let heavy = w.acceleration_at(p, 30.0);
        assert!((light - heavy).length() < 1e-5);
    }

    #[test]
    fn test_negative_mass_is_repelled() {
        let w = well(WellKind::Planet, 50.0, 1.0);
        let a = w.acceleration_at(Vec3::new(5.0, 0.0, 0.0), -1.0);
        assert!(a.x > 0.0);
    }

    #[test]
    fn test_min_distance_zeroes_force() {
        let w = well(WellKind::Planet, 50.0, 1.0);
        assert_eq!(w.acceleration_at(Vec3::new(0.1, 0.0, 0.0), 1.0), Vec3::ZERO);
        assert_eq!(w.acceleration_at(Vec3::ZERO, 1.0), Vec3::ZERO);
    }

    #[test]
    fn test_derived_zones() {
        let star = well(WellKind::Star, 100.0, 2.0);
        assert_eq!(star.event_horizon(), 0.0);
        assert!((star.stable_orbit_zone() - 16.0).abs() < 1e-5);
        assert!((star.danger_zone() - 3.0).abs() < 1e-5);
        assert!((star.influence_zone() - 40.0).abs() < 1e-4);

        // 2 * 1 * 500 / 10^2
        let hole = well(WellKind::BlackHole, 500.0, 1.0);
        assert!((hole.event_horizon() - 10.0).abs() < 1e-5);
        assert!((hole.danger_zone() - 15.0).abs() < 1e-5);
    }

    #[test]
    fn test_classify() {
        let star = well(WellKind::Star, 100.0, 2.0);

        let inner = star.classify(Vec3::new(2.0, 0.0, 0.0));
        assert!(inner.captured && inner.in_danger_zone && inner.in_influence);

        let orbit = star.classify(Vec3::new(10.0, 0.0, 0.0));
        assert!(!orbit.captured && orbit.in_danger_zone && orbit.in_influence);

        // 1.5·r = 3 < 5 < 3·r + sqrt(m) = 16: orbit zone only.
        let ring = star.classify(Vec3::new(5.0, 0.0, 0.0));
        assert!(!ring.captured && ring.in_danger_zone);

        let far = star.classify(Vec3::new(100.0, 0.0, 0.0));
        assert_eq!(far, ZoneClassification::default());
    }

    #[test]
    fn test_black_hole_destroys_inside_horizon() {
        let mut hole = well(WellKind::BlackHole, 500.0, 1.0);
        let mut p = LiquidParticle::new(
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(0.0, 500.0, 0.0),
            LiquidType::Plasma,
            10.0,
        );

        hole.begin_pass(1.0 / 60.0);
        hole.apply_effects(&mut p, 1.0 / 60.0);

        assert!(!p.alive);
        assert_eq!(hole.captured_count(), 1);
    }

    #[test]
    fn test_black_hole_boosts_glow_near_horizon() {
        let mut hole = well(WellKind::BlackHole, 500.0, 1.0);
        let mut near = LiquidParticle::new(Vec3::new(12.0, 0.0, 0.0), Vec3::ZERO, LiquidType::Plasma, 10.0);
        let mut farther = LiquidParticle::new(Vec3::new(20.0, 0.0, 0.0), Vec3::ZERO, LiquidType::Plasma, 10.0);
        let base = LiquidType::Plasma.properties().glow_intensity;

        hole.apply_effects(&mut near, 0.1);
        hole.apply_effects(&mut farther, 0.1);

        assert!(near.alive && farther.alive);
        assert!(near.glow > farther.glow);
        assert!(farther.glow > base);
    }

    #[test]
    fn test_star_wind_pushes_outward() {
        let mut star = well(WellKind::Star, 100.0, 2.0);
        let mut p = LiquidParticle::new(Vec3::new(8.0, 0.0, 0.0), Vec3::ZERO, LiquidType::Dark, 10.0);

        star.apply_effects(&mut p, 1.0);
        assert!(p.velocity.x > 0.0);

        // Inside 2 * radius there is no wind.
        let mut close = LiquidParticle::new(Vec3::new(3.0, 0.0, 0.0), Vec3::ZERO, LiquidType::Dark, 10.0);
        star.apply_effects(&mut close, 1.0);
        assert_eq!(close.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_neutron_field_only_moves_charged_liquids() {
        let mut neutron = well(WellKind::Neutron, 100.0, 1.0);
        neutron.begin_pass(0.3);

        let mut plasma = LiquidParticle::new(Vec3::new(5.0, 0.0, 0.0), Vec3::ZERO, LiquidType::Plasma, 10.0);
        let mut crystal = LiquidParticle::new(Vec3::new(5.0, 0.0, 0.0), Vec3::ZERO, LiquidType::Crystal, 10.0);

        neutron.apply_effects(&mut plasma, 0.1);
        neutron.apply_effects(&mut crystal, 0.1);

        assert!(plasma.velocity.length() > 0.0);
        assert_eq!(crystal.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_inactive_well_has_no_effect() {
        let mut hole = well(WellKind::BlackHole, 500.0, 1.0);
        hole.set_active(false);
        let mut p = LiquidParticle::new(Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO, LiquidType::Plasma, 10.0);
        hole.apply_effects(&mut p, 0.1);
        assert!(p.alive);
        assert_eq!(hole.captured_count(), 0);
    }

    #[test]
    fn test_orbital_velocity() {
        let star = well(WellKind::Star, 100.0, 2.0);
        assert!((star.orbital_velocity(20.0) - 5.0f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(WellKind::GasGiant.name(), "gasgiant");
        assert_eq!(WellKind::from_name("blackhole"), WellKind::BlackHole);
        assert_eq!(WellKind::from_name("pulsar"), WellKind::Star);
    }
}
