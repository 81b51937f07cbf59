//! Spawn requests and randomized spawn helpers.
//!
//! A [`SpawnRequest`] is everything the pool needs to bring a particle to
//! life. [`SpawnContext`] borrows the simulation RNG and offers the shape
//! helpers emitters use to place and launch particles.

use crate::liquid::LiquidType;
use crate::vector::safe_normalize;
use glam::Vec3;
use rand::rngs::SmallRng;
use rand::Rng;
use std::f32::consts::{PI, TAU};

/// Request to activate one particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnRequest {
    pub position: Vec3,
    pub velocity: Vec3,
    pub liquid: LiquidType,
    /// Overrides the liquid's default mass.
    pub mass: Option<f32>,
}

impl SpawnRequest {
    pub fn new(position: Vec3, velocity: Vec3, liquid: LiquidType) -> Self {
        Self {
            position,
            velocity,
            liquid,
            mass: None,
        }
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = Some(mass);
        self
    }
}

/// Random helpers over a borrowed RNG.
pub struct SpawnContext<'a> {
    rng: &'a mut SmallRng,
}

impl<'a> SpawnContext<'a> {
    pub fn new(rng: &'a mut SmallRng) -> Self {
        Self { rng }
    }

    // ========== Random primitives ==========

    /// Random f32 in [0, 1).
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in `[min, max)`. Returns `min` for an empty range.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        if max > min {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    // ========== Shapes ==========

    /// Uniform point on a sphere of the given radius around the origin.
    pub fn random_on_sphere(&mut self, radius: f32) -> Vec3 {
        // Uniform in cos(phi) so the poles are not oversampled.
        let theta = self.rng.gen_range(0.0..TAU);
        let cos_phi: f32 = self.rng.gen_range(-1.0..1.0);
        let sin_phi = (1.0 - cos_phi * cos_phi).max(0.0).sqrt();
        Vec3::new(sin_phi * theta.cos(), sin_phi * theta.sin(), cos_phi) * radius
    }

    /// Uniform point inside a sphere of the given radius.
    pub fn random_in_sphere(&mut self, radius: f32) -> Vec3 {
        let r = radius * self.rng.gen::<f32>().cbrt();
        self.random_on_sphere(r)
    }

    /// Random unit vector.
    pub fn random_direction(&mut self) -> Vec3 {
        self.random_on_sphere(1.0)
    }

    /// Random unit vector within `spread` radians of `axis`.
    ///
    /// A zero axis falls back to `+Y`. Spread is clamped to `[0, PI]`.
    pub fn random_in_cone(&mut self, axis: Vec3, spread: f32) -> Vec3 {
        let axis = safe_normalize(axis);
        let axis = if axis == Vec3::ZERO { Vec3::Y } else { axis };
        let spread = spread.clamp(0.0, PI);

        let cos_max = spread.cos();
        let cos_theta = self.random_range(cos_max, 1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
        let phi = self.rng.gen_range(0.0..TAU);

        let (u, v) = axis.any_orthonormal_pair();
        (axis * cos_theta + (u * phi.cos() + v * phi.sin()) * sin_theta).normalize_or_zero()
    }

    /// Velocity tangent to a circle around `center` in the XY plane.
    ///
    /// Useful for seeding orbits: pass the well's circular speed.
    pub fn tangent_velocity(&self, center: Vec3, position: Vec3, speed: f32) -> Vec3 {
        let offset = position - center;
        safe_normalize(Vec3::new(-offset.y, offset.x, 0.0)) * speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_on_sphere_radius() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut ctx = SpawnContext::new(&mut rng);
        for _ in 0..100 {
            let p = ctx.random_on_sphere(3.0);
            assert!((p.length() - 3.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_in_sphere_bounded() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut ctx = SpawnContext::new(&mut rng);
        for _ in 0..100 {
            assert!(ctx.random_in_sphere(2.0).length() <= 2.0 + 1e-4);
        }
    }

    #[test]
    fn test_cone_respects_spread() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut ctx = SpawnContext::new(&mut rng);
        let axis = Vec3::new(1.0, 1.0, 0.0);
        for _ in 0..200 {
            let d = ctx.random_in_cone(axis, 0.2);
            assert!((d.length() - 1.0).abs() < 1e-4);
            assert!(d.angle_between(axis.normalize()) <= 0.2 + 1e-3);
        }
    }

    #[test]
    fn test_zero_spread_is_a_laser() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut ctx = SpawnContext::new(&mut rng);
        let d = ctx.random_in_cone(Vec3::Z, 0.0);
        assert!((d - Vec3::Z).length() < 1e-4);
    }

    #[test]
    fn test_tangent_velocity() {
        let rng = &mut SmallRng::seed_from_u64(5);
        let ctx = SpawnContext::new(rng);
        let v = ctx.tangent_velocity(Vec3::ZERO, Vec3::new(20.0, 0.0, 0.0), 5f32.sqrt());
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 5f32.sqrt()).abs() < 1e-6);
        assert_eq!(ctx.tangent_velocity(Vec3::ZERO, Vec3::ZERO, 1.0), Vec3::ZERO);
    }

    #[test]
    fn test_empty_range() {
        let mut rng = SmallRng::seed_from_u64(6);
        let mut ctx = SpawnContext::new(&mut rng);
        assert_eq!(ctx.random_range(2.0, 2.0), 2.0);
    }
}
