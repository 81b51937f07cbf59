//! Hash and noise helpers for deterministic per-particle variation.
//!
//! # Available Functions
//!
//! ## Random & Hash
//! - [`hash`] - Hash a u32 to a pseudo-random u32
//! - [`hash2`] - Hash a 2D lattice coordinate
//! - [`rand`] - Pseudo-random float in [0, 1) from a seed
//!
//! ## Noise
//! - [`noise2`] - 2D value noise in [-1, 1]
//! - [`turbulence3`] - Three decorrelated noise channels for a position and time
//!
//! All functions are pure: the same inputs always produce the same output.

use glam::Vec3;

/// Integer hash (lowbias32-style avalanche).
#[inline]
pub fn hash(n: u32) -> u32 {
    let mut x = n;
    x ^= x >> 17;
    x = x.wrapping_mul(0xed5a_d4bb);
    x ^= x >> 11;
    x = x.wrapping_mul(0xac4c_1b51);
    x ^= x >> 15;
    x = x.wrapping_mul(0x3184_8bab);
    x ^= x >> 14;
    x
}

#[inline]
pub fn hash2(x: i32, y: i32) -> u32 {
    hash((x as u32).wrapping_add(hash(y as u32)))
}

/// Random float in [0, 1).
#[inline]
pub fn rand(seed: u32) -> f32 {
    (hash(seed) >> 8) as f32 / (1u32 << 24) as f32
}

#[inline]
fn lattice(x: i32, y: i32) -> f32 {
    (hash2(x, y) >> 8) as f32 / (1u32 << 24) as f32 * 2.0 - 1.0
}

#[inline]
fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// 2D value noise in [-1, 1], smooth between integer lattice points.
pub fn noise2(x: f32, y: f32) -> f32 {
    let x0 = x.floor();
    let y0 = y.floor();
    let tx = smoothstep(x - x0);
    let ty = smoothstep(y - y0);
    let (ix, iy) = (x0 as i32, y0 as i32);

    let a = lattice(ix, iy);
    let b = lattice(ix.wrapping_add(1), iy);
    let c = lattice(ix, iy.wrapping_add(1));
    let d = lattice(ix.wrapping_add(1), iy.wrapping_add(1));

    let top = a + (b - a) * tx;
    let bottom = c + (d - c) * tx;
    top + (bottom - top) * ty
}

/// Noise sampled independently at `(x, t)`, `(y, t)` and `(z, t)`.
///
/// Each channel is offset so the axes decorrelate even when the
/// coordinates are equal.
pub fn turbulence3(p: Vec3, t: f32) -> Vec3 {
    Vec3::new(
        noise2(p.x, t),
        noise2(p.y + 31.7, t + 17.3),
        noise2(p.z - 53.1, t + 71.9),
    )
}
