//! Vector helpers shared by every physics module.
//!
//! The vector type itself is [`glam::Vec3`]: a `Copy` value type whose
//! operators (`+`, `-`, `*`), [`Vec3::dot`], [`Vec3::cross`],
//! [`Vec3::length`] and [`Vec3::distance`] already return new values.
//! This module adds the few operations whose edge cases the simulation
//! pins down explicitly.
//!
//! # Zero-length normalization
//!
//! [`safe_normalize`] returns [`Vec3::ZERO`] for a zero-length input
//! instead of producing NaN. Every force computation that normalizes an
//! offset goes through it.

use glam::Vec3;

/// Normalize `v`, returning the zero vector when `v` has zero (or
/// non-finite) length.
#[inline]
pub fn safe_normalize(v: Vec3) -> Vec3 {
    let len = v.length();
    if len > 0.0 && len.is_finite() {
        v / len
    } else {
        Vec3::ZERO
    }
}

/// Unit direction and distance from `from` toward `to`.
///
/// When the points coincide the direction is [`Vec3::ZERO`] and the
/// distance is `0.0`.
#[inline]
pub fn direction_to(from: Vec3, to: Vec3) -> (Vec3, f32) {
    let offset = to - from;
    let distance = offset.length();
    (safe_normalize(offset), distance)
}

/// Replace any non-finite component with `0.0`.
///
/// Returns the sanitized vector and whether anything was replaced.
pub fn sanitize(v: Vec3) -> (Vec3, bool) {
    let fix = |c: f32| if c.is_finite() { c } else { 0.0 };
    let clean = Vec3::new(fix(v.x), fix(v.y), fix(v.z));
    (clean, !v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_zero_is_zero() {
        assert_eq!(safe_normalize(Vec3::ZERO), Vec3::ZERO);
    }

    #[test]
    fn test_normalize_unit_length() {
        let n = safe_normalize(Vec3::new(3.0, 4.0, 0.0));
        assert!((n.length() - 1.0).abs() < 1e-6);
        assert!((n.x - 0.6).abs() < 1e-6);
        assert!((n.y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_infinite_is_zero() {
        assert_eq!(safe_normalize(Vec3::new(f32::INFINITY, 0.0, 0.0)), Vec3::ZERO);
    }

    #[test]
    fn test_direction_to() {
        let (dir, dist) = direction_to(Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 5.0));
        assert_eq!(dir, Vec3::Z);
        assert!((dist - 5.0).abs() < 1e-6);

        let (dir, dist) = direction_to(Vec3::ONE, Vec3::ONE);
        assert_eq!(dir, Vec3::ZERO);
        assert_eq!(dist, 0.0);
    }

    #[test]
    fn test_distance_matches_length_of_difference() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(-2.0, 6.0, 3.0);
        assert!((a.distance(b) - (a - b).length()).abs() < 1e-6);
        assert!((a.distance(b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_sanitize() {
        let (v, changed) = sanitize(Vec3::new(f32::NAN, 2.0, f32::NEG_INFINITY));
        assert!(changed);
        assert_eq!(v, Vec3::new(0.0, 2.0, 0.0));

        let (v, changed) = sanitize(Vec3::new(1.0, 2.0, 3.0));
        assert!(!changed);
        assert_eq!(v, Vec3::new(1.0, 2.0, 3.0));
    }
}
