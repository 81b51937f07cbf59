//! Simulation configuration.
//!
//! All tunable constants live in immutable records passed to constructors
//! and update calls; there is no global state. A whole scenario (physics,
//! pool sizing, initial wells and emitters) can be saved to and loaded from
//! JSON:
//!
//! ```ignore
//! let config = SimConfig::load("scenarios/binary_stars.json")?;
//! let (mut sim, mut wells) = config.build();
//! ```

use crate::emitter::Emitter;
use crate::error::ConfigError;
use crate::well::{GravityWell, WellKind};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How orbit state is resolved when several wells are present.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrbitDetection {
    /// A particle is in orbit if it matches any active well; the first
    /// matching well in insertion order supplies the orbit center.
    #[default]
    AnyWell,
    /// Every well overwrites the orbit flags in turn, so the last active
    /// well decides.
    LastWellWins,
}

/// Physical constants used by particles and wells.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravitational constant `G`.
    pub gravitational_constant: f32,
    /// Below this distance a well contributes no force.
    pub min_distance: f32,
    /// Neighbors farther than this are ignored by cohesion and separation.
    pub cohesion_distance: f32,
    /// Strength of same-type cohesion.
    pub surface_tension: f32,
    /// Strength of the close-range separation push.
    pub separation_strength: f32,
    /// Global multiplier on per-type viscosity (1.0 = type viscosity only).
    pub drag: f32,
    /// Light speed `c`, used for event horizons and relativistic capping.
    pub light_speed: f32,
    /// Stellar wind strength for star wells.
    pub stellar_wind: f32,
    /// Rotating field strength for neutron wells.
    pub magnetic_field: f32,
    /// Plasma turbulence acceleration magnitude.
    pub turbulence_strength: f32,
    /// Spatial frequency of plasma turbulence.
    pub turbulence_scale: f32,
    /// Per-frame chance of an antimatter impulse.
    pub antimatter_burst_chance: f32,
    /// Magnitude of an antimatter impulse per axis.
    pub antimatter_burst_strength: f32,
    /// Maximum relative deviation from circular speed still counted as orbiting.
    pub orbit_tolerance: f32,
    pub orbit_detection: OrbitDetection,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravitational_constant: 1.0,
            min_distance: 0.5,
            cohesion_distance: 2.0,
            surface_tension: 0.05,
            separation_strength: 0.1,
            drag: 1.0,
            light_speed: 10.0,
            stellar_wind: 0.02,
            magnetic_field: 0.5,
            turbulence_strength: 0.05,
            turbulence_scale: 0.1,
            antimatter_burst_chance: 0.001,
            antimatter_burst_strength: 2.0,
            orbit_tolerance: 0.3,
            orbit_detection: OrbitDetection::AnyWell,
        }
    }
}

impl PhysicsConfig {
    /// Check the constants the force model divides by or depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.gravitational_constant > 0.0) {
            return Err(invalid("gravitational_constant must be > 0"));
        }
        if !(self.min_distance > 0.0) {
            return Err(invalid("min_distance must be > 0"));
        }
        if !(self.cohesion_distance > 0.0) {
            return Err(invalid("cohesion_distance must be > 0"));
        }
        if !(self.light_speed > 0.0) {
            return Err(invalid("light_speed must be > 0"));
        }
        if !(self.drag > 0.0 && self.drag <= 1.0) {
            return Err(invalid("drag must be in (0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.antimatter_burst_chance) {
            return Err(invalid("antimatter_burst_chance must be in [0, 1]"));
        }
        if !(self.orbit_tolerance >= 0.0) {
            return Err(invalid("orbit_tolerance must be >= 0"));
        }
        Ok(())
    }
}

/// Particle pool sizing and lifetime policy.
///
/// These are the quality knobs a performance monitor may turn; they bound
/// the simulation but never change the force formulas.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Maximum simultaneously live particles.
    pub capacity: usize,
    /// Shortest particle lifetime, in `delta_time` units.
    pub lifetime_min: f32,
    /// Longest particle lifetime, in `delta_time` units.
    pub lifetime_max: f32,
    /// Trail samples older than this many frames are dropped.
    pub max_trail_length: u32,
    /// Seed for the simulation RNG. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: 10_000,
            lifetime_min: 10.0,
            lifetime_max: 20.0,
            max_trail_length: 20,
            seed: None,
        }
    }
}

impl PoolConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(invalid("capacity must be > 0"));
        }
        if !(self.lifetime_min > 0.0) || !(self.lifetime_max >= self.lifetime_min) {
            return Err(invalid("lifetime range must satisfy 0 < lifetime_min <= lifetime_max"));
        }
        Ok(())
    }
}

fn default_active() -> bool {
    true
}

/// A gravity well placed at scenario start.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WellPlacement {
    pub position: Vec3,
    pub mass: f32,
    pub radius: f32,
    pub kind: WellKind,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl WellPlacement {
    /// Build the well this placement describes.
    pub fn to_well(&self, physics: &PhysicsConfig) -> GravityWell {
        let mut well = GravityWell::new(self.position, self.mass, self.radius, self.kind, physics);
        well.set_active(self.active);
        well
    }
}

fn default_name() -> String {
    "Untitled".into()
}

/// Complete simulation configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub pool: PoolConfig,
    /// Wells present when the scenario starts.
    #[serde(default)]
    pub wells: Vec<WellPlacement>,
    /// Emitters launching liquid streams every frame.
    #[serde(default)]
    pub emitters: Vec<Emitter>,
}

impl SimConfig {
    /// Parse and validate configuration JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!(
            "loaded scenario '{}' from {} ({} wells, {} emitters)",
            config.name,
            path.display(),
            config.wells.len(),
            config.emitters.len()
        );
        Ok(config)
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.physics.validate()?;
        self.pool.validate()?;
        for (i, well) in self.wells.iter().enumerate() {
            if !(well.mass > 0.0) || !(well.radius > 0.0) {
                return Err(invalid(&format!("well {} must have mass > 0 and radius > 0", i)));
            }
        }
        for (i, emitter) in self.emitters.iter().enumerate() {
            emitter
                .validate()
                .map_err(|msg| invalid(&format!("emitter {}: {}", i, msg)))?;
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            physics: PhysicsConfig::default(),
            pool: PoolConfig::default(),
            wells: Vec::new(),
            emitters: Vec::new(),
        }
    }
}

fn invalid(msg: &str) -> ConfigError {
    ConfigError::Invalid(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::liquid::LiquidType;

    #[test]
    fn test_defaults_validate() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimConfig::from_json(
            r#"{
                "name": "tiny",
                "pool": { "capacity": 64 },
                "physics": { "surface_tension": 0.2 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.name, "tiny");
        assert_eq!(config.pool.capacity, 64);
        assert_eq!(config.pool.max_trail_length, 20);
        assert_eq!(config.physics.surface_tension, 0.2);
        assert_eq!(config.physics.gravitational_constant, 1.0);
        assert_eq!(config.physics.orbit_detection, OrbitDetection::AnyWell);
    }

    #[test]
    fn test_wells_parse_with_unknown_kind_fallback() {
        let config = SimConfig::from_json(
            r#"{
                "wells": [
                    { "position": [0.0, 0.0, 0.0], "mass": 100.0, "radius": 2.0, "kind": "blackhole" },
                    { "position": [5.0, 0.0, 0.0], "mass": 10.0, "radius": 1.0, "kind": "quasar", "active": false }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.wells.len(), 2);
        assert_eq!(config.wells[0].kind, WellKind::BlackHole);
        assert!(config.wells[0].active);
        assert_eq!(config.wells[1].kind, WellKind::Star);
        assert!(!config.wells[1].active);
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let err = SimConfig::from_json(r#"{ "pool": { "capacity": 0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_inverted_lifetime() {
        let err = SimConfig::from_json(r#"{ "pool": { "lifetime_min": 5.0, "lifetime_max": 1.0 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_non_positive_gravity() {
        let mut config = SimConfig::default();
        config.physics.gravitational_constant = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_well() {
        let mut config = SimConfig::default();
        config.wells.push(WellPlacement {
            position: Vec3::ZERO,
            mass: -5.0,
            radius: 1.0,
            kind: WellKind::Planet,
            active: true,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = SimConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("gravflow-{}-{}.json", std::process::id(), name))
    }

    #[test]
    fn test_save_then_load() {
        let mut config = SimConfig {
            name: "binary".into(),
            ..SimConfig::default()
        };
        config.pool.capacity = 512;
        config.pool.seed = Some(11);
        config.physics.orbit_detection = OrbitDetection::LastWellWins;
        config.wells.push(WellPlacement {
            position: Vec3::new(-15.0, 0.0, 0.0),
            mass: 150.0,
            radius: 2.0,
            kind: WellKind::Neutron,
            active: false,
        });
        config.emitters.push(Emitter::Stream {
            position: Vec3::new(0.0, -20.0, 0.0),
            velocity: Vec3::new(0.0, 2.0, 0.0),
            rate: 40.0,
            liquid: LiquidType::Photonic,
        });

        let path = temp_path("roundtrip");
        config.save(&path).unwrap();
        let loaded = SimConfig::load(&path);
        let _ = fs::remove_file(&path);

        assert_eq!(loaded.unwrap(), config);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = SimConfig::load(temp_path("does-not-exist")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_rejects_bad_emitter() {
        let err = SimConfig::from_json(
            r#"{ "emitters": [{ "type": "point", "position": [0, 0, 0], "rate": -3, "speed": 1 }] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_orbit_detection_names() {
        let parsed: OrbitDetection = serde_json::from_str("\"last_well_wins\"").unwrap();
        assert_eq!(parsed, OrbitDetection::LastWellWins);
    }
}
