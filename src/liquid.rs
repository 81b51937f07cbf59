//! Liquid types and their physical properties.
//!
//! Every particle belongs to one [`LiquidType`]. The type selects an
//! immutable [`LiquidProperties`] record from a static table, so adding a
//! type is a data change: one enum variant plus one table row.
//!
//! | Type | Viscosity | Mass | Flags |
//! |------|-----------|------|-------|
//! | plasma | 0.998 | 1.0 | - |
//! | crystal | 0.95 | 2.0 | - |
//! | temporal | 0.99 | 0.8 | - |
//! | antimatter | 0.997 | 1.0 | `anti_gravity` |
//! | quantum | 0.995 | 0.5 | `quantum_state` |
//! | dark | 0.985 | 3.0 | - |
//! | exotic | 0.99 | -1.0 | `exotic` |
//! | photonic | 0.999 | 0.1 | `light_speed` |
//!
//! # Negative Mass
//!
//! Exotic liquid has **negative mass**. Its gravitational force
//! `G·M·m/d²` is negative while its inertia is `|m|`, so it accelerates
//! *away* from every positive-mass well. This is a game mechanic, not a
//! sign bug.

use gravflow_derive::EnumTable;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The liquid a particle is made of.
///
/// Unknown names resolve to [`LiquidType::Plasma`], the first variant.
#[derive(EnumTable, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LiquidType {
    #[default]
    Plasma,
    Crystal,
    Temporal,
    Antimatter,
    Quantum,
    Dark,
    Exotic,
    Photonic,
}

/// Behavioral flags carried by a liquid type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LiquidFlags {
    /// Gravity pushes instead of pulls, at half strength.
    pub anti_gravity: bool,
    /// Subject to uncertainty jitter in the extended effects stage.
    pub quantum_state: bool,
    /// Negative-mass material.
    pub exotic: bool,
    /// Speed capped (and driven) toward light speed in the extended effects stage.
    pub light_speed: bool,
}

/// Immutable physical constants for one liquid type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LiquidProperties {
    /// Per-frame velocity scale factor in (0, 1].
    pub viscosity: f32,
    /// Gravitational mass. Negative for exotic liquid.
    pub mass: f32,
    /// How strongly rotating magnetic fields (neutron wells) act on this liquid.
    pub magnetic_susceptibility: f32,
    /// Base glow intensity for rendering.
    pub glow_intensity: f32,
    /// Base render size.
    pub base_size: f32,
    /// Base RGB color, 0.0-1.0.
    pub color: [f32; 3],
    pub flags: LiquidFlags,
}

const NO_FLAGS: LiquidFlags = LiquidFlags {
    anti_gravity: false,
    quantum_state: false,
    exotic: false,
    light_speed: false,
};

static LIQUID_TABLE: [LiquidProperties; LiquidType::count() as usize] = [
    // Plasma
    LiquidProperties {
        viscosity: 0.998,
        mass: 1.0,
        magnetic_susceptibility: 1.0,
        glow_intensity: 1.5,
        base_size: 0.5,
        color: [1.0, 0.35, 0.1],
        flags: NO_FLAGS,
    },
    // Crystal
    LiquidProperties {
        viscosity: 0.95,
        mass: 2.0,
        magnetic_susceptibility: 0.1,
        glow_intensity: 0.8,
        base_size: 0.6,
        color: [0.55, 0.85, 1.0],
        flags: NO_FLAGS,
    },
    // Temporal
    LiquidProperties {
        viscosity: 0.99,
        mass: 0.8,
        magnetic_susceptibility: 0.3,
        glow_intensity: 1.2,
        base_size: 0.45,
        color: [0.75, 0.3, 1.0],
        flags: NO_FLAGS,
    },
    // Antimatter
    LiquidProperties {
        viscosity: 0.997,
        mass: 1.0,
        magnetic_susceptibility: 1.5,
        glow_intensity: 2.0,
        base_size: 0.5,
        color: [1.0, 0.1, 0.55],
        flags: LiquidFlags {
            anti_gravity: true,
            ..NO_FLAGS
        },
    },
    // Quantum
    LiquidProperties {
        viscosity: 0.995,
        mass: 0.5,
        magnetic_susceptibility: 0.6,
        glow_intensity: 1.4,
        base_size: 0.35,
        color: [0.2, 1.0, 0.6],
        flags: LiquidFlags {
            quantum_state: true,
            ..NO_FLAGS
        },
    },
    // Dark
    LiquidProperties {
        viscosity: 0.985,
        mass: 3.0,
        magnetic_susceptibility: 0.0,
        glow_intensity: 0.3,
        base_size: 0.7,
        color: [0.15, 0.1, 0.3],
        flags: NO_FLAGS,
    },
    // Exotic
    LiquidProperties {
        viscosity: 0.99,
        mass: -1.0,
        magnetic_susceptibility: 0.8,
        glow_intensity: 1.8,
        base_size: 0.5,
        color: [1.0, 0.9, 0.2],
        flags: LiquidFlags {
            exotic: true,
            ..NO_FLAGS
        },
    },
    // Photonic
    LiquidProperties {
        viscosity: 0.999,
        mass: 0.1,
        magnetic_susceptibility: 0.05,
        glow_intensity: 2.5,
        base_size: 0.3,
        color: [1.0, 1.0, 0.95],
        flags: LiquidFlags {
            light_speed: true,
            ..NO_FLAGS
        },
    },
];

impl LiquidType {
    /// The immutable property record for this liquid.
    #[inline]
    pub fn properties(self) -> &'static LiquidProperties {
        &LIQUID_TABLE[u32::from(self) as usize]
    }
}

impl Serialize for LiquidType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for LiquidType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(LiquidType::try_from_name(&name).unwrap_or_else(|| {
            log::warn!("unknown liquid type '{}', using {}", name, LiquidType::Plasma.name());
            LiquidType::Plasma
        }))
    }
}
