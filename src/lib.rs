//! # gravflow - Gravity-Well Liquid Particle Simulation
//!
//! Streams of typed liquid particles flowing through a field of gravity
//! wells. Wells pull (or, for exotic liquid, push) particles, trap them in
//! orbits and, for black holes, swallow them.
//!
//! gravflow is the physics core only. It is single-threaded, frame-driven
//! and renderer-agnostic: each frame produces particle and well state, plus
//! packed [`ParticleInstance`]/[`WellInstance`] records ready for upload.
//!
//! ## Quick Start
//!
//! ```ignore
//! use gravflow::prelude::*;
//!
//! let physics = PhysicsConfig::default();
//! let mut wells = GravitySystem::new(physics);
//! wells.place(Vec3::ZERO, 100.0, 2.0, WellKind::Star);
//!
//! let mut sim = ParticleSimulation::new(physics, PoolConfig::default());
//! sim.spawn(SpawnRequest::new(
//!     Vec3::new(20.0, 0.0, 0.0),
//!     Vec3::new(0.0, 5f32.sqrt(), 0.0),
//!     LiquidType::Plasma,
//! ));
//!
//! for _ in 0..60 {
//!     sim.update(1.0 / 60.0, &mut wells);
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Liquids
//!
//! Every particle is one of eight [`LiquidType`]s. The type picks viscosity,
//! mass, glow and behavior flags from an immutable table. See
//! [`liquid`] for the full table.
//!
//! ### Wells
//!
//! A [`GravityWell`] is a fixed point mass with derived zones (event
//! horizon, stable orbit, danger, influence). Its [`WellKind`] adds a side
//! effect: black holes swallow, neutron stars magnetize, stars blow a wind.
//!
//! ### Frames
//!
//! [`ParticleSimulation::update`] runs emitters, updates every particle
//! against a pre-update neighbor snapshot, applies optional
//! [`ExtendedEffects`], then lets the [`GravitySystem`] run its well pass.
//!
//! ## Feature Overview
//!
//! | Category | Types |
//! |----------|-------|
//! | Physics | [`LiquidParticle`], [`GravityWell`], [`GravitySystem`] |
//! | Pool | [`ParticleSimulation`], [`ParticleHandle`], [`SpawnRequest`] |
//! | Spawning | [`Emitter`], [`Lifecycle`], [`SpawnContext`] |
//! | Config | [`SimConfig`], [`PhysicsConfig`], [`PoolConfig`] |
//! | Extensions | [`ExtendedEffects`], [`QuantumEffects`] |
//! | Rendering | [`ParticleInstance`], [`WellInstance`] |
//! | Timing | [`FrameClock`] |

pub mod config;
pub mod emitter;
mod error;
pub mod extensions;
pub mod gravity;
pub mod instance;
pub mod lifecycle;
pub mod liquid;
pub mod noise;
pub mod particle;
mod simulation;
pub mod spatial;
pub mod spawn;
pub mod time;
pub mod vector;
pub mod well;

pub use bytemuck;
pub use config::{OrbitDetection, PhysicsConfig, PoolConfig, SimConfig, WellPlacement};
pub use emitter::{Emitter, EmitterState};
pub use error::ConfigError;
pub use extensions::{ExtendedEffects, ExtendedState, QuantumEffects};
pub use glam::Vec3;
pub use gravflow_derive::EnumTable;
pub use gravity::{GravitySystem, WellId};
pub use instance::{ParticleInstance, WellInstance};
pub use lifecycle::Lifecycle;
pub use liquid::{LiquidFlags, LiquidProperties, LiquidType};
pub use particle::{LiquidParticle, Neighbor, StepContext, TrailSample};
pub use simulation::{ParticleHandle, ParticleSimulation, SimulationStats};
pub use spawn::{SpawnContext, SpawnRequest};
pub use time::FrameClock;
pub use well::{GravityWell, WellKind, ZoneClassification};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use gravflow::prelude::*;
/// ```
///
/// This imports the pool, the gravity system, configuration records,
/// liquid and well types, emitters and [`Vec3`].
pub mod prelude {
    pub use crate::config::{OrbitDetection, PhysicsConfig, PoolConfig, SimConfig};
    pub use crate::emitter::Emitter;
    pub use crate::extensions::{ExtendedEffects, QuantumEffects};
    pub use crate::gravity::{GravitySystem, WellId};
    pub use crate::lifecycle::Lifecycle;
    pub use crate::liquid::LiquidType;
    pub use crate::particle::LiquidParticle;
    pub use crate::simulation::{ParticleHandle, ParticleSimulation};
    pub use crate::spawn::SpawnRequest;
    pub use crate::time::FrameClock;
    pub use crate::well::{GravityWell, WellKind};
    pub use crate::Vec3;
}
