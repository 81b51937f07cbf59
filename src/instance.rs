//! Packed render records.
//!
//! The physics state lives in [`LiquidParticle`] and [`GravityWell`]. These
//! `#[repr(C)]` records are a derived view for upload to a GPU instance
//! buffer with [`bytemuck::cast_slice`]; nothing reads them back.

use crate::particle::LiquidParticle;
use crate::well::GravityWell;
use bytemuck::{Pod, Zeroable};

/// Bit set in [`ParticleInstance::flags`] while the particle is in orbit.
pub const FLAG_IN_ORBIT: u32 = 1 << 0;
/// Bit set in [`ParticleInstance::flags`] once a quantum particle collapsed.
pub const FLAG_COLLAPSED: u32 = 1 << 1;

/// One live particle, 64 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    pub position: [f32; 3],
    pub size: f32,
    pub velocity: [f32; 3],
    pub alpha: f32,
    pub color: [f32; 3],
    pub glow: f32,
    pub liquid: u32,
    pub flags: u32,
    pub trail_len: u32,
    pub _pad: u32,
}

impl From<&LiquidParticle> for ParticleInstance {
    fn from(p: &LiquidParticle) -> Self {
        let mut flags = 0;
        if p.in_orbit {
            flags |= FLAG_IN_ORBIT;
        }
        if p.extended.collapsed {
            flags |= FLAG_COLLAPSED;
        }
        Self {
            position: p.position.to_array(),
            size: p.size,
            velocity: p.velocity.to_array(),
            alpha: p.alpha,
            color: p.liquid.properties().color,
            glow: p.glow,
            liquid: p.liquid.into(),
            flags,
            trail_len: p.trail.len() as u32,
            _pad: 0,
        }
    }
}

/// One gravity well with its zones and last-pass counts, 48 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct WellInstance {
    pub position: [f32; 3],
    pub radius: f32,
    pub event_horizon: f32,
    pub danger_zone: f32,
    pub influence_zone: f32,
    pub kind: u32,
    pub captured: u32,
    pub orbiting: u32,
    pub influenced: u32,
    pub active: u32,
}

impl From<&GravityWell> for WellInstance {
    fn from(w: &GravityWell) -> Self {
        Self {
            position: w.position().to_array(),
            radius: w.radius(),
            event_horizon: w.event_horizon(),
            danger_zone: w.danger_zone(),
            influence_zone: w.influence_zone(),
            kind: w.kind().into(),
            captured: w.captured_count(),
            orbiting: w.orbiting_count(),
            influenced: w.influenced_count(),
            active: w.is_active() as u32,
        }
    }
}
