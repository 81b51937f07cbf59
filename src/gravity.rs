//! The ordered collection of gravity wells.
//!
//! [`GravitySystem`] owns every well, sums their fields, and runs the
//! per-frame well pass. Wells are addressed by a stable [`WellId`] and kept
//! in insertion order; that order is the only ordering guarantee.
//!
//! # Disposal
//!
//! Renderers usually attach GPU resources to each well. Register a hook
//! with [`GravitySystem::with_dispose_hook`]; it runs exactly once for
//! every well that leaves the system through [`remove`](GravitySystem::remove)
//! or [`clear`](GravitySystem::clear). The removed well is moved out, so the
//! system cannot touch it afterwards.

use crate::config::{PhysicsConfig, WellPlacement};
use crate::particle::LiquidParticle;
use crate::vector::sanitize;
use crate::well::{GravityWell, WellKind};
use glam::Vec3;

/// Stable identifier of a well inside a [`GravitySystem`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WellId(u32);

impl WellId {
    /// Raw numeric id, unique for the lifetime of the system.
    pub fn raw(self) -> u32 {
        self.0
    }
}

type DisposeHook = Box<dyn FnMut(WellId, &GravityWell) + Send>;

/// Ordered set of gravity wells.
pub struct GravitySystem {
    physics: PhysicsConfig,
    wells: Vec<(WellId, GravityWell)>,
    next_id: u32,
    dispose_hook: Option<DisposeHook>,
}

impl GravitySystem {
    /// Create an empty system whose placed wells derive their zones from `physics`.
    pub fn new(physics: PhysicsConfig) -> Self {
        Self {
            physics,
            wells: Vec::new(),
            next_id: 0,
            dispose_hook: None,
        }
    }

    /// Create a system pre-populated from scenario placements.
    pub fn from_placements(physics: PhysicsConfig, placements: &[WellPlacement]) -> Self {
        let mut system = Self::new(physics);
        for placement in placements {
            let well = placement.to_well(&system.physics);
            system.add(well);
        }
        system
    }

    /// Register the callback run when a well is removed or cleared.
    pub fn with_dispose_hook<F>(mut self, hook: F) -> Self
    where
        F: FnMut(WellId, &GravityWell) + Send + 'static,
    {
        self.dispose_hook = Some(Box::new(hook));
        self
    }

    /// Physics constants used for placed wells.
    pub fn physics(&self) -> &PhysicsConfig {
        &self.physics
    }

    /// Add a well. It goes last in iteration order.
    pub fn add(&mut self, well: GravityWell) -> WellId {
        let id = WellId(self.next_id);
        self.next_id += 1;
        log::debug!(
            "well {} added: {} mass={} radius={} at {:?}",
            id.0,
            well.kind().name(),
            well.mass(),
            well.radius(),
            well.position()
        );
        self.wells.push((id, well));
        id
    }

    /// Build and add a well from a placement request.
    ///
    /// A non-finite position is sanitized to finite components.
    pub fn place(&mut self, position: Vec3, mass: f32, radius: f32, kind: WellKind) -> WellId {
        let (position, changed) = sanitize(position);
        if changed {
            log::warn!("non-finite well position replaced with {:?}", position);
        }
        let well = GravityWell::new(position, mass, radius, kind, &self.physics);
        self.add(well)
    }

    /// Remove a well, running the dispose hook. Returns `None` for an unknown id.
    pub fn remove(&mut self, id: WellId) -> Option<GravityWell> {
        let index = self.wells.iter().position(|(wid, _)| *wid == id)?;
        let (id, well) = self.wells.remove(index);
        if let Some(hook) = self.dispose_hook.as_mut() {
            hook(id, &well);
        }
        log::debug!("well {} removed", id.0);
        Some(well)
    }

    /// Remove every well, running the dispose hook for each in order.
    pub fn clear(&mut self) {
        for (id, well) in self.wells.drain(..) {
            if let Some(hook) = self.dispose_hook.as_mut() {
                hook(id, &well);
            }
        }
    }

    pub fn get(&self, id: WellId) -> Option<&GravityWell> {
        self.wells.iter().find(|(wid, _)| *wid == id).map(|(_, w)| w)
    }

    pub fn get_mut(&mut self, id: WellId) -> Option<&mut GravityWell> {
        self.wells.iter_mut().find(|(wid, _)| *wid == id).map(|(_, w)| w)
    }

    /// Toggle a well. Returns `false` for an unknown id.
    pub fn set_active(&mut self, id: WellId, active: bool) -> bool {
        match self.get_mut(id) {
            Some(well) => {
                well.set_active(active);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.wells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wells.is_empty()
    }

    /// All wells with their ids, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (WellId, &GravityWell)> {
        self.wells.iter().map(|(id, w)| (*id, w))
    }

    /// Active wells in insertion order.
    pub fn active(&self) -> impl Iterator<Item = &GravityWell> {
        self.wells.iter().map(|(_, w)| w).filter(|w| w.is_active())
    }

    /// Sum of every active well's acceleration at `position` for a body of `query_mass`.
    pub fn total_field(&self, position: Vec3, query_mass: f32) -> Vec3 {
        self.active()
            .fold(Vec3::ZERO, |acc, w| acc + w.acceleration_at(position, query_mass))
    }

    /// Run the well pass over a batch of particles.
    ///
    /// Ages every well, recounts captured/orbiting/influenced particles and
    /// applies each kind's side effects. A particle destroyed by one well
    /// is skipped by the wells after it.
    pub fn update<'a, I>(&mut self, particles: I, delta_time: f32)
    where
        I: IntoIterator<Item = &'a mut LiquidParticle>,
    {
        for (_, well) in self.wells.iter_mut() {
            well.begin_pass(delta_time);
        }
        for particle in particles {
            for (_, well) in self.wells.iter_mut() {
                if !particle.alive {
                    break;
                }
                well.apply_effects(particle, delta_time);
            }
        }
    }
}

impl Default for GravitySystem {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

impl std::fmt::Debug for GravitySystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GravitySystem")
            .field("wells", &self.wells)
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}
