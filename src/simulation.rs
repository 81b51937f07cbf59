//! The particle pool and frame loop.
//!
//! [`ParticleSimulation`] owns a fixed-capacity pool of particle slots.
//! Spawning never fails: when every slot is busy, the particle activated
//! longest ago is evicted to make room. Callers hold generational
//! [`ParticleHandle`]s, so a handle to an evicted or expired particle
//! resolves to `None` instead of aliasing whatever reuses its slot.
//!
//! # Frame Order
//!
//! [`ParticleSimulation::update`] runs, in order:
//!
//! 1. Emitters push this frame's spawn requests.
//! 2. Positions of all live particles are snapshotted into a spatial grid.
//! 3. Each live particle updates, reading neighbors from the snapshot.
//! 4. Extended effects run on particles that survived.
//! 5. Particles that died are released and their slots zeroed.
//! 6. The gravity system's well pass runs over the survivors.
//! 7. Particles killed by wells are released.

use crate::config::{PhysicsConfig, PoolConfig, SimConfig};
use crate::emitter::{Emitter, EmitterState};
use crate::extensions::ExtendedEffects;
use crate::gravity::GravitySystem;
use crate::instance::ParticleInstance;
use crate::lifecycle::Lifecycle;
use crate::particle::{LiquidParticle, Neighbor, StepContext};
use crate::spatial::{SpatialConfig, SpatialGrid};
use crate::spawn::{SpawnContext, SpawnRequest};
use crate::vector::sanitize;
use glam::Vec3;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::VecDeque;

/// Generational reference to a pooled particle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ParticleHandle {
    slot: u32,
    generation: u32,
}

impl ParticleHandle {
    /// Pool slot index. Slots are reused; compare whole handles, not slots.
    pub fn slot(self) -> usize {
        self.slot as usize
    }
}

/// Counters describing the pool after the last update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimulationStats {
    pub frame: u64,
    pub active: usize,
    pub capacity: usize,
    pub in_orbit: usize,
    pub spawned: u64,
    pub evicted: u64,
    pub expired: u64,
}

/// Fixed-capacity pool of liquid particles.
pub struct ParticleSimulation {
    physics: PhysicsConfig,
    capacity: usize,
    lifecycle: Lifecycle,
    rng: SmallRng,

    slots: Vec<LiquidParticle>,
    occupied: Vec<bool>,
    generations: Vec<u32>,
    activated_at: Vec<u64>,
    free: Vec<u32>,
    /// (slot, activation sequence) in activation order. Entries whose
    /// sequence no longer matches the slot are stale and skipped.
    activation_order: VecDeque<(u32, u64)>,
    next_activation: u64,
    active: usize,

    emitters: Vec<EmitterState>,
    extensions: Vec<Box<dyn ExtendedEffects>>,

    grid: SpatialGrid,
    snapshot_slots: Vec<u32>,
    snapshot: Vec<Neighbor>,
    snapshot_positions: Vec<Vec3>,
    neighbors: Vec<Neighbor>,
    pending: Vec<SpawnRequest>,

    stats: SimulationStats,
}

impl ParticleSimulation {
    /// Create an empty pool.
    ///
    /// A zero capacity is raised to 1.
    pub fn new(physics: PhysicsConfig, pool: PoolConfig) -> Self {
        let capacity = if pool.capacity == 0 {
            log::warn!("particle capacity 0 raised to 1");
            1
        } else {
            pool.capacity
        };
        let rng = match pool.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let cell_size = if physics.cohesion_distance > 0.0 {
            physics.cohesion_distance
        } else {
            SpatialConfig::default().cell_size
        };

        Self {
            physics,
            capacity,
            lifecycle: Lifecycle::from_pool(&pool),
            rng,
            slots: Vec::new(),
            occupied: Vec::new(),
            generations: Vec::new(),
            activated_at: Vec::new(),
            free: Vec::new(),
            activation_order: VecDeque::new(),
            next_activation: 0,
            active: 0,
            emitters: Vec::new(),
            extensions: Vec::new(),
            grid: SpatialGrid::new(SpatialConfig::with_cell_size(cell_size)),
            snapshot_slots: Vec::new(),
            snapshot: Vec::new(),
            snapshot_positions: Vec::new(),
            neighbors: Vec::new(),
            pending: Vec::new(),
            stats: SimulationStats {
                capacity,
                ..SimulationStats::default()
            },
        }
    }

    /// Create a pool with the scenario's physics, pool settings and emitters.
    pub fn from_config(config: &SimConfig) -> Self {
        let mut sim = Self::new(config.physics, config.pool);
        for emitter in &config.emitters {
            sim.add_emitter(emitter.clone());
        }
        sim
    }

    pub fn with_lifecycle(mut self, lifecycle: Lifecycle) -> Self {
        self.lifecycle = lifecycle;
        self
    }

    pub fn with_emitter(mut self, emitter: Emitter) -> Self {
        self.add_emitter(emitter);
        self
    }

    /// Install a post-update stage. Stages run in installation order.
    pub fn with_extension<E: ExtendedEffects + 'static>(mut self, stage: E) -> Self {
        self.extensions.push(Box::new(stage));
        self
    }

    pub fn add_emitter(&mut self, emitter: Emitter) {
        if let Err(msg) = emitter.validate() {
            log::warn!("emitter {:?}: {}", emitter, msg);
        }
        self.emitters.push(EmitterState::new(emitter));
    }

    pub fn clear_emitters(&mut self) {
        self.emitters.clear();
    }

    pub fn physics(&self) -> &PhysicsConfig {
        &self.physics
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Live particles.
    pub fn active_count(&self) -> usize {
        self.active
    }

    pub fn stats(&self) -> SimulationStats {
        self.stats
    }

    // =========================================================================
    // SPAWNING
    // =========================================================================

    /// Activate a particle. Never fails; evicts the oldest particle when full.
    ///
    /// Non-finite position or velocity components are replaced with 0.
    pub fn spawn(&mut self, request: SpawnRequest) -> ParticleHandle {
        let (position, bad_position) = sanitize(request.position);
        let (velocity, bad_velocity) = sanitize(request.velocity);
        if bad_position || bad_velocity {
            log::warn!(
                "non-finite spawn request sanitized: position {:?}, velocity {:?}",
                request.position,
                request.velocity
            );
        }

        let slot = self.acquire_slot();
        let max_age = self.lifecycle.sample(&mut SpawnContext::new(&mut self.rng));

        let particle = &mut self.slots[slot];
        particle.respawn(position, velocity, request.liquid, max_age);
        if let Some(mass) = request.mass {
            if mass.is_finite() {
                particle.mass = mass;
            } else {
                log::warn!("non-finite spawn mass {} ignored", mass);
            }
        }

        let activation = self.next_activation;
        self.next_activation += 1;
        self.occupied[slot] = true;
        self.activated_at[slot] = activation;
        self.activation_order.push_back((slot as u32, activation));
        self.active += 1;
        self.stats.spawned += 1;
        self.compact_activation_order();

        ParticleHandle {
            slot: slot as u32,
            generation: self.generations[slot],
        }
    }

    fn acquire_slot(&mut self) -> usize {
        if let Some(slot) = self.free.pop() {
            return slot as usize;
        }
        if self.slots.len() < self.capacity {
            self.slots.push(LiquidParticle::default());
            self.occupied.push(false);
            self.generations.push(0);
            self.activated_at.push(0);
            return self.slots.len() - 1;
        }

        let slot = self.oldest_active();
        log::debug!("pool full ({}), evicting particle in slot {}", self.capacity, slot);
        self.retire(slot);
        self.stats.evicted += 1;
        slot
    }

    /// Slot of the particle activated longest ago.
    fn oldest_active(&mut self) -> usize {
        while let Some((slot, activation)) = self.activation_order.pop_front() {
            let slot = slot as usize;
            if self.occupied[slot] && self.activated_at[slot] == activation {
                return slot;
            }
        }
        // Every occupied slot has a queue entry, so this is only reached
        // when the queue and the slots disagree.
        self.occupied.iter().position(|&o| o).unwrap_or(0)
    }

    fn compact_activation_order(&mut self) {
        if self.activation_order.len() <= self.capacity * 2 {
            return;
        }
        let occupied = &self.occupied;
        let activated_at = &self.activated_at;
        self.activation_order
            .retain(|&(slot, activation)| occupied[slot as usize] && activated_at[slot as usize] == activation);
    }

    /// Empty a slot without returning it to the free list.
    fn retire(&mut self, slot: usize) {
        if !self.occupied[slot] {
            return;
        }
        self.slots[slot].reset();
        self.occupied[slot] = false;
        self.generations[slot] = self.generations[slot].wrapping_add(1);
        self.active -= 1;
    }

    fn release(&mut self, slot: usize) {
        if self.occupied[slot] {
            self.retire(slot);
            self.free.push(slot as u32);
        }
    }

    // =========================================================================
    // ACCESS
    // =========================================================================

    /// The live particle behind `handle`, or `None` if it expired or was evicted.
    pub fn get(&self, handle: ParticleHandle) -> Option<&LiquidParticle> {
        let slot = handle.slot();
        if self.is_current(handle) {
            Some(&self.slots[slot])
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, handle: ParticleHandle) -> Option<&mut LiquidParticle> {
        let slot = handle.slot();
        if self.is_current(handle) {
            Some(&mut self.slots[slot])
        } else {
            None
        }
    }

    fn is_current(&self, handle: ParticleHandle) -> bool {
        let slot = handle.slot();
        slot < self.slots.len()
            && self.occupied[slot]
            && self.generations[slot] == handle.generation
            && self.slots[slot].alive
    }

    /// Release one particle immediately. Returns `false` for a stale handle.
    pub fn despawn(&mut self, handle: ParticleHandle) -> bool {
        if !self.is_current(handle) {
            return false;
        }
        self.release(handle.slot());
        true
    }

    /// Retire every particle immediately.
    pub fn clear(&mut self) {
        for slot in 0..self.slots.len() {
            self.release(slot);
        }
        self.activation_order.clear();
        for state in &mut self.emitters {
            state.reset();
        }
    }

    /// Live particles with their handles, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (ParticleHandle, &LiquidParticle)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(move |(slot, p)| self.occupied[*slot] && p.alive)
            .map(move |(slot, p)| {
                let handle = ParticleHandle {
                    slot: slot as u32,
                    generation: self.generations[slot],
                };
                (handle, p)
            })
    }

    /// Live particles in slot order.
    pub fn particles(&self) -> impl Iterator<Item = &LiquidParticle> + '_ {
        self.iter().map(|(_, p)| p)
    }

    /// Replace `out` with the render view of every live particle.
    pub fn write_instances(&self, out: &mut Vec<ParticleInstance>) {
        out.clear();
        out.extend(self.particles().map(ParticleInstance::from));
    }

    // =========================================================================
    // FRAME
    // =========================================================================

    /// Advance the simulation one frame.
    ///
    /// A negative or non-finite `delta_time` skips the frame. A zero
    /// `delta_time` (a paused clock) leaves every particle untouched.
    pub fn update(&mut self, delta_time: f32, wells: &mut GravitySystem) {
        if !delta_time.is_finite() || delta_time < 0.0 {
            log::warn!("skipping frame with invalid delta_time {}", delta_time);
            return;
        }
        if delta_time == 0.0 {
            return;
        }
        self.stats.frame += 1;

        self.run_emitters(delta_time);
        self.take_snapshot();
        self.particle_pass(delta_time, wells);
        self.reclaim_dead(true);

        wells.update(self.slots.iter_mut().filter(|p| p.alive), delta_time);
        self.reclaim_dead(false);

        self.stats.active = self.active;
        self.stats.in_orbit = self.particles().filter(|p| p.in_orbit).count();
    }

    fn run_emitters(&mut self, delta_time: f32) {
        if self.emitters.is_empty() {
            return;
        }
        let mut pending = std::mem::take(&mut self.pending);
        pending.clear();
        {
            let mut ctx = SpawnContext::new(&mut self.rng);
            for state in &mut self.emitters {
                let budget = self.capacity.saturating_sub(pending.len());
                state.emit(delta_time, budget, &mut ctx, &mut pending);
            }
        }
        for request in pending.drain(..) {
            self.spawn(request);
        }
        self.pending = pending;
    }

    fn take_snapshot(&mut self) {
        self.snapshot_slots.clear();
        self.snapshot.clear();
        self.snapshot_positions.clear();
        for (slot, p) in self.slots.iter().enumerate() {
            if self.occupied[slot] && p.alive {
                self.snapshot_slots.push(slot as u32);
                self.snapshot.push(Neighbor {
                    position: p.position,
                    liquid: p.liquid,
                });
                self.snapshot_positions.push(p.position);
            }
        }
        self.grid.set_cell_size(self.physics.cohesion_distance);
        self.grid.rebuild(&self.snapshot_positions);
    }

    fn particle_pass(&mut self, delta_time: f32, wells: &GravitySystem) {
        let reach_sq = self.physics.cohesion_distance * self.physics.cohesion_distance;
        let max_trail_length = self.lifecycle.max_trail_length();

        for k in 0..self.snapshot_slots.len() {
            let slot = self.snapshot_slots[k] as usize;
            let me = self.snapshot[k].position;

            self.neighbors.clear();
            let snapshot = &self.snapshot;
            let neighbors = &mut self.neighbors;
            self.grid.for_each_candidate(me, |j| {
                if j != k && snapshot[j].position.distance_squared(me) < reach_sq {
                    neighbors.push(snapshot[j]);
                }
            });

            let mut ctx = StepContext {
                delta_time,
                physics: &self.physics,
                wells,
                rng: &mut self.rng,
                max_trail_length,
            };
            let particle = &mut self.slots[slot];
            if particle.update(&mut ctx, &self.neighbors) {
                for stage in &mut self.extensions {
                    stage.apply_extended_effects(particle, delta_time);
                }
            }
        }
    }

    /// Release every snapshotted particle that is no longer alive.
    fn reclaim_dead(&mut self, expired: bool) {
        for k in 0..self.snapshot_slots.len() {
            let slot = self.snapshot_slots[k] as usize;
            if self.occupied[slot] && !self.slots[slot].alive {
                self.release(slot);
                if expired {
                    self.stats.expired += 1;
                }
            }
        }
    }
}

impl Default for ParticleSimulation {
    fn default() -> Self {
        Self::new(PhysicsConfig::default(), PoolConfig::default())
    }
}

impl std::fmt::Debug for ParticleSimulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticleSimulation")
            .field("capacity", &self.capacity)
            .field("active", &self.active)
            .field("emitters", &self.emitters.len())
            .field("extensions", &self.extensions.len())
            .finish_non_exhaustive()
    }
}

impl SimConfig {
    /// Build the pool and the gravity system this scenario describes.
    pub fn build(&self) -> (ParticleSimulation, GravitySystem) {
        let sim = ParticleSimulation::from_config(self);
        let wells = GravitySystem::from_placements(self.physics, &self.wells);
        (sim, wells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::liquid::LiquidType;
    use crate::well::WellKind;

    fn pool(capacity: usize) -> PoolConfig {
        PoolConfig {
            capacity,
            lifetime_min: 100.0,
            lifetime_max: 100.0,
            seed: Some(42),
            ..PoolConfig::default()
        }
    }

    fn request(x: f32) -> SpawnRequest {
        SpawnRequest::new(Vec3::new(x, 0.0, 0.0), Vec3::ZERO, LiquidType::Dark)
    }

    #[test]
    fn test_pool_never_exceeds_capacity_and_evicts_oldest() {
        let mut sim = ParticleSimulation::new(PhysicsConfig::default(), pool(10));
        let handles: Vec<_> = (0..15).map(|i| sim.spawn(request(i as f32 * 10.0))).collect();

        assert_eq!(sim.active_count(), 10);
        for h in &handles[..5] {
            assert!(sim.get(*h).is_none());
        }
        for (i, h) in handles[5..].iter().enumerate() {
            let p = sim.get(*h).unwrap();
            assert_eq!(p.position.x, (i + 5) as f32 * 10.0);
        }
        assert_eq!(sim.stats().evicted, 5);
    }

    #[test]
    fn test_eviction_follows_activation_not_slot_order() {
        let mut sim = ParticleSimulation::new(PhysicsConfig::default(), pool(3));
        let a = sim.spawn(request(0.0));
        let b = sim.spawn(request(10.0));
        let c = sim.spawn(request(20.0));

        // Freeing `a` and respawning makes its slot the newest.
        assert!(sim.despawn(a));
        let d = sim.spawn(request(30.0));
        assert_eq!(d.slot(), a.slot());

        let e = sim.spawn(request(40.0));
        assert!(sim.get(b).is_none());
        assert!(sim.get(c).is_some());
        assert!(sim.get(d).is_some());
        assert!(sim.get(e).is_some());
    }

    #[test]
    fn test_stale_handle_after_reuse() {
        let mut sim = ParticleSimulation::new(PhysicsConfig::default(), pool(1));
        let first = sim.spawn(request(1.0));
        let second = sim.spawn(request(2.0));

        assert_eq!(first.slot(), second.slot());
        assert_ne!(first, second);
        assert!(sim.get(first).is_none());
        assert_eq!(sim.get(second).unwrap().position.x, 2.0);
        assert!(!sim.despawn(first));
    }

    #[test]
    fn test_expired_slots_are_zeroed_and_reused() {
        let mut wells = GravitySystem::default();
        let config = PoolConfig {
            lifetime_min: 0.5,
            lifetime_max: 0.5,
            ..pool(4)
        };
        let mut sim = ParticleSimulation::new(PhysicsConfig::default(), config);
        let h = sim.spawn(SpawnRequest::new(Vec3::ONE, Vec3::X, LiquidType::Crystal));

        sim.update(0.3, &mut wells);
        assert!(sim.get(h).is_some());
        sim.update(0.3, &mut wells);

        assert!(sim.get(h).is_none());
        assert_eq!(sim.active_count(), 0);
        let slot = &sim.slots[h.slot()];
        assert!(!slot.alive);
        assert_eq!(slot.position, Vec3::ZERO);
        assert!(slot.trail.is_empty());
        assert_eq!(sim.stats().expired, 1);

        let again = sim.spawn(request(5.0));
        assert_eq!(again.slot(), h.slot());
    }

    #[test]
    fn test_update_with_no_wells() {
        let mut wells = GravitySystem::default();
        let mut sim = ParticleSimulation::new(PhysicsConfig::default(), pool(8));
        let h = sim.spawn(SpawnRequest::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), LiquidType::Dark));
        for _ in 0..10 {
            sim.update(0.1, &mut wells);
        }
        let p = sim.get(h).unwrap();
        assert!(p.position.x > 0.0);
        assert!(p.position.is_finite());
        assert!(!p.in_orbit);
    }

    #[test]
    fn test_black_hole_capture_releases_slot() {
        let physics = PhysicsConfig::default();
        let mut wells = GravitySystem::new(physics);
        wells.place(Vec3::ZERO, 500.0, 1.0, WellKind::BlackHole);
        let mut sim = ParticleSimulation::new(physics, pool(8));

        let inside = sim.spawn(SpawnRequest::new(Vec3::new(3.0, 0.0, 0.0), Vec3::ZERO, LiquidType::Dark));
        let outside = sim.spawn(SpawnRequest::new(Vec3::new(100.0, 0.0, 0.0), Vec3::ZERO, LiquidType::Dark));
        sim.update(1.0 / 60.0, &mut wells);

        assert!(sim.get(inside).is_none());
        assert!(sim.get(outside).is_some());
        assert_eq!(sim.active_count(), 1);
    }

    #[test]
    fn test_spawn_sanitizes_non_finite() {
        let mut sim = ParticleSimulation::new(PhysicsConfig::default(), pool(2));
        let h = sim.spawn(SpawnRequest::new(
            Vec3::new(f32::NAN, 1.0, f32::INFINITY),
            Vec3::new(1.0, f32::NEG_INFINITY, 0.0),
            LiquidType::Plasma,
        ));
        let p = sim.get(h).unwrap();
        assert_eq!(p.position, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(p.velocity, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_spawn_mass_override() {
        let mut sim = ParticleSimulation::new(PhysicsConfig::default(), pool(2));
        let h = sim.spawn(request(0.0).with_mass(7.5));
        assert_eq!(sim.get(h).unwrap().mass, 7.5);
    }

    #[test]
    fn test_clear_retires_everything() {
        let mut sim = ParticleSimulation::new(PhysicsConfig::default(), pool(5));
        let handles: Vec<_> = (0..5).map(|i| sim.spawn(request(i as f32))).collect();
        sim.clear();
        assert_eq!(sim.active_count(), 0);
        assert!(handles.iter().all(|h| sim.get(*h).is_none()));
        assert_eq!(sim.particles().count(), 0);

        // The pool is usable again at full capacity.
        for i in 0..5 {
            sim.spawn(request(i as f32));
        }
        assert_eq!(sim.active_count(), 5);
    }

    #[test]
    fn test_emitters_fill_pool() {
        let mut wells = GravitySystem::default();
        let mut sim = ParticleSimulation::new(PhysicsConfig::default(), pool(50)).with_emitter(Emitter::Stream {
            position: Vec3::ZERO,
            velocity: Vec3::X,
            rate: 60.0,
            liquid: LiquidType::Photonic,
        });
        for _ in 0..120 {
            sim.update(1.0 / 60.0, &mut wells);
        }
        assert_eq!(sim.active_count(), 50);
        assert!(sim.particles().all(|p| p.liquid == LiquidType::Photonic));
    }

    #[test]
    fn test_extension_stage_runs_on_survivors() {
        let mut wells = GravitySystem::default();
        let mut sim = ParticleSimulation::new(PhysicsConfig::default(), pool(4))
            .with_extension(|p: &mut LiquidParticle, _dt: f32| p.glow = 9.0);
        let h = sim.spawn(request(0.0));
        sim.update(0.1, &mut wells);
        assert_eq!(sim.get(h).unwrap().glow, 9.0);
    }

    #[test]
    fn test_activation_queue_stays_bounded() {
        let mut sim = ParticleSimulation::new(PhysicsConfig::default(), pool(4));
        for i in 0..1000 {
            let h = sim.spawn(request(i as f32));
            if i % 2 == 0 {
                sim.despawn(h);
            }
        }
        assert!(sim.activation_order.len() <= 2 * sim.capacity() + 1);
        assert!(sim.active_count() <= 4);
    }

    #[test]
    fn test_paused_clock_freezes_particles() {
        use crate::time::FrameClock;

        let mut wells = GravitySystem::new(PhysicsConfig::default());
        wells.place(Vec3::ZERO, 100.0, 2.0, WellKind::Star);
        let mut sim = ParticleSimulation::new(PhysicsConfig::default(), pool(4));
        let handle = sim.spawn(SpawnRequest::new(
            Vec3::new(20.0, 0.0, 0.0),
            Vec3::new(0.0, 3.0, 0.0),
            LiquidType::Dark,
        ));

        let mut clock = FrameClock::new().with_fixed_delta(1.0 / 60.0);
        for _ in 0..10 {
            sim.update(clock.tick(), &mut wells);
        }
        let before = sim.get(handle).unwrap().clone();
        let frames = sim.stats().frame;

        clock.pause();
        for _ in 0..120 {
            sim.update(clock.tick(), &mut wells);
        }

        let after = sim.get(handle).unwrap();
        assert_eq!(before.velocity, after.velocity);
        assert_eq!(before.position, after.position);
        assert_eq!(before.trail, after.trail);
        assert_eq!(before.age, after.age);
        assert_eq!(sim.stats().frame, frames);

        clock.resume();
        sim.update(clock.tick(), &mut wells);
        assert_ne!(sim.get(handle).unwrap().position, before.position);
    }

    #[test]
    fn test_emitters_spawn_at_most_capacity_per_frame() {
        let mut sim = ParticleSimulation::new(PhysicsConfig::default(), pool(16))
            .with_emitter(Emitter::Point {
                position: Vec3::ZERO,
                rate: 1.0e9,
                speed: 1.0,
                liquid: LiquidType::Plasma,
            })
            .with_emitter(Emitter::Burst {
                position: Vec3::X,
                count: 1_000_000,
                speed: 1.0,
                liquid: LiquidType::Dark,
            });
        let mut wells = GravitySystem::new(PhysicsConfig::default());
        sim.update(1.0 / 60.0, &mut wells);

        assert_eq!(sim.active_count(), 16);
        assert_eq!(sim.stats().spawned, 16);
        assert_eq!(sim.stats().evicted, 0);
    }

    #[test]
    fn test_write_instances() {
        let mut sim = ParticleSimulation::new(PhysicsConfig::default(), pool(4));
        sim.spawn(request(1.0));
        sim.spawn(request(2.0));
        let mut out = vec![ParticleInstance::default(); 10];
        sim.write_instances(&mut out);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_config_build() {
        let config = SimConfig::from_json(
            r#"{
                "pool": { "capacity": 32, "seed": 1 },
                "wells": [{ "position": [0, 0, 0], "mass": 100, "radius": 2, "kind": "star" }],
                "emitters": [{ "type": "burst", "position": [20, 0, 0], "count": 8, "speed": 0.5, "liquid": "crystal" }]
            }"#,
        )
        .unwrap();
        let (mut sim, mut wells) = config.build();
        assert_eq!(sim.capacity(), 32);
        assert_eq!(wells.len(), 1);

        sim.update(1.0 / 60.0, &mut wells);
        assert_eq!(sim.active_count(), 8);
    }
}
