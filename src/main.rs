//! Headless scenario runner.
//!
//! ```text
//! gravflow [SCENARIO.json] [FRAMES]
//! ```
//!
//! Without a scenario file, runs a built-in star system with a plasma
//! stream. Set `RUST_LOG=debug` for per-well and eviction logging.

use gravflow::prelude::*;
use gravflow::ConfigError;
use gravflow::{WellInstance, WellPlacement};
use std::process::ExitCode;

const DEFAULT_FRAMES: u64 = 600;
const FRAME_DELTA: f32 = 1.0 / 60.0;
const REPORT_EVERY: u64 = 60;

fn demo_scenario() -> SimConfig {
    let mut config = SimConfig {
        name: "Demo".into(),
        ..SimConfig::default()
    };
    config.pool.capacity = 2_000;
    config.pool.seed = Some(7);
    config.wells = vec![
        WellPlacement {
            position: Vec3::ZERO,
            mass: 100.0,
            radius: 2.0,
            kind: WellKind::Star,
            active: true,
        },
        WellPlacement {
            position: Vec3::new(60.0, 0.0, 0.0),
            mass: 400.0,
            radius: 1.0,
            kind: WellKind::BlackHole,
            active: true,
        },
    ];
    config.emitters = vec![
        Emitter::Stream {
            position: Vec3::new(20.0, 0.0, 0.0),
            velocity: Vec3::new(0.0, 5f32.sqrt(), 0.0),
            rate: 60.0,
            liquid: LiquidType::Plasma,
        },
        Emitter::Cone {
            position: Vec3::new(-30.0, 0.0, 0.0),
            direction: Vec3::X,
            speed: 2.0,
            spread: 0.2,
            rate: 30.0,
            liquid: LiquidType::Photonic,
        },
    ];
    config
}

fn run() -> Result<(), ConfigError> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => SimConfig::load(path)?,
        None => demo_scenario(),
    };
    let frames = match args.next() {
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|e| ConfigError::Invalid(format!("frame count '{}': {}", raw, e)))?,
        None => DEFAULT_FRAMES,
    };

    let (sim, mut wells) = config.build();
    let seed = config.pool.seed.unwrap_or(0);
    let mut sim = sim.with_extension(QuantumEffects::from_physics(&config.physics, seed));
    let mut clock = FrameClock::new().with_fixed_delta(FRAME_DELTA);

    log::info!("running '{}' for {} frames", config.name, frames);
    for _ in 0..frames {
        let dt = clock.tick();
        sim.update(dt, &mut wells);

        if clock.frame() % REPORT_EVERY == 0 {
            let stats = sim.stats();
            log::info!(
                "frame {:>5} t={:>6.2} active={}/{} orbiting={} spawned={} evicted={} expired={}",
                stats.frame,
                clock.simulated(),
                stats.active,
                stats.capacity,
                stats.in_orbit,
                stats.spawned,
                stats.evicted,
                stats.expired
            );
            for (id, well) in wells.iter() {
                let view = WellInstance::from(well);
                log::debug!(
                    "  well {} {}: captured={} orbiting={} influenced={}",
                    id.raw(),
                    well.kind().name(),
                    view.captured,
                    view.orbiting,
                    view.influenced
                );
            }
        }
    }

    let stats = sim.stats();
    log::info!(
        "done: {} frames, {} active, {} spawned, {} evicted, {} expired",
        stats.frame,
        stats.active,
        stats.spawned,
        stats.evicted,
        stats.expired
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
