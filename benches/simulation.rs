//! Benchmarks for the frame loop and its CPU building blocks.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gravflow::prelude::*;
use gravflow::spatial::{SpatialConfig, SpatialGrid};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

fn scattered(count: usize, extent: f32) -> Vec<Vec3> {
    let mut rng = SmallRng::seed_from_u64(17);
    (0..count)
        .map(|_| {
            Vec3::new(
                rng.gen_range(-extent..extent),
                rng.gen_range(-extent..extent),
                rng.gen_range(-extent..extent),
            )
        })
        .collect()
}

fn populated(count: usize) -> (ParticleSimulation, GravitySystem) {
    let physics = PhysicsConfig::default();
    let pool = PoolConfig {
        capacity: count,
        lifetime_min: 1.0e6,
        lifetime_max: 1.0e6,
        seed: Some(3),
        ..PoolConfig::default()
    };
    let mut wells = GravitySystem::new(physics);
    wells.place(Vec3::ZERO, 100.0, 2.0, WellKind::Star);
    wells.place(Vec3::new(40.0, 0.0, 0.0), 300.0, 1.0, WellKind::BlackHole);
    wells.place(Vec3::new(-40.0, 10.0, 0.0), 80.0, 1.0, WellKind::Neutron);

    let mut sim = ParticleSimulation::new(physics, pool);
    let liquids = LiquidType::variants();
    for (i, position) in scattered(count, 30.0).into_iter().enumerate() {
        let liquid = liquids[i % liquids.len()];
        sim.spawn(SpawnRequest::new(position, Vec3::ZERO, liquid));
    }
    (sim, wells)
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");

    for count in [1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("update", count), &count, |b, &count| {
            let (mut sim, mut wells) = populated(count);
            b.iter(|| {
                sim.update(black_box(1.0 / 60.0), &mut wells);
            })
        });
    }

    group.finish();
}

fn bench_spatial(c: &mut Criterion) {
    let mut group = c.benchmark_group("spatial");
    let positions = scattered(10_000, 30.0);

    group.bench_function("rebuild_10k", |b| {
        let mut grid = SpatialGrid::new(SpatialConfig::with_cell_size(2.0));
        b.iter(|| grid.rebuild(black_box(&positions)))
    });

    group.bench_function("query_10k", |b| {
        let mut grid = SpatialGrid::new(SpatialConfig::with_cell_size(2.0));
        grid.rebuild(&positions);
        b.iter(|| {
            let mut hits = 0usize;
            for p in positions.iter().take(1_000) {
                grid.for_each_candidate(*p, |_| hits += 1);
            }
            black_box(hits)
        })
    });

    group.finish();
}

fn bench_field(c: &mut Criterion) {
    let (_, wells) = populated(1);
    let probes = scattered(1_000, 50.0);

    c.bench_function("total_field_1k", |b| {
        b.iter(|| {
            let mut sum = Vec3::ZERO;
            for p in &probes {
                sum += wells.total_field(*p, 1.0);
            }
            black_box(sum)
        })
    });
}

criterion_group!(benches, bench_frame, bench_spatial, bench_field);
criterion_main!(benches);
