//! Benchmark for region generation and tile lookup.
//!
//! Run with: cargo bench --package veinforge_ores --bench region_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use veinforge_ores::{
    generate_region, tiles_of_vein_containing, DepositType, GenerationContext, OreConfig, OreWorld,
    RegionKey, WeightedCatalog, WorldSeed,
};
use veinforge_shared::{DimensionId, RegionCoord, TileCoord};

fn catalog() -> WeightedCatalog {
    let mut catalog = WeightedCatalog::new();
    for (id, weight) in [(1, 50), (2, 30), (3, 15), (4, 5)] {
        catalog
            .register(DimensionId(0), 0, DepositType::new(id, format!("ore_{id}"), 1, 6, weight))
            .unwrap();
    }
    catalog
        .register(DimensionId(0), 1, DepositType::new(100, "oil", 2, 9, 1))
        .unwrap();
    catalog
}

fn benchmark_single_region(c: &mut Criterion) {
    let catalog = catalog();
    let mut ctx = GenerationContext::new(WorldSeed::new(42));

    c.bench_function("single_region_generation", |b| {
        let mut coord = 0i32;
        b.iter(|| {
            coord = coord.wrapping_add(1);
            let key = RegionKey::new(RegionCoord::new(coord, -coord), DimensionId(0));
            black_box(generate_region(key, 2, &catalog, &mut ctx))
        });
    });
}

fn benchmark_cached_lookup(c: &mut Criterion) {
    let world = OreWorld::new(OreConfig::production(), catalog()).unwrap();
    world.start_session(WorldSeed::new(42));

    // Warm a 16x16 region area (512x512 tiles).
    for rx in 0..16 {
        for rz in 0..16 {
            world
                .get_or_generate(RegionKey::new(RegionCoord::new(rx, rz), DimensionId(0)))
                .unwrap();
        }
    }

    let mut group = c.benchmark_group("lookup");
    group.throughput(Throughput::Elements(512));
    group.bench_function("512_cached_locates", |b| {
        b.iter(|| {
            for i in 0..512 {
                black_box(world.locate(i, 511 - i, DimensionId(0)).unwrap());
            }
        });
    });
    group.bench_function("512_vein_reconstructions", |b| {
        b.iter(|| {
            for i in 0..512 {
                black_box(tiles_of_vein_containing(TileCoord::new(i, -i)));
            }
        });
    });
    group.finish();
}

criterion_group!(benches, benchmark_single_region, benchmark_cached_lookup);
criterion_main!(benches);
