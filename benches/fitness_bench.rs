// Benchmark suite for map scoring and generation throughput
//
// Scoring runs once per individual per generation, and one generation is
// the unit of work the whole search repeats, so these two dominate run time.
//
// Run with: cargo bench --bench fitness_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use genetic_map::{ConstraintEnforcer, EvolutionEngine, FitnessEvaluator, Grid, MapLayout, RunConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Benchmark fitness scoring across map sizes
fn benchmark_fitness(c: &mut Criterion) {
    let mut group = c.benchmark_group("fitness_score");

    for size in [30usize, 60, 120].iter() {
        let layout = MapLayout::new(*size, *size);
        let enforcer = ConstraintEnforcer::new(layout);
        let evaluator = FitnessEvaluator::new(layout);

        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut grid = Grid::generate_random(*size, *size, &mut rng);
        enforcer.enforce(&mut grid, &mut rng);

        group.bench_with_input(
            BenchmarkId::new("score", format!("{}x{}", size, size)),
            &grid,
            |b, grid| b.iter(|| evaluator.score(black_box(grid))),
        );
    }

    group.finish();
}

/// Benchmark whole generations with the default 30x30, 50-map setup
fn benchmark_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("evolution");
    group.sample_size(20);

    group.bench_function("ten_generations_default", |b| {
        b.iter(|| {
            let config = RunConfig {
                generations: 10,
                random_seed: Some(7),
                ..RunConfig::default()
            };
            let engine = EvolutionEngine::new(config).expect("default config is valid");
            black_box(engine.run())
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_fitness, benchmark_generation);
criterion_main!(benches);
