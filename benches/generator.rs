//! Benchmarks for the puzzle grid generator.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use strandgen::path::find_path;
use strandgen::{validate, Generator, PuzzleInput, Strategy};

/// 7 + 8 + 7 + 7 + 5 + 5 + 4 + 5 = 48 letters.
fn weather_input() -> PuzzleInput {
    PuzzleInput {
        title: "Stormy".to_string(),
        theme: "Weather".to_string(),
        author: "kim".to_string(),
        words: [
            "rainbow", "sunshine", "thunder", "drizzle", "cloud", "storm", "mist", "hails",
        ]
        .iter()
        .map(|w| w.to_string())
        .collect(),
    }
}

/// Benchmark the complete generation pipeline.
fn bench_generate(c: &mut Criterion) {
    let input = weather_input();
    let mut group = c.benchmark_group("generate");
    group.sample_size(10);
    group.bench_function("weather_grid", |b| {
        b.iter(|| {
            let mut generator = Generator::with_seed(42);
            generator.generate(black_box(&input))
        })
    });
    group.finish();
}

/// Benchmark input validation alone.
fn bench_validate(c: &mut Criterion) {
    let input = weather_input();
    c.bench_function("validate", |b| b.iter(|| validate(black_box(&input), true)));
}

/// Benchmark a single path search on an empty grid.
fn bench_find_path(c: &mut Criterion) {
    c.bench_function("find_path_9", |b| {
        let mut rng = StdRng::seed_from_u64(42);
        b.iter(|| find_path(&mut rng, 0, 0, black_box(9), Strategy::RandomWalk, 50_000))
    });
}

criterion_group!(benches, bench_generate, bench_validate, bench_find_path);
criterion_main!(benches);
