use criterion::{Criterion, criterion_group, criterion_main};
use fruitmatch_core::*;
use std::hint::black_box;

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_gen");

    for config in [GameConfig::memory(), GameConfig::shuffle()] {
        group.bench_function(config.mode().name(), |b| {
            let mut seed = 0u64;
            b.iter(|| {
                seed += 1;
                black_box(GameEngine::new(black_box(config.clone()), seed))
            })
        });
    }

    group.bench_function("agitation_round", |b| {
        b.iter(|| {
            let mut engine = GameEngine::new(GameConfig::shuffle(), 42);
            let mut clock = ManualClock::new();
            engine.start().unwrap();
            black_box(clock.advance(&mut engine, 2000))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_generation);
criterion_main!(benches);
