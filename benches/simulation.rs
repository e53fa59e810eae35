use amaze_sim::{Simulation, SimulationConfig, SimulationRunner};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use std::hint::black_box;

fn config() -> SimulationConfig {
    SimulationConfig::default().with_runs(64).with_timeout(1000).with_seed(42)
}

fn bench_single_game(c: &mut Criterion) {
    let config = config();
    c.bench_function("game/4p_7x7", |b| {
        let mut index = 0;
        b.iter_batched(
            || {
                index += 1;
                Simulation::new(&config, index, 42, false).unwrap()
            },
            |sim| black_box(sim.finish().turns),
            BatchSize::SmallInput,
        )
    });
    c.bench_function("game/4p_7x7_recorded", |b| {
        b.iter_batched(
            || Simulation::new(&config, 7, 42, true).unwrap(),
            |sim| black_box(sim.finish_recorded()),
            BatchSize::SmallInput,
        )
    });
}

fn bench_batch(c: &mut Criterion) {
    let runner = SimulationRunner::new(config()).unwrap();
    c.bench_function("batch/64_games", |b| b.iter(|| black_box(runner.run().unwrap().mean_turns)));
}

criterion_group!(benches, bench_single_game, bench_batch);
criterion_main!(benches);
