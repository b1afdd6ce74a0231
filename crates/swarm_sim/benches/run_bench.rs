//! Full-run throughput at increasing swarm sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;
use swarm_core::SimConfig;
use swarm_sim::Environment;

fn bench_full_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_run");
    group.measurement_time(Duration::from_secs(5));

    for n_agents in [8usize, 32, 128] {
        let config = SimConfig {
            n_agents,
            ..SimConfig::default()
        };
        group.bench_with_input(
            BenchmarkId::new("agents", n_agents),
            &config,
            |b, config| {
                b.iter(|| {
                    let mut env = Environment::new(config.clone()).unwrap();
                    black_box(env.run(black_box(100)).len())
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_full_run);
criterion_main!(benches);
