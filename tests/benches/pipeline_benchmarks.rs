//! # Pipeline Benchmarks
//!
//! | Stage | Target |
//! |-------|--------|
//! | Secure draw | < 10µs |
//! | Pattern screen | < 1µs |
//! | Batch of 20 against 1,200 past draws | < 5ms |

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lotto_generation::{
    BatchOrchestrator, CombinationSampler, GenerationConfig, GenerationMetrics, HistoricalDraw,
    HistoricalSet, InMemoryLottoStore, PatternFilter, SecureSampler,
};

fn bench_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampling");
    let sampler = SecureSampler::new();

    group.bench_function("secure_draw", |b| b.iter(|| black_box(sampler.draw())));

    let candidates: Vec<_> = (0..1_000).map(|_| sampler.draw()).collect();
    group.throughput(Throughput::Elements(candidates.len() as u64));
    group.bench_function("pattern_screen_1000", |b| {
        b.iter(|| {
            candidates
                .iter()
                .filter(|c| PatternFilter::is_rejected(black_box(c)))
                .count()
        })
    });

    group.finish();
}

fn bench_batch_generation(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");

    let mut group = c.benchmark_group("batch_generation");
    group.measurement_time(Duration::from_secs(10));

    let sampler = SecureSampler::new();
    let date = NaiveDate::from_ymd_opt(2024, 1, 6).expect("valid date");
    let store = Arc::new(InMemoryLottoStore::with_draws((1..=1_200).map(|draw_no| {
        HistoricalDraw {
            draw_no,
            draw_date: date,
            combination: sampler.draw(),
        }
    })));

    let orchestrator = BatchOrchestrator::new(
        Arc::new(SecureSampler::new()),
        Arc::new(HistoricalSet::new(store, Duration::from_secs(3600))),
        GenerationConfig::default(),
        Arc::new(GenerationMetrics::new()),
    )
    .expect("orchestrator");

    // Warm the cache so iterations measure screening only.
    runtime
        .block_on(orchestrator.historical().refresh_if_stale())
        .expect("history");

    for size in [1usize, 5, 20] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("generate_batch", size), &size, |b, &size| {
            b.iter(|| {
                runtime
                    .block_on(orchestrator.generate_batch(size, None))
                    .expect("batch")
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sampling, bench_batch_generation);
criterion_main!(benches);
