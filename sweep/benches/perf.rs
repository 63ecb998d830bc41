use std::{hint::black_box, time::Duration};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, SamplingMode};
use jump_bucketing::{
    analyze, consistent_bucket, jump_hash, modulo_bucket, ConsistentHashing, ModuloArithmetic,
};
use jump_bucketing_sweep::ids::synthetic_ids;
use rand::{thread_rng, RngCore};

const NUM_BUCKETS: [u32; 4] = [10, 1000, 100000, 10000000];

fn hash_u64(c: &mut Criterion) {
    let mut group = c.benchmark_group("HashU64");
    group.sampling_mode(SamplingMode::Flat);
    group.warm_up_time(Duration::from_millis(300));
    group.measurement_time(Duration::from_millis(1000));
    group.sample_size(1000);

    let mut rng = thread_rng();

    for num_buckets in NUM_BUCKETS {
        group.bench_with_input(
            BenchmarkId::new("Jump", num_buckets),
            &num_buckets,
            |b, &num_buckets| {
                let key = rng.next_u64();
                b.iter(|| jump_hash(black_box(key), black_box(num_buckets)))
            },
        );
    }
    group.finish();
}

fn hash_ids(c: &mut Criterion) {
    let mut group = c.benchmark_group("HashId");
    group.sampling_mode(SamplingMode::Flat);
    group.warm_up_time(Duration::from_millis(300));
    group.measurement_time(Duration::from_millis(1000));
    group.sample_size(1000);

    let ids = synthetic_ids(1024, 0);
    for num_buckets in NUM_BUCKETS {
        group.bench_with_input(
            BenchmarkId::new("XXH3_then_Jump", num_buckets),
            &num_buckets,
            |b, &num_buckets| {
                let mut ids = ids.iter().cycle();
                b.iter(|| {
                    consistent_bucket(black_box(ids.next().unwrap()), black_box(num_buckets))
                })
            },
        );
        group.bench_with_input(
            BenchmarkId::new("XXH3_then_Modulo", num_buckets),
            &num_buckets,
            |b, &num_buckets| {
                let mut ids = ids.iter().cycle();
                b.iter(|| modulo_bucket(black_box(ids.next().unwrap()), black_box(num_buckets)))
            },
        );
    }
    group.finish();
}

fn analyze_migration(c: &mut Criterion) {
    let mut group = c.benchmark_group("Analyze");
    group.sample_size(50);

    let ids = synthetic_ids(100_000, 0);
    group.bench_function("Consistent", |b| {
        b.iter(|| analyze(black_box(ids.as_slice()), 9, 1, &ConsistentHashing))
    });
    group.bench_function("Modulo", |b| {
        b.iter(|| analyze(black_box(ids.as_slice()), 9, 1, &ModuloArithmetic))
    });
    group.finish();
}

criterion_group!(benches, hash_u64, hash_ids, analyze_migration);
criterion_main!(benches);
