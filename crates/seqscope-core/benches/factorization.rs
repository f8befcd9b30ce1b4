//! Criterion benchmarks for factorization and cache growth.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use num_bigint::BigInt;

use seqscope_core::cached::{Cached, IndexValues, NoFactors, TrialDivision};
use seqscope_core::factor::Factorizer;
use seqscope_core::options::CacheOptions;
use seqscope_core::sequence::Sequence;

fn bench_factor(c: &mut Criterion) {
    let inputs: Vec<i64> = vec![360, 994_009, 1_018_081, 987_654_321, 9_007_199_254_740_881];

    let mut group = c.benchmark_group("Factorizer");
    for &v in &inputs {
        let value = BigInt::from(v);
        group.bench_with_input(BenchmarkId::from_parameter(v), &value, |b, value| {
            b.iter(|| Factorizer::new().factor(black_box(value)));
        });
    }
    group.finish();
}

fn bench_fill(c: &mut Criterion) {
    let ns: Vec<i64> = vec![1_000, 10_000, 100_000];

    let mut group = c.benchmark_group("CacheFill");
    for &n in &ns {
        group.bench_with_input(BenchmarkId::new("values", n), &n, |b, &n| {
            b.iter(|| {
                let mut seq = Cached::new(IndexValues, NoFactors, CacheOptions::default());
                seq.initialize_sync().unwrap();
                seq.get_element(n).unwrap()
            });
        });
    }
    for &n in &ns[..2] {
        group.bench_with_input(BenchmarkId::new("factored", n), &n, |b, &n| {
            b.iter(|| {
                let mut seq = Cached::new(IndexValues, TrialDivision::new(), CacheOptions::default());
                seq.initialize_sync().unwrap();
                seq.get_factors(n).unwrap()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_factor, bench_fill);
criterion_main!(benches);
