use criterion::{criterion_group, criterion_main, Criterion};
use rand::thread_rng;

use pairing_costs::pairing::PairingGroup;
use pairing_costs::params::TYPE_A;
use pairing_costs::provider::{Digest, HashFunction, PrimitiveProvider};
use pairing_costs::timing::HASH_INPUT;

fn group() -> PairingGroup {
    PairingGroup::new(TYPE_A.clone(), HashFunction::Sha256)
}

fn bench_scalar_ops(c: &mut Criterion) {
    let group = group();
    let mut rng = thread_rng();
    let a = group.random_scalar(&mut rng).unwrap();
    let b = group.random_scalar(&mut rng).unwrap();
    let mut out = group.zero_scalar();

    c.bench_function("bench_scalar_mul", |bench| {
        bench.iter(|| group.scalar_mul(std::hint::black_box(&mut out), &a, &b));
    });
    c.bench_function("bench_scalar_invert", |bench| {
        bench.iter(|| group.scalar_invert(std::hint::black_box(&mut out), &a));
    });
    c.bench_function("bench_scalar_add", |bench| {
        bench.iter(|| group.scalar_add(std::hint::black_box(&mut out), &a, &b));
    });
}

fn bench_hash(c: &mut Criterion) {
    let mut out = Digest::default();
    for hash in [HashFunction::Sha256, HashFunction::Sha3_256] {
        let group = PairingGroup::new(TYPE_A.clone(), hash);
        c.bench_function(&format!("bench_hash_{}", hash), |bench| {
            bench.iter(|| group.hash(std::hint::black_box(&mut out), HASH_INPUT));
        });
    }
}

fn bench_group_ops(c: &mut Criterion) {
    let group = group();
    let mut rng = thread_rng();
    let a = group.random_scalar(&mut rng).unwrap();
    let x = group.random_point(&mut rng).unwrap();
    let y = group.random_point(&mut rng).unwrap();
    let mut out = group.identity();

    c.bench_function("bench_point_add", |bench| {
        bench.iter(|| group.point_add(std::hint::black_box(&mut out), &x, &y));
    });
    c.bench_function("bench_point_mul", |bench| {
        bench.iter(|| group.point_mul(std::hint::black_box(&mut out), &x, &a));
    });
}

criterion_group!(name = benches;
    config = Criterion::default();

    targets =
        bench_scalar_ops,
        bench_hash,
        bench_group_ops
);
criterion_main!(benches);
