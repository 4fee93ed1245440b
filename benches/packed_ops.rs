use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use packed_ternary::PackedTernaryArray;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_values(n: usize, seed: u64) -> Vec<i8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(-1i8..=1)).collect()
}

fn bench_element_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("packed_element_access");

    // Deterministic data for stable benches
    let values = random_values(10_000, 42);
    let mut arr = PackedTernaryArray::from_values(&values).unwrap();

    group.bench_function("get", |bencher| {
        bencher.iter(|| black_box(&arr).get(black_box(4_321)))
    });

    group.bench_function("get_negative", |bencher| {
        bencher.iter(|| black_box(&arr).get(black_box(-1)))
    });

    group.bench_function("set", |bencher| {
        bencher.iter(|| arr.set(black_box(4_321), black_box(-1)))
    });

    group.finish();
}

fn bench_bulk(c: &mut Criterion) {
    let sizes = [64usize, 1024, 16_384, 262_144];

    let mut group = c.benchmark_group("packed_bulk");
    for size in sizes {
        let values = random_values(size, size as u64);

        group.bench_with_input(
            BenchmarkId::new("from_values", size),
            &values,
            |bencher, values| {
                bencher.iter(|| PackedTernaryArray::from_values(black_box(values.as_slice())))
            },
        );

        let arr = PackedTernaryArray::from_values(&values).unwrap();
        group.bench_with_input(BenchmarkId::new("to_sequence", size), &arr, |bencher, arr| {
            bencher.iter(|| black_box(arr).to_sequence())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_element_access, bench_bulk);
criterion_main!(benches);
