//! Throughput of the verification kernels, sequential vs parallel.
//!
//! Run with: cargo bench --bench verify_bench

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fftcheck::{
    copy_buffers, distance, set_input, ArrayType, BufferLayout, ParallelConfig, Precision,
};
use std::time::Duration;

fn configs() -> [(&'static str, ParallelConfig); 2] {
    [
        ("sequential", ParallelConfig::sequential()),
        ("parallel", ParallelConfig::default()),
    ]
}

fn bench_set_input(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_input");
    group.sample_size(10);
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(3));

    for size in [64, 256, 512] {
        let layout = BufferLayout::contiguous(
            Precision::Double,
            ArrayType::ComplexInterleaved,
            &[size, size],
            1,
        )
        .unwrap();
        let mut buf = layout.allocate().unwrap();
        group.throughput(Throughput::Elements((size * size) as u64));

        for (name, config) in configs() {
            group.bench_with_input(BenchmarkId::new(name, size), &size, |bench, _| {
                bench.iter(|| set_input(&mut buf, &layout, &config).unwrap())
            });
        }
    }
    group.finish();
}

fn bench_copy_interleaved_to_planar(c: &mut Criterion) {
    let mut group = c.benchmark_group("copy_interleaved_to_planar");
    group.sample_size(10);
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(3));

    for size in [32, 64, 128] {
        let length = [size, size, size];
        let ilayout =
            BufferLayout::contiguous(Precision::Single, ArrayType::ComplexInterleaved, &length, 1)
                .unwrap();
        // Transposed planar destination
        let olayout = BufferLayout {
            array_type: ArrayType::ComplexPlanar,
            stride: vec![1, size, size * size],
            offset: vec![0, 0],
            ..ilayout.clone()
        };
        let mut input = ilayout.allocate().unwrap();
        set_input(&mut input, &ilayout, &ParallelConfig::default()).unwrap();
        let mut output = olayout.allocate().unwrap();
        group.throughput(Throughput::Elements((size * size * size) as u64));

        for (name, config) in configs() {
            group.bench_with_input(BenchmarkId::new(name, size), &size, |bench, _| {
                bench.iter(|| {
                    copy_buffers(&input, &ilayout, &mut output, &olayout, &config).unwrap()
                })
            });
        }
    }
    group.finish();
}

fn bench_distance(c: &mut Criterion) {
    let mut group = c.benchmark_group("distance");
    group.sample_size(10);
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(3));

    for size in [1 << 12, 1 << 16, 1 << 20] {
        let layout =
            BufferLayout::contiguous(Precision::Double, ArrayType::Real, &[size], 4).unwrap();
        let mut a = layout.allocate().unwrap();
        set_input(&mut a, &layout, &ParallelConfig::default()).unwrap();
        let b = a.clone();
        group.throughput(Throughput::Elements((4 * size) as u64));

        for (name, config) in configs() {
            group.bench_with_input(BenchmarkId::new(name, size), &size, |bench, _| {
                bench.iter(|| distance(&a, &layout, &b, &layout, 1e-6, &config).unwrap())
            });
        }
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_set_input,
    bench_copy_interleaved_to_planar,
    bench_distance
);
criterion_main!(benches);
