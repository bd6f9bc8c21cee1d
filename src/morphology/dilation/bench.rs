//! Benchmarks for multi-label dilation.
//! Run with: cargo bench --features bench --bench dilate

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group};

use crate::volume::{LabelVolume, VolumeShape};

fn labeled_volume(shape: VolumeShape) -> LabelVolume {
    // deterministic mix of background and a handful of labels, with
    // enough homogeneous stretches to engage the fast paths
    let voxels: Vec<u32> = (0..shape.voxel_count())
        .map(|i| ((i / 97) % 5) as u32)
        .collect();
    LabelVolume::from_voxels(shape, voxels).unwrap()
}

#[allow(dead_code)]
pub fn bench_dilate(c: &mut Criterion) {
    let mut group = c.benchmark_group("dilate");

    for edge in [64usize, 128, 256] {
        let shape = VolumeShape::new(edge, edge, edge);
        let volume = labeled_volume(shape);

        group.throughput(Throughput::Elements(shape.voxel_count() as u64));

        for threads in [1usize, 8] {
            group.bench_with_input(
                BenchmarkId::new(format!("{}t", threads), edge),
                &volume,
                |b, volume| {
                    b.iter(|| {
                        black_box(crate::dilate(black_box(volume), false, threads).unwrap());
                    });
                },
            );
        }
    }

    group.finish();

    let mut group = c.benchmark_group("dilate_background_only");

    let shape = VolumeShape::new(128, 128, 128);
    let volume = labeled_volume(shape);
    group.throughput(Throughput::Elements(shape.voxel_count() as u64));
    group.bench_function("128", |b| {
        b.iter(|| {
            black_box(crate::dilate(black_box(&volume), true, 8).unwrap());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_dilate);
