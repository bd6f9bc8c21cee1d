//! Benchmarks for multi-label erosion.
//! Run with: cargo bench --features bench --bench erode

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group};

use crate::volume::{LabelVolume, VolumeShape};

fn blocky_volume(shape: VolumeShape, block: usize) -> LabelVolume {
    // coarse uniform blocks: mostly pure columns with impure seams,
    // the workload erosion's short-circuits are built for
    let bx = shape.sx.div_ceil(block);
    let by = shape.sy.div_ceil(block);
    let mut voxels = vec![0u32; shape.voxel_count()];
    for z in 0..shape.sz {
        for y in 0..shape.sy {
            for x in 0..shape.sx {
                let cell = (x / block) + bx * ((y / block) + by * (z / block));
                voxels[shape.index(x, y, z)] = ((cell * 31 + 7) % 4) as u32;
            }
        }
    }
    LabelVolume::from_voxels(shape, voxels).unwrap()
}

#[allow(dead_code)]
pub fn bench_erode(c: &mut Criterion) {
    let mut group = c.benchmark_group("erode");

    for edge in [64usize, 128, 256] {
        let shape = VolumeShape::new(edge, edge, edge);
        let volume = blocky_volume(shape, 16);

        group.throughput(Throughput::Elements(shape.voxel_count() as u64));

        for threads in [1usize, 8] {
            group.bench_with_input(
                BenchmarkId::new(format!("{}t", threads), edge),
                &volume,
                |b, volume| {
                    b.iter(|| {
                        black_box(crate::erode(black_box(volume), threads).unwrap());
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_erode);
