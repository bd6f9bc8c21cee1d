//! Shared helpers for tests: volume builders and brute-force reference
//! implementations of both operators.

use std::collections::BTreeMap;

use rand::prelude::*;

use crate::volume::{LabelVolume, VolumeShape, Voxel};

/// Build a volume by evaluating `f` at every coordinate.
pub(crate) fn volume_from_fn<T: Voxel>(
    shape: VolumeShape,
    f: impl Fn(usize, usize, usize) -> T,
) -> LabelVolume {
    let mut voxels = vec![T::ZERO; shape.voxel_count()];
    for z in 0..shape.sz {
        for y in 0..shape.sy {
            for x in 0..shape.sx {
                voxels[shape.index(x, y, z)] = f(x, y, z);
            }
        }
    }
    LabelVolume::from_voxels(shape, voxels).unwrap()
}

/// Uniformly random voxels drawn from `choices`, deterministic per seed.
pub(crate) fn random_volume<T: Voxel>(
    shape: VolumeShape,
    choices: &[T],
    seed: u64,
) -> LabelVolume {
    let mut rng = StdRng::seed_from_u64(seed);
    let voxels: Vec<T> = (0..shape.voxel_count())
        .map(|_| choices[rng.random_range(0..choices.len())])
        .collect();
    LabelVolume::from_voxels(shape, voxels).unwrap()
}

/// Random volume of uniform `block`-edged cubes, deterministic per seed.
/// Produces long homogeneous runs that drive the kernels' fast paths.
pub(crate) fn blocky_volume<T: Voxel>(
    shape: VolumeShape,
    block: usize,
    choices: &[T],
    seed: u64,
) -> LabelVolume {
    let mut rng = StdRng::seed_from_u64(seed);
    let bx = shape.sx.div_ceil(block);
    let by = shape.sy.div_ceil(block);
    let bz = shape.sz.div_ceil(block);
    let cells: Vec<T> = (0..bx * by * bz)
        .map(|_| choices[rng.random_range(0..choices.len())])
        .collect();

    volume_from_fn(shape, |x, y, z| {
        cells[(x / block) + bx * ((y / block) + by * (z / block))]
    })
}

/// Brute-force dilation: plurality label of the 27-voxel window, ties to
/// the smallest label, recomputed from scratch at every voxel.
pub(crate) fn naive_dilate<T: Voxel>(input: &LabelVolume, background_only: bool) -> LabelVolume {
    let shape = input.shape();
    let labels = input.voxels::<T>();
    let mut out = vec![T::ZERO; shape.voxel_count()];

    for z in 0..shape.sz {
        for y in 0..shape.sy {
            for x in 0..shape.sx {
                let loc = shape.index(x, y, z);
                if background_only && labels[loc] != T::ZERO {
                    out[loc] = labels[loc];
                    continue;
                }

                let mut counts: BTreeMap<T, usize> = BTreeMap::new();
                for (nx, ny, nz) in window_coords(shape, x, y, z) {
                    let v = labels[shape.index(nx, ny, nz)];
                    if v != T::ZERO {
                        *counts.entry(v).or_insert(0) += 1;
                    }
                }

                // ascending key order + strictly-greater update picks the
                // smallest label among tied maxima
                let mut best: Option<(T, usize)> = None;
                for (label, count) in counts {
                    match best {
                        Some((_, best_count)) if count <= best_count => {}
                        _ => best = Some((label, count)),
                    }
                }
                if let Some((label, _)) = best {
                    out[loc] = label;
                }
            }
        }
    }

    LabelVolume::from_voxels(shape, out).unwrap()
}

/// Brute-force erosion: a voxel survives iff its window is untruncated
/// and all 27 voxels carry its label.
pub(crate) fn naive_erode<T: Voxel>(input: &LabelVolume) -> LabelVolume {
    let shape = input.shape();
    let labels = input.voxels::<T>();
    let mut out = vec![T::ZERO; shape.voxel_count()];

    for z in 0..shape.sz {
        for y in 0..shape.sy {
            for x in 0..shape.sx {
                let loc = shape.index(x, y, z);
                let v = labels[loc];
                if v == T::ZERO {
                    continue;
                }

                let neighbors: Vec<_> = window_coords(shape, x, y, z).collect();
                if neighbors.len() == 27
                    && neighbors
                        .iter()
                        .all(|&(nx, ny, nz)| labels[shape.index(nx, ny, nz)] == v)
                {
                    out[loc] = v;
                }
            }
        }
    }

    LabelVolume::from_voxels(shape, out).unwrap()
}

/// In-range coordinates of the 3×3×3 window centered on `(x, y, z)`.
fn window_coords(
    shape: VolumeShape,
    x: usize,
    y: usize,
    z: usize,
) -> impl Iterator<Item = (usize, usize, usize)> {
    let span = |c: usize, s: usize| {
        let lo = c.saturating_sub(1);
        let hi = (c + 2).min(s);
        lo..hi
    };
    span(z, shape.sz).flat_map(move |nz| {
        span(y, shape.sy)
            .flat_map(move |ny| span(x, shape.sx).map(move |nx| (nx, ny, nz)))
    })
}

/// Coordinates of non-zero voxels, for support set comparisons.
pub(crate) fn support(vol: &LabelVolume) -> Vec<(usize, usize, usize)> {
    let shape = vol.shape();
    let mut coords = Vec::new();
    for z in 0..shape.sz {
        for y in 0..shape.sy {
            for x in 0..shape.sx {
                if vol.get(x, y, z) != 0 {
                    coords.push((x, y, z));
                }
            }
        }
    }
    coords
}
