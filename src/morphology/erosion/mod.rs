//! Multi-label erosion under a 3×3×3 structuring element.
//!
//! A voxel survives only when its entire 27-voxel window is one uniform
//! non-zero label, which requires all three stencil columns to be pure:
//! nine in-range voxels each, all equal. Purity of a single column is a
//! necessary condition shared by up to three consecutive windows, so one
//! impure column disqualifies the neighboring voxels as well: an impure
//! leading edge skips two extra voxels, an impure middle skips one.

#[cfg(feature = "bench")]
pub mod bench;


use crate::common::UnsafeSendPtr;
use crate::error::Result;
use crate::morphology::grid::{Tile, TileGrid};
use crate::morphology::stencil::{Column, column_is_pure, fill_column};
use crate::volume::{VolumeShape, Voxel};

/// Erode `labels` into `output`, tiled over `threads` workers.
pub(crate) fn erode_volume<T: Voxel>(
    labels: &[T],
    output: &mut [T],
    shape: VolumeShape,
    threads: usize,
) -> Result<()> {
    debug_assert_eq!(labels.len(), shape.voxel_count());
    debug_assert_eq!(output.len(), shape.voxel_count());

    let grid = TileGrid::new(shape);
    tracing::debug!(
        "eroding {} volume: {} tiles, threads={}",
        shape,
        grid.tile_count(),
        threads
    );

    let out = UnsafeSendPtr::new(output.as_mut_ptr());
    grid.run(threads, |tile| {
        process_tile(labels, out, shape, tile);
    })
}

/// Erode one tile.
fn process_tile<T: Voxel>(
    labels: &[T],
    output: UnsafeSendPtr<*mut T>,
    shape: VolumeShape,
    tile: Tile,
) {
    // Column scratch plus cached purity, reused across the whole tile.
    let mut left: Column<T> = Column::new();
    let mut middle: Column<T> = Column::new();
    let mut right: Column<T> = Column::new();
    let mut pure_left = false;
    let mut pure_middle = false;
    let mut pure_right = false;

    let out = output.get();

    for z in tile.zs..tile.ze {
        for y in tile.ys..tile.ye {
            let mut stale: u32 = 3;
            let mut x = tile.xs;
            while x < tile.xe {
                let loc = shape.index(x, y, z);

                if labels[loc] == T::ZERO {
                    // Background stays background; output is already zero.
                    stale += 1;
                    x += 1;
                    continue;
                }

                if stale == 1 {
                    // rotate: middle becomes left, right becomes middle,
                    // the leading edge is recomputed
                    std::mem::swap(&mut left, &mut middle);
                    std::mem::swap(&mut middle, &mut right);
                    pure_left = pure_middle;
                    pure_middle = pure_right;
                    fill_column(labels, shape, x as isize + 1, y, z, &mut right);
                    pure_right = column_is_pure(&right);
                    stale = 0;
                } else if stale == 2 {
                    std::mem::swap(&mut left, &mut right);
                    pure_left = pure_right;
                    fill_column(labels, shape, x as isize + 1, y, z, &mut right);
                    pure_right = column_is_pure(&right);
                    if !pure_right {
                        // The impure column sits in the windows of this
                        // voxel and the next two.
                        x += 3;
                        stale = 3;
                        continue;
                    }
                    fill_column(labels, shape, x as isize, y, z, &mut middle);
                    pure_middle = column_is_pure(&middle);
                    stale = 0;
                } else if stale >= 3 {
                    // Leading edge first: it rules out the most voxels.
                    fill_column(labels, shape, x as isize + 1, y, z, &mut right);
                    pure_right = column_is_pure(&right);
                    if !pure_right {
                        x += 3;
                        stale = 3;
                        continue;
                    }
                    fill_column(labels, shape, x as isize, y, z, &mut middle);
                    pure_middle = column_is_pure(&middle);
                    if !pure_middle {
                        x += 2;
                        stale = 2;
                        continue;
                    }
                    fill_column(labels, shape, x as isize - 1, y, z, &mut left);
                    pure_left = column_is_pure(&left);
                    stale = 0;
                }

                if !pure_right {
                    x += 3;
                    stale = 3;
                    continue;
                } else if !pure_middle {
                    x += 2;
                    stale = 2;
                    continue;
                } else if pure_left
                    && labels[loc] == left[0]
                    && labels[loc] == middle[0]
                    && labels[loc] == right[0]
                {
                    // SAFETY: loc lies in this tile; tiles are disjoint.
                    unsafe { *out.add(loc) = labels[loc] };
                }

                stale = 1;
                x += 1;
            }
        }
    }
}
