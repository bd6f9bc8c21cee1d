//! Multi-label dilation under a 3×3×3 structuring element.
//!
//! Every output voxel takes the plurality label of the non-zero voxels in
//! its 27-voxel window; ties go to the smallest label. The kernel sweeps
//! each row with an incrementally updated stencil and a staleness counter
//! that tracks how many x-steps the cached columns lag the sweep, so a
//! skipped voxel costs one increment instead of a recompute. Saturated
//! uniform windows decide two voxels at once: when at least 19 of the 27
//! neighbors carry one label, the next voxel inherits 18 of them as its
//! left and middle columns, which already outnumber any challenger.

#[cfg(feature = "bench")]
pub mod bench;


use crate::common::UnsafeSendPtr;
use crate::error::Result;
use crate::morphology::grid::{Tile, TileGrid};
use crate::morphology::stencil::{Column, Window, fill_column, gather_window};
use crate::volume::{VolumeShape, Voxel};

/// Dilate `labels` into `output`, tiled over `threads` workers.
///
/// With `background_only` set, non-zero input voxels are copied through
/// verbatim and only background voxels are recomputed.
pub(crate) fn dilate_volume<T: Voxel>(
    labels: &[T],
    output: &mut [T],
    shape: VolumeShape,
    background_only: bool,
    threads: usize,
) -> Result<()> {
    debug_assert_eq!(labels.len(), shape.voxel_count());
    debug_assert_eq!(output.len(), shape.voxel_count());

    let grid = TileGrid::new(shape);
    tracing::debug!(
        "dilating {} volume: {} tiles, threads={}, background_only={}",
        shape,
        grid.tile_count(),
        threads,
        background_only
    );

    let out = UnsafeSendPtr::new(output.as_mut_ptr());
    grid.run(threads, |tile| {
        process_tile(labels, out, shape, tile, background_only);
    })
}

/// Plurality-dilate one tile.
fn process_tile<T: Voxel>(
    labels: &[T],
    output: UnsafeSendPtr<*mut T>,
    shape: VolumeShape,
    tile: Tile,
    background_only: bool,
) {
    // Column scratch, reused across the whole tile. As the sweep
    // advances, right is the leading edge, middle becomes left and
    // left gets dropped.
    let mut left: Column<T> = Column::new();
    let mut middle: Column<T> = Column::new();
    let mut right: Column<T> = Column::new();
    let mut neighbors: Window<T> = Window::new();

    let out = output.get();

    for z in tile.zs..tile.ze {
        for y in tile.ys..tile.ye {
            let mut stale: u32 = 3;
            let mut x = tile.xs;
            while x < tile.xe {
                let loc = shape.index(x, y, z);

                if background_only && labels[loc] != T::ZERO {
                    // SAFETY: loc lies in this tile; tiles are disjoint.
                    unsafe { *out.add(loc) = labels[loc] };
                    stale += 1;
                    x += 1;
                    continue;
                }

                if stale == 1 {
                    // rotate: middle becomes left, right becomes middle,
                    // the leading edge is recomputed
                    std::mem::swap(&mut left, &mut middle);
                    std::mem::swap(&mut middle, &mut right);
                    fill_column(labels, shape, x as isize + 1, y, z, &mut right);
                    stale = 0;
                } else if stale == 2 {
                    std::mem::swap(&mut left, &mut right);
                    fill_column(labels, shape, x as isize, y, z, &mut middle);
                    fill_column(labels, shape, x as isize + 1, y, z, &mut right);
                    stale = 0;
                } else if stale >= 3 {
                    fill_column(labels, shape, x as isize - 1, y, z, &mut left);
                    fill_column(labels, shape, x as isize, y, z, &mut middle);
                    fill_column(labels, shape, x as isize + 1, y, z, &mut right);
                    stale = 0;
                }

                if left.is_empty() && middle.is_empty() && right.is_empty() {
                    // All background: output stays zero. Shift the stencil
                    // past this voxel so the next one starts fresh.
                    std::mem::swap(&mut left, &mut middle);
                    std::mem::swap(&mut middle, &mut right);
                    fill_column(labels, shape, x as isize + 2, y, z, &mut right);
                    x += 1;
                    continue;
                }

                gather_window(&left, &middle, &right, &mut neighbors);
                neighbors.sort_unstable();

                let size = neighbors.len();

                // The middle and right columns carry over into the next
                // voxel's window, so a saturated uniform window decides
                // the next voxel too.
                if size >= 19 && neighbors[0] == neighbors[size - 1] {
                    // SAFETY: loc (and loc + 1 when in range) lie in this
                    // tile; tiles are disjoint.
                    unsafe { *out.add(loc) = neighbors[0] };
                    if x + 1 < tile.xe {
                        write_skipped(out, labels, loc + 1, neighbors[0], background_only);
                    }
                    stale = 2;
                    x += 2;
                    continue;
                }

                // Plurality over the sorted runs. Only a strictly longer
                // run displaces the current winner, so ties resolve to the
                // smallest label.
                let mut mode_label = neighbors[0];
                let mut ct = 1usize;
                let mut max_ct = 1usize;
                for i in 1..size {
                    if neighbors[i] != neighbors[i - 1] {
                        if ct > max_ct {
                            mode_label = neighbors[i - 1];
                            max_ct = ct;
                        }
                        ct = 1;

                        if size - i < max_ct {
                            break;
                        }
                    } else {
                        ct += 1;
                    }
                }

                if ct > max_ct {
                    mode_label = neighbors[size - 1];
                }

                // SAFETY: loc lies in this tile; tiles are disjoint.
                unsafe { *out.add(loc) = mode_label };

                if ct >= 19 && x + 1 < tile.xe {
                    // Final run saturates the window; same two-voxel
                    // shortcut as above.
                    write_skipped(out, labels, loc + 1, mode_label, background_only);
                    stale = 2;
                    x += 2;
                    continue;
                }

                stale = 1;
                x += 1;
            }
        }
    }
}

/// Write the second voxel of a two-voxel fast path. In background-only
/// mode a skipped non-zero voxel keeps its own label; it is never
/// outvoted by the saturated window.
#[inline]
fn write_skipped<T: Voxel>(
    out: *mut T,
    labels: &[T],
    loc: usize,
    winner: T,
    background_only: bool,
) {
    let value = if background_only && labels[loc] != T::ZERO {
        labels[loc]
    } else {
        winner
    };
    // SAFETY: loc lies in the caller's tile; tiles are disjoint.
    unsafe { *out.add(loc) = value };
}
