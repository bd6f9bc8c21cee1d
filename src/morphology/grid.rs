//! Tile partitioning and the per-call worker pool.
//!
//! The output domain is cut into cubic tiles of edge [`TILE_EDGE`] and
//! each tile runs as one independent task. Tiles never overlap, so the
//! kernels can write the shared output buffer without locks.

use rayon::prelude::*;

use crate::error::Result;
use crate::volume::VolumeShape;

/// Edge length of one scheduling tile, in voxels.
pub(crate) const TILE_EDGE: usize = 64;

/// Half-open voxel ranges of one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Tile {
    pub xs: usize,
    pub xe: usize,
    pub ys: usize,
    pub ye: usize,
    pub zs: usize,
    pub ze: usize,
}

/// Number of tiles along one axis: `s / TILE_EDGE` rounded half-up, with
/// a floor of 1. A trailing remainder shorter than half a tile merges
/// into the preceding tile instead of becoming its own undersized one.
fn axis_tiles(s: usize) -> usize {
    ((s + TILE_EDGE / 2) / TILE_EDGE).max(1)
}

/// Half-open span of tile `g` out of `count` along an axis of length `s`.
/// The last tile runs to the end of the axis, absorbing any remainder.
fn axis_span(g: usize, count: usize, s: usize) -> (usize, usize) {
    let start = g * TILE_EDGE;
    let end = if g + 1 == count { s } else { (g + 1) * TILE_EDGE };
    debug_assert!(start <= end && end <= s);
    (start, end)
}

/// The 3D grid of tiles covering a volume.
#[derive(Debug)]
pub(crate) struct TileGrid {
    shape: VolumeShape,
    gx: usize,
    gy: usize,
    gz: usize,
}

impl TileGrid {
    pub(crate) fn new(shape: VolumeShape) -> Self {
        Self {
            shape,
            gx: axis_tiles(shape.sx),
            gy: axis_tiles(shape.sy),
            gz: axis_tiles(shape.sz),
        }
    }

    pub(crate) fn tile_count(&self) -> usize {
        self.gx * self.gy * self.gz
    }

    /// All tiles of the grid, in z-major submission order.
    pub(crate) fn tiles(&self) -> Vec<Tile> {
        let mut tiles = Vec::with_capacity(self.tile_count());
        for gz in 0..self.gz {
            let (zs, ze) = axis_span(gz, self.gz, self.shape.sz);
            for gy in 0..self.gy {
                let (ys, ye) = axis_span(gy, self.gy, self.shape.sy);
                for gx in 0..self.gx {
                    let (xs, xe) = axis_span(gx, self.gx, self.shape.sx);
                    tiles.push(Tile {
                        xs,
                        xe,
                        ys,
                        ye,
                        zs,
                        ze,
                    });
                }
            }
        }
        tiles
    }

    /// Run `task` once per tile. With `threads <= 1` the tiles run
    /// serially on the calling thread; otherwise a pool scoped to this
    /// call is built with at most one worker per tile and joined before
    /// returning.
    pub(crate) fn run<F>(&self, threads: usize, task: F) -> Result<()>
    where
        F: Fn(Tile) + Send + Sync,
    {
        let tiles = self.tiles();
        let workers = threads.min(tiles.len());

        if workers <= 1 {
            for tile in tiles {
                task(tile);
            }
            return Ok(());
        }

        let pool = rayon::ThreadPoolBuilder::new().num_threads(workers).build()?;
        pool.install(|| tiles.par_iter().for_each(|&tile| task(tile)));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn test_axis_tiles_rounding() {
        // fewer than half a tile always yields one tile
        assert_eq!(axis_tiles(0), 1);
        assert_eq!(axis_tiles(1), 1);
        assert_eq!(axis_tiles(31), 1);
        // one tile up to one and a half tile lengths
        assert_eq!(axis_tiles(32), 1);
        assert_eq!(axis_tiles(64), 1);
        assert_eq!(axis_tiles(95), 1);
        // the boundary at 1.5 tiles
        assert_eq!(axis_tiles(96), 2);
        assert_eq!(axis_tiles(128), 2);
        assert_eq!(axis_tiles(159), 2);
        assert_eq!(axis_tiles(160), 3);
    }

    #[test]
    fn test_last_tile_absorbs_remainder() {
        // 100 voxels: two tiles, the second runs 64..100
        assert_eq!(axis_tiles(100), 2);
        assert_eq!(axis_span(0, 2, 100), (0, 64));
        assert_eq!(axis_span(1, 2, 100), (64, 100));

        // 95 voxels: a single oversized tile covering the whole axis
        assert_eq!(axis_span(0, 1, 95), (0, 95));
    }

    #[test]
    fn test_tiles_partition_exhaustively() {
        for (sx, sy, sz) in [
            (5, 5, 5),
            (64, 64, 64),
            (95, 31, 1),
            (100, 70, 40),
            (130, 96, 65),
        ] {
            let shape = VolumeShape::new(sx, sy, sz);
            let grid = TileGrid::new(shape);
            let tiles = grid.tiles();
            assert_eq!(tiles.len(), grid.tile_count());

            // every voxel is covered by exactly one tile
            let mut covered = vec![0u8; shape.voxel_count()];
            for t in &tiles {
                for z in t.zs..t.ze {
                    for y in t.ys..t.ye {
                        for x in t.xs..t.xe {
                            covered[shape.index(x, y, z)] += 1;
                        }
                    }
                }
            }
            assert!(
                covered.iter().all(|&c| c == 1),
                "tiles must cover {} disjointly",
                shape
            );
        }
    }

    #[test]
    fn test_run_visits_every_tile_once() {
        let shape = VolumeShape::new(130, 70, 65);
        let grid = TileGrid::new(shape);
        let expected = grid.tiles();

        for threads in [0, 1, 2, 8, 1000] {
            let seen = Mutex::new(Vec::new());
            grid.run(threads, |tile| {
                seen.lock().unwrap().push(tile);
            })
            .unwrap();

            let mut seen = seen.into_inner().unwrap();
            seen.sort_by_key(|t| (t.zs, t.ys, t.xs));
            let mut expected = expected.clone();
            expected.sort_by_key(|t| (t.zs, t.ys, t.xs));
            assert_eq!(seen, expected, "threads={}", threads);
        }
    }
}
