//! Morphological operators over multi-label volumes.
//!
//! Both operators use the full 3×3×3 structuring element. Work is
//! partitioned into cubic tiles processed in parallel; each output voxel
//! belongs to exactly one tile, so workers share the output buffer
//! without synchronization beyond the final join.

pub(crate) mod dilation;
pub(crate) mod erosion;
pub(crate) mod grid;
pub(crate) mod stencil;


use crate::error::Result;
use crate::volume::{LabelVolume, VoxelWidth};

/// Morphological dilation of a multi-label volume using a 3×3×3
/// structuring element.
///
/// Every output voxel takes the most frequent non-zero label of its
/// 27-voxel window (ties go to the smallest label); voxels with an all
/// background window stay background. With `background_only` set, only
/// background voxels may change; non-zero input voxels are copied through
/// verbatim. `threads` caps the worker count (`0` or `1` runs serially)
/// and is clamped to the number of scheduling tiles.
///
/// The result is a newly allocated volume of identical shape and width.
pub fn dilate(labels: &LabelVolume, background_only: bool, threads: usize) -> Result<LabelVolume> {
    let shape = labels.shape();
    let mut output = LabelVolume::zeroed(shape, labels.width());

    match labels.width() {
        VoxelWidth::U8 => dilation::dilate_volume::<u8>(
            labels.voxels(),
            output.voxels_mut(),
            shape,
            background_only,
            threads,
        )?,
        VoxelWidth::U16 => dilation::dilate_volume::<u16>(
            labels.voxels(),
            output.voxels_mut(),
            shape,
            background_only,
            threads,
        )?,
        VoxelWidth::U32 => dilation::dilate_volume::<u32>(
            labels.voxels(),
            output.voxels_mut(),
            shape,
            background_only,
            threads,
        )?,
        VoxelWidth::U64 => dilation::dilate_volume::<u64>(
            labels.voxels(),
            output.voxels_mut(),
            shape,
            background_only,
            threads,
        )?,
    }

    Ok(output)
}

/// Morphological erosion of a multi-label volume using a 3×3×3
/// structuring element.
///
/// A voxel keeps its label only when all 27 voxels of its window carry
/// that same non-zero label; every other voxel becomes background. Voxels
/// on the volume boundary always erode, since their windows are truncated
/// by the implicit zero background outside the volume. `threads` behaves
/// as in [`dilate`].
pub fn erode(labels: &LabelVolume, threads: usize) -> Result<LabelVolume> {
    let shape = labels.shape();
    let mut output = LabelVolume::zeroed(shape, labels.width());

    match labels.width() {
        VoxelWidth::U8 => {
            erosion::erode_volume::<u8>(labels.voxels(), output.voxels_mut(), shape, threads)?
        }
        VoxelWidth::U16 => {
            erosion::erode_volume::<u16>(labels.voxels(), output.voxels_mut(), shape, threads)?
        }
        VoxelWidth::U32 => {
            erosion::erode_volume::<u32>(labels.voxels(), output.voxels_mut(), shape, threads)?
        }
        VoxelWidth::U64 => {
            erosion::erode_volume::<u64>(labels.voxels(), output.voxels_mut(), shape, threads)?
        }
    }

    Ok(output)
}
