//! Morphium - morphological operators for dense 3D multi-label volumes.
//!
//! Unlike binary morphology, every voxel carries an opaque integer label
//! identifier (`0` is background) and the operators preserve and combine
//! identifiers rather than bits:
//! - [`dilate`] grows labels by a plurality vote over each voxel's
//!   3×3×3 window, with ties going to the smallest label
//! - [`erode`] keeps a voxel only when its whole 3×3×3 window carries
//!   the voxel's own label
//!
//! Volumes are contiguous and column-major (x fastest), with voxel widths
//! of 1, 2, 4 or 8 bytes selected at runtime. Both operators cut the
//! volume into cubic tiles and process them on a worker pool scoped to
//! the call; results are bit-identical for every thread count.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use morphium::{LabelVolume, VolumeShape, dilate, erode};
//!
//! let shape = VolumeShape::new(256, 256, 128);
//! let volume = LabelVolume::from_voxels(shape, segmentation)?;
//!
//! let grown = dilate(&volume, /* background_only */ true, /* threads */ 8)?;
//! let shrunk = erode(&volume, 8)?;
//! ```

mod common;
mod error;
pub(crate) mod morphology;
mod volume;

#[cfg(test)]
pub(crate) mod testing;

pub mod prelude;

pub use error::{Error, Result};
pub use morphology::{dilate, erode};
pub use volume::{LabelVolume, Voxel, VolumeShape, VoxelWidth};

/// Benchmark entry points, compiled with the `bench` feature.
#[cfg(feature = "bench")]
pub mod bench {
    pub use crate::morphology::dilation::bench as dilate;
    pub use crate::morphology::erosion::bench as erode;
}
