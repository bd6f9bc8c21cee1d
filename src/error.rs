//! Error types for volume morphology operations.

use thiserror::Error;

use crate::volume::{VolumeShape, VoxelWidth};

/// Errors that can occur when constructing volumes or running operators.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported voxel width: {0} bytes (supported widths are 1, 2, 4 and 8)")]
    UnsupportedWidth(usize),

    #[error("expected a 3-dimensional volume, got {0} dimensions")]
    RankMismatch(usize),

    #[error(
        "voxel data is {actual} bytes but a {shape} volume of {width} voxels requires {expected}"
    )]
    LengthMismatch {
        shape: VolumeShape,
        width: VoxelWidth,
        expected: usize,
        actual: usize,
    },

    #[error("failed to build worker pool: {source}")]
    ThreadPool {
        #[from]
        source: rayon::ThreadPoolBuildError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_width_message() {
        let err = Error::UnsupportedWidth(3);
        assert_eq!(
            err.to_string(),
            "unsupported voxel width: 3 bytes (supported widths are 1, 2, 4 and 8)"
        );
    }

    #[test]
    fn test_rank_mismatch_message() {
        let err = Error::RankMismatch(2);
        assert!(err.to_string().contains("3-dimensional"));
        assert!(err.to_string().contains('2'));
    }

    #[test]
    fn test_length_mismatch_message() {
        let err = Error::LengthMismatch {
            shape: VolumeShape::new(4, 4, 4),
            width: VoxelWidth::U16,
            expected: 128,
            actual: 64,
        };
        let msg = err.to_string();
        assert!(msg.contains("4x4x4"));
        assert!(msg.contains("u16"));
        assert!(msg.contains("128"));
        assert!(msg.contains("64"));
    }

    #[test]
    fn test_error_is_debug() {
        let err = Error::RankMismatch(1);
        assert!(format!("{:?}", err).contains("RankMismatch"));
    }
}
