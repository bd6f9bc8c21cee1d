//! Prelude module for convenient imports.
//!
//! Re-exports the most commonly used types and operations.
//!
//! # Usage
//!
//! ```rust,ignore
//! use morphium::prelude::*;
//! ```

pub use crate::{Error, LabelVolume, Result, VolumeShape, VoxelWidth, dilate, erode};
