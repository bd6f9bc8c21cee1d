//! Dense multi-label volume storage.
//!
//! A [`LabelVolume`] is a contiguous, column-major 3D grid of unsigned
//! integer labels. The element width is carried at runtime as a
//! [`VoxelWidth`] tag over byte storage, so a single volume value can hold
//! any of the four supported widths; kernels are instantiated per width
//! through the [`Voxel`] trait with no polymorphism in their inner loops.


use aligned_vec::AVec;

use crate::error::{Error, Result};

/// 8-byte alignment for voxel data to allow zero-copy casting to any
/// supported voxel type, u64 included.
const ALIGNMENT: usize = 8;

/// Supported voxel element widths, tagged by byte count.
#[derive(Debug, Hash, PartialEq, Eq, Copy, Clone, Default)]
#[repr(u8)]
pub enum VoxelWidth {
    U8 = 1,
    U16 = 2,
    #[default]
    U32 = 4,
    U64 = 8,
}

impl VoxelWidth {
    /// Size of one voxel in bytes.
    pub fn byte_count(&self) -> usize {
        *self as usize
    }

    /// Map an element size in bytes to a width tag.
    pub fn from_byte_count(bytes: usize) -> Result<VoxelWidth> {
        match bytes {
            1 => Ok(VoxelWidth::U8),
            2 => Ok(VoxelWidth::U16),
            4 => Ok(VoxelWidth::U32),
            8 => Ok(VoxelWidth::U64),
            _ => Err(Error::UnsupportedWidth(bytes)),
        }
    }
}

impl std::fmt::Display for VoxelWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoxelWidth::U8 => write!(f, "u8"),
            VoxelWidth::U16 => write!(f, "u16"),
            VoxelWidth::U32 => write!(f, "u32"),
            VoxelWidth::U64 => write!(f, "u64"),
        }
    }
}

/// Dimensions of a 3D volume, x fastest.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash, Default)]
pub struct VolumeShape {
    pub sx: usize,
    pub sy: usize,
    pub sz: usize,
}

impl VolumeShape {
    pub fn new(sx: usize, sy: usize, sz: usize) -> Self {
        Self { sx, sy, sz }
    }

    /// Total number of voxels.
    pub fn voxel_count(&self) -> usize {
        self.sx * self.sy * self.sz
    }

    /// Column-major linear index of `(x, y, z)`.
    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        debug_assert!(x < self.sx && y < self.sy && z < self.sz);
        x + self.sx * (y + self.sy * z)
    }
}

impl std::fmt::Display for VolumeShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.sx, self.sy, self.sz)
    }
}

/// An unsigned integer voxel element. Implemented for exactly `u8`,
/// `u16`, `u32` and `u64`; the value `0` is reserved for background.
pub trait Voxel:
    Copy + Ord + Eq + std::fmt::Debug + bytemuck::Pod + Send + Sync + 'static
{
    const WIDTH: VoxelWidth;
    const ZERO: Self;

    /// Widening conversion used by diagnostics and tests.
    fn widen(self) -> u64;
}

macro_rules! impl_voxel {
    ($($t:ty => $w:ident),+ $(,)?) => {
        $(
            impl Voxel for $t {
                const WIDTH: VoxelWidth = VoxelWidth::$w;
                const ZERO: Self = 0;

                #[inline]
                fn widen(self) -> u64 {
                    self as u64
                }
            }
        )+
    };
}

impl_voxel!(u8 => U8, u16 => U16, u32 => U32, u64 => U64);

/// A dense 3D multi-label volume with 8-byte aligned storage.
///
/// Layout is column-major ("Fortran" order): the linear index of
/// `(x, y, z)` is `x + sx * (y + sy * z)`. Labels are opaque unsigned
/// integers; `0` means background.
#[derive(Clone, Debug)]
pub struct LabelVolume {
    shape: VolumeShape,
    width: VoxelWidth,
    bytes: AVec<u8>,
}

impl LabelVolume {
    /// Allocate a volume filled with background.
    pub fn zeroed(shape: VolumeShape, width: VoxelWidth) -> Self {
        let size = shape.voxel_count() * width.byte_count();
        let mut bytes = AVec::with_capacity(ALIGNMENT, size);
        bytes.resize(size, 0);
        Self {
            shape,
            width,
            bytes,
        }
    }

    /// Wrap raw voxel bytes. The byte length must match the shape and
    /// width exactly.
    pub fn from_bytes(shape: VolumeShape, width: VoxelWidth, bytes: Vec<u8>) -> Result<Self> {
        let expected = shape.voxel_count() * width.byte_count();
        if bytes.len() != expected {
            return Err(Error::LengthMismatch {
                shape,
                width,
                expected,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            shape,
            width,
            bytes: vec_to_avec(bytes),
        })
    }

    /// Construct from a caller-supplied shape slice and element size,
    /// validating rank and width before anything is allocated.
    pub fn from_dims(dims: &[usize], width_bytes: usize, bytes: Vec<u8>) -> Result<Self> {
        let &[sx, sy, sz] = dims else {
            return Err(Error::RankMismatch(dims.len()));
        };
        let width = VoxelWidth::from_byte_count(width_bytes)?;
        Self::from_bytes(VolumeShape::new(sx, sy, sz), width, bytes)
    }

    /// Construct from typed voxels; the width tag is taken from the
    /// element type.
    pub fn from_voxels<T: Voxel>(shape: VolumeShape, voxels: Vec<T>) -> Result<Self> {
        Self::from_bytes(shape, T::WIDTH, bytemuck::cast_slice(&voxels).to_vec())
    }

    pub fn shape(&self) -> VolumeShape {
        self.shape
    }

    pub fn width(&self) -> VoxelWidth {
        self.width
    }

    pub fn size_in_bytes(&self) -> usize {
        self.bytes.len()
    }

    /// Raw voxel bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Move the storage out as plain bytes (zero-copy due to the 8-byte
    /// alignment).
    pub fn into_bytes(self) -> Vec<u8> {
        let (ptr, _align, len, capacity) = self.bytes.into_raw_parts();
        // SAFETY: AVec guarantees the pointer is valid and was allocated
        // for `capacity` bytes; we take over ownership of the allocation.
        unsafe { Vec::from_raw_parts(ptr, len, capacity) }
    }

    /// View the voxels at their static type. Panics if `T` does not match
    /// the volume's width tag.
    pub fn voxels<T: Voxel>(&self) -> &[T] {
        assert_eq!(
            T::WIDTH,
            self.width,
            "voxel type is {} wide but the volume holds {} voxels",
            T::WIDTH,
            self.width
        );
        bytemuck::cast_slice(&self.bytes)
    }

    /// Mutable typed view. Panics if `T` does not match the width tag.
    pub fn voxels_mut<T: Voxel>(&mut self) -> &mut [T] {
        assert_eq!(
            T::WIDTH,
            self.width,
            "voxel type is {} wide but the volume holds {} voxels",
            T::WIDTH,
            self.width
        );
        bytemuck::cast_slice_mut(&mut self.bytes)
    }

    /// Widening read of a single voxel, for diagnostics and tests.
    pub fn get(&self, x: usize, y: usize, z: usize) -> u64 {
        let idx = self.shape.index(x, y, z);
        match self.width {
            VoxelWidth::U8 => self.voxels::<u8>()[idx].widen(),
            VoxelWidth::U16 => self.voxels::<u16>()[idx].widen(),
            VoxelWidth::U32 => self.voxels::<u32>()[idx].widen(),
            VoxelWidth::U64 => self.voxels::<u64>()[idx],
        }
    }
}

/// Convert Vec<u8> to AVec<u8>, zero-copy if already aligned, otherwise copies.
fn vec_to_avec(bytes: Vec<u8>) -> AVec<u8> {
    let ptr = bytes.as_ptr();
    if (ptr as usize).is_multiple_of(ALIGNMENT) {
        // Already aligned - zero-copy conversion
        let (ptr, len, capacity) = {
            let mut bytes = std::mem::ManuallyDrop::new(bytes);
            (bytes.as_mut_ptr(), bytes.len(), bytes.capacity())
        };
        // SAFETY: pointer is verified to be ALIGNMENT-aligned, and we own the memory
        unsafe { AVec::from_raw_parts(ptr, ALIGNMENT, len, capacity) }
    } else {
        // Not aligned - must copy
        AVec::from_slice(ALIGNMENT, &bytes)
    }
}
