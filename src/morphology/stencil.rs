//! Sliding-window stencil columns.
//!
//! The 3×3×3 window around a voxel decomposes into three 9-voxel columns,
//! one per x-offset; each column is the 3×3 square in the (y, z) plane at
//! that offset. As the kernels sweep along x, the middle and right columns
//! of one voxel become the left and middle columns of the next, so only
//! the leading edge has to be recomputed.

use arrayvec::ArrayVec;

use crate::volume::{VolumeShape, Voxel};

/// Non-zero labels of one 3×3 stencil column.
pub(crate) type Column<T> = ArrayVec<T, 9>;

/// Non-zero labels of a whole 27-voxel window.
pub(crate) type Window<T> = ArrayVec<T, 27>;

/// Collect the non-zero labels of the 3×3 square at x-offset `xi` around
/// `(yi, zi)` into `out`.
///
/// `xi` is signed: offsets outside `[0, sx)` yield the empty column, which
/// is how out-of-volume window slabs read as background. Positions with
/// out-of-range y or z contribute nothing. Traversal order is fixed
/// (center, y±1, z±1, then the four diagonals) so the column content is
/// deterministic for a given input.
pub(crate) fn fill_column<T: Voxel>(
    labels: &[T],
    shape: VolumeShape,
    xi: isize,
    yi: usize,
    zi: usize,
    out: &mut Column<T>,
) {
    out.clear();

    if xi < 0 || xi >= shape.sx as isize {
        return;
    }

    let sx = shape.sx;
    let sy = shape.sy;
    let sz = shape.sz;
    let sxy = sx * sy;

    let loc = xi as usize + sx * (yi + sy * zi);

    let v = labels[loc];
    if v != T::ZERO {
        out.push(v);
    }

    if yi > 0 {
        let v = labels[loc - sx];
        if v != T::ZERO {
            out.push(v);
        }
    }
    if yi < sy - 1 {
        let v = labels[loc + sx];
        if v != T::ZERO {
            out.push(v);
        }
    }
    if zi > 0 {
        let v = labels[loc - sxy];
        if v != T::ZERO {
            out.push(v);
        }
    }
    if zi < sz - 1 {
        let v = labels[loc + sxy];
        if v != T::ZERO {
            out.push(v);
        }
    }
    if yi > 0 && zi > 0 {
        let v = labels[loc - sx - sxy];
        if v != T::ZERO {
            out.push(v);
        }
    }
    if yi < sy - 1 && zi > 0 {
        let v = labels[loc + sx - sxy];
        if v != T::ZERO {
            out.push(v);
        }
    }
    if yi > 0 && zi < sz - 1 {
        let v = labels[loc - sx + sxy];
        if v != T::ZERO {
            out.push(v);
        }
    }
    if yi < sy - 1 && zi < sz - 1 {
        let v = labels[loc + sx + sxy];
        if v != T::ZERO {
            out.push(v);
        }
    }
}

/// A column is pure iff it holds a full, untruncated square of nine
/// identical labels.
#[inline]
pub(crate) fn column_is_pure<T: Voxel>(col: &Column<T>) -> bool {
    if col.len() < 9 {
        return false;
    }
    for i in 1..9 {
        if col[i] != col[i - 1] {
            return false;
        }
    }
    true
}

/// Concatenate the three columns of a window into one scratch list.
#[inline]
pub(crate) fn gather_window<T: Voxel>(
    left: &Column<T>,
    middle: &Column<T>,
    right: &Column<T>,
    out: &mut Window<T>,
) {
    out.clear();
    out.extend(left.iter().copied());
    out.extend(middle.iter().copied());
    out.extend(right.iter().copied());
}
