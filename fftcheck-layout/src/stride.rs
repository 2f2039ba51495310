//! Stride and batch-distance derivation (row-major).

use crate::{FftLayoutError, Placement, Result, TransformKind};

/// Complete a row-major stride vector for `length`.
///
/// `given` holds explicitly chosen strides for the innermost axes and is copied to
/// the end of the result. When it is empty the contiguous axis gets stride 1. The
/// remaining outer strides follow `stride[i] = stride[i + 1] * length[i + 1]`.
///
/// With `rcpadding` set, the length of the second-to-last axis's neighbour is
/// rounded up to `2 * (n / 2 + 1)` so that an in-place real transform has room
/// for the `n / 2 + 1` complex bins of each row.
///
/// ```rust
/// use fftcheck_layout::compute_stride;
///
/// assert_eq!(compute_stride(&[4, 5, 6], &[], false).unwrap(), vec![30, 6, 1]);
/// assert_eq!(compute_stride(&[4, 5, 6], &[], true).unwrap(), vec![40, 8, 1]);
/// ```
pub fn compute_stride(length: &[usize], given: &[usize], rcpadding: bool) -> Result<Vec<usize>> {
    let dim = length.len();
    if given.len() > dim {
        return Err(FftLayoutError::StrideLengthMismatch {
            expected: dim,
            found: given.len(),
        });
    }
    if dim == 0 {
        return Ok(Vec::new());
    }

    let mut stride = vec![0usize; dim];
    let mut dimoffset = 0;
    if given.is_empty() {
        stride[dim - 1] = 1;
        dimoffset = 1;
    } else {
        stride[dim - given.len()..].copy_from_slice(given);
    }

    for i in (0..dim - dimoffset - given.len()).rev() {
        let mut next_len = length[i + 1];
        if rcpadding && i == dim - 2 {
            next_len = 2 * (next_len / 2 + 1);
        }
        stride[i] = stride[i + 1] * next_len;
    }
    Ok(stride)
}

/// Default distance between input batches.
///
/// `length` is the logical transform length; the halved last axis of a
/// real-inverse input is accounted for here. Returns 0 when `istride` does not
/// cover every axis.
pub fn default_idist(
    placement: Placement,
    kind: TransformKind,
    length: &[usize],
    istride: &[usize],
) -> usize {
    let dim = length.len();
    if dim == 0 || istride.len() < dim {
        return 0;
    }

    // In-place 1D real transforms reserve room for the packed complex bins.
    if kind == TransformKind::RealForward && dim == 1 && placement == Placement::InPlace {
        return 2 * (length[0] / 2 + 1) * istride[0];
    }
    if kind == TransformKind::RealInverse && dim == 1 {
        return (length[0] / 2 + 1) * istride[0];
    }

    let last = if kind == TransformKind::RealInverse {
        (length[dim - 1] / 2 + 1) * istride[dim - 1]
    } else {
        length[dim - 1] * istride[dim - 1]
    };
    outer_extent(last, &length[..dim - 1], istride)
}

/// Default distance between output batches. Mirror image of [`default_idist`].
pub fn default_odist(
    placement: Placement,
    kind: TransformKind,
    length: &[usize],
    ostride: &[usize],
) -> usize {
    let dim = length.len();
    if dim == 0 || ostride.len() < dim {
        return 0;
    }

    if kind == TransformKind::RealInverse && dim == 1 && placement == Placement::InPlace {
        return 2 * (length[0] / 2 + 1) * ostride[0];
    }
    if kind == TransformKind::RealForward && dim == 1 {
        return (length[0] / 2 + 1) * ostride[0];
    }

    let last = if kind == TransformKind::RealForward {
        (length[dim - 1] / 2 + 1) * ostride[dim - 1]
    } else {
        length[dim - 1] * ostride[dim - 1]
    };
    outer_extent(last, &length[..dim - 1], ostride)
}

fn outer_extent(last: usize, outer_length: &[usize], stride: &[usize]) -> usize {
    outer_length
        .iter()
        .zip(stride.iter())
        .map(|(&l, &s)| l * s)
        .fold(last, usize::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_stride_contiguous() {
        assert_eq!(compute_stride(&[4, 5, 6], &[], false).unwrap(), vec![30, 6, 1]);
        assert_eq!(compute_stride(&[7], &[], false).unwrap(), vec![1]);
        assert_eq!(compute_stride(&[3, 9], &[], false).unwrap(), vec![9, 1]);
    }

    #[test]
    fn test_compute_stride_given_innermost() {
        assert_eq!(compute_stride(&[4, 5, 6], &[2], false).unwrap(), vec![60, 12, 2]);
        assert_eq!(
            compute_stride(&[4, 5, 6], &[100, 3], false).unwrap(),
            vec![500, 100, 3]
        );
        assert_eq!(
            compute_stride(&[4, 5, 6], &[1, 2, 3], false).unwrap(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_compute_stride_rcpadding() {
        // 2D real in-place: rows padded from 8 to 2 * (8/2 + 1) = 10
        assert_eq!(compute_stride(&[4, 8], &[], true).unwrap(), vec![10, 1]);
        // odd row length 7 -> 2 * (7/2 + 1) = 8
        assert_eq!(compute_stride(&[4, 7], &[], true).unwrap(), vec![8, 1]);
        // 3D: only the innermost row is padded
        assert_eq!(compute_stride(&[2, 3, 4], &[], true).unwrap(), vec![18, 6, 1]);
        // 1D: nothing to pad
        assert_eq!(compute_stride(&[8], &[], true).unwrap(), vec![1]);
    }

    #[test]
    fn test_compute_stride_too_many_given() {
        assert_eq!(
            compute_stride(&[4], &[1, 1], false),
            Err(FftLayoutError::StrideLengthMismatch {
                expected: 1,
                found: 2
            })
        );
    }

    #[test]
    fn test_default_dist_complex() {
        let kind = TransformKind::ComplexForward;
        assert_eq!(default_idist(Placement::InPlace, kind, &[8], &[1]), 8);
        assert_eq!(default_odist(Placement::InPlace, kind, &[8], &[1]), 8);
        assert_eq!(default_idist(Placement::OutOfPlace, kind, &[4, 6], &[6, 1]), 24);
        assert_eq!(default_idist(Placement::OutOfPlace, kind, &[8], &[3]), 24);
    }

    #[test]
    fn test_default_dist_real_1d() {
        let fwd = TransformKind::RealForward;
        assert_eq!(default_idist(Placement::InPlace, fwd, &[8], &[1]), 10);
        assert_eq!(default_idist(Placement::OutOfPlace, fwd, &[8], &[1]), 8);
        assert_eq!(default_odist(Placement::InPlace, fwd, &[8], &[1]), 5);
        assert_eq!(default_odist(Placement::OutOfPlace, fwd, &[8], &[1]), 5);

        let inv = TransformKind::RealInverse;
        assert_eq!(default_idist(Placement::OutOfPlace, inv, &[8], &[1]), 5);
        assert_eq!(default_odist(Placement::InPlace, inv, &[8], &[1]), 10);
        assert_eq!(default_odist(Placement::OutOfPlace, inv, &[8], &[1]), 8);
    }

    #[test]
    fn test_default_dist_real_2d() {
        // Padded in-place real-forward input: stride [10, 1]
        let fwd = TransformKind::RealForward;
        assert_eq!(default_idist(Placement::InPlace, fwd, &[4, 8], &[10, 1]), 40);
        // Hermitian output rows hold 5 bins
        assert_eq!(default_odist(Placement::InPlace, fwd, &[4, 8], &[5, 1]), 20);
    }
}
