//! Hermitian symmetry for half-spectra of real signals.
//!
//! A half-spectrum keeps `n / 2 + 1` bins of the last axis. Bins 0 and, for even
//! `n`, `n / 2` are their own mirror along that axis, so within each of those
//! planes the spectrum must satisfy `X[p] = conj(X[-p mod L])` over the remaining
//! axes. Every other stored bin has its mirror outside the buffer and is free.

use fftcheck_layout::{ArrayType, BufferLayout, HostBuffer, Scalar, MAX_DIM};

use crate::access::{to_array, ElementWriter};
use crate::index::{compute_index, increment_row_major};
use crate::{FftLayoutError, Result};

/// Overwrite the redundant bins of `buffer` so it is the spectrum of a real signal.
///
/// `length` is the full logical transform length; `layout.length` holds the
/// stored extent, whose last axis must reach `length[last] / 2`. Planar data is
/// only supported for 1-D transforms.
pub fn impose_hermitian_symmetry(
    buffer: &mut HostBuffer,
    layout: &BufferLayout,
    length: &[usize],
) -> Result<()> {
    match layout.array_type {
        ArrayType::HermitianInterleaved
        | ArrayType::ComplexInterleaved
        | ArrayType::HermitianPlanar
        | ArrayType::ComplexPlanar => {}
        other => {
            return Err(FftLayoutError::InvalidArrayType {
                context: "hermitian symmetry",
                array_type: other,
            })
        }
    }
    if length.is_empty() || length.len() > MAX_DIM {
        return Err(FftLayoutError::UnsupportedDimension(length.len()));
    }
    if layout.array_type.is_planar() && length.len() > 1 {
        return Err(FftLayoutError::NotImplemented(
            "hermitian symmetry for multi-dimensional planar data",
        ));
    }
    check_extent(layout, length)?;

    let _span = tracing::debug_span!(
        "impose_hermitian_symmetry",
        dim = length.len(),
        nbatch = layout.nbatch
    )
    .entered();

    with_scalar!(layout.precision, T => {
        with_rank!(length.len(), N => impose_typed::<T, N>(buffer, layout, length))
    })
}

fn check_extent(layout: &BufferLayout, length: &[usize]) -> Result<()> {
    let dim = length.len();
    let stored = &layout.length;
    let fits = stored.len() == dim
        && dim > 0
        && stored[..dim - 1] == length[..dim - 1]
        && stored[dim - 1] > length[dim - 1] / 2;
    if fits || length.iter().any(|&l| l == 0) && stored.len() == dim {
        Ok(())
    } else {
        Err(FftLayoutError::LayoutMismatch(format!(
            "stored extent {stored:?} does not hold the half-spectrum of {length:?}"
        )))
    }
}

fn impose_typed<T: Scalar, const N: usize>(
    buffer: &mut HostBuffer,
    layout: &BufferLayout,
    length: &[usize],
) -> Result<()> {
    let full: [usize; N] = to_array(length)?;
    let stride: [usize; N] = to_array(&layout.stride)?;
    if full.iter().any(|&l| l == 0) {
        return Ok(());
    }

    let buf = ElementWriter::<T>::new(buffer, layout)?;

    let n = full[N - 1];
    let mut planes = vec![0];
    if n % 2 == 0 && n / 2 != 0 {
        planes.push(n / 2);
    }

    // Walk every axis but the last; the last coordinate is pinned per plane.
    let mut outer = full;
    outer[N - 1] = 1;

    for batch in 0..layout.nbatch {
        let base = batch * layout.dist;
        for &k in &planes {
            let mut p = [0usize; N];
            loop {
                let mut q = [0usize; N];
                for axis in 0..N - 1 {
                    q[axis] = (full[axis] - p[axis]) % full[axis];
                }
                let mut pk = p;
                pk[N - 1] = k;
                q[N - 1] = k;

                let pdx = compute_index(&pk, &stride, base);
                // Only the lower member of a mirror pair is read, never a written one.
                // SAFETY: single-threaded; indices inside the checked layout.
                if pk == q {
                    let mut v = unsafe { buf.read(pdx) };
                    v.im = T::zero();
                    unsafe { buf.write(pdx, v) };
                } else if pk < q {
                    let qdx = compute_index(&q, &stride, base);
                    unsafe { buf.write(qdx, buf.read(pdx).conj()) };
                }

                if !increment_row_major(&mut p, &outer) {
                    break;
                }
            }
        }
    }
    Ok(())
}
