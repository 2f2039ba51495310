//! N-D odometer over fixed-rank index tuples.

/// Advance `index` in row-major order (last axis fastest) within `[0, end)`.
///
/// An axis that reaches its bound resets to zero and carries into the next slower
/// axis. Returns `false` once axis 0 overflows; `index` is then all zeros on the
/// carried axes and must not be used further.
#[inline]
pub fn increment_row_major<const N: usize>(index: &mut [usize; N], end: &[usize; N]) -> bool {
    for i in (0..N).rev() {
        index[i] += 1;
        if index[i] < end[i] {
            return true;
        }
        index[i] = 0;
    }
    false
}

/// Advance `index` in column-major order (first axis fastest) within `[0, end)`.
///
/// Returns `false` once axis `N - 1` overflows.
#[inline]
pub fn increment_col_major<const N: usize>(index: &mut [usize; N], end: &[usize; N]) -> bool {
    for i in 0..N {
        index[i] += 1;
        if index[i] < end[i] {
            return true;
        }
        index[i] = 0;
    }
    false
}

/// Flat element offset of `index`: `base + sum(index[i] * stride[i])`.
#[inline]
pub fn compute_index<const N: usize>(index: &[usize; N], stride: &[usize; N], base: usize) -> usize {
    index
        .iter()
        .zip(stride.iter())
        .fold(base, |acc, (&i, &s)| acc + i * s)
}

/// Number of points in an iteration box.
#[inline]
pub fn count_iters(length: &[usize]) -> usize {
    length.iter().product()
}
