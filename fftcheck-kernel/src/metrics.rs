//! Error metrics: buffer distance and norm.

use std::sync::{Mutex, PoisonError};

use fftcheck_layout::{ArrayType, BufferLayout, HostBuffer, Scalar};

use crate::access::{to_array, ElementReader};
use crate::index::compute_index;
use crate::partition::ParallelConfig;
use crate::threading::map_partitions;
use crate::{FftLayoutError, Result};

/// L2 and L∞ magnitudes of a buffer or of a difference.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VectorNorms {
    pub l2: f64,
    pub linf: f64,
}

/// Result of [`distance`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Distance {
    pub norms: VectorNorms,
    /// `(batch, flat index into the first buffer)` of every component whose
    /// difference exceeded the cutoff, sorted. A complex element may appear twice.
    pub failures: Vec<(usize, usize)>,
}

/// Partition-local accumulator; `l2` holds the sum of squares.
#[derive(Debug, Clone, Copy, Default)]
struct Partial {
    l2: f64,
    linf: f64,
}

impl Partial {
    #[inline]
    fn add(&mut self, value: f64) {
        self.linf = self.linf.max(value);
        self.l2 += value * value;
    }

    fn merge(self, other: Partial) -> Partial {
        Partial {
            l2: self.l2 + other.l2,
            linf: self.linf.max(other.linf),
        }
    }

    fn finish(self) -> VectorNorms {
        VectorNorms {
            l2: self.l2.sqrt(),
            linf: self.linf,
        }
    }
}

fn comparable(atype: ArrayType, btype: ArrayType) -> bool {
    use ArrayType::*;
    match (atype, btype) {
        (Unset, _) | (_, Unset) => false,
        (a, b) if a == b => true,
        (ComplexInterleaved, ComplexPlanar)
        | (ComplexPlanar, ComplexInterleaved)
        | (HermitianInterleaved, HermitianPlanar)
        | (HermitianPlanar, HermitianInterleaved) => true,
        _ => false,
    }
}

/// L2 and L∞ distance between `a` and `b`, component by component.
///
/// Each component difference greater than `linf_cutoff` is reported in
/// [`Distance::failures`]. Interleaved and planar buffers of the same symmetry
/// may be compared with each other.
pub fn distance(
    a: &HostBuffer,
    alayout: &BufferLayout,
    b: &HostBuffer,
    blayout: &BufferLayout,
    linf_cutoff: f64,
    config: &ParallelConfig,
) -> Result<Distance> {
    if !comparable(alayout.array_type, blayout.array_type) {
        return Err(FftLayoutError::InvalidTypeCombination {
            itype: alayout.array_type,
            otype: blayout.array_type,
        });
    }
    alayout.check_compatible(blayout)?;

    let _span = tracing::debug_span!(
        "distance",
        dim = alayout.dim(),
        nbatch = alayout.nbatch,
        linf_cutoff
    )
    .entered();

    let result = with_scalar!(alayout.precision, T => {
        with_rank!(alayout.dim(), N => distance_typed::<T, N>(a, alayout, b, blayout, linf_cutoff, config))
    })?;
    tracing::trace!(
        l2 = result.norms.l2,
        linf = result.norms.linf,
        failures = result.failures.len(),
        "distance computed"
    );
    Ok(result)
}

fn distance_typed<T: Scalar, const N: usize>(
    a: &HostBuffer,
    alayout: &BufferLayout,
    b: &HostBuffer,
    blayout: &BufferLayout,
    linf_cutoff: f64,
    config: &ParallelConfig,
) -> Result<Distance> {
    let ra = ElementReader::<T>::new(a, alayout)?;
    let rb = ElementReader::<T>::new(b, blayout)?;
    let components = ra.storage().components();

    let length: [usize; N] = to_array(&alayout.length)?;
    let astride: [usize; N] = to_array(&alayout.stride)?;
    let bstride: [usize; N] = to_array(&blayout.stride)?;
    let same_index = astride == bstride && alayout.dist == blayout.dist;

    let partitions = config.partitions(&length);
    let failures = Mutex::new(Vec::new());
    let mut total = Partial::default();

    for batch in 0..alayout.nbatch {
        let abase = batch * alayout.dist;
        let bbase = batch * blayout.dist;
        let partials = map_partitions(&partitions, |part| {
            let mut acc = Partial::default();
            part.for_each(|index| {
                let idx = compute_index(index, &astride, abase);
                let bdx = if same_index {
                    idx
                } else {
                    compute_index(index, &bstride, bbase)
                };
                let x = ra.read(idx);
                let y = rb.read(bdx);
                let diffs = [(x.re - y.re).abs(), (x.im - y.im).abs()];
                for &d in &diffs[..components] {
                    let d: f64 = d.into();
                    if d > linf_cutoff {
                        failures
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .push((batch, idx));
                    }
                    acc.add(d);
                }
            });
            acc
        });
        total = partials.into_iter().fold(total, Partial::merge);
    }

    let mut failures = failures.into_inner().unwrap_or_else(PoisonError::into_inner);
    failures.sort_unstable();
    Ok(Distance {
        norms: total.finish(),
        failures,
    })
}

/// L2 and L∞ norm of every component of `buffer`.
pub fn norm(
    buffer: &HostBuffer,
    layout: &BufferLayout,
    config: &ParallelConfig,
) -> Result<VectorNorms> {
    let _span = tracing::debug_span!("norm", dim = layout.dim(), nbatch = layout.nbatch).entered();
    with_scalar!(layout.precision, T => {
        with_rank!(layout.dim(), N => norm_typed::<T, N>(buffer, layout, config))
    })
}

fn norm_typed<T: Scalar, const N: usize>(
    buffer: &HostBuffer,
    layout: &BufferLayout,
    config: &ParallelConfig,
) -> Result<VectorNorms> {
    let reader = ElementReader::<T>::new(buffer, layout)?;
    let components = reader.storage().components();
    let length: [usize; N] = to_array(&layout.length)?;
    let stride: [usize; N] = to_array(&layout.stride)?;
    let partitions = config.partitions(&length);

    let mut total = Partial::default();
    for batch in 0..layout.nbatch {
        let base = batch * layout.dist;
        let partials = map_partitions(&partitions, |part| {
            let mut acc = Partial::default();
            part.for_each(|index| {
                let x = reader.read(compute_index(index, &stride, base));
                for &v in &[x.re, x.im][..components] {
                    acc.add(v.abs().into());
                }
            });
            acc
        });
        total = partials.into_iter().fold(total, Partial::merge);
    }
    Ok(total.finish())
}
