//! Deterministic pseudo-random input.
//!
//! Every element draws from its own generator seeded with the element's flat
//! index, so the values do not depend on partitioning or scheduling.

use fftcheck_layout::{allocate_host_buffer, BufferLayout, HostBuffer, Scalar, Storage, TransformLayout};
use num_complex::Complex;
use rand::distributions::uniform::SampleUniform;
use rand::distributions::Uniform;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::access::{to_array, write_partitions, ElementWriter};
use crate::index::compute_index;
use crate::partition::ParallelConfig;
use crate::symmetry::impose_hermitian_symmetry;
use crate::threading::for_each_partition;
use crate::Result;

/// Fill every element of `layout` with uniform values in `[0, 1]`.
///
/// Real data draws one value per element; complex data draws the real part, then
/// the imaginary part.
pub fn set_input(buffer: &mut HostBuffer, layout: &BufferLayout, config: &ParallelConfig) -> Result<()> {
    let _span = tracing::debug_span!(
        "set_input",
        dim = layout.dim(),
        nbatch = layout.nbatch,
        array_type = %layout.array_type
    )
    .entered();

    with_scalar!(layout.precision, T => {
        with_rank!(layout.dim(), N => set_typed::<T, N>(buffer, layout, config))
    })
}

fn set_typed<T: Scalar + SampleUniform, const N: usize>(
    buffer: &mut HostBuffer,
    layout: &BufferLayout,
    config: &ParallelConfig,
) -> Result<()>
where
    T::Sampler: Sync,
{
    let writer = ElementWriter::<T>::new(buffer, layout)?;
    let real = writer.storage() == Storage::Real;
    let length: [usize; N] = to_array(&layout.length)?;
    let stride: [usize; N] = to_array(&layout.stride)?;
    let unit = Uniform::new_inclusive(T::zero(), T::one());

    let partitions = write_partitions(config, &length, layout);
    for batch in 0..layout.nbatch {
        let base = batch * layout.dist;
        for_each_partition(&partitions, |part| {
            part.for_each(|index| {
                let idx = compute_index(index, &stride, base);
                let mut rng = ChaCha8Rng::seed_from_u64(idx as u64);
                let re = rng.sample(&unit);
                let im = if real { T::zero() } else { rng.sample(&unit) };
                // SAFETY: checked layout; partitions write disjoint elements.
                unsafe { writer.write(idx, Complex::new(re, im)) };
            });
        });
    }
    Ok(())
}

/// Allocate and fill the input buffer of a transform.
///
/// Hermitian input additionally gets the symmetry of a real signal's spectrum,
/// computed against the full logical length.
pub fn compute_input(layout: &TransformLayout, config: &ParallelConfig) -> Result<HostBuffer> {
    let _span = tracing::debug_span!(
        "compute_input",
        dim = layout.dim(),
        nbatch = layout.nbatch(),
        itype = %layout.itype()
    )
    .entered();

    let ilayout = layout.input_layout();
    let mut buffer = allocate_host_buffer(
        layout.precision(),
        layout.itype(),
        layout.isize(),
    );
    set_input(&mut buffer, &ilayout, config)?;
    if layout.itype().is_hermitian() {
        impose_hermitian_symmetry(&mut buffer, &ilayout, layout.length())?;
    }
    Ok(buffer)
}
