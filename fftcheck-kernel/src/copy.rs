//! Storage conversion between strided buffers.

use fftcheck_layout::{ArrayType, BufferLayout, HostBuffer, Scalar};

use crate::access::{to_array, write_partitions, ElementReader, ElementWriter};
use crate::index::compute_index;
use crate::partition::ParallelConfig;
use crate::threading::for_each_partition;
use crate::{FftLayoutError, Result};

/// How elements move from input to output planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transcode {
    /// Same array type on both sides.
    OneToOne,
    /// Interleaved input split into two planes.
    OneToTwo,
    /// Two planes combined into interleaved output.
    TwoToOne,
}

fn transcode(itype: ArrayType, otype: ArrayType) -> Result<Transcode> {
    use ArrayType::*;
    match (itype, otype) {
        (Unset, _) | (_, Unset) => Err(FftLayoutError::InvalidTypeCombination { itype, otype }),
        (i, o) if i == o => Ok(Transcode::OneToOne),
        (ComplexInterleaved, ComplexPlanar) | (HermitianInterleaved, HermitianPlanar) => {
            Ok(Transcode::OneToTwo)
        }
        (ComplexPlanar, ComplexInterleaved) | (HermitianPlanar, HermitianInterleaved) => {
            Ok(Transcode::TwoToOne)
        }
        _ => Err(FftLayoutError::InvalidTypeCombination { itype, otype }),
    }
}

/// Copy every element of `input` into `output`, converting storage as needed.
///
/// Both layouts must describe the same logical box, batch count and precision.
/// Supported pairs are identical types, or interleaved/planar of the same
/// symmetry in either direction.
pub fn copy_buffers(
    input: &HostBuffer,
    ilayout: &BufferLayout,
    output: &mut HostBuffer,
    olayout: &BufferLayout,
    config: &ParallelConfig,
) -> Result<()> {
    let mode = transcode(ilayout.array_type, olayout.array_type)?;
    ilayout.check_compatible(olayout)?;

    let _span = tracing::debug_span!(
        "copy_buffers",
        dim = ilayout.dim(),
        nbatch = ilayout.nbatch,
        ?mode
    )
    .entered();

    with_scalar!(ilayout.precision, T => {
        with_rank!(ilayout.dim(), N => copy_typed::<T, N>(input, ilayout, output, olayout, config))
    })
}

fn copy_typed<T: Scalar, const N: usize>(
    input: &HostBuffer,
    ilayout: &BufferLayout,
    output: &mut HostBuffer,
    olayout: &BufferLayout,
    config: &ParallelConfig,
) -> Result<()> {
    let reader = ElementReader::<T>::new(input, ilayout)?;
    let writer = ElementWriter::<T>::new(output, olayout)?;

    let length: [usize; N] = to_array(&ilayout.length)?;
    let istride: [usize; N] = to_array(&ilayout.stride)?;
    let ostride: [usize; N] = to_array(&olayout.stride)?;
    let same_index = istride == ostride && ilayout.dist == olayout.dist;

    let partitions = write_partitions(config, &length, olayout);
    tracing::trace!(partitions = partitions.len(), same_index, "copy plan");

    for b in 0..ilayout.nbatch {
        let ibase = b * ilayout.dist;
        let obase = b * olayout.dist;
        for_each_partition(&partitions, |part| {
            part.for_each(|index| {
                let idx = compute_index(index, &istride, ibase);
                let odx = if same_index {
                    idx
                } else {
                    compute_index(index, &ostride, obase)
                };
                // SAFETY: both buffers were checked against their layouts and
                // partitions of a non-overlapping layout write disjoint elements.
                unsafe { writer.write(odx, reader.read(idx)) };
            });
        });
    }
    Ok(())
}
