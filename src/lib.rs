//! Host-side verification utilities for strided, batched FFTs.
//!
//! A transform under test is described by a [`TransformLayout`]: logical length,
//! per-side strides and batch distances, plane offsets, precision and the storage
//! format of each side. From that description this crate generates deterministic
//! input, converts buffers between storage formats, imposes Hermitian symmetry on
//! half-spectra, and measures L2 / L∞ error against a reference.
//!
//! # Core Types
//!
//! - [`TransformParams`] / [`TransformLayout`]: Parameters of one test case and the
//!   fully derived layout
//! - [`BufferLayout`]: Addressing of one strided, batched buffer
//! - [`HostBuffer`]: One or two zero-initialized byte planes
//! - [`ParallelConfig`]: Explicit partitioning and worker settings
//!
//! # Kernels
//!
//! - [`compute_input`] / [`set_input`]: Deterministic uniform input in `[0, 1]`
//! - [`copy_buffers`]: Interleaved <-> planar conversion and restriding
//! - [`distance`] / [`norm`]: Error metrics with failure locations
//! - [`impose_hermitian_symmetry`]: Conjugate symmetry of a real signal's spectrum
//!
//! # Example
//!
//! ```rust
//! use fftcheck::{
//!     compute_input, copy_buffers, distance, ArrayType, BufferLayout, ParallelConfig,
//!     Placement, TransformLayout, TransformParams,
//! };
//!
//! let layout = TransformLayout::new(TransformParams {
//!     length: vec![16, 12],
//!     placement: Placement::OutOfPlace,
//!     nbatch: 2,
//!     ..TransformParams::default()
//! })
//! .unwrap();
//! assert!(layout.valid());
//!
//! let config = ParallelConfig::default();
//! let input = compute_input(&layout, &config).unwrap();
//!
//! // Copy into a packed planar reference and compare.
//! let ilayout = layout.input_layout();
//! let reference =
//!     BufferLayout::contiguous(layout.precision(), ArrayType::ComplexPlanar, &[16, 12], 2)
//!         .unwrap();
//! let mut planar = reference.allocate().unwrap();
//! copy_buffers(&input, &ilayout, &mut planar, &reference, &config).unwrap();
//!
//! let d = distance(&input, &ilayout, &planar, &reference, 0.0, &config).unwrap();
//! assert_eq!(d.norms.linf, 0.0);
//! assert!(d.failures.is_empty());
//! ```
//!
//! # Parallelism
//!
//! With the default `parallel` feature, kernels split the iteration box of each
//! batch into at most [`ParallelConfig::max_partitions`] partitions and run them
//! on the rayon pool. Results do not depend on the partitioning.

pub use fftcheck_layout::{
    allocate_host_buffer, buffer_size, check_iotypes, compute_stride, default_idist,
    default_odist, ArrayType, BufferLayout, ElementFormat, FftLayoutError, HostBuffer,
    InvalidLayout, Placement, Precision, Result, Scalar, Storage, TransformKind, TransformLayout,
    TransformParams, MAX_DIM, ONE_GIB,
};

pub use fftcheck_kernel::{
    compute_index, compute_input, copy_buffers, count_iters, distance,
    impose_hermitian_symmetry, increment_col_major, increment_row_major, norm,
    partition_col_major, partition_row_major, set_input, Distance, IterationOrder,
    ParallelConfig, Partition, VectorNorms,
};

pub use fftcheck_kernel::access::{ElementReader, ElementWriter};
