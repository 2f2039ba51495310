//! Partitioned host kernels over strided FFT buffers.
//!
//! Every operation walks an N-D iteration box (N = 1, 2 or 3) with an odometer,
//! splitting it into at most [`ParallelConfig::max_partitions`] contiguous
//! partitions that run under rayon when the `parallel` feature is enabled.
//!
//! # Operations
//!
//! - [`copy_buffers`]: Convert between interleaved and planar storage, or restride
//! - [`distance`]: L2 / L∞ distance between two buffers, with failure locations
//! - [`norm`]: L2 / L∞ norm of one buffer
//! - [`impose_hermitian_symmetry`]: Make a half-spectrum conjugate-symmetric
//! - [`set_input`], [`compute_input`]: Deterministic pseudo-random input
//!
//! # Dependency graph
//!
//! ```text
//! fftcheck-layout -> fftcheck-kernel -> fftcheck
//! ```

#[macro_use]
mod dispatch;

pub mod access;
pub mod copy;
pub mod generate;
pub mod index;
pub mod metrics;
pub mod partition;
pub mod symmetry;
mod threading;

pub use copy::copy_buffers;
pub use generate::{compute_input, set_input};
pub use index::{compute_index, count_iters, increment_col_major, increment_row_major};
pub use metrics::{distance, norm, Distance, VectorNorms};
pub use partition::{
    partition_col_major, partition_row_major, IterationOrder, ParallelConfig, Partition,
};
pub use symmetry::impose_hermitian_symmetry;

pub use fftcheck_layout::{FftLayoutError, Result};
