//! Geometry model for strided FFT buffers.
//!
//! This crate describes how the input and output of a Fourier transform are laid
//! out in host memory: logical lengths, strides, batch distances, per-plane offsets,
//! precision and array type (real, complex or Hermitian; interleaved or planar).
//! It never touches element data beyond allocating zeroed planes.
//!
//! # Core Types
//!
//! - [`TransformParams`]: Plain record of the parameters enumerated for one test case
//! - [`TransformLayout`]: Immutable, fully derived description of a transform
//! - [`BufferLayout`]: One side (input or output) of a transform, or a packed reference buffer
//! - [`HostBuffer`]: One or two zero-initialized byte planes
//! - [`ElementFormat`]: The `(precision, array type)` lookup used by every kernel
//!
//! # Derived Geometry
//!
//! - [`compute_stride`]: Row-major stride completion with optional real/complex padding
//! - [`default_idist`], [`default_odist`]: Batch distances for each placement/kind
//! - [`buffer_size`]: Per-plane element counts
//!
//! # Example
//!
//! ```rust
//! use fftcheck_layout::{Precision, TransformKind, TransformLayout, TransformParams};
//!
//! let layout = TransformLayout::new(TransformParams {
//!     length: vec![8],
//!     precision: Precision::Single,
//!     kind: TransformKind::RealForward,
//!     ..TransformParams::default()
//! })
//! .unwrap();
//!
//! assert_eq!(layout.olength(), vec![5]);
//! assert_eq!(layout.idist(), 10); // in-place padding for the packed complex bins
//! ```

mod buffer;
mod element;
mod layout;
mod stride;
mod types;

pub use buffer::{allocate_host_buffer, buffer_size, BufferLayout, HostBuffer};
pub use element::{ElementFormat, Scalar, Storage};
pub use layout::{check_iotypes, InvalidLayout, TransformLayout, TransformParams};
pub use stride::{compute_stride, default_idist, default_odist};
pub use types::{ArrayType, Placement, Precision, TransformKind};

/// Largest transform rank the geometry model accepts.
pub const MAX_DIM: usize = 3;

/// Bytes per GiB, used when reporting memory estimates.
pub const ONE_GIB: usize = 1 << 30;

// ============================================================================
// Error types
// ============================================================================

/// Configuration errors raised by the layout model and the host kernels.
///
/// Every variant indicates a caller programming error. A layout that is merely
/// infeasible for its placement is reported through [`TransformLayout::check_valid`]
/// instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FftLayoutError {
    /// Only 1-, 2- and 3-dimensional transforms are supported.
    #[error("unsupported dimension {0}: expected 1, 2 or 3")]
    UnsupportedDimension(usize),

    /// The array type cannot be used where it appeared.
    #[error("invalid {context} array type: {array_type}")]
    InvalidArrayType {
        context: &'static str,
        array_type: ArrayType,
    },

    /// The input/output array types do not match the transform's symmetry.
    #[error("invalid combination of input/output array types: {itype} -> {otype}")]
    InvalidTypeCombination { itype: ArrayType, otype: ArrayType },

    /// In-place complex transforms must keep the same array type.
    #[error("in-place transforms must have identical input and output types: {itype} -> {otype}")]
    InPlaceTypeMismatch { itype: ArrayType, otype: ArrayType },

    /// A stride vector does not match the number of axes.
    #[error("stride length mismatch: expected {expected} entries, found {found}")]
    StrideLengthMismatch { expected: usize, found: usize },

    /// Two buffer descriptions disagree on logical shape, batch count or precision.
    #[error("layout mismatch: {0}")]
    LayoutMismatch(String),

    /// A buffer carries the wrong number of planes for its array type.
    #[error("plane count mismatch: expected {expected}, found {found}")]
    PlaneCountMismatch { expected: usize, found: usize },

    /// A plane is too short for the largest offset its layout addresses.
    #[error("buffer plane {plane} too small: {required} bytes required, {actual} available")]
    BufferTooSmall {
        plane: usize,
        required: usize,
        actual: usize,
    },

    /// The operation is deliberately unsupported for this configuration.
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),
}

/// Result type for layout and kernel operations.
pub type Result<T> = std::result::Result<T, FftLayoutError>;
