//! Enumerations describing a transform and its buffers.

use std::fmt;

use crate::{FftLayoutError, Result};

/// Floating-point precision of every element in a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Precision {
    Single,
    #[default]
    Double,
}

impl Precision {
    /// Size in bytes of one real scalar.
    #[inline]
    pub fn scalar_size(self) -> usize {
        match self {
            Precision::Single => std::mem::size_of::<f32>(),
            Precision::Double => std::mem::size_of::<f64>(),
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precision::Single => f.write_str("single-precision"),
            Precision::Double => f.write_str("double-precision"),
        }
    }
}

/// Direction and symmetry of the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransformKind {
    #[default]
    ComplexForward,
    ComplexInverse,
    RealForward,
    RealInverse,
}

impl TransformKind {
    /// True for real-to-complex and complex-to-real transforms.
    #[inline]
    pub fn is_real(self) -> bool {
        matches!(self, TransformKind::RealForward | TransformKind::RealInverse)
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransformKind::ComplexForward => "complex-forward",
            TransformKind::ComplexInverse => "complex-inverse",
            TransformKind::RealForward => "real-forward",
            TransformKind::RealInverse => "real-inverse",
        };
        f.write_str(name)
    }
}

/// Whether the output overwrites the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Placement {
    #[default]
    InPlace,
    OutOfPlace,
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placement::InPlace => f.write_str("in-place"),
            Placement::OutOfPlace => f.write_str("out-of-place"),
        }
    }
}

/// Storage format of one side of a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ArrayType {
    ComplexInterleaved,
    ComplexPlanar,
    Real,
    HermitianInterleaved,
    HermitianPlanar,
    #[default]
    Unset,
}

impl ArrayType {
    /// Every array type except [`ArrayType::Unset`].
    pub const ALL: [ArrayType; 5] = [
        ArrayType::ComplexInterleaved,
        ArrayType::ComplexPlanar,
        ArrayType::Real,
        ArrayType::HermitianInterleaved,
        ArrayType::HermitianPlanar,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ArrayType::ComplexInterleaved => "complex_interleaved",
            ArrayType::ComplexPlanar => "complex_planar",
            ArrayType::Real => "real",
            ArrayType::HermitianInterleaved => "hermitian_interleaved",
            ArrayType::HermitianPlanar => "hermitian_planar",
            ArrayType::Unset => "unset",
        }
    }

    /// Number of byte planes the type occupies; `0` for [`ArrayType::Unset`].
    #[inline]
    pub fn plane_count(self) -> usize {
        match self {
            ArrayType::Real | ArrayType::ComplexInterleaved | ArrayType::HermitianInterleaved => 1,
            ArrayType::ComplexPlanar | ArrayType::HermitianPlanar => 2,
            ArrayType::Unset => 0,
        }
    }

    /// Number of byte planes needed to hold data of this type.
    ///
    /// Unlike [`ArrayType::plane_count`], an unset type is a configuration error here:
    /// there is no buffer to describe.
    pub fn nbuffer(self) -> Result<usize> {
        match self {
            ArrayType::Unset => Err(FftLayoutError::InvalidArrayType {
                context: "buffer",
                array_type: self,
            }),
            other => Ok(other.plane_count()),
        }
    }

    #[inline]
    pub fn is_planar(self) -> bool {
        matches!(self, ArrayType::ComplexPlanar | ArrayType::HermitianPlanar)
    }

    #[inline]
    pub fn is_interleaved(self) -> bool {
        matches!(
            self,
            ArrayType::ComplexInterleaved | ArrayType::HermitianInterleaved
        )
    }

    #[inline]
    pub fn is_hermitian(self) -> bool {
        matches!(
            self,
            ArrayType::HermitianInterleaved | ArrayType::HermitianPlanar
        )
    }

    /// True for full complex (non-Hermitian) data.
    #[inline]
    pub fn is_complex(self) -> bool {
        matches!(self, ArrayType::ComplexInterleaved | ArrayType::ComplexPlanar)
    }

    /// Size in bytes of one element of one plane.
    ///
    /// Interleaved planes hold `(re, im)` pairs; real and planar planes hold scalars.
    #[inline]
    pub fn element_size(self, precision: Precision) -> usize {
        if self.is_interleaved() {
            2 * precision.scalar_size()
        } else {
            precision.scalar_size()
        }
    }
}

impl fmt::Display for ArrayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
