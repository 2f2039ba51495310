//! Element access strategy lookup.
//!
//! Kernels never switch on `(precision, array type)` pairs themselves. They ask
//! [`ElementFormat::new`] once and dispatch on the resulting [`Storage`] and
//! [`Precision`].

use bytemuck::Pod;
use num_traits::Float;

use crate::{ArrayType, FftLayoutError, Precision, Result};

/// Real scalar types that can back a buffer plane.
pub trait Scalar: Pod + Float + Into<f64> + Send + Sync + std::fmt::Debug + 'static {
    const PRECISION: Precision;
}

impl Scalar for f32 {
    const PRECISION: Precision = Precision::Single;
}

impl Scalar for f64 {
    const PRECISION: Precision = Precision::Double;
}

/// How the values of one logical element are spread over planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Storage {
    /// One scalar per element in plane 0.
    Real,
    /// `(re, im)` pairs in plane 0.
    Interleaved,
    /// Real parts in plane 0, imaginary parts in plane 1.
    Planar,
}

impl Storage {
    /// Number of real components per logical element.
    #[inline]
    pub fn components(self) -> usize {
        match self {
            Storage::Real => 1,
            Storage::Interleaved | Storage::Planar => 2,
        }
    }

    #[inline]
    pub fn planes(self) -> usize {
        match self {
            Storage::Real | Storage::Interleaved => 1,
            Storage::Planar => 2,
        }
    }
}

/// Resolved element access strategy for a `(precision, array type)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementFormat {
    pub precision: Precision,
    pub storage: Storage,
}

impl ElementFormat {
    /// Look up the access strategy for an array type.
    ///
    /// Complex and Hermitian data share a strategy; an unset type has none.
    pub fn new(precision: Precision, array_type: ArrayType) -> Result<Self> {
        let storage = match array_type {
            ArrayType::Real => Storage::Real,
            ArrayType::ComplexInterleaved | ArrayType::HermitianInterleaved => {
                Storage::Interleaved
            }
            ArrayType::ComplexPlanar | ArrayType::HermitianPlanar => Storage::Planar,
            ArrayType::Unset => {
                return Err(FftLayoutError::InvalidArrayType {
                    context: "element",
                    array_type,
                })
            }
        };
        Ok(Self { precision, storage })
    }

    /// Bytes per element of one plane.
    #[inline]
    pub fn plane_element_size(&self) -> usize {
        match self.storage {
            Storage::Interleaved => 2 * self.precision.scalar_size(),
            Storage::Real | Storage::Planar => self.precision.scalar_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_covers_all_types() {
        for ty in ArrayType::ALL {
            let format = ElementFormat::new(Precision::Double, ty).unwrap();
            assert_eq!(format.storage.planes(), ty.plane_count());
            assert_eq!(
                format.plane_element_size(),
                ty.element_size(Precision::Double)
            );
        }
    }

    #[test]
    fn test_lookup_unset_fails() {
        assert!(ElementFormat::new(Precision::Single, ArrayType::Unset).is_err());
    }

    #[test]
    fn test_scalar_precision() {
        assert_eq!(<f32 as Scalar>::PRECISION, Precision::Single);
        assert_eq!(<f64 as Scalar>::PRECISION, Precision::Double);
    }
}
