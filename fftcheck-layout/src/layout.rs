//! The transform geometry model.
//!
//! A [`TransformLayout`] is built once per test case from a [`TransformParams`]
//! record. Construction resolves default array types, completes strides, fills in
//! batch distances and computes buffer sizes; afterwards the layout is read-only.

use std::fmt;

use crate::buffer::{buffer_size, BufferLayout};
use crate::stride::{compute_stride, default_idist, default_odist};
use crate::{
    ArrayType, FftLayoutError, Placement, Precision, Result, TransformKind, MAX_DIM, ONE_GIB,
};

/// Parameters of one transform, all row-major.
///
/// Strides may be partial or empty (see [`compute_stride`]), dists may be zero and
/// array types may be [`ArrayType::Unset`]; [`TransformLayout::new`] derives the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformParams {
    pub length: Vec<usize>,
    pub istride: Vec<usize>,
    pub ostride: Vec<usize>,
    pub nbatch: usize,
    pub precision: Precision,
    pub kind: TransformKind,
    pub placement: Placement,
    pub idist: usize,
    pub odist: usize,
    pub itype: ArrayType,
    pub otype: ArrayType,
    pub ioffset: Vec<usize>,
    pub ooffset: Vec<usize>,
}

impl Default for TransformParams {
    fn default() -> Self {
        Self {
            length: Vec::new(),
            istride: Vec::new(),
            ostride: Vec::new(),
            nbatch: 1,
            precision: Precision::Double,
            kind: TransformKind::ComplexForward,
            placement: Placement::InPlace,
            idist: 0,
            odist: 0,
            itype: ArrayType::Unset,
            otype: ArrayType::Unset,
            ioffset: vec![0, 0],
            ooffset: vec![0, 0],
        }
    }
}

/// Reason a well-formed layout cannot run with its placement.
///
/// Not an error: callers skip the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidLayout {
    #[error("{side} offsets: {found} given, {needed} planes")]
    OffsetCount {
        side: &'static str,
        needed: usize,
        found: usize,
    },

    #[error("istride {istride:?} and ostride {ostride:?} differ for an in-place transform")]
    InPlaceStrideMismatch {
        istride: Vec<usize>,
        ostride: Vec<usize>,
    },

    #[error("istride[0] {istride0} and ostride[0] {ostride0} must be 1 for in-place real/complex transforms")]
    InPlaceRealStride { istride0: usize, ostride0: usize },

    #[error("in-place offsets {ioffset:?} -> {ooffset:?} do not overlay for {kind}")]
    InPlaceOffsetMismatch {
        kind: TransformKind,
        ioffset: Vec<usize>,
        ooffset: Vec<usize>,
    },
}

/// Immutable, fully derived description of one transform under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformLayout {
    length: Vec<usize>,
    istride: Vec<usize>,
    ostride: Vec<usize>,
    nbatch: usize,
    precision: Precision,
    kind: TransformKind,
    placement: Placement,
    idist: usize,
    odist: usize,
    itype: ArrayType,
    otype: ArrayType,
    ioffset: Vec<usize>,
    ooffset: Vec<usize>,
    isize: Vec<usize>,
    osize: Vec<usize>,
}

impl TransformLayout {
    /// Derive a layout from raw parameters.
    ///
    /// Fails when the dimension is not 1, 2 or 3, when the array types are not a
    /// legal pairing for the transform kind, or when more strides than axes are given.
    pub fn new(params: TransformParams) -> Result<Self> {
        let TransformParams {
            length,
            istride,
            ostride,
            nbatch,
            precision,
            kind,
            placement,
            idist,
            odist,
            itype,
            otype,
            ioffset,
            ooffset,
        } = params;

        let dim = length.len();
        if dim == 0 || dim > MAX_DIM {
            return Err(FftLayoutError::UnsupportedDimension(dim));
        }

        let (itype, otype) = check_set_types(placement, kind, itype, otype)?;

        let ilength = side_length(&length, kind == TransformKind::RealInverse);
        let olength = side_length(&length, kind == TransformKind::RealForward);
        let inplace = placement == Placement::InPlace;
        let istride = compute_stride(
            &ilength,
            &istride,
            inplace && kind == TransformKind::RealForward,
        )?;
        let ostride = compute_stride(
            &olength,
            &ostride,
            inplace && kind == TransformKind::RealInverse,
        )?;

        let idist = if idist == 0 {
            default_idist(placement, kind, &length, &istride)
        } else {
            idist
        };
        let odist = if odist == 0 {
            default_odist(placement, kind, &length, &ostride)
        } else {
            odist
        };

        let isize = buffer_size(itype, &ilength, &istride, nbatch, idist, &ioffset);
        let osize = buffer_size(otype, &olength, &ostride, nbatch, odist, &ooffset);

        Ok(Self {
            length,
            istride,
            ostride,
            nbatch,
            precision,
            kind,
            placement,
            idist,
            odist,
            itype,
            otype,
            ioffset,
            ooffset,
            isize,
            osize,
        })
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    #[inline]
    pub fn dim(&self) -> usize {
        self.length.len()
    }

    /// Logical transform length.
    #[inline]
    pub fn length(&self) -> &[usize] {
        &self.length
    }

    #[inline]
    pub fn istride(&self) -> &[usize] {
        &self.istride
    }

    #[inline]
    pub fn ostride(&self) -> &[usize] {
        &self.ostride
    }

    #[inline]
    pub fn nbatch(&self) -> usize {
        self.nbatch
    }

    #[inline]
    pub fn precision(&self) -> Precision {
        self.precision
    }

    #[inline]
    pub fn kind(&self) -> TransformKind {
        self.kind
    }

    #[inline]
    pub fn placement(&self) -> Placement {
        self.placement
    }

    #[inline]
    pub fn idist(&self) -> usize {
        self.idist
    }

    #[inline]
    pub fn odist(&self) -> usize {
        self.odist
    }

    #[inline]
    pub fn itype(&self) -> ArrayType {
        self.itype
    }

    #[inline]
    pub fn otype(&self) -> ArrayType {
        self.otype
    }

    #[inline]
    pub fn ioffset(&self) -> &[usize] {
        &self.ioffset
    }

    #[inline]
    pub fn ooffset(&self) -> &[usize] {
        &self.ooffset
    }

    /// Elements per input plane.
    #[inline]
    pub fn isize(&self) -> &[usize] {
        &self.isize
    }

    /// Elements per output plane.
    #[inline]
    pub fn osize(&self) -> &[usize] {
        &self.osize
    }

    // ------------------------------------------------------------------------
    // Derived geometry
    // ------------------------------------------------------------------------

    /// Data extent of the input: the last axis is halved for real-inverse transforms.
    pub fn ilength(&self) -> Vec<usize> {
        side_length(&self.length, self.kind == TransformKind::RealInverse)
    }

    /// Data extent of the output: the last axis is halved for real-forward transforms.
    pub fn olength(&self) -> Vec<usize> {
        side_length(&self.length, self.kind == TransformKind::RealForward)
    }

    pub fn nibuffer(&self) -> usize {
        self.itype.plane_count()
    }

    pub fn nobuffer(&self) -> usize {
        self.otype.plane_count()
    }

    pub fn compute_isize(&self) -> Vec<usize> {
        buffer_size(
            self.itype,
            &self.ilength(),
            &self.istride,
            self.nbatch,
            self.idist,
            &self.ioffset,
        )
    }

    pub fn compute_osize(&self) -> Vec<usize> {
        buffer_size(
            self.otype,
            &self.olength(),
            &self.ostride,
            self.nbatch,
            self.odist,
            &self.ooffset,
        )
    }

    /// Input plane sizes in bytes.
    pub fn ibuffer_sizes(&self) -> Vec<usize> {
        let elem = self.itype.element_size(self.precision);
        self.isize.iter().map(|&s| s * elem).collect()
    }

    /// Output plane sizes in bytes.
    pub fn obuffer_sizes(&self) -> Vec<usize> {
        let elem = self.otype.element_size(self.precision);
        self.osize.iter().map(|&s| s * elem).collect()
    }

    /// Addressing of the input buffer.
    pub fn input_layout(&self) -> BufferLayout {
        BufferLayout {
            precision: self.precision,
            array_type: self.itype,
            length: self.ilength(),
            stride: self.istride.clone(),
            dist: self.idist,
            nbatch: self.nbatch,
            offset: self.ioffset.clone(),
        }
    }

    /// Addressing of the output buffer.
    pub fn output_layout(&self) -> BufferLayout {
        BufferLayout {
            precision: self.precision,
            array_type: self.otype,
            length: self.olength(),
            stride: self.ostride.clone(),
            dist: self.odist,
            nbatch: self.nbatch,
            offset: self.ooffset.clone(),
        }
    }

    // Column-major views of the row-major vectors.

    pub fn length_cm(&self) -> Vec<usize> {
        self.length.iter().rev().copied().collect()
    }

    pub fn ilength_cm(&self) -> Vec<usize> {
        self.ilength().into_iter().rev().collect()
    }

    pub fn olength_cm(&self) -> Vec<usize> {
        self.olength().into_iter().rev().collect()
    }

    pub fn istride_cm(&self) -> Vec<usize> {
        self.istride.iter().rev().copied().collect()
    }

    pub fn ostride_cm(&self) -> Vec<usize> {
        self.ostride.iter().rev().copied().collect()
    }

    /// Rough host-memory requirement in bytes for running this case against a reference.
    ///
    /// Counts three packed host copies plus the strided input and output buffers.
    pub fn needed_ram(&self) -> usize {
        let dot = |stride: &[usize]| -> usize {
            self.length
                .iter()
                .zip(stride.iter())
                .map(|(&l, &s)| l * s)
                .sum()
        };
        let mut needed = 3 * self.length.iter().product::<usize>();
        needed += dot(&self.istride);
        needed += dot(&self.ostride);
        if !self.kind.is_real() {
            needed *= 2;
        }
        needed *= self.precision.scalar_size();
        needed *= self.nbatch;

        tracing::debug!(gib = needed / ONE_GIB, "required host memory");
        needed
    }

    // ------------------------------------------------------------------------
    // Validity
    // ------------------------------------------------------------------------

    /// Check the placement constraints. `Err` names why the case must be skipped.
    pub fn check_valid(&self) -> std::result::Result<(), InvalidLayout> {
        let nibuffer = self.nibuffer();
        let nobuffer = self.nobuffer();
        if self.ioffset.len() < nibuffer {
            return Err(InvalidLayout::OffsetCount {
                side: "input",
                needed: nibuffer,
                found: self.ioffset.len(),
            });
        }
        if self.ooffset.len() < nobuffer {
            return Err(InvalidLayout::OffsetCount {
                side: "output",
                needed: nobuffer,
                found: self.ooffset.len(),
            });
        }

        if self.placement != Placement::InPlace {
            return Ok(());
        }

        let samestride = self
            .istride
            .iter()
            .zip(self.ostride.iter())
            .all(|(a, b)| a == b);
        if !samestride {
            return Err(InvalidLayout::InPlaceStrideMismatch {
                istride: self.istride.clone(),
                ostride: self.ostride.clone(),
            });
        }

        // The contiguous axis of an in-place real transform must be unit-stride.
        if self.kind.is_real() {
            let istride0 = self.istride.last().copied().unwrap_or(1);
            let ostride0 = self.ostride.last().copied().unwrap_or(1);
            if istride0 != 1 || ostride0 != 1 {
                return Err(InvalidLayout::InPlaceRealStride { istride0, ostride0 });
            }
        }

        let offsets_ok = match self.kind {
            TransformKind::ComplexForward | TransformKind::ComplexInverse => {
                (0..nibuffer).all(|i| self.ioffset.get(i) == self.ooffset.get(i))
            }
            TransformKind::RealForward => self.ioffset[0] == 2 * self.ooffset[0],
            TransformKind::RealInverse => 2 * self.ioffset[0] == self.ooffset[0],
        };
        if !offsets_ok {
            return Err(InvalidLayout::InPlaceOffsetMismatch {
                kind: self.kind,
                ioffset: self.ioffset.clone(),
                ooffset: self.ooffset.clone(),
            });
        }

        Ok(())
    }

    /// True if the transform can run with this layout; logs the reason otherwise.
    pub fn valid(&self) -> bool {
        match self.check_valid() {
            Ok(()) => true,
            Err(reason) => {
                tracing::debug!(%reason, "skipping layout");
                false
            }
        }
    }
}

impl fmt::Display for TransformLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |v: &[usize]| -> String {
            v.iter()
                .map(|x| x.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        };
        write!(f, "length: {}, ", join(&self.length))?;
        write!(f, "istride: {}, idist: {}, ", join(&self.istride), self.idist)?;
        write!(f, "ostride: {}, odist: {}, ", join(&self.ostride), self.odist)?;
        write!(f, "batch: {}, ", self.nbatch)?;
        write!(f, "isize: {}, osize: {}, ", join(&self.isize), join(&self.osize))?;
        write!(
            f,
            "ioffset: {}, ooffset: {}, ",
            join(&self.ioffset),
            join(&self.ooffset)
        )?;
        write!(f, "{}, {} -> {}, ", self.placement, self.itype, self.otype)?;
        write!(f, "{}, ", self.precision)?;
        write!(
            f,
            "ilength: {}, olength: {}",
            join(&self.ilength()),
            join(&self.olength())
        )
    }
}

fn side_length(length: &[usize], halved: bool) -> Vec<usize> {
    let mut out = length.to_vec();
    if halved {
        if let Some(last) = out.last_mut() {
            *last = *last / 2 + 1;
        }
    }
    out
}

// ============================================================================
// Array type checks
// ============================================================================

/// Fill in unset array types from the transform kind, then validate the pairing.
fn check_set_types(
    placement: Placement,
    kind: TransformKind,
    itype: ArrayType,
    otype: ArrayType,
) -> Result<(ArrayType, ArrayType)> {
    let itype = if itype == ArrayType::Unset {
        match kind {
            TransformKind::ComplexForward | TransformKind::ComplexInverse => {
                ArrayType::ComplexInterleaved
            }
            TransformKind::RealForward => ArrayType::Real,
            TransformKind::RealInverse => ArrayType::HermitianInterleaved,
        }
    } else {
        itype
    };
    let otype = if otype == ArrayType::Unset {
        match kind {
            TransformKind::ComplexForward | TransformKind::ComplexInverse => {
                ArrayType::ComplexInterleaved
            }
            TransformKind::RealForward => ArrayType::HermitianInterleaved,
            TransformKind::RealInverse => ArrayType::Real,
        }
    } else {
        otype
    };
    check_iotypes(placement, kind, itype, otype)?;
    Ok((itype, otype))
}

/// Check that the input and output array types form a legal pair for the transform.
pub fn check_iotypes(
    placement: Placement,
    kind: TransformKind,
    itype: ArrayType,
    otype: ArrayType,
) -> Result<()> {
    if itype == ArrayType::Unset {
        return Err(FftLayoutError::InvalidArrayType {
            context: "input",
            array_type: itype,
        });
    }
    if otype == ArrayType::Unset {
        return Err(FftLayoutError::InvalidArrayType {
            context: "output",
            array_type: otype,
        });
    }

    if !kind.is_real() && placement == Placement::InPlace && itype != otype {
        return Err(FftLayoutError::InPlaceTypeMismatch { itype, otype });
    }

    let okformat = match itype {
        ArrayType::ComplexInterleaved | ArrayType::ComplexPlanar => otype.is_complex(),
        ArrayType::HermitianInterleaved | ArrayType::HermitianPlanar => otype == ArrayType::Real,
        ArrayType::Real => otype.is_hermitian(),
        ArrayType::Unset => false,
    };
    if !okformat {
        return Err(FftLayoutError::InvalidTypeCombination { itype, otype });
    }
    Ok(())
}
