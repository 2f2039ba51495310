//! Host buffers and the per-side layout that addresses them.

use bytemuck::Pod;

use crate::{
    compute_stride, ArrayType, ElementFormat, FftLayoutError, Precision, Result, MAX_DIM,
};

/// Number of elements each plane needs for a strided, batched, offset layout.
///
/// Returns one entry per plane of `array_type` (none for [`ArrayType::Unset`]):
/// `max(nbatch * dist, max_i(length[i] * stride[i])) + offset[plane]`.
pub fn buffer_size(
    array_type: ArrayType,
    length: &[usize],
    stride: &[usize],
    nbatch: usize,
    dist: usize,
    offset: &[usize],
) -> Vec<usize> {
    let val = length
        .iter()
        .zip(stride.iter())
        .map(|(&l, &s)| l * s)
        .fold(nbatch * dist, usize::max);
    (0..array_type.plane_count())
        .map(|plane| val + offset.get(plane).copied().unwrap_or(0))
        .collect()
}

/// Allocate zero-initialized planes holding `size[plane]` elements each.
pub fn allocate_host_buffer(precision: Precision, array_type: ArrayType, size: &[usize]) -> HostBuffer {
    let elem = array_type.element_size(precision);
    HostBuffer::zeroed(&size.iter().map(|&s| s * elem).collect::<Vec<_>>())
}

// ============================================================================
// HostBuffer
// ============================================================================

/// One or two raw byte planes.
///
/// Planes carry no alignment guarantee; typed access goes through unaligned reads
/// and writes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostBuffer {
    planes: Vec<Vec<u8>>,
}

impl HostBuffer {
    pub fn from_planes(planes: Vec<Vec<u8>>) -> Self {
        Self { planes }
    }

    /// Planes of the given byte lengths, all zero.
    pub fn zeroed(plane_bytes: &[usize]) -> Self {
        Self {
            planes: plane_bytes.iter().map(|&n| vec![0u8; n]).collect(),
        }
    }

    #[inline]
    pub fn nplanes(&self) -> usize {
        self.planes.len()
    }

    #[inline]
    pub fn planes(&self) -> &[Vec<u8>] {
        &self.planes
    }

    #[inline]
    pub fn planes_mut(&mut self) -> &mut [Vec<u8>] {
        &mut self.planes
    }

    #[inline]
    pub fn plane(&self, plane: usize) -> &[u8] {
        &self.planes[plane]
    }

    #[inline]
    pub fn plane_mut(&mut self, plane: usize) -> &mut [u8] {
        &mut self.planes[plane]
    }

    pub fn into_planes(self) -> Vec<Vec<u8>> {
        self.planes
    }

    /// Read the `index`-th value of type `T` from a plane.
    pub fn read<T: Pod>(&self, plane: usize, index: usize) -> Option<T> {
        let size = std::mem::size_of::<T>();
        let bytes = self.planes.get(plane)?.get(index * size..(index + 1) * size)?;
        Some(bytemuck::pod_read_unaligned(bytes))
    }

    /// Write the `index`-th value of type `T` into a plane. Returns `false` when out of range.
    pub fn write<T: Pod>(&mut self, plane: usize, index: usize, value: T) -> bool {
        let size = std::mem::size_of::<T>();
        match self
            .planes
            .get_mut(plane)
            .and_then(|p| p.get_mut(index * size..(index + 1) * size))
        {
            Some(bytes) => {
                bytes.copy_from_slice(bytemuck::bytes_of(&value));
                true
            }
            None => false,
        }
    }

    /// Reset every byte of every plane to zero.
    pub fn fill_zero(&mut self) {
        for plane in &mut self.planes {
            plane.fill(0);
        }
    }
}

// ============================================================================
// BufferLayout
// ============================================================================

/// Addressing of one strided, batched buffer.
///
/// Element `index` of batch `b` in plane `p` lives at element
/// `b * dist + sum(index[i] * stride[i]) + offset[p]` of that plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferLayout {
    pub precision: Precision,
    pub array_type: ArrayType,
    pub length: Vec<usize>,
    pub stride: Vec<usize>,
    pub dist: usize,
    pub nbatch: usize,
    pub offset: Vec<usize>,
}

impl BufferLayout {
    /// Packed row-major layout with zero offsets.
    pub fn contiguous(
        precision: Precision,
        array_type: ArrayType,
        length: &[usize],
        nbatch: usize,
    ) -> Result<Self> {
        let stride = compute_stride(length, &[], false)?;
        Ok(Self {
            precision,
            array_type,
            length: length.to_vec(),
            stride,
            dist: length.iter().product(),
            nbatch,
            offset: vec![0; array_type.plane_count().max(1)],
        })
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.length.len()
    }

    pub fn format(&self) -> Result<ElementFormat> {
        ElementFormat::new(self.precision, self.array_type)
    }

    /// Check rank, stride count and offset count.
    pub fn check_shape(&self) -> Result<()> {
        let dim = self.dim();
        if dim == 0 || dim > MAX_DIM {
            return Err(FftLayoutError::UnsupportedDimension(dim));
        }
        if self.stride.len() != dim {
            return Err(FftLayoutError::StrideLengthMismatch {
                expected: dim,
                found: self.stride.len(),
            });
        }
        let planes = self.array_type.nbuffer()?;
        if self.offset.len() < planes {
            return Err(FftLayoutError::LayoutMismatch(format!(
                "{} data needs {} offsets, found {}",
                self.array_type,
                planes,
                self.offset.len()
            )));
        }
        Ok(())
    }

    /// Element count per plane, as used for allocation.
    pub fn sizes(&self) -> Vec<usize> {
        buffer_size(
            self.array_type,
            &self.length,
            &self.stride,
            self.nbatch,
            self.dist,
            &self.offset,
        )
    }

    /// Allocate a zeroed buffer large enough for this layout.
    pub fn allocate(&self) -> Result<HostBuffer> {
        self.array_type.nbuffer()?;
        Ok(allocate_host_buffer(
            self.precision,
            self.array_type,
            &self.sizes(),
        ))
    }

    /// Bytes each plane must hold to cover every addressed element.
    pub fn required_bytes(&self) -> Result<Vec<usize>> {
        self.check_shape()?;
        let format = self.format()?;
        let planes = format.storage.planes();
        if self.nbatch == 0 || self.length.iter().any(|&l| l == 0) {
            return Ok(vec![0; planes]);
        }
        let span = (self.nbatch - 1) * self.dist
            + self
                .length
                .iter()
                .zip(self.stride.iter())
                .map(|(&l, &s)| (l - 1) * s)
                .sum::<usize>();
        Ok((0..planes)
            .map(|p| (span + self.offset[p] + 1) * format.plane_element_size())
            .collect())
    }

    /// Verify that `buffer` has the right planes and that each is long enough.
    pub fn check_buffer(&self, buffer: &HostBuffer) -> Result<()> {
        let required = self.required_bytes()?;
        if buffer.nplanes() != required.len() {
            return Err(FftLayoutError::PlaneCountMismatch {
                expected: required.len(),
                found: buffer.nplanes(),
            });
        }
        for (plane, (&need, data)) in required.iter().zip(buffer.planes()).enumerate() {
            if data.len() < need {
                return Err(FftLayoutError::BufferTooSmall {
                    plane,
                    required: need,
                    actual: data.len(),
                });
            }
        }
        Ok(())
    }

    /// Check that `other` walks the same logical elements.
    pub fn check_compatible(&self, other: &BufferLayout) -> Result<()> {
        if self.length != other.length {
            return Err(FftLayoutError::LayoutMismatch(format!(
                "length {:?} vs {:?}",
                self.length, other.length
            )));
        }
        if self.nbatch != other.nbatch {
            return Err(FftLayoutError::LayoutMismatch(format!(
                "nbatch {} vs {}",
                self.nbatch, other.nbatch
            )));
        }
        if self.precision != other.precision {
            return Err(FftLayoutError::LayoutMismatch(format!(
                "precision {} vs {}",
                self.precision, other.precision
            )));
        }
        Ok(())
    }
}
