//! Typed element access over raw byte planes.
//!
//! [`ElementReader`] and [`ElementWriter`] resolve a [`BufferLayout`] into an
//! [`ElementFormat`] once, then read or write whole logical elements as
//! `Complex<T>` (real data uses only the real part). Plane offsets are applied
//! here, so kernels work with the flat index `batch * dist + sum(index * stride)`.

use std::marker::PhantomData;
use std::mem::size_of;

use fftcheck_layout::{BufferLayout, ElementFormat, HostBuffer, Scalar, Storage};
use num_complex::Complex;

use crate::partition::{ParallelConfig, Partition};
use crate::threading::SendPtr;
use crate::{FftLayoutError, Result};

/// Convert a per-axis vector into a fixed-rank array.
pub fn to_array<const N: usize>(v: &[usize]) -> Result<[usize; N]> {
    v.try_into().map_err(|_| FftLayoutError::StrideLengthMismatch {
        expected: N,
        found: v.len(),
    })
}

/// True if distinct indices of the box address distinct elements.
///
/// Axes of length 1 are ignored. Sorted by stride, each axis must step past the
/// whole span of the faster axes.
pub fn is_non_overlapping(length: &[usize], stride: &[usize]) -> bool {
    let mut axes: Vec<(usize, usize)> = length
        .iter()
        .zip(stride.iter())
        .filter(|&(&l, _)| l > 1)
        .map(|(&l, &s)| (l, s))
        .collect();
    axes.sort_by_key(|&(_, s)| s);
    let mut span = 0usize;
    for (l, s) in axes {
        if s <= span {
            return false;
        }
        span += (l - 1) * s;
    }
    true
}

/// Partitions for a kernel that writes through `layout`.
///
/// Falls back to a single partition when elements of one batch may alias.
pub(crate) fn write_partitions<const N: usize>(
    config: &ParallelConfig,
    length: &[usize; N],
    layout: &BufferLayout,
) -> Vec<Partition<N>> {
    if is_non_overlapping(&layout.length, &layout.stride) {
        return config.partitions(length);
    }
    tracing::debug!(stride = ?layout.stride, "overlapping output layout; running one partition");
    let whole = Partition::whole(length, config.order);
    if whole.is_empty() {
        Vec::new()
    } else {
        vec![whole]
    }
}

// ============================================================================
// Reader
// ============================================================================

/// Read-only element view of a checked buffer.
pub struct ElementReader<'a, T> {
    planes: &'a [Vec<u8>],
    storage: Storage,
    offset: [usize; 2],
    _scalar: PhantomData<T>,
}

impl<'a, T: Scalar> ElementReader<'a, T> {
    /// Check `buffer` against `layout` and bind a reader to it.
    pub fn new(buffer: &'a HostBuffer, layout: &BufferLayout) -> Result<Self> {
        let format = checked_format::<T>(layout)?;
        layout.check_buffer(buffer)?;
        Ok(Self {
            planes: buffer.planes(),
            storage: format.storage,
            offset: plane_offsets(layout, format.storage),
            _scalar: PhantomData,
        })
    }

    #[inline]
    pub fn storage(&self) -> Storage {
        self.storage
    }

    #[inline]
    fn scalar(&self, plane: usize, slot: usize) -> T {
        let at = slot * size_of::<T>();
        bytemuck::pod_read_unaligned(&self.planes[plane][at..at + size_of::<T>()])
    }

    /// Element at flat index `idx`.
    #[inline]
    pub fn read(&self, idx: usize) -> Complex<T> {
        match self.storage {
            Storage::Real => Complex::new(self.scalar(0, idx + self.offset[0]), T::zero()),
            Storage::Interleaved => {
                let slot = 2 * (idx + self.offset[0]);
                Complex::new(self.scalar(0, slot), self.scalar(0, slot + 1))
            }
            Storage::Planar => Complex::new(
                self.scalar(0, idx + self.offset[0]),
                self.scalar(1, idx + self.offset[1]),
            ),
        }
    }
}

// ============================================================================
// Writer
// ============================================================================

/// Element writer over a checked, exclusively borrowed buffer.
///
/// Writes go through raw pointers so that partitions can write concurrently.
pub struct ElementWriter<'a, T> {
    planes: [SendPtr<u8>; 2],
    storage: Storage,
    offset: [usize; 2],
    _buffer: PhantomData<(&'a mut HostBuffer, T)>,
}

impl<'a, T: Scalar> ElementWriter<'a, T> {
    /// Check `buffer` against `layout` and bind a writer to it.
    pub fn new(buffer: &'a mut HostBuffer, layout: &BufferLayout) -> Result<Self> {
        let format = checked_format::<T>(layout)?;
        layout.check_buffer(buffer)?;
        let mut planes = [SendPtr::null(), SendPtr::null()];
        for (slot, plane) in planes.iter_mut().zip(buffer.planes_mut().iter_mut()) {
            *slot = SendPtr(plane.as_mut_ptr());
        }
        Ok(Self {
            planes,
            storage: format.storage,
            offset: plane_offsets(layout, format.storage),
            _buffer: PhantomData,
        })
    }

    #[inline]
    pub fn storage(&self) -> Storage {
        self.storage
    }

    #[inline]
    unsafe fn get(&self, plane: usize, slot: usize) -> T {
        let src = self.planes[plane].as_ptr().add(slot * size_of::<T>()) as *const T;
        std::ptr::read_unaligned(src)
    }

    #[inline]
    unsafe fn put(&self, plane: usize, slot: usize, value: T) {
        let dst = self.planes[plane].as_ptr().add(slot * size_of::<T>()) as *mut T;
        std::ptr::write_unaligned(dst, value);
    }

    /// Element at flat index `idx`, read through the writer's planes.
    ///
    /// # Safety
    /// `idx` must lie inside the layout the writer was checked against, and no
    /// other thread may write the same element concurrently.
    #[inline]
    pub unsafe fn read(&self, idx: usize) -> Complex<T> {
        match self.storage {
            Storage::Real => Complex::new(self.get(0, idx + self.offset[0]), T::zero()),
            Storage::Interleaved => {
                let slot = 2 * (idx + self.offset[0]);
                Complex::new(self.get(0, slot), self.get(0, slot + 1))
            }
            Storage::Planar => Complex::new(
                self.get(0, idx + self.offset[0]),
                self.get(1, idx + self.offset[1]),
            ),
        }
    }

    /// Store `value` at flat index `idx`. Real storage drops the imaginary part.
    ///
    /// # Safety
    /// `idx` must lie inside the layout the writer was checked against, and no
    /// other thread may access the same element concurrently.
    #[inline]
    pub unsafe fn write(&self, idx: usize, value: Complex<T>) {
        match self.storage {
            Storage::Real => self.put(0, idx + self.offset[0], value.re),
            Storage::Interleaved => {
                let slot = 2 * (idx + self.offset[0]);
                self.put(0, slot, value.re);
                self.put(0, slot + 1, value.im);
            }
            Storage::Planar => {
                self.put(0, idx + self.offset[0], value.re);
                self.put(1, idx + self.offset[1], value.im);
            }
        }
    }
}

fn checked_format<T: Scalar>(layout: &BufferLayout) -> Result<ElementFormat> {
    layout.check_shape()?;
    let format = layout.format()?;
    if format.precision != T::PRECISION {
        return Err(FftLayoutError::LayoutMismatch(format!(
            "{} buffer accessed as {}",
            format.precision,
            T::PRECISION
        )));
    }
    Ok(format)
}

fn plane_offsets(layout: &BufferLayout, storage: Storage) -> [usize; 2] {
    let first = layout.offset.first().copied().unwrap_or(0);
    match storage {
        Storage::Planar => [first, layout.offset.get(1).copied().unwrap_or(0)],
        Storage::Real | Storage::Interleaved => [first, 0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fftcheck_layout::{ArrayType, Precision};

    #[test]
    fn test_non_overlapping() {
        assert!(is_non_overlapping(&[4, 5, 6], &[30, 6, 1]));
        assert!(is_non_overlapping(&[4, 5], &[1, 4]));
        assert!(is_non_overlapping(&[4, 1], &[1, 0]));
        assert!(!is_non_overlapping(&[4, 5], &[3, 1]));
        assert!(!is_non_overlapping(&[4], &[0]));
    }

    #[test]
    fn test_to_array() {
        assert_eq!(to_array::<2>(&[3, 4]).unwrap(), [3, 4]);
        assert!(matches!(
            to_array::<3>(&[3, 4]),
            Err(FftLayoutError::StrideLengthMismatch {
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn test_planar_offsets_round_trip() {
        let layout = BufferLayout {
            precision: Precision::Single,
            array_type: ArrayType::ComplexPlanar,
            length: vec![4],
            stride: vec![1],
            dist: 4,
            nbatch: 1,
            offset: vec![1, 3],
        };
        let mut buf = layout.allocate().unwrap();
        {
            let writer = ElementWriter::<f32>::new(&mut buf, &layout).unwrap();
            unsafe { writer.write(2, Complex::new(1.5, -2.5)) };
        }
        assert_eq!(buf.read::<f32>(0, 3), Some(1.5));
        assert_eq!(buf.read::<f32>(1, 5), Some(-2.5));
        {
            let writer = ElementWriter::<f32>::new(&mut buf, &layout).unwrap();
            assert_eq!(unsafe { writer.read(2) }, Complex::new(1.5, -2.5));
        }

        let reader = ElementReader::<f32>::new(&buf, &layout).unwrap();
        assert_eq!(reader.read(2), Complex::new(1.5, -2.5));
        assert_eq!(reader.read(0), Complex::new(0.0, 0.0));
    }

    #[test]
    fn test_interleaved_slots() {
        let layout = BufferLayout::contiguous(
            Precision::Double,
            ArrayType::HermitianInterleaved,
            &[3],
            1,
        )
        .unwrap();
        let mut buf = layout.allocate().unwrap();
        {
            let writer = ElementWriter::<f64>::new(&mut buf, &layout).unwrap();
            unsafe { writer.write(1, Complex::new(4.0, 5.0)) };
        }
        assert_eq!(buf.read::<f64>(0, 2), Some(4.0));
        assert_eq!(buf.read::<f64>(0, 3), Some(5.0));
    }

    #[test]
    fn test_precision_mismatch() {
        let layout =
            BufferLayout::contiguous(Precision::Double, ArrayType::Real, &[3], 1).unwrap();
        let buf = layout.allocate().unwrap();
        assert!(matches!(
            ElementReader::<f32>::new(&buf, &layout),
            Err(FftLayoutError::LayoutMismatch(_))
        ));
    }
}
