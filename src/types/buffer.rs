//! Typed column buffers

use super::{DType, Scalar};
use crate::error::{PlyError, Result};

/// Owned `[rows, width]` block of one dtype
///
/// Values are stored row-major in host byte order. A scalar property has
/// `width == 1`; a list property of uniform length `L` has `width == L`.
#[derive(Debug, Clone, PartialEq)]
pub struct Buffer {
    pub dtype: DType,
    pub rows: usize,
    pub width: usize,
    pub data: Vec<u8>,
}

impl Buffer {
    pub fn new(dtype: DType, rows: usize, width: usize, data: Vec<u8>) -> Self {
        Self {
            dtype,
            rows,
            width,
            data,
        }
    }

    /// Zero-filled buffer
    pub fn zeros(dtype: DType, rows: usize, width: usize) -> Self {
        let len = rows * width * dtype.element_size();
        Self::new(dtype, rows, width, vec![0u8; len])
    }

    /// Build from typed values laid out row-major
    ///
    /// Panics if `values.len() != rows * width`; see [`Buffer::try_from_values`].
    pub fn from_values<T: Scalar>(rows: usize, width: usize, values: &[T]) -> Self {
        assert_eq!(
            values.len(),
            rows * width,
            "{} values cannot fill a [{}, {}] buffer",
            values.len(),
            rows,
            width
        );
        Self::encode(rows, width, values)
    }

    /// Build from typed values, failing with `DataSizeMismatch` on a length mismatch
    pub fn try_from_values<T: Scalar>(rows: usize, width: usize, values: &[T]) -> Result<Self> {
        let expected = rows.checked_mul(width);
        if expected != Some(values.len()) {
            let size = std::mem::size_of::<T>() as u64;
            return Err(PlyError::DataSizeMismatch {
                name: format!("[{}, {}] {:?} buffer", rows, width, T::DTYPE),
                expected: (rows as u64).saturating_mul(width as u64).saturating_mul(size),
                actual: values.len() as u64 * size,
            });
        }
        Ok(Self::encode(rows, width, values))
    }

    /// Single-column buffer
    pub fn column_of<T: Scalar>(values: &[T]) -> Self {
        Self::encode(values.len(), 1, values)
    }

    fn encode<T: Scalar>(rows: usize, width: usize, values: &[T]) -> Self {
        let mut data = Vec::with_capacity(values.len() * std::mem::size_of::<T>());
        for v in values {
            v.extend_ne(&mut data);
        }
        Self::new(T::DTYPE, rows, width, data)
    }

    /// Total number of elements
    pub fn num_elements(&self) -> usize {
        self.rows * self.width
    }

    /// Expected data size in bytes
    pub fn expected_size(&self) -> usize {
        self.num_elements() * self.dtype.element_size()
    }

    /// Bytes of one row
    pub fn row_bytes(&self) -> usize {
        self.width * self.dtype.element_size()
    }

    /// Decode into typed values, or `None` if `T` does not match the dtype
    pub fn to_vec<T: Scalar>(&self) -> Option<Vec<T>> {
        if T::DTYPE != self.dtype || self.data.len() != self.expected_size() {
            return None;
        }
        Some(
            self.data
                .chunks_exact(std::mem::size_of::<T>())
                .map(T::from_ne_slice)
                .collect(),
        )
    }

    /// Copy out column `index` as a `[rows, 1]` buffer
    pub fn column(&self, index: usize) -> Option<Buffer> {
        if index >= self.width {
            return None;
        }
        let size = self.dtype.element_size();
        let stride = self.row_bytes();
        let mut data = Vec::with_capacity(self.rows * size);
        for row in self.data.chunks_exact(stride) {
            data.extend_from_slice(&row[index * size..(index + 1) * size]);
        }
        Some(Buffer::new(self.dtype, self.rows, 1, data))
    }

    /// Interleave buffers of equal dtype and rows side by side
    ///
    /// Returns `None` if the inputs are empty or disagree on dtype or rows.
    pub fn hstack(parts: &[&Buffer]) -> Option<Buffer> {
        let first = parts.first()?;
        if parts
            .iter()
            .any(|p| p.dtype != first.dtype || p.rows != first.rows)
        {
            return None;
        }
        let width = parts.iter().map(|p| p.width).sum();
        let mut data = Vec::with_capacity(first.rows * width * first.dtype.element_size());
        for row in 0..first.rows {
            for part in parts {
                let stride = part.row_bytes();
                data.extend_from_slice(&part.data[row * stride..(row + 1) * stride]);
            }
        }
        Some(Buffer::new(first.dtype, first.rows, width, data))
    }
}

/// Reverse the bytes of every `size`-byte value in place
pub(crate) fn swap_bytes(data: &mut [u8], size: usize) {
    if size > 1 {
        for value in data.chunks_exact_mut(size) {
            value.reverse();
        }
    }
}
