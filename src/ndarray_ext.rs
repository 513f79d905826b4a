//! ndarray integration for PLY buffers
//!
//! Conversions between [`Buffer`] and ndarray's `Array2`/`Array1`, plus a
//! [`Tensor`] implementation so any ndarray array can go through the dense
//! writer.
//!
//! Enable with the `ndarray` feature flag.

use crate::tensor::Tensor;
use crate::types::{Buffer, DType, Scalar};
use ndarray::{Array1, Array2, ArrayBase, ArrayView2, Data, Dimension, Ix1, Ix2};
use std::borrow::Cow;

/// Error type for ndarray conversions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NdarrayError {
    /// DType mismatch between expected and actual
    DTypeMismatch { expected: DType, actual: DType },
    /// Shape doesn't match data length
    ShapeMismatch {
        rows: usize,
        width: usize,
        data_len: usize,
    },
    /// Data is not properly aligned for the element type
    AlignmentError,
    /// Buffer has more than one value per row
    NotColumn { width: usize },
}

impl std::fmt::Display for NdarrayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NdarrayError::DTypeMismatch { expected, actual } => {
                write!(
                    f,
                    "DType mismatch: expected {:?}, got {:?}",
                    expected, actual
                )
            }
            NdarrayError::ShapeMismatch {
                rows,
                width,
                data_len,
            } => {
                write!(
                    f,
                    "Shape [{}, {}] doesn't match data length {}",
                    rows, width, data_len
                )
            }
            NdarrayError::AlignmentError => {
                write!(f, "Data is not properly aligned for element type")
            }
            NdarrayError::NotColumn { width } => {
                write!(f, "Buffer has {} values per row, expected 1", width)
            }
        }
    }
}

impl std::error::Error for NdarrayError {}

impl Buffer {
    /// Create a buffer from a 2-D array, copying in row-major order
    pub fn from_ndarray<T, S>(arr: &ArrayBase<S, Ix2>) -> Self
    where
        T: Scalar,
        S: Data<Elem = T>,
    {
        let (rows, width) = arr.dim();
        let mut data = Vec::with_capacity(arr.len() * std::mem::size_of::<T>());
        for v in arr.iter() {
            v.extend_ne(&mut data);
        }
        Buffer::new(T::DTYPE, rows, width, data)
    }

    /// Create a single-column buffer from a 1-D array
    pub fn from_array1<T, S>(arr: &ArrayBase<S, Ix1>) -> Self
    where
        T: Scalar,
        S: Data<Elem = T>,
    {
        let mut data = Vec::with_capacity(arr.len() * std::mem::size_of::<T>());
        for v in arr.iter() {
            v.extend_ne(&mut data);
        }
        Buffer::new(T::DTYPE, arr.len(), 1, data)
    }

    fn check_typed<T: Scalar>(&self) -> Result<(), NdarrayError> {
        if T::DTYPE != self.dtype {
            return Err(NdarrayError::DTypeMismatch {
                expected: T::DTYPE,
                actual: self.dtype,
            });
        }
        if self.data.len() != self.expected_size() {
            return Err(NdarrayError::ShapeMismatch {
                rows: self.rows,
                width: self.width,
                data_len: self.data.len(),
            });
        }
        Ok(())
    }

    /// Convert to an owned `[rows, width]` array
    pub fn to_ndarray<T: Scalar>(&self) -> Result<Array2<T>, NdarrayError> {
        self.check_typed::<T>()?;
        let elements: Vec<T> = self
            .data
            .chunks_exact(std::mem::size_of::<T>())
            .map(T::from_ne_slice)
            .collect();

        Array2::from_shape_vec((self.rows, self.width), elements).map_err(|_| {
            NdarrayError::ShapeMismatch {
                rows: self.rows,
                width: self.width,
                data_len: self.data.len(),
            }
        })
    }

    /// Convert a single-column buffer to an owned 1-D array
    pub fn to_array1<T: Scalar>(&self) -> Result<Array1<T>, NdarrayError> {
        if self.width != 1 {
            return Err(NdarrayError::NotColumn { width: self.width });
        }
        Ok(self.to_ndarray::<T>()?.column(0).to_owned())
    }

    /// Try to create a zero-copy ndarray view
    ///
    /// This will fail if the data is not properly aligned for the element type.
    pub fn try_view<T: Scalar>(&self) -> Result<ArrayView2<'_, T>, NdarrayError> {
        self.check_typed::<T>()?;

        if (self.data.as_ptr() as usize) % std::mem::align_of::<T>() != 0 {
            return Err(NdarrayError::AlignmentError);
        }

        // SAFETY:
        // - Alignment is checked above before the cast
        // - Length is validated by check_typed (rows * width elements of T)
        // - T is constrained to Scalar (primitives with no invalid bit patterns)
        // - The view borrows self, so the bytes outlive it
        let slice = unsafe {
            std::slice::from_raw_parts(self.data.as_ptr() as *const T, self.num_elements())
        };

        ArrayView2::from_shape((self.rows, self.width), slice).map_err(|_| {
            NdarrayError::ShapeMismatch {
                rows: self.rows,
                width: self.width,
                data_len: self.data.len(),
            }
        })
    }
}

impl<T, S, D> Tensor for ArrayBase<S, D>
where
    T: Scalar,
    S: Data<Elem = T>,
    D: Dimension,
{
    fn dtype(&self) -> DType {
        T::DTYPE
    }

    fn shape(&self) -> Vec<usize> {
        ArrayBase::shape(self).to_vec()
    }

    fn host_bytes(&self) -> Cow<'_, [u8]> {
        match self.as_slice() {
            Some(values) => {
                // SAFETY:
                // - values is a contiguous, initialized slice of T
                // - T is a primitive (Scalar) with no padding, so every byte is initialized
                // - u8 has alignment 1 and the borrow keeps self alive
                let bytes = unsafe {
                    std::slice::from_raw_parts(
                        values.as_ptr() as *const u8,
                        std::mem::size_of_val(values),
                    )
                };
                Cow::Borrowed(bytes)
            }
            None => {
                let mut out = Vec::with_capacity(self.len() * std::mem::size_of::<T>());
                for v in self.iter() {
                    v.extend_ne(&mut out);
                }
                Cow::Owned(out)
            }
        }
    }
}
