//! Tensor trait for handing external typed arrays to the dense writer

use crate::types::{Buffer, DType, Scalar};
use std::borrow::Cow;

/// Where a tensor's memory lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Cpu,
    /// Device memory on some accelerator, by ordinal
    Accelerator(u32),
}

/// Trait for typed arrays that can be written as a dense float PLY
pub trait Tensor {
    fn dtype(&self) -> DType;

    fn shape(&self) -> Vec<usize>;

    fn device(&self) -> Device {
        Device::Cpu
    }

    /// Contiguous row-major bytes in host byte order
    ///
    /// Only called on tensors whose device is [`Device::Cpu`].
    fn host_bytes(&self) -> Cow<'_, [u8]>;
}

impl Tensor for Buffer {
    fn dtype(&self) -> DType {
        self.dtype
    }

    fn shape(&self) -> Vec<usize> {
        vec![self.rows, self.width]
    }

    fn host_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(&self.data)
    }
}

impl<T: Scalar> Tensor for [T] {
    fn dtype(&self) -> DType {
        T::DTYPE
    }

    fn shape(&self) -> Vec<usize> {
        vec![self.len()]
    }

    fn host_bytes(&self) -> Cow<'_, [u8]> {
        let mut out = Vec::with_capacity(std::mem::size_of_val(self));
        for v in self {
            v.extend_ne(&mut out);
        }
        Cow::Owned(out)
    }
}
