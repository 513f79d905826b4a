//! Bounds-checked cursor over the binary payload

use crate::error::{PlyError, Result};
use crate::types::PropertyType;
use byteorder::ByteOrder;

/// Zero-copy reader over payload bytes
pub(crate) struct PayloadCursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> PayloadCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Take exactly `count` bytes as a slice of the payload
    pub fn take(&mut self, count: usize, element: &str) -> Result<&'a [u8]> {
        if count > self.remaining() {
            return Err(PlyError::Truncated {
                element: element.to_string(),
                expected: count,
                available: self.remaining(),
            });
        }
        let slice = &self.data[self.position..self.position + count];
        self.position += count;
        Ok(slice)
    }

    /// Read a list length prefix of type `ty`
    pub fn read_count<E: ByteOrder>(&mut self, ty: PropertyType, element: &str) -> Result<usize> {
        let bytes = self.take(ty.size(), element)?;
        let value: i64 = match ty {
            PropertyType::UChar => i64::from(bytes[0]),
            PropertyType::Char => i64::from(bytes[0] as i8),
            PropertyType::UShort => i64::from(E::read_u16(bytes)),
            PropertyType::Short => i64::from(E::read_i16(bytes)),
            PropertyType::UInt => i64::from(E::read_u32(bytes)),
            PropertyType::Int => i64::from(E::read_i32(bytes)),
            PropertyType::Float | PropertyType::Double => {
                return Err(PlyError::InvalidFormat(format!(
                    "list count of element '{}' has non-integer type '{}'",
                    element,
                    ty.name()
                )));
            }
        };
        usize::try_from(value).map_err(|_| {
            PlyError::InvalidFormat(format!(
                "negative list count {} in element '{}'",
                value, element
            ))
        })
    }
}
