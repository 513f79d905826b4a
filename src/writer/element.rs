//! Interleaved row serialization

use crate::types::Element;
use byteorder::WriteBytesExt;
use std::io::{self, Write};

struct ColumnSource<'a> {
    data: &'a [u8],
    row_bytes: usize,
    /// Count prefix for list columns
    list_len: Option<u8>,
}

/// Write every row of `element`, properties in column order
///
/// The element must already have passed header validation, which guarantees
/// list widths fit a `u8` and buffer sizes match their shapes.
pub(crate) fn write_element<W: Write>(writer: &mut W, element: &Element) -> io::Result<()> {
    let columns: Vec<ColumnSource<'_>> = element
        .properties()
        .map(|p| ColumnSource {
            data: &p.data.data,
            row_bytes: p.data.row_bytes(),
            list_len: p.is_list().then_some(p.data.width as u8),
        })
        .collect();

    let mut cursors = vec![0usize; columns.len()];
    for _ in 0..element.rows() {
        for (col, cursor) in columns.iter().zip(cursors.iter_mut()) {
            if let Some(len) = col.list_len {
                writer.write_u8(len)?;
            }
            writer.write_all(&col.data[*cursor..*cursor + col.row_bytes])?;
            *cursor += col.row_bytes;
        }
    }
    Ok(())
}
