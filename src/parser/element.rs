//! Element payload extraction

use super::cursor::PayloadCursor;
use crate::error::{PlyError, Result};
use crate::types::{Buffer, Element, ElementDecl, Property, PropertyKind, swap_bytes};
use byteorder::ByteOrder;
use tracing::trace;

struct Column {
    data: Vec<u8>,
    width: usize,
}

/// Extract one element's rows into per-property buffers
///
/// `swap` converts values from the file's byte order to the host's.
pub(crate) fn extract_element<E: ByteOrder>(
    cursor: &mut PayloadCursor<'_>,
    decl: &ElementDecl,
    swap: bool,
) -> Result<Element> {
    let columns = match decl.fixed_row_size() {
        Some(row_size) => extract_fixed(cursor, decl, row_size)?,
        None => extract_rows::<E>(cursor, decl)?,
    };

    let mut element = Element::with_rows(decl.name.clone(), decl.count);
    for (prop, mut column) in decl.properties.iter().zip(columns) {
        let ty = prop.kind.value_type();
        if swap {
            swap_bytes(&mut column.data, ty.size());
        }
        element.insert_property(Property {
            name: prop.name.clone(),
            data: Buffer::new(ty.to_dtype(), decl.count, column.width, column.data),
            list: prop.kind.is_list(),
        })?;
    }

    trace!(
        element = %decl.name,
        rows = decl.count,
        properties = decl.properties.len(),
        "extracted element"
    );
    Ok(element)
}

/// All-scalar element: one contiguous block with a fixed row stride
fn extract_fixed(
    cursor: &mut PayloadCursor<'_>,
    decl: &ElementDecl,
    row_size: usize,
) -> Result<Vec<Column>> {
    let total = decl.count.checked_mul(row_size).ok_or_else(|| {
        PlyError::InvalidFormat(format!(
            "element '{}' declares {} rows, too many to address",
            decl.name, decl.count
        ))
    })?;
    let block = cursor.take(total, &decl.name)?;

    let mut columns = Vec::with_capacity(decl.properties.len());
    let mut offset = 0;
    for prop in &decl.properties {
        let size = prop.kind.value_type().size();
        let mut data = Vec::with_capacity(decl.count * size);
        for row in block.chunks_exact(row_size) {
            data.extend_from_slice(&row[offset..offset + size]);
        }
        columns.push(Column { data, width: 1 });
        offset += size;
    }
    Ok(columns)
}

/// Element with list properties: walk row by row, tracking list lengths
fn extract_rows<E: ByteOrder>(
    cursor: &mut PayloadCursor<'_>,
    decl: &ElementDecl,
) -> Result<Vec<Column>> {
    let mut columns: Vec<Column> = decl
        .properties
        .iter()
        .map(|_| Column {
            data: Vec::new(),
            width: 1,
        })
        .collect();
    // (min, max) observed length per list column
    let mut lengths: Vec<Option<(usize, usize)>> = vec![None; decl.properties.len()];

    for _ in 0..decl.count {
        for (i, prop) in decl.properties.iter().enumerate() {
            match prop.kind {
                PropertyKind::Scalar(ty) => {
                    let bytes = cursor.take(ty.size(), &decl.name)?;
                    columns[i].data.extend_from_slice(bytes);
                }
                PropertyKind::List { count, item } => {
                    let len = cursor.read_count::<E>(count, &decl.name)?;
                    let bytes = cursor.take(len * item.size(), &decl.name)?;
                    columns[i].data.extend_from_slice(bytes);
                    lengths[i] = Some(match lengths[i] {
                        None => (len, len),
                        Some((lo, hi)) => (lo.min(len), hi.max(len)),
                    });
                }
            }
        }
    }

    for ((prop, column), observed) in decl.properties.iter().zip(&mut columns).zip(lengths) {
        if !prop.kind.is_list() {
            continue;
        }
        column.width = match observed {
            Some((min, max)) if min != max => {
                return Err(PlyError::JaggedList {
                    element: decl.name.clone(),
                    property: prop.name.clone(),
                    min,
                    max,
                });
            }
            Some((len, _)) => len,
            None => 0,
        };
    }

    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DType, PropertyDecl, PropertyType};
    use byteorder::LittleEndian;

    fn face_decl(count: usize) -> ElementDecl {
        ElementDecl {
            name: "face".into(),
            count,
            properties: vec![
                PropertyDecl {
                    name: "vertex_index".into(),
                    kind: PropertyKind::List {
                        count: PropertyType::UChar,
                        item: PropertyType::Int,
                    },
                },
                PropertyDecl {
                    name: "flag".into(),
                    kind: PropertyKind::Scalar(PropertyType::UChar),
                },
            ],
        }
    }

    fn face_row(indices: &[i32], flag: u8) -> Vec<u8> {
        let mut row = vec![indices.len() as u8];
        for i in indices {
            row.extend_from_slice(&i.to_le_bytes());
        }
        row.push(flag);
        row
    }

    #[test]
    fn test_fixed_stride() {
        let decl = ElementDecl {
            name: "vertex".into(),
            count: 2,
            properties: vec![
                PropertyDecl {
                    name: "x".into(),
                    kind: PropertyKind::Scalar(PropertyType::Float),
                },
                PropertyDecl {
                    name: "red".into(),
                    kind: PropertyKind::Scalar(PropertyType::UChar),
                },
            ],
        };
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1.5f32.to_le_bytes());
        bytes.push(10);
        bytes.extend_from_slice(&(-2.0f32).to_le_bytes());
        bytes.push(20);

        let mut cursor = PayloadCursor::new(&bytes);
        let el = extract_element::<LittleEndian>(&mut cursor, &decl, cfg!(target_endian = "big"))
            .unwrap();
        assert_eq!(el.get("x").unwrap().to_vec::<f32>().unwrap(), vec![1.5, -2.0]);
        assert_eq!(el.get("red").unwrap().to_vec::<u8>().unwrap(), vec![10, 20]);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_uniform_list() {
        let mut bytes = face_row(&[0, 1, 2], 7);
        bytes.extend(face_row(&[2, 3, 0], 8));

        let mut cursor = PayloadCursor::new(&bytes);
        let el = extract_element::<LittleEndian>(
            &mut cursor,
            &face_decl(2),
            cfg!(target_endian = "big"),
        )
        .unwrap();
        let idx = el.property("vertex_index").unwrap();
        assert!(idx.list);
        assert_eq!((idx.data.rows, idx.data.width), (2, 3));
        assert_eq!(idx.data.dtype, DType::I32);
        assert_eq!(idx.data.to_vec::<i32>().unwrap(), vec![0, 1, 2, 2, 3, 0]);
        assert_eq!(el.get("flag").unwrap().to_vec::<u8>().unwrap(), vec![7, 8]);
    }

    #[test]
    fn test_jagged_list() {
        let mut bytes = face_row(&[0, 1], 0);
        bytes.extend(face_row(&[0, 1, 2], 0));
        bytes.extend(face_row(&[0, 1], 0));

        let mut cursor = PayloadCursor::new(&bytes);
        let err = extract_element::<LittleEndian>(&mut cursor, &face_decl(3), false).unwrap_err();
        assert!(matches!(
            err,
            PlyError::JaggedList { min: 2, max: 3, ref property, .. } if property == "vertex_index"
        ));
    }

    #[test]
    fn test_empty_list_element() {
        let mut cursor = PayloadCursor::new(&[]);
        let el = extract_element::<LittleEndian>(&mut cursor, &face_decl(0), false).unwrap();
        let idx = el.property("vertex_index").unwrap();
        assert_eq!((idx.data.rows, idx.data.width), (0, 0));
        assert!(idx.is_list());
    }

    #[test]
    fn test_truncated_rows() {
        let bytes = face_row(&[0, 1, 2], 7);
        let mut cursor = PayloadCursor::new(&bytes[..6]);
        let err = extract_element::<LittleEndian>(&mut cursor, &face_decl(1), false).unwrap_err();
        assert!(matches!(err, PlyError::Truncated { .. }));
    }
}
