//! Header parsing

use crate::error::{PlyError, Result};
use crate::types::{
    END_HEADER, ElementDecl, Encoding, Header, MAGIC, PropertyDecl, PropertyKind, PropertyType,
    VERSION,
};
use std::fmt::Display;
use std::io::BufRead;
use tracing::warn;

fn invalid(line: usize, message: impl Display) -> PlyError {
    PlyError::InvalidFormat(format!("header line {}: {}", line, message))
}

fn unterminated() -> PlyError {
    PlyError::InvalidFormat(format!("header is not terminated by '{}'", END_HEADER))
}

/// Parse the ASCII header at the start of `bytes`
///
/// The returned header's `data_offset` points just past the `end_header` line.
pub fn parse_header(bytes: &[u8]) -> Result<Header> {
    let mut offset = 0;
    let mut line_no = 0;
    let mut format: Option<(Encoding, String)> = None;
    let mut comments = Vec::new();
    let mut obj_info = Vec::new();
    let mut elements: Vec<ElementDecl> = Vec::new();

    while offset < bytes.len() {
        let end = bytes[offset..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(bytes.len(), |i| offset + i + 1);
        let raw = &bytes[offset..end];
        offset = end;
        line_no += 1;

        if line_no == 1 {
            if raw.trim_ascii() != MAGIC.as_bytes() {
                return Err(invalid(1, "missing 'ply' magic line"));
            }
            continue;
        }

        let line = std::str::from_utf8(raw)
            .map_err(|_| invalid(line_no, "header is not valid UTF-8"))?
            .trim();
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };

        match keyword {
            "format" => {
                let encoding = tokens
                    .next()
                    .ok_or_else(|| invalid(line_no, "malformed format line"))?;
                let encoding = Encoding::from_keyword(encoding)
                    .ok_or_else(|| invalid(line_no, format!("unknown format '{}'", encoding)))?;
                let version = tokens.next().unwrap_or(VERSION).to_string();
                if version != VERSION {
                    warn!(version = %version, "unexpected PLY format version");
                }
                format = Some((encoding, version));
            }
            "comment" => comments.push(line[keyword.len()..].trim().to_string()),
            "obj_info" => obj_info.push(line[keyword.len()..].trim().to_string()),
            "element" => {
                let (name, count) = match (tokens.next(), tokens.next()) {
                    (Some(name), Some(count)) => (name, count),
                    _ => return Err(invalid(line_no, "malformed element line")),
                };
                let count = count.parse().map_err(|_| {
                    invalid(line_no, format!("invalid row count '{}'", count))
                })?;
                elements.push(ElementDecl {
                    name: name.to_string(),
                    count,
                    properties: Vec::new(),
                });
            }
            "property" => {
                let element = elements
                    .last_mut()
                    .ok_or_else(|| invalid(line_no, "property declared before any element"))?;
                let malformed = || invalid(line_no, "malformed property line");

                let (kind, name) = match tokens.next() {
                    Some("list") => {
                        let count = PropertyType::from_name(tokens.next().ok_or_else(malformed)?)?;
                        let item = PropertyType::from_name(tokens.next().ok_or_else(malformed)?)?;
                        if !count.is_integral() {
                            return Err(invalid(
                                line_no,
                                format!("list count type '{}' is not an integer", count.name()),
                            ));
                        }
                        (PropertyKind::List { count, item }, tokens.next())
                    }
                    Some(ty) => (
                        PropertyKind::Scalar(PropertyType::from_name(ty)?),
                        tokens.next(),
                    ),
                    None => return Err(malformed()),
                };

                element.properties.push(PropertyDecl {
                    name: name.ok_or_else(malformed)?.to_string(),
                    kind,
                });
            }
            END_HEADER => {
                if tokens.next().is_some() {
                    return Err(invalid(line_no, "unexpected tokens after end_header"));
                }
                let (encoding, version) =
                    format.ok_or_else(|| invalid(line_no, "missing format line"))?;
                return Ok(Header {
                    encoding,
                    version,
                    comments,
                    obj_info,
                    elements,
                    data_offset: offset,
                });
            }
            other => return Err(invalid(line_no, format!("unknown keyword '{}'", other))),
        }
    }

    Err(unterminated())
}

/// Read just the header lines from a stream
///
/// Leaves `reader` positioned at the first payload byte.
pub fn read_header<R: BufRead>(reader: &mut R) -> Result<Header> {
    let mut bytes = Vec::new();
    let mut first = true;

    loop {
        let start = bytes.len();
        if reader.read_until(b'\n', &mut bytes)? == 0 {
            return Err(unterminated());
        }
        let line = bytes[start..].trim_ascii();
        if first {
            if line != MAGIC.as_bytes() {
                return Err(invalid(1, "missing 'ply' magic line"));
            }
            first = false;
        } else if line == END_HEADER.as_bytes() {
            break;
        }
    }

    parse_header(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const CUBE: &str = "ply\n\
        format binary_little_endian 1.0\n\
        comment exported by hand\n\
        obj_info cube\n\
        element vertex 8\n\
        property float x\n\
        property float32 y\n\
        property float z\n\
        element face 6\n\
        property list uchar int vertex_index\n\
        end_header\n";

    #[test]
    fn test_parse_header() {
        let header = parse_header(CUBE.as_bytes()).unwrap();
        assert_eq!(header.encoding, Encoding::BinaryLittleEndian);
        assert_eq!(header.version, "1.0");
        assert_eq!(header.comments, vec!["exported by hand"]);
        assert_eq!(header.obj_info, vec!["cube"]);
        assert_eq!(header.data_offset, CUBE.len());

        assert_eq!(header.elements.len(), 2);
        let vertex = &header.elements[0];
        assert_eq!((vertex.name.as_str(), vertex.count), ("vertex", 8));
        assert_eq!(vertex.properties[1].name, "y");
        assert_eq!(
            vertex.properties[1].kind,
            PropertyKind::Scalar(PropertyType::Float)
        );

        let face = &header.elements[1];
        assert_eq!(
            face.properties[0].kind,
            PropertyKind::List {
                count: PropertyType::UChar,
                item: PropertyType::Int
            }
        );
    }

    #[test]
    fn test_crlf_and_payload_offset() {
        let mut bytes = b"ply\r\nformat binary_big_endian 1.0\r\n\r\nelement v 1\r\nproperty uchar a\r\nend_header\r\n".to_vec();
        let offset = bytes.len();
        bytes.push(0x7F);

        let header = parse_header(&bytes).unwrap();
        assert_eq!(header.encoding, Encoding::BinaryBigEndian);
        assert_eq!(header.data_offset, offset);
    }

    #[test]
    fn test_missing_magic() {
        let result = parse_header(b"\x00\x01binary junk");
        assert!(matches!(result, Err(PlyError::InvalidFormat(_))));
    }

    #[test]
    fn test_missing_format() {
        let result = parse_header(b"ply\nelement v 0\nend_header\n");
        assert!(result.unwrap_err().to_string().contains("missing format"));
    }

    #[test]
    fn test_unterminated() {
        let result = parse_header(b"ply\nformat ascii 1.0\nelement v 0\n");
        assert!(result.unwrap_err().to_string().contains("end_header"));
    }

    #[test]
    fn test_property_before_element() {
        let result = parse_header(b"ply\nformat ascii 1.0\nproperty float x\nend_header\n");
        assert!(matches!(result, Err(PlyError::InvalidFormat(_))));
    }

    #[test]
    fn test_unknown_type() {
        let result =
            parse_header(b"ply\nformat ascii 1.0\nelement v 1\nproperty int64 x\nend_header\n");
        assert!(matches!(
            result,
            Err(PlyError::UnsupportedType { name }) if name == "int64"
        ));
    }

    #[test]
    fn test_float_list_count_rejected() {
        let result = parse_header(
            b"ply\nformat ascii 1.0\nelement f 1\nproperty list float int idx\nend_header\n",
        );
        assert!(result.unwrap_err().to_string().contains("not an integer"));
    }

    #[test]
    fn test_unknown_keyword() {
        let result = parse_header(b"ply\nformat ascii 1.0\nbogus\nend_header\n");
        assert!(result.unwrap_err().to_string().contains("line 3"));
    }

    #[test]
    fn test_read_header_stops_at_payload() {
        let mut bytes = CUBE.as_bytes().to_vec();
        bytes.extend_from_slice(&[1, 2, 3]);
        let mut reader = Cursor::new(bytes);

        let header = read_header(&mut reader).unwrap();
        assert_eq!(header.elements.len(), 2);
        assert_eq!(reader.position() as usize, CUBE.len());
    }
}
