//! Header constants and structure

use super::PropertyType;
use std::fmt;

/// First line of every PLY file
pub const MAGIC: &str = "ply";

/// Format version written by this crate
pub const VERSION: &str = "1.0";

/// Keyword closing the header
pub const END_HEADER: &str = "end_header";

/// Payload encoding declared on the `format` line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Ascii,
    BinaryLittleEndian,
    BinaryBigEndian,
}

impl Encoding {
    pub fn keyword(self) -> &'static str {
        match self {
            Encoding::Ascii => "ascii",
            Encoding::BinaryLittleEndian => "binary_little_endian",
            Encoding::BinaryBigEndian => "binary_big_endian",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "ascii" => Some(Encoding::Ascii),
            "binary_little_endian" => Some(Encoding::BinaryLittleEndian),
            "binary_big_endian" => Some(Encoding::BinaryBigEndian),
            _ => None,
        }
    }

    /// Binary encoding matching the byte order of the running machine
    pub fn native() -> Self {
        if cfg!(target_endian = "big") {
            Encoding::BinaryBigEndian
        } else {
            Encoding::BinaryLittleEndian
        }
    }

    pub fn is_binary(self) -> bool {
        self != Encoding::Ascii
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Scalar or list layout of a declared property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Scalar(PropertyType),
    List {
        count: PropertyType,
        item: PropertyType,
    },
}

impl PropertyKind {
    /// Type of the values (the items, for a list)
    pub fn value_type(self) -> PropertyType {
        match self {
            PropertyKind::Scalar(ty) => ty,
            PropertyKind::List { item, .. } => item,
        }
    }

    pub fn is_list(self) -> bool {
        matches!(self, PropertyKind::List { .. })
    }
}

/// One `property` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDecl {
    pub name: String,
    pub kind: PropertyKind,
}

/// One `element` line and the properties that follow it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementDecl {
    pub name: String,
    pub count: usize,
    pub properties: Vec<PropertyDecl>,
}

impl ElementDecl {
    /// Bytes per row when every property is scalar
    pub fn fixed_row_size(&self) -> Option<usize> {
        self.properties
            .iter()
            .map(|p| match p.kind {
                PropertyKind::Scalar(ty) => Some(ty.size()),
                PropertyKind::List { .. } => None,
            })
            .sum()
    }
}

/// Parsed or synthesized PLY header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub encoding: Encoding,
    pub version: String,
    pub comments: Vec<String>,
    pub obj_info: Vec<String>,
    pub elements: Vec<ElementDecl>,
    /// Byte offset of the payload (0 for a synthesized header)
    pub data_offset: usize,
}

impl Header {
    pub fn new(encoding: Encoding) -> Self {
        Self {
            encoding,
            version: VERSION.to_string(),
            comments: Vec::new(),
            obj_info: Vec::new(),
            elements: Vec::new(),
            data_offset: 0,
        }
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", MAGIC)?;
        writeln!(f, "format {} {}", self.encoding, self.version)?;
        for comment in &self.comments {
            writeln!(f, "comment {}", comment)?;
        }
        for info in &self.obj_info {
            writeln!(f, "obj_info {}", info)?;
        }
        for element in &self.elements {
            writeln!(f, "element {} {}", element.name, element.count)?;
            for prop in &element.properties {
                match prop.kind {
                    PropertyKind::Scalar(ty) => {
                        writeln!(f, "property {} {}", ty.name(), prop.name)?
                    }
                    PropertyKind::List { count, item } => writeln!(
                        f,
                        "property list {} {} {}",
                        count.name(),
                        item.name(),
                        prop.name
                    )?,
                }
            }
        }
        writeln!(f, "{}", END_HEADER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_header() {
        let mut header = Header::new(Encoding::BinaryLittleEndian);
        header.comments.push("made by hand".into());
        header.elements.push(ElementDecl {
            name: "face".into(),
            count: 2,
            properties: vec![
                PropertyDecl {
                    name: "vertex_index".into(),
                    kind: PropertyKind::List {
                        count: PropertyType::UChar,
                        item: PropertyType::Int,
                    },
                },
                PropertyDecl {
                    name: "flags".into(),
                    kind: PropertyKind::Scalar(PropertyType::UShort),
                },
            ],
        });

        assert_eq!(
            header.to_string(),
            "ply\n\
             format binary_little_endian 1.0\n\
             comment made by hand\n\
             element face 2\n\
             property list uchar int vertex_index\n\
             property ushort flags\n\
             end_header\n"
        );
    }

    #[test]
    fn fixed_row_size() {
        let mut decl = ElementDecl {
            name: "vertex".into(),
            count: 0,
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
        assert_eq!(decl.fixed_row_size(), Some(5));

        decl.properties.push(PropertyDecl {
            name: "idx".into(),
            kind: PropertyKind::List {
                count: PropertyType::UChar,
                item: PropertyType::Int,
            },
        });
        assert_eq!(decl.fixed_row_size(), None);
    }

    #[test]
    fn native_encoding_is_binary() {
        assert!(Encoding::native().is_binary());
        assert!(!Encoding::Ascii.is_binary());
    }
}
