//! Header synthesis and pre-write validation

use crate::error::{PlyError, Result};
use crate::types::{
    Document, Element, ElementDecl, Encoding, Header, PropertyDecl, PropertyKind, PropertyType,
};

/// Longest list a `uchar` count can describe
pub const MAX_LIST_LEN: usize = u8::MAX as usize;

pub(crate) fn check_name(name: &str) -> Result<()> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(PlyError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

fn element_decl(element: &Element) -> Result<ElementDecl> {
    check_name(element.name())?;

    let mut properties = Vec::with_capacity(element.len());
    for prop in element.properties() {
        check_name(&prop.name)?;

        let ty = PropertyType::from_dtype(prop.data.dtype)?;
        let expected = prop.data.expected_size();
        if prop.data.data.len() != expected {
            return Err(PlyError::DataSizeMismatch {
                name: format!("{}.{}", element.name(), prop.name),
                expected: expected as u64,
                actual: prop.data.data.len() as u64,
            });
        }

        let kind = if prop.is_list() {
            if prop.data.width > MAX_LIST_LEN {
                return Err(PlyError::ListTooLong {
                    element: element.name().to_string(),
                    property: prop.name.clone(),
                    len: prop.data.width,
                });
            }
            PropertyKind::List {
                count: PropertyType::UChar,
                item: ty,
            }
        } else if prop.data.width == 1 {
            PropertyKind::Scalar(ty)
        } else {
            return Err(PlyError::ZeroWidth {
                element: element.name().to_string(),
                property: prop.name.clone(),
            });
        };

        properties.push(PropertyDecl {
            name: prop.name.clone(),
            kind,
        });
    }

    Ok(ElementDecl {
        name: element.name().to_string(),
        count: element.rows(),
        properties,
    })
}

fn single_line(keyword: &str, text: &str) -> Result<String> {
    if text.contains(['\n', '\r']) {
        return Err(PlyError::InvalidFormat(format!(
            "{} {:?} spans several lines",
            keyword, text
        )));
    }
    Ok(text.to_string())
}

/// Describe `doc` as a header, rejecting anything the payload writer cannot emit
pub(crate) fn build_header(doc: &Document, encoding: Encoding) -> Result<Header> {
    let mut header = Header::new(encoding);

    for comment in &doc.comments {
        header.comments.push(single_line("comment", comment)?);
    }
    for info in &doc.obj_info {
        header.obj_info.push(single_line("obj_info", info)?);
    }

    for element in doc.elements() {
        header.elements.push(element_decl(element)?);
    }
    Ok(header)
}
