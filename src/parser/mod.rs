//! Binary PLY reader
//!
//! Parses the ASCII header, then extracts every element of the binary
//! payload into columnar buffers.

mod cursor;
mod element;
mod header;

pub use header::{parse_header, read_header};

use crate::error::{PlyError, Result};
use crate::types::{Document, Encoding, Header};
use byteorder::{BigEndian, LittleEndian};
use cursor::PayloadCursor;
use element::extract_element;
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;
use tracing::{debug, warn};

/// Read a binary PLY file into a [`Document`]
pub fn read<P: AsRef<Path>>(path: P) -> Result<Document> {
    let path = path.as_ref();
    let open_err = |source| PlyError::Open {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(open_err)?;

    // SAFETY: The mapping is read-only and dropped before this call returns
    let mmap = unsafe { Mmap::map(&file) }.map_err(open_err)?;

    debug!(path = %path.display(), bytes = mmap.len(), "reading PLY");
    parse(&mmap)
}

/// Parse a complete PLY file held in memory
pub fn parse(bytes: &[u8]) -> Result<Document> {
    let header = parse_header(bytes)?;
    parse_payload(&header, &bytes[header.data_offset..])
}

/// Decode the payload described by an already parsed header
pub fn parse_payload(header: &Header, payload: &[u8]) -> Result<Document> {
    if !header.encoding.is_binary() {
        return Err(PlyError::UnsupportedEncoding(header.encoding));
    }
    let swap = header.encoding != Encoding::native();
    let mut cursor = PayloadCursor::new(payload);

    let mut doc = Document::new();
    doc.comments = header.comments.clone();
    doc.obj_info = header.obj_info.clone();

    for decl in &header.elements {
        let element = match header.encoding {
            Encoding::BinaryBigEndian => extract_element::<BigEndian>(&mut cursor, decl, swap)?,
            _ => extract_element::<LittleEndian>(&mut cursor, decl, swap)?,
        };
        if doc.insert(element).is_some() {
            warn!(element = %decl.name, "duplicate element name, keeping the later one");
        }
    }

    if cursor.remaining() > 0 {
        debug!(bytes = cursor.remaining(), "ignoring trailing payload bytes");
    }
    debug!(
        elements = doc.len(),
        encoding = %header.encoding,
        "parsed PLY payload"
    );
    Ok(doc)
}
