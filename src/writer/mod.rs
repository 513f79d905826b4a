//! Serialization of PLY documents
//!
//! Files are written in the byte order of the running machine, and the
//! `format` line says so.

mod element;
mod header;

pub use header::MAX_LIST_LEN;

use crate::error::{PlyError, Result};
use crate::types::{Document, Encoding, Header};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::debug;

use element::write_element;
pub(crate) use header::check_name;
use header::build_header;

/// Write a document to a writer
pub fn write<W: Write>(writer: &mut W, doc: &Document) -> Result<()> {
    let header = build_header(doc, Encoding::native())?;
    write_validated(writer, &header, doc)?;
    Ok(())
}

/// Write a document to bytes
pub fn to_bytes(doc: &Document) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write(&mut buf, doc)?;
    Ok(buf)
}

/// Write a document to a file
///
/// The document is validated before the file is created, so a rejected
/// document leaves nothing behind.
pub fn write_file<P: AsRef<Path>>(path: P, doc: &Document) -> Result<()> {
    let path = path.as_ref();
    let header = build_header(doc, Encoding::native())?;

    let file = File::create(path).map_err(|source| PlyError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    write_validated(&mut writer, &header, doc)?;
    writer.flush()?;

    debug!(
        path = %path.display(),
        elements = doc.len(),
        encoding = %header.encoding,
        "wrote PLY"
    );
    Ok(())
}

fn write_validated<W: Write>(writer: &mut W, header: &Header, doc: &Document) -> io::Result<()> {
    writer.write_all(header.to_string().as_bytes())?;
    for element in doc.elements() {
        write_element(writer, element)?;
    }
    Ok(())
}
