//! Dense float codec
//!
//! Fast path for files holding a single element whose properties are all
//! `float` scalars, the usual shape of point cloud and splat exports. The
//! whole payload maps onto one `[N, P]` buffer of `F32`.
//!
//! Two read modes exist. [`DenseReadMode::Validate`] parses the full header
//! and checks every property type and the payload size. [`DenseReadMode::TrustHeader`]
//! reads only the row count and property names, then takes the last
//! `N * P * 4` bytes of the file. If the file does not really consist of
//! `float` columns the result is silently wrong.
//!
//! The writer always emits `binary_little_endian`, whatever the host.

use crate::error::{PlyError, PreconditionError, Result};
use crate::parser::{parse_header, read_header};
use crate::tensor::{Device, Tensor};
use crate::types::{
    Buffer, DType, ElementDecl, Encoding, Header, PropertyDecl, PropertyKind, PropertyType,
    swap_bytes,
};
use crate::writer::check_name;
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::debug;

/// Element name used by [`write`]
pub const DENSE_ELEMENT: &str = "vertex";

const FLOAT_SIZE: usize = 4;

/// How [`read_with`] locates and checks the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DenseReadMode {
    /// Check property types and exact payload size
    #[default]
    Validate,
    /// Take the trailing `N * P * 4` bytes without checking property types
    TrustHeader,
}

/// Read a dense float file, validating its layout
pub fn read<P: AsRef<Path>>(path: P) -> Result<(Buffer, Vec<String>)> {
    read_with(path, DenseReadMode::Validate)
}

/// Read a dense float file trusting its header
pub fn read_unchecked<P: AsRef<Path>>(path: P) -> Result<(Buffer, Vec<String>)> {
    read_with(path, DenseReadMode::TrustHeader)
}

/// Read a dense float file as `([N, P] F32 buffer, property names)`
pub fn read_with<P: AsRef<Path>>(path: P, mode: DenseReadMode) -> Result<(Buffer, Vec<String>)> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| PlyError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), mode = ?mode, "reading dense float PLY");

    match mode {
        DenseReadMode::Validate => read_validated(path, file),
        DenseReadMode::TrustHeader => read_trusting(file),
    }
}

/// Single element, binary encoding
fn dense_element(header: &Header) -> Result<&ElementDecl> {
    if header.elements.len() != 1 {
        return Err(PlyError::InvalidFormat(format!(
            "expected exactly one element, found {}",
            header.elements.len()
        )));
    }
    if !header.encoding.is_binary() {
        return Err(PlyError::UnsupportedEncoding(header.encoding));
    }
    Ok(&header.elements[0])
}

fn payload_size(decl: &ElementDecl) -> Result<usize> {
    decl.count
        .checked_mul(decl.properties.len())
        .and_then(|n| n.checked_mul(FLOAT_SIZE))
        .ok_or_else(|| {
            PlyError::InvalidFormat(format!(
                "element '{}' declares {} rows, too many to address",
                decl.name, decl.count
            ))
        })
}

fn read_validated(path: &Path, file: File) -> Result<(Buffer, Vec<String>)> {
    // SAFETY: The mapping is read-only and dropped before this call returns
    let mmap = unsafe { Mmap::map(&file) }.map_err(|source| PlyError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let header = parse_header(&mmap)?;
    let decl = dense_element(&header)?;

    if let Some(prop) = decl
        .properties
        .iter()
        .find(|p| p.kind != PropertyKind::Scalar(PropertyType::Float))
    {
        return Err(PlyError::InvalidFormat(format!(
            "property '{}' of element '{}' is not a float scalar",
            prop.name, decl.name
        )));
    }

    let expected = payload_size(decl)?;
    let payload = &mmap[header.data_offset..];
    if payload.len() != expected {
        return Err(PlyError::DataSizeMismatch {
            name: decl.name.clone(),
            expected: expected as u64,
            actual: payload.len() as u64,
        });
    }

    Ok(to_buffer(header.encoding, decl, payload.to_vec()))
}

fn read_trusting(file: File) -> Result<(Buffer, Vec<String>)> {
    let file_len = file.metadata()?.len();
    let mut reader = BufReader::new(file);
    let header = read_header(&mut reader)?;
    let decl = dense_element(&header)?;

    let size = payload_size(decl)?;
    let available = file_len.saturating_sub(header.data_offset as u64);
    if size as u64 > available {
        return Err(PlyError::Truncated {
            element: decl.name.clone(),
            expected: size,
            available: available as usize,
        });
    }

    reader.seek(SeekFrom::End(-(size as i64)))?;
    let mut data = vec![0u8; size];
    reader.read_exact(&mut data)?;

    Ok(to_buffer(header.encoding, decl, data))
}

fn to_buffer(encoding: Encoding, decl: &ElementDecl, mut data: Vec<u8>) -> (Buffer, Vec<String>) {
    if encoding != Encoding::native() {
        swap_bytes(&mut data, FLOAT_SIZE);
    }
    let names = decl.properties.iter().map(|p| p.name.clone()).collect();
    let buffer = Buffer::new(DType::F32, decl.count, decl.properties.len(), data);
    (buffer, names)
}

/// Check the writer's preconditions, returning `(rows, columns)`
fn check_tensor<T: Tensor + ?Sized>(data: &T, names: usize) -> Result<(usize, usize)> {
    let shape = data.shape();
    let &[rows, cols] = shape.as_slice() else {
        return Err(PreconditionError::NotTwoDimensional { ndim: shape.len() }.into());
    };
    if cols != names {
        return Err(PreconditionError::NameCountMismatch { width: cols, names }.into());
    }
    let device = data.device();
    if device != Device::Cpu {
        return Err(PreconditionError::NotHostResident { device }.into());
    }
    let dtype = data.dtype();
    if dtype != DType::F32 {
        return Err(PreconditionError::NotFloat32 { dtype }.into());
    }
    Ok((rows, cols))
}

/// Write a `[N, P]` F32 tensor as a single `vertex` element of float properties
pub fn write<P, T, S>(path: P, data: &T, names: &[S]) -> Result<()>
where
    P: AsRef<Path>,
    T: Tensor + ?Sized,
    S: AsRef<str>,
{
    let path = path.as_ref();
    let (rows, cols) = check_tensor(data, names.len())?;

    let mut header = Header::new(Encoding::BinaryLittleEndian);
    let mut properties = Vec::with_capacity(cols);
    for name in names {
        let name = name.as_ref();
        check_name(name)?;
        properties.push(PropertyDecl {
            name: name.to_string(),
            kind: PropertyKind::Scalar(PropertyType::Float),
        });
    }
    header.elements.push(ElementDecl {
        name: DENSE_ELEMENT.to_string(),
        count: rows,
        properties,
    });

    let mut bytes = data.host_bytes();
    let expected = rows * cols * FLOAT_SIZE;
    if bytes.len() != expected {
        return Err(PlyError::DataSizeMismatch {
            name: DENSE_ELEMENT.to_string(),
            expected: expected as u64,
            actual: bytes.len() as u64,
        });
    }
    if cfg!(target_endian = "big") {
        swap_bytes(bytes.to_mut(), FLOAT_SIZE);
    }

    let file = File::create(path).map_err(|source| PlyError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    writer.write_all(header.to_string().as_bytes())?;
    writer.write_all(&bytes)?;
    writer.flush()?;

    debug!(path = %path.display(), rows, cols, "wrote dense float PLY");
    Ok(())
}
