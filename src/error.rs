//! Error types for plyarray

use crate::tensor::Device;
use crate::types::{DType, Encoding};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlyError>;

/// Failure of a read or write call
#[derive(Error, Debug)]
pub enum PlyError {
    #[error("failed to open {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid PLY file: {0}")]
    InvalidFormat(String),

    #[error("unsupported PLY encoding: {0}")]
    UnsupportedEncoding(Encoding),

    #[error("unsupported property type: {name}")]
    UnsupportedType { name: String },

    #[error(
        "list property '{property}' of element '{element}' has varying row length (from {min} to {max})"
    )]
    JaggedList {
        element: String,
        property: String,
        min: usize,
        max: usize,
    },

    #[error(
        "list property '{property}' of element '{element}' has {len} values per row, at most 255 fit a uchar count"
    )]
    ListTooLong {
        element: String,
        property: String,
        len: usize,
    },

    #[error(
        "scalar property '{property}' of element '{element}' has no values per row, insert it as a list"
    )]
    ZeroWidth { element: String, property: String },

    #[error("{0}")]
    Precondition(#[from] PreconditionError),

    #[error(
        "property '{property}' of element '{element}' has {actual} rows, expected {expected}"
    )]
    RowCountMismatch {
        element: String,
        property: String,
        expected: usize,
        actual: usize,
    },

    #[error("data size mismatch for '{name}': expected {expected} bytes, got {actual}")]
    DataSizeMismatch {
        name: String,
        expected: u64,
        actual: u64,
    },

    #[error("payload of element '{element}' truncated: needed {expected} bytes, {available} left")]
    Truncated {
        element: String,
        expected: usize,
        available: usize,
    },

    #[error("invalid name {name:?}: names must be non-empty and contain no whitespace")]
    InvalidName { name: String },

    #[error("field '{field}' is required but element '{element}' has no properties {properties:?}")]
    MissingField {
        field: &'static str,
        element: &'static str,
        properties: &'static [&'static str],
    },

    #[error("cannot stack columns of element '{element}': {message}")]
    StackMismatch { element: String, message: String },
}

/// Dense writer input that violates a precondition
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("data tensor must be 2-dimensional, got {ndim} dimensions")]
    NotTwoDimensional { ndim: usize },

    #[error("data tensor has {width} columns but {names} property names were given")]
    NameCountMismatch { width: usize, names: usize },

    #[error("data must be on CPU, found {device:?}")]
    NotHostResident { device: Device },

    #[error("data dtype must be F32, got {dtype:?}")]
    NotFloat32 { dtype: DType },
}
