//! Core types for the PLY document model

mod buffer;
mod document;
mod dtype;
mod element;
mod header;

pub use buffer::Buffer;
pub(crate) use buffer::swap_bytes;
pub use document::Document;
pub use dtype::{DType, PropertyType, Scalar};
pub use element::{Element, Property};
pub use header::{
    END_HEADER, ElementDecl, Encoding, Header, MAGIC, PropertyDecl, PropertyKind, VERSION,
};
