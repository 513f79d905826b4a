//! plyarray - Binary PLY reader/writer with columnar typed buffers
//!
//! Decodes a binary PLY file into a [`Document`]: an ordered set of named
//! elements, each an ordered set of named `[rows, width]` buffers. Scalar
//! properties have width 1; list properties must have the same length on
//! every row and become a rectangular buffer.
//!
//! # Features
//!
//! - Little- and big-endian payloads on read, host byte order on write
//! - Fixed-width list properties, with jagged lists rejected
//! - Dense float fast path for single-element `float` exports
//! - ndarray conversions (`ndarray` feature, on by default)
//!
//! # Panics
//!
//! [`Buffer::from_values`] panics when the value count does not match
//! `rows * width`. Use [`Buffer::try_from_values`] for untrusted lengths.
//! Nothing else in the crate panics on bad input.
//!
//! # Example
//!
//! ```rust
//! use plyarray::{Buffer, Document, Element, parse, writer};
//!
//! let vertex = Element::new("vertex")
//!     .with("x", Buffer::column_of(&[0.0f32, 1.0, 0.0]))?
//!     .with("y", Buffer::column_of(&[0.0f32, 0.0, 1.0]))?;
//! let mut face = Element::new("face");
//! face.insert("vertex_index", Buffer::try_from_values(1, 3, &[0i32, 1, 2])?)?;
//!
//! let doc = Document::new().with(vertex).with(face);
//! let bytes = writer::to_bytes(&doc)?;
//!
//! let back = parse(&bytes)?;
//! assert_eq!(back.get("face").unwrap().get("vertex_index").unwrap().width, 3);
//! # Ok::<(), plyarray::PlyError>(())
//! ```

pub mod dense;
pub mod error;
pub mod geometry;
pub mod parser;
pub mod tensor;
pub mod types;
pub mod writer;

#[cfg(feature = "ndarray")]
pub mod ndarray_ext;

// Re-export common types at crate root
pub use error::{PlyError, PreconditionError, Result};
pub use parser::{parse, read};
pub use tensor::{Device, Tensor};
pub use types::{
    Buffer, DType, Document, Element, ElementDecl, Encoding, Header, Property, PropertyDecl,
    PropertyKind, PropertyType, Scalar,
};
pub use writer::write_file;

#[cfg(feature = "ndarray")]
pub use ndarray_ext::NdarrayError;
