//! Buffer data types and the PLY scalar type registry

use crate::error::{PlyError, Result};

/// In-memory element type of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
}

impl DType {
    /// Size in bytes of a single element
    pub fn element_size(self) -> usize {
        match self {
            DType::U8 | DType::I8 => 1,
            DType::U16 | DType::I16 => 2,
            DType::U32 | DType::I32 | DType::F32 => 4,
            DType::U64 | DType::I64 | DType::F64 => 8,
        }
    }
}

/// Scalar type as named in a PLY header
///
/// The registry is asymmetric. Reading maps both `char` and `uchar` onto
/// [`DType::U8`], so signedness of 8-bit properties is lost. Writing maps
/// every dtype onto exactly one name and rejects `U64`/`I64`, which PLY
/// cannot express.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    Char,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Float,
    Double,
}

impl PropertyType {
    pub const ALL: [PropertyType; 8] = [
        PropertyType::Char,
        PropertyType::UChar,
        PropertyType::Short,
        PropertyType::UShort,
        PropertyType::Int,
        PropertyType::UInt,
        PropertyType::Float,
        PropertyType::Double,
    ];

    /// Canonical header name
    pub fn name(self) -> &'static str {
        match self {
            PropertyType::Char => "char",
            PropertyType::UChar => "uchar",
            PropertyType::Short => "short",
            PropertyType::UShort => "ushort",
            PropertyType::Int => "int",
            PropertyType::UInt => "uint",
            PropertyType::Float => "float",
            PropertyType::Double => "double",
        }
    }

    /// Size in bytes on disk
    pub fn size(self) -> usize {
        match self {
            PropertyType::Char | PropertyType::UChar => 1,
            PropertyType::Short | PropertyType::UShort => 2,
            PropertyType::Int | PropertyType::UInt | PropertyType::Float => 4,
            PropertyType::Double => 8,
        }
    }

    /// Whether the type may be used as a list count
    pub fn is_integral(self) -> bool {
        !matches!(self, PropertyType::Float | PropertyType::Double)
    }

    /// Parse a header type name, including the sized aliases (`int32`, `float64`, ...)
    pub fn from_name(name: &str) -> Result<Self> {
        let ty = match name {
            "char" | "int8" => PropertyType::Char,
            "uchar" | "uint8" => PropertyType::UChar,
            "short" | "int16" => PropertyType::Short,
            "ushort" | "uint16" => PropertyType::UShort,
            "int" | "int32" => PropertyType::Int,
            "uint" | "uint32" => PropertyType::UInt,
            "float" | "float32" => PropertyType::Float,
            "double" | "float64" => PropertyType::Double,
            _ => {
                return Err(PlyError::UnsupportedType {
                    name: name.to_string(),
                });
            }
        };
        Ok(ty)
    }

    /// Read direction: the dtype a property of this type is loaded into
    pub fn to_dtype(self) -> DType {
        match self {
            PropertyType::Char | PropertyType::UChar => DType::U8,
            PropertyType::Short => DType::I16,
            PropertyType::UShort => DType::U16,
            PropertyType::Int => DType::I32,
            PropertyType::UInt => DType::U32,
            PropertyType::Float => DType::F32,
            PropertyType::Double => DType::F64,
        }
    }

    /// Write direction: the header type a buffer of `dtype` is declared as
    pub fn from_dtype(dtype: DType) -> Result<Self> {
        match dtype {
            DType::U8 => Ok(PropertyType::UChar),
            DType::I8 => Ok(PropertyType::Char),
            DType::U16 => Ok(PropertyType::UShort),
            DType::I16 => Ok(PropertyType::Short),
            DType::U32 => Ok(PropertyType::UInt),
            DType::I32 => Ok(PropertyType::Int),
            DType::F32 => Ok(PropertyType::Float),
            DType::F64 => Ok(PropertyType::Double),
            DType::U64 | DType::I64 => Err(PlyError::UnsupportedType {
                name: format!("{:?}", dtype),
            }),
        }
    }
}

/// Rust primitive that can back a [`Buffer`](super::Buffer)
pub trait Scalar: Copy + 'static {
    const DTYPE: DType;

    /// Append the native-endian bytes of `self`
    fn extend_ne(self, out: &mut Vec<u8>);

    /// Decode from exactly `size_of::<Self>()` native-endian bytes
    fn from_ne_slice(bytes: &[u8]) -> Self;
}

macro_rules! impl_scalar {
    ($($ty:ty => $dtype:ident),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const DTYPE: DType = DType::$dtype;

                fn extend_ne(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_ne_bytes());
                }

                fn from_ne_slice(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(bytes);
                    <$ty>::from_ne_bytes(raw)
                }
            }
        )*
    };
}

impl_scalar! {
    u8 => U8,
    i8 => I8,
    u16 => U16,
    i16 => I16,
    u32 => U32,
    i32 => I32,
    u64 => U64,
    i64 => I64,
    f32 => F32,
    f64 => F64,
}
