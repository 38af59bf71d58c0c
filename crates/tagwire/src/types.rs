//! Wire type codes and the packed field header byte.

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// Marks a length-prefixed sequence of values of the declared type.
pub const FLAG_REPEATED: u8 = 0x40;
/// For `MAP` fields: keys are `u16`-length-prefixed UTF-8 instead of `i32`.
pub const FLAG_MAP_KEY_STRING: u8 = 0x80;
/// Low five bits of the header byte hold the type code. Bit 5 is reserved.
pub const TYPE_MASK: u8 = 0x1f;

/// Closed set of value kinds that can appear on the wire.
///
/// The discriminant is the type code stored in the header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum WireType {
    Str = 0,
    Bool = 1,
    Int8 = 2,
    Uint8 = 3,
    Int16 = 4,
    Uint16 = 5,
    Int32 = 6,
    Uint32 = 7,
    Enum = 8,
    Int64 = 9,
    Uint64 = 10,
    Float32 = 11,
    Float64 = 12,
    Bytes = 13,
    Model = 14,
    Map = 15,
}

impl WireType {
    pub const ALL: [WireType; 16] = [
        WireType::Str,
        WireType::Bool,
        WireType::Int8,
        WireType::Uint8,
        WireType::Int16,
        WireType::Uint16,
        WireType::Int32,
        WireType::Uint32,
        WireType::Enum,
        WireType::Int64,
        WireType::Uint64,
        WireType::Float32,
        WireType::Float64,
        WireType::Bytes,
        WireType::Model,
        WireType::Map,
    ];

    /// Maps a 5-bit type code back to its kind.
    pub fn from_code(code: u8) -> Option<WireType> {
        WireType::ALL.get(code as usize).copied()
    }

    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Encoded width in bytes for fixed-width kinds, `None` for
    /// length-prefixed and composite kinds.
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            WireType::Bool | WireType::Int8 | WireType::Uint8 => Some(1),
            WireType::Int16 | WireType::Uint16 => Some(2),
            WireType::Int32 | WireType::Uint32 | WireType::Enum | WireType::Float32 => Some(4),
            WireType::Int64 | WireType::Uint64 | WireType::Float64 => Some(8),
            WireType::Str | WireType::Bytes | WireType::Model | WireType::Map => None,
        }
    }
}

impl std::fmt::Display for WireType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WireType::Str => "STR",
            WireType::Bool => "BOOL",
            WireType::Int8 => "INT8",
            WireType::Uint8 => "UINT8",
            WireType::Int16 => "INT16",
            WireType::Uint16 => "UINT16",
            WireType::Int32 => "INT32",
            WireType::Uint32 => "UINT32",
            WireType::Enum => "ENUM",
            WireType::Int64 => "INT64",
            WireType::Uint64 => "UINT64",
            WireType::Float32 => "FLOAT32",
            WireType::Float64 => "FLOAT64",
            WireType::Bytes => "BYTES",
            WireType::Model => "MODEL",
            WireType::Map => "MAP",
        };
        f.write_str(name)
    }
}

/// Unpacked form of the header byte that follows every field tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldHeader {
    pub ty: WireType,
    pub repeated: bool,
    pub map_key_string: bool,
}

impl FieldHeader {
    pub fn new(ty: WireType) -> Self {
        Self {
            ty,
            repeated: false,
            map_key_string: false,
        }
    }

    pub fn to_byte(self) -> u8 {
        let mut byte = self.ty.code();
        if self.repeated {
            byte |= FLAG_REPEATED;
        }
        if self.map_key_string {
            byte |= FLAG_MAP_KEY_STRING;
        }
        byte
    }

    /// Unpacks a header byte. The reserved bit 5 is ignored.
    pub fn from_byte(byte: u8) -> Result<Self, DecodeError> {
        let code = byte & TYPE_MASK;
        let ty = WireType::from_code(code).ok_or(DecodeError::UnknownType(code))?;
        Ok(Self {
            ty,
            repeated: byte & FLAG_REPEATED != 0,
            map_key_string: byte & FLAG_MAP_KEY_STRING != 0,
        })
    }
}
