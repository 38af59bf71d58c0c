//! Wire decoder: bytes to [`WireRecord`].
//!
//! Layout of one model:
//!
//! ```text
//! model       = u32 discriminator, field_entry* (until the range ends)
//! field_entry = u16 tag, u8 header, [u16 count if REPEATED], value{count or 1}
//! map         = u16 count, (key, field_entry){count}   key = str16 | i32
//! ```
//!
//! With [`ModelFraming::LengthPrefixed`] every nested model value is
//! preceded by its `u32` byte length.

use tagwire_buffers::Reader;
use tracing::{debug, trace};

use crate::error::DecodeError;
use crate::options::{CodecOptions, ModelFraming};
use crate::types::{FieldHeader, WireType};
use crate::value::{List, Map, MapKey, Scalar, Value, WireRecord, WireValue};

/// Decodes one model occupying a whole byte sequence.
#[derive(Debug, Clone, Default)]
pub struct WireDecoder {
    options: CodecOptions,
}

impl WireDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CodecOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Decodes `data` as exactly one model.
    pub fn decode(&self, data: &[u8]) -> Result<WireRecord, DecodeError> {
        let mut reader = Reader::new(data);
        let record = match self.read_model(&mut reader, 0) {
            Ok(record) => record,
            Err(err) => {
                debug!(bytes = data.len(), offset = reader.x, error = %err, "decode failed");
                return Err(err);
            }
        };
        debug!(
            bytes = data.len(),
            tag = record.tag,
            fields = record.fields.len(),
            "decoded model"
        );
        Ok(record)
    }

    fn enter(&self, depth: usize) -> Result<(), DecodeError> {
        if depth > self.options.max_depth {
            Err(DecodeError::DepthExceeded(self.options.max_depth))
        } else {
            Ok(())
        }
    }

    /// Reads a discriminator and then field entries until the reader's range
    /// is exhausted. A repeated tag overwrites the earlier value.
    fn read_model(&self, reader: &mut Reader<'_>, depth: usize) -> Result<WireRecord, DecodeError> {
        self.enter(depth)?;
        let mut record = WireRecord::new(reader.u32()?);
        while !reader.is_end() {
            let (tag, value) = self.read_field(reader, depth)?;
            record.fields.insert(tag, value);
        }
        Ok(record)
    }

    fn read_field(
        &self,
        reader: &mut Reader<'_>,
        depth: usize,
    ) -> Result<(u16, WireValue), DecodeError> {
        let tag = reader.u16()?;
        let header = FieldHeader::from_byte(reader.u8()?)?;
        trace!(tag, ty = %header.ty, repeated = header.repeated, "field entry");
        if !header.repeated {
            return Ok((tag, self.read_value(reader, header, depth)?));
        }
        let count = reader.u16()? as usize;
        let mut items = Vec::with_capacity(capacity_hint(count, header.ty, reader));
        for _ in 0..count {
            items.push(self.read_value(reader, header, depth)?);
        }
        Ok((
            tag,
            Value::List(List {
                item_type: header.ty,
                string_keys: header.ty == WireType::Map && header.map_key_string,
                items,
            }),
        ))
    }

    fn read_value(
        &self,
        reader: &mut Reader<'_>,
        header: FieldHeader,
        depth: usize,
    ) -> Result<WireValue, DecodeError> {
        let scalar = match header.ty {
            WireType::Str => Scalar::Str(reader.str16()?.to_owned()),
            WireType::Bool => Scalar::Bool(reader.bool()?),
            WireType::Int8 => Scalar::Int8(reader.i8()?),
            WireType::Uint8 => Scalar::Uint8(reader.u8()?),
            WireType::Int16 => Scalar::Int16(reader.i16()?),
            WireType::Uint16 => Scalar::Uint16(reader.u16()?),
            WireType::Int32 => Scalar::Int32(reader.i32()?),
            WireType::Uint32 => Scalar::Uint32(reader.u32()?),
            WireType::Enum => Scalar::Enum(reader.u32()?),
            WireType::Int64 => Scalar::Int64(reader.i64()?),
            WireType::Uint64 => Scalar::Uint64(reader.u64()?),
            WireType::Float32 => Scalar::Float32(reader.f32()?),
            WireType::Float64 => Scalar::Float64(reader.f64()?),
            WireType::Bytes => Scalar::Bytes(reader.bin16()?.to_vec()),
            WireType::Model => {
                return self.read_nested_model(reader, depth + 1).map(Value::Model);
            }
            WireType::Map => {
                return self
                    .read_map(reader, header.map_key_string, depth + 1)
                    .map(Value::Map);
            }
        };
        Ok(Value::Scalar(scalar))
    }

    fn read_nested_model(
        &self,
        reader: &mut Reader<'_>,
        depth: usize,
    ) -> Result<WireRecord, DecodeError> {
        match self.options.model_framing {
            ModelFraming::LengthPrefixed => {
                let size = reader.u32()? as usize;
                let mut body = reader.cut(size)?;
                self.read_model(&mut body, depth)
            }
            ModelFraming::Trailing => self.read_model(reader, depth),
        }
    }

    /// Each map value is a full field entry; its tag is read and discarded.
    fn read_map(
        &self,
        reader: &mut Reader<'_>,
        string_keys: bool,
        depth: usize,
    ) -> Result<Map<WireRecord>, DecodeError> {
        self.enter(depth)?;
        let count = reader.u16()?;
        let mut map = if string_keys {
            Map::with_string_keys()
        } else {
            Map::with_int_keys()
        };
        for _ in 0..count {
            let key = if string_keys {
                MapKey::Str(reader.str16()?.to_owned())
            } else {
                MapKey::Int(reader.i32()?)
            };
            let (_, value) = self.read_field(reader, depth)?;
            map.entries.insert(key, value);
        }
        Ok(map)
    }
}

/// Bounds a declared element count by what the remaining bytes could hold,
/// so a corrupt count cannot force a huge allocation.
fn capacity_hint(count: usize, ty: WireType, reader: &Reader<'_>) -> usize {
    let min_width = ty.fixed_width().unwrap_or(2);
    count.min(reader.size() / min_width)
}
