//! Wire encoder: [`WireRecord`] or schema-checked [`NamedObject`] to bytes.

use indexmap::IndexMap;
use tagwire_buffers::Writer;
use tracing::debug;

use crate::error::EncodeError;
use crate::meta::{MetaField, MetaModel};
use crate::options::{CodecOptions, ModelFraming};
use crate::types::{FieldHeader, WireType};
use crate::value::{
    List, Map, MapKey, NamedObject, NamedValue, Scalar, Value, WireRecord, WireValue,
};

/// Tag written in front of every map value. Decoders discard it.
pub const MAP_VALUE_TAG: u16 = 0;

/// Writes models in the layout read by [`WireDecoder`](crate::WireDecoder).
#[derive(Debug, Clone, Default)]
pub struct WireEncoder {
    pub writer: Writer,
    options: CodecOptions,
}

impl WireEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CodecOptions) -> Self {
        Self {
            writer: Writer::new(),
            options,
        }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Encodes a named object under `model`.
    ///
    /// Schema fields missing from `object` are omitted from the output and
    /// keys of `object` unknown to the schema are ignored.
    pub fn encode(
        &mut self,
        object: &NamedObject,
        model: &MetaModel,
    ) -> Result<Vec<u8>, EncodeError> {
        let record = lower_object(object, model)?;
        self.encode_record(&record)
    }

    /// Encodes a generic record. Fields are written in their stored order.
    pub fn encode_record(&mut self, record: &WireRecord) -> Result<Vec<u8>, EncodeError> {
        self.writer.reset();
        if let Err(err) = self.write_model(record) {
            self.writer.reset();
            debug!(tag = record.tag, error = %err, "encode failed");
            return Err(err);
        }
        let bytes = self.writer.flush();
        debug!(
            tag = record.tag,
            fields = record.fields.len(),
            bytes = bytes.len(),
            "encoded model"
        );
        Ok(bytes)
    }

    fn write_model(&mut self, record: &WireRecord) -> Result<(), EncodeError> {
        self.writer.u32(record.tag);
        let last = record.fields.len().saturating_sub(1);
        for (i, (tag, value)) in record.fields.iter().enumerate() {
            self.write_field(*tag, value, i == last)?;
        }
        Ok(())
    }

    /// `tail` is set when nothing follows this entry inside the enclosing
    /// model's range, which is where an unframed model may be written.
    fn write_field(&mut self, tag: u16, value: &WireValue, tail: bool) -> Result<(), EncodeError> {
        let header = header_of(value);
        self.writer.u16(tag);
        self.writer.u8(header.to_byte());
        let Value::List(list) = value else {
            return self.write_value(value, header, tail);
        };
        let count = u16::try_from(list.items.len())
            .map_err(|_| EncodeError::LengthOverflow("repeated field"))?;
        self.writer.u16(count);
        let last = list.items.len().saturating_sub(1);
        for (i, item) in list.items.iter().enumerate() {
            if item.wire_type() != list.item_type {
                return Err(EncodeError::TypeMismatch {
                    field: format!("#{tag}"),
                    expected: list.item_type,
                });
            }
            self.write_value(item, header, tail && i == last)?;
        }
        Ok(())
    }

    fn write_value(
        &mut self,
        value: &WireValue,
        header: FieldHeader,
        tail: bool,
    ) -> Result<(), EncodeError> {
        match value {
            Value::Scalar(scalar) => self.write_scalar(scalar),
            Value::List(_) => Err(EncodeError::NestedList),
            Value::Map(map) => self.write_map(map, header.map_key_string, tail),
            Value::Model(record) => self.write_nested_model(record, tail),
        }
    }

    fn write_scalar(&mut self, scalar: &Scalar) -> Result<(), EncodeError> {
        let w = &mut self.writer;
        match scalar {
            Scalar::Str(s) => {
                let len = u16::try_from(s.len()).map_err(|_| EncodeError::LengthOverflow("string"))?;
                w.u16(len);
                w.utf8(s);
            }
            Scalar::Bool(b) => w.bool(*b),
            Scalar::Int8(n) => w.i8(*n),
            Scalar::Uint8(n) => w.u8(*n),
            Scalar::Int16(n) => w.i16(*n),
            Scalar::Uint16(n) => w.u16(*n),
            Scalar::Int32(n) => w.i32(*n),
            Scalar::Uint32(n) | Scalar::Enum(n) => w.u32(*n),
            Scalar::Int64(n) => w.i64(*n),
            Scalar::Uint64(n) => w.u64(*n),
            Scalar::Float32(f) => w.f32(*f),
            Scalar::Float64(f) => w.f64(*f),
            Scalar::Bytes(b) => {
                let len = u16::try_from(b.len()).map_err(|_| EncodeError::LengthOverflow("bytes"))?;
                w.u16(len);
                w.buf(b);
            }
        }
        Ok(())
    }

    fn write_nested_model(&mut self, record: &WireRecord, tail: bool) -> Result<(), EncodeError> {
        match self.options.model_framing {
            ModelFraming::LengthPrefixed => {
                let at = self.writer.len();
                self.writer.u32(0);
                self.write_model(record)?;
                let size = u32::try_from(self.writer.len() - at - 4)
                    .map_err(|_| EncodeError::LengthOverflow("model"))?;
                self.writer.u32_at(at, size);
                Ok(())
            }
            ModelFraming::Trailing if tail => self.write_model(record),
            ModelFraming::Trailing => Err(EncodeError::UnframedModel),
        }
    }

    fn write_map(
        &mut self,
        map: &Map<WireRecord>,
        string_keys: bool,
        tail: bool,
    ) -> Result<(), EncodeError> {
        if map.string_keys != string_keys {
            return Err(EncodeError::MapKeyKind);
        }
        let count =
            u16::try_from(map.entries.len()).map_err(|_| EncodeError::LengthOverflow("map"))?;
        self.writer.u16(count);
        let last = map.entries.len().saturating_sub(1);
        for (i, (key, value)) in map.entries.iter().enumerate() {
            match (key, string_keys) {
                (MapKey::Str(k), true) => {
                    let len = u16::try_from(k.len())
                        .map_err(|_| EncodeError::LengthOverflow("map key"))?;
                    self.writer.u16(len);
                    self.writer.utf8(k);
                }
                (MapKey::Int(k), false) => self.writer.i32(*k),
                _ => return Err(EncodeError::MapKeyKind),
            }
            self.write_field(MAP_VALUE_TAG, value, tail && i == last)?;
        }
        Ok(())
    }
}

/// Header for a value of a generic record.
fn header_of(value: &WireValue) -> FieldHeader {
    match value {
        Value::List(list) => FieldHeader {
            ty: list.item_type,
            repeated: true,
            map_key_string: list.string_keys,
        },
        Value::Map(map) => FieldHeader {
            ty: WireType::Map,
            repeated: false,
            map_key_string: map.string_keys,
        },
        other => FieldHeader::new(other.wire_type()),
    }
}

fn lower_object(object: &NamedObject, model: &MetaModel) -> Result<WireRecord, EncodeError> {
    let mut record = WireRecord::new(model.tag);
    for field in &model.fields {
        if let Some(value) = object.get(&field.name) {
            record.fields.insert(field.tag, lower_field(value, field)?);
        }
    }
    Ok(record)
}

fn mismatch(field: &MetaField) -> EncodeError {
    EncodeError::TypeMismatch {
        field: field.name.clone(),
        expected: field.ty,
    }
}

fn lower_field(value: &NamedValue, field: &MetaField) -> Result<WireValue, EncodeError> {
    if !field.repeated {
        return lower_single(value, field);
    }
    match value {
        Value::List(list) if list.item_type == field.ty => {
            let items = list
                .items
                .iter()
                .map(|item| lower_single(item, field))
                .collect::<Result<Vec<_>, _>>()?;
            let header = field.header();
            Ok(Value::List(List {
                item_type: header.ty,
                string_keys: header.map_key_string,
                items,
            }))
        }
        _ => Err(mismatch(field)),
    }
}

fn lower_single(value: &NamedValue, field: &MetaField) -> Result<WireValue, EncodeError> {
    match (value, field.ty) {
        (Value::Scalar(scalar), ty) if scalar.wire_type() == ty => Ok(Value::Scalar(scalar.clone())),
        (Value::Model(object), WireType::Model) => {
            let model = field
                .model
                .as_deref()
                .ok_or_else(|| EncodeError::MissingModel(field.name.clone()))?;
            Ok(Value::Model(lower_object(object, model)?))
        }
        (Value::Map(map), WireType::Map) if map.string_keys == field.string_keys() => {
            let mut entries = IndexMap::with_capacity(map.entries.len());
            for (key, value) in &map.entries {
                let value = match field.map_value_field.as_deref() {
                    Some(value_field) => lower_field(value, value_field)?,
                    None => lower_unchecked(value, &field.name)?,
                };
                entries.insert(key.clone(), value);
            }
            Ok(Value::Map(Map {
                string_keys: map.string_keys,
                entries,
            }))
        }
        _ => Err(mismatch(field)),
    }
}

/// Lowers map values that have no schema. Only models need one.
fn lower_unchecked(value: &NamedValue, name: &str) -> Result<WireValue, EncodeError> {
    match value {
        Value::Scalar(scalar) => Ok(Value::Scalar(scalar.clone())),
        Value::List(list) => Ok(Value::List(List {
            item_type: list.item_type,
            string_keys: list.string_keys,
            items: list
                .items
                .iter()
                .map(|item| lower_unchecked(item, name))
                .collect::<Result<Vec<_>, _>>()?,
        })),
        Value::Map(map) => {
            let mut entries = IndexMap::with_capacity(map.entries.len());
            for (key, value) in &map.entries {
                entries.insert(key.clone(), lower_unchecked(value, name)?);
            }
            Ok(Value::Map(Map {
                string_keys: map.string_keys,
                entries,
            }))
        }
        Value::Model(_) => Err(EncodeError::MissingModel(name.to_owned())),
    }
}
