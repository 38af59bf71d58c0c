//! Schema-driven tagged-field binary codec.
//!
//! Records travel as a `u32` discriminator followed by field entries, each
//! carrying a `u16` tag, a header byte (type code plus `REPEATED` and
//! `MAP_KEY_STRING` flags) and the value. Decoding yields a schema-agnostic
//! [`WireRecord`] keyed by tag; [`project`] maps it onto named fields using a
//! [`MetaModel`]. [`encode`] goes the other way.
//!
//! All multi-byte quantities are little-endian.
//!
//! # Example
//!
//! ```
//! use tagwire::{decode, encode, project, MetaField, MetaModel, NamedObject, WireRecord, WireType};
//!
//! let model = MetaModel::new("User", 1)
//!     .with_field(MetaField::new("id", 1, WireType::Uint32))
//!     .with_field(MetaField::new("name", 2, WireType::Str));
//! let user = NamedObject::new().with("id", 7u32).with("name", "ok");
//!
//! let bytes = encode(&user, &model).unwrap();
//! assert_eq!(bytes, [1, 0, 0, 0, 1, 0, 7, 7, 0, 0, 0, 2, 0, 0, 2, 0, b'o', b'k']);
//!
//! let record = decode(&bytes).unwrap();
//! assert_eq!(record, WireRecord::new(1).with(1, 7u32).with(2, "ok"));
//! assert_eq!(project(&record, &model).unwrap(), user);
//! ```

mod decoder;
mod encoder;
mod error;
mod meta;
mod options;
mod projector;
mod types;
mod value;

pub use decoder::WireDecoder;
pub use encoder::{WireEncoder, MAP_VALUE_TAG};
pub use error::{DecodeError, EncodeError, Error, ProjectError};
pub use meta::{MetaField, MetaModel};
pub use options::{CodecOptions, ModelFraming};
pub use projector::project;
pub use types::{FieldHeader, WireType, FLAG_MAP_KEY_STRING, FLAG_REPEATED, TYPE_MASK};
pub use value::{
    List, Map, MapKey, NamedObject, NamedValue, Scalar, Value, WireRecord, WireValue,
};

/// Decodes one model spanning all of `data`, with default options.
pub fn decode(data: &[u8]) -> Result<WireRecord, DecodeError> {
    WireDecoder::new().decode(data)
}

/// Decodes `data` and projects it onto `model`.
pub fn decode_named(data: &[u8], model: &MetaModel) -> Result<NamedObject, Error> {
    let record = decode(data)?;
    Ok(project(&record, model)?)
}

/// Encodes a named object under `model`, with default options.
pub fn encode(object: &NamedObject, model: &MetaModel) -> Result<Vec<u8>, EncodeError> {
    WireEncoder::new().encode(object, model)
}

/// Encodes a generic record, with default options.
pub fn encode_record(record: &WireRecord) -> Result<Vec<u8>, EncodeError> {
    WireEncoder::new().encode_record(record)
}
