//! Generic and named value trees.
//!
//! Both representations share [`Value`]; they differ only in what a nested
//! model is:
//!
//! - [`WireValue`]: nested models are [`WireRecord`]s keyed by wire tag, as
//!   produced by the decoder.
//! - [`NamedValue`]: nested models are [`NamedObject`]s keyed by field name,
//!   as produced by projection and consumed by the schema encoder.

use indexmap::IndexMap;
use serde_json::json;

use crate::types::WireType;

/// A single fixed-width or length-prefixed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Str(String),
    Bool(bool),
    Int8(i8),
    Uint8(u8),
    Int16(i16),
    Uint16(u16),
    Int32(i32),
    Uint32(u32),
    /// Enum members travel as their `u32` value; names live in the schema.
    Enum(u32),
    Int64(i64),
    Uint64(u64),
    Float32(f32),
    Float64(f64),
    Bytes(Vec<u8>),
}

impl Scalar {
    pub fn wire_type(&self) -> WireType {
        match self {
            Scalar::Str(_) => WireType::Str,
            Scalar::Bool(_) => WireType::Bool,
            Scalar::Int8(_) => WireType::Int8,
            Scalar::Uint8(_) => WireType::Uint8,
            Scalar::Int16(_) => WireType::Int16,
            Scalar::Uint16(_) => WireType::Uint16,
            Scalar::Int32(_) => WireType::Int32,
            Scalar::Uint32(_) => WireType::Uint32,
            Scalar::Enum(_) => WireType::Enum,
            Scalar::Int64(_) => WireType::Int64,
            Scalar::Uint64(_) => WireType::Uint64,
            Scalar::Float32(_) => WireType::Float32,
            Scalar::Float64(_) => WireType::Float64,
            Scalar::Bytes(_) => WireType::Bytes,
        }
    }

    fn to_json(&self) -> serde_json::Value {
        match self {
            Scalar::Str(s) => json!(s),
            Scalar::Bool(b) => json!(b),
            Scalar::Int8(n) => json!(n),
            Scalar::Uint8(n) => json!(n),
            Scalar::Int16(n) => json!(n),
            Scalar::Uint16(n) => json!(n),
            Scalar::Int32(n) => json!(n),
            Scalar::Uint32(n) | Scalar::Enum(n) => json!(n),
            Scalar::Int64(n) => json!(n),
            Scalar::Uint64(n) => json!(n),
            Scalar::Float32(f) => json!(*f as f64),
            Scalar::Float64(f) => json!(f),
            Scalar::Bytes(b) => json!(b),
        }
    }
}

macro_rules! scalar_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from(v: $ty) -> Self {
                    Scalar::$variant(v.into())
                }
            }

            impl<M> From<$ty> for Value<M> {
                fn from(v: $ty) -> Self {
                    Value::Scalar(Scalar::$variant(v.into()))
                }
            }
        )*
    };
}

scalar_from! {
    String => Str,
    &str => Str,
    bool => Bool,
    i8 => Int8,
    u8 => Uint8,
    i16 => Int16,
    u16 => Uint16,
    i32 => Int32,
    u32 => Uint32,
    i64 => Int64,
    u64 => Uint64,
    f32 => Float32,
    f64 => Float64,
    Vec<u8> => Bytes,
}

/// Key of a `MAP` entry: `i32` unless the field uses string keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MapKey {
    Int(i32),
    Str(String),
}

impl From<i32> for MapKey {
    fn from(k: i32) -> Self {
        MapKey::Int(k)
    }
}

impl From<&str> for MapKey {
    fn from(k: &str) -> Self {
        MapKey::Str(k.to_owned())
    }
}

impl From<String> for MapKey {
    fn from(k: String) -> Self {
        MapKey::Str(k)
    }
}

impl std::fmt::Display for MapKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapKey::Int(k) => write!(f, "{k}"),
            MapKey::Str(k) => f.write_str(k),
        }
    }
}

/// A decoded or to-be-encoded value.
///
/// `M` is the representation of a nested model.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<M> {
    Scalar(Scalar),
    /// Values of a `REPEATED` field.
    List(List<M>),
    Map(Map<M>),
    Model(M),
}

impl<M> Value<M> {
    /// Type code written in the header for this value.
    pub fn wire_type(&self) -> WireType {
        match self {
            Value::Scalar(s) => s.wire_type(),
            Value::List(l) => l.item_type,
            Value::Map(_) => WireType::Map,
            Value::Model(_) => WireType::Model,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List<M>> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map<M>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_model(&self) -> Option<&M> {
        match self {
            Value::Model(m) => Some(m),
            _ => None,
        }
    }
}

/// Ordered values of one `REPEATED` field.
///
/// The item type and the key kind of map items are kept so an empty list
/// still has a complete header byte.
#[derive(Debug, Clone, PartialEq)]
pub struct List<M> {
    pub item_type: WireType,
    /// `MAP_KEY_STRING` bit of the field header. Only meaningful for maps.
    pub string_keys: bool,
    pub items: Vec<Value<M>>,
}

impl<M> List<M> {
    pub fn new(item_type: WireType, items: Vec<Value<M>>) -> Self {
        Self {
            item_type,
            string_keys: false,
            items,
        }
    }

    /// Marks the items as maps keyed by strings.
    pub fn with_string_keys(mut self) -> Self {
        self.string_keys = true;
        self
    }
}

/// Entries of a `MAP` value. Equality ignores entry order.
#[derive(Debug, Clone, PartialEq)]
pub struct Map<M> {
    pub string_keys: bool,
    pub entries: IndexMap<MapKey, Value<M>>,
}

impl<M> Map<M> {
    pub fn with_int_keys() -> Self {
        Self {
            string_keys: false,
            entries: IndexMap::new(),
        }
    }

    pub fn with_string_keys() -> Self {
        Self {
            string_keys: true,
            entries: IndexMap::new(),
        }
    }

    pub fn entry(mut self, key: impl Into<MapKey>, value: impl Into<Value<M>>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &MapKey) -> Option<&Value<M>> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Schema-agnostic decoded model: discriminator plus tag-keyed fields.
///
/// Fields keep wire order, but equality ignores it.
#[derive(Debug, Clone, PartialEq)]
pub struct WireRecord {
    /// The model discriminator (`__tag__`).
    pub tag: u32,
    pub fields: IndexMap<u16, WireValue>,
}

impl WireRecord {
    pub fn new(tag: u32) -> Self {
        Self {
            tag,
            fields: IndexMap::new(),
        }
    }

    pub fn with(mut self, tag: u16, value: impl Into<WireValue>) -> Self {
        self.fields.insert(tag, value.into());
        self
    }

    pub fn get(&self, tag: u16) -> Option<&WireValue> {
        self.fields.get(&tag)
    }
}

impl From<WireRecord> for WireValue {
    fn from(record: WireRecord) -> Self {
        Value::Model(record)
    }
}

/// Projected model: field name to value, in schema order.
///
/// Schema fields missing from the wire are absent keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedObject {
    pub fields: IndexMap<String, NamedValue>,
}

impl NamedObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<NamedValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&NamedValue> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Renders the object as JSON for inspection. Bytes become number
    /// arrays and map keys become strings.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), named_to_json(v)))
                .collect(),
        )
    }
}

impl From<NamedObject> for NamedValue {
    fn from(object: NamedObject) -> Self {
        Value::Model(object)
    }
}

fn named_to_json(value: &NamedValue) -> serde_json::Value {
    match value {
        Value::Scalar(s) => s.to_json(),
        Value::List(l) => serde_json::Value::Array(l.items.iter().map(named_to_json).collect()),
        Value::Map(m) => serde_json::Value::Object(
            m.entries
                .iter()
                .map(|(k, v)| (k.to_string(), named_to_json(v)))
                .collect(),
        ),
        Value::Model(o) => o.to_json(),
    }
}

impl<M> From<List<M>> for Value<M> {
    fn from(list: List<M>) -> Self {
        Value::List(list)
    }
}

impl<M> From<Map<M>> for Value<M> {
    fn from(map: Map<M>) -> Self {
        Value::Map(map)
    }
}

impl<M> From<Scalar> for Value<M> {
    fn from(scalar: Scalar) -> Self {
        Value::Scalar(scalar)
    }
}

/// Value inside a [`WireRecord`].
pub type WireValue = Value<WireRecord>;
/// Value inside a [`NamedObject`].
pub type NamedValue = Value<NamedObject>;
