//! Schema descriptors: [`MetaModel`] and [`MetaField`].
//!
//! Descriptors are plain read-only data, usually generated from an IDL and
//! shipped as JSON. They are `Send + Sync` and can be shared between any
//! number of concurrent encode/decode calls.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::{FieldHeader, WireType};

/// Schema for one field of a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaField {
    #[serde(rename = "type")]
    pub ty: WireType,
    #[serde(default)]
    pub repeated: bool,
    /// Key of the field in the projected object.
    pub name: String,
    /// Wire identifier, unique within the owning model.
    pub tag: u16,
    /// Nested schema, required when `ty` is `MODEL`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<Arc<MetaModel>>,
    /// Schema of the values of a `MAP` field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_value_field: Option<Box<MetaField>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_key_with_string: Option<bool>,
}

impl MetaField {
    pub fn new(name: impl Into<String>, tag: u16, ty: WireType) -> Self {
        Self {
            ty,
            repeated: false,
            name: name.into(),
            tag,
            model: None,
            map_value_field: None,
            map_key_with_string: None,
        }
    }

    pub fn repeated(mut self) -> Self {
        self.repeated = true;
        self
    }

    pub fn with_model(mut self, model: impl Into<Arc<MetaModel>>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_map_value(mut self, field: MetaField) -> Self {
        self.map_value_field = Some(Box::new(field));
        self
    }

    pub fn with_string_keys(mut self) -> Self {
        self.map_key_with_string = Some(true);
        self
    }

    /// Whether map keys are strings. Integer keys unless stated otherwise.
    pub fn string_keys(&self) -> bool {
        self.map_key_with_string.unwrap_or(false)
    }

    /// Header byte this field is written with.
    pub fn header(&self) -> FieldHeader {
        FieldHeader {
            ty: self.ty,
            repeated: self.repeated,
            map_key_string: self.ty == WireType::Map && self.string_keys(),
        }
    }
}

/// Schema for a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaModel {
    pub name: String,
    /// Discriminator written first in the model's wire encoding.
    pub tag: u32,
    #[serde(default)]
    pub fields: Vec<MetaField>,
}

impl MetaModel {
    pub fn new(name: impl Into<String>, tag: u32) -> Self {
        Self {
            name: name.into(),
            tag,
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: MetaField) -> Self {
        self.fields.push(field);
        self
    }

    /// Linear scan over the declared fields. Decoded records are keyed by tag,
    /// so projection looks values up there instead.
    pub fn field_by_tag(&self, tag: u16) -> Option<&MetaField> {
        self.fields.iter().find(|f| f.tag == tag)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&MetaField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Loads a model descriptor from its JSON form.
    ///
    /// ```
    /// use tagwire::{MetaModel, WireType};
    ///
    /// let model = MetaModel::from_json(r#"{
    ///     "name": "User", "tag": 1,
    ///     "fields": [{ "type": "UINT32", "name": "id", "tag": 1 }]
    /// }"#).unwrap();
    /// assert_eq!(model.field_by_tag(1).unwrap().ty, WireType::Uint32);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
