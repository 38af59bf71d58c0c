//! Projection of tag-keyed records onto named fields.

use tracing::trace;

use crate::error::ProjectError;
use crate::meta::{MetaField, MetaModel};
use crate::value::{List, Map, NamedObject, NamedValue, Value, WireRecord, WireValue};

/// Maps `record` onto the fields declared by `model`.
///
/// Schema fields whose tag is missing from the record are left out of the
/// result. Record tags the schema does not declare are dropped. Nested
/// models are projected wherever they appear: directly, as elements of a
/// repeated field, or as map values at any depth (through the chain of
/// `mapValueField` descriptors).
///
/// The record's discriminator is not checked against `model.tag`.
pub fn project(record: &WireRecord, model: &MetaModel) -> Result<NamedObject, ProjectError> {
    if record.tag != model.tag {
        trace!(record = record.tag, model = model.tag, name = %model.name, "discriminator differs from schema");
    }
    let mut object = NamedObject::new();
    for field in &model.fields {
        let Some(value) = record.get(field.tag) else {
            continue;
        };
        let value = project_value(value, Some(field), &field.name)?;
        object.fields.insert(field.name.clone(), value);
    }
    Ok(object)
}

/// `field` describes `value`; `None` inside untyped maps. `name` is the
/// top-level field reported on error.
fn project_value(
    value: &WireValue,
    field: Option<&MetaField>,
    name: &str,
) -> Result<NamedValue, ProjectError> {
    Ok(match value {
        Value::Scalar(scalar) => Value::Scalar(scalar.clone()),
        Value::List(list) => Value::List(List {
            item_type: list.item_type,
            string_keys: list.string_keys,
            items: list
                .items
                .iter()
                .map(|item| project_value(item, field, name))
                .collect::<Result<Vec<_>, _>>()?,
        }),
        Value::Map(map) => {
            let value_field = field.and_then(|f| f.map_value_field.as_deref());
            let mut out = Map {
                string_keys: map.string_keys,
                entries: Default::default(),
            };
            for (key, value) in &map.entries {
                out.entries
                    .insert(key.clone(), project_value(value, value_field, name)?);
            }
            Value::Map(out)
        }
        Value::Model(record) => {
            let model = field
                .and_then(|f| f.model.as_deref())
                .ok_or_else(|| ProjectError::MissingModel(name.to_owned()))?;
            Value::Model(project(record, model)?)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WireType;

    fn user() -> MetaModel {
        MetaModel::new("User", 1)
            .with_field(MetaField::new("id", 1, WireType::Uint32))
            .with_field(MetaField::new("name", 2, WireType::Str))
    }

    #[test]
    fn copies_scalars_by_tag() {
        let record = WireRecord::new(1).with(2, "ok").with(1, 7u32);
        let object = project(&record, &user()).unwrap();
        assert_eq!(object, NamedObject::new().with("id", 7u32).with("name", "ok"));
        let keys: Vec<_> = object.fields.keys().cloned().collect();
        assert_eq!(keys, ["id", "name"]);
    }

    #[test]
    fn missing_and_unknown_tags() {
        let record = WireRecord::new(1).with(1, 7u32).with(99, true);
        let object = project(&record, &user()).unwrap();
        assert_eq!(object, NamedObject::new().with("id", 7u32));
        assert!(object.get("name").is_none());
    }

    #[test]
    fn models_inside_nested_maps() {
        let leaf = MetaModel::new("Leaf", 9).with_field(MetaField::new("ok", 1, WireType::Bool));
        let model = MetaModel::new("Outer", 1).with_field(
            MetaField::new("m", 1, WireType::Map).with_map_value(
                MetaField::new("inner", 0, WireType::Map)
                    .with_map_value(MetaField::new("leaf", 0, WireType::Model).with_model(leaf)),
            ),
        );
        let inner = Map::<WireRecord>::with_int_keys().entry(2, WireRecord::new(9).with(1, true));
        let record = WireRecord::new(1).with(1, Map::<WireRecord>::with_int_keys().entry(1, inner));
        let object = project(&record, &model).unwrap();
        let expected_inner =
            Map::<NamedObject>::with_int_keys().entry(2, NamedObject::new().with("ok", true));
        assert_eq!(
            object,
            NamedObject::new().with("m", Map::<NamedObject>::with_int_keys().entry(1, expected_inner))
        );
    }

    #[test]
    fn model_without_descriptor() {
        let model = MetaModel::new("Holder", 3).with_field(MetaField::new("inner", 1, WireType::Model));
        let record = WireRecord::new(3).with(1, WireRecord::new(1));
        assert_eq!(
            project(&record, &model),
            Err(ProjectError::MissingModel("inner".into()))
        );
    }
}
