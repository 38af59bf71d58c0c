//! Schema-level encode / decode / project matrix.

use std::sync::Arc;

use tagwire::{
    decode, decode_named, encode, project, EncodeError, Error, List, Map, MapKey, MetaField,
    MetaModel, NamedObject, NamedValue, ProjectError, Scalar, Value, WireRecord, WireType,
};

fn user_model() -> MetaModel {
    MetaModel::new("User", 1)
        .with_field(MetaField::new("id", 1, WireType::Uint32))
        .with_field(MetaField::new("name", 2, WireType::Str))
}

fn order_model() -> MetaModel {
    let user = Arc::new(user_model());
    let line = Arc::new(
        MetaModel::new("Line", 3)
            .with_field(MetaField::new("sku", 1, WireType::Str))
            .with_field(MetaField::new("qty", 2, WireType::Uint16)),
    );
    MetaModel::new("Order", 2)
        .with_field(MetaField::new("id", 1, WireType::Uint64))
        .with_field(MetaField::new("buyer", 2, WireType::Model).with_model(user.clone()))
        .with_field(
            MetaField::new("lines", 3, WireType::Model)
                .repeated()
                .with_model(line.clone()),
        )
        .with_field(
            MetaField::new("byWarehouse", 4, WireType::Map)
                .with_map_value(MetaField::new("line", 0, WireType::Model).with_model(line)),
        )
        .with_field(
            MetaField::new("notes", 5, WireType::Map)
                .with_string_keys()
                .with_map_value(MetaField::new("note", 0, WireType::Str)),
        )
        .with_field(MetaField::new("status", 6, WireType::Enum))
        .with_field(MetaField::new("tags", 7, WireType::Str).repeated())
        .with_field(MetaField::new("blob", 8, WireType::Bytes))
}

fn line(sku: &str, qty: u16) -> NamedObject {
    NamedObject::new().with("sku", sku).with("qty", qty)
}

fn sample_order() -> NamedObject {
    NamedObject::new()
        .with("id", 9_000_000_000u64)
        .with("buyer", NamedObject::new().with("id", 7u32).with("name", "ok"))
        .with(
            "lines",
            List::<NamedObject>::new(
                WireType::Model,
                vec![line("a-1", 2).into(), line("b-2", 1).into()],
            ),
        )
        .with(
            "byWarehouse",
            Map::<NamedObject>::with_int_keys()
                .entry(1, line("a-1", 2))
                .entry(-4, line("c-3", 0)),
        )
        .with(
            "notes",
            Map::<NamedObject>::with_string_keys().entry("gift", "wrap it"),
        )
        .with("status", Scalar::Enum(3))
        .with("tags", List::<NamedObject>::new(WireType::Str, vec!["x".into(), "y".into()]))
        .with("blob", vec![0u8, 1, 2])
}

#[test]
fn id_name_example() {
    let user = NamedObject::new().with("id", 7u32).with("name", "ok");
    let bytes = encode(&user, &user_model()).unwrap();
    assert_eq!(
        bytes,
        [1, 0, 0, 0, 1, 0, 7, 7, 0, 0, 0, 2, 0, 0, 2, 0, b'o', b'k']
    );
    let record = decode(&bytes).unwrap();
    assert_eq!(record, WireRecord::new(1).with(1, 7u32).with(2, "ok"));
    assert_eq!(project(&record, &user_model()).unwrap(), user);
}

#[test]
fn nested_schema_roundtrip() {
    let model = order_model();
    let order = sample_order();
    let bytes = encode(&order, &model).unwrap();
    assert_eq!(decode_named(&bytes, &model).unwrap(), order);
}

#[test]
fn repeated_models_are_projected_element_wise() {
    let model = order_model();
    let bytes = encode(&sample_order(), &model).unwrap();
    let projected = decode_named(&bytes, &model).unwrap();
    let lines = projected.get("lines").unwrap().as_list().unwrap();
    assert_eq!(lines.items.len(), 2);
    let first = lines.items[0].as_model().unwrap();
    assert_eq!(first.get("sku"), Some(&NamedValue::from("a-1")));
}

#[test]
fn map_model_values_are_projected() {
    let model = order_model();
    let bytes = encode(&sample_order(), &model).unwrap();
    let projected = decode_named(&bytes, &model).unwrap();
    let by_warehouse = projected.get("byWarehouse").unwrap().as_map().unwrap();
    let c3 = by_warehouse.get(&MapKey::Int(-4)).unwrap().as_model().unwrap();
    assert_eq!(c3, &line("c-3", 0));
}

#[test]
fn absent_fields_are_omitted() {
    let model = order_model();
    let sparse = NamedObject::new().with("status", Scalar::Enum(1));
    let bytes = encode(&sparse, &model).unwrap();
    // discriminator + one ENUM field entry
    assert_eq!(bytes, [2, 0, 0, 0, 6, 0, 8, 1, 0, 0, 0]);
    let projected = decode_named(&bytes, &model).unwrap();
    assert_eq!(projected, sparse);
    assert!(projected.get("buyer").is_none());
}

#[test]
fn names_outside_the_schema_are_not_encoded() {
    let user = NamedObject::new().with("id", 1u32).with("extra", true);
    let bytes = encode(&user, &user_model()).unwrap();
    assert_eq!(decode(&bytes).unwrap(), WireRecord::new(1).with(1, 1u32));
}

#[test]
fn unknown_tags_are_dropped_by_projection() {
    let record = WireRecord::new(1)
        .with(1, 7u32)
        .with(40, WireRecord::new(99).with(1, "unseen"))
        .with(2, "ok");
    let projected = project(&record, &user_model()).unwrap();
    assert_eq!(projected, NamedObject::new().with("id", 7u32).with("name", "ok"));
}

#[test]
fn type_mismatch_is_reported_with_field_name() {
    let bad = NamedObject::new().with("id", "seven");
    assert_eq!(
        encode(&bad, &user_model()),
        Err(EncodeError::TypeMismatch {
            field: "id".into(),
            expected: WireType::Uint32
        })
    );

    let not_a_list = NamedObject::new().with("tags", "x");
    assert!(matches!(
        encode(&not_a_list, &order_model()),
        Err(EncodeError::TypeMismatch { field, .. }) if field == "tags"
    ));

    let wrong_keys = NamedObject::new().with(
        "notes",
        Map::<NamedObject>::with_int_keys().entry(1, "x"),
    );
    assert!(matches!(
        encode(&wrong_keys, &order_model()),
        Err(EncodeError::TypeMismatch { field, .. }) if field == "notes"
    ));
}

#[test]
fn model_field_without_descriptor() {
    let model = MetaModel::new("Holder", 1).with_field(MetaField::new("inner", 1, WireType::Model));
    let object = NamedObject::new().with("inner", NamedObject::new());
    assert_eq!(
        encode(&object, &model),
        Err(EncodeError::MissingModel("inner".into()))
    );

    let bytes = tagwire::encode_record(&WireRecord::new(1).with(1, WireRecord::new(5))).unwrap();
    assert_eq!(
        decode_named(&bytes, &model),
        Err(Error::Project(ProjectError::MissingModel("inner".into())))
    );
}

#[test]
fn decode_named_surfaces_decode_errors() {
    assert!(matches!(
        decode_named(&[1, 0], &user_model()),
        Err(Error::Decode(tagwire::DecodeError::OutOfRange))
    ));
}

#[test]
fn untyped_map_values_pass_through() {
    let model = MetaModel::new("Bag", 4).with_field(MetaField::new("any", 1, WireType::Map));
    let bag = NamedObject::new().with(
        "any",
        Map::<NamedObject>::with_int_keys()
            .entry(1, 5i64)
            .entry(2, List::<NamedObject>::new(WireType::Bool, vec![true.into()])),
    );
    let bytes = encode(&bag, &model).unwrap();
    assert_eq!(decode_named(&bytes, &model).unwrap(), bag);
}

#[test]
fn schema_loaded_from_json() {
    let model = MetaModel::from_json(
        r#"{
            "name": "Order", "tag": 2,
            "fields": [
                { "type": "UINT64", "name": "id", "tag": 1 },
                { "type": "MODEL", "name": "buyer", "tag": 2,
                  "model": { "name": "User", "tag": 1, "fields": [
                      { "type": "UINT32", "name": "id", "tag": 1 },
                      { "type": "STR", "name": "name", "tag": 2 }
                  ] } },
                { "type": "MAP", "name": "notes", "tag": 5, "mapKeyWithString": true,
                  "mapValueField": { "type": "STR", "name": "note", "tag": 0 } }
            ]
        }"#,
    )
    .unwrap();
    let order = NamedObject::new()
        .with("id", 1u64)
        .with("buyer", NamedObject::new().with("name", "zoë"))
        .with(
            "notes",
            Map::<NamedObject>::with_string_keys().entry("a", "b"),
        );
    let bytes = encode(&order, &model).unwrap();
    let projected = decode_named(&bytes, &model).unwrap();
    assert_eq!(projected, order);
    assert_eq!(
        projected.to_json(),
        serde_json::json!({ "id": 1, "buyer": { "name": "zoë" }, "notes": { "a": "b" } })
    );
}

#[test]
fn descriptors_shared_across_threads() {
    let model = Arc::new(order_model());
    let handles: Vec<_> = (0..4u16)
        .map(|i| {
            let model = Arc::clone(&model);
            std::thread::spawn(move || {
                let order = sample_order().with("tags", List::<NamedObject>::new(WireType::Str, vec![Value::from(i.to_string())]));
                let bytes = encode(&order, &model).unwrap();
                decode_named(&bytes, &model).unwrap() == order
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

#[test]
fn models_inside_nested_maps_roundtrip() {
    let leaf = MetaModel::new("Leaf", 9).with_field(MetaField::new("ok", 1, WireType::Bool));
    let model = MetaModel::new("Outer", 1).with_field(
        MetaField::new("m", 1, WireType::Map).with_map_value(
            MetaField::new("inner", 0, WireType::Map)
                .with_map_value(MetaField::new("leaf", 0, WireType::Model).with_model(leaf)),
        ),
    );
    let inner = Map::<NamedObject>::with_int_keys().entry(2, NamedObject::new().with("ok", true));
    let outer = NamedObject::new().with("m", Map::<NamedObject>::with_int_keys().entry(1, inner));

    let bytes = encode(&outer, &model).unwrap();
    let expected = WireRecord::new(1).with(
        1,
        Map::<WireRecord>::with_int_keys().entry(
            1,
            Map::<WireRecord>::with_int_keys().entry(2, WireRecord::new(9).with(1, true)),
        ),
    );
    assert_eq!(decode(&bytes).unwrap(), expected);
    assert_eq!(decode_named(&bytes, &model).unwrap(), outer);
}

#[test]
fn empty_repeated_string_key_maps_roundtrip() {
    let model = MetaModel::new("Holder", 1).with_field(
        MetaField::new("maps", 1, WireType::Map)
            .repeated()
            .with_string_keys(),
    );
    let empty = NamedObject::new().with(
        "maps",
        List::<NamedObject>::new(WireType::Map, vec![]).with_string_keys(),
    );
    let bytes = encode(&empty, &model).unwrap();
    assert_eq!(bytes, [1, 0, 0, 0, 1, 0, 0xcf, 0, 0]);
    assert_eq!(decode_named(&bytes, &model).unwrap(), empty);
}
