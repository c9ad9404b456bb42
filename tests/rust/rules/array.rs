//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zic.
//! The Zic project belongs to the Dunimd Team.

use serde_json::json;
use zic::{ZiCompiler, ZiSchema};

#[test]
fn test_array_items_report_indexed_paths() {
    let schema: ZiSchema = ZiSchema::object([(
        "coords",
        ZiSchema::array("number").option("length", 2),
    )])
    .into();
    let validator = ZiCompiler::new().compile(&schema).unwrap();
    let mut value = json!({"coords": [48.1, "east"]});

    let outcome = validator.validate(&mut value).unwrap();

    assert_eq!(outcome.errors().len(), 1);
    assert_eq!(outcome.errors()[0].field, "coords[1]");
    assert_eq!(
        outcome.errors()[0].message.as_deref(),
        Some("The 'coords[1]' field must be a number.")
    );
}

#[test]
fn test_array_of_objects_transforms_each_element() {
    let schema: ZiSchema = ZiSchema::array(ZiSchema::object([(
        "tag",
        ZiSchema::from("string|trim|lowercase"),
    )]))
    .into();
    let validator = ZiCompiler::new().compile(&schema).unwrap();
    let mut value = json!([{"tag": " A "}, {"tag": "b"}]);

    assert!(validator.validate(&mut value).unwrap().is_valid());
    assert_eq!(value, json!([{"tag": "a"}, {"tag": "b"}]));
}

#[test]
fn test_array_bounds() {
    let schema: ZiSchema = ZiSchema::array("any")
        .option("empty", false)
        .option("max", 2)
        .into();
    let validator = ZiCompiler::new().compile(&schema).unwrap();

    let outcome = validator.validate(&mut json!([])).unwrap();
    assert_eq!(outcome.errors()[0].kind, "arrayEmpty");

    let outcome = validator.validate(&mut json!([1, 2, 3])).unwrap();
    assert_eq!(outcome.errors()[0].kind, "arrayMax");
    assert_eq!(outcome.errors()[0].actual, Some(json!(3)));
}

#[test]
fn test_array_null_element_is_required() {
    let validator = ZiCompiler::new()
        .compile(&ZiSchema::array("string").into())
        .unwrap();

    let outcome = validator.validate(&mut json!(["a", null])).unwrap();

    assert_eq!(outcome.errors()[0].kind, "required");
    assert_eq!(outcome.errors()[0].field, "[1]");
}

#[test]
fn test_array_items_label_names_compile_errors() {
    let schema: ZiSchema = ZiSchema::object([("tags", ZiSchema::array("uuid"))]).into();
    let err = ZiCompiler::new().compile(&schema).unwrap_err();

    assert_eq!(err.to_string(), "unknown rule 'uuid' at 'tags[]'");
}
