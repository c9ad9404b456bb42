//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zic.
//! The Zic project belongs to the Dunimd Team.

use serde_json::json;
use zic::{ZiCompiler, ZiSchema};

#[test]
fn test_object_field_errors_accumulate_in_declaration_order() {
    let schema: ZiSchema = ZiSchema::object([
        ("name", ZiSchema::from("string|min:2")),
        ("age", ZiSchema::from("number|integer")),
        ("email", ZiSchema::from("string")),
    ])
    .into();
    let validator = ZiCompiler::new().compile(&schema).unwrap();
    let mut value = json!({"age": 3.5, "name": "x"});

    let outcome = validator.validate(&mut value).unwrap();

    let summary: Vec<(&str, &str)> = outcome
        .errors()
        .iter()
        .map(|r| (r.kind.as_str(), r.field.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("stringMin", "name"),
            ("numberInteger", "age"),
            ("required", "email")
        ]
    );
    assert_eq!(
        outcome.errors()[2].message.as_deref(),
        Some("The 'email' field is required.")
    );
}

#[test]
fn test_object_default_is_written_for_absent_field() {
    let schema: ZiSchema = ZiSchema::object([(
        "role",
        ZiSchema::node("string").default_value(json!("guest")),
    )])
    .into();
    let validator = ZiCompiler::new().compile(&schema).unwrap();
    let mut value = json!({});

    assert!(validator.validate(&mut value).unwrap().is_valid());
    assert_eq!(value, json!({"role": "guest"}));
}

#[test]
fn test_object_rejects_non_map_input() {
    let validator = ZiCompiler::new()
        .compile(&ZiSchema::object([("id", "number")]).into())
        .unwrap();
    let mut value = json!([1, 2]);

    let outcome = validator.validate(&mut value).unwrap();

    assert_eq!(outcome.errors()[0].kind, "object");
    assert_eq!(outcome.errors()[0].field, "");
    assert_eq!(value, json!([1, 2]));
}

#[test]
fn test_object_nested_paths_are_dotted() {
    let validator = ZiCompiler::new()
        .compile_str(
            r#"{
                "user": {
                    "$$type": "object",
                    "profile": {"$$type": "object", "nick": "string|max:3"}
                }
            }"#,
        )
        .unwrap();
    let mut value = json!({"user": {"profile": {"nick": "toolong"}}});

    let outcome = validator.validate(&mut value).unwrap();

    assert_eq!(outcome.errors()[0].field, "user.profile.nick");
    assert_eq!(outcome.errors()[0].expected, Some(json!(3)));
}

#[test]
fn test_object_properties_alias_and_strict_alias() {
    let validator = ZiCompiler::new()
        .compile_str(
            r#"{"$$root": true, "type": "object", "properties": {"id": "number"}, "$$strict": true}"#,
        )
        .unwrap();
    let mut value = json!({"id": 1, "debug": true});

    let outcome = validator.validate(&mut value).unwrap();

    assert_eq!(outcome.errors()[0].kind, "objectStrict");
    assert_eq!(
        outcome.errors()[0].message.as_deref(),
        Some("The object '' contains forbidden keys: 'debug'.")
    );
}
