//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zic.
//! The Zic project belongs to the Dunimd Team.

use serde_json::json;
use zic::{ZiCompiler, ZiError, ZiSchema};

fn check(shorthand: &str, input: serde_json::Value) -> (serde_json::Value, Vec<String>) {
    let validator = ZiCompiler::new().compile(&ZiSchema::from(shorthand)).unwrap();
    let mut value = input;
    let outcome = validator.validate(&mut value).unwrap();
    let kinds = outcome.errors().iter().map(|r| r.kind.clone()).collect();
    (value, kinds)
}

#[test]
fn test_string_sanitizers_and_checks() {
    assert_eq!(check("string|trim|uppercase", json!("  ok ")), (json!("OK"), vec![]));
    assert_eq!(check("string|trimLeft", json!("  ok ")).0, json!("ok "));
    assert_eq!(check("string|empty:false", json!("")).1, vec!["stringEmpty"]);
    assert_eq!(check("string|length:3", json!("abcd")).1, vec!["stringLength"]);
    assert_eq!(check("string", json!(5)).1, vec!["string"]);
}

#[test]
fn test_number_checks() {
    assert_eq!(check("number|positive", json!(-1)).1, vec!["numberPositive"]);
    assert_eq!(check("number|negative", json!(1)).1, vec!["numberNegative"]);
    assert_eq!(check("number|equal:5", json!(4)).1, vec!["numberEqual"]);
    assert_eq!(check("number|notEqual:5", json!(5)).1, vec!["numberNotEqual"]);
    assert_eq!(check("number|max:10", json!(11)).1, vec!["numberMax"]);
    assert_eq!(check("number|convert", json!(true)), (json!(1), vec![]));
}

#[test]
fn test_boolean_and_any() {
    assert_eq!(check("boolean|convert", json!("off")), (json!(false), vec![]));
    assert_eq!(check("boolean", json!("off")).1, vec!["boolean"]);
    assert_eq!(check("any", json!({"x": 1})), (json!({"x": 1}), vec![]));
    assert_eq!(check("any", json!(null)).1, vec!["required"]);
    assert_eq!(check("any|nullable", json!(null)), (json!(null), vec![]));
}

#[test]
fn test_malformed_leaf_options_fail_compilation() {
    let compiler = ZiCompiler::new();
    for shorthand in ["string|min:abc", "number|integer:3", "string|pattern:(", "array|max:1.5"] {
        match compiler.compile(&ZiSchema::from(shorthand)) {
            Err(ZiError::InvalidOption { .. }) => {}
            other => panic!("{shorthand}: unexpected result {other:?}"),
        }
    }
}

#[test]
fn test_custom_messages_from_config() {
    let config = zic::ZiCompilerConfig::new().with_message("number", "{field}: expected a number");
    let compiler = ZiCompiler::with_config(config);
    let schema: ZiSchema = ZiSchema::object([("n", "number")]).into();
    let validator = compiler.compile(&schema).unwrap();

    let outcome = validator.validate(&mut json!({"n": "x"})).unwrap();

    assert_eq!(
        outcome.errors()[0].message.as_deref(),
        Some("n: expected a number")
    );
}
