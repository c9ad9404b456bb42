//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zic.
//! The Zic project belongs to the Dunimd Team.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use serde_json::{json, Value};
use zic::{ZiCompiler, ZiError, ZiIssue, ZiSchema, ZiSchemaNode, ZiScope};

fn parse_embedded() -> ZiSchemaNode {
    ZiSchema::custom(|value: Value, scope: &mut ZiScope| {
        match value.as_str().map(serde_json::from_str::<Value>) {
            Some(Ok(parsed)) => parsed,
            _ => {
                scope.report(ZiIssue::new("json").actual(value.clone()));
                value
            }
        }
    })
}

fn merge_default_role() -> ZiSchemaNode {
    ZiSchema::custom(|mut value: Value, _scope: &mut ZiScope| {
        if let Some(map) = value.as_object_mut() {
            if !map.contains_key("role") {
                map.insert("role".to_string(), json!("guest"));
            }
        }
        value
    })
}

fn normalize_decimal() -> ZiSchemaNode {
    ZiSchema::custom(|value: Value, scope: &mut ZiScope| {
        let parsed = value
            .as_str()
            .and_then(|text| text.replacen(',', ".", 1).parse::<f64>().ok());
        match parsed {
            Some(n) if n.fract() == 0.0 => json!(n as i64),
            Some(n) => json!(n),
            None => {
                scope.report(ZiIssue::new("number"));
                value
            }
        }
    })
}

fn bump(value: Value) -> Value {
    let bumped = value.as_str().and_then(|text| {
        let trimmed = text.trim();
        let n = trimmed.parse::<i64>().ok()?;
        Some(text.replacen(trimmed, &(n + 1).to_string(), 1))
    });
    bumped.map(Value::String).unwrap_or(value)
}

fn payload_schema() -> ZiSchema {
    let user = ZiSchema::pipe([
        ZiSchema::object([
            ("id", ZiSchema::from("number|integer|positive")),
            (
                "coords",
                ZiSchema::array("number").option("length", 2).into(),
            ),
        ]),
        merge_default_role(),
    ]);
    let payload = ZiSchema::pipe([
        ZiSchema::from("string|trim"),
        ZiSchema::pipe([
            parse_embedded(),
            ZiSchema::object([("user", user)]),
        ])
        .into(),
    ]);
    ZiSchema::object([("payload", payload)]).into()
}

fn amount_schema() -> ZiSchema {
    ZiSchema::object([(
        "amount",
        ZiSchema::pipe([
            ZiSchema::from("string|trim"),
            normalize_decimal().into(),
            ZiSchema::from("number|integer|min:1"),
        ]),
    )])
    .into()
}

#[test]
fn test_pipe_nested_payload_is_transformed() {
    let validator = ZiCompiler::new().compile(&payload_schema()).unwrap();
    let mut value = json!({"payload": "{\"user\":{\"id\":3,\"coords\":[48.1,11.5]}}"});

    let outcome = validator.validate(&mut value).unwrap();

    assert!(outcome.is_valid());
    assert_eq!(
        value,
        json!({"payload": {"user": {"id": 3, "coords": [48.1, 11.5], "role": "guest"}}})
    );
}

#[test]
fn test_pipe_nested_failure_reports_full_path() {
    let validator = ZiCompiler::new().compile(&payload_schema()).unwrap();
    let mut value = json!({"payload": "{\"user\":{\"id\":\"nope\",\"coords\":[48.1,11.5]}}"});

    let outcome = validator.validate(&mut value).unwrap();

    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        json!([{
            "type": "number",
            "field": "payload.user.id",
            "actual": "nope",
            "message": "The 'payload.user.id' field must be a number."
        }])
    );
    assert!(value["payload"]["user"].get("role").is_none());
}

#[test]
fn test_pipe_threads_transforms_into_number() {
    let validator = ZiCompiler::new().compile(&amount_schema()).unwrap();

    let mut value = json!({"amount": " 42 "});
    assert!(validator.validate(&mut value).unwrap().is_valid());
    assert_eq!(value, json!({"amount": 42}));

    let mut value = json!({"amount": "abc"});
    let outcome = validator.validate(&mut value).unwrap();
    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        json!([{
            "type": "number",
            "field": "amount",
            "message": "The 'amount' field must be a number."
        }])
    );
}

#[test]
fn test_pipe_decimal_comma_fails_later_bound() {
    let validator = ZiCompiler::new().compile(&amount_schema()).unwrap();
    let mut value = json!({"amount": "0,5"});

    let outcome = validator.validate(&mut value).unwrap();

    let kinds: Vec<&str> = outcome.errors().iter().map(|r| r.kind.as_str()).collect();
    assert_eq!(kinds, vec!["numberMin", "numberInteger"]);
    assert_eq!(value, json!({"amount": 0.5}));
}

#[test]
fn test_pipe_nesting_keeps_null_handling_of_steps() {
    let blank = || ZiSchema::custom(|_value: Value, _scope: &mut ZiScope| Value::Null);
    let flat: ZiSchema = ZiSchema::pipe([
        ZiSchema::from(blank()),
        ZiSchema::from("any|optional"),
        ZiSchema::from("string|optional"),
    ])
    .into();
    let nested: ZiSchema = ZiSchema::pipe([
        ZiSchema::from(blank()),
        ZiSchema::pipe(["any|optional", "string|optional"]).into(),
    ])
    .into();
    let compiler = ZiCompiler::new();

    for schema in [flat, nested] {
        let validator = compiler.compile(&schema).unwrap();
        let mut value = json!("x");
        assert!(validator.validate(&mut value).unwrap().is_valid());
        assert_eq!(value, Value::Null);
    }
}

#[test]
fn test_pipe_non_sequence_steps_is_identity() {
    let schema: ZiSchema =
        ZiSchema::object([("a", ZiSchemaNode::new("pipe").option("steps", json!({})))]).into();
    let validator = ZiCompiler::new().compile(&schema).unwrap();
    let mut value = json!({"a": " 42 "});

    assert!(validator.validate(&mut value).unwrap().is_valid());
    assert_eq!(value, json!({"a": " 42 "}));
}

#[test]
fn test_pipe_missing_steps_is_identity() {
    let validator = ZiCompiler::new()
        .compile_str(r#"{"a": {"type": "pipe"}}"#)
        .unwrap();
    let mut value = json!({"a": " 42 "});

    assert!(validator.validate(&mut value).unwrap().is_valid());
    assert_eq!(value, json!({"a": " 42 "}));
}

#[test]
fn test_pipe_malformed_steps_from_document_is_identity() {
    let validator = ZiCompiler::new()
        .compile_str(r#"{"a": {"type": "pipe", "steps": "number"}}"#)
        .unwrap();
    let mut value = json!({"a": "not a number"});

    assert!(validator.validate(&mut value).unwrap().is_valid());
    assert_eq!(value, json!({"a": "not a number"}));
}

#[test]
fn test_pipe_short_circuits_after_failing_stage() {
    let later = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&later);
    let schema: ZiSchema = ZiSchema::pipe([
        ZiSchema::from("string|uppercase|min:5"),
        ZiSchema::custom(move |_value: Value, _scope: &mut ZiScope| {
            seen.fetch_add(1, Ordering::SeqCst);
            json!("replaced")
        })
        .into(),
    ])
    .into();
    let validator = ZiCompiler::new().compile(&schema).unwrap();

    let mut value = json!("abc");
    let outcome = validator.validate(&mut value).unwrap();

    assert_eq!(outcome.errors()[0].kind, "stringMin");
    assert_eq!(value, json!("ABC"));
    assert_eq!(later.load(Ordering::SeqCst), 0);

    let mut value = json!("abcdef");
    assert!(validator.validate(&mut value).unwrap().is_valid());
    assert_eq!(value, json!("replaced"));
    assert_eq!(later.load(Ordering::SeqCst), 1);
}

#[test]
fn test_pipe_errors_are_deterministic() {
    let validator = ZiCompiler::new().compile(&payload_schema()).unwrap();
    let input = json!({"payload": "{\"user\":{\"id\":-2,\"coords\":[1]}}"});

    let first = validator.validate(&mut input.clone()).unwrap();
    let second = validator.validate(&mut input.clone()).unwrap();

    assert_eq!(first.errors().len(), 2);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_pipe_async_stage_is_awaited() {
    let stage = ZiSchema::custom_async_fn(|value, _scope| {
        async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            bump(value)
        }
        .boxed()
    });
    let schema: ZiSchema = ZiSchema::object([("a", ZiSchema::pipe([stage]))])
        .asynchronous()
        .into();
    let validator = ZiCompiler::new().compile(&schema).unwrap();
    let mut value = json!({"a": " 42 "});

    let outcome = validator.validate_async(&mut value).await.unwrap();

    assert!(outcome.is_valid());
    assert_eq!(value, json!({"a": " 43 "}));
}

#[tokio::test]
async fn test_pipe_async_short_circuit_matches_sync() {
    let schema = |asynchronous: bool| -> ZiSchema {
        let node = ZiSchema::object([("amount", amount_schema_pipe())]);
        if asynchronous {
            node.asynchronous().into()
        } else {
            node.into()
        }
    };
    let sync = ZiCompiler::new().compile(&schema(false)).unwrap();
    let asynchronous = ZiCompiler::new().compile(&schema(true)).unwrap();

    for input in [json!({"amount": " 7,0 "}), json!({"amount": "x"}), json!({})] {
        let mut left = input.clone();
        let mut right = input.clone();
        let expected = sync.validate(&mut left).unwrap();
        let actual = asynchronous.validate_async(&mut right).await.unwrap();
        assert_eq!(expected, actual);
        assert_eq!(left, right);
    }
}

fn amount_schema_pipe() -> ZiSchemaNode {
    ZiSchema::pipe([
        ZiSchema::from("string|trim"),
        normalize_decimal().into(),
        ZiSchema::from("number|integer|min:1"),
    ])
}

#[test]
fn test_async_validator_refuses_sync_call() {
    let schema: ZiSchema = ZiSchema::pipe(["string"]).asynchronous().into();
    let validator = ZiCompiler::new().compile(&schema).unwrap();

    match validator.validate(&mut json!("x")) {
        Err(ZiError::ExecutionMode { .. }) => {}
        other => panic!("unexpected result: {other:?}"),
    }
}
