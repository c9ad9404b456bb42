//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zic.
//! The Zic project belongs to the Dunimd Team.

use std::future::Future;

use serde_json::{json, Value};
use zic::{
    Result, ZiCompileContext, ZiCompiler, ZiContinuation, ZiError, ZiExecution, ZiFragment,
    ZiImmediate, ZiIssue, ZiRuleDescriptor, ZiRuleRegistry, ZiRunner, ZiSchema, ZiScope,
    ZiSegment,
};

fn compile_even(rule: &ZiRuleDescriptor, ctx: &mut ZiCompileContext<'_>) -> Result<ZiFragment> {
    let halve = rule.flag("halve")?;
    Ok(ctx.leaf(move |value, scope| match value.as_i64() {
        Some(n) if n % 2 == 0 => {
            if halve {
                json!(n / 2)
            } else {
                value
            }
        }
        _ => {
            scope.report(ZiIssue::new("even").actual(value.clone()));
            value
        }
    }))
}

fn compile_shout(_rule: &ZiRuleDescriptor, ctx: &mut ZiCompileContext<'_>) -> Result<ZiFragment> {
    Ok(ctx.leaf(|value, _| match value {
        Value::String(text) => Value::String(format!("{text}!")),
        other => other,
    }))
}

struct Tuple {
    stages: Vec<<ZiImmediate as ZiExecution>::Stage>,
}

impl ZiRunner<ZiImmediate> for Tuple {
    fn run<'s>(
        &'s self,
        value: Value,
        scope: &'s mut ZiScope,
    ) -> impl Future<Output = Value> + Send + 's {
        async move {
            let mut elements = match value {
                Value::Array(elements) => elements,
                other => {
                    scope.report(ZiIssue::new("tuple").actual(other.clone()));
                    return other;
                }
            };
            for (index, stage) in self.stages.iter().enumerate() {
                let input = elements.get_mut(index).map(std::mem::take).unwrap_or_default();
                scope.enter(ZiSegment::Index(index));
                let output = ZiImmediate::call(stage, input, scope).await;
                scope.leave();
                if let Some(element) = elements.get_mut(index) {
                    *element = output;
                }
            }
            Value::Array(elements)
        }
    }
}

fn compile_tuple(rule: &ZiRuleDescriptor, ctx: &mut ZiCompileContext<'_>) -> Result<ZiFragment> {
    let mut stages = Vec::new();
    for (index, schema) in rule.sequence("items")?.unwrap_or_default().iter().enumerate() {
        let fragment = ctx.compile_nested(
            Some(ZiSegment::Index(index)),
            schema,
            ZiContinuation::Return,
        )?;
        stages.push(ZiImmediate::stage(&fragment)?);
    }
    Ok(ZiImmediate::seal(Tuple { stages }))
}

#[test]
fn test_builtins_are_registered() {
    let registry = ZiRuleRegistry::with_builtins();

    assert_eq!(
        registry.tags(),
        vec!["any", "array", "boolean", "custom", "number", "object", "pipe", "string"]
    );
    assert!(ZiRuleRegistry::new().is_empty());
}

#[test]
fn test_registered_rule_is_usable_in_shorthand() {
    let mut compiler = ZiCompiler::new();
    compiler.register_rule("even", compile_even).unwrap();
    let validator = compiler
        .compile(&ZiSchema::object([("n", "even|halve")]).into())
        .unwrap();

    let mut value = json!({"n": 8});
    assert!(validator.validate(&mut value).unwrap().is_valid());
    assert_eq!(value, json!({"n": 4}));

    let outcome = validator.validate(&mut json!({"n": 3})).unwrap();
    assert_eq!(outcome.errors()[0].kind, "even");
    assert_eq!(outcome.errors()[0].field, "n");
    assert_eq!(outcome.errors()[0].message, None);
}

#[test]
fn test_builtin_cannot_be_replaced_implicitly() {
    let mut compiler = ZiCompiler::new();

    match compiler.register_rule("string", compile_shout) {
        Err(ZiError::DuplicateRule { tag }) => assert_eq!(tag, "string"),
        other => panic!("unexpected result: {other:?}"),
    }

    assert!(compiler.override_rule("string", compile_shout).is_some());
    let validator = compiler.compile(&ZiSchema::from("string")).unwrap();
    let mut value = json!("hey");
    assert!(validator.validate(&mut value).unwrap().is_valid());
    assert_eq!(value, json!("hey!"));
}

#[test]
fn test_user_rule_is_lifted_into_async_mode() {
    let mut compiler = ZiCompiler::new();
    compiler.register_rule("even", compile_even).unwrap();
    let schema: ZiSchema = ZiSchema::pipe(["number", "even"]).asynchronous().into();
    let validator = compiler.compile(&schema).unwrap();

    let outcome = futures::executor::block_on(validator.validate_async(&mut json!(5))).unwrap();

    assert_eq!(outcome.errors()[0].kind, "even");
}

#[test]
fn test_resolve_expands_shorthand() {
    let registry = ZiRuleRegistry::with_builtins();

    let (rule, _) = registry
        .resolve(&ZiSchema::from("number|min:1|optional"), "amount")
        .unwrap();

    assert_eq!(rule.rule(), "number");
    assert_eq!(rule.label(), "amount");
    assert_eq!(rule.number("min").unwrap(), Some(1.0));
    assert!(rule.flag("optional").unwrap());
}

#[test]
fn test_user_container_reports_element_paths() {
    let mut compiler = ZiCompiler::new();
    compiler.register_rule("tuple", compile_tuple).unwrap();
    let xs = ZiSchema::node("tuple").option("items", vec![
        ZiSchema::from("string"),
        ZiSchema::from("number|convert"),
    ]);
    let validator = compiler.compile(&ZiSchema::object([("xs", xs)]).into()).unwrap();

    let mut value = json!({"xs": ["a", "12"]});
    assert!(validator.validate(&mut value).unwrap().is_valid());
    assert_eq!(value, json!({"xs": ["a", 12]}));

    let outcome = validator.validate(&mut json!({"xs": ["a", "many"]})).unwrap();
    assert_eq!(outcome.errors().len(), 1);
    assert_eq!(outcome.errors()[0].kind, "number");
    assert_eq!(outcome.errors()[0].field, "xs[1]");
}
