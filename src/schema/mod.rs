//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zic.
//! The Zic project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Schema Module
//!
//! The user-authored, declarative description of what a valid value looks
//! like. A schema is either a shorthand string (`"number|integer|min:1"`) or a
//! node: a rule tag plus options. Option values may themselves hold nested
//! schemas, which is how composite rules (pipe, object, array) nest to any
//! depth.
//!
//! Schemas are built in two ways:
//!
//! - **As data**, loaded from JSON or YAML by [`ZiSchemaParser`]. Option values
//!   stay raw JSON until the rule that owns them interprets them.
//! - **In code**, through the builders on [`ZiSchema`] and [`ZiSchemaNode`].
//!   This is the only way to attach custom check functions.
//!
//! ```rust
//! use serde_json::json;
//! use zic::schema::ZiSchema;
//!
//! let amount = ZiSchema::pipe([
//!     ZiSchema::node("string").option("trim", true),
//!     ZiSchema::node("number").option("convert", true).option("min", 1),
//! ]);
//! let schema: ZiSchema = ZiSchema::object([("amount", amount)]).into();
//! ```

pub mod parser;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;

use crate::fragment::ZiScope;

pub use parser::{schema_from_value, ZiSchemaParser};

/// Synchronous check/transform attached to a `custom` rule.
pub type ZiCheckFn = dyn Fn(Value, &mut ZiScope) -> Value + Send + Sync;

/// Asynchronous check/transform attached to a `custom` rule.
///
/// Only usable in schemas compiled in asynchronous mode.
#[async_trait]
pub trait ZiAsyncCheck: Send + Sync {
    async fn check(&self, value: Value, scope: &mut ZiScope) -> Value;
}

/// Adapter turning a future-returning closure into a [`ZiAsyncCheck`].
pub struct ZiAsyncFn<F> {
    body: F,
}

#[async_trait]
impl<F> ZiAsyncCheck for ZiAsyncFn<F>
where
    F: for<'s> Fn(Value, &'s mut ZiScope) -> BoxFuture<'s, Value> + Send + Sync,
{
    async fn check(&self, value: Value, scope: &mut ZiScope) -> Value {
        (self.body)(value, scope).await
    }
}

/// Check function carried by a schema option.
#[derive(Clone)]
pub enum ZiCheck {
    Sync(Arc<ZiCheckFn>),
    Async(Arc<dyn ZiAsyncCheck>),
}

impl fmt::Debug for ZiCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZiCheck::Sync(_) => f.write_str("ZiCheck::Sync"),
            ZiCheck::Async(_) => f.write_str("ZiCheck::Async"),
        }
    }
}

/// Value of one schema option.
#[derive(Clone, Debug)]
pub enum ZiOption {
    /// Raw data, as loaded from a document or given as a literal.
    Value(Value),
    /// A nested schema, e.g. array `items`.
    Schema(Box<ZiSchema>),
    /// An ordered sequence of schemas, e.g. pipe `steps`.
    Sequence(Vec<ZiSchema>),
    /// Named schemas in declaration order, e.g. object `props`.
    Fields(Vec<(String, ZiSchema)>),
    Check(ZiCheck),
}

impl From<Value> for ZiOption {
    fn from(value: Value) -> Self {
        ZiOption::Value(value)
    }
}

impl From<bool> for ZiOption {
    fn from(value: bool) -> Self {
        ZiOption::Value(Value::Bool(value))
    }
}

impl From<i64> for ZiOption {
    fn from(value: i64) -> Self {
        ZiOption::Value(Value::from(value))
    }
}

impl From<i32> for ZiOption {
    fn from(value: i32) -> Self {
        ZiOption::Value(Value::from(value))
    }
}

impl From<u64> for ZiOption {
    fn from(value: u64) -> Self {
        ZiOption::Value(Value::from(value))
    }
}

impl From<f64> for ZiOption {
    fn from(value: f64) -> Self {
        ZiOption::Value(Value::from(value))
    }
}

impl From<&str> for ZiOption {
    fn from(value: &str) -> Self {
        ZiOption::Value(Value::String(value.to_string()))
    }
}

impl From<String> for ZiOption {
    fn from(value: String) -> Self {
        ZiOption::Value(Value::String(value))
    }
}

impl From<ZiSchema> for ZiOption {
    fn from(schema: ZiSchema) -> Self {
        ZiOption::Schema(Box::new(schema))
    }
}

impl From<ZiSchemaNode> for ZiOption {
    fn from(node: ZiSchemaNode) -> Self {
        ZiOption::Schema(Box::new(ZiSchema::Node(node)))
    }
}

impl From<Vec<ZiSchema>> for ZiOption {
    fn from(steps: Vec<ZiSchema>) -> Self {
        ZiOption::Sequence(steps)
    }
}

impl From<ZiCheck> for ZiOption {
    fn from(check: ZiCheck) -> Self {
        ZiOption::Check(check)
    }
}

/// A rule tag with its options.
#[derive(Clone, Debug, Default)]
pub struct ZiSchemaNode {
    rule: String,
    options: BTreeMap<String, ZiOption>,
}

impl ZiSchemaNode {
    pub fn new(rule: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            options: BTreeMap::new(),
        }
    }

    pub fn rule(&self) -> &str {
        &self.rule
    }

    /// Builder form of [`set_option`](Self::set_option).
    pub fn option(mut self, key: impl Into<String>, value: impl Into<ZiOption>) -> Self {
        self.set_option(key, value);
        self
    }

    pub fn set_option(&mut self, key: impl Into<String>, value: impl Into<ZiOption>) {
        self.options.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ZiOption> {
        self.options.get(key)
    }

    pub fn options(&self) -> impl Iterator<Item = (&str, &ZiOption)> {
        self.options.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Missing or `null` values pass without running the rule.
    pub fn optional(self) -> Self {
        self.option("optional", true)
    }

    /// Missing or `null` values are replaced by `value`.
    pub fn default_value(self, value: Value) -> Self {
        self.option("default", value)
    }

    /// Declares that the schema must be compiled in asynchronous mode.
    /// Only meaningful on the root node.
    pub fn asynchronous(self) -> Self {
        self.option("$$async", true)
    }
}

/// A schema: shorthand text or a full node.
#[derive(Clone, Debug)]
pub enum ZiSchema {
    Shorthand(String),
    Node(ZiSchemaNode),
}

impl From<&str> for ZiSchema {
    fn from(shorthand: &str) -> Self {
        ZiSchema::Shorthand(shorthand.to_string())
    }
}

impl From<String> for ZiSchema {
    fn from(shorthand: String) -> Self {
        ZiSchema::Shorthand(shorthand)
    }
}

impl From<ZiSchemaNode> for ZiSchema {
    fn from(node: ZiSchemaNode) -> Self {
        ZiSchema::Node(node)
    }
}

impl ZiSchema {
    /// Starts a node for `rule`.
    pub fn node(rule: impl Into<String>) -> ZiSchemaNode {
        ZiSchemaNode::new(rule)
    }

    /// `pipe` node threading a value through `steps` in order.
    pub fn pipe<I, S>(steps: I) -> ZiSchemaNode
    where
        I: IntoIterator<Item = S>,
        S: Into<ZiSchema>,
    {
        let steps: Vec<ZiSchema> = steps.into_iter().map(Into::into).collect();
        ZiSchemaNode::new("pipe").option("steps", steps)
    }

    /// `object` node with `props` in declaration order.
    pub fn object<I, K, S>(props: I) -> ZiSchemaNode
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<String>,
        S: Into<ZiSchema>,
    {
        let props = props
            .into_iter()
            .map(|(key, schema)| (key.into(), schema.into()))
            .collect();
        ZiSchemaNode::new("object").option("props", ZiOption::Fields(props))
    }

    /// `array` node whose elements are validated by `items`.
    pub fn array(items: impl Into<ZiSchema>) -> ZiSchemaNode {
        ZiSchemaNode::new("array").option("items", items.into())
    }

    /// `custom` node running a synchronous check.
    pub fn custom<F>(check: F) -> ZiSchemaNode
    where
        F: Fn(Value, &mut ZiScope) -> Value + Send + Sync + 'static,
    {
        ZiSchemaNode::new("custom").option("check", ZiCheck::Sync(Arc::new(check)))
    }

    /// `custom` node running an asynchronous check.
    pub fn custom_async<C>(check: C) -> ZiSchemaNode
    where
        C: ZiAsyncCheck + 'static,
    {
        ZiSchemaNode::new("custom").option("check", ZiCheck::Async(Arc::new(check)))
    }

    /// `custom` node running a closure that returns a boxed future.
    pub fn custom_async_fn<F>(body: F) -> ZiSchemaNode
    where
        F: for<'s> Fn(Value, &'s mut ZiScope) -> BoxFuture<'s, Value> + Send + Sync + 'static,
    {
        Self::custom_async(ZiAsyncFn { body })
    }

    pub fn as_node(&self) -> Option<&ZiSchemaNode> {
        match self {
            ZiSchema::Node(node) => Some(node),
            ZiSchema::Shorthand(_) => None,
        }
    }
}
