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

//! # Rule Registry Module
//!
//! Maps rule tags (`"string"`, `"pipe"`, ...) to the compilers that turn a
//! normalized rule descriptor into a fragment.
//!
//! ## Registry Operations
//!
//! - Register rule compilers under unique tags; re-registering is an error
//!   unless done through [`ZiRuleRegistry::override_rule`]
//! - Normalize shorthand schemas into descriptors
//! - Resolve a schema to its descriptor and compiler, failing on unknown tags

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::context::ZiCompileContext;
use crate::errors::{Result, ZiError};
use crate::fragment::ZiFragment;
use crate::schema::{schema_from_value, ZiCheck, ZiOption, ZiSchema, ZiSchemaNode};

/// Compiles one normalized rule into a fragment.
///
/// Composite rules compile their children through the context; leaf rules
/// usually wrap a closure with [`ZiCompileContext::leaf`]. Functions with the
/// matching signature implement this trait directly.
pub trait ZiRuleCompiler: Send + Sync {
    fn compile(&self, rule: &ZiRuleDescriptor, ctx: &mut ZiCompileContext<'_>)
        -> Result<ZiFragment>;
}

impl<F> ZiRuleCompiler for F
where
    F: Fn(&ZiRuleDescriptor, &mut ZiCompileContext<'_>) -> Result<ZiFragment> + Send + Sync,
{
    fn compile(
        &self,
        rule: &ZiRuleDescriptor,
        ctx: &mut ZiCompileContext<'_>,
    ) -> Result<ZiFragment> {
        self(rule, ctx)
    }
}

/// Normalized rule: tag, options and the label it was compiled at.
///
/// The typed accessors turn malformed options into
/// [`ZiError::InvalidOption`] naming the rule, option and label.
#[derive(Clone, Debug)]
pub struct ZiRuleDescriptor {
    node: ZiSchemaNode,
    label: String,
}

impl ZiRuleDescriptor {
    pub fn new(node: ZiSchemaNode, label: impl Into<String>) -> Self {
        Self {
            node,
            label: label.into(),
        }
    }

    pub fn rule(&self) -> &str {
        self.node.rule()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn node(&self) -> &ZiSchemaNode {
        &self.node
    }

    pub fn option(&self, key: &str) -> Option<&ZiOption> {
        self.node.get(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.node.get(key).is_some()
    }

    /// Builds an [`ZiError::InvalidOption`] for `option` on this rule.
    pub fn invalid(&self, option: &str, message: impl Into<String>) -> ZiError {
        ZiError::invalid_option(self.rule(), option, self.label.as_str(), message)
    }

    /// Raw data of `key`; `None` when absent or not plain data.
    pub fn value(&self, key: &str) -> Option<&Value> {
        match self.node.get(key) {
            Some(ZiOption::Value(value)) => Some(value),
            _ => None,
        }
    }

    /// Boolean flag, `false` when absent.
    pub fn flag(&self, key: &str) -> Result<bool> {
        Ok(self.optional_flag(key)?.unwrap_or(false))
    }

    pub fn optional_flag(&self, key: &str) -> Result<Option<bool>> {
        match self.node.get(key) {
            None => Ok(None),
            Some(ZiOption::Value(Value::Bool(flag))) => Ok(Some(*flag)),
            Some(_) => Err(self.invalid(key, "expected a boolean")),
        }
    }

    pub fn number(&self, key: &str) -> Result<Option<f64>> {
        match self.node.get(key) {
            None => Ok(None),
            Some(ZiOption::Value(Value::Number(number))) => number
                .as_f64()
                .map(Some)
                .ok_or_else(|| self.invalid(key, "expected a finite number")),
            Some(_) => Err(self.invalid(key, "expected a number")),
        }
    }

    /// Non-negative integer, e.g. a length bound.
    pub fn count(&self, key: &str) -> Result<Option<usize>> {
        match self.node.get(key) {
            None => Ok(None),
            Some(ZiOption::Value(Value::Number(number))) => number
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| self.invalid(key, "expected a non-negative integer")),
            Some(_) => Err(self.invalid(key, "expected a non-negative integer")),
        }
    }

    pub fn string(&self, key: &str) -> Result<Option<&str>> {
        match self.node.get(key) {
            None => Ok(None),
            Some(ZiOption::Value(Value::String(text))) => Ok(Some(text)),
            Some(_) => Err(self.invalid(key, "expected a string")),
        }
    }

    /// Nested schema, given either as a built schema or as raw data.
    pub fn schema(&self, key: &str) -> Result<Option<ZiSchema>> {
        match self.node.get(key) {
            None => Ok(None),
            Some(ZiOption::Schema(schema)) => Ok(Some((**schema).clone())),
            Some(ZiOption::Value(raw)) => schema_from_value(raw)
                .map(Some)
                .map_err(|err| self.invalid(key, err.to_string())),
            Some(_) => Err(self.invalid(key, "expected a schema")),
        }
    }

    /// Named schemas in declaration order.
    pub fn fields(&self, key: &str) -> Result<Option<Vec<(String, ZiSchema)>>> {
        match self.node.get(key) {
            None => Ok(None),
            Some(ZiOption::Fields(fields)) => Ok(Some(fields.clone())),
            Some(ZiOption::Value(Value::Object(map))) => map
                .iter()
                .map(|(name, raw)| {
                    schema_from_value(raw)
                        .map(|schema| (name.clone(), schema))
                        .map_err(|err| self.invalid(key, format!("field '{name}': {err}")))
                })
                .collect::<Result<Vec<_>>>()
                .map(Some),
            Some(_) => Err(self.invalid(key, "expected a map of field schemas")),
        }
    }

    /// Ordered schemas. Anything other than a sequence yields `None`; a
    /// sequence element that is not a schema is an error.
    pub fn sequence(&self, key: &str) -> Result<Option<Vec<ZiSchema>>> {
        match self.node.get(key) {
            Some(ZiOption::Sequence(steps)) => Ok(Some(steps.clone())),
            Some(ZiOption::Value(Value::Array(raw))) => raw
                .iter()
                .enumerate()
                .map(|(index, step)| {
                    schema_from_value(step)
                        .map_err(|err| self.invalid(key, format!("element {index}: {err}")))
                })
                .collect::<Result<Vec<_>>>()
                .map(Some),
            _ => Ok(None),
        }
    }

    pub fn check(&self, key: &str) -> Result<Option<&ZiCheck>> {
        match self.node.get(key) {
            None => Ok(None),
            Some(ZiOption::Check(check)) => Ok(Some(check)),
            Some(_) => Err(self.invalid(key, "expected a check function")),
        }
    }
}

/// Expands `"tag|flag|key:value"` into a node. Values parse as JSON scalars
/// when they can and stay strings otherwise.
pub fn expand_shorthand(text: &str) -> Result<ZiSchemaNode> {
    let mut parts = text.split('|').map(str::trim);
    let tag = parts.next().unwrap_or_default();
    if tag.is_empty() {
        return Err(ZiError::schema(format!("shorthand '{text}' has no rule tag")));
    }

    let mut node = ZiSchemaNode::new(tag);
    for part in parts.filter(|part| !part.is_empty()) {
        match part.split_once(':') {
            Some((key, raw)) => node.set_option(key.trim(), shorthand_value(raw.trim())),
            None => node.set_option(part, true),
        }
    }
    Ok(node)
}

fn shorthand_value(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ (Value::Bool(_) | Value::Number(_) | Value::Null)) => value,
        _ => Value::String(raw.to_string()),
    }
}

/// Registry mapping rule tags to their compilers.
#[derive(Clone, Default)]
pub struct ZiRuleRegistry {
    inner: HashMap<String, Arc<dyn ZiRuleCompiler>>,
}

impl fmt::Debug for ZiRuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZiRuleRegistry")
            .field("rules", &self.tags())
            .finish()
    }
}

impl ZiRuleRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            inner: HashMap::new(),
        }
    }

    /// Registry holding every built-in rule.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::rules::register_builtins(&mut registry);
        registry
    }

    pub fn register<C>(&mut self, tag: &str, compiler: C) -> Result<()>
    where
        C: ZiRuleCompiler + 'static,
    {
        if self.inner.contains_key(tag) {
            return Err(ZiError::DuplicateRule {
                tag: tag.to_string(),
            });
        }
        log::debug!("registered rule '{}'", tag);
        self.insert(tag, compiler);
        Ok(())
    }

    /// Installs `compiler` under `tag`, returning the one it replaced.
    pub fn override_rule<C>(&mut self, tag: &str, compiler: C) -> Option<Arc<dyn ZiRuleCompiler>>
    where
        C: ZiRuleCompiler + 'static,
    {
        let previous = self.inner.insert(tag.to_string(), Arc::new(compiler));
        if previous.is_some() {
            log::warn!("rule '{}' overridden", tag);
        }
        previous
    }

    pub(crate) fn insert<C>(&mut self, tag: &str, compiler: C)
    where
        C: ZiRuleCompiler + 'static,
    {
        self.inner.insert(tag.to_string(), Arc::new(compiler));
    }

    pub fn get(&self, tag: &str) -> Option<Arc<dyn ZiRuleCompiler>> {
        self.inner.get(tag).cloned()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.inner.contains_key(tag)
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.inner.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Expands shorthand and pairs the descriptor with `label`.
    pub fn normalize(&self, schema: &ZiSchema, label: &str) -> Result<ZiRuleDescriptor> {
        let node = match schema {
            ZiSchema::Shorthand(text) => expand_shorthand(text)?,
            ZiSchema::Node(node) => node.clone(),
        };
        Ok(ZiRuleDescriptor::new(node, label))
    }

    /// Normalizes `schema` and looks up its compiler.
    pub fn resolve(
        &self,
        schema: &ZiSchema,
        label: &str,
    ) -> Result<(ZiRuleDescriptor, Arc<dyn ZiRuleCompiler>)> {
        let rule = self.normalize(schema, label)?;
        let compiler = self
            .get(rule.rule())
            .ok_or_else(|| ZiError::unknown_rule(rule.rule(), label))?;
        Ok((rule, compiler))
    }
}
