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

//! # Zic Compiler
//!
//! The recursive entry point that turns a schema into a [`ZiValidator`].
//!
//! ## Compilation
//!
//! [`ZiCompiler::compile_rule`] is called once per schema node. It resolves
//! the node's compiler through the registry, lets it build the rule body,
//! registers the body in the context's fragment table and finally wraps it in
//! a frame that:
//!
//! 1. handles missing/`null` values (`default`, `optional`, `nullable`,
//!    otherwise a `required` record). A `pipe` without those options passes
//!    `null` on to its steps;
//! 2. runs the rule body;
//! 3. runs the continuation only if the body recorded nothing.
//!
//! The execution mode is chosen once, from the root node's `$$async` option or
//! the configured default, and every nested fragment is built for it.

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

use crate::config::ZiCompilerConfig;
use crate::context::{ZiCompileContext, ZiExecutionMode};
use crate::errors::{Result, ZiError};
use crate::fragment::{with_execution, ZiContinuation, ZiExecution, ZiFragment, ZiRunner, ZiScope};
use crate::messages::ZiMessages;
use crate::record::ZiIssue;
use crate::registry::{ZiRuleCompiler, ZiRuleDescriptor, ZiRuleRegistry};
use crate::schema::{ZiOption, ZiSchema, ZiSchemaParser};
use crate::validator::ZiValidator;

/// Compiles schemas against a rule registry.
#[derive(Clone, Debug)]
pub struct ZiCompiler {
    registry: ZiRuleRegistry,
    config: ZiCompilerConfig,
    messages: Arc<ZiMessages>,
}

impl Default for ZiCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl ZiCompiler {
    /// Compiler with the built-in rules and default configuration.
    pub fn new() -> Self {
        Self::with_config(ZiCompilerConfig::default())
    }

    pub fn with_config(config: ZiCompilerConfig) -> Self {
        Self::with_registry(ZiRuleRegistry::with_builtins(), config)
    }

    pub fn with_registry(registry: ZiRuleRegistry, config: ZiCompilerConfig) -> Self {
        let messages = Arc::new(config.build_messages());
        Self {
            registry,
            config,
            messages,
        }
    }

    pub fn config(&self) -> &ZiCompilerConfig {
        &self.config
    }

    pub fn registry(&self) -> &ZiRuleRegistry {
        &self.registry
    }

    /// Adds a rule type. Fails if `tag` is already registered.
    pub fn register_rule<C>(&mut self, tag: &str, compiler: C) -> Result<()>
    where
        C: ZiRuleCompiler + 'static,
    {
        self.registry.register(tag, compiler)
    }

    /// Replaces the compiler registered under `tag`, built-ins included.
    pub fn override_rule<C>(&mut self, tag: &str, compiler: C) -> Option<Arc<dyn ZiRuleCompiler>>
    where
        C: ZiRuleCompiler + 'static,
    {
        self.registry.override_rule(tag, compiler)
    }

    pub fn compile(&self, schema: &ZiSchema) -> Result<ZiValidator> {
        let mode = self.declared_mode(schema)?;
        let mut ctx = ZiCompileContext::new(self, mode);
        let root = self.compile_rule(schema, &mut ctx, ZiContinuation::Return)?;
        let fragments = ctx.into_fragments();
        log::debug!(
            "compiled validator: {} fragments, {} mode",
            fragments.len(),
            mode
        );
        Ok(ZiValidator::new(root, fragments, mode, Arc::clone(&self.messages)))
    }

    /// Parses a JSON or YAML schema document and compiles it.
    pub fn compile_str(&self, source: &str) -> Result<ZiValidator> {
        self.compile(&ZiSchemaParser::new().parse(source)?)
    }

    /// Compiles one schema node at the context's current label, chaining
    /// `next` after it.
    pub fn compile_rule(
        &self,
        schema: &ZiSchema,
        ctx: &mut ZiCompileContext<'_>,
        next: ZiContinuation,
    ) -> Result<ZiFragment> {
        let label = ctx.label();
        let (rule, compiler) = self.registry.resolve(schema, &label)?;
        log::trace!("compiling rule '{}' at '{}'", rule.rule(), label);

        let presence = ZiPresence::from_rule(&rule)?;
        let body = compiler.compile(&rule, ctx)?.lift(ctx.mode())?;
        ctx.register_fragment(body.clone());

        let next = match next {
            ZiContinuation::Return => None,
            ZiContinuation::Then(fragment) => Some(fragment),
        };
        with_execution!(ctx.mode(), E => frame::<E>(presence, &body, next.as_ref()))
    }

    fn declared_mode(&self, schema: &ZiSchema) -> Result<ZiExecutionMode> {
        let Some(node) = schema.as_node() else {
            return Ok(self.config.default_mode);
        };
        match node.get("$$async") {
            None => Ok(self.config.default_mode),
            Some(ZiOption::Value(Value::Bool(true))) => Ok(ZiExecutionMode::Async),
            Some(ZiOption::Value(Value::Bool(false))) => Ok(ZiExecutionMode::Sync),
            Some(_) => Err(ZiError::invalid_option(
                node.rule(),
                "$$async",
                "",
                "expected a boolean",
            )),
        }
    }
}

/// How a rule treats a missing or `null` value.
#[derive(Clone, Debug)]
enum ZiPresence {
    Required,
    Optional,
    Default(Value),
    /// `null` reaches the rule body, whose own stages decide.
    Delegated,
}

impl ZiPresence {
    fn from_rule(rule: &ZiRuleDescriptor) -> Result<Self> {
        if let Some(default) = rule.value("default") {
            return Ok(ZiPresence::Default(default.clone()));
        }
        if rule.flag("optional")? || rule.flag("nullable")? {
            return Ok(ZiPresence::Optional);
        }
        if rule.rule() == "pipe" {
            return Ok(ZiPresence::Delegated);
        }
        Ok(ZiPresence::Required)
    }
}

struct ZiFrame<E: ZiExecution> {
    presence: ZiPresence,
    body: E::Stage,
    next: Option<E::Stage>,
}

fn frame<E: ZiExecution>(
    presence: ZiPresence,
    body: &ZiFragment,
    next: Option<&ZiFragment>,
) -> Result<ZiFragment> {
    Ok(E::seal(ZiFrame::<E> {
        presence,
        body: E::stage(body)?,
        next: next.map(E::stage).transpose()?,
    }))
}

impl<E: ZiExecution> ZiRunner<E> for ZiFrame<E> {
    fn run<'s>(
        &'s self,
        value: Value,
        scope: &'s mut ZiScope,
    ) -> impl Future<Output = Value> + Send + 's {
        async move {
            let delegated = matches!(self.presence, ZiPresence::Delegated);
            let value = if value.is_null() && !delegated {
                match &self.presence {
                    ZiPresence::Required => {
                        scope.report(ZiIssue::new("required"));
                        return value;
                    }
                    ZiPresence::Default(default) => default.clone(),
                    ZiPresence::Optional | ZiPresence::Delegated => value,
                }
            } else {
                let before = scope.error_count();
                let value = E::call(&self.body, value, scope).await;
                if scope.error_count() > before {
                    return value;
                }
                value
            };
            match &self.next {
                Some(next) => E::call(next, value, scope).await,
                None => value,
            }
        }
    }
}
