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

//! # Zic Compilation Context
//!
//! State owned by one `compile` call:
//!
//! - the fragment table, where every compiled rule is registered at a stable,
//!   monotonically assigned index;
//! - the execution mode, fixed before the first rule is compiled;
//! - the compile-time label of the rule being compiled, used only to name the
//!   location of compile errors.
//!
//! Composite rule compilers recurse through [`ZiCompileContext::compile_nested`].

use std::fmt;
use std::sync::Arc;

use futures::future::{self, FutureExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::compiler::ZiCompiler;
use crate::errors::Result;
use crate::fragment::{render_path, ZiContinuation, ZiFragment, ZiScope, ZiSegment};
use crate::schema::ZiSchema;

/// Calling convention of a compiled validator, fixed for its lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZiExecutionMode {
    #[default]
    Sync,
    Async,
}

impl fmt::Display for ZiExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZiExecutionMode::Sync => f.write_str("sync"),
            ZiExecutionMode::Async => f.write_str("async"),
        }
    }
}

/// Per-compile mutable state handed to every rule compiler.
pub struct ZiCompileContext<'c> {
    compiler: &'c ZiCompiler,
    mode: ZiExecutionMode,
    fragments: Vec<ZiFragment>,
    label: Vec<ZiSegment>,
}

impl<'c> ZiCompileContext<'c> {
    pub(crate) fn new(compiler: &'c ZiCompiler, mode: ZiExecutionMode) -> Self {
        Self {
            compiler,
            mode,
            fragments: Vec::new(),
            label: Vec::new(),
        }
    }

    pub fn mode(&self) -> ZiExecutionMode {
        self.mode
    }

    /// Label of the rule currently being compiled, e.g. `payload.user.id`.
    pub fn label(&self) -> String {
        render_path(&self.label)
    }

    /// Adds `fragment` to the table and returns its index. Indices are never
    /// reused or renumbered.
    pub fn register_fragment(&mut self, fragment: ZiFragment) -> usize {
        let index = self.fragments.len();
        self.fragments.push(fragment);
        log::trace!("registered fragment #{} at '{}'", index, self.label());
        index
    }

    pub fn fragment(&self, index: usize) -> Option<&ZiFragment> {
        self.fragments.get(index)
    }

    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    /// Compiles a nested schema node, extending the label with `segment`
    /// (pipe steps pass `None`: they validate the same field).
    pub fn compile_nested(
        &mut self,
        segment: Option<ZiSegment>,
        schema: &ZiSchema,
        next: ZiContinuation,
    ) -> Result<ZiFragment> {
        let compiler = self.compiler;
        let pushed = segment.is_some();
        if let Some(segment) = segment {
            self.label.push(segment);
        }
        let compiled = compiler.compile_rule(schema, self, next);
        if pushed {
            self.label.pop();
        }
        compiled
    }

    /// Convenience for [`compile_nested`](Self::compile_nested) under an object key.
    pub fn compile_field(&mut self, key: &str, schema: &ZiSchema) -> Result<ZiFragment> {
        self.compile_nested(
            Some(ZiSegment::Key(Arc::from(key))),
            schema,
            ZiContinuation::Return,
        )
    }

    /// Wraps a synchronous check/transform body into a fragment of the
    /// active mode.
    pub fn leaf<F>(&self, body: F) -> ZiFragment
    where
        F: Fn(Value, &mut ZiScope) -> Value + Send + Sync + 'static,
    {
        match self.mode {
            ZiExecutionMode::Sync => ZiFragment::immediate(body),
            ZiExecutionMode::Async => ZiFragment::suspending(move |value, scope| {
                future::ready(body(value, scope)).boxed()
            }),
        }
    }

    /// Fragment that returns its input untouched.
    pub fn identity(&self) -> ZiFragment {
        ZiFragment::identity(self.mode)
    }

    pub(crate) fn into_fragments(self) -> Vec<ZiFragment> {
        self.fragments
    }
}
