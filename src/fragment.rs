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

//! # Zic Fragment Module
//!
//! A [`ZiFragment`] is the run-time artifact of one compiled rule: a callable
//! that receives the current value and the per-call [`ZiScope`], performs its
//! check or transform, and returns the (possibly transformed) value. Fragments
//! close over their nested fragments, so a compiled validator is a fixed call
//! graph with no lookup by rule tag.
//!
//! ## Execution Capability
//!
//! Every validator runs in exactly one [`ZiExecutionMode`]. The two modes are
//! modelled by the [`ZiExecution`] trait:
//!
//! - [`ZiImmediate`]: stages are plain function calls; their futures are
//!   already complete when created.
//! - [`ZiSuspending`]: stages return boxed futures that are awaited one at a
//!   time.
//!
//! Composite rules implement [`ZiRunner`] once, generically over `E:
//! ZiExecution`, and [`ZiExecution::seal`] turns the runner into the fragment
//! variant of the active mode. Sequencing logic is therefore written once and
//! behaves identically in both modes.
//!
//! ## Run-time Path
//!
//! The scope keeps the current path as a stack of [`ZiSegment`]s. It is only
//! rendered into a dotted string when a record is appended.

use std::fmt::{self, Write as _};
use std::future::Future;
use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};
use serde_json::Value;

use crate::context::ZiExecutionMode;
use crate::errors::{Result, ZiError};
use crate::messages::ZiMessages;
use crate::record::{ZiErrorCollector, ZiErrorRecord, ZiIssue, ZiOutcome};

/// Body of a fragment compiled for [`ZiExecutionMode::Sync`].
pub type ZiImmediateFn = dyn Fn(Value, &mut ZiScope) -> Value + Send + Sync;

/// Body of a fragment compiled for [`ZiExecutionMode::Async`].
pub type ZiSuspendingFn =
    dyn for<'s> Fn(Value, &'s mut ZiScope) -> BoxFuture<'s, Value> + Send + Sync;

/// One step of a field path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ZiSegment {
    /// Object key.
    Key(Arc<str>),
    /// Array element at run time.
    Index(usize),
    /// Array element placeholder in compile-time labels.
    Items,
}

/// Renders segments as `a.b[0].c`.
pub(crate) fn render_path(segments: &[ZiSegment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            ZiSegment::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(key);
            }
            ZiSegment::Index(index) => {
                let _ = write!(out, "[{index}]");
            }
            ZiSegment::Items => out.push_str("[]"),
        }
    }
    out
}

/// Per-call execution state: the error list and the current path.
///
/// A fresh scope is created for every validator call and passed by mutable
/// reference through every nesting level, so no two calls ever share one.
pub struct ZiScope {
    errors: ZiErrorCollector,
    path: Vec<ZiSegment>,
    messages: Arc<ZiMessages>,
}

impl Default for ZiScope {
    fn default() -> Self {
        Self::new(Arc::new(ZiMessages::default()))
    }
}

impl ZiScope {
    pub fn new(messages: Arc<ZiMessages>) -> Self {
        Self {
            errors: ZiErrorCollector::new(),
            path: Vec::new(),
            messages,
        }
    }

    /// Number of records appended so far in this call.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[ZiErrorRecord] {
        self.errors.records()
    }

    pub fn path(&self) -> &[ZiSegment] {
        &self.path
    }

    /// Current path rendered as a dotted string.
    pub fn field(&self) -> String {
        render_path(&self.path)
    }

    /// Appends a record for `issue` at the current path.
    pub fn report(&mut self, issue: ZiIssue) {
        let field = self.field();
        let message = issue.message.or_else(|| {
            self.messages.render(
                &issue.kind,
                &field,
                issue.actual.as_ref(),
                issue.expected.as_ref(),
            )
        });
        self.errors.push(ZiErrorRecord {
            kind: issue.kind,
            field,
            actual: issue.actual,
            expected: issue.expected,
            message,
        });
    }

    /// Pushes `segment` onto the current path. Container rules call this
    /// before running a child stage and [`leave`](Self::leave) after it.
    pub fn enter(&mut self, segment: ZiSegment) {
        self.path.push(segment);
    }

    pub fn leave(&mut self) {
        self.path.pop();
    }

    /// Runs a synchronous body with `segment` pushed onto the path.
    pub fn within<T>(&mut self, segment: ZiSegment, body: impl FnOnce(&mut Self) -> T) -> T {
        self.enter(segment);
        let out = body(self);
        self.leave();
        out
    }

    pub(crate) fn into_outcome(self) -> ZiOutcome {
        ZiOutcome::from(self.errors)
    }
}

/// Executable unit produced by a rule compiler.
#[derive(Clone)]
pub enum ZiFragment {
    Immediate(Arc<ZiImmediateFn>),
    Suspending(Arc<ZiSuspendingFn>),
}

impl fmt::Debug for ZiFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZiFragment::Immediate(_) => f.write_str("ZiFragment::Immediate"),
            ZiFragment::Suspending(_) => f.write_str("ZiFragment::Suspending"),
        }
    }
}

fn suspend<F>(body: F) -> Arc<ZiSuspendingFn>
where
    F: for<'s> Fn(Value, &'s mut ZiScope) -> BoxFuture<'s, Value> + Send + Sync + 'static,
{
    Arc::new(body)
}

fn lift_immediate(body: Arc<ZiImmediateFn>) -> Arc<ZiSuspendingFn> {
    suspend(move |value, scope| future::ready(body(value, scope)).boxed())
}

impl ZiFragment {
    pub fn immediate<F>(body: F) -> Self
    where
        F: Fn(Value, &mut ZiScope) -> Value + Send + Sync + 'static,
    {
        ZiFragment::Immediate(Arc::new(body))
    }

    pub fn suspending<F>(body: F) -> Self
    where
        F: for<'s> Fn(Value, &'s mut ZiScope) -> BoxFuture<'s, Value> + Send + Sync + 'static,
    {
        ZiFragment::Suspending(suspend(body))
    }

    /// Returns the input unchanged and reports nothing.
    pub fn identity(mode: ZiExecutionMode) -> Self {
        match mode {
            ZiExecutionMode::Sync => ZiFragment::immediate(|value, _| value),
            ZiExecutionMode::Async => {
                ZiFragment::suspending(|value, _| future::ready(value).boxed())
            }
        }
    }

    pub fn mode(&self) -> ZiExecutionMode {
        match self {
            ZiFragment::Immediate(_) => ZiExecutionMode::Sync,
            ZiFragment::Suspending(_) => ZiExecutionMode::Async,
        }
    }

    /// Converts the fragment to `mode`. Immediate fragments lift into the
    /// asynchronous mode; suspending fragments cannot run synchronously.
    pub fn lift(self, mode: ZiExecutionMode) -> Result<Self> {
        match (self, mode) {
            (ZiFragment::Immediate(body), ZiExecutionMode::Async) => {
                Ok(ZiFragment::Suspending(lift_immediate(body)))
            }
            (ZiFragment::Suspending(_), ZiExecutionMode::Sync) => Err(ZiError::ExecutionMode {
                expected: ZiExecutionMode::Sync,
                actual: ZiExecutionMode::Async,
            }),
            (fragment, _) => Ok(fragment),
        }
    }
}

/// What runs after a rule succeeds.
#[derive(Clone, Debug, Default)]
pub enum ZiContinuation {
    /// Hand the value back to the caller.
    #[default]
    Return,
    /// Run this fragment on the rule's output.
    Then(ZiFragment),
}

/// Invocation capability of one execution mode.
pub trait ZiExecution: Send + Sync + Sized + 'static {
    const MODE: ZiExecutionMode;

    /// Fragment body as stored by composite runners of this mode.
    type Stage: Clone + Send + Sync + 'static;

    /// Future produced by invoking one stage.
    type Call<'s>: Future<Output = Value> + Send + 's
    where
        Self: 's;

    /// Extracts the stage body of `fragment`, lifting it if needed.
    fn stage(fragment: &ZiFragment) -> Result<Self::Stage>;

    fn call<'s>(stage: &'s Self::Stage, value: Value, scope: &'s mut ZiScope) -> Self::Call<'s>;

    /// Wraps a composite runner into a fragment of this mode.
    fn seal<R: ZiRunner<Self>>(runner: R) -> ZiFragment;
}

/// Composite control flow written once for both execution modes.
///
/// Runners sealed by [`ZiImmediate`] must only await stages obtained through
/// [`ZiExecution::call`]. A runner that awaits anything else cannot finish
/// synchronously; the call then records a `suspended` issue and yields `null`.
pub trait ZiRunner<E: ZiExecution>: Send + Sync + 'static {
    fn run<'s>(
        &'s self,
        value: Value,
        scope: &'s mut ZiScope,
    ) -> impl Future<Output = Value> + Send + 's;
}

/// Synchronous mode: stages are direct calls.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZiImmediate;

/// Asynchronous mode: stages are awaited one after another.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZiSuspending;

impl ZiExecution for ZiImmediate {
    const MODE: ZiExecutionMode = ZiExecutionMode::Sync;

    type Stage = Arc<ZiImmediateFn>;
    type Call<'s> = future::Ready<Value>;

    fn stage(fragment: &ZiFragment) -> Result<Self::Stage> {
        match fragment {
            ZiFragment::Immediate(body) => Ok(Arc::clone(body)),
            ZiFragment::Suspending(_) => Err(ZiError::ExecutionMode {
                expected: ZiExecutionMode::Sync,
                actual: ZiExecutionMode::Async,
            }),
        }
    }

    fn call<'s>(stage: &'s Self::Stage, value: Value, scope: &'s mut ZiScope) -> Self::Call<'s> {
        future::ready(stage(value, scope))
    }

    fn seal<R: ZiRunner<Self>>(runner: R) -> ZiFragment {
        ZiFragment::immediate(move |value, scope| {
            let finished = runner.run(value, scope).now_or_never();
            match finished {
                Some(value) => value,
                None => {
                    log::error!("synchronous runner suspended at '{}'", scope.field());
                    scope.report(ZiIssue::new("suspended"));
                    Value::Null
                }
            }
        })
    }
}

impl ZiExecution for ZiSuspending {
    const MODE: ZiExecutionMode = ZiExecutionMode::Async;

    type Stage = Arc<ZiSuspendingFn>;
    type Call<'s> = BoxFuture<'s, Value>;

    fn stage(fragment: &ZiFragment) -> Result<Self::Stage> {
        match fragment {
            ZiFragment::Suspending(body) => Ok(Arc::clone(body)),
            ZiFragment::Immediate(body) => Ok(lift_immediate(Arc::clone(body))),
        }
    }

    fn call<'s>(stage: &'s Self::Stage, value: Value, scope: &'s mut ZiScope) -> Self::Call<'s> {
        stage(value, scope)
    }

    fn seal<R: ZiRunner<Self>>(runner: R) -> ZiFragment {
        let runner = Arc::new(runner);
        ZiFragment::suspending(move |value, scope| {
            let runner = Arc::clone(&runner);
            async move { runner.run(value, scope).await }.boxed()
        })
    }
}

/// Expands `$body` once per execution mode with `$exec` bound to the mode's
/// [`ZiExecution`] type.
macro_rules! with_execution {
    ($mode:expr, $exec:ident => $body:expr) => {
        match $mode {
            $crate::context::ZiExecutionMode::Sync => {
                type $exec = $crate::fragment::ZiImmediate;
                $body
            }
            $crate::context::ZiExecutionMode::Async => {
                type $exec = $crate::fragment::ZiSuspending;
                $body
            }
        }
    };
}

pub(crate) use with_execution;
