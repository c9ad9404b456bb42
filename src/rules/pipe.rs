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

//! # Pipe Rule
//!
//! Threads one value through `steps` in declaration order. Each stage receives
//! the previous stage's output; the first stage that records an error stops
//! the pipe, and its output is the pipe's output.
//!
//! A `steps` option that is missing or not a sequence compiles to the identity
//! fragment rather than a compile error.

use std::future::Future;

use serde_json::Value;

use crate::context::ZiCompileContext;
use crate::errors::Result;
use crate::fragment::{with_execution, ZiContinuation, ZiExecution, ZiFragment, ZiRunner, ZiScope};
use crate::registry::ZiRuleDescriptor;

pub fn compile_pipe(rule: &ZiRuleDescriptor, ctx: &mut ZiCompileContext<'_>) -> Result<ZiFragment> {
    let Some(steps) = rule.sequence("steps")? else {
        if rule.has("steps") {
            log::warn!(
                "pipe at '{}' has non-sequence 'steps', compiling to identity",
                rule.label()
            );
        }
        return Ok(ctx.identity());
    };

    let mut stages = Vec::with_capacity(steps.len());
    for step in &steps {
        stages.push(ctx.compile_nested(None, step, ZiContinuation::Return)?);
    }
    with_execution!(ctx.mode(), E => pipeline::<E>(&stages))
}

struct ZiPipe<E: ZiExecution> {
    stages: Vec<E::Stage>,
}

fn pipeline<E: ZiExecution>(stages: &[ZiFragment]) -> Result<ZiFragment> {
    let stages = stages.iter().map(E::stage).collect::<Result<Vec<_>>>()?;
    Ok(E::seal(ZiPipe::<E> { stages }))
}

impl<E: ZiExecution> ZiRunner<E> for ZiPipe<E> {
    fn run<'s>(
        &'s self,
        value: Value,
        scope: &'s mut ZiScope,
    ) -> impl Future<Output = Value> + Send + 's {
        async move {
            let mut current = value;
            for stage in &self.stages {
                let before = scope.error_count();
                current = E::call(stage, current, scope).await;
                if scope.error_count() > before {
                    break;
                }
            }
            current
        }
    }
}
