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

//! # Custom Rule
//!
//! Runs the user check stored in the `check` option. Synchronous checks work
//! in both modes; asynchronous checks need an asynchronous compile.

use std::sync::Arc;

use futures::FutureExt;

use crate::context::{ZiCompileContext, ZiExecutionMode};
use crate::errors::Result;
use crate::fragment::ZiFragment;
use crate::registry::ZiRuleDescriptor;
use crate::schema::ZiCheck;

pub fn compile_custom(rule: &ZiRuleDescriptor, ctx: &mut ZiCompileContext<'_>) -> Result<ZiFragment> {
    let check = rule
        .check("check")?
        .cloned()
        .ok_or_else(|| rule.invalid("check", "a check function is required"))?;

    match check {
        ZiCheck::Sync(body) => Ok(ctx.leaf(move |value, scope| body(value, scope))),
        ZiCheck::Async(_) if ctx.mode() == ZiExecutionMode::Sync => Err(rule.invalid(
            "check",
            "asynchronous checks need a schema compiled with $$async",
        )),
        ZiCheck::Async(check) => Ok(ZiFragment::suspending(move |value, scope| {
            let check = Arc::clone(&check);
            async move { check.check(value, scope).await }.boxed()
        })),
    }
}
