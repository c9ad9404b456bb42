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

//! # Array Rule
//!
//! Length bounds (`empty`, `min`, `max`, `length`) are checked first, then every
//! element is validated by the `items` fragment. Element errors accumulate.

use std::future::Future;

use serde_json::Value;

use crate::context::ZiCompileContext;
use crate::errors::Result;
use crate::fragment::{with_execution, ZiContinuation, ZiExecution, ZiFragment, ZiRunner, ZiScope, ZiSegment};
use crate::record::ZiIssue;
use crate::registry::ZiRuleDescriptor;

#[derive(Clone, Copy, Debug, Default)]
struct ZiArrayBounds {
    empty: bool,
    min: Option<usize>,
    max: Option<usize>,
    length: Option<usize>,
}

impl ZiArrayBounds {
    fn from_rule(rule: &ZiRuleDescriptor) -> Result<Self> {
        Ok(Self {
            empty: rule.optional_flag("empty")?.unwrap_or(true),
            min: rule.count("min")?,
            max: rule.count("max")?,
            length: rule.count("length")?,
        })
    }

    fn check(&self, len: usize, scope: &mut ZiScope) {
        if !self.empty && len == 0 {
            scope.report(ZiIssue::new("arrayEmpty").actual(Value::Array(Vec::new())));
        }
        if let Some(min) = self.min.filter(|min| len < *min) {
            scope.report(ZiIssue::new("arrayMin").expected(min).actual(len.into()));
        }
        if let Some(max) = self.max.filter(|max| len > *max) {
            scope.report(ZiIssue::new("arrayMax").expected(max).actual(len.into()));
        }
        if let Some(length) = self.length.filter(|length| len != *length) {
            scope.report(ZiIssue::new("arrayLength").expected(length).actual(len.into()));
        }
    }
}

pub fn compile_array(rule: &ZiRuleDescriptor, ctx: &mut ZiCompileContext<'_>) -> Result<ZiFragment> {
    let bounds = ZiArrayBounds::from_rule(rule)?;
    let items = match rule.schema("items")? {
        Some(schema) => Some(ctx.compile_nested(
            Some(ZiSegment::Items),
            &schema,
            ZiContinuation::Return,
        )?),
        None => None,
    };
    with_execution!(ctx.mode(), E => array::<E>(bounds, items.as_ref()))
}

struct ZiArray<E: ZiExecution> {
    bounds: ZiArrayBounds,
    items: Option<E::Stage>,
}

fn array<E: ZiExecution>(bounds: ZiArrayBounds, items: Option<&ZiFragment>) -> Result<ZiFragment> {
    Ok(E::seal(ZiArray::<E> {
        bounds,
        items: items.map(E::stage).transpose()?,
    }))
}

impl<E: ZiExecution> ZiRunner<E> for ZiArray<E> {
    fn run<'s>(
        &'s self,
        value: Value,
        scope: &'s mut ZiScope,
    ) -> impl Future<Output = Value> + Send + 's {
        async move {
            let mut elements = match value {
                Value::Array(elements) => elements,
                other => {
                    scope.report(ZiIssue::new("array").actual(other.clone()));
                    return other;
                }
            };

            self.bounds.check(elements.len(), scope);
            if let Some(stage) = &self.items {
                for (index, element) in elements.iter_mut().enumerate() {
                    let input = std::mem::take(element);
                    scope.enter(ZiSegment::Index(index));
                    *element = E::call(stage, input, scope).await;
                    scope.leave();
                }
            }
            Value::Array(elements)
        }
    }
}
