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

//! # Object Rule
//!
//! Validates each declared field of a map with its own compiled fragment, in
//! declaration order. Field errors accumulate; one failing field does not
//! stop the others.
//!
//! Options: `props` (alias `properties`) and `strict` (alias `$$strict`),
//! which is `true` to reject undeclared keys or `"remove"` to drop them.

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

use crate::context::ZiCompileContext;
use crate::errors::Result;
use crate::fragment::{with_execution, ZiExecution, ZiFragment, ZiRunner, ZiScope, ZiSegment};
use crate::record::ZiIssue;
use crate::registry::ZiRuleDescriptor;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ZiStrictness {
    Off,
    Reject,
    Remove,
}

impl ZiStrictness {
    fn from_rule(rule: &ZiRuleDescriptor) -> Result<Self> {
        let key = if rule.has("strict") { "strict" } else { "$$strict" };
        match rule.value(key) {
            None if !rule.has(key) => Ok(ZiStrictness::Off),
            Some(Value::Bool(false)) => Ok(ZiStrictness::Off),
            Some(Value::Bool(true)) => Ok(ZiStrictness::Reject),
            Some(Value::String(mode)) if mode == "remove" => Ok(ZiStrictness::Remove),
            _ => Err(rule.invalid(key, "expected a boolean or \"remove\"")),
        }
    }
}

pub fn compile_object(
    rule: &ZiRuleDescriptor,
    ctx: &mut ZiCompileContext<'_>,
) -> Result<ZiFragment> {
    let props = match rule.fields("props")? {
        Some(props) => props,
        None => rule.fields("properties")?.unwrap_or_default(),
    };
    let strictness = ZiStrictness::from_rule(rule)?;

    let mut fields = Vec::with_capacity(props.len());
    for (key, schema) in &props {
        let fragment = ctx.compile_field(key, schema)?;
        fields.push((Arc::<str>::from(key.as_str()), fragment));
    }
    with_execution!(ctx.mode(), E => object::<E>(&fields, strictness))
}

struct ZiObject<E: ZiExecution> {
    fields: Vec<(Arc<str>, E::Stage)>,
    strictness: ZiStrictness,
}

fn object<E: ZiExecution>(
    fields: &[(Arc<str>, ZiFragment)],
    strictness: ZiStrictness,
) -> Result<ZiFragment> {
    let fields = fields
        .iter()
        .map(|(key, fragment)| Ok((Arc::clone(key), E::stage(fragment)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(E::seal(ZiObject::<E> { fields, strictness }))
}

impl<E: ZiExecution> ZiObject<E> {
    fn declares(&self, key: &str) -> bool {
        self.fields.iter().any(|(field, _)| field.as_ref() == key)
    }
}

impl<E: ZiExecution> ZiRunner<E> for ZiObject<E> {
    fn run<'s>(
        &'s self,
        value: Value,
        scope: &'s mut ZiScope,
    ) -> impl Future<Output = Value> + Send + 's {
        async move {
            let mut map = match value {
                Value::Object(map) => map,
                other => {
                    scope.report(ZiIssue::new("object").actual(other.clone()));
                    return other;
                }
            };

            for (key, stage) in &self.fields {
                let slot = map.get_mut(&**key).map(std::mem::take);
                let present = slot.is_some();
                scope.enter(ZiSegment::Key(Arc::clone(key)));
                let out = E::call(stage, slot.unwrap_or(Value::Null), scope).await;
                scope.leave();
                if present || !out.is_null() {
                    map.insert(key.to_string(), out);
                }
            }

            match self.strictness {
                ZiStrictness::Off => {}
                ZiStrictness::Reject => {
                    let extra: Vec<&str> = map
                        .keys()
                        .map(String::as_str)
                        .filter(|key| !self.declares(key))
                        .collect();
                    if !extra.is_empty() {
                        let extra = extra.join(", ");
                        scope.report(ZiIssue::new("objectStrict").actual(Value::String(extra)));
                    }
                }
                ZiStrictness::Remove => map.retain(|key, _| self.declares(key)),
            }
            Value::Object(map)
        }
    }
}
