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

use serde_json::Value;

use crate::context::ZiCompileContext;
use crate::errors::Result;
use crate::fragment::{ZiFragment, ZiScope};
use crate::record::ZiIssue;
use crate::registry::ZiRuleDescriptor;

fn convert(value: &Value) -> Option<bool> {
    match value {
        Value::String(text) => match text.as_str() {
            "true" | "1" | "on" => Some(true),
            "false" | "0" | "off" => Some(false),
            _ => None,
        },
        Value::Number(number) => match number.as_f64() {
            Some(n) if n == 1.0 => Some(true),
            Some(n) if n == 0.0 => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn check(value: Value, scope: &mut ZiScope, convert_input: bool) -> Value {
    if value.is_boolean() {
        return value;
    }
    match convert_input.then(|| convert(&value)).flatten() {
        Some(flag) => Value::Bool(flag),
        None => {
            scope.report(ZiIssue::new("boolean").actual(value.clone()));
            value
        }
    }
}

pub fn compile_boolean(rule: &ZiRuleDescriptor, ctx: &mut ZiCompileContext<'_>) -> Result<ZiFragment> {
    let convert_input = rule.flag("convert")?;
    Ok(ctx.leaf(move |value, scope| check(value, scope, convert_input)))
}
