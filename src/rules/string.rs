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

//! # String Rule
//!
//! Sanitizers (`trim`, `trimLeft`, `trimRight`, `lowercase`, `uppercase`) run
//! before the checks, so `min`/`max`/`length`/`pattern` see the sanitized text.

use regex::Regex;
use serde_json::Value;

use crate::context::ZiCompileContext;
use crate::errors::Result;
use crate::fragment::{ZiFragment, ZiScope};
use crate::record::ZiIssue;
use crate::registry::ZiRuleDescriptor;

#[derive(Clone, Debug, Default)]
pub struct ZiStringRule {
    convert: bool,
    trim: bool,
    trim_left: bool,
    trim_right: bool,
    lowercase: bool,
    uppercase: bool,
    empty: bool,
    min: Option<usize>,
    max: Option<usize>,
    length: Option<usize>,
    pattern: Option<Regex>,
}

impl ZiStringRule {
    pub fn from_rule(rule: &ZiRuleDescriptor) -> Result<Self> {
        let pattern = match rule.string("pattern")? {
            Some(source) => Some(
                Regex::new(source).map_err(|err| rule.invalid("pattern", err.to_string()))?,
            ),
            None => None,
        };
        Ok(Self {
            convert: rule.flag("convert")?,
            trim: rule.flag("trim")?,
            trim_left: rule.flag("trimLeft")?,
            trim_right: rule.flag("trimRight")?,
            lowercase: rule.flag("lowercase")?,
            uppercase: rule.flag("uppercase")?,
            empty: rule.optional_flag("empty")?.unwrap_or(true),
            min: rule.count("min")?,
            max: rule.count("max")?,
            length: rule.count("length")?,
            pattern,
        })
    }

    pub fn apply(&self, value: Value, scope: &mut ZiScope) -> Value {
        let mut text = match value {
            Value::String(text) => text,
            Value::Number(number) if self.convert => number.to_string(),
            Value::Bool(flag) if self.convert => flag.to_string(),
            other => {
                scope.report(ZiIssue::new("string").actual(other.clone()));
                return other;
            }
        };

        if self.trim {
            text = text.trim().to_string();
        } else if self.trim_left {
            text = text.trim_start().to_string();
        } else if self.trim_right {
            text = text.trim_end().to_string();
        }
        if self.lowercase {
            text = text.to_lowercase();
        } else if self.uppercase {
            text = text.to_uppercase();
        }

        let len = text.chars().count();
        if !self.empty && len == 0 {
            scope.report(ZiIssue::new("stringEmpty").actual(Value::String(text.clone())));
        }
        if let Some(min) = self.min.filter(|min| len < *min) {
            scope.report(ZiIssue::new("stringMin").expected(min).actual(len.into()));
        }
        if let Some(max) = self.max.filter(|max| len > *max) {
            scope.report(ZiIssue::new("stringMax").expected(max).actual(len.into()));
        }
        if let Some(length) = self.length.filter(|length| len != *length) {
            scope.report(ZiIssue::new("stringLength").expected(length).actual(len.into()));
        }
        if let Some(pattern) = self.pattern.as_ref().filter(|p| !p.is_match(&text)) {
            scope.report(
                ZiIssue::new("stringPattern")
                    .expected(pattern.as_str())
                    .actual(Value::String(text.clone())),
            );
        }
        Value::String(text)
    }
}

pub fn compile_string(rule: &ZiRuleDescriptor, ctx: &mut ZiCompileContext<'_>) -> Result<ZiFragment> {
    let string = ZiStringRule::from_rule(rule)?;
    Ok(ctx.leaf(move |value, scope| string.apply(value, scope)))
}
