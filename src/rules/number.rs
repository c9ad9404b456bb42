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

// 2^53: integers up to this magnitude are exact in an f64.
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Numeric check with optional conversion from strings and booleans.
#[derive(Clone, Debug, Default)]
pub struct ZiNumberRule {
    convert: bool,
    min: Option<f64>,
    max: Option<f64>,
    equal: Option<f64>,
    not_equal: Option<f64>,
    integer: bool,
    positive: bool,
    negative: bool,
}

impl ZiNumberRule {
    pub fn from_rule(rule: &ZiRuleDescriptor) -> Result<Self> {
        Ok(Self {
            convert: rule.flag("convert")?,
            min: rule.number("min")?,
            max: rule.number("max")?,
            equal: rule.number("equal")?,
            not_equal: rule.number("notEqual")?,
            integer: rule.flag("integer")?,
            positive: rule.flag("positive")?,
            negative: rule.flag("negative")?,
        })
    }

    pub fn apply(&self, value: Value, scope: &mut ZiScope) -> Value {
        let parsed = match &value {
            Value::Number(number) => number.as_f64(),
            Value::String(text) if self.convert => text.trim().parse::<f64>().ok(),
            Value::Bool(flag) if self.convert => Some(if *flag { 1.0 } else { 0.0 }),
            _ => None,
        };
        let Some(number) = parsed.filter(|n| n.is_finite()) else {
            scope.report(ZiIssue::new("number").actual(value.clone()));
            return value;
        };
        let value = match value {
            Value::Number(_) => value,
            _ => number_value(number),
        };

        if let Some(min) = self.min.filter(|min| number < *min) {
            scope.report(
                ZiIssue::new("numberMin")
                    .expected(number_value(min))
                    .actual(value.clone()),
            );
        }
        if let Some(max) = self.max.filter(|max| number > *max) {
            scope.report(
                ZiIssue::new("numberMax")
                    .expected(number_value(max))
                    .actual(value.clone()),
            );
        }
        if let Some(equal) = self.equal.filter(|equal| number != *equal) {
            scope.report(
                ZiIssue::new("numberEqual")
                    .expected(number_value(equal))
                    .actual(value.clone()),
            );
        }
        if let Some(not_equal) = self.not_equal.filter(|not_equal| number == *not_equal) {
            scope.report(
                ZiIssue::new("numberNotEqual")
                    .expected(number_value(not_equal))
                    .actual(value.clone()),
            );
        }
        if self.integer && number.fract() != 0.0 {
            scope.report(ZiIssue::new("numberInteger").actual(value.clone()));
        }
        if self.positive && number <= 0.0 {
            scope.report(ZiIssue::new("numberPositive").actual(value.clone()));
        }
        if self.negative && number >= 0.0 {
            scope.report(ZiIssue::new("numberNegative").actual(value.clone()));
        }
        value
    }
}

/// Integral values render as JSON integers, others as floats.
fn number_value(number: f64) -> Value {
    if number.fract() == 0.0 && number.abs() < EXACT_INTEGER_LIMIT {
        Value::from(number as i64)
    } else {
        Value::from(number)
    }
}

pub fn compile_number(rule: &ZiRuleDescriptor, ctx: &mut ZiCompileContext<'_>) -> Result<ZiFragment> {
    let number = ZiNumberRule::from_rule(rule)?;
    Ok(ctx.leaf(move |value, scope| number.apply(value, scope)))
}
