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

//! # Zic Record Module
//!
//! Validation failures are data, not errors. Every rule that rejects a value
//! appends one [`ZiErrorRecord`] to the [`ZiErrorCollector`] owned by the
//! current validator call, and the call returns a [`ZiOutcome`].
//!
//! ## Shape
//!
//! Records serialize to the external shape
//! `{ "type", "field", "actual"?, "expected"?, "message"? }`; optional members are
//! omitted when absent.
//!
//! ```rust
//! use serde_json::json;
//! use zic::record::ZiErrorRecord;
//!
//! let record = ZiErrorRecord::new("number", "payload.user.id")
//!     .with_actual(json!("nope"))
//!     .with_message("The 'payload.user.id' field must be a number.");
//!
//! assert_eq!(
//!     serde_json::to_value(&record).unwrap(),
//!     json!({
//!         "type": "number",
//!         "field": "payload.user.id",
//!         "actual": "nope",
//!         "message": "The 'payload.user.id' field must be a number."
//!     })
//! );
//! ```

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// One validation failure, in the order it was recorded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZiErrorRecord {
    /// Rule-level error type, e.g. `number` or `stringMin`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Dotted path of the offending value; array elements render as `[i]`.
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ZiErrorRecord {
    pub fn new(kind: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            field: field.into(),
            actual: None,
            expected: None,
            message: None,
        }
    }

    pub fn with_actual(mut self, actual: Value) -> Self {
        self.actual = Some(actual);
        self
    }

    pub fn with_expected(mut self, expected: Value) -> Self {
        self.expected = Some(expected);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// A failure as reported by a rule or a custom check.
///
/// Issues carry no field path and usually no message: the run-time scope
/// fills both when the issue is recorded, so the path is only rendered on
/// the failure path.
#[derive(Clone, Debug, PartialEq)]
pub struct ZiIssue {
    pub kind: String,
    pub actual: Option<Value>,
    pub expected: Option<Value>,
    pub message: Option<String>,
}

impl ZiIssue {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            actual: None,
            expected: None,
            message: None,
        }
    }

    pub fn actual(mut self, actual: Value) -> Self {
        self.actual = Some(actual);
        self
    }

    pub fn expected(mut self, expected: impl Into<Value>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Ordered, append-only list of records for a single validator call.
///
/// There is deliberately no way to remove or reorder records; rules detect
/// their own failures by comparing [`len`](Self::len) before and after.
#[derive(Clone, Debug, Default)]
pub struct ZiErrorCollector {
    records: Vec<ZiErrorRecord>,
}

impl ZiErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ZiErrorRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ZiErrorRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ZiErrorRecord> {
        self.records
    }
}

/// Result of one validator call: accepted, or rejected with at least one record.
#[derive(Clone, Debug, PartialEq)]
pub enum ZiOutcome {
    Valid,
    Invalid(Vec<ZiErrorRecord>),
}

impl ZiOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ZiOutcome::Valid)
    }

    /// Records of a rejected value; empty for an accepted one.
    pub fn errors(&self) -> &[ZiErrorRecord] {
        match self {
            ZiOutcome::Valid => &[],
            ZiOutcome::Invalid(records) => records,
        }
    }

    pub fn into_result(self) -> std::result::Result<(), Vec<ZiErrorRecord>> {
        match self {
            ZiOutcome::Valid => Ok(()),
            ZiOutcome::Invalid(records) => Err(records),
        }
    }
}

impl From<ZiErrorCollector> for ZiOutcome {
    fn from(collector: ZiErrorCollector) -> Self {
        if collector.is_empty() {
            ZiOutcome::Valid
        } else {
            ZiOutcome::Invalid(collector.into_records())
        }
    }
}

/// Serializes as the literal `true` or as the record list.
impl Serialize for ZiOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ZiOutcome::Valid => serializer.serialize_bool(true),
            ZiOutcome::Invalid(records) => records.serialize(serializer),
        }
    }
}
