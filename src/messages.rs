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

//! Message templates keyed by error type.
//!
//! Templates use `{field}`, `{actual}` and `{expected}` placeholders and are
//! rendered only when a record is appended.

use std::collections::HashMap;

use serde_json::Value;

const DEFAULT_TEMPLATES: &[(&str, &str)] = &[
    ("required", "The '{field}' field is required."),
    ("string", "The '{field}' field must be a string."),
    ("stringEmpty", "The '{field}' field must not be empty."),
    (
        "stringMin",
        "The '{field}' field length must be greater than or equal to {expected} characters long.",
    ),
    (
        "stringMax",
        "The '{field}' field length must be less than or equal to {expected} characters long.",
    ),
    (
        "stringLength",
        "The '{field}' field length must be {expected} characters long.",
    ),
    (
        "stringPattern",
        "The '{field}' field fails to match the required pattern.",
    ),
    ("number", "The '{field}' field must be a number."),
    (
        "numberMin",
        "The '{field}' field must be greater than or equal to {expected}.",
    ),
    (
        "numberMax",
        "The '{field}' field must be less than or equal to {expected}.",
    ),
    ("numberEqual", "The '{field}' field must be equal to {expected}."),
    (
        "numberNotEqual",
        "The '{field}' field can't be equal to {expected}.",
    ),
    ("numberInteger", "The '{field}' field must be an integer."),
    (
        "numberPositive",
        "The '{field}' field must be a positive number.",
    ),
    (
        "numberNegative",
        "The '{field}' field must be a negative number.",
    ),
    ("boolean", "The '{field}' field must be a boolean."),
    ("object", "The '{field}' must be an Object."),
    (
        "objectStrict",
        "The object '{field}' contains forbidden keys: '{actual}'.",
    ),
    ("array", "The '{field}' field must be an array."),
    (
        "arrayEmpty",
        "The '{field}' field must not be an empty array.",
    ),
    (
        "arrayMin",
        "The '{field}' field must contain at least {expected} items.",
    ),
    (
        "arrayMax",
        "The '{field}' field must contain less than or equal to {expected} items.",
    ),
    ("arrayLength", "The '{field}' field must contain {expected} items."),
];

/// Template catalog consulted when a record is appended without a message.
#[derive(Clone, Debug)]
pub struct ZiMessages {
    templates: HashMap<String, String>,
}

impl Default for ZiMessages {
    fn default() -> Self {
        Self {
            templates: DEFAULT_TEMPLATES
                .iter()
                .map(|(kind, template)| (kind.to_string(), template.to_string()))
                .collect(),
        }
    }
}

impl ZiMessages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces or adds the template for `kind`.
    pub fn set(&mut self, kind: impl Into<String>, template: impl Into<String>) {
        self.templates.insert(kind.into(), template.into());
    }

    pub fn get(&self, kind: &str) -> Option<&str> {
        self.templates.get(kind).map(String::as_str)
    }

    /// Renders the template for `kind`; `None` when the type has no template.
    pub fn render(
        &self,
        kind: &str,
        field: &str,
        actual: Option<&Value>,
        expected: Option<&Value>,
    ) -> Option<String> {
        let template = self.get(kind)?;
        let mut message = template.replace("{field}", field);
        if message.contains("{actual}") {
            message = message.replace("{actual}", &display(actual));
        }
        if message.contains("{expected}") {
            message = message.replace("{expected}", &display(expected));
        }
        Some(message)
    }
}

fn display(value: Option<&Value>) -> String {
    match value {
        None => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}
