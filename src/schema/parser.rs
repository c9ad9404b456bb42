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

//! Loading schemas from JSON and YAML documents.
//!
//! A document root is either a map of field names to schemas (an implicit
//! `object` rule) or, with `"$$root": true`, a single schema node. Root-level
//! meta keys:
//!
//! | key        | effect                                             |
//! |------------|----------------------------------------------------|
//! | `$$root`   | the document is one schema node, not a field map   |
//! | `$$async`  | compile the validator in asynchronous mode         |
//! | `$$strict` | `strict` option of the implicit object rule        |
//!
//! Nested nodes are maps with a `type` key; every other key is an option
//! kept as raw JSON. A nested map with `$$type` is a nested object whose
//! remaining keys are its fields.

use std::path::Path;

use serde_json::{Map, Value};

use crate::errors::{Result, ZiError};
use crate::registry::expand_shorthand;
use crate::schema::{ZiOption, ZiSchema, ZiSchemaNode};

#[derive(Clone, Debug, Default)]
pub struct ZiSchemaParserConfig {
    /// Reject unknown `$$` meta keys instead of ignoring them.
    pub strict: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ZiSchemaParser {
    config: ZiSchemaParserConfig,
}

impl ZiSchemaParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: ZiSchemaParserConfig) -> Self {
        self.config = config;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.config.strict = strict;
        self
    }

    /// Parses `source`, trying JSON when it starts with `{` and YAML
    /// otherwise. A `{` source that is not valid JSON is read as a YAML flow
    /// mapping when YAML support is enabled.
    pub fn parse(&self, source: &str) -> Result<ZiSchema> {
        if source.trim_start().starts_with('{') {
            match serde_json::from_str::<Value>(source) {
                Ok(document) => return self.parse_document(&document),
                Err(err) if cfg!(feature = "yaml") => {
                    log::debug!("schema source is not JSON ({err}), reading it as YAML");
                }
                Err(err) => return Err(err.into()),
            }
        }
        self.parse_non_json(source)
    }

    #[cfg(feature = "yaml")]
    fn parse_non_json(&self, source: &str) -> Result<ZiSchema> {
        self.parse_yaml(source)
    }

    #[cfg(not(feature = "yaml"))]
    fn parse_non_json(&self, _source: &str) -> Result<ZiSchema> {
        Err(ZiError::schema(
            "schema source is not a JSON object and YAML support is disabled",
        ))
    }

    pub fn parse_json(&self, source: &str) -> Result<ZiSchema> {
        let document: Value = serde_json::from_str(source)?;
        self.parse_document(&document)
    }

    #[cfg(feature = "yaml")]
    pub fn parse_yaml(&self, source: &str) -> Result<ZiSchema> {
        let document: Value = serde_yaml::from_str(source)?;
        self.parse_document(&document)
    }

    pub fn parse_file(&self, path: &Path) -> Result<ZiSchema> {
        let content = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        log::debug!("loading schema from {}", path.display());
        match extension.as_str() {
            "json" => self.parse_json(&content),
            #[cfg(feature = "yaml")]
            "yaml" | "yml" => self.parse_yaml(&content),
            _ => self.parse(&content),
        }
    }

    /// Interprets an already-deserialized document.
    pub fn parse_document(&self, document: &Value) -> Result<ZiSchema> {
        let map = match document {
            Value::Object(map) => map,
            Value::String(shorthand) => return Ok(ZiSchema::Shorthand(shorthand.clone())),
            other => {
                return Err(ZiError::schema(format!(
                    "schema document must be a map, got {}",
                    kind_of(other)
                )))
            }
        };

        if matches!(map.get("$$root"), Some(Value::Bool(true))) {
            let mut inner = map.clone();
            inner.remove("$$root");
            return node_from_map(&inner).map(ZiSchema::Node);
        }

        let mut node = ZiSchemaNode::new("object");
        let mut props = Vec::new();
        for (key, value) in map {
            match key.as_str() {
                "$$async" => node.set_option("$$async", value.clone()),
                "$$strict" => node.set_option("strict", value.clone()),
                "$$root" => {}
                meta if meta.starts_with("$$") => self.unknown_meta(meta)?,
                field => props.push((field.to_string(), schema_from_value(value)?)),
            }
        }
        node.set_option("props", ZiOption::Fields(props));
        Ok(ZiSchema::Node(node))
    }

    fn unknown_meta(&self, key: &str) -> Result<()> {
        if self.config.strict {
            return Err(ZiError::schema(format!("unknown meta key '{key}'")));
        }
        log::warn!("ignoring unknown meta key '{}'", key);
        Ok(())
    }
}

/// Converts one raw schema value (shorthand string or node map) into a
/// [`ZiSchema`]. Option values stay raw.
pub fn schema_from_value(value: &Value) -> Result<ZiSchema> {
    match value {
        Value::String(shorthand) => Ok(ZiSchema::Shorthand(shorthand.clone())),
        Value::Object(map) => node_from_map(map).map(ZiSchema::Node),
        other => Err(ZiError::schema(format!(
            "a schema must be a string or a map, got {}",
            kind_of(other)
        ))),
    }
}

fn node_from_map(map: &Map<String, Value>) -> Result<ZiSchemaNode> {
    if let Some(tag) = map.get("$$type") {
        let tag = tag
            .as_str()
            .ok_or_else(|| ZiError::schema("'$$type' must be a string"))?;
        let mut node = expand_shorthand(tag)?;
        let mut props = Vec::new();
        for (key, value) in map.iter().filter(|(key, _)| key.as_str() != "$$type") {
            props.push((key.clone(), schema_from_value(value)?));
        }
        node.set_option("props", ZiOption::Fields(props));
        return Ok(node);
    }

    let tag = match map.get("type") {
        Some(Value::String(tag)) => tag,
        Some(_) => return Err(ZiError::schema("'type' must be a string")),
        None => return Err(ZiError::schema("schema node is missing 'type'")),
    };
    let mut node = ZiSchemaNode::new(tag.as_str());
    for (key, value) in map.iter().filter(|(key, _)| key.as_str() != "type") {
        node.set_option(key.as_str(), value.clone());
    }
    Ok(node)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a map",
    }
}
