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

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::ZiExecutionMode;
use crate::errors::Result;
use crate::messages::ZiMessages;

/// Configuration of a [`ZiCompiler`](crate::compiler::ZiCompiler).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZiCompilerConfig {
    /// Mode used when the root schema does not declare `$$async`.
    pub default_mode: ZiExecutionMode,
    /// Message template overrides keyed by error type.
    pub messages: HashMap<String, String>,
}

impl ZiCompilerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_mode(mut self, mode: ZiExecutionMode) -> Self {
        self.default_mode = mode;
        self
    }

    pub fn with_message(mut self, kind: impl Into<String>, template: impl Into<String>) -> Self {
        self.messages.insert(kind.into(), template.into());
        self
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Default templates with this config's overrides applied.
    pub fn build_messages(&self) -> ZiMessages {
        let mut messages = ZiMessages::default();
        for (kind, template) in &self.messages {
            messages.set(kind.as_str(), template.as_str());
        }
        messages
    }
}

/// Partial config where every field may be left out.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ZiCompilerConfigBuilder {
    pub default_mode: Option<ZiExecutionMode>,
    pub messages: Option<HashMap<String, String>>,
}

impl ZiCompilerConfigBuilder {
    pub fn build(self) -> ZiCompilerConfig {
        let base = ZiCompilerConfig::default();
        ZiCompilerConfig {
            default_mode: self.default_mode.unwrap_or(base.default_mode),
            messages: self.messages.unwrap_or(base.messages),
        }
    }

    /// Builds from a JSON value, falling back to defaults on a malformed one.
    pub fn from_json(value: &Value) -> ZiCompilerConfig {
        let builder: ZiCompilerConfigBuilder =
            serde_json::from_value(value.clone()).unwrap_or_else(|err| {
                log::warn!("invalid compiler config, using defaults: {}", err);
                ZiCompilerConfigBuilder::default()
            });
        builder.build()
    }
}
