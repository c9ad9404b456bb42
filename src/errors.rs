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

//! # Zic Error Module
//!
//! This module defines the compile-time error type used throughout Zic.
//!
//! ## Two Kinds of Failure
//!
//! Zic separates schema-authoring mistakes from non-conforming input:
//!
//! - **ZiError**: raised by [`ZiCompiler::compile`](crate::compiler::ZiCompiler::compile)
//!   when a schema cannot be turned into a validator (unknown rule tag, malformed
//!   leaf option, unreadable schema document). These are hard failures and are
//!   never deferred to validation time.
//! - **ZiErrorRecord**: produced while a validator runs against a value. Those are
//!   data, collected in order and returned to the caller, never raised. See
//!   [`crate::record`].
//!
//! ## Usage
//!
//! ```rust
//! use zic::errors::{Result, ZiError};
//!
//! fn min_length(option: Option<&serde_json::Value>) -> Result<usize> {
//!     option
//!         .and_then(serde_json::Value::as_u64)
//!         .map(|n| n as usize)
//!         .ok_or_else(|| ZiError::invalid_option("string", "min", "name", "expected a count"))
//! }
//! ```

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::context::ZiExecutionMode;

/// Convenience result type used throughout Zic.
pub type Result<T> = std::result::Result<T, ZiError>;

/// Canonical compile-time error enumeration for Zic.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum ZiError {
    /// No rule compiler is registered for the schema's type tag.
    #[error("unknown rule '{tag}' at '{path}'")]
    UnknownRule { tag: String, path: String },

    /// A rule option is present but has the wrong shape.
    #[error("invalid option '{option}' on rule '{rule}' at '{path}': {message}")]
    InvalidOption {
        rule: String,
        option: String,
        path: String,
        message: String,
    },

    /// A rule tag was registered twice without an explicit override.
    #[error("rule '{tag}' is already registered")]
    DuplicateRule { tag: String },

    /// The schema document itself is malformed.
    #[error("schema error: {message}")]
    Schema { message: String },

    /// A validator was driven through the wrong calling convention, or a
    /// fragment of the other mode reached a compile.
    #[error("execution mode mismatch: expected {expected}, got {actual}")]
    ExecutionMode {
        expected: ZiExecutionMode,
        actual: ZiExecutionMode,
    },

    /// Errors originating from filesystem IO while loading schemas.
    #[error("io error: {0}")]
    Io(String),

    /// Wrapper for serde-style deserialization issues.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Catch-all variant for unexpected situations.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for ZiError {
    fn from(err: io::Error) -> Self {
        ZiError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ZiError {
    fn from(err: serde_json::Error) -> Self {
        ZiError::Serde(err.to_string())
    }
}

#[cfg(feature = "yaml")]
impl From<serde_yaml::Error> for ZiError {
    fn from(err: serde_yaml::Error) -> Self {
        ZiError::Serde(err.to_string())
    }
}

impl ZiError {
    /// Helper to construct unknown rule errors.
    pub fn unknown_rule(tag: impl Into<String>, path: impl Into<String>) -> Self {
        ZiError::UnknownRule {
            tag: tag.into(),
            path: path.into(),
        }
    }

    /// Helper to construct malformed option errors.
    pub fn invalid_option(
        rule: impl Into<String>,
        option: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ZiError::InvalidOption {
            rule: rule.into(),
            option: option.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    /// Helper to construct schema document errors.
    pub fn schema<T: Into<String>>(message: T) -> Self {
        ZiError::Schema {
            message: message.into(),
        }
    }

    /// Helper to construct internal errors.
    pub fn internal<T: Into<String>>(message: T) -> Self {
        ZiError::Internal(message.into())
    }
}
