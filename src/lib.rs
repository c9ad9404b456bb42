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

//! # Zic Core Library
//!
//! Zic compiles declarative, nested validation schemas into validators. A
//! schema tree is walked once, at compile time, and turned into a fixed graph
//! of closures; validating a value then runs that graph directly, with no
//! lookup by rule tag.
//!
//! ## Module Overview
//!
//! - **schema**: schema model, builders and the JSON/YAML schema parser
//! - **registry**: rule tags mapped to rule compilers, shorthand expansion
//! - **context**: per-compile state (fragment table, execution mode, label)
//! - **compiler**: the recursive orchestrator and presence handling
//! - **fragment**: compiled fragments, the per-call scope, execution modes
//! - **rules**: built-in rules (pipe, object, array, string, number, ...)
//! - **record**: error records, the per-call collector, validation outcomes
//! - **messages**: error message templates
//! - **validator**: the compiled validator
//! - **config**: compiler configuration
//!
//! ## Feature Flags
//!
//! - `yaml` (default): YAML schema documents and configuration
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use zic::{ZiCompiler, ZiSchema};
//!
//! let schema: ZiSchema = ZiSchema::object([(
//!     "amount",
//!     ZiSchema::pipe([
//!         ZiSchema::node("string").option("trim", true),
//!         ZiSchema::node("number").option("convert", true).option("min", 1),
//!     ]),
//! )])
//! .into();
//!
//! let validator = ZiCompiler::new().compile(&schema).unwrap();
//! let mut value = json!({"amount": " 42 "});
//! assert!(validator.validate(&mut value).unwrap().is_valid());
//! assert_eq!(value, json!({"amount": 42}));
//! ```
//!
//! ## Error Handling
//!
//! Schema mistakes are `ZiError`s returned by `compile`. Non-conforming input
//! is never an error: it yields a [`ZiOutcome::Invalid`] with ordered records.

pub mod compiler;
pub mod config;
pub mod context;
pub mod errors;
pub mod fragment;
pub mod messages;
pub mod record;
pub mod registry;
pub mod rules;
pub mod schema;
pub mod validator;

pub use compiler::ZiCompiler;
pub use config::{ZiCompilerConfig, ZiCompilerConfigBuilder};
pub use context::{ZiCompileContext, ZiExecutionMode};
pub use errors::{Result, ZiError};
pub use fragment::{
    ZiContinuation, ZiExecution, ZiFragment, ZiImmediate, ZiRunner, ZiScope, ZiSegment,
    ZiSuspending,
};
pub use messages::ZiMessages;
pub use record::{ZiErrorCollector, ZiErrorRecord, ZiIssue, ZiOutcome};
pub use registry::{expand_shorthand, ZiRuleCompiler, ZiRuleDescriptor, ZiRuleRegistry};
pub use schema::{
    ZiAsyncCheck, ZiCheck, ZiOption, ZiSchema, ZiSchemaNode, ZiSchemaParser,
};
pub use validator::ZiValidator;
