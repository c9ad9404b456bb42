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

//! # Rules Module
//!
//! Built-in rule compilers.
//!
//! ## Rule Categories
//!
//! - **pipe**: sequential composition with short-circuit on first failure
//! - **object**: field fan-out over `props`, optional strict key checking
//! - **array**: element iteration over `items`, length bounds
//! - **any**, **string**, **number**, **boolean**: leaf checks and conversions
//! - **custom**: user supplied synchronous or asynchronous checks
//!
//! ## Usage
//!
//! Rules are looked up by tag in a [`ZiRuleRegistry`]; every compiler here is
//! a plain function satisfying [`ZiRuleCompiler`](crate::registry::ZiRuleCompiler).

pub mod any;
pub mod array;
pub mod boolean;
pub mod custom;
pub mod number;
pub mod object;
pub mod pipe;
pub mod string;

use crate::registry::ZiRuleRegistry;

/// Installs every built-in rule into `registry`.
pub fn register_builtins(registry: &mut ZiRuleRegistry) {
    registry.insert("any", any::compile_any);
    registry.insert("string", string::compile_string);
    registry.insert("number", number::compile_number);
    registry.insert("boolean", boolean::compile_boolean);
    registry.insert("object", object::compile_object);
    registry.insert("array", array::compile_array);
    registry.insert("custom", custom::compile_custom);
    registry.insert("pipe", pipe::compile_pipe);
}
