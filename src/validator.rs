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

//! # Zic Validator
//!
//! The compiled artifact. A validator owns the root fragment and the fragment
//! table captured at compile time; both are immutable and shared by clones.
//! Every call allocates its own [`ZiScope`], so one validator may serve any
//! number of concurrent calls.

use std::sync::Arc;

use serde_json::Value;

use crate::context::ZiExecutionMode;
use crate::errors::{Result, ZiError};
use crate::fragment::{ZiFragment, ZiScope};
use crate::messages::ZiMessages;
use crate::record::ZiOutcome;

#[derive(Clone, Debug)]
pub struct ZiValidator {
    root: ZiFragment,
    fragments: Arc<[ZiFragment]>,
    mode: ZiExecutionMode,
    messages: Arc<ZiMessages>,
}

impl ZiValidator {
    pub(crate) fn new(
        root: ZiFragment,
        fragments: Vec<ZiFragment>,
        mode: ZiExecutionMode,
        messages: Arc<ZiMessages>,
    ) -> Self {
        Self {
            root,
            fragments: fragments.into(),
            mode,
            messages,
        }
    }

    pub fn mode(&self) -> ZiExecutionMode {
        self.mode
    }

    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    /// Fragment registered at `index` during compilation.
    pub fn fragment(&self, index: usize) -> Option<&ZiFragment> {
        self.fragments.get(index)
    }

    /// Validates `value` in place. Only available on synchronous validators.
    pub fn validate(&self, value: &mut Value) -> Result<ZiOutcome> {
        let ZiFragment::Immediate(root) = &self.root else {
            return Err(ZiError::ExecutionMode {
                expected: self.mode,
                actual: ZiExecutionMode::Sync,
            });
        };
        let mut scope = ZiScope::new(Arc::clone(&self.messages));
        let input = std::mem::take(value);
        *value = root(input, &mut scope);
        Ok(scope.into_outcome())
    }

    /// Validates `value` in place. Only available on asynchronous validators.
    pub async fn validate_async(&self, value: &mut Value) -> Result<ZiOutcome> {
        let ZiFragment::Suspending(root) = &self.root else {
            return Err(ZiError::ExecutionMode {
                expected: self.mode,
                actual: ZiExecutionMode::Async,
            });
        };
        let mut scope = ZiScope::new(Arc::clone(&self.messages));
        let input = std::mem::take(value);
        *value = root(input, &mut scope).await;
        Ok(scope.into_outcome())
    }
}
