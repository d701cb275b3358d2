/*
 *
 * Copyright 2025 gRPC authors.
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to
 * deal in the Software without restriction, including without limitation the
 * rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
 * sell copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in
 * all copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
 * FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS
 * IN THE SOFTWARE.
 *
 */

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::{LbError, LbPolicyBuilder};

/// A registry to store and retrieve LB policies.  LB policies are indexed by
/// their names.
///
/// Policies are registered at startup by whichever policies are compiled into
/// the binary.  Lookups use the exact name the builder reports.
pub struct LbPolicyRegistry {
    m: RwLock<HashMap<String, Arc<dyn LbPolicyBuilder>>>,
}

impl LbPolicyRegistry {
    /// Construct an empty LB policy registry.
    pub fn new() -> Self {
        Self {
            m: RwLock::default(),
        }
    }

    /// Add a LB policy into the registry, replacing any policy registered
    /// under the same name.
    pub fn add_builder(&self, builder: impl LbPolicyBuilder + 'static) {
        self.add_shared_builder(Arc::new(builder));
    }

    /// Like add_builder, for a builder that is already shared.
    pub fn add_shared_builder(&self, builder: Arc<dyn LbPolicyBuilder>) {
        debug!(policy = builder.name(), "registering LB policy");
        self.m.write().insert(builder.name().to_string(), builder);
    }

    /// Retrieve a LB policy from the registry, or None if not found.
    pub fn get_policy(&self, name: &str) -> Option<Arc<dyn LbPolicyBuilder>> {
        self.m.read().get(name).cloned()
    }

    /// Retrieve a LB policy from the registry, failing with
    /// `LbError::PolicyNotAvailable` if it was never registered.
    pub fn lookup(&self, name: &str) -> Result<Arc<dyn LbPolicyBuilder>, LbError> {
        self.get_policy(name)
            .ok_or_else(|| LbError::PolicyNotAvailable {
                name: name.to_string(),
            })
    }
}

impl Default for LbPolicyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
