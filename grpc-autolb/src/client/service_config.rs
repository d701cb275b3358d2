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

use std::any::Any;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The service config key naming the LB policy the service owner prefers.
pub const LOAD_BALANCING_POLICY_KEY: &str = "loadBalancingPolicy";

/// Errors produced while reading a service config.
#[derive(Debug, thiserror::Error)]
pub enum ServiceConfigError {
    #[error("failed to parse service config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("service config field {field:?} must be a string, found {found}")]
    NotAString { field: &'static str, found: Value },
}

/// An in-memory representation of a service config, usually provided to gRPC as
/// a JSON object by the name resolver.
///
/// The config is kept as the string-keyed object the resolver produced.  Only
/// the fields the channel understands are interpreted, the rest is carried
/// along untouched for the LB policy.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceConfig {
    fields: Map<String, Value>,
}

impl ServiceConfig {
    /// Parses a service config from JSON text.  The top level value must be a
    /// JSON object.
    pub fn from_json(json: &str) -> Result<Self, ServiceConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns the raw value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns the LB policy named by the `loadBalancingPolicy` field, exactly
    /// as written.  Returns `Ok(None)` when the field is absent or null.
    pub fn load_balancing_policy(&self) -> Result<Option<&str>, ServiceConfigError> {
        match self.fields.get(LOAD_BALANCING_POLICY_KEY) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(policy)) => Ok(Some(policy.as_str())),
            Some(other) => Err(ServiceConfigError::NotAString {
                field: LOAD_BALANCING_POLICY_KEY,
                found: other.clone(),
            }),
        }
    }

    /// Returns a copy of this config with `loadBalancingPolicy` set to
    /// `policy`.
    pub fn with_load_balancing_policy(&self, policy: impl Into<String>) -> Self {
        let mut fields = self.fields.clone();
        fields.insert(
            LOAD_BALANCING_POLICY_KEY.to_string(),
            Value::String(policy.into()),
        );
        Self { fields }
    }
}

impl From<Map<String, Value>> for ServiceConfig {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

/// A convenience wrapper for an LB policy's configuration object.
#[derive(Debug, Clone)]
pub struct LbConfig {
    pub config: Arc<dyn Any + Send + Sync>,
}

impl LbConfig {
    /// Create a new LbConfig wrapper containing the provided config.
    pub fn new(config: impl Any + Send + Sync) -> Self {
        LbConfig {
            config: Arc::new(config),
        }
    }
}
