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

//! Chooses the LB policy a resolver update calls for.

use std::fmt::Debug;
use std::sync::Arc;

use super::{
    LbError, LbPolicyBuilder, LbPolicyRegistry, GRPCLB_POLICY_NAME, PICK_FIRST_POLICY_NAME,
    ROUND_ROBIN_POLICY_NAME,
};
use crate::client::name_resolution::Endpoint;
use crate::client::service_config::ServiceConfig;

/// The outcome of [`PolicySelector::decide`].
#[derive(Clone)]
pub enum PolicyDecision {
    /// Keep whichever policy is active.
    Keep,
    /// Use the policy built by this builder.  Switching to the builder that is
    /// already active is not a change.
    Switch(Arc<dyn LbPolicyBuilder>),
}

impl PolicyDecision {
    /// The builder to switch to, if any.
    pub fn builder(&self) -> Option<&Arc<dyn LbPolicyBuilder>> {
        match self {
            PolicyDecision::Keep => None,
            PolicyDecision::Switch(builder) => Some(builder),
        }
    }
}

impl Debug for PolicyDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyDecision::Keep => write!(f, "Keep"),
            PolicyDecision::Switch(builder) => write!(f, "Switch({})", builder.name()),
        }
    }
}

/// Decides which LB policy should serve a channel, given the endpoints and
/// service config of a resolver update.
///
/// In order of preference:
///
/// 1. grpclb, if any endpoint is a balancer address.  Balancer addresses are
///    useless to any other policy, so this wins over the service config.
/// 2. The policy named by the service config's `loadBalancingPolicy`, compared
///    case-insensitively.
/// 3. Otherwise, whatever policy is already active.
///
/// A policy the channel applies by default (such as one set on the channel by
/// the application) is not considered here.
#[derive(Clone)]
pub struct PolicySelector {
    registry: Arc<LbPolicyRegistry>,
}

impl PolicySelector {
    pub fn new(registry: Arc<LbPolicyRegistry>) -> Self {
        Self { registry }
    }

    pub fn decide(
        &self,
        endpoints: &[Endpoint],
        service_config: &ServiceConfig,
    ) -> Result<PolicyDecision, LbError> {
        if endpoints.iter().any(Endpoint::is_balancer) {
            let builder = self.registry.get_policy(GRPCLB_POLICY_NAME).ok_or_else(|| {
                LbError::Configuration {
                    name: GRPCLB_POLICY_NAME.to_string(),
                }
            })?;
            return Ok(PolicyDecision::Switch(builder));
        }

        let requested = service_config
            .load_balancing_policy()
            .map_err(|e| LbError::InvalidArgument(e.to_string()))?;
        let Some(requested) = requested else {
            return Ok(PolicyDecision::Keep);
        };

        let name = match requested.to_ascii_uppercase().as_str() {
            "ROUND_ROBIN" => ROUND_ROBIN_POLICY_NAME,
            "PICK_FIRST" => PICK_FIRST_POLICY_NAME,
            _ => {
                return Err(LbError::InvalidArgument(format!(
                    "unknown service config policy: {requested}"
                )));
            }
        };
        Ok(PolicyDecision::Switch(self.registry.lookup(name)?))
    }
}
