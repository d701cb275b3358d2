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

//! An LB policy that picks its own child policy from resolver updates.
//!
//! The channel installs [`AutoConfiguredPolicy`] as its top level LB policy.
//! It starts out delegating to pick_first and, whenever a resolver update
//! carries a service config, asks a [`PolicySelector`] whether a different
//! policy should take over.

use std::error::Error;
use std::sync::{Arc, Weak};

use tracing::{debug, info, warn};

use super::selector::{PolicyDecision, PolicySelector};
use super::{
    ChannelController, LbError, LbPolicy, LbPolicyBuilder, LbPolicyOptions, LbPolicyRegistry,
    LbState, Subchannel, SubchannelState, PICK_FIRST_POLICY_NAME,
};
use crate::client::name_resolution::ResolverUpdate;
use crate::client::service_config::LbConfig;
use crate::status::Status;

/// The name of the auto-configured LB policy.
pub static POLICY_NAME: &str = "auto_configured";

/// Builds [`AutoConfiguredPolicy`] instances that select children from
/// `registry`.
///
/// The builder only holds a weak reference, so it can be registered in the
/// registry it selects from.  Building fails with
/// [`LbError::RegistryDropped`] once the registry is gone.
pub struct AutoConfiguredPolicyBuilder {
    registry: Weak<LbPolicyRegistry>,
}

impl AutoConfiguredPolicyBuilder {
    pub fn new(registry: &Arc<LbPolicyRegistry>) -> Self {
        Self {
            registry: Arc::downgrade(registry),
        }
    }
}

impl LbPolicyBuilder for AutoConfiguredPolicyBuilder {
    fn build(&self, options: LbPolicyOptions) -> Result<Box<dyn LbPolicy>, LbError> {
        let registry = self.registry.upgrade().ok_or(LbError::RegistryDropped)?;
        Ok(Box::new(AutoConfiguredPolicy::new(options, registry)?))
    }

    fn name(&self) -> &'static str {
        POLICY_NAME
    }
}

/// Delegates to exactly one child LB policy and replaces that child when a
/// resolver update calls for a different policy.
///
/// A replacement drops the old child before reporting Connecting with a
/// picker that queues every RPC, then builds the new child and forwards the
/// update to it.  The queuing report therefore falls strictly between the old
/// child's shutdown and the new child's first update.
///
/// All methods must be called serially, which `&mut self` enforces.  After
/// [`shutdown`](AutoConfiguredPolicy::shutdown), calling any method is a bug
/// and panics.
pub struct AutoConfiguredPolicy {
    options: LbPolicyOptions,
    selector: PolicySelector,
    // The builder of the active child, or of the child that failed to build.
    builder: Arc<dyn LbPolicyBuilder>,
    // None only after a failed build or after shutdown.
    delegate: Option<Box<dyn LbPolicy>>,
    shut_down: bool,
}

impl AutoConfiguredPolicy {
    /// Creates the policy with a pick_first child.  Fails if pick_first is not
    /// registered or cannot be built.
    pub fn new(options: LbPolicyOptions, registry: Arc<LbPolicyRegistry>) -> Result<Self, LbError> {
        let builder = registry.lookup(PICK_FIRST_POLICY_NAME)?;
        let delegate = builder.build(options.clone())?;
        debug!(policy = builder.name(), "auto-configured LB policy created");
        Ok(Self {
            options,
            selector: PolicySelector::new(registry),
            builder,
            delegate: Some(delegate),
            shut_down: false,
        })
    }

    /// The active child policy, if one exists.
    pub fn delegate(&self) -> Option<&dyn LbPolicy> {
        self.delegate.as_deref()
    }

    /// The builder of the active child policy.
    pub fn delegate_builder(&self) -> &Arc<dyn LbPolicyBuilder> {
        &self.builder
    }

    /// Drops the active child policy.  Must be called exactly once.
    pub fn shutdown(&mut self) {
        self.check_running("shutdown");
        self.shut_down = true;
        self.delegate = None;
        debug!(policy = self.builder.name(), "auto-configured LB policy shut down");
    }

    fn check_running(&self, method: &str) {
        if self.shut_down {
            panic!("AutoConfiguredPolicy::{method} called after shutdown");
        }
    }

    fn switch_to(
        &mut self,
        builder: Arc<dyn LbPolicyBuilder>,
        channel_controller: &mut dyn ChannelController,
    ) -> Result<(), LbError> {
        info!(
            from = self.builder.name(),
            to = builder.name(),
            "switching LB policy"
        );
        // Drop the old child before reporting Connecting, so the queuing
        // picker lands strictly between its shutdown and the new child's
        // first update.
        self.delegate = None;
        self.builder = builder;
        channel_controller.update_picker(LbState::initial());
        self.active_delegate(channel_controller)?;
        Ok(())
    }

    // Returns the active child, building one from `builder` if an earlier build
    // failed.  Reports TransientFailure if the build fails again.
    fn active_delegate(
        &mut self,
        channel_controller: &mut dyn ChannelController,
    ) -> Result<&mut Box<dyn LbPolicy>, LbError> {
        match self.delegate {
            Some(ref mut delegate) => Ok(delegate),
            None => match self.builder.build(self.options.clone()) {
                Ok(delegate) => Ok(self.delegate.insert(delegate)),
                Err(err) => {
                    let message = match err.source() {
                        Some(cause) => format!("{err}: {cause}"),
                        None => err.to_string(),
                    };
                    warn!(
                        policy = self.builder.name(),
                        error = %message,
                        "failed to build LB policy"
                    );
                    channel_controller.update_picker(LbState::failing(Status::unavailable(message)));
                    Err(err)
                }
            },
        }
    }
}

impl LbPolicy for AutoConfiguredPolicy {
    fn resolver_update(
        &mut self,
        update: ResolverUpdate,
        config: Option<&LbConfig>,
        channel_controller: &mut dyn ChannelController,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.check_running("resolver_update");

        if let Ok(Some(service_config)) = &update.service_config {
            let decision = self
                .selector
                .decide(update.endpoints_or_empty(), service_config)
                .inspect_err(|err| warn!(error = %err, "failed to select LB policy"))?;
            debug!(?decision, current = self.builder.name(), "selected LB policy");
            if let PolicyDecision::Switch(builder) = decision {
                if !Arc::ptr_eq(&builder, &self.builder) {
                    self.switch_to(builder, channel_controller)?;
                }
            }
        }

        self.active_delegate(channel_controller)?
            .resolver_update(update, config, channel_controller)
    }

    fn resolver_error(&mut self, error: Status, channel_controller: &mut dyn ChannelController) {
        self.check_running("resolver_error");
        match self.delegate.as_mut() {
            Some(delegate) => delegate.resolver_error(error, channel_controller),
            None => channel_controller.update_picker(LbState::failing(error)),
        }
    }

    fn subchannel_update(
        &mut self,
        subchannel: Arc<dyn Subchannel>,
        state: &SubchannelState,
        channel_controller: &mut dyn ChannelController,
    ) {
        self.check_running("subchannel_update");
        match self.delegate.as_mut() {
            Some(delegate) => delegate.subchannel_update(subchannel, state, channel_controller),
            None => debug!(
                subchannel = %subchannel,
                state = %state.connectivity_state,
                "dropping subchannel update: no active LB policy"
            ),
        }
    }

    fn exit_idle(&mut self, channel_controller: &mut dyn ChannelController) {
        self.check_running("exit_idle");
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.exit_idle(channel_controller);
        }
    }

    fn work(&mut self, channel_controller: &mut dyn ChannelController) {
        self.check_running("work");
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.work(channel_controller);
        }
    }
}
