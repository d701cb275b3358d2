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
use std::error::Error;
use std::fmt::Debug;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::client::load_balancing::{
    ChannelController, LbError, LbPolicy, LbPolicyBuilder, LbPolicyOptions, LbState, Subchannel,
    SubchannelState, WorkScheduler,
};
use crate::client::name_resolution::{Address, ResolverUpdate};
use crate::client::service_config::LbConfig;
use crate::client::ConnectivityState;
use crate::status::Status;

// A test subchannel that forwards connect calls to a channel.
// This allows tests to verify when a subchannel is asked to connect.
#[derive(Debug)]
pub(crate) struct TestSubchannel {
    address: Address,
    tx_events: mpsc::UnboundedSender<TestEvent>,
}

impl TestSubchannel {
    pub fn new(address: Address, tx_events: mpsc::UnboundedSender<TestEvent>) -> Self {
        Self { address, tx_events }
    }
}

impl Subchannel for TestSubchannel {
    fn address(&self) -> Address {
        self.address.clone()
    }

    fn connect(&self) {
        self.tx_events
            .send(TestEvent::Connect(self.address.clone()))
            .unwrap();
    }
}

/// Everything the policies under test do that a test may want to observe, in
/// the order it happened.
pub(crate) enum TestEvent {
    NewSubchannel(Arc<dyn Subchannel>),
    UpdatePicker(LbState),
    RequestResolution,
    Connect(Address),
    ScheduleWork,
    Build(&'static str),
    ResolverUpdate(&'static str, ResolverUpdate),
    ResolverError(&'static str, Status),
    SubchannelUpdate(&'static str, ConnectivityState),
    ExitIdle(&'static str),
    Work(&'static str),
    Shutdown(&'static str),
}

impl Debug for TestEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NewSubchannel(sc) => write!(f, "NewSubchannel({})", sc.address()),
            Self::UpdatePicker(state) => write!(f, "UpdatePicker({})", state.connectivity_state),
            Self::RequestResolution => write!(f, "RequestResolution"),
            Self::Connect(addr) => write!(f, "Connect({})", addr.address),
            Self::ScheduleWork => write!(f, "ScheduleWork"),
            Self::Build(name) => write!(f, "Build({name})"),
            Self::ResolverUpdate(name, _) => write!(f, "ResolverUpdate({name})"),
            Self::ResolverError(name, status) => write!(f, "ResolverError({name}, {status})"),
            Self::SubchannelUpdate(name, state) => write!(f, "SubchannelUpdate({name}, {state})"),
            Self::ExitIdle(name) => write!(f, "ExitIdle({name})"),
            Self::Work(name) => write!(f, "Work({name})"),
            Self::Shutdown(name) => write!(f, "Shutdown({name})"),
        }
    }
}

/// A test channel controller that forwards calls to a channel.  This allows
/// tests to verify when a channel controller is asked to create subchannels or
/// update the picker.
pub(crate) struct TestChannelController {
    pub(crate) tx_events: mpsc::UnboundedSender<TestEvent>,
}

impl ChannelController for TestChannelController {
    fn new_subchannel(&mut self, address: &Address) -> Arc<dyn Subchannel> {
        let subchannel: Arc<dyn Subchannel> =
            Arc::new(TestSubchannel::new(address.clone(), self.tx_events.clone()));
        self.tx_events
            .send(TestEvent::NewSubchannel(subchannel.clone()))
            .unwrap();
        subchannel
    }

    fn update_picker(&mut self, update: LbState) {
        self.tx_events
            .send(TestEvent::UpdatePicker(update))
            .unwrap();
    }

    fn request_resolution(&mut self) {
        self.tx_events.send(TestEvent::RequestResolution).unwrap();
    }
}

pub(crate) struct TestWorkScheduler {
    pub(crate) tx_events: mpsc::UnboundedSender<TestEvent>,
}

impl WorkScheduler for TestWorkScheduler {
    fn schedule_work(&self) {
        self.tx_events.send(TestEvent::ScheduleWork).unwrap();
    }
}

type ResolverUpdateFn = dyn Fn(
        &mut StubPolicyData,
        ResolverUpdate,
        Option<&LbConfig>,
        &mut dyn ChannelController,
    ) -> Result<(), Box<dyn Error + Send + Sync>>
    + Send
    + Sync;

type SubchannelUpdateFn = dyn Fn(&mut StubPolicyData, Arc<dyn Subchannel>, &SubchannelState, &mut dyn ChannelController)
    + Send
    + Sync;

/// Optional behavior for stub policies, on top of the events they always
/// report.
#[derive(Clone, Default)]
pub(crate) struct StubPolicyFuncs {
    pub resolver_update: Option<Arc<ResolverUpdateFn>>,
    pub subchannel_update: Option<Arc<SubchannelUpdateFn>>,
}

impl StubPolicyFuncs {
    pub fn on_resolver_update(
        f: impl Fn(
            &mut StubPolicyData,
            ResolverUpdate,
            Option<&LbConfig>,
            &mut dyn ChannelController,
        ) -> Result<(), Box<dyn Error + Send + Sync>>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            resolver_update: Some(Arc::new(f)),
            ..Default::default()
        }
    }

    pub fn on_subchannel_update(
        f: impl Fn(&mut StubPolicyData, Arc<dyn Subchannel>, &SubchannelState, &mut dyn ChannelController)
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            subchannel_update: Some(Arc::new(f)),
            ..Default::default()
        }
    }
}

/// Per-instance state available to StubPolicyFuncs.
pub(crate) struct StubPolicyData {
    pub test_data: Option<Box<dyn Any + Send + Sync>>,
    pub work_scheduler: Arc<dyn WorkScheduler>,
}

/// A policy that reports every call it receives, and its own shutdown, as
/// TestEvents.
pub(crate) struct StubPolicy {
    name: &'static str,
    funcs: StubPolicyFuncs,
    data: StubPolicyData,
    tx_events: Option<mpsc::UnboundedSender<TestEvent>>,
}

impl StubPolicy {
    // Ignores a closed receiver: policies may outlive the test's receiver
    // while they are being dropped.
    fn send(&self, event: TestEvent) {
        if let Some(tx) = &self.tx_events {
            let _ = tx.send(event);
        }
    }
}

impl LbPolicy for StubPolicy {
    fn resolver_update(
        &mut self,
        update: ResolverUpdate,
        config: Option<&LbConfig>,
        channel_controller: &mut dyn ChannelController,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.send(TestEvent::ResolverUpdate(self.name, update.clone()));
        if let Some(f) = &self.funcs.resolver_update {
            return f(&mut self.data, update, config, channel_controller);
        }
        Ok(())
    }

    fn resolver_error(&mut self, error: Status, _channel_controller: &mut dyn ChannelController) {
        self.send(TestEvent::ResolverError(self.name, error));
    }

    fn subchannel_update(
        &mut self,
        subchannel: Arc<dyn Subchannel>,
        state: &SubchannelState,
        channel_controller: &mut dyn ChannelController,
    ) {
        self.send(TestEvent::SubchannelUpdate(
            self.name,
            state.connectivity_state,
        ));
        if let Some(f) = &self.funcs.subchannel_update {
            f(&mut self.data, subchannel, state, channel_controller);
        }
    }

    fn exit_idle(&mut self, _channel_controller: &mut dyn ChannelController) {
        self.send(TestEvent::ExitIdle(self.name));
    }

    fn work(&mut self, _channel_controller: &mut dyn ChannelController) {
        self.send(TestEvent::Work(self.name));
    }
}

impl Drop for StubPolicy {
    fn drop(&mut self) {
        self.send(TestEvent::Shutdown(self.name));
    }
}

/// This StubPolicyBuilder builds a StubPolicy.
pub(crate) struct StubPolicyBuilder {
    name: &'static str,
    funcs: StubPolicyFuncs,
    tx_events: Option<mpsc::UnboundedSender<TestEvent>>,
    fail_build: bool,
}

impl StubPolicyBuilder {
    /// A builder whose policies report nothing.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            funcs: StubPolicyFuncs::default(),
            tx_events: None,
            fail_build: false,
        }
    }

    /// A builder whose policies report their calls on `tx_events`.
    pub fn with_events(name: &'static str, tx_events: mpsc::UnboundedSender<TestEvent>) -> Self {
        Self {
            tx_events: Some(tx_events),
            ..Self::new(name)
        }
    }

    pub fn funcs(mut self, funcs: StubPolicyFuncs) -> Self {
        self.funcs = funcs;
        self
    }

    /// Makes every build call fail.
    pub fn failing(mut self) -> Self {
        self.fail_build = true;
        self
    }
}

impl LbPolicyBuilder for StubPolicyBuilder {
    fn build(&self, options: LbPolicyOptions) -> Result<Box<dyn LbPolicy>, LbError> {
        if self.fail_build {
            return Err(LbError::Build {
                name: self.name,
                source: "stub policy configured to fail".into(),
            });
        }
        if let Some(tx) = &self.tx_events {
            tx.send(TestEvent::Build(self.name)).unwrap();
        }
        Ok(Box::new(StubPolicy {
            name: self.name,
            funcs: self.funcs.clone(),
            data: StubPolicyData {
                test_data: None,
                work_scheduler: options.work_scheduler,
            },
            tx_events: self.tx_events.clone(),
        }))
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
