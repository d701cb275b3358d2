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

//! Load balancing policies for the gRPC client channel.
//!
//! The channel never talks to a concrete policy directly.  It builds an
//! [`auto_configured::AutoConfiguredPolicy`], which picks pick_first,
//! round_robin or grpclb from the [`registry`] based on each resolver update
//! and delegates to it.

pub mod auto_configured;
mod error;
pub mod registry;
pub mod selector;

#[cfg(test)]
pub(crate) mod test_utils;

use std::error::Error;
use std::fmt::{Debug, Display};
use std::sync::Arc;

use crate::client::name_resolution::{Address, ResolverUpdate};
use crate::client::service_config::LbConfig;
use crate::client::ConnectivityState;
use crate::service::Request;
use crate::status::Status;

pub use error::LbError;
pub use registry::LbPolicyRegistry;

/// The name of the pick_first LB policy, the channel default.
pub static PICK_FIRST_POLICY_NAME: &str = "pick_first";
/// The name of the round_robin LB policy.
pub static ROUND_ROBIN_POLICY_NAME: &str = "round_robin";
/// The name of the grpclb LB policy, used whenever the resolver reports
/// balancer addresses.
pub static GRPCLB_POLICY_NAME: &str = "grpclb";

/// A collection of data configured on the channel that is constructing this
/// LbPolicy.
#[derive(Clone)]
pub struct LbPolicyOptions {
    /// A hook into the channel's work scheduler that allows the LbPolicy to
    /// request the ability to perform operations on the ChannelController.
    pub work_scheduler: Arc<dyn WorkScheduler>,
}

/// Used to asynchronously request a call into the LbPolicy's work method if
/// the LbPolicy needs to provide an update without waiting for an update
/// from the channel first.
pub trait WorkScheduler: Send + Sync {
    // Schedules a call into the LbPolicy's work method.  If there is already a
    // pending work call that has not yet started, this may not schedule another
    // call.
    fn schedule_work(&self);
}

/// An LB policy factory that produces LbPolicy instances used by the channel
/// to manage connections and pick connections for RPCs.
///
/// Builders are shared as `Arc<dyn LbPolicyBuilder>`; two handles refer to the
/// same policy exactly when they point at the same builder.
pub trait LbPolicyBuilder: Send + Sync {
    /// Builds and returns a new LB policy instance.
    ///
    /// An LbPolicy instance is assumed to begin in a Connecting state that
    /// queues RPCs until its first update.  Configuration is delivered via the
    /// LbPolicy's resolver_update method, so most builders never fail.
    fn build(&self, options: LbPolicyOptions) -> Result<Box<dyn LbPolicy>, LbError>;

    /// Reports the name of the LB Policy.
    fn name(&self) -> &'static str;
}

/// An LB policy instance.
///
/// LB policies are responsible for creating connections (modeled as
/// Subchannels) and producing Picker instances for picking connections for
/// RPCs.
///
/// The channel calls every method serially.  Dropping a policy shuts it down:
/// it must release its subchannels and never touch the channel again.
pub trait LbPolicy: Send {
    /// Called by the channel when the name resolver produces a new set of
    /// resolved addresses or a new service config.
    fn resolver_update(
        &mut self,
        update: ResolverUpdate,
        config: Option<&LbConfig>,
        channel_controller: &mut dyn ChannelController,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Called by the channel when the name resolver fails to produce a result.
    fn resolver_error(&mut self, error: Status, channel_controller: &mut dyn ChannelController);

    /// Called by the channel when any subchannel created by the LB policy
    /// changes state.
    fn subchannel_update(
        &mut self,
        subchannel: Arc<dyn Subchannel>,
        state: &SubchannelState,
        channel_controller: &mut dyn ChannelController,
    );

    /// Called by the channel when an RPC is started while the policy reported
    /// Idle.  The policy should start connecting.
    fn exit_idle(&mut self, channel_controller: &mut dyn ChannelController);

    /// Called by the channel in response to a call from the LB policy to the
    /// WorkScheduler's schedule_work method.
    fn work(&mut self, channel_controller: &mut dyn ChannelController);
}

/// Controls channel behaviors.
pub trait ChannelController: Send + Sync {
    /// Creates a new subchannel in IDLE state.
    fn new_subchannel(&mut self, address: &Address) -> Arc<dyn Subchannel>;

    /// Provides a new snapshot of the LB policy's state to the channel.
    fn update_picker(&mut self, update: LbState);

    /// Signals the name resolver to attempt to re-resolve addresses.  Typically
    /// used when connections fail, indicating a possible change in the overall
    /// network configuration.
    fn request_resolution(&mut self);
}

/// Represents the current state of a Subchannel.
#[derive(Clone, Debug)]
pub struct SubchannelState {
    /// The connectivity state of the subchannel.
    pub connectivity_state: ConnectivityState,
    // Set if connectivity state is TransientFailure to describe the most recent
    // connection error.  None for any other connectivity_state value.
    pub last_connection_error: Option<Arc<dyn Error + Send + Sync>>,
}

impl SubchannelState {
    pub fn new(connectivity_state: ConnectivityState) -> Self {
        Self {
            connectivity_state,
            last_connection_error: None,
        }
    }
}

/// A Subchannel represents a method of communicating with a server which may be
/// connected or disconnected many times across its lifetime.
///
/// - Subchannels start IDLE.
///
/// - IDLE transitions to CONNECTING when connect() is called.
///
/// - CONNECTING transitions to READY on success or TRANSIENT_FAILURE on error.
///
/// - READY transitions to IDLE when the connection is lost.
///
/// - TRANSIENT_FAILURE transitions to CONNECTING when the reconnect backoff
///   timer has expired.
///
/// When a Subchannel is dropped, it is disconnected, and no subsequent state
/// updates will be provided for it to the LB policy.
pub trait Subchannel: Send + Sync + Debug {
    /// The address this subchannel connects to.
    fn address(&self) -> Address;

    /// Starts connecting if the subchannel is IDLE.
    fn connect(&self);
}

impl Display for dyn Subchannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Subchannel({})", self.address())
    }
}

/// A Picker is responsible for deciding what Subchannel to use for any given
/// request.  A Picker is only used once for any RPC.  If pick() returns Queue,
/// the channel will queue the RPC until a new Picker is produced by the
/// LbPolicy, and will call pick() on the new Picker for the request.
///
/// Pickers are always paired with a ConnectivityState which the channel will
/// expose to applications so they can predict what might happens when
/// performing RPCs:
///
/// If the ConnectivityState is Idle, the Picker should ensure connections are
/// initiated by the LbPolicy that produced the Picker, and return a Queue
/// result so the request is attempted the next time a Picker is produced.
///
/// If the ConnectivityState is Connecting, the Picker should return a Queue
/// result and continue to wait for pending connections.
///
/// If the ConnectivityState is Ready, the Picker should return a Ready
/// Subchannel.
///
/// If the ConnectivityState is TransientFailure, the Picker should return an
/// Err with an error that describes why connections are failing.
pub trait Picker: Send + Sync {
    /// Picks a connection to use for the request.
    ///
    /// This function should not block.  If the Picker needs to do blocking or
    /// time-consuming work to service this request, it should return Queue, and
    /// the Pick call will be repeated by the channel when a new Picker is
    /// produced by the LbPolicy.
    fn pick(&self, request: &Request) -> PickResult;
}

#[derive(Debug)]
pub enum PickResult {
    /// Indicates the Subchannel in the Pick should be used for the request.
    Pick(Pick),
    /// Indicates the LbPolicy is attempting to connect to a server to use for
    /// the request.
    Queue,
    /// Indicates that the request should fail with the included error status
    /// (with the code converted to UNAVAILABLE).  If the RPC is wait-for-ready,
    /// then it will not be terminated, but instead attempted on a new picker if
    /// one is produced before it is cancelled.
    Fail(Status),
    /// Indicates that the request should fail with the included status
    /// immediately, even if the RPC is wait-for-ready.
    Drop(Status),
}

impl PickResult {
    pub fn is_queue(&self) -> bool {
        matches!(self, PickResult::Queue)
    }
}

/// A collection of data used by the channel for routing a request.
#[derive(Debug)]
pub struct Pick {
    /// The Subchannel for the request.
    pub subchannel: Arc<dyn Subchannel>,
}

/// Data provided by the LB policy.
#[derive(Clone)]
pub struct LbState {
    pub connectivity_state: ConnectivityState,
    pub picker: Arc<dyn Picker>,
}

impl LbState {
    /// Returns a generic initial LbState which is Connecting and a picker which
    /// queues all picks.
    pub fn initial() -> Self {
        Self {
            connectivity_state: ConnectivityState::Connecting,
            picker: Arc::new(QueuingPicker {}),
        }
    }

    /// Returns a TransientFailure state whose picker fails every RPC with
    /// `error`.
    pub fn failing(error: Status) -> Self {
        Self {
            connectivity_state: ConnectivityState::TransientFailure,
            picker: Arc::new(FailingPicker { error }),
        }
    }
}

impl Debug for LbState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LbState({})", self.connectivity_state)
    }
}

/// QueuingPicker always returns Queue.  LB policies that are not actively
/// Connecting should not use this picker.
pub struct QueuingPicker {}

impl Picker for QueuingPicker {
    fn pick(&self, _request: &Request) -> PickResult {
        PickResult::Queue
    }
}

/// FailingPicker fails every RPC with the same status.
pub struct FailingPicker {
    pub error: Status,
}

impl Picker for FailingPicker {
    fn pick(&self, _request: &Request) -> PickResult {
        PickResult::Fail(self.error.clone())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::status::StatusCode;

    #[test]
    fn initial_state_queues() {
        let state = LbState::initial();
        assert_eq!(state.connectivity_state, ConnectivityState::Connecting);
        assert!(state.picker.pick(&Request::default()).is_queue());
    }

    #[test]
    fn failing_state_fails_picks() {
        let state = LbState::failing(Status::unavailable("no backends"));
        assert_eq!(
            state.connectivity_state,
            ConnectivityState::TransientFailure
        );
        match state.picker.pick(&Request::new("/svc/Method")) {
            PickResult::Fail(status) => {
                assert_eq!(status.code(), StatusCode::Unavailable);
                assert_eq!(status.message(), "no backends");
            }
            other => panic!("unexpected pick result: {other:?}"),
        }
    }
}
