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

//! The output of name resolution as seen by LB policies.
//!
//! Name Resolution is the process by which a channel's target is converted into
//! network addresses (typically IP addresses) used by the channel to connect to
//! a service.  Resolving is done elsewhere; this module only defines the
//! results the resolver hands to the channel.

use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};

use super::service_config::ServiceConfig;
use crate::attributes::Attributes;

/// Indicates the address is an IPv4 or IPv6 address that should be connected to
/// via TCP/IP.
pub static TCP_IP_NETWORK_TYPE: &str = "tcp";

/// Marks an address (or a whole endpoint) as a look-aside load balancer
/// speaking the grpclb protocol rather than a backend.  The value is the
/// authority to use when talking to that balancer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BalancerAddress {
    pub authority: String,
}

impl BalancerAddress {
    pub fn new(authority: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
        }
    }
}

#[derive(Clone, Debug)]
#[non_exhaustive]
/// ResolverUpdate contains the current Resolver state relevant to the
/// channel.
pub struct ResolverUpdate {
    /// Attributes contains arbitrary data about the resolver intended for
    /// consumption by the load balancing policy.
    pub attributes: Attributes,

    /// A list of endpoints which each identify a logical host serving the
    /// service indicated by the target URI.
    pub endpoints: Result<Vec<Endpoint>, String>,

    /// The service config which the client should use for communicating with
    /// the service. If it is None, it indicates no service config is present or
    /// the resolver does not provide service configs.
    pub service_config: Result<Option<ServiceConfig>, String>,

    /// An optional human-readable note describing context about the
    /// resolution, to be passed along to the LB policy for inclusion in
    /// RPC failure status messages in cases where neither endpoints nor
    /// service_config has a non-OK status.
    pub resolution_note: Option<String>,
}

impl ResolverUpdate {
    /// Creates an update with the given endpoints and no service config.
    pub fn new(endpoints: Vec<Endpoint>) -> Self {
        Self {
            endpoints: Ok(endpoints),
            ..Default::default()
        }
    }

    /// Sets the service config carried by this update.
    pub fn with_service_config(mut self, service_config: ServiceConfig) -> Self {
        self.service_config = Ok(Some(service_config));
        self
    }

    /// The endpoints of this update, or an empty slice if the resolver
    /// reported an error for them.
    pub fn endpoints_or_empty(&self) -> &[Endpoint] {
        self.endpoints.as_deref().unwrap_or_default()
    }
}

impl Default for ResolverUpdate {
    fn default() -> Self {
        ResolverUpdate {
            service_config: Ok(Default::default()),
            attributes: Default::default(),
            endpoints: Ok(Default::default()),
            resolution_note: Default::default(),
        }
    }
}

/// An Endpoint is an address or a collection of addresses which reference one
/// logical server.  Multiple addresses may be used if there are multiple ways
/// which the server can be reached, e.g. via IPv4 and IPv6 addresses.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Endpoint {
    /// Addresses contains a list of addresses used to access this endpoint.
    pub addresses: Vec<Address>,

    /// Attributes contains arbitrary data about this endpoint intended for
    /// consumption by the LB policy.
    pub attributes: Attributes,
}

impl Endpoint {
    pub fn new(addresses: Vec<Address>) -> Self {
        Self {
            addresses,
            attributes: Attributes::new(),
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Reports whether this endpoint, or any of its addresses, is flagged as a
    /// grpclb balancer.
    pub fn is_balancer(&self) -> bool {
        self.attributes.contains::<BalancerAddress>()
            || self
                .addresses
                .iter()
                .any(|a| a.attributes.contains::<BalancerAddress>())
    }
}

impl Hash for Endpoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addresses.hash(state);
    }
}

/// An Address is an identifier that indicates how to connect to a server.
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct Address {
    /// The network type is used to identify what kind of transport to create
    /// when connecting to this address.  Typically TCP_IP_NETWORK_TYPE.
    pub network_type: &'static str,

    /// The address itself is passed to the transport in order to create a
    /// connection to it.
    pub address: String,

    /// Attributes contains arbitrary data about this address intended for
    /// consumption by the subchannel.
    pub attributes: Attributes,
}

impl Address {
    /// Creates a TCP/IP address, e.g. `10.0.0.1:443`.
    pub fn tcp(address: impl Into<String>) -> Self {
        Self {
            network_type: TCP_IP_NETWORK_TYPE,
            address: address.into(),
            attributes: Attributes::new(),
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }
}

impl Eq for Address {}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.network_type == other.network_type && self.address == other.address
    }
}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.network_type.hash(state);
        self.address.hash(state);
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.network_type, self.address)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn balancer_flag_on_endpoint_or_address() {
        let plain = Endpoint::new(vec![Address::tcp("10.0.0.1:443")]);
        assert!(!plain.is_balancer());

        let flagged_endpoint = Endpoint::new(vec![Address::tcp("10.0.0.2:443")])
            .with_attributes(Attributes::new().add(BalancerAddress::new("lb.example.com")));
        assert!(flagged_endpoint.is_balancer());

        let flagged_address = Endpoint::new(vec![
            Address::tcp("10.0.0.3:443"),
            Address::tcp("10.0.0.4:443")
                .with_attributes(Attributes::new().add(BalancerAddress::new("lb.example.com"))),
        ]);
        assert!(flagged_address.is_balancer());
    }

    #[test]
    fn address_equality_ignores_attributes() {
        let a = Address::tcp("10.0.0.1:443");
        let b = Address::tcp("10.0.0.1:443").with_attributes(Attributes::new().add(1u8));
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "tcp:10.0.0.1:443");
    }

    #[test]
    fn endpoints_or_empty_on_error() {
        let update = ResolverUpdate {
            endpoints: Err("no DNS entries".to_string()),
            ..Default::default()
        };
        assert!(update.endpoints_or_empty().is_empty());

        let update = ResolverUpdate::new(vec![Endpoint::new(vec![Address::tcp("a:1")])]);
        assert_eq!(update.endpoints_or_empty().len(), 1);
    }
}
