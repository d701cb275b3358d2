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

use std::error::Error;

/// Errors produced while selecting or constructing an LB policy.
#[derive(Debug, thiserror::Error)]
pub enum LbError {
    /// The named policy is not registered.
    #[error("LB policy {name:?} is not available")]
    PolicyNotAvailable { name: String },

    /// The resolver reported balancer addresses but the balancer protocol
    /// policy is not available.  The channel cannot route without it.
    #[error("balancer addresses were present but LB policy {name:?} is not available")]
    Configuration { name: String },

    /// The service config names a policy this channel does not recognize, or
    /// is malformed.
    #[error("invalid service config: {0}")]
    InvalidArgument(String),

    /// A builder failed to produce a policy instance.
    #[error("failed to build LB policy {name:?}")]
    Build {
        name: &'static str,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },

    /// The registry a builder was created against no longer exists.
    #[error("LB policy registry has been dropped")]
    RegistryDropped,
}
