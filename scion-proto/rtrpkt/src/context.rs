// Copyright 2026 Anapaya Systems
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Read-only router context and the packet direction and channel types it resolves.

use std::net::SocketAddr;

use crate::{
    config::{InterfaceConfig, RouterConfig, RtrPktConfig},
    error::ContextError,
    types::{IfId, IsdAsn},
};

/// Where a packet came from, or where it goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    /// Generated by the router itself
    #[default]
    SelfOrigin,
    /// An end host inside the local AS
    Local,
    /// A neighboring AS over an inter-domain link
    External,
}

/// Channel and addresses a packet was received on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ingress {
    /// Sender of the datagram
    pub src: SocketAddr,
    /// Local address the datagram was received on
    pub dst: SocketAddr,
    /// Index of the local channel, if received from the local AS
    pub loc_idx: usize,
    /// Interface, if received over an inter-domain link
    pub ifid: Option<IfId>,
}

/// Output channel of the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputChannel {
    /// Local facing socket, by local channel index
    Local(usize),
    /// Inter-domain interface
    External(IfId),
}

/// Output channel paired with the datagram destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EgressPair {
    /// Channel to send on
    pub channel: OutputChannel,
    /// Destination of the datagram
    pub dst: SocketAddr,
}

/// Router state shared read-only by all packets.
#[derive(Debug, Clone)]
pub struct RouterContext {
    config: RouterConfig,
}
impl RouterContext {
    /// Creates the context from the router configuration
    pub fn new(config: RouterConfig) -> Self {
        RouterContext { config }
    }

    /// ISD-AS of the router
    pub fn local_ia(&self) -> IsdAsn {
        self.config.local_ia
    }

    /// Packet buffer configuration
    pub fn packet_config(&self) -> &RtrPktConfig {
        &self.config.packet
    }

    /// Looks up an inter-domain interface
    pub fn interface(&self, ifid: IfId) -> Result<&InterfaceConfig, ContextError> {
        self.config
            .interfaces
            .get(&ifid)
            .ok_or(ContextError::UnknownInterface(ifid))
    }

    /// Pairs the external channel of `ifid` with the remote address of that interface
    pub fn external_egress(&self, ifid: IfId) -> Result<EgressPair, ContextError> {
        let intf = self.interface(ifid)?;
        Ok(EgressPair {
            channel: OutputChannel::External(ifid),
            dst: intf.remote_addr,
        })
    }

    /// Pairs the local channel `loc_idx` with `dst`
    pub fn local_egress(
        &self,
        loc_idx: usize,
        dst: SocketAddr,
    ) -> Result<EgressPair, ContextError> {
        if loc_idx >= self.config.local_outputs.len() {
            return Err(ContextError::UnknownLocalOutput(loc_idx));
        }
        Ok(EgressPair {
            channel: OutputChannel::Local(loc_idx),
            dst,
        })
    }
}

#[cfg(test)]
mod context_tests {
    use super::*;

    fn context() -> RouterContext {
        let mut config = RouterConfig::new(IsdAsn::new(1, 10));
        config.interfaces.insert(
            3,
            InterfaceConfig {
                remote_addr: "192.0.2.3:50000".parse().unwrap(),
            },
        );
        config.local_outputs.push("10.0.0.1:30041".parse().unwrap());
        RouterContext::new(config)
    }

    #[test]
    fn should_resolve_external_egress() {
        let ctx = context();
        assert_eq!(
            ctx.external_egress(3),
            Ok(EgressPair {
                channel: OutputChannel::External(3),
                dst: "192.0.2.3:50000".parse().unwrap(),
            })
        );
        assert_eq!(
            ctx.external_egress(4),
            Err(ContextError::UnknownInterface(4))
        );
    }

    #[test]
    fn should_resolve_local_egress() {
        let ctx = context();
        let dst = "10.0.0.9:40000".parse().unwrap();
        assert_eq!(
            ctx.local_egress(0, dst),
            Ok(EgressPair {
                channel: OutputChannel::Local(0),
                dst,
            })
        );
        assert_eq!(
            ctx.local_egress(1, dst),
            Err(ContextError::UnknownLocalOutput(1))
        );
    }
}
