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

//! Transport headers
//!
//! Every transport header reports its own length and protocol tag and keeps a length field and
//! a checksum that depend on the payload behind it. The packet buffer drives those updates
//! through [`L4Header`].

pub mod checksum;
pub mod scmp;
pub mod udp;

use crate::{
    core::encode::{InvalidStructureError, WireEncode},
    error::FormatError,
    l4::{scmp::Scmp, udp::Udp},
    types::next_hdr,
};

/// Contract of a transport header carried by a packet buffer.
pub trait L4Header: WireEncode {
    /// Protocol tag written into the preceding next header field
    fn protocol(&self) -> u8;

    /// Recomputes the internal length field for a payload of `payload_len` bytes
    fn set_payload_len(&mut self, payload_len: usize) -> Result<(), InvalidStructureError>;

    /// Returns the checksum field
    fn checksum(&self) -> u16;

    /// Sets the checksum field
    fn set_checksum(&mut self, checksum: u16);

    /// Turns the header around for a reply
    fn reverse(&mut self) {}
}

/// Transport header of a packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum L4 {
    /// UDP header
    Udp(Udp),
    /// SCMP header
    Scmp(Scmp),
}
impl L4 {
    /// Decodes the transport header named by `protocol` from the start of `buf`
    ///
    /// Returns None for [`next_hdr::L4_NONE`].
    pub fn decode(protocol: u8, buf: &[u8]) -> Result<Option<Self>, FormatError> {
        match protocol {
            next_hdr::L4_NONE => Ok(None),
            next_hdr::UDP => Ok(Some(L4::Udp(Udp::decode(buf)?))),
            next_hdr::SCMP => Ok(Some(L4::Scmp(Scmp::decode(buf)?))),
            other => Err(FormatError::UnknownProtocol(other)),
        }
    }

    fn inner(&self) -> &dyn L4Header {
        match self {
            L4::Udp(udp) => udp,
            L4::Scmp(scmp) => scmp,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn L4Header {
        match self {
            L4::Udp(udp) => udp,
            L4::Scmp(scmp) => scmp,
        }
    }
}
impl WireEncode for L4 {
    fn required_size(&self) -> usize {
        self.inner().required_size()
    }

    fn wire_valid(&self) -> Result<(), InvalidStructureError> {
        self.inner().wire_valid()
    }

    fn encode_into(&self, buf: &mut [u8]) -> usize {
        self.inner().encode_into(buf)
    }
}
impl L4Header for L4 {
    fn protocol(&self) -> u8 {
        self.inner().protocol()
    }

    fn set_payload_len(&mut self, payload_len: usize) -> Result<(), InvalidStructureError> {
        self.inner_mut().set_payload_len(payload_len)
    }

    fn checksum(&self) -> u16 {
        self.inner().checksum()
    }

    fn set_checksum(&mut self, checksum: u16) {
        self.inner_mut().set_checksum(checksum)
    }

    fn reverse(&mut self) {
        self.inner_mut().reverse()
    }
}
impl From<Udp> for L4 {
    fn from(udp: Udp) -> Self {
        L4::Udp(udp)
    }
}
impl From<Scmp> for L4 {
    fn from(scmp: Scmp) -> Self {
        L4::Scmp(scmp)
    }
}
