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

//! Structured packet description
//!
//! [`ScnPkt`] is the protocol level view of a packet. The packet buffer is assembled from it
//! and can be converted back into it.

use bytes::Bytes;

use crate::{
    core::{encode::WireEncode, layout::Layout},
    error::PathError,
    extn::model::Extension,
    header::{layout::CommonHeaderLayout, model::AddressHeader},
    l4::{L4, L4Header},
    path::model::Path,
    types::{HostAddr, IsdAsn},
};

/// Structured description of a packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScnPkt {
    /// Destination ISD-AS
    pub dst_ia: IsdAsn,
    /// Source ISD-AS
    pub src_ia: IsdAsn,
    /// Destination host
    pub dst_host: HostAddr,
    /// Source host
    pub src_host: HostAddr,
    /// Forwarding path, None for AS-local packets
    pub path: Option<Path>,
    /// Hop-by-hop extensions in packet order
    pub hbh_ext: Vec<Extension>,
    /// End-to-end extensions in packet order
    pub e2e_ext: Vec<Extension>,
    /// Transport header
    pub l4: Option<L4>,
    /// Payload, None if empty
    pub payload: Option<Bytes>,
}
impl ScnPkt {
    /// Creates a description with addresses only
    pub fn new(dst_ia: IsdAsn, src_ia: IsdAsn, dst_host: HostAddr, src_host: HostAddr) -> Self {
        ScnPkt {
            dst_ia,
            src_ia,
            dst_host,
            src_host,
            path: None,
            hbh_ext: Vec::new(),
            e2e_ext: Vec::new(),
            l4: None,
            payload: None,
        }
    }

    /// Address header of the packet
    pub fn addr_header(&self) -> AddressHeader {
        AddressHeader {
            dst_ia: self.dst_ia,
            src_ia: self.src_ia,
            dst_host: self.dst_host,
            src_host: self.src_host,
        }
    }

    /// Length of the address header in bytes, including padding
    pub fn addr_len(&self) -> usize {
        self.addr_header().layout().size_bytes()
    }

    /// Length of common, address and path header in bytes
    pub fn hdr_len(&self) -> usize {
        CommonHeaderLayout::SIZE_BYTES
            + self.addr_len()
            + self.path.as_ref().map_or(0, |p| p.raw.len())
    }

    /// Encoded length of the whole packet in bytes
    pub fn total_len(&self) -> usize {
        self.hdr_len()
            + self
                .hbh_ext
                .iter()
                .chain(&self.e2e_ext)
                .map(WireEncode::required_size)
                .sum::<usize>()
            + self.l4.as_ref().map_or(0, WireEncode::required_size)
            + self.payload.as_ref().map_or(0, Bytes::len)
    }

    /// Turns the description around for a reply
    ///
    /// Swaps source and destination, reverses the path and turns the transport header around.
    pub fn reverse(&mut self) -> Result<(), PathError> {
        if let Some(path) = &mut self.path {
            path.reverse()?;
        }
        std::mem::swap(&mut self.dst_ia, &mut self.src_ia);
        std::mem::swap(&mut self.dst_host, &mut self.src_host);
        if let Some(l4) = &mut self.l4 {
            l4.reverse();
        }
        Ok(())
    }
}
