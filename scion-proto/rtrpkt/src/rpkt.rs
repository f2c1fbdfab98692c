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

//! Router packet buffer
//!
//! An [`RtrPkt`] owns one fixed-capacity byte buffer, the offsets of every section inside it
//! and decoded copies of the fields the router works with. The active length grows and shrinks
//! inside the buffer, it is never reallocated.
//!
//! After every successful public operation the total length field of the common header equals
//! the active length, and every offset in [`PacketIdxs`] lies inside the active buffer.

mod create;
mod extract;
mod indexes;
mod parse;
mod path;

pub use indexes::PacketIdxs;

use crate::{
    config::RtrPktConfig,
    context::{Dir, EgressPair, Ingress},
    core::encode::WireEncode,
    error::{CapacityError, RtrPktError},
    extn::chain::NextHdrSlot,
    header::{
        layout::CommonHeaderLayout,
        model::{AddressHeader, CommonHeader},
    },
    l4::L4,
    types::{HostAddr, IfId, IsdAsn},
};

/// Packet buffer of the router.
#[derive(Debug, Clone)]
pub struct RtrPkt {
    buf: Box<[u8]>,
    len: usize,
    idxs: PacketIdxs,
    cmn_hdr: CommonHeader,
    addr: AddressHeader,
    l4: Option<L4>,
    dir_from: Dir,
    dir_to: Dir,
    ingress: Option<Ingress>,
    incremented_path: bool,
    ifid_in: Option<IfId>,
    egress: Vec<EgressPair>,
    id: u32,
}
impl RtrPkt {
    fn new(config: &RtrPktConfig, addr: AddressHeader) -> Self {
        RtrPkt {
            buf: vec![0u8; config.capacity()].into_boxed_slice(),
            len: 0,
            idxs: PacketIdxs::default(),
            cmn_hdr: CommonHeader::new(addr.dst_host.addr_type(), addr.src_host.addr_type()),
            addr,
            l4: None,
            dir_from: Dir::SelfOrigin,
            dir_to: Dir::SelfOrigin,
            ingress: None,
            incremented_path: false,
            ifid_in: None,
            egress: Vec::new(),
            id: rand::random(),
        }
    }

    /// Active bytes of the packet
    pub fn raw(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Active length in bytes
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if no bytes are active
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Capacity of the buffer in bytes
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Random identifier of the packet, used in logs
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Section offsets
    pub fn idxs(&self) -> &PacketIdxs {
        &self.idxs
    }

    /// Common header as last written to the buffer
    pub fn common_header(&self) -> &CommonHeader {
        &self.cmn_hdr
    }

    /// Destination ISD-AS
    pub fn dst_ia(&self) -> IsdAsn {
        self.addr.dst_ia
    }

    /// Source ISD-AS
    pub fn src_ia(&self) -> IsdAsn {
        self.addr.src_ia
    }

    /// Destination host
    pub fn dst_host(&self) -> HostAddr {
        self.addr.dst_host
    }

    /// Source host
    pub fn src_host(&self) -> HostAddr {
        self.addr.src_host
    }

    /// Transport header
    pub fn l4(&self) -> Option<&L4> {
        self.l4.as_ref()
    }

    /// Payload bytes, empty if there is no payload
    pub fn payload(&self) -> &[u8] {
        &self.buf[self.idxs.pld..self.len]
    }

    /// Direction the packet came from
    pub fn dir_from(&self) -> Dir {
        self.dir_from
    }

    /// Direction the packet is going to
    pub fn dir_to(&self) -> Dir {
        self.dir_to
    }

    /// Channel the packet was received on
    pub fn ingress(&self) -> Option<&Ingress> {
        self.ingress.as_ref()
    }

    /// True if the path pointer of this packet was advanced
    pub fn incremented_path(&self) -> bool {
        self.incremented_path
    }

    /// Interface a packet from a neighboring AS arrived on
    ///
    /// Taken from the ingress binding, or else from the hop field that was current when the
    /// packet was parsed. Advancing the path does not change it.
    pub fn arrival_interface(&self) -> Option<IfId> {
        if self.dir_from != Dir::External {
            return None;
        }
        self.ingress.and_then(|ingress| ingress.ifid).or(self.ifid_in)
    }

    /// Queued egress targets
    pub fn egress(&self) -> &[EgressPair] {
        &self.egress
    }

    pub(crate) fn push_egress(&mut self, egress: EgressPair) {
        self.egress.push(egress);
    }

    fn check_capacity(&self, at: &'static str, required: usize) -> Result<(), CapacityError> {
        if required > self.buf.len() {
            return Err(CapacityError {
                at,
                required,
                capacity: self.buf.len(),
            });
        }
        Ok(())
    }

    /// Encodes `item` at `off` and returns its length. Does not move the active length.
    fn encode_at<E: WireEncode>(
        &mut self,
        at: &'static str,
        off: usize,
        item: &E,
    ) -> Result<usize, RtrPktError> {
        item.wire_valid()?;
        let end = off + item.required_size();
        self.check_capacity(at, end)?;
        Ok(item.encode_into(&mut self.buf[off..end]))
    }

    fn next_hdr(&self, slot: NextHdrSlot) -> u8 {
        match slot {
            NextHdrSlot::CommonHeader => self.cmn_hdr.next_hdr,
            NextHdrSlot::Extension(off) => self.buf[off],
        }
    }

    fn set_next_hdr(&mut self, slot: NextHdrSlot, tag: u8) {
        match slot {
            NextHdrSlot::CommonHeader => self.cmn_hdr.next_hdr = tag,
            NextHdrSlot::Extension(off) => self.buf[off] = tag,
        }
    }

    /// Syncs the total length and writes the common header into the buffer
    fn write_cmn_hdr(&mut self) {
        debug_assert!(self.len <= u16::MAX as usize);
        self.cmn_hdr.total_len = self.len as u16;
        self.cmn_hdr.encode_into(&mut self.buf[..CommonHeaderLayout::SIZE_BYTES]);
    }
}
