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

use crate::{
    core::layout::Layout,
    extn::chain::ExtnChain,
    header::layout::{AddressHeaderLayout, CommonHeaderLayout},
};

/// Byte offsets of the sections of a packet, from the packet start.
///
/// Offsets are set once per section while the packet is assembled or parsed. Sections that are
/// absent have zero length, so their offset equals the offset of the following section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PacketIdxs {
    /// Destination ISD-AS
    pub dst_ia: usize,
    /// Source ISD-AS
    pub src_ia: usize,
    /// Destination host address
    pub dst_host: usize,
    /// Source host address
    pub src_host: usize,
    /// Path
    pub path: usize,
    /// Hop-by-hop and end-to-end extensions
    pub extn: ExtnChain,
    /// Transport header
    pub l4: usize,
    /// Payload
    pub pld: usize,
}
impl PacketIdxs {
    /// Sets the address offsets and the path offset from the address header layout
    pub(crate) fn set_addresses(&mut self, layout: &AddressHeaderLayout) {
        let base = CommonHeaderLayout::SIZE_BYTES;
        self.dst_ia = base + layout.dst_ia_offset();
        self.src_ia = base + layout.src_ia_offset();
        self.dst_host = base + layout.dst_host_range().start;
        self.src_host = base + layout.src_host_range().start;
        self.path = base + layout.size_bytes();
    }

    /// Offset of the first extension, if there is one
    pub fn first_extn(&self) -> Option<usize> {
        self.extn
            .hbh()
            .first()
            .or_else(|| self.extn.e2e().first())
            .map(|idx| idx.start)
    }
}
