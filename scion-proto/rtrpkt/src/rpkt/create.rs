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

//! Assembly of a packet buffer from a packet description.

use tracing::trace;

use super::RtrPkt;
use crate::{
    context::{Dir, RouterContext},
    core::encode::{InvalidStructureError, WireEncode},
    error::RtrPktError,
    extn::model::{Extension, ExtnClass},
    header::{layout::CommonHeaderLayout, model::CommonHeader},
    l4::{L4, L4Header, checksum::l4_checksum},
    spkt::ScnPkt,
    types::LINE_LEN,
};

impl RtrPkt {
    /// Assembles a packet from its description.
    ///
    /// Sections are written in wire order: common header, address header, path, hop-by-hop
    /// extensions, end-to-end extensions, transport header and payload. The first failing
    /// section aborts the assembly.
    pub fn from_description(
        sp: &ScnPkt,
        dir_to: Dir,
        ctx: &RouterContext,
    ) -> Result<RtrPkt, RtrPktError> {
        let addr = sp.addr_header();
        let hdr_len = sp.hdr_len();
        let hdr_lines = u8::try_from(hdr_len / LINE_LEN)
            .map_err(|_| InvalidStructureError::from("header exceeds 255 lines"))?;

        let mut rp = RtrPkt::new(ctx.packet_config(), addr);
        rp.dir_to = dir_to;
        rp.cmn_hdr = CommonHeader {
            hdr_len: hdr_lines,
            ..CommonHeader::new(addr.dst_host.addr_type(), addr.src_host.addr_type())
        };
        rp.check_capacity("CommonHeader", CommonHeaderLayout::SIZE_BYTES)?;

        // Address header
        let layout = addr.layout();
        rp.encode_at("AddressHeader", CommonHeaderLayout::SIZE_BYTES, &addr)?;
        rp.idxs.set_addresses(&layout);

        // Path
        if let Some(path) = &sp.path {
            rp.encode_at("Path", rp.idxs.path, path)?;
            rp.cmn_hdr.curr_info_f = ((rp.idxs.path + path.inf_off) / LINE_LEN) as u8;
            rp.cmn_hdr.curr_hop_f = ((rp.idxs.path + path.hop_off) / LINE_LEN) as u8;
        }
        debug_assert_eq!(rp.idxs.path + sp.path.as_ref().map_or(0, |p| p.raw.len()), hdr_len);

        // Extensions
        let mut cursor = hdr_len;
        for extn in &sp.hbh_ext {
            cursor = rp.add_extn(cursor, ExtnClass::HopByHop, extn)?;
        }
        for extn in &sp.e2e_ext {
            cursor = rp.add_extn(cursor, ExtnClass::EndToEnd, extn)?;
        }
        rp.idxs.l4 = cursor;
        rp.idxs.pld = cursor;
        rp.len = cursor;

        // Transport header and payload
        if let Some(l4) = &sp.l4 {
            rp.set_l4(l4.clone())?;
        }
        rp.set_payload(sp.payload.as_deref())?;

        trace!(
            id = rp.id,
            path = rp.idxs.path,
            hbh = rp.idxs.extn.hbh().len(),
            e2e = rp.idxs.extn.e2e().len(),
            l4 = rp.idxs.l4,
            pld = rp.idxs.pld,
            len = rp.len,
            "Assembled packet"
        );
        Ok(rp)
    }

    fn add_extn(
        &mut self,
        cursor: usize,
        class: ExtnClass,
        extn: &Extension,
    ) -> Result<usize, RtrPktError> {
        let (end, link) = self.idxs.extn.append(&mut self.buf, cursor, class, extn)?;
        self.set_next_hdr(link, class.tag());
        Ok(end)
    }

    /// Sets the transport header.
    ///
    /// The header is written at the transport offset and the section before it, the last
    /// extension or the common header, is tagged with its protocol. The buffer is truncated to
    /// end with the transport header, dropping any payload.
    pub fn set_l4(&mut self, mut l4: L4) -> Result<(), RtrPktError> {
        l4.set_payload_len(0)?;
        let l4_len = self.encode_at("L4", self.idxs.l4, &l4)?;

        let tail = self.idxs.extn.tail();
        self.set_next_hdr(tail, l4.protocol());
        self.l4 = Some(l4);
        self.idxs.pld = self.idxs.l4 + l4_len;
        self.len = self.idxs.pld;
        self.update_l4();
        self.write_cmn_hdr();
        Ok(())
    }

    /// Sets or clears the payload.
    ///
    /// The payload is written behind the transport header and the buffer is truncated to end
    /// with it. Length and checksum of the transport header are recomputed.
    pub fn set_payload(&mut self, payload: Option<&[u8]>) -> Result<(), RtrPktError> {
        let payload = payload.unwrap_or_default();
        let end = self.idxs.pld + payload.len();
        self.check_capacity("Payload", end)?;
        if let Some(l4) = &mut self.l4 {
            l4.set_payload_len(payload.len())?;
        }

        self.buf[self.idxs.pld..end].copy_from_slice(payload);
        self.len = end;
        self.update_l4();
        self.write_cmn_hdr();
        Ok(())
    }

    /// Rewrites the transport header with a fresh checksum over the active payload.
    ///
    /// The length field must already match the payload.
    fn update_l4(&mut self) {
        let Some(l4) = &mut self.l4 else {
            return;
        };

        let l4_range = self.idxs.l4..self.idxs.pld;
        l4.set_checksum(0);
        l4.encode_into(&mut self.buf[l4_range.clone()]);

        let checksum = l4_checksum(
            &self.buf[CommonHeaderLayout::SIZE_BYTES..self.idxs.path],
            l4.protocol(),
            &self.buf[l4_range.clone()],
            &self.buf[self.idxs.pld..self.len],
        );
        l4.set_checksum(checksum);
        l4.encode_into(&mut self.buf[l4_range]);
    }
}
