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

//! Parsing of received datagrams into a packet buffer.

use tracing::trace;

use super::RtrPkt;
use crate::{
    context::{Dir, Ingress, RouterContext},
    core::{encode::WireEncode, layout::Layout},
    error::{CapacityError, FormatError, RtrPktError},
    extn::{
        chain::ExtnIdx,
        model::{Extension, ExtnClass},
    },
    header::{
        layout::CommonHeaderLayout,
        model::{AddressHeader, CommonHeader},
    },
    l4::L4,
    types::LINE_LEN,
};

impl RtrPkt {
    /// Parses a received datagram.
    ///
    /// The datagram is copied into a new buffer and the same offsets are recorded that
    /// assembly would produce for it.
    pub fn parse(
        raw: &[u8],
        dir_from: Dir,
        ingress: Option<Ingress>,
        ctx: &RouterContext,
    ) -> Result<RtrPkt, RtrPktError> {
        let capacity = ctx.packet_config().capacity();
        if raw.len() > capacity {
            return Err(CapacityError {
                at: "Datagram",
                required: raw.len(),
                capacity,
            }
            .into());
        }

        let cmn_hdr = CommonHeader::decode(raw)?;
        if cmn_hdr.total_len as usize != raw.len() {
            return Err(FormatError::InvalidTotalLength {
                advertised: cmn_hdr.total_len as usize,
                actual: raw.len(),
            }
            .into());
        }

        let addr = AddressHeader::decode(
            &raw[CommonHeaderLayout::SIZE_BYTES..],
            cmn_hdr.dst_type,
            cmn_hdr.src_type,
        )?;
        let layout = addr.layout();
        let path_start = CommonHeaderLayout::SIZE_BYTES + layout.size_bytes();
        let hdr_end = cmn_hdr.hdr_len_bytes();
        if hdr_end < path_start {
            return Err(FormatError::InvalidHeaderLength {
                advertised: hdr_end,
                actual: path_start,
            }
            .into());
        }
        if hdr_end > raw.len() {
            return Err(FormatError::BufferTooSmall {
                at: "Path",
                required: hdr_end,
                actual: raw.len(),
            }
            .into());
        }
        if hdr_end > path_start {
            check_path_pointers(&cmn_hdr, path_start, hdr_end)?;
        }

        let mut rp = RtrPkt::new(ctx.packet_config(), addr);
        rp.buf[..raw.len()].copy_from_slice(raw);
        rp.len = raw.len();
        rp.cmn_hdr = cmn_hdr;
        rp.dir_from = dir_from;
        rp.ingress = ingress;
        rp.idxs.set_addresses(&layout);

        // Walk the extension chain
        let mut cursor = hdr_end;
        let mut next = cmn_hdr.next_hdr;
        while let Some(class) = ExtnClass::from_tag(next) {
            let (extn, extn_next) = Extension::decode(&raw[cursor..])?;
            let len = extn.required_size();
            rp.idxs.extn.push(
                class,
                ExtnIdx {
                    ext_type: extn.ext_type,
                    start: cursor,
                    len,
                },
            )?;
            cursor += len;
            next = extn_next;
        }

        rp.idxs.l4 = cursor;
        rp.l4 = L4::decode(next, &raw[cursor..])?;
        rp.idxs.pld = cursor + rp.l4.as_ref().map_or(0, WireEncode::required_size);

        if dir_from == Dir::External {
            rp.ifid_in = rp.if_curr().ok();
        }

        trace!(
            id = rp.id,
            dir_from = ?dir_from,
            len = rp.len,
            l4 = rp.idxs.l4,
            pld = rp.idxs.pld,
            "Parsed packet"
        );
        Ok(rp)
    }
}

/// Both path pointers must name a whole line inside the path, the info field first.
fn check_path_pointers(
    cmn_hdr: &CommonHeader,
    path_start: usize,
    hdr_end: usize,
) -> Result<(), FormatError> {
    let (info, hop) = (cmn_hdr.info_f_offset(), cmn_hdr.hop_f_offset());
    let inside = |off: usize| off >= path_start && off + LINE_LEN <= hdr_end;
    if !inside(info) || !inside(hop) || info >= hop {
        return Err(FormatError::InvalidPathPointers { info, hop });
    }
    Ok(())
}

#[cfg(test)]
mod parse_tests {
    use std::net::Ipv4Addr;

    use super::*;
    use crate::{
        config::RouterConfig,
        l4::udp::Udp,
        spkt::ScnPkt,
        types::{HostAddr, IsdAsn, next_hdr},
    };

    fn context() -> RouterContext {
        RouterContext::new(RouterConfig::new(IsdAsn::new(1, 10)))
    }

    fn assembled_pkt(ctx: &RouterContext) -> RtrPkt {
        let mut sp = ScnPkt::new(
            IsdAsn::new(1, 10),
            IsdAsn::new(2, 20),
            HostAddr::Ipv4(Ipv4Addr::new(10, 0, 0, 1)),
            HostAddr::Svc(1),
        );
        sp.hbh_ext.push(Extension::new(3, vec![1; 5]));
        sp.l4 = Some(Udp::new(7, 8).into());
        sp.payload = Some(bytes::Bytes::from_static(b"data"));

        RtrPkt::from_description(&sp, Dir::Local, ctx).unwrap()
    }

    fn assembled() -> Vec<u8> {
        assembled_pkt(&context()).raw().to_vec()
    }

    #[test_log::test]
    fn should_recover_assembly_offsets() {
        let ctx = context();
        let assembled = assembled_pkt(&ctx);

        let parsed = RtrPkt::parse(assembled.raw(), Dir::External, None, &ctx).unwrap();
        assert_eq!(parsed.idxs(), assembled.idxs());
        assert_eq!(parsed.common_header(), assembled.common_header());
        assert_eq!(parsed.l4(), assembled.l4());
        assert_eq!(parsed.payload(), b"data");
        assert_eq!(parsed.dir_from(), Dir::External);
        assert_eq!(parsed.common_header().next_hdr, next_hdr::HOP_BY_HOP);
    }

    #[test]
    fn should_reject_wrong_total_length() {
        let mut raw = assembled();
        raw.push(0);
        assert_eq!(
            RtrPkt::parse(&raw, Dir::External, None, &context()).unwrap_err(),
            RtrPktError::Format(FormatError::InvalidTotalLength {
                advertised: raw.len() - 1,
                actual: raw.len()
            })
        );
    }

    #[test]
    fn should_reject_unknown_protocol() {
        let mut raw = assembled();
        // next header byte of the hop-by-hop extension
        raw[32] = 6;
        assert_eq!(
            RtrPkt::parse(&raw, Dir::External, None, &context()).unwrap_err(),
            RtrPktError::Format(FormatError::UnknownProtocol(6))
        );
    }

    #[test]
    fn should_reject_unknown_address_type() {
        let mut raw = assembled();
        // dst type spans the low nibble of byte 0 and the top two bits of byte 1
        raw[0] |= 0b0000_0001;
        assert!(matches!(
            RtrPkt::parse(&raw, Dir::External, None, &context()),
            Err(RtrPktError::Format(FormatError::UnknownHostAddrType(_)))
        ));
    }

    #[test]
    fn should_reject_short_header_length() {
        let mut raw = assembled();
        raw[4] = 2;
        assert_eq!(
            RtrPkt::parse(&raw, Dir::External, None, &context()).unwrap_err(),
            RtrPktError::Format(FormatError::InvalidHeaderLength {
                advertised: 16,
                actual: 32
            })
        );
    }

    #[test]
    fn should_reject_truncated_datagram() {
        let raw = assembled();
        for len in 0..raw.len() {
            assert!(
                RtrPkt::parse(&raw[..len], Dir::External, None, &context()).is_err(),
                "truncated datagram of {len} bytes was accepted"
            );
        }
    }

    #[test]
    fn should_reject_oversized_datagram() {
        let mut config = RouterConfig::new(IsdAsn::new(1, 10));
        config.packet = crate::config::RtrPktConfig::new(32).unwrap();
        let ctx = RouterContext::new(config);

        assert_eq!(
            RtrPkt::parse(&assembled(), Dir::External, None, &ctx).unwrap_err(),
            RtrPktError::Capacity(CapacityError {
                at: "Datagram",
                required: 52,
                capacity: 32
            })
        );
    }
}
