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

//! Access to the current path fields and in-place advancement of the path pointers.

use tracing::trace;

use super::RtrPkt;
use crate::{
    context::Dir,
    error::PathError,
    path::{
        model::{HopField, InfoField},
        ops::next_hop,
    },
    types::{IfId, LINE_LEN},
};

impl RtrPkt {
    /// Path section and the current info and hop field offsets relative to it
    fn path_section(&self) -> Result<(&[u8], usize, usize), PathError> {
        let end = self.cmn_hdr.hdr_len_bytes();
        if end <= self.idxs.path {
            return Err(PathError::NoPath);
        }

        let relative = |field: &'static str, off: usize| {
            off.checked_sub(self.idxs.path)
                .ok_or(PathError::UnreadableField { field, offset: off })
        };
        let inf_off = relative("info field", self.cmn_hdr.info_f_offset())?;
        let hop_off = relative("hop field", self.cmn_hdr.hop_f_offset())?;

        Ok((&self.raw()[self.idxs.path..end], inf_off, hop_off))
    }

    /// Current info field
    pub fn info_field(&self) -> Result<InfoField, PathError> {
        let (path, inf_off, _) = self.path_section()?;
        path.get(inf_off..)
            .and_then(InfoField::decode)
            .ok_or(PathError::UnreadableField {
                field: "info field",
                offset: inf_off,
            })
    }

    /// Current hop field
    pub fn hop_field(&self) -> Result<HopField, PathError> {
        let (path, _, hop_off) = self.path_section()?;
        path.get(hop_off..)
            .and_then(HopField::decode)
            .ok_or(PathError::UnreadableField {
                field: "hop field",
                offset: hop_off,
            })
    }

    /// Interface the packet is associated with at this router
    ///
    /// For packets from a neighboring AS this is the interface the packet arrived on, for all
    /// other packets the interface the current hop field sends it out on.
    pub fn if_curr(&self) -> Result<IfId, PathError> {
        let cons_dir = self.info_field()?.cons_dir();
        let hop = self.hop_field()?;
        Ok(match self.dir_from {
            Dir::External => hop.in_interface(cons_dir),
            Dir::SelfOrigin | Dir::Local => hop.out_interface(cons_dir),
        })
    }

    /// Advances the path pointers to the next hop field.
    ///
    /// Updates the common header in place and records that the path of this packet was
    /// advanced. Returns true if a segment boundary was crossed.
    pub fn inc_path(&mut self) -> Result<bool, PathError> {
        let (path, inf_off, hop_off) = self.path_section()?;
        let next = next_hop(path, inf_off, hop_off)?;

        self.cmn_hdr.curr_info_f = ((self.idxs.path + next.inf_off) / LINE_LEN) as u8;
        self.cmn_hdr.curr_hop_f = ((self.idxs.path + next.hop_off) / LINE_LEN) as u8;
        self.write_cmn_hdr();
        self.incremented_path = true;

        trace!(
            id = self.id,
            inf_off = next.inf_off,
            hop_off = next.hop_off,
            crossed_segment = next.crossed_segment,
            "Advanced path"
        );
        Ok(next.crossed_segment)
    }
}

#[cfg(test)]
mod path_tests {
    use std::net::Ipv4Addr;

    use super::*;
    use crate::{
        config::RouterConfig,
        context::RouterContext,
        path::model::{HopFieldFlags, InfoFieldFlags, Path, Segment},
        spkt::ScnPkt,
        types::{HostAddr, IsdAsn},
    };

    fn packet(path: Option<Path>, dir: Dir) -> RtrPkt {
        let ctx = RouterContext::new(RouterConfig::new(IsdAsn::new(1, 10)));
        let mut sp = ScnPkt::new(
            IsdAsn::new(1, 10),
            IsdAsn::new(2, 20),
            HostAddr::Ipv4(Ipv4Addr::new(10, 0, 0, 1)),
            HostAddr::Ipv4(Ipv4Addr::new(10, 0, 0, 2)),
        );
        sp.path = path;
        let rp = RtrPkt::from_description(&sp, Dir::SelfOrigin, &ctx).unwrap();
        RtrPkt::parse(rp.raw(), dir, None, &ctx).unwrap()
    }

    fn path() -> Path {
        let hop = |cons_ingress, cons_egress, flags| HopField {
            flags,
            cons_ingress,
            cons_egress,
            ..Default::default()
        };
        Path::from_segments(&[
            Segment::new(
                InfoField {
                    flags: InfoFieldFlags::CONS_DIR,
                    ..Default::default()
                },
                vec![
                    hop(0, 1, HopFieldFlags::empty()),
                    hop(2, 3, HopFieldFlags::XOVER),
                ],
            ),
            Segment::new(InfoField::default(), vec![hop(5, 4, HopFieldFlags::empty())]),
        ])
        .unwrap()
    }

    #[test_log::test]
    fn should_advance_pointers_in_buffer() {
        let mut rp = packet(Some(path()), Dir::External);
        assert!(!rp.incremented_path());
        assert_eq!(rp.if_curr(), Ok(0));

        assert_eq!(rp.inc_path(), Ok(false));
        assert!(rp.hop_field().unwrap().xover());
        assert_eq!(rp.if_curr(), Ok(2));

        assert_eq!(rp.inc_path(), Ok(true));
        assert!(!rp.info_field().unwrap().cons_dir());
        assert_eq!(rp.if_curr(), Ok(4));
        assert!(rp.incremented_path());

        // The pointers live in the buffer, not only in the decoded header
        let desc = rp.to_description().unwrap();
        let path = desc.path.unwrap();
        assert_eq!((path.inf_off, path.hop_off), (24, 32));

        assert_eq!(rp.inc_path(), Err(PathError::Exhausted(32)));
    }

    #[test]
    fn should_use_outbound_interface_for_local_packets() {
        let rp = packet(Some(path()), Dir::Local);
        assert_eq!(rp.if_curr(), Ok(1));
        assert_eq!(rp.arrival_interface(), None);
    }

    #[test]
    fn should_keep_arrival_interface_when_advancing() {
        let mut rp = packet(Some(path()), Dir::External);
        rp.inc_path().unwrap();
        assert_eq!(rp.if_curr(), Ok(2));
        assert_eq!(rp.arrival_interface(), Some(0));
    }

    #[test]
    fn should_report_missing_path() {
        let mut rp = packet(None, Dir::External);
        assert_eq!(rp.hop_field(), Err(PathError::NoPath));
        assert_eq!(rp.inc_path(), Err(PathError::NoPath));
        assert!(!rp.incremented_path());
    }
}
