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

//! Conversion of a packet buffer back into a packet description.

use bytes::Bytes;

use super::RtrPkt;
use crate::{
    error::RtrPktError,
    extn::{chain::ExtnIdx, model::Extension},
    header::model::AddressHeader,
    l4::L4,
    path::model::Path,
    spkt::ScnPkt,
};

impl RtrPkt {
    /// Decodes every section of the buffer into a packet description.
    ///
    /// An empty path section decodes to no path and an empty payload to no payload.
    pub fn to_description(&self) -> Result<ScnPkt, RtrPktError> {
        let raw = self.raw();
        let addr = AddressHeader::decode(
            &raw[self.idxs.dst_ia..],
            self.cmn_hdr.dst_type,
            self.cmn_hdr.src_type,
        )?;

        let hdr_end = self.cmn_hdr.hdr_len_bytes();
        let path = (hdr_end > self.idxs.path).then(|| {
            Path::new(
                Bytes::copy_from_slice(&raw[self.idxs.path..hdr_end]),
                self.cmn_hdr.info_f_offset().saturating_sub(self.idxs.path),
                self.cmn_hdr.hop_f_offset().saturating_sub(self.idxs.path),
            )
        });

        let decode_extns = |idxs: &[ExtnIdx]| {
            idxs.iter()
                .map(|idx| Extension::decode(&raw[idx.start..idx.end()]).map(|(extn, _)| extn))
                .collect::<Result<Vec<_>, _>>()
        };

        let l4_protocol = self.next_hdr(self.idxs.extn.tail());
        let l4 = L4::decode(l4_protocol, &raw[self.idxs.l4..self.idxs.pld])?;

        let payload = self.payload();

        Ok(ScnPkt {
            dst_ia: addr.dst_ia,
            src_ia: addr.src_ia,
            dst_host: addr.dst_host,
            src_host: addr.src_host,
            path,
            hbh_ext: decode_extns(self.idxs.extn.hbh())?,
            e2e_ext: decode_extns(self.idxs.extn.e2e())?,
            l4,
            payload: (!payload.is_empty()).then(|| Bytes::copy_from_slice(payload)),
        })
    }
}
