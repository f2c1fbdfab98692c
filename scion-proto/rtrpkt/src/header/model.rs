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

//! Common header and address header models

use crate::{
    core::{
        encode::WireEncode,
        layout::Layout,
        read::bit_range_be_read,
        write::bit_range_be_write,
    },
    error::FormatError,
    header::layout::{AddressHeaderLayout, CommonHeaderLayout},
    types::{HostAddr, HostAddrType, IsdAsn, LINE_LEN, next_hdr},
};

/// Common header of a packet
///
/// The pointer fields are in lines from the start of the packet, as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommonHeader {
    /// Type of the destination host address
    pub dst_type: HostAddrType,
    /// Type of the source host address
    pub src_type: HostAddrType,
    /// Total packet length in bytes
    pub total_len: u16,
    /// Length of common, address and path header in lines
    pub hdr_len: u8,
    /// Line offset of the current info field
    pub curr_info_f: u8,
    /// Line offset of the current hop field
    pub curr_hop_f: u8,
    /// Tag of the section following the path
    pub next_hdr: u8,
}
impl CommonHeader {
    /// Supported version
    pub const VERSION: u8 = 0;

    /// Creates a common header for the given address types with every other field unset
    pub fn new(dst_type: HostAddrType, src_type: HostAddrType) -> Self {
        CommonHeader {
            dst_type,
            src_type,
            total_len: 0,
            hdr_len: 0,
            curr_info_f: 0,
            curr_hop_f: 0,
            next_hdr: next_hdr::L4_NONE,
        }
    }

    /// Decodes the common header from the start of `buf`
    ///
    /// Validates the version and both address types. Length fields are checked by the caller.
    pub fn decode(buf: &[u8]) -> Result<Self, FormatError> {
        use CommonHeaderLayout as CHL;

        let (buf, _rest) = CHL.split_off_checked(buf).ok_or(FormatError::BufferTooSmall {
            at: "CommonHeader",
            required: CHL::SIZE_BYTES,
            actual: buf.len(),
        })?;

        // Size is checked above, every field read below is inside `buf`
        let field = |range| bit_range_be_read::<u8>(buf, range).unwrap_or_default();

        let version = field(CHL::VERSION_RNG);
        if version != Self::VERSION {
            return Err(FormatError::UnsupportedVersion(version));
        }

        Ok(CommonHeader {
            dst_type: HostAddrType::try_from(field(CHL::DST_TYPE_RNG))?,
            src_type: HostAddrType::try_from(field(CHL::SRC_TYPE_RNG))?,
            total_len: bit_range_be_read(buf, CHL::TOTAL_LEN_RNG).unwrap_or_default(),
            hdr_len: field(CHL::HDR_LEN_RNG),
            curr_info_f: field(CHL::CURR_INFO_F_RNG),
            curr_hop_f: field(CHL::CURR_HOP_F_RNG),
            next_hdr: field(CHL::NEXT_HDR_RNG),
        })
    }

    /// Header length in bytes
    pub fn hdr_len_bytes(&self) -> usize {
        self.hdr_len as usize * LINE_LEN
    }

    /// Byte offset of the current info field from the packet start
    pub fn info_f_offset(&self) -> usize {
        self.curr_info_f as usize * LINE_LEN
    }

    /// Byte offset of the current hop field from the packet start
    pub fn hop_f_offset(&self) -> usize {
        self.curr_hop_f as usize * LINE_LEN
    }
}
impl WireEncode for CommonHeader {
    fn required_size(&self) -> usize {
        CommonHeaderLayout::SIZE_BYTES
    }

    fn encode_into(&self, buf: &mut [u8]) -> usize {
        use CommonHeaderLayout as CHL;

        bit_range_be_write(buf, CHL::VERSION_RNG, Self::VERSION);
        bit_range_be_write::<u8>(buf, CHL::DST_TYPE_RNG, self.dst_type.into());
        bit_range_be_write::<u8>(buf, CHL::SRC_TYPE_RNG, self.src_type.into());
        bit_range_be_write(buf, CHL::TOTAL_LEN_RNG, self.total_len);
        bit_range_be_write(buf, CHL::HDR_LEN_RNG, self.hdr_len);
        bit_range_be_write(buf, CHL::CURR_INFO_F_RNG, self.curr_info_f);
        bit_range_be_write(buf, CHL::CURR_HOP_F_RNG, self.curr_hop_f);
        bit_range_be_write(buf, CHL::NEXT_HDR_RNG, self.next_hdr);

        CHL::SIZE_BYTES
    }
}

/// Address header of a packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressHeader {
    /// Destination ISD-AS
    pub dst_ia: IsdAsn,
    /// Source ISD-AS
    pub src_ia: IsdAsn,
    /// Destination host address
    pub dst_host: HostAddr,
    /// Source host address
    pub src_host: HostAddr,
}
impl AddressHeader {
    /// Returns the layout of this address header
    pub fn layout(&self) -> AddressHeaderLayout {
        AddressHeaderLayout::new(self.dst_host.required_size(), self.src_host.required_size())
    }

    /// Decodes the address header from the start of `buf`, using the address types of the
    /// common header
    pub fn decode(
        buf: &[u8],
        dst_type: HostAddrType,
        src_type: HostAddrType,
    ) -> Result<Self, FormatError> {
        use AddressHeaderLayout as AHL;

        let layout = AHL::new(dst_type.size(), src_type.size());
        let (buf, _rest) = layout
            .split_off_checked(buf)
            .ok_or(FormatError::BufferTooSmall {
                at: "AddressHeader",
                required: layout.size_bytes(),
                actual: buf.len(),
            })?;

        Ok(AddressHeader {
            dst_ia: IsdAsn::from_u64(bit_range_be_read(buf, AHL::DST_IA_RNG).unwrap_or_default()),
            src_ia: IsdAsn::from_u64(bit_range_be_read(buf, AHL::SRC_IA_RNG).unwrap_or_default()),
            dst_host: HostAddr::decode(dst_type, &buf[layout.dst_host_range()])?,
            src_host: HostAddr::decode(src_type, &buf[layout.src_host_range()])?,
        })
    }
}
impl WireEncode for AddressHeader {
    fn required_size(&self) -> usize {
        self.layout().size_bytes()
    }

    fn encode_into(&self, buf: &mut [u8]) -> usize {
        use AddressHeaderLayout as AHL;

        let layout = self.layout();
        bit_range_be_write(buf, AHL::DST_IA_RNG, self.dst_ia.to_u64());
        bit_range_be_write(buf, AHL::SRC_IA_RNG, self.src_ia.to_u64());
        self.dst_host.encode_into(&mut buf[layout.dst_host_range()]);
        self.src_host.encode_into(&mut buf[layout.src_host_range()]);
        buf[layout.unpadded_len()..layout.size_bytes()].fill(0);

        layout.size_bytes()
    }
}
