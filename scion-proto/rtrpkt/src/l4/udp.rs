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

//! UDP header

use crate::{
    core::{
        encode::{InvalidStructureError, WireEncode},
        layout::{BitRange, Layout, macros::gen_bitrange_const},
        read::bit_range_be_read,
        write::bit_range_be_write,
    },
    error::FormatError,
    l4::L4Header,
    types::next_hdr,
};

/// Layout of the UDP header
///
/// ```text
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |            SrcPort            |            DstPort            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |            Length             |           Checksum            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UdpLayout;
impl UdpLayout {
    /// Size of the UDP header in bytes
    pub const SIZE_BYTES: usize = 8;

    gen_bitrange_const!(SRC_PORT_RNG, 0, 16);
    gen_bitrange_const!(DST_PORT_RNG, 16, 16);
    gen_bitrange_const!(LEN_RNG, 32, 16);
    gen_bitrange_const!(CHECKSUM_RNG, 48, 16);
}
impl Layout for UdpLayout {
    fn size_bytes(&self) -> usize {
        Self::SIZE_BYTES
    }
}

/// UDP header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Udp {
    /// Source port
    pub src_port: u16,
    /// Destination port
    pub dst_port: u16,
    /// Length of header and payload in bytes
    pub total_len: u16,
    /// Checksum
    pub checksum: u16,
}
impl Udp {
    /// Creates a UDP header without payload
    pub fn new(src_port: u16, dst_port: u16) -> Self {
        Udp {
            src_port,
            dst_port,
            total_len: UdpLayout::SIZE_BYTES as u16,
            checksum: 0,
        }
    }

    /// Decodes a UDP header from the start of `buf`
    pub fn decode(buf: &[u8]) -> Result<Self, FormatError> {
        use UdpLayout as UL;

        let (buf, _rest) = UL.split_off_checked(buf).ok_or(FormatError::BufferTooSmall {
            at: "Udp",
            required: UL::SIZE_BYTES,
            actual: buf.len(),
        })?;
        let field = |range| bit_range_be_read::<u16>(buf, range).unwrap_or_default();

        Ok(Udp {
            src_port: field(UL::SRC_PORT_RNG),
            dst_port: field(UL::DST_PORT_RNG),
            total_len: field(UL::LEN_RNG),
            checksum: field(UL::CHECKSUM_RNG),
        })
    }
}
impl WireEncode for Udp {
    fn required_size(&self) -> usize {
        UdpLayout::SIZE_BYTES
    }

    fn encode_into(&self, buf: &mut [u8]) -> usize {
        use UdpLayout as UL;

        bit_range_be_write(buf, UL::SRC_PORT_RNG, self.src_port);
        bit_range_be_write(buf, UL::DST_PORT_RNG, self.dst_port);
        bit_range_be_write(buf, UL::LEN_RNG, self.total_len);
        bit_range_be_write(buf, UL::CHECKSUM_RNG, self.checksum);

        UL::SIZE_BYTES
    }
}
impl L4Header for Udp {
    fn protocol(&self) -> u8 {
        next_hdr::UDP
    }

    fn set_payload_len(&mut self, payload_len: usize) -> Result<(), InvalidStructureError> {
        self.total_len = u16::try_from(UdpLayout::SIZE_BYTES + payload_len)
            .map_err(|_| InvalidStructureError::from("UDP length exceeds 16 bits"))?;
        Ok(())
    }

    fn checksum(&self) -> u16 {
        self.checksum
    }

    fn set_checksum(&mut self, checksum: u16) {
        self.checksum = checksum;
    }

    fn reverse(&mut self) {
        std::mem::swap(&mut self.src_port, &mut self.dst_port);
    }
}

#[cfg(test)]
mod udp_tests {
    use super::*;

    #[test]
    fn should_encode_fields_in_order() {
        let udp = Udp {
            src_port: 0x1234,
            dst_port: 0x5678,
            total_len: 20,
            checksum: 0xbeef,
        };

        let mut buf = [0u8; 8];
        assert_eq!(udp.encode(&mut buf), Ok(8));
        assert_eq!(buf, [0x12, 0x34, 0x56, 0x78, 0, 20, 0xbe, 0xef]);
        assert_eq!(Udp::decode(&buf), Ok(udp));
    }

    #[test]
    fn should_reject_oversized_payload() {
        let mut udp = Udp::new(1, 2);
        assert!(udp.set_payload_len(u16::MAX as usize).is_err());
        assert!(udp.set_payload_len(u16::MAX as usize - 8).is_ok());
    }
}
