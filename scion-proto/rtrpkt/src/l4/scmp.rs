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

//! SCMP header

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

/// Layout of the SCMP header
///
/// ```text
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |             Class             |             Type              |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |            Length             |           Checksum            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                           Timestamp                           |
/// +                                                               +
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScmpLayout;
impl ScmpLayout {
    /// Size of the SCMP header in bytes
    pub const SIZE_BYTES: usize = 16;

    gen_bitrange_const!(CLASS_RNG, 0, 16);
    gen_bitrange_const!(TYPE_RNG, 16, 16);
    gen_bitrange_const!(LEN_RNG, 32, 16);
    gen_bitrange_const!(CHECKSUM_RNG, 48, 16);
    gen_bitrange_const!(TIMESTAMP_RNG, 64, 64);
}
impl Layout for ScmpLayout {
    fn size_bytes(&self) -> usize {
        Self::SIZE_BYTES
    }
}

/// SCMP header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scmp {
    /// Message class
    pub class: u16,
    /// Message type within the class
    pub scmp_type: u16,
    /// Length of header and payload in bytes
    pub total_len: u16,
    /// Checksum
    pub checksum: u16,
    /// Creation time in microseconds since the Unix epoch
    pub timestamp: u64,
}
impl Scmp {
    /// Creates an SCMP header without payload
    pub fn new(class: u16, scmp_type: u16, timestamp: u64) -> Self {
        Scmp {
            class,
            scmp_type,
            total_len: ScmpLayout::SIZE_BYTES as u16,
            checksum: 0,
            timestamp,
        }
    }

    /// Decodes an SCMP header from the start of `buf`
    pub fn decode(buf: &[u8]) -> Result<Self, FormatError> {
        use ScmpLayout as SL;

        let (buf, _rest) = SL.split_off_checked(buf).ok_or(FormatError::BufferTooSmall {
            at: "Scmp",
            required: SL::SIZE_BYTES,
            actual: buf.len(),
        })?;
        let field = |range| bit_range_be_read::<u16>(buf, range).unwrap_or_default();

        Ok(Scmp {
            class: field(SL::CLASS_RNG),
            scmp_type: field(SL::TYPE_RNG),
            total_len: field(SL::LEN_RNG),
            checksum: field(SL::CHECKSUM_RNG),
            timestamp: bit_range_be_read(buf, SL::TIMESTAMP_RNG).unwrap_or_default(),
        })
    }
}
impl WireEncode for Scmp {
    fn required_size(&self) -> usize {
        ScmpLayout::SIZE_BYTES
    }

    fn encode_into(&self, buf: &mut [u8]) -> usize {
        use ScmpLayout as SL;

        bit_range_be_write(buf, SL::CLASS_RNG, self.class);
        bit_range_be_write(buf, SL::TYPE_RNG, self.scmp_type);
        bit_range_be_write(buf, SL::LEN_RNG, self.total_len);
        bit_range_be_write(buf, SL::CHECKSUM_RNG, self.checksum);
        bit_range_be_write(buf, SL::TIMESTAMP_RNG, self.timestamp);

        SL::SIZE_BYTES
    }
}
impl L4Header for Scmp {
    fn protocol(&self) -> u8 {
        next_hdr::SCMP
    }

    fn set_payload_len(&mut self, payload_len: usize) -> Result<(), InvalidStructureError> {
        self.total_len = u16::try_from(ScmpLayout::SIZE_BYTES + payload_len)
            .map_err(|_| InvalidStructureError::from("SCMP length exceeds 16 bits"))?;
        Ok(())
    }

    fn checksum(&self) -> u16 {
        self.checksum
    }

    fn set_checksum(&mut self, checksum: u16) {
        self.checksum = checksum;
    }
}

#[cfg(test)]
mod scmp_tests {
    use super::*;

    #[test]
    fn should_encode_timestamp_last() {
        let scmp = Scmp {
            class: 0,
            scmp_type: 2,
            total_len: 24,
            checksum: 0x1234,
            timestamp: 0x0102_0304_0506_0708,
        };

        let mut buf = [0u8; 16];
        assert_eq!(scmp.encode(&mut buf), Ok(16));
        assert_eq!(&buf[..8], &[0, 0, 0, 2, 0, 24, 0x12, 0x34]);
        assert_eq!(&buf[8..], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(Scmp::decode(&buf), Ok(scmp));
    }

    #[test]
    fn should_reject_truncated_header() {
        assert_eq!(
            Scmp::decode(&[0u8; 8]),
            Err(FormatError::BufferTooSmall {
                at: "Scmp",
                required: 16,
                actual: 8
            })
        );
    }
}
