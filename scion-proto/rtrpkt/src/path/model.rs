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

//! Path models

use bytes::{Bytes, BytesMut};

use crate::{
    core::{
        encode::{InvalidStructureError, WireEncode},
        layout::Layout,
        read::bit_range_be_read,
        write::bit_range_be_write,
    },
    error::PathError,
    path::layout::{HopFieldLayout, InfoFieldLayout},
    types::{IfId, LINE_LEN},
};

bitflags::bitflags! {
    /// InfoField flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct InfoFieldFlags: u8 {
        /// Hop fields are arranged in the direction they were constructed during beaconing.
        const CONS_DIR = 0b0000_0001;
        /// The path is a shortcut path.
        const SHORTCUT = 0b0000_0010;
        /// The path is a peering path.
        const PEER = 0b0000_0100;

        // Other bits are reserved.
        const _ = !0;
    }
}

bitflags::bitflags! {
    /// HopField flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct HopFieldFlags: u8 {
        /// The hop field marks the boundary between two segments.
        const XOVER = 0b0000_0001;
        /// The hop field is only used for MAC verification and never becomes current.
        const VERIFY_ONLY = 0b0000_0010;

        // Other bits are reserved.
        const _ = !0;
    }
}

/// Info field, the head of a path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InfoField {
    /// Segment flags
    pub flags: InfoFieldFlags,
    /// Segment creation timestamp
    pub timestamp: u32,
    /// ISD the segment was created in
    pub isd: u16,
    /// Number of hop fields in the segment
    pub hops: u8,
}
impl InfoField {
    /// Decodes an info field from the start of `buf`
    ///
    /// Returns None if the buffer is too small
    pub fn decode(buf: &[u8]) -> Option<Self> {
        use InfoFieldLayout as IFL;

        let (buf, _rest) = IFL.split_off_checked(buf)?;
        Some(InfoField {
            flags: InfoFieldFlags::from_bits_retain(bit_range_be_read(buf, IFL::FLAGS_RNG)?),
            timestamp: bit_range_be_read(buf, IFL::TIMESTAMP_RNG)?,
            isd: bit_range_be_read(buf, IFL::ISD_RNG)?,
            hops: bit_range_be_read(buf, IFL::HOPS_RNG)?,
        })
    }

    /// True if the segment is traversed in construction direction
    pub fn cons_dir(&self) -> bool {
        self.flags.contains(InfoFieldFlags::CONS_DIR)
    }
}
impl WireEncode for InfoField {
    fn required_size(&self) -> usize {
        InfoFieldLayout::SIZE_BYTES
    }

    fn encode_into(&self, buf: &mut [u8]) -> usize {
        use InfoFieldLayout as IFL;

        buf[..IFL::SIZE_BYTES].fill(0);
        bit_range_be_write(buf, IFL::FLAGS_RNG, self.flags.bits());
        bit_range_be_write(buf, IFL::TIMESTAMP_RNG, self.timestamp);
        bit_range_be_write(buf, IFL::ISD_RNG, self.isd);
        bit_range_be_write(buf, IFL::HOPS_RNG, self.hops);

        IFL::SIZE_BYTES
    }
}

/// Hop field, one forwarding hop of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HopField {
    /// Hop flags
    pub flags: HopFieldFlags,
    /// Expiration time relative to the info field timestamp
    pub exp_time: u8,
    /// Ingress interface in construction direction (12 bits)
    pub cons_ingress: IfId,
    /// Egress interface in construction direction (12 bits)
    pub cons_egress: IfId,
    /// Truncated MAC
    pub mac: [u8; 3],
}
impl HopField {
    /// Largest interface identifier a hop field can carry
    pub const MAX_IFID: IfId = HopFieldLayout::CONS_INGRESS_RNG.max_uint() as IfId;

    /// Decodes a hop field from the start of `buf`
    ///
    /// Returns None if the buffer is too small
    pub fn decode(buf: &[u8]) -> Option<Self> {
        use HopFieldLayout as HFL;

        let (buf, _rest) = HFL.split_off_checked(buf)?;
        let mac: u32 = bit_range_be_read(buf, HFL::MAC_RNG)?;
        let [_, mac @ ..] = mac.to_be_bytes();
        Some(HopField {
            flags: HopFieldFlags::from_bits_retain(bit_range_be_read(buf, HFL::FLAGS_RNG)?),
            exp_time: bit_range_be_read(buf, HFL::EXP_TIME_RNG)?,
            cons_ingress: bit_range_be_read(buf, HFL::CONS_INGRESS_RNG)?,
            cons_egress: bit_range_be_read(buf, HFL::CONS_EGRESS_RNG)?,
            mac,
        })
    }

    /// True if the hop field is a crossover point
    pub fn xover(&self) -> bool {
        self.flags.contains(HopFieldFlags::XOVER)
    }

    /// True if the hop field is only used for verification
    pub fn verify_only(&self) -> bool {
        self.flags.contains(HopFieldFlags::VERIFY_ONLY)
    }

    /// Interface a packet leaves through when traversing this hop
    pub fn out_interface(&self, cons_dir: bool) -> IfId {
        if cons_dir {
            self.cons_egress
        } else {
            self.cons_ingress
        }
    }

    /// Interface a packet arrives on when traversing this hop
    pub fn in_interface(&self, cons_dir: bool) -> IfId {
        if cons_dir {
            self.cons_ingress
        } else {
            self.cons_egress
        }
    }
}
impl WireEncode for HopField {
    fn required_size(&self) -> usize {
        HopFieldLayout::SIZE_BYTES
    }

    fn wire_valid(&self) -> Result<(), InvalidStructureError> {
        if self.cons_ingress > Self::MAX_IFID || self.cons_egress > Self::MAX_IFID {
            return Err("hop field interface exceeds 12 bits".into());
        }
        Ok(())
    }

    fn encode_into(&self, buf: &mut [u8]) -> usize {
        use HopFieldLayout as HFL;

        let [a, b, c] = self.mac;
        bit_range_be_write(buf, HFL::FLAGS_RNG, self.flags.bits());
        bit_range_be_write(buf, HFL::EXP_TIME_RNG, self.exp_time);
        bit_range_be_write(buf, HFL::CONS_INGRESS_RNG, self.cons_ingress);
        bit_range_be_write(buf, HFL::CONS_EGRESS_RNG, self.cons_egress);
        bit_range_be_write(buf, HFL::MAC_RNG, u32::from_be_bytes([0, a, b, c]));

        HFL::SIZE_BYTES
    }
}

/// A path segment: one info field followed by its hop fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Info field of the segment
    pub info: InfoField,
    /// Hop fields of the segment
    pub hops: Vec<HopField>,
}
impl Segment {
    /// Creates a segment, setting the hop count of the info field
    pub fn new(mut info: InfoField, hops: Vec<HopField>) -> Self {
        info.hops = hops.len() as u8;
        Segment { info, hops }
    }
}
impl WireEncode for Segment {
    fn required_size(&self) -> usize {
        InfoFieldLayout::SIZE_BYTES + self.hops.len() * HopFieldLayout::SIZE_BYTES
    }

    fn wire_valid(&self) -> Result<(), InvalidStructureError> {
        if self.hops.is_empty() || self.hops.len() > u8::MAX as usize {
            return Err("segment must have between 1 and 255 hop fields".into());
        }
        if self.info.hops as usize != self.hops.len() {
            return Err("info field hop count does not match hop fields".into());
        }
        self.hops.iter().try_for_each(WireEncode::wire_valid)
    }

    fn encode_into(&self, buf: &mut [u8]) -> usize {
        let mut off = self.info.encode_into(buf);
        for hop in &self.hops {
            off += hop.encode_into(&mut buf[off..]);
        }
        off
    }
}

/// Raw path with pointers to the current info field and hop field.
///
/// Offsets are in bytes, relative to the start of the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    /// Encoded path
    pub raw: Bytes,
    /// Offset of the current info field
    pub inf_off: usize,
    /// Offset of the current hop field
    pub hop_off: usize,
}
impl Path {
    /// Creates a path from its raw bytes and pointers
    pub fn new(raw: Bytes, inf_off: usize, hop_off: usize) -> Self {
        Path {
            raw,
            inf_off,
            hop_off,
        }
    }

    /// Encodes the segments into a path pointing at the first hop of the first segment
    pub fn from_segments(segments: &[Segment]) -> Result<Self, InvalidStructureError> {
        if segments.is_empty() {
            return Err("path without segments".into());
        }
        segments.iter().try_for_each(WireEncode::wire_valid)?;

        let len = segments.iter().map(WireEncode::required_size).sum();
        let mut raw = BytesMut::zeroed(len);
        let mut off = 0;
        for segment in segments {
            off += segment.encode_into(&mut raw[off..]);
        }

        Ok(Path::new(raw.freeze(), 0, InfoFieldLayout::SIZE_BYTES))
    }

    /// Decodes the raw path into its segments
    pub fn segments(&self) -> Result<Vec<Segment>, PathError> {
        let mut segments = Vec::new();
        let mut off = 0;
        while off < self.raw.len() {
            let info = InfoField::decode(&self.raw[off..])
                .ok_or(PathError::Malformed("truncated info field"))?;
            if info.hops == 0 {
                return Err(PathError::Malformed("segment without hop fields"));
            }

            let hops_start = off + InfoFieldLayout::SIZE_BYTES;
            let end = hops_start + info.hops as usize * HopFieldLayout::SIZE_BYTES;
            let hops_buf = self
                .raw
                .get(hops_start..end)
                .ok_or(PathError::Malformed("truncated segment"))?;
            let hops = hops_buf
                .chunks_exact(HopFieldLayout::SIZE_BYTES)
                .filter_map(HopField::decode)
                .collect();

            segments.push(Segment { info, hops });
            off = end;
        }
        Ok(segments)
    }

    /// Returns the current info field
    pub fn info_field(&self) -> Result<InfoField, PathError> {
        self.raw
            .get(self.inf_off..)
            .and_then(InfoField::decode)
            .ok_or(PathError::UnreadableField {
                field: "info field",
                offset: self.inf_off,
            })
    }

    /// Returns the current hop field
    pub fn hop_field(&self) -> Result<HopField, PathError> {
        self.raw
            .get(self.hop_off..)
            .and_then(HopField::decode)
            .ok_or(PathError::UnreadableField {
                field: "hop field",
                offset: self.hop_off,
            })
    }
}
impl WireEncode for Path {
    fn required_size(&self) -> usize {
        self.raw.len()
    }

    fn wire_valid(&self) -> Result<(), InvalidStructureError> {
        if !self.raw.len().is_multiple_of(LINE_LEN) {
            return Err("path length is not a multiple of a line".into());
        }
        if !self.inf_off.is_multiple_of(LINE_LEN) || !self.hop_off.is_multiple_of(LINE_LEN) {
            return Err("path pointers are not line aligned".into());
        }
        if self.raw.is_empty() || self.inf_off >= self.hop_off || self.hop_off >= self.raw.len() {
            return Err("path pointers outside of path".into());
        }
        Ok(())
    }

    fn encode_into(&self, buf: &mut [u8]) -> usize {
        buf[..self.raw.len()].copy_from_slice(&self.raw);
        self.raw.len()
    }
}

#[cfg(test)]
mod model_tests {
    use super::*;

    fn hop(cons_ingress: IfId, cons_egress: IfId) -> HopField {
        HopField {
            cons_ingress,
            cons_egress,
            mac: [1, 2, 3],
            ..Default::default()
        }
    }

    #[test]
    fn should_encode_hop_field_interfaces() {
        let hop = HopField {
            flags: HopFieldFlags::XOVER,
            exp_time: 0x3f,
            cons_ingress: 0x123,
            cons_egress: 0x456,
            mac: [0xaa, 0xbb, 0xcc],
        };

        let mut buf = [0u8; 8];
        assert_eq!(hop.encode(&mut buf), Ok(8));
        assert_eq!(buf, [0x01, 0x3f, 0x12, 0x34, 0x56, 0xaa, 0xbb, 0xcc]);
        assert_eq!(HopField::decode(&buf), Some(hop));
    }

    #[test]
    fn should_reject_wide_interface() {
        let mut buf = [0u8; 8];
        assert!(hop(0x1000, 1).encode(&mut buf).is_err());
    }

    #[test]
    fn should_pick_interfaces_by_direction() {
        let hop = hop(3, 4);
        assert_eq!(hop.out_interface(true), 4);
        assert_eq!(hop.out_interface(false), 3);
        assert_eq!(hop.in_interface(true), 3);
        assert_eq!(hop.in_interface(false), 4);
    }

    #[test]
    fn should_decode_segments() {
        let segments = vec![
            Segment::new(
                InfoField {
                    flags: InfoFieldFlags::CONS_DIR,
                    timestamp: 7,
                    isd: 1,
                    hops: 0,
                },
                vec![hop(0, 1), hop(2, 0)],
            ),
            Segment::new(InfoField::default(), vec![hop(5, 0)]),
        ];

        let path = Path::from_segments(&segments).unwrap();
        assert_eq!(path.raw.len(), 40);
        assert_eq!((path.inf_off, path.hop_off), (0, 8));
        assert_eq!(path.segments().unwrap(), segments);
        assert_eq!(path.hop_field().unwrap(), hop(0, 1));
    }

    #[test]
    fn should_reject_truncated_segment() {
        let path = Path::from_segments(&[Segment::new(
            InfoField::default(),
            vec![hop(1, 2), hop(3, 4)],
        )])
        .unwrap();
        let truncated = Path::new(path.raw.slice(..16), 0, 8);
        assert_eq!(
            truncated.segments(),
            Err(PathError::Malformed("truncated segment"))
        );
    }
}
