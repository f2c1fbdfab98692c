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

//! Layouts of the common header and the address header
//!
//! See [`Layout`](crate::core::layout) for more information about layouts in general.

use std::ops::Range;

use crate::{
    core::layout::{BitRange, Layout, macros::gen_bitrange_const},
    types::LINE_LEN,
};

/// Layout of the common header
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |Version|  DstType  |  SrcType  |           TotalLen            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |    HdrLen     |   CurrInfoF   |   CurrHopF    |    NextHdr    |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommonHeaderLayout;
impl CommonHeaderLayout {
    /// Size of the common header in bytes
    pub const SIZE_BYTES: usize = 8;

    gen_bitrange_const!(VERSION_RNG, 0, 4);
    gen_bitrange_const!(DST_TYPE_RNG, 4, 6);
    gen_bitrange_const!(SRC_TYPE_RNG, 10, 6);
    gen_bitrange_const!(TOTAL_LEN_RNG, 16, 16);
    gen_bitrange_const!(HDR_LEN_RNG, 32, 8);
    gen_bitrange_const!(CURR_INFO_F_RNG, 40, 8);
    gen_bitrange_const!(CURR_HOP_F_RNG, 48, 8);
    gen_bitrange_const!(NEXT_HDR_RNG, 56, 8);
}
impl Layout for CommonHeaderLayout {
    fn size_bytes(&self) -> usize {
        Self::SIZE_BYTES
    }
}

/// Layout of the address header, relative to its own start
///
/// ```text
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |            DstISD             |                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+            DstAS              +
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |            SrcISD             |                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+            SrcAS              +
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                    DstHost (variable Len)                     |
/// |                    SrcHost (variable Len)                     |
/// |                    Padding to a line boundary                 |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressHeaderLayout {
    dst_host_len: usize,
    src_host_len: usize,
}
impl AddressHeaderLayout {
    /// Size of an ISD-AS field in bytes
    pub const IA_BYTES: usize = 8;

    gen_bitrange_const!(DST_IA_RNG, 0, 64);
    gen_bitrange_const!(SRC_IA_RNG, 64, 64);

    /// Creates the layout for the given host address sizes in bytes
    pub const fn new(dst_host_len: usize, src_host_len: usize) -> Self {
        Self {
            dst_host_len,
            src_host_len,
        }
    }

    /// Byte offset of the destination ISD-AS
    pub const fn dst_ia_offset(&self) -> usize {
        0
    }

    /// Byte offset of the source ISD-AS
    pub const fn src_ia_offset(&self) -> usize {
        Self::IA_BYTES
    }

    /// Byte range of the destination host address
    pub const fn dst_host_range(&self) -> Range<usize> {
        let start = 2 * Self::IA_BYTES;
        start..start + self.dst_host_len
    }

    /// Byte range of the source host address
    pub const fn src_host_range(&self) -> Range<usize> {
        let start = self.dst_host_range().end;
        start..start + self.src_host_len
    }

    /// Length of the address header without padding
    pub const fn unpadded_len(&self) -> usize {
        self.src_host_range().end
    }
}
impl Layout for AddressHeaderLayout {
    fn size_bytes(&self) -> usize {
        self.unpadded_len().next_multiple_of(LINE_LEN)
    }
}
