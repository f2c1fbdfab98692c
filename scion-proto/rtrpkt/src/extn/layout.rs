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

//! Extension sub-header layout

use crate::core::layout::{BitRange, Layout, macros::gen_bitrange_const};

/// Layout of the extension sub-header, followed by the extension data
///
/// ```text
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |    NextHdr    |    HdrLen     |    ExtType    |     Data      |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// `HdrLen` is the length of the whole extension in lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtnSubHeaderLayout;
impl ExtnSubHeaderLayout {
    /// Size of the sub-header in bytes
    pub const SIZE_BYTES: usize = 3;
    /// Byte offset of the next header tag
    pub const NEXT_HDR_OFFSET: usize = 0;

    gen_bitrange_const!(NEXT_HDR_RNG, 0, 8);
    gen_bitrange_const!(HDR_LEN_RNG, 8, 8);
    gen_bitrange_const!(EXT_TYPE_RNG, 16, 8);
}
impl Layout for ExtnSubHeaderLayout {
    fn size_bytes(&self) -> usize {
        Self::SIZE_BYTES
    }
}
