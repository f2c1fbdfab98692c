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

//! Extension chain bookkeeping
//!
//! Hop-by-hop extensions directly follow the path, end-to-end extensions follow the hop-by-hop
//! ones. Every section names the next one through its next header tag, so appending a section
//! means filling in the tag of whatever was appended before it. The chain keeps the position of
//! that tag up to date while extensions are appended, instead of searching for it later.

use crate::{
    core::encode::WireEncode,
    error::{CapacityError, FormatError, RtrPktError},
    extn::{
        layout::ExtnSubHeaderLayout,
        model::{Extension, ExtnClass},
    },
};

/// Position of an extension inside a packet buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtnIdx {
    /// Extension type
    pub ext_type: u8,
    /// Offset of the extension from the packet start
    pub start: usize,
    /// Encoded length of the extension in bytes
    pub len: usize,
}
impl ExtnIdx {
    /// Offset of the next header tag of the extension
    pub fn next_hdr(&self) -> usize {
        self.start + ExtnSubHeaderLayout::NEXT_HDR_OFFSET
    }

    /// Offset of the first byte after the extension
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Location of a next header tag that has to be filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextHdrSlot {
    /// The next header field of the common header
    CommonHeader,
    /// The next header byte of an extension, at the given packet offset
    Extension(usize),
}

/// Both extension chains of a packet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtnChain {
    hbh: Vec<ExtnIdx>,
    e2e: Vec<ExtnIdx>,
    last: Option<usize>,
}
impl ExtnChain {
    /// Hop-by-hop extensions in packet order
    pub fn hbh(&self) -> &[ExtnIdx] {
        &self.hbh
    }

    /// End-to-end extensions in packet order
    pub fn e2e(&self) -> &[ExtnIdx] {
        &self.e2e
    }

    /// Slot that the section following the last extension links from
    pub fn tail(&self) -> NextHdrSlot {
        match self.last {
            Some(off) => NextHdrSlot::Extension(off),
            None => NextHdrSlot::CommonHeader,
        }
    }

    /// Encodes `extn` into `buf` at `cursor` and appends it to the chain of `class`.
    ///
    /// The extension is written with a placeholder next header tag. Returns the end of the
    /// extension and the slot that must be set to `class.tag()`.
    pub fn append(
        &mut self,
        buf: &mut [u8],
        cursor: usize,
        class: ExtnClass,
        extn: &Extension,
    ) -> Result<(usize, NextHdrSlot), RtrPktError> {
        self.check_order(class)?;
        extn.wire_valid()?;

        let end = cursor + extn.required_size();
        if end > buf.len() {
            return Err(CapacityError {
                at: "Extension",
                required: end,
                capacity: buf.len(),
            }
            .into());
        }
        let len = extn.encode_into(&mut buf[cursor..end]);

        let link = self.push(
            class,
            ExtnIdx {
                ext_type: extn.ext_type,
                start: cursor,
                len,
            },
        )?;
        Ok((end, link))
    }

    /// Records an extension that is already present in the buffer.
    ///
    /// Returns the slot that links to it.
    pub fn push(&mut self, class: ExtnClass, idx: ExtnIdx) -> Result<NextHdrSlot, FormatError> {
        self.check_order(class)?;

        let link = self.tail();
        match class {
            ExtnClass::HopByHop => self.hbh.push(idx),
            ExtnClass::EndToEnd => self.e2e.push(idx),
        }
        self.last = Some(idx.next_hdr());
        Ok(link)
    }

    fn check_order(&self, class: ExtnClass) -> Result<(), FormatError> {
        if class == ExtnClass::HopByHop && !self.e2e.is_empty() {
            return Err(FormatError::ExtensionOrder);
        }
        Ok(())
    }
}
