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

//! Extension models

use bytes::Bytes;

use crate::{
    core::{
        encode::{InvalidStructureError, WireEncode},
        layout::Layout,
        read::bit_range_be_read,
        write::bit_range_be_write,
    },
    error::FormatError,
    extn::layout::ExtnSubHeaderLayout,
    types::{LINE_LEN, next_hdr},
};

/// Class of an extension, carried in the next header field of the preceding section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtnClass {
    /// Processed by every router on the path
    HopByHop,
    /// Processed by the end hosts only
    EndToEnd,
}
impl ExtnClass {
    /// Next header tag of the class
    pub const fn tag(self) -> u8 {
        match self {
            ExtnClass::HopByHop => next_hdr::HOP_BY_HOP,
            ExtnClass::EndToEnd => next_hdr::END_TO_END,
        }
    }

    /// Returns the class named by a next header tag, if any
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            next_hdr::HOP_BY_HOP => Some(ExtnClass::HopByHop),
            next_hdr::END_TO_END => Some(ExtnClass::EndToEnd),
            _ => None,
        }
    }
}

/// An extension header
///
/// `data` is everything after the sub-header. Together with the sub-header it must fill a whole
/// number of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    /// Extension type within its class
    pub ext_type: u8,
    /// Extension payload
    pub data: Bytes,
}
impl Extension {
    /// Largest encoded extension
    pub const MAX_LEN: usize = u8::MAX as usize * LINE_LEN;

    /// Creates a new extension
    pub fn new(ext_type: u8, data: impl Into<Bytes>) -> Self {
        Extension {
            ext_type,
            data: data.into(),
        }
    }

    /// Decodes an extension from the start of `buf`
    ///
    /// Returns the extension and the next header tag it carries.
    pub fn decode(buf: &[u8]) -> Result<(Self, u8), FormatError> {
        use ExtnSubHeaderLayout as ESL;

        let (sub_header, _rest) = ESL.split_off_checked(buf).ok_or(FormatError::BufferTooSmall {
            at: "ExtensionSubHeader",
            required: ESL::SIZE_BYTES,
            actual: buf.len(),
        })?;

        let next: u8 = bit_range_be_read(sub_header, ESL::NEXT_HDR_RNG).unwrap_or_default();
        let lines: u8 = bit_range_be_read(sub_header, ESL::HDR_LEN_RNG).unwrap_or_default();
        let ext_type: u8 = bit_range_be_read(sub_header, ESL::EXT_TYPE_RNG).unwrap_or_default();

        let len = lines as usize * LINE_LEN;
        if len == 0 {
            return Err(FormatError::Misaligned {
                at: "Extension",
                len,
            });
        }
        let data = buf
            .get(ESL::SIZE_BYTES..len)
            .ok_or(FormatError::BufferTooSmall {
                at: "Extension",
                required: len,
                actual: buf.len(),
            })?;

        Ok((Extension::new(ext_type, Bytes::copy_from_slice(data)), next))
    }
}
impl WireEncode for Extension {
    fn required_size(&self) -> usize {
        ExtnSubHeaderLayout::SIZE_BYTES + self.data.len()
    }

    fn wire_valid(&self) -> Result<(), InvalidStructureError> {
        let len = self.required_size();
        if !len.is_multiple_of(LINE_LEN) {
            return Err("extension length is not a multiple of a line".into());
        }
        if len > Self::MAX_LEN {
            return Err("extension exceeds 255 lines".into());
        }
        Ok(())
    }

    /// Writes the extension with a placeholder next header tag
    fn encode_into(&self, buf: &mut [u8]) -> usize {
        use ExtnSubHeaderLayout as ESL;

        let len = self.required_size();
        bit_range_be_write(buf, ESL::NEXT_HDR_RNG, next_hdr::L4_NONE);
        bit_range_be_write(buf, ESL::HDR_LEN_RNG, (len / LINE_LEN) as u8);
        bit_range_be_write(buf, ESL::EXT_TYPE_RNG, self.ext_type);
        buf[ESL::SIZE_BYTES..len].copy_from_slice(&self.data);

        len
    }
}

#[cfg(test)]
mod model_tests {
    use super::*;

    #[test]
    fn should_encode_with_placeholder_next_header() {
        let extn = Extension::new(2, vec![0xab; 5]);

        let mut buf = [0u8; 8];
        assert_eq!(extn.encode(&mut buf), Ok(8));
        assert_eq!(buf, [next_hdr::L4_NONE, 1, 2, 0xab, 0xab, 0xab, 0xab, 0xab]);
        assert_eq!(Extension::decode(&buf), Ok((extn, next_hdr::L4_NONE)));
    }

    #[test]
    fn should_reject_misaligned_extension() {
        let extn = Extension::new(0, vec![0; 4]);
        assert!(extn.wire_valid().is_err());
    }

    #[test]
    fn should_reject_zero_length_extension() {
        assert_eq!(
            Extension::decode(&[17, 0, 0, 0, 0, 0, 0, 0]),
            Err(FormatError::Misaligned {
                at: "Extension",
                len: 0
            })
        );
    }

    #[test]
    fn should_reject_truncated_extension() {
        assert_eq!(
            Extension::decode(&[17, 2, 0, 0, 0, 0, 0, 0]),
            Err(FormatError::BufferTooSmall {
                at: "Extension",
                required: 16,
                actual: 8
            })
        );
    }

    #[test]
    fn should_map_class_tags() {
        assert_eq!(ExtnClass::from_tag(0), Some(ExtnClass::HopByHop));
        assert_eq!(ExtnClass::from_tag(222), Some(ExtnClass::EndToEnd));
        assert_eq!(ExtnClass::from_tag(17), None);
    }
}
