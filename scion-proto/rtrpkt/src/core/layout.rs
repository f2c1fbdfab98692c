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

//! Layout primitives for bit-level wire structures
//!
//! Layouts are the source of truth for where a field lives inside a header. Codecs use them
//! together with [`read`](crate::core::read) and [`write`](crate::core::write) to move values in
//! and out of byte buffers.

/// Trait representing the layout of a header section
pub trait Layout {
    /// Returns the expected size of the layout in bytes
    fn size_bytes(&self) -> usize;

    /// Attempts to split the buffer into two at the size of the layout
    ///
    /// Returns None if the buffer is too small
    #[inline]
    fn split_off_checked<'a>(&self, buf: &'a [u8]) -> Option<(&'a [u8], &'a [u8])> {
        buf.split_at_checked(self.size_bytes())
    }
}

/// Represents a range of bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitRange {
    /// Start bit (inclusive)
    pub start: usize,
    /// End bit (exclusive)
    pub end: usize,
}
impl BitRange {
    /// Creates a new BitRange with the given start and width
    #[inline]
    pub const fn new(start: usize, width: usize) -> Self {
        Self {
            start,
            end: start + width,
        }
    }

    /// Returns the maximum unsigned integer that can be represented by the BitRange
    #[inline]
    pub const fn max_uint(&self) -> u64 {
        if self.size_bits() >= 64 {
            u64::MAX
        } else {
            (1 << self.size_bits()) - 1
        }
    }

    /// Returns the byte range, assuming the start and end are byte-aligned
    #[inline]
    pub const fn aligned_byte_range(&self) -> std::ops::Range<usize> {
        debug_assert!(
            self.start.is_multiple_of(8),
            "Start bit is not byte-aligned"
        );
        debug_assert!(self.end.is_multiple_of(8), "End bit is not byte-aligned");
        self.start / 8..self.end.div_ceil(8)
    }

    /// Returns the byte range containing the bit range
    ///
    /// Does not require byte alignment
    #[inline]
    pub const fn containing_byte_range(&self) -> std::ops::Range<usize> {
        self.start / 8..self.end.div_ceil(8)
    }

    /// Returns the number of bytes touched by the bit range
    #[inline]
    pub const fn size_bytes(&self) -> usize {
        let range = self.containing_byte_range();
        range.end - range.start
    }

    /// Returns the size of the bit range in bits
    #[inline]
    pub const fn size_bits(&self) -> usize {
        debug_assert!(self.end >= self.start, "BitRange end must be >= start");
        self.end - self.start
    }

    /// Shifts the bit range forward by the given number of bytes
    #[inline]
    pub const fn shift(mut self, bytes: usize) -> Self {
        self.start += bytes * 8;
        self.end += bytes * 8;
        self
    }
}

/// Macros for layout definitions
pub mod macros {
    /// Helper macro to generate bit range constants
    macro_rules! gen_bitrange_const {
        ($range_name:ident, $start:expr, $width:expr) => {
            /// Bit range constant for the specified field
            pub const $range_name: BitRange = BitRange::new($start, $width);
        };
    }

    pub(crate) use gen_bitrange_const;
}

#[cfg(test)]
mod layout_tests {
    use super::*;

    #[test]
    fn should_compute_containing_bytes_of_unaligned_range() {
        let range = BitRange::new(4, 6);
        assert_eq!(range.containing_byte_range(), 0..2);
        assert_eq!(range.size_bytes(), 2);
        assert_eq!(range.size_bits(), 6);
        assert_eq!(range.max_uint(), 0b11_1111);
    }

    #[test]
    fn should_shift_by_whole_bytes() {
        let range = BitRange::new(0, 16).shift(3);
        assert_eq!(range.aligned_byte_range(), 3..5);
    }
}
