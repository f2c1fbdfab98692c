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

use crate::core::layout::BitRange;

const LANE_BYTES: usize = 16;

/// Trait for integer types that can be produced by a bit range read
pub trait FromBitRead {
    /// Narrows the right-aligned read value into `Self`
    fn from_bit_read(v: u128) -> Self;
}

macro_rules! impl_from_u128 {
    ($($t:ty),*) => {
        $(
            impl FromBitRead for $t {
                #[inline(always)]
                fn from_bit_read(v: u128) -> Self {
                    v as $t
                }
            }
        )*
    };
}
impl_from_u128!(u8, u16, u32, u64);

/// Reads a value from the buffer at the given bit range, in big-endian bit order.
///
/// Returns None if the buffer does not contain every byte touched by the range. Inbound packets
/// go through this function, so it must never index out of bounds.
#[inline]
pub fn bit_range_be_read<T>(buf: &[u8], range: BitRange) -> Option<T>
where
    T: FromBitRead,
{
    debug_assert!(range.size_bytes() <= LANE_BYTES, "BitRange too large for read");

    let bytes = buf.get(range.containing_byte_range())?;

    let mut lane = [0u8; LANE_BYTES];
    lane[LANE_BYTES - bytes.len()..].copy_from_slice(bytes);
    let lane_val = u128::from_be_bytes(lane);

    // Align relevant bits to the right, then drop the leading bits of the first byte
    let right_shift = range.end.div_ceil(8) * 8 - range.end;
    let value_mask = (1u128 << range.size_bits()) - 1;

    Some(T::from_bit_read((lane_val >> right_shift) & value_mask))
}

#[cfg(test)]
mod read_tests {
    use super::*;

    #[test]
    fn should_read_aligned_u8() {
        let buf = [0b10101010u8, 0];
        let val: Option<u8> = bit_range_be_read(&buf, BitRange::new(0, 8));
        assert_eq!(val, Some(0b10101010));
    }

    #[test]
    fn should_read_aligned_u16() {
        let buf = [0b10101010, 0b01010101];
        let val: Option<u16> = bit_range_be_read(&buf, BitRange::new(0, 16));
        assert_eq!(val, Some(0b1010101001010101));
    }

    #[test]
    fn should_read_cross_byte() {
        // 12 bit interface id straddling a byte boundary
        let buf = [0x00, 0x12, 0x34, 0x56];
        let val: Option<u16> = bit_range_be_read(&buf, BitRange::new(16, 12));
        assert_eq!(val, Some(0x345));
        let val: Option<u16> = bit_range_be_read(&buf, BitRange::new(4, 12));
        assert_eq!(val, Some(0x012));
    }

    #[test]
    fn should_read_48_bit_value() {
        let buf = [0x00, 0x01, 0xff, 0x00, 0x00, 0x00, 0x00, 0x2a];
        let val: Option<u64> = bit_range_be_read(&buf, BitRange::new(16, 48));
        assert_eq!(val, Some(0xff00_0000_002a));
    }

    #[test]
    fn should_refuse_read_past_end() {
        let buf = [0u8; 3];
        let val: Option<u32> = bit_range_be_read(&buf, BitRange::new(8, 32));
        assert_eq!(val, None);
    }
}
