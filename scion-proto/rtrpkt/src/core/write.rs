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

/// Trait for integer types that can be written into a bit range
pub trait IntoBitWrite {
    /// Widens the value for writing
    fn into_write_value(v: Self) -> u128;
}

macro_rules! impl_into_u128 {
    ($($t:ty),*) => {
        $(
            impl IntoBitWrite for $t {
                #[inline(always)]
                fn into_write_value(v: Self) -> u128 {
                    v as u128
                }
            }
        )*
    };
}
impl_into_u128!(u8, u16, u32, u64);

/// Writes a value into the buffer at the given bit range, in big-endian bit order.
///
/// Bits outside of the range are preserved. Values wider than the range are truncated.
///
/// Writes only target buffers whose size has already been checked against the layout being
/// encoded. A range outside of `buf` is a bug in the caller and panics.
#[inline]
pub fn bit_range_be_write<T>(buf: &mut [u8], range: BitRange, val: T)
where
    T: IntoBitWrite,
{
    debug_assert!(range.size_bytes() <= LANE_BYTES, "BitRange too large for write");

    let target = &mut buf[range.containing_byte_range()];
    let byte_count = target.len();

    let mut lane = [0u8; LANE_BYTES];
    lane[LANE_BYTES - byte_count..].copy_from_slice(target);
    let mut lane_val = u128::from_be_bytes(lane);

    let value_mask = (1u128 << range.size_bits()) - 1;
    let left_shift = range.end.div_ceil(8) * 8 - range.end;

    // Clear the target bits, then insert the truncated value
    lane_val &= !(value_mask << left_shift);
    lane_val |= (T::into_write_value(val) & value_mask) << left_shift;

    target.copy_from_slice(&lane_val.to_be_bytes()[LANE_BYTES - byte_count..]);
}
