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

//! Internet checksum over packet sections.

/// Computes the 16 bit one's complement checksum over the concatenated chunks.
///
/// Each chunk is summed as a sequence of big-endian words. An odd trailing byte of a chunk is
/// padded with zero on its own, it is not combined with the first byte of the next chunk.
pub fn checksum(chunks: &[&[u8]]) -> u16 {
    let mut sum: u64 = 0;
    for chunk in chunks {
        let mut words = chunk.chunks_exact(2);
        for word in &mut words {
            sum += u16::from_be_bytes([word[0], word[1]]) as u64;
        }
        if let [last] = words.remainder() {
            sum += (*last as u64) << 8;
        }
    }

    while sum > 0xffff {
        sum = (sum >> 16) + (sum & 0xffff);
    }
    !(sum as u16)
}

/// Computes the checksum of a transport header and its payload.
///
/// `l4_hdr` must have its checksum field zeroed. `addr_hdr` is the raw address header,
/// including padding.
pub fn l4_checksum(addr_hdr: &[u8], protocol: u8, l4_hdr: &[u8], payload: &[u8]) -> u16 {
    checksum(&[addr_hdr, &[0, protocol], l4_hdr, payload])
}
