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

//! Path reversal and hop pointer advancement.

use tracing::trace;

use crate::{
    error::PathError,
    path::{
        layout::{HopFieldLayout, InfoFieldLayout},
        model::{HopField, InfoField, InfoFieldFlags, Path},
    },
};

/// Position of the current info field and hop field inside a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HopPointer {
    /// Offset of the current info field
    pub inf_off: usize,
    /// Offset of the current hop field
    pub hop_off: usize,
    /// Whether a segment boundary was crossed to reach this position
    pub crossed_segment: bool,
}

/// Finds the next hop field after `hop_off` in the raw path.
///
/// Moves to the next hop of the current segment, or to the first hop of the next segment if
/// the current one is exhausted. Verify-only hops are skipped.
pub fn next_hop(raw: &[u8], inf_off: usize, hop_off: usize) -> Result<HopPointer, PathError> {
    let read_info = |off: usize| {
        raw.get(off..)
            .and_then(InfoField::decode)
            .ok_or(PathError::UnreadableField {
                field: "info field",
                offset: off,
            })
    };

    let mut info = read_info(inf_off)?;
    let mut next = HopPointer {
        inf_off,
        hop_off,
        crossed_segment: false,
    };

    loop {
        next.hop_off += HopFieldLayout::SIZE_BYTES;

        let segment_end = next.inf_off
            + InfoFieldLayout::SIZE_BYTES
            + info.hops as usize * HopFieldLayout::SIZE_BYTES;
        if next.hop_off >= segment_end {
            if segment_end >= raw.len() {
                return Err(PathError::Exhausted(hop_off));
            }
            next.inf_off = segment_end;
            next.hop_off = segment_end + InfoFieldLayout::SIZE_BYTES;
            next.crossed_segment = true;
            info = read_info(next.inf_off)?;
            if info.hops == 0 {
                return Err(PathError::Malformed("segment without hop fields"));
            }
        }

        let hop = raw
            .get(next.hop_off..)
            .and_then(HopField::decode)
            .ok_or(PathError::UnreadableField {
                field: "hop field",
                offset: next.hop_off,
            })?;
        if !hop.verify_only() {
            return Ok(next);
        }
        trace!(offset = next.hop_off, "Skipping verify-only hop field");
    }
}

impl Path {
    /// Reverses the path in place
    ///
    /// Segment order and hop order are inverted and the construction direction of every
    /// segment is toggled. The pointers are reset to the first hop of the first segment.
    pub fn reverse(&mut self) -> Result<(), PathError> {
        let mut segments = self.segments()?;
        if segments.is_empty() {
            return Err(PathError::NoPath);
        }

        segments.reverse();
        for segment in &mut segments {
            segment.hops.reverse();
            segment.info.flags.toggle(InfoFieldFlags::CONS_DIR);
        }

        *self = Path::from_segments(&segments)
            .map_err(|_| PathError::Malformed("reversed path cannot be encoded"))?;
        Ok(())
    }

    /// Advances the hop pointer to the next hop field
    ///
    /// Returns true if a segment boundary was crossed.
    pub fn increment(&mut self) -> Result<bool, PathError> {
        let next = next_hop(&self.raw, self.inf_off, self.hop_off)?;
        self.inf_off = next.inf_off;
        self.hop_off = next.hop_off;
        Ok(next.crossed_segment)
    }
}
