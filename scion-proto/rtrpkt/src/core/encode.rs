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

//! Encoding of structured values into byte buffers
//!
//! Every section that the packet assembler writes implements [`WireEncode`]. The trait has three
//! responsibilities:
//!
//! 1. Calculating the required size for the wire encoding
//! 2. Validating that the value can be represented on the wire
//! 3. Writing the wire format into a provided byte buffer
//!
//! Validation is not semantic validation. It only rejects values that would produce an invalid
//! wire format, e.g. an extension whose length is not a multiple of a line.

/// Allows encoding to wire format.
pub trait WireEncode {
    /// Returns the size required for the wire encoding.
    fn required_size(&self) -> usize;

    /// Validates that all fields in the structure are valid for encoding.
    fn wire_valid(&self) -> Result<(), InvalidStructureError> {
        Ok(())
    }

    /// Writes the wire encoding into the provided buffer and returns the number of bytes
    /// written.
    ///
    /// The buffer must be at least `self.required_size()` bytes long and the structure must be
    /// valid for encoding. A shorter buffer panics.
    fn encode_into(&self, buf: &mut [u8]) -> usize;

    /// Checks the structure and the buffer, then writes the wire encoding.
    ///
    /// Returns the number of bytes written.
    fn encode(&self, buf: &mut [u8]) -> Result<usize, EncodeError> {
        self.wire_valid()?;

        let required = self.required_size();
        if buf.len() < required {
            return Err(EncodeError::BufferTooSmall {
                required,
                actual: buf.len(),
            });
        }

        Ok(self.encode_into(&mut buf[..required]))
    }
}

/// Errors that can occur during encoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// The structure which was attempted to be encoded is invalid.
    #[error(transparent)]
    InvalidStructure(#[from] InvalidStructureError),
    /// The provided buffer is too small.
    #[error("buffer too small: required {required}, actual {actual}")]
    BufferTooSmall {
        /// Number of bytes the encoding needs
        required: usize,
        /// Number of bytes available
        actual: usize,
    },
}

/// Given structure has invalid fields to encode correctly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot encode structure: {0}")]
pub struct InvalidStructureError(&'static str);
impl From<&'static str> for InvalidStructureError {
    fn from(s: &'static str) -> Self {
        InvalidStructureError(s)
    }
}
