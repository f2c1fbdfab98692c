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

//! Error types returned by packet construction, parsing and reply generation.

use crate::{core::encode::InvalidStructureError, types::IfId};

/// Malformed or truncated packet data.
///
/// A packet that fails with a `FormatError` must be dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// The buffer is too small to contain the expected section
    #[error("Buffer too small at {at}: required {required}, actual {actual}")]
    BufferTooSmall {
        /// Section which could not be read
        at: &'static str,
        /// Number of bytes required
        required: usize,
        /// Number of bytes actually available
        actual: usize,
    },
    /// The SCION version is unsupported
    #[error("Unsupported version {0}")]
    UnsupportedVersion(u8),
    /// The host address type tag is not known
    #[error("Unknown host address type {0}")]
    UnknownHostAddrType(u8),
    /// The next header tag names neither an extension class nor a known transport protocol
    #[error("Unknown transport protocol {0}")]
    UnknownProtocol(u8),
    /// The advertised total length does not match the datagram length
    #[error("Invalid total length: advertised {advertised}, actual {actual}")]
    InvalidTotalLength {
        /// Advertised total length
        advertised: usize,
        /// Actual datagram length
        actual: usize,
    },
    /// The advertised header length is inconsistent with the address header or the datagram
    #[error("Invalid header length: advertised {advertised}, actual {actual}")]
    InvalidHeaderLength {
        /// Advertised header length in bytes
        advertised: usize,
        /// Smallest or largest acceptable header length in bytes
        actual: usize,
    },
    /// A section length is not a positive multiple of a line
    #[error("Misaligned {at}: length {len} is not a multiple of a line")]
    Misaligned {
        /// Misaligned section
        at: &'static str,
        /// Length of the section in bytes
        len: usize,
    },
    /// The current info or hop field pointer lies outside of the path section
    #[error("Invalid path pointers: info field {info}, hop field {hop}")]
    InvalidPathPointers {
        /// Info field offset from the packet start
        info: usize,
        /// Hop field offset from the packet start
        hop: usize,
    },
    /// A hop-by-hop extension follows an end-to-end extension
    #[error("Hop-by-hop extension after end-to-end extension")]
    ExtensionOrder,
    /// The structure cannot be encoded
    #[error(transparent)]
    InvalidStructure(#[from] InvalidStructureError),
}

/// The assembled packet would exceed the capacity of the packet buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Capacity exceeded at {at}: required {required}, capacity {capacity}")]
pub struct CapacityError {
    /// Section which did not fit
    pub at: &'static str,
    /// Number of bytes the packet needs up to the end of the section
    pub required: usize,
    /// Capacity of the packet buffer
    pub capacity: usize,
}

/// The path pointer cannot be advanced, or the current path fields cannot be read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// The packet does not carry a path
    #[error("Packet has no path")]
    NoPath,
    /// The raw path does not consist of whole segments
    #[error("Malformed path: {0}")]
    Malformed(&'static str),
    /// There is no hop field left to advance to
    #[error("Path exhausted after hop field at {0}")]
    Exhausted(usize),
    /// A path field lies outside of the path
    #[error("Cannot read {field} at path offset {offset}")]
    UnreadableField {
        /// Name of the field
        field: &'static str,
        /// Offset of the field inside the path
        offset: usize,
    },
}

/// The router context cannot satisfy a lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    /// The packet was not received on an ingress channel
    #[error("Packet has no ingress binding")]
    MissingIngress,
    /// The interface is not configured
    #[error("Unknown interface {0}")]
    UnknownInterface(IfId),
    /// The local output channel is not configured
    #[error("Unknown local output {0}")]
    UnknownLocalOutput(usize),
}

/// Errors returned by operations on [`RtrPkt`](crate::rpkt::RtrPkt).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RtrPktError {
    /// Malformed packet data
    #[error(transparent)]
    Format(#[from] FormatError),
    /// Packet buffer too small
    #[error(transparent)]
    Capacity(#[from] CapacityError),
    /// Path cannot be processed
    #[error(transparent)]
    Path(#[from] PathError),
    /// Router context lookup failed
    #[error(transparent)]
    Context(#[from] ContextError),
}
impl From<InvalidStructureError> for RtrPktError {
    fn from(e: InvalidStructureError) -> Self {
        RtrPktError::Format(e.into())
    }
}
