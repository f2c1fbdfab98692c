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

//! RtrPkt: packet construction and reply generation for a SCION border router.
//!
//! A router handles packets in two representations:
//!
//! - [`ScnPkt`] is an owned, structured description of a packet. It is easy to inspect and to
//!   modify, e.g. when turning a packet around for a reply.
//! - [`RtrPkt`] is the fixed-capacity wire buffer the router forwards, together with the offsets
//!   of every section inside it. It is created by [parsing](RtrPkt::parse) a received datagram or
//!   by [assembling](RtrPkt::from_description) a description, and converted back with
//!   [`RtrPkt::to_description`].
//!
//! The [`reply`] module derives replies from received packets, including the path pointer
//! adjustments and egress selection the router needs to send them.
//!
//! All operations are synchronous in-memory byte manipulation. Router wide state is passed in
//! explicitly as a read-only [`RouterContext`].

pub mod config;
pub mod context;
pub mod core;
pub mod error;
pub mod extn;
pub mod header;
pub mod l4;
pub mod path;
pub mod reply;
pub mod rpkt;
pub mod spkt;
pub mod types;

pub use config::{RouterConfig, RtrPktConfig};
pub use context::{Dir, RouterContext};
pub use error::{CapacityError, ContextError, FormatError, PathError, RtrPktError};
pub use rpkt::RtrPkt;
pub use spkt::ScnPkt;
