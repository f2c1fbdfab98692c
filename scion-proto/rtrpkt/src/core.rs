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

//! Bit-level building blocks shared by all header codecs.
//!
//! Layouts describe where fields live, [read] and [write] move integers in and out of byte
//! buffers at those positions, and [encode] defines how structured values are written.

pub mod encode;
pub mod layout;
pub mod read;
pub mod write;
