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

//! Router configuration consumed by the packet engine.

use std::{collections::BTreeMap, net::SocketAddr};

use serde::Deserialize;

use crate::types::{IfId, IsdAsn, LINE_LEN};

/// Packet buffer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RtrPktConfig {
    capacity: usize,
}
impl RtrPktConfig {
    /// Default buffer capacity in bytes
    pub const DEFAULT_CAPACITY: usize = 9000;
    /// Largest capacity, bounded by the 16 bit total length field
    pub const MAX_CAPACITY: usize = u16::MAX as usize;
    /// Smallest capacity, one line
    pub const MIN_CAPACITY: usize = LINE_LEN;

    /// Creates a configuration with the given buffer capacity in bytes.
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity > Self::MAX_CAPACITY {
            return Err(ConfigError::CapacityTooLarge {
                capacity,
                max: Self::MAX_CAPACITY,
            });
        }
        if capacity < Self::MIN_CAPACITY {
            return Err(ConfigError::CapacityTooSmall {
                capacity,
                min: Self::MIN_CAPACITY,
            });
        }
        Ok(Self { capacity })
    }

    /// Capacity of every packet buffer in bytes
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
impl Default for RtrPktConfig {
    fn default() -> Self {
        Self {
            capacity: Self::DEFAULT_CAPACITY,
        }
    }
}
// Custom deserializer that validates the capacity
impl<'de> Deserialize<'de> for RtrPktConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct Raw {
            #[serde(default = "default_capacity")]
            capacity: usize,
        }
        fn default_capacity() -> usize {
            RtrPktConfig::DEFAULT_CAPACITY
        }

        let raw = Raw::deserialize(deserializer)?;
        RtrPktConfig::new(raw.capacity).map_err(serde::de::Error::custom)
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Capacity above the largest representable packet
    #[error("Buffer capacity {capacity} exceeds maximum {max}")]
    CapacityTooLarge {
        /// Configured capacity
        capacity: usize,
        /// Largest allowed capacity
        max: usize,
    },
    /// Capacity too small to hold a common header
    #[error("Buffer capacity {capacity} below minimum {min}")]
    CapacityTooSmall {
        /// Configured capacity
        capacity: usize,
        /// Smallest allowed capacity
        min: usize,
    },
}

/// Inter-domain interface of the router.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InterfaceConfig {
    /// Address of the neighboring router on the other end of the link
    pub remote_addr: SocketAddr,
}

/// Router configuration.
///
/// ```json
/// {
///   "local_ia": "1-ff00:0:110",
///   "packet": { "capacity": 1500 },
///   "interfaces": { "1": { "remote_addr": "192.0.2.2:50000" } },
///   "local_outputs": ["10.0.0.1:30041"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RouterConfig {
    /// ISD-AS the router belongs to
    pub local_ia: IsdAsn,
    /// Packet buffer configuration
    #[serde(default)]
    pub packet: RtrPktConfig,
    /// Inter-domain interfaces by interface identifier
    #[serde(default)]
    pub interfaces: BTreeMap<IfId, InterfaceConfig>,
    /// Local facing output sockets, indexed by local channel
    #[serde(default)]
    pub local_outputs: Vec<SocketAddr>,
}
impl RouterConfig {
    /// Creates a configuration without interfaces or local outputs
    pub fn new(local_ia: IsdAsn) -> Self {
        RouterConfig {
            local_ia,
            packet: RtrPktConfig::default(),
            interfaces: BTreeMap::new(),
            local_outputs: Vec::new(),
        }
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;

    #[test]
    fn should_deserialize_router_config() {
        let config: RouterConfig = serde_json::from_str(
            r#"{
                "local_ia": "1-ff00:0:110",
                "packet": { "capacity": 1500 },
                "interfaces": { "7": { "remote_addr": "192.0.2.2:50000" } },
                "local_outputs": ["10.0.0.1:30041"]
            }"#,
        )
        .unwrap();

        assert_eq!(config.local_ia, "1-ff00:0:110".parse().unwrap());
        assert_eq!(config.packet.capacity(), 1500);
        assert_eq!(
            config.interfaces[&7].remote_addr,
            "192.0.2.2:50000".parse().unwrap()
        );
        assert_eq!(config.local_outputs.len(), 1);
    }

    #[test]
    fn should_default_packet_config() {
        let config: RouterConfig = serde_json::from_str(r#"{ "local_ia": "1-64512" }"#).unwrap();
        assert_eq!(config.packet.capacity(), RtrPktConfig::DEFAULT_CAPACITY);
        assert!(config.interfaces.is_empty());
    }

    #[test]
    fn should_reject_invalid_capacity() {
        let res: Result<RouterConfig, _> = serde_json::from_str(
            r#"{ "local_ia": "1-64512", "packet": { "capacity": 70000 } }"#,
        );
        assert!(res.is_err());

        assert_eq!(
            RtrPktConfig::new(4),
            Err(ConfigError::CapacityTooSmall { capacity: 4, min: 8 })
        );
    }

    #[test]
    fn should_reject_invalid_isd_asn() {
        let res: Result<RouterConfig, _> = serde_json::from_str(r#"{ "local_ia": "1:2" }"#);
        assert!(res.is_err());
    }
}
