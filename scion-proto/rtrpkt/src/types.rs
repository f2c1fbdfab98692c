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

//! Addressing types and protocol constants shared by all sections.

use std::{
    fmt::{self, Display},
    net::{IpAddr, Ipv4Addr, Ipv6Addr},
    str::FromStr,
};

use serde::Deserialize;

use crate::{core::encode::WireEncode, error::FormatError};

/// Length of a line, the alignment unit of the wire format, in bytes.
pub const LINE_LEN: usize = 8;

/// Interface identifier of a border router interface.
pub type IfId = u16;

/// Values of the next header field.
///
/// A next header value names either the class of the following extension or the protocol of
/// the following transport header.
pub mod next_hdr {
    /// Hop-by-hop extension class
    pub const HOP_BY_HOP: u8 = 0;
    /// End-to-end extension class
    pub const END_TO_END: u8 = 222;
    /// No transport header follows
    pub const L4_NONE: u8 = 59;
    /// SCMP
    pub const SCMP: u8 = 1;
    /// UDP
    pub const UDP: u8 = 17;
}

/// ISD-AS identifier
///
/// 16 bit ISD followed by a 48 bit AS number.
///
/// String format: `<isd>-<asn>`, where `asn` is either decimal (BGP-style, at most 32 bits) or
/// three colon separated groups of 16 bit hex values, e.g. `1-ff00:0:110`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct IsdAsn(u64);
impl IsdAsn {
    /// Largest AS number
    pub const MAX_ASN: u64 = (1 << 48) - 1;
    /// Largest AS number written in decimal
    const MAX_DECIMAL_ASN: u64 = u32::MAX as u64;

    /// Creates a new ISD-AS. Bits of `asn` above 48 are discarded.
    pub const fn new(isd: u16, asn: u64) -> Self {
        Self(((isd as u64) << 48) | (asn & Self::MAX_ASN))
    }

    /// Creates an ISD-AS from its 64 bit wire representation
    pub const fn from_u64(v: u64) -> Self {
        Self(v)
    }

    /// Returns the 64 bit wire representation
    pub const fn to_u64(self) -> u64 {
        self.0
    }

    /// Returns the ISD
    pub const fn isd(self) -> u16 {
        (self.0 >> 48) as u16
    }

    /// Returns the AS number
    pub const fn asn(self) -> u64 {
        self.0 & Self::MAX_ASN
    }
}
impl Display for IsdAsn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let asn = self.asn();
        if asn <= Self::MAX_DECIMAL_ASN {
            return write!(f, "{}-{}", self.isd(), asn);
        }
        write!(
            f,
            "{}-{:x}:{:x}:{:x}",
            self.isd(),
            (asn >> 32) & 0xffff,
            (asn >> 16) & 0xffff,
            asn & 0xffff
        )
    }
}
impl FromStr for IsdAsn {
    type Err = IsdAsnParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (isd, asn) = s
            .split_once('-')
            .ok_or_else(|| IsdAsnParseError::MissingSeparator(s.to_string()))?;

        let isd = u16::from_str(isd).map_err(|_| IsdAsnParseError::InvalidIsd(isd.to_string()))?;
        let invalid_asn = || IsdAsnParseError::InvalidAsn(asn.to_string());

        let groups: Vec<&str> = asn.split(':').collect();
        let asn = match groups.as_slice() {
            [decimal] => {
                let v = u64::from_str(decimal).map_err(|_| invalid_asn())?;
                if v > Self::MAX_DECIMAL_ASN {
                    return Err(invalid_asn());
                }
                v
            }
            [_, _, _] => {
                groups.iter().try_fold(0u64, |acc, group| {
                    if group.is_empty() || group.len() > 4 {
                        return Err(invalid_asn());
                    }
                    let v = u16::from_str_radix(group, 16).map_err(|_| invalid_asn())?;
                    Ok((acc << 16) | v as u64)
                })?
            }
            _ => return Err(invalid_asn()),
        };

        Ok(IsdAsn::new(isd, asn))
    }
}
// Custom deserializer that goes through the string format
impl<'de> Deserialize<'de> for IsdAsn {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        IsdAsn::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// ISD-AS parse error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IsdAsnParseError {
    /// No `-` between ISD and AS
    #[error("Missing ISD-AS separator in {0:?}")]
    MissingSeparator(String),
    /// ISD is not a 16 bit decimal number
    #[error("Invalid ISD {0:?}")]
    InvalidIsd(String),
    /// AS is neither a 32 bit decimal number nor three hex groups
    #[error("Invalid AS number {0:?}")]
    InvalidAsn(String),
}

/// Host address type as carried in the common header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum HostAddrType {
    /// No host address
    None = 0,
    /// IPv4 address
    Ipv4 = 1,
    /// IPv6 address
    Ipv6 = 2,
    /// Service address
    Svc = 3,
}
impl HostAddrType {
    /// Returns the size of a host address of this type in bytes
    pub const fn size(self) -> usize {
        match self {
            HostAddrType::None => 0,
            HostAddrType::Ipv4 => 4,
            HostAddrType::Ipv6 => 16,
            HostAddrType::Svc => 2,
        }
    }
}
impl TryFrom<u8> for HostAddrType {
    type Error = FormatError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(HostAddrType::None),
            1 => Ok(HostAddrType::Ipv4),
            2 => Ok(HostAddrType::Ipv6),
            3 => Ok(HostAddrType::Svc),
            other => Err(FormatError::UnknownHostAddrType(other)),
        }
    }
}
impl From<HostAddrType> for u8 {
    fn from(val: HostAddrType) -> Self {
        val as u8
    }
}

/// Host address of the source or destination of a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostAddr {
    /// No host address
    None,
    /// IPv4 host
    Ipv4(Ipv4Addr),
    /// IPv6 host
    Ipv6(Ipv6Addr),
    /// Service address
    Svc(u16),
}
impl HostAddr {
    /// Returns the type of the host address
    pub const fn addr_type(&self) -> HostAddrType {
        match self {
            HostAddr::None => HostAddrType::None,
            HostAddr::Ipv4(_) => HostAddrType::Ipv4,
            HostAddr::Ipv6(_) => HostAddrType::Ipv6,
            HostAddr::Svc(_) => HostAddrType::Svc,
        }
    }

    /// Decodes a host address of the given type from the start of `buf`
    pub fn decode(addr_type: HostAddrType, buf: &[u8]) -> Result<Self, FormatError> {
        let size = addr_type.size();
        let bytes = buf.get(..size).ok_or(FormatError::BufferTooSmall {
            at: "HostAddr",
            required: size,
            actual: buf.len(),
        })?;

        let addr = match addr_type {
            HostAddrType::None => HostAddr::None,
            HostAddrType::Ipv4 => {
                let mut octets = [0u8; 4];
                octets.copy_from_slice(bytes);
                HostAddr::Ipv4(octets.into())
            }
            HostAddrType::Ipv6 => {
                let mut octets = [0u8; 16];
                octets.copy_from_slice(bytes);
                HostAddr::Ipv6(octets.into())
            }
            HostAddrType::Svc => HostAddr::Svc(u16::from_be_bytes([bytes[0], bytes[1]])),
        };

        Ok(addr)
    }
}
impl WireEncode for HostAddr {
    fn required_size(&self) -> usize {
        self.addr_type().size()
    }

    fn encode_into(&self, buf: &mut [u8]) -> usize {
        match self {
            HostAddr::None => {}
            HostAddr::Ipv4(ip) => buf[..4].copy_from_slice(&ip.octets()),
            HostAddr::Ipv6(ip) => buf[..16].copy_from_slice(&ip.octets()),
            HostAddr::Svc(svc) => buf[..2].copy_from_slice(&svc.to_be_bytes()),
        }
        self.required_size()
    }
}
impl From<IpAddr> for HostAddr {
    fn from(ip: IpAddr) -> Self {
        match ip {
            IpAddr::V4(ip) => HostAddr::Ipv4(ip),
            IpAddr::V6(ip) => HostAddr::Ipv6(ip),
        }
    }
}
impl Display for HostAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostAddr::None => write!(f, "<none>"),
            HostAddr::Ipv4(ip) => write!(f, "{ip}"),
            HostAddr::Ipv6(ip) => write!(f, "{ip}"),
            HostAddr::Svc(svc) => write!(f, "svc:{svc:#06x}"),
        }
    }
}

#[cfg(test)]
mod types_tests {
    use super::*;

    #[test]
    fn should_parse_decimal_and_hex_isd_asn() {
        let ia: IsdAsn = "1-64512".parse().unwrap();
        assert_eq!(ia.isd(), 1);
        assert_eq!(ia.asn(), 64512);
        assert_eq!(ia.to_string(), "1-64512");

        let ia: IsdAsn = "2-ff00:0:110".parse().unwrap();
        assert_eq!(ia.isd(), 2);
        assert_eq!(ia.asn(), 0xff00_0000_0110);
        assert_eq!(ia.to_string(), "2-ff00:0:110");
    }

    #[test]
    fn should_reject_invalid_isd_asn() {
        assert!(matches!(
            "1".parse::<IsdAsn>(),
            Err(IsdAsnParseError::MissingSeparator(_))
        ));
        assert!(matches!(
            "70000-1".parse::<IsdAsn>(),
            Err(IsdAsnParseError::InvalidIsd(_))
        ));
        assert!(matches!(
            "1-ff00:0".parse::<IsdAsn>(),
            Err(IsdAsnParseError::InvalidAsn(_))
        ));
        assert!(matches!(
            "1-4294967296".parse::<IsdAsn>(),
            Err(IsdAsnParseError::InvalidAsn(_))
        ));
    }

    #[test]
    fn should_round_trip_wire_representation() {
        let ia = IsdAsn::new(0xffff, IsdAsn::MAX_ASN);
        assert_eq!(ia.to_u64(), u64::MAX);
        assert_eq!(IsdAsn::from_u64(ia.to_u64()), ia);
    }

    #[test]
    fn should_decode_host_addresses() {
        let buf = [10, 0, 0, 1, 0xff, 0xff];
        assert_eq!(
            HostAddr::decode(HostAddrType::Ipv4, &buf),
            Ok(HostAddr::Ipv4(Ipv4Addr::new(10, 0, 0, 1)))
        );
        assert_eq!(
            HostAddr::decode(HostAddrType::Svc, &buf),
            Ok(HostAddr::Svc(0x0a00))
        );
        assert_eq!(
            HostAddr::decode(HostAddrType::Ipv6, &buf),
            Err(FormatError::BufferTooSmall {
                at: "HostAddr",
                required: 16,
                actual: 6
            })
        );
    }

    #[test]
    fn should_reject_unknown_host_type() {
        assert_eq!(
            HostAddrType::try_from(4),
            Err(FormatError::UnknownHostAddrType(4))
        );
    }
}
