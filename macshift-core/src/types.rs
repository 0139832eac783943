//! Hardware address type

use std::fmt;
use std::str::FromStr;

use crate::codec;

/// Unicast/multicast bit of the first octet
pub const MULTICAST_BIT: u8 = 0x01;

/// Locally administered/universal bit of the first octet
pub const LOCAL_BIT: u8 = 0x02;

/// MAC Address (6 bytes)
///
/// Equality is by value, so two textual forms that differ only in case or
/// separator compare equal once parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {
    /// Create a new MAC address
    pub const fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// Convert to array
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// Addresses a single interface
    pub fn is_unicast(&self) -> bool {
        self.0[0] & MULTICAST_BIT == 0
    }

    /// Addresses a multicast group
    pub fn is_multicast(&self) -> bool {
        !self.is_unicast()
    }

    /// Assigned by software rather than by the hardware vendor
    pub fn is_locally_administered(&self) -> bool {
        self.0[0] & LOCAL_BIT != 0
    }

    /// Vendor assigned (OUI based)
    pub fn is_universal(&self) -> bool {
        !self.is_locally_administered()
    }
}

impl From<[u8; 6]> for MacAddr {
    fn from(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl FromStr for MacAddr {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !codec::validate(s) {
            return Err(crate::Error::InvalidAddress(s.to_string()));
        }

        let mut bytes = [0u8; 6];
        for (i, part) in s.split([':', '-']).enumerate() {
            bytes[i] = u8::from_str_radix(part, 16)
                .map_err(|_| crate::Error::InvalidAddress(s.to_string()))?;
        }

        Ok(MacAddr(bytes))
    }
}
