//! MAC address type with safe parsing and formatting.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 48-bit Ethernet MAC address.
///
/// Parses from six two-digit hex groups separated by `:` or `-` and always
/// renders in lowercase colon form.
///
/// ```
/// use netmgr_types::MacAddress;
///
/// let mac: MacAddress = "02:50:B6:00:00:01".parse().unwrap();
/// assert_eq!(mac.to_string(), "02:50:b6:00:00:01");
/// assert_eq!(mac, "02-50-b6-00-00-01".parse().unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// The all-zero MAC address.
    pub const ZERO: MacAddress = MacAddress([0; 6]);

    /// Creates a MAC address from raw bytes.
    pub const fn new(bytes: [u8; 6]) -> Self {
        MacAddress(bytes)
    }

    /// Returns the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    /// True for group (multicast) addresses.
    pub const fn is_multicast(&self) -> bool {
        self.0[0] & 0x01 != 0
    }

    /// True for individual (unicast) addresses.
    pub const fn is_unicast(&self) -> bool {
        !self.is_multicast()
    }

    /// True for locally administered addresses.
    pub const fn is_local(&self) -> bool {
        self.0[0] & 0x02 != 0
    }

    /// True for the all-zero address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0; 6]
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl FromStr for MacAddress {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidMacAddress(s.to_string());
        let separator = if s.contains('-') { '-' } else { ':' };

        let mut bytes = [0u8; 6];
        let mut groups = s.split(separator);
        for slot in bytes.iter_mut() {
            let group = groups.next().ok_or_else(invalid)?;
            if group.len() != 2 {
                return Err(invalid());
            }
            *slot = u8::from_str_radix(group, 16).map_err(|_| invalid())?;
        }
        if groups.next().is_some() {
            return Err(invalid());
        }

        Ok(MacAddress(bytes))
    }
}

impl TryFrom<String> for MacAddress {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> Self {
        mac.to_string()
    }
}

impl From<[u8; 6]> for MacAddress {
    fn from(bytes: [u8; 6]) -> Self {
        MacAddress(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_both_separators() {
        let colon: MacAddress = "02:50:b6:00:00:01".parse().unwrap();
        let hyphen: MacAddress = "02-50-b6-00-00-01".parse().unwrap();
        assert_eq!(colon, hyphen);
        assert_eq!(colon.as_bytes(), &[0x02, 0x50, 0xb6, 0x00, 0x00, 0x01]);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let upper: MacAddress = "AA:BB:CC:DD:EE:FF".parse().unwrap();
        let lower: MacAddress = "aa:bb:cc:dd:ee:ff".parse().unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        for bad in [
            "",
            "02:50:b6:00:00",
            "02:50:b6:00:00:01:02",
            "02:50:b6:00:00:zz",
            "2:50:b6:0:0:1",
            "025:0b6:00:00:10",
        ] {
            assert!(bad.parse::<MacAddress>().is_err(), "{:?} parsed", bad);
        }
    }

    #[test]
    fn test_display_is_lowercase_colon_form() {
        let mac = MacAddress::new([0x02, 0x50, 0xB6, 0x0A, 0x0B, 0x0C]);
        assert_eq!(mac.to_string(), "02:50:b6:0a:0b:0c");
    }

    #[test]
    fn test_classification_bits() {
        let bridge_mac: MacAddress = "02:50:b6:00:00:01".parse().unwrap();
        assert!(bridge_mac.is_local());
        assert!(bridge_mac.is_unicast());
        assert!(!bridge_mac.is_zero());

        let mdns: MacAddress = "01:00:5e:00:00:fb".parse().unwrap();
        assert!(mdns.is_multicast());

        assert!(MacAddress::ZERO.is_zero());
    }
}
