//! IPv4 address, netmask and network types with safe parsing.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// An IPv4 address wrapper with gateway-specific utilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ipv4Address(Ipv4Addr);

impl Ipv4Address {
    pub const UNSPECIFIED: Self = Ipv4Address(Ipv4Addr::UNSPECIFIED);
    pub const LOCALHOST: Self = Ipv4Address(Ipv4Addr::LOCALHOST);

    pub const fn new(a: u8, b: u8, c: u8, d: u8) -> Self {
        Ipv4Address(Ipv4Addr::new(a, b, c, d))
    }

    pub const fn inner(&self) -> Ipv4Addr {
        self.0
    }

    pub const fn octets(&self) -> [u8; 4] {
        self.0.octets()
    }

    /// Returns true if this address falls inside an RFC 1918 private block.
    pub const fn is_private(&self) -> bool {
        self.0.is_private()
    }
}

impl fmt::Display for Ipv4Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Ipv4Address {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Ipv4Addr>()
            .map(Ipv4Address)
            .map_err(|_| ParseError::InvalidIpAddress(s.to_string()))
    }
}

impl From<Ipv4Addr> for Ipv4Address {
    fn from(addr: Ipv4Addr) -> Self {
        Ipv4Address(addr)
    }
}

impl From<Ipv4Address> for Ipv4Addr {
    fn from(addr: Ipv4Address) -> Self {
        addr.0
    }
}

/// An IPv4 subnet mask in dotted-quad form.
///
/// Parsing accepts any syntactically valid dotted quad and then requires the
/// mask bits to be contiguous (e.g. `255.255.240.0`). Non-contiguous masks
/// such as `255.0.255.0` cannot be expressed as a CIDR prefix and are
/// rejected, since every kernel-facing address operation takes a prefix
/// length.
///
/// # Examples
///
/// ```
/// use netmgr_types::Netmask;
///
/// let mask: Netmask = "255.255.255.0".parse().unwrap();
/// assert_eq!(mask.prefix_len(), 24);
/// assert_eq!(mask.to_string(), "255.255.255.0");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Netmask([u8; 4]);

impl Netmask {
    /// Builds a netmask from a prefix length (0..=32).
    pub fn from_prefix_len(len: u8) -> Result<Self, ParseError> {
        if len > 32 {
            return Err(ParseError::InvalidNetmask(format!(
                "prefix length {} exceeds 32",
                len
            )));
        }
        let bits = if len == 0 { 0 } else { u32::MAX << (32 - len) };
        Ok(Netmask(bits.to_be_bytes()))
    }

    /// Returns the raw mask bytes.
    pub const fn octets(&self) -> [u8; 4] {
        self.0
    }

    /// Returns the number of leading one bits.
    pub fn prefix_len(&self) -> u8 {
        u32::from_be_bytes(self.0).leading_ones() as u8
    }
}

impl fmt::Display for Netmask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Ipv4Addr::from(self.0).fmt(f)
    }
}

impl FromStr for Netmask {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let addr = s
            .parse::<Ipv4Addr>()
            .map_err(|_| ParseError::InvalidNetmask(s.to_string()))?;

        let bits = u32::from_be_bytes(addr.octets());
        // Contiguous iff all one bits precede all zero bits.
        if bits.leading_ones() + bits.trailing_zeros() != 32 {
            return Err(ParseError::InvalidNetmask(format!(
                "{} is not a contiguous mask",
                s
            )));
        }

        Ok(Netmask(addr.octets()))
    }
}

impl TryFrom<String> for Netmask {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Netmask> for String {
    fn from(mask: Netmask) -> Self {
        mask.to_string()
    }
}

/// An IPv4 network prefix: the masked network address plus its netmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ipv4Network {
    address: Ipv4Address,
    netmask: Netmask,
}

impl Ipv4Network {
    /// Builds the network containing `addr` under `mask`.
    ///
    /// The network address is obtained by masking `addr` with the netmask
    /// (bitwise AND per octet).
    pub fn from_addr_and_mask(addr: Ipv4Address, mask: Netmask) -> Self {
        let a = addr.octets();
        let m = mask.octets();
        let network = Ipv4Address::new(a[0] & m[0], a[1] & m[1], a[2] & m[2], a[3] & m[3]);
        Ipv4Network {
            address: network,
            netmask: mask,
        }
    }

    /// Parses an address and netmask string pair, returning the host address
    /// together with the network prefix it belongs to.
    pub fn derive(ip: &str, netmask: &str) -> Result<(Ipv4Address, Ipv4Network), ParseError> {
        let mask: Netmask = netmask.parse()?;
        let addr: Ipv4Address = ip.parse()?;
        Ok((addr, Ipv4Network::from_addr_and_mask(addr, mask)))
    }

    /// Returns the (masked) network address.
    pub const fn address(&self) -> &Ipv4Address {
        &self.address
    }

    /// Returns the netmask.
    pub const fn netmask(&self) -> &Netmask {
        &self.netmask
    }

    /// Returns the prefix length in bits.
    pub fn prefix_len(&self) -> u8 {
        self.netmask.prefix_len()
    }

    /// Returns the directed broadcast address of this network.
    pub fn broadcast(&self) -> Ipv4Address {
        let a = self.address.octets();
        let m = self.netmask.octets();
        Ipv4Address::new(a[0] | !m[0], a[1] | !m[1], a[2] | !m[2], a[3] | !m[3])
    }

    /// Returns true if `addr` falls inside this network.
    pub fn contains(&self, addr: &Ipv4Address) -> bool {
        Ipv4Network::from_addr_and_mask(*addr, self.netmask).address == self.address
    }
}

impl fmt::Display for Ipv4Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix_len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ipv4_parse() {
        let addr: Ipv4Address = "192.168.1.1".parse().unwrap();
        assert_eq!(addr.octets(), [192, 168, 1, 1]);
    }

    #[test]
    fn test_ipv4_parse_rejects_malformed() {
        assert!("192.168.1".parse::<Ipv4Address>().is_err());
        assert!("192.168.1.256".parse::<Ipv4Address>().is_err());
        assert!("not-an-ip".parse::<Ipv4Address>().is_err());
        assert!("".parse::<Ipv4Address>().is_err());
    }

    #[test]
    fn test_netmask_parse() {
        let mask: Netmask = "255.255.255.0".parse().unwrap();
        assert_eq!(mask.octets(), [255, 255, 255, 0]);
        assert_eq!(mask.prefix_len(), 24);

        let host: Netmask = "255.255.255.255".parse().unwrap();
        assert_eq!(host.prefix_len(), 32);

        let any: Netmask = "0.0.0.0".parse().unwrap();
        assert_eq!(any.prefix_len(), 0);
    }

    #[test]
    fn test_netmask_round_trip() {
        for s in [
            "0.0.0.0",
            "128.0.0.0",
            "255.0.0.0",
            "255.255.0.0",
            "255.255.240.0",
            "255.255.255.0",
            "255.255.255.252",
            "255.255.255.255",
        ] {
            let mask: Netmask = s.parse().unwrap();
            assert_eq!(mask.to_string(), s);
        }
    }

    #[test]
    fn test_netmask_rejects_non_contiguous() {
        assert!("255.0.255.0".parse::<Netmask>().is_err());
        assert!("0.255.255.255".parse::<Netmask>().is_err());
        assert!("255.255.255.253".parse::<Netmask>().is_err());
    }

    #[test]
    fn test_netmask_rejects_malformed() {
        assert!("255.255.255".parse::<Netmask>().is_err());
        assert!("255.255.255.256".parse::<Netmask>().is_err());
        assert!("garbage".parse::<Netmask>().is_err());
    }

    #[test]
    fn test_netmask_from_prefix_len() {
        assert_eq!(
            Netmask::from_prefix_len(24).unwrap(),
            "255.255.255.0".parse().unwrap()
        );
        assert_eq!(
            Netmask::from_prefix_len(0).unwrap(),
            "0.0.0.0".parse().unwrap()
        );
        assert!(Netmask::from_prefix_len(33).is_err());
    }

    #[test]
    fn test_derive_network() {
        let (ip, net) = Ipv4Network::derive("192.168.1.10", "255.255.255.0").unwrap();
        assert_eq!(ip.to_string(), "192.168.1.10");
        assert_eq!(net.address().to_string(), "192.168.1.0");
        assert_eq!(net.prefix_len(), 24);
        assert_eq!(net.to_string(), "192.168.1.0/24");
    }

    #[test]
    fn test_derive_network_rejects_bad_input() {
        assert!(Ipv4Network::derive("bogus", "255.255.255.0").is_err());
        assert!(Ipv4Network::derive("192.168.1.10", "255.255.0.255").is_err());
        assert!(Ipv4Network::derive("192.168.1.10", "255.255.255").is_err());
    }

    #[test]
    fn test_broadcast() {
        let (_, net) = Ipv4Network::derive("172.16.0.1", "255.255.255.252").unwrap();
        assert_eq!(net.broadcast().to_string(), "172.16.0.3");

        let (_, net) = Ipv4Network::derive("10.1.2.3", "255.255.0.0").unwrap();
        assert_eq!(net.broadcast().to_string(), "10.1.255.255");
    }

    #[test]
    fn test_contains() {
        let (_, net) = Ipv4Network::derive("192.168.1.1", "255.255.255.0").unwrap();
        assert!(net.contains(&"192.168.1.200".parse().unwrap()));
        assert!(!net.contains(&"192.168.2.1".parse().unwrap()));
    }
}
