//! Common network primitive types for the gateway configuration manager.
//!
//! This crate provides type-safe representations of the IPv4 primitives the
//! interface configuration daemon works with:
//!
//! - [`Ipv4Address`]: IPv4 host addresses
//! - [`Netmask`]: dotted-quad IPv4 subnet masks
//! - [`Ipv4Network`]: a masked network prefix derived from address + netmask
//! - [`MacAddress`]: 48-bit Ethernet MAC addresses
//!
//! All parsing is fallible and side-effect free; failures are reported
//! through [`ParseError`].

mod ip;
mod mac;

pub use ip::{Ipv4Address, Ipv4Network, Netmask};
pub use mac::MacAddress;

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid MAC address format: {0}")]
    InvalidMacAddress(String),

    #[error("invalid IPv4 address format: {0}")]
    InvalidIpAddress(String),

    #[error("invalid IPv4 netmask: {0}")]
    InvalidNetmask(String),
}
