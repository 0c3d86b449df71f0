//! Settings types for netmgrd

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use netmgr_common::{NetMgrError, NetMgrResult};
use netmgr_types::Ipv4Address;

/// Desired-state record for one network interface.
///
/// Constructed by a caller (management API, bootstrapper) and handed to
/// [`crate::EthernetMgr::apply`]; the record itself is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EthernetInterfaceSettings {
    /// Interface identifier; must resolve to an existing OS interface
    /// at apply time.
    pub name: String,
    /// Whether the interface is brought up and mode daemons are started.
    pub enabled: bool,
    /// The role the interface should take.
    pub mode: InterfaceMode,
}

impl EthernetInterfaceSettings {
    /// Static address assignment.
    pub fn manual(
        name: impl Into<String>,
        address: impl Into<String>,
        netmask: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            mode: InterfaceMode::Manual {
                address: address.into(),
                netmask: netmask.into(),
            },
        }
    }

    /// DHCP server role with the given address and pool settings.
    pub fn dhcp_server(
        name: impl Into<String>,
        address: impl Into<String>,
        netmask: impl Into<String>,
        server: DhcpServerSettings,
    ) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            mode: InterfaceMode::DhcpServer {
                address: address.into(),
                netmask: netmask.into(),
                server,
            },
        }
    }

    /// DHCP client role.
    pub fn dhcp_client(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            mode: InterfaceMode::DhcpClient,
        }
    }

    /// Returns the same settings with `enabled` flipped off.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// The role an interface is configured into.
///
/// Mutually exclusive by construction: a settings record carries exactly one
/// role, and DHCP server mode cannot be expressed without its pool settings.
/// Addresses stay in string form here; they arrive from a management surface
/// and are parsed during apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum InterfaceMode {
    /// Static IPv4 address assignment.
    Manual {
        /// Dotted-quad IPv4 address.
        address: String,
        /// Dotted-quad netmask.
        netmask: String,
    },
    /// Hand out leases on this interface.
    DhcpServer {
        /// Dotted-quad IPv4 address of the gateway itself.
        address: String,
        /// Dotted-quad netmask.
        netmask: String,
        /// Pool and lease configuration.
        server: DhcpServerSettings,
    },
    /// Obtain configuration from an upstream DHCP server.
    DhcpClient,
}

impl InterfaceMode {
    /// Short mode name for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            InterfaceMode::Manual { .. } => "manual",
            InterfaceMode::DhcpServer { .. } => "dhcp_server",
            InterfaceMode::DhcpClient => "dhcp_client",
        }
    }
}

/// A single DHCP address pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DhcpRange {
    /// Lowest address handed out, dotted quad.
    pub lower: String,
    /// Highest address handed out, dotted quad.
    pub upper: String,
    /// Lease duration in dnsmasq syntax ("5m", "1h", "infinite").
    pub lease_time: String,
}

impl DhcpRange {
    pub fn new(
        lower: impl Into<String>,
        upper: impl Into<String>,
        lease_time: impl Into<String>,
    ) -> Self {
        Self {
            lower: lower.into(),
            upper: upper.into(),
            lease_time: lease_time.into(),
        }
    }
}

/// DHCP server configuration rendered into the daemon's config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DhcpServerSettings {
    /// Address pools; at least one is required.
    pub ranges: Vec<DhcpRange>,
    /// DNS listen port; 0 disables DNS and runs DHCP only.
    pub listen_port: u16,
    /// Lease database path; empty selects the per-interface default.
    pub lease_file: String,
    /// When false the server answers authoritatively on its subnet.
    pub not_authoritative: bool,
    /// Raw DHCP options (3 = router, 6 = DNS server, ...), rendered in
    /// ascending option-code order.
    pub options: BTreeMap<u32, String>,
}

impl DhcpServerSettings {
    /// Validates pool semantics before any daemon mutation.
    ///
    /// Requires at least one range, parseable bounds and lower <= upper.
    pub fn validate(&self, interface: &str) -> NetMgrResult<()> {
        if self.ranges.is_empty() {
            return Err(NetMgrError::invalid_config(
                interface,
                "DHCP server mode requires at least one address range",
            ));
        }

        for range in &self.ranges {
            let lower: Ipv4Address = range.lower.parse().map_err(|_| {
                NetMgrError::invalid_config(
                    interface,
                    format!("invalid DHCP range lower bound '{}'", range.lower),
                )
            })?;
            let upper: Ipv4Address = range.upper.parse().map_err(|_| {
                NetMgrError::invalid_config(
                    interface,
                    format!("invalid DHCP range upper bound '{}'", range.upper),
                )
            })?;
            if lower > upper {
                return Err(NetMgrError::invalid_config(
                    interface,
                    format!("DHCP range {}-{} is inverted", range.lower, range.upper),
                ));
            }
        }

        Ok(())
    }
}

/// Running/not-running status of a DHCP daemon on one interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DaemonStatus {
    /// True if the daemon process is alive.
    pub running: bool,
    /// The daemon pid when running.
    pub pid: Option<u32>,
}

impl DaemonStatus {
    /// A not-running status.
    pub const STOPPED: DaemonStatus = DaemonStatus {
        running: false,
        pid: None,
    };

    /// A running status with the given pid.
    pub fn running(pid: u32) -> Self {
        Self {
            running: true,
            pid: Some(pid),
        }
    }
}
