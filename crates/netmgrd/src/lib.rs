//! netmgrd - Declarative network interface configuration daemon
//!
//! Applies desired-state records to the interfaces of an embedded gateway:
//!
//! - Static IPv4 address assignment
//! - DHCP server role (dnsmasq) with per-interface config files
//! - DHCP client role (dhclient)
//! - USB ethernet bridge bootstrap (creation, MAC, STP, member attach)
//!
//! The orchestration core is [`EthernetMgr`]; kernel and daemon access go
//! through the [`LinkController`] and [`DhcpManager`] capability traits so
//! the state machine can be exercised against fakes.

pub mod commands;
pub mod defaults;
pub mod dhcp;
pub mod ethernet_mgr;
pub mod link;
pub mod tables;
pub mod types;

pub use dhcp::{DhcpManager, DnsmasqDhcpManager};
pub use ethernet_mgr::EthernetMgr;
pub use link::{LinkController, ShellLinkController};
pub use types::{
    DaemonStatus, DhcpRange, DhcpServerSettings, EthernetInterfaceSettings, InterfaceMode,
};
