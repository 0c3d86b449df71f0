//! Link State Controller: kernel link and address operations
//!
//! The [`LinkController`] trait is the capability boundary the orchestrator
//! drives; [`ShellLinkController`] is the production implementation, backed
//! by `ip(8)` for link/address state and direct sysfs writes for bridge
//! attributes.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use netmgr_common::{shell, NetMgrError, NetMgrResult};
use netmgr_types::{Ipv4Address, Ipv4Network, MacAddress};

use crate::commands::{
    build_add_address_cmd, build_attach_to_bridge_cmd, build_create_bridge_cmd,
    build_delete_bridge_cmd, build_flush_addresses_cmd, build_link_down_cmd, build_link_up_cmd,
    build_set_mac_cmd,
};
use crate::tables::{BRIDGE_FORWARD_DELAY_ATTR, BRIDGE_STP_ATTR, SYSFS_NET_DIR};

/// Kernel-facing link and address operations, one interface at a time.
///
/// Every operation is synchronous from the caller's view, reports failure
/// through `NetMgrResult`, and inherits the kernel's idempotence (flushing
/// an empty address set succeeds, bringing an up link up succeeds).
#[async_trait]
pub trait LinkController: Send + Sync {
    /// Returns true if `name` resolves to an OS interface.
    async fn exists(&self, name: &str) -> bool;

    /// Removes all addresses from the interface.
    async fn flush_addresses(&self, name: &str) -> NetMgrResult<()>;

    /// Assigns `ip` within `network` to the interface.
    async fn add_address(
        &self,
        name: &str,
        ip: &Ipv4Address,
        network: &Ipv4Network,
    ) -> NetMgrResult<()>;

    /// Brings the link administratively up.
    async fn link_up(&self, name: &str) -> NetMgrResult<()>;

    /// Brings the link administratively down.
    async fn link_down(&self, name: &str) -> NetMgrResult<()>;

    /// Creates a Layer-2 bridge interface.
    async fn create_bridge(&self, name: &str) -> NetMgrResult<()>;

    /// Deletes a bridge interface.
    async fn delete_bridge(&self, name: &str) -> NetMgrResult<()>;

    /// Attaches `member` to `bridge`.
    async fn attach_to_bridge(&self, bridge: &str, member: &str) -> NetMgrResult<()>;

    /// Sets the interface MAC address.
    async fn set_mac(&self, name: &str, mac: &MacAddress) -> NetMgrResult<()>;

    /// Enables or disables spanning tree on a bridge.
    async fn set_bridge_stp(&self, name: &str, on: bool) -> NetMgrResult<()>;

    /// Sets the bridge forward delay in seconds.
    async fn set_bridge_forward_delay(&self, name: &str, seconds: u32) -> NetMgrResult<()>;
}

/// Production [`LinkController`] driving `ip(8)` and sysfs.
pub struct ShellLinkController {
    sysfs_root: PathBuf,
}

impl ShellLinkController {
    /// Controller against the real sysfs tree.
    pub fn new() -> Self {
        Self {
            sysfs_root: PathBuf::from(SYSFS_NET_DIR),
        }
    }

    /// Controller against an alternate sysfs root (tests).
    pub fn with_sysfs_root(root: impl Into<PathBuf>) -> Self {
        Self {
            sysfs_root: root.into(),
        }
    }

    fn attr_path(&self, name: &str, attr: &str) -> PathBuf {
        self.sysfs_root.join(name).join(attr)
    }

    async fn write_attr(&self, path: &Path, value: &str) -> NetMgrResult<()> {
        tokio::fs::write(path, value)
            .await
            .map_err(|e| NetMgrError::Sysfs {
                path: path.to_string_lossy().into_owned(),
                source: e,
            })
    }
}

impl Default for ShellLinkController {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkController for ShellLinkController {
    async fn exists(&self, name: &str) -> bool {
        tokio::fs::metadata(self.sysfs_root.join(name)).await.is_ok()
    }

    async fn flush_addresses(&self, name: &str) -> NetMgrResult<()> {
        shell::run_checked(&build_flush_addresses_cmd(name)).await?;
        debug!("Flushed addresses on {}", name);
        Ok(())
    }

    async fn add_address(
        &self,
        name: &str,
        ip: &Ipv4Address,
        network: &Ipv4Network,
    ) -> NetMgrResult<()> {
        shell::run_checked(&build_add_address_cmd(name, ip, network)).await?;
        info!("Set interface {} to {}/{}", name, ip, network.prefix_len());
        Ok(())
    }

    async fn link_up(&self, name: &str) -> NetMgrResult<()> {
        shell::run_checked(&build_link_up_cmd(name)).await?;
        info!("Set interface {} up", name);
        Ok(())
    }

    async fn link_down(&self, name: &str) -> NetMgrResult<()> {
        shell::run_checked(&build_link_down_cmd(name)).await?;
        info!("Set interface {} down", name);
        Ok(())
    }

    async fn create_bridge(&self, name: &str) -> NetMgrResult<()> {
        shell::run_checked(&build_create_bridge_cmd(name)).await?;
        info!("Created bridge {}", name);
        Ok(())
    }

    async fn delete_bridge(&self, name: &str) -> NetMgrResult<()> {
        shell::run_checked(&build_delete_bridge_cmd(name)).await?;
        info!("Deleted bridge {}", name);
        Ok(())
    }

    async fn attach_to_bridge(&self, bridge: &str, member: &str) -> NetMgrResult<()> {
        shell::run_checked(&build_attach_to_bridge_cmd(bridge, member)).await?;
        info!("Interface {} added to bridge {}", member, bridge);
        Ok(())
    }

    async fn set_mac(&self, name: &str, mac: &MacAddress) -> NetMgrResult<()> {
        shell::run_checked(&build_set_mac_cmd(name, mac)).await?;
        info!("Set MAC address {} on interface {}", mac, name);
        Ok(())
    }

    async fn set_bridge_stp(&self, name: &str, on: bool) -> NetMgrResult<()> {
        let value = if on { "1" } else { "0" };
        let path = self.attr_path(name, BRIDGE_STP_ATTR);
        self.write_attr(&path, value).await?;
        debug!("Set bridge {} STP to {}", name, value);
        Ok(())
    }

    async fn set_bridge_forward_delay(&self, name: &str, seconds: u32) -> NetMgrResult<()> {
        let path = self.attr_path(name, BRIDGE_FORWARD_DELAY_ATTR);
        self.write_attr(&path, &seconds.to_string()).await?;
        debug!("Set bridge {} forward delay to {}", name, seconds);
        Ok(())
    }
}
