//! EthernetMgr - Interface configuration orchestrator
//!
//! Translates one [`EthernetInterfaceSettings`] record into the sequence of
//! link operations and DHCP daemon transitions that realize it, with the
//! interface roles kept mutually exclusive: every apply tears down both
//! possible daemons before the mode-specific steps run.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{info, instrument, warn};

use netmgr_common::{NetMgrError, NetMgrResult};
use netmgr_types::{Ipv4Address, Ipv4Network};

use crate::dhcp::DhcpManager;
use crate::link::LinkController;
use crate::types::{DhcpServerSettings, EthernetInterfaceSettings, InterfaceMode};

/// Validated per-mode inputs, computed before the first mutation.
enum ApplyPlan<'a> {
    Manual {
        ip: Ipv4Address,
        network: Ipv4Network,
    },
    DhcpServer {
        ip: Ipv4Address,
        network: Ipv4Network,
        server: &'a DhcpServerSettings,
    },
    DhcpClient,
}

/// Interface configuration orchestrator.
///
/// Holds the two façade collaborators and a per-interface-name lock map.
/// Applies targeting the same interface are serialized for their whole
/// duration; applies targeting different interfaces run in parallel.
///
/// Failure semantics: the first failing step aborts the remaining sequence
/// and its error is returned unmodified. Steps already executed are not
/// rolled back, so the interface can be left in a partially-applied state.
pub struct EthernetMgr<L, D> {
    link: L,
    dhcp: D,
    if_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl<L: LinkController, D: DhcpManager> EthernetMgr<L, D> {
    /// Creates an orchestrator over the given collaborators.
    pub fn new(link: L, dhcp: D) -> Self {
        Self {
            link,
            dhcp,
            if_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the link state controller.
    pub fn link(&self) -> &L {
        &self.link
    }

    /// Returns the DHCP process manager.
    pub fn dhcp(&self) -> &D {
        &self.dhcp
    }

    fn lock_for(&self, name: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.if_locks.lock().expect("interface lock map poisoned");
        locks.entry(name.to_string()).or_default().clone()
    }

    /// Drives the interface into the state described by `settings`.
    #[instrument(
        skip(self, settings),
        fields(
            interface = %settings.name,
            mode = settings.mode.as_str(),
            enabled = settings.enabled,
        )
    )]
    pub async fn apply(&self, settings: &EthernetInterfaceSettings) -> NetMgrResult<()> {
        let lock = self.lock_for(&settings.name);
        let _guard = lock.lock().await;

        let name = settings.name.as_str();
        if !self.link.exists(name).await {
            return Err(NetMgrError::interface_not_found(name));
        }

        // Validate the whole record before the first mutation so a bad
        // address or pool leaves the interface untouched.
        let plan = match &settings.mode {
            InterfaceMode::Manual { address, netmask } => {
                let (ip, network) = Ipv4Network::derive(address, netmask)?;
                ApplyPlan::Manual { ip, network }
            }
            InterfaceMode::DhcpServer {
                address,
                netmask,
                server,
            } => {
                let (ip, network) = Ipv4Network::derive(address, netmask)?;
                if settings.enabled {
                    server.validate(name)?;
                }
                ApplyPlan::DhcpServer {
                    ip,
                    network,
                    server,
                }
            }
            InterfaceMode::DhcpClient => ApplyPlan::DhcpClient,
        };

        self.teardown_daemons(name).await?;

        match plan {
            ApplyPlan::Manual { ip, network } => {
                self.apply_manual(name, settings.enabled, &ip, &network)
                    .await?;
            }
            ApplyPlan::DhcpServer {
                ip,
                network,
                server,
            } => {
                self.apply_dhcp_server(name, settings.enabled, &ip, &network, server)
                    .await?;
            }
            ApplyPlan::DhcpClient => {
                self.apply_dhcp_client(name, settings.enabled).await?;
            }
        }

        info!(
            "Applied {} mode to interface {} (enabled: {})",
            settings.mode.as_str(),
            name,
            settings.enabled
        );
        Ok(())
    }

    /// Stops both possible DHCP daemons before any mode-specific action,
    /// so two daemons never bind the interface at once.
    ///
    /// A failed status query is treated as not-running; the stop path is
    /// only taken for daemons that were positively observed alive.
    async fn teardown_daemons(&self, name: &str) -> NetMgrResult<()> {
        match self.dhcp.server_status(name).await {
            Ok(status) if status.running => self.dhcp.stop_server(name).await?,
            Ok(_) => {}
            Err(e) => warn!("Could not query DHCP server status on {}: {}", name, e),
        }

        match self.dhcp.client_status(name).await {
            Ok(status) if status.running => self.dhcp.stop_client(name).await?,
            Ok(_) => {}
            Err(e) => warn!("Could not query DHCP client status on {}: {}", name, e),
        }

        Ok(())
    }

    async fn apply_manual(
        &self,
        name: &str,
        enabled: bool,
        ip: &Ipv4Address,
        network: &Ipv4Network,
    ) -> NetMgrResult<()> {
        self.link.flush_addresses(name).await?;
        self.link.add_address(name, ip, network).await?;

        if enabled {
            self.link.link_up(name).await
        } else {
            self.link.link_down(name).await
        }
    }

    async fn apply_dhcp_server(
        &self,
        name: &str,
        enabled: bool,
        ip: &Ipv4Address,
        network: &Ipv4Network,
        server: &DhcpServerSettings,
    ) -> NetMgrResult<()> {
        self.link.flush_addresses(name).await?;
        self.link.add_address(name, ip, network).await?;

        if !enabled {
            return self.link.link_down(name).await;
        }

        self.link.link_up(name).await?;

        let conf_path = self.dhcp.server_config_path(name);
        self.dhcp
            .write_server_config(name, server, &conf_path)
            .await?;

        // Another instance may have bound the interface between the
        // teardown above and the config write; stop is idempotent.
        self.dhcp.stop_server(name).await?;
        self.dhcp.start_server(name, &conf_path).await
    }

    async fn apply_dhcp_client(&self, name: &str, enabled: bool) -> NetMgrResult<()> {
        self.link.flush_addresses(name).await?;

        if enabled {
            self.dhcp.start_client(name).await?;
        }
        Ok(())
    }
}
