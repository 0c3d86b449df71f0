//! In-memory fake collaborators for orchestrator testing
//!
//! [`FakeLink`] and [`FakeDhcp`] implement the daemon's capability traits
//! against one shared [`NetWorld`], so tests can assert both the final
//! simulated state (addresses, link state, running daemons) and the exact
//! operation sequence that produced it.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use netmgr_common::{NetMgrError, NetMgrResult};
use netmgr_types::{Ipv4Address, Ipv4Network, MacAddress};

use netmgrd::{DaemonStatus, DhcpManager, DhcpServerSettings, LinkController};

/// Simulated OS interface table, daemon table and operation journal.
#[derive(Debug, Default)]
pub struct NetWorld {
    /// Present interfaces.
    pub interfaces: HashSet<String>,
    /// Assigned addresses per interface, as "ip/prefix" strings.
    pub addresses: HashMap<String, Vec<String>>,
    /// Administrative link state per interface.
    pub link_up: HashMap<String, bool>,
    /// Interfaces with a running DHCP server.
    pub servers: HashSet<String>,
    /// Interfaces with a running DHCP client.
    pub clients: HashSet<String>,
    /// Bridge membership: member -> bridge.
    pub bridge_members: HashMap<String, String>,
    /// Written server configs, keyed by path.
    pub configs: HashMap<String, DhcpServerSettings>,
    /// Every operation performed, in order.
    pub journal: Vec<String>,
    /// Entry prefixes that should fail (e.g. "start_server(usbeth").
    fail_prefixes: Vec<String>,
}

impl NetWorld {
    /// World populated with the given interfaces.
    pub fn with_interfaces(names: &[&str]) -> Self {
        let mut world = NetWorld::default();
        for name in names {
            world.interfaces.insert(name.to_string());
        }
        world
    }

    /// Makes every operation whose journal entry starts with `prefix` fail.
    pub fn fail_on(&mut self, prefix: impl Into<String>) {
        self.fail_prefixes.push(prefix.into());
    }

    fn record(&mut self, entry: String) -> NetMgrResult<()> {
        let failing = self.fail_prefixes.iter().any(|p| entry.starts_with(p.as_str()));
        self.journal.push(entry.clone());
        if failing {
            Err(NetMgrError::internal(format!("injected failure: {}", entry)))
        } else {
            Ok(())
        }
    }
}

/// Shared handle to a [`NetWorld`].
pub type SharedWorld = Arc<Mutex<NetWorld>>;

/// Builds a shared world plus fakes for both façades.
pub fn fake_env(interfaces: &[&str]) -> (SharedWorld, FakeLink, FakeDhcp) {
    let world: SharedWorld = Arc::new(Mutex::new(NetWorld::with_interfaces(interfaces)));
    (
        Arc::clone(&world),
        FakeLink {
            world: Arc::clone(&world),
        },
        FakeDhcp { world },
    )
}

/// Fake [`LinkController`] mutating the shared world.
pub struct FakeLink {
    world: SharedWorld,
}

#[async_trait]
impl LinkController for FakeLink {
    async fn exists(&self, name: &str) -> bool {
        self.world.lock().unwrap().interfaces.contains(name)
    }

    async fn flush_addresses(&self, name: &str) -> NetMgrResult<()> {
        let mut world = self.world.lock().unwrap();
        world.record(format!("flush_addresses({})", name))?;
        world.addresses.remove(name);
        Ok(())
    }

    async fn add_address(
        &self,
        name: &str,
        ip: &Ipv4Address,
        network: &Ipv4Network,
    ) -> NetMgrResult<()> {
        let mut world = self.world.lock().unwrap();
        world.record(format!("add_address({},{},{})", name, ip, network))?;
        world
            .addresses
            .entry(name.to_string())
            .or_default()
            .push(format!("{}/{}", ip, network.prefix_len()));
        Ok(())
    }

    async fn link_up(&self, name: &str) -> NetMgrResult<()> {
        let mut world = self.world.lock().unwrap();
        world.record(format!("link_up({})", name))?;
        world.link_up.insert(name.to_string(), true);
        Ok(())
    }

    async fn link_down(&self, name: &str) -> NetMgrResult<()> {
        let mut world = self.world.lock().unwrap();
        world.record(format!("link_down({})", name))?;
        world.link_up.insert(name.to_string(), false);
        Ok(())
    }

    async fn create_bridge(&self, name: &str) -> NetMgrResult<()> {
        let mut world = self.world.lock().unwrap();
        world.record(format!("create_bridge({})", name))?;
        world.interfaces.insert(name.to_string());
        Ok(())
    }

    async fn delete_bridge(&self, name: &str) -> NetMgrResult<()> {
        let mut world = self.world.lock().unwrap();
        world.record(format!("delete_bridge({})", name))?;
        world.interfaces.remove(name);
        Ok(())
    }

    async fn attach_to_bridge(&self, bridge: &str, member: &str) -> NetMgrResult<()> {
        let mut world = self.world.lock().unwrap();
        world.record(format!("attach_to_bridge({},{})", bridge, member))?;
        world
            .bridge_members
            .insert(member.to_string(), bridge.to_string());
        Ok(())
    }

    async fn set_mac(&self, name: &str, mac: &MacAddress) -> NetMgrResult<()> {
        let mut world = self.world.lock().unwrap();
        world.record(format!("set_mac({},{})", name, mac))
    }

    async fn set_bridge_stp(&self, name: &str, on: bool) -> NetMgrResult<()> {
        let mut world = self.world.lock().unwrap();
        world.record(format!("set_bridge_stp({},{})", name, on))
    }

    async fn set_bridge_forward_delay(&self, name: &str, seconds: u32) -> NetMgrResult<()> {
        let mut world = self.world.lock().unwrap();
        world.record(format!("set_bridge_forward_delay({},{})", name, seconds))
    }
}

/// Fake [`DhcpManager`] mutating the shared world.
pub struct FakeDhcp {
    world: SharedWorld,
}

#[async_trait]
impl DhcpManager for FakeDhcp {
    async fn server_status(&self, name: &str) -> NetMgrResult<DaemonStatus> {
        let mut world = self.world.lock().unwrap();
        world.record(format!("server_status({})", name))?;
        Ok(if world.servers.contains(name) {
            DaemonStatus::running(100)
        } else {
            DaemonStatus::STOPPED
        })
    }

    async fn client_status(&self, name: &str) -> NetMgrResult<DaemonStatus> {
        let mut world = self.world.lock().unwrap();
        world.record(format!("client_status({})", name))?;
        Ok(if world.clients.contains(name) {
            DaemonStatus::running(200)
        } else {
            DaemonStatus::STOPPED
        })
    }

    async fn stop_server(&self, name: &str) -> NetMgrResult<()> {
        let mut world = self.world.lock().unwrap();
        world.record(format!("stop_server({})", name))?;
        world.servers.remove(name);
        Ok(())
    }

    async fn stop_client(&self, name: &str) -> NetMgrResult<()> {
        let mut world = self.world.lock().unwrap();
        world.record(format!("stop_client({})", name))?;
        world.clients.remove(name);
        Ok(())
    }

    fn server_config_path(&self, name: &str) -> PathBuf {
        PathBuf::from(format!("/fake/netmgr/dnsmasq-{}.conf", name))
    }

    async fn write_server_config(
        &self,
        name: &str,
        settings: &DhcpServerSettings,
        path: &Path,
    ) -> NetMgrResult<()> {
        let mut world = self.world.lock().unwrap();
        world.record(format!("write_server_config({},{})", name, path.display()))?;
        world
            .configs
            .insert(path.to_string_lossy().into_owned(), settings.clone());
        Ok(())
    }

    async fn start_server(&self, name: &str, conf_path: &Path) -> NetMgrResult<()> {
        let mut world = self.world.lock().unwrap();
        world.record(format!("start_server({},{})", name, conf_path.display()))?;
        world.servers.insert(name.to_string());
        Ok(())
    }

    async fn start_client(&self, name: &str) -> NetMgrResult<()> {
        let mut world = self.world.lock().unwrap();
        world.record(format!("start_client({})", name))?;
        world.clients.insert(name.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fake_link_tracks_state() {
        let (world, link, _dhcp) = fake_env(&["eth0"]);

        assert!(link.exists("eth0").await);
        assert!(!link.exists("eth9").await);

        let (ip, net) = Ipv4Network::derive("10.0.0.1", "255.255.255.0").unwrap();
        link.add_address("eth0", &ip, &net).await.unwrap();
        link.link_up("eth0").await.unwrap();

        {
            let world = world.lock().unwrap();
            assert_eq!(world.addresses["eth0"], vec!["10.0.0.1/24"]);
            assert_eq!(world.link_up["eth0"], true);
        }

        link.flush_addresses("eth0").await.unwrap();
        assert!(world.lock().unwrap().addresses.get("eth0").is_none());
    }

    #[tokio::test]
    async fn test_fake_dhcp_tracks_daemons() {
        let (world, _link, dhcp) = fake_env(&["eth0"]);

        assert!(!dhcp.server_status("eth0").await.unwrap().running);

        let conf = dhcp.server_config_path("eth0");
        dhcp.start_server("eth0", &conf).await.unwrap();
        assert!(dhcp.server_status("eth0").await.unwrap().running);

        dhcp.stop_server("eth0").await.unwrap();
        assert!(!world.lock().unwrap().servers.contains("eth0"));
    }

    #[tokio::test]
    async fn test_bridge_lifecycle() {
        let (world, link, _dhcp) = fake_env(&[]);

        link.create_bridge("br0").await.unwrap();
        assert!(link.exists("br0").await);

        link.delete_bridge("br0").await.unwrap();
        assert!(!link.exists("br0").await);

        let journal = world.lock().unwrap().journal.clone();
        assert_eq!(journal, vec!["create_bridge(br0)", "delete_bridge(br0)"]);
    }

    #[tokio::test]
    async fn test_failure_injection_by_prefix() {
        let (world, link, _dhcp) = fake_env(&["eth0", "eth1"]);
        world.lock().unwrap().fail_on("link_up(eth0");

        assert!(link.link_up("eth0").await.is_err());
        assert!(link.link_up("eth1").await.is_ok());
    }
}
