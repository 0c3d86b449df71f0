//! DHCP Process Manager: daemon lifecycle for server and client roles
//!
//! The [`DhcpManager`] trait is the capability boundary the orchestrator
//! drives; [`DnsmasqDhcpManager`] is the production implementation, running
//! `dnsmasq` for the server role and `dhclient` for the client role.
//! Liveness is tracked through per-interface pid files probed against
//! `/proc`, so a daemon that died without cleanup reads as stopped.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use netmgr_common::{shell, NetMgrError, NetMgrResult};

use crate::commands::{build_kill_cmd, build_start_dhcp_client_cmd, build_start_dhcp_server_cmd};
use crate::tables::{DHCP_CONF_DIR, DHCP_RUN_DIR, PROC_DIR};
use crate::types::{DaemonStatus, DhcpServerSettings};

/// DHCP daemon lifecycle operations, one interface at a time.
///
/// Stop operations are idempotent: stopping a daemon that is not running
/// succeeds. Config writing overwrites any prior file at the same path.
#[async_trait]
pub trait DhcpManager: Send + Sync {
    /// Queries whether a DHCP server is running on the interface.
    async fn server_status(&self, name: &str) -> NetMgrResult<DaemonStatus>;

    /// Queries whether a DHCP client is running on the interface.
    async fn client_status(&self, name: &str) -> NetMgrResult<DaemonStatus>;

    /// Stops the DHCP server bound to the interface, if any.
    async fn stop_server(&self, name: &str) -> NetMgrResult<()>;

    /// Stops the DHCP client bound to the interface, if any.
    async fn stop_client(&self, name: &str) -> NetMgrResult<()>;

    /// Deterministic config file path for the interface's DHCP server.
    fn server_config_path(&self, name: &str) -> PathBuf;

    /// Renders `settings` into daemon config syntax and overwrites `path`.
    async fn write_server_config(
        &self,
        name: &str,
        settings: &DhcpServerSettings,
        path: &Path,
    ) -> NetMgrResult<()>;

    /// Starts a DHCP server on the interface with the given config file.
    async fn start_server(&self, name: &str, conf_path: &Path) -> NetMgrResult<()>;

    /// Starts a DHCP client on the interface.
    async fn start_client(&self, name: &str) -> NetMgrResult<()>;
}

/// Which daemon a pid file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DaemonKind {
    Server,
    Client,
}

impl DaemonKind {
    fn prefix(self) -> &'static str {
        match self {
            DaemonKind::Server => "dnsmasq",
            DaemonKind::Client => "dhclient",
        }
    }
}

/// Production [`DhcpManager`] backed by dnsmasq and dhclient.
pub struct DnsmasqDhcpManager {
    conf_dir: PathBuf,
    run_dir: PathBuf,
    proc_root: PathBuf,
}

impl DnsmasqDhcpManager {
    /// Manager against the system config/run/proc directories.
    pub fn new() -> Self {
        Self {
            conf_dir: PathBuf::from(DHCP_CONF_DIR),
            run_dir: PathBuf::from(DHCP_RUN_DIR),
            proc_root: PathBuf::from(PROC_DIR),
        }
    }

    /// Manager against alternate directories (tests).
    pub fn with_dirs(
        conf_dir: impl Into<PathBuf>,
        run_dir: impl Into<PathBuf>,
        proc_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            conf_dir: conf_dir.into(),
            run_dir: run_dir.into(),
            proc_root: proc_root.into(),
        }
    }

    fn pid_path(&self, kind: DaemonKind, name: &str) -> PathBuf {
        self.run_dir.join(format!("{}-{}.pid", kind.prefix(), name))
    }

    fn default_lease_file(&self, name: &str) -> PathBuf {
        self.run_dir.join(format!("dnsmasq-{}.leases", name))
    }

    async fn status(&self, kind: DaemonKind, name: &str) -> NetMgrResult<DaemonStatus> {
        let pid_path = self.pid_path(kind, name);
        let contents = match tokio::fs::read_to_string(&pid_path).await {
            Ok(contents) => contents,
            Err(_) => return Ok(DaemonStatus::STOPPED),
        };

        let pid: u32 = match contents.trim().parse() {
            Ok(pid) => pid,
            Err(_) => {
                debug!(
                    "Unparsable pid file {} for {} on {}",
                    pid_path.display(),
                    kind.prefix(),
                    name
                );
                return Ok(DaemonStatus::STOPPED);
            }
        };

        let alive = tokio::fs::metadata(self.proc_root.join(pid.to_string()))
            .await
            .is_ok();
        if alive {
            Ok(DaemonStatus::running(pid))
        } else {
            Ok(DaemonStatus::STOPPED)
        }
    }

    async fn stop(&self, kind: DaemonKind, name: &str) -> NetMgrResult<()> {
        let status = self.status(kind, name).await?;
        let Some(pid) = status.pid.filter(|_| status.running) else {
            debug!("No {} running on {}, nothing to stop", kind.prefix(), name);
            return Ok(());
        };

        let result = shell::run(&build_kill_cmd(pid)).await?;
        if !result.ok() {
            return Err(NetMgrError::process(
                name,
                format!(
                    "failed to stop {} (pid {}): {}",
                    kind.prefix(),
                    pid,
                    result.detail()
                ),
            ));
        }

        // The daemon may not get to remove its own pid file.
        if let Err(e) = tokio::fs::remove_file(self.pid_path(kind, name)).await {
            debug!("Could not remove pid file for {} on {}: {}", kind.prefix(), name, e);
        }

        info!("Stopped {} on interface {} (pid {})", kind.prefix(), name, pid);
        Ok(())
    }

    /// Renders dnsmasq config syntax for one interface.
    pub fn render_server_config(&self, name: &str, settings: &DhcpServerSettings) -> String {
        let mut lines = vec![
            format!("# Generated for interface {}, overwritten on every apply", name),
            "bind-interfaces".to_string(),
            format!("interface={}", name),
            format!("port={}", settings.listen_port),
        ];

        for range in &settings.ranges {
            lines.push(format!(
                "dhcp-range={},{},{}",
                range.lower, range.upper, range.lease_time
            ));
        }

        for (code, value) in &settings.options {
            lines.push(format!("dhcp-option={},{}", code, value));
        }

        let lease_file = if settings.lease_file.is_empty() {
            self.default_lease_file(name).to_string_lossy().into_owned()
        } else {
            settings.lease_file.clone()
        };
        lines.push(format!("dhcp-leasefile={}", lease_file));

        if !settings.not_authoritative {
            lines.push("dhcp-authoritative".to_string());
        }

        lines.join("\n") + "\n"
    }
}

impl Default for DnsmasqDhcpManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DhcpManager for DnsmasqDhcpManager {
    async fn server_status(&self, name: &str) -> NetMgrResult<DaemonStatus> {
        self.status(DaemonKind::Server, name).await
    }

    async fn client_status(&self, name: &str) -> NetMgrResult<DaemonStatus> {
        self.status(DaemonKind::Client, name).await
    }

    async fn stop_server(&self, name: &str) -> NetMgrResult<()> {
        self.stop(DaemonKind::Server, name).await
    }

    async fn stop_client(&self, name: &str) -> NetMgrResult<()> {
        self.stop(DaemonKind::Client, name).await
    }

    fn server_config_path(&self, name: &str) -> PathBuf {
        self.conf_dir.join(format!("dnsmasq-{}.conf", name))
    }

    async fn write_server_config(
        &self,
        name: &str,
        settings: &DhcpServerSettings,
        path: &Path,
    ) -> NetMgrResult<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| NetMgrError::io(format!("creating {}", parent.display()), e))?;
        }

        let rendered = self.render_server_config(name, settings);
        tokio::fs::write(path, rendered)
            .await
            .map_err(|e| NetMgrError::io(format!("writing DHCP config {}", path.display()), e))?;

        info!("Wrote DHCP server config for {} to {}", name, path.display());
        Ok(())
    }

    async fn start_server(&self, name: &str, conf_path: &Path) -> NetMgrResult<()> {
        let pid_path = self.pid_path(DaemonKind::Server, name);
        if let Err(e) = tokio::fs::create_dir_all(&self.run_dir).await {
            warn!("Could not create run dir {}: {}", self.run_dir.display(), e);
        }

        shell::run_checked(&build_start_dhcp_server_cmd(conf_path, &pid_path)).await?;
        info!("Started DHCP server on interface {}", name);
        Ok(())
    }

    async fn start_client(&self, name: &str) -> NetMgrResult<()> {
        let pid_path = self.pid_path(DaemonKind::Client, name);
        if let Err(e) = tokio::fs::create_dir_all(&self.run_dir).await {
            warn!("Could not create run dir {}: {}", self.run_dir.display(), e);
        }

        shell::run_checked(&build_start_dhcp_client_cmd(name, &pid_path)).await?;
        info!("Started DHCP client on interface {}", name);
        Ok(())
    }
}
