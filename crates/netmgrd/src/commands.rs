//! Shell command builders for link, address and DHCP daemon operations

use std::path::Path;

use netmgr_common::shell;
use netmgr_types::{Ipv4Address, Ipv4Network, MacAddress};

/// Build address flush command
pub fn build_flush_addresses_cmd(name: &str) -> String {
    format!(
        "{} address flush dev {}",
        shell::IP_CMD,
        shell::shellquote(name)
    )
}

/// Build address add command
///
/// The broadcast address is stated explicitly so the kernel does not keep
/// a stale one from a previously configured subnet.
pub fn build_add_address_cmd(name: &str, ip: &Ipv4Address, network: &Ipv4Network) -> String {
    format!(
        "{} address add {}/{} broadcast {} dev {}",
        shell::IP_CMD,
        ip,
        network.prefix_len(),
        network.broadcast(),
        shell::shellquote(name)
    )
}

/// Build link up command
pub fn build_link_up_cmd(name: &str) -> String {
    format!(
        "{} link set dev {} up",
        shell::IP_CMD,
        shell::shellquote(name)
    )
}

/// Build link down command
pub fn build_link_down_cmd(name: &str) -> String {
    format!(
        "{} link set dev {} down",
        shell::IP_CMD,
        shell::shellquote(name)
    )
}

/// Build bridge create command
pub fn build_create_bridge_cmd(name: &str) -> String {
    format!(
        "{} link add name {} type bridge",
        shell::IP_CMD,
        shell::shellquote(name)
    )
}

/// Build bridge delete command
pub fn build_delete_bridge_cmd(name: &str) -> String {
    format!(
        "{} link del dev {}",
        shell::IP_CMD,
        shell::shellquote(name)
    )
}

/// Build bridge member attach command
pub fn build_attach_to_bridge_cmd(bridge: &str, member: &str) -> String {
    format!(
        "{} link set dev {} master {}",
        shell::IP_CMD,
        shell::shellquote(member),
        shell::shellquote(bridge)
    )
}

/// Build MAC address set command
pub fn build_set_mac_cmd(name: &str, mac: &MacAddress) -> String {
    format!(
        "{} link set dev {} address {}",
        shell::IP_CMD,
        shell::shellquote(name),
        mac
    )
}

/// Build DHCP server start command
///
/// dnsmasq daemonizes itself and writes the pid file; the config file
/// carries everything else (interface binding, pools, options).
pub fn build_start_dhcp_server_cmd(conf_path: &Path, pid_path: &Path) -> String {
    format!(
        "{} --conf-file={} --pid-file={}",
        shell::DNSMASQ_CMD,
        shell::shellquote(&conf_path.to_string_lossy()),
        shell::shellquote(&pid_path.to_string_lossy())
    )
}

/// Build DHCP client start command
///
/// `-nw` backgrounds dhclient immediately so apply stays sub-second even
/// when no offer arrives.
pub fn build_start_dhcp_client_cmd(name: &str, pid_path: &Path) -> String {
    format!(
        "{} -nw -pf {} {}",
        shell::DHCLIENT_CMD,
        shell::shellquote(&pid_path.to_string_lossy()),
        shell::shellquote(name)
    )
}

/// Build daemon termination command
pub fn build_kill_cmd(pid: u32) -> String {
    format!("{} {}", shell::KILL_CMD, pid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn network(ip: &str, mask: &str) -> (Ipv4Address, Ipv4Network) {
        Ipv4Network::derive(ip, mask).unwrap()
    }

    #[test]
    fn test_build_flush_addresses_cmd() {
        let cmd = build_flush_addresses_cmd("eth0");
        assert_eq!(cmd, "/sbin/ip address flush dev \"eth0\"");
    }

    #[test]
    fn test_build_add_address_cmd() {
        let (ip, net) = network("192.168.1.10", "255.255.255.0");
        let cmd = build_add_address_cmd("eth0", &ip, &net);
        assert!(cmd.contains("address add 192.168.1.10/24"));
        assert!(cmd.contains("broadcast 192.168.1.255"));
        assert!(cmd.contains("dev \"eth0\""));
    }

    #[test]
    fn test_build_link_cmds() {
        assert_eq!(build_link_up_cmd("eth0"), "/sbin/ip link set dev \"eth0\" up");
        assert_eq!(
            build_link_down_cmd("eth0"),
            "/sbin/ip link set dev \"eth0\" down"
        );
    }

    #[test]
    fn test_build_bridge_cmds() {
        assert_eq!(
            build_create_bridge_cmd("usbeth"),
            "/sbin/ip link add name \"usbeth\" type bridge"
        );
        assert_eq!(
            build_delete_bridge_cmd("usbeth"),
            "/sbin/ip link del dev \"usbeth\""
        );
        let cmd = build_attach_to_bridge_cmd("usbeth", "usb0");
        assert!(cmd.contains("dev \"usb0\" master \"usbeth\""));
    }

    #[test]
    fn test_build_set_mac_cmd() {
        let mac: MacAddress = "02:50:b6:00:00:01".parse().unwrap();
        let cmd = build_set_mac_cmd("usbeth", &mac);
        assert!(cmd.contains("dev \"usbeth\" address 02:50:b6:00:00:01"));
    }

    #[test]
    fn test_build_start_dhcp_server_cmd() {
        let cmd = build_start_dhcp_server_cmd(
            &PathBuf::from("/var/run/netmgr/dnsmasq-usbeth.conf"),
            &PathBuf::from("/var/run/netmgr/dnsmasq-usbeth.pid"),
        );
        assert!(cmd.starts_with("/usr/sbin/dnsmasq"));
        assert!(cmd.contains("--conf-file=\"/var/run/netmgr/dnsmasq-usbeth.conf\""));
        assert!(cmd.contains("--pid-file=\"/var/run/netmgr/dnsmasq-usbeth.pid\""));
    }

    #[test]
    fn test_build_start_dhcp_client_cmd() {
        let cmd =
            build_start_dhcp_client_cmd("eth0", &PathBuf::from("/var/run/netmgr/dhclient-eth0.pid"));
        assert!(cmd.starts_with("/sbin/dhclient -nw"));
        assert!(cmd.contains("-pf \"/var/run/netmgr/dhclient-eth0.pid\""));
        assert!(cmd.ends_with("\"eth0\""));
    }

    #[test]
    fn test_build_kill_cmd() {
        assert_eq!(build_kill_cmd(4242), "/bin/kill 4242");
    }

    #[test]
    fn test_shellquote_safety() {
        // Interface names are quoted, so shell metacharacters stay inert.
        let cmd = build_link_up_cmd("eth0; rm -rf /");
        assert!(cmd.contains("\"eth0; rm -rf /\""));
    }
}
