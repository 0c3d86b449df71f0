//! Settings fixtures for common apply scenarios

use netmgrd::{DhcpRange, DhcpServerSettings, EthernetInterfaceSettings};

/// Static address assignment, link up.
pub fn manual_static(name: &str, ip: &str, netmask: &str) -> EthernetInterfaceSettings {
    EthernetInterfaceSettings::manual(name, ip, netmask)
}

/// Static address assignment with the link administratively down.
pub fn manual_disabled(name: &str, ip: &str, netmask: &str) -> EthernetInterfaceSettings {
    EthernetInterfaceSettings::manual(name, ip, netmask).disabled()
}

/// DHCP server on a /24 with a pool spanning .10 to .200.
pub fn dhcp_server(name: &str, gateway_ip: &str, netmask: &str) -> EthernetInterfaceSettings {
    let octets: Vec<&str> = gateway_ip.split('.').collect();
    let subnet = octets[..3].join(".");

    let mut server = DhcpServerSettings::default();
    server.ranges.push(DhcpRange::new(
        format!("{}.10", subnet),
        format!("{}.200", subnet),
        "1h",
    ));
    server.options.insert(3, gateway_ip.to_string());
    server.options.insert(6, gateway_ip.to_string());

    EthernetInterfaceSettings::dhcp_server(name, gateway_ip, netmask, server)
}

/// DHCP server mode with an empty pool; rejected during validation.
pub fn dhcp_server_without_ranges(
    name: &str,
    gateway_ip: &str,
    netmask: &str,
) -> EthernetInterfaceSettings {
    EthernetInterfaceSettings::dhcp_server(
        name,
        gateway_ip,
        netmask,
        DhcpServerSettings::default(),
    )
}

/// DHCP client, link managed by the daemon.
pub fn dhcp_client(name: &str) -> EthernetInterfaceSettings {
    EthernetInterfaceSettings::dhcp_client(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use netmgrd::InterfaceMode;

    #[test]
    fn test_dhcp_server_fixture_pool_matches_subnet() {
        let settings = dhcp_server("usbeth", "172.16.0.1", "255.255.255.0");
        match &settings.mode {
            InterfaceMode::DhcpServer { server, .. } => {
                assert_eq!(server.ranges[0].lower, "172.16.0.10");
                assert_eq!(server.ranges[0].upper, "172.16.0.200");
                server.validate("usbeth").unwrap();
            }
            other => panic!("Expected DhcpServer mode, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_pool_fixture_fails_validation() {
        let settings = dhcp_server_without_ranges("usbeth", "172.16.0.1", "255.255.255.0");
        match &settings.mode {
            InterfaceMode::DhcpServer { server, .. } => {
                assert!(server.validate("usbeth").is_err());
            }
            other => panic!("Expected DhcpServer mode, got {:?}", other),
        }
    }
}
