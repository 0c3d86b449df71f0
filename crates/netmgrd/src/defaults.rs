//! Default settings bootstrap for managed interfaces
//!
//! On startup the gateway brings up its USB ethernet bridge and applies
//! built-in defaults to every managed interface that is present on the
//! hardware. A failure on one interface is logged and does not block the
//! others; the first error is still surfaced to the caller once all
//! interfaces have been attempted.

use tracing::{debug, info, warn};

use netmgr_common::NetMgrResult;
use netmgr_types::MacAddress;

use crate::dhcp::DhcpManager;
use crate::ethernet_mgr::EthernetMgr;
use crate::link::LinkController;
use crate::tables::{
    DEFAULT_LEASE_TIME, DEFAULT_USB_IP, DEFAULT_USB_NETMASK, DEFAULT_USB_RANGE_LOWER,
    DEFAULT_USB_RANGE_UPPER, DEFAULT_WIFI_IP, DEFAULT_WIFI_NETMASK, DEFAULT_WIFI_RANGE_LOWER,
    DEFAULT_WIFI_RANGE_UPPER, DHCP_OPT_DNS, DHCP_OPT_ROUTER, USB_BRIDGE_MAC,
    USB_ETHERNET_BRIDGE_NAME, USB_GADGET_MEMBER_INTERFACES, WIFI_INTERFACE_NAME,
};
use crate::types::{DhcpRange, DhcpServerSettings, EthernetInterfaceSettings};

fn default_server_settings(gateway_ip: &str, lower: &str, upper: &str) -> DhcpServerSettings {
    let mut server = DhcpServerSettings::default();
    server
        .ranges
        .push(DhcpRange::new(lower, upper, DEFAULT_LEASE_TIME));
    server
        .options
        .insert(DHCP_OPT_ROUTER, gateway_ip.to_string());
    server.options.insert(DHCP_OPT_DNS, gateway_ip.to_string());
    server
}

/// Built-in defaults for the USB ethernet bridge: DHCP server handing out
/// leases to the attached host.
pub fn default_usb_settings() -> EthernetInterfaceSettings {
    EthernetInterfaceSettings::dhcp_server(
        USB_ETHERNET_BRIDGE_NAME,
        DEFAULT_USB_IP,
        DEFAULT_USB_NETMASK,
        default_server_settings(
            DEFAULT_USB_IP,
            DEFAULT_USB_RANGE_LOWER,
            DEFAULT_USB_RANGE_UPPER,
        ),
    )
}

/// Built-in defaults for the wireless interface: DHCP server for
/// access-point clients.
pub fn default_wifi_settings() -> EthernetInterfaceSettings {
    EthernetInterfaceSettings::dhcp_server(
        WIFI_INTERFACE_NAME,
        DEFAULT_WIFI_IP,
        DEFAULT_WIFI_NETMASK,
        default_server_settings(
            DEFAULT_WIFI_IP,
            DEFAULT_WIFI_RANGE_LOWER,
            DEFAULT_WIFI_RANGE_UPPER,
        ),
    )
}

/// Creates and configures the USB ethernet bridge.
///
/// Creation is skipped when the bridge is already present (daemon restart).
/// STP is disabled and the forward delay zeroed so the host-side link is
/// usable immediately; the gadget function interfaces are attached when
/// they exist.
pub async fn init_usb_ethernet_bridge<L: LinkController>(link: &L) -> NetMgrResult<()> {
    let bridge = USB_ETHERNET_BRIDGE_NAME;

    if link.exists(bridge).await {
        info!("Bridge {} already exists, skipping creation", bridge);
    } else {
        link.create_bridge(bridge).await?;
    }

    let mac: MacAddress = USB_BRIDGE_MAC.parse()?;
    link.set_mac(bridge, &mac).await?;
    link.set_bridge_stp(bridge, false).await?;
    link.set_bridge_forward_delay(bridge, 0).await?;

    for member in USB_GADGET_MEMBER_INTERFACES {
        if link.exists(member).await {
            link.attach_to_bridge(bridge, member).await?;
        } else {
            debug!("Gadget interface {} not present, skipping", member);
        }
    }

    link.link_up(bridge).await?;
    info!("USB ethernet bridge {} initialized", bridge);
    Ok(())
}

/// Applies built-in default settings to every managed interface that is
/// present.
///
/// Detection and apply failures are per-interface: each is logged and the
/// remaining interfaces are still bootstrapped. The first error, if any,
/// is returned after the full pass.
pub async fn init_default_settings<L, D>(mgr: &EthernetMgr<L, D>) -> NetMgrResult<()>
where
    L: LinkController,
    D: DhcpManager,
{
    let mut first_err = None;

    for settings in [default_usb_settings(), default_wifi_settings()] {
        if !mgr.link().exists(&settings.name).await {
            debug!("Managed interface {} not present, skipping", settings.name);
            continue;
        }

        info!("Applying default settings to interface {}", settings.name);
        if let Err(e) = mgr.apply(&settings).await {
            warn!(
                "Failed to apply default settings to {}: {}",
                settings.name, e
            );
            if first_err.is_none() {
                first_err = Some(e);
            }
        }
    }

    match first_err {
        None => Ok(()),
        Some(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InterfaceMode;

    #[test]
    fn test_default_usb_settings_are_valid() {
        let settings = default_usb_settings();
        assert_eq!(settings.name, USB_ETHERNET_BRIDGE_NAME);
        assert!(settings.enabled);

        match &settings.mode {
            InterfaceMode::DhcpServer {
                address, server, ..
            } => {
                assert_eq!(address, DEFAULT_USB_IP);
                server.validate(&settings.name).unwrap();
                assert_eq!(server.options.get(&DHCP_OPT_ROUTER).unwrap(), DEFAULT_USB_IP);
            }
            other => panic!("Expected DhcpServer mode, got {:?}", other),
        }
    }

    #[test]
    fn test_default_wifi_settings_are_valid() {
        let settings = default_wifi_settings();
        assert_eq!(settings.name, WIFI_INTERFACE_NAME);

        match &settings.mode {
            InterfaceMode::DhcpServer { server, .. } => {
                server.validate(&settings.name).unwrap();
            }
            other => panic!("Expected DhcpServer mode, got {:?}", other),
        }
    }

    #[test]
    fn test_default_subnets_do_not_overlap() {
        use netmgr_types::Ipv4Network;

        let (usb_ip, usb_net) = Ipv4Network::derive(DEFAULT_USB_IP, DEFAULT_USB_NETMASK).unwrap();
        let (wifi_ip, wifi_net) =
            Ipv4Network::derive(DEFAULT_WIFI_IP, DEFAULT_WIFI_NETMASK).unwrap();

        assert!(!usb_net.contains(&wifi_ip));
        assert!(!wifi_net.contains(&usb_ip));
    }

    #[test]
    fn test_bridge_mac_is_locally_administered() {
        let mac: MacAddress = USB_BRIDGE_MAC.parse().unwrap();
        assert!(mac.is_local());
        assert!(mac.is_unicast());
    }
}
