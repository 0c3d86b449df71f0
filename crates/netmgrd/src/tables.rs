//! Path, interface name and default-settings constants for netmgrd

/// Name of the USB ethernet bridge interface created at boot.
pub const USB_ETHERNET_BRIDGE_NAME: &str = "usbeth";

/// Name of the onboard wireless interface.
pub const WIFI_INTERFACE_NAME: &str = "wlan0";

/// USB gadget function interfaces attached to the USB ethernet bridge
/// (RNDIS and CDC ECM endpoints). A missing member is skipped during
/// bridge bootstrap, not an error.
pub const USB_GADGET_MEMBER_INTERFACES: [&str; 2] = ["usb0", "usb1"];

/// Fixed locally administered MAC assigned to the USB ethernet bridge so
/// the host side sees a stable adapter identity across reboots.
pub const USB_BRIDGE_MAC: &str = "02:50:b6:00:00:01";

/// Sysfs directory holding per-interface network attributes.
pub const SYSFS_NET_DIR: &str = "/sys/class/net";

/// Sysfs attribute for bridge STP state, written as ASCII "0"/"1".
pub const BRIDGE_STP_ATTR: &str = "bridge/stp_state";

/// Sysfs attribute for bridge forward delay, written as ASCII decimal.
pub const BRIDGE_FORWARD_DELAY_ATTR: &str = "bridge/forward_delay";

/// Directory holding generated DHCP server config files.
pub const DHCP_CONF_DIR: &str = "/var/run/netmgr";

/// Directory holding DHCP daemon pid files and lease databases.
pub const DHCP_RUN_DIR: &str = "/var/run/netmgr";

/// Root of the proc filesystem, used to probe daemon liveness by pid.
pub const PROC_DIR: &str = "/proc";

// Built-in default settings applied by the bootstrapper.

/// Gateway address handed to the USB ethernet bridge.
pub const DEFAULT_USB_IP: &str = "172.16.0.1";
/// Netmask for the USB ethernet subnet.
pub const DEFAULT_USB_NETMASK: &str = "255.255.255.0";
/// DHCP pool bounds for USB-attached hosts.
pub const DEFAULT_USB_RANGE_LOWER: &str = "172.16.0.2";
pub const DEFAULT_USB_RANGE_UPPER: &str = "172.16.0.100";

/// Gateway address for the wireless access-point subnet.
pub const DEFAULT_WIFI_IP: &str = "172.24.0.1";
/// Netmask for the wireless subnet.
pub const DEFAULT_WIFI_NETMASK: &str = "255.255.255.0";
/// DHCP pool bounds for wireless clients.
pub const DEFAULT_WIFI_RANGE_LOWER: &str = "172.24.0.2";
pub const DEFAULT_WIFI_RANGE_UPPER: &str = "172.24.0.100";

/// Default lease duration in dnsmasq syntax.
pub const DEFAULT_LEASE_TIME: &str = "5m";

/// DHCP option code for the default router.
pub const DHCP_OPT_ROUTER: u32 = 3;
/// DHCP option code for the DNS server list.
pub const DHCP_OPT_DNS: u32 = 6;
