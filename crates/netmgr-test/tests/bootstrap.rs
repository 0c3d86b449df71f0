//! Bootstrap scenarios: bridge initialization and default settings

use netmgr_test::{fake_env, WorldVerifier};
use netmgrd::defaults;
use netmgrd::EthernetMgr;

#[tokio::test]
async fn bridge_init_creates_and_configures_bridge() {
    // Only one of the two gadget interfaces is present.
    let (world, link, _dhcp) = fake_env(&["usb0"]);

    defaults::init_usb_ethernet_bridge(&link)
        .await
        .expect("bridge init failed");

    let verifier = WorldVerifier::new(&world);
    verifier.assert_op("create_bridge(usbeth)").unwrap();
    verifier.assert_op("set_mac(usbeth,02:50:b6:00:00:01)").unwrap();
    verifier.assert_op("set_bridge_stp(usbeth,false)").unwrap();
    verifier.assert_op("set_bridge_forward_delay(usbeth,0)").unwrap();
    verifier.assert_op("attach_to_bridge(usbeth,usb0)").unwrap();
    verifier.assert_op_absent("attach_to_bridge(usbeth,usb1)").unwrap();
    verifier.assert_op_before("create_bridge(usbeth)", "link_up(usbeth)").unwrap();
    verifier.assert_link_up("usbeth", true).unwrap();

    let world = world.lock().unwrap();
    assert_eq!(world.bridge_members.get("usb0").unwrap(), "usbeth");
}

#[tokio::test]
async fn bridge_init_skips_creation_when_bridge_exists() {
    let (world, link, _dhcp) = fake_env(&["usbeth", "usb0", "usb1"]);

    defaults::init_usb_ethernet_bridge(&link)
        .await
        .expect("bridge init failed");

    let verifier = WorldVerifier::new(&world);
    verifier.assert_op_absent("create_bridge").unwrap();
    verifier.assert_op("attach_to_bridge(usbeth,usb0)").unwrap();
    verifier.assert_op("attach_to_bridge(usbeth,usb1)").unwrap();
}

#[tokio::test]
async fn default_settings_apply_only_to_present_interfaces() {
    let (world, link, dhcp) = fake_env(&["wlan0"]);
    let mgr = EthernetMgr::new(link, dhcp);

    defaults::init_default_settings(&mgr)
        .await
        .expect("bootstrap failed");

    let verifier = WorldVerifier::new(&world);
    verifier.assert_server_running("wlan0", true).unwrap();
    verifier.assert_server_running("usbeth", false).unwrap();
    verifier.assert_op_absent("flush_addresses(usbeth)").unwrap();
}

#[tokio::test]
async fn default_settings_cover_all_managed_interfaces() {
    let (world, link, dhcp) = fake_env(&["usbeth", "wlan0"]);
    let mgr = EthernetMgr::new(link, dhcp);

    defaults::init_default_settings(&mgr)
        .await
        .expect("bootstrap failed");

    let verifier = WorldVerifier::new(&world);
    verifier.assert_server_running("usbeth", true).unwrap();
    verifier.assert_server_running("wlan0", true).unwrap();
    verifier.assert_addresses("usbeth", &["172.16.0.1/24"]).unwrap();
    verifier.assert_addresses("wlan0", &["172.24.0.1/24"]).unwrap();
    verifier.assert_exclusive_role("usbeth").unwrap();
    verifier.assert_exclusive_role("wlan0").unwrap();
}

#[tokio::test]
async fn bootstrap_continues_past_a_failing_interface() {
    let (world, link, dhcp) = fake_env(&["usbeth", "wlan0"]);
    world.lock().unwrap().fail_on("start_server(usbeth");
    let mgr = EthernetMgr::new(link, dhcp);

    // The usbeth failure is surfaced, but wlan0 is still bootstrapped.
    let err = defaults::init_default_settings(&mgr).await.unwrap_err();
    assert!(err.to_string().contains("injected failure"));

    let verifier = WorldVerifier::new(&world);
    verifier.assert_server_running("usbeth", false).unwrap();
    verifier.assert_server_running("wlan0", true).unwrap();
}
