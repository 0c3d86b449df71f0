//! netmgrd daemon entry point.
//!
//! Initializes logging, bootstraps the USB ethernet bridge and applies the
//! built-in default settings to every managed interface that is present.

use std::process::ExitCode;

use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use netmgrd::defaults;
use netmgrd::{DnsmasqDhcpManager, EthernetMgr, ShellLinkController};

/// Initialize tracing/logging.
fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    info!("--- Starting netmgrd ---");

    let link = ShellLinkController::new();

    // Bridge bootstrap can fail on hardware without the USB gadget stack;
    // interface defaults are still worth attempting.
    if let Err(e) = defaults::init_usb_ethernet_bridge(&link).await {
        warn!("USB ethernet bridge bootstrap failed: {}", e);
    }

    let mgr = EthernetMgr::new(link, DnsmasqDhcpManager::new());

    match defaults::init_default_settings(&mgr).await {
        Ok(()) => {
            info!("Default network settings applied");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Default network settings incomplete: {}", e);
            ExitCode::FAILURE
        }
    }
}
