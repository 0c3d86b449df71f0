//! Safe execution of the external commands the daemon drives.
//!
//! Every mutation netmgrd performs on the system goes through an external
//! binary (`ip(8)`, `dnsmasq`, `dhclient`, `kill`) spliced into a
//! `/bin/sh -c` command line. Interface names and file paths originate from
//! configuration input, so they must pass through [`shellquote`] before
//! being spliced in.
//!
//! # Example
//!
//! ```ignore
//! use netmgr_common::shell::{self, IP_CMD, shellquote};
//!
//! let name = "eth0";
//! let cmd = format!("{} link set dev {} up", IP_CMD, shellquote(name));
//! shell::run_checked(&cmd).await?;
//! ```

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::process::Stdio;
use tokio::process::Command;

use crate::error::{NetMgrError, NetMgrResult};

/// Path to the `ip` command for link and address configuration.
pub const IP_CMD: &str = "/sbin/ip";

/// Path to the `dnsmasq` daemon used as the per-interface DHCP server.
pub const DNSMASQ_CMD: &str = "/usr/sbin/dnsmasq";

/// Path to the `dhclient` daemon used as the DHCP client.
pub const DHCLIENT_CMD: &str = "/sbin/dhclient";

/// Path to the `kill` command for daemon shutdown.
pub const KILL_CMD: &str = "/bin/kill";

// Characters that keep their special meaning inside shell double quotes:
// $, `, ", \ and newline.
static QUOTE_ESCAPES: Lazy<Regex> =
    Lazy::new(|| Regex::new("[$`\"\\\\\n]").expect("escape class is valid"));

/// Quotes a string for safe splicing into a shell command line.
///
/// The string is wrapped in double quotes with every character that stays
/// special inside them backslash-escaped.
///
/// # Example
///
/// ```
/// use netmgr_common::shell::shellquote;
///
/// assert_eq!(shellquote("eth0"), "\"eth0\"");
/// assert_eq!(shellquote("a$b"), "\"a\\$b\"");
/// ```
pub fn shellquote(s: &str) -> String {
    let escaped = QUOTE_ESCAPES.replace_all(s, |caps: &Captures<'_>| format!("\\{}", &caps[0]));
    format!("\"{}\"", escaped)
}

/// Captured outcome of one command run.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit status of the command; 0 means success.
    pub status: i32,
    /// Trimmed stdout.
    pub stdout: String,
    /// Trimmed stderr.
    pub stderr: String,
}

impl CommandOutput {
    /// True when the command exited with status 0.
    pub fn ok(&self) -> bool {
        self.status == 0
    }

    /// Both output streams folded into one string for error reporting.
    pub fn detail(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (true, _) => self.stderr.clone(),
            (_, true) => self.stdout.clone(),
            _ => format!("{}\n{}", self.stdout, self.stderr),
        }
    }
}

/// Runs a command line through `/bin/sh -c` and captures its outcome.
///
/// A non-zero exit is not an error at this level; callers that only care
/// about success use [`run_checked`]. Only a spawn failure is reported,
/// as [`NetMgrError::ShellExec`].
pub async fn run(cmd: &str) -> NetMgrResult<CommandOutput> {
    tracing::debug!(command = %cmd, "Running command");

    let captured = Command::new("/bin/sh")
        .args(["-c", cmd])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| NetMgrError::ShellExec {
            command: cmd.to_string(),
            source: e,
        })?;

    let output = CommandOutput {
        status: captured.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&captured.stdout).trim().to_string(),
        stderr: String::from_utf8_lossy(&captured.stderr).trim().to_string(),
    };

    if !output.ok() {
        tracing::warn!(
            command = %cmd,
            status = output.status,
            stderr = %output.stderr,
            "Command failed"
        );
    }

    Ok(output)
}

/// Runs a command line and treats a non-zero exit as an error.
///
/// Returns the command's stdout on success; failure carries the command
/// line, exit status and folded output.
pub async fn run_checked(cmd: &str) -> NetMgrResult<String> {
    let output = run(cmd).await?;
    if !output.ok() {
        return Err(NetMgrError::ShellCommandFailed {
            command: cmd.to_string(),
            exit_code: output.status,
            output: output.detail(),
        });
    }
    Ok(output.stdout)
}
