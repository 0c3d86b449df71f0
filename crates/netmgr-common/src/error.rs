//! Error types for network configuration operations.
//!
//! All errors implement `std::error::Error` via `thiserror` and carry enough
//! context (interface name, failing command) to diagnose a failed apply.

use std::io;
use thiserror::Error;

use netmgr_types::ParseError;

/// Result type alias for network configuration operations.
pub type NetMgrResult<T> = Result<T, NetMgrError>;

/// Errors that can occur while driving interface configuration.
#[derive(Debug, Error)]
pub enum NetMgrError {
    /// Failed to execute a shell command (spawn error).
    #[error("Failed to execute shell command '{command}': {source}")]
    ShellExec {
        /// The command that failed to execute.
        command: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Shell command returned non-zero exit code.
    #[error("Shell command failed: '{command}' (exit code {exit_code}): {output}")]
    ShellCommandFailed {
        /// The command that failed.
        command: String,
        /// The exit code.
        exit_code: i32,
        /// Combined stdout/stderr output.
        output: String,
    },

    /// A sysfs attribute write failed.
    #[error("Sysfs write to '{path}' failed: {source}")]
    Sysfs {
        /// The attribute path that was written.
        path: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// A file operation failed (config file write, pid file read).
    #[error("{context}: {source}")]
    Io {
        /// What was being done.
        context: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Named interface does not exist in the OS interface table.
    #[error("Interface '{interface}' not found")]
    InterfaceNotFound {
        /// The interface name.
        interface: String,
    },

    /// Malformed IPv4 address, netmask or MAC string.
    #[error("Address parse error: {0}")]
    AddressParse(#[from] ParseError),

    /// A mode requires sub-configuration that is absent or inconsistent.
    #[error("Invalid configuration for interface '{interface}': {message}")]
    InvalidConfig {
        /// The interface the configuration targets.
        interface: String,
        /// Error message.
        message: String,
    },

    /// DHCP daemon lifecycle operation failed.
    #[error("DHCP process error on interface '{interface}': {message}")]
    Process {
        /// The interface the daemon is bound to.
        interface: String,
        /// Error message.
        message: String,
    },

    /// Internal error (unexpected state).
    #[error("Internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl NetMgrError {
    /// Creates an interface-not-found error.
    pub fn interface_not_found(interface: impl Into<String>) -> Self {
        Self::InterfaceNotFound {
            interface: interface.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(interface: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            interface: interface.into(),
            message: message.into(),
        }
    }

    /// Creates a DHCP process error.
    pub fn process(interface: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Process {
            interface: interface.into(),
            message: message.into(),
        }
    }

    /// Creates an IO error with context.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
