//! Verification helpers for orchestrator scenarios
//!
//! Assertion helpers over the simulated [`NetWorld`](crate::NetWorld):
//! final state (addresses, link state, daemons) and operation ordering.

use thiserror::Error;

use crate::fakes::SharedWorld;

/// Verification error types
#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("Expected operation '{op}' not found in journal")]
    OpNotFound { op: String },

    #[error("Operation '{op}' found in journal but none was expected")]
    UnexpectedOp { op: String },

    #[error("Operation '{first}' did not run before '{second}'")]
    OpOrder { first: String, second: String },

    #[error("Interface '{interface}' holds conflicting roles: {roles}")]
    RoleConflict { interface: String, roles: String },

    #[error("State mismatch for {what}: expected '{expected}', got '{actual}'")]
    StateMismatch {
        what: String,
        expected: String,
        actual: String,
    },
}

/// Result type for verification operations
pub type VerifyResult<T> = Result<T, VerificationError>;

/// Assertion helper over a shared fake world.
pub struct WorldVerifier<'a> {
    world: &'a SharedWorld,
}

impl<'a> WorldVerifier<'a> {
    /// Creates a verifier over the given world.
    pub fn new(world: &'a SharedWorld) -> Self {
        Self { world }
    }

    fn find(&self, prefix: &str) -> Option<usize> {
        self.world
            .lock()
            .unwrap()
            .journal
            .iter()
            .position(|e| e.starts_with(prefix))
    }

    /// Verifies an operation matching `prefix` was performed.
    pub fn assert_op(&self, prefix: &str) -> VerifyResult<()> {
        if self.find(prefix).is_none() {
            return Err(VerificationError::OpNotFound {
                op: prefix.to_string(),
            });
        }
        Ok(())
    }

    /// Verifies no operation matching `prefix` was performed.
    pub fn assert_op_absent(&self, prefix: &str) -> VerifyResult<()> {
        if self.find(prefix).is_some() {
            return Err(VerificationError::UnexpectedOp {
                op: prefix.to_string(),
            });
        }
        Ok(())
    }

    /// Verifies the first `first` operation ran before the first `second`.
    pub fn assert_op_before(&self, first: &str, second: &str) -> VerifyResult<()> {
        let first_pos = self.find(first).ok_or_else(|| VerificationError::OpNotFound {
            op: first.to_string(),
        })?;
        let second_pos = self
            .find(second)
            .ok_or_else(|| VerificationError::OpNotFound {
                op: second.to_string(),
            })?;

        if first_pos < second_pos {
            Ok(())
        } else {
            Err(VerificationError::OpOrder {
                first: first.to_string(),
                second: second.to_string(),
            })
        }
    }

    /// Verifies the journal holds no state-changing operations
    /// (status queries and existence probes are not mutations).
    pub fn assert_no_mutations(&self) -> VerifyResult<()> {
        let world = self.world.lock().unwrap();
        for entry in &world.journal {
            if !entry.starts_with("server_status") && !entry.starts_with("client_status") {
                return Err(VerificationError::UnexpectedOp { op: entry.clone() });
            }
        }
        Ok(())
    }

    /// Verifies the interface holds the given addresses, in order.
    pub fn assert_addresses(&self, interface: &str, expected: &[&str]) -> VerifyResult<()> {
        let world = self.world.lock().unwrap();
        let actual: Vec<String> = world
            .addresses
            .get(interface)
            .cloned()
            .unwrap_or_default();
        let expected: Vec<String> = expected.iter().map(|s| s.to_string()).collect();

        if actual == expected {
            Ok(())
        } else {
            Err(VerificationError::StateMismatch {
                what: format!("addresses on {}", interface),
                expected: format!("{:?}", expected),
                actual: format!("{:?}", actual),
            })
        }
    }

    /// Verifies the administrative link state.
    pub fn assert_link_up(&self, interface: &str, expected: bool) -> VerifyResult<()> {
        let world = self.world.lock().unwrap();
        let actual = world.link_up.get(interface).copied().unwrap_or(false);
        if actual == expected {
            Ok(())
        } else {
            Err(VerificationError::StateMismatch {
                what: format!("link state of {}", interface),
                expected: expected.to_string(),
                actual: actual.to_string(),
            })
        }
    }

    /// Verifies whether a DHCP server runs on the interface.
    pub fn assert_server_running(&self, interface: &str, expected: bool) -> VerifyResult<()> {
        let actual = self.world.lock().unwrap().servers.contains(interface);
        if actual == expected {
            Ok(())
        } else {
            Err(VerificationError::StateMismatch {
                what: format!("DHCP server on {}", interface),
                expected: expected.to_string(),
                actual: actual.to_string(),
            })
        }
    }

    /// Verifies whether a DHCP client runs on the interface.
    pub fn assert_client_running(&self, interface: &str, expected: bool) -> VerifyResult<()> {
        let actual = self.world.lock().unwrap().clients.contains(interface);
        if actual == expected {
            Ok(())
        } else {
            Err(VerificationError::StateMismatch {
                what: format!("DHCP client on {}", interface),
                expected: expected.to_string(),
                actual: actual.to_string(),
            })
        }
    }

    /// Verifies at most one of {static address, server role, client role}
    /// holds for the interface.
    pub fn assert_exclusive_role(&self, interface: &str) -> VerifyResult<()> {
        let world = self.world.lock().unwrap();

        let mut roles = Vec::new();
        if world
            .addresses
            .get(interface)
            .map(|a| !a.is_empty())
            .unwrap_or(false)
            && !world.servers.contains(interface)
        {
            roles.push("static");
        }
        if world.servers.contains(interface) {
            roles.push("server");
        }
        if world.clients.contains(interface) {
            roles.push("client");
        }

        if roles.len() > 1 {
            return Err(VerificationError::RoleConflict {
                interface: interface.to_string(),
                roles: roles.join("+"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::fake_env;

    #[tokio::test]
    async fn test_op_assertions() {
        let (world, link, _dhcp) = fake_env(&["eth0"]);
        use netmgrd::LinkController;
        link.link_up("eth0").await.unwrap();

        let verifier = WorldVerifier::new(&world);
        verifier.assert_op("link_up(eth0)").expect("op recorded");
        assert!(verifier.assert_op("link_down").is_err());
        verifier.assert_op_absent("link_down").expect("no link_down");
    }

    #[tokio::test]
    async fn test_order_assertion() {
        let (world, link, _dhcp) = fake_env(&["eth0"]);
        use netmgrd::LinkController;
        link.flush_addresses("eth0").await.unwrap();
        link.link_up("eth0").await.unwrap();

        let verifier = WorldVerifier::new(&world);
        verifier
            .assert_op_before("flush_addresses", "link_up")
            .expect("flush before up");
        assert!(verifier.assert_op_before("link_up", "flush_addresses").is_err());
    }

    #[tokio::test]
    async fn test_role_conflict_detection() {
        let (world, _link, _dhcp) = fake_env(&["eth0"]);
        {
            let mut w = world.lock().unwrap();
            w.servers.insert("eth0".to_string());
            w.clients.insert("eth0".to_string());
        }

        let verifier = WorldVerifier::new(&world);
        assert!(verifier.assert_exclusive_role("eth0").is_err());
    }
}
