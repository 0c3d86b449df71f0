//! Integration test infrastructure for the network configuration daemon
//!
//! Provides reusable pieces for exercising the orchestrator without real
//! kernel or process access:
//!
//! - [`fixtures`]: ready-made settings records for common scenarios
//! - [`fakes`]: stateful in-memory [`netmgrd::LinkController`] /
//!   [`netmgrd::DhcpManager`] implementations sharing one simulated world
//! - [`verification`]: assertion helpers over the simulated world and its
//!   operation journal

pub mod fakes;
pub mod fixtures;
pub mod verification;

pub use fakes::{fake_env, FakeDhcp, FakeLink, NetWorld, SharedWorld};
pub use verification::{VerificationError, VerifyResult, WorldVerifier};
