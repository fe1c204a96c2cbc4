use std::time::Duration;

use async_trait::async_trait;

use super::types::{MachineState, SnapshotInfo, VmHandle};
use crate::configuration::LockMode;
use crate::error_handling::types::HypervisorError;

/// Awaitable reference to a long-running snapshot operation.
#[async_trait]
pub trait SnapshotProgress: Send {
    /// Last known percent complete, 0 to 100.
    fn percent(&self) -> u8;

    /// Waits at most `poll` for the operation to finish.
    ///
    /// Returns `Ok(true)` once it has completed successfully, `Ok(false)` if it
    /// is still running, and an error if it finished unsuccessfully.
    async fn wait(&mut self, poll: Duration) -> Result<bool, HypervisorError>;
}

/// Operations the capture needs from a hypervisor.
#[async_trait]
pub trait HypervisorControl: Send + Sync {
    async fn find_by_name(&self, name: &str) -> Result<VmHandle, HypervisorError>;

    async fn find_by_uuid(&self, id: &str) -> Result<VmHandle, HypervisorError>;

    /// Takes a session lock; fails fast with [`HypervisorError::Locked`] when
    /// another session already holds the machine.
    async fn lock_machine(&self, vm: &VmHandle, mode: LockMode) -> Result<(), HypervisorError>;

    async fn unlock_machine(&self, vm: &VmHandle) -> Result<(), HypervisorError>;

    async fn machine_state(&self, vm: &VmHandle) -> Result<MachineState, HypervisorError>;

    /// Blocks until the guest is frozen.
    async fn pause(&self, vm: &VmHandle) -> Result<(), HypervisorError>;

    async fn resume(&self, vm: &VmHandle) -> Result<(), HypervisorError>;

    async fn take_snapshot(
        &self,
        vm: &VmHandle,
        name: &str,
        description: &str,
    ) -> Result<Box<dyn SnapshotProgress>, HypervisorError>;

    async fn current_snapshot(&self, vm: &VmHandle) -> Result<SnapshotInfo, HypervisorError>;
}
