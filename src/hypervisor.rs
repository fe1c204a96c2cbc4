//! Hypervisor control boundary.
//!
//! The capture pipeline only sees [`HypervisorControl`]: machine lookup,
//! session locking, pause/resume, snapshot creation with an awaitable
//! progress handle and snapshot metadata. Lookup fallbacks live in
//! [`resolution`] so they never leak into pipeline logic.
//!
//! [`VBoxManageControl`] drives VirtualBox through its `VBoxManage` CLI.

pub mod control;
#[cfg(test)]
pub mod mock;
pub mod resolution;
pub mod types;
pub mod vboxmanage;

pub use control::{HypervisorControl, SnapshotProgress};
pub use resolution::{resolve_machine, ResolutionStrategy, DEFAULT_STRATEGIES};
pub use types::{MachineState, SnapshotInfo, VmHandle};
pub use vboxmanage::VBoxManageControl;
