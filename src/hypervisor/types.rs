use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use uuid::Uuid;

/// A resolved guest. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct VmHandle {
    /// Machine name as registered with the hypervisor.
    pub name: String,
    pub id: Uuid,
}

impl VmHandle {
    pub fn new(name: impl Into<String>, id: Uuid) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }
}

impl fmt::Display for VmHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({{{}}})", self.name, self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MachineState {
    Running,
    Paused,
    PoweredOff,
    Saved,
    Other(String),
}

impl MachineState {
    /// Parses the `VMState` value reported by the hypervisor.
    pub fn from_hypervisor(value: &str) -> Self {
        match value {
            "running" => MachineState::Running,
            "paused" => MachineState::Paused,
            "poweroff" => MachineState::PoweredOff,
            "saved" => MachineState::Saved,
            other => MachineState::Other(other.to_string()),
        }
    }
}

/// Metadata of the snapshot the hypervisor currently considers current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Reference handed to the snapshot-to-disk resolver to find the
    /// point-in-time base disk.
    pub parent_disk_ref: String,
    pub snapshot_folder: PathBuf,
}
