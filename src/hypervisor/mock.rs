//! In-memory hypervisor used by the unit tests.

use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use super::control::{HypervisorControl, SnapshotProgress};
use super::types::{MachineState, SnapshotInfo, VmHandle};
use crate::configuration::LockMode;
use crate::error_handling::types::HypervisorError;

/// Failure injected into one hypervisor operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Lock,
    Pause,
    SnapshotStart,
    SnapshotWait,
    SnapshotPanic,
    SnapshotHang,
    Resume,
    Unlock,
}

#[derive(Default)]
struct MockState {
    calls: Vec<&'static str>,
    locked: bool,
    paused: bool,
    snapshots: Vec<SnapshotInfo>,
}

pub struct MockHypervisor {
    vm: VmHandle,
    faults: Vec<Fault>,
    state: Mutex<MockState>,
}

impl MockHypervisor {
    pub fn new(name: &str) -> Self {
        Self {
            vm: VmHandle::new(name, Uuid::new_v4()),
            faults: Vec::new(),
            state: Mutex::new(MockState::default()),
        }
    }

    pub fn with_fault(mut self, fault: Fault) -> Self {
        self.faults.push(fault);
        self
    }

    pub fn vm(&self) -> VmHandle {
        self.vm.clone()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| **c == call).count()
    }

    pub fn is_paused(&self) -> bool {
        self.state.lock().unwrap().paused
    }

    pub fn is_locked(&self) -> bool {
        self.state.lock().unwrap().locked
    }

    pub fn snapshots(&self) -> Vec<SnapshotInfo> {
        self.state.lock().unwrap().snapshots.clone()
    }

    /// Marks the machine as held by another session.
    pub fn hold_lock(&self) {
        self.state.lock().unwrap().locked = true;
    }

    fn record(&self, call: &'static str) {
        self.state.lock().unwrap().calls.push(call);
    }

    fn has(&self, fault: Fault) -> bool {
        self.faults.contains(&fault)
    }

    fn check_vm(&self, vm: &VmHandle) -> Result<(), HypervisorError> {
        if *vm == self.vm {
            Ok(())
        } else {
            Err(HypervisorError::NotFound(vm.name.clone()))
        }
    }
}

#[async_trait]
impl HypervisorControl for MockHypervisor {
    async fn find_by_name(&self, name: &str) -> Result<VmHandle, HypervisorError> {
        self.record("find_by_name");
        if name == self.vm.name {
            Ok(self.vm.clone())
        } else {
            Err(HypervisorError::NotFound(name.to_string()))
        }
    }

    async fn find_by_uuid(&self, id: &str) -> Result<VmHandle, HypervisorError> {
        self.record("find_by_uuid");
        if id == self.vm.id.to_string() {
            Ok(self.vm.clone())
        } else {
            Err(HypervisorError::NotFound(id.to_string()))
        }
    }

    async fn lock_machine(&self, vm: &VmHandle, _mode: LockMode) -> Result<(), HypervisorError> {
        self.record("lock_machine");
        self.check_vm(vm)?;
        let mut state = self.state.lock().unwrap();
        if self.has(Fault::Lock) || state.locked {
            return Err(HypervisorError::Locked(vm.name.clone()));
        }
        state.locked = true;
        Ok(())
    }

    async fn unlock_machine(&self, vm: &VmHandle) -> Result<(), HypervisorError> {
        self.record("unlock_machine");
        self.check_vm(vm)?;
        if self.has(Fault::Unlock) {
            return Err(HypervisorError::CommandFailed("unlock refused".into()));
        }
        self.state.lock().unwrap().locked = false;
        Ok(())
    }

    async fn machine_state(&self, vm: &VmHandle) -> Result<MachineState, HypervisorError> {
        self.check_vm(vm)?;
        Ok(if self.is_paused() {
            MachineState::Paused
        } else {
            MachineState::Running
        })
    }

    async fn pause(&self, vm: &VmHandle) -> Result<(), HypervisorError> {
        self.record("pause");
        self.check_vm(vm)?;
        if self.has(Fault::Pause) {
            return Err(HypervisorError::CommandFailed("guest refused to pause".into()));
        }
        self.state.lock().unwrap().paused = true;
        Ok(())
    }

    async fn resume(&self, vm: &VmHandle) -> Result<(), HypervisorError> {
        self.record("resume");
        self.check_vm(vm)?;
        if self.has(Fault::Resume) {
            return Err(HypervisorError::CommandFailed("guest refused to resume".into()));
        }
        self.state.lock().unwrap().paused = false;
        Ok(())
    }

    async fn take_snapshot(
        &self,
        vm: &VmHandle,
        name: &str,
        description: &str,
    ) -> Result<Box<dyn SnapshotProgress>, HypervisorError> {
        self.record("take_snapshot");
        self.check_vm(vm)?;
        if self.has(Fault::SnapshotPanic) {
            panic!("snapshot backend crashed");
        }
        if self.has(Fault::SnapshotStart) {
            return Err(HypervisorError::CommandFailed("snapshot refused".into()));
        }

        let hangs = self.has(Fault::SnapshotHang);
        let fails = self.has(Fault::SnapshotWait);
        if !hangs && !fails {
            let index = self.snapshots().len() + 1;
            self.state.lock().unwrap().snapshots.push(SnapshotInfo {
                id: format!("snap-{}", index),
                name: name.to_string(),
                description: description.to_string(),
                parent_disk_ref: format!("snap-{}", index),
                snapshot_folder: PathBuf::from(format!("/vms/{}/Snapshots", vm.name)),
            });
        }

        Ok(Box::new(MockProgress {
            percent: 0,
            hangs,
            fails,
        }))
    }

    async fn current_snapshot(&self, vm: &VmHandle) -> Result<SnapshotInfo, HypervisorError> {
        self.record("current_snapshot");
        self.check_vm(vm)?;
        self.snapshots()
            .last()
            .cloned()
            .ok_or_else(|| HypervisorError::NotFound("no current snapshot".into()))
    }
}

/// Completes in two polls unless told to hang or fail.
struct MockProgress {
    percent: u8,
    hangs: bool,
    fails: bool,
}

#[async_trait]
impl SnapshotProgress for MockProgress {
    fn percent(&self) -> u8 {
        self.percent
    }

    async fn wait(&mut self, poll: Duration) -> Result<bool, HypervisorError> {
        if self.hangs {
            tokio::time::sleep(poll).await;
            return Ok(false);
        }
        if self.fails {
            return Err(HypervisorError::CommandFailed("snapshot aborted".into()));
        }
        self.percent = (self.percent + 50).min(100);
        Ok(self.percent == 100)
    }
}
