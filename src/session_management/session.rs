use crate::configuration::LockMode;
use crate::hypervisor::VmHandle;
use super::SessionStatus;
use chrono::{DateTime, Utc};
use log::error;
use uuid::Uuid;

/// Control over one guest for the duration of a capture.
///
/// A session is consumed by
/// [`SessionController::release`](super::SessionController::release), so it
/// can be released at most once; dropping one that was never released is
/// logged as a leak.
#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub vm: VmHandle,
    pub mode: LockMode,
    pub acquired_at: DateTime<Utc>,
    pub status: SessionStatus,
    /// Whether a pause succeeded, so resume is owed.
    pub(crate) pause_owed_resume: bool,
}

impl Session {
    pub(crate) fn new(vm: VmHandle, mode: LockMode) -> Self {
        Self {
            id: Uuid::new_v4(),
            vm,
            mode,
            acquired_at: Utc::now(),
            status: SessionStatus::Locked,
            pause_owed_resume: false,
        }
    }

    /// True once the guest was paused and not yet resumed successfully.
    pub fn needs_resume(&self) -> bool {
        self.pause_owed_resume
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.status != SessionStatus::Released {
            error!(
                "[{}] session on {} dropped without release (status {:?})",
                self.id, self.vm, self.status
            );
        }
    }
}
