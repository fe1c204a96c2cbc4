use std::sync::Arc;

use log::{debug, error, info, warn};

use super::session::Session;
use super::SessionStatus;
use crate::configuration::LockMode;
use crate::error_handling::types::CaptureError;
use crate::hypervisor::{resolve_machine, HypervisorControl, ResolutionStrategy, VmHandle, DEFAULT_STRATEGIES};

/// Drives one guest through lock, pause, resume and release.
///
/// Failures come back already classified as [`CaptureError`] so the
/// orchestrator can record them without reinterpreting hypervisor errors.
pub struct SessionController {
    hypervisor: Arc<dyn HypervisorControl>,
    strategies: Vec<ResolutionStrategy>,
    lock_mode: LockMode,
}

impl SessionController {
    pub fn new(hypervisor: Arc<dyn HypervisorControl>, lock_mode: LockMode) -> Self {
        Self {
            hypervisor,
            strategies: DEFAULT_STRATEGIES.to_vec(),
            lock_mode,
        }
    }

    pub fn with_strategies(mut self, strategies: &[ResolutionStrategy]) -> Self {
        self.strategies = strategies.to_vec();
        self
    }

    pub fn hypervisor(&self) -> &Arc<dyn HypervisorControl> {
        &self.hypervisor
    }

    pub async fn resolve(&self, identifier: &str) -> Result<VmHandle, CaptureError> {
        resolve_machine(self.hypervisor.as_ref(), identifier, &self.strategies)
            .await
            .map_err(|e| {
                error!("Could not find VM named {}: {}", identifier, e);
                CaptureError::VmNotFound(identifier.to_string())
            })
    }

    /// Takes the machine lock. No guest state is touched.
    pub async fn acquire(&self, vm: &VmHandle) -> Result<Session, CaptureError> {
        self.hypervisor
            .lock_machine(vm, self.lock_mode)
            .await
            .map_err(|e| {
                error!("Unable to lock {}: {}", vm, e);
                CaptureError::LockFailure(e)
            })?;
        let session = Session::new(vm.clone(), self.lock_mode);
        info!("[{}] Locked {} ({:?})", session.id, vm, self.lock_mode);
        Ok(session)
    }

    /// Freezes the guest. Calling it on an already paused session is a no-op.
    pub async fn pause(&self, session: &mut Session) -> Result<(), CaptureError> {
        if session.status == SessionStatus::Paused {
            debug!("[{}] {} already paused", session.id, session.vm);
            return Ok(());
        }
        info!("Temporarily pausing {}...", session.vm);
        self.hypervisor.pause(&session.vm).await.map_err(|e| {
            error!("[{}] Unable to pause {}: {}", session.id, session.vm, e);
            CaptureError::PauseFailure(e)
        })?;
        session.status = SessionStatus::Paused;
        session.pause_owed_resume = true;
        info!("Paused.");
        Ok(())
    }

    /// Resumes a guest this session paused. Sessions that never paused are
    /// left alone.
    pub async fn resume(&self, session: &mut Session) -> Result<(), CaptureError> {
        if !session.needs_resume() {
            debug!("[{}] {} was never paused, nothing to resume", session.id, session.vm);
            return Ok(());
        }
        info!("Reviving {}...", session.vm);
        match self.hypervisor.resume(&session.vm).await {
            Ok(()) => {
                session.pause_owed_resume = false;
                session.status = SessionStatus::Resumed;
                info!("{} is live again", session.vm);
                Ok(())
            }
            Err(e) => {
                error!(
                    "[{}] RESUME FAILED for {}: {}. The guest may still be paused; manual intervention required.",
                    session.id, session.vm, e
                );
                Err(CaptureError::ResumeFailure(e))
            }
        }
    }

    /// Gives the lock back. Consumes the session, so this happens once.
    pub async fn release(&self, mut session: Session) -> Result<(), CaptureError> {
        if session.needs_resume() {
            warn!(
                "[{}] Releasing {} while the guest may still be paused",
                session.id, session.vm
            );
        }
        let outcome = self.hypervisor.unlock_machine(&session.vm).await;
        session.status = SessionStatus::Released;
        match outcome {
            Ok(()) => {
                info!("[{}] Session on {} unlocked", session.id, session.vm);
                Ok(())
            }
            Err(e) => {
                warn!("[{}] Unable to unlock {}: {}", session.id, session.vm, e);
                Err(CaptureError::ReleaseFailure(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hypervisor::mock::{Fault, MockHypervisor};

    fn controller(hv: &Arc<MockHypervisor>) -> SessionController {
        SessionController::new(hv.clone(), LockMode::Shared)
    }

    #[tokio::test]
    async fn full_session_lifecycle() {
        let hv = Arc::new(MockHypervisor::new("testvm1"));
        let ctl = controller(&hv);

        let vm = ctl.resolve("testvm1").await.unwrap();
        let mut session = ctl.acquire(&vm).await.unwrap();
        assert_eq!(session.status, SessionStatus::Locked);
        assert!(!hv.is_paused());

        ctl.pause(&mut session).await.unwrap();
        ctl.pause(&mut session).await.unwrap();
        assert!(hv.is_paused());
        assert_eq!(hv.count("pause"), 1);

        ctl.resume(&mut session).await.unwrap();
        assert!(!hv.is_paused());
        assert_eq!(session.status, SessionStatus::Resumed);

        ctl.release(session).await.unwrap();
        assert!(!hv.is_locked());
    }

    #[tokio::test]
    async fn unresolved_identifier_is_vm_not_found() {
        let hv = Arc::new(MockHypervisor::new("testvm1"));
        let err = controller(&hv).resolve("nope").await.unwrap_err();
        assert!(matches!(err, CaptureError::VmNotFound(ref id) if id == "nope"));
    }

    #[tokio::test]
    async fn locked_machine_fails_fast() {
        let hv = Arc::new(MockHypervisor::new("testvm1"));
        hv.hold_lock();
        let ctl = controller(&hv);
        let err = ctl.acquire(&hv.vm()).await.unwrap_err();
        assert!(matches!(err, CaptureError::LockFailure(_)));
    }

    #[tokio::test]
    async fn resume_without_pause_does_not_touch_the_guest() {
        let hv = Arc::new(MockHypervisor::new("testvm1").with_fault(Fault::Pause));
        let ctl = controller(&hv);
        let mut session = ctl.acquire(&hv.vm()).await.unwrap();

        assert!(matches!(
            ctl.pause(&mut session).await,
            Err(CaptureError::PauseFailure(_))
        ));
        ctl.resume(&mut session).await.unwrap();
        ctl.release(session).await.unwrap();
        assert_eq!(hv.count("resume"), 0);
    }

    #[tokio::test]
    async fn failed_resume_keeps_the_obligation() {
        let hv = Arc::new(MockHypervisor::new("testvm1").with_fault(Fault::Resume));
        let ctl = controller(&hv);
        let mut session = ctl.acquire(&hv.vm()).await.unwrap();
        ctl.pause(&mut session).await.unwrap();

        let err = ctl.resume(&mut session).await.unwrap_err();
        assert!(matches!(err, CaptureError::ResumeFailure(_)));
        assert!(session.needs_resume());
        ctl.release(session).await.unwrap();
    }
}
