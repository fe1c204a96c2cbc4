use std::any::Any;
use std::fs::OpenOptions;
use std::io;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use log::{debug, error, info, warn};
use tokio::sync::watch;
use uuid::Uuid;

use super::acquisition::{Acquirer, AcquisitionSettings};
use super::disk_resolver::Snap2DiskResolver;
use super::types::{ArtifactKind, CaptureResult, CaptureState, CaptureTimestamp, SnapshotRecord};
use crate::configuration::Config;
use crate::error_handling::types::{CaptureError, HypervisorError};
use crate::hashing::IntegrityHasher;
use crate::hypervisor::{HypervisorControl, SnapshotInfo, VmHandle};
use crate::process_invoker::ProcessInvoker;
use crate::session_management::SessionController;

/// Name given to every snapshot this tool takes.
pub const SNAPSHOT_NAME: &str = "Forensic Save";

/// What to capture and where to put it.
#[derive(Debug, Clone)]
pub struct CaptureRequest {
    /// VM name or UUID.
    pub identifier: String,
    pub destination: PathBuf,
}

#[derive(Debug, Clone, Copy)]
pub struct SnapshotSettings {
    /// How long to block on the progress handle between percent reports.
    pub poll_interval: Duration,
    /// Upper bound for the whole snapshot step; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

/// Drives one capture: lock, pause, snapshot, resume, release, then both
/// acquisitions.
///
/// Design notes:
/// - Steps before the pause abort the run on failure; nothing needs undoing.
/// - Once the pause succeeded, resume runs on every path. The snapshot step
///   is contained (errors, timeout and panics all become
///   [`CaptureError::SnapshotFailure`]) so control always reaches it.
/// - Memory and disk acquisition run concurrently and only if the snapshot
///   succeeded, regardless of whether resume did.
/// - A shutdown request stops the run at the next step boundary, or cuts the
///   snapshot wait short. A paused guest is still resumed and the lock
///   released before returning.
pub struct CaptureOrchestrator {
    sessions: SessionController,
    acquirer: Acquirer,
    snapshot: SnapshotSettings,
    shutdown: Option<watch::Receiver<bool>>,
}

impl CaptureOrchestrator {
    pub fn new(sessions: SessionController, acquirer: Acquirer, snapshot: SnapshotSettings) -> Self {
        Self {
            sessions,
            acquirer,
            snapshot,
            shutdown: None,
        }
    }

    /// Stops the capture once `shutdown` turns `true`.
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Wires the orchestrator from configuration, with `snap2disk` as the
    /// snapshot-to-disk resolver.
    pub fn from_config(
        config: &Config,
        hypervisor: Arc<dyn HypervisorControl>,
        invoker: Arc<dyn ProcessInvoker>,
    ) -> Self {
        let resolver = Arc::new(Snap2DiskResolver::new(
            config.tools.snap2disk.clone(),
            invoker.clone(),
            config.resolve_timeout(),
        ));
        let acquirer = Acquirer::new(
            invoker,
            resolver,
            IntegrityHasher::new(config.hashing.block_size),
            AcquisitionSettings {
                vboxmanage: config.tools.vboxmanage.clone(),
                memory_timeout: config.memory_dump_timeout(),
                disk_timeout: config.disk_clone_timeout(),
            },
        );
        Self::new(
            SessionController::new(hypervisor, config.session.lock_mode),
            acquirer,
            SnapshotSettings {
                poll_interval: config.progress_poll_interval(),
                timeout: config.snapshot_timeout(),
            },
        )
    }

    pub async fn run(&self, request: CaptureRequest) -> CaptureResult {
        let mut result = CaptureResult::new(&request.identifier, &request.destination);

        let destination = match prepare_destination(&request.destination) {
            Ok(path) => path,
            Err(e) => return abort(result, e),
        };
        result.destination = destination.clone();

        let vm = match self.sessions.resolve(&request.identifier).await {
            Ok(vm) => vm,
            Err(e) => return abort(result, e),
        };
        info!("Resolved {} to {}", request.identifier, vm);

        let mut session = match self.sessions.acquire(&vm).await {
            Ok(session) => session,
            Err(e) => return abort(result, e),
        };
        advance(&mut result, CaptureState::Locked);

        if self.shutdown_pending() {
            warn!("Shutdown requested, {} was not paused", vm);
            result.record(CaptureError::Interrupted("lock".to_string()));
            if let Err(e) = self.sessions.release(session).await {
                result.record(e);
            }
            advance(&mut result, CaptureState::Aborted);
            return result;
        }

        if let Err(e) = self.sessions.pause(&mut session).await {
            result.record(e);
            if let Err(e) = self.sessions.release(session).await {
                result.record(e);
            }
            advance(&mut result, CaptureState::Aborted);
            return result;
        }
        advance(&mut result, CaptureState::Paused);

        let timestamp = CaptureTimestamp::now();
        result.timestamp = Some(timestamp.clone());
        let attempt = tokio::select! {
            biased;
            _ = self.shutdown_requested() => {
                warn!("Shutdown requested while the snapshot was in progress, resuming {}", vm);
                Err(CaptureError::Interrupted("snapshot".to_string()))
            }
            outcome = self.snapshot_while_paused(&vm, &timestamp) => outcome,
        };
        let snapshot = match attempt {
            Ok(info) => {
                advance(&mut result, CaptureState::SnapshotTaken);
                Some(info)
            }
            Err(e) => {
                error!("{}", e);
                result.record(e);
                None
            }
        };

        match self.sessions.resume(&mut session).await {
            Ok(()) => advance(&mut result, CaptureState::Resumed),
            Err(e) => result.record(e),
        }
        if let Err(e) = self.sessions.release(session).await {
            result.record(e);
        }

        if let Some(info) = snapshot {
            let record = SnapshotRecord {
                id: info.id,
                name: info.name,
                description: info.description,
                created_at: timestamp.instant,
                parent_disk_ref: info.parent_disk_ref,
                snapshot_folder: info.snapshot_folder,
            };

            let memory_path = ArtifactKind::Memory.artifact_path(&destination, &vm.name, &timestamp);
            let disk_path = ArtifactKind::Disk.artifact_path(&destination, &vm.name, &timestamp);
            let acquisitions = async {
                tokio::join!(
                    self.acquirer.acquire_memory(&vm, memory_path),
                    self.acquirer.acquire_disk(&record, disk_path),
                )
            };
            // Dropping the acquisitions kills the dump and clone tools.
            let outcomes = tokio::select! {
                biased;
                _ = self.shutdown_requested() => None,
                outcomes = acquisitions => Some(outcomes),
            };

            match outcomes {
                Some((memory, disk)) => {
                    for outcome in [memory, disk] {
                        result.errors.extend(outcome.errors);
                        match outcome.artifact.kind {
                            ArtifactKind::Memory => result.memory = Some(outcome.artifact),
                            ArtifactKind::Disk => result.disk = Some(outcome.artifact),
                        }
                    }
                }
                None => {
                    warn!("Shutdown requested, acquisition of {} stopped", vm.name);
                    result.record(CaptureError::Interrupted("acquisition".to_string()));
                }
            }
            result.snapshot = Some(record);
        }

        advance(&mut result, CaptureState::Done);
        info!(
            "Capture of {} finished with {} recorded error(s)",
            vm.name,
            result.errors.len()
        );
        result
    }

    fn shutdown_pending(&self) -> bool {
        self.shutdown.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Resolves once shutdown is requested. Pending forever without a
    /// receiver or after the sender is gone.
    async fn shutdown_requested(&self) {
        if let Some(mut rx) = self.shutdown.clone() {
            let stopped = rx.wait_for(|stop| *stop).await.is_ok();
            if stopped {
                return;
            }
        }
        std::future::pending::<()>().await
    }

    /// Everything that happens while the guest is frozen. Never unwinds.
    async fn snapshot_while_paused(
        &self,
        vm: &VmHandle,
        timestamp: &CaptureTimestamp,
    ) -> Result<SnapshotInfo, CaptureError> {
        info!("Grabbing a snapshot...");
        let description = timestamp.snapshot_description();
        let attempt = AssertUnwindSafe(self.take_and_wait(vm, &description)).catch_unwind();

        let outcome = match self.snapshot.timeout {
            Some(limit) => match tokio::time::timeout(limit, attempt).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    let e = HypervisorError::Timeout(format!("snapshot did not complete within {:?}", limit));
                    return Err(CaptureError::SnapshotFailure(e.to_string()));
                }
            },
            None => attempt.await,
        };

        match outcome {
            Ok(Ok(info)) => Ok(info),
            Ok(Err(e)) => Err(CaptureError::SnapshotFailure(e.to_string())),
            Err(panic) => Err(CaptureError::SnapshotFailure(format!(
                "snapshot step panicked: {}",
                panic_message(panic.as_ref())
            ))),
        }
    }

    async fn take_and_wait(
        &self,
        vm: &VmHandle,
        description: &str,
    ) -> Result<SnapshotInfo, HypervisorError> {
        let hypervisor = self.sessions.hypervisor();
        let mut progress = hypervisor.take_snapshot(vm, SNAPSHOT_NAME, description).await?;
        while !progress.wait(self.snapshot.poll_interval).await? {
            info!("{}% ", progress.percent());
        }
        info!("Snapshot successful.");

        let info = hypervisor.current_snapshot(vm).await?;
        if info.description != description {
            warn!(
                "Current snapshot description {:?} differs from the one requested ({:?})",
                info.description, description
            );
        }
        Ok(info)
    }
}

fn advance(result: &mut CaptureResult, next: CaptureState) {
    debug_assert!(
        result.state.can_transition_to(next),
        "invalid capture transition {:?} -> {:?}",
        result.state,
        next
    );
    debug!("Capture state {:?} -> {:?}", result.state, next);
    result.state = next;
}

fn abort(mut result: CaptureResult, error: CaptureError) -> CaptureResult {
    error!("Capture aborted: {}", error);
    result.record(error);
    advance(&mut result, CaptureState::Aborted);
    result
}

/// Makes `dest` absolute and checks that artifacts can be created in it.
fn prepare_destination(dest: &Path) -> Result<PathBuf, CaptureError> {
    let fs_error = |path: &Path, source: io::Error| CaptureError::Filesystem {
        path: path.to_path_buf(),
        source,
    };

    let absolute = if dest.is_absolute() {
        dest.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| fs_error(dest, e))?
            .join(dest)
    };

    let metadata = std::fs::metadata(&absolute).map_err(|e| fs_error(&absolute, e))?;
    if !metadata.is_dir() {
        return Err(fs_error(&absolute, io::Error::other("not a directory")));
    }

    let scratch = absolute.join(format!(".forensic-save-check-{}", Uuid::new_v4()));
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&scratch)
        .map_err(|e| fs_error(&absolute, e))?;
    if let Err(e) = std::fs::remove_file(&scratch) {
        warn!("Could not remove scratch file {}: {}", scratch.display(), e);
    }

    debug!("Destination {} is writable", absolute.display());
    Ok(absolute)
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
