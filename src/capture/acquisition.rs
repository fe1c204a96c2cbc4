use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use log::{error, info, warn};

use super::disk_resolver::SnapshotDiskResolver;
use super::types::{AcquisitionArtifact, ArtifactKind, SnapshotRecord};
use crate::error_handling::types::CaptureError;
use crate::hashing::{hash_file_path, IntegrityHasher};
use crate::hypervisor::VmHandle;
use crate::process_invoker::{ExternalTool, ProcessInvoker, ToolInvocation};

/// Tool locations and limits used by the acquisitions.
#[derive(Debug, Clone)]
pub struct AcquisitionSettings {
    pub vboxmanage: PathBuf,
    pub memory_timeout: Option<Duration>,
    pub disk_timeout: Option<Duration>,
}

/// An artifact plus every error recorded while producing it.
#[derive(Debug)]
pub struct AcquisitionOutcome {
    pub artifact: AcquisitionArtifact,
    pub errors: Vec<CaptureError>,
}

impl AcquisitionOutcome {
    fn failed(mut artifact: AcquisitionArtifact, error: CaptureError) -> Self {
        artifact.error = Some(error.to_string());
        Self {
            artifact,
            errors: vec![error],
        }
    }
}

/// Produces the memory and disk artifacts and their digest records.
///
/// Each acquisition is self-contained: a failure is returned inside its
/// [`AcquisitionOutcome`] and never affects the other artifact. Hashing only
/// starts once the producing tool has exited successfully.
pub struct Acquirer {
    invoker: Arc<dyn ProcessInvoker>,
    resolver: Arc<dyn SnapshotDiskResolver>,
    hasher: IntegrityHasher,
    settings: AcquisitionSettings,
}

impl Acquirer {
    pub fn new(
        invoker: Arc<dyn ProcessInvoker>,
        resolver: Arc<dyn SnapshotDiskResolver>,
        hasher: IntegrityHasher,
        settings: AcquisitionSettings,
    ) -> Self {
        Self {
            invoker,
            resolver,
            hasher,
            settings,
        }
    }

    /// Dumps guest memory to `path` as an ELF core.
    pub async fn acquire_memory(&self, vm: &VmHandle, path: PathBuf) -> AcquisitionOutcome {
        info!("Dumping memory of {} to {}...", vm.name, path.display());
        let mut artifact = AcquisitionArtifact::pending(ArtifactKind::Memory, path.clone());
        artifact.source = Some(vm.name.clone());

        let invocation = ToolInvocation::new(ExternalTool::MemoryDump, &self.settings.vboxmanage)
            .arg("debugvm")
            .arg(vm.name.as_str())
            .arg("dumpguestcore")
            .arg("--filename")
            .arg(path.display().to_string())
            .timeout(self.settings.memory_timeout);

        if let Err(e) = self.run_tool(&invocation).await {
            error!("Memory error encountered: {}", e);
            return AcquisitionOutcome::failed(artifact, CaptureError::MemoryDumpFailure(e));
        }
        info!("... memory dump done.");
        artifact.succeeded = true;
        self.hash(artifact).await
    }

    /// Flattens the snapshot's parent disk into a single raw image at `path`.
    pub async fn acquire_disk(&self, snapshot: &SnapshotRecord, path: PathBuf) -> AcquisitionOutcome {
        let mut artifact = AcquisitionArtifact::pending(ArtifactKind::Disk, path.clone());

        info!("Parent snapshot reference: {}", snapshot.parent_disk_ref);
        let disk = match self.resolver.resolve(&snapshot.parent_disk_ref).await {
            Ok(disk) => disk,
            Err(e) => {
                error!("Disk error encountered: {}", e);
                return AcquisitionOutcome::failed(artifact, e);
            }
        };
        artifact.source = Some(disk.clone());

        info!(
            "Merging disk snapshots and dumping {} to raw image {}...",
            disk,
            path.display()
        );
        let invocation = ToolInvocation::new(ExternalTool::DiskClone, &self.settings.vboxmanage)
            .arg("clonemedium")
            .arg("disk")
            .arg(disk.as_str())
            .arg(path.display().to_string())
            .arg("--format")
            .arg("RAW")
            .timeout(self.settings.disk_timeout);

        if let Err(e) = self.run_tool(&invocation).await {
            error!("Disk error encountered: {}", e);
            return AcquisitionOutcome::failed(artifact, CaptureError::DiskCloneFailure(e));
        }
        info!("... disk clone done.");
        artifact.succeeded = true;
        self.hash(artifact).await
    }

    /// Runs a producing tool; any non-zero exit is a failure description.
    async fn run_tool(&self, invocation: &ToolInvocation) -> Result<(), String> {
        let output = self
            .invoker
            .invoke(invocation)
            .await
            .map_err(|e| e.to_string())?;
        if output.success() {
            Ok(())
        } else {
            let stderr = output.stderr.trim();
            Err(if stderr.is_empty() {
                output.describe_status()
            } else {
                format!("{}: {}", output.describe_status(), stderr)
            })
        }
    }

    async fn hash(&self, mut artifact: AcquisitionArtifact) -> AcquisitionOutcome {
        info!(
            "Creating hash set of {} (may take some time with large artifacts)...",
            artifact.kind
        );
        match self.hasher.hash_artifact(artifact.path.clone()).await {
            Ok(digests) => {
                artifact.hash_path = Some(hash_file_path(&artifact.path));
                artifact.digests = Some(digests);
                AcquisitionOutcome {
                    artifact,
                    errors: Vec::new(),
                }
            }
            Err(e) => {
                warn!("{} hashing failed: {}", artifact.kind, e);
                AcquisitionOutcome::failed(artifact, e)
            }
        }
    }
}
