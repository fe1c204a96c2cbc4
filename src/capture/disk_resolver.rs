use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};

use crate::error_handling::types::CaptureError;
use crate::process_invoker::{ExternalTool, ProcessInvoker, ToolInvocation};

/// Maps a snapshot (or its parent) reference to the disk image backing it.
#[async_trait]
pub trait SnapshotDiskResolver: Send + Sync {
    async fn resolve(&self, snapshot_ref: &str) -> Result<String, CaptureError>;
}

/// Resolves through the external `snap2disk` helper, which prints the disk
/// identifier on stdout.
pub struct Snap2DiskResolver {
    program: PathBuf,
    invoker: Arc<dyn ProcessInvoker>,
    timeout: Option<Duration>,
}

impl Snap2DiskResolver {
    pub fn new(
        program: impl Into<PathBuf>,
        invoker: Arc<dyn ProcessInvoker>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            program: program.into(),
            invoker,
            timeout,
        }
    }
}

#[async_trait]
impl SnapshotDiskResolver for Snap2DiskResolver {
    async fn resolve(&self, snapshot_ref: &str) -> Result<String, CaptureError> {
        let invocation = ToolInvocation::new(ExternalTool::SnapshotDiskResolve, &self.program)
            .arg(snapshot_ref)
            .timeout(self.timeout);

        let output = self.invoker.invoke(&invocation).await.map_err(|e| {
            CaptureError::DiskCloneFailure(format!("resolving disk of {}: {}", snapshot_ref, e))
        })?;
        if !output.success() {
            return Err(CaptureError::DiskCloneFailure(format!(
                "{} {} ({}): {}",
                self.program.display(),
                snapshot_ref,
                output.describe_status(),
                output.stderr.trim()
            )));
        }

        let disk = output.stdout.trim();
        if disk.is_empty() {
            return Err(CaptureError::DiskCloneFailure(format!(
                "no disk reported for snapshot {}",
                snapshot_ref
            )));
        }
        debug!("snap2disk {} -> {}", snapshot_ref, disk);
        info!("Parent disk UUID: {}", disk);
        Ok(disk.to_string())
    }
}
