//! Capture pipeline.
//!
//! One run takes a guest through lock, pause, snapshot, resume and release,
//! then produces two artifacts from the frozen snapshot state:
//! - a memory dump (`<vm>-<timestamp>-memory.elf`)
//! - a flattened raw disk image (`<vm>-<timestamp>-disk.img`)
//!
//! Each artifact gets a `.hash` sibling holding its MD5 and SHA-1 digests.
//! Everything that happened is accumulated in a [`CaptureResult`] for the
//! reporter.
//!
//! Re-exports:
//! - [`CaptureOrchestrator`], [`CaptureRequest`]: entry point of a run.
//! - [`Acquirer`]: memory and disk acquisition plus hashing.
//! - [`SnapshotDiskResolver`], [`Snap2DiskResolver`]: snapshot to disk id.

pub mod acquisition;
pub mod disk_resolver;
pub mod orchestrator;
pub mod types;

pub use acquisition::{Acquirer, AcquisitionOutcome, AcquisitionSettings};
pub use disk_resolver::{Snap2DiskResolver, SnapshotDiskResolver};
pub use orchestrator::{CaptureOrchestrator, CaptureRequest, SnapshotSettings, SNAPSHOT_NAME};
pub use types::{
    AcquisitionArtifact, ArtifactKind, CaptureResult, CaptureState, CaptureTimestamp,
    SnapshotRecord,
};
