//! Data carried through a capture run.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::error_handling::types::{CaptureError, Severity};
use crate::hashing::DigestPair;

/// UTC instant captured once at snapshot time and reused for the snapshot
/// description and every artifact file name of the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptureTimestamp {
    pub instant: DateTime<Utc>,
    pub token: String,
}

impl CaptureTimestamp {
    pub fn now() -> Self {
        Self::from_instant(Utc::now())
    }

    pub fn from_instant(instant: DateTime<Utc>) -> Self {
        Self {
            instant,
            token: instant.to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }

    pub fn snapshot_description(&self) -> String {
        format!("Taken @UTC {}", self.token)
    }
}

impl fmt::Display for CaptureTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}

/// Orchestrator states. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CaptureState {
    Idle,
    Locked,
    Paused,
    SnapshotTaken,
    Resumed,
    Done,
    Aborted,
}

impl CaptureState {
    pub fn can_transition_to(self, next: CaptureState) -> bool {
        use CaptureState::*;
        matches!(
            (self, next),
            (Idle, Locked)
                | (Idle, Aborted)
                | (Locked, Paused)
                | (Locked, Aborted)
                | (Paused, SnapshotTaken)
                | (Paused, Resumed)
                | (Paused, Done)
                | (SnapshotTaken, Resumed)
                | (SnapshotTaken, Done)
                | (Resumed, Done)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, CaptureState::Done | CaptureState::Aborted)
    }
}

/// The snapshot a successful run produced. Never deleted by this tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub parent_disk_ref: String,
    pub snapshot_folder: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArtifactKind {
    Memory,
    Disk,
}

impl ArtifactKind {
    pub fn file_suffix(self) -> &'static str {
        match self {
            ArtifactKind::Memory => "memory.elf",
            ArtifactKind::Disk => "disk.img",
        }
    }

    /// `<dest>/<vm>-<timestamp>-<suffix>`
    pub fn artifact_path(self, dest: &Path, vm_name: &str, timestamp: &CaptureTimestamp) -> PathBuf {
        dest.join(format!("{}-{}-{}", vm_name, timestamp.token, self.file_suffix()))
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Memory => write!(f, "memory"),
            ArtifactKind::Disk => write!(f, "disk"),
        }
    }
}

/// One acquired (or attempted) artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcquisitionArtifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    /// Identity of the acquired source, e.g. the resolved parent disk.
    pub source: Option<String>,
    pub succeeded: bool,
    /// Only set when acquisition and hashing both succeeded.
    pub digests: Option<DigestPair>,
    pub hash_path: Option<PathBuf>,
    pub error: Option<String>,
}

impl AcquisitionArtifact {
    pub fn pending(kind: ArtifactKind, path: PathBuf) -> Self {
        Self {
            kind,
            path,
            source: None,
            succeeded: false,
            digests: None,
            hash_path: None,
            error: None,
        }
    }
}

/// Accumulates everything a run produced. It never stops a run by itself.
#[derive(Debug, Serialize)]
pub struct CaptureResult {
    pub identifier: String,
    pub destination: PathBuf,
    pub state: CaptureState,
    pub timestamp: Option<CaptureTimestamp>,
    pub snapshot: Option<SnapshotRecord>,
    pub memory: Option<AcquisitionArtifact>,
    pub disk: Option<AcquisitionArtifact>,
    pub errors: Vec<CaptureError>,
}

impl CaptureResult {
    pub fn new(identifier: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            identifier: identifier.into(),
            destination: destination.into(),
            state: CaptureState::Idle,
            timestamp: None,
            snapshot: None,
            memory: None,
            disk: None,
            errors: Vec::new(),
        }
    }

    pub fn record(&mut self, error: CaptureError) {
        self.errors.push(error);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_critical(&self) -> bool {
        self.errors.iter().any(|e| e.severity() == Severity::Critical)
    }

    pub fn fatal_error(&self) -> Option<&CaptureError> {
        self.errors.iter().find(|e| e.severity() == Severity::Fatal)
    }

    pub fn artifacts(&self) -> impl Iterator<Item = &AcquisitionArtifact> {
        self.memory.iter().chain(self.disk.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> CaptureTimestamp {
        let instant = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        CaptureTimestamp::from_instant(instant)
    }

    #[test]
    fn timestamp_token_is_iso8601_utc() {
        assert_eq!(ts().token, "2024-05-01T10:00:00.000000Z");
        assert_eq!(ts().snapshot_description(), "Taken @UTC 2024-05-01T10:00:00.000000Z");
    }

    #[test]
    fn artifact_paths_share_the_timestamp() {
        let dest = Path::new("/evidence");
        let memory = ArtifactKind::Memory.artifact_path(dest, "testvm1", &ts());
        let disk = ArtifactKind::Disk.artifact_path(dest, "testvm1", &ts());
        assert_eq!(
            memory,
            PathBuf::from("/evidence/testvm1-2024-05-01T10:00:00.000000Z-memory.elf")
        );
        assert_eq!(
            disk,
            PathBuf::from("/evidence/testvm1-2024-05-01T10:00:00.000000Z-disk.img")
        );
    }

    #[test]
    fn states_only_move_forward() {
        use CaptureState::*;
        assert!(Idle.can_transition_to(Locked));
        assert!(Paused.can_transition_to(Resumed));
        assert!(!Paused.can_transition_to(Aborted));
        assert!(!Resumed.can_transition_to(Paused));
        assert!(!Done.can_transition_to(Idle));
        assert!(Aborted.is_terminal());
    }
}
