use std::fmt;
use std::path::PathBuf;

use serde::{Serialize, Serializer};

#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    TomlError(String),
    InvalidBlockSize(usize),
    NotInRange(String),
    MissingTool(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::TomlError(e) => write!(f, "TOML parsing error: {}", e),
            ConfigError::InvalidBlockSize(size) => write!(
                f,
                "Hash block size {} must be a non-zero multiple of 4096",
                size
            ),
            ConfigError::NotInRange(e) => write!(f, "Value out of range: {}", e),
            ConfigError::MissingTool(e) => write!(f, "Tool path is empty: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

#[derive(Debug)]
pub enum ProcessError {
    SpawnFailed(String),
    Timeout(String),
    IoError(std::io::Error),
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::SpawnFailed(e) => write!(f, "Process spawn failed: {}", e),
            ProcessError::Timeout(e) => write!(f, "Process timed out: {}", e),
            ProcessError::IoError(e) => write!(f, "Process IO error: {}", e),
        }
    }
}

impl std::error::Error for ProcessError {}

impl From<std::io::Error> for ProcessError {
    fn from(err: std::io::Error) -> Self {
        ProcessError::IoError(err)
    }
}

#[derive(Debug)]
pub enum HypervisorError {
    NotFound(String),
    Locked(String),
    CommandFailed(String),
    ParseError(String),
    Timeout(String),
    ProcessError(ProcessError),
    IoError(std::io::Error),
}

impl fmt::Display for HypervisorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HypervisorError::NotFound(e) => write!(f, "Machine not found: {}", e),
            HypervisorError::Locked(e) => write!(f, "Machine is locked: {}", e),
            HypervisorError::CommandFailed(e) => write!(f, "Hypervisor command failed: {}", e),
            HypervisorError::ParseError(e) => write!(f, "Unexpected hypervisor output: {}", e),
            HypervisorError::Timeout(e) => write!(f, "Hypervisor operation timed out: {}", e),
            HypervisorError::ProcessError(e) => write!(f, "{}", e),
            HypervisorError::IoError(e) => write!(f, "Hypervisor IO error: {}", e),
        }
    }
}

impl std::error::Error for HypervisorError {}

impl From<std::io::Error> for HypervisorError {
    fn from(err: std::io::Error) -> Self {
        HypervisorError::IoError(err)
    }
}

impl From<ProcessError> for HypervisorError {
    fn from(err: ProcessError) -> Self {
        HypervisorError::ProcessError(err)
    }
}

/// How a capture failure affects the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    /// The capture stopped; no further guest-affecting step ran.
    Fatal,
    /// The guest may be left frozen and needs manual intervention.
    Critical,
    /// Recorded; the other steps carried on.
    Recoverable,
}

/// Every failure a capture can record.
#[derive(Debug)]
pub enum CaptureError {
    VmNotFound(String),
    LockFailure(HypervisorError),
    PauseFailure(HypervisorError),
    SnapshotFailure(String),
    ResumeFailure(HypervisorError),
    ReleaseFailure(HypervisorError),
    MemoryDumpFailure(String),
    DiskCloneFailure(String),
    HashComputeFailure { path: PathBuf, source: std::io::Error },
    Filesystem { path: PathBuf, source: std::io::Error },
    /// Shutdown was requested; names the step that was cut short.
    Interrupted(String),
}

impl CaptureError {
    pub fn severity(&self) -> Severity {
        match self {
            CaptureError::VmNotFound(_)
            | CaptureError::LockFailure(_)
            | CaptureError::PauseFailure(_)
            | CaptureError::SnapshotFailure(_)
            | CaptureError::Filesystem { .. }
            | CaptureError::Interrupted(_) => Severity::Fatal,
            CaptureError::ResumeFailure(_) => Severity::Critical,
            CaptureError::ReleaseFailure(_)
            | CaptureError::MemoryDumpFailure(_)
            | CaptureError::DiskCloneFailure(_)
            | CaptureError::HashComputeFailure { .. } => Severity::Recoverable,
        }
    }

    /// Stable name of the failure kind, used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            CaptureError::VmNotFound(_) => "VMNotFound",
            CaptureError::LockFailure(_) => "LockFailure",
            CaptureError::PauseFailure(_) => "PauseFailure",
            CaptureError::SnapshotFailure(_) => "SnapshotFailure",
            CaptureError::ResumeFailure(_) => "ResumeFailure",
            CaptureError::ReleaseFailure(_) => "ReleaseFailure",
            CaptureError::MemoryDumpFailure(_) => "MemoryDumpFailure",
            CaptureError::DiskCloneFailure(_) => "DiskCloneFailure",
            CaptureError::HashComputeFailure { .. } => "HashComputeFailure",
            CaptureError::Filesystem { .. } => "FilesystemError",
            CaptureError::Interrupted(_) => "Interrupted",
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::VmNotFound(vm) => write!(f, "Could not find VM named {}", vm),
            CaptureError::LockFailure(e) => write!(f, "Unable to lock machine: {}", e),
            CaptureError::PauseFailure(e) => write!(f, "Unable to pause guest: {}", e),
            CaptureError::SnapshotFailure(e) => write!(f, "Snapshot failed: {}", e),
            CaptureError::ResumeFailure(e) => write!(
                f,
                "Unable to resume guest, it may still be paused and requires manual intervention: {}",
                e
            ),
            CaptureError::ReleaseFailure(e) => write!(f, "Unable to unlock machine: {}", e),
            CaptureError::MemoryDumpFailure(e) => write!(f, "Memory dump failed: {}", e),
            CaptureError::DiskCloneFailure(e) => write!(f, "Disk clone failed: {}", e),
            CaptureError::HashComputeFailure { path, source } => {
                write!(f, "Hashing {} failed: {}", path.display(), source)
            }
            CaptureError::Filesystem { path, source } => {
                write!(f, "Filesystem error at {}: {}", path.display(), source)
            }
            CaptureError::Interrupted(step) => write!(f, "Capture interrupted during {}", step),
        }
    }
}

impl std::error::Error for CaptureError {}

impl Serialize for CaptureError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("CaptureError", 3)?;
        state.serialize_field("kind", self.kind())?;
        state.serialize_field("severity", &self.severity())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

#[derive(Debug)]
pub enum ControllerError {
    ConfigurationError(ConfigError),
    Usage(String),
    UnknownCommand(String),
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerError::ConfigurationError(e) => write!(f, "Configuration error: {}", e),
            ControllerError::Usage(e) => write!(f, "Usage: {}", e),
            ControllerError::UnknownCommand(e) => write!(f, "Unknown command: {}", e),
        }
    }
}

impl std::error::Error for ControllerError {}

impl From<ConfigError> for ControllerError {
    fn from(err: ConfigError) -> Self {
        ControllerError::ConfigurationError(err)
    }
}
