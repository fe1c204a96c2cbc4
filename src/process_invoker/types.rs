use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use crate::error_handling::types::ProcessError;

/// The external tools a capture relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExternalTool {
    /// Writes the full guest memory image as an ELF core.
    MemoryDump,
    /// Flattens a disk image into a single raw file.
    DiskClone,
    /// Maps a snapshot identifier to the disk image backing it.
    SnapshotDiskResolve,
    /// Hypervisor management commands (lookup, pause, resume).
    HypervisorControl,
}

impl fmt::Display for ExternalTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExternalTool::MemoryDump => write!(f, "memory dump"),
            ExternalTool::DiskClone => write!(f, "disk clone"),
            ExternalTool::SnapshotDiskResolve => write!(f, "snapshot disk resolver"),
            ExternalTool::HypervisorControl => write!(f, "hypervisor control"),
        }
    }
}

/// A fully described process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub tool: ExternalTool,
    pub program: PathBuf,
    pub args: Vec<String>,
    pub timeout: Option<Duration>,
}

impl ToolInvocation {
    pub fn new(tool: ExternalTool, program: impl Into<PathBuf>) -> Self {
        Self {
            tool,
            program: program.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The value following `flag`, if present.
    pub fn arg_after(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }

    pub fn command_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// What a finished process left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code; `None` when the process was killed by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    pub fn describe_status(&self) -> String {
        match self.status {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Synchronous-from-the-caller's-view invocation of an external tool.
///
/// Implementations return `Ok` for any process that ran to completion, whatever
/// its exit status; `Err` is reserved for spawn failures and timeouts.
#[async_trait]
pub trait ProcessInvoker: Send + Sync {
    async fn invoke(&self, invocation: &ToolInvocation) -> Result<ToolOutput, ProcessError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_arguments_in_order() {
        let inv = ToolInvocation::new(ExternalTool::MemoryDump, "VBoxManage")
            .arg("debugvm")
            .arg("testvm1")
            .arg("dumpguestcore")
            .arg("--filename")
            .arg("/evidence/testvm1-memory.elf")
            .timeout(Some(Duration::from_secs(5)));

        assert_eq!(inv.arg_after("--filename"), Some("/evidence/testvm1-memory.elf"));
        assert_eq!(inv.arg_after("--format"), None);
        assert_eq!(
            inv.command_line(),
            "VBoxManage debugvm testvm1 dumpguestcore --filename /evidence/testvm1-memory.elf"
        );
        assert_eq!(inv.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn output_status_description() {
        let ok = ToolOutput { status: Some(0), ..Default::default() };
        let failed = ToolOutput { status: Some(1), ..Default::default() };
        let killed = ToolOutput::default();
        assert!(ok.success());
        assert!(!failed.success());
        assert_eq!(failed.describe_status(), "exit status 1");
        assert_eq!(killed.describe_status(), "terminated by signal");
    }
}
