use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Paths of the external binaries the capture shells out to.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub vboxmanage: PathBuf,
    pub snap2disk: PathBuf,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            vboxmanage: PathBuf::from("VBoxManage"),
            snap2disk: PathBuf::from("snap2disk"),
        }
    }
}

/// Timeouts in seconds. Zero disables the timeout.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub memory_dump_secs: u64,
    pub disk_clone_secs: u64,
    pub snapshot_secs: u64,
    pub resolve_secs: u64,
    pub progress_poll_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            memory_dump_secs: 3600,
            // Disk images of large guests can take hours to clone.
            disk_clone_secs: 6 * 3600,
            snapshot_secs: 1800,
            resolve_secs: 60,
            progress_poll_secs: 30,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LockMode {
    Shared,
    Exclusive,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub lock_mode: LockMode,
    pub lock_dir: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            lock_mode: LockMode::Shared,
            lock_dir: std::env::temp_dir().join("forensic-save-locks"),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HashingConfig {
    pub block_size: usize,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            block_size: crate::hashing::DEFAULT_BLOCK_SIZE,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub format: ReportFormat,
}
