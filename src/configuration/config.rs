use super::types::*;
use crate::error_handling::types::ConfigError;
use clap::Parser;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration structure that defines all runtime parameters.
///
/// The configuration is read from an optional TOML file and then overridden by
/// the command-line flags parsed into [`CliArgs`]. Every section has defaults,
/// so an empty file (or no file at all) yields a usable configuration.
///
/// # Fields Overview
///
/// - `tools`: paths of `VBoxManage` and `snap2disk`
/// - `timeouts`: per-step timeouts and the snapshot progress poll interval
/// - `session`: lock mode and the directory holding machine lock files
/// - `hashing`: read block size of the integrity hasher
/// - `report`: output format of the final capture report
/// - `log_level`: default log filter when `RUST_LOG` is not set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tools: ToolsConfig,
    pub timeouts: TimeoutConfig,
    pub session: SessionConfig,
    pub hashing: HashingConfig,
    pub report: ReportConfig,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tools: ToolsConfig::default(),
            timeouts: TimeoutConfig::default(),
            session: SessionConfig::default(),
            hashing: HashingConfig::default(),
            report: ReportConfig::default(),
            log_level: String::from("info"),
        }
    }
}

/// Command-line surface of the `forensic-save` binary.
///
/// Global flags override values from the configuration file; the trailing
/// positional tokens are handed to the command registry untouched, e.g.
/// `forensic-save forensicSave testvm1 /evidence`.
#[derive(Parser, Debug, Clone)]
#[command(name = "forensic-save")]
#[command(version)]
#[command(about = "Forensically sound point-in-time capture of a running virtual machine")]
pub struct CliArgs {
    /// Path to a TOML configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Path of the VBoxManage binary
    #[arg(long)]
    pub vboxmanage: Option<PathBuf>,

    /// Path of the snapshot-to-disk resolver binary
    #[arg(long)]
    pub snap2disk: Option<PathBuf>,

    /// Lock mode taken on the machine for the duration of the capture
    #[arg(long, value_enum)]
    pub lock_mode: Option<LockMode>,

    /// Timeout in seconds for the memory dump tool (0 disables)
    #[arg(long)]
    pub memory_timeout: Option<u64>,

    /// Timeout in seconds for the disk clone tool (0 disables)
    #[arg(long)]
    pub disk_timeout: Option<u64>,

    /// Timeout in seconds for the snapshot to complete (0 disables)
    #[arg(long)]
    pub snapshot_timeout: Option<u64>,

    /// Timeout in seconds for resolving the snapshot disk (0 disables)
    #[arg(long)]
    pub resolve_timeout: Option<u64>,

    /// Report output format
    #[arg(long, value_enum)]
    pub report_format: Option<ReportFormat>,

    /// Log level used when RUST_LOG is not set
    #[arg(long)]
    pub log_level: Option<String>,

    /// Command followed by its arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

impl Config {
    /// Reads and validates a configuration file.
    pub fn from_file(path: &Path) -> Result<Config, ConfigError> {
        info!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Config, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::TomlError(e.to_string()))
    }

    /// Builds the effective configuration: the file named by `--config` (or the
    /// defaults), with every flag given on the command line applied on top.
    pub fn from_args(args: &CliArgs) -> Result<Config, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Config::default(),
        };
        config.apply_args(args);
        config.validate()?;
        debug!("Effective configuration: {:?}", config);
        Ok(config)
    }

    fn apply_args(&mut self, args: &CliArgs) {
        if let Some(path) = &args.vboxmanage {
            self.tools.vboxmanage = path.clone();
        }
        if let Some(path) = &args.snap2disk {
            self.tools.snap2disk = path.clone();
        }
        if let Some(mode) = args.lock_mode {
            self.session.lock_mode = mode;
        }
        if let Some(secs) = args.memory_timeout {
            self.timeouts.memory_dump_secs = secs;
        }
        if let Some(secs) = args.disk_timeout {
            self.timeouts.disk_clone_secs = secs;
        }
        if let Some(secs) = args.snapshot_timeout {
            self.timeouts.snapshot_secs = secs;
        }
        if let Some(secs) = args.resolve_timeout {
            self.timeouts.resolve_secs = secs;
        }
        if let Some(format) = args.report_format {
            self.report.format = format;
        }
        if let Some(level) = &args.log_level {
            self.log_level = level.clone();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let block = self.hashing.block_size;
        if block == 0 || block % crate::hashing::BLOCK_ALIGNMENT != 0 {
            return Err(ConfigError::InvalidBlockSize(block));
        }
        if self.timeouts.progress_poll_secs == 0 {
            return Err(ConfigError::NotInRange(
                "timeouts.progress_poll_secs must be at least 1".to_string(),
            ));
        }
        if self.tools.vboxmanage.as_os_str().is_empty() {
            return Err(ConfigError::MissingTool("tools.vboxmanage".to_string()));
        }
        if self.tools.snap2disk.as_os_str().is_empty() {
            return Err(ConfigError::MissingTool("tools.snap2disk".to_string()));
        }
        Ok(())
    }

    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.log_level
            .parse()
            .unwrap_or(log::LevelFilter::Info)
    }

    pub fn memory_dump_timeout(&self) -> Option<Duration> {
        non_zero_secs(self.timeouts.memory_dump_secs)
    }

    pub fn disk_clone_timeout(&self) -> Option<Duration> {
        non_zero_secs(self.timeouts.disk_clone_secs)
    }

    pub fn snapshot_timeout(&self) -> Option<Duration> {
        non_zero_secs(self.timeouts.snapshot_secs)
    }

    pub fn resolve_timeout(&self) -> Option<Duration> {
        non_zero_secs(self.timeouts.resolve_secs)
    }

    pub fn progress_poll_interval(&self) -> Duration {
        Duration::from_secs(self.timeouts.progress_poll_secs)
    }
}

fn non_zero_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
