use std::process::Stdio;

use async_trait::async_trait;
use log::{debug, error, warn};
use tokio::process::Command;

use super::types::{ProcessInvoker, ToolInvocation, ToolOutput};
use crate::error_handling::types::ProcessError;

/// Runs tools as child processes of this one.
///
/// Children are spawned with `kill_on_drop`, so a timed-out invocation does
/// not leave the tool running behind the capture.
#[derive(Debug, Default, Clone)]
pub struct SystemProcessInvoker;

impl SystemProcessInvoker {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessInvoker for SystemProcessInvoker {
    async fn invoke(&self, invocation: &ToolInvocation) -> Result<ToolOutput, ProcessError> {
        debug!(
            "Running {} tool: {}",
            invocation.tool,
            invocation.command_line()
        );

        let child = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                error!("Failed to spawn {}: {}", invocation.program.display(), e);
                ProcessError::SpawnFailed(format!("{}: {}", invocation.program.display(), e))
            })?;

        let output = match invocation.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(res) => res?,
                Err(_) => {
                    warn!(
                        "{} tool did not finish within {:?}, killing it",
                        invocation.tool, limit
                    );
                    return Err(ProcessError::Timeout(format!(
                        "{} exceeded {:?}",
                        invocation.command_line(),
                        limit
                    )));
                }
            },
            None => child.wait_with_output().await?,
        };

        let result = ToolOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !result.stderr.is_empty() {
            debug!("[{}][stderr] {}", invocation.tool, result.stderr.trim_end());
        }
        debug!("{} tool finished with {}", invocation.tool, result.describe_status());
        Ok(result)
    }
}
