//! Scripted process invoker used by the unit tests.

use std::sync::Mutex;

use async_trait::async_trait;

use super::types::{ExternalTool, ProcessInvoker, ToolInvocation, ToolOutput};
use crate::error_handling::types::ProcessError;

type Handler = Box<dyn Fn(&ToolInvocation) -> Result<ToolOutput, ProcessError> + Send + Sync>;

/// Answers each invocation with the handler registered for its tool and
/// records every invocation it saw.
#[derive(Default)]
pub struct MockInvoker {
    handlers: Vec<(ExternalTool, Handler)>,
    seen: Mutex<Vec<ToolInvocation>>,
}

impl MockInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(mut self, tool: ExternalTool, handler: F) -> Self
    where
        F: Fn(&ToolInvocation) -> Result<ToolOutput, ProcessError> + Send + Sync + 'static,
    {
        self.handlers.push((tool, Box::new(handler)));
        self
    }

    pub fn invocations(&self) -> Vec<ToolInvocation> {
        self.seen.lock().unwrap().clone()
    }

    pub fn invocations_of(&self, tool: ExternalTool) -> Vec<ToolInvocation> {
        self.invocations()
            .into_iter()
            .filter(|inv| inv.tool == tool)
            .collect()
    }
}

pub fn exited(code: i32) -> ToolOutput {
    ToolOutput {
        status: Some(code),
        ..Default::default()
    }
}

pub fn printed(stdout: &str) -> ToolOutput {
    ToolOutput {
        status: Some(0),
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

#[async_trait]
impl ProcessInvoker for MockInvoker {
    async fn invoke(&self, invocation: &ToolInvocation) -> Result<ToolOutput, ProcessError> {
        self.seen.lock().unwrap().push(invocation.clone());
        match self.handlers.iter().find(|(tool, _)| *tool == invocation.tool) {
            Some((_, handler)) => handler(invocation),
            None => Err(ProcessError::SpawnFailed(format!(
                "no handler for {}",
                invocation.command_line()
            ))),
        }
    }
}
