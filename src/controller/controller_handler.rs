use std::path::PathBuf;
use std::sync::Arc;

use log::{error, info, warn};
use tokio::sync::watch;

use crate::capture::{CaptureOrchestrator, CaptureRequest, CaptureResult, CaptureState};
use crate::configuration::Config;
use crate::error_handling::types::{CaptureError, ControllerError};
use crate::hypervisor::VBoxManageControl;
use crate::process_invoker::{ProcessInvoker, SystemProcessInvoker};
use crate::reporting;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    ForensicSave,
    Help,
}

/// Name, arity and help text of one registered command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub kind: CommandKind,
    pub min_args: usize,
    pub max_args: usize,
    pub usage: &'static str,
    pub summary: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForensicSaveArgs {
    pub identifier: String,
    pub destination: PathBuf,
    /// Accepted for compatibility. Disk images are always written raw.
    pub raw: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    ForensicSave(ForensicSaveArgs),
    Help,
}

/// Typed table of the commands this binary understands.
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    commands: Vec<CommandSpec>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: vec![
                CommandSpec {
                    name: "forensicSave",
                    kind: CommandKind::ForensicSave,
                    min_args: 2,
                    max_args: 3,
                    usage: "forensicSave (vmname|uuid) saveLocation [raw]",
                    summary: "Pause the VM, snapshot it, resume it, then dump memory and a raw disk image with MD5/SHA1 hashes",
                },
                CommandSpec {
                    name: "help",
                    kind: CommandKind::Help,
                    min_args: 0,
                    max_args: 0,
                    usage: "help",
                    summary: "List the available commands",
                },
            ],
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.iter().find(|c| c.name == name)
    }

    pub fn commands(&self) -> &[CommandSpec] {
        &self.commands
    }

    /// Parses `tokens` (command name first) into a typed command.
    pub fn parse(&self, tokens: &[String]) -> Result<ParsedCommand, ControllerError> {
        let Some((name, args)) = tokens.split_first() else {
            return Err(ControllerError::Usage(self.help_text()));
        };
        let spec = self
            .lookup(name)
            .ok_or_else(|| ControllerError::UnknownCommand(name.clone()))?;

        if args.len() < spec.min_args || args.len() > spec.max_args {
            return Err(ControllerError::Usage(spec.usage.to_string()));
        }

        match spec.kind {
            CommandKind::Help => Ok(ParsedCommand::Help),
            CommandKind::ForensicSave => {
                let raw = match args.get(2).map(String::as_str) {
                    None => false,
                    Some("raw") => true,
                    Some(_) => return Err(ControllerError::Usage(spec.usage.to_string())),
                };
                Ok(ParsedCommand::ForensicSave(ForensicSaveArgs {
                    identifier: args[0].clone(),
                    destination: PathBuf::from(&args[1]),
                    raw,
                }))
            }
        }
    }

    pub fn help_text(&self) -> String {
        let mut text = String::from("Commands:\n");
        for spec in &self.commands {
            text.push_str(&format!("  {}\n      {}\n", spec.usage, spec.summary));
        }
        text
    }
}

/// How a dispatched command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Completed,
    /// Bad invocation; usage was printed.
    Usage,
    /// The capture stopped before a snapshot was attempted.
    Aborted,
    /// Resume failed; the guest may still be paused.
    GuestFrozen,
    /// Stopped by a shutdown request after the guest was resumed.
    Interrupted,
}

impl CommandStatus {
    /// A possibly frozen guest or an interrupted run terminate with a failure
    /// code.
    pub fn exit_code(self) -> u8 {
        match self {
            CommandStatus::GuestFrozen => 3,
            CommandStatus::Interrupted => 130,
            _ => 0,
        }
    }
}

pub struct Controller {
    pub config: Config,
    registry: CommandRegistry,
    shutdown: Option<watch::Receiver<bool>>,
}

impl Controller {
    pub fn new(config: Config) -> Result<Self, ControllerError> {
        config.validate().map_err(|e| {
            error!("Invalid configuration: {}", e);
            ControllerError::from(e)
        })?;
        Ok(Self {
            config,
            registry: CommandRegistry::new(),
            shutdown: None,
        })
    }

    /// Captures started by this controller stop once `shutdown` turns `true`.
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Parses and runs one command. Usage errors and failed captures are
    /// reported and turned into a status, never into a panic or an error.
    pub async fn dispatch(&self, tokens: &[String]) -> CommandStatus {
        match self.registry.parse(tokens) {
            Ok(ParsedCommand::Help) => {
                println!("{}", self.registry.help_text());
                CommandStatus::Completed
            }
            Ok(ParsedCommand::ForensicSave(args)) => self.forensic_save(args).await,
            Err(e) => {
                warn!("{}", e);
                println!("{}", e);
                if matches!(e, ControllerError::UnknownCommand(_)) {
                    println!("{}", self.registry.help_text());
                }
                CommandStatus::Usage
            }
        }
    }

    async fn forensic_save(&self, args: ForensicSaveArgs) -> CommandStatus {
        if args.raw {
            info!("Disk images are always written in raw format");
        }

        let invoker: Arc<dyn ProcessInvoker> = Arc::new(SystemProcessInvoker::new());
        let hypervisor = Arc::new(VBoxManageControl::new(
            self.config.tools.vboxmanage.clone(),
            self.config.session.lock_dir.clone(),
            invoker.clone(),
        ));
        let mut orchestrator = CaptureOrchestrator::from_config(&self.config, hypervisor, invoker);
        if let Some(shutdown) = &self.shutdown {
            orchestrator = orchestrator.with_shutdown(shutdown.clone());
        }

        let result = orchestrator
            .run(CaptureRequest {
                identifier: args.identifier,
                destination: args.destination,
            })
            .await;

        match reporting::render(&result, self.config.report.format) {
            Ok(report) => println!("{}", report),
            Err(e) => error!("Unable to render the capture report: {}", e),
        }
        status_of(&result)
    }
}

fn status_of(result: &CaptureResult) -> CommandStatus {
    if result.has_critical() {
        CommandStatus::GuestFrozen
    } else if result
        .errors
        .iter()
        .any(|e| matches!(e, CaptureError::Interrupted(_)))
    {
        CommandStatus::Interrupted
    } else if result.state == CaptureState::Aborted {
        CommandStatus::Aborted
    } else {
        CommandStatus::Completed
    }
}
