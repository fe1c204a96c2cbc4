//! Command surface.
//!
//! Commands are registered by name in a typed [`CommandRegistry`]; the
//! [`Controller`] parses a token list against it, wires the real hypervisor
//! backend and tools from configuration, and runs the capture.

pub mod controller_handler;

pub use controller_handler::{
    CommandKind, CommandRegistry, CommandSpec, CommandStatus, Controller, ForensicSaveArgs,
    ParsedCommand,
};
