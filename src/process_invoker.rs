//! External process invocation.
//!
//! The memory dump, disk clone and snapshot-to-disk resolution are delegated
//! to external binaries. [`ProcessInvoker`] is the seam the capture pipeline
//! talks to; [`SystemProcessInvoker`] runs real processes through
//! `tokio::process` with an optional timeout.

#[cfg(test)]
pub mod mock;
pub mod system_invoker;
pub mod types;

pub use system_invoker::SystemProcessInvoker;
pub use types::{ExternalTool, ProcessInvoker, ToolInvocation, ToolOutput};
