//! Session management core module.
//!
//! A [`Session`](session::Session) represents this process's control over one
//! guest for the duration of a capture. The
//! [`SessionController`](session_controller::SessionController) resolves the
//! guest, takes the lock, pauses and resumes it, and releases the lock.

use serde::{Deserialize, Serialize};

/// Submodule for session data structures.
pub mod session;
/// Submodule for the controller driving the guest through a session.
pub mod session_controller;

pub use session::Session;
pub use session_controller::SessionController;

/// Represents the current status of a session.
///
/// Variants:
/// - `Locked`: the machine lock is held, the guest is untouched.
/// - `Paused`: the guest is frozen.
/// - `Resumed`: the guest was running again after a pause.
/// - `Released`: the lock was given back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Locked,
    Paused,
    Resumed,
    Released,
}
