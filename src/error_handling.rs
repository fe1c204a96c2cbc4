//! Error types shared by every subsystem.
//!
//! [`CaptureError`](types::CaptureError) carries the failure taxonomy of a
//! capture run; the other enums describe failures of the collaborators it
//! wraps (configuration, external processes, the hypervisor).

pub mod types;
