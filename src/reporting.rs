//! Rendering of a finished [`CaptureResult`](crate::capture::CaptureResult).
//!
//! Reports are pure functions of the result: a human-readable text form for
//! the terminal and a JSON form for tooling that archives the chain of
//! custody next to the artifacts.

pub mod reporter;

pub use reporter::{render, render_json, render_text};
