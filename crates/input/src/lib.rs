//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events to [`crate::types::ControlInput`] and turns
//! physical key state into edge-triggered control messages. Works in terminals
//! without key-release events via an optional release timeout.

pub mod controller;
pub mod map;

pub use iev_tui_types as types;

pub use controller::{ControlEdge, InputController, KeyStatus, MAX_EDGES};
pub use map::{should_quit, KeyBindings, MAX_BINDINGS};
