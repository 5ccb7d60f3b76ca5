//! iev-tui (workspace facade crate).
//!
//! Re-exports the workspace crates under one name so the binary, the
//! integration tests and the benches can use `iev_tui::{core, adapter, term,
//! input, engine, types}`.

pub use iev_tui_adapter as adapter;
pub use iev_tui_core as core;
pub use iev_tui_engine as engine;
pub use iev_tui_input as input;
pub use iev_tui_term as term;
pub use iev_tui_types as types;
