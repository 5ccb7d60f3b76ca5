//! Client engine: glue between the adapter, the core and the terminal.
//!
//! [`Client`] owns every core structure and is driven by the binary's main
//! loop; [`RenderLoop`] runs one frame against any [`Surface`].

pub mod client;
pub mod render_loop;
pub mod surface;

pub use iev_tui_adapter as adapter;
pub use iev_tui_core as core;
pub use iev_tui_input as input;
pub use iev_tui_term as term;
pub use iev_tui_types as types;

pub use client::{Client, KeyOutcome};
pub use render_loop::{FrameClock, RenderLoop};
pub use surface::{HeadlessSurface, Surface, TerminalSurface};
