//! Terminal rendering for the client scene.
//!
//! The scene is rasterized into a plain framebuffer of styled cells which is
//! then flushed to the terminal as diffs. No ratatui widgets or layout: the
//! scene is already positioned in viewport pixels by the core, and each cell
//! stands for an `8 x 16` pixel block.

pub mod fb;
pub mod renderer;
pub mod scene_view;

pub use iev_tui_core as core;
pub use iev_tui_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
pub use scene_view::{pixel_to_cell, star_glyph, HudView, LinkStatus, SceneView, TermSize};
