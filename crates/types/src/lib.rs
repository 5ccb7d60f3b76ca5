//! Shared types module - ids, geometry, wire messages and constants
//!
//! This module defines the fundamental types used throughout the client.
//! Everything here is plain data with serde derives, making the types usable
//! in any context (reconciliation, rendering, transport).
//!
//! # Wire Format
//!
//! Server → client messages are adjacently tagged:
//!
//! ```text
//! {"type":"DynamicObjectUpdate","data":{"id":7,"x":10.0,"y":-4.5,"rotation":{"rotation":1.57}}}
//! {"type":"ViewportFollow","data":{"subtype":"Entity","id":7}}
//! ```
//!
//! Client → server messages are internally tagged:
//!
//! ```text
//! {"type":"ControlInput","input":"Forward","pressed":true}
//! {"type":"Disconnect"}
//! ```
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Render interval (~60 FPS) |
//! | `DEFAULT_KEY_RELEASE_TIMEOUT_MS` | 150 | Synthetic key-up for terminals without release events |
//!
//! # Examples
//!
//! ```
//! use iev_tui_types::{ControlInput, ViewLayer, WorldPoint};
//!
//! assert_eq!(ControlInput::from_str("fire"), Some(ControlInput::Fire));
//! assert!(ViewLayer::Ships.is_drawable());
//! assert!(!ViewLayer::Weapons.is_drawable());
//!
//! let p = WorldPoint::new(3.0, 4.0).offset_by(WorldPoint::new(1.0, -1.0));
//! assert_eq!(p, WorldPoint::new(4.0, 3.0));
//! ```

use serde::{Deserialize, Serialize};

/// Server-assigned identifier of a dynamic object.
pub type EntityId = u64;

/// Opaque identifier of an image asset.
pub type AssetId = u64;

/// Render interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Terminal cells are mapped to viewport pixels at this width.
pub const PIXELS_PER_COLUMN: f64 = 8.0;

/// Terminal cells are mapped to viewport pixels at this height.
pub const PIXELS_PER_ROW: f64 = 16.0;

/// Placeholder position for entities that have not received an update yet.
///
/// Far outside any plausible viewport so nothing flashes at the origin.
pub const OFFSCREEN_SENTINEL: WorldPoint = WorldPoint {
    x: -10_000.0,
    y: -10_000.0,
};

/// Key-up is synthesized after this long without a key event.
pub const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

/// A point (or vector) in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
}

impl WorldPoint {
    pub const ORIGIN: WorldPoint = WorldPoint { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset_by(self, offset: WorldPoint) -> Self {
        Self {
            x: self.x + offset.x,
            y: self.y + offset.y,
        }
    }
}

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Size of the drawing surface in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Viewport pixel size of a terminal with the given columns and rows.
    pub fn from_cells(cols: u16, rows: u16) -> Self {
        Self {
            width: cols as f64 * PIXELS_PER_COLUMN,
            height: rows as f64 * PIXELS_PER_ROW,
        }
    }
}

/// Layer an object is drawn on, as sent by the server.
///
/// Draw order is back to front: Background, Planetoids, Ships, Weapons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewLayer {
    Background,
    Planetoids,
    Ships,
    Weapons,
}

impl ViewLayer {
    /// Whether objects on this layer are attached to a visible render layer.
    ///
    /// Background and Weapons objects are tracked but not drawn yet.
    pub fn is_drawable(&self) -> bool {
        matches!(self, ViewLayer::Planetoids | ViewLayer::Ships)
    }
}

/// A discrete control the player can hold down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlInput {
    Forward,
    Backward,
    Left,
    Right,
    Fire,
}

impl ControlInput {
    pub const ALL: [ControlInput; 5] = [
        ControlInput::Forward,
        ControlInput::Backward,
        ControlInput::Left,
        ControlInput::Right,
        ControlInput::Fire,
    ];

    /// Parse a control input name (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "forward" => Some(ControlInput::Forward),
            "backward" => Some(ControlInput::Backward),
            "left" => Some(ControlInput::Left),
            "right" => Some(ControlInput::Right),
            "fire" => Some(ControlInput::Fire),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ControlInput::Forward => "Forward",
            ControlInput::Backward => "Backward",
            ControlInput::Left => "Left",
            ControlInput::Right => "Right",
            ControlInput::Fire => "Fire",
        }
    }
}

// ============== Server -> Client Messages ==============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicObjectCreationData {
    pub id: EntityId,
    pub object_asset: AssetId,
    pub display_radius: f64,
    pub view_layer: ViewLayer,
}

/// Rotation payload of an update, in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationData {
    pub rotation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicObjectUpdateData {
    pub id: EntityId,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<RotationData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicObjectDestructionData {
    pub id: EntityId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "subtype")]
pub enum ViewportFollowData {
    Entity { id: EntityId },
    Static { x: f64, y: f64 },
    Disconnected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerClientMessage {
    ViewportFollow(ViewportFollowData),
    DynamicObjectUpdate(DynamicObjectUpdateData),
    DynamicObjectCreation(DynamicObjectCreationData),
    DynamicObjectDestruction(DynamicObjectDestructionData),
}

impl ServerClientMessage {
    /// Discriminant names accepted on the wire.
    pub const TYPE_NAMES: [&'static str; 4] = [
        "ViewportFollow",
        "DynamicObjectUpdate",
        "DynamicObjectCreation",
        "DynamicObjectDestruction",
    ];
}

// ============== Client -> Server Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientServerMessage {
    ControlInput { input: ControlInput, pressed: bool },
    Disconnect,
}

// ============== Asset Index ==============

/// One `(id, name)` pair of the external asset index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetIndexValue {
    pub id: AssetId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetIndexResponse {
    pub asset_index_list: Vec<AssetIndexValue>,
}
