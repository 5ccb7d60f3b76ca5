//! Client core - reconciliation, camera, assets and starfield
//!
//! This crate holds everything the client knows about the world. It has
//! **no I/O**: messages, asset completions and ticks are fed in by the engine,
//! which makes every component deterministic and testable without a terminal
//! or a server.
//!
//! # Module Structure
//!
//! - [`scene`]: retained graphics nodes (the "graphics handles") and draw layers
//! - [`entity_table`]: one row per live server object
//! - [`reconciler`]: applies create/update/destroy/follow messages
//! - [`camera`]: follow/static camera and world-to-screen offset
//! - [`assets`]: asset index, deduplicating loader cache with load callbacks
//! - [`starfield`]: deterministic per-cell parallax starfield with a node pool
//!
//! # Example
//!
//! ```
//! use iev_tui_core::{AssetCache, AssetIndex, AssetLoader, Reconciler};
//! use iev_tui_core::types::*;
//!
//! struct NoFetch;
//! impl AssetLoader for NoFetch {
//!     fn begin_load(&mut self, _id: AssetId, _name: &str) {}
//! }
//!
//! let index = AssetIndex::from_values([AssetIndexValue { id: 1, name: "ship.txt".into() }]);
//! let mut world = Reconciler::new(AssetCache::new(index, Box::new(NoFetch)));
//!
//! world.apply(&ServerClientMessage::DynamicObjectCreation(DynamicObjectCreationData {
//!     id: 7,
//!     object_asset: 1,
//!     display_radius: 24.0,
//!     view_layer: ViewLayer::Ships,
//! }));
//! world.apply(&ServerClientMessage::ViewportFollow(ViewportFollowData::Entity { id: 7 }));
//! world.apply(&ServerClientMessage::DynamicObjectUpdate(DynamicObjectUpdateData {
//!     id: 7,
//!     x: 100.0,
//!     y: 200.0,
//!     rotation: None,
//! }));
//!
//! assert_eq!(world.resolve_camera(), WorldPoint::new(100.0, 200.0));
//! ```

pub mod assets;
pub mod camera;
pub mod entity_table;
pub mod reconciler;
pub mod scene;
pub mod starfield;

pub use iev_tui_types as types;

pub use assets::{
    AssetCache, AssetError, AssetIndex, AssetLoader, AssetStatus, ImageLookup, LoadedImage,
    OnLoaded,
};
pub use camera::{Camera, CameraMode};
pub use entity_table::{DynamicEntity, EntityTable};
pub use reconciler::{radians_to_degrees, Applied, IgnoreReason, Reconciler};
pub use scene::{Node, NodeId, NodeKind, RenderLayer, Scene, SpriteNode, StarNode};
pub use starfield::{CellWindow, Star, StarfieldConfig, StarfieldGenerator, SPECTRA_TABLE};
