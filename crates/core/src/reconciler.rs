//! Reconciler: applies the inbound message stream to the local client state.
//!
//! Messages are applied one at a time, in arrival order, to completion. The
//! server is the only source of truth, so referential mismatches (updates for
//! unknown ids, duplicate creates) are tolerated as no-ops rather than errors.

use tracing::{debug, trace, warn};

use crate::assets::{AssetCache, AssetError, LoadedImage};
use crate::camera::Camera;
use crate::entity_table::{DynamicEntity, EntityTable};
use crate::scene::{RenderLayer, Scene};
use crate::types::{
    AssetId, DynamicObjectCreationData, DynamicObjectUpdateData, EntityId, ServerClientMessage,
    ViewportFollowData, ViewportSize, WorldPoint, OFFSCREEN_SENTINEL,
};

/// Why a message left the state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Create for an id that already has a row.
    AlreadyPresent(EntityId),
    /// Update or destroy for an id without a row.
    UnknownEntity(EntityId),
    /// Create referencing an asset id missing from the index.
    UnknownAsset(AssetId),
}

/// Observable effect of applying one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Created(EntityId),
    Updated(EntityId),
    Destroyed(EntityId),
    FollowChanged,
    Ignored(IgnoreReason),
}

/// Radians from the wire to the degrees the renderer works in.
#[inline]
pub fn radians_to_degrees(radians: f64) -> f64 {
    radians * (180.0 / std::f64::consts::PI)
}

/// Owner of the entity table, camera, asset cache and scene.
#[derive(Debug)]
pub struct Reconciler {
    entities: EntityTable,
    camera: Camera,
    assets: AssetCache<Scene>,
    scene: Scene,
}

impl Reconciler {
    pub fn new(assets: AssetCache<Scene>) -> Self {
        Self {
            entities: EntityTable::new(),
            camera: Camera::new(),
            assets,
            scene: Scene::new(),
        }
    }

    pub fn entities(&self) -> &EntityTable {
        &self.entities
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn assets(&self) -> &AssetCache<Scene> {
        &self.assets
    }

    pub fn assets_mut(&mut self) -> &mut AssetCache<Scene> {
        &mut self.assets
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn apply(&mut self, message: &ServerClientMessage) -> Applied {
        let applied = match message {
            ServerClientMessage::DynamicObjectCreation(data) => self.create(data),
            ServerClientMessage::DynamicObjectUpdate(data) => self.update(data),
            ServerClientMessage::DynamicObjectDestruction(data) => self.destroy(data.id),
            ServerClientMessage::ViewportFollow(data) => self.follow(data),
        };
        if let Applied::Ignored(reason) = applied {
            trace!(?reason, "message ignored");
        }
        applied
    }

    fn create(&mut self, data: &DynamicObjectCreationData) -> Applied {
        if self.entities.contains(data.id) {
            return Applied::Ignored(IgnoreReason::AlreadyPresent(data.id));
        }

        match self.assets.resolve(data.object_asset) {
            Ok(_) => {}
            Err(AssetError::UnknownAsset(asset)) => {
                warn!(entity = data.id, asset, "tried to use missing asset id");
                return Applied::Ignored(IgnoreReason::UnknownAsset(asset));
            }
            Err(err) => {
                warn!(entity = data.id, error = %err, "asset resolution failed");
                return Applied::Ignored(IgnoreReason::UnknownAsset(data.object_asset));
            }
        }

        let node = self
            .scene
            .create_sprite(data.object_asset, data.display_radius, data.display_radius);
        if let Some(layer) = RenderLayer::for_view_layer(data.view_layer) {
            self.scene.attach(node, layer);
        }
        self.assets.on_loaded(
            data.object_asset,
            &mut self.scene,
            Box::new(move |_: &LoadedImage, scene: &mut Scene| scene.center_pivot(node)),
        );

        self.entities.insert(DynamicEntity {
            id: data.id,
            asset: data.object_asset,
            position: OFFSCREEN_SENTINEL,
            rotation: 0.0,
            graphics: node,
            layer: data.view_layer,
        });
        debug!(entity = data.id, layer = ?data.view_layer, "entity created");
        Applied::Created(data.id)
    }

    fn update(&mut self, data: &DynamicObjectUpdateData) -> Applied {
        let Some(row) = self.entities.get_mut(data.id) else {
            return Applied::Ignored(IgnoreReason::UnknownEntity(data.id));
        };
        row.position = WorldPoint::new(data.x, data.y);
        row.rotation = data
            .rotation
            .map(|r| radians_to_degrees(r.rotation))
            .unwrap_or(0.0);
        self.scene.set_visible(row.graphics, true);
        Applied::Updated(data.id)
    }

    fn destroy(&mut self, id: EntityId) -> Applied {
        let Some(row) = self.entities.remove(id) else {
            return Applied::Ignored(IgnoreReason::UnknownEntity(id));
        };
        self.scene.destroy(row.graphics);
        debug!(entity = id, "entity destroyed");
        Applied::Destroyed(id)
    }

    fn follow(&mut self, data: &ViewportFollowData) -> Applied {
        match *data {
            ViewportFollowData::Disconnected => self.camera.release(),
            ViewportFollowData::Entity { id } => self.camera.follow(id),
            ViewportFollowData::Static { x, y } => self.camera.set_static(WorldPoint::new(x, y)),
        }
        debug!(mode = ?self.camera.mode(), "viewport follow changed");
        Applied::FollowChanged
    }

    /// Settle an asset load, firing the pivot callbacks of waiting sprites.
    pub fn asset_loaded(
        &mut self,
        asset_id: AssetId,
        result: Result<LoadedImage, AssetError>,
    ) -> usize {
        self.assets.complete(asset_id, result, &mut self.scene)
    }

    /// Recompute the camera center from its mode and the entity table.
    pub fn resolve_camera(&mut self) -> WorldPoint {
        self.camera.resolve(&self.entities)
    }

    /// Move every entity's graphics to its screen position for this frame.
    pub fn place_entities(&mut self, viewport: ViewportSize) {
        let offset = self.camera.offset(viewport);
        for row in self.entities.iter() {
            self.scene
                .set_transform(row.graphics, row.position.offset_by(offset), row.rotation);
        }
    }
}
