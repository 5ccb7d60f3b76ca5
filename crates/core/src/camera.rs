//! Camera model: which world point the viewport is centered on.

use crate::entity_table::EntityTable;
use crate::types::{EntityId, ViewportSize, WorldPoint};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraMode {
    /// No target: the center stays where it was last resolved.
    Unset,
    /// Track an entity's live position while it exists.
    FollowEntity(EntityId),
    /// Fixed world coordinate.
    Static(WorldPoint),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    mode: CameraMode,
    center: WorldPoint,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            mode: CameraMode::Unset,
            center: WorldPoint::ORIGIN,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn center(&self) -> WorldPoint {
        self.center
    }

    /// Follow an entity. The id is not validated; an absent target freezes the center.
    pub fn follow(&mut self, id: EntityId) {
        self.mode = CameraMode::FollowEntity(id);
    }

    /// Center on a fixed point, clearing any follow target.
    pub fn set_static(&mut self, point: WorldPoint) {
        self.mode = CameraMode::Static(point);
        self.center = point;
    }

    /// Stop tracking; the last resolved center is kept.
    pub fn release(&mut self) {
        self.mode = CameraMode::Unset;
    }

    /// Recompute the center for this tick.
    pub fn resolve(&mut self, entities: &EntityTable) -> WorldPoint {
        match self.mode {
            CameraMode::FollowEntity(id) => {
                if let Some(position) = entities.position_of(id) {
                    self.center = position;
                }
            }
            CameraMode::Static(point) => self.center = point,
            CameraMode::Unset => {}
        }
        self.center
    }

    /// Offset added to world coordinates to get screen coordinates.
    pub fn offset(&self, viewport: ViewportSize) -> WorldPoint {
        WorldPoint::new(
            viewport.width / 2.0 - self.center.x,
            viewport.height / 2.0 - self.center.y,
        )
    }

    pub fn to_screen(&self, point: WorldPoint, viewport: ViewportSize) -> WorldPoint {
        point.offset_by(self.offset(viewport))
    }
}
