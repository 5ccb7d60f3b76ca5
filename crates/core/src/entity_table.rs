//! Entity table: one row per live server object.

use std::collections::HashMap;

use crate::scene::NodeId;
use crate::types::{AssetId, EntityId, ViewLayer, WorldPoint};

/// Render state of one server-controlled object.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicEntity {
    pub id: EntityId,
    pub asset: AssetId,
    pub position: WorldPoint,
    /// Degrees, converted from the server's radians on ingestion.
    pub rotation: f64,
    /// Owned by this row; released only when the row is removed.
    pub graphics: NodeId,
    pub layer: ViewLayer,
}

/// Owned mapping from entity id to render state.
///
/// Rows are inserted and removed only by the reconciler, so the table holds at
/// most one row per id.
#[derive(Debug, Default)]
pub struct EntityTable {
    rows: HashMap<EntityId, DynamicEntity>,
}

impl EntityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: EntityId) -> Option<&DynamicEntity> {
        self.rows.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: EntityId) -> Option<&mut DynamicEntity> {
        self.rows.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.rows.contains_key(&id)
    }

    /// Current world position of an entity, re-read on every call.
    pub fn position_of(&self, id: EntityId) -> Option<WorldPoint> {
        self.rows.get(&id).map(|row| row.position)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DynamicEntity> + '_ {
        self.rows.values()
    }

    /// Insert a new row. Returns false (and keeps the existing row) on a duplicate id.
    pub(crate) fn insert(&mut self, row: DynamicEntity) -> bool {
        match self.rows.entry(row.id) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(row);
                true
            }
        }
    }

    pub(crate) fn remove(&mut self, id: EntityId) -> Option<DynamicEntity> {
        self.rows.remove(&id)
    }
}
