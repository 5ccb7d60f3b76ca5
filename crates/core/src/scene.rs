//! Retained scene graph: graphics handles grouped into draw layers.
//!
//! Every drawable the client owns (entity sprites, pooled stars) is a node in
//! the [`Scene`]. A [`NodeId`] is the handle; whoever created the node owns it
//! and is the only one allowed to destroy it. Positions stored on nodes are in
//! screen pixels, already offset by the camera.

use std::collections::HashMap;

use crate::types::{AssetId, Rgb, ViewLayer, WorldPoint, OFFSCREEN_SENTINEL};

/// Handle to a node in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

/// Drawable layers, back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderLayer {
    Stars,
    Planetoids,
    Ships,
}

impl RenderLayer {
    pub const ALL: [RenderLayer; 3] = [
        RenderLayer::Stars,
        RenderLayer::Planetoids,
        RenderLayer::Ships,
    ];

    /// The render layer a server view layer is attached to, if any.
    pub fn for_view_layer(layer: ViewLayer) -> Option<Self> {
        match layer {
            ViewLayer::Planetoids => Some(RenderLayer::Planetoids),
            ViewLayer::Ships => Some(RenderLayer::Ships),
            // Tracked but not attached to a drawable layer yet.
            ViewLayer::Background | ViewLayer::Weapons => None,
        }
    }

    fn index(self) -> usize {
        match self {
            RenderLayer::Stars => 0,
            RenderLayer::Planetoids => 1,
            RenderLayer::Ships => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteNode {
    pub asset: AssetId,
    pub width: f64,
    pub height: f64,
    /// Point inside the sprite that sits at the node position and that the
    /// sprite rotates around. Zero until the backing image has loaded.
    pub pivot: WorldPoint,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarNode {
    pub radius: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKind {
    Sprite(SpriteNode),
    Star(StarNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub position: WorldPoint,
    /// Clockwise rotation in degrees.
    pub rotation: f64,
    pub visible: bool,
    pub layer: Option<RenderLayer>,
}

/// Owner of every live node and of the layer membership lists.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: HashMap<NodeId, Node>,
    layers: [Vec<NodeId>; 3],
    next_id: u32,
    destroyed: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a hidden sprite parked at the off-screen sentinel.
    pub fn create_sprite(&mut self, asset: AssetId, width: f64, height: f64) -> NodeId {
        self.insert(Node {
            kind: NodeKind::Sprite(SpriteNode {
                asset,
                width,
                height,
                pivot: WorldPoint::ORIGIN,
            }),
            position: OFFSCREEN_SENTINEL,
            rotation: 0.0,
            visible: false,
            layer: None,
        })
    }

    /// Create a hidden star primitive.
    pub fn create_star(&mut self) -> NodeId {
        self.insert(Node {
            kind: NodeKind::Star(StarNode {
                radius: 0.0,
                color: Rgb::default(),
            }),
            position: WorldPoint::ORIGIN,
            rotation: 0.0,
            visible: false,
            layer: None,
        })
    }

    fn insert(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.nodes.insert(id, node);
        id
    }

    /// Append a node to the end of a layer. A node belongs to at most one layer.
    pub fn attach(&mut self, id: NodeId, layer: RenderLayer) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        if let Some(prev) = node.layer.replace(layer) {
            self.layers[prev.index()].retain(|n| *n != id);
        }
        self.layers[layer.index()].push(id);
    }

    /// Detach a node from its layer and free it.
    ///
    /// Returns false when the handle was already released.
    pub fn destroy(&mut self, id: NodeId) -> bool {
        let Some(node) = self.nodes.remove(&id) else {
            return false;
        };
        if let Some(layer) = node.layer {
            let members = &mut self.layers[layer.index()];
            if members.last() == Some(&id) {
                members.pop();
            } else {
                members.retain(|n| *n != id);
            }
        }
        self.destroyed += 1;
        true
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.visible = visible;
        }
    }

    pub fn set_transform(&mut self, id: NodeId, position: WorldPoint, rotation: f64) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.position = position;
            node.rotation = rotation;
        }
    }

    /// Anchor a sprite on its center.
    pub fn center_pivot(&mut self, id: NodeId) {
        if let Some(Node {
            kind: NodeKind::Sprite(sprite),
            ..
        }) = self.nodes.get_mut(&id)
        {
            sprite.pivot = WorldPoint::new(sprite.width / 2.0, sprite.height / 2.0);
        }
    }

    /// Members of a layer in draw order.
    pub fn layer(&self, layer: RenderLayer) -> &[NodeId] {
        &self.layers[layer.index()]
    }

    /// Nodes attached to a layer, back to front.
    pub fn draw_order(&self) -> impl Iterator<Item = &Node> + '_ {
        RenderLayer::ALL
            .into_iter()
            .flat_map(move |layer| self.layer(layer).iter())
            .filter_map(move |id| self.nodes.get(id))
    }

    /// Number of live nodes, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total number of nodes released over the scene's lifetime.
    pub fn destroyed_count(&self) -> u64 {
        self.destroyed
    }
}
