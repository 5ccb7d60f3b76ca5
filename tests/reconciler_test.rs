use std::cell::RefCell;
use std::rc::Rc;

use iev_tui::core::{
    AssetCache, AssetIndex, AssetLoader, AssetStatus, CameraMode, LoadedImage, NodeKind,
    Reconciler,
};
use iev_tui::types::*;

#[derive(Clone, Default)]
struct RecordingLoader {
    started: Rc<RefCell<Vec<(AssetId, String)>>>,
}

impl AssetLoader for RecordingLoader {
    fn begin_load(&mut self, asset_id: AssetId, name: &str) {
        self.started.borrow_mut().push((asset_id, name.to_string()));
    }
}

fn world_with(loader: RecordingLoader) -> Reconciler {
    let index = AssetIndex::from_values([
        AssetIndexValue {
            id: 1,
            name: "fighter.txt".to_string(),
        },
        AssetIndexValue {
            id: 2,
            name: "rock.txt".to_string(),
        },
    ]);
    Reconciler::new(AssetCache::new(index, Box::new(loader)))
}

fn world() -> Reconciler {
    world_with(RecordingLoader::default())
}

fn create(id: EntityId, asset: AssetId) -> ServerClientMessage {
    ServerClientMessage::DynamicObjectCreation(DynamicObjectCreationData {
        id,
        object_asset: asset,
        display_radius: 24.0,
        view_layer: ViewLayer::Ships,
    })
}

fn update(id: EntityId, x: f64, y: f64) -> ServerClientMessage {
    ServerClientMessage::DynamicObjectUpdate(DynamicObjectUpdateData {
        id,
        x,
        y,
        rotation: None,
    })
}

fn destroy(id: EntityId) -> ServerClientMessage {
    ServerClientMessage::DynamicObjectDestruction(DynamicObjectDestructionData { id })
}

/// Small deterministic generator so the sequence test needs no extra crates.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }
}

#[test]
fn random_sequences_keep_one_row_per_id() {
    let mut world = world();
    let mut rng = Lcg(7);
    let mut live = std::collections::HashSet::new();

    for _ in 0..2000 {
        let id = rng.next() % 12;
        let msg = match rng.next() % 3 {
            0 => create(id, 1 + rng.next() % 2),
            1 => update(id, (rng.next() % 500) as f64, (rng.next() % 500) as f64),
            _ => destroy(id),
        };
        match &msg {
            ServerClientMessage::DynamicObjectCreation(_) => {
                live.insert(id);
            }
            ServerClientMessage::DynamicObjectDestruction(_) => {
                live.remove(&id);
            }
            _ => {}
        }
        world.apply(&msg);

        assert_eq!(world.entities().len(), live.len());
        for row in world.entities().iter() {
            assert!(live.contains(&row.id));
        }
        // Every live row owns exactly one scene node.
        assert_eq!(world.scene().len(), live.len());
    }
}

#[test]
fn update_before_create_is_noop() {
    let mut world = world();
    world.apply(&update(5, 1.0, 2.0));
    assert!(world.entities().is_empty());
    assert!(world.scene().is_empty());
}

#[test]
fn create_then_destroy_stays_invisible_and_frees_once() {
    let mut world = world();
    world.apply(&create(3, 1));
    let node = world.entities().get(3).unwrap().graphics;
    let placed = world.scene().node(node).unwrap();
    assert!(!placed.visible);
    assert_eq!(placed.position, OFFSCREEN_SENTINEL);

    world.apply(&destroy(3));
    assert!(!world.scene().contains(node));
    assert_eq!(world.scene().destroyed_count(), 1);

    world.apply(&destroy(3));
    assert_eq!(world.scene().destroyed_count(), 1);
}

#[test]
fn quarter_turn_is_ninety_degrees() {
    let mut world = world();
    world.apply(&create(1, 1));
    world.apply(&ServerClientMessage::DynamicObjectUpdate(
        DynamicObjectUpdateData {
            id: 1,
            x: 0.0,
            y: 0.0,
            rotation: Some(RotationData {
                rotation: std::f64::consts::FRAC_PI_2,
            }),
        },
    ));
    let rotation = world.entities().get(1).unwrap().rotation;
    assert!((rotation - 90.0).abs() < 1e-9);
}

#[test]
fn followed_entity_center_freezes_after_destroy() {
    let mut world = world();
    world.apply(&create(8, 1));
    world.apply(&ServerClientMessage::ViewportFollow(
        ViewportFollowData::Entity { id: 8 },
    ));
    world.apply(&update(8, 100.0, 200.0));
    assert_eq!(world.resolve_camera(), WorldPoint::new(100.0, 200.0));

    world.apply(&destroy(8));
    assert_eq!(world.resolve_camera(), WorldPoint::new(100.0, 200.0));
    assert_eq!(world.resolve_camera(), WorldPoint::new(100.0, 200.0));
}

#[test]
fn static_center_stops_following_entity() {
    let mut world = world();
    world.apply(&create(8, 1));
    world.apply(&ServerClientMessage::ViewportFollow(
        ViewportFollowData::Entity { id: 8 },
    ));
    world.apply(&update(8, 100.0, 200.0));
    assert_eq!(world.resolve_camera(), WorldPoint::new(100.0, 200.0));

    world.apply(&ServerClientMessage::ViewportFollow(
        ViewportFollowData::Static { x: 30.0, y: -40.0 },
    ));
    world.apply(&update(8, 500.0, 600.0));
    assert_eq!(world.resolve_camera(), WorldPoint::new(30.0, -40.0));
    assert_eq!(world.camera().mode(), CameraMode::Static(WorldPoint::new(30.0, -40.0)));
}

#[test]
fn disconnected_follow_keeps_last_center() {
    let mut world = world();
    world.apply(&ServerClientMessage::ViewportFollow(
        ViewportFollowData::Static { x: -5.0, y: 9.0 },
    ));
    assert_eq!(world.resolve_camera(), WorldPoint::new(-5.0, 9.0));
    world.apply(&ServerClientMessage::ViewportFollow(
        ViewportFollowData::Disconnected,
    ));
    assert_eq!(world.resolve_camera(), WorldPoint::new(-5.0, 9.0));
}

#[test]
fn shared_asset_loads_once_and_sets_up_every_sprite() {
    let loader = RecordingLoader::default();
    let started = loader.started.clone();
    let mut world = world_with(loader);

    for id in [1, 2, 3] {
        world.apply(&create(id, 2));
    }
    assert_eq!(started.borrow().as_slice(), &[(2, "rock.txt".to_string())]);
    assert_eq!(world.assets().status(2), Some(AssetStatus::Pending));

    let image = LoadedImage::from_text("rock.txt", "()\n").unwrap();
    assert_eq!(world.asset_loaded(2, Ok(image)), 3);

    for id in [1, 2, 3] {
        let node = world.entities().get(id).unwrap().graphics;
        match &world.scene().node(node).unwrap().kind {
            NodeKind::Sprite(sprite) => assert_eq!(sprite.pivot, WorldPoint::new(12.0, 12.0)),
            other => panic!("expected sprite, got {other:?}"),
        }
    }
}

#[test]
fn load_callbacks_fire_in_registration_order() {
    struct NoFetch;
    impl AssetLoader for NoFetch {
        fn begin_load(&mut self, _asset_id: AssetId, _name: &str) {}
    }

    let index = AssetIndex::from_values([AssetIndexValue {
        id: 4,
        name: "x.txt".to_string(),
    }]);
    let mut cache: AssetCache<Vec<u32>> = AssetCache::new(index, Box::new(NoFetch));
    let mut order = Vec::new();
    cache.resolve(4).unwrap();
    for tag in [10u32, 20, 30] {
        cache.on_loaded(
            4,
            &mut order,
            Box::new(move |_: &LoadedImage, log: &mut Vec<u32>| log.push(tag)),
        );
    }
    assert!(order.is_empty());

    let image = LoadedImage::from_text("x.txt", "x").unwrap();
    cache.complete(4, Ok(image), &mut order);
    assert_eq!(order, vec![10, 20, 30]);
}

#[test]
fn unknown_asset_never_creates_a_row() {
    let loader = RecordingLoader::default();
    let started = loader.started.clone();
    let mut world = world_with(loader);
    world.apply(&create(1, 99));
    assert!(world.entities().is_empty());
    assert!(started.borrow().is_empty());
}
