use iev_tui::core::{AssetCache, AssetIndex, AssetLoader, LoadedImage, Reconciler};
use iev_tui::engine::{HeadlessSurface, RenderLoop};
use iev_tui::term::{FrameBuffer, LinkStatus, TermSize};
use iev_tui::types::*;

struct NoFetch;

impl AssetLoader for NoFetch {
    fn begin_load(&mut self, _asset_id: AssetId, _name: &str) {}
}

fn world() -> Reconciler {
    let index = AssetIndex::from_values([AssetIndexValue {
        id: 10,
        name: "ab.txt".to_string(),
    }]);
    Reconciler::new(AssetCache::new(index, Box::new(NoFetch)))
}

fn contains_sprite(fb: &FrameBuffer) -> bool {
    fb.cells().iter().any(|c| c.ch == 'a' || c.ch == 'b')
}

fn create_and_follow(world: &mut Reconciler) {
    world.apply(&ServerClientMessage::DynamicObjectCreation(
        DynamicObjectCreationData {
            id: 1,
            object_asset: 10,
            display_radius: 16.0,
            view_layer: ViewLayer::Ships,
        },
    ));
    world.apply(&ServerClientMessage::ViewportFollow(
        ViewportFollowData::Entity { id: 1 },
    ));
}

fn update(world: &mut Reconciler) {
    world.apply(&ServerClientMessage::DynamicObjectUpdate(
        DynamicObjectUpdateData {
            id: 1,
            x: 0.0,
            y: 0.0,
            rotation: None,
        },
    ));
}

#[test]
fn entity_appears_only_once_updated_and_loaded() {
    let mut world = world();
    let mut surface = HeadlessSurface::new(TermSize::new(40, 12));
    let mut render = RenderLoop::default();

    create_and_follow(&mut world);
    render.tick(&mut world, &mut surface, None).unwrap();
    assert!(!contains_sprite(surface.frame()));

    update(&mut world);
    render.tick(&mut world, &mut surface, None).unwrap();
    assert!(!contains_sprite(surface.frame()));

    let image = LoadedImage::from_text("ab.txt", "ab").unwrap();
    world.asset_loaded(10, Ok(image));
    render.tick(&mut world, &mut surface, None).unwrap();

    // Viewport 320x192 px, camera on the ship: ship centered at (160, 96).
    let frame = surface.frame();
    assert_eq!(frame.get(19, 5).unwrap().ch, 'a');
    assert_eq!(frame.get(20, 5).unwrap().ch, 'b');
}

#[test]
fn loaded_but_never_updated_stays_hidden() {
    let mut world = world();
    let mut surface = HeadlessSurface::new(TermSize::new(40, 12));
    let mut render = RenderLoop::default();

    create_and_follow(&mut world);
    world.asset_loaded(10, Ok(LoadedImage::from_text("ab.txt", "ab").unwrap()));
    render.tick(&mut world, &mut surface, None).unwrap();
    assert!(!contains_sprite(surface.frame()));

    update(&mut world);
    render.tick(&mut world, &mut surface, None).unwrap();
    assert!(contains_sprite(surface.frame()));
}

#[test]
fn failed_load_leaves_entity_invisible() {
    let mut world = world();
    let mut surface = HeadlessSurface::new(TermSize::new(40, 12));
    let mut render = RenderLoop::default();

    create_and_follow(&mut world);
    update(&mut world);
    let err = LoadedImage::from_text("ab.txt", "   \n").unwrap_err();
    assert_eq!(world.asset_loaded(10, Err(err)), 0);
    render.tick(&mut world, &mut surface, None).unwrap();
    assert!(!contains_sprite(surface.frame()));
    assert_eq!(world.entities().len(), 1);
}

#[test]
fn surface_is_resized_only_on_change() {
    let mut world = world();
    let mut surface = HeadlessSurface::new(TermSize::new(40, 12));
    let mut render = RenderLoop::default();

    for _ in 0..5 {
        render.tick(&mut world, &mut surface, Some(LinkStatus::Offline)).unwrap();
    }
    assert_eq!(surface.resizes(), 1);

    surface.set_container(TermSize::new(41, 12));
    render.tick(&mut world, &mut surface, Some(LinkStatus::Offline)).unwrap();
    render.tick(&mut world, &mut surface, Some(LinkStatus::Offline)).unwrap();
    assert_eq!(surface.resizes(), 2);
    assert_eq!(surface.frame().width(), 41);
}
