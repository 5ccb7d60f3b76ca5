//! Fixed-rate render loop.
//!
//! Each tick, in order: resize the surface if its container changed, resolve
//! the camera, redraw the starfield, move entity graphics to screen space and
//! present once.

use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::debug;

use crate::core::{Reconciler, StarfieldConfig, StarfieldGenerator};
use crate::surface::Surface;
use crate::term::{HudView, LinkStatus};
use crate::types::ViewportSize;

/// Wall-clock tick schedule, independent of message arrival.
#[derive(Debug, Clone)]
pub struct FrameClock {
    interval: Duration,
    next: Instant,
}

impl FrameClock {
    /// First tick is due immediately.
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next: now,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// How long input polling may block before the next tick is due.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next
    }

    /// Schedule the next tick. Missed ticks are dropped, not replayed.
    pub fn advance(&mut self, now: Instant) {
        self.next += self.interval;
        if self.next <= now {
            self.next = now + self.interval;
        }
    }
}

#[derive(Debug)]
pub struct RenderLoop {
    starfield: StarfieldGenerator,
    viewport: ViewportSize,
    frames: u64,
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new(StarfieldConfig::default())
    }
}

impl RenderLoop {
    pub fn new(config: StarfieldConfig) -> Self {
        Self {
            starfield: StarfieldGenerator::new(config),
            viewport: ViewportSize::default(),
            frames: 0,
        }
    }

    pub fn starfield(&self) -> &StarfieldGenerator {
        &self.starfield
    }

    /// Viewport used by the most recent tick, in pixels.
    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one frame. `link` selects whether a status line is drawn.
    pub fn tick<S: Surface + ?Sized>(
        &mut self,
        world: &mut Reconciler,
        surface: &mut S,
        link: Option<LinkStatus>,
    ) -> Result<()> {
        let container = surface.container_size()?;
        if container != surface.size() {
            surface.resize(container);
        }
        let viewport = container.viewport();
        if viewport != self.viewport {
            debug!(width = viewport.width, height = viewport.height, "viewport changed");
            self.viewport = viewport;
        }

        let center = world.resolve_camera();
        self.starfield.draw(world.scene_mut(), center, viewport);
        world.place_entities(viewport);

        let hud = link.map(|link| HudView {
            link,
            entities: world.entities().len(),
            center,
        });
        surface.present(world.scene(), world.assets(), hud.as_ref())?;
        self.frames += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AssetCache, AssetIndex, AssetLoader};
    use crate::surface::HeadlessSurface;
    use crate::term::TermSize;
    use crate::types::AssetId;

    struct NullLoader;

    impl AssetLoader for NullLoader {
        fn begin_load(&mut self, _asset_id: AssetId, _name: &str) {}
    }

    fn world() -> Reconciler {
        Reconciler::new(AssetCache::new(AssetIndex::new(), Box::new(NullLoader)))
    }

    #[test]
    fn resizes_only_when_container_changes() {
        let mut world = world();
        let mut surface = HeadlessSurface::new(TermSize::new(80, 24));
        let mut render = RenderLoop::default();

        for _ in 0..3 {
            render.tick(&mut world, &mut surface, None).unwrap();
        }
        assert_eq!(surface.resizes(), 1);
        assert_eq!(surface.presents(), 3);

        surface.set_container(TermSize::new(100, 30));
        render.tick(&mut world, &mut surface, None).unwrap();
        render.tick(&mut world, &mut surface, None).unwrap();
        assert_eq!(surface.resizes(), 2);
        assert_eq!(render.viewport(), ViewportSize::new(800.0, 480.0));
        assert_eq!(render.frames(), 5);
    }

    #[test]
    fn star_pool_tracks_generation_across_resizes() {
        let mut world = world();
        let mut surface = HeadlessSurface::new(TermSize::new(40, 12));
        let mut render = RenderLoop::default();
        for size in [TermSize::new(40, 12), TermSize::new(200, 60), TermSize::new(40, 12)] {
            surface.set_container(size);
            render.tick(&mut world, &mut surface, None).unwrap();
            assert_eq!(render.starfield().pool_len(), render.starfield().stars().len());
            assert_eq!(world.scene().len(), render.starfield().pool_len());
        }
    }

    #[test]
    fn clock_skips_missed_ticks() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(Duration::from_millis(16), t0);
        assert!(clock.is_due(t0));
        clock.advance(t0);
        assert!(!clock.is_due(t0));
        assert_eq!(clock.poll_timeout(t0), Duration::from_millis(16));

        let late = t0 + Duration::from_millis(100);
        assert!(clock.is_due(late));
        clock.advance(late);
        assert_eq!(clock.poll_timeout(late), Duration::from_millis(16));
    }
}
