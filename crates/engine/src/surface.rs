//! Drawing surfaces the render loop presents to.

use anyhow::Result;
use tracing::debug;

use crate::core::{ImageLookup, Scene};
use crate::term::{FrameBuffer, HudView, SceneView, TermSize, TerminalRenderer};

/// A sizable drawing target polled once per tick.
pub trait Surface {
    /// Size of the container right now (the terminal window).
    fn container_size(&mut self) -> Result<TermSize>;

    /// Size the surface is currently allocated at.
    fn size(&self) -> TermSize;

    fn resize(&mut self, size: TermSize);

    /// Draw the scene and flush it in one batch.
    fn present(
        &mut self,
        scene: &Scene,
        images: &dyn ImageLookup,
        hud: Option<&HudView>,
    ) -> Result<()>;
}

/// The real terminal.
pub struct TerminalSurface {
    renderer: TerminalRenderer,
    view: SceneView,
    fb: FrameBuffer,
    size: TermSize,
}

impl TerminalSurface {
    /// Wrap a renderer that has already entered the terminal.
    pub fn new(renderer: TerminalRenderer) -> Self {
        Self {
            renderer,
            view: SceneView::new(),
            fb: FrameBuffer::new(0, 0),
            size: TermSize::default(),
        }
    }

    pub fn renderer(&self) -> &TerminalRenderer {
        &self.renderer
    }

    pub fn into_renderer(self) -> TerminalRenderer {
        self.renderer
    }
}

impl Surface for TerminalSurface {
    fn container_size(&mut self) -> Result<TermSize> {
        self.renderer.size()
    }

    fn size(&self) -> TermSize {
        self.size
    }

    fn resize(&mut self, size: TermSize) {
        debug!(cols = size.cols, rows = size.rows, "terminal resized");
        self.size = size;
        self.fb.resize(size.cols, size.rows);
        self.renderer.invalidate();
    }

    fn present(
        &mut self,
        scene: &Scene,
        images: &dyn ImageLookup,
        hud: Option<&HudView>,
    ) -> Result<()> {
        self.view
            .render_into(scene, images, hud, self.size, &mut self.fb);
        self.renderer.draw_swap(&mut self.fb)
    }
}

/// Off-screen surface that keeps the last frame for inspection.
#[derive(Debug)]
pub struct HeadlessSurface {
    container: TermSize,
    size: TermSize,
    fb: FrameBuffer,
    resizes: usize,
    presents: usize,
}

impl HeadlessSurface {
    pub fn new(container: TermSize) -> Self {
        Self {
            container,
            size: TermSize::default(),
            fb: FrameBuffer::new(0, 0),
            resizes: 0,
            presents: 0,
        }
    }

    /// Simulate the window changing size.
    pub fn set_container(&mut self, size: TermSize) {
        self.container = size;
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.fb
    }

    pub fn resizes(&self) -> usize {
        self.resizes
    }

    pub fn presents(&self) -> usize {
        self.presents
    }
}

impl Surface for HeadlessSurface {
    fn container_size(&mut self) -> Result<TermSize> {
        Ok(self.container)
    }

    fn size(&self) -> TermSize {
        self.size
    }

    fn resize(&mut self, size: TermSize) {
        self.size = size;
        self.resizes += 1;
    }

    fn present(
        &mut self,
        scene: &Scene,
        images: &dyn ImageLookup,
        hud: Option<&HudView>,
    ) -> Result<()> {
        SceneView::new().render_into(scene, images, hud, self.size, &mut self.fb);
        self.presents += 1;
        Ok(())
    }
}
