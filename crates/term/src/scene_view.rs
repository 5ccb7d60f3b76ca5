//! SceneView: rasterizes the retained scene into a terminal framebuffer.
//!
//! This module is pure (no I/O). Node positions are viewport pixels; one
//! terminal cell covers `PIXELS_PER_COLUMN x PIXELS_PER_ROW` of them.

use crate::core::{
    ImageLookup, LoadedImage, Node, NodeKind, RenderLayer, Scene, SpriteNode, StarNode,
};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{ViewportSize, WorldPoint, PIXELS_PER_COLUMN, PIXELS_PER_ROW};

/// Terminal dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TermSize {
    pub cols: u16,
    pub rows: u16,
}

impl TermSize {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    /// Pixel size the core lays the scene out in.
    pub fn viewport(self) -> ViewportSize {
        ViewportSize::from_cells(self.cols, self.rows)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Offline,
    Connected,
    Closed,
}

impl LinkStatus {
    pub fn label(self) -> &'static str {
        match self {
            LinkStatus::Offline => "offline",
            LinkStatus::Connected => "connected",
            LinkStatus::Closed => "disconnected",
        }
    }
}

/// One-line status overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudView {
    pub link: LinkStatus,
    pub entities: usize,
    pub center: WorldPoint,
}

pub struct SceneView {
    background: CellStyle,
    hud: CellStyle,
}

impl Default for SceneView {
    fn default() -> Self {
        Self {
            background: CellStyle::fg(Rgb::new(0, 0, 0)),
            hud: CellStyle {
                fg: Rgb::new(160, 160, 170),
                bg: Rgb::new(20, 20, 30),
                bold: false,
                dim: true,
            },
        }
    }
}

impl SceneView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the scene into an existing framebuffer.
    ///
    /// Callers reuse one framebuffer across frames; it is resized only when
    /// `size` differs from its current dimensions.
    pub fn render_into<I>(
        &self,
        scene: &Scene,
        images: &I,
        hud: Option<&HudView>,
        size: TermSize,
        fb: &mut FrameBuffer,
    ) where
        I: ImageLookup + ?Sized,
    {
        fb.resize(size.cols, size.rows);
        fb.clear(self.background.into_cell(' '));

        for node in scene.draw_order() {
            if !node.visible {
                continue;
            }
            match &node.kind {
                NodeKind::Star(star) => draw_star(fb, node, star),
                NodeKind::Sprite(sprite) => {
                    // Sprites stay blank until their image arrives.
                    if let Some(image) = images.image(sprite.asset) {
                        draw_sprite(fb, node, sprite, image, sprite_style(node.layer));
                    }
                }
            }
        }

        if let Some(hud) = hud {
            self.draw_hud(fb, hud);
        }
    }

    fn draw_hud(&self, fb: &mut FrameBuffer, hud: &HudView) {
        if fb.height() == 0 {
            return;
        }
        let line = format!(
            " iev | {} | entities {} | {:.0},{:.0} ",
            hud.link.label(),
            hud.entities,
            hud.center.x,
            hud.center.y
        );
        fb.fill_row(0, 0, ' ', self.hud);
        fb.put_str(0, 0, &line, self.hud);
    }
}

fn sprite_style(layer: Option<RenderLayer>) -> CellStyle {
    match layer {
        Some(RenderLayer::Planetoids) => CellStyle::fg(Rgb::new(190, 150, 110)),
        _ => CellStyle {
            bold: true,
            ..CellStyle::fg(Rgb::new(205, 225, 255))
        },
    }
}

/// Cell containing a pixel position.
pub fn pixel_to_cell(p: WorldPoint) -> (i64, i64) {
    (
        (p.x / PIXELS_PER_COLUMN).floor() as i64,
        (p.y / PIXELS_PER_ROW).floor() as i64,
    )
}

/// Glyph for a star of the given radius.
pub fn star_glyph(radius: f64) -> char {
    if radius < 0.85 {
        '.'
    } else if radius < 1.2 {
        '+'
    } else {
        '*'
    }
}

fn draw_star(fb: &mut FrameBuffer, node: &Node, star: &StarNode) {
    let (col, row) = pixel_to_cell(node.position);
    fb.plot(col, row, star_glyph(star.radius), CellStyle::fg(star.color));
}

/// Nearest-neighbour sample of a rotated sprite.
///
/// The sprite covers `width x height` pixels anchored at its pivot, rotated by
/// `node.rotation` degrees clockwise around `node.position`.
fn draw_sprite(
    fb: &mut FrameBuffer,
    node: &Node,
    sprite: &SpriteNode,
    image: &LoadedImage,
    style: CellStyle,
) {
    let (w, h) = (sprite.width, sprite.height);
    if w <= 0.0 || h <= 0.0 || fb.width() == 0 || fb.height() == 0 {
        return;
    }
    let (sin, cos) = node.rotation.to_radians().sin_cos();
    let pos = node.position;
    let pivot = sprite.pivot;

    let mut min = WorldPoint::new(f64::INFINITY, f64::INFINITY);
    let mut max = WorldPoint::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for (lx, ly) in [(0.0, 0.0), (w, 0.0), (0.0, h), (w, h)] {
        let (rx, ry) = (lx - pivot.x, ly - pivot.y);
        let x = pos.x + rx * cos - ry * sin;
        let y = pos.y + rx * sin + ry * cos;
        min = WorldPoint::new(min.x.min(x), min.y.min(y));
        max = WorldPoint::new(max.x.max(x), max.y.max(y));
    }

    let (c0, r0) = pixel_to_cell(min);
    let (c1, r1) = pixel_to_cell(max);
    let c0 = c0.max(0);
    let r0 = r0.max(0);
    let c1 = c1.min(i64::from(fb.width()) - 1);
    let r1 = r1.min(i64::from(fb.height()) - 1);
    if c0 > c1 || r0 > r1 {
        return;
    }

    let img_w = image.width() as f64;
    let img_h = image.height() as f64;
    let mut plotted = false;
    for row in r0..=r1 {
        for col in c0..=c1 {
            let dx = (col as f64 + 0.5) * PIXELS_PER_COLUMN - pos.x;
            let dy = (row as f64 + 0.5) * PIXELS_PER_ROW - pos.y;
            let lx = dx * cos + dy * sin + pivot.x;
            let ly = -dx * sin + dy * cos + pivot.y;
            if lx < 0.0 || ly < 0.0 || lx >= w || ly >= h {
                continue;
            }
            let ic = (lx / w * img_w) as usize;
            let ir = (ly / h * img_h) as usize;
            if let Some(ch) = image.glyph(ic, ir) {
                fb.plot(col, row, ch, style);
                plotted = true;
            }
        }
    }

    // Sub-cell sprites fall between cell centers; keep them visible as one glyph.
    if !plotted {
        let (cx, cy) = (w / 2.0 - pivot.x, h / 2.0 - pivot.y);
        let center = WorldPoint::new(pos.x + cx * cos - cy * sin, pos.y + cx * sin + cy * cos);
        let (col, row) = pixel_to_cell(center);
        if let Some(ch) = first_glyph(image) {
            fb.plot(col, row, ch, style);
        }
    }
}

fn first_glyph(image: &LoadedImage) -> Option<char> {
    (0..image.height())
        .flat_map(|row| (0..image.width()).map(move |col| (col, row)))
        .find_map(|(col, row)| image.glyph(col, row))
}
