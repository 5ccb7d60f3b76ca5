//! Procedural parallax starfield.
//!
//! World space (after dividing the camera position by the maximum coordinate
//! divisor) is cut into square cells. Each cell holds exactly one star whose
//! attributes come from a hash of the integer cell coordinates, so the field
//! is infinite, deterministic and never stored: the visible window is
//! regenerated on every call.
//!
//! Draw order of the per-cell random values is part of the visual contract:
//! x offset, y offset, speed multiplier, spectra, size. Reordering them
//! changes every star.

use crate::scene::{NodeId, NodeKind, RenderLayer, Scene};
use crate::types::{Rgb, ViewportSize, WorldPoint};

/// Warm-to-violet star colors, indexed by the spectra draw.
pub const SPECTRA_TABLE: [Rgb; 24] = [
    Rgb::new(0xFF, 0xB1, 0x0E),
    Rgb::new(0xFF, 0xCF, 0x54),
    Rgb::new(0xFF, 0xDE, 0x8F),
    Rgb::new(0xFF, 0xE4, 0xB8),
    Rgb::new(0xFF, 0xE7, 0xD4),
    Rgb::new(0xFF, 0xE8, 0xE8),
    Rgb::new(0xFF, 0xE8, 0xF6),
    Rgb::new(0xFC, 0xE6, 0xFF),
    Rgb::new(0xF4, 0xDF, 0xFF),
    Rgb::new(0xEF, 0xD9, 0xFF),
    Rgb::new(0xEA, 0xD5, 0xFF),
    Rgb::new(0xE7, 0xD2, 0xFE),
    Rgb::new(0xE4, 0xCF, 0xFF),
    Rgb::new(0xE2, 0xCD, 0xFF),
    Rgb::new(0xE0, 0xCB, 0xFE),
    Rgb::new(0xDE, 0xC9, 0xFF),
    Rgb::new(0xDD, 0xC8, 0xFF),
    Rgb::new(0xDC, 0xC6, 0xFF),
    Rgb::new(0xDB, 0xC5, 0xFF),
    Rgb::new(0xDA, 0xC4, 0xFF),
    Rgb::new(0xD9, 0xC4, 0xFF),
    Rgb::new(0xD8, 0xC3, 0xFF),
    Rgb::new(0xD8, 0xC2, 0xFF),
    Rgb::new(0xD7, 0xC2, 0xFF),
];

const DRAW_EPSILON: f64 = 0.0001;
const DRAW_SCALE: f64 = 2_147_483_648.0;

/// One round of the 13/7/17 xorshift on a 32-bit word.
#[inline]
pub fn xorshift(state: u32) -> u32 {
    let mut x = state;
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    x
}

/// Seed for a cell: low 16 bits of `cx` in the high half, low 16 bits of `cy`
/// in the low half, mixed by five xorshift rounds.
pub fn hash_cell(cx: i64, cy: i64) -> u32 {
    let mut seed = ((cx as i32 as u32) << 16) | ((cy as i32 as u32) & 0xFFFF);
    for _ in 0..5 {
        seed = xorshift(seed);
    }
    seed
}

/// Map a seed to roughly `[0, 1)` using its signed 32-bit magnitude.
#[inline]
pub fn unit_draw(seed: u32) -> f64 {
    ((seed as i32 as f64).abs() + DRAW_EPSILON) / DRAW_SCALE
}

/// Attributes of the star living in one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub cell_x: i64,
    pub cell_y: i64,
    pub seed: u32,
    pub x_offset: f64,
    pub y_offset: f64,
    pub speed_multiplier: f64,
    pub spectra: f64,
    pub size: f64,
    /// Position in divided (parallax) space.
    pub position: WorldPoint,
}

impl Star {
    pub fn from_cell(cell_x: i64, cell_y: i64, cell_size: f64) -> Self {
        let seed = hash_cell(cell_x, cell_y);

        let mut running = seed;
        let x_offset = unit_draw(running);
        running = xorshift(running);
        let y_offset = unit_draw(running);
        running = xorshift(running);
        let speed_multiplier = unit_draw(running);
        running = xorshift(running);
        let spectra = unit_draw(running);
        running = xorshift(running);
        let size = unit_draw(running);

        Self {
            cell_x,
            cell_y,
            seed,
            x_offset,
            y_offset,
            speed_multiplier,
            spectra,
            size,
            position: WorldPoint::new(
                (cell_x as f64 - 1.0 + x_offset) * cell_size,
                (cell_y as f64 - 1.0 + y_offset) * cell_size,
            ),
        }
    }

    pub fn color_index(&self) -> usize {
        let idx = (self.spectra * SPECTRA_TABLE.len() as f64).floor() as usize;
        idx.min(SPECTRA_TABLE.len() - 1)
    }

    pub fn color(&self) -> Rgb {
        SPECTRA_TABLE[self.color_index()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarfieldConfig {
    pub min_coordinate_divisor: f64,
    pub max_coordinate_divisor: f64,
    /// Side length of a cell in divided world units.
    pub cell_size: f64,
    pub min_size: f64,
    pub max_size: f64,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            min_coordinate_divisor: 2.0,
            max_coordinate_divisor: 15.0,
            cell_size: 60.0,
            min_size: 0.5,
            max_size: 1.5,
        }
    }
}

impl StarfieldConfig {
    /// Parallax spread between the nearest and farthest star.
    pub fn divisor_ratio(&self) -> f64 {
        self.max_coordinate_divisor / self.min_coordinate_divisor - 1.0
    }
}

/// Range of cells covering the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellWindow {
    pub start_x: i64,
    pub start_y: i64,
    pub cells_x: usize,
    pub cells_y: usize,
}

impl CellWindow {
    pub fn len(&self) -> usize {
        self.cells_x * self.cells_y
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Generates the visible stars and keeps a pool of star nodes in sync with them.
#[derive(Debug, Default)]
pub struct StarfieldGenerator {
    config: StarfieldConfig,
    stars: Vec<Star>,
    pool: Vec<NodeId>,
}

impl StarfieldGenerator {
    pub fn new(config: StarfieldConfig) -> Self {
        Self {
            config,
            stars: Vec::new(),
            pool: Vec::new(),
        }
    }

    pub fn config(&self) -> &StarfieldConfig {
        &self.config
    }

    /// Stars of the most recent generation.
    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Number of pooled star nodes.
    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    /// Camera position scaled into parallax space.
    pub fn divided_center(&self, center: WorldPoint) -> WorldPoint {
        WorldPoint::new(
            center.x / self.config.max_coordinate_divisor,
            center.y / self.config.max_coordinate_divisor,
        )
    }

    pub fn window(&self, center: WorldPoint, viewport: ViewportSize) -> CellWindow {
        let divided = self.divided_center(center);
        let cell = self.config.cell_size;
        CellWindow {
            start_x: (divided.x / cell).floor() as i64,
            start_y: (divided.y / cell).floor() as i64,
            cells_x: (viewport.width / cell + 1.0).round().max(0.0) as usize,
            cells_y: (viewport.height / cell + 1.0).round().max(0.0) as usize,
        }
    }

    /// Regenerate the star list for a camera center and viewport.
    pub fn generate(&mut self, center: WorldPoint, viewport: ViewportSize) -> &[Star] {
        let window = self.window(center, viewport);
        self.stars.clear();
        self.stars.reserve(window.len());
        for i in 0..window.cells_y as i64 {
            for j in 0..window.cells_x as i64 {
                // Only the low 16 bits feed the hash, so wrapping keeps extreme
                // camera positions well defined.
                self.stars.push(Star::from_cell(
                    window.start_x.wrapping_add(j),
                    window.start_y.wrapping_add(i),
                    self.config.cell_size,
                ));
            }
        }
        &self.stars
    }

    /// Regenerate and push the stars into pooled scene nodes.
    ///
    /// The pool grows by appending and shrinks by releasing from the end, so it
    /// is never rebuilt wholesale.
    pub fn draw(&mut self, scene: &mut Scene, center: WorldPoint, viewport: ViewportSize) {
        self.generate(center, viewport);

        while self.pool.len() < self.stars.len() {
            let id = scene.create_star();
            scene.attach(id, RenderLayer::Stars);
            self.pool.push(id);
        }
        while self.pool.len() > self.stars.len() {
            if let Some(id) = self.pool.pop() {
                scene.destroy(id);
            }
        }

        let divided = self.divided_center(center);
        let divisor_ratio = self.config.divisor_ratio();
        let size_range = self.config.max_size - self.config.min_size;
        let margin = self.config.max_size;

        for (star, id) in self.stars.iter().zip(&self.pool) {
            let offset_ratio = 1.0 + divisor_ratio * star.speed_multiplier;
            let screen = WorldPoint::new(
                (star.position.x - divided.x) * offset_ratio,
                (star.position.y - divided.y) * offset_ratio,
            );
            let on_screen = screen.x > -margin
                && screen.y > -margin
                && screen.x < viewport.width + margin
                && screen.y < viewport.height + margin;

            if let Some(node) = scene.node_mut(*id) {
                node.position = screen;
                node.visible = on_screen;
                if let NodeKind::Star(ref mut s) = node.kind {
                    s.radius = self.config.min_size + size_range * star.size;
                    s.color = star.color();
                }
            }
        }
    }

    /// Release every pooled node.
    pub fn clear(&mut self, scene: &mut Scene) {
        for id in self.pool.drain(..) {
            scene.destroy(id);
        }
        self.stars.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xorshift_matches_reference_values() {
        // 1 -> 1 ^ 1<<13 = 0x2001; ^ (0x2001 >> 7) = 0x2041; ^ (0x2041 << 17)
        assert_eq!(xorshift(1), 0x4082_2041);
        assert_eq!(xorshift(0), 0);
    }

    #[test]
    fn hash_interleaves_low_halves() {
        let mut seed: u32 = (3u32 << 16) | 0xFFFF;
        for _ in 0..5 {
            seed = xorshift(seed);
        }
        assert_eq!(hash_cell(3, -1), seed);
        // Only the low 16 bits of each coordinate participate.
        assert_eq!(hash_cell(3, -1), hash_cell(3, 0xFFFF));
    }

    #[test]
    fn unit_draw_uses_signed_magnitude() {
        assert!((unit_draw(0) - DRAW_EPSILON / DRAW_SCALE).abs() < 1e-15);
        // 0xFFFF_FFFF is -1 as i32.
        assert!((unit_draw(u32::MAX) - (1.0 + DRAW_EPSILON) / DRAW_SCALE).abs() < 1e-15);
        assert!(unit_draw(0x7FFF_FFFF) < 1.0);
    }

    #[test]
    fn star_draws_follow_running_seed() {
        let star = Star::from_cell(5, 9, 60.0);
        let s0 = hash_cell(5, 9);
        let s1 = xorshift(s0);
        let s2 = xorshift(s1);
        let s3 = xorshift(s2);
        let s4 = xorshift(s3);
        assert_eq!(star.seed, s0);
        assert_eq!(star.x_offset, unit_draw(s0));
        assert_eq!(star.y_offset, unit_draw(s1));
        assert_eq!(star.speed_multiplier, unit_draw(s2));
        assert_eq!(star.spectra, unit_draw(s3));
        assert_eq!(star.size, unit_draw(s4));
        assert_eq!(star.position.x, (5.0 - 1.0 + star.x_offset) * 60.0);
    }

    #[test]
    fn window_covers_viewport_plus_margin() {
        let gen = StarfieldGenerator::new(StarfieldConfig::default());
        let window = gen.window(WorldPoint::new(-900.0, 1800.0), ViewportSize::new(600.0, 300.0));
        // -900 / 15 = -60 -> cell -1; 1800 / 15 = 120 -> cell 2.
        assert_eq!(window.start_x, -1);
        assert_eq!(window.start_y, 2);
        assert_eq!(window.cells_x, 11);
        assert_eq!(window.cells_y, 6);
    }

    #[test]
    fn color_index_is_clamped() {
        let mut star = Star::from_cell(0, 0, 60.0);
        star.spectra = 1.0 + 1e-9;
        assert_eq!(star.color_index(), SPECTRA_TABLE.len() - 1);
    }

    #[test]
    fn extreme_center_generates_full_window() {
        let mut scene = Scene::new();
        let mut gen = StarfieldGenerator::default();
        let viewport = ViewportSize::new(640.0, 384.0);
        for center in [
            WorldPoint::new(1e25, 0.0),
            WorldPoint::new(-1e25, 1e25),
            WorldPoint::new(f64::MAX, f64::MIN),
        ] {
            gen.draw(&mut scene, center, viewport);
            assert_eq!(gen.stars().len(), gen.window(center, viewport).len());
            assert_eq!(gen.pool_len(), gen.stars().len());
        }
    }

    #[test]
    fn clear_releases_pool() {
        let mut scene = Scene::new();
        let mut gen = StarfieldGenerator::default();
        gen.draw(&mut scene, WorldPoint::ORIGIN, ViewportSize::new(120.0, 120.0));
        assert_eq!(scene.len(), gen.pool_len());
        gen.clear(&mut scene);
        assert_eq!(scene.len(), 0);
        assert_eq!(gen.pool_len(), 0);
    }
}
