//! 2D grid rendering
//!
//! `Renderer::paint` turns a `GridModel` into draw calls on a `Surface`.
//! Sprites are optional: whenever the surface reports an image as not ready
//! the renderer falls back to plain shapes or glyphs, so a frame never waits
//! on an asset.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod display_list;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use display_list::{DisplayList, DrawCommand};

use glam::DVec2;

use crate::consts::IMAGE_SCALE;
use crate::sim::{GridModel, Position};

/// Image assets the renderer may draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sprite {
    Head,
    Target,
}

/// Axis-aligned rectangle in surface pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub origin: DVec2,
    pub size: DVec2,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            origin: DVec2::new(x, y),
            size: DVec2::new(w, h),
        }
    }
}

/// A 2D drawing target
pub trait Surface {
    /// Resize the backing surface in pixels
    fn resize(&mut self, width: u32, height: u32);
    fn clear(&mut self);
    fn stroke_rect(&mut self, rect: Rect, color: &str, line_width: f64);
    fn fill_rect(&mut self, rect: Rect, color: &str);
    /// Draw a text glyph centred on `center`
    fn fill_glyph(&mut self, glyph: &str, center: DVec2, font_px: f64);
    /// Non-blocking check whether a sprite has finished loading
    fn sprite_ready(&self, sprite: Sprite) -> bool;
    fn draw_sprite(&mut self, sprite: Sprite, rect: Rect);
}

/// Colors and glyphs used by the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub grid_line: String,
    pub target_fallback: String,
    pub body_glyph: String,
    pub head_glyph: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            grid_line: "#32543c".to_string(),
            target_fallback: "#ff4545".to_string(),
            body_glyph: "💋".to_string(),
            head_glyph: "😘".to_string(),
        }
    }
}

/// Sprite placement derived from the cell size.
///
/// Sprites are drawn larger than a cell and centred on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteGeometry {
    pub size: f64,
    pub offset: f64,
}

impl SpriteGeometry {
    pub fn for_cell(cell_size: f64, image_scale: f64) -> Self {
        let scale = (cell_size / 8.0).min(image_scale).max(2.0);
        let size = (cell_size * scale).floor();
        let offset = ((size - cell_size) / 2.0).floor();
        Self { size, offset }
    }

    /// Destination rectangle for a sprite anchored at a cell's top-left corner
    pub fn rect_at(&self, cell_origin: DVec2) -> Rect {
        Rect::new(
            cell_origin.x - self.offset + 2.0,
            cell_origin.y - self.offset + 2.0,
            self.size - 4.0,
            self.size - 4.0,
        )
    }
}

/// Paints grid state onto a surface. Holds no game state.
#[derive(Debug, Clone)]
pub struct Renderer {
    pub palette: Palette,
    pub image_scale: f64,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(Palette::default(), IMAGE_SCALE)
    }
}

impl Renderer {
    pub fn new(palette: Palette, image_scale: f64) -> Self {
        Self {
            palette,
            image_scale,
        }
    }

    /// Match the surface to the board's pixel size
    pub fn prepare<S: Surface>(&self, model: &GridModel, surface: &mut S) {
        let (width, height) = model.board.pixel_size();
        surface.resize(width, height);
    }

    /// Draw one frame: grid, target, then the actor from tail to head
    pub fn paint<S: Surface>(&self, model: &GridModel, surface: &mut S) {
        let cell = f64::from(model.board.cell_size);
        surface.clear();

        let line_width = (cell / 24.0).floor().max(1.0);
        for gx in 0..model.board.cols {
            for gy in 0..model.board.rows {
                let rect = Rect::new(
                    f64::from(gx) * cell + 0.5,
                    f64::from(gy) * cell + 0.5,
                    cell - 1.0,
                    cell - 1.0,
                );
                surface.stroke_rect(rect, &self.palette.grid_line, line_width);
            }
        }

        let geometry = SpriteGeometry::for_cell(cell, self.image_scale);

        let target = cell_origin(model.target, cell);
        if surface.sprite_ready(Sprite::Target) {
            surface.draw_sprite(Sprite::Target, geometry.rect_at(target));
        } else {
            let rect = Rect::new(target.x + 4.0, target.y + 4.0, cell - 8.0, cell - 8.0);
            surface.fill_rect(rect, &self.palette.target_fallback);
        }

        let head = model.actor.head();
        let font_px = cell - 4.0;
        let head_ready = surface.sprite_ready(Sprite::Head);
        for segment in model.actor.segments() {
            let origin = cell_origin(segment, cell);
            let center = origin + DVec2::splat(cell / 2.0);
            if segment != head {
                surface.fill_glyph(&self.palette.body_glyph, center, font_px);
            } else if head_ready {
                surface.draw_sprite(Sprite::Head, geometry.rect_at(origin));
            } else {
                surface.fill_glyph(&self.palette.head_glyph, center, font_px);
            }
        }
    }
}

fn cell_origin(pos: Position, cell: f64) -> DVec2 {
    DVec2::new(f64::from(pos.x) * cell, f64::from(pos.y) * cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Actor, BoardConfig, Direction};

    fn model() -> GridModel {
        let board = BoardConfig::new(4, 3, 24);
        let actor = Actor::from_segments([Position::new(0, 1), Position::new(1, 1)]).unwrap();
        GridModel::new(board, actor, Position::new(3, 2), Direction::Right).unwrap()
    }

    #[test]
    fn test_sprite_geometry() {
        // 24 px cells: scale min(3, 3) = 3, size 72, offset 24
        let g = SpriteGeometry::for_cell(24.0, 3.0);
        assert_eq!(g.size, 72.0);
        assert_eq!(g.offset, 24.0);
        assert_eq!(
            g.rect_at(DVec2::new(48.0, 24.0)),
            Rect::new(26.0, 2.0, 68.0, 68.0)
        );

        // Small cells clamp the scale at 2
        let small = SpriteGeometry::for_cell(10.0, 3.0);
        assert_eq!(small.size, 20.0);
        assert_eq!(small.offset, 5.0);
    }

    #[test]
    fn test_paint_without_assets_uses_fallbacks() {
        let model = model();
        let renderer = Renderer::default();
        let mut surface = DisplayList::new();
        renderer.prepare(&model, &mut surface);
        renderer.paint(&model, &mut surface);

        assert_eq!(surface.size(), (96, 72));
        assert_eq!(surface.commands()[0], DrawCommand::Clear);
        assert_eq!(surface.count(|c| matches!(c, DrawCommand::StrokeRect { .. })), 12);
        assert!(surface.commands().contains(&DrawCommand::FillRect {
            rect: Rect::new(76.0, 52.0, 16.0, 16.0),
            color: "#ff4545".to_string(),
        }));
        assert_eq!(
            surface.glyphs(),
            vec![
                ("💋".to_string(), DVec2::new(12.0, 36.0)),
                ("😘".to_string(), DVec2::new(36.0, 36.0)),
            ]
        );
        assert_eq!(surface.count(|c| matches!(c, DrawCommand::Sprite { .. })), 0);
    }

    #[test]
    fn test_paint_with_assets_draws_sprites() {
        let model = model();
        let renderer = Renderer::default();
        let mut surface = DisplayList::with_ready([Sprite::Head, Sprite::Target]);
        renderer.paint(&model, &mut surface);

        let sprites: Vec<_> = surface
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Sprite { sprite, .. } => Some(*sprite),
                _ => None,
            })
            .collect();
        assert_eq!(sprites, vec![Sprite::Target, Sprite::Head]);
        // Body segment still drawn as a glyph
        assert_eq!(surface.glyphs().len(), 1);
        assert_eq!(surface.count(|c| matches!(c, DrawCommand::FillRect { .. })), 0);
    }

    #[test]
    fn test_grid_line_width_scales_with_cell() {
        let board = BoardConfig::new(2, 2, 48);
        let actor = Actor::from_segments([Position::new(0, 0)]).unwrap();
        let model = GridModel::new(board, actor, Position::new(1, 1), Direction::Right).unwrap();
        let mut surface = DisplayList::new();
        Renderer::default().paint(&model, &mut surface);
        assert!(surface.commands().iter().any(|c| matches!(
            c,
            DrawCommand::StrokeRect { line_width, .. } if *line_width == 2.0
        )));
    }
}
