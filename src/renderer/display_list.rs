//! Recording surface
//!
//! Stores draw calls instead of rasterizing them. Used by the headless
//! native build and by tests.

use std::collections::HashSet;

use glam::DVec2;

use super::{Rect, Sprite, Surface};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    StrokeRect {
        rect: Rect,
        color: String,
        line_width: f64,
    },
    FillRect {
        rect: Rect,
        color: String,
    },
    Glyph {
        glyph: String,
        center: DVec2,
        font_px: f64,
    },
    Sprite {
        sprite: Sprite,
        rect: Rect,
    },
}

/// Surface that records the most recent frame
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    width: u32,
    height: u32,
    ready: HashSet<Sprite>,
    commands: Vec<DrawCommand>,
    frames: u64,
}

impl DisplayList {
    /// No sprites loaded
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend the given sprites have finished loading
    pub fn with_ready(sprites: impl IntoIterator<Item = Sprite>) -> Self {
        Self {
            ready: sprites.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Commands of the last frame, in order
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of frames started (calls to `clear`)
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }

    pub fn glyphs(&self) -> Vec<(String, DVec2)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Glyph { glyph, center, .. } => Some((glyph.clone(), *center)),
                _ => None,
            })
            .collect()
    }
}

impl Surface for DisplayList {
    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
        self.frames += 1;
    }

    fn stroke_rect(&mut self, rect: Rect, color: &str, line_width: f64) {
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            color: color.to_string(),
            line_width,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.commands.push(DrawCommand::FillRect {
            rect,
            color: color.to_string(),
        });
    }

    fn fill_glyph(&mut self, glyph: &str, center: DVec2, font_px: f64) {
        self.commands.push(DrawCommand::Glyph {
            glyph: glyph.to_string(),
            center,
            font_px,
        });
    }

    fn sprite_ready(&self, sprite: Sprite) -> bool {
        self.ready.contains(&sprite)
    }

    fn draw_sprite(&mut self, sprite: Sprite, rect: Rect) {
        self.commands.push(DrawCommand::Sprite { sprite, rect });
    }
}
