//! Canvas 2D surface (wasm32)

use glam::DVec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::{Rect, Sprite, Surface};

/// Paints onto an HTML canvas. Sprite images load in the background.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    head: HtmlImageElement,
    target: HtmlImageElement,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, head_src: &str, target_src: &str) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into()?;
        Ok(Self {
            canvas,
            ctx,
            head: load_image(head_src)?,
            target: load_image(target_src)?,
        })
    }

    fn image(&self, sprite: Sprite) -> &HtmlImageElement {
        match sprite {
            Sprite::Head => &self.head,
            Sprite::Target => &self.target,
        }
    }
}

fn load_image(src: &str) -> Result<HtmlImageElement, JsValue> {
    let image = HtmlImageElement::new()?;
    let path = src.to_string();
    let on_error = Closure::<dyn FnMut()>::new(move || {
        log::error!("Could not load image {}", path);
    });
    image.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    on_error.forget();
    image.set_src(src);
    Ok(image)
}

impl Surface for CanvasSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", width));
        let _ = style.set_property("height", &format!("{}px", height));
        let _ = style.set_property("display", "block");
        let _ = style.set_property("margin", "0 auto");
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(
            0.0,
            0.0,
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        );
    }

    fn stroke_rect(&mut self, rect: Rect, color: &str, line_width: f64) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(line_width);
        self.ctx
            .stroke_rect(rect.origin.x, rect.origin.y, rect.size.x, rect.size.y);
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx
            .fill_rect(rect.origin.x, rect.origin.y, rect.size.x, rect.size.y);
    }

    fn fill_glyph(&mut self, glyph: &str, center: DVec2, font_px: f64) {
        self.ctx.set_font(&format!("{}px Arial", font_px));
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        let _ = self.ctx.fill_text(glyph, center.x, center.y);
    }

    fn sprite_ready(&self, sprite: Sprite) -> bool {
        let image = self.image(sprite);
        image.complete() && image.natural_width() > 0
    }

    fn draw_sprite(&mut self, sprite: Sprite, rect: Rect) {
        let result = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
            self.image(sprite),
            rect.origin.x,
            rect.origin.y,
            rect.size.x,
            rect.size.y,
        );
        if let Err(e) = result {
            log::warn!("Sprite draw failed: {:?}", e);
        }
    }
}
