//! Canvas 2D backend

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::scene::DrawCmd;

/// Plays draw commands onto a canvas
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    /// Size the canvas to the playfield and grab its 2D context
    pub fn new(canvas: &HtmlCanvasElement, width: u32, height: u32) -> Result<Self, JsValue> {
        canvas.set_width(width);
        canvas.set_height(height);
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { ctx })
    }

    pub fn draw(&self, cmds: &[DrawCmd]) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        for cmd in cmds {
            match cmd {
                DrawCmd::Clear { color, size } => {
                    ctx.set_fill_style_str(color);
                    ctx.fill_rect(0.0, 0.0, size.x as f64, size.y as f64);
                }
                DrawCmd::Line {
                    from,
                    to,
                    width,
                    color,
                } => {
                    ctx.set_stroke_style_str(color);
                    ctx.set_line_width(*width as f64);
                    ctx.begin_path();
                    ctx.move_to(from.x as f64, from.y as f64);
                    ctx.line_to(to.x as f64, to.y as f64);
                    ctx.stroke();
                }
                DrawCmd::Rect {
                    origin,
                    size,
                    color,
                    glow,
                } => {
                    ctx.set_fill_style_str(color);
                    if *glow > 0.0 {
                        ctx.set_shadow_blur(*glow as f64);
                        ctx.set_shadow_color(color);
                    }
                    ctx.fill_rect(
                        origin.x as f64,
                        origin.y as f64,
                        size.x as f64,
                        size.y as f64,
                    );
                    ctx.set_shadow_blur(0.0);
                }
                DrawCmd::Circle {
                    center,
                    radius,
                    color,
                } => {
                    ctx.set_fill_style_str(color);
                    ctx.begin_path();
                    ctx.arc(
                        center.x as f64,
                        center.y as f64,
                        *radius as f64,
                        0.0,
                        std::f64::consts::TAU,
                    )?;
                    ctx.fill();
                }
                DrawCmd::Text {
                    text,
                    pos,
                    font,
                    color,
                } => {
                    ctx.set_fill_style_str(color);
                    ctx.set_font(font);
                    ctx.fill_text(text, pos.x as f64, pos.y as f64)?;
                }
            }
        }
        Ok(())
    }
}
