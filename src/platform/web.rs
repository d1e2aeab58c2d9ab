//! Browser frontend: 2D canvas renderer and page sizing

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::renderer::{Color, Renderer, TextAlign, TextStyle};
use crate::sim::{Board, Position};

/// Canvas font family for all text
const FONT_FAMILY: &str = "MV Boli";
/// Canvas margin inside its container (px)
const CONTAINER_MARGIN: i32 = 20;

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    /// Size the canvas to a square that fits the container, in whole cells
    pub fn fit_to_container(&self, container_width: i32, unit: i32) -> Board {
        let board = Board::fit(container_width - CONTAINER_MARGIN, unit);
        self.canvas.set_width(board.width as u32);
        self.canvas.set_height(board.height as u32);
        log::info!("Canvas resized to: {} x {}", board.width, board.height);
        board
    }
}

impl Renderer for CanvasRenderer {
    type Error = JsValue;

    fn clear_board(&mut self, board: &Board, color: Color) -> Result<(), JsValue> {
        self.ctx.set_fill_style_str(color.css);
        self.ctx
            .fill_rect(0.0, 0.0, board.width as f64, board.height as f64);
        Ok(())
    }

    fn fill_cell(
        &mut self,
        pos: Position,
        size: i32,
        fill: Color,
        border: Option<Color>,
    ) -> Result<(), JsValue> {
        let (x, y, s) = (pos.x as f64, pos.y as f64, size as f64);
        self.ctx.set_fill_style_str(fill.css);
        self.ctx.fill_rect(x, y, s, s);
        if let Some(border) = border {
            self.ctx.set_stroke_style_str(border.css);
            self.ctx.stroke_rect(x, y, s, s);
        }
        Ok(())
    }

    fn draw_text(&mut self, text: &str, text_style: TextStyle) -> Result<(), JsValue> {
        self.ctx
            .set_font(&format!("{}px {FONT_FAMILY}", text_style.size_px));
        self.ctx.set_fill_style_str(text_style.color.css);
        self.ctx.set_text_align(match text_style.align {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
        });
        self.ctx
            .fill_text(text, text_style.pos.x as f64, text_style.pos.y as f64)
    }
}
