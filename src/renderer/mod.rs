//! Rendering seam
//!
//! The game only knows three primitives: clear the board, fill a cell and
//! draw text. Frontends (canvas, terminal) implement `Renderer`; `frame`
//! composes a full frame from the game state.

pub mod frame;

pub use frame::{Overlay, draw_frame};

use crate::sim::{Board, Position};

/// A named color with an RGB fallback for targets without CSS names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub css: &'static str,
    pub rgb: (u8, u8, u8),
}

impl Color {
    pub const fn new(css: &'static str, r: u8, g: u8, b: u8) -> Self {
        Self { css, rgb: (r, g, b) }
    }
}

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const BOARD_BACKGROUND: Color = Color::new("black", 0, 0, 0);
    pub const SNAKE: Color = Color::new("lightgreen", 144, 238, 144);
    pub const SNAKE_BORDER: Color = Color::new("black", 0, 0, 0);
    pub const FOOD: Color = Color::new("red", 255, 0, 0);
    pub const TEXT: Color = Color::new("white", 255, 255, 255);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// Text placement; `pos` is the baseline anchor in board pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub pos: Position,
    pub size_px: u32,
    pub align: TextAlign,
    pub color: Color,
}

pub trait Renderer {
    type Error;

    fn clear_board(&mut self, board: &Board, color: Color) -> Result<(), Self::Error>;

    /// Fill one `size` x `size` cell with its top-left corner at `pos`
    fn fill_cell(
        &mut self,
        pos: Position,
        size: i32,
        fill: Color,
        border: Option<Color>,
    ) -> Result<(), Self::Error>;

    fn draw_text(&mut self, text: &str, style: TextStyle) -> Result<(), Self::Error>;

    /// Push the frame out, for targets that buffer
    fn present(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
