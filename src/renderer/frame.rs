//! Frame composition

use super::{Renderer, TextAlign, TextStyle, colors};
use crate::sim::{Board, GamePhase, GameState, Position};

/// Centered message drawn over the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    LevelCompleted { level: u32 },
    Paused,
    GameOver,
}

impl Overlay {
    pub fn for_state(state: &GameState) -> Option<Self> {
        match state.phase {
            // The level was already bumped when the transition started
            GamePhase::LevelTransition => Some(Overlay::LevelCompleted {
                level: state.level - 1,
            }),
            GamePhase::Paused => Some(Overlay::Paused),
            GamePhase::GameOver => Some(Overlay::GameOver),
            GamePhase::Fresh | GamePhase::Running => None,
        }
    }

    pub fn text(&self) -> String {
        match self {
            Overlay::LevelCompleted { level } => format!("Level {level} Completed!"),
            Overlay::Paused => "Paused".to_string(),
            Overlay::GameOver => "GAME OVER!".to_string(),
        }
    }

    /// Font size relative to the board width
    fn size_px(&self, board: &Board) -> u32 {
        let percent = match self {
            Overlay::GameOver => 10,
            Overlay::LevelCompleted { .. } => 8,
            Overlay::Paused => 8,
        };
        (board.width as u32 * percent / 100).max(1)
    }
}

/// Draw the board, food, snake, level label and any overlay
pub fn draw_frame<R: Renderer>(
    renderer: &mut R,
    state: &GameState,
    board: &Board,
) -> Result<(), R::Error> {
    renderer.clear_board(board, colors::BOARD_BACKGROUND)?;
    renderer.fill_cell(state.food, board.unit, colors::FOOD, None)?;

    for &cell in &state.snake {
        renderer.fill_cell(cell, board.unit, colors::SNAKE, Some(colors::SNAKE_BORDER))?;
    }

    renderer.draw_text(
        &format!("Level: {}", state.level),
        TextStyle {
            pos: Position::new(10, 20),
            size_px: 20,
            align: TextAlign::Left,
            color: colors::TEXT,
        },
    )?;

    if let Some(overlay) = Overlay::for_state(state) {
        renderer.draw_text(
            &overlay.text(),
            TextStyle {
                pos: Position::new(board.width / 2, board.height / 2),
                size_px: overlay.size_px(board),
                align: TextAlign::Center,
                color: colors::TEXT,
            },
        )?;
    }

    renderer.present()
}
