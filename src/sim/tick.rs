//! One game step
//!
//! Moves the snake one cell, resolves food and checks for game over.

use super::level::complete_level;
use super::state::{Board, GamePhase, GameState};
use crate::settings::Settings;

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running; nothing changed
    Skipped,
    /// Plain move, length unchanged
    Moved,
    /// Food eaten, snake grew
    Ate { score: u32 },
    /// Food eaten and it completed a level (new level number)
    LevelComplete { level: u32 },
    /// Wall or self collision
    GameOver,
}

/// Advance the game by one step
pub fn tick(state: &mut GameState, board: &Board, settings: &Settings) -> TickOutcome {
    if state.phase != GamePhase::Running {
        return TickOutcome::Skipped;
    }

    let new_head = state.head().saturating_add(state.velocity);
    state.snake.push_front(new_head);

    let mut outcome = TickOutcome::Moved;
    if new_head == state.food {
        state.score = state.score.saturating_add(1);
        if state.score % settings.foods_per_level == 0 {
            complete_level(state, settings);
            outcome = TickOutcome::LevelComplete { level: state.level };
        } else {
            state.respawn_food(board);
            outcome = TickOutcome::Ate { score: state.score };
        }
    } else {
        state.snake.pop_back();
    }

    if is_game_over(state, board) {
        log::debug!("Collision at ({}, {})", new_head.x, new_head.y);
        state.phase = GamePhase::GameOver;
        return TickOutcome::GameOver;
    }

    outcome
}

/// Head outside the board or on top of its own body.
/// Never true while paused.
pub fn is_game_over(state: &GameState, board: &Board) -> bool {
    if state.phase == GamePhase::Paused {
        return false;
    }

    let head = state.head();
    !board.contains(head) || state.snake.iter().skip(1).any(|&cell| cell == head)
}
