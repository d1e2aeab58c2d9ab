//! Level progression
//!
//! Every `foods_per_level` food completes a level: the game pauses briefly,
//! the level goes up and ticks get faster.

use super::state::{Board, GamePhase, GameState};
use crate::settings::Settings;

/// Enter the level transition, bump the level and speed up
pub fn complete_level(state: &mut GameState, settings: &Settings) {
    state.phase = GamePhase::LevelTransition;
    state.level = state.level.saturating_add(1);
    state.speed_ms =
        settings.clamp_speed(state.speed_ms as i64 - settings.level_speed_step_ms as i64);
    log::info!(
        "Level {} completed, next tick interval {} ms",
        state.level - 1,
        state.speed_ms
    );
}

/// End the transition: new food, back to running.
/// Returns false if no transition was in progress.
pub fn finish_level_transition(state: &mut GameState, board: &Board) -> bool {
    if state.phase != GamePhase::LevelTransition {
        return false;
    }

    state.respawn_food(board);
    state.phase = GamePhase::Running;
    log::info!("Level {} started", state.level);
    true
}
