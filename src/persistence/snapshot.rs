//! Saved-game wire format
//!
//! ```json
//! {"snake":[{"x":50,"y":0},{"x":25,"y":0}],"foodX":200,"foodY":75,
//!  "xVelocity":25,"yVelocity":0,"score":1,"level":1,"speed":200,"running":true}
//! ```

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::sim::{Board, Direction, GamePhase, GameState, Position};

/// One snake cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotCell {
    pub x: i32,
    pub y: i32,
}

/// Persisted game (the transient pause/transition detail is reduced to `running`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub snake: Vec<SnapshotCell>,
    pub food_x: i32,
    pub food_y: i32,
    pub x_velocity: i32,
    pub y_velocity: i32,
    pub score: u32,
    pub level: u32,
    pub speed: u32,
    pub running: bool,
}

impl Snapshot {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            snake: state
                .snake
                .iter()
                .map(|p| SnapshotCell { x: p.x, y: p.y })
                .collect(),
            food_x: state.food.x,
            food_y: state.food.y,
            x_velocity: state.velocity.x,
            y_velocity: state.velocity.y,
            score: state.score,
            level: state.level,
            speed: state.speed_ms,
            running: state.phase.is_running(),
        }
    }

    /// Rebuild a game, or `None` if the snapshot does not describe a valid one
    pub fn into_state(self, board: &Board, settings: &Settings) -> Option<GameState> {
        let unit = board.unit;
        let velocity = Position::new(self.x_velocity, self.y_velocity);
        Direction::from_velocity(velocity, unit)?;

        if self.snake.is_empty() || self.level == 0 || self.speed == 0 {
            return None;
        }

        let snake: VecDeque<Position> = self
            .snake
            .iter()
            .map(|c| Position::new(c.x, c.y))
            .collect();
        let food = Position::new(self.food_x, self.food_y);
        if !snake.iter().all(|&p| board.is_aligned(p) && board.contains(p))
            || !board.is_aligned(food)
        {
            return None;
        }

        let mut state = GameState::new(board, settings);
        state.snake = snake;
        state.velocity = velocity;
        state.score = self.score;
        state.level = self.level;
        state.speed_ms = self.speed;
        state.phase = if self.running {
            GamePhase::Running
        } else {
            GamePhase::Paused
        };

        // Saved mid level transition (food already eaten) or off a smaller board
        if food == state.head() || !board.contains(food) {
            state.respawn_food(board);
        } else {
            state.food = food;
        }

        Some(state)
    }
}
