//! Player commands
//!
//! Keyboard and button input reduced to zero-argument commands, plus the two
//! rules that act on the state directly: turning and speed adjustment.

use crate::settings::Settings;
use crate::sim::{Direction, GameState};

/// A player command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    Reset,
    Pause,
    Resume,
    /// Pause when running, resume when paused (single key)
    TogglePause,
    /// Shorter tick interval
    SpeedUp,
    /// Longer tick interval
    SpeedDown,
}

impl Command {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        let cmd = match key {
            "ArrowUp" | "w" | "W" => Command::Turn(Direction::Up),
            "ArrowDown" | "s" | "S" => Command::Turn(Direction::Down),
            "ArrowLeft" | "a" | "A" => Command::Turn(Direction::Left),
            "ArrowRight" | "d" | "D" => Command::Turn(Direction::Right),
            "p" | "P" | "Escape" => Command::TogglePause,
            "r" | "R" => Command::Reset,
            "+" | "=" => Command::SpeedUp,
            "-" | "_" => Command::SpeedDown,
            _ => return None,
        };
        Some(cmd)
    }

    /// Map a legacy DOM `keyCode` (arrow keys only)
    pub fn from_key_code(code: u32) -> Option<Self> {
        let dir = match code {
            37 => Direction::Left,
            38 => Direction::Up,
            39 => Direction::Right,
            40 => Direction::Down,
            _ => return None,
        };
        Some(Command::Turn(dir))
    }
}

/// Turn the snake unless `dir` is the reverse of its current heading.
/// Returns whether the velocity changed.
pub fn change_direction(state: &mut GameState, dir: Direction, unit: i32) -> bool {
    if state.heading(unit) == Some(dir.opposite()) {
        return false;
    }

    let velocity = dir.velocity(unit);
    let changed = state.velocity != velocity;
    state.velocity = velocity;
    changed
}

/// Shift the tick interval by `delta_ms`, floored at the minimum.
/// Takes effect when the next tick is scheduled.
pub fn adjust_speed(state: &mut GameState, delta_ms: i64, settings: &Settings) -> u32 {
    state.speed_ms = settings.clamp_speed(state.speed_ms as i64 + delta_ms);
    state.speed_ms
}
