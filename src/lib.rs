//! Canvas Snake - a grid snake game with levels and save/restore
//!
//! Core modules:
//! - `sim`: Game state, movement/collision rules and level progression
//! - `scheduler`: Tick timer with a single pending deadline
//! - `input`: Direction and command handling
//! - `persistence`: Key-value stores and the saved-game snapshot
//! - `renderer`: Render primitives and frame composition
//! - `platform`: Concrete stores and the terminal/browser frontends
//! - `game`: Session tying the above together

pub mod game;
pub mod highscores;
pub mod input;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod scheduler;
pub mod settings;
pub mod sim;

pub use game::{Game, GameEvent};
pub use highscores::HighScores;
pub use input::Command;
pub use settings::Settings;

/// Game configuration defaults
pub mod consts {
    /// Side of one grid cell in pixels
    pub const UNIT_SIZE: i32 = 25;
    /// Cells per side of the square board when the host does not size it
    pub const BOARD_CELLS: u32 = 20;

    /// Tick interval at the start of a game (ms)
    pub const INITIAL_SPEED_MS: u32 = 200;
    /// Fastest allowed tick interval (ms)
    pub const MIN_SPEED_MS: u32 = 50;
    /// Step applied by the speed-up / speed-down commands (ms)
    pub const SPEED_STEP_MS: u32 = 25;
    /// Interval reduction applied on every completed level (ms)
    pub const LEVEL_SPEED_STEP_MS: u32 = 10;

    /// Food eaten per level
    pub const FOODS_PER_LEVEL: u32 = 5;
    /// Length of the "level completed" pause (ms)
    pub const LEVEL_PAUSE_MS: u64 = 2000;

    /// Storage keys
    pub const SAVE_KEY: &str = "snakeGameState";
    pub const SETTINGS_KEY: &str = "snakeSettings";
    pub const HIGHSCORES_KEY: &str = "snakeHighScores";
}
