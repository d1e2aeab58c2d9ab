//! Game simulation module
//!
//! All gameplay rules live here. This module is pure:
//! - No timers (the scheduler decides when to tick)
//! - Seeded RNG only
//! - No rendering, storage or platform dependencies

pub mod level;
pub mod state;
pub mod tick;

pub use level::{complete_level, finish_level_transition};
pub use state::{Board, Direction, GamePhase, GameState, Position};
pub use tick::{TickOutcome, is_game_over, tick};
