//! Game settings and tunables
//!
//! Persisted separately from the saved game, under its own key.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence::KeyValueStore;

/// Game settings/tunables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Pixel side of one grid cell
    pub unit_size: i32,
    /// Cells per side of the board when the host does not size it
    pub board_cells: u32,

    // === Speed (tick interval in ms, lower is faster) ===
    /// Interval for a fresh game
    pub initial_speed_ms: u32,
    /// Fastest allowed interval
    pub min_speed_ms: u32,
    /// Speed-up / speed-down button step
    pub speed_step_ms: u32,
    /// Reduction applied on level completion
    pub level_speed_step_ms: u32,

    // === Levels ===
    /// Food eaten per level
    pub foods_per_level: u32,
    /// "Level completed" pause
    pub level_pause_ms: u64,

    /// Fixed RNG seed for food placement (random when unset)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            unit_size: UNIT_SIZE,
            board_cells: BOARD_CELLS,

            initial_speed_ms: INITIAL_SPEED_MS,
            min_speed_ms: MIN_SPEED_MS,
            speed_step_ms: SPEED_STEP_MS,
            level_speed_step_ms: LEVEL_SPEED_STEP_MS,

            foods_per_level: FOODS_PER_LEVEL,
            level_pause_ms: LEVEL_PAUSE_MS,

            seed: None,
        }
    }
}

impl Settings {
    /// Settings with a fixed seed (tests, replays)
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Clamp values that would break the game rules
    pub fn sanitized(mut self) -> Self {
        self.unit_size = self.unit_size.max(1);
        self.board_cells = self.board_cells.max(2);
        self.min_speed_ms = self.min_speed_ms.max(1);
        self.initial_speed_ms = self.initial_speed_ms.max(self.min_speed_ms);
        self.foods_per_level = self.foods_per_level.max(1);
        self
    }

    /// Clamp a tick interval to the fastest allowed one
    pub fn clamp_speed(&self, speed_ms: i64) -> u32 {
        speed_ms.clamp(self.min_speed_ms as i64, u32::MAX as i64) as u32
    }

    /// Load settings from the store, falling back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(SETTINGS_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings.sanitized();
                }
                Err(e) => log::warn!("Ignoring malformed settings: {e}"),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Could not read settings: {e}"),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to the store
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => match store.set(SETTINGS_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Could not save settings: {e}"),
            },
            Err(e) => log::warn!("Could not encode settings: {e}"),
        }
    }
}
