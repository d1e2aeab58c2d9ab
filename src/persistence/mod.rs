//! Save/load persistence
//!
//! Features:
//! - `KeyValueStore` seam over LocalStorage, files or memory
//! - JSON snapshot of the game under one well-known key
//! - Malformed or missing saves degrade to "no saved game"

pub mod snapshot;

pub use snapshot::{Snapshot, SnapshotCell};

use thiserror::Error;

use crate::consts::SAVE_KEY;
use crate::settings::Settings;
use crate::sim::{Board, GameState};

/// Failure of a store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("could not encode value: {0}")]
    Encode(#[from] serde_json::Error),
}

/// String key-value store (whole-value overwrites, no transactions)
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// The saved-game slot. Never fails: errors are logged and degrade to
/// "nothing saved".
pub struct SaveSlot<'a> {
    store: &'a mut dyn KeyValueStore,
}

impl<'a> SaveSlot<'a> {
    pub fn new(store: &'a mut dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Overwrite the saved game with `state`
    pub fn save(&mut self, state: &GameState) {
        let snapshot = Snapshot::from_state(state);
        let result = serde_json::to_string(&snapshot)
            .map_err(StoreError::from)
            .and_then(|json| self.store.set(SAVE_KEY, &json));

        match result {
            Ok(()) => log::debug!("Game saved (score {}, level {})", state.score, state.level),
            Err(e) => log::warn!("Could not save game: {e}"),
        }
    }

    /// Read the saved game; `None` when absent or malformed
    pub fn load(&self, board: &Board, settings: &Settings) -> Option<GameState> {
        let json = match self.store.get(SAVE_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Could not read saved game: {e}");
                return None;
            }
        };

        let snapshot: Snapshot = match serde_json::from_str(&json) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::warn!("Ignoring malformed saved game: {e}");
                return None;
            }
        };

        match snapshot.into_state(board, settings) {
            Some(state) => {
                log::info!(
                    "Restored saved game (score {}, level {})",
                    state.score,
                    state.level
                );
                Some(state)
            }
            None => {
                log::warn!("Ignoring invalid saved game");
                None
            }
        }
    }

    /// Remove the saved game
    pub fn clear(&mut self) {
        match self.store.remove(SAVE_KEY) {
            Ok(()) => log::info!("Saved game cleared"),
            Err(e) => log::warn!("Could not clear saved game: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;
    use crate::sim::{GamePhase, Position};

    fn board() -> Board {
        Board::square(20, 25)
    }

    #[test]
    fn test_load_missing_is_none() {
        let mut store = MemoryStore::new();
        let slot = SaveSlot::new(&mut store);
        assert!(slot.load(&board(), &Settings::default()).is_none());
    }

    #[test]
    fn test_save_load_round_trip() {
        let settings = Settings::seeded(3);
        let mut state = GameState::new(&board(), &settings);
        state.snake = [Position::new(75, 50), Position::new(50, 50), Position::new(25, 50)]
            .into_iter()
            .collect();
        state.score = 7;
        state.level = 2;
        state.speed_ms = 190;
        state.food = Position::new(200, 300);
        state.phase = GamePhase::Running;

        let mut store = MemoryStore::new();
        SaveSlot::new(&mut store).save(&state);
        let loaded = SaveSlot::new(&mut store)
            .load(&board(), &settings)
            .expect("saved game");

        assert_eq!(loaded.snake, state.snake);
        assert_eq!(loaded.food, state.food);
        assert_eq!(loaded.velocity, state.velocity);
        assert_eq!(loaded.score, 7);
        assert_eq!(loaded.level, 2);
        assert_eq!(loaded.speed_ms, 190);
        assert_eq!(loaded.phase, GamePhase::Running);
    }

    #[test]
    fn test_malformed_json_is_none() {
        let mut store = MemoryStore::new();
        store.set(SAVE_KEY, "{\"snake\": [").unwrap();
        let slot = SaveSlot::new(&mut store);
        assert!(slot.load(&board(), &Settings::default()).is_none());
    }

    #[test]
    fn test_clear_removes_save() {
        let settings = Settings::seeded(3);
        let state = GameState::new(&board(), &settings);
        let mut store = MemoryStore::new();
        SaveSlot::new(&mut store).save(&state);
        SaveSlot::new(&mut store).clear();
        assert_eq!(store.get(SAVE_KEY).unwrap(), None);
    }
}
