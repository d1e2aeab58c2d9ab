//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (millisecond clock for the scheduler)
//! - Storage (LocalStorage on web, JSON files natively, memory in tests)
//! - Frontends (canvas on web, terminal natively)

pub mod clock;
pub mod storage;

#[cfg(not(target_arch = "wasm32"))]
pub mod terminal;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use clock::Clock;
pub use storage::MemoryStore;

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStore;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorageStore;
