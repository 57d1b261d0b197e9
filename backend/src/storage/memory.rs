//! In-memory storage backend.
//!
//! Useful for tests and for embedding the core without any filesystem
//! access. Holds the same raw JSON document a file backend would.

use anyhow::{Context, Result};
use serde_json::Value;
use shared::AppState;
use std::cell::RefCell;

use crate::storage::traits::StateStorage;

/// Storage that keeps everything in process memory
#[derive(Default)]
pub struct MemoryStorage {
    state: RefCell<Option<Value>>,
    dark_mode: RefCell<Option<bool>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the backend with a raw state document, as if it had been saved
    /// by an earlier run
    pub fn with_state(raw: Value) -> Self {
        Self {
            state: RefCell::new(Some(raw)),
            dark_mode: RefCell::new(None),
        }
    }
}

impl StateStorage for MemoryStorage {
    fn load_state(&self) -> Result<Option<Value>> {
        Ok(self.state.borrow().clone())
    }

    fn save_state(&self, state: &AppState) -> Result<()> {
        let raw = serde_json::to_value(state).context("serializing state")?;
        *self.state.borrow_mut() = Some(raw);
        Ok(())
    }

    fn load_dark_mode(&self) -> Result<Option<bool>> {
        Ok(*self.dark_mode.borrow())
    }

    fn save_dark_mode(&self, enabled: bool) -> Result<()> {
        *self.dark_mode.borrow_mut() = Some(enabled);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_roundtrip() {
        let storage = MemoryStorage::new();
        assert!(storage.load_state().unwrap().is_none());

        let state = AppState::fresh(NaiveDate::from_ymd_opt(2024, 6, 11).unwrap());
        storage.save_state(&state).unwrap();
        let raw = storage.load_state().unwrap().unwrap();
        assert_eq!(raw["currentDay"]["date"], "2024-06-11");

        storage.save_dark_mode(true).unwrap();
        assert_eq!(storage.load_dark_mode().unwrap(), Some(true));
    }
}
