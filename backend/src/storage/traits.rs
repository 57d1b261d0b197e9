//! # Storage Traits
//!
//! The storage abstraction the session works against. Backends are
//! synchronous and single-user; the session treats every failure as
//! recoverable (a failed load starts fresh, a failed save is logged and
//! swallowed).

use anyhow::Result;
use serde_json::Value;
use shared::AppState;
use std::rc::Rc;

/// Interface for persisting tracker state and companion preferences
///
/// `load_state` returns the raw JSON document rather than a typed state so
/// the migration engine owns all decisions about older shapes.
pub trait StateStorage {
    /// Read the persisted state document, `None` when nothing was saved yet
    fn load_state(&self) -> Result<Option<Value>>;

    /// Write the full state document, replacing any previous one
    fn save_state(&self, state: &AppState) -> Result<()>;

    /// Read the dark-mode preference, `None` when never set
    fn load_dark_mode(&self) -> Result<Option<bool>>;

    /// Persist the dark-mode preference, independent of the state document
    fn save_dark_mode(&self, enabled: bool) -> Result<()>;
}

/// Shared handles work as storage too; the core is single-threaded so `Rc`
/// is the natural sharing primitive
impl<S: StateStorage + ?Sized> StateStorage for Rc<S> {
    fn load_state(&self) -> Result<Option<Value>> {
        (**self).load_state()
    }

    fn save_state(&self, state: &AppState) -> Result<()> {
        (**self).save_state(state)
    }

    fn load_dark_mode(&self) -> Result<Option<bool>> {
        (**self).load_dark_mode()
    }

    fn save_dark_mode(&self, enabled: bool) -> Result<()> {
        (**self).save_dark_mode(enabled)
    }
}
