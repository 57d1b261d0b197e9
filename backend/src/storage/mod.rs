//! # Storage Module
//!
//! Persistence collaborators for the tracker core. The domain layer only
//! sees the [`traits::StateStorage`] abstraction; concrete backends store
//! the state document and the dark-mode preference however they like.

pub mod json;
pub mod memory;
pub mod traits;

pub use json::JsonFileStorage;
pub use memory::MemoryStorage;
pub use traits::StateStorage;
