//! Core engine for the daily nutrition unit tracker.
//!
//! This crate owns the state model and accounting rules: the versioned day
//! record schema, migration of persisted state across schema versions, the
//! bounded history window, unit increment/decrement with precision rules,
//! and the rolling weekly balance. Rendering and gesture capture live in a
//! presentation layer that consumes these types and feeds user intents into
//! an [`AppSession`](domain::session::AppSession).

pub mod domain;
pub mod storage;

pub use domain::session::AppSession;
