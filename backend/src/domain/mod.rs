//! # Domain Module
//!
//! Contains all business logic for the nutrition tracker core.
//!
//! This module encapsulates the rules that define how daily consumption is
//! recorded, migrated, bounded, and aggregated. It operates independently of
//! any UI framework or storage mechanism.
//!
//! ## Module Organization
//!
//! - **catalog**: food category definitions and limit overrides
//! - **migration**: schema upgrades for persisted day records
//! - **history**: trailing-window history completeness and upserts
//! - **accounting**: unit increments, precision, limit classification
//! - **weekly_balance**: actual-versus-planned weekly aggregation
//! - **gesture**: long-press input-mode state machine
//! - **session**: the top-level state container tying it all together

pub mod accounting;
pub mod catalog;
pub mod gesture;
pub mod history;
pub mod migration;
pub mod session;
pub mod weekly_balance;
