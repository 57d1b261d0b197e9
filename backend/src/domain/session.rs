//! Application session: the single mutable root of the tracker.
//!
//! `AppSession` owns the `AppState`, the loaded category catalog, and the
//! storage collaborator. Every user intent from the presentation layer
//! (increment, decrement, change day type, edit a past day, reset) flows
//! through a session method, which mutates state, re-derives the weekly
//! balance, and persists. All operations are synchronous; no failure inside
//! the session ever surfaces as an error, every mode degrades to a safe
//! default.

use chrono::NaiveDate;
use shared::{
    AppState, CategoryDefinition, DayRecord, DayType, TrackerConfig, WeeklyBalanceResult,
};
use tracing::{info, warn};

use crate::domain::accounting::{self, InputMode};
use crate::domain::history;
use crate::domain::migration;
use crate::domain::weekly_balance::calculate_weekly_balance;
use crate::storage::traits::StateStorage;

pub struct AppSession {
    catalog: Vec<CategoryDefinition>,
    config: TrackerConfig,
    storage: Box<dyn StateStorage>,
    state: AppState,
    today: NaiveDate,
    /// Copy of a history day being edited, committed on save
    editing: Option<DayRecord>,
    /// Last successfully derived balance; kept across failed recomputes
    weekly_balance: Option<WeeklyBalanceResult>,
    dark_mode: bool,
}

impl AppSession {
    /// Load persisted state (migrating older schemas), complete the history
    /// window, roll the day over if the date moved on, and derive the first
    /// weekly balance. Malformed or missing state starts fresh.
    pub fn new(
        storage: Box<dyn StateStorage>,
        catalog: Vec<CategoryDefinition>,
        config: TrackerConfig,
        today: NaiveDate,
    ) -> Self {
        let raw = match storage.load_state() {
            Ok(raw) => raw,
            Err(err) => {
                warn!("failed to load persisted state, starting fresh: {}", err);
                None
            }
        };
        let mut state = raw
            .and_then(migration::migrate_state)
            .unwrap_or_else(|| {
                info!("initializing fresh tracker state for {}", today);
                AppState::fresh(today)
            });

        state.history =
            history::ensure_complete_history(&state.history, today, config.max_history_days);
        history::roll_over(&mut state, today, config.max_history_days);
        history::upsert(
            &mut state.history,
            state.current_day.clone(),
            config.max_history_days,
        );

        let dark_mode = match storage.load_dark_mode() {
            Ok(preference) => preference.unwrap_or(false),
            Err(err) => {
                warn!("failed to load dark mode preference: {}", err);
                false
            }
        };

        let mut session = Self {
            catalog,
            config,
            storage,
            state,
            today,
            editing: None,
            weekly_balance: None,
            dark_mode,
        };
        session.recompute_balance();
        session.persist();
        session
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn current_day(&self) -> &DayRecord {
        &self.state.current_day
    }

    pub fn catalog(&self) -> &[CategoryDefinition] {
        &self.catalog
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// The last successfully derived weekly balance, `None` before the
    /// first success
    pub fn weekly_balance(&self) -> Option<&WeeklyBalanceResult> {
        self.weekly_balance.as_ref()
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// Observe the current date, rolling over to a new day when it changed.
    /// Returns whether a rollover happened.
    pub fn observe_date(&mut self, today: NaiveDate) -> bool {
        self.today = today;
        if !history::roll_over(&mut self.state, today, self.config.max_history_days) {
            return false;
        }
        self.state.history = history::ensure_complete_history(
            &self.state.history,
            today,
            self.config.max_history_days,
        );
        self.after_mutation();
        true
    }

    /// Add one step to a category on the current day
    pub fn increment(&mut self, category_id: &str, mode: InputMode) -> bool {
        if !self.known_category(category_id) {
            return false;
        }
        let changed =
            accounting::increment(&mut self.state.current_day, category_id, mode, &self.config);
        if changed {
            self.after_mutation();
        }
        changed
    }

    /// Remove one step from a category on the current day; silently does
    /// nothing when the count would go negative
    pub fn decrement(&mut self, category_id: &str, mode: InputMode) -> bool {
        if !self.known_category(category_id) {
            return false;
        }
        let changed =
            accounting::decrement(&mut self.state.current_day, category_id, mode, &self.config);
        if changed {
            self.after_mutation();
        }
        changed
    }

    pub fn set_day_type(&mut self, day_type: DayType) {
        self.state.current_day.set_day_type(day_type);
        self.after_mutation();
    }

    /// Zero today's counts, keeping the day type and all history
    pub fn reset_current_day(&mut self) {
        let mut fresh = DayRecord::placeholder(self.today);
        fresh.day_type = self.state.current_day.day_type;
        self.state.current_day = fresh;
        self.after_mutation();
    }

    /// Begin editing the history day with the given date. Returns false
    /// when no such day is in the window.
    pub fn start_editing_day(&mut self, date: NaiveDate) -> bool {
        match self.state.history.iter().find(|d| d.date == date) {
            Some(day) => {
                self.editing = Some(day.clone());
                true
            }
            None => {
                warn!("cannot edit {}: not in history window", date);
                false
            }
        }
    }

    /// The day currently being edited, if any
    pub fn editing_day(&self) -> Option<&DayRecord> {
        self.editing.as_ref()
    }

    pub fn edit_increment(&mut self, category_id: &str, mode: InputMode) -> bool {
        if !self.known_category(category_id) {
            return false;
        }
        match self.editing.as_mut() {
            Some(day) => accounting::increment(day, category_id, mode, &self.config),
            None => false,
        }
    }

    pub fn edit_decrement(&mut self, category_id: &str, mode: InputMode) -> bool {
        if !self.known_category(category_id) {
            return false;
        }
        match self.editing.as_mut() {
            Some(day) => accounting::decrement(day, category_id, mode, &self.config),
            None => false,
        }
    }

    pub fn edit_set_day_type(&mut self, day_type: DayType) -> bool {
        match self.editing.as_mut() {
            Some(day) => {
                day.set_day_type(day_type);
                true
            }
            None => false,
        }
    }

    /// Commit the edit buffer back into history (and into the current day
    /// when today was edited). Returns false when nothing was being edited.
    pub fn save_edited_day(&mut self) -> bool {
        let Some(day) = self.editing.take() else {
            return false;
        };
        let Some(slot) = self.state.history.iter_mut().find(|d| d.date == day.date) else {
            // The window moved past the edited date since editing started
            warn!("discarding edit of {}: no longer in history window", day.date);
            return false;
        };
        *slot = day.clone();
        if day.date == self.state.current_day.date {
            self.state.current_day = day;
        }
        self.after_mutation();
        true
    }

    /// Drop the edit buffer without committing
    pub fn cancel_editing(&mut self) {
        self.editing = None;
    }

    pub fn set_dark_mode(&mut self, enabled: bool) {
        self.dark_mode = enabled;
        if let Err(err) = self.storage.save_dark_mode(enabled) {
            warn!("failed to persist dark mode preference: {}", err);
        }
    }

    fn known_category(&self, category_id: &str) -> bool {
        let known = self.catalog.iter().any(|c| c.id == category_id);
        if !known {
            warn!("ignoring operation on unknown category {:?}", category_id);
        }
        known
    }

    /// Re-establish invariants after a state change: current day mirrored
    /// into history, balance re-derived, state persisted
    fn after_mutation(&mut self) {
        history::upsert(
            &mut self.state.history,
            self.state.current_day.clone(),
            self.config.max_history_days,
        );
        self.recompute_balance();
        self.persist();
    }

    fn recompute_balance(&mut self) {
        match calculate_weekly_balance(&self.state.history, &self.catalog, self.today) {
            Ok(balance) => self.weekly_balance = Some(balance),
            // Keep showing the previous balance rather than crashing or
            // blanking the indicator
            Err(err) => warn!("weekly balance computation failed: {}", err),
        }
    }

    fn persist(&self) {
        if let Err(err) = self.storage.save_state(&self.state) {
            warn!("failed to persist state: {}", err);
        }
    }
}
