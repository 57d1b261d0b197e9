use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Schema version written to every persisted day record. Older versions
/// are upgraded by the backend's migration engine at load time.
pub const CURRENT_SCHEMA_VERSION: u32 = 3;

/// Maximum number of days kept in history (trailing window, today included).
pub const MAX_HISTORY_DAYS: usize = 14;

/// Differences smaller than this are treated as "exactly on target".
pub const BALANCE_EPSILON: f64 = 0.01;

/// Type of day, selecting which consumption limit set applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    /// Regular nutritional limits
    #[default]
    Normal,
    /// Higher protein and carb limits for intensive workouts
    Sport,
    /// No limits on consumption
    Free,
}

impl DayType {
    pub fn label(&self) -> &'static str {
        match self {
            DayType::Normal => "Normal Day",
            DayType::Sport => "Sport Day",
            DayType::Free => "Free Meal Day",
        }
    }

    /// Emoji shown by the day type selector
    pub fn icon(&self) -> &'static str {
        match self {
            DayType::Normal => "🍃",
            DayType::Sport => "🚴",
            DayType::Free => "🍰",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DayType::Normal => "Regular nutritional limits",
            DayType::Sport => "Higher protein and carb limits for intensive workouts",
            DayType::Free => "No limits on consumption",
        }
    }

    /// All day types in selector order
    pub fn all() -> [DayType; 3] {
        [DayType::Normal, DayType::Sport, DayType::Free]
    }
}

/// Per-day-type consumption limits for a category.
///
/// Free days are unbounded, so no value is stored for them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitLimits {
    pub normal: f64,
    pub sport: f64,
}

impl UnitLimits {
    /// The limit that applies on the given day type, `None` for free days
    pub fn for_day_type(&self, day_type: DayType) -> Option<f64> {
        match day_type {
            DayType::Normal => Some(self.normal),
            DayType::Sport => Some(self.sport),
            DayType::Free => None,
        }
    }
}

/// Definition of a tracked food category. Immutable after load; the set of
/// category ids is fixed for a running configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDefinition {
    pub id: String,
    pub name: String,
    pub max_units: UnitLimits,
    /// Fill color for unit circles (hex)
    pub color: String,
    /// Background color for empty unit circles (hex)
    pub bg_color: String,
}

/// One calendar date's tracked consumption.
///
/// Category values live in a flattened map so each category id sits directly
/// on the persisted JSON object (`{"date": "...", "carbs": 1.5, ...}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    /// ISO calendar date, unique key within a history
    pub date: NaiveDate,
    #[serde(default)]
    pub day_type: DayType,
    #[serde(default = "current_schema_version")]
    pub schema_version: u32,
    /// True once the user explicitly changed any field, false for
    /// auto-generated placeholder days
    #[serde(default)]
    pub has_been_edited: bool,
    /// Unit counts keyed by category id
    #[serde(flatten)]
    pub units: BTreeMap<String, f64>,
}

fn current_schema_version() -> u32 {
    CURRENT_SCHEMA_VERSION
}

impl DayRecord {
    /// Auto-generated placeholder for a date the user did not interact with:
    /// all counts zero, normal day, not edited.
    pub fn placeholder(date: NaiveDate) -> Self {
        Self {
            date,
            day_type: DayType::Normal,
            schema_version: CURRENT_SCHEMA_VERSION,
            has_been_edited: false,
            units: BTreeMap::new(),
        }
    }

    /// Unit count for a category, zero when never touched
    pub fn unit_count(&self, category_id: &str) -> f64 {
        self.units.get(category_id).copied().unwrap_or(0.0)
    }

    /// Set a category's unit count, rounding to the active precision step.
    ///
    /// Negative values are rejected and the record is left unchanged.
    /// Returns whether the value was applied.
    pub fn set_unit_count(&mut self, category_id: &str, value: f64, step: f64) -> bool {
        if value < 0.0 {
            return false;
        }
        self.units
            .insert(category_id.to_string(), round_to_step(value, step));
        self.has_been_edited = true;
        true
    }

    pub fn set_day_type(&mut self, day_type: DayType) {
        self.day_type = day_type;
        self.has_been_edited = true;
    }

    /// A day counts toward aggregates once the user edited it or any
    /// category has a non-zero count
    pub fn is_active(&self) -> bool {
        self.has_been_edited || self.units.values().any(|v| *v > 0.0)
    }
}

/// Round a value to the nearest multiple of `step` (0.5 or 0.25 in practice)
pub fn round_to_step(value: f64, step: f64) -> f64 {
    (value / step).round() * step
}

/// The single mutable root of the tracker: today's record plus the trailing
/// history window, ordered most-recent-first.
///
/// Invariant: `history` contains an entry whose date equals
/// `current_day.date`, kept value-synchronized by the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub current_day: DayRecord,
    pub history: Vec<DayRecord>,
}

impl AppState {
    /// Freshly initialized state for the given date
    pub fn fresh(today: NaiveDate) -> Self {
        let day = DayRecord::placeholder(today);
        Self {
            current_day: day.clone(),
            history: vec![day],
        }
    }
}

/// Actual-versus-planned consumption for one category over the current week
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryBalance {
    pub actual: f64,
    pub planned: f64,
    /// Positive means over plan, negative means under
    pub difference: f64,
}

/// Rolling weekly balance, recomputed on every history change and never
/// persisted. Categories exactly on target are omitted from the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyBalanceResult {
    /// Human-readable week range, e.g. "Jun 8 - 14" or "Jun 29 - Jul 5"
    pub week_date_range: String,
    pub categories: BTreeMap<String, CategoryBalance>,
}

/// Consumer-facing classification of a weekly difference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BalanceStatus {
    Excess,
    Under,
    OnTrack,
}

impl BalanceStatus {
    /// Classify a difference. `OnTrack` is only reachable for consumers
    /// holding an unfiltered difference, since near-zero entries are
    /// omitted from `WeeklyBalanceResult` in the first place.
    pub fn from_difference(difference: f64) -> Self {
        if difference > BALANCE_EPSILON {
            BalanceStatus::Excess
        } else if difference < -BALANCE_EPSILON {
            BalanceStatus::Under
        } else {
            BalanceStatus::OnTrack
        }
    }
}

/// Tunable knobs of the tracker core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Unit step for a plain tap
    pub standard_increment: f64,
    /// Unit step once a long press switched to fine adjustment
    pub fine_increment: f64,
    /// Trailing window of days kept in history
    pub max_history_days: usize,
    /// Hold duration before a press switches to fine adjustment
    pub long_press_ms: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            standard_increment: 0.5,
            fine_increment: 0.25,
            max_history_days: MAX_HISTORY_DAYS,
            long_press_ms: 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_placeholder_defaults() {
        let day = DayRecord::placeholder(date("2024-06-10"));
        assert_eq!(day.day_type, DayType::Normal);
        assert_eq!(day.schema_version, CURRENT_SCHEMA_VERSION);
        assert!(!day.has_been_edited);
        assert_eq!(day.unit_count("carbs"), 0.0);
        assert!(!day.is_active());
    }

    #[test]
    fn test_set_unit_count_rejects_negative() {
        let mut day = DayRecord::placeholder(date("2024-06-10"));
        assert!(!day.set_unit_count("carbs", -0.5, 0.5));
        assert_eq!(day.unit_count("carbs"), 0.0);
        assert!(!day.has_been_edited);
    }

    #[test]
    fn test_set_unit_count_rounds_to_step() {
        let mut day = DayRecord::placeholder(date("2024-06-10"));
        assert!(day.set_unit_count("carbs", 1.3, 0.5));
        assert_eq!(day.unit_count("carbs"), 1.5);
        assert!(day.has_been_edited);

        assert!(day.set_unit_count("carbs", 1.3, 0.25));
        assert_eq!(day.unit_count("carbs"), 1.25);
    }

    #[test]
    fn test_set_day_type_marks_edited() {
        let mut day = DayRecord::placeholder(date("2024-06-10"));
        day.set_day_type(DayType::Sport);
        assert_eq!(day.day_type, DayType::Sport);
        assert!(day.has_been_edited);
    }

    #[test]
    fn test_is_active_with_nonzero_value() {
        let mut day = DayRecord::placeholder(date("2024-06-10"));
        day.units.insert("fats".to_string(), 0.5);
        assert!(day.is_active());
    }

    #[test]
    fn test_round_to_step_idempotent() {
        for step in [0.25, 0.5] {
            for value in [0.0, 0.1, 1.3, 2.25, 2.75, 17.4] {
                let once = round_to_step(value, step);
                assert_eq!(round_to_step(once, step), once, "step {step} value {value}");
            }
        }
    }

    #[test]
    fn test_day_record_json_shape() {
        let mut day = DayRecord::placeholder(date("2024-06-10"));
        day.set_unit_count("carbs", 1.5, 0.5);
        let json = serde_json::to_value(&day).unwrap();
        // Category values sit directly on the object, not nested
        assert_eq!(json["carbs"], 1.5);
        assert_eq!(json["date"], "2024-06-10");
        assert_eq!(json["dayType"], "normal");
        assert_eq!(json["schemaVersion"], 3);
        assert_eq!(json["hasBeenEdited"], true);
    }

    #[test]
    fn test_day_record_roundtrip() {
        let mut day = DayRecord::placeholder(date("2024-06-10"));
        day.set_unit_count("proteins", 2.25, 0.25);
        day.set_day_type(DayType::Free);
        let json = serde_json::to_string(&day).unwrap();
        let back: DayRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, day);
    }

    #[test]
    fn test_unit_limits_for_day_type() {
        let limits = UnitLimits { normal: 2.5, sport: 4.5 };
        assert_eq!(limits.for_day_type(DayType::Normal), Some(2.5));
        assert_eq!(limits.for_day_type(DayType::Sport), Some(4.5));
        assert_eq!(limits.for_day_type(DayType::Free), None);
    }

    #[test]
    fn test_balance_status_from_difference() {
        assert_eq!(BalanceStatus::from_difference(0.5), BalanceStatus::Excess);
        assert_eq!(BalanceStatus::from_difference(-0.5), BalanceStatus::Under);
        assert_eq!(BalanceStatus::from_difference(0.0), BalanceStatus::OnTrack);
        assert_eq!(BalanceStatus::from_difference(0.009), BalanceStatus::OnTrack);
        assert_eq!(BalanceStatus::from_difference(-0.009), BalanceStatus::OnTrack);
    }

    #[test]
    fn test_fresh_state_invariant() {
        let state = AppState::fresh(date("2024-06-10"));
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.history[0].date, state.current_day.date);
    }
}
