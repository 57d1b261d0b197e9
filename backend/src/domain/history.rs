//! History store operations.
//!
//! History is a bounded trailing window of day records, ordered
//! most-recent-first and keyed by date. The window is kept total-order
//! complete: every calendar day from today back gets an entry, with
//! placeholders synthesized for days the app was never opened.

use chrono::{Duration, NaiveDate};
use shared::{AppState, DayRecord};
use tracing::{debug, info};

/// Produce exactly `window_days` records covering the consecutive calendar
/// days ending at `today`, most-recent-first.
///
/// Existing records are reused verbatim; gaps are filled with placeholders.
pub fn ensure_complete_history(
    existing: &[DayRecord],
    today: NaiveDate,
    window_days: usize,
) -> Vec<DayRecord> {
    (0..window_days as i64)
        .map(|offset| {
            let date = today - Duration::days(offset);
            existing
                .iter()
                .find(|record| record.date == date)
                .cloned()
                .unwrap_or_else(|| {
                    debug!("synthesizing placeholder for {}", date);
                    DayRecord::placeholder(date)
                })
        })
        .collect()
}

/// Replace the entry with a matching date, or insert at the front.
///
/// The result is truncated to `window_days` entries, dropping the oldest;
/// front-insertion keeps the sequence reverse-chronological in practice.
pub fn upsert(history: &mut Vec<DayRecord>, record: DayRecord, window_days: usize) {
    if let Some(slot) = history.iter_mut().find(|r| r.date == record.date) {
        *slot = record;
    } else {
        history.insert(0, record);
    }
    history.truncate(window_days);
}

/// Start a new current day if the calendar date moved on.
///
/// The fresh day keeps the last-used day type; the old current day stays in
/// history untouched. Returns whether a rollover happened.
pub fn roll_over(state: &mut AppState, today: NaiveDate, window_days: usize) -> bool {
    if state.current_day.date == today {
        return false;
    }
    info!(
        "rolling over from {} to {}",
        state.current_day.date, today
    );
    let mut fresh = DayRecord::placeholder(today);
    fresh.day_type = state.current_day.day_type;
    upsert(&mut state.history, fresh.clone(), window_days);
    state.current_day = fresh;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{DayType, MAX_HISTORY_DAYS};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn edited_day(s: &str) -> DayRecord {
        let mut day = DayRecord::placeholder(date(s));
        day.set_unit_count("carbs", 1.5, 0.5);
        day
    }

    #[test]
    fn test_complete_history_from_empty() {
        let today = date("2024-06-11");
        let history = ensure_complete_history(&[], today, MAX_HISTORY_DAYS);
        assert_eq!(history.len(), MAX_HISTORY_DAYS);
        assert_eq!(history[0].date, today);
        assert_eq!(history[13].date, date("2024-05-29"));
        // Consecutive, most-recent-first, no duplicates
        for pair in history.windows(2) {
            assert_eq!(pair[0].date - pair[1].date, Duration::days(1));
        }
        assert!(history.iter().all(|d| !d.has_been_edited));
    }

    #[test]
    fn test_complete_history_reuses_existing_and_fills_gaps() {
        let today = date("2024-06-11");
        let kept = edited_day("2024-06-08");
        let history = ensure_complete_history(&[kept.clone()], today, MAX_HISTORY_DAYS);
        assert_eq!(history.len(), MAX_HISTORY_DAYS);
        assert_eq!(history[3], kept);
        assert!(!history[1].is_active());
        assert!(!history[2].is_active());
    }

    #[test]
    fn test_complete_history_drops_out_of_window_records() {
        let today = date("2024-06-11");
        let stale = edited_day("2024-01-01");
        let history = ensure_complete_history(&[stale], today, MAX_HISTORY_DAYS);
        assert!(history.iter().all(|d| d.date > date("2024-05-28")));
    }

    #[test]
    fn test_upsert_replaces_matching_date() {
        let mut history = vec![edited_day("2024-06-11"), edited_day("2024-06-10")];
        let mut replacement = edited_day("2024-06-10");
        replacement.set_unit_count("fats", 1.0, 0.5);
        upsert(&mut history, replacement.clone(), MAX_HISTORY_DAYS);
        assert_eq!(history.len(), 2);
        assert_eq!(history[1], replacement);
    }

    #[test]
    fn test_upsert_inserts_at_front_and_truncates() {
        let mut history: Vec<DayRecord> = (0..MAX_HISTORY_DAYS)
            .map(|i| DayRecord::placeholder(date("2024-06-11") - Duration::days(i as i64 + 1)))
            .collect();
        upsert(&mut history, edited_day("2024-06-11"), MAX_HISTORY_DAYS);
        assert_eq!(history.len(), MAX_HISTORY_DAYS);
        assert_eq!(history[0].date, date("2024-06-11"));
        // Oldest entry fell off the back
        assert_eq!(history.last().unwrap().date, date("2024-05-29"));
    }

    #[test]
    fn test_roll_over_preserves_day_type() {
        let mut state = AppState::fresh(date("2024-06-10"));
        state.current_day.set_day_type(DayType::Sport);
        upsert(&mut state.history, state.current_day.clone(), MAX_HISTORY_DAYS);

        assert!(roll_over(&mut state, date("2024-06-11"), MAX_HISTORY_DAYS));
        assert_eq!(state.current_day.date, date("2024-06-11"));
        assert_eq!(state.current_day.day_type, DayType::Sport);
        assert!(!state.current_day.has_been_edited);
        // The old day is still in history
        assert!(state.history.iter().any(|d| d.date == date("2024-06-10")));
        assert_eq!(state.history[0].date, date("2024-06-11"));
    }

    #[test]
    fn test_roll_over_noop_on_same_day() {
        let mut state = AppState::fresh(date("2024-06-10"));
        let before = state.clone();
        assert!(!roll_over(&mut state, date("2024-06-10"), MAX_HISTORY_DAYS));
        assert_eq!(state, before);
    }
}
