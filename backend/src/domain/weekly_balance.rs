//! Weekly balance engine.
//!
//! Aggregates the current calendar week (Sunday through Saturday) of
//! history into planned-versus-actual differences per category. Only fully
//! elapsed days count: today is excluded, as are placeholder days the user
//! never touched. Free days plan exactly what was eaten, so they never move
//! the balance; normal and sport days are planned to hit their limit.

use anyhow::{ensure, Result};
use chrono::{Datelike, Duration, NaiveDate};
use shared::{
    CategoryBalance, CategoryDefinition, DayRecord, WeeklyBalanceResult, BALANCE_EPSILON,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Most recent Sunday on or before the given date
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

/// The Saturday ending the week containing the given date
pub fn week_end(date: NaiveDate) -> NaiveDate {
    week_start(date) + Duration::days(6)
}

/// Human-readable week range: "Jun 8 - 14" within one month,
/// "Jun 29 - Jul 5" across a month boundary
pub fn format_week_range(start: NaiveDate, end: NaiveDate) -> String {
    let start_month = start.format("%b");
    if start.month() == end.month() {
        format!("{} {} - {}", start_month, start.day(), end.day())
    } else {
        format!(
            "{} {} - {} {}",
            start_month,
            start.day(),
            end.format("%b"),
            end.day()
        )
    }
}

/// Compute the rolling balance for the week containing `today`.
///
/// Categories whose difference is within [`BALANCE_EPSILON`] of zero are
/// omitted from the result, signaling "no indicator to show". An empty week
/// yields an empty category map with a valid date range.
pub fn calculate_weekly_balance(
    history: &[DayRecord],
    catalog: &[CategoryDefinition],
    today: NaiveDate,
) -> Result<WeeklyBalanceResult> {
    let start = week_start(today);
    let end = week_end(today);
    ensure!(start <= today && today <= end, "week bounds out of order");

    // Only fully elapsed, user-touched days contribute
    let week_days: Vec<&DayRecord> = history
        .iter()
        .filter(|day| day.date >= start && day.date < today && day.is_active())
        .collect();
    debug!(
        "weekly balance over {} active day(s) in {} - {}",
        week_days.len(),
        start,
        end
    );

    let mut categories = BTreeMap::new();
    if !week_days.is_empty() {
        for category in catalog {
            let actual: f64 = week_days
                .iter()
                .map(|day| day.unit_count(&category.id))
                .sum();
            let planned: f64 = week_days
                .iter()
                .map(|day| match category.max_units.for_day_type(day.day_type) {
                    // Free days count what was eaten as planned
                    None => day.unit_count(&category.id),
                    Some(limit) => limit,
                })
                .sum();
            let difference = actual - planned;
            if difference.abs() > BALANCE_EPSILON {
                categories.insert(
                    category.id.clone(),
                    CategoryBalance { actual, planned, difference },
                );
            }
        }
    }

    Ok(WeeklyBalanceResult {
        week_date_range: format_week_range(start, end),
        categories,
    })
}
